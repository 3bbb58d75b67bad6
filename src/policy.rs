//! Heap behavior policies
//!
//! Two orthogonal switches select between four heap variants. Both are fixed
//! at construction; two heaps can only be melded when their policies match.

use std::fmt;

/// How [`Heap::meld`](crate::Heap::meld) (and therefore every insert, which
/// melds a singleton) treats the root list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeldPolicy {
    /// Consolidate the root list after every meld, keeping at most one tree
    /// per rank at all times.
    Eager,
    /// Just splice the root lists; consolidation is deferred to the next
    /// delete-min.
    Lazy,
}

/// How a heap-order violation raised by a key decrease is repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecreaseKeyPolicy {
    /// Swap items up the ancestor chain until heap order holds. The tree
    /// shape is untouched; worst case O(log n) swaps.
    HeapifyUp,
    /// Cut the violating subtree loose and cascade cuts through marked
    /// ancestors. Amortized O(1).
    CascadingCut,
}

/// The complete policy of a heap: one [`MeldPolicy`] plus one
/// [`DecreaseKeyPolicy`].
///
/// The four combinations correspond to the classic variants, each available
/// through a named constructor:
///
/// ```rust
/// use meld_heaps::{Heap, HeapPolicy};
///
/// let strict: Heap<&str> = Heap::new(HeapPolicy::binomial());
/// let fib: Heap<&str> = Heap::new(HeapPolicy::fibonacci());
/// assert_ne!(strict.policy(), fib.policy());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapPolicy {
    pub melds: MeldPolicy,
    pub decrease_keys: DecreaseKeyPolicy,
}

impl HeapPolicy {
    /// Strict binomial heap: eager melds, heapify-up decrease-key.
    pub const fn binomial() -> Self {
        HeapPolicy {
            melds: MeldPolicy::Eager,
            decrease_keys: DecreaseKeyPolicy::HeapifyUp,
        }
    }

    /// Lazily-melded binomial heap: lazy melds, heapify-up decrease-key.
    pub const fn lazy_binomial() -> Self {
        HeapPolicy {
            melds: MeldPolicy::Lazy,
            decrease_keys: DecreaseKeyPolicy::HeapifyUp,
        }
    }

    /// Binomial heap with cascading cuts: eager melds, cut decrease-key.
    pub const fn binomial_with_cuts() -> Self {
        HeapPolicy {
            melds: MeldPolicy::Eager,
            decrease_keys: DecreaseKeyPolicy::CascadingCut,
        }
    }

    /// Full Fibonacci heap: lazy melds, cascading-cut decrease-key.
    pub const fn fibonacci() -> Self {
        HeapPolicy {
            melds: MeldPolicy::Lazy,
            decrease_keys: DecreaseKeyPolicy::CascadingCut,
        }
    }

    pub(crate) fn eager_melds(&self) -> bool {
        self.melds == MeldPolicy::Eager
    }
}

impl fmt::Display for HeapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let melds = match self.melds {
            MeldPolicy::Eager => "eager-melds",
            MeldPolicy::Lazy => "lazy-melds",
        };
        let dk = match self.decrease_keys {
            DecreaseKeyPolicy::HeapifyUp => "heapify-up",
            DecreaseKeyPolicy::CascadingCut => "cascading-cut",
        };
        write!(f, "{melds}/{dk}")
    }
}

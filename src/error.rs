//! Error types for heap operations

use std::error::Error;
use std::fmt;

use crate::heap::Heap;
use crate::policy::HeapPolicy;

/// Error type for single-heap operations.
///
/// Every failure is reported before the heap is mutated; an `Err` return
/// always leaves the heap exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// `insert` was called with a non-positive key.
    #[error("key must be strictly positive, got {0}")]
    KeyNotPositive(i64),
    /// `decrease_key` was called with a negative amount.
    #[error("decrease amount must be non-negative, got {0}")]
    NegativeDecrease(i64),
    /// `decrease_key` would drive the key below zero, leaving the positive
    /// key domain.
    #[error("decrease amount {diff} exceeds current key {key}")]
    DecreaseTooLarge { diff: i64, key: i64 },
    /// The item behind the handle has already been removed from the heap.
    #[error("item is no longer in the heap")]
    StaleItem,
}

/// Rejected [`Heap::meld`](crate::Heap::meld) between heaps with different
/// policies.
///
/// Melding is only defined for identically configured heaps. The argument
/// heap is handed back untouched so a failed meld destroys nothing:
///
/// ```rust
/// use meld_heaps::{Heap, HeapPolicy};
///
/// let mut a: Heap<()> = Heap::new(HeapPolicy::binomial());
/// let mut b: Heap<()> = Heap::new(HeapPolicy::fibonacci());
/// b.insert(3, ()).unwrap();
///
/// let err = a.meld(b).unwrap_err();
/// let b = err.into_rejected();
/// assert_eq!(b.len(), 1);
/// ```
pub struct MeldError<T> {
    rejected: Heap<T>,
    receiver: HeapPolicy,
}

impl<T> MeldError<T> {
    pub(crate) fn new(rejected: Heap<T>, receiver: HeapPolicy) -> Self {
        MeldError { rejected, receiver }
    }

    /// Policy of the heap that refused the meld.
    pub fn receiver_policy(&self) -> HeapPolicy {
        self.receiver
    }

    /// Policy of the rejected heap.
    pub fn rejected_policy(&self) -> HeapPolicy {
        self.rejected.policy()
    }

    /// Recovers the rejected heap, unmodified.
    pub fn into_rejected(self) -> Heap<T> {
        self.rejected
    }
}

impl<T> fmt::Debug for MeldError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeldError")
            .field("receiver", &self.receiver)
            .field("rejected", &self.rejected.policy())
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for MeldError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot meld a {} heap into a {} heap",
            self.rejected.policy(),
            self.receiver
        )
    }
}

impl<T> Error for MeldError<T> {}

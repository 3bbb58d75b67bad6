//! Mergeable priority queues with policy-selected laziness
//!
//! This crate provides a single heap engine that realizes four classic
//! mergeable-heap designs, selected by two orthogonal policies:
//!
//! - **Meld policy**: whether melding two heaps eagerly consolidates the root
//!   list ([`MeldPolicy::Eager`]) or just splices it ([`MeldPolicy::Lazy`])
//! - **Decrease-key policy**: whether a heap-order violation is repaired by
//!   swapping items up the tree ([`DecreaseKeyPolicy::HeapifyUp`]) or by
//!   cutting the violating subtree loose ([`DecreaseKeyPolicy::CascadingCut`])
//!
//! The four combinations:
//!
//! | variant | construction | insert | decrease-key | delete-min |
//! |---|---|---|---|---|
//! | strict binomial | [`HeapPolicy::binomial`] | O(log n) | O(log n) | O(log n) |
//! | lazily-melded binomial | [`HeapPolicy::lazy_binomial`] | O(1) | O(log n) | O(log n) amortized |
//! | binomial with cuts | [`HeapPolicy::binomial_with_cuts`] | O(log n) | O(1) amortized | O(log n) |
//! | Fibonacci | [`HeapPolicy::fibonacci`] | O(1) | O(1) amortized | O(log n) amortized |
//!
//! Keys are strictly positive `i64`s that may only decrease; payloads are an
//! opaque caller type. Every heap maintains running diagnostic counters
//! (links, cuts, heapify swaps, tree and mark counts) so callers can assert
//! amortized-cost behavior without walking the structure.
//!
//! # Example
//!
//! ```rust
//! use meld_heaps::{Heap, HeapPolicy};
//!
//! let mut heap = Heap::new(HeapPolicy::fibonacci());
//! let item = heap.insert(40, "answer")?;
//! heap.insert(7, "lucky")?;
//! heap.decrease_key(&item, 38)?; // key 40 -> 2
//! assert_eq!(heap.find_min(), Some((2, &"answer")));
//! # Ok::<(), meld_heaps::HeapError>(())
//! ```
//!
//! Nodes are stored in a generational arena (`slotmap`), so item handles
//! detect removal instead of dangling, and the structure walks performed by
//! the validators in `tests/` are bounds-checked index traversals.

pub mod error;
pub mod heap;
pub mod inspect;
mod node;
pub mod policy;
mod ring;

pub use error::{HeapError, MeldError};
pub use heap::Heap;
pub use inspect::{Children, NodeView, Roots};
pub use node::ItemRef;
pub use policy::{DecreaseKeyPolicy, HeapPolicy, MeldPolicy};

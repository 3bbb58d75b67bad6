//! The heap engine
//!
//! A [`Heap`] is a forest of heap-ordered trees whose roots form one circular
//! sibling ring. The engine orchestrates the ring primitives, equal-rank
//! linking, consolidation, cascading cuts, and heapify-up into the six public
//! operations, and maintains the diagnostic counters as exact running totals.
//!
//! The minimum pointer is a best-effort hint stored in a `Cell`: it always
//! names *some* root (doubling as the root-ring entry point) and is updated
//! opportunistically by the mutating operations. Only [`Heap::find_min`] and
//! [`Heap::delete_min`] rescan the root ring and therefore guarantee the
//! true minimum.

use std::cell::Cell;

use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use smallvec::SmallVec;

use crate::error::{HeapError, MeldError};
use crate::node::{ItemRef, Node, NodeKey};
use crate::policy::{DecreaseKeyPolicy, HeapPolicy};
use crate::ring;

/// Base of the rank bound: no node of an n-element heap exceeds rank
/// log_φ(n) + O(1), for any of the four variants.
const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// A mergeable priority queue over positive `i64` keys with opaque payloads.
///
/// The behavior of melds and key decreases is fixed at construction by a
/// [`HeapPolicy`]; see the crate docs for the four resulting variants.
///
/// # Example
///
/// ```rust
/// use meld_heaps::{Heap, HeapPolicy};
///
/// let mut heap = Heap::new(HeapPolicy::binomial());
/// heap.insert(3, "c")?;
/// heap.insert(1, "a")?;
/// heap.insert(2, "b")?;
///
/// assert_eq!(heap.delete_min(), Some((1, "a")));
/// assert_eq!(heap.delete_min(), Some((2, "b")));
/// assert_eq!(heap.delete_min(), Some((3, "c")));
/// assert_eq!(heap.delete_min(), None);
/// # Ok::<(), meld_heaps::HeapError>(())
/// ```
pub struct Heap<T> {
    policy: HeapPolicy,
    pub(crate) nodes: SlotMap<NodeKey, Node<T>>,
    pub(crate) min: Cell<NodeKey>,
    size: usize,
    num_trees: usize,
    num_marked: usize,
    total_links: u64,
    total_cuts: u64,
    total_heapify_costs: u64,
}

impl<T> Heap<T> {
    /// Creates an empty heap with the given policy.
    pub fn new(policy: HeapPolicy) -> Self {
        Heap {
            policy,
            nodes: SlotMap::with_key(),
            min: Cell::new(NodeKey::null()),
            size: 0,
            num_trees: 0,
            num_marked: 0,
            total_links: 0,
            total_cuts: 0,
            total_heapify_costs: 0,
        }
    }

    /// The policy this heap was constructed with.
    pub fn policy(&self) -> HeapPolicy {
        self.policy
    }

    /// Number of items in the heap.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the heap holds no items.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of trees in the root list.
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Number of currently marked (non-root) nodes.
    pub fn num_marked_nodes(&self) -> usize {
        self.num_marked
    }

    /// Total equal-rank links performed over the heap's lifetime.
    pub fn total_links(&self) -> u64 {
        self.total_links
    }

    /// Total cuts performed over the heap's lifetime.
    pub fn total_cuts(&self) -> u64 {
        self.total_cuts
    }

    /// Total heapify-up item swaps performed over the heap's lifetime.
    pub fn total_heapify_costs(&self) -> u64 {
        self.total_heapify_costs
    }

    /// Inserts `(key, payload)` as a new singleton tree and returns a handle
    /// to the item.
    ///
    /// Fails with [`HeapError::KeyNotPositive`] for `key <= 0`, leaving the
    /// heap untouched. Under eager melds the root list is consolidated before
    /// returning.
    pub fn insert(&mut self, key: i64, payload: T) -> Result<ItemRef, HeapError> {
        if key <= 0 {
            return Err(HeapError::KeyNotPositive(key));
        }
        let k = self.nodes.insert(Node::solitary(key, payload));
        let node = &mut self.nodes[k];
        node.next = k;
        node.prev = k;
        node.item.anchor.set(k);
        let handle = ItemRef::new(&node.item.anchor);
        self.size += 1;
        self.attach_root(k);
        if self.policy.eager_melds() {
            self.consolidate();
        }
        Ok(handle)
    }

    /// Returns the minimum key and a reference to its payload, or `None` if
    /// the heap is empty.
    ///
    /// Scans the root ring once, so the result is the true minimum regardless
    /// of how stale the internal hint is; the hint is repaired as a side
    /// effect.
    pub fn find_min(&self) -> Option<(i64, &T)> {
        let best = self.scan_min()?;
        self.min.set(best);
        let item = &self.nodes[best].item;
        Some((item.key, &item.payload))
    }

    /// Removes the minimum item and returns it, or `None` if the heap is
    /// empty.
    ///
    /// Children of the removed root are promoted to roots (unmarked) and the
    /// whole child ring is spliced into the root ring in O(1); the remaining
    /// root list is then consolidated unless the heap emptied.
    pub fn delete_min(&mut self) -> Option<(i64, T)> {
        let m = self.scan_min()?;
        let child = self.nodes[m].child;
        let child_count = self.nodes[m].rank;
        if !child.is_null() {
            for c in ring::ring_keys(&self.nodes, child) {
                let node = &mut self.nodes[c];
                node.parent = NodeKey::null();
                if std::mem::take(&mut node.marked) {
                    self.num_marked -= 1;
                }
            }
        }
        let survivor = ring::detach(&mut self.nodes, m);
        let entry = match (survivor, child.is_null()) {
            (Some(s), false) => {
                ring::splice(&mut self.nodes, s, child);
                s
            }
            (Some(s), true) => s,
            (None, false) => child,
            (None, true) => NodeKey::null(),
        };
        self.num_trees = self.num_trees + child_count - 1;
        self.size -= 1;
        self.min.set(entry);
        let node = self.nodes.remove(m)?;
        if !entry.is_null() {
            self.consolidate();
        }
        Some((node.item.key, node.item.payload))
    }

    /// Decreases the item's key by `diff` and repairs heap order according to
    /// the decrease-key policy.
    ///
    /// `decrease_key(item, 0)` is an observable no-op. Fails fast, before
    /// any mutation, with [`HeapError::NegativeDecrease`] for `diff < 0`,
    /// [`HeapError::DecreaseTooLarge`] when the decrease would leave the
    /// non-negative key domain, and [`HeapError::StaleItem`] when the item
    /// has been removed.
    pub fn decrease_key(&mut self, item: &ItemRef, diff: i64) -> Result<(), HeapError> {
        let k = self.resolve(item)?;
        if diff < 0 {
            return Err(HeapError::NegativeDecrease(diff));
        }
        let key = self.nodes[k].item.key;
        if diff > key {
            return Err(HeapError::DecreaseTooLarge { diff, key });
        }
        self.decrease_resident(k, diff);
        Ok(())
    }

    /// Removes an arbitrary item, returning its key and payload.
    ///
    /// Implemented as a decrease to just below the current minimum followed
    /// by [`Heap::delete_min`], so the cost counters reflect the repair work
    /// the active policy performs.
    pub fn delete(&mut self, item: &ItemRef) -> Result<(i64, T), HeapError> {
        let k = self.resolve(item)?;
        let original_key = self.nodes[k].item.key;
        let min_node = self.scan_min().ok_or(HeapError::StaleItem)?;
        // Undercut the minimum by exactly one: the item becomes the unique
        // smallest key without ever leaving the i64 range.
        let diff = original_key - self.nodes[min_node].item.key + 1;
        self.decrease_resident(k, diff);
        let (_, payload) = self.delete_min().ok_or(HeapError::StaleItem)?;
        Ok((original_key, payload))
    }

    /// Melds `other` into this heap, consuming it.
    ///
    /// The root rings are spliced together, all aggregate counters are
    /// summed, and under eager melds the result is consolidated. Melding an
    /// empty heap is a no-op. Heaps with different policies cannot be melded;
    /// the attempt fails with a [`MeldError`] carrying `other` back
    /// untouched.
    ///
    /// Item handles issued by `other` remain valid and now designate items of
    /// this heap. Absorbing the donor arena re-indexes its nodes, which costs
    /// O(len of `other`); the ring splice itself is O(1).
    pub fn meld(&mut self, mut other: Heap<T>) -> Result<(), MeldError<T>> {
        if self.policy != other.policy {
            return Err(MeldError::new(other, self.policy));
        }
        if other.is_empty() {
            return Ok(());
        }
        let mut remap =
            FxHashMap::with_capacity_and_hasher(other.nodes.len(), Default::default());
        let donor: Vec<(NodeKey, Node<T>)> = other.nodes.drain().collect();
        for (old, node) in donor {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
        }
        let map = |k: NodeKey| if k.is_null() { k } else { remap[&k] };
        for &new in remap.values() {
            let parent = map(self.nodes[new].parent);
            let child = map(self.nodes[new].child);
            let next = map(self.nodes[new].next);
            let prev = map(self.nodes[new].prev);
            let node = &mut self.nodes[new];
            node.parent = parent;
            node.child = child;
            node.next = next;
            node.prev = prev;
            node.item.anchor.set(new);
        }
        let donor_entry = map(other.min.get());
        let entry = self.min.get();
        if entry.is_null() {
            self.min.set(donor_entry);
        } else {
            ring::splice(&mut self.nodes, entry, donor_entry);
            if self.nodes[donor_entry].item.key < self.nodes[entry].item.key {
                self.min.set(donor_entry);
            }
        }
        self.size += other.size;
        self.num_trees += other.num_trees;
        self.num_marked += other.num_marked;
        self.total_links += other.total_links;
        self.total_cuts += other.total_cuts;
        self.total_heapify_costs += other.total_heapify_costs;
        if self.policy.eager_melds() {
            self.consolidate();
        }
        Ok(())
    }

    /// Locates the node currently holding the item behind a handle.
    fn resolve(&self, item: &ItemRef) -> Result<NodeKey, HeapError> {
        let anchor = item.anchor.upgrade().ok_or(HeapError::StaleItem)?;
        let k = anchor.get();
        if self.nodes.contains_key(k) {
            Ok(k)
        } else {
            Err(HeapError::StaleItem)
        }
    }

    /// Splices a singleton root into the root ring and bumps the tree count.
    fn attach_root(&mut self, k: NodeKey) {
        let entry = self.min.get();
        if entry.is_null() {
            self.min.set(k);
        } else {
            ring::splice(&mut self.nodes, entry, k);
            if self.nodes[k].item.key < self.nodes[entry].item.key {
                self.min.set(k);
            }
        }
        self.num_trees += 1;
    }

    /// Walks the root ring once and returns the true minimum root.
    fn scan_min(&self) -> Option<NodeKey> {
        let entry = self.min.get();
        if entry.is_null() {
            return None;
        }
        let mut best = entry;
        let mut cursor = self.nodes[entry].next;
        while cursor != entry {
            if self.nodes[cursor].item.key < self.nodes[best].item.key {
                best = cursor;
            }
            cursor = self.nodes[cursor].next;
        }
        Some(best)
    }

    /// Applies an already-validated decrease and dispatches the heap-order
    /// repair to the active policy.
    fn decrease_resident(&mut self, k: NodeKey, diff: i64) {
        self.nodes[k].item.key -= diff;
        let parent = self.nodes[k].parent;
        let violates =
            !parent.is_null() && self.nodes[k].item.key < self.nodes[parent].item.key;
        let resting = if violates {
            match self.policy.decrease_keys {
                DecreaseKeyPolicy::HeapifyUp => self.heapify_up(k),
                DecreaseKeyPolicy::CascadingCut => {
                    self.cascading_cut(k);
                    k
                }
            }
        } else {
            k
        };
        // Opportunistic hint update; only a root can hold the minimum.
        let entry = self.min.get();
        if self.nodes[resting].parent.is_null()
            && self.nodes[resting].item.key < self.nodes[entry].item.key
        {
            self.min.set(resting);
        }
    }

    /// Swaps items up the ancestor chain until heap order holds, leaving the
    /// tree shape untouched. Returns the node where the decreased item came
    /// to rest.
    fn heapify_up(&mut self, start: NodeKey) -> NodeKey {
        let mut cur = start;
        loop {
            let parent = self.nodes[cur].parent;
            if parent.is_null() || self.nodes[cur].item.key >= self.nodes[parent].item.key {
                return cur;
            }
            let Some([a, b]) = self.nodes.get_disjoint_mut([cur, parent]) else {
                return cur;
            };
            std::mem::swap(&mut a.item, &mut b.item);
            a.item.anchor.set(cur);
            b.item.anchor.set(parent);
            self.total_heapify_costs += 1;
            cur = parent;
        }
    }

    /// Cuts `x` loose from its parent and cascades through marked ancestors.
    ///
    /// Precondition: `x` has a parent.
    fn cascading_cut(&mut self, x: NodeKey) {
        let parent = self.nodes[x].parent;
        self.cut_to_root(x);
        if self.nodes[parent].parent.is_null() {
            // Roots absorb child losses without marking; this is what bounds
            // the cascade by the marked-ancestor chain.
            return;
        }
        if !self.nodes[parent].marked {
            self.nodes[parent].marked = true;
            self.num_marked += 1;
        } else {
            self.cascading_cut(parent);
        }
    }

    /// Detaches `x` from its parent's child ring and re-enters it into the
    /// root ring as a fresh, unmarked tree.
    fn cut_to_root(&mut self, x: NodeKey) {
        let parent = self.nodes[x].parent;
        let sibling = ring::detach(&mut self.nodes, x);
        if self.nodes[parent].child == x {
            self.nodes[parent].child = sibling.unwrap_or_else(NodeKey::null);
        }
        self.nodes[parent].rank -= 1;
        let node = &mut self.nodes[x];
        node.parent = NodeKey::null();
        if std::mem::take(&mut node.marked) {
            self.num_marked -= 1;
        }
        let entry = self.min.get();
        ring::splice(&mut self.nodes, entry, x);
        self.num_trees += 1;
        self.total_cuts += 1;
    }

    /// Makes `b` (or `a`, whichever loses the key comparison) a child of the
    /// other, producing a single tree of rank + 1. Returns the winner.
    ///
    /// Preconditions: equal ranks, both currently in the root ring.
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        debug_assert_eq!(self.nodes[a].rank, self.nodes[b].rank);
        let (winner, loser) = if self.nodes[a].item.key <= self.nodes[b].item.key {
            (a, b)
        } else {
            (b, a)
        };
        ring::detach(&mut self.nodes, loser);
        let node = &mut self.nodes[loser];
        node.parent = winner;
        if std::mem::take(&mut node.marked) {
            self.num_marked -= 1;
        }
        let child = self.nodes[winner].child;
        if child.is_null() {
            self.nodes[winner].child = loser;
        } else {
            ring::splice(&mut self.nodes, child, loser);
        }
        self.nodes[winner].rank += 1;
        self.total_links += 1;
        self.num_trees -= 1;
        winner
    }

    /// Reduces the root ring to at most one tree per rank and recomputes the
    /// minimum.
    fn consolidate(&mut self) {
        let entry = self.min.get();
        if entry.is_null() {
            return;
        }
        let max_rank = (self.size as f64).log(GOLDEN_RATIO) as usize + 2;
        let mut slots: SmallVec<[NodeKey; 32]> = SmallVec::new();
        slots.resize(max_rank, NodeKey::null());
        // Snapshot the ring: linking detaches losers while we iterate.
        for root in ring::ring_keys(&self.nodes, entry) {
            let mut x = root;
            loop {
                let rank = self.nodes[x].rank;
                if rank >= slots.len() {
                    slots.resize(rank + 1, NodeKey::null());
                }
                let occupant = slots[rank];
                if occupant.is_null() {
                    slots[rank] = x;
                    break;
                }
                slots[rank] = NodeKey::null();
                x = self.link(x, occupant);
            }
        }
        // Rebuild the root ring from the surviving slots, lowest rank first.
        let mut ring_entry = NodeKey::null();
        let mut best = NodeKey::null();
        for s in slots.into_iter().filter(|s| !s.is_null()) {
            let node = &mut self.nodes[s];
            node.next = s;
            node.prev = s;
            if ring_entry.is_null() {
                ring_entry = s;
                best = s;
            } else {
                ring::splice(&mut self.nodes, ring_entry, s);
                if self.nodes[s].item.key < self.nodes[best].item.key {
                    best = s;
                }
            }
        }
        self.min.set(best);
    }
}

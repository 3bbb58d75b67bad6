//! Node and item representation
//!
//! Nodes live in a generational arena ([`slotmap::SlotMap`]) and refer to
//! each other by [`NodeKey`] index; `NodeKey::null()` stands for an absent
//! link. An [`Item`] is the user-visible (key, payload) pair resident in a
//! node; it carries an *anchor*, a shared cell recording which node currently
//! holds it. Heapify-up moves items between nodes, so the anchor, not the
//! node, is an item's stable identity, and [`ItemRef`] handles observe the
//! item through a weak reference to that anchor.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

slotmap::new_key_type! {
    /// Arena key for heap nodes.
    pub(crate) struct NodeKey;
}

/// The (key, payload) pair resident in a node, plus its identity anchor.
///
/// The anchor cell always names the node the item currently occupies. It is
/// updated whenever the item changes nodes (heapify-up swaps) or the node
/// changes keys (meld re-indexing), and dropped with the node on removal,
/// which is what invalidates outstanding [`ItemRef`]s.
pub(crate) struct Item<T> {
    pub key: i64,
    pub payload: T,
    pub anchor: Rc<Cell<NodeKey>>,
}

/// A tree vertex: the resident item plus structure links into the arena.
///
/// Every node is always a member of exactly one circular sibling ring; a
/// singleton ring points at itself. `parent` is null iff the node is a root,
/// `child` is null iff `rank == 0`, and `rank` always equals the size of the
/// child ring.
pub(crate) struct Node<T> {
    pub item: Item<T>,
    pub parent: NodeKey,
    pub child: NodeKey,
    pub next: NodeKey,
    pub prev: NodeKey,
    pub rank: usize,
    pub marked: bool,
}

impl<T> Node<T> {
    /// A fresh root with no relations; the caller makes it circular once its
    /// arena key is known.
    pub fn solitary(key: i64, payload: T) -> Self {
        Node {
            item: Item {
                key,
                payload,
                anchor: Rc::new(Cell::new(NodeKey::default())),
            },
            parent: NodeKey::default(),
            child: NodeKey::default(),
            next: NodeKey::default(),
            prev: NodeKey::default(),
            rank: 0,
            marked: false,
        }
    }
}

/// Handle to an item in a heap, returned by
/// [`Heap::insert`](crate::Heap::insert).
///
/// The handle follows the *item*, not the tree position: decrease-key under
/// the heapify-up policy moves items between nodes, and the handle keeps
/// designating the same (key, payload) pair. Once the item is removed by
/// `delete_min` or `delete`, the handle goes stale and operations through it
/// report [`HeapError::StaleItem`](crate::HeapError::StaleItem).
///
/// A handle is only meaningful for the heap that created it, or for the
/// receiving heap after that heap was melded away. Using it with an unrelated
/// heap is a logic error.
pub struct ItemRef {
    pub(crate) anchor: Weak<Cell<NodeKey>>,
}

impl ItemRef {
    pub(crate) fn new(anchor: &Rc<Cell<NodeKey>>) -> Self {
        ItemRef {
            anchor: Rc::downgrade(anchor),
        }
    }

    /// Whether the item is still present in some heap.
    pub fn is_valid(&self) -> bool {
        self.anchor.strong_count() > 0
    }
}

impl Clone for ItemRef {
    fn clone(&self) -> Self {
        ItemRef {
            anchor: self.anchor.clone(),
        }
    }
}

impl PartialEq for ItemRef {
    fn eq(&self, other: &Self) -> bool {
        self.anchor.ptr_eq(&other.anchor)
    }
}

impl Eq for ItemRef {}

impl fmt::Debug for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRef")
            .field("valid", &self.is_valid())
            .finish()
    }
}

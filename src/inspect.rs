//! Read-only structure access
//!
//! External validators need to walk every node reachable from the root list
//! exactly once and observe keys, ranks, marks, and parent links. This module
//! exposes that surface as borrowing views: [`Heap::roots`] iterates the root
//! ring, and a [`NodeView`] fans out to its child ring. All traversal is
//! arena-index lookups; nothing here can mutate the heap.
//!
//! `Display` renders an indented forest dump, one node per line, as a
//! debugging convenience.

use std::fmt;

use slotmap::Key;

use crate::heap::Heap;
use crate::node::{ItemRef, NodeKey};

impl<T> Heap<T> {
    /// Iterates the trees of the root list, one [`NodeView`] per root.
    pub fn roots(&self) -> Roots<'_, T> {
        let entry = self.min.get();
        Roots {
            heap: self,
            cursor: entry,
            start: entry,
            exhausted: entry.is_null(),
        }
    }

    fn view(&self, key: NodeKey) -> NodeView<'_, T> {
        NodeView { heap: self, key }
    }
}

/// A borrowed view of one tree node.
pub struct NodeView<'a, T> {
    heap: &'a Heap<T>,
    key: NodeKey,
}

impl<T> Clone for NodeView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeView<'_, T> {}

impl<'a, T> NodeView<'a, T> {
    /// Current key of the resident item.
    pub fn key(&self) -> i64 {
        self.heap.nodes[self.key].item.key
    }

    /// Payload of the resident item.
    pub fn payload(&self) -> &'a T {
        &self.heap.nodes[self.key].item.payload
    }

    /// A handle to the resident item, usable with the mutating operations.
    pub fn item(&self) -> ItemRef {
        ItemRef::new(&self.heap.nodes[self.key].item.anchor)
    }

    /// Number of direct children.
    pub fn rank(&self) -> usize {
        self.heap.nodes[self.key].rank
    }

    /// Whether the node has lost a child since last being linked under its
    /// current parent. Always `false` for roots.
    pub fn is_marked(&self) -> bool {
        self.heap.nodes[self.key].marked
    }

    /// Whether the node is a member of the root list.
    pub fn is_root(&self) -> bool {
        self.heap.nodes[self.key].parent.is_null()
    }

    /// The parent node, or `None` for roots.
    pub fn parent(&self) -> Option<NodeView<'a, T>> {
        let parent = self.heap.nodes[self.key].parent;
        if parent.is_null() {
            None
        } else {
            Some(self.heap.view(parent))
        }
    }

    /// Iterates the node's child ring.
    pub fn children(&self) -> Children<'a, T> {
        let entry = self.heap.nodes[self.key].child;
        Children {
            heap: self.heap,
            cursor: entry,
            start: entry,
            exhausted: entry.is_null(),
        }
    }
}

impl<T> fmt::Debug for NodeView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("key", &self.key())
            .field("rank", &self.rank())
            .field("marked", &self.is_marked())
            .field("root", &self.is_root())
            .finish()
    }
}

/// Iterator over the root ring. See [`Heap::roots`].
pub struct Roots<'a, T> {
    heap: &'a Heap<T>,
    cursor: NodeKey,
    start: NodeKey,
    exhausted: bool,
}

impl<'a, T> Iterator for Roots<'a, T> {
    type Item = NodeView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.cursor;
        let next = self.heap.nodes[current].next;
        if next == self.start {
            self.exhausted = true;
        } else {
            self.cursor = next;
        }
        Some(self.heap.view(current))
    }
}

/// Iterator over a node's child ring. See [`NodeView::children`].
pub struct Children<'a, T> {
    heap: &'a Heap<T>,
    cursor: NodeKey,
    start: NodeKey,
    exhausted: bool,
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = NodeView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.cursor;
        let next = self.heap.nodes[current].next;
        if next == self.start {
            self.exhausted = true;
        } else {
            self.cursor = next;
        }
        Some(self.heap.view(current))
    }
}

fn fmt_subtree<T: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    node: NodeView<'_, T>,
    depth: usize,
) -> fmt::Result {
    writeln!(
        f,
        "{:indent$}{}{} rank={} {:?}",
        "",
        node.key(),
        if node.is_marked() { "*" } else { "" },
        node.rank(),
        node.payload(),
        indent = depth * 2
    )?;
    for child in node.children() {
        fmt_subtree(f, child, depth + 1)?;
    }
    Ok(())
}

impl<T: fmt::Debug> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "heap[{}] size={} trees={} marked={}",
            self.policy(),
            self.len(),
            self.num_trees(),
            self.num_marked_nodes()
        )?;
        for root in self.roots() {
            fmt_subtree(f, root, 1)?;
        }
        Ok(())
    }
}

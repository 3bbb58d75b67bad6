//! Circular sibling-ring primitives over the node arena
//!
//! Every node is always part of exactly one circular doubly-linked ring (the
//! root list or some child list), with a singleton ring pointing at itself.
//! Representing the empty case as "ring of one" keeps these primitives to a
//! single code path. All operations are O(1) index surgery except
//! [`ring_keys`], which walks the ring once.
//!
//! Callers are responsible for `parent` pointers; the ring layer only touches
//! `next`/`prev`.

use slotmap::SlotMap;

use crate::node::{Node, NodeKey};

/// Concatenates the two disjoint rings containing `a` and `b`.
///
/// Four index writes: the successors of `a` and `b` are exchanged, fusing the
/// rings. Works unchanged when either ring is a singleton.
pub(crate) fn splice<T>(nodes: &mut SlotMap<NodeKey, Node<T>>, a: NodeKey, b: NodeKey) {
    let a_next = nodes[a].next;
    let b_next = nodes[b].next;
    nodes[a].next = b_next;
    nodes[b_next].prev = a;
    nodes[b].next = a_next;
    nodes[a_next].prev = b;
}

/// Removes `x` from its ring, resetting it to a singleton.
///
/// Returns a member of the remaining ring, or `None` when `x` was alone.
pub(crate) fn detach<T>(nodes: &mut SlotMap<NodeKey, Node<T>>, x: NodeKey) -> Option<NodeKey> {
    let next = nodes[x].next;
    if next == x {
        return None;
    }
    let prev = nodes[x].prev;
    nodes[prev].next = next;
    nodes[next].prev = prev;
    nodes[x].next = x;
    nodes[x].prev = x;
    Some(next)
}

/// Snapshots the members of the ring containing `start`, in ring order.
///
/// The snapshot lets callers relink ring members while iterating, which both
/// consolidation and child promotion rely on.
pub(crate) fn ring_keys<T>(nodes: &SlotMap<NodeKey, Node<T>>, start: NodeKey) -> Vec<NodeKey> {
    let mut keys = vec![start];
    let mut cursor = nodes[start].next;
    while cursor != start {
        keys.push(cursor);
        cursor = nodes[cursor].next;
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singleton(nodes: &mut SlotMap<NodeKey, Node<()>>, key: i64) -> NodeKey {
        let k = nodes.insert(Node::solitary(key, ()));
        let node = &mut nodes[k];
        node.next = k;
        node.prev = k;
        node.item.anchor.set(k);
        k
    }

    #[test]
    fn singleton_points_at_itself() {
        let mut nodes = SlotMap::with_key();
        let a = singleton(&mut nodes, 1);
        assert_eq!(nodes[a].next, a);
        assert_eq!(nodes[a].prev, a);
        assert_eq!(ring_keys(&nodes, a), vec![a]);
    }

    #[test]
    fn splice_two_singletons() {
        let mut nodes = SlotMap::with_key();
        let a = singleton(&mut nodes, 1);
        let b = singleton(&mut nodes, 2);
        splice(&mut nodes, a, b);
        assert_eq!(nodes[a].next, b);
        assert_eq!(nodes[b].next, a);
        assert_eq!(ring_keys(&nodes, a).len(), 2);
    }

    #[test]
    fn splice_two_pairs_preserves_all_members() {
        let mut nodes = SlotMap::with_key();
        let a = singleton(&mut nodes, 1);
        let b = singleton(&mut nodes, 2);
        let c = singleton(&mut nodes, 3);
        let d = singleton(&mut nodes, 4);
        splice(&mut nodes, a, b);
        splice(&mut nodes, c, d);
        splice(&mut nodes, a, c);
        let ring = ring_keys(&nodes, a);
        assert_eq!(ring.len(), 4);
        for k in [a, b, c, d] {
            assert!(ring.contains(&k));
        }
        // The ring is still doubly consistent.
        for &k in &ring {
            assert_eq!(nodes[nodes[k].next].prev, k);
        }
    }

    #[test]
    fn detach_middle_member() {
        let mut nodes = SlotMap::with_key();
        let a = singleton(&mut nodes, 1);
        let b = singleton(&mut nodes, 2);
        let c = singleton(&mut nodes, 3);
        splice(&mut nodes, a, b);
        splice(&mut nodes, a, c);
        let survivor = detach(&mut nodes, b).unwrap();
        assert_ne!(survivor, b);
        assert_eq!(ring_keys(&nodes, a).len(), 2);
        // b is reset to a singleton.
        assert_eq!(nodes[b].next, b);
        assert_eq!(nodes[b].prev, b);
    }

    #[test]
    fn detach_last_member_reports_empty() {
        let mut nodes = SlotMap::with_key();
        let a = singleton(&mut nodes, 1);
        assert_eq!(detach(&mut nodes, a), None);
        assert_eq!(nodes[a].next, a);
    }
}

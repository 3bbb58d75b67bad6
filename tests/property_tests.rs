//! Property-based tests using proptest
//!
//! Random operation sequences are replayed against a plain multiset of keys;
//! the heap must agree with the reference on every observable: reported
//! minimum, length, removal results, and the final drained order. Handles are
//! tracked so stale-handle errors and payload identity are checked as well.

use proptest::prelude::*;

use meld_heaps::{Heap, HeapError, HeapPolicy, ItemRef};

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    DeleteMin,
    Decrease(usize, i64),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1i64..1000).prop_map(Op::Insert),
        2 => Just(Op::DeleteMin),
        3 => (any::<usize>(), 0i64..1000).prop_map(|(i, d)| Op::Decrease(i, d)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

/// Replays `ops` against both the heap and a reference multiset, checking
/// every observable along the way, then drains the heap and compares the
/// extraction order with the sorted reference.
fn run_differential(policy: HeapPolicy, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut heap: Heap<usize> = Heap::new(policy);
    // Payloads are indices into these parallel vectors: the handle and the
    // key we believe the item currently has.
    let mut handles: Vec<ItemRef> = Vec::new();
    let mut keys: Vec<i64> = Vec::new();
    let mut shadow: Vec<i64> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                let handle = heap.insert(key, handles.len()).unwrap();
                handles.push(handle);
                keys.push(key);
                shadow.push(key);
            }
            Op::DeleteMin => {
                let expected = shadow.iter().min().copied();
                match heap.delete_min() {
                    None => prop_assert!(expected.is_none()),
                    Some((key, idx)) => {
                        prop_assert_eq!(Some(key), expected);
                        prop_assert_eq!(keys[idx], key);
                        prop_assert!(!handles[idx].is_valid());
                        let pos = shadow.iter().position(|&k| k == key).unwrap();
                        shadow.swap_remove(pos);
                    }
                }
            }
            Op::Decrease(i, d) => {
                if handles.is_empty() {
                    continue;
                }
                let i = i % handles.len();
                if !handles[i].is_valid() {
                    prop_assert_eq!(heap.decrease_key(&handles[i], 0), Err(HeapError::StaleItem));
                    continue;
                }
                let key = keys[i];
                let diff = d % (key + 1);
                heap.decrease_key(&handles[i], diff).unwrap();
                let pos = shadow.iter().position(|&k| k == key).unwrap();
                shadow[pos] = key - diff;
                keys[i] = key - diff;
            }
            Op::Delete(i) => {
                if handles.is_empty() {
                    continue;
                }
                let i = i % handles.len();
                if !handles[i].is_valid() {
                    prop_assert!(matches!(heap.delete(&handles[i]), Err(HeapError::StaleItem)));
                    continue;
                }
                let (key, idx) = heap.delete(&handles[i]).unwrap();
                prop_assert_eq!(idx, i);
                prop_assert_eq!(key, keys[i]);
                prop_assert!(!handles[i].is_valid());
                let pos = shadow.iter().position(|&k| k == key).unwrap();
                shadow.swap_remove(pos);
            }
        }

        prop_assert_eq!(heap.len(), shadow.len());
        prop_assert_eq!(
            heap.find_min().map(|(k, _)| k),
            shadow.iter().min().copied()
        );
    }

    // Drain: extraction must be sorted and account for every element.
    let mut drained = Vec::new();
    while let Some((key, _)) = heap.delete_min() {
        drained.push(key);
    }
    shadow.sort_unstable();
    prop_assert_eq!(drained, shadow);
    prop_assert!(heap.is_empty());
    prop_assert_eq!(heap.num_trees(), 0);
    prop_assert_eq!(heap.num_marked_nodes(), 0);
    Ok(())
}

/// Inserting any multiset and draining it yields non-decreasing keys.
fn run_pop_order(policy: HeapPolicy, values: Vec<i64>) -> Result<(), TestCaseError> {
    let mut heap = Heap::new(policy);
    for &v in &values {
        heap.insert(v, v).unwrap();
    }
    let mut last = i64::MIN;
    let mut count = 0;
    while let Some((key, payload)) = heap.delete_min() {
        prop_assert!(key >= last, "popped {} after {}", key, last);
        prop_assert_eq!(key, payload);
        last = key;
        count += 1;
    }
    prop_assert_eq!(count, values.len());
    Ok(())
}

proptest! {
    #[test]
    fn binomial_differential(ops in prop::collection::vec(op_strategy(), 0..120)) {
        run_differential(HeapPolicy::binomial(), ops)?;
    }

    #[test]
    fn lazy_binomial_differential(ops in prop::collection::vec(op_strategy(), 0..120)) {
        run_differential(HeapPolicy::lazy_binomial(), ops)?;
    }

    #[test]
    fn binomial_with_cuts_differential(ops in prop::collection::vec(op_strategy(), 0..120)) {
        run_differential(HeapPolicy::binomial_with_cuts(), ops)?;
    }

    #[test]
    fn fibonacci_differential(ops in prop::collection::vec(op_strategy(), 0..120)) {
        run_differential(HeapPolicy::fibonacci(), ops)?;
    }

    #[test]
    fn binomial_pop_order(values in prop::collection::vec(1i64..500, 1..200)) {
        run_pop_order(HeapPolicy::binomial(), values)?;
    }

    #[test]
    fn lazy_binomial_pop_order(values in prop::collection::vec(1i64..500, 1..200)) {
        run_pop_order(HeapPolicy::lazy_binomial(), values)?;
    }

    #[test]
    fn binomial_with_cuts_pop_order(values in prop::collection::vec(1i64..500, 1..200)) {
        run_pop_order(HeapPolicy::binomial_with_cuts(), values)?;
    }

    #[test]
    fn fibonacci_pop_order(values in prop::collection::vec(1i64..500, 1..200)) {
        run_pop_order(HeapPolicy::fibonacci(), values)?;
    }

    #[test]
    fn melded_heaps_agree_with_concatenation(
        left in prop::collection::vec(1i64..500, 0..60),
        right in prop::collection::vec(1i64..500, 0..60),
    ) {
        for policy in [HeapPolicy::binomial(), HeapPolicy::fibonacci()] {
            let mut a = Heap::new(policy);
            for &v in &left {
                a.insert(v, v).unwrap();
            }
            let mut b = Heap::new(policy);
            for &v in &right {
                b.insert(v, v).unwrap();
            }
            a.meld(b).unwrap();
            prop_assert_eq!(a.len(), left.len() + right.len());

            let mut drained = Vec::new();
            while let Some((key, _)) = a.delete_min() {
                drained.push(key);
            }
            let mut expected: Vec<i64> = left.iter().chain(right.iter()).copied().collect();
            expected.sort_unstable();
            prop_assert_eq!(drained, expected);
        }
    }
}

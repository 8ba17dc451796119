//! Property-based tests checking each engine against a simple model.
//!
//! Every engine must agree with the obvious `std` structure for the same
//! sequence of operations, and keep its internal invariants after each one.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap, VecDeque},
};

use dsengine::{
    Value,
    engines::{
        bst::{BinarySearchTree, TraversalOrder},
        hash_table::{ChainingTable, ProbingTable},
        huffman::Huffman,
        linked_list::DoublyLinkedList,
        priority_queue::{HeapPriorityQueue, SortedPriorityQueue},
        queue::{self, Queue},
        stack::{self, Stack},
        tsp::{City, GeneticParams, brute_force, nearest_neighbor},
    },
};
use proptest::prelude::*;

/// Operations applied to a keyed table: `Some(v)` sets, `None` deletes.
fn table_ops() -> impl Strategy<Value = Vec<(String, Option<i32>)>> {
    prop::collection::vec(("[a-h]{1,2}", prop::option::of(0i32..100)), 0..60)
}

/// Between one and `max` cities on a small integer grid.
fn cities(max: usize) -> impl Strategy<Value = Vec<City>> {
    prop::collection::vec((0i32..50, 0i32..50), 1..=max).prop_map(|pts| {
        pts.into_iter()
            .map(|(x, y)| City::at(f64::from(x), f64::from(y)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A stack pops values in reverse push order and refuses to grow past capacity.
    #[test]
    fn stack_is_lifo(values in prop::collection::vec(any::<i32>(), 0..20)) {
        let mut s = Stack::new();
        let mut model = Vec::new();
        for v in values {
            let pushed = s.push(Value::from(v)).is_ok();
            prop_assert_eq!(pushed, model.len() < stack::CAPACITY);
            if pushed {
                model.push(Value::from(v));
            }
        }
        prop_assert!(s.len() <= stack::CAPACITY);
        while let Some(expected) = model.pop() {
            prop_assert_eq!(s.pop().ok(), Some(expected));
        }
        prop_assert!(s.is_empty());
    }

    /// Interleaved enqueue and dequeue match a `VecDeque`, including wraparound.
    #[test]
    fn queue_is_fifo(ops in prop::collection::vec(prop::option::of(any::<i32>()), 0..80)) {
        let mut q = Queue::new();
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                Some(v) => {
                    let ok = q.enqueue(Value::from(v)).is_ok();
                    prop_assert_eq!(ok, model.len() < queue::CAPACITY);
                    if ok {
                        model.push_back(Value::from(v));
                    }
                }
                None => prop_assert_eq!(q.dequeue().ok(), model.pop_front()),
            }
            prop_assert_eq!(q.items(), model.iter().cloned().collect::<Vec<_>>());
        }
    }

    /// In-order traversal is the sorted set of live keys.
    #[test]
    fn bst_inorder_is_sorted(
        inserts in prop::collection::vec(-50i64..50, 0..40),
        deletes in prop::collection::vec(-50i64..50, 0..20),
    ) {
        let mut tree = BinarySearchTree::new();
        let mut model = BTreeSet::new();
        for v in inserts {
            prop_assert_eq!(tree.insert(v), model.insert(v));
        }
        for v in deletes {
            prop_assert_eq!(tree.delete(v), model.remove(&v));
        }
        prop_assert_eq!(tree.traverse(TraversalOrder::Inorder), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(tree.len(), model.len());
        for v in &model {
            prop_assert!(tree.search(*v).found);
        }
    }

    /// Chaining stores exactly what a `HashMap` stores.
    #[test]
    fn chaining_matches_model(size in 1usize..12, ops in table_ops()) {
        let mut table = ChainingTable::new(size).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut model = HashMap::new();
        for (key, op) in ops {
            match op {
                Some(v) => {
                    prop_assert_eq!(table.set(&key, Value::from(v)), !model.contains_key(&key));
                    model.insert(key, Value::from(v));
                }
                None => prop_assert_eq!(table.delete(&key), model.remove(&key)),
            }
        }
        prop_assert_eq!(table.len(), model.len());
        for (key, v) in &model {
            prop_assert_eq!(table.get(key), Some(v));
        }
    }

    /// Probing agrees with a `HashMap` until full, and deletes never strand a key.
    #[test]
    fn probing_matches_model(size in 1usize..12, ops in table_ops()) {
        let mut table = ProbingTable::new(size).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut model = HashMap::new();
        for (key, op) in ops {
            match op {
                Some(v) => {
                    let full = model.len() == size && !model.contains_key(&key);
                    let result = table.set(&key, Value::from(v));
                    prop_assert_eq!(result.is_err(), full);
                    if !full {
                        model.insert(key, Value::from(v));
                    }
                }
                None => prop_assert_eq!(table.delete(&key), model.remove(&key)),
            }
            for (k, v) in &model {
                prop_assert_eq!(table.get(k), Some(v));
            }
        }
        prop_assert_eq!(table.len(), model.len());
    }

    /// Decoding an encoding gives back the text, and no code prefixes another.
    #[test]
    fn huffman_round_trips(text in "[a-f ]{1,64}") {
        let mut h = Huffman::new();
        let enc = h.encode(&text);
        prop_assert_eq!(h.decode(&enc.encoded).ok(), Some(text.clone()));
        prop_assert!(enc.compressed_size <= enc.original_size);
        let codes: Vec<&String> = enc.codes.values().collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                prop_assert!(!a.starts_with(b.as_str()) && !b.starts_with(a.as_str()));
            }
        }
    }

    /// Both priority queues dequeue the same sequence, highest first and FIFO among equals.
    #[test]
    fn priority_queues_agree(entries in prop::collection::vec((0i32..100, -3i64..3), 0..15)) {
        let mut sorted = SortedPriorityQueue::new();
        let mut heap = HeapPriorityQueue::new();
        for (v, p) in &entries {
            prop_assert!(sorted.enqueue(Value::from(*v), *p).is_ok());
            prop_assert!(heap.enqueue(Value::from(*v), *p).is_ok());
            prop_assert!(heap.is_heap());
        }
        let mut expected: Vec<(usize, &(i32, i64))> = entries.iter().enumerate().collect();
        expected.sort_by_key(|(i, (_, p))| (Reverse(*p), *i));
        for (_, (v, p)) in expected {
            let a = sorted.dequeue().map_err(|e| TestCaseError::fail(e.to_string()))?;
            let b = heap.dequeue().map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.data, Value::from(*v));
            prop_assert_eq!(a.priority, *p);
            prop_assert!(heap.is_heap());
        }
        prop_assert!(sorted.is_empty() && heap.is_empty());
    }

    /// Forward and backward walks of a doubly linked list stay mirror images.
    #[test]
    fn doubly_links_stay_consistent(ops in prop::collection::vec((0u8..3, 0i32..6), 0..40)) {
        let mut list = DoublyLinkedList::new();
        let mut model: VecDeque<Value> = VecDeque::new();
        for (op, v) in ops {
            let v = Value::from(v);
            match op {
                0 => {
                    list.append(v.clone());
                    model.push_back(v);
                }
                1 => {
                    list.prepend(v.clone());
                    model.push_front(v);
                }
                _ => {
                    let at = model.iter().position(|x| *x == v);
                    prop_assert_eq!(list.delete(&v), at.is_some());
                    if let Some(i) = at {
                        model.remove(i);
                    }
                }
            }
            prop_assert!(list.is_consistent());
        }
        let forward: Vec<Value> = model.iter().cloned().collect();
        let mut backward = forward.clone();
        backward.reverse();
        prop_assert_eq!(list.values(), forward);
        prop_assert_eq!(list.values_rev(), backward);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// Exhaustive search is never beaten by the greedy tour.
    #[test]
    fn brute_force_is_optimal(cities in cities(7)) {
        let exact = brute_force(&cities);
        let greedy = nearest_neighbor(&cities);
        prop_assert!(exact.best_distance <= greedy.best_distance + 1e-9);
        prop_assert_eq!(exact.best_route.len(), cities.len());
    }

    /// The genetic search is reproducible and never worse than its greedy seed.
    #[test]
    fn genetic_is_deterministic(cities in cities(10), seed in any::<u64>()) {
        let params = GeneticParams { generations: 30, ..GeneticParams::default() };
        let a = params.run(&cities, seed);
        let b = params.run(&cities, seed);
        prop_assert_eq!(&a, &b);
        prop_assert!(a.best_distance <= nearest_neighbor(&cities).best_distance + 1e-9);
    }
}

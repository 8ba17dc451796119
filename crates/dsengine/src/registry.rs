//! Engine catalogue and the registry of live instances.
//!
//! [`ENGINES`] is the static list of engine kinds with their display names
//! and constraints. [`Registry`] owns every live engine and resolves
//! `(kind, id)` pairs to them. Identifiers are namespaced per kind: a stack
//! `s1` and a queue `s1` are unrelated instances.

use std::{collections::HashMap, fmt, str::FromStr};

use tracing::debug;

use crate::{
    engine::{Instance, Variant},
    engines::{
        bst::BinarySearchTree,
        graph::Graph,
        hash_table::{self, ChainingTable, ProbingTable},
        huffman::Huffman,
        linked_list::{DoublyLinkedList, SinglyLinkedList},
        priority_queue::{self, HeapPriorityQueue, SortedPriorityQueue},
        queue::{self, Queue},
        stack::{self, Stack},
        tsp::{self, Tsp},
    },
    error::{Error, Result},
};

/// Every engine kind the registry can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EngineKind {
    /// Bounded LIFO array.
    Stack,
    /// Bounded FIFO ring buffer.
    Queue,
    /// Singly linked list.
    SinglyList,
    /// Doubly linked list.
    DoublyList,
    /// Sorted-array priority queue.
    PriorityQueue,
    /// Binary max-heap priority queue.
    HeapPriorityQueue,
    /// Unbalanced binary search tree.
    Bst,
    /// Weighted adjacency-list graph.
    Graph,
    /// Hash table with separate chaining.
    ChainingTable,
    /// Hash table with linear probing.
    ProbingTable,
    /// Huffman coder.
    Huffman,
    /// Travelling-salesman solver.
    Tsp,
}

/// Catalogue entry describing one engine kind.
#[derive(Debug, Clone, Copy)]
pub struct EngineEntry {
    /// The kind this entry describes.
    pub kind: EngineKind,
    /// Machine key accepted by [`EngineKind::from_str`].
    pub key: &'static str,
    /// Display name.
    pub display: &'static str,
    /// Constraints worth knowing before use.
    pub constraints: &'static str,
}

/// The engine catalogue, in presentation order.
pub const ENGINES: &[EngineEntry] = &[
    EngineEntry {
        kind: EngineKind::Stack,
        key: "stack",
        display: "Stack",
        constraints: "capacity 10",
    },
    EngineEntry {
        kind: EngineKind::Queue,
        key: "queue",
        display: "Queue",
        constraints: "capacity 10; O(1) dequeue",
    },
    EngineEntry {
        kind: EngineKind::SinglyList,
        key: "singly-list",
        display: "Singly linked list",
        constraints: "unbounded; delete removes the first match",
    },
    EngineEntry {
        kind: EngineKind::DoublyList,
        key: "doubly-list",
        display: "Doubly linked list",
        constraints: "unbounded; delete removes the first match",
    },
    EngineEntry {
        kind: EngineKind::PriorityQueue,
        key: "priority-queue",
        display: "Priority queue",
        constraints: "capacity 15; integer priorities; FIFO among equals",
    },
    EngineEntry {
        kind: EngineKind::HeapPriorityQueue,
        key: "heap-priority-queue",
        display: "Heap priority queue",
        constraints: "capacity 15; integer priorities; FIFO among equals",
    },
    EngineEntry {
        kind: EngineKind::Bst,
        key: "bst",
        display: "Binary search tree",
        constraints: "integer values; no duplicates; not balanced",
    },
    EngineEntry {
        kind: EngineKind::Graph,
        key: "graph",
        display: "Graph",
        constraints: "directed or undirected; non-negative weights",
    },
    EngineEntry {
        kind: EngineKind::ChainingTable,
        key: "hash-chaining",
        display: "Hash table (chaining)",
        constraints: "size 1-100; never resizes",
    },
    EngineEntry {
        kind: EngineKind::ProbingTable,
        key: "hash-linear-probing",
        display: "Hash table (linear probing)",
        constraints: "size 1-100; never resizes; rejects inserts when full",
    },
    EngineEntry {
        kind: EngineKind::Huffman,
        key: "huffman",
        display: "Huffman coding",
        constraints: "decodes with the most recently built tree",
    },
    EngineEntry {
        kind: EngineKind::Tsp,
        key: "tsp",
        display: "Travelling salesman",
        constraints: "brute force up to 8 cities, nearest neighbour beyond",
    },
];

/// Machine keys of every catalogued engine.
pub const ENGINE_NAMES: &[&str] = &[
    "stack",
    "queue",
    "singly-list",
    "doubly-list",
    "priority-queue",
    "heap-priority-queue",
    "bst",
    "graph",
    "hash-chaining",
    "hash-linear-probing",
    "huffman",
    "tsp",
];

impl EngineKind {
    /// The catalogue entry for this kind.
    pub fn entry(self) -> &'static EngineEntry {
        // ENGINES lists every kind exactly once, in declaration order.
        &ENGINES[self as usize]
    }

    /// Machine key, e.g. `"hash-chaining"`.
    pub fn key(self) -> &'static str {
        self.entry().key
    }

    /// Display name, e.g. `"Hash table (chaining)"`.
    pub fn display(self) -> &'static str {
        self.entry().display
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ENGINES
            .iter()
            .find(|e| e.key == s)
            .map(|e| e.kind)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "unknown engine '{s}'. Valid options: {}",
                    ENGINE_NAMES.join(", ")
                ))
            })
    }
}

/// Parameters accepted at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    /// Graph only: whether edges are one-way.
    pub directed: bool,
    /// Hash tables only: number of buckets or slots.
    pub table_size: usize,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            directed: false,
            table_size: hash_table::DEFAULT_SIZE,
        }
    }
}

/// Construct a fresh, empty engine of the requested kind.
pub fn construct(kind: EngineKind, options: &CreateOptions) -> Result<Instance> {
    Ok(match kind {
        EngineKind::Stack => Stack::new().into_instance(),
        EngineKind::Queue => Queue::new().into_instance(),
        EngineKind::SinglyList => SinglyLinkedList::new().into_instance(),
        EngineKind::DoublyList => DoublyLinkedList::new().into_instance(),
        EngineKind::PriorityQueue => SortedPriorityQueue::new().into_instance(),
        EngineKind::HeapPriorityQueue => HeapPriorityQueue::new().into_instance(),
        EngineKind::Bst => BinarySearchTree::new().into_instance(),
        EngineKind::Graph => Graph::new(options.directed).into_instance(),
        EngineKind::ChainingTable => ChainingTable::new(options.table_size)?.into_instance(),
        EngineKind::ProbingTable => ProbingTable::new(options.table_size)?.into_instance(),
        EngineKind::Huffman => Huffman::new().into_instance(),
        EngineKind::Tsp => Tsp::new().into_instance(),
    })
}

/// Fixed limits of the bounded engines, for display.
pub fn limits() -> [(&'static str, usize); 5] {
    [
        ("stack capacity", stack::CAPACITY),
        ("queue capacity", queue::CAPACITY),
        ("priority queue capacity", priority_queue::CAPACITY),
        ("hash table max size", hash_table::MAX_SIZE),
        ("brute-force TSP max cities", tsp::BRUTE_FORCE_LIMIT),
    ]
}

/// Owner of every live engine instance.
#[derive(Debug, Default)]
pub struct Registry {
    /// Live instances keyed by kind and identifier.
    instances: HashMap<(EngineKind, String), Instance>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh instance under `id`, replacing any previous one of the same kind.
    pub fn create(
        &mut self,
        kind: EngineKind,
        id: &str,
        options: &CreateOptions,
    ) -> Result<&mut Instance> {
        let instance = construct(kind, options)?;
        let key = (kind, id.to_string());
        let replaced = self.instances.insert(key.clone(), instance).is_some();
        debug!(%kind, id, replaced, "instance created");
        self.instances
            .get_mut(&key)
            .ok_or_else(|| Error::not_found(kind.display(), id))
    }

    /// Look up an instance.
    pub fn get(&self, kind: EngineKind, id: &str) -> Result<&Instance> {
        self.instances
            .get(&(kind, id.to_string()))
            .ok_or_else(|| Error::not_found(kind.display(), id))
    }

    /// Look up an instance for mutation.
    pub fn get_mut(&mut self, kind: EngineKind, id: &str) -> Result<&mut Instance> {
        self.instances
            .get_mut(&(kind, id.to_string()))
            .ok_or_else(|| Error::not_found(kind.display(), id))
    }

    /// Look up a concrete engine, e.g. `registry.engine::<Stack>("s1")`.
    pub fn engine<E: Variant>(&self, id: &str) -> Result<&E> {
        E::downcast(self.get(E::KIND, id)?).ok_or_else(|| Error::not_found(E::KIND.display(), id))
    }

    /// Look up a concrete engine for mutation.
    pub fn engine_mut<E: Variant>(&mut self, id: &str) -> Result<&mut E> {
        E::downcast_mut(self.get_mut(E::KIND, id)?)
            .ok_or_else(|| Error::not_found(E::KIND.display(), id))
    }

    /// Drop one instance, returning it if it existed.
    pub fn remove(&mut self, kind: EngineKind, id: &str) -> Option<Instance> {
        self.instances.remove(&(kind, id.to_string()))
    }

    /// Drop every instance.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Identifiers of live instances of one kind, sorted.
    pub fn ids(&self, kind: EngineKind) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .instances
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn catalogue_is_consistent() {
        assert_eq!(ENGINES.len(), ENGINE_NAMES.len());
        for (i, entry) in ENGINES.iter().enumerate() {
            assert_eq!(entry.kind as usize, i, "{} out of order", entry.key);
            assert_eq!(ENGINE_NAMES[i], entry.key);
            assert_eq!(entry.key.parse::<EngineKind>().ok(), Some(entry.kind));
        }
        assert!("nope".parse::<EngineKind>().is_err());
    }

    #[test]
    fn create_replaces() -> Result<()> {
        let mut reg = Registry::new();
        reg.create(EngineKind::Stack, "s1", &CreateOptions::default())?;
        reg.engine_mut::<Stack>("s1")?.push(Value::from(1))?;
        assert_eq!(reg.engine::<Stack>("s1")?.len(), 1);

        reg.create(EngineKind::Stack, "s1", &CreateOptions::default())?;
        assert_eq!(reg.engine::<Stack>("s1")?.len(), 0);
        assert_eq!(reg.len(), 1);
        Ok(())
    }

    #[test]
    fn namespaced_by_kind() -> Result<()> {
        let mut reg = Registry::new();
        reg.create(EngineKind::Stack, "x", &CreateOptions::default())?;
        assert!(matches!(
            reg.engine::<Queue>("x"),
            Err(Error::NotFound { .. })
        ));
        reg.create(EngineKind::Queue, "x", &CreateOptions::default())?;
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.ids(EngineKind::Queue), vec!["x"]);
        Ok(())
    }

    #[test]
    fn unknown_id() {
        let reg = Registry::new();
        let err = reg.get(EngineKind::Graph, "g").unwrap_err();
        assert_eq!(err, Error::not_found("Graph", "g"));
    }

    #[test]
    fn bad_table_size_creates_nothing() {
        let mut reg = Registry::new();
        let opts = CreateOptions {
            table_size: 0,
            ..CreateOptions::default()
        };
        assert!(reg.create(EngineKind::ChainingTable, "h", &opts).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_and_clear() -> Result<()> {
        let mut reg = Registry::new();
        reg.create(EngineKind::Bst, "t", &CreateOptions::default())?;
        reg.create(EngineKind::Tsp, "t", &CreateOptions::default())?;
        assert!(reg.remove(EngineKind::Bst, "t").is_some());
        assert!(reg.remove(EngineKind::Bst, "t").is_none());
        reg.clear();
        assert!(reg.is_empty());
        Ok(())
    }
}

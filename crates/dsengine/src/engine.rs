use serde::Serialize;
use serde_json::json;

use crate::{
    engines::{
        bst::BinarySearchTree,
        graph::Graph,
        hash_table::{ChainingTable, ProbingTable},
        huffman::Huffman,
        linked_list::{DoublyLinkedList, SinglyLinkedList},
        priority_queue::{HeapPriorityQueue, SortedPriorityQueue},
        queue::Queue,
        stack::Stack,
        tsp::Tsp,
    },
    registry::EngineKind,
};

/// Behaviour shared by every data-structure engine.
pub trait Engine {
    /// The catalogue entry this engine implements.
    const KIND: EngineKind;

    /// Point-in-time view of the engine's visible state.
    type Snapshot: Serialize;

    /// Capture the current state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Reset to the freshly created state.
    fn clear(&mut self);

    /// Human-readable name, e.g. "Stack".
    fn name(&self) -> &'static str {
        Self::KIND.display()
    }
}

/// Conversion between a concrete engine and the [`Instance`] that owns it.
pub trait Variant: Engine + Sized {
    /// Borrow the engine out of an instance of the matching kind.
    fn downcast(instance: &Instance) -> Option<&Self>;
    /// Mutably borrow the engine out of an instance of the matching kind.
    fn downcast_mut(instance: &mut Instance) -> Option<&mut Self>;
    /// Wrap the engine in an instance.
    fn into_instance(self) -> Instance;
}

/// Defines [`Instance`] together with its dispatch methods and one
/// [`Variant`] impl per engine type.
macro_rules! instances {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// One live engine, tagged by kind.
        #[derive(Debug)]
        pub enum Instance {
            $(
                #[doc = concat!("A [`", stringify!($ty), "`].")]
                $variant($ty),
            )*
        }

        impl Instance {
            /// The kind of engine held.
            pub fn kind(&self) -> EngineKind {
                match self {
                    $(Self::$variant(_) => <$ty as Engine>::KIND,)*
                }
            }

            /// Serialize the held engine's snapshot.
            pub fn snapshot(&self) -> serde_json::Value {
                match self {
                    $(Self::$variant(engine) => json!(engine.snapshot()),)*
                }
            }

            /// Reset the held engine.
            pub fn clear(&mut self) {
                match self {
                    $(Self::$variant(engine) => engine.clear(),)*
                }
            }
        }

        $(
            impl Variant for $ty {
                fn downcast(instance: &Instance) -> Option<&Self> {
                    match instance {
                        Instance::$variant(engine) => Some(engine),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn downcast_mut(instance: &mut Instance) -> Option<&mut Self> {
                    match instance {
                        Instance::$variant(engine) => Some(engine),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn into_instance(self) -> Instance {
                    Instance::$variant(self)
                }
            }
        )*
    };
}

instances! {
    Stack(Stack),
    Queue(Queue),
    SinglyList(SinglyLinkedList),
    DoublyList(DoublyLinkedList),
    PriorityQueue(SortedPriorityQueue),
    HeapPriorityQueue(HeapPriorityQueue),
    Bst(BinarySearchTree),
    Graph(Graph),
    ChainingTable(ChainingTable),
    ProbingTable(ProbingTable),
    Huffman(Huffman),
    Tsp(Tsp),
}

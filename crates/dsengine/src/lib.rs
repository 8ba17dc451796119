//! In-memory data-structure engines behind a request/response surface.
//!
//! Each engine is a small, self-contained implementation of a classical
//! structure or algorithm that reports its full state after every operation.
//! Engines are owned by a [`Registry`] and addressed by kind and identifier;
//! [`api::handle`] maps HTTP-shaped requests onto them.
//!
//! # Engines
//!
//! - Stack and queue (bounded)
//! - Singly and doubly linked lists
//! - Priority queues (sorted array, binary heap)
//! - Binary search tree
//! - Graph with BFS, DFS and Dijkstra
//! - Hash tables (separate chaining, linear probing)
//! - Huffman coding
//! - Travelling salesman (nearest neighbour, brute force, genetic)

/// HTTP-shaped request router.
pub mod api;
/// Index-addressed node storage for linked structures.
pub mod arena;
/// The `Engine` trait and the tagged `Instance` enum.
pub mod engine;
/// Engine implementations.
pub mod engines;
/// Error types used across the crate.
pub mod error;
/// Scalar payload values.
pub mod value;

pub use crate::{
    engine::{Engine, Instance},
    registry::{EngineKind, Registry},
    value::Value,
};

/// Engine catalogue and the registry of live instances.
pub mod registry;

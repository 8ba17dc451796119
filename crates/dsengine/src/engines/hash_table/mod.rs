//! Fixed-size hash tables: separate chaining and linear probing.
//!
//! Both use the same deliberately weak hash, the sum of the key's UTF-16 code
//! units modulo the table size, so collisions are easy to provoke by hand.
//! Neither table ever resizes.

/// Separate-chaining table.
mod chaining;
/// Linear-probing table.
mod probing;

use serde::Serialize;

pub use self::{
    chaining::{ChainingRow, ChainingTable},
    probing::{ProbingRow, ProbingTable},
};
use crate::error::{Error, Result};

/// Table size used when none is requested.
pub const DEFAULT_SIZE: usize = 10;

/// Largest accepted table size.
pub const MAX_SIZE: usize = 100;

/// Home index of `key` in a table of `size` slots.
pub fn hash(key: &str, size: usize) -> usize {
    key.encode_utf16().map(usize::from).sum::<usize>() % size
}

/// Accept a requested table size, or explain why not.
pub fn validate_size(size: usize) -> Result<usize> {
    if (1..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(Error::invalid(format!(
            "table size must be between 1 and {MAX_SIZE}, got {size}"
        )))
    }
}

/// Query view shared by both table kinds.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot<Row> {
    /// One row per bucket or slot.
    pub table: Vec<Row>,
    /// Number of buckets or slots.
    pub size: usize,
    /// Number of stored keys.
    pub count: usize,
    /// `count / size`; may exceed 1 for chaining.
    pub load_factor: f64,
}

impl<Row> TableSnapshot<Row> {
    /// Assemble a snapshot, deriving the load factor.
    fn new(table: Vec<Row>, count: usize) -> Self {
        let size = table.len();
        Self {
            table,
            size,
            count,
            load_factor: count as f64 / size as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_sums_code_units() {
        // 'a' = 97, 'b' = 98
        assert_eq!(hash("ab", 10), 5);
        assert_eq!(hash("ba", 10), 5);
        assert_eq!(hash("", 7), 0);
        // Astral characters count as their two surrogate units.
        assert_eq!(hash("\u{1F600}", 1000), (0xD83D + 0xDE00) % 1000);
    }

    #[test]
    fn sizes() {
        assert!(validate_size(0).is_err());
        assert!(validate_size(MAX_SIZE + 1).is_err());
        assert_eq!(validate_size(1).ok(), Some(1));
        assert_eq!(validate_size(MAX_SIZE).ok(), Some(MAX_SIZE));
    }
}

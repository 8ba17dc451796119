use serde::Serialize;
use smallvec::SmallVec;

use super::{TableSnapshot, hash, validate_size};
use crate::{engine::Engine, error::Result, registry::EngineKind, value::Value};

/// One bucket. Most buckets hold zero to two pairs, so they stay inline.
type Bucket = SmallVec<[(String, Value); 2]>;

/// A hash table resolving collisions with per-bucket chains.
#[derive(Debug, Clone)]
pub struct ChainingTable {
    /// Fixed bucket array.
    buckets: Vec<Bucket>,
    /// Number of stored keys.
    count: usize,
}

/// One bucket as rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainingRow {
    /// Bucket position.
    pub index: usize,
    /// `[key, value]` pairs in insertion order, `null` when empty.
    pub bucket: Option<Vec<(String, Value)>>,
    /// Whether more than one key hashed here.
    pub has_collision: bool,
}

impl ChainingTable {
    /// An empty table with `size` buckets.
    pub fn new(size: usize) -> Result<Self> {
        let size = validate_size(size)?;
        Ok(Self {
            buckets: vec![Bucket::new(); size],
            count: 0,
        })
    }

    /// Insert or update. Returns `true` when the key is new.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        let home = hash(key, self.buckets.len());
        let bucket = &mut self.buckets[home];
        if let Some(pair) = bucket.iter_mut().find(|(k, _)| k == key) {
            pair.1 = value;
            return false;
        }
        bucket.push((key.to_string(), value));
        self.count += 1;
        true
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.buckets[hash(key, self.buckets.len())]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove `key`. Returns the value it held.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        let home = hash(key, self.buckets.len());
        let bucket = &mut self.buckets[home];
        let at = bucket.iter().position(|(k, _)| k == key)?;
        self.count -= 1;
        Some(bucket.remove(at).1)
    }

    /// Number of buckets.
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no key is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Engine for ChainingTable {
    const KIND: EngineKind = EngineKind::ChainingTable;
    type Snapshot = TableSnapshot<ChainingRow>;

    fn snapshot(&self) -> TableSnapshot<ChainingRow> {
        let rows = self
            .buckets
            .iter()
            .enumerate()
            .map(|(index, b)| ChainingRow {
                index,
                bucket: (!b.is_empty()).then(|| b.to_vec()),
                has_collision: b.len() > 1,
            })
            .collect();
        TableSnapshot::new(rows, self.count)
    }

    fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Bucket::clear);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_update_delete() -> Result<()> {
        let mut t = ChainingTable::new(10)?;
        assert!(t.set("ab", Value::from(1)));
        assert!(t.set("ba", Value::from(2)));
        assert!(!t.set("ab", Value::from(3)));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("ab"), Some(&Value::from(3)));
        assert_eq!(t.get("ba"), Some(&Value::from(2)));
        assert_eq!(t.get("zz"), None);

        let snap = t.snapshot();
        assert!(snap.table[5].has_collision);
        assert_eq!(snap.table[0].bucket, None);
        assert!((snap.load_factor - 0.2).abs() < 1e-12);

        assert_eq!(t.delete("ab"), Some(Value::from(3)));
        assert_eq!(t.delete("ab"), None);
        assert_eq!(t.get("ba"), Some(&Value::from(2)));
        assert!(!t.snapshot().table[5].has_collision);
        Ok(())
    }

    #[test]
    fn delete_middle_of_bucket() -> Result<()> {
        let mut t = ChainingTable::new(10)?;
        for (k, v) in [("ab", 1), ("ba", 2), ("\u{c3}", 3)] {
            assert!(t.set(k, Value::from(v)));
        }
        assert_eq!(t.delete("ba"), Some(Value::from(2)));
        assert_eq!(t.len(), 2);
        let bucket = t.snapshot().table[5].bucket.clone().unwrap_or_default();
        assert_eq!(
            bucket,
            vec![
                ("ab".to_string(), Value::from(1)),
                ("\u{c3}".to_string(), Value::from(3)),
            ]
        );
        Ok(())
    }

    #[test]
    fn load_factor_exceeds_one() -> Result<()> {
        let mut t = ChainingTable::new(2)?;
        for k in ["a", "b", "c", "d", "e"] {
            t.set(k, Value::from(k));
        }
        assert_eq!(t.snapshot().load_factor, 2.5);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.size(), 2);
        Ok(())
    }

    #[test]
    fn rejects_bad_size() {
        assert!(ChainingTable::new(0).is_err());
        assert!(ChainingTable::new(101).is_err());
    }
}

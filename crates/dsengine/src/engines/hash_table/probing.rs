use serde::Serialize;

use super::{TableSnapshot, hash, validate_size};
use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
    value::Value,
};

/// An occupied slot.
#[derive(Debug, Clone)]
struct Slot {
    /// Key.
    key: String,
    /// Stored value.
    value: Value,
}

/// Where a linear probe for a key ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key sits in this slot.
    Found(usize),
    /// The key is absent and this is the first empty slot of its run.
    Vacant(usize),
    /// Every slot was visited without finding the key or a gap.
    Full,
}

/// A hash table resolving collisions by probing successive slots.
///
/// Invariant: every key is reachable from its home slot without crossing an
/// empty slot. Deletion restores this by re-inserting the rest of the run.
#[derive(Debug, Clone)]
pub struct ProbingTable {
    /// Fixed slot array.
    slots: Vec<Option<Slot>>,
    /// Number of occupied slots.
    count: usize,
}

/// One slot as rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbingRow {
    /// Slot position.
    pub index: usize,
    /// Stored key.
    pub key: Option<String>,
    /// Stored value.
    pub value: Option<Value>,
    /// Whether the slot is free.
    pub is_empty: bool,
    /// Home slot of the stored key.
    pub original_index: Option<usize>,
}

impl ProbingTable {
    /// An empty table with `size` slots.
    pub fn new(size: usize) -> Result<Self> {
        let size = validate_size(size)?;
        Ok(Self {
            slots: vec![None; size],
            count: 0,
        })
    }

    /// Walk from the home slot of `key`, at most once around the table.
    fn probe(&self, key: &str) -> Probe {
        let size = self.slots.len();
        let home = hash(key, size);
        for step in 0..size {
            let i = (home + step) % size;
            match &self.slots[i] {
                None => return Probe::Vacant(i),
                Some(slot) if slot.key == key => return Probe::Found(i),
                Some(_) => {}
            }
        }
        Probe::Full
    }

    /// Insert or update. Returns `true` when the key is new.
    ///
    /// Updating an existing key always succeeds; a new key is rejected with
    /// [`Error::TableFull`] once every slot is taken.
    pub fn set(&mut self, key: &str, value: Value) -> Result<bool> {
        match self.probe(key) {
            Probe::Found(i) => {
                if let Some(slot) = &mut self.slots[i] {
                    slot.value = value;
                }
                Ok(false)
            }
            Probe::Vacant(i) => {
                self.slots[i] = Some(Slot {
                    key: key.to_string(),
                    value,
                });
                self.count += 1;
                Ok(true)
            }
            Probe::Full => Err(Error::TableFull(self.count)),
        }
    }

    /// Value stored under `key`. Stops at the first empty slot.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.probe(key) {
            Probe::Found(i) => self.slots[i].as_ref().map(|s| &s.value),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Remove `key`, then re-insert every slot of the run that followed it.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        let Probe::Found(i) = self.probe(key) else {
            return None;
        };
        let removed = self.slots[i].take()?;
        self.count -= 1;

        let size = self.slots.len();
        let mut j = (i + 1) % size;
        while j != i {
            let Some(slot) = self.slots[j].take() else {
                break;
            };
            // The run now has a gap at `i`, so a vacant slot always exists.
            match self.probe(&slot.key) {
                Probe::Vacant(k) => self.slots[k] = Some(slot),
                Probe::Found(_) | Probe::Full => self.slots[j] = Some(slot),
            }
            j = (j + 1) % size;
        }
        Some(removed.value)
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
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

impl Engine for ProbingTable {
    const KIND: EngineKind = EngineKind::ProbingTable;
    type Snapshot = TableSnapshot<ProbingRow>;

    fn snapshot(&self) -> TableSnapshot<ProbingRow> {
        let size = self.slots.len();
        let rows = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| ProbingRow {
                index,
                key: slot.as_ref().map(|s| s.key.clone()),
                value: slot.as_ref().map(|s| s.value.clone()),
                is_empty: slot.is_none(),
                original_index: slot.as_ref().map(|s| hash(&s.key, size)),
            })
            .collect();
        TableSnapshot::new(rows, self.count)
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colliding_keys_probe_forward() -> Result<()> {
        // "ab" and "ba" share the code-unit sum 195.
        let mut t = ProbingTable::new(10)?;
        t.set("ab", Value::from(1))?;
        t.set("ba", Value::from(2))?;
        t.set("c", Value::from(3))?; // 99 -> home 9
        let snap = t.snapshot();
        assert_eq!(snap.table[5].key.as_deref(), Some("ab"));
        assert_eq!(snap.table[6].key.as_deref(), Some("ba"));
        assert_eq!(snap.table[6].original_index, Some(5));
        assert_eq!(snap.table[9].key.as_deref(), Some("c"));
        Ok(())
    }

    #[test]
    fn delete_keeps_run_reachable() -> Result<()> {
        // Three keys with home slot 5, then one with home 6 pushed to 8.
        let mut t = ProbingTable::new(10)?;
        for (k, v) in [("ab", 1), ("ba", 2), ("\u{c3}", 3), ("ac", 4)] {
            t.set(k, Value::from(v))?;
        }
        assert_eq!(t.delete("ab"), Some(Value::from(1)));
        assert_eq!(t.get("ab"), None);
        assert_eq!(t.get("ba"), Some(&Value::from(2)));
        assert_eq!(t.get("\u{c3}"), Some(&Value::from(3)));
        assert_eq!(t.get("ac"), Some(&Value::from(4)));
        assert_eq!(t.len(), 3);

        let snap = t.snapshot();
        assert_eq!(snap.table[5].key.as_deref(), Some("ba"));
        assert_eq!(snap.table[6].key.as_deref(), Some("\u{c3}"));
        assert_eq!(snap.table[7].key.as_deref(), Some("ac"));
        assert!(snap.table[8].is_empty);
        Ok(())
    }

    #[test]
    fn delete_middle_of_collision_run() -> Result<()> {
        let mut t = ProbingTable::new(10)?;
        for (k, v) in [("ab", 1), ("ba", 2), ("\u{c3}", 3), ("ac", 4)] {
            t.set(k, Value::from(v))?;
        }
        assert_eq!(t.delete("ba"), Some(Value::from(2)));
        assert_eq!(t.get("ba"), None);
        assert_eq!(t.get("ab"), Some(&Value::from(1)));
        assert_eq!(t.get("\u{c3}"), Some(&Value::from(3)));
        assert_eq!(t.get("ac"), Some(&Value::from(4)));

        let snap = t.snapshot();
        assert_eq!(snap.table[5].key.as_deref(), Some("ab"));
        assert_eq!(snap.table[6].key.as_deref(), Some("\u{c3}"));
        assert_eq!(snap.table[6].original_index, Some(5));
        assert_eq!(snap.table[7].key.as_deref(), Some("ac"));
        assert!(snap.table[8].is_empty);
        Ok(())
    }

    #[test]
    fn delete_from_full_run_keeps_every_key() -> Result<()> {
        // "a", "d" and "g" all home to slot 1 of 3; the run wraps to slot 0.
        let mut t = ProbingTable::new(3)?;
        for k in ["a", "d", "g"] {
            t.set(k, Value::from(k))?;
        }
        assert_eq!(t.delete("d"), Some(Value::from("d")));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("a"), Some(&Value::from("a")));
        assert_eq!(t.get("g"), Some(&Value::from("g")));
        assert!(t.snapshot().table[0].is_empty);

        assert_eq!(t.set("j", Value::from("j")), Ok(true));
        assert_eq!(t.snapshot().table[0].key.as_deref(), Some("j"));
        Ok(())
    }

    #[test]
    fn full_table() -> Result<()> {
        let mut t = ProbingTable::new(3)?;
        for k in ["a", "b", "c"] {
            t.set(k, Value::from(k))?;
        }
        assert_eq!(t.set("d", Value::from(0)), Err(Error::TableFull(3)));
        // Updates still succeed when full.
        assert_eq!(t.set("b", Value::from(9)), Ok(false));
        assert_eq!(t.get("b"), Some(&Value::from(9)));
        assert_eq!(t.get("d"), None);

        t.delete("a");
        assert_eq!(t.set("d", Value::from(0)), Ok(true));
        Ok(())
    }

    #[test]
    fn wraps_past_the_end() -> Result<()> {
        let mut t = ProbingTable::new(10)?;
        // 'c' = 99 and 'm' = 109 both home to slot 9.
        t.set("c", Value::from(1))?;
        t.set("m", Value::from(2))?;
        assert_eq!(t.snapshot().table[0].key.as_deref(), Some("m"));
        t.delete("c");
        assert_eq!(t.snapshot().table[9].key.as_deref(), Some("m"));
        assert!(t.snapshot().table[0].is_empty);
        Ok(())
    }
}

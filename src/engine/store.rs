//! In-memory object stores and engine state
//!
//! Each namespace is an `ObjectStore`: a key-ordered map of JSON rows plus
//! any number of generated secondary indexes. An index is declared by key
//! path; rows whose value at that path is an integer (millisecond epoch
//! timestamps in practice) are entered into the index, other rows are
//! skipped. Index trees live only in memory and are rebuilt from the
//! snapshot on load, never persisted.

use std::collections::BTreeMap;

use serde_json::Value;

use super::key::RecordKey;

/// Composite index key: extracted integer value, then primary key as
/// tiebreaker so equal timestamps keep a deterministic order.
type IndexEntry = (i64, RecordKey);

/// A single named store: rows keyed by `RecordKey` plus generated indexes.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    records: BTreeMap<RecordKey, Value>,
    indexes: BTreeMap<String, BTreeMap<IndexEntry, ()>>,
}

impl ObjectStore {
    /// Creates an empty store with no indexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a generated index over the given key path.
    ///
    /// Returns false if an index with that key path already exists.
    /// Existing rows are back-filled.
    pub fn create_index(&mut self, key_path: &str) -> bool {
        if self.indexes.contains_key(key_path) {
            return false;
        }
        let mut tree = BTreeMap::new();
        for (key, value) in &self.records {
            if let Some(extracted) = extract_index_value(value, key_path) {
                tree.insert((extracted, key.clone()), ());
            }
        }
        self.indexes.insert(key_path.to_string(), tree);
        true
    }

    /// Names of the declared indexes, sorted
    pub fn index_names(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    /// Whether an index with the given key path exists
    pub fn has_index(&self, key_path: &str) -> bool {
        self.indexes.contains_key(key_path)
    }

    /// Point lookup
    pub fn get(&self, key: &RecordKey) -> Option<&Value> {
        self.records.get(key)
    }

    /// Whether a row with the given key exists
    pub fn contains(&self, key: &RecordKey) -> bool {
        self.records.contains_key(key)
    }

    /// Inserts or overwrites the row at `key`, maintaining all indexes
    pub fn put(&mut self, key: RecordKey, value: Value) {
        self.unindex(&key);
        self.index(&key, &value);
        self.records.insert(key, value);
    }

    /// Removes the row at `key`, maintaining all indexes.
    ///
    /// Returns true if a row was removed.
    pub fn delete(&mut self, key: &RecordKey) -> bool {
        self.unindex(key);
        self.records.remove(key).is_some()
    }

    /// Removes every row and empties all index trees
    pub fn clear(&mut self) {
        self.records.clear();
        for tree in self.indexes.values_mut() {
            tree.clear();
        }
    }

    /// Number of rows
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Every row in ascending key order
    pub fn get_all(&self) -> Vec<Value> {
        self.records.values().cloned().collect()
    }

    /// Every (key, row) pair in ascending key order
    pub fn entries(&self) -> impl Iterator<Item = (&RecordKey, &Value)> {
        self.records.iter()
    }

    /// Rows ordered by the named index, optionally bounded (inclusive) on
    /// the extracted value. Returns None if the index does not exist.
    pub fn index_range(
        &self,
        key_path: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Option<Vec<Value>> {
        let tree = self.indexes.get(key_path)?;
        let mut out = Vec::new();
        for ((extracted, key), ()) in tree {
            if let Some(lo) = min {
                if *extracted < lo {
                    continue;
                }
            }
            if let Some(hi) = max {
                if *extracted > hi {
                    break;
                }
            }
            if let Some(value) = self.records.get(key) {
                out.push(value.clone());
            }
        }
        Some(out)
    }

    fn index(&mut self, key: &RecordKey, value: &Value) {
        for (key_path, tree) in &mut self.indexes {
            if let Some(extracted) = extract_index_value(value, key_path) {
                tree.insert((extracted, key.clone()), ());
            }
        }
    }

    fn unindex(&mut self, key: &RecordKey) {
        let Some(old) = self.records.get(key) else {
            return;
        };
        let old = old.clone();
        for (key_path, tree) in &mut self.indexes {
            if let Some(extracted) = extract_index_value(&old, key_path) {
                tree.remove(&(extracted, key.clone()));
            }
        }
    }
}

/// Extracts the integer index value at `key_path` from a row, if present
fn extract_index_value(value: &Value, key_path: &str) -> Option<i64> {
    value.get(key_path).and_then(Value::as_i64)
}

/// Complete engine state: the schema version plus every store.
///
/// The version starts at 0 (no stores) and only moves forward, one upgrade
/// transaction at a time.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Current schema version
    pub version: u32,
    /// Stores by name
    pub stores: BTreeMap<String, ObjectStore>,
}

impl EngineState {
    /// Store names, sorted
    pub fn store_names(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    /// Immutable store lookup
    pub fn store(&self, name: &str) -> Option<&ObjectStore> {
        self.stores.get(name)
    }

    /// Mutable store lookup
    pub fn store_mut(&mut self, name: &str) -> Option<&mut ObjectStore> {
        self.stores.get_mut(name)
    }
}

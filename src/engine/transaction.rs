//! Engine transactions
//!
//! A transaction is scoped to an explicit set of stores and runs in one of
//! two modes. `ReadOnly` transactions hold the state read-lock and may run
//! concurrently with each other; `ReadWrite` transactions hold the write
//! lock and are serialized against every other transaction.
//!
//! `ReadWrite` transactions are atomic: the scoped stores are cloned at
//! begin, and a drop without commit (or a failed snapshot write) restores
//! the clones. Commit is write-through: the full engine state is persisted
//! before the transaction reports success.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::Value;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard};

use super::errors::{EngineError, EngineResult};
use super::key::RecordKey;
use super::snapshot;
use super::store::{EngineState, ObjectStore};

/// Transaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// Concurrent reads, no mutation
    ReadOnly,
    /// Exclusive, atomic, write-through on commit
    ReadWrite,
}

enum Guard {
    Read(OwnedRwLockReadGuard<EngineState>),
    Write(OwnedRwLockWriteGuard<EngineState>),
}

/// A live transaction over one or more stores.
pub struct Transaction {
    mode: TransactionMode,
    scope: BTreeSet<String>,
    guard: Guard,
    path: PathBuf,
    rollback: BTreeMap<String, ObjectStore>,
    finished: bool,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("mode", &self.mode)
            .field("scope", &self.scope)
            .field("path", &self.path)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Transaction {
    pub(super) fn new_read(
        scope: BTreeSet<String>,
        guard: OwnedRwLockReadGuard<EngineState>,
        path: PathBuf,
    ) -> Self {
        Self {
            mode: TransactionMode::ReadOnly,
            scope,
            guard: Guard::Read(guard),
            path,
            rollback: BTreeMap::new(),
            finished: false,
        }
    }

    pub(super) fn new_write(
        scope: BTreeSet<String>,
        guard: OwnedRwLockWriteGuard<EngineState>,
        path: PathBuf,
    ) -> Self {
        let rollback = scope
            .iter()
            .filter_map(|name| guard.store(name).map(|s| (name.clone(), s.clone())))
            .collect();
        Self {
            mode: TransactionMode::ReadWrite,
            scope,
            guard: Guard::Write(guard),
            path,
            rollback,
            finished: false,
        }
    }

    /// This transaction's mode
    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    fn state(&self) -> &EngineState {
        match &self.guard {
            Guard::Read(g) => g,
            Guard::Write(g) => g,
        }
    }

    fn check_scope(&self, store: &str) -> EngineResult<()> {
        if self.scope.contains(store) {
            Ok(())
        } else {
            Err(EngineError::OutOfScope(store.to_string()))
        }
    }

    fn store(&self, name: &str) -> EngineResult<&ObjectStore> {
        self.check_scope(name)?;
        self.state()
            .store(name)
            .ok_or_else(|| EngineError::UnknownStore(name.to_string()))
    }

    fn store_mut(&mut self, name: &str) -> EngineResult<&mut ObjectStore> {
        self.check_scope(name)?;
        let guard = match &mut self.guard {
            Guard::Read(_) => return Err(EngineError::ReadOnlyTransaction),
            Guard::Write(g) => g,
        };
        guard
            .store_mut(name)
            .ok_or_else(|| EngineError::UnknownStore(name.to_string()))
    }

    /// Point lookup
    pub fn get(&self, store: &str, key: &RecordKey) -> EngineResult<Option<Value>> {
        Ok(self.store(store)?.get(key).cloned())
    }

    /// Whether a row exists
    pub fn contains(&self, store: &str, key: &RecordKey) -> EngineResult<bool> {
        Ok(self.store(store)?.contains(key))
    }

    /// Every row in ascending key order
    pub fn get_all(&self, store: &str) -> EngineResult<Vec<Value>> {
        Ok(self.store(store)?.get_all())
    }

    /// Row count
    pub fn count(&self, store: &str) -> EngineResult<usize> {
        Ok(self.store(store)?.count())
    }

    /// Rows ordered by the named generated index, bounded inclusively
    pub fn index_range(
        &self,
        store: &str,
        index: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> EngineResult<Vec<Value>> {
        self.store(store)?
            .index_range(index, min, max)
            .ok_or_else(|| EngineError::UnknownIndex {
                store: store.to_string(),
                index: index.to_string(),
            })
    }

    /// Inserts or overwrites a row
    pub fn put(&mut self, store: &str, key: RecordKey, value: Value) -> EngineResult<()> {
        self.store_mut(store)?.put(key, value);
        Ok(())
    }

    /// Inserts a row, failing if the key is already present
    pub fn add(&mut self, store: &str, key: RecordKey, value: Value) -> EngineResult<()> {
        let target = self.store_mut(store)?;
        if target.contains(&key) {
            return Err(EngineError::KeyExists(key));
        }
        target.put(key, value);
        Ok(())
    }

    /// Removes a row; returns whether one was removed
    pub fn delete(&mut self, store: &str, key: &RecordKey) -> EngineResult<bool> {
        Ok(self.store_mut(store)?.delete(key))
    }

    /// Removes every row from the store
    pub fn clear(&mut self, store: &str) -> EngineResult<()> {
        self.store_mut(store)?.clear();
        Ok(())
    }

    /// Commits the transaction.
    ///
    /// For `ReadWrite`, the engine state is persisted before returning; a
    /// persistence failure rolls the scoped stores back and surfaces the
    /// error, leaving the engine as if the transaction never ran.
    pub fn commit(mut self) -> EngineResult<()> {
        self.finished = true;
        let Guard::Write(guard) = &mut self.guard else {
            return Ok(());
        };
        if let Err(e) = snapshot::write(&self.path, &**guard) {
            let rollback = std::mem::take(&mut self.rollback);
            for (name, store) in rollback {
                guard.stores.insert(name, store);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Discards every change made through this transaction.
    pub fn abort(mut self) {
        self.restore();
        self.finished = true;
    }

    fn restore(&mut self) {
        if let Guard::Write(guard) = &mut self.guard {
            let rollback = std::mem::take(&mut self.rollback);
            for (name, store) in rollback {
                guard.stores.insert(name, store);
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        // dropping an uncommitted ReadWrite transaction aborts it
        if !self.finished && self.mode == TransactionMode::ReadWrite {
            self.restore();
        }
    }
}

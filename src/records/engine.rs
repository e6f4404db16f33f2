//! Record CRUD over namespaces
//!
//! Every operation ensures its namespace exists, then runs as exactly one
//! engine transaction scoped to that namespace: `ReadOnly` for reads,
//! `ReadWrite` for mutations. Nothing here exposes multi-call
//! transactions; one logical operation is one atomic unit.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::engine::{RecordKey, Transaction, TransactionMode};
use crate::model::Namespace;
use crate::registry::NamespaceRegistry;

use super::errors::{RecordError, RecordResult};
use super::record::StoredRecord;

/// CRUD/query surface over the application's namespaces.
pub struct RecordEngine {
    registry: Arc<NamespaceRegistry>,
}

impl RecordEngine {
    /// Wraps a registry
    pub fn new(registry: Arc<NamespaceRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    async fn transaction(&self, ns: Namespace, mode: TransactionMode) -> RecordResult<Transaction> {
        let conn = self.registry.ensure(ns).await?;
        Ok(conn.transaction(&[ns.as_str()], mode).await?)
    }

    /// Inserts a new record. Fails with `DuplicateKey` if the id exists.
    pub async fn create<T: Serialize>(
        &self,
        id: impl Into<RecordKey>,
        data: &T,
        ns: Namespace,
    ) -> RecordResult<StoredRecord> {
        let id = id.into();
        let mut txn = self.transaction(ns, TransactionMode::ReadWrite).await?;

        if txn.contains(ns.as_str(), &id)? {
            return Err(RecordError::DuplicateKey(id));
        }

        let now = Utc::now();
        let record = StoredRecord {
            id: id.clone(),
            data: serde_json::to_value(data)?,
            created_at: now,
            updated_at: now,
        };
        txn.put(ns.as_str(), id, record.to_row()?)?;
        txn.commit()?;
        Ok(record)
    }

    /// Inserts or overwrites a record, preserving `createdAt` when the id
    /// already exists. Idempotent apart from `updatedAt`.
    pub async fn upsert<T: Serialize>(
        &self,
        id: impl Into<RecordKey>,
        data: &T,
        ns: Namespace,
    ) -> RecordResult<StoredRecord> {
        let id = id.into();
        let mut txn = self.transaction(ns, TransactionMode::ReadWrite).await?;

        let now = Utc::now();
        let created_at = match txn.get(ns.as_str(), &id)? {
            Some(row) => StoredRecord::from_row(row)?.created_at,
            None => now,
        };

        let record = StoredRecord {
            id: id.clone(),
            data: serde_json::to_value(data)?,
            created_at,
            updated_at: now,
        };
        txn.put(ns.as_str(), id, record.to_row()?)?;
        txn.commit()?;
        Ok(record)
    }

    /// Reads a full record. Absence is `Ok(None)`, not an error.
    pub async fn read(
        &self,
        id: impl Into<RecordKey>,
        ns: Namespace,
    ) -> RecordResult<Option<StoredRecord>> {
        let id = id.into();
        let txn = self.transaction(ns, TransactionMode::ReadOnly).await?;
        match txn.get(ns.as_str(), &id)? {
            Some(row) => Ok(Some(StoredRecord::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Reads just the payload, decoded into `T`.
    pub async fn read_data<T: DeserializeOwned>(
        &self,
        id: impl Into<RecordKey>,
        ns: Namespace,
    ) -> RecordResult<Option<T>> {
        match self.read(id, ns).await? {
            Some(record) => Ok(Some(record.data_as()?)),
            None => Ok(None),
        }
    }

    /// Shallow-merges a partial JSON object into an existing payload and
    /// bumps `updatedAt`. Fails with `NotFound` if the id does not exist;
    /// never creates.
    pub async fn update(
        &self,
        id: impl Into<RecordKey>,
        partial: Value,
        ns: Namespace,
    ) -> RecordResult<StoredRecord> {
        let Value::Object(partial) = partial else {
            return Err(RecordError::InvalidPartial);
        };
        let id = id.into();
        let mut txn = self.transaction(ns, TransactionMode::ReadWrite).await?;

        let row = txn
            .get(ns.as_str(), &id)?
            .ok_or_else(|| RecordError::NotFound(id.clone()))?;
        let mut record = StoredRecord::from_row(row)?;

        match &mut record.data {
            Value::Object(data) => {
                for (key, value) in partial {
                    data.insert(key, value);
                }
            }
            other => *other = Value::Object(partial),
        }
        record.updated_at = Utc::now();

        txn.put(ns.as_str(), id, record.to_row()?)?;
        txn.commit()?;
        Ok(record)
    }

    /// Every record in the namespace, ascending id order.
    pub async fn read_all(&self, ns: Namespace) -> RecordResult<Vec<StoredRecord>> {
        let txn = self.transaction(ns, TransactionMode::ReadOnly).await?;
        txn.get_all(ns.as_str())?
            .into_iter()
            .map(|row| StoredRecord::from_row(row).map_err(RecordError::from))
            .collect()
    }

    /// Every payload in the namespace, ascending id order.
    pub async fn read_all_data<T: DeserializeOwned>(&self, ns: Namespace) -> RecordResult<Vec<T>> {
        let records = self.read_all(ns).await?;
        records
            .iter()
            .map(|record| record.data_as().map_err(RecordError::from))
            .collect()
    }

    /// Records with `createdAt >= cutoff`, in `createdAt` order, served
    /// from the generated index.
    pub async fn read_since(
        &self,
        ns: Namespace,
        cutoff: DateTime<Utc>,
    ) -> RecordResult<Vec<StoredRecord>> {
        let txn = self.transaction(ns, TransactionMode::ReadOnly).await?;
        txn.index_range(ns.as_str(), "createdAt", Some(cutoff.timestamp_millis()), None)?
            .into_iter()
            .map(|row| StoredRecord::from_row(row).map_err(RecordError::from))
            .collect()
    }

    /// Deletes a record; returns whether one existed.
    pub async fn delete(&self, id: impl Into<RecordKey>, ns: Namespace) -> RecordResult<bool> {
        let id = id.into();
        let mut txn = self.transaction(ns, TransactionMode::ReadWrite).await?;
        let removed = txn.delete(ns.as_str(), &id)?;
        txn.commit()?;
        Ok(removed)
    }

    /// Removes every record in the namespace.
    pub async fn clear(&self, ns: Namespace) -> RecordResult<()> {
        let mut txn = self.transaction(ns, TransactionMode::ReadWrite).await?;
        txn.clear(ns.as_str())?;
        txn.commit()?;
        Ok(())
    }

    /// Number of records in the namespace.
    pub async fn count(&self, ns: Namespace) -> RecordResult<usize> {
        let txn = self.transaction(ns, TransactionMode::ReadOnly).await?;
        Ok(txn.count(ns.as_str())?)
    }

    /// Whether a record with the id exists.
    pub async fn exists(&self, id: impl Into<RecordKey>, ns: Namespace) -> RecordResult<bool> {
        let id = id.into();
        let txn = self.transaction(ns, TransactionMode::ReadOnly).await?;
        Ok(txn.contains(ns.as_str(), &id)?)
    }

    /// Client-side predicate filter over `read_all`.
    pub async fn query<F>(&self, predicate: F, ns: Namespace) -> RecordResult<Vec<StoredRecord>>
    where
        F: Fn(&StoredRecord) -> bool,
    {
        let records = self.read_all(ns).await?;
        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn records(tmp: &TempDir) -> RecordEngine {
        let engine = crate::engine::Engine::open(tmp.path().join("data.aura")).unwrap();
        RecordEngine::new(Arc::new(NamespaceRegistry::new(engine)))
    }

    #[tokio::test]
    async fn test_create_then_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        records
            .create(1, &json!({ "a": 1 }), Namespace::General)
            .await
            .unwrap();
        let back: Value = records
            .read_data(1, Namespace::General)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        records
            .create(1, &json!({ "a": 1 }), Namespace::General)
            .await
            .unwrap();
        let err = records
            .create(1, &json!({ "a": 2 }), Namespace::General)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::DuplicateKey(_)));

        // the original payload survives
        let back: Value = records
            .read_data(1, Namespace::General)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_update_missing_never_creates() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        let err = records
            .update(9, json!({ "a": 1 }), Namespace::General)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
        assert_eq!(records.count(Namespace::General).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_shallow_merges() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        records
            .create(1, &json!({ "a": 1, "b": { "x": 1 } }), Namespace::General)
            .await
            .unwrap();
        records
            .update(1, json!({ "b": { "y": 2 }, "c": 3 }), Namespace::General)
            .await
            .unwrap();

        let back: Value = records
            .read_data(1, Namespace::General)
            .await
            .unwrap()
            .unwrap();
        // top-level keys merge; nested objects are replaced wholesale
        assert_eq!(back, json!({ "a": 1, "b": { "y": 2 }, "c": 3 }));
    }

    #[tokio::test]
    async fn test_update_rejects_non_object_partial() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);
        let err = records
            .update(1, json!([1, 2]), Namespace::General)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidPartial));
    }

    #[tokio::test]
    async fn test_read_all_orders_by_ascending_id() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        for id in [3, 1, 2] {
            records
                .create(id, &json!({ "id": id }), Namespace::Migraines)
                .await
                .unwrap();
        }

        let all = records.read_all(Namespace::Migraines).await.unwrap();
        let ids: Vec<RecordKey> = all.into_iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![RecordKey::from(1), RecordKey::from(2), RecordKey::from(3)]
        );
    }

    #[tokio::test]
    async fn test_delete_exists_count() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        records
            .create("a", &json!({}), Namespace::Weather)
            .await
            .unwrap();
        assert!(records.exists("a", Namespace::Weather).await.unwrap());
        assert_eq!(records.count(Namespace::Weather).await.unwrap(), 1);

        assert!(records.delete("a", Namespace::Weather).await.unwrap());
        assert!(!records.delete("a", Namespace::Weather).await.unwrap());
        assert!(!records.exists("a", Namespace::Weather).await.unwrap());
    }

    #[tokio::test]
    async fn test_query_filters_client_side() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        for id in 1..=5 {
            records
                .create(id, &json!({ "severity": id }), Namespace::Migraines)
                .await
                .unwrap();
        }

        let severe = records
            .query(
                |r| r.data["severity"].as_i64().unwrap_or(0) >= 4,
                Namespace::Migraines,
            )
            .await
            .unwrap();
        assert_eq!(severe.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_empties_namespace_only() {
        let tmp = TempDir::new().unwrap();
        let records = records(&tmp);

        records.create(1, &json!({}), Namespace::Weather).await.unwrap();
        records.create(1, &json!({}), Namespace::Calendar).await.unwrap();

        records.clear(Namespace::Weather).await.unwrap();
        assert_eq!(records.count(Namespace::Weather).await.unwrap(), 0);
        assert_eq!(records.count(Namespace::Calendar).await.unwrap(), 1);
    }
}

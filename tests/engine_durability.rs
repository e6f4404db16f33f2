//! Engine Durability Tests
//!
//! Write-through durability invariants:
//! - every committed ReadWrite transaction survives a reopen
//! - uncommitted transactions leave no trace
//! - a snapshot that fails checksum refuses to open
//! - generated index order survives a reopen

use serde_json::json;
use std::fs;
use tempfile::TempDir;

use auradb::engine::{Engine, EngineError, RecordKey, TransactionMode};

fn data_path(tmp: &TempDir) -> std::path::PathBuf {
    tmp.path().join("data.aura")
}

async fn engine_with_store(tmp: &TempDir) -> Engine {
    let engine = Engine::open(data_path(tmp)).unwrap();
    let conn = engine
        .connect_with_upgrade(1, |txn| {
            txn.create_store("general")?;
            txn.create_index("general", "createdAt")?;
            txn.create_index("general", "updatedAt")?;
            Ok(())
        })
        .await
        .unwrap();
    conn.close();
    engine
}

fn row(id: i64, created_at: i64) -> serde_json::Value {
    json!({ "id": id, "data": {}, "createdAt": created_at, "updatedAt": created_at })
}

// =============================================================================
// Write-Through Durability
// =============================================================================

/// Committed writes survive a full engine reopen.
#[tokio::test]
async fn test_commit_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let engine = engine_with_store(&tmp).await;
        let conn = engine.connect().await.unwrap();
        let mut txn = conn
            .transaction(&["general"], TransactionMode::ReadWrite)
            .await
            .unwrap();
        for id in 1..=3 {
            txn.put("general", RecordKey::from(id), row(id, id * 100))
                .unwrap();
        }
        txn.commit().unwrap();
    }

    let engine = Engine::open(data_path(&tmp)).unwrap();
    assert_eq!(engine.current_version().await, 1);

    let conn = engine.connect().await.unwrap();
    let txn = conn
        .transaction(&["general"], TransactionMode::ReadOnly)
        .await
        .unwrap();
    assert_eq!(txn.count("general").unwrap(), 3);
    assert!(txn.get("general", &RecordKey::from(2)).unwrap().is_some());
}

/// A transaction dropped without commit leaves nothing behind, in memory
/// or on disk.
#[tokio::test]
async fn test_uncommitted_writes_leave_no_trace() {
    let tmp = TempDir::new().unwrap();
    {
        let engine = engine_with_store(&tmp).await;
        let conn = engine.connect().await.unwrap();
        {
            let mut txn = conn
                .transaction(&["general"], TransactionMode::ReadWrite)
                .await
                .unwrap();
            txn.put("general", RecordKey::from(1), row(1, 100)).unwrap();
        }
    }

    let engine = Engine::open(data_path(&tmp)).unwrap();
    let conn = engine.connect().await.unwrap();
    let txn = conn
        .transaction(&["general"], TransactionMode::ReadOnly)
        .await
        .unwrap();
    assert_eq!(txn.count("general").unwrap(), 0);
}

/// An explicit abort behaves the same as a drop.
#[tokio::test]
async fn test_abort_discards_changes() {
    let tmp = TempDir::new().unwrap();
    let engine = engine_with_store(&tmp).await;
    let conn = engine.connect().await.unwrap();

    let mut txn = conn
        .transaction(&["general"], TransactionMode::ReadWrite)
        .await
        .unwrap();
    txn.put("general", RecordKey::from(1), row(1, 100)).unwrap();
    txn.clear("general").unwrap();
    txn.abort();

    let txn = conn
        .transaction(&["general"], TransactionMode::ReadOnly)
        .await
        .unwrap();
    assert_eq!(txn.count("general").unwrap(), 0);
}

// =============================================================================
// Corruption Policy
// =============================================================================

/// A flipped byte anywhere in the snapshot refuses to open.
#[tokio::test]
async fn test_corrupted_snapshot_refuses_open() {
    let tmp = TempDir::new().unwrap();
    {
        let engine = engine_with_store(&tmp).await;
        let conn = engine.connect().await.unwrap();
        let mut txn = conn
            .transaction(&["general"], TransactionMode::ReadWrite)
            .await
            .unwrap();
        txn.put("general", RecordKey::from(1), row(1, 100)).unwrap();
        txn.commit().unwrap();
    }

    let path = data_path(&tmp);
    let mut bytes = fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let err = Engine::open(&path).unwrap_err();
    assert!(matches!(err, EngineError::Corruption(_)));
}

// =============================================================================
// Index Determinism
// =============================================================================

/// createdAt index order is identical before and after a reopen.
#[tokio::test]
async fn test_index_order_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let before: Vec<serde_json::Value>;
    {
        let engine = engine_with_store(&tmp).await;
        let conn = engine.connect().await.unwrap();
        let mut txn = conn
            .transaction(&["general"], TransactionMode::ReadWrite)
            .await
            .unwrap();
        // inserted out of timestamp order
        txn.put("general", RecordKey::from(1), row(1, 300)).unwrap();
        txn.put("general", RecordKey::from(2), row(2, 100)).unwrap();
        txn.put("general", RecordKey::from(3), row(3, 200)).unwrap();
        txn.commit().unwrap();

        let txn = conn
            .transaction(&["general"], TransactionMode::ReadOnly)
            .await
            .unwrap();
        before = txn.index_range("general", "createdAt", None, None).unwrap();
    }

    let engine = Engine::open(data_path(&tmp)).unwrap();
    let conn = engine.connect().await.unwrap();
    let txn = conn
        .transaction(&["general"], TransactionMode::ReadOnly)
        .await
        .unwrap();
    let after = txn.index_range("general", "createdAt", None, None).unwrap();

    assert_eq!(before, after);
    let stamps: Vec<i64> = after.iter().map(|v| v["createdAt"].as_i64().unwrap()).collect();
    assert_eq!(stamps, vec![100, 200, 300]);
}

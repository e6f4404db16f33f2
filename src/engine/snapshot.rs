//! Snapshot persistence for the engine state
//!
//! The whole engine state (version + stores) is persisted as one framed,
//! checksummed snapshot file:
//!
//! ```text
//! +------------------+
//! | Magic            | (8 bytes: "AURADB01")
//! +------------------+
//! | Payload Length   | (u32 LE)
//! +------------------+
//! | Payload          | (JSON document)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 of the payload)
//! +------------------+
//! ```
//!
//! Writes are atomic: temp file in the same directory, fsync, rename over
//! the live file, fsync of the parent directory. A checksum or framing
//! failure on load halts the open (the state is never partially loaded).
//!
//! Index trees are not part of the payload; they are rebuilt from the rows
//! on load.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{EngineError, EngineResult};
use super::key::RecordKey;
use super::store::{EngineState, ObjectStore};

const MAGIC: &[u8; 8] = b"AURADB01";
const HEADER_LEN: usize = 8 + 4;
const FOOTER_LEN: usize = 4;

/// On-disk shape of one store: declared indexes plus rows as (key, value)
/// pairs. Rows are written in key order for deterministic output.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDoc {
    name: String,
    indexes: Vec<String>,
    records: Vec<(RecordKey, Value)>,
}

/// On-disk shape of the full snapshot payload
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDoc {
    version: u32,
    stores: Vec<StoreDoc>,
}

/// Computes the CRC32 checksum over the payload bytes
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Serializes and durably writes the engine state to `path`.
pub fn write(path: &Path, state: &EngineState) -> EngineResult<()> {
    let doc = SnapshotDoc {
        version: state.version,
        stores: state
            .stores
            .iter()
            .map(|(name, store)| StoreDoc {
                name: name.clone(),
                indexes: store.index_names(),
                records: store
                    .entries()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect(),
    };

    let payload = serde_json::to_vec(&doc)?;
    let checksum = compute_checksum(&payload);

    let mut framed = Vec::with_capacity(HEADER_LEN + payload.len() + FOOTER_LEN);
    framed.extend_from_slice(MAGIC);
    framed.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    framed.extend_from_slice(&payload);
    framed.extend_from_slice(&checksum.to_le_bytes());

    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        tmp.write_all(&framed)?;
        tmp.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    // fsync the parent directory after the rename
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            File::open(parent)?.sync_all()?;
        }
    }

    Ok(())
}

/// Loads the engine state from `path`.
///
/// Returns `Ok(None)` if no snapshot file exists yet. Any framing or
/// checksum failure is `EngineError::Corruption`.
pub fn read(path: &Path) -> EngineResult<Option<EngineState>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    if data.len() < HEADER_LEN + FOOTER_LEN {
        return Err(EngineError::Corruption(format!(
            "snapshot truncated: {} bytes",
            data.len()
        )));
    }
    if &data[0..8] != MAGIC {
        return Err(EngineError::Corruption("bad magic".into()));
    }

    let payload_len =
        u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
    if data.len() != HEADER_LEN + payload_len + FOOTER_LEN {
        return Err(EngineError::Corruption(format!(
            "length mismatch: header says {} payload bytes, file has {}",
            payload_len,
            data.len() - HEADER_LEN - FOOTER_LEN
        )));
    }

    let payload = &data[HEADER_LEN..HEADER_LEN + payload_len];
    let footer = &data[HEADER_LEN + payload_len..];
    let stored_checksum = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
    let computed_checksum = compute_checksum(payload);
    if stored_checksum != computed_checksum {
        return Err(EngineError::Corruption(format!(
            "checksum mismatch: computed {:08x}, stored {:08x}",
            computed_checksum, stored_checksum
        )));
    }

    let doc: SnapshotDoc = serde_json::from_slice(payload)
        .map_err(|e| EngineError::Corruption(format!("payload parse failed: {}", e)))?;

    let mut state = EngineState {
        version: doc.version,
        ..Default::default()
    };
    for store_doc in doc.stores {
        let mut store = ObjectStore::new();
        for index in &store_doc.indexes {
            store.create_index(index);
        }
        for (key, value) in store_doc.records {
            store.put(key, value);
        }
        state.stores.insert(store_doc.name, store);
    }

    Ok(Some(state))
}

//! Namespace registry
//!
//! Guarantees a namespace exists before any record operation touches it,
//! spending the minimum number of schema-version upgrades. The first
//! `ensure` call discovers which of the application's namespaces are
//! missing and creates all of them (each with its `createdAt` and
//! `updatedAt` indexes) inside one upgrade transaction.
//!
//! One async mutex guards the whole `Closed -> Open` / `Open -> Upgrading`
//! state machine, so concurrent `ensure` calls for different namespaces
//! coalesce into a single physical upgrade instead of racing to bump the
//! version. A failed or abandoned upgrade resets the registry to `Closed`;
//! the next call retries from scratch.

use std::collections::BTreeSet;

use tokio::sync::Mutex;

use crate::engine::{Connection, Engine};
use crate::model::Namespace;
use crate::observability::{Logger, Severity};

use super::errors::RegistryResult;

/// Key paths indexed on every namespace
const INDEXED_FIELDS: [&str; 2] = ["createdAt", "updatedAt"];

enum RegistryState {
    Closed,
    Open {
        conn: Connection,
        known: BTreeSet<String>,
    },
}

/// Tracks the namespaces the application needs and lazily creates the
/// missing ones.
pub struct NamespaceRegistry {
    engine: Engine,
    state: Mutex<RegistryState>,
}

impl NamespaceRegistry {
    /// Wraps an engine. No connection is opened until the first `ensure`.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            state: Mutex::new(RegistryState::Closed),
        }
    }

    /// The underlying engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns an open connection with `ns` guaranteed to exist.
    ///
    /// No-ops when the namespace is already known to the open handle.
    pub async fn ensure(&self, ns: Namespace) -> RegistryResult<Connection> {
        let mut state = self.state.lock().await;

        if let RegistryState::Open { conn, known } = &*state {
            if conn.is_open() && known.contains(ns.as_str()) {
                return Ok(conn.clone());
            }
        }

        let existing: BTreeSet<String> = self.engine.store_names().await.into_iter().collect();
        let missing: Vec<&str> = Namespace::ALL
            .iter()
            .map(Namespace::as_str)
            .filter(|name| !existing.contains(*name))
            .collect();

        let conn = if missing.is_empty() {
            self.engine.connect().await?
        } else {
            // the upgrade needs every other handle closed, ours included
            if let RegistryState::Open { conn, .. } = &*state {
                conn.close();
            }
            *state = RegistryState::Closed;

            let existing_version = self.engine.current_version().await;
            let conn = self
                .engine
                .connect_with_upgrade(existing_version + 1, |txn| {
                    for name in &missing {
                        txn.create_store(name)?;
                        for field in INDEXED_FIELDS {
                            txn.create_index(name, field)?;
                        }
                    }
                    Ok(())
                })
                .await?;

            Logger::log(
                Severity::Info,
                "namespaces_created",
                &[
                    ("count", &missing.len().to_string()),
                    ("version", &(existing_version + 1).to_string()),
                ],
            );
            conn
        };

        let known: BTreeSet<String> = Namespace::ALL
            .iter()
            .map(|n| n.as_str().to_string())
            .collect();
        let handle = conn.clone();
        *state = RegistryState::Open { conn, known };
        Ok(handle)
    }

    /// Closes the registry's connection, returning to the `Closed` state.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if let RegistryState::Open { conn, .. } = &*state {
            conn.close();
        }
        *state = RegistryState::Closed;
    }
}

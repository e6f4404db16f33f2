//! Engine handle, connections, and upgrade transactions
//!
//! `Engine::open` binds an engine to a snapshot file and loads whatever
//! state is on disk (version 0, no stores, when the file does not exist).
//! The engine is an explicit value with no global registry behind it;
//! applications construct one, share it via cheap clones, and tests run
//! any number of isolated engines side by side.
//!
//! Schema changes only happen inside an upgrade transaction, which is
//! exclusive: it requires a version strictly greater than the current one
//! and no other open connections. One upgrade runs at a time.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex as AsyncMutex, RwLock};
use uuid::Uuid;

use crate::observability::{Logger, Severity};

use super::errors::{EngineError, EngineResult};
use super::snapshot;
use super::store::EngineState;
use super::transaction::{Transaction, TransactionMode};

struct Shared {
    path: PathBuf,
    state: Arc<RwLock<EngineState>>,
    connections: StdMutex<HashSet<Uuid>>,
    upgrade_gate: AsyncMutex<()>,
}

/// Handle to one embedded store file. Cheap to clone; all clones share
/// state, the connection table, and the upgrade gate.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("path", &self.shared.path)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Opens (or creates) the engine backing file at `path`.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match snapshot::read(&path) {
            Ok(Some(state)) => state,
            Ok(None) => EngineState::default(),
            Err(e @ EngineError::Corruption(_)) => return Err(e),
            Err(e) => return Err(EngineError::OpenFailed(e.to_string())),
        };

        Logger::log(
            Severity::Info,
            "engine_opened",
            &[
                ("path", &path.display().to_string()),
                ("version", &state.version.to_string()),
                ("stores", &state.stores.len().to_string()),
            ],
        );

        Ok(Self {
            shared: Arc::new(Shared {
                path,
                state: Arc::new(RwLock::new(state)),
                connections: StdMutex::new(HashSet::new()),
                upgrade_gate: AsyncMutex::new(()),
            }),
        })
    }

    /// The schema version currently on disk
    pub async fn current_version(&self) -> u32 {
        self.shared.state.read().await.version
    }

    /// Names of every existing store, sorted
    pub async fn store_names(&self) -> Vec<String> {
        self.shared.state.read().await.store_names()
    }

    /// Number of open connections
    pub fn connection_count(&self) -> usize {
        self.shared.connections.lock().unwrap().len()
    }

    /// Opens a connection at the current version, with no upgrade.
    pub async fn connect(&self) -> EngineResult<Connection> {
        Ok(self.register())
    }

    /// Opens a connection at `version`, running `upgrade` first when
    /// `version` is greater than the version on disk.
    ///
    /// The upgrade is all-or-nothing: an error from the callback (or from
    /// persisting the upgraded snapshot) leaves the state and version
    /// untouched. Fails with `Blocked` while any other connection is open.
    pub async fn connect_with_upgrade<F>(
        &self,
        version: u32,
        upgrade: F,
    ) -> EngineResult<Connection>
    where
        F: FnOnce(&mut UpgradeTransaction<'_>) -> EngineResult<()>,
    {
        let _gate = self.shared.upgrade_gate.lock().await;

        let existing = self.shared.state.read().await.version;
        if version < existing {
            return Err(EngineError::VersionTooOld {
                requested: version,
                existing,
            });
        }
        if version == existing {
            return Ok(self.register());
        }

        let open_connections = self.connection_count();
        if open_connections > 0 {
            return Err(EngineError::Blocked(open_connections));
        }

        let mut state = self.shared.state.write().await;
        let backup = state.clone();

        let mut txn = UpgradeTransaction { state: &mut *state };
        if let Err(e) = upgrade(&mut txn) {
            *state = backup;
            return Err(e);
        }
        state.version = version;

        if let Err(e) = snapshot::write(&self.shared.path, &state) {
            *state = backup;
            return Err(e);
        }

        Logger::log(
            Severity::Info,
            "engine_upgraded",
            &[
                ("from_version", &existing.to_string()),
                ("to_version", &version.to_string()),
                ("stores", &state.stores.len().to_string()),
            ],
        );

        drop(state);
        Ok(self.register())
    }

    fn register(&self) -> Connection {
        let id = Uuid::new_v4();
        self.shared.connections.lock().unwrap().insert(id);
        Connection {
            inner: Arc::new(ConnInner {
                id,
                shared: Arc::clone(&self.shared),
                open: AtomicBool::new(true),
            }),
        }
    }
}

struct ConnInner {
    id: Uuid,
    shared: Arc<Shared>,
    open: AtomicBool,
}

impl ConnInner {
    fn deregister(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            self.shared.connections.lock().unwrap().remove(&self.id);
        }
    }
}

impl Drop for ConnInner {
    fn drop(&mut self) {
        self.deregister();
    }
}

/// An open connection to the engine. Clones share the same connection
/// identity; closing any clone closes them all.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnInner>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.inner.id)
            .field("open", &self.inner.open.load(Ordering::SeqCst))
            .finish()
    }
}

impl Connection {
    /// Connection identifier
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::SeqCst)
    }

    /// Closes the connection. Idempotent.
    pub fn close(&self) {
        self.inner.deregister();
    }

    /// Begins a transaction scoped to the given stores.
    ///
    /// Every scoped store must exist at the current version.
    pub async fn transaction(
        &self,
        scope: &[&str],
        mode: TransactionMode,
    ) -> EngineResult<Transaction> {
        if !self.is_open() {
            return Err(EngineError::ConnectionClosed);
        }

        let scope: BTreeSet<String> = scope.iter().map(|s| s.to_string()).collect();
        let state = Arc::clone(&self.inner.shared.state);
        let path = self.inner.shared.path.clone();

        match mode {
            TransactionMode::ReadOnly => {
                let guard = state.read_owned().await;
                for name in &scope {
                    if guard.store(name).is_none() {
                        return Err(EngineError::UnknownStore(name.clone()));
                    }
                }
                Ok(Transaction::new_read(scope, guard, path))
            }
            TransactionMode::ReadWrite => {
                let guard = state.write_owned().await;
                for name in &scope {
                    if guard.store(name).is_none() {
                        return Err(EngineError::UnknownStore(name.clone()));
                    }
                }
                Ok(Transaction::new_write(scope, guard, path))
            }
        }
    }
}

/// Schema-change surface available inside an upgrade callback.
pub struct UpgradeTransaction<'a> {
    state: &'a mut EngineState,
}

impl UpgradeTransaction<'_> {
    /// Creates a new, empty store.
    pub fn create_store(&mut self, name: &str) -> EngineResult<()> {
        if self.state.stores.contains_key(name) {
            return Err(EngineError::StoreExists(name.to_string()));
        }
        self.state.stores.insert(name.to_string(), Default::default());
        Ok(())
    }

    /// Declares a generated index on an existing store.
    pub fn create_index(&mut self, store: &str, key_path: &str) -> EngineResult<()> {
        let target = self
            .state
            .store_mut(store)
            .ok_or_else(|| EngineError::UnknownStore(store.to_string()))?;
        if !target.create_index(key_path) {
            return Err(EngineError::IndexExists {
                store: store.to_string(),
                index: key_path.to_string(),
            });
        }
        Ok(())
    }

    /// Removes a store and everything in it.
    pub fn delete_store(&mut self, name: &str) -> EngineResult<()> {
        self.state
            .stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::UnknownStore(name.to_string()))
    }

    /// Names of every store, sorted
    pub fn store_names(&self) -> Vec<String> {
        self.state.store_names()
    }
}

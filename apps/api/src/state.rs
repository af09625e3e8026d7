//! # Application State
//!
//! What every handler can reach, cloned per request by axum.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppState (Clone)                                                      │
//! │  ├── services: Arc<Services>     domain services, one per entity       │
//! │  └── store: Store                kept for health checks and shutdown   │
//! │        ├── Sqlite(Database)      SqlitePool inside (thread-safe)       │
//! │        └── Memory(MemoryStore)   Arc<RwLock<Tables>> inside            │
//! │                                                                         │
//! │  Both store handles are Send + Sync; services hold Arc<dyn Repo>       │
//! │  clones of the same handle.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;
use wareflow_db::{Database, DbError, MemoryStore, Repositories, SeedSet};

use crate::config::{AppConfig, StorageKind};
use crate::services::Services;

/// The store behind the repositories.
#[derive(Debug, Clone)]
pub enum Store {
    /// Already populated by the `seed` binary; startup never imports JSON.
    Sqlite(Database),
    /// Loaded from the JSON seed directory at startup.
    Memory(MemoryStore),
}

impl Store {
    /// Opens the store selected by `config`.
    ///
    /// - sqlite: connects and migrates `database_path`; seed files are left
    ///   to the `seed` binary
    /// - memory: loads every seed file under `seed_dir`
    pub async fn open(config: &AppConfig) -> Result<Self, DbError> {
        match config.storage {
            StorageKind::Sqlite => {
                Ok(Store::Sqlite(Database::new(config.db_config()).await?))
            }
            StorageKind::Memory => {
                let seed = SeedSet::load(&config.seed_dir)?;
                info!(rows = seed.total_rows(), "In-memory store seeded");
                Ok(Store::Memory(MemoryStore::from_seed(seed)))
            }
        }
    }

    pub fn repositories(&self) -> Repositories {
        match self {
            Store::Sqlite(db) => db.repositories(),
            Store::Memory(store) => Repositories::memory(store),
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Store::Sqlite(_) => StorageKind::Sqlite,
            Store::Memory(_) => StorageKind::Memory,
        }
    }

    pub async fn health_check(&self) -> bool {
        match self {
            Store::Sqlite(db) => db.health_check().await,
            Store::Memory(_) => true,
        }
    }

    pub async fn close(&self) {
        if let Store::Sqlite(db) = self {
            db.close().await;
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub store: Store,
}

impl AppState {
    /// Wires the services to `store`.
    pub fn new(store: Store) -> Self {
        let services = Services::new(store.repositories());
        AppState {
            services: Arc::new(services),
            store,
        }
    }
}

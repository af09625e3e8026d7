//! # wareflow-db: Store Adapter for Wareflow
//!
//! Persistence for the warehouse domain. One set of repository traits, two
//! interchangeable stores.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wareflow Data Flow                               │
//! │                                                                         │
//! │  HTTP handler → domain service                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   wareflow-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (13 traits)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ sqlite::*     │    │ 001_initial  │  │   │
//! │  │   │ import_seed   │    │ memory::*     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           ▲                    ▲                               │   │
//! │  │           └────── SeedSet ─────┘   (db/*.json)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file  or  Arc<RwLock<Tables>>                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, seed import
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and driver error classification
//! - [`repository`] - Repository traits and the SQLite implementation
//! - [`memory`] - Map-backed implementation of the same traits
//! - [`seed`] - JSON seed file loading
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wareflow_db::{Database, DbConfig, SeedSet};
//!
//! let db = Database::new(DbConfig::new("wareflow.db")).await?;
//! db.import_seed(&SeedSet::load("db")?).await?;
//!
//! let repos = db.repositories();
//! let report = repos.buyers.report_purchase_orders(None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::{MemoryRepository, MemoryStore};
pub use pool::{Database, DbConfig};
pub use seed::SeedSet;

// Repository re-exports for convenience
pub use repository::sqlite::SqliteRepository;
pub use repository::{
    BuyerRepository, CarrierRepository, EmployeeRepository, InboundOrderRepository,
    LocalityRepository, ProductBatchRepository, ProductRecordRepository, ProductRepository,
    ProductTypeRepository, PurchaseOrderRepository, Repositories, Repository, SectionRepository,
    SellerRepository, WarehouseRepository,
};

//! # Repository Module
//!
//! Repository contracts for every Wareflow entity, and the bundle that wires
//! them to a concrete store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Contract, Two Stores                             │
//! │                                                                         │
//! │  Domain service                                                        │
//! │       │                                                                 │
//! │       │  repos.sellers.find_by_cid(123)                                │
//! │       ▼                                                                 │
//! │  Arc<dyn SellerRepository>                                             │
//! │  ├── find_all / find_by_id / save / update / delete   (Repository<T>)  │
//! │  └── find_by_cid                                     (entity-specific) │
//! │       │                                                                 │
//! │       ├──────────────────────────┐                                      │
//! │       ▼                          ▼                                      │
//! │  SqliteRepository<Seller>   MemoryRepository<Seller>                   │
//! │  (sqlx, production)         (RwLock'd maps, seed files, tests)         │
//! │                                                                         │
//! │  Both must return identical results, including report rows.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contracts
//! - `find_by_id` → entity or `NotFound`
//! - `save` → assigned id; `UniqueViolation`, `InvalidReference` or a fault
//! - `update` → `NotFound` when no row matched; rewriting identical values is fine
//! - `delete` → `NotFound` when absent, `ReferencedByChild` when children remain
//! - reports → empty `Vec` on an empty base set, `NotFound` for an absent id,
//!   ordered by grouping id ascending

use std::sync::Arc;

use async_trait::async_trait;
use wareflow_core::{
    Buyer, BuyerPurchaseOrdersReport, Carrier, Employee, EmployeeInboundOrdersReport, Entity,
    InboundOrder, Locality, LocalityCarriersReport, LocalitySellersReport, Product, ProductBatch,
    ProductRecord, ProductRecordsReport, ProductType, PurchaseOrder, Section,
    SectionProductsReport, Seller, Warehouse,
};

use crate::error::DbResult;

pub mod sqlite;

// =============================================================================
// Base Contract
// =============================================================================

/// CRUD operations shared by every entity.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All rows, ordered by id.
    async fn find_all(&self) -> DbResult<Vec<T>>;

    async fn find_by_id(&self, id: i64) -> DbResult<T>;

    /// Inserts the entity and returns the id the store assigned.
    ///
    /// The `id` carried by `entity` is ignored.
    async fn save(&self, entity: &T) -> DbResult<i64>;

    /// Rewrites every column of the row with `entity.id()`.
    async fn update(&self, entity: &T) -> DbResult<()>;

    async fn delete(&self, id: i64) -> DbResult<()>;
}

// =============================================================================
// Entity Contracts
// =============================================================================

#[async_trait]
pub trait SellerRepository: Repository<Seller> {
    async fn find_by_cid(&self, cid: i64) -> DbResult<Option<Seller>>;
}

#[async_trait]
pub trait BuyerRepository: Repository<Buyer> {
    async fn find_by_card_number_id(&self, card_number_id: &str) -> DbResult<Option<Buyer>>;

    /// Purchase orders per buyer (left join: zero-order buyers included).
    async fn report_purchase_orders(
        &self,
        id: Option<i64>,
    ) -> DbResult<Vec<BuyerPurchaseOrdersReport>>;
}

#[async_trait]
pub trait EmployeeRepository: Repository<Employee> {
    async fn find_by_card_number_id(&self, card_number_id: &str) -> DbResult<Option<Employee>>;

    /// Inbound orders per employee (inner join for the list; by id, zero allowed).
    async fn report_inbound_orders(
        &self,
        id: Option<i64>,
    ) -> DbResult<Vec<EmployeeInboundOrdersReport>>;
}

#[async_trait]
pub trait WarehouseRepository: Repository<Warehouse> {
    async fn find_by_code(&self, warehouse_code: &str) -> DbResult<Option<Warehouse>>;
}

#[async_trait]
pub trait SectionRepository: Repository<Section> {
    async fn find_by_section_number(&self, section_number: i64) -> DbResult<Option<Section>>;

    /// Sum of batch quantities per section (inner join for the list).
    async fn report_products(&self, id: Option<i64>) -> DbResult<Vec<SectionProductsReport>>;
}

#[async_trait]
pub trait ProductTypeRepository: Repository<ProductType> {}

#[async_trait]
pub trait ProductRepository: Repository<Product> {
    async fn find_by_code(&self, product_code: &str) -> DbResult<Option<Product>>;

    /// Records per product (left join: products without records included).
    async fn report_records(&self, id: Option<i64>) -> DbResult<Vec<ProductRecordsReport>>;
}

#[async_trait]
pub trait ProductRecordRepository: Repository<ProductRecord> {}

#[async_trait]
pub trait ProductBatchRepository: Repository<ProductBatch> {
    async fn find_by_batch_number(&self, batch_number: i64) -> DbResult<Option<ProductBatch>>;
}

#[async_trait]
pub trait LocalityRepository: Repository<Locality> {
    /// Sellers per locality (left join).
    async fn report_sellers(&self, id: Option<i64>) -> DbResult<Vec<LocalitySellersReport>>;

    /// Carriers per locality (inner join for the list; by id, zero allowed).
    async fn report_carriers(&self, id: Option<i64>) -> DbResult<Vec<LocalityCarriersReport>>;
}

#[async_trait]
pub trait CarrierRepository: Repository<Carrier> {
    async fn find_by_cid(&self, cid: &str) -> DbResult<Option<Carrier>>;
}

#[async_trait]
pub trait InboundOrderRepository: Repository<InboundOrder> {
    async fn find_by_order_number(&self, order_number: &str) -> DbResult<Option<InboundOrder>>;
}

#[async_trait]
pub trait PurchaseOrderRepository: Repository<PurchaseOrder> {
    async fn find_by_order_number(&self, order_number: &str)
        -> DbResult<Option<PurchaseOrder>>;
}

// =============================================================================
// Repository Bundle
// =============================================================================

/// Every repository, behind trait objects, sharing one store.
///
/// ## Usage
/// ```rust,ignore
/// // Production: SQLite
/// let repos = Repositories::sqlite(&db);
///
/// // Tests / seed mode: in-memory maps
/// let repos = Repositories::memory(&MemoryStore::new());
/// ```
#[derive(Clone)]
pub struct Repositories {
    pub sellers: Arc<dyn SellerRepository>,
    pub buyers: Arc<dyn BuyerRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub warehouses: Arc<dyn WarehouseRepository>,
    pub sections: Arc<dyn SectionRepository>,
    pub product_types: Arc<dyn ProductTypeRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub product_records: Arc<dyn ProductRecordRepository>,
    pub product_batches: Arc<dyn ProductBatchRepository>,
    pub localities: Arc<dyn LocalityRepository>,
    pub carriers: Arc<dyn CarrierRepository>,
    pub inbound_orders: Arc<dyn InboundOrderRepository>,
    pub purchase_orders: Arc<dyn PurchaseOrderRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

//! # Domain Services
//!
//! One service per entity. Services own every invariant that spans more than
//! one field: references, natural keys, and the reports.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Standalone           Composed (reference checks go through these)      │
//! │  ──────────           ────────────────────────────────────────────      │
//! │  LocalityService ◄─── SellerService, CarrierService                     │
//! │  WarehouseService ◄── EmployeeService, SectionService,                  │
//! │                       InboundOrderService                               │
//! │  ProductTypeService ◄ SectionService, ProductService                    │
//! │  BuyerService ◄────── PurchaseOrderService                              │
//! │                                                                         │
//! │  SellerService ◄───── ProductService                                    │
//! │  ProductService ◄──── ProductRecordService, ProductBatchService         │
//! │  SectionService ◄──── ProductBatchService                               │
//! │  EmployeeService ◄─── InboundOrderService                               │
//! │  ProductBatchService ◄ InboundOrderService                              │
//! │  ProductRecordService ◄ PurchaseOrderService                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Create Pipeline
//! ```text
//! validate ──► every reference: parent.get_by_id()  (NotFound(k) → InvalidReference(k))
//!          ──► natural key probe                     (taken → Conflict)
//!          ──► repo.save()                           (race → Conflict from the store)
//!          ──► entity with its new id
//! ```

use std::future::Future;
use std::sync::Arc;

use wareflow_core::{DomainError, DomainResult, Entity, NaturalKey};
use wareflow_db::Repositories;

pub mod catalog;
pub mod orders;
pub mod parties;
pub mod storage;

pub use catalog::{ProductBatchService, ProductRecordService, ProductService, ProductTypeService};
pub use orders::{InboundOrderService, PurchaseOrderService};
pub use parties::{BuyerService, CarrierService, EmployeeService, LocalityService, SellerService};
pub use storage::{SectionService, WarehouseService};

/// Resolves a referenced entity, reporting a miss as `InvalidReference`.
pub(crate) async fn require_reference<T>(
    lookup: impl Future<Output = DomainResult<T>>,
) -> DomainResult<()> {
    lookup
        .await
        .map(|_| ())
        .map_err(DomainError::into_reference)
}

/// Fails with `Conflict` when `existing` belongs to a row other than `owner`.
pub(crate) fn ensure_unclaimed<T: Entity>(
    existing: Option<T>,
    owner: Option<i64>,
    key: NaturalKey,
) -> DomainResult<()> {
    match existing {
        Some(row) if Some(row.id()) != owner => Err(DomainError::Conflict(key)),
        _ => Ok(()),
    }
}

// =============================================================================
// Service Bundle
// =============================================================================

/// Every domain service, wired to one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub localities: Arc<LocalityService>,
    pub sellers: Arc<SellerService>,
    pub buyers: Arc<BuyerService>,
    pub carriers: Arc<CarrierService>,
    pub warehouses: Arc<WarehouseService>,
    pub employees: Arc<EmployeeService>,
    pub product_types: Arc<ProductTypeService>,
    pub sections: Arc<SectionService>,
    pub products: Arc<ProductService>,
    pub product_records: Arc<ProductRecordService>,
    pub product_batches: Arc<ProductBatchService>,
    pub inbound_orders: Arc<InboundOrderService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
}

impl Services {
    /// Builds the services parents-first.
    pub fn new(repos: Repositories) -> Self {
        let localities = Arc::new(LocalityService::new(repos.localities));
        let buyers = Arc::new(BuyerService::new(repos.buyers));
        let warehouses = Arc::new(WarehouseService::new(repos.warehouses));
        let product_types = Arc::new(ProductTypeService::new(repos.product_types));

        let sellers = Arc::new(SellerService::new(repos.sellers, localities.clone()));
        let carriers = Arc::new(CarrierService::new(repos.carriers, localities.clone()));
        let employees = Arc::new(EmployeeService::new(repos.employees, warehouses.clone()));
        let sections = Arc::new(SectionService::new(
            repos.sections,
            warehouses.clone(),
            product_types.clone(),
        ));
        let products = Arc::new(ProductService::new(
            repos.products,
            sellers.clone(),
            product_types.clone(),
        ));
        let product_records = Arc::new(ProductRecordService::new(
            repos.product_records,
            products.clone(),
        ));
        let product_batches = Arc::new(ProductBatchService::new(
            repos.product_batches,
            products.clone(),
            sections.clone(),
        ));
        let inbound_orders = Arc::new(InboundOrderService::new(
            repos.inbound_orders,
            employees.clone(),
            product_batches.clone(),
            warehouses.clone(),
        ));
        let purchase_orders = Arc::new(PurchaseOrderService::new(
            repos.purchase_orders,
            buyers.clone(),
            product_records.clone(),
        ));

        Services {
            localities,
            sellers,
            buyers,
            carriers,
            warehouses,
            employees,
            product_types,
            sections,
            products,
            product_records,
            product_batches,
            inbound_orders,
            purchase_orders,
        }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use wareflow_core::{
        Buyer, Locality, Product, ProductRecord, ProductType, PurchaseOrder, Section, Seller,
        Warehouse,
    };
    use wareflow_db::{MemoryStore, Repositories};

    use super::Services;

    pub fn memory_services() -> Services {
        Services::new(Repositories::memory(&MemoryStore::new()))
    }

    pub fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    pub fn locality(name: &str) -> Locality {
        Locality {
            id: 0,
            locality_name: name.into(),
            province_name: "Buenos Aires".into(),
            country_name: "Argentina".into(),
        }
    }

    pub fn seller(cid: i64, locality_id: i64) -> Seller {
        Seller {
            id: 0,
            cid,
            company_name: "Acme".into(),
            address: "Main St 1".into(),
            telephone: "555-0100".into(),
            locality_id,
        }
    }

    pub fn buyer(card: &str) -> Buyer {
        Buyer {
            id: 0,
            card_number_id: card.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    pub fn warehouse(code: &str) -> Warehouse {
        Warehouse {
            id: 0,
            warehouse_code: code.into(),
            address: "Dock 4".into(),
            telephone: "555-0199".into(),
            minimum_capacity: 10,
            minimum_temperature: -20.0,
        }
    }

    pub fn product_type(description: &str) -> ProductType {
        ProductType {
            id: 0,
            description: description.into(),
        }
    }

    pub fn section(number: i64, warehouse_id: i64, product_type_id: i64) -> Section {
        Section {
            id: 0,
            section_number: number,
            current_temperature: 5.0,
            minimum_temperature: -5.0,
            current_capacity: 10,
            minimum_capacity: 5,
            maximum_capacity: 50,
            warehouse_id,
            product_type_id,
        }
    }

    pub fn product(code: &str, seller_id: i64, product_type_id: i64) -> Product {
        Product {
            id: 0,
            product_code: code.into(),
            description: "Frozen peas".into(),
            width: 1.5,
            height: 2.0,
            length: 3.0,
            net_weight: 0.5,
            expiration_rate: 0.1,
            recommended_freezing_temperature: -18.0,
            freezing_rate: 0.2,
            product_type_id,
            seller_id,
        }
    }

    pub fn record(product_id: i64) -> ProductRecord {
        ProductRecord {
            id: 0,
            last_update_date: date("2023-10-05"),
            purchase_price: 10.0,
            sale_price: 15.0,
            product_id,
        }
    }

    pub fn purchase_order(number: &str, buyer_id: i64, product_record_id: i64) -> PurchaseOrder {
        PurchaseOrder {
            id: 0,
            order_number: number.into(),
            order_date: date("2023-10-05"),
            tracking_code: "TRK-1".into(),
            buyer_id,
            product_record_id,
        }
    }

    /// Ids of a locality → seller → product chain, product code `P-1`.
    pub struct CatalogFixture {
        pub seller_id: i64,
        pub product_type_id: i64,
        pub product_id: i64,
    }

    pub async fn catalog_fixture(services: &Services) -> CatalogFixture {
        let loc = services.localities.create(locality("Palermo")).await.unwrap();
        let s = services.sellers.create(seller(1, loc.id)).await.unwrap();
        let t = services.product_types.create(product_type("Frozen")).await.unwrap();
        let p = services
            .products
            .create(product("P-1", s.id, t.id))
            .await
            .unwrap();
        CatalogFixture {
            seller_id: s.id,
            product_type_id: t.id,
            product_id: p.id,
        }
    }
}

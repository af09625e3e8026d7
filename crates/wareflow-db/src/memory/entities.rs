//! Table wiring, constraints and reports for the in-memory store.

use async_trait::async_trait;
use wareflow_core::{
    Buyer, BuyerPurchaseOrdersReport, Carrier, Employee, EmployeeInboundOrdersReport, EntityKind,
    InboundOrder, Locality, LocalityCarriersReport, LocalitySellersReport, NaturalKey, Product,
    ProductBatch, ProductRecord, ProductRecordsReport, ProductType, PurchaseOrder, Section,
    SectionProductsReport, Seller, Warehouse,
};

use super::{aggregate, MemoryEntity, MemoryRepository, Table, Tables};
use crate::error::DbResult;
use crate::repository::{
    BuyerRepository, CarrierRepository, EmployeeRepository, InboundOrderRepository,
    LocalityRepository, ProductBatchRepository, ProductRecordRepository, ProductRepository,
    ProductTypeRepository, PurchaseOrderRepository, SectionRepository, SellerRepository,
    WarehouseRepository,
};

/// First reference in `checks` whose target is absent.
fn first_missing(checks: &[(bool, EntityKind)]) -> Option<EntityKind> {
    checks
        .iter()
        .find(|(present, _)| !present)
        .map(|(_, kind)| *kind)
}

fn taken(collides: bool, key: NaturalKey) -> Option<NaturalKey> {
    collides.then_some(key)
}

// =============================================================================
// Parties
// =============================================================================

impl MemoryEntity for Seller {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.sellers
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.sellers
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables.sellers.any_other(exclude, |s| s.cid == self.cid),
            NaturalKey::SellerCid,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[(
            tables.localities.contains(self.locality_id),
            EntityKind::Locality,
        )])
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.products.values().any(|p| p.seller_id == id)
    }
}

#[async_trait]
impl SellerRepository for MemoryRepository<Seller> {
    async fn find_by_cid(&self, cid: i64) -> DbResult<Option<Seller>> {
        Ok(self.find_first(|s| s.cid == cid))
    }
}

impl MemoryEntity for Buyer {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.buyers
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.buyers
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .buyers
                .any_other(exclude, |b| b.card_number_id == self.card_number_id),
            NaturalKey::BuyerCardNumberId,
        )
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.purchase_orders.values().any(|po| po.buyer_id == id)
    }
}

#[async_trait]
impl BuyerRepository for MemoryRepository<Buyer> {
    async fn find_by_card_number_id(&self, card_number_id: &str) -> DbResult<Option<Buyer>> {
        Ok(self.find_first(|b| b.card_number_id == card_number_id))
    }

    async fn report_purchase_orders(
        &self,
        id: Option<i64>,
    ) -> DbResult<Vec<BuyerPurchaseOrdersReport>> {
        let tables = self.store().read();
        aggregate(&tables, id, true, |buyer: &Buyer| {
            let count = tables
                .purchase_orders
                .values()
                .filter(|po| po.buyer_id == buyer.id)
                .count();
            let row = BuyerPurchaseOrdersReport {
                buyer_id: buyer.id,
                card_number_id: buyer.card_number_id.clone(),
                first_name: buyer.first_name.clone(),
                last_name: buyer.last_name.clone(),
                count: count as i64,
            };
            (count, row)
        })
    }
}

impl MemoryEntity for Employee {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.employees
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.employees
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .employees
                .any_other(exclude, |e| e.card_number_id == self.card_number_id),
            NaturalKey::EmployeeCardNumberId,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[(
            tables.warehouses.contains(self.warehouse_id),
            EntityKind::Warehouse,
        )])
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.inbound_orders.values().any(|io| io.employee_id == id)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryRepository<Employee> {
    async fn find_by_card_number_id(&self, card_number_id: &str) -> DbResult<Option<Employee>> {
        Ok(self.find_first(|e| e.card_number_id == card_number_id))
    }

    async fn report_inbound_orders(
        &self,
        id: Option<i64>,
    ) -> DbResult<Vec<EmployeeInboundOrdersReport>> {
        let tables = self.store().read();
        aggregate(&tables, id, false, |employee: &Employee| {
            let count = tables
                .inbound_orders
                .values()
                .filter(|io| io.employee_id == employee.id)
                .count();
            let row = EmployeeInboundOrdersReport {
                employee_id: employee.id,
                card_number_id: employee.card_number_id.clone(),
                first_name: employee.first_name.clone(),
                last_name: employee.last_name.clone(),
                warehouse_id: employee.warehouse_id,
                inbound_orders_count: count as i64,
            };
            (count, row)
        })
    }
}

impl MemoryEntity for Carrier {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.carriers
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.carriers
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables.carriers.any_other(exclude, |c| c.cid == self.cid),
            NaturalKey::CarrierCid,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[(
            tables.localities.contains(self.locality_id),
            EntityKind::Locality,
        )])
    }
}

#[async_trait]
impl CarrierRepository for MemoryRepository<Carrier> {
    async fn find_by_cid(&self, cid: &str) -> DbResult<Option<Carrier>> {
        Ok(self.find_first(|c| c.cid == cid))
    }
}

impl MemoryEntity for Locality {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.localities
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.localities
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables.localities.any_other(exclude, |l| {
                l.locality_name == self.locality_name
                    && l.province_name == self.province_name
                    && l.country_name == self.country_name
            }),
            NaturalKey::Locality,
        )
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.sellers.values().any(|s| s.locality_id == id)
            || tables.carriers.values().any(|c| c.locality_id == id)
    }
}

#[async_trait]
impl LocalityRepository for MemoryRepository<Locality> {
    async fn report_sellers(&self, id: Option<i64>) -> DbResult<Vec<LocalitySellersReport>> {
        let tables = self.store().read();
        aggregate(&tables, id, true, |locality: &Locality| {
            let count = tables
                .sellers
                .values()
                .filter(|s| s.locality_id == locality.id)
                .count();
            let row = LocalitySellersReport {
                locality_id: locality.id,
                locality_name: locality.locality_name.clone(),
                sellers_count: count as i64,
            };
            (count, row)
        })
    }

    async fn report_carriers(&self, id: Option<i64>) -> DbResult<Vec<LocalityCarriersReport>> {
        let tables = self.store().read();
        aggregate(&tables, id, false, |locality: &Locality| {
            let count = tables
                .carriers
                .values()
                .filter(|c| c.locality_id == locality.id)
                .count();
            let row = LocalityCarriersReport {
                locality_id: locality.id,
                locality_name: locality.locality_name.clone(),
                carries_count: count as i64,
            };
            (count, row)
        })
    }
}

// =============================================================================
// Storage
// =============================================================================

impl MemoryEntity for Warehouse {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.warehouses
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.warehouses
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .warehouses
                .any_other(exclude, |w| w.warehouse_code == self.warehouse_code),
            NaturalKey::WarehouseCode,
        )
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.employees.values().any(|e| e.warehouse_id == id)
            || tables.sections.values().any(|s| s.warehouse_id == id)
            || tables.inbound_orders.values().any(|io| io.warehouse_id == id)
    }
}

#[async_trait]
impl WarehouseRepository for MemoryRepository<Warehouse> {
    async fn find_by_code(&self, warehouse_code: &str) -> DbResult<Option<Warehouse>> {
        Ok(self.find_first(|w| w.warehouse_code == warehouse_code))
    }
}

impl MemoryEntity for Section {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.sections
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.sections
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .sections
                .any_other(exclude, |s| s.section_number == self.section_number),
            NaturalKey::SectionNumber,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[
            (
                tables.warehouses.contains(self.warehouse_id),
                EntityKind::Warehouse,
            ),
            (
                tables.product_types.contains(self.product_type_id),
                EntityKind::ProductType,
            ),
        ])
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.product_batches.values().any(|b| b.section_id == id)
    }
}

#[async_trait]
impl SectionRepository for MemoryRepository<Section> {
    async fn find_by_section_number(&self, section_number: i64) -> DbResult<Option<Section>> {
        Ok(self.find_first(|s| s.section_number == section_number))
    }

    async fn report_products(&self, id: Option<i64>) -> DbResult<Vec<SectionProductsReport>> {
        let tables = self.store().read();
        aggregate(&tables, id, false, |section: &Section| {
            let (batches, quantity) = tables
                .product_batches
                .values()
                .filter(|b| b.section_id == section.id)
                .fold((0usize, 0i64), |(n, sum), b| (n + 1, sum + b.current_quantity));
            let row = SectionProductsReport {
                section_id: section.id,
                section_number: section.section_number,
                products_count: quantity,
            };
            (batches, row)
        })
    }
}

// =============================================================================
// Catalog
// =============================================================================

impl MemoryEntity for ProductType {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.product_types
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.product_types
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.sections.values().any(|s| s.product_type_id == id)
            || tables.products.values().any(|p| p.product_type_id == id)
    }
}

impl ProductTypeRepository for MemoryRepository<ProductType> {}

impl MemoryEntity for Product {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.products
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.products
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .products
                .any_other(exclude, |p| p.product_code == self.product_code),
            NaturalKey::ProductCode,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[
            (tables.sellers.contains(self.seller_id), EntityKind::Seller),
            (
                tables.product_types.contains(self.product_type_id),
                EntityKind::ProductType,
            ),
        ])
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables.product_records.values().any(|r| r.product_id == id)
            || tables.product_batches.values().any(|b| b.product_id == id)
    }
}

#[async_trait]
impl ProductRepository for MemoryRepository<Product> {
    async fn find_by_code(&self, product_code: &str) -> DbResult<Option<Product>> {
        Ok(self.find_first(|p| p.product_code == product_code))
    }

    async fn report_records(&self, id: Option<i64>) -> DbResult<Vec<ProductRecordsReport>> {
        let tables = self.store().read();
        aggregate(&tables, id, true, |product: &Product| {
            let count = tables
                .product_records
                .values()
                .filter(|r| r.product_id == product.id)
                .count();
            let row = ProductRecordsReport {
                product_id: product.id,
                description: product.description.clone(),
                records_count: count as i64,
            };
            (count, row)
        })
    }
}

impl MemoryEntity for ProductRecord {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.product_records
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.product_records
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[(tables.products.contains(self.product_id), EntityKind::Product)])
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables
            .purchase_orders
            .values()
            .any(|po| po.product_record_id == id)
    }
}

impl ProductRecordRepository for MemoryRepository<ProductRecord> {}

impl MemoryEntity for ProductBatch {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.product_batches
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.product_batches
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .product_batches
                .any_other(exclude, |b| b.batch_number == self.batch_number),
            NaturalKey::BatchNumber,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[
            (tables.products.contains(self.product_id), EntityKind::Product),
            (tables.sections.contains(self.section_id), EntityKind::Section),
        ])
    }

    fn has_children(id: i64, tables: &Tables) -> bool {
        tables
            .inbound_orders
            .values()
            .any(|io| io.product_batch_id == id)
    }
}

#[async_trait]
impl ProductBatchRepository for MemoryRepository<ProductBatch> {
    async fn find_by_batch_number(&self, batch_number: i64) -> DbResult<Option<ProductBatch>> {
        Ok(self.find_first(|b| b.batch_number == batch_number))
    }
}

// =============================================================================
// Orders
// =============================================================================

impl MemoryEntity for InboundOrder {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.inbound_orders
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.inbound_orders
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .inbound_orders
                .any_other(exclude, |io| io.order_number == self.order_number),
            NaturalKey::InboundOrderNumber,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[
            (tables.employees.contains(self.employee_id), EntityKind::Employee),
            (
                tables.product_batches.contains(self.product_batch_id),
                EntityKind::ProductBatch,
            ),
            (
                tables.warehouses.contains(self.warehouse_id),
                EntityKind::Warehouse,
            ),
        ])
    }
}

#[async_trait]
impl InboundOrderRepository for MemoryRepository<InboundOrder> {
    async fn find_by_order_number(&self, order_number: &str) -> DbResult<Option<InboundOrder>> {
        Ok(self.find_first(|io| io.order_number == order_number))
    }
}

impl MemoryEntity for PurchaseOrder {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.purchase_orders
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.purchase_orders
    }

    fn conflict(&self, tables: &Tables, exclude: Option<i64>) -> Option<NaturalKey> {
        taken(
            tables
                .purchase_orders
                .any_other(exclude, |po| po.order_number == self.order_number),
            NaturalKey::PurchaseOrderNumber,
        )
    }

    fn missing_reference(&self, tables: &Tables) -> Option<EntityKind> {
        first_missing(&[
            (tables.buyers.contains(self.buyer_id), EntityKind::Buyer),
            (
                tables.product_records.contains(self.product_record_id),
                EntityKind::ProductRecord,
            ),
        ])
    }
}

#[async_trait]
impl PurchaseOrderRepository for MemoryRepository<PurchaseOrder> {
    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> DbResult<Option<PurchaseOrder>> {
        Ok(self.find_first(|po| po.order_number == order_number))
    }
}

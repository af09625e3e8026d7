//! SQLite mapping for inbound and purchase orders.

use async_trait::async_trait;
use wareflow_core::{EntityKind, InboundOrder, PurchaseOrder};

use super::{ForeignKey, SqliteEntity, SqliteQuery, SqliteRepository};
use crate::error::DbResult;
use crate::repository::{InboundOrderRepository, PurchaseOrderRepository};

pub type SqliteInboundOrderRepository = SqliteRepository<InboundOrder>;
pub type SqlitePurchaseOrderRepository = SqliteRepository<PurchaseOrder>;

impl SqliteEntity for InboundOrder {
    const TABLE: &'static str = "inbound_orders";
    const COLUMNS: &'static [&'static str] = &[
        "order_date",
        "order_number",
        "employee_id",
        "product_batch_id",
        "warehouse_id",
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.order_date)
            .bind(self.order_number.as_str())
            .bind(self.employee_id)
            .bind(self.product_batch_id)
            .bind(self.warehouse_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(EntityKind::Employee, "employees", self.employee_id),
            ForeignKey::new(EntityKind::ProductBatch, "product_batches", self.product_batch_id),
            ForeignKey::new(EntityKind::Warehouse, "warehouses", self.warehouse_id),
        ]
    }
}

#[async_trait]
impl InboundOrderRepository for SqliteInboundOrderRepository {
    async fn find_by_order_number(&self, order_number: &str) -> DbResult<Option<InboundOrder>> {
        self.find_one_by_text("order_number", order_number).await
    }
}

impl SqliteEntity for PurchaseOrder {
    const TABLE: &'static str = "purchase_orders";
    const COLUMNS: &'static [&'static str] = &[
        "order_number",
        "order_date",
        "tracking_code",
        "buyer_id",
        "product_record_id",
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.order_number.as_str())
            .bind(self.order_date)
            .bind(self.tracking_code.as_str())
            .bind(self.buyer_id)
            .bind(self.product_record_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(EntityKind::Buyer, "buyers", self.buyer_id),
            ForeignKey::new(EntityKind::ProductRecord, "product_records", self.product_record_id),
        ]
    }
}

#[async_trait]
impl PurchaseOrderRepository for SqlitePurchaseOrderRepository {
    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> DbResult<Option<PurchaseOrder>> {
        self.find_one_by_text("order_number", order_number).await
    }
}

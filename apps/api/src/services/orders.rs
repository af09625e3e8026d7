//! Inbound (receiving) and purchase (outgoing) order services.
//!
//! ## Reference Check Order
//! ```text
//! InboundOrder:  employee → product batch → warehouse → order_number
//! PurchaseOrder: buyer → product record → order_number
//! ```
//! The first missing parent wins, so a payload with several dangling ids
//! always reports the same one.

use std::sync::Arc;

use tracing::info;
use wareflow_core::validation::{validate_inbound_order, validate_purchase_order};
use wareflow_core::{DomainResult, InboundOrder, NaturalKey, PurchaseOrder};
use wareflow_db::{InboundOrderRepository, PurchaseOrderRepository};

use super::{
    ensure_unclaimed, require_reference, BuyerService, EmployeeService, ProductBatchService,
    ProductRecordService, WarehouseService,
};

// =============================================================================
// Inbound Orders
// =============================================================================

pub struct InboundOrderService {
    repo: Arc<dyn InboundOrderRepository>,
    employees: Arc<EmployeeService>,
    product_batches: Arc<ProductBatchService>,
    warehouses: Arc<WarehouseService>,
}

impl InboundOrderService {
    pub fn new(
        repo: Arc<dyn InboundOrderRepository>,
        employees: Arc<EmployeeService>,
        product_batches: Arc<ProductBatchService>,
        warehouses: Arc<WarehouseService>,
    ) -> Self {
        InboundOrderService {
            repo,
            employees,
            product_batches,
            warehouses,
        }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<InboundOrder>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<InboundOrder> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, order: InboundOrder) -> DomainResult<InboundOrder> {
        self.store(order, None).await
    }

    pub async fn update(&self, id: i64, order: InboundOrder) -> DomainResult<InboundOrder> {
        self.get_by_id(id).await?;
        self.store(order, Some(id)).await
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }

    async fn store(&self, mut order: InboundOrder, id: Option<i64>) -> DomainResult<InboundOrder> {
        validate_inbound_order(&order)?;
        require_reference(self.employees.get_by_id(order.employee_id)).await?;
        require_reference(self.product_batches.get_by_id(order.product_batch_id)).await?;
        require_reference(self.warehouses.get_by_id(order.warehouse_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_order_number(&order.order_number).await?,
            id,
            NaturalKey::InboundOrderNumber,
        )?;

        match id {
            Some(id) => {
                order.id = id;
                self.repo.update(&order).await?;
            }
            None => {
                order.id = self.repo.save(&order).await?;
                info!(id = order.id, number = %order.order_number, "Inbound order created");
            }
        }
        Ok(order)
    }
}

// =============================================================================
// Purchase Orders
// =============================================================================

pub struct PurchaseOrderService {
    repo: Arc<dyn PurchaseOrderRepository>,
    buyers: Arc<BuyerService>,
    product_records: Arc<ProductRecordService>,
}

impl PurchaseOrderService {
    pub fn new(
        repo: Arc<dyn PurchaseOrderRepository>,
        buyers: Arc<BuyerService>,
        product_records: Arc<ProductRecordService>,
    ) -> Self {
        PurchaseOrderService {
            repo,
            buyers,
            product_records,
        }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<PurchaseOrder>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<PurchaseOrder> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Creates a purchase order.
    ///
    /// ## Concurrency
    /// The order-number probe and the insert are separate steps. When two
    /// requests race past the probe, the store's unique constraint rejects
    /// the loser with `Conflict(order number)`.
    pub async fn create(&self, order: PurchaseOrder) -> DomainResult<PurchaseOrder> {
        self.store(order, None).await
    }

    pub async fn update(&self, id: i64, order: PurchaseOrder) -> DomainResult<PurchaseOrder> {
        self.get_by_id(id).await?;
        self.store(order, Some(id)).await
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get_by_id(id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }

    async fn store(&self, mut order: PurchaseOrder, id: Option<i64>) -> DomainResult<PurchaseOrder> {
        validate_purchase_order(&order)?;
        require_reference(self.buyers.get_by_id(order.buyer_id)).await?;
        require_reference(self.product_records.get_by_id(order.product_record_id)).await?;
        ensure_unclaimed(
            self.repo.find_by_order_number(&order.order_number).await?,
            id,
            NaturalKey::PurchaseOrderNumber,
        )?;

        match id {
            Some(id) => {
                order.id = id;
                self.repo.update(&order).await?;
            }
            None => {
                order.id = self.repo.save(&order).await?;
                info!(id = order.id, number = %order.order_number, "Purchase order created");
            }
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::{buyer, catalog_fixture, memory_services, purchase_order, record};
    use wareflow_core::{DomainError, EntityKind, NaturalKey};

    #[tokio::test]
    async fn test_missing_buyer_is_reported_first() {
        let services = memory_services();
        let err = services
            .purchase_orders
            .create(purchase_order("123ABC", 100, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::Buyer)));
        assert_eq!(err.to_string(), "buyer not found");
    }

    #[tokio::test]
    async fn test_order_number_is_unique() {
        let services = memory_services();
        let fx = catalog_fixture(&services).await;
        let b = services.buyers.create(buyer("B1")).await.unwrap();
        let r = services.product_records.create(record(fx.product_id)).await.unwrap();

        services
            .purchase_orders
            .create(purchase_order("PO-1", b.id, r.id))
            .await
            .unwrap();
        let err = services
            .purchase_orders
            .create(purchase_order("PO-1", b.id, r.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(NaturalKey::PurchaseOrderNumber)));

        let report = services.buyers.report_purchase_orders(Some(b.id)).await.unwrap();
        assert_eq!(report[0].count, 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_own_order_number() {
        let services = memory_services();
        let fx = catalog_fixture(&services).await;
        let b = services.buyers.create(buyer("B1")).await.unwrap();
        let r = services.product_records.create(record(fx.product_id)).await.unwrap();
        let created = services
            .purchase_orders
            .create(purchase_order("PO-1", b.id, r.id))
            .await
            .unwrap();

        let mut changed = created.clone();
        changed.tracking_code = "TRK-2".into();
        let stored = services
            .purchase_orders
            .update(created.id, changed.clone())
            .await
            .unwrap();
        assert_eq!(stored, changed);
    }
}

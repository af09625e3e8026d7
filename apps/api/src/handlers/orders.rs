//! Inbound and purchase orders.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use wareflow_core::validation::ValidationResult;
use wareflow_core::{InboundOrder, PurchaseOrder, Validator};

use super::{created, Data};
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InboundOrderRequest {
    pub order_date: Option<String>,
    pub order_number: Option<String>,
    pub employee_id: Option<i64>,
    pub product_batch_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl InboundOrderRequest {
    pub fn into_entity(self) -> ValidationResult<InboundOrder> {
        let mut v = Validator::new();
        let order = InboundOrder {
            id: 0,
            order_date: v.required_date("order_date", self.order_date),
            order_number: v.required_text("order_number", self.order_number),
            employee_id: v.required("employee_id", self.employee_id),
            product_batch_id: v.required("product_batch_id", self.product_batch_id),
            warehouse_id: v.required("warehouse_id", self.warehouse_id),
        };
        v.finish()?;
        Ok(order)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseOrderRequest {
    pub order_number: Option<String>,
    pub order_date: Option<String>,
    pub tracking_code: Option<String>,
    pub buyer_id: Option<i64>,
    pub product_record_id: Option<i64>,
}

impl PurchaseOrderRequest {
    pub fn into_entity(self) -> ValidationResult<PurchaseOrder> {
        let mut v = Validator::new();
        let order = PurchaseOrder {
            id: 0,
            order_number: v.required_text("order_number", self.order_number),
            order_date: v.required_date("order_date", self.order_date),
            tracking_code: v.required_text("tracking_code", self.tracking_code),
            buyer_id: v.required("buyer_id", self.buyer_id),
            product_record_id: v.required("product_record_id", self.product_record_id),
        };
        v.finish()?;
        Ok(order)
    }
}

// =============================================================================
// Inbound Orders
// =============================================================================

pub async fn list_inbound_orders(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<InboundOrder>>>> {
    Ok(Data::json(state.services.inbound_orders.get_all().await?))
}

pub async fn get_inbound_order(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<InboundOrder>>> {
    Ok(Data::json(state.services.inbound_orders.get_by_id(id).await?))
}

pub async fn create_inbound_order(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<InboundOrderRequest>,
) -> ApiResult<(StatusCode, Json<Data<InboundOrder>>)> {
    let order = body.into_entity()?;
    Ok(created(state.services.inbound_orders.create(order).await?))
}

// =============================================================================
// Purchase Orders
// =============================================================================

pub async fn list_purchase_orders(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<PurchaseOrder>>>> {
    Ok(Data::json(state.services.purchase_orders.get_all().await?))
}

pub async fn get_purchase_order(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<PurchaseOrder>>> {
    Ok(Data::json(state.services.purchase_orders.get_by_id(id).await?))
}

pub async fn create_purchase_order(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<PurchaseOrderRequest>,
) -> ApiResult<(StatusCode, Json<Data<PurchaseOrder>>)> {
    let order = body.into_entity()?;
    Ok(created(state.services.purchase_orders.create(order).await?))
}

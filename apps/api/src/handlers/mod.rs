//! # HTTP Handlers
//!
//! Route table for `/api/v1` and the response envelope.
//!
//! ## Conventions
//! ```text
//! GET    /{resource}            200 {"data": [...]}
//! GET    /{resource}/{id}       200 {"data": {...}}
//! POST   /{resource}            201 {"data": {...}}     (with the assigned id)
//! PATCH  /{resource}/{id}       200 {"data": {...}}     (after the overlay)
//! DELETE /{resource}/{id}       204
//! GET    /{resource}/reportX    200 {"data": [...]}     without ?id=
//!                               200 {"data": {...}}     with ?id=
//! ```
//!
//! Request DTOs keep every field optional so that all missing fields are
//! reported together, as 422 `causes`, instead of serde failing on the first.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{extract::State, Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub mod catalog;
pub mod orders;
pub mod parties;
pub mod storage;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T: Serialize> Data<T> {
    pub fn json(data: T) -> Json<Self> {
        Json(Data { data })
    }
}

/// Report payload: the single row when filtered by id, the list otherwise.
pub(crate) fn report_response<R: Serialize>(id: Option<i64>, rows: Vec<R>) -> Response {
    match id {
        Some(_) => Data::json(rows.into_iter().next()).into_response(),
        None => Data::json(rows).into_response(),
    }
}

pub(crate) fn created<T: Serialize>(entity: T) -> (StatusCode, Json<Data<T>>) {
    (StatusCode::CREATED, Data::json(entity))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    storage: crate::config::StorageKind,
}

/// Store health probe.
async fn health(State(state): State<AppState>) -> Response {
    let healthy = state.store.health_check().await;
    let body = Data::json(Health {
        status: if healthy { "ok" } else { "unavailable" },
        storage: state.store.kind(),
    });
    if healthy {
        (StatusCode::OK, body).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
    }
}

/// Every route under the API prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Parties
        .route(
            "/sellers",
            get(parties::list_sellers).post(parties::create_seller),
        )
        .route(
            "/sellers/{id}",
            get(parties::get_seller)
                .patch(parties::patch_seller)
                .delete(parties::delete_seller),
        )
        .route("/buyers", get(parties::list_buyers).post(parties::create_buyer))
        .route(
            "/buyers/reportPurchaseOrders",
            get(parties::report_purchase_orders),
        )
        .route(
            "/buyers/{id}",
            get(parties::get_buyer)
                .patch(parties::patch_buyer)
                .delete(parties::delete_buyer),
        )
        .route(
            "/employees",
            get(parties::list_employees).post(parties::create_employee),
        )
        .route(
            "/employees/reportInboundOrders",
            get(parties::report_inbound_orders),
        )
        .route(
            "/employees/{id}",
            get(parties::get_employee)
                .patch(parties::patch_employee)
                .delete(parties::delete_employee),
        )
        .route(
            "/localities",
            get(parties::list_localities).post(parties::create_locality),
        )
        .route("/localities/reportSellers", get(parties::report_sellers))
        .route("/localities/reportCarries", get(parties::report_carriers))
        .route("/localities/{id}", get(parties::get_locality))
        .route(
            "/carries",
            get(parties::list_carriers).post(parties::create_carrier),
        )
        .route("/carries/{id}", get(parties::get_carrier))
        // Storage
        .route(
            "/warehouses",
            get(storage::list_warehouses).post(storage::create_warehouse),
        )
        .route(
            "/warehouses/{id}",
            get(storage::get_warehouse)
                .patch(storage::patch_warehouse)
                .delete(storage::delete_warehouse),
        )
        .route(
            "/sections",
            get(storage::list_sections).post(storage::create_section),
        )
        .route("/sections/reportProducts", get(storage::report_products))
        .route(
            "/sections/{id}",
            get(storage::get_section)
                .patch(storage::patch_section)
                .delete(storage::delete_section),
        )
        // Catalog
        .route(
            "/productTypes",
            get(catalog::list_product_types).post(catalog::create_product_type),
        )
        .route("/productTypes/{id}", get(catalog::get_product_type))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route("/products/reportRecords", get(catalog::report_records))
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .patch(catalog::patch_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/productRecords",
            get(catalog::list_product_records).post(catalog::create_product_record),
        )
        .route("/productRecords/{id}", get(catalog::get_product_record))
        .route(
            "/productBatches",
            get(catalog::list_product_batches).post(catalog::create_product_batch),
        )
        .route("/productBatches/{id}", get(catalog::get_product_batch))
        // Orders
        .route(
            "/inboundOrders",
            get(orders::list_inbound_orders).post(orders::create_inbound_order),
        )
        .route("/inboundOrders/{id}", get(orders::get_inbound_order))
        .route(
            "/purchaseOrders",
            get(orders::list_purchase_orders).post(orders::create_purchase_order),
        )
        .route("/purchaseOrders/{id}", get(orders::get_purchase_order))
}

//! End-to-end checks of the `/api/v1` routes over the in-memory store.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, cause_fields, delete, get, patch, post};

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_seller_created_then_cid_conflicts() {
    let app = app();
    let body = json!({
        "cid": 123,
        "company_name": "Acme",
        "address": "X",
        "telephone": "1",
        "locality_id": 1
    });

    let (status, created) = post(&app, "/api/v1/sellers", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["data"]["id"].as_i64().unwrap() >= 1);
    assert_eq!(created["data"]["cid"], 123);

    let (status, err) = post(&app, "/api/v1/sellers", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "CONFLICT");
    assert_eq!(err["code"], 409);
}

#[tokio::test]
async fn test_employee_card_number_conflict_message() {
    let app = app();
    let (status, err) = post(
        &app,
        "/api/v1/employees",
        json!({
            "card_number_id": "E1001",
            "first_name": "John",
            "last_name": "Doe",
            "warehouse_id": 1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["message"], "card number id already in use");
}

#[tokio::test]
async fn test_purchase_order_with_missing_buyer() {
    let app = app();
    let (status, err) = post(
        &app,
        "/api/v1/purchaseOrders",
        json!({
            "order_number": "123ABC",
            "order_date": "2023-10-05",
            "tracking_code": "123",
            "buyer_id": 100,
            "product_record_id": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "buyer not found");
    assert_eq!(err["error"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn test_purchase_order_missing_fields_are_all_listed() {
    let app = app();
    let (status, err) = post(
        &app,
        "/api/v1/purchaseOrders",
        json!({ "order_date": "2023-10-05" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        cause_fields(&err),
        vec!["order_number", "tracking_code", "buyer_id", "product_record_id"]
    );
}

#[tokio::test]
async fn test_buyer_purchase_order_report() {
    let app = app();
    let (status, body) = get(&app, "/api/v1/buyers/reportPurchaseOrders").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["buyer_id"], 0);
    assert_eq!(rows[0]["count"], 10);
    assert_eq!(rows[1]["buyer_id"], 1);
    assert_eq!(rows[1]["count"], 20);

    // An empty id is the unfiltered list, not a parse error.
    let (status, unfiltered) = get(&app, "/api/v1/buyers/reportPurchaseOrders?id=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unfiltered, body);

    let (status, single) = get(&app, "/api/v1/buyers/reportPurchaseOrders?id=%201%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["data"]["count"], 20);
}

#[tokio::test]
async fn test_employee_inbound_report_by_id() {
    let app = app();

    let (status, body) = get(&app, "/api/v1/employees/reportInboundOrders?id=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employee_id"], 0);
    assert_eq!(body["data"]["inbound_orders_count"], 3);

    let (status, body) = get(&app, "/api/v1/employees/reportInboundOrders?id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inbound_orders_count"], 0);

    let (status, _) = get(&app, "/api/v1/employees/reportInboundOrders?id=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn test_created_entity_reads_back() {
    let app = app();
    let (status, created) = post(
        &app,
        "/api/v1/warehouses",
        json!({
            "warehouse_code": "W2",
            "address": "Dock 9",
            "telephone": "555-0300",
            "minimum_capacity": 5,
            "minimum_temperature": -10.0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["data"]["id"].as_i64().unwrap();
    let (status, fetched) = get(&app, &format!("/api/v1/warehouses/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn test_missing_reference_is_not_found() {
    let app = app();
    let (status, err) = post(
        &app,
        "/api/v1/sections",
        json!({
            "section_number": 7,
            "current_temperature": 2.0,
            "minimum_temperature": -2.0,
            "current_capacity": 1,
            "minimum_capacity": 1,
            "maximum_capacity": 10,
            "warehouse_id": 1,
            "product_type_id": 42
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "product type not found");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = app();
    let (_, created) = post(
        &app,
        "/api/v1/buyers",
        json!({ "card_number_id": "B9", "first_name": "Eva", "last_name": "Sosa" }),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = delete(&app, &format!("/api/v1/buyers/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, err) = get(&app, &format!("/api/v1/buyers/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_parent_with_children_conflicts() {
    let app = app();
    let (status, err) = delete(&app, "/api/v1/buyers/0").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "REFERENCED_BY_CHILD");

    let (status, _) = get(&app, "/api/v1/buyers/0").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_patch_is_idempotent_and_empty_patch_is_noop() {
    let app = app();
    let (_, before) = get(&app, "/api/v1/sellers/1").await;

    let (status, unchanged) = patch(&app, "/api/v1/sellers/1", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["data"], before["data"]);

    let change = json!({ "company_name": "Frigo SRL", "telephone": "" });
    let (_, once) = patch(&app, "/api/v1/sellers/1", change.clone()).await;
    let (_, twice) = patch(&app, "/api/v1/sellers/1", change).await;
    assert_eq!(once["data"], twice["data"]);
    assert_eq!(once["data"]["company_name"], "Frigo SRL");
    assert_eq!(once["data"]["telephone"], before["data"]["telephone"]);
}

#[tokio::test]
async fn test_patch_into_taken_key_conflicts() {
    let app = app();
    let (status, err) = patch(
        &app,
        "/api/v1/employees/1",
        json!({ "card_number_id": "E1000" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["message"], "card number id already in use");
}

#[tokio::test]
async fn test_report_counts_sum_to_totals() {
    let app = app();

    let (_, report) = get(&app, "/api/v1/buyers/reportPurchaseOrders").await;
    let (_, orders) = get(&app, "/api/v1/purchaseOrders").await;
    let sum: i64 = report["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["count"].as_i64().unwrap())
        .sum();
    assert_eq!(sum as usize, orders["data"].as_array().unwrap().len());

    let (_, report) = get(&app, "/api/v1/products/reportRecords").await;
    let (_, records) = get(&app, "/api/v1/productRecords").await;
    let sum: i64 = report["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["records_count"].as_i64().unwrap())
        .sum();
    assert_eq!(sum as usize, records["data"].as_array().unwrap().len());

    let (_, report) = get(&app, "/api/v1/sections/reportProducts").await;
    assert_eq!(report["data"][0]["products_count"], 7);
}

#[tokio::test]
async fn test_carrier_report_drops_empty_localities() {
    let app = app();

    let (_, report) = get(&app, "/api/v1/localities/reportCarries").await;
    assert_eq!(report["data"].as_array().unwrap().len(), 0);

    let (status, _) = post(
        &app,
        "/api/v1/carries",
        json!({
            "cid": "C-1",
            "company_name": "Rapido",
            "address": "Ruta 3",
            "telephone": "555-0400",
            "locality_id": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, report) = get(&app, "/api/v1/localities/reportCarries").await;
    assert_eq!(report["data"][0]["locality_id"], 1);
    assert_eq!(report["data"][0]["carries_count"], 1);

    let (_, report) = get(&app, "/api/v1/localities/reportSellers?id=1").await;
    assert_eq!(report["data"]["sellers_count"], 1);
}

// =============================================================================
// Malformed requests
// =============================================================================

#[tokio::test]
async fn test_malformed_requests_are_bad_request() {
    let app = app();

    let (status, err) = get(&app, "/api/v1/sellers/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "BAD_REQUEST");

    let (status, err) = get(&app, "/api/v1/buyers/reportPurchaseOrders?id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["message"].as_str().unwrap().contains("invalid report id"));

    let (status, _) = post(&app, "/api/v1/buyers", json!({ "card_number_id": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/v1/productBatches",
        json!({
            "batch_number": 2,
            "current_quantity": 1,
            "current_temperature": 1.0,
            "due_date": "05/10/2023",
            "initial_quantity": 1,
            "manufacturing_date": "2023-01-01",
            "manufacturing_hour": 3,
            "minimum_temperature": 0.0,
            "product_id": 1,
            "section_id": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "memory");
}

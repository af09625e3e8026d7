//! Shared fixtures for the router tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use wareflow_api::{build_router, AppState, Store};
use wareflow_core::{
    Buyer, Employee, InboundOrder, Locality, Product, ProductBatch, ProductRecord, ProductType,
    PurchaseOrder, Section, Seller, Warehouse,
};
use wareflow_db::{MemoryStore, SeedSet};

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

/// A small but complete data set.
///
/// - buyers 0 and 1 with 10 and 20 purchase orders
/// - employee 0 (`E1000`) with 3 inbound orders, employee 1 (`E1001`) with none
/// - one locality, seller, warehouse, type, section, product, batch
/// - product records 1 and 2
pub fn seed() -> SeedSet {
    let purchase_orders = (0..30)
        .map(|n| PurchaseOrder {
            id: n + 1,
            order_number: format!("PO-{n}"),
            order_date: date("2023-10-05"),
            tracking_code: format!("T-{n}"),
            buyer_id: if n < 10 { 0 } else { 1 },
            product_record_id: 1,
        })
        .collect();

    let inbound_orders = (0..3)
        .map(|n| InboundOrder {
            id: n + 1,
            order_date: date("2023-09-01"),
            order_number: format!("IO-{n}"),
            employee_id: 0,
            product_batch_id: 1,
            warehouse_id: 1,
        })
        .collect();

    SeedSet {
        localities: vec![Locality {
            id: 1,
            locality_name: "Palermo".to_string(),
            province_name: "Buenos Aires".to_string(),
            country_name: "Argentina".to_string(),
        }],
        sellers: vec![Seller {
            id: 1,
            cid: 1,
            company_name: "Frigo SA".to_string(),
            address: "Av. Siempre Viva 742".to_string(),
            telephone: "555-0100".to_string(),
            locality_id: 1,
        }],
        buyers: vec![
            Buyer {
                id: 0,
                card_number_id: "B0".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Diaz".to_string(),
            },
            Buyer {
                id: 1,
                card_number_id: "B1".to_string(),
                first_name: "Luis".to_string(),
                last_name: "Paz".to_string(),
            },
        ],
        warehouses: vec![Warehouse {
            id: 1,
            warehouse_code: "W1".to_string(),
            address: "Dock 4".to_string(),
            telephone: "555-0200".to_string(),
            minimum_capacity: 10,
            minimum_temperature: -18.0,
        }],
        employees: vec![
            Employee {
                id: 0,
                card_number_id: "E1000".to_string(),
                first_name: "Maria".to_string(),
                last_name: "Lopez".to_string(),
                warehouse_id: 1,
            },
            Employee {
                id: 1,
                card_number_id: "E1001".to_string(),
                first_name: "Jorge".to_string(),
                last_name: "Ruiz".to_string(),
                warehouse_id: 1,
            },
        ],
        product_types: vec![ProductType {
            id: 1,
            description: "Frozen".to_string(),
        }],
        sections: vec![Section {
            id: 1,
            section_number: 1,
            current_temperature: 2.0,
            minimum_temperature: -5.0,
            current_capacity: 10,
            minimum_capacity: 5,
            maximum_capacity: 50,
            warehouse_id: 1,
            product_type_id: 1,
        }],
        products: vec![Product {
            id: 1,
            product_code: "P-1".to_string(),
            description: "Ice cream".to_string(),
            width: 1.0,
            height: 2.0,
            length: 3.0,
            net_weight: 0.5,
            expiration_rate: 0.1,
            recommended_freezing_temperature: -18.0,
            freezing_rate: 0.2,
            product_type_id: 1,
            seller_id: 1,
        }],
        product_records: vec![
            ProductRecord {
                id: 1,
                last_update_date: date("2023-01-01"),
                purchase_price: 10.0,
                sale_price: 15.0,
                product_id: 1,
            },
            ProductRecord {
                id: 2,
                last_update_date: date("2023-02-01"),
                purchase_price: 11.0,
                sale_price: 16.0,
                product_id: 1,
            },
        ],
        product_batches: vec![ProductBatch {
            id: 1,
            batch_number: 100,
            current_quantity: 7,
            current_temperature: 1.0,
            due_date: date("2024-01-01"),
            initial_quantity: 10,
            manufacturing_date: date("2023-06-01"),
            manufacturing_hour: 8,
            minimum_temperature: -2.0,
            product_id: 1,
            section_id: 1,
        }],
        carriers: Vec::new(),
        inbound_orders,
        purchase_orders,
    }
}

/// Router over an in-memory store holding [`seed`].
pub fn app() -> Router {
    build_router(AppState::new(Store::Memory(MemoryStore::from_seed(seed()))))
}

/// Sends one request and returns the status and the parsed body
/// (`Value::Null` when the body is empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// `causes[*].field` of an error body.
pub fn cause_fields(body: &Value) -> Vec<String> {
    body["causes"]
        .as_array()
        .map(|causes| {
            causes
                .iter()
                .filter_map(|c| c["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

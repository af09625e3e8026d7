#![allow(dead_code)]

use chrono::NaiveDate;
use wareflow_core::{
    Buyer, Carrier, Employee, InboundOrder, Locality, Product, ProductBatch, ProductRecord,
    ProductType, PurchaseOrder, Section, Seller, Warehouse,
};
use wareflow_db::{Database, DbConfig, MemoryStore, Repositories, SeedSet};

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub async fn sqlite() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Both stores, each holding `seed`.
pub async fn both_stores(seed: &SeedSet) -> (Database, Repositories, Repositories) {
    let db = sqlite().await;
    db.import_seed(seed).await.unwrap();
    let sqlite_repos = db.repositories();
    let memory_repos = Repositories::memory(&MemoryStore::from_seed(seed.clone()));
    (db, sqlite_repos, memory_repos)
}

pub fn locality(id: i64, name: &str) -> Locality {
    Locality {
        id,
        locality_name: name.to_string(),
        province_name: "Buenos Aires".to_string(),
        country_name: "Argentina".to_string(),
    }
}

pub fn seller(id: i64, cid: i64, locality_id: i64) -> Seller {
    Seller {
        id,
        cid,
        company_name: format!("Seller {cid}"),
        address: "Calle 1".to_string(),
        telephone: "555-0100".to_string(),
        locality_id,
    }
}

pub fn product(id: i64, code: &str, seller_id: i64, product_type_id: i64) -> Product {
    Product {
        id,
        product_code: code.to_string(),
        description: format!("Product {code}"),
        width: 1.0,
        height: 1.0,
        length: 1.0,
        net_weight: 1.0,
        expiration_rate: 0.0,
        recommended_freezing_temperature: -18.0,
        freezing_rate: 0.0,
        product_type_id,
        seller_id,
    }
}

/// A referentially complete set with uneven fan-out, including parents with
/// no children (locality 2, buyer 2, employee 2, section 2, product 2).
pub fn seed() -> SeedSet {
    let purchase_orders = (1..=6)
        .map(|n| PurchaseOrder {
            id: n,
            order_number: format!("PO-{n}"),
            order_date: date("2023-10-05"),
            tracking_code: format!("T-{n}"),
            buyer_id: if n <= 2 { 0 } else { 1 },
            product_record_id: 1,
        })
        .collect();

    SeedSet {
        localities: vec![locality(1, "Palermo"), locality(2, "Belgrano")],
        sellers: vec![seller(1, 10, 1), seller(2, 20, 1)],
        buyers: (0..=2)
            .map(|id| Buyer {
                id,
                card_number_id: format!("B{id}"),
                first_name: "Ana".to_string(),
                last_name: "Diaz".to_string(),
            })
            .collect(),
        warehouses: vec![Warehouse {
            id: 1,
            warehouse_code: "W1".to_string(),
            address: "Dock 4".to_string(),
            telephone: "555-0200".to_string(),
            minimum_capacity: 10,
            minimum_temperature: -18.0,
        }],
        employees: (0..=2)
            .map(|id| Employee {
                id,
                card_number_id: format!("E{id}"),
                first_name: "Jorge".to_string(),
                last_name: "Ruiz".to_string(),
                warehouse_id: 1,
            })
            .collect(),
        product_types: vec![ProductType {
            id: 1,
            description: "Frozen".to_string(),
        }],
        sections: (1..=2)
            .map(|id| Section {
                id,
                section_number: id,
                current_temperature: 2.0,
                minimum_temperature: -5.0,
                current_capacity: 10,
                minimum_capacity: 5,
                maximum_capacity: 50,
                warehouse_id: 1,
                product_type_id: 1,
            })
            .collect(),
        products: vec![product(1, "P-1", 1, 1), product(2, "P-2", 2, 1)],
        product_records: (1..=3)
            .map(|id| ProductRecord {
                id,
                last_update_date: date("2023-01-01"),
                purchase_price: 10.0,
                sale_price: 15.0,
                product_id: 1,
            })
            .collect(),
        product_batches: (1..=2)
            .map(|id| ProductBatch {
                id,
                batch_number: 100 + id,
                current_quantity: 4 * id,
                current_temperature: 1.0,
                due_date: date("2024-01-01"),
                initial_quantity: 10,
                manufacturing_date: date("2023-06-01"),
                manufacturing_hour: 8,
                minimum_temperature: -2.0,
                product_id: 1,
                section_id: 1,
            })
            .collect(),
        carriers: vec![Carrier {
            id: 1,
            cid: "C-1".to_string(),
            company_name: "Rapido".to_string(),
            address: "Ruta 3".to_string(),
            telephone: "555-0400".to_string(),
            locality_id: 1,
        }],
        inbound_orders: (1..=4)
            .map(|n| InboundOrder {
                id: n,
                order_date: date("2023-09-01"),
                order_number: format!("IO-{n}"),
                employee_id: if n == 1 { 0 } else { 1 },
                product_batch_id: 1,
                warehouse_id: 1,
            })
            .collect(),
        purchase_orders,
    }
}

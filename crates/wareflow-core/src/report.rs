//! # Report Rows
//!
//! Read-only aggregations keyed by one entity id.
//!
//! ```text
//! ┌──────────────────────────────┬─────────────┬──────────────────────────┐
//! │ Report                       │ Join        │ Aggregate                │
//! ├──────────────────────────────┼─────────────┼──────────────────────────┤
//! │ purchase orders per buyer    │ left        │ COUNT(purchase_orders)   │
//! │ inbound orders per employee  │ inner       │ COUNT(inbound_orders)    │
//! │ products per section         │ inner       │ SUM(current_quantity)    │
//! │ records per product          │ left        │ COUNT(product_records)   │
//! │ sellers per locality         │ left        │ COUNT(sellers)           │
//! │ carriers per locality        │ inner       │ COUNT(carriers)          │
//! └──────────────────────────────┴─────────────┴──────────────────────────┘
//! ```
//!
//! Inner-join reports omit zero rows from the list, but a lookup by id still
//! returns the row with a zero count. All lists are ordered by grouping id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BuyerPurchaseOrdersReport {
    pub buyer_id: i64,
    pub card_number_id: String,
    pub first_name: String,
    pub last_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct EmployeeInboundOrdersReport {
    pub employee_id: i64,
    pub card_number_id: String,
    pub first_name: String,
    pub last_name: String,
    pub warehouse_id: i64,
    pub inbound_orders_count: i64,
}

/// Sum of `current_quantity` over the section's batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SectionProductsReport {
    pub section_id: i64,
    pub section_number: i64,
    pub products_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductRecordsReport {
    pub product_id: i64,
    pub description: String,
    pub records_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LocalitySellersReport {
    pub locality_id: i64,
    pub locality_name: String,
    pub sellers_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LocalityCarriersReport {
    pub locality_id: i64,
    pub locality_name: String,
    pub carries_count: i64,
}

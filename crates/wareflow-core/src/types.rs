//! # Domain Types
//!
//! Entities persisted by Wareflow.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Reference Graph                                 │
//! │                                                                         │
//! │   Locality ◄── Seller ◄── Product ──► ProductType ◄── Section          │
//! │      ▲                      ▲  ▲                        │   ▲           │
//! │      │                      │  │                        ▼   │           │
//! │   Carrier        ProductRecord  ProductBatch ──────► Warehouse          │
//! │                      ▲               ▲                  ▲               │
//! │                      │               │                  │               │
//! │   Buyer ◄── PurchaseOrder      InboundOrder ──► Employee               │
//! │                                                                         │
//! │   Arrows point from the child (holder of `*_id`) to the parent.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has:
//! - `id`: integer assigned by the store on creation (0 is a legal seeded id)
//! - optionally a natural key (`cid`, `card_number_id`, `order_number`, ...)
//!   that must be unique among live rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Entity Kind
// =============================================================================

/// Every kind of entity the store knows about.
///
/// Used to tag `NotFound`, `InvalidReference` and `ReferencedByChild` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Seller,
    Buyer,
    Employee,
    Warehouse,
    Section,
    ProductType,
    Product,
    ProductRecord,
    ProductBatch,
    Locality,
    Carrier,
    InboundOrder,
    PurchaseOrder,
}

impl EntityKind {
    /// Human-readable name used in error messages ("buyer not found").
    pub const fn label(&self) -> &'static str {
        match self {
            EntityKind::Seller => "seller",
            EntityKind::Buyer => "buyer",
            EntityKind::Employee => "employee",
            EntityKind::Warehouse => "warehouse",
            EntityKind::Section => "section",
            EntityKind::ProductType => "product type",
            EntityKind::Product => "product",
            EntityKind::ProductRecord => "product record",
            EntityKind::ProductBatch => "product batch",
            EntityKind::Locality => "locality",
            EntityKind::Carrier => "carrier",
            EntityKind::InboundOrder => "inbound order",
            EntityKind::PurchaseOrder => "purchase order",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Natural Keys
// =============================================================================

/// Domain-meaningful unique identifiers.
///
/// A `Conflict` always names the key that collided, so the message can say
/// which field is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaturalKey {
    SellerCid,
    BuyerCardNumberId,
    EmployeeCardNumberId,
    WarehouseCode,
    SectionNumber,
    ProductCode,
    BatchNumber,
    CarrierCid,
    InboundOrderNumber,
    PurchaseOrderNumber,
    /// (locality_name, province_name, country_name), enforced by the store only.
    Locality,
}

impl NaturalKey {
    /// The entity this key belongs to.
    pub const fn entity(&self) -> EntityKind {
        match self {
            NaturalKey::SellerCid => EntityKind::Seller,
            NaturalKey::BuyerCardNumberId => EntityKind::Buyer,
            NaturalKey::EmployeeCardNumberId => EntityKind::Employee,
            NaturalKey::WarehouseCode => EntityKind::Warehouse,
            NaturalKey::SectionNumber => EntityKind::Section,
            NaturalKey::ProductCode => EntityKind::Product,
            NaturalKey::BatchNumber => EntityKind::ProductBatch,
            NaturalKey::CarrierCid => EntityKind::Carrier,
            NaturalKey::InboundOrderNumber => EntityKind::InboundOrder,
            NaturalKey::PurchaseOrderNumber => EntityKind::PurchaseOrder,
            NaturalKey::Locality => EntityKind::Locality,
        }
    }

    /// The message reported to clients on a collision.
    pub const fn conflict_message(&self) -> &'static str {
        match self {
            NaturalKey::SellerCid | NaturalKey::CarrierCid => "cid already in use",
            NaturalKey::BuyerCardNumberId | NaturalKey::EmployeeCardNumberId => {
                "card number id already in use"
            }
            NaturalKey::WarehouseCode => "warehouse code already in use",
            NaturalKey::SectionNumber => "section number already in use",
            NaturalKey::ProductCode => "product code already in use",
            NaturalKey::BatchNumber => "batch number already in use",
            NaturalKey::InboundOrderNumber | NaturalKey::PurchaseOrderNumber => {
                "order number already in use"
            }
            NaturalKey::Locality => "locality already exists",
        }
    }
}

// =============================================================================
// Entity Trait
// =============================================================================

/// Common identity behaviour shared by all persisted entities.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Which kind of entity this is.
    const KIND: EntityKind;

    /// Store-assigned identifier.
    fn id(&self) -> i64;

    /// Overwrites the identifier (used after `save` assigns one).
    fn set_id(&mut self, id: i64);
}

macro_rules! impl_entity {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$kind;

                #[inline]
                fn id(&self) -> i64 {
                    self.id
                }

                #[inline]
                fn set_id(&mut self, id: i64) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_entity! {
    Seller => Seller,
    Buyer => Buyer,
    Employee => Employee,
    Warehouse => Warehouse,
    Section => Section,
    ProductType => ProductType,
    Product => Product,
    ProductRecord => ProductRecord,
    ProductBatch => ProductBatch,
    Locality => Locality,
    Carrier => Carrier,
    InboundOrder => InboundOrder,
    PurchaseOrder => PurchaseOrder,
}

// =============================================================================
// Parties
// =============================================================================

/// A company that supplies products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Seller {
    pub id: i64,
    /// Company identifier - natural key.
    pub cid: i64,
    pub company_name: String,
    pub address: String,
    pub telephone: String,
    pub locality_id: i64,
}

/// A customer that places purchase orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Buyer {
    pub id: i64,
    /// Natural key.
    pub card_number_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// A warehouse worker. Receives inbound orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    pub id: i64,
    /// Natural key.
    pub card_number_id: String,
    pub first_name: String,
    pub last_name: String,
    pub warehouse_id: i64,
}

/// A shipping company operating from a locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Carrier {
    pub id: i64,
    /// Company identifier - natural key. Alphanumeric, unlike `Seller::cid`.
    pub cid: String,
    pub company_name: String,
    pub address: String,
    pub telephone: String,
    pub locality_id: i64,
}

/// A geographic locality. Unique by (name, province, country).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Locality {
    pub id: i64,
    pub locality_name: String,
    pub province_name: String,
    pub country_name: String,
}

// =============================================================================
// Storage
// =============================================================================

/// A physical warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Warehouse {
    pub id: i64,
    /// Natural key.
    pub warehouse_code: String,
    pub address: String,
    pub telephone: String,
    pub minimum_capacity: i64,
    pub minimum_temperature: f64,
}

/// A temperature-controlled section inside a warehouse.
///
/// ## Capacity Rules
/// ```text
/// 0 ≤ current_capacity ≤ maximum_capacity
/// 0 ≤ minimum_capacity ≤ maximum_capacity
/// minimum_temperature ≤ current_temperature
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Section {
    pub id: i64,
    /// Natural key.
    pub section_number: i64,
    pub current_temperature: f64,
    pub minimum_temperature: f64,
    pub current_capacity: i64,
    pub minimum_capacity: i64,
    pub maximum_capacity: i64,
    pub warehouse_id: i64,
    pub product_type_id: i64,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product category (frozen, refrigerated, dry...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductType {
    pub id: i64,
    pub description: String,
}

/// A product supplied by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    /// Natural key.
    pub product_code: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub net_weight: f64,
    pub expiration_rate: f64,
    pub recommended_freezing_temperature: f64,
    pub freezing_rate: f64,
    pub product_type_id: i64,
    pub seller_id: i64,
}

/// A price snapshot for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductRecord {
    pub id: i64,
    #[ts(as = "String")]
    pub last_update_date: NaiveDate,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub product_id: i64,
}

/// A batch of a product stored in a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductBatch {
    pub id: i64,
    /// Natural key.
    pub batch_number: i64,
    pub current_quantity: i64,
    pub current_temperature: f64,
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub initial_quantity: i64,
    #[ts(as = "String")]
    pub manufacturing_date: NaiveDate,
    /// Hour of the day (0-23).
    pub manufacturing_hour: i64,
    pub minimum_temperature: f64,
    pub product_id: i64,
    pub section_id: i64,
}

// =============================================================================
// Orders
// =============================================================================

/// A batch received into a warehouse by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InboundOrder {
    pub id: i64,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    /// Natural key.
    pub order_number: String,
    pub employee_id: i64,
    pub product_batch_id: i64,
    pub warehouse_id: i64,
}

/// A buyer's order for a priced product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseOrder {
    pub id: i64,
    /// Natural key.
    pub order_number: String,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    pub tracking_code: String,
    pub buyer_id: i64,
    pub product_record_id: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_labels() {
        assert_eq!(EntityKind::Buyer.to_string(), "buyer");
        assert_eq!(EntityKind::ProductType.to_string(), "product type");
        assert_eq!(EntityKind::PurchaseOrder.to_string(), "purchase order");
    }

    #[test]
    fn test_natural_key_messages() {
        assert_eq!(
            NaturalKey::EmployeeCardNumberId.conflict_message(),
            "card number id already in use"
        );
        assert_eq!(NaturalKey::SellerCid.entity(), EntityKind::Seller);
        assert_eq!(NaturalKey::BatchNumber.entity(), EntityKind::ProductBatch);
    }

    #[test]
    fn test_set_id() {
        let mut buyer = Buyer {
            id: 0,
            card_number_id: "B-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        buyer.set_id(42);
        assert_eq!(buyer.id(), 42);
        assert_eq!(Buyer::KIND, EntityKind::Buyer);
    }

    #[test]
    fn test_dates_serialize_as_iso() {
        let record = ProductRecord {
            id: 1,
            last_update_date: NaiveDate::from_ymd_opt(2023, 10, 5).unwrap(),
            purchase_price: 10.5,
            sale_price: 15.0,
            product_id: 3,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["last_update_date"], "2023-10-05");
    }
}

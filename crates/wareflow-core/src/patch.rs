//! # Patch Overlays
//!
//! Partial updates for the resources that support `PATCH`.
//!
//! ## Presence Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON body                 Field value         Effect                   │
//! │  ─────────────────────     ─────────────────   ──────────────────────   │
//! │  {}                        None                untouched                │
//! │  {"locality_id": 0}        Some(0)             set to 0 (legal id)      │
//! │  {"company_name": ""}      Some("")            untouched (blank)        │
//! │  {"company_name": "Acme"}  Some("Acme")        set                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Integers never use "zero means absent": presence is carried by `Option`.

use serde::Deserialize;
use ts_rs::TS;

use crate::types::{Buyer, Employee, Product, Section, Seller, Warehouse};

/// Overwrites `target` unless `value` is absent or blank.
fn set_text(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        if !value.trim().is_empty() {
            *target = value.clone();
        }
    }
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// =============================================================================
// Parties
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct SellerPatch {
    pub cid: Option<i64>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub locality_id: Option<i64>,
}

impl SellerPatch {
    /// True when applying the patch cannot change anything.
    pub fn is_empty(&self) -> bool {
        self.cid.is_none()
            && !has_text(&self.company_name)
            && !has_text(&self.address)
            && !has_text(&self.telephone)
            && self.locality_id.is_none()
    }

    pub fn apply_to(&self, seller: &mut Seller) {
        set(&mut seller.cid, self.cid);
        set_text(&mut seller.company_name, &self.company_name);
        set_text(&mut seller.address, &self.address);
        set_text(&mut seller.telephone, &self.telephone);
        set(&mut seller.locality_id, self.locality_id);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct BuyerPatch {
    pub card_number_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl BuyerPatch {
    pub fn is_empty(&self) -> bool {
        !has_text(&self.card_number_id) && !has_text(&self.first_name) && !has_text(&self.last_name)
    }

    pub fn apply_to(&self, buyer: &mut Buyer) {
        set_text(&mut buyer.card_number_id, &self.card_number_id);
        set_text(&mut buyer.first_name, &self.first_name);
        set_text(&mut buyer.last_name, &self.last_name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct EmployeePatch {
    pub card_number_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub warehouse_id: Option<i64>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        !has_text(&self.card_number_id)
            && !has_text(&self.first_name)
            && !has_text(&self.last_name)
            && self.warehouse_id.is_none()
    }

    pub fn apply_to(&self, employee: &mut Employee) {
        set_text(&mut employee.card_number_id, &self.card_number_id);
        set_text(&mut employee.first_name, &self.first_name);
        set_text(&mut employee.last_name, &self.last_name);
        set(&mut employee.warehouse_id, self.warehouse_id);
    }
}

// =============================================================================
// Storage
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct WarehousePatch {
    pub warehouse_code: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub minimum_capacity: Option<i64>,
    pub minimum_temperature: Option<f64>,
}

impl WarehousePatch {
    pub fn is_empty(&self) -> bool {
        !has_text(&self.warehouse_code)
            && !has_text(&self.address)
            && !has_text(&self.telephone)
            && self.minimum_capacity.is_none()
            && self.minimum_temperature.is_none()
    }

    pub fn apply_to(&self, warehouse: &mut Warehouse) {
        set_text(&mut warehouse.warehouse_code, &self.warehouse_code);
        set_text(&mut warehouse.address, &self.address);
        set_text(&mut warehouse.telephone, &self.telephone);
        set(&mut warehouse.minimum_capacity, self.minimum_capacity);
        set(&mut warehouse.minimum_temperature, self.minimum_temperature);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct SectionPatch {
    pub section_number: Option<i64>,
    pub current_temperature: Option<f64>,
    pub minimum_temperature: Option<f64>,
    pub current_capacity: Option<i64>,
    pub minimum_capacity: Option<i64>,
    pub maximum_capacity: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub product_type_id: Option<i64>,
}

impl SectionPatch {
    pub fn is_empty(&self) -> bool {
        self.section_number.is_none()
            && self.current_temperature.is_none()
            && self.minimum_temperature.is_none()
            && self.current_capacity.is_none()
            && self.minimum_capacity.is_none()
            && self.maximum_capacity.is_none()
            && self.warehouse_id.is_none()
            && self.product_type_id.is_none()
    }

    pub fn apply_to(&self, section: &mut Section) {
        set(&mut section.section_number, self.section_number);
        set(&mut section.current_temperature, self.current_temperature);
        set(&mut section.minimum_temperature, self.minimum_temperature);
        set(&mut section.current_capacity, self.current_capacity);
        set(&mut section.minimum_capacity, self.minimum_capacity);
        set(&mut section.maximum_capacity, self.maximum_capacity);
        set(&mut section.warehouse_id, self.warehouse_id);
        set(&mut section.product_type_id, self.product_type_id);
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub net_weight: Option<f64>,
    pub expiration_rate: Option<f64>,
    pub recommended_freezing_temperature: Option<f64>,
    pub freezing_rate: Option<f64>,
    pub product_type_id: Option<i64>,
    pub seller_id: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        !has_text(&self.product_code)
            && !has_text(&self.description)
            && self.width.is_none()
            && self.height.is_none()
            && self.length.is_none()
            && self.net_weight.is_none()
            && self.expiration_rate.is_none()
            && self.recommended_freezing_temperature.is_none()
            && self.freezing_rate.is_none()
            && self.product_type_id.is_none()
            && self.seller_id.is_none()
    }

    pub fn apply_to(&self, product: &mut Product) {
        set_text(&mut product.product_code, &self.product_code);
        set_text(&mut product.description, &self.description);
        set(&mut product.width, self.width);
        set(&mut product.height, self.height);
        set(&mut product.length, self.length);
        set(&mut product.net_weight, self.net_weight);
        set(&mut product.expiration_rate, self.expiration_rate);
        set(
            &mut product.recommended_freezing_temperature,
            self.recommended_freezing_temperature,
        );
        set(&mut product.freezing_rate, self.freezing_rate);
        set(&mut product.product_type_id, self.product_type_id);
        set(&mut product.seller_id, self.seller_id);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seller() -> Seller {
        Seller {
            id: 7,
            cid: 123,
            company_name: "Acme".to_string(),
            address: "Main St".to_string(),
            telephone: "555".to_string(),
            locality_id: 3,
        }
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let patch: SellerPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());

        let mut s = seller();
        patch.apply_to(&mut s);
        assert_eq!(s, seller());
    }

    #[test]
    fn test_zero_reference_is_present() {
        let patch: SellerPatch = serde_json::from_str(r#"{"locality_id": 0}"#).unwrap();
        assert!(!patch.is_empty());

        let mut s = seller();
        patch.apply_to(&mut s);
        assert_eq!(s.locality_id, 0);
        assert_eq!(s.company_name, "Acme");
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let patch: SellerPatch =
            serde_json::from_str(r#"{"company_name": "  ", "telephone": "999"}"#).unwrap();

        let mut s = seller();
        patch.apply_to(&mut s);
        assert_eq!(s.company_name, "Acme");
        assert_eq!(s.telephone, "999");

        let blank_only: BuyerPatch = serde_json::from_str(r#"{"first_name": ""}"#).unwrap();
        assert!(blank_only.is_empty());
    }

    #[test]
    fn test_patch_is_idempotent() {
        let patch = SectionPatch {
            current_capacity: Some(40),
            warehouse_id: Some(2),
            ..Default::default()
        };
        let mut section = Section {
            id: 1,
            section_number: 1,
            current_temperature: 1.0,
            minimum_temperature: 0.0,
            current_capacity: 10,
            minimum_capacity: 0,
            maximum_capacity: 100,
            warehouse_id: 1,
            product_type_id: 1,
        };
        patch.apply_to(&mut section);
        let once = section.clone();
        patch.apply_to(&mut section);
        assert_eq!(section, once);
        assert_eq!(section.current_capacity, 40);
        assert_eq!(section.warehouse_id, 2);
    }
}

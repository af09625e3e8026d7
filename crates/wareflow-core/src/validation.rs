//! # Validation Module
//!
//! Field-level validation for Wareflow entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API request DTO (apps/api)                                   │
//! │  ├── JSON syntax / types (serde)            → 400                       │
//! │  └── Presence + date parsing (Validator)    → 422                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain service                                               │
//! │  └── THIS MODULE: ranges, ordering, non-blank text → 422               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  ├── UNIQUE constraints                     → 409                       │
//! │  └── FOREIGN KEY constraints                → 404 / 409                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators never stop at the first failure: a [`Validator`] accumulates
//! every problem so the client sees all offending fields at once.
//!
//! ## Usage
//! ```rust
//! use wareflow_core::validation::Validator;
//!
//! let mut v = Validator::new();
//! let order_number = v.required_text("order_number", None);
//! let buyer_id: i64 = v.required("buyer_id", None);
//! let errors = v.finish().unwrap_err();
//!
//! assert_eq!(order_number, "");
//! assert_eq!(buyer_id, 0);
//! assert_eq!(errors.fields(), vec!["order_number", "buyer_id"]);
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationErrors};
use crate::types::{
    Buyer, Carrier, Employee, InboundOrder, Locality, Product, ProductBatch, ProductRecord,
    ProductType, PurchaseOrder, Section, Seller, Warehouse,
};

/// Date format used on the wire and in seed files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

// =============================================================================
// Accumulating Validator
// =============================================================================

/// Collects validation failures across a whole payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Unwraps a required value, recording `Required` when absent.
    ///
    /// Returns `T::default()` as a placeholder so callers can keep building
    /// the entity and report every missing field in one pass.
    pub fn required<T: Default>(&mut self, field: &str, value: Option<T>) -> T {
        match value {
            Some(value) => value,
            None => {
                self.push(required(field));
                T::default()
            }
        }
    }

    /// Like [`Validator::required`], but a blank string also counts as missing.
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                self.push(required(field));
                String::new()
            }
        }
    }

    /// Requires an ISO-8601 date string and parses it.
    pub fn required_date(&mut self, field: &str, value: Option<String>) -> NaiveDate {
        let raw = self.required_text(field, value);
        if raw.is_empty() {
            return NaiveDate::MIN;
        }
        match parse_date(field, &raw) {
            Ok(date) => date,
            Err(err) => {
                self.push(err);
                NaiveDate::MIN
            }
        }
    }

    /// Text must contain something other than whitespace.
    pub fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(required(field));
        }
    }

    pub fn positive(&mut self, field: &str, value: i64) {
        if value <= 0 {
            self.push(ValidationError::MustBePositive {
                field: field.to_string(),
            });
        }
    }

    pub fn positive_f64(&mut self, field: &str, value: f64) {
        if !(value > 0.0) {
            self.push(ValidationError::MustBePositive {
                field: field.to_string(),
            });
        }
    }

    pub fn non_negative(&mut self, field: &str, value: i64) {
        if value < 0 {
            self.push(ValidationError::MustNotBeNegative {
                field: field.to_string(),
            });
        }
    }

    pub fn non_negative_f64(&mut self, field: &str, value: f64) {
        if !(value >= 0.0) {
            self.push(ValidationError::MustNotBeNegative {
                field: field.to_string(),
            });
        }
    }

    pub fn in_range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min || value > max {
            self.push(ValidationError::OutOfRange {
                field: field.to_string(),
                min,
                max,
            });
        }
    }

    /// `value ≤ limit`, where `limit` is another field of the payload.
    pub fn at_most<T: PartialOrd>(&mut self, field: &str, value: T, limit_field: &str, limit: T) {
        if value > limit {
            self.push(ValidationError::Exceeds {
                field: field.to_string(),
                limit: limit_field.to_string(),
            });
        }
    }

    /// `value ≥ floor`, where `floor` is another field of the payload.
    pub fn at_least<T: PartialOrd>(&mut self, field: &str, value: T, floor_field: &str, floor: T) {
        if value < floor {
            self.push(ValidationError::Below {
                field: field.to_string(),
                floor: floor_field.to_string(),
            });
        }
    }

    /// Ok when nothing failed, otherwise every recorded failure.
    pub fn finish(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

// =============================================================================
// Parties
// =============================================================================

/// ## Rules
/// - `cid` > 0
/// - company name, address, telephone not blank
pub fn validate_seller(seller: &Seller) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.positive("cid", seller.cid);
    v.not_blank("company_name", &seller.company_name);
    v.not_blank("address", &seller.address);
    v.not_blank("telephone", &seller.telephone);
    v.finish()
}

pub fn validate_buyer(buyer: &Buyer) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("card_number_id", &buyer.card_number_id);
    v.not_blank("first_name", &buyer.first_name);
    v.not_blank("last_name", &buyer.last_name);
    v.finish()
}

pub fn validate_employee(employee: &Employee) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("card_number_id", &employee.card_number_id);
    v.not_blank("first_name", &employee.first_name);
    v.not_blank("last_name", &employee.last_name);
    v.finish()
}

pub fn validate_carrier(carrier: &Carrier) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("cid", &carrier.cid);
    v.not_blank("company_name", &carrier.company_name);
    v.not_blank("address", &carrier.address);
    v.not_blank("telephone", &carrier.telephone);
    v.finish()
}

pub fn validate_locality(locality: &Locality) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("locality_name", &locality.locality_name);
    v.not_blank("province_name", &locality.province_name);
    v.not_blank("country_name", &locality.country_name);
    v.finish()
}

// =============================================================================
// Storage
// =============================================================================

pub fn validate_warehouse(warehouse: &Warehouse) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("warehouse_code", &warehouse.warehouse_code);
    v.not_blank("address", &warehouse.address);
    v.not_blank("telephone", &warehouse.telephone);
    v.non_negative("minimum_capacity", warehouse.minimum_capacity);
    v.finish()
}

/// Validates a section.
///
/// ## Rules
/// ```text
/// section_number > 0
/// 0 ≤ current_capacity ≤ maximum_capacity
/// 0 ≤ minimum_capacity ≤ maximum_capacity
/// minimum_temperature ≤ current_temperature
/// ```
pub fn validate_section(section: &Section) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.positive("section_number", section.section_number);
    v.non_negative("current_capacity", section.current_capacity);
    v.non_negative("minimum_capacity", section.minimum_capacity);
    v.non_negative("maximum_capacity", section.maximum_capacity);
    v.at_most(
        "current_capacity",
        section.current_capacity,
        "maximum_capacity",
        section.maximum_capacity,
    );
    v.at_most(
        "minimum_capacity",
        section.minimum_capacity,
        "maximum_capacity",
        section.maximum_capacity,
    );
    v.at_least(
        "current_temperature",
        section.current_temperature,
        "minimum_temperature",
        section.minimum_temperature,
    );
    v.finish()
}

// =============================================================================
// Catalog
// =============================================================================

pub fn validate_product_type(product_type: &ProductType) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("description", &product_type.description);
    v.finish()
}

/// Validates a product.
///
/// ## Rules
/// - code and description not blank
/// - width, height, length, net weight > 0
/// - expiration and freezing rates ≥ 0
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("product_code", &product.product_code);
    v.not_blank("description", &product.description);
    v.positive_f64("width", product.width);
    v.positive_f64("height", product.height);
    v.positive_f64("length", product.length);
    v.positive_f64("net_weight", product.net_weight);
    v.non_negative_f64("expiration_rate", product.expiration_rate);
    v.non_negative_f64("freezing_rate", product.freezing_rate);
    v.finish()
}

pub fn validate_product_record(record: &ProductRecord) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.non_negative_f64("purchase_price", record.purchase_price);
    v.non_negative_f64("sale_price", record.sale_price);
    v.finish()
}

/// Validates a product batch.
///
/// ## Rules
/// ```text
/// batch_number > 0
/// current_quantity ≥ 0, initial_quantity ≥ 0
/// 0 ≤ manufacturing_hour ≤ 23
/// minimum_temperature ≤ current_temperature
/// manufacturing_date ≤ due_date
/// ```
pub fn validate_product_batch(batch: &ProductBatch) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.positive("batch_number", batch.batch_number);
    v.non_negative("current_quantity", batch.current_quantity);
    v.non_negative("initial_quantity", batch.initial_quantity);
    v.in_range("manufacturing_hour", batch.manufacturing_hour, 0, 23);
    v.at_least(
        "current_temperature",
        batch.current_temperature,
        "minimum_temperature",
        batch.minimum_temperature,
    );
    v.at_least(
        "due_date",
        batch.due_date,
        "manufacturing_date",
        batch.manufacturing_date,
    );
    v.finish()
}

// =============================================================================
// Orders
// =============================================================================

pub fn validate_inbound_order(order: &InboundOrder) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("order_number", &order.order_number);
    v.finish()
}

pub fn validate_purchase_order(order: &PurchaseOrder) -> ValidationResult<()> {
    let mut v = Validator::new();
    v.not_blank("order_number", &order.order_number);
    v.not_blank("tracking_code", &order.tracking_code);
    v.finish()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn section() -> Section {
        Section {
            id: 1,
            section_number: 10,
            current_temperature: 5.0,
            minimum_temperature: 2.0,
            current_capacity: 50,
            minimum_capacity: 10,
            maximum_capacity: 100,
            warehouse_id: 1,
            product_type_id: 1,
        }
    }

    fn batch() -> ProductBatch {
        ProductBatch {
            id: 1,
            batch_number: 111,
            current_quantity: 200,
            current_temperature: 20.0,
            due_date: date(2024, 4, 4),
            initial_quantity: 200,
            manufacturing_date: date(2024, 1, 1),
            manufacturing_hour: 10,
            minimum_temperature: -5.0,
            product_id: 1,
            section_id: 1,
        }
    }

    #[test]
    fn test_validator_reports_every_missing_field() {
        let mut v = Validator::new();
        let _ = v.required_text("order_number", None);
        let _ = v.required_date("order_date", Some("2023-10-05".to_string()));
        let _ = v.required_text("tracking_code", Some("   ".to_string()));
        let _: i64 = v.required("buyer_id", None);
        let _: i64 = v.required("product_record_id", None);

        let errors = v.finish().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["order_number", "tracking_code", "buyer_id", "product_record_id"]
        );
    }

    #[test]
    fn test_required_accepts_zero_id() {
        let mut v = Validator::new();
        let id: i64 = v.required("buyer_id", Some(0));
        assert_eq!(id, 0);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_required_date_rejects_bad_format() {
        let mut v = Validator::new();
        let parsed = v.required_date("order_date", Some("05/10/2023".to_string()));
        assert_eq!(parsed, NaiveDate::MIN);

        let errors = v.finish().unwrap_err();
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::InvalidFormat { field, .. }) if field == "order_date"
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("d", "2023-10-05").unwrap(), date(2023, 10, 5));
        assert!(parse_date("d", "2023-13-05").is_err());
        assert!(parse_date("d", "yesterday").is_err());
    }

    #[test]
    fn test_validate_section() {
        assert!(validate_section(&section()).is_ok());

        let mut over = section();
        over.current_capacity = 101;
        assert_eq!(
            validate_section(&over).unwrap_err().fields(),
            vec!["current_capacity"]
        );

        let mut cold = section();
        cold.current_temperature = 1.0;
        assert_eq!(
            validate_section(&cold).unwrap_err().fields(),
            vec!["current_temperature"]
        );

        let mut inverted = section();
        inverted.minimum_capacity = 200;
        assert!(validate_section(&inverted).is_err());

        let mut negative = section();
        negative.current_capacity = -1;
        assert!(validate_section(&negative).is_err());
    }

    #[test]
    fn test_validate_product_batch() {
        assert!(validate_product_batch(&batch()).is_ok());

        let mut late = batch();
        late.manufacturing_hour = 24;
        assert_eq!(
            validate_product_batch(&late).unwrap_err().fields(),
            vec!["manufacturing_hour"]
        );

        let mut expired = batch();
        expired.due_date = date(2023, 12, 31);
        assert_eq!(
            validate_product_batch(&expired).unwrap_err().fields(),
            vec!["due_date"]
        );
    }

    #[test]
    fn test_validate_product_dimensions() {
        let product = Product {
            id: 1,
            product_code: "P-1".to_string(),
            description: "Frozen peas".to_string(),
            width: 1.0,
            height: 0.0,
            length: 1.0,
            net_weight: -1.0,
            expiration_rate: 0.0,
            recommended_freezing_temperature: -18.0,
            freezing_rate: 1.0,
            product_type_id: 1,
            seller_id: 1,
        };
        assert_eq!(
            validate_product(&product).unwrap_err().fields(),
            vec!["height", "net_weight"]
        );
    }

    #[test]
    fn test_validate_seller_cid() {
        let seller = Seller {
            id: 1,
            cid: 0,
            company_name: "Acme".to_string(),
            address: "X".to_string(),
            telephone: " ".to_string(),
            locality_id: 1,
        };
        assert_eq!(
            validate_seller(&seller).unwrap_err().fields(),
            vec!["cid", "telephone"]
        );
    }
}

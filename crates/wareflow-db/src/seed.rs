//! # Seed Loader
//!
//! Reads the JSON seed set: one array file per entity.
//!
//! ## Layout
//! ```text
//! db/
//! ├── localities.json        ├── sections.json
//! ├── sellers.json           ├── products.json
//! ├── buyers.json            ├── product_records.json
//! ├── warehouses.json        ├── product_batches.json
//! ├── employees.json         ├── carriers.json
//! ├── product_type.json *    ├── inbound_orders.json
//! │                          └── purchase_orders.json
//! │
//! └── * created as `[]` when missing; every other file is mandatory
//! ```
//!
//! Rows keep the ids written in the files. The same [`SeedSet`] feeds both the
//! in-memory store and the SQLite import, so both stores start identical.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use wareflow_core::{
    Buyer, Carrier, Employee, InboundOrder, Locality, Product, ProductBatch, ProductRecord,
    ProductType, PurchaseOrder, Section, Seller, Warehouse,
};

use crate::error::{DbError, DbResult};

/// The one seed file that is created on demand.
pub const PRODUCT_TYPE_FILE: &str = "product_type.json";

/// Every entity's seed rows.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    pub localities: Vec<Locality>,
    pub sellers: Vec<Seller>,
    pub buyers: Vec<Buyer>,
    pub warehouses: Vec<Warehouse>,
    pub employees: Vec<Employee>,
    pub product_types: Vec<ProductType>,
    pub sections: Vec<Section>,
    pub products: Vec<Product>,
    pub product_records: Vec<ProductRecord>,
    pub product_batches: Vec<ProductBatch>,
    pub carriers: Vec<Carrier>,
    pub inbound_orders: Vec<InboundOrder>,
    pub purchase_orders: Vec<PurchaseOrder>,
}

impl SeedSet {
    /// Loads every seed file under `dir`.
    ///
    /// ## Errors
    /// - `SeedLoad` when a mandatory file is missing or not a JSON array of
    ///   the expected shape
    /// - `SeedLoad` when `product_type.json` is missing and cannot be created
    pub fn load(dir: impl AsRef<Path>) -> DbResult<Self> {
        let dir = dir.as_ref();
        info!(dir = %dir.display(), "Loading seed files");

        ensure_product_types(dir)?;

        let seed = SeedSet {
            localities: read_file(dir, "localities.json")?,
            sellers: read_file(dir, "sellers.json")?,
            buyers: read_file(dir, "buyers.json")?,
            warehouses: read_file(dir, "warehouses.json")?,
            employees: read_file(dir, "employees.json")?,
            product_types: read_file(dir, PRODUCT_TYPE_FILE)?,
            sections: read_file(dir, "sections.json")?,
            products: read_file(dir, "products.json")?,
            product_records: read_file(dir, "product_records.json")?,
            product_batches: read_file(dir, "product_batches.json")?,
            carriers: read_file(dir, "carriers.json")?,
            inbound_orders: read_file(dir, "inbound_orders.json")?,
            purchase_orders: read_file(dir, "purchase_orders.json")?,
        };

        info!(rows = seed.total_rows(), "Seed files loaded");
        Ok(seed)
    }

    /// Number of rows across all entities.
    pub fn total_rows(&self) -> usize {
        self.localities.len()
            + self.sellers.len()
            + self.buyers.len()
            + self.warehouses.len()
            + self.employees.len()
            + self.product_types.len()
            + self.sections.len()
            + self.products.len()
            + self.product_records.len()
            + self.product_batches.len()
            + self.carriers.len()
            + self.inbound_orders.len()
            + self.purchase_orders.len()
    }
}

fn ensure_product_types(dir: &Path) -> DbResult<()> {
    let path = dir.join(PRODUCT_TYPE_FILE);
    if path.exists() {
        return Ok(());
    }
    warn!(path = %path.display(), "Product type seed missing, creating an empty one");
    fs::write(&path, "[]").map_err(|e| DbError::seed(&path, e))
}

fn read_file<T: DeserializeOwned>(dir: &Path, name: &str) -> DbResult<Vec<T>> {
    let path = dir.join(name);
    let raw = fs::read_to_string(&path).map_err(|e| DbError::seed(&path, e))?;
    let rows: Vec<T> = serde_json::from_str(&raw).map_err(|e| DbError::seed(&path, e))?;
    debug!(file = name, count = rows.len(), "Read seed file");
    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FILES: &[&str] = &[
        "localities.json",
        "sellers.json",
        "buyers.json",
        "warehouses.json",
        "employees.json",
        "sections.json",
        "products.json",
        "product_records.json",
        "product_batches.json",
        "carriers.json",
        "inbound_orders.json",
        "purchase_orders.json",
    ];

    fn write_empty_set(dir: &Path) {
        for file in FILES {
            fs::write(dir.join(file), "[]").unwrap();
        }
    }

    #[test]
    fn test_missing_product_types_are_created() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_set(dir.path());

        let seed = SeedSet::load(dir.path()).unwrap();
        assert_eq!(seed.total_rows(), 0);
        assert_eq!(
            fs::read_to_string(dir.path().join(PRODUCT_TYPE_FILE)).unwrap(),
            "[]"
        );
    }

    #[test]
    fn test_missing_mandatory_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_set(dir.path());
        fs::remove_file(dir.path().join("buyers.json")).unwrap();

        let err = SeedSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, DbError::SeedLoad { ref path, .. } if path.ends_with("buyers.json")));
    }

    #[test]
    fn test_rows_keep_their_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_set(dir.path());
        fs::write(
            dir.path().join("buyers.json"),
            r#"[{"id": 0, "card_number_id": "B0", "first_name": "Ada", "last_name": "L"},
                {"id": 7, "card_number_id": "B7", "first_name": "Alan", "last_name": "T"}]"#,
        )
        .unwrap();

        let seed = SeedSet::load(dir.path()).unwrap();
        let ids: Vec<i64> = seed.buyers.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 7]);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_empty_set(dir.path());
        fs::write(dir.path().join("sellers.json"), r#"{"not": "an array"}"#).unwrap();

        assert!(matches!(
            SeedSet::load(dir.path()),
            Err(DbError::SeedLoad { .. })
        ));
    }
}

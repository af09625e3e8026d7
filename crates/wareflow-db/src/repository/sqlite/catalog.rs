//! SQLite mapping for product types, products, records and batches.

use async_trait::async_trait;
use wareflow_core::{
    EntityKind, Product, ProductBatch, ProductRecord, ProductRecordsReport, ProductType,
};

use super::{ForeignKey, SqliteEntity, SqliteQuery, SqliteRepository};
use crate::error::DbResult;
use crate::repository::{
    ProductBatchRepository, ProductRecordRepository, ProductRepository, ProductTypeRepository,
};

pub type SqliteProductTypeRepository = SqliteRepository<ProductType>;
pub type SqliteProductRepository = SqliteRepository<Product>;
pub type SqliteProductRecordRepository = SqliteRepository<ProductRecord>;
pub type SqliteProductBatchRepository = SqliteRepository<ProductBatch>;

const REPORT_RECORDS: &str = r#"
    SELECT p.id AS product_id,
           p.description,
           COUNT(pr.id) AS records_count
    FROM products p
    LEFT JOIN product_records pr ON pr.product_id = p.id
    WHERE ?1 IS NULL OR p.id = ?1
    GROUP BY p.id
    ORDER BY p.id
"#;

// =============================================================================
// Product Type
// =============================================================================

impl SqliteEntity for ProductType {
    const TABLE: &'static str = "product_types";
    const COLUMNS: &'static [&'static str] = &["description"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.description.as_str())
    }
}

impl ProductTypeRepository for SqliteProductTypeRepository {}

// =============================================================================
// Product
// =============================================================================

impl SqliteEntity for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "product_code",
        "description",
        "width",
        "height",
        "length",
        "net_weight",
        "expiration_rate",
        "recommended_freezing_temperature",
        "freezing_rate",
        "product_type_id",
        "seller_id",
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.product_code.as_str())
            .bind(self.description.as_str())
            .bind(self.width)
            .bind(self.height)
            .bind(self.length)
            .bind(self.net_weight)
            .bind(self.expiration_rate)
            .bind(self.recommended_freezing_temperature)
            .bind(self.freezing_rate)
            .bind(self.product_type_id)
            .bind(self.seller_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(EntityKind::Seller, "sellers", self.seller_id),
            ForeignKey::new(EntityKind::ProductType, "product_types", self.product_type_id),
        ]
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn find_by_code(&self, product_code: &str) -> DbResult<Option<Product>> {
        self.find_one_by_text("product_code", product_code).await
    }

    async fn report_records(&self, id: Option<i64>) -> DbResult<Vec<ProductRecordsReport>> {
        self.report(REPORT_RECORDS, id).await
    }
}

// =============================================================================
// Product Record
// =============================================================================

impl SqliteEntity for ProductRecord {
    const TABLE: &'static str = "product_records";
    const COLUMNS: &'static [&'static str] =
        &["last_update_date", "purchase_price", "sale_price", "product_id"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.last_update_date)
            .bind(self.purchase_price)
            .bind(self.sale_price)
            .bind(self.product_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::new(EntityKind::Product, "products", self.product_id)]
    }
}

impl ProductRecordRepository for SqliteProductRecordRepository {}

// =============================================================================
// Product Batch
// =============================================================================

impl SqliteEntity for ProductBatch {
    const TABLE: &'static str = "product_batches";
    const COLUMNS: &'static [&'static str] = &[
        "batch_number",
        "current_quantity",
        "current_temperature",
        "due_date",
        "initial_quantity",
        "manufacturing_date",
        "manufacturing_hour",
        "minimum_temperature",
        "product_id",
        "section_id",
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.batch_number)
            .bind(self.current_quantity)
            .bind(self.current_temperature)
            .bind(self.due_date)
            .bind(self.initial_quantity)
            .bind(self.manufacturing_date)
            .bind(self.manufacturing_hour)
            .bind(self.minimum_temperature)
            .bind(self.product_id)
            .bind(self.section_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(EntityKind::Product, "products", self.product_id),
            ForeignKey::new(EntityKind::Section, "sections", self.section_id),
        ]
    }
}

#[async_trait]
impl ProductBatchRepository for SqliteProductBatchRepository {
    async fn find_by_batch_number(&self, batch_number: i64) -> DbResult<Option<ProductBatch>> {
        self.find_one_by_int("batch_number", batch_number).await
    }
}

//! SQLite mapping for warehouses and sections.

use async_trait::async_trait;
use wareflow_core::{EntityKind, Section, SectionProductsReport, Warehouse};

use super::{ForeignKey, SqliteEntity, SqliteQuery, SqliteRepository};
use crate::error::DbResult;
use crate::repository::{SectionRepository, WarehouseRepository};

pub type SqliteWarehouseRepository = SqliteRepository<Warehouse>;
pub type SqliteSectionRepository = SqliteRepository<Section>;

/// Sum of batch quantities per section. Sections without batches only show
/// up when asked for by id.
const REPORT_PRODUCTS: &str = r#"
    SELECT s.id AS section_id,
           s.section_number,
           COALESCE(SUM(pb.current_quantity), 0) AS products_count
    FROM sections s
    LEFT JOIN product_batches pb ON pb.section_id = s.id
    WHERE ?1 IS NULL OR s.id = ?1
    GROUP BY s.id
    HAVING ?1 IS NOT NULL OR COUNT(pb.id) > 0
    ORDER BY s.id
"#;

impl SqliteEntity for Warehouse {
    const TABLE: &'static str = "warehouses";
    const COLUMNS: &'static [&'static str] = &[
        "warehouse_code",
        "address",
        "telephone",
        "minimum_capacity",
        "minimum_temperature",
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.warehouse_code.as_str())
            .bind(self.address.as_str())
            .bind(self.telephone.as_str())
            .bind(self.minimum_capacity)
            .bind(self.minimum_temperature)
    }
}

#[async_trait]
impl WarehouseRepository for SqliteWarehouseRepository {
    async fn find_by_code(&self, warehouse_code: &str) -> DbResult<Option<Warehouse>> {
        self.find_one_by_text("warehouse_code", warehouse_code).await
    }
}

impl SqliteEntity for Section {
    const TABLE: &'static str = "sections";
    const COLUMNS: &'static [&'static str] = &[
        "section_number",
        "current_temperature",
        "minimum_temperature",
        "current_capacity",
        "minimum_capacity",
        "maximum_capacity",
        "warehouse_id",
        "product_type_id",
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.section_number)
            .bind(self.current_temperature)
            .bind(self.minimum_temperature)
            .bind(self.current_capacity)
            .bind(self.minimum_capacity)
            .bind(self.maximum_capacity)
            .bind(self.warehouse_id)
            .bind(self.product_type_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(EntityKind::Warehouse, "warehouses", self.warehouse_id),
            ForeignKey::new(EntityKind::ProductType, "product_types", self.product_type_id),
        ]
    }
}

#[async_trait]
impl SectionRepository for SqliteSectionRepository {
    async fn find_by_section_number(&self, section_number: i64) -> DbResult<Option<Section>> {
        self.find_one_by_int("section_number", section_number).await
    }

    async fn report_products(&self, id: Option<i64>) -> DbResult<Vec<SectionProductsReport>> {
        self.report(REPORT_PRODUCTS, id).await
    }
}

//! SQLite mapping for sellers, buyers, employees, carriers and localities.

use async_trait::async_trait;
use wareflow_core::{
    Buyer, BuyerPurchaseOrdersReport, Carrier, Employee, EmployeeInboundOrdersReport, EntityKind,
    Locality, LocalityCarriersReport, LocalitySellersReport, Seller,
};

use super::{ForeignKey, SqliteEntity, SqliteQuery, SqliteRepository};
use crate::error::DbResult;
use crate::repository::{
    BuyerRepository, CarrierRepository, EmployeeRepository, LocalityRepository, SellerRepository,
};

pub type SqliteSellerRepository = SqliteRepository<Seller>;
pub type SqliteBuyerRepository = SqliteRepository<Buyer>;
pub type SqliteEmployeeRepository = SqliteRepository<Employee>;
pub type SqliteCarrierRepository = SqliteRepository<Carrier>;
pub type SqliteLocalityRepository = SqliteRepository<Locality>;

// =============================================================================
// Report SQL
// =============================================================================
// `?1` is the optional id filter. Left-join reports keep zero rows;
// inner-join reports drop them from the list but keep them for a lookup by id
// (the HAVING clause only filters when no id was given).

const REPORT_PURCHASE_ORDERS: &str = r#"
    SELECT b.id AS buyer_id,
           b.card_number_id,
           b.first_name,
           b.last_name,
           COUNT(po.id) AS count
    FROM buyers b
    LEFT JOIN purchase_orders po ON po.buyer_id = b.id
    WHERE ?1 IS NULL OR b.id = ?1
    GROUP BY b.id
    ORDER BY b.id
"#;

const REPORT_INBOUND_ORDERS: &str = r#"
    SELECT e.id AS employee_id,
           e.card_number_id,
           e.first_name,
           e.last_name,
           e.warehouse_id,
           COUNT(io.id) AS inbound_orders_count
    FROM employees e
    LEFT JOIN inbound_orders io ON io.employee_id = e.id
    WHERE ?1 IS NULL OR e.id = ?1
    GROUP BY e.id
    HAVING ?1 IS NOT NULL OR COUNT(io.id) > 0
    ORDER BY e.id
"#;

const REPORT_SELLERS: &str = r#"
    SELECT l.id AS locality_id,
           l.locality_name,
           COUNT(s.id) AS sellers_count
    FROM localities l
    LEFT JOIN sellers s ON s.locality_id = l.id
    WHERE ?1 IS NULL OR l.id = ?1
    GROUP BY l.id
    ORDER BY l.id
"#;

const REPORT_CARRIERS: &str = r#"
    SELECT l.id AS locality_id,
           l.locality_name,
           COUNT(c.id) AS carries_count
    FROM localities l
    LEFT JOIN carriers c ON c.locality_id = l.id
    WHERE ?1 IS NULL OR l.id = ?1
    GROUP BY l.id
    HAVING ?1 IS NOT NULL OR COUNT(c.id) > 0
    ORDER BY l.id
"#;

// =============================================================================
// Seller
// =============================================================================

impl SqliteEntity for Seller {
    const TABLE: &'static str = "sellers";
    const COLUMNS: &'static [&'static str] =
        &["cid", "company_name", "address", "telephone", "locality_id"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.cid)
            .bind(self.company_name.as_str())
            .bind(self.address.as_str())
            .bind(self.telephone.as_str())
            .bind(self.locality_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::new(EntityKind::Locality, "localities", self.locality_id)]
    }
}

#[async_trait]
impl SellerRepository for SqliteSellerRepository {
    async fn find_by_cid(&self, cid: i64) -> DbResult<Option<Seller>> {
        self.find_one_by_int("cid", cid).await
    }
}

// =============================================================================
// Buyer
// =============================================================================

impl SqliteEntity for Buyer {
    const TABLE: &'static str = "buyers";
    const COLUMNS: &'static [&'static str] = &["card_number_id", "first_name", "last_name"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.card_number_id.as_str())
            .bind(self.first_name.as_str())
            .bind(self.last_name.as_str())
    }
}

#[async_trait]
impl BuyerRepository for SqliteBuyerRepository {
    async fn find_by_card_number_id(&self, card_number_id: &str) -> DbResult<Option<Buyer>> {
        self.find_one_by_text("card_number_id", card_number_id).await
    }

    async fn report_purchase_orders(
        &self,
        id: Option<i64>,
    ) -> DbResult<Vec<BuyerPurchaseOrdersReport>> {
        self.report(REPORT_PURCHASE_ORDERS, id).await
    }
}

// =============================================================================
// Employee
// =============================================================================

impl SqliteEntity for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] =
        &["card_number_id", "first_name", "last_name", "warehouse_id"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.card_number_id.as_str())
            .bind(self.first_name.as_str())
            .bind(self.last_name.as_str())
            .bind(self.warehouse_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::new(EntityKind::Warehouse, "warehouses", self.warehouse_id)]
    }
}

#[async_trait]
impl EmployeeRepository for SqliteEmployeeRepository {
    async fn find_by_card_number_id(&self, card_number_id: &str) -> DbResult<Option<Employee>> {
        self.find_one_by_text("card_number_id", card_number_id).await
    }

    async fn report_inbound_orders(
        &self,
        id: Option<i64>,
    ) -> DbResult<Vec<EmployeeInboundOrdersReport>> {
        self.report(REPORT_INBOUND_ORDERS, id).await
    }
}

// =============================================================================
// Carrier
// =============================================================================

impl SqliteEntity for Carrier {
    const TABLE: &'static str = "carriers";
    const COLUMNS: &'static [&'static str] =
        &["cid", "company_name", "address", "telephone", "locality_id"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.cid.as_str())
            .bind(self.company_name.as_str())
            .bind(self.address.as_str())
            .bind(self.telephone.as_str())
            .bind(self.locality_id)
    }

    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::new(EntityKind::Locality, "localities", self.locality_id)]
    }
}

#[async_trait]
impl CarrierRepository for SqliteCarrierRepository {
    async fn find_by_cid(&self, cid: &str) -> DbResult<Option<Carrier>> {
        self.find_one_by_text("cid", cid).await
    }
}

// =============================================================================
// Locality
// =============================================================================

impl SqliteEntity for Locality {
    const TABLE: &'static str = "localities";
    const COLUMNS: &'static [&'static str] = &["locality_name", "province_name", "country_name"];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.locality_name.as_str())
            .bind(self.province_name.as_str())
            .bind(self.country_name.as_str())
    }
}

#[async_trait]
impl LocalityRepository for SqliteLocalityRepository {
    async fn report_sellers(&self, id: Option<i64>) -> DbResult<Vec<LocalitySellersReport>> {
        self.report(REPORT_SELLERS, id).await
    }

    async fn report_carriers(&self, id: Option<i64>) -> DbResult<Vec<LocalityCarriersReport>> {
        self.report(REPORT_CARRIERS, id).await
    }
}

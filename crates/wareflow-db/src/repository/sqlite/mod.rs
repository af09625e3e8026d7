//! # SQLite Repositories
//!
//! sqlx-backed implementation of the repository contracts.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteRepository<T>                                                   │
//! │                                                                         │
//! │  Generic CRUD, driven by T: SqliteEntity                               │
//! │  ├── TABLE      "sellers"                                              │
//! │  ├── COLUMNS    ["cid", "company_name", ...]   (everything but id)     │
//! │  ├── bind_columns(query)                        (same order)           │
//! │  └── foreign_keys()                             (for FK attribution)   │
//! │                                                                         │
//! │  Entity files (parties / storage / catalog / orders) add natural-key   │
//! │  lookups and the report SQL.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Foreign Key Attribution
//! SQLite only says "FOREIGN KEY constraint failed". On a failed insert or
//! update the repository probes each referenced table and reports the first
//! missing parent as `InvalidReference`. A failed delete can only mean that
//! children still exist, so it becomes `ReferencedByChild`.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Transaction};
use tracing::{debug, warn};
use wareflow_core::{Entity, EntityKind};

use crate::error::{DbError, DbResult};
use crate::repository::{Repositories, Repository};

pub mod catalog;
pub mod orders;
pub mod parties;
pub mod storage;

pub use catalog::{
    SqliteProductBatchRepository, SqliteProductRecordRepository, SqliteProductRepository,
    SqliteProductTypeRepository,
};
pub use orders::{SqliteInboundOrderRepository, SqlitePurchaseOrderRepository};
pub use parties::{
    SqliteBuyerRepository, SqliteCarrierRepository, SqliteEmployeeRepository,
    SqliteLocalityRepository, SqliteSellerRepository,
};
pub use storage::{SqliteSectionRepository, SqliteWarehouseRepository};

/// A query with its arguments, as built by `sqlx::query`.
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

// =============================================================================
// Entity Mapping
// =============================================================================

/// A reference held by a row.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub entity: EntityKind,
    pub table: &'static str,
    pub id: i64,
}

impl ForeignKey {
    pub const fn new(entity: EntityKind, table: &'static str, id: i64) -> Self {
        ForeignKey { entity, table, id }
    }
}

/// How an entity maps onto its table.
pub trait SqliteEntity:
    Entity + for<'r> FromRow<'r, SqliteRow> + std::fmt::Debug + Send + Sync + Unpin
{
    const TABLE: &'static str;

    /// Every column except `id`, in bind order.
    const COLUMNS: &'static [&'static str];

    /// Binds one value per entry of `COLUMNS`.
    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    /// References to other tables, in the order they should be reported.
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        Vec::new()
    }
}

fn select_sql<T: SqliteEntity>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

fn insert_sql<T: SqliteEntity>() -> String {
    let placeholders = vec!["?"; T::COLUMNS.len() + 1].join(", ");
    format!(
        "INSERT INTO {} (id, {}) VALUES ({})",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders
    )
}

fn update_sql<T: SqliteEntity>() -> String {
    let assignments: Vec<String> = T::COLUMNS.iter().map(|c| format!("{c} = ?")).collect();
    format!("UPDATE {} SET {} WHERE id = ?", T::TABLE, assignments.join(", "))
}

/// Inserts one row.
///
/// A `None` id lets AUTOINCREMENT pick the next one; `Some(id)` keeps the
/// given id (seed import) and advances the sequence past it.
pub(crate) async fn insert_row<'c, T, E>(
    executor: E,
    entity: &T,
    id: Option<i64>,
) -> Result<i64, sqlx::Error>
where
    T: SqliteEntity,
    E: Executor<'c, Database = Sqlite>,
{
    let sql = insert_sql::<T>();
    let result = entity
        .bind_columns(sqlx::query(&sql).bind(id))
        .execute(executor)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Inserts seeded rows inside an open transaction, keeping their ids.
pub(crate) async fn import_rows<T: SqliteEntity>(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[T],
) -> DbResult<usize> {
    for row in rows {
        insert_row(&mut **tx, row, Some(row.id()))
            .await
            .map_err(|e| {
                warn!(table = T::TABLE, id = row.id(), error = %e, "Seed row rejected");
                DbError::TransactionFailed(format!("{} #{}: {}", T::TABLE, row.id(), e))
            })?;
    }
    debug!(table = T::TABLE, count = rows.len(), "Imported seed rows");
    Ok(rows.len())
}

// =============================================================================
// Generic Repository
// =============================================================================

/// SQLite repository for any mapped entity.
///
/// ## Usage
/// ```rust,ignore
/// let sellers = SqliteSellerRepository::new(db.pool().clone());
/// let id = sellers.save(&seller).await?;
/// let stored = sellers.find_by_id(id).await?;
/// ```
#[derive(Debug)]
pub struct SqliteRepository<T> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for SqliteRepository<T> {
    fn clone(&self) -> Self {
        SqliteRepository::new(self.pool.clone())
    }
}

impl<T> SqliteRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteRepository {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl<T: SqliteEntity> SqliteRepository<T> {
    /// First row whose integer `column` equals `value`.
    pub(crate) async fn find_one_by_int(&self, column: &str, value: i64) -> DbResult<Option<T>> {
        let sql = format!("{} WHERE {} = ? LIMIT 1", select_sql::<T>(), column);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// First row whose text `column` equals `value`.
    pub(crate) async fn find_one_by_text(&self, column: &str, value: &str) -> DbResult<Option<T>> {
        let sql = format!("{} WHERE {} = ? LIMIT 1", select_sql::<T>(), column);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Runs a report query whose only parameter is the optional id (`?1`).
    ///
    /// An id filter that matches nothing means the grouping entity is absent.
    pub(crate) async fn report<R>(&self, sql: &str, id: Option<i64>) -> DbResult<Vec<R>>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, R>(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        match id {
            Some(id) if rows.is_empty() => Err(DbError::not_found(T::KIND, id)),
            _ => Ok(rows),
        }
    }

    /// Names the missing parent behind an FK failure.
    async fn attribute_foreign_key(&self, err: DbError, entity: &T) -> DbError {
        if !matches!(err, DbError::ForeignKeyViolation { .. }) {
            return err;
        }

        for key in entity.foreign_keys() {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", key.table);
            let found: Result<i64, sqlx::Error> = sqlx::query_scalar(&sql)
                .bind(key.id)
                .fetch_one(&self.pool)
                .await;
            match found {
                Ok(0) => return DbError::InvalidReference { entity: key.entity },
                Ok(_) => {}
                Err(probe) => return probe.into(),
            }
        }
        err
    }
}

#[async_trait]
impl<T: SqliteEntity> Repository<T> for SqliteRepository<T> {
    async fn find_all(&self) -> DbResult<Vec<T>> {
        debug!(table = T::TABLE, "Listing rows");
        let sql = format!("{} ORDER BY id", select_sql::<T>());
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<T> {
        debug!(table = T::TABLE, id, "Fetching row");
        let sql = format!("{} WHERE id = ?", select_sql::<T>());
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::not_found(T::KIND, id))
    }

    async fn save(&self, entity: &T) -> DbResult<i64> {
        match insert_row(&self.pool, entity, None).await {
            Ok(id) => {
                debug!(table = T::TABLE, id, "Inserted row");
                Ok(id)
            }
            Err(err) => Err(self.attribute_foreign_key(err.into(), entity).await),
        }
    }

    async fn update(&self, entity: &T) -> DbResult<()> {
        let sql = update_sql::<T>();
        let result = entity
            .bind_columns(sqlx::query(&sql))
            .bind(entity.id())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DbError::not_found(T::KIND, entity.id())),
            Ok(_) => {
                debug!(table = T::TABLE, id = entity.id(), "Updated row");
                Ok(())
            }
            Err(err) => Err(self.attribute_foreign_key(err.into(), entity).await),
        }
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DbError::not_found(T::KIND, id)),
            Ok(_) => {
                debug!(table = T::TABLE, id, "Deleted row");
                Ok(())
            }
            Err(err) => match DbError::from(err) {
                DbError::ForeignKeyViolation { .. } => {
                    Err(DbError::ReferencedByChild { entity: T::KIND })
                }
                other => Err(other),
            },
        }
    }
}

// =============================================================================
// Bundle
// =============================================================================

impl Repositories {
    /// Every repository backed by the same SQLite pool.
    pub fn sqlite(pool: &SqlitePool) -> Self {
        Repositories {
            sellers: Arc::new(SqliteSellerRepository::new(pool.clone())),
            buyers: Arc::new(SqliteBuyerRepository::new(pool.clone())),
            employees: Arc::new(SqliteEmployeeRepository::new(pool.clone())),
            warehouses: Arc::new(SqliteWarehouseRepository::new(pool.clone())),
            sections: Arc::new(SqliteSectionRepository::new(pool.clone())),
            product_types: Arc::new(SqliteProductTypeRepository::new(pool.clone())),
            products: Arc::new(SqliteProductRepository::new(pool.clone())),
            product_records: Arc::new(SqliteProductRecordRepository::new(pool.clone())),
            product_batches: Arc::new(SqliteProductBatchRepository::new(pool.clone())),
            localities: Arc::new(SqliteLocalityRepository::new(pool.clone())),
            carriers: Arc::new(SqliteCarrierRepository::new(pool.clone())),
            inbound_orders: Arc::new(SqliteInboundOrderRepository::new(pool.clone())),
            purchase_orders: Arc::new(SqlitePurchaseOrderRepository::new(pool.clone())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wareflow_core::Seller;

    #[test]
    fn test_generated_sql() {
        assert_eq!(
            select_sql::<Seller>(),
            "SELECT id, cid, company_name, address, telephone, locality_id FROM sellers"
        );
        assert_eq!(
            insert_sql::<Seller>(),
            "INSERT INTO sellers (id, cid, company_name, address, telephone, locality_id) \
             VALUES (?, ?, ?, ?, ?, ?)"
        );
        assert_eq!(
            update_sql::<Seller>(),
            "UPDATE sellers SET cid = ?, company_name = ?, address = ?, telephone = ?, \
             locality_id = ? WHERE id = ?"
        );
    }
}

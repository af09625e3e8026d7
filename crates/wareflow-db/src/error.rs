//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      Map store (MemoryStore)               │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  DbError (this module) ← classified: unique / FK / not found / fault   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DomainError (wareflow-core) ← Conflict, InvalidReference, Store...    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in app) ← status code + JSON body                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No raw driver error leaves this crate: everything sqlx reports is turned
//! into a `DbError` variant first.

use std::path::PathBuf;

use thiserror::Error;
use wareflow_core::{DomainError, EntityKind, NaturalKey};

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in the store.
    ///
    /// ## When This Occurs
    /// - `find_by_id` on an absent id
    /// - `update` / `delete` touched zero rows
    /// - A report filtered by an id that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: i64 },

    /// Unique constraint violation on a natural key.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate seller `cid`
    /// - Two requests racing to create the same order number
    /// - Any UNIQUE index violation the schema maps to a natural key
    #[error("duplicate {key:?}: {}", .key.conflict_message())]
    UniqueViolation { key: NaturalKey },

    /// A written row points at an entity that does not exist.
    #[error("referenced {entity} does not exist")]
    InvalidReference { entity: EntityKind },

    /// A delete was blocked because child rows still point at the entity.
    #[error("{entity} is still referenced by child rows")]
    ReferencedByChild { entity: EntityKind },

    /// Foreign key violation that could not be attributed to a table.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A seed file is missing or unreadable.
    ///
    /// ## When This Occurs
    /// - `sellers.json` (or any mandatory seed file) does not exist
    /// - A file is not a JSON array of the expected entity shape
    #[error("Seed file {path}: {reason}")]
    SeedLoad { path: PathBuf, reason: String },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity kind and ID.
    pub fn not_found(entity: EntityKind, id: i64) -> Self {
        DbError::NotFound { entity, id }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(key: NaturalKey) -> Self {
        DbError::UniqueViolation { key }
    }

    pub(crate) fn seed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DbError::SeedLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Maps the `table.column` part of a SQLite UNIQUE failure to a natural key.
///
/// Composite constraints report every column (`localities.locality_name,
/// localities.province_name, ...`), so only the first one is inspected.
fn natural_key_for(constraint: &str) -> Option<NaturalKey> {
    let first = constraint.split(',').next()?.trim();
    let key = match first {
        "sellers.cid" => NaturalKey::SellerCid,
        "buyers.card_number_id" => NaturalKey::BuyerCardNumberId,
        "employees.card_number_id" => NaturalKey::EmployeeCardNumberId,
        "warehouses.warehouse_code" => NaturalKey::WarehouseCode,
        "sections.section_number" => NaturalKey::SectionNumber,
        "products.product_code" => NaturalKey::ProductCode,
        "product_batches.batch_number" => NaturalKey::BatchNumber,
        "carriers.cid" => NaturalKey::CarrierCid,
        "inbound_orders.order_number" => NaturalKey::InboundOrderNumber,
        "purchase_orders.order_number" => NaturalKey::PurchaseOrderNumber,
        _ if first.starts_with("localities.") => NaturalKey::Locality,
        _ => return None,
    };
    Some(key)
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database "UNIQUE constraint failed: t.c"  → UniqueViolation
/// sqlx::Error::Database "FOREIGN KEY constraint failed"  → ForeignKeyViolation
/// sqlx::Error::PoolTimedOut                              → PoolExhausted
/// sqlx::Error::PoolClosed                                → ConnectionFailed
/// Other                                                  → QueryFailed / Internal
/// ```
///
/// `ForeignKeyViolation` is refined by the repositories into
/// `InvalidReference` or `ReferencedByChild`, since only they know which
/// tables the statement touched.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if db_err.is_unique_violation() || msg.contains("UNIQUE constraint failed") {
                    let constraint = msg.split("UNIQUE constraint failed: ").nth(1).unwrap_or("");
                    match natural_key_for(constraint) {
                        Some(key) => DbError::UniqueViolation { key },
                        None => DbError::QueryFailed(msg.to_string()),
                    }
                } else if db_err.is_foreign_key_violation()
                    || msg.contains("FOREIGN KEY constraint failed")
                {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DbError::QueryFailed(err.to_string())
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Promotes store errors into the domain taxonomy.
///
/// ```text
/// NotFound            → DomainError::NotFound
/// UniqueViolation     → DomainError::Conflict
/// InvalidReference    → DomainError::InvalidReference
/// ReferencedByChild   → DomainError::ReferencedByChild
/// everything else     → DomainError::Store
/// ```
impl From<DbError> for DomainError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => DomainError::NotFound(entity),
            DbError::UniqueViolation { key } => DomainError::Conflict(key),
            DbError::InvalidReference { entity } => DomainError::InvalidReference(entity),
            DbError::ReferencedByChild { entity } => DomainError::ReferencedByChild(entity),
            other => DomainError::Store(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_for_constraint() {
        assert_eq!(natural_key_for("sellers.cid"), Some(NaturalKey::SellerCid));
        assert_eq!(
            natural_key_for("employees.card_number_id"),
            Some(NaturalKey::EmployeeCardNumberId)
        );
        assert_eq!(
            natural_key_for(
                "localities.locality_name, localities.province_name, localities.country_name"
            ),
            Some(NaturalKey::Locality)
        );
        assert_eq!(natural_key_for("unknown.col"), None);
    }

    #[test]
    fn test_promotion_to_domain_error() {
        let err: DomainError = DbError::not_found(EntityKind::Buyer, 100).into();
        assert_eq!(err.to_string(), "buyer not found");

        let err: DomainError = DbError::duplicate(NaturalKey::EmployeeCardNumberId).into();
        assert_eq!(err.to_string(), "card number id already in use");

        let err: DomainError = DbError::PoolExhausted.into();
        assert!(matches!(err, DomainError::Store(_)));
    }
}

//! # Error Types
//!
//! Domain-specific error types for wareflow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wareflow-core errors (this file)                                      │
//! │  ├── DomainError       - What services return                          │
//! │  ├── ValidationErrors  - Every failing field of one payload            │
//! │  └── ValidationError   - A single field failure                        │
//! │                                                                         │
//! │  wareflow-db errors (separate crate)                                   │
//! │  └── DbError           - Store failures, promoted into DomainError     │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError          - What HTTP clients see (status + JSON body)    │
//! │                                                                         │
//! │  Flow: ValidationError → DomainError ← DbError                         │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                          ApiError → Client                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors name the entity kind or field involved
//! 3. Errors are enum variants, never String (except opaque store faults)
//! 4. Each variant maps to exactly one HTTP status in the API

use thiserror::Error;

use crate::types::{EntityKind, NaturalKey};

// =============================================================================
// Domain Error
// =============================================================================

/// Errors returned by domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Payload failed semantic validation.
    ///
    /// Carries every failing field, not just the first one.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The addressed entity does not exist.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// A natural key is already used by another live entity.
    ///
    /// ## When This Occurs
    /// - Creating a buyer whose `card_number_id` is taken
    /// - Patching a seller's `cid` to another seller's value
    /// - Two concurrent creates racing on the same key (the store's UNIQUE
    ///   constraint or write lock settles it)
    #[error("{}", .0.conflict_message())]
    Conflict(NaturalKey),

    /// A referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// ```text
    /// POST /purchaseOrders { buyer_id: 99, ... }
    ///      │
    ///      ▼
    /// BuyerService::get_by_id(99) → NotFound(buyer)
    ///      │
    ///      ▼
    /// InvalidReference(buyer) → 404 "buyer not found"
    /// ```
    #[error("{0} not found")]
    InvalidReference(EntityKind),

    /// The entity cannot be deleted while children still reference it.
    #[error("{0} is still referenced by other records")]
    ReferencedByChild(EntityKind),

    /// Persistence failure unrelated to the input.
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    /// Converts `NotFound(k)` into `InvalidReference(k)`.
    ///
    /// Used when a service looks up a *referenced* entity: a missing parent is
    /// a problem with the payload, not with the addressed resource.
    pub fn into_reference(self) -> Self {
        match self {
            DomainError::NotFound(kind) => DomainError::InvalidReference(kind),
            other => other,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must not exceed another field of the same payload.
    #[error("{field} must not exceed {limit}")]
    Exceeds { field: String, limit: String },

    /// Value must not be below another field of the same payload.
    #[error("{field} must not be below {floor}")]
    Below { field: String, floor: String },

    /// Invalid format (e.g., a date that is not YYYY-MM-DD).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field as it appears in the JSON payload.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::Exceeds { field, .. }
            | ValidationError::Below { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Every validation failure found in one payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Field names in the order they failed.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(ValidationError::field).collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DomainError::NotFound(EntityKind::Buyer).to_string(),
            "buyer not found"
        );
        assert_eq!(
            DomainError::InvalidReference(EntityKind::ProductRecord).to_string(),
            "product record not found"
        );
        assert_eq!(
            DomainError::Conflict(NaturalKey::EmployeeCardNumberId).to_string(),
            "card number id already in use"
        );
    }

    #[test]
    fn test_into_reference() {
        let err = DomainError::NotFound(EntityKind::Locality).into_reference();
        assert!(matches!(err, DomainError::InvalidReference(EntityKind::Locality)));

        let err = DomainError::Store("disk full".to_string()).into_reference();
        assert!(matches!(err, DomainError::Store(_)));
    }

    #[test]
    fn test_validation_errors_collect_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "order_number".to_string(),
        });
        errors.push(ValidationError::MustBePositive {
            field: "cid".to_string(),
        });

        assert_eq!(errors.fields(), vec!["order_number", "cid"]);
        assert_eq!(
            errors.to_string(),
            "order_number is required; cid must be positive"
        );

        let domain: DomainError = errors.into();
        assert!(matches!(domain, DomainError::Validation(ref e) if e.len() == 2));
    }
}

//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Wareflow                               │
//! │                                                                         │
//! │  Client                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  POST /api/v1/purchaseOrders                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Extractor rejection? ── bad JSON / bad {id} / bad ?id= ── 400 ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Handler → Service: Result<T, DomainError>                       │  │
//! │  │         │                                                        │  │
//! │  │         ├── Validation        ─────────────────────────── 422 ─►│  │
//! │  │         ├── NotFound / InvalidReference ──────────────── 404 ─►│  │
//! │  │         ├── Conflict / ReferencedByChild ─────────────── 409 ─►│  │
//! │  │         └── Store ──── error! logged, generic message ─── 500 ─►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {                                                                      │
//! │    "message": "buyer not found",                                        │
//! │    "error": "INVALID_REFERENCE",                                        │
//! │    "code": 404,                                                         │
//! │    "causes": []                                                         │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};
use wareflow_core::{DomainError, ValidationErrors};

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error codes for API responses.
///
/// ## Usage in a client
/// ```typescript
/// switch (body.error) {
///   case 'INVALID_REFERENCE': highlightReference(body.message); break;
///   case 'VALIDATION_ERROR':  body.causes.forEach(markField); break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed JSON, path or query (400)
    BadRequest,

    /// Addressed resource not found (404)
    NotFound,

    /// Payload references a missing entity (404)
    InvalidReference,

    /// Natural key already in use (409)
    Conflict,

    /// Delete blocked by dependent records (409)
    ReferencedByChild,

    /// Semantic validation failed (422)
    ValidationError,

    /// Store fault (500)
    Internal,
}

impl ErrorCode {
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound | ErrorCode::InvalidReference => StatusCode::NOT_FOUND,
            ErrorCode::Conflict | ErrorCode::ReferencedByChild => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One offending field of a 422 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cause {
    pub field: String,
    pub message: String,
}

/// Error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub causes: Vec<Cause>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    error: ErrorCode,
    code: u16,
    causes: &'a [Cause],
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            causes: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// A 422 listing every failing field.
    pub fn validation(errors: &ValidationErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: errors.to_string(),
            causes: errors
                .iter()
                .map(|e| Cause {
                    field: e.field().to_string(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::validation(&errors),
            DomainError::NotFound(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            DomainError::InvalidReference(_) => {
                ApiError::new(ErrorCode::InvalidReference, err.to_string())
            }
            DomainError::Conflict(_) => ApiError::new(ErrorCode::Conflict, err.to_string()),
            DomainError::ReferencedByChild(_) => {
                ApiError::new(ErrorCode::ReferencedByChild, err.to_string())
            }
            DomainError::Store(detail) => {
                // Log the actual error but return a generic message
                error!(%detail, "Store failure");
                ApiError::new(ErrorCode::Internal, "internal server error")
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation(&errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!(status = status.as_u16(), message = %self.message, "Request rejected");
        }

        let body = ErrorBody {
            message: &self.message,
            error: self.code,
            code: status.as_u16(),
            causes: &self.causes,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wareflow_core::{EntityKind, NaturalKey, ValidationError};

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (DomainError::NotFound(EntityKind::Seller), StatusCode::NOT_FOUND),
            (DomainError::InvalidReference(EntityKind::Buyer), StatusCode::NOT_FOUND),
            (DomainError::Conflict(NaturalKey::SellerCid), StatusCode::CONFLICT),
            (DomainError::ReferencedByChild(EntityKind::Warehouse), StatusCode::CONFLICT),
            (DomainError::Store("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_store_detail_is_not_leaked() {
        let err = ApiError::from(DomainError::Store("SQLITE_BUSY at /var/lib".into()));
        assert_eq!(err.message, "internal server error");
    }

    #[test]
    fn test_validation_causes_keep_field_order() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "order_number".into(),
        });
        errors.push(ValidationError::Required {
            field: "buyer_id".into(),
        });

        let err = ApiError::from(DomainError::Validation(errors));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<&str> = err.causes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["order_number", "buyer_id"]);
        assert_eq!(err.causes[0].message, "order_number is required");
    }

    #[test]
    fn test_messages() {
        let err = ApiError::from(DomainError::InvalidReference(EntityKind::Buyer));
        assert_eq!(err.message, "buyer not found");
        assert_eq!(err.code, ErrorCode::InvalidReference);

        let err = ApiError::from(DomainError::Conflict(NaturalKey::EmployeeCardNumberId));
        assert_eq!(err.message, "card number id already in use");
    }
}

//! # wareflow-core: Pure Domain Model for Wareflow
//!
//! This crate holds everything about the warehouse domain that does not touch
//! I/O: entity shapes, patch overlays, report rows, the error taxonomy and
//! field validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wareflow Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Resource façade (apps/api, axum)                │   │
//! │  │    /sellers  /buyers  /sections  /productBatches  /reports ...  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Domain services (apps/api::services)               │   │
//! │  │    reference checks, natural-key probes, patches, reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wareflow-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   patch   │  │  report   │  │ validation│  │   │
//! │  │   │  Seller   │  │SellerPatch│  │ per-buyer │  │ Validator │  │   │
//! │  │   │  Section  │  │  ...      │  │ per-sect. │  │  rules    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                wareflow-db (Store adapter)                      │   │
//! │  │          SQLite repositories, in-memory store, seed files       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities, entity kinds and natural keys
//! - [`patch`] - Partial-update overlays with per-field presence
//! - [`report`] - Aggregation rows
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Field rules and the accumulating [`Validator`]
//!
//! ## Example Usage
//!
//! ```rust
//! use wareflow_core::{validation::validate_buyer, Buyer};
//!
//! let buyer = Buyer {
//!     id: 0,
//!     card_number_id: "B-100".to_string(),
//!     first_name: "Ada".to_string(),
//!     last_name: " ".to_string(),
//! };
//!
//! let errors = validate_buyer(&buyer).unwrap_err();
//! assert_eq!(errors.fields(), vec!["last_name"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod patch;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{DomainError, DomainResult, ValidationError, ValidationErrors};
pub use patch::*;
pub use report::*;
pub use types::*;
pub use validation::Validator;

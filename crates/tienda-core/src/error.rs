//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! tienda-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! tienda-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! Flow: ValidationError → CoreError → (presentation boundary)
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Absence of a row is NOT an error; repositories return `Option` for that

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are explicit rejections:
/// the rules never silently clamp or correct the offending value.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stock adjustment would drive stock below zero.
    ///
    /// Raised by [`crate::Product::adjust_stock`] before any mutation, so the
    /// product's stock is unchanged when the caller sees this.
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Discount rate is outside the allowed range [0%, 100%].
    #[error("Discount of {bps} bps is outside the allowed range (0..=10000)")]
    InvalidDiscount { bps: u32 },

    /// Sale is not in a state that allows the requested operation
    /// (e.g. voiding a Pending sale, or one outside the void window).
    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleStatus {
        sale_id: i64,
        current_status: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet field requirements. They are
/// raised at the boundary nearest the input source, before business logic runs
/// and before anything reaches the repository layer.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (unparseable number, malformed email, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # tienda-core: Pure Domain Logic for Tienda POS
//!
//! This crate is the heart of Tienda POS. It contains the entity model and all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Tienda POS Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │            Presentation Layer (forms, menus - external)       │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │              ★ tienda-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌───────┐ │ │
//! │  │  │  types  │ │  money  │ │  rules  │ │validation │ │session│ │ │
//! │  │  │ Product │ │  Money  │ │ totals  │ │  checks   │ │current│ │ │
//! │  │  │  Sale   │ │  Rate   │ │ metrics │ │  parsing  │ │ user  │ │ │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └───────────┘ └───────┘ │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                 tienda-db (Database Layer)                    │ │
//! │  │          SQLite queries, migrations, repositories             │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Category, Client, Product, User, Sale, SaleLine)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`rules`] - Derived business rules over entities and collections
//! - [`validation`] - Input validation and boundary parsing
//! - [`session`] - Explicit session context (no global state)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output (except wall-clock rules,
//!    which are documented as such)
//! 2. **No I/O**: database, network and file system access are forbidden here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod rules;
pub mod session;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax rate in basis points (1300 = 13% VAT).
///
/// Applied by [`Sale::recompute_totals`]. A single jurisdiction-wide rate;
/// per-product rates would need a schema change.
pub const TAX_RATE_BPS: u32 = 1300;

/// Number of days after completion during which a sale may still be voided.
/// The boundary is inclusive: a sale exactly 7 days old can be voided.
pub const VOID_WINDOW_DAYS: i64 = 7;

/// Default restock threshold for new products.
pub const DEFAULT_MINIMUM_STOCK: i64 = 5;

/// Completed purchases required before a client counts as frequent.
pub const FREQUENT_CLIENT_MIN_PURCHASES: usize = 5;

/// Default cashier commission rate in basis points (500 = 5%).
pub const DEFAULT_COMMISSION_BPS: u32 = 500;

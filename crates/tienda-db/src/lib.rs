//! # tienda-db: SQLite Persistence for Tienda POS
//!
//! Everything that touches the database lives here: the connection pool,
//! embedded migrations, one repository per entity, and the stock report.
//! Domain types and business rules come from `tienda-core`; this crate only
//! moves them in and out of SQLite.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     tienda-db (THIS CRATE)                          │
//! │                                                                     │
//! │  pool ──── Database / DbConfig: pool setup, env resolution,         │
//! │            health check, diagnostics report                         │
//! │  migrations ── embedded SQL, run on connect                         │
//! │  repository ── CategoryRepository, ClientRepository,                │
//! │                ProductRepository, UserRepository, SaleRepository    │
//! │  report ────── stock report rows over the product catalogue         │
//! │  error ─────── DbError taxonomy + remediation suggestions           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::from_env()).await?;
//! let products = db.products().list_active().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod report;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DATABASE_PATH_ENV, DEFAULT_DATABASE_PATH};
pub use report::{stock_report, StockReportRow};
pub use repository::category::CategoryRepository;
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;

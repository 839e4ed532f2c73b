//! # Repository Layer
//!
//! One repository per entity, each owning the SQL for that entity's table.
//!
//! ## Shared contract
//! ```text
//! list_active()    → all active rows, ordered by the display key
//!                    (sales: all rows regardless of status, newest first)
//! get_by_id(id)    → Ok(Some(row)) or Ok(None), never an error for missing ids
//! search(text)     → case-insensitive substring match on the display name
//! insert(&entity)  → newly assigned id (i64)
//! update(&entity)  → true iff exactly one row was affected
//! deactivate(id)   → soft delete: flips `active` off (all but sales)
//! purge(id)        → hard delete: removes the row (sales only)
//! ```
//!
//! Every statement binds its parameters positionally; string-concatenated SQL
//! is not permitted anywhere in this module - that is the layer's defense
//! against injection. Each call acquires a pooled connection, executes one
//! statement (or a small fixed sequence), and holds nothing across calls.

pub mod category;
pub mod client;
pub mod product;
pub mod sale;
pub mod user;

/// Escapes LIKE wildcards in user-supplied search text, so a literal `%` or
/// `_` in the query matches itself. Callers wrap the result in `%...%`.
pub(crate) fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

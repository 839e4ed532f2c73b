//! # Connection Diagnostics
//!
//! Checks database connectivity and prints the full diagnostics report:
//! resolved path, engine version, migration status, and a remediation hint
//! when the connection fails.
//!
//! ## Usage
//! ```bash
//! # Diagnose the database resolved from the environment
//! cargo run -p tienda-db --bin diagnose
//!
//! # Diagnose a specific database file
//! cargo run -p tienda-db --bin diagnose -- --db ./tienda.db
//!
//! # Verbose query logging
//! RUST_LOG=debug cargo run -p tienda-db --bin diagnose
//! ```
//!
//! Exits non-zero when the connection cannot be established, so the binary
//! doubles as a scriptable health probe.

use std::env;

use tracing_subscriber::{fmt, EnvFilter};

use tienda_db::{Database, DbConfig};

/// Returns the `--db`/`-d` override from the argument list, if present.
fn database_override(args: &[String]) -> Option<String> {
    let mut i = 1;
    while i < args.len() {
        if matches!(args[i].as_str(), "--db" | "-d") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

/// Whether the argument list asks for the help text.
fn wants_help(args: &[String]) -> bool {
    args.iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "--help" | "-h"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG controls verbosity, info by default
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args: Vec<String> = env::args().collect();

    if wants_help(&args) {
        println!("Tienda POS Connection Diagnostics");
        println!();
        println!("Usage: diagnose [OPTIONS]");
        println!();
        println!("Options:");
        println!("  -d, --db <PATH>    Database file path (default: TIENDA_DATABASE_PATH or ./tienda.db)");
        println!("  -h, --help         Show this help message");
        return Ok(());
    }

    let config = match database_override(&args) {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env(),
    };

    match Database::new(config).await {
        Ok(db) => {
            println!("{}", db.diagnostics().await);
            db.close().await;
            Ok(())
        }
        Err(err) => {
            eprintln!("Connection: FAILED");
            eprintln!("Error: {err}");
            if let Some(hint) = err.suggestion() {
                eprintln!("Suggestion: {hint}");
            }
            std::process::exit(1);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_database_override() {
        assert_eq!(
            database_override(&args(&["diagnose", "--db", "/tmp/x.db"])),
            Some("/tmp/x.db".to_string())
        );
        assert_eq!(
            database_override(&args(&["diagnose", "-d", "./y.db"])),
            Some("./y.db".to_string())
        );
        // Trailing flag with no value is ignored
        assert_eq!(database_override(&args(&["diagnose", "--db"])), None);
        assert_eq!(database_override(&args(&["diagnose"])), None);
    }

    #[test]
    fn test_wants_help() {
        assert!(wants_help(&args(&["diagnose", "--help"])));
        assert!(wants_help(&args(&["diagnose", "-d", "x", "-h"])));
        assert!(!wants_help(&args(&["diagnose"])));
    }
}

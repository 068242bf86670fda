//! # Chairside Infrastructure
//!
//! Infrastructure implementations of core scheduling ports.
//!
//! This crate contains:
//! - SQLite implementations of the ledger, calendar, catalog, and audit
//!   ports
//! - The pooled database manager and schema migrations
//! - The configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `chairside-core`
//! - Depends on `chairside-domain` and `chairside-core`
//! - Contains all "impure" code (I/O, SQL)

pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use database::{
    DbManager, SqliteAppointmentRepository, SqliteAuditLog, SqliteCalendarRepository,
    SqliteServiceCatalog,
};
pub use errors::InfraError;

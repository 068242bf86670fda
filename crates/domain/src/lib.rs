//! # Chairside Domain
//!
//! Business domain types and models for the Chairside scheduling engine.
//!
//! This crate contains:
//! - Domain data types (Appointment, ProviderCalendar, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (slot catalog, defaults)
//!
//! ## Architecture
//! - No dependencies on other Chairside crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

//! Engine configuration structures.
//!
//! Populated by the infrastructure crate's loader (environment variables
//! first, TOML file fallback).

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SERVICE_PRICE;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Booking policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Price attached to a booking when the service catalog has no entry for
    /// the requested service.
    pub default_service_price: f64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { default_service_price: DEFAULT_SERVICE_PRICE }
    }
}

const fn default_pool_size() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_defaults_apply_when_section_missing() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"database": {"path": "clinic.db"}}"#).unwrap();
        assert_eq!(config.database.pool_size, 4);
        assert!((config.booking.default_service_price - DEFAULT_SERVICE_PRICE).abs() < f64::EPSILON);
    }
}

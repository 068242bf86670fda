//! Configuration loader
//!
//! Loads engine configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from a TOML file
//! 3. Probes a couple of conventional paths for config files
//!
//! ## Environment Variables
//! - `CHAIRSIDE_DB_PATH`: Database file path (required for env loading)
//! - `CHAIRSIDE_DB_POOL_SIZE`: Connection pool size (optional)
//! - `CHAIRSIDE_DEFAULT_PRICE`: Fallback service price (optional)
//!
//! ## File Locations
//! The loader probes `./config.toml` then `./chairside.toml`.

use std::path::{Path, PathBuf};

use chairside_domain::{
    BookingConfig, ClinicError, DatabaseConfig, EngineConfig, Result,
};

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `ClinicError::Config` if neither the environment nor a config
/// file yields a complete configuration.
pub fn load() -> Result<EngineConfig> {
    // Pick up a .env file if one is present; ignore when absent.
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// `CHAIRSIDE_DB_PATH` is required; pool size and default price fall back to
/// their defaults when unset.
///
/// # Errors
/// Returns `ClinicError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<EngineConfig> {
    let path = env_var("CHAIRSIDE_DB_PATH")?;

    let pool_size = match std::env::var("CHAIRSIDE_DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| ClinicError::Config(format!("invalid pool size: {e}")))?,
        Err(_) => 4,
    };

    let default_service_price = match std::env::var("CHAIRSIDE_DEFAULT_PRICE") {
        Ok(raw) => raw
            .parse::<f64>()
            .map_err(|e| ClinicError::Config(format!("invalid default price: {e}")))?,
        Err(_) => BookingConfig::default().default_service_price,
    };

    Ok(EngineConfig {
        database: DatabaseConfig { path, pool_size },
        booking: BookingConfig { default_service_price },
    })
}

/// Load configuration from a TOML file.
///
/// If `path` is `None`, probes the conventional locations.
///
/// # Errors
/// Returns `ClinicError::Config` if no file is found or the file does not
/// parse.
pub fn load_from_file(path: Option<&Path>) -> Result<EngineConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => probe_config_paths()
            .ok_or_else(|| ClinicError::Config("no config file found".into()))?,
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        ClinicError::Config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: EngineConfig = toml::from_str(&raw).map_err(|e| {
        ClinicError::Config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    ["config.toml", "chairside.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ClinicError::Config(format!("missing environment variable: {name}")))
}

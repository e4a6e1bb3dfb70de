//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

use std::path::Path;

use tracing::{info, warn};

use crate::common::error::ConfigError;
pub use types::*;

/// Load the config file (if present), apply environment overrides and validate.
pub fn load_and_validate(path: &str) -> Result<Config, ConfigError> {
    let config = if Path::new(path).exists() {
        parser::load_config(path)?
    } else {
        info!("No config file at {}, using defaults and environment", path);
        Config::default()
    };

    for var in env::check_empty_env_vars() {
        warn!("Environment variable {} is set but empty", var);
    }

    let config = env::apply_env_overrides(config);
    validate::validate_config(&config)?;
    Ok(config)
}

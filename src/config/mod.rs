//! Configuration for the BotHub core.
//!
//! The embedding service owns file loading and environment interpolation;
//! this crate only defines the deserializable sections and their
//! validation.

mod database;
mod tenancy;

pub use database::*;
use serde::{Deserialize, Serialize};
pub use tenancy::*;
use thiserror::Error;

/// Root configuration for the BotHub core.
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotHubConfig {
    /// Database configuration for persistent storage.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Tenant-isolation behavior.
    #[serde(default)]
    pub tenancy: TenancyConfig,
}

impl BotHubConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

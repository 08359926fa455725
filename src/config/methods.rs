//! Loading and validation methods for `SnapshotConfig`

use std::path::Path;

use super::builder::ConfigError;
use super::types::SnapshotConfig;

impl SnapshotConfig {
    /// Start a builder seeded with the defaults
    #[must_use]
    pub fn builder() -> super::SnapshotConfigBuilder {
        super::SnapshotConfigBuilder::default()
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json_str(&json)
    }

    /// Check ranges that serde alone cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_resource_size == 0 {
            return Err(ConfigError::Invalid(
                "max_resource_size must be greater than zero".to_string(),
            ));
        }
        if self.max_import_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_import_depth must be at least 1".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}

//! Fluent builder for `SnapshotConfig`
//!
//! Every field has a default, so the builder can be finished at any point;
//! `build()` validates the combined values once.

use std::time::Duration;

use super::types::SnapshotConfig;

/// Errors raised while building or loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The JSON document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotConfigBuilder {
    config: SnapshotConfig,
}

impl SnapshotConfigBuilder {
    /// Set the per-fetch timeout
    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the hard cap on any fetched body
    #[must_use]
    pub fn max_resource_size(mut self, bytes: usize) -> Self {
        self.config.max_resource_size = bytes;
        self
    }

    /// Keep resources larger than `bytes` as external references
    #[must_use]
    pub fn max_inline_size(mut self, bytes: usize) -> Self {
        self.config.max_inline_size = Some(bytes);
        self
    }

    #[must_use]
    pub fn max_import_depth(mut self, depth: usize) -> Self {
        self.config.max_import_depth = depth;
        self
    }

    #[must_use]
    pub fn inline_iframes(mut self, enabled: bool) -> Self {
        self.config.inline_iframes = enabled;
        self
    }

    pub fn build(self) -> Result<SnapshotConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

//! Getter methods for `SnapshotConfig`

use std::time::Duration;

use super::types::SnapshotConfig;

impl SnapshotConfig {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn max_resource_size(&self) -> usize {
        self.max_resource_size
    }

    #[must_use]
    pub fn max_inline_size(&self) -> Option<usize> {
        self.max_inline_size
    }

    #[must_use]
    pub fn max_import_depth(&self) -> usize {
        self.max_import_depth
    }

    #[must_use]
    pub fn inline_iframes(&self) -> bool {
        self.inline_iframes
    }
}

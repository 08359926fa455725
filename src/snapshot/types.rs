//! Type definitions for the snapshot pipeline

use crate::inline_css::InliningResult;

use super::packager::Artifact;

/// Fatal snapshot failures
///
/// Unavailable resources are never errors; they are tallied in the
/// [`SnapshotReport`] and the snapshot degrades gracefully.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] std::io::Error),

    #[error("Serialized document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to write snapshot to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What each pipeline step did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub charset_inserted: bool,
    pub images: InliningResult,
    pub stylesheets: InliningResult,
    pub style_attributes: InliningResult,
    pub iframes: InliningResult,
    pub links_absolutized: usize,
    pub scripts_removed: usize,
    pub handlers_removed: usize,
    pub text_nodes_decoded: usize,
}

impl SnapshotReport {
    /// Resources embedded across all steps
    #[must_use]
    pub fn total_successes(&self) -> usize {
        self.steps().map(|step| step.successes).sum()
    }

    /// Resources left as live references across all steps
    #[must_use]
    pub fn total_failures(&self) -> usize {
        self.steps().map(|step| step.failures.len()).sum()
    }

    fn steps(&self) -> impl Iterator<Item = &InliningResult> {
        [
            &self.images,
            &self.stylesheets,
            &self.style_attributes,
            &self.iframes,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for SnapshotReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} resources inlined, {} left external; {} links absolutized, {} scripts and {} handlers removed",
            self.total_successes(),
            self.total_failures(),
            self.links_absolutized,
            self.scripts_removed,
            self.handlers_removed
        )
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct SnapshotOutput {
    pub artifact: Artifact,
    pub report: SnapshotReport,
}

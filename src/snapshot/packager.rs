//! Packaging of the rendered document as a downloadable artifact

use std::path::{Path, PathBuf};

use url::Url;

use super::types::SnapshotError;
use crate::utils::{FILE_NAME_PREFIX, HTML_MEDIA_TYPE};

/// The finished snapshot, ready to be written or handed to a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    file_name: String,
    media_type: &'static str,
    bytes: Vec<u8>,
}

/// Derive `static_page_<host>_<path>.html` from the page location
///
/// Dots in the host and slashes in the path become underscores; leading
/// and trailing underscores of the path are trimmed and an empty path is
/// omitted together with its separator.
#[must_use]
pub fn artifact_file_name(location: &Url) -> String {
    let host = location.host_str().unwrap_or_default().replace('.', "_");
    let path = location.path().replace('/', "_");
    let path = path.trim_matches('_');

    let file_name = if path.is_empty() {
        format!("{FILE_NAME_PREFIX}_{host}.html")
    } else {
        format!("{FILE_NAME_PREFIX}_{host}_{path}.html")
    };
    sanitize_filename::sanitize(file_name)
}

impl Artifact {
    #[must_use]
    pub fn new(html: String, location: &Url) -> Self {
        Self {
            file_name: artifact_file_name(location),
            media_type: HTML_MEDIA_TYPE,
            bytes: html.into_bytes(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        self.media_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the artifact into `dir` under its derived file name
    pub async fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SnapshotError> {
        let dir = dir.as_ref();
        let path = dir.join(&self.file_name);
        let write_error = |source| SnapshotError::Write {
            path: path.display().to_string(),
            source,
        };

        tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(write_error)?;

        log::info!("Saved snapshot ({} bytes) to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

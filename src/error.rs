//! Error taxonomy shared by the manifest and install engines

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every core operation returns `Result<T, InstallerError>`.
#[derive(Debug, Error)]
pub enum InstallerError {
    // ── Network ─────────────────────────────────────────
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // ── Manifest ────────────────────────────────────────
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed manifest: {0}")]
    Schema(String),

    // ── Target folder ───────────────────────────────────
    #[error("Required file '{0}' is missing from the selected folder")]
    MissingPrerequisite(String),

    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract archive {path:?}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Nothing to uninstall: {0:?} does not exist")]
    NotFound(PathBuf),

    // ── Selection ───────────────────────────────────────
    #[error("Selection does not match the loaded manifest: {0}")]
    SelectionInvalid(String),

    #[error("Manifest has not been loaded")]
    ManifestNotLoaded,

    #[error("No target folder selected")]
    FolderNotSelected,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InstallerError>;

impl InstallerError {
    /// Wrap an I/O error with the path it happened on.
    pub fn fs(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        InstallerError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Transport, DNS and HTTP status failures.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            InstallerError::Network { .. } | InstallerError::HttpStatus { .. }
        )
    }

    /// Informational outcome rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, InstallerError::NotFound(_))
    }
}

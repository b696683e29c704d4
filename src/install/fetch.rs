//! Download an artifact into a scoped temporary directory

use crate::error::{InstallerError, Result};
use crate::net::Transport;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A downloaded file. The temporary directory holding it is removed on drop.
#[derive(Debug)]
pub struct FetchedArtifact {
    _dir: TempDir,
    path: PathBuf,
    size: u64,
}

impl FetchedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name taken from the last URL segment
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Last path segment of `url`, ignoring any query or fragment.
fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("artifact")
}

pub async fn fetch(transport: &dyn Transport, url: &str) -> Result<FetchedArtifact> {
    let dir = tempfile::Builder::new()
        .prefix("mh-installer-")
        .tempdir()
        .map_err(|e| InstallerError::fs(std::env::temp_dir(), e))?;
    let path = dir.path().join(file_name_from_url(url));

    tracing::info!("Downloading {}", url);
    let size = transport.download(url, &path).await?;
    tracing::debug!("Fetched {} bytes into {}", size, path.display());

    Ok(FetchedArtifact {
        _dir: dir,
        path,
        size,
    })
}

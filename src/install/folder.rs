//! Target folder validation

use crate::error::{InstallerError, Result};
use crate::manifest::BaseVersionEntry;
use std::path::{Path, PathBuf};

/// A validated Geometry Dash folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocation {
    /// Game folder selected by the user
    pub root: PathBuf,
    /// `root/geode/mods`, where Geode packages go
    pub mod_loader: PathBuf,
}

impl TargetLocation {
    pub fn mod_loader_for(root: &Path) -> PathBuf {
        root.join("geode").join("mods")
    }
}

/// Check `root` against the base version's required files and make sure
/// `geode/mods` exists.
///
/// Stops at the first missing file. Creating `geode/mods` is the only side
/// effect and is idempotent.
pub fn validate(root: &Path, base: &BaseVersionEntry) -> Result<TargetLocation> {
    if !root.is_dir() {
        return Err(InstallerError::fs(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    for file in &base.required_files {
        if !root.join(file).exists() {
            tracing::debug!("{} is missing {}", root.display(), file);
            return Err(InstallerError::MissingPrerequisite(file.clone()));
        }
    }

    let mod_loader = TargetLocation::mod_loader_for(root);
    std::fs::create_dir_all(&mod_loader).map_err(|e| InstallerError::fs(&mod_loader, e))?;

    tracing::info!("Validated GD {} folder at {}", base.id, root.display());
    Ok(TargetLocation {
        root: root.to_path_buf(),
        mod_loader,
    })
}

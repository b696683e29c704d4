//! Remove an installed Mega Hack build

use super::fetch::fetch;
use super::folder::TargetLocation;
use super::{join_url, DEFAULT_PAYLOAD, GEODE_PACKAGE, GUARD_FILE};
use crate::error::{InstallerError, Result};
use crate::manifest::{AddonEntry, Variant};
use crate::net::Transport;
use std::path::{Path, PathBuf};

/// Outcome of an uninstall.
#[derive(Debug, Default)]
pub struct UninstallReport {
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted; the remaining files were still tried
    pub failures: Vec<InstallerError>,
    /// Guard file written back after removing the Default variant
    pub restored_guard: Option<PathBuf>,
    /// Why the guard file could not be written back
    pub guard_failure: Option<InstallerError>,
}

impl UninstallReport {
    /// True when every file was removed and the guard, if needed, restored.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.guard_failure.is_none()
    }
}

/// Remote location of the stock loader shim.
pub fn guard_url(base_url: &str) -> String {
    join_url(base_url, &[GUARD_FILE])
}

/// Undo an install of `addon`.
///
/// Geode: deletes the package from `geode/mods`, `NotFound` if it is not there.
/// Default: deletes the known DLLs from the game root, best effort, then
/// downloads a clean `XInput1_4.dll` into the root. A failed guard download or
/// write lands in `guard_failure` next to the per-file failures; removed files
/// stay removed.
pub async fn revert(
    transport: &dyn Transport,
    target: &TargetLocation,
    base_url: &str,
    addon: &AddonEntry,
) -> Result<UninstallReport> {
    tracing::info!("Uninstalling Mega Hack {} from {}", addon, target.root.display());

    match addon.variant {
        Variant::Geode => {
            let path = target.mod_loader.join(GEODE_PACKAGE);
            if !path.exists() {
                return Err(InstallerError::NotFound(path));
            }
            std::fs::remove_file(&path).map_err(|e| InstallerError::fs(&path, e))?;
            Ok(UninstallReport {
                removed: vec![path],
                ..Default::default()
            })
        }
        Variant::Default => {
            let mut report = UninstallReport::default();

            for name in DEFAULT_PAYLOAD {
                let path = target.root.join(name);
                if !path.exists() {
                    continue;
                }
                match std::fs::remove_file(&path) {
                    Ok(()) => report.removed.push(path),
                    Err(e) => {
                        tracing::warn!("Failed to remove {}: {}", path.display(), e);
                        report.failures.push(InstallerError::fs(&path, e));
                    }
                }
            }

            match restore_guard(transport, &target.root, base_url).await {
                Ok(dest) => {
                    tracing::info!("Restored {}", dest.display());
                    report.restored_guard = Some(dest);
                }
                Err(e) => {
                    tracing::warn!("Failed to restore {}: {}", GUARD_FILE, e);
                    report.guard_failure = Some(e);
                }
            }

            Ok(report)
        }
    }
}

async fn restore_guard(transport: &dyn Transport, root: &Path, base_url: &str) -> Result<PathBuf> {
    let artifact = fetch(transport, &guard_url(base_url)).await?;
    let dest = root.join(GUARD_FILE);
    std::fs::copy(artifact.path(), &dest).map_err(|e| InstallerError::fs(&dest, e))?;
    Ok(dest)
}

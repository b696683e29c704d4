//! Queries over a loaded manifest

use super::{AddonEntry, BaseVersionEntry, Manifest, Variant};
use crate::error::{InstallerError, Result};

/// Base version IDs in manifest order.
pub fn list_base_versions(manifest: &Manifest) -> Vec<&str> {
    manifest
        .base_versions
        .iter()
        .map(|b| b.id.as_str())
        .collect()
}

/// Addons for `base`, newest first.
///
/// Versions are compared as raw strings; equal versions keep manifest order.
pub fn list_addons(manifest: &Manifest, base: &str) -> Result<Vec<AddonEntry>> {
    let entry = lookup_base(manifest, base)?;
    let mut addons = entry.addons.clone();
    // sort_by is stable
    addons.sort_by(|a, b| b.version.cmp(&a.version));
    Ok(addons)
}

fn lookup_base<'m>(manifest: &'m Manifest, base: &str) -> Result<&'m BaseVersionEntry> {
    manifest.base_version(base).ok_or_else(|| {
        InstallerError::SelectionInvalid(format!("GD version '{}' is not in the manifest", base))
    })
}

/// A (base version, addon) pair checked against a manifest snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub base_version: String,
    pub addon: AddonEntry,
}

impl Selection {
    /// Resolve the user's choice. Fails unless `base` is listed and offers
    /// exactly this (version, variant) pair.
    pub fn resolve(manifest: &Manifest, base: &str, version: &str, variant: Variant) -> Result<Self> {
        let entry = lookup_base(manifest, base)?;
        let addon = entry
            .addons
            .iter()
            .find(|a| a.version == version && a.variant == variant)
            .cloned()
            .ok_or_else(|| {
                InstallerError::SelectionInvalid(format!(
                    "Mega Hack {} ({}) is not offered for GD {}",
                    version,
                    variant.display_name(),
                    base
                ))
            })?;

        Ok(Self {
            base_version: entry.id.clone(),
            addon,
        })
    }

    /// Prerequisites of the selected base version in `manifest`.
    pub fn base_entry<'m>(&self, manifest: &'m Manifest) -> Result<&'m BaseVersionEntry> {
        lookup_base(manifest, &self.base_version)
    }
}

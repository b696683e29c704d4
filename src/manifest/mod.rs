//! Compatibility manifest: data model, parsing and remote loading
//!
//! The manifest (`update.json`) maps each supported Geometry Dash version to
//! the files a valid install must contain and the Mega Hack builds that work
//! with it.

pub mod catalog;

pub use catalog::{list_addons, list_base_versions, Selection};

use crate::error::{InstallerError, Result};
use crate::net::Transport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where the manifest is published
pub const DEFAULT_MANIFEST_URL: &str =
    "https://github.com/goosedev72-projects/MH-FreeInstaller/raw/refs/heads/main/update.json";

/// Artifact root used when the manifest has no `base_url`
pub const DEFAULT_BASE_URL: &str =
    "https://github.com/goosedev72-projects/MH-FreeInstaller/raw/refs/heads/main/";

/// How an addon build is distributed and installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Single `.geode` package dropped into `geode/mods`
    Geode,
    /// Zip archive extracted over the game folder
    Default,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Geode => "geode",
            Variant::Default => "default",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variant::Geode => "Geode",
            Variant::Default => "Default",
        }
    }

    pub fn from_cli(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "geode" => Some(Variant::Geode),
            "default" => Some(Variant::Default),
            _ => None,
        }
    }
}

/// One Mega Hack build; identity is the (version, variant) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddonEntry {
    pub version: String,
    pub variant: Variant,
}

impl AddonEntry {
    pub fn new(version: impl Into<String>, variant: Variant) -> Self {
        Self {
            version: version.into(),
            variant,
        }
    }
}

/// Label shown to users, e.g. `1.0 (Geode)`
impl fmt::Display for AddonEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.variant.display_name())
    }
}

/// A supported Geometry Dash version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseVersionEntry {
    pub id: String,
    /// Paths relative to the game folder that must exist
    pub required_files: Vec<String>,
    /// Compatible builds in manifest order, duplicates removed
    pub addons: Vec<AddonEntry>,
}

/// Parsed manifest snapshot. Never mutated; a reload builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub base_url: String,
    /// Base versions in manifest order
    pub base_versions: Vec<BaseVersionEntry>,
}

impl Manifest {
    pub fn base_version(&self, id: &str) -> Option<&BaseVersionEntry> {
        self.base_versions.iter().find(|b| b.id == id)
    }
}

#[derive(Deserialize)]
struct RawBaseVersion {
    #[serde(default)]
    required_files: Vec<String>,
    #[serde(default)]
    mh_versions: Vec<AddonEntry>,
}

/// Parse a manifest document.
///
/// Invalid JSON is a `Parse` error; valid JSON of the wrong shape (missing or
/// empty `gd_versions`, unknown variant, non-string file names) is `Schema`.
pub fn parse_manifest(text: &str) -> Result<Manifest> {
    let root: Value = serde_json::from_str(text)?;

    let root = root
        .as_object()
        .ok_or_else(|| InstallerError::Schema("document root is not an object".to_string()))?;

    let base_url = match root.get("base_url") {
        None | Some(Value::Null) => DEFAULT_BASE_URL.to_string(),
        Some(Value::String(url)) if !url.trim().is_empty() => url.trim().to_string(),
        Some(_) => {
            return Err(InstallerError::Schema(
                "'base_url' must be a non-empty string".to_string(),
            ))
        }
    };

    let gd_versions = root
        .get("gd_versions")
        .ok_or_else(|| InstallerError::Schema("missing 'gd_versions'".to_string()))?
        .as_object()
        .ok_or_else(|| InstallerError::Schema("'gd_versions' is not an object".to_string()))?;

    if gd_versions.is_empty() {
        return Err(InstallerError::Schema(
            "'gd_versions' lists no versions".to_string(),
        ));
    }

    let mut base_versions = Vec::with_capacity(gd_versions.len());
    for (id, entry) in gd_versions {
        let raw: RawBaseVersion = serde_json::from_value(entry.clone())
            .map_err(|e| InstallerError::Schema(format!("gd_versions.{}: {}", id, e)))?;

        let mut addons: Vec<AddonEntry> = Vec::with_capacity(raw.mh_versions.len());
        for addon in raw.mh_versions {
            if addons.contains(&addon) {
                tracing::warn!("Ignoring duplicate entry {} for GD {}", addon, id);
                continue;
            }
            addons.push(addon);
        }

        base_versions.push(BaseVersionEntry {
            id: id.clone(),
            required_files: raw.required_files,
            addons,
        });
    }

    Ok(Manifest {
        base_url,
        base_versions,
    })
}

/// Fetches the manifest from a fixed URL
pub struct ManifestStore<'a> {
    transport: &'a dyn Transport,
    url: String,
}

impl<'a> ManifestStore<'a> {
    pub fn new(transport: &'a dyn Transport, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single fetch + parse. Retrying is left to the caller.
    pub async fn load(&self) -> Result<Manifest> {
        tracing::info!("Loading manifest from {}", self.url);
        let text = self.transport.get_text(&self.url).await?;
        let manifest = parse_manifest(&text)?;
        tracing::info!(
            "Manifest lists {} GD version(s)",
            manifest.base_versions.len()
        );
        Ok(manifest)
    }
}

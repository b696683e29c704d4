//! Apply a Mega Hack build to a validated folder

use super::archive::extract_zip;
use super::fetch::fetch;
use super::folder::TargetLocation;
use super::{join_url, DEFAULT_ARCHIVE, GEODE_PACKAGE};
use crate::error::{InstallerError, Result};
use crate::manifest::{AddonEntry, Variant};
use crate::net::Transport;
use std::path::PathBuf;

/// What an install wrote. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub url: String,
    pub placed: Vec<PathBuf>,
}

/// Remote location of an addon build.
pub fn artifact_url(base_url: &str, addon: &AddonEntry) -> String {
    match addon.variant {
        Variant::Geode => {
            join_url(base_url, &["megahack", "geode", addon.version.as_str(), GEODE_PACKAGE])
        }
        Variant::Default => {
            join_url(base_url, &["megahack", "default", addon.version.as_str(), DEFAULT_ARCHIVE])
        }
    }
}

/// Download and place `addon` into `target`.
///
/// Geode: the package is copied into `geode/mods`, replacing any existing
/// copy. Default: the archive is extracted over the game root. Nothing is
/// cleaned up if placement fails part way.
pub async fn apply(
    transport: &dyn Transport,
    target: &TargetLocation,
    base_url: &str,
    addon: &AddonEntry,
) -> Result<InstallReport> {
    let url = artifact_url(base_url, addon);
    tracing::info!("Installing Mega Hack {} into {}", addon, target.root.display());

    let artifact = fetch(transport, &url).await?;

    let placed = match addon.variant {
        Variant::Geode => {
            let dest = target.mod_loader.join(artifact.file_name());
            std::fs::copy(artifact.path(), &dest).map_err(|e| InstallerError::fs(&dest, e))?;
            vec![dest]
        }
        Variant::Default => extract_zip(artifact.path(), &target.root)?,
    };

    tracing::info!("Placed {} file(s) for Mega Hack {}", placed.len(), addon);
    Ok(InstallReport { url, placed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::archive::zip_bytes;
    use crate::install::folder::validate;
    use crate::manifest::parse_manifest;
    use crate::net::stub::StubTransport;
    use tempfile::TempDir;

    const BASE: &str = "https://host/raw/main/";

    fn target() -> (TempDir, TargetLocation) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("GeometryDash.exe"), b"exe").unwrap();
        let manifest = parse_manifest(
            r#"{"gd_versions":{"2.2":{"required_files":["GeometryDash.exe"]}}}"#,
        )
        .unwrap();
        let target = validate(dir.path(), manifest.base_version("2.2").unwrap()).unwrap();
        (dir, target)
    }

    #[test]
    fn urls_follow_variant_templates() {
        assert_eq!(
            artifact_url(BASE, &AddonEntry::new("1.0", Variant::Geode)),
            "https://host/raw/main/megahack/geode/1.0/absolllute.megahack.geode"
        );
        assert_eq!(
            artifact_url("https://host", &AddonEntry::new("8.1", Variant::Default)),
            "https://host/megahack/default/8.1/lib.zip"
        );
    }

    #[tokio::test]
    async fn geode_package_lands_in_mod_loader() {
        let (_dir, target) = target();
        let url = "https://host/raw/main/megahack/geode/1.0/absolllute.megahack.geode";
        let transport = StubTransport::new().serve(url, b"geode-pkg".to_vec());

        let report = apply(&transport, &target, BASE, &AddonEntry::new("1.0", Variant::Geode))
            .await
            .unwrap();

        let installed = target.mod_loader.join(GEODE_PACKAGE);
        assert_eq!(report.placed, vec![installed.clone()]);
        assert_eq!(std::fs::read(installed).unwrap(), b"geode-pkg");
        assert_eq!(transport.requests(), vec![url]);
    }

    #[tokio::test]
    async fn geode_package_replaces_existing_copy() {
        let (_dir, target) = target();
        std::fs::write(target.mod_loader.join(GEODE_PACKAGE), b"old").unwrap();
        let transport = StubTransport::new().serve(
            "https://host/raw/main/megahack/geode/2.0/absolllute.megahack.geode",
            b"new".to_vec(),
        );

        apply(&transport, &target, BASE, &AddonEntry::new("2.0", Variant::Geode))
            .await
            .unwrap();
        assert_eq!(std::fs::read(target.mod_loader.join(GEODE_PACKAGE)).unwrap(), b"new");
    }

    #[tokio::test]
    async fn default_archive_is_extracted_over_root() {
        let (_dir, target) = target();
        let transport = StubTransport::new().serve(
            "https://host/raw/main/megahack/default/8.1/lib.zip",
            zip_bytes(&[
                ("hackpro.dll", "hp"),
                ("hackproldr.dll", "ldr"),
                ("XInput1_4.dll", "shim"),
                ("hackpro/extensions/ext.dll", "ext"),
            ]),
        );

        let report = apply(&transport, &target, BASE, &AddonEntry::new("8.1", Variant::Default))
            .await
            .unwrap();

        assert_eq!(report.placed.len(), 4);
        assert_eq!(std::fs::read(target.root.join("hackpro.dll")).unwrap(), b"hp");
        assert!(target.root.join("hackpro/extensions/ext.dll").is_file());
        assert_eq!(std::fs::read(target.root.join("GeometryDash.exe")).unwrap(), b"exe");
    }

    #[tokio::test]
    async fn failed_download_places_nothing() {
        let (_dir, target) = target();
        let transport = StubTransport::new();

        let err = apply(&transport, &target, BASE, &AddonEntry::new("1.0", Variant::Geode))
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert!(!target.mod_loader.join(GEODE_PACKAGE).exists());
    }
}

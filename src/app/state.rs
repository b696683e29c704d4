//! Caller-owned session state
//!
//! Holds the current manifest snapshot and the selected game folder, and
//! gates install/uninstall on both being present and valid.

use crate::error::{InstallerError, Result};
use crate::install::{self, InstallReport, TargetLocation, UninstallReport};
use crate::manifest::{self, AddonEntry, Manifest, ManifestStore, Selection, Variant};
use crate::net::Transport;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct Session {
    manifest: Option<Arc<Manifest>>,
    folder: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the manifest and swap it in. On failure the previous snapshot,
    /// if any, stays in place.
    pub async fn load_manifest(&mut self, store: &ManifestStore<'_>) -> Result<Arc<Manifest>> {
        let manifest = Arc::new(store.load().await?);
        self.replace_manifest(manifest.clone());
        Ok(manifest)
    }

    pub fn replace_manifest(&mut self, manifest: Arc<Manifest>) {
        self.manifest = Some(manifest);
    }

    pub fn manifest(&self) -> Result<&Arc<Manifest>> {
        self.manifest.as_ref().ok_or(InstallerError::ManifestNotLoaded)
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn list_base_versions(&self) -> Result<Vec<String>> {
        Ok(manifest::list_base_versions(self.manifest()?)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn list_addons(&self, base: &str) -> Result<Vec<AddonEntry>> {
        manifest::list_addons(self.manifest()?, base)
    }

    /// Remember `folder` and validate it for `base`.
    ///
    /// The folder stays selected even when validation fails so a later call
    /// can report against it.
    pub fn select_folder(&mut self, folder: impl Into<PathBuf>, base: &str) -> Result<TargetLocation> {
        self.folder = Some(folder.into());
        self.validate_folder(base)
    }

    fn validate_folder(&self, base: &str) -> Result<TargetLocation> {
        let manifest = self.manifest()?;
        let folder = self.folder.as_deref().ok_or(InstallerError::FolderNotSelected)?;
        let entry = manifest.base_version(base).ok_or_else(|| {
            InstallerError::SelectionInvalid(format!("GD version '{}' is not in the manifest", base))
        })?;
        install::validate(folder, entry)
    }

    /// Resolve the selection against the current snapshot and revalidate the
    /// folder. Nothing touches the network before both succeed.
    fn prepare(&self, base: &str, version: &str, variant: Variant) -> Result<(Selection, TargetLocation)> {
        let manifest = self.manifest()?;
        let selection = Selection::resolve(manifest, base, version, variant)?;
        let target = self.validate_folder(&selection.base_version)?;
        Ok((selection, target))
    }

    pub async fn install(
        &self,
        transport: &dyn Transport,
        base: &str,
        version: &str,
        variant: Variant,
    ) -> Result<InstallReport> {
        let (selection, target) = self.prepare(base, version, variant)?;
        let base_url = &self.manifest()?.base_url;
        install::apply(transport, &target, base_url, &selection.addon).await
    }

    pub async fn uninstall(
        &self,
        transport: &dyn Transport,
        base: &str,
        version: &str,
        variant: Variant,
    ) -> Result<UninstallReport> {
        let (selection, target) = self.prepare(base, version, variant)?;
        let base_url = &self.manifest()?.base_url;
        install::revert(transport, &target, base_url, &selection.addon).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::GEODE_PACKAGE;
    use crate::net::stub::StubTransport;
    use crate::net::MockTransport;
    use tempfile::TempDir;

    const MANIFEST_URL: &str = "https://host/update.json";
    const SCENARIO: &str = r#"{"gd_versions":{"2.2":{"required_files":["GeometryDash.exe"],"mh_versions":[{"version":"1.0","variant":"geode"}]}}}"#;

    async fn loaded(transport: &StubTransport) -> Session {
        let mut session = Session::new();
        session
            .load_manifest(&ManifestStore::new(transport, MANIFEST_URL))
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn scenario_install_places_geode_package() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("GeometryDash.exe"), b"exe").unwrap();
        let package_url = format!(
            "{}/megahack/geode/1.0/absolllute.megahack.geode",
            manifest::DEFAULT_BASE_URL.trim_end_matches('/')
        );
        let transport = StubTransport::new()
            .serve(MANIFEST_URL, SCENARIO)
            .serve(&package_url, b"pkg".to_vec());

        let mut session = loaded(&transport).await;
        let target = session.select_folder(dir.path(), "2.2").unwrap();
        assert!(target.mod_loader.is_dir());

        session
            .install(&transport, "2.2", "1.0", Variant::Geode)
            .await
            .unwrap();

        assert!(dir.path().join("geode/mods").join(GEODE_PACKAGE).is_file());
        assert_eq!(transport.requests(), vec![MANIFEST_URL.to_string(), package_url]);
    }

    #[tokio::test]
    async fn missing_prerequisite_blocks_install_without_network() {
        let dir = TempDir::new().unwrap();
        let transport = StubTransport::new().serve(MANIFEST_URL, SCENARIO);
        let mut session = loaded(&transport).await;

        let err = session.select_folder(dir.path(), "2.2").unwrap_err();
        assert!(matches!(err, InstallerError::MissingPrerequisite(ref f) if f == "GeometryDash.exe"));

        let mut offline = MockTransport::new();
        offline.expect_download().never();
        offline.expect_get_text().never();
        let err = session
            .install(&offline, "2.2", "1.0", Variant::Geode)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::MissingPrerequisite(_)));
    }

    #[tokio::test]
    async fn actions_require_manifest_and_folder() {
        let offline = MockTransport::new();
        let session = Session::new();
        assert!(matches!(
            session.install(&offline, "2.2", "1.0", Variant::Geode).await,
            Err(InstallerError::ManifestNotLoaded)
        ));

        let transport = StubTransport::new().serve(MANIFEST_URL, SCENARIO);
        let session = loaded(&transport).await;
        assert!(matches!(
            session.uninstall(&offline, "2.2", "1.0", Variant::Geode).await,
            Err(InstallerError::FolderNotSelected)
        ));
    }

    #[tokio::test]
    async fn unknown_selection_is_rejected_before_any_io() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("GeometryDash.exe"), b"exe").unwrap();
        let transport = StubTransport::new().serve(MANIFEST_URL, SCENARIO);
        let mut session = loaded(&transport).await;
        session.select_folder(dir.path(), "2.2").unwrap();

        let offline = MockTransport::new();
        for (base, version, variant) in [
            ("2.2", "1.0", Variant::Default),
            ("2.2", "2.0", Variant::Geode),
            ("2.1", "1.0", Variant::Geode),
        ] {
            assert!(matches!(
                session.install(&offline, base, version, variant).await,
                Err(InstallerError::SelectionInvalid(_))
            ));
        }
    }

    #[tokio::test]
    async fn reload_invalidates_dropped_base_versions() {
        let transport = StubTransport::new().serve(MANIFEST_URL, SCENARIO);
        let mut session = loaded(&transport).await;
        assert_eq!(session.list_addons("2.2").unwrap().len(), 1);

        let reloaded = StubTransport::new().serve(
            MANIFEST_URL,
            r#"{"gd_versions":{"2.206":{"mh_versions":[{"version":"8.1","variant":"default"}]}}}"#,
        );
        session
            .load_manifest(&ManifestStore::new(&reloaded, MANIFEST_URL))
            .await
            .unwrap();

        assert_eq!(session.list_base_versions().unwrap(), vec!["2.206"]);
        assert!(matches!(
            session.list_addons("2.2"),
            Err(InstallerError::SelectionInvalid(_))
        ));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let transport = StubTransport::new().serve(MANIFEST_URL, SCENARIO);
        let mut session = loaded(&transport).await;

        let broken = StubTransport::new().serve(MANIFEST_URL, "{oops");
        let err = session
            .load_manifest(&ManifestStore::new(&broken, MANIFEST_URL))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::Parse(_)));
        assert_eq!(session.list_base_versions().unwrap(), vec!["2.2"]);
    }

    #[tokio::test]
    async fn uninstall_of_absent_geode_package_is_not_found() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("GeometryDash.exe"), b"exe").unwrap();
        let transport = StubTransport::new().serve(MANIFEST_URL, SCENARIO);
        let mut session = loaded(&transport).await;
        session.select_folder(dir.path(), "2.2").unwrap();

        let err = session
            .uninstall(&transport, "2.2", "1.0", Variant::Geode)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

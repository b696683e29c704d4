//! CLI command action handlers

use super::App;
use crate::manifest::Variant;
use anyhow::{bail, Context, Result};
use std::path::Path;

impl App {
    // ========== Manifest Commands ==========

    pub async fn cmd_versions(&mut self) -> Result<()> {
        self.load_manifest().await?;
        let versions = self.session.list_base_versions()?;

        if versions.is_empty() {
            println!("The manifest lists no Geometry Dash versions.");
            return Ok(());
        }

        println!("Supported Geometry Dash versions:");
        println!("{:-<40}", "");
        for base in &versions {
            let count = self.session.list_addons(base)?.len();
            println!("  {} ({} Mega Hack build(s))", base, count);
        }
        Ok(())
    }

    pub async fn cmd_addons(&mut self, base: &str) -> Result<()> {
        self.load_manifest().await?;
        let addons = self.session.list_addons(base)?;

        if addons.is_empty() {
            println!("No Mega Hack builds listed for GD {}.", base);
            return Ok(());
        }

        println!("Mega Hack builds for GD {}:", base);
        println!("{:-<40}", "");
        for addon in &addons {
            println!("  {}", addon);
        }
        Ok(())
    }

    // ========== Folder Commands ==========

    pub async fn cmd_check(&mut self, folder: &Path, base: &str) -> Result<()> {
        self.load_manifest().await?;
        let target = self
            .session
            .select_folder(folder, base)
            .with_context(|| format!("{} is not a valid GD {} folder", folder.display(), base))?;

        println!("Folder is valid for GD {}", base);
        println!("  Game folder: {}", target.root.display());
        println!("  Geode mods:  {}", target.mod_loader.display());
        Ok(())
    }

    // ========== Install Commands ==========

    pub async fn cmd_install(
        &mut self,
        folder: &Path,
        base: &str,
        version: &str,
        variant: &str,
    ) -> Result<()> {
        let variant = parse_variant(variant)?;
        self.prepare_folder(folder, base).await?;

        println!("Installing Mega Hack {} ({})...", version, variant.display_name());
        let report = self
            .session
            .install(&self.transport, base, version, variant)
            .await
            .context("Failed to install Mega Hack")?;

        for path in &report.placed {
            println!("  + {}", path.display());
        }
        println!("Mega Hack installed successfully!");
        Ok(())
    }

    pub async fn cmd_uninstall(
        &mut self,
        folder: &Path,
        base: &str,
        version: &str,
        variant: &str,
    ) -> Result<()> {
        let variant = parse_variant(variant)?;
        self.prepare_folder(folder, base).await?;

        let report = match self
            .session
            .uninstall(&self.transport, base, version, variant)
            .await
        {
            Ok(report) => report,
            Err(e) if e.is_not_found() => {
                println!("{}", e);
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to uninstall Mega Hack"),
        };

        for path in &report.removed {
            println!("  - {}", path.display());
        }
        for failure in &report.failures {
            eprintln!("  ! {}", failure);
        }
        if let Some(guard) = &report.restored_guard {
            println!("  restored {}", guard.display());
        }
        if let Some(e) = &report.guard_failure {
            eprintln!("  ! could not restore XInput1_4.dll: {}", e);
        }

        if report.is_clean() {
            println!("Mega Hack {} uninstalled.", variant.display_name());
        } else if report.failures.is_empty() {
            bail!("Uninstall removed Mega Hack but could not restore XInput1_4.dll");
        } else {
            bail!(
                "Uninstall finished with {} file(s) that could not be removed",
                report.failures.len()
            );
        }
        Ok(())
    }

    // ========== Misc ==========

    pub fn cmd_config(&self) -> Result<()> {
        println!("Configuration");
        println!("{:-<40}", "");
        println!("Config file:  {}", self.config.paths.config_file().display());
        println!("Log file:     {}", self.config.paths.log_file().display());
        println!("Manifest URL: {}", self.config.manifest_url);
        println!("User agent:   {}", self.config.user_agent);
        println!("Timeout:      {}s", self.config.request_timeout_secs);
        Ok(())
    }

    async fn prepare_folder(&mut self, folder: &Path, base: &str) -> Result<()> {
        self.load_manifest().await?;
        self.session
            .select_folder(folder, base)
            .with_context(|| format!("{} is not a valid GD {} folder", folder.display(), base))?;
        Ok(())
    }
}

fn parse_variant(value: &str) -> Result<Variant> {
    match Variant::from_cli(value) {
        Some(v) => Ok(v),
        None => bail!("Unknown variant '{}'. Valid values: geode, default", value),
    }
}

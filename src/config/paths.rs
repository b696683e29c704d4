//! XDG-compliant path management

use directories::ProjectDirs;
use std::path::PathBuf;

/// Manages all application paths using XDG base directory specification
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directories from XDG; `None` when no home directory can be found
    dirs: Option<ProjectDirs>,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Paths {
    fn eq(&self, other: &Self) -> bool {
        self.config_dir() == other.config_dir() && self.data_dir() == other.data_dir()
    }
}

impl Paths {
    pub fn new() -> Self {
        Self {
            dirs: ProjectDirs::from("", "", "mh-installer"),
        }
    }

    /// Fallback root when XDG directories are unavailable: ./.mh-installer
    fn fallback_dir() -> PathBuf {
        PathBuf::from(".mh-installer")
    }

    /// Config directory: ~/.config/mh-installer/
    pub fn config_dir(&self) -> PathBuf {
        self.dirs
            .as_ref()
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(Self::fallback_dir)
    }

    /// Main config file: ~/.config/mh-installer/config.toml
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    /// Data directory: ~/.local/share/mh-installer/
    pub fn data_dir(&self) -> PathBuf {
        self.dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(Self::fallback_dir)
    }

    /// Log file: ~/.local/share/mh-installer/mh-installer.log
    pub fn log_file(&self) -> PathBuf {
        self.data_dir().join("mh-installer.log")
    }
}

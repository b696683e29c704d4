//! mh-installer - installs and removes Mega Hack on Geometry Dash
//!
//! This crate provides:
//! - Compatibility manifest loading and version/addon queries
//! - Game folder validation against per-version required files
//! - Geode package placement and Default archive extraction
//! - Uninstall with loader shim restore

pub mod app;
pub mod config;
pub mod error;
pub mod install;
pub mod manifest;
pub mod net;

pub use app::{App, Session};
pub use config::Config;
pub use error::{InstallerError, Result};

//! Application state and orchestration

mod actions;
pub mod state;

pub use state::Session;

use crate::config::Config;
use crate::manifest::{Manifest, ManifestStore};
use crate::net::{HttpTransport, ProgressCallback};

use anyhow::{Context, Result};
use std::sync::Arc;

/// Main application struct: configuration, HTTP transport and the session
pub struct App {
    pub config: Config,
    pub transport: HttpTransport,
    pub session: Session,
}

impl App {
    /// Create a new App instance
    pub fn new(config: Config) -> Result<Self> {
        Self::with_progress(config, None)
    }

    /// Create an App whose downloads report progress through `progress`
    pub fn with_progress(config: Config, progress: Option<ProgressCallback>) -> Result<Self> {
        config.validate()?;

        let mut transport = HttpTransport::new(&config.user_agent, config.request_timeout())?;
        if let Some(progress) = progress {
            transport = transport.with_progress(progress);
        }

        Ok(Self {
            config,
            transport,
            session: Session::new(),
        })
    }

    /// Fetch the manifest into the session
    pub async fn load_manifest(&mut self) -> Result<Arc<Manifest>> {
        let store = ManifestStore::new(&self.transport, self.config.manifest_url.clone());
        self.session
            .load_manifest(&store)
            .await
            .with_context(|| format!("Failed to load manifest from {}", store.url()))
    }
}

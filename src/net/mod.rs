//! HTTP transport used for the manifest and artifact downloads

use crate::error::{InstallerError, Result};
use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Progress callback for downloads
/// Parameters: (downloaded_bytes, total_bytes); total is 0 when unknown
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// The two network primitives the engines need.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// Stream `url` into a newly created file at `dest`, returning bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
    progress: Option<ProgressCallback>,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| InstallerError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.get(url).await?;
        response.text().await.map_err(|source| InstallerError::Network {
            url: url.to_string(),
            source,
        })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        tracing::debug!("Downloading {} -> {}", url, dest.display());
        let response = self.get(url).await?;
        let total_size = response.content_length().unwrap_or(0);

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| InstallerError::fs(dest, e))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| InstallerError::Network {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| InstallerError::fs(dest, e))?;
            downloaded += chunk.len() as u64;
            if let Some(ref cb) = self.progress {
                cb(downloaded, total_size);
            }
        }

        file.flush().await.map_err(|e| InstallerError::fs(dest, e))?;
        Ok(downloaded)
    }
}

/// In-memory transport for tests: serves fixed bodies and records every URL asked for.
#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct StubTransport {
        bodies: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(url.to_string(), body.into());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn lookup(&self, url: &str) -> Result<&Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            self.bodies.get(url).ok_or_else(|| InstallerError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get_text(&self, url: &str) -> Result<String> {
            let body = self.lookup(url)?;
            Ok(String::from_utf8_lossy(body).into_owned())
        }

        async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
            let body = self.lookup(url)?;
            std::fs::write(dest, body).map_err(|e| InstallerError::fs(dest, e))?;
            Ok(body.len() as u64)
        }
    }
}

use super::file::SnapshotFileSource;
use super::http::HttpSnapshotSource;
use super::source::CaptureSource;
use crate::config::{CameraConfig, CameraSourceConfig};
use crate::error::{PodiumError, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for the configured capture source
pub struct CaptureSourceBuilder {
    config: Option<CameraConfig>,
    http: Option<Client>,
}

impl CaptureSourceBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            http: None,
        }
    }

    pub fn config(mut self, config: CameraConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// HTTP client shared with the remote services
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Arc<dyn CaptureSource>> {
        let config = self
            .config
            .ok_or_else(|| PodiumError::system("Camera configuration must be specified"))?;

        match config.source {
            CameraSourceConfig::File { path, max_age_ms } => {
                info!("Using snapshot file camera source at {}", path);
                Ok(Arc::new(SnapshotFileSource::new(
                    path,
                    Duration::from_millis(max_age_ms),
                )))
            }
            CameraSourceConfig::Http { url } => {
                let http = self.http.ok_or_else(|| {
                    PodiumError::system("HTTP camera source requires an HTTP client")
                })?;
                info!("Using HTTP snapshot camera source at {}", url);
                Ok(Arc::new(HttpSnapshotSource::new(http, url)))
            }
        }
    }
}

impl Default for CaptureSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

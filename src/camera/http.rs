use super::source::CaptureSource;
use crate::error::CaptureError;
use crate::frame::FrameData;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::trace;

/// Fetches the current frame from a camera snapshot endpoint
pub struct HttpSnapshotSource {
    http: Client,
    url: String,
    frame_counter: AtomicU64,
}

impl HttpSnapshotSource {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            frame_counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl CaptureSource for HttpSnapshotSource {
    async fn latest_frame(&self) -> Result<FrameData, CaptureError> {
        let unavailable = |details: String| CaptureError::Unavailable {
            details: format!("{}: {}", self.url, details),
        };

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if body.is_empty() {
            return Err(CaptureError::Empty);
        }

        let id = self.frame_counter.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("Fetched frame {} ({} bytes) from {}", id, body.len(), self.url);

        Ok(FrameData::new(id, SystemTime::now(), body.to_vec()))
    }

    fn name(&self) -> &str {
        "snapshot_http"
    }
}

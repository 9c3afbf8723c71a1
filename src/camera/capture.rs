use super::source::CaptureSource;
use crate::error::CaptureError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// A frame persisted for the current Recording cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    pub local_path: PathBuf,
    /// Set once the frame has been uploaded
    pub remote_url: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub frame_id: u64,
}

impl CaptureRecord {
    pub fn with_remote_url(mut self, url: String) -> Self {
        self.remote_url = Some(url);
        self
    }
}

/// Pull the latest frame from `source` and write it to `path`, replacing
/// any earlier capture.
pub async fn capture_snapshot(
    source: &dyn CaptureSource,
    path: &Path,
) -> Result<CaptureRecord, CaptureError> {
    let frame = source.latest_frame().await?;
    if frame.is_empty() {
        return Err(CaptureError::Empty);
    }
    if !frame.is_jpeg() {
        warn!(
            "Frame {} from {} does not start with a JPEG marker",
            frame.id,
            source.name()
        );
    }

    let persist_error = |e: std::io::Error| CaptureError::Persist {
        path: path.display().to_string(),
        details: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(persist_error)?;
    }

    // Write beside the target and rename so readers never see a partial file
    let mut staging = path.as_os_str().to_owned();
    staging.push(".part");
    let staging = PathBuf::from(staging);

    fs::write(&staging, frame.data.as_slice())
        .await
        .map_err(persist_error)?;
    fs::rename(&staging, path).await.map_err(persist_error)?;

    debug!(
        "Captured frame {} from {} ({} bytes) to {}",
        frame.id,
        source.name(),
        frame.data.len(),
        path.display()
    );

    Ok(CaptureRecord {
        local_path: path.to_path_buf(),
        remote_url: None,
        captured_at: DateTime::<Utc>::from(frame.timestamp),
        frame_id: frame.id,
    })
}

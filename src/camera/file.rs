use super::source::CaptureSource;
use crate::error::CaptureError;
use crate::frame::FrameData;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::trace;

/// Reads the JPEG file a camera process keeps overwriting with its newest
/// frame.
pub struct SnapshotFileSource {
    path: PathBuf,
    max_age: Duration,
    frame_counter: AtomicU64,
}

impl SnapshotFileSource {
    pub fn new<P: Into<PathBuf>>(path: P, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
            frame_counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl CaptureSource for SnapshotFileSource {
    async fn latest_frame(&self) -> Result<FrameData, CaptureError> {
        let metadata = fs::metadata(&self.path)
            .await
            .map_err(|e| CaptureError::Unavailable {
                details: format!("{}: {}", self.path.display(), e),
            })?;

        let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());

        let data = fs::read(&self.path)
            .await
            .map_err(|e| CaptureError::Unavailable {
                details: format!("{}: {}", self.path.display(), e),
            })?;
        if data.is_empty() {
            return Err(CaptureError::Empty);
        }

        let mut frame = FrameData::new(0, modified, data);
        if !self.max_age.is_zero() && frame.is_older_than(self.max_age) {
            return Err(CaptureError::Stale {
                age_ms: frame.age_ms(),
            });
        }

        frame.id = self.frame_counter.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(
            "Read frame {} ({} bytes) from {}",
            frame.id,
            frame.data.len(),
            self.path.display()
        );

        Ok(frame)
    }

    fn name(&self) -> &str {
        "snapshot_file"
    }
}

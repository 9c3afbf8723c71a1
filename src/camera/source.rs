use crate::error::CaptureError;
use crate::frame::{FrameData, FrameSlot};
use async_trait::async_trait;

/// Produces the most recent camera frame on demand.
///
/// Implementations return whatever frame is newest at call time; they never
/// trigger a fresh exposure.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn latest_frame(&self) -> Result<FrameData, CaptureError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

#[async_trait]
impl CaptureSource for FrameSlot {
    async fn latest_frame(&self) -> Result<FrameData, CaptureError> {
        let frame = self.latest().await.ok_or_else(|| CaptureError::Unavailable {
            details: "no frame published yet".to_string(),
        })?;

        if frame.is_empty() {
            return Err(CaptureError::Empty);
        }

        Ok(frame)
    }

    fn name(&self) -> &str {
        "frame_slot"
    }
}

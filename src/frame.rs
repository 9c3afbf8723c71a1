use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::trace;

/// One encoded camera frame
#[derive(Debug, Clone)]
pub struct FrameData {
    /// Unique frame identifier
    pub id: u64,
    /// Timestamp when the frame was produced
    pub timestamp: SystemTime,
    /// Encoded JPEG bytes (shared ownership for efficiency)
    pub data: Arc<Vec<u8>>,
}

impl FrameData {
    pub fn new(id: u64, timestamp: SystemTime, data: Vec<u8>) -> Self {
        Self {
            id,
            timestamp,
            data: Arc::new(data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the payload starts with the JPEG SOI marker
    pub fn is_jpeg(&self) -> bool {
        self.data.starts_with(&[0xFF, 0xD8])
    }

    /// Get frame age in milliseconds
    pub fn age_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.timestamp)
            .unwrap_or_default()
            .as_millis() as u64
    }

    pub fn is_older_than(&self, duration: Duration) -> bool {
        SystemTime::now()
            .duration_since(self.timestamp)
            .map(|age| age > duration)
            .unwrap_or(false)
    }
}

/// Holds the most recently produced frame.
///
/// A camera task publishes into the slot; readers always get the latest
/// frame without waiting for a new exposure.
pub struct FrameSlot {
    latest: RwLock<Option<FrameData>>,
    frame_counter: AtomicU64,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(None),
            frame_counter: AtomicU64::new(0),
        }
    }

    /// Replace the held frame
    pub async fn publish(&self, frame: FrameData) {
        trace!("Publishing frame {}", frame.id);
        let mut slot = self.latest.write().await;
        *slot = Some(frame);
    }

    /// Wrap raw bytes in a new frame and publish it
    pub async fn publish_bytes(&self, data: Vec<u8>) -> u64 {
        let id = self.next_frame_id();
        self.publish(FrameData::new(id, SystemTime::now(), data))
            .await;
        id
    }

    pub async fn latest(&self) -> Option<FrameData> {
        self.latest.read().await.clone()
    }

    pub fn next_frame_id(&self) -> u64 {
        self.frame_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn clear(&self) {
        let mut slot = self.latest.write().await;
        *slot = None;
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

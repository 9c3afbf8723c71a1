use crate::camera::CaptureRecord;
use crate::feedback::{ClassificationResult, FeedbackDecision, ReportRecord};
use crate::state::DeviceState;
use std::time::Duration;

/// What one cycle of the device loop did
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub state: DeviceState,
    /// Present only for Recording cycles
    pub recording: Option<RecordingOutcome>,
    /// Whether every indicator write succeeded
    pub actuation_ok: bool,
    pub elapsed: Duration,
}

/// Result of the capture, classify, feedback and report pipeline
#[derive(Debug, Clone)]
pub struct RecordingOutcome {
    /// `None` when capture or upload failed
    pub capture: Option<CaptureRecord>,
    pub classification: ClassificationResult,
    pub decision: FeedbackDecision,
    pub report: Option<ReportRecord>,
    pub report_submitted: bool,
}

/// Why the device loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(String),
    Cancelled,
    SingleCycle,
}

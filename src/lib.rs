pub mod actuator;
pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod feedback;
pub mod frame;
pub mod recovery;
pub mod remote;
pub mod state;

pub use actuator::{ActuatorPanel, Indicator, Level, OutputLines};
pub use app::{CycleOutcome, DeviceLoop, LoopStats, ShutdownReason};
pub use camera::{CaptureRecord, CaptureSource, CaptureSourceBuilder};
pub use config::PodiumConfig;
pub use error::{PodiumError, Result};
pub use feedback::{ClassificationAggregator, ClassificationResult, FeedbackDecision, ReportRecord};
pub use frame::{FrameData, FrameSlot};
pub use recovery::RetryPolicy;
pub use state::DeviceState;

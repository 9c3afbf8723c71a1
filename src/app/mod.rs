mod cadence;
mod device_loop;
mod pipeline;
mod runtime;
mod startup;
mod stats;
mod types;


pub use cadence::CyclePacing;
pub use device_loop::{Collaborators, DeviceLoop, LoopSettings};
pub use stats::LoopStats;
pub use types::{CycleOutcome, RecordingOutcome, ShutdownReason};

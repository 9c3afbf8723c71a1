mod indicator;
mod lines;
mod mapping;
mod mock;
mod panel;
mod sysfs;
#[cfg(test)]
mod tests;

pub use indicator::{Indicator, IndicatorWrite, Level};
pub use lines::OutputLines;
pub use mapping::{feedback_writes, plan, steady_writes};
pub use mock::MockOutputLines;
pub use panel::{ActuatorPanel, ChannelBindings};
pub use sysfs::SysfsOutputLines;

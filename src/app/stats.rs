use crate::state::DeviceState;
use serde::Serialize;
use tracing::info;

/// Counters kept by the device loop across its lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub cycles: u64,
    pub standby_cycles: u64,
    pub recording_cycles: u64,
    pub reporting_cycles: u64,
    pub disconnected_cycles: u64,
    pub status_failures: u64,
    pub capture_failures: u64,
    pub upload_failures: u64,
    pub classifier_failures: u64,
    pub reports_submitted: u64,
    pub report_failures: u64,
    pub actuation_failures: u64,
}

impl LoopStats {
    pub fn record_cycle(&mut self, state: DeviceState) {
        self.cycles += 1;
        match state {
            DeviceState::Standby => self.standby_cycles += 1,
            DeviceState::Recording => self.recording_cycles += 1,
            DeviceState::Reporting => self.reporting_cycles += 1,
            DeviceState::Disconnected => self.disconnected_cycles += 1,
        }
    }

    pub fn log_summary(&self) {
        info!(
            cycles = self.cycles,
            recording = self.recording_cycles,
            reports_submitted = self.reports_submitted,
            report_failures = self.report_failures,
            status_failures = self.status_failures,
            capture_failures = self.capture_failures,
            upload_failures = self.upload_failures,
            classifier_failures = self.classifier_failures,
            actuation_failures = self.actuation_failures,
            "Device loop statistics"
        );
    }
}

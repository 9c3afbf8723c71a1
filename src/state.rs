use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating state of the device, derived from the latest status poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeviceState {
    /// No session, unknown user or unreachable status service
    #[default]
    Disconnected,
    /// Session open, presentation not started
    Standby,
    /// Presentation in progress; capture and feedback active
    Recording,
    /// Presentation ended, report being processed
    Reporting,
}

impl DeviceState {
    pub const STANDBY_CODE: i64 = 1;
    pub const RECORDING_CODE: i64 = 2;
    pub const REPORTING_CODE: i64 = 3;

    /// Interpret a status code. Anything outside {1, 2, 3}, including a
    /// missing code, means Disconnected.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(Self::STANDBY_CODE) => DeviceState::Standby,
            Some(Self::RECORDING_CODE) => DeviceState::Recording,
            Some(Self::REPORTING_CODE) => DeviceState::Reporting,
            _ => DeviceState::Disconnected,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, DeviceState::Recording)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Disconnected => "disconnected",
            DeviceState::Standby => "standby",
            DeviceState::Recording => "recording",
            DeviceState::Reporting => "reporting",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(DeviceState::from_code(Some(1)), DeviceState::Standby);
        assert_eq!(DeviceState::from_code(Some(2)), DeviceState::Recording);
        assert_eq!(DeviceState::from_code(Some(3)), DeviceState::Reporting);
    }

    #[test]
    fn test_unknown_codes_disconnect() {
        for code in [Some(0), Some(4), Some(-1), Some(i64::MAX), None] {
            assert_eq!(DeviceState::from_code(code), DeviceState::Disconnected);
        }
        assert_eq!(DeviceState::default(), DeviceState::Disconnected);
    }
}

use crate::config::TimingConfig;
use crate::state::DeviceState;
use std::time::Duration;

/// Inter-cycle delay policy.
///
/// Idle states wait a fixed interval before the next poll. Recording
/// re-polls as soon as the minimum cycle interval has elapsed, which bounds
/// the poll rate even when the pipeline returns quickly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclePacing {
    pub idle_interval: Duration,
    pub recording_min_interval: Duration,
}

impl CyclePacing {
    pub fn from_config(config: &TimingConfig) -> Self {
        Self {
            idle_interval: config.idle_interval(),
            recording_min_interval: config.recording_min_interval(),
        }
    }

    /// Delay before the next poll, given the state just acted on and how
    /// long that cycle took
    pub fn delay_after(&self, state: DeviceState, elapsed: Duration) -> Duration {
        match state {
            DeviceState::Recording => self.recording_min_interval.saturating_sub(elapsed),
            DeviceState::Standby | DeviceState::Reporting | DeviceState::Disconnected => {
                self.idle_interval
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacing() -> CyclePacing {
        CyclePacing {
            idle_interval: Duration::from_secs(3),
            recording_min_interval: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_idle_states_wait_fixed_interval() {
        for state in [
            DeviceState::Standby,
            DeviceState::Reporting,
            DeviceState::Disconnected,
        ] {
            assert_eq!(
                pacing().delay_after(state, Duration::from_secs(10)),
                Duration::from_secs(3)
            );
        }
    }

    #[test]
    fn test_recording_waits_remainder_of_min_interval() {
        let pacing = pacing();
        assert_eq!(
            pacing.delay_after(DeviceState::Recording, Duration::from_millis(200)),
            Duration::from_millis(300)
        );
        assert_eq!(
            pacing.delay_after(DeviceState::Recording, Duration::from_secs(2)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_from_config() {
        let timing = TimingConfig {
            idle_interval_ms: 3000,
            recording_min_interval_ms: 0,
            call_timeout_ms: 1000,
        };
        let pacing = CyclePacing::from_config(&timing);
        assert_eq!(pacing.idle_interval, Duration::from_secs(3));
        assert_eq!(
            pacing.delay_after(DeviceState::Recording, Duration::ZERO),
            Duration::ZERO
        );
    }
}

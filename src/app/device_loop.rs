use super::cadence::CyclePacing;
use super::stats::LoopStats;
use super::types::{CycleOutcome, ShutdownReason};
use crate::actuator::ActuatorPanel;
use crate::camera::CaptureSource;
use crate::config::PodiumConfig;
use crate::error::{ActuationError, NetworkError};
use crate::feedback::ClassificationAggregator;
use crate::recovery::RetryPolicy;
use crate::remote::{
    ExpressionClassifier, EyeContactClassifier, GestureClassifier, ImageUploader, ReportSink,
    StatusSource,
};
use crate::state::DeviceState;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// External collaborators the loop talks to
#[derive(Clone)]
pub struct Collaborators {
    pub status: Arc<dyn StatusSource>,
    pub camera: Arc<dyn CaptureSource>,
    pub uploader: Arc<dyn ImageUploader>,
    pub expression: Arc<dyn ExpressionClassifier>,
    pub eye_contact: Arc<dyn EyeContactClassifier>,
    pub gesture: Arc<dyn GestureClassifier>,
    pub reports: Arc<dyn ReportSink>,
}

/// Timing and retry knobs of the loop
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Fixed local path each capture overwrites
    pub snapshot_path: PathBuf,
    /// Bound applied to every collaborator call
    pub call_timeout: Duration,
    /// Retries for status polls and report submissions
    pub retry: RetryPolicy,
    pub pacing: CyclePacing,
}

impl LoopSettings {
    pub fn from_config(config: &PodiumConfig) -> Self {
        Self {
            snapshot_path: PathBuf::from(&config.camera.snapshot_path),
            call_timeout: config.timing.call_timeout(),
            retry: RetryPolicy::from_config(&config.retry),
            pacing: CyclePacing::from_config(&config.timing),
        }
    }
}

/// The device state machine.
///
/// Level-triggered: every cycle polls the status service and re-applies the
/// full action set of the resulting state, whatever the previous state was.
/// Owns the indicator panel and the current state exclusively.
pub struct DeviceLoop {
    pub(super) collaborators: Collaborators,
    pub(super) panel: ActuatorPanel,
    pub(super) aggregator: ClassificationAggregator,
    pub(super) settings: LoopSettings,
    pub(super) state: DeviceState,
    pub(super) stats: LoopStats,
}

impl DeviceLoop {
    pub fn new(
        collaborators: Collaborators,
        panel: ActuatorPanel,
        aggregator: ClassificationAggregator,
        settings: LoopSettings,
    ) -> Self {
        Self {
            collaborators,
            panel,
            aggregator,
            settings,
            state: DeviceState::Disconnected,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn panel(&self) -> &ActuatorPanel {
        &self.panel
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    /// Poll the status service. A poll that still fails after retries
    /// counts as Disconnected.
    pub async fn poll_state(&mut self) -> DeviceState {
        let status = &self.collaborators.status;
        let call_timeout = self.settings.call_timeout;

        let result = self
            .settings
            .retry
            .run("status poll", || {
                with_timeout("status", call_timeout, status.poll())
            })
            .await;

        match result {
            Ok(code) => {
                debug!("Status poll returned {:?}", code);
                DeviceState::from_code(code)
            }
            Err(e) => {
                warn!("Status poll failed, treating device as disconnected: {}", e);
                self.stats.status_failures += 1;
                DeviceState::Disconnected
            }
        }
    }

    /// Run one cycle: poll, transition, and apply the state's actions
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let started = Instant::now();
        let state = self.poll_state().await;

        if state != self.state {
            info!("Device state {} -> {}", self.state, state);
        }
        self.state = state;
        self.stats.record_cycle(state);

        let mut actuation_ok = true;
        let recording = match state {
            DeviceState::Recording => {
                actuation_ok &= self.actuate(|panel| panel.show_steady(DeviceState::Recording));
                let recording = self.run_recording().await;
                actuation_ok &= self.actuate(|panel| panel.show_feedback(&recording.decision));
                Some(recording)
            }
            other => {
                actuation_ok &= self.actuate(|panel| panel.show_state(other));
                None
            }
        };

        CycleOutcome {
            state,
            recording,
            actuation_ok,
            elapsed: started.elapsed(),
        }
    }

    /// Cycle until `cancel` fires, pacing polls per [`CyclePacing`]
    pub async fn run(&mut self, cancel: CancellationToken) -> ShutdownReason {
        info!("Device loop running");

        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.run_cycle() => outcome,
            };

            let delay = self
                .settings
                .pacing
                .delay_after(outcome.state, outcome.elapsed);
            if delay.is_zero() {
                continue;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        self.shutdown();
        ShutdownReason::Cancelled
    }

    /// Drive every indicator low and log the loop statistics
    pub fn shutdown(&mut self) {
        info!("Device loop stopping, clearing indicators");
        if let Err(e) = self.panel.clear_all() {
            error!("Failed to clear indicators on shutdown: {}", e);
        }
        self.state = DeviceState::Disconnected;
        self.stats.log_summary();
    }

    /// Apply indicator writes best-effort; failures are logged and counted
    fn actuate<F>(&mut self, write: F) -> bool
    where
        F: FnOnce(&mut ActuatorPanel) -> Result<(), ActuationError>,
    {
        match write(&mut self.panel) {
            Ok(()) => true,
            Err(e) => {
                error!("Indicator update failed: {}", e);
                self.stats.actuation_failures += 1;
                false
            }
        }
    }
}

/// Bound a remote call; expiry becomes a per-cycle timeout error
pub(crate) async fn with_timeout<T, F>(
    endpoint: &str,
    limit: Duration,
    call: F,
) -> Result<T, NetworkError>
where
    F: Future<Output = Result<T, NetworkError>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(NetworkError::Timeout {
            endpoint: endpoint.to_string(),
            timeout: limit,
        }),
    }
}

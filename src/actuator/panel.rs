use super::indicator::{Indicator, IndicatorWrite, Level};
use super::lines::OutputLines;
use super::mapping::{feedback_writes, plan, steady_writes};
use crate::config::ChannelLines;
use crate::error::ActuationError;
use crate::feedback::FeedbackDecision;
use crate::state::DeviceState;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Output lines bound to each indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBindings {
    lines: BTreeMap<Indicator, Vec<u32>>,
}

impl ChannelBindings {
    pub fn from_config(config: &ChannelLines) -> Self {
        let lines = BTreeMap::from([
            (Indicator::White, config.white.clone()),
            (Indicator::Red, config.red.clone()),
            (Indicator::Yellow, config.yellow.clone()),
            (Indicator::Green, config.green.clone()),
            (Indicator::Blue, config.blue.clone()),
        ]);
        Self { lines }
    }

    pub fn lines(&self, indicator: Indicator) -> &[u32] {
        self.lines
            .get(&indicator)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_lines(&self) -> Vec<u32> {
        let mut all: Vec<u32> = self.lines.values().flatten().copied().collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

/// Drives the indicator channels. Owned by the device loop; the only
/// writer of the physical lines.
pub struct ActuatorPanel {
    bindings: ChannelBindings,
    lines: Arc<dyn OutputLines>,
    levels: BTreeMap<Indicator, Level>,
}

impl ActuatorPanel {
    pub fn new(bindings: ChannelBindings, lines: Arc<dyn OutputLines>) -> Self {
        Self {
            bindings,
            lines,
            levels: BTreeMap::new(),
        }
    }

    /// Prepare every bound line for output
    pub fn initialize(&self) -> Result<(), ActuationError> {
        self.lines.prepare(&self.bindings.all_lines())
    }

    /// Write each indicator to all of its lines. Every write is attempted;
    /// the first failure is returned afterwards.
    pub fn apply(&mut self, writes: &[IndicatorWrite]) -> Result<(), ActuationError> {
        let mut first_error = None;

        for write in writes {
            for &line in self.bindings.lines(write.indicator) {
                if let Err(e) = self.lines.set(line, write.level) {
                    warn!("Indicator {} write failed: {}", write.indicator, e);
                    first_error.get_or_insert(e);
                }
            }
            trace!("Indicator {} -> {:?}", write.indicator, write.level);
            self.levels.insert(write.indicator, write.level);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Full indicator set for `state`, feedback cleared
    pub fn show_state(&mut self, state: DeviceState) -> Result<(), ActuationError> {
        self.apply(&plan(state, None))
    }

    /// State indicators only; feedback overlays untouched
    pub fn show_steady(&mut self, state: DeviceState) -> Result<(), ActuationError> {
        self.apply(&steady_writes(state))
    }

    pub fn show_feedback(&mut self, decision: &FeedbackDecision) -> Result<(), ActuationError> {
        self.apply(&feedback_writes(decision))
    }

    /// Drive every indicator low
    pub fn clear_all(&mut self) -> Result<(), ActuationError> {
        self.show_state(DeviceState::Disconnected)
    }

    /// Last level written to `indicator`, if any
    pub fn level(&self, indicator: Indicator) -> Option<Level> {
        self.levels.get(&indicator).copied()
    }

    pub fn levels(&self) -> BTreeMap<Indicator, Level> {
        self.levels.clone()
    }

    pub fn bindings(&self) -> &ChannelBindings {
        &self.bindings
    }
}

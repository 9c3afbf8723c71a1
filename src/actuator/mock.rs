use super::indicator::Level;
use super::lines::OutputLines;
use crate::error::ActuationError;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// In-memory output lines for running without hardware
#[derive(Default)]
pub struct MockOutputLines {
    levels: Mutex<HashMap<u32, Level>>,
    writes: Mutex<Vec<(u32, Level)>>,
    failing: Mutex<HashSet<u32>>,
}

impl MockOutputLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `line` fail
    pub fn fail_line(&self, line: u32) {
        self.failing.lock().insert(line);
    }

    pub fn level(&self, line: u32) -> Option<Level> {
        self.levels.lock().get(&line).copied()
    }

    pub fn levels(&self) -> HashMap<u32, Level> {
        self.levels.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl OutputLines for MockOutputLines {
    fn prepare(&self, _lines: &[u32]) -> Result<(), ActuationError> {
        Ok(())
    }

    fn set(&self, line: u32, level: Level) -> Result<(), ActuationError> {
        if self.failing.lock().contains(&line) {
            return Err(ActuationError::Write {
                line,
                details: "injected failure".to_string(),
            });
        }

        trace!("Mock line {} -> {:?}", line, level);
        self.writes.lock().push((line, level));
        self.levels.lock().insert(line, level);
        Ok(())
    }
}

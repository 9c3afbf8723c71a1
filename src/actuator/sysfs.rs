use super::indicator::Level;
use super::lines::OutputLines;
use crate::error::ActuationError;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// GPIO lines driven through the sysfs class interface
/// (`{root}/export`, `{root}/gpioN/direction`, `{root}/gpioN/value`)
pub struct SysfsOutputLines {
    root: PathBuf,
    prepared: Mutex<HashSet<u32>>,
}

impl SysfsOutputLines {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            prepared: Mutex::new(HashSet::new()),
        }
    }

    fn line_dir(&self, line: u32) -> PathBuf {
        self.root.join(format!("gpio{}", line))
    }

    fn write_attribute(path: &Path, value: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
        file.write_all(value.as_bytes())?;
        file.flush()
    }

    /// Export `line` if needed and set it as an output
    fn prepare_line(&self, line: u32) -> Result<(), ActuationError> {
        let line_dir = self.line_dir(line);
        if !line_dir.exists() {
            Self::write_attribute(&self.root.join("export"), &line.to_string()).map_err(|e| {
                ActuationError::Export {
                    line,
                    details: e.to_string(),
                }
            })?;
            debug!("Exported GPIO line {}", line);
        }

        Self::write_attribute(&line_dir.join("direction"), "out").map_err(|e| {
            ActuationError::Export {
                line,
                details: format!("set direction: {}", e),
            }
        })
    }

    pub fn is_prepared(&self, line: u32) -> bool {
        self.prepared.lock().contains(&line)
    }
}

impl OutputLines for SysfsOutputLines {
    /// Every line is attempted; the first failure is returned afterwards.
    /// Lines that failed here are prepared again on their next write.
    fn prepare(&self, lines: &[u32]) -> Result<(), ActuationError> {
        let mut prepared = self.prepared.lock();
        let mut first_error = None;

        for &line in lines {
            if prepared.contains(&line) {
                continue;
            }

            match self.prepare_line(line) {
                Ok(()) => {
                    prepared.insert(line);
                }
                Err(e) => {
                    warn!("GPIO line {} not ready: {}", line, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("GPIO lines ready: {:?}", lines);
                Ok(())
            }
        }
    }

    fn set(&self, line: u32, level: Level) -> Result<(), ActuationError> {
        if !self.is_prepared(line) {
            match self.prepare_line(line) {
                Ok(()) => {
                    self.prepared.lock().insert(line);
                }
                Err(e) => debug!("GPIO line {} still not prepared: {}", line, e),
            }
        }

        let value = if level.is_high() { "1" } else { "0" };
        Self::write_attribute(&self.line_dir(line).join("value"), value).map_err(|e| {
            ActuationError::Write {
                line,
                details: e.to_string(),
            }
        })
    }
}

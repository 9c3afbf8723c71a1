use super::indicator::Level;
use crate::error::ActuationError;

/// Physical output lines. Writes are fire-and-forget; nothing reads the
/// line back.
pub trait OutputLines: Send + Sync {
    /// Make the lines writable as outputs
    fn prepare(&self, lines: &[u32]) -> Result<(), ActuationError>;

    fn set(&self, line: u32, level: Level) -> Result<(), ActuationError>;
}

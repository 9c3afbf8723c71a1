use serde::Serialize;
use std::fmt;

/// Named logical indicator channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Indicator {
    /// Connected / idle
    White,
    /// Recording in progress
    Red,
    /// Eye-contact feedback
    Yellow,
    /// Gesture feedback
    Green,
    /// Expression / no-face feedback
    Blue,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::White,
        Indicator::Red,
        Indicator::Yellow,
        Indicator::Green,
        Indicator::Blue,
    ];

    /// Overlays driven by the feedback decision
    pub const FEEDBACK: [Indicator; 3] = [Indicator::Yellow, Indicator::Green, Indicator::Blue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::White => "white",
            Indicator::Red => "red",
            Indicator::Yellow => "yellow",
            Indicator::Green => "green",
            Indicator::Blue => "blue",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn from_bool(on: bool) -> Self {
        if on {
            Level::High
        } else {
            Level::Low
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorWrite {
    pub indicator: Indicator,
    pub level: Level,
}

impl IndicatorWrite {
    pub const fn new(indicator: Indicator, level: Level) -> Self {
        Self { indicator, level }
    }
}

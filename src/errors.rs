use std::error::Error;
use std::fmt;

/// Errors surfaced at the two points this crate talks to the outside
/// world: loading a trace file, and validating a completed run against
/// its testable properties. The core simulation loop itself never
/// returns `Result` — its invariants are checked with `debug_assert!`
/// because a violation there is a bug in this crate, not bad input.
#[derive(Debug)]
pub enum CoreError {
    Io(std::io::Error),
    TraceParse(serde_json::Error),
    InvalidTrace(String),
    PropertyViolation(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Io(err) => write!(f, "I/O error: {}", err),
            CoreError::TraceParse(err) => write!(f, "malformed trace file: {}", err),
            CoreError::InvalidTrace(msg) => write!(f, "invalid trace: {}", msg),
            CoreError::PropertyViolation(msg) => write!(f, "property violation: {}", msg),
        }
    }
}

impl Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(error: std::io::Error) -> Self {
        CoreError::Io(error)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::TraceParse(error)
    }
}

//! Engine errors.
//!
//! These are local computation guards. Display-pass callers log and drop them
//! so one bad record never takes down a whole protocol.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Wake time did not match `HH:MM` (hours 0-23, minutes 0-59).
    #[error("invalid time format '{0}' (expected HH:MM)")]
    InvalidTimeFormat(String),

    /// Cycle fields are set but there are no on days.
    #[error("degenerate cycle: on_days={on_days} off_days={off_days}")]
    DegenerateCycle { on_days: u32, off_days: u32 },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

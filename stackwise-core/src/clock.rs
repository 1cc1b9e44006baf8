//! Clock math: wake time + offset -> minute of day, and 12-hour rendering.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const MINUTES_PER_DAY: u16 = 1440;

/// Same pattern the settings boundary enforces before persisting a wake time.
pub const WAKE_TIME_PATTERN: &str = r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$";

static WAKE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WAKE_TIME_PATTERN).expect("wake time pattern is valid"));

/// A user's wake time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WakeTime(u16);

impl WakeTime {
    pub const MIDNIGHT: WakeTime = WakeTime(0);

    /// Build from hours/minutes, rejecting out-of-range values.
    pub fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(Self(hours * 60 + minutes))
        } else {
            None
        }
    }

    /// Strict parse of an `HH:MM` string (single-digit hours allowed).
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidTimeFormat(s.to_string());
        let caps = WAKE_TIME_RE.captures(s.trim()).ok_or_else(invalid)?;
        let hours: u16 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u16 = caps[2].parse().map_err(|_| invalid())?;
        Self::from_hm(hours, minutes).ok_or_else(invalid)
    }

    /// Parse for display passes: a malformed value degrades to 00:00.
    pub fn parse_lenient(s: &str) -> Self {
        match Self::parse(s) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to 00:00 wake time");
                Self::MIDNIGHT
            }
        }
    }

    pub fn minute_of_day(self) -> u16 {
        self.0
    }
}

impl fmt::Display for WakeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for WakeTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WakeTime {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<WakeTime> for String {
    fn from(w: WakeTime) -> Self {
        w.to_string()
    }
}

/// Absolute minute of day for `offset_minutes` after waking, wrapping past midnight.
pub fn resolve_absolute_minute(wake: WakeTime, offset_minutes: u32) -> u16 {
    let total = u64::from(wake.minute_of_day()) + u64::from(offset_minutes);
    (total % u64::from(MINUTES_PER_DAY)) as u16
}

/// Hour component (0-23) of a minute of day.
pub fn hour_of(minute: u16) -> u16 {
    (minute % MINUTES_PER_DAY) / 60
}

/// Render a minute of day as `h:mm AM/PM`. Hours 0 and 12 both render as 12.
pub fn format_minute_of_day(minute: u16) -> String {
    let minute = minute % MINUTES_PER_DAY;
    let hour = minute / 60;
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, minute % 60, suffix)
}

/// Short description of an offset from waking, e.g. `+1h 30m after waking`.
pub fn describe_offset(offset_minutes: u32) -> String {
    let (h, m) = (offset_minutes / 60, offset_minutes % 60);
    match (h, m) {
        (0, 0) => "upon waking".to_string(),
        (0, m) => format!("+{m}m after waking"),
        (h, 0) => format!("+{h}h after waking"),
        (h, m) => format!("+{h}h {m}m after waking"),
    }
}

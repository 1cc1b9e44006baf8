//! Cycle engine: on/off status of a repeating cycle on a given civil date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::supplement::Cycle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleStatus {
    pub is_active: bool,
    /// 1-based position within the current cycle.
    pub day_in_cycle: u64,
    /// Days left in the current on or off phase, counting today.
    pub days_remaining: u64,
}

impl CycleStatus {
    pub fn phase(&self) -> &'static str {
        if self.is_active { "on" } else { "paused" }
    }
}

impl Cycle {
    /// Status on `today`. Day counts use whole civil days from `start_date`.
    ///
    /// A cycle starting in the future reports day 1, active, 0 remaining.
    /// A cycle without on days is degenerate.
    pub fn status_on(&self, today: NaiveDate) -> Result<CycleStatus> {
        let length = self.length();
        if self.on_days == 0 {
            return Err(EngineError::DegenerateCycle {
                on_days: self.on_days,
                off_days: self.off_days,
            });
        }

        let diff_days = (today - self.start_date).num_days();
        if diff_days < 0 {
            return Ok(CycleStatus { is_active: true, day_in_cycle: 1, days_remaining: 0 });
        }

        // length <= 2 * u32::MAX, so it fits in i64
        let day0 = (diff_days % length as i64) as u64;
        let on_days = u64::from(self.on_days);
        let is_active = day0 < on_days;
        let days_remaining = if is_active { on_days - day0 } else { length - day0 };

        Ok(CycleStatus { is_active, day_in_cycle: day0 + 1, days_remaining })
    }
}

/// Status for display passes. `None` for uncycled supplements and for
/// degenerate cycles, which are logged and treated as uncycled.
pub fn status(cycle: Option<&Cycle>, today: NaiveDate) -> Option<CycleStatus> {
    let cycle = cycle?;
    match cycle.status_on(today) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring cycle");
            None
        }
    }
}

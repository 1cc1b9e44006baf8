//! Timing resolution: dosing rule -> Morning/Night bucket + sortable minute.

use serde::{Deserialize, Serialize};

use crate::clock::{WakeTime, format_minute_of_day, hour_of, resolve_absolute_minute};
use crate::supplement::{Dosing, Supplement};

/// Sort anchor for fixed AM items (8:00 AM).
pub const FIXED_AM_ANCHOR: u16 = 8 * 60;
/// Sort anchor for fixed PM items (8:00 PM).
pub const FIXED_PM_ANCHOR: u16 = 20 * 60;
/// Relative-wake items resolving at or after this hour go to the night stack.
pub const NIGHT_START_HOUR: u16 = 17;

pub const UPON_WAKING: &str = "Upon Waking";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Morning,
    Night,
}

impl Bucket {
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Morning => "Morning",
            Bucket::Night => "Night",
        }
    }

    /// Bucket for an absolute minute of day.
    pub fn for_minute(minute: u16) -> Self {
        if hour_of(minute) < NIGHT_START_HOUR {
            Bucket::Morning
        } else {
            Bucket::Night
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedTiming {
    pub bucket: Bucket,
    /// Computed time for relative items, synthetic anchor for fixed ones.
    pub minute_of_day: u16,
    /// Only set for relative-wake items; fixed items carry no clock time.
    pub display_time: Option<String>,
    /// Offset from waking, for relative-wake items.
    pub offset_minutes: Option<u32>,
    /// Units taken in this slot, for fixed items.
    pub units: Option<f64>,
}

impl ResolvedTiming {
    pub fn is_upon_waking(&self) -> bool {
        self.offset_minutes == Some(0)
    }
}

/// Resolve a supplement into zero, one or two stack entries.
///
/// Empty means the supplement belongs to neither stack. A fixed item with both
/// AM and PM set yields one entry per stack.
pub fn resolve(supplement: &Supplement, wake: WakeTime) -> Vec<ResolvedTiming> {
    match supplement.dosing {
        Dosing::RelativeWake { offset_minutes } => {
            let minute = resolve_absolute_minute(wake, offset_minutes);
            vec![ResolvedTiming {
                bucket: Bucket::for_minute(minute),
                minute_of_day: minute,
                display_time: Some(format_minute_of_day(minute)),
                offset_minutes: Some(offset_minutes),
                units: None,
            }]
        }
        Dosing::Fixed { am, pm, am_units, pm_units } => {
            let mut out = Vec::with_capacity(2);
            if am {
                out.push(fixed(Bucket::Morning, FIXED_AM_ANCHOR, am_units));
            }
            if pm {
                out.push(fixed(Bucket::Night, FIXED_PM_ANCHOR, pm_units));
            }
            out
        }
    }
}

fn fixed(bucket: Bucket, anchor: u16, units: f64) -> ResolvedTiming {
    ResolvedTiming {
        bucket,
        minute_of_day: anchor,
        display_time: None,
        offset_minutes: None,
        units: Some(units),
    }
}

/// Label shown next to a stack entry.
pub fn timing_label(resolved: &ResolvedTiming) -> String {
    if resolved.is_upon_waking() {
        return UPON_WAKING.to_string();
    }
    match &resolved.display_time {
        Some(t) => t.clone(),
        None => match resolved.bucket {
            Bucket::Morning => "AM".to_string(),
            Bucket::Night => "PM".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wake(s: &str) -> WakeTime {
        WakeTime::parse(s).unwrap()
    }

    fn relative(offset: u32) -> Supplement {
        Supplement::new("r", "Relative").with_dosing(Dosing::RelativeWake { offset_minutes: offset })
    }

    #[test]
    fn test_relative_wake_bucket_boundary() {
        // 07:00 + 599 = 16:59
        let r = resolve(&relative(599), wake("07:00"));
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].bucket, Bucket::Morning);
        assert_eq!(r[0].display_time.as_deref(), Some("4:59 PM"));

        // 07:00 + 600 = 17:00
        let r = resolve(&relative(600), wake("07:00"));
        assert_eq!(r[0].bucket, Bucket::Night);
        assert_eq!(r[0].minute_of_day, 1020);
    }

    #[test]
    fn test_relative_wrap_lands_in_morning() {
        let r = resolve(&relative(120), wake("23:00"));
        assert_eq!(r[0].minute_of_day, 60);
        assert_eq!(r[0].bucket, Bucket::Morning);
    }

    #[test]
    fn test_upon_waking_label() {
        let r = resolve(&relative(0), wake("06:45"));
        assert!(r[0].is_upon_waking());
        assert_eq!(timing_label(&r[0]), UPON_WAKING);

        let r = resolve(&relative(30), wake("06:45"));
        assert_eq!(timing_label(&r[0]), "7:15 AM");
    }

    #[test]
    fn test_fixed_both_slots_yields_two_entries() {
        let s = Supplement::new("f", "Fish oil").with_dosing(Dosing::Fixed {
            am: true,
            pm: true,
            am_units: 2.0,
            pm_units: 1.0,
        });
        let r = resolve(&s, wake("07:00"));
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].bucket, Bucket::Morning);
        assert_eq!(r[0].minute_of_day, FIXED_AM_ANCHOR);
        assert_eq!(r[0].units, Some(2.0));
        assert_eq!(r[1].bucket, Bucket::Night);
        assert_eq!(r[1].minute_of_day, FIXED_PM_ANCHOR);
        assert!(r.iter().all(|t| t.display_time.is_none()));
        assert_eq!(timing_label(&r[1]), "PM");
    }

    #[test]
    fn test_fixed_anchor_ignores_wake_time() {
        let s = Supplement::new("f", "D3").with_dosing(Dosing::fixed_am(1.0));
        assert_eq!(resolve(&s, wake("05:00")), resolve(&s, wake("11:30")));
    }

    #[test]
    fn test_unscheduled_resolves_to_nothing() {
        let s = Supplement::new("u", "As needed");
        assert!(resolve(&s, wake("07:00")).is_empty());
    }
}

//! Storage-layer record shape and its conversion into the engine model.
//!
//! Records arrive with a flat `schedule` + `timing` pair and nullable cycle
//! fields. Conversion picks one dosing rule and drops half-filled cycles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stackwise_core::{Cycle, Dosing, Supplement, UnitType};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplementRecord {
    pub id: Option<String>,
    pub name: String,
    pub dosage: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub unit_type: Option<String>,
    pub schedule: ScheduleRecord,
    pub timing: TimingRecord,
    pub cycle: Option<CycleRecord>,
    pub rating: Option<i64>,
    pub reason: Option<String>,
    pub archived: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleRecord {
    pub am: bool,
    pub pm: bool,
    pub am_pills: f64,
    pub pm_pills: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimingKind {
    #[default]
    Fixed,
    RelativeWake,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingRecord {
    #[serde(rename = "type")]
    pub kind: TimingKind,
    pub offset_minutes: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CycleRecord {
    pub on_days: Option<i64>,
    pub off_days: Option<i64>,
    pub start_date: Option<String>,
}

pub fn parse_unit_type(s: &str) -> Option<UnitType> {
    match s.trim().to_lowercase().as_str() {
        "pills" | "pill" | "capsules" | "tablets" => Some(UnitType::Pills),
        "grams" | "gram" | "g" => Some(UnitType::Grams),
        "mg" => Some(UnitType::Mg),
        "ml" => Some(UnitType::Ml),
        "oz" => Some(UnitType::Oz),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD` or a full ISO timestamp (date part is used).
pub fn parse_start_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

impl CycleRecord {
    fn to_cycle(&self, id: &str) -> Option<Cycle> {
        let (on, off, start) = match (self.on_days, self.off_days, self.start_date.as_deref()) {
            (Some(on), Some(off), Some(start)) if !start.trim().is_empty() => (on, off, start),
            _ => return None,
        };
        let (Ok(on_days), Ok(off_days)) = (u32::try_from(on), u32::try_from(off)) else {
            tracing::warn!(id, on, off, "cycle length out of range, treating as uncycled");
            return None;
        };
        if on_days == 0 {
            tracing::warn!(id, off, "cycle has no on days, treating as uncycled");
            return None;
        }
        let Some(start_date) = parse_start_date(start) else {
            tracing::warn!(id, start, "unparseable cycle start date, treating as uncycled");
            return None;
        };
        Some(Cycle::new(on_days, off_days, start_date))
    }
}

impl SupplementRecord {
    /// Convert into the engine model. `row` seeds a fallback id for blank ids.
    pub fn into_supplement(self, row: usize) -> Supplement {
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("row-{row}"),
        };

        let dosing = match self.timing.kind {
            TimingKind::RelativeWake => Dosing::RelativeWake {
                offset_minutes: self.timing.offset_minutes.clamp(0, i64::from(u32::MAX)) as u32,
            },
            TimingKind::Fixed => Dosing::Fixed {
                am: self.schedule.am,
                pm: self.schedule.pm,
                am_units: self.schedule.am_pills.max(0.0),
                pm_units: self.schedule.pm_pills.max(0.0),
            },
        };

        let unit_type = match self.unit_type.as_deref() {
            None => UnitType::default(),
            Some(u) => parse_unit_type(u).unwrap_or_else(|| {
                tracing::warn!(id = %id, unit = u, "unknown unit type, using pills");
                UnitType::default()
            }),
        };

        let cycle = self.cycle.as_ref().and_then(|c| c.to_cycle(&id));

        Supplement {
            name: self.name.trim().to_string(),
            dosage: self.dosage.unwrap_or_default(),
            price: self.price.unwrap_or(0.0).max(0.0),
            quantity: self.quantity.filter(|q| *q > 0.0),
            unit_type,
            dosing,
            cycle,
            rating: self.rating.unwrap_or(0).clamp(0, 5) as u8,
            reason: self.reason.unwrap_or_default(),
            archived: self.archived,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_wake_clears_schedule() {
        let rec = SupplementRecord {
            id: Some("s1".into()),
            name: "Electrolytes".into(),
            schedule: ScheduleRecord { am: true, pm: false, am_pills: 1.0, pm_pills: 0.0 },
            timing: TimingRecord { kind: TimingKind::RelativeWake, offset_minutes: 15 },
            ..Default::default()
        };
        let s = rec.into_supplement(0);
        assert_eq!(s.dosing, Dosing::RelativeWake { offset_minutes: 15 });
    }

    #[test]
    fn test_negative_offset_clamps_to_zero() {
        let rec = SupplementRecord {
            name: "Water".into(),
            timing: TimingRecord { kind: TimingKind::RelativeWake, offset_minutes: -20 },
            ..Default::default()
        };
        assert_eq!(rec.into_supplement(3).dosing, Dosing::RelativeWake { offset_minutes: 0 });
    }

    #[test]
    fn test_half_filled_cycle_is_uncycled() {
        let rec = SupplementRecord {
            name: "Ashwagandha".into(),
            cycle: Some(CycleRecord { on_days: Some(5), off_days: None, start_date: Some("2026-01-01".into()) }),
            ..Default::default()
        };
        assert_eq!(rec.into_supplement(0).cycle, None);
    }

    fn cycle_of(on: i64, off: i64) -> Option<Cycle> {
        let rec = SupplementRecord {
            name: "Tongkat Ali".into(),
            cycle: Some(CycleRecord {
                on_days: Some(on),
                off_days: Some(off),
                start_date: Some("2026-01-01".into()),
            }),
            ..Default::default()
        };
        rec.into_supplement(0).cycle
    }

    #[test]
    fn test_out_of_range_cycle_is_uncycled() {
        assert_eq!(cycle_of(-1, 2), None);
        assert_eq!(cycle_of(4_294_967_301, 2), None);
        assert_eq!(cycle_of(5, 4_294_967_296), None);
        assert_eq!(cycle_of(4_294_967_295, 1).map(|c| c.length()), Some(4_294_967_296));
    }

    #[test]
    fn test_zero_on_days_is_uncycled() {
        assert_eq!(cycle_of(0, 2), None);
        assert_eq!(cycle_of(0, 0), None);
        assert!(cycle_of(1, 0).is_some());
    }

    #[test]
    fn test_cycle_accepts_iso_timestamp() {
        let rec = SupplementRecord {
            name: "Rhodiola".into(),
            cycle: Some(CycleRecord {
                on_days: Some(5),
                off_days: Some(2),
                start_date: Some("2026-01-05T00:00:00.000Z".into()),
            }),
            ..Default::default()
        };
        let c = rec.into_supplement(0).cycle.unwrap();
        assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(c.length(), 7);
    }

    #[test]
    fn test_blank_id_and_bounds() {
        let rec = SupplementRecord {
            id: Some("  ".into()),
            name: " Zinc ".into(),
            price: Some(-4.0),
            quantity: Some(0.0),
            unit_type: Some("capsules".into()),
            rating: Some(11),
            ..Default::default()
        };
        let s = rec.into_supplement(7);
        assert_eq!(s.id, "row-7");
        assert_eq!(s.name, "Zinc");
        assert_eq!(s.price, 0.0);
        assert_eq!(s.quantity, None);
        assert_eq!(s.unit_type, UnitType::Pills);
        assert_eq!(s.rating, 5);
    }
}

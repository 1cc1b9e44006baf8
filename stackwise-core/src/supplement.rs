//! Supplement model consumed by the engine.
//!
//! Records come from the storage layer; the engine treats them as read-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label used when a supplement has no stated health goal.
pub const DEFAULT_GOAL: &str = "General Health";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    Pills,
    Grams,
    Mg,
    Ml,
    Oz,
}

impl UnitType {
    pub fn label(&self) -> &'static str {
        match self {
            UnitType::Pills => "pills",
            UnitType::Grams => "g",
            UnitType::Mg => "mg",
            UnitType::Ml => "ml",
            UnitType::Oz => "oz",
        }
    }
}

/// When a supplement is taken.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Dosing {
    /// Calendar AM/PM slots, independent of wake time.
    Fixed {
        am: bool,
        pm: bool,
        am_units: f64,
        pm_units: f64,
    },
    /// Minutes after the user's wake time.
    RelativeWake { offset_minutes: u32 },
}

impl Dosing {
    pub fn fixed_am(units: f64) -> Self {
        Dosing::Fixed { am: true, pm: false, am_units: units, pm_units: 0.0 }
    }

    pub fn fixed_pm(units: f64) -> Self {
        Dosing::Fixed { am: false, pm: true, am_units: 0.0, pm_units: units }
    }

    pub fn unscheduled() -> Self {
        Dosing::Fixed { am: false, pm: false, am_units: 0.0, pm_units: 0.0 }
    }
}

impl Default for Dosing {
    fn default() -> Self {
        Dosing::unscheduled()
    }
}

/// Repeating on/off period anchored to a start date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cycle {
    pub on_days: u32,
    pub off_days: u32,
    pub start_date: NaiveDate,
}

impl Cycle {
    pub fn new(on_days: u32, off_days: u32, start_date: NaiveDate) -> Self {
        Self { on_days, off_days, start_date }
    }

    pub fn length(&self) -> u64 {
        u64::from(self.on_days) + u64::from(self.off_days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplement {
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Cost of one container.
    pub price: f64,
    /// Dose units per container.
    pub quantity: Option<f64>,
    pub unit_type: UnitType,
    pub dosing: Dosing,
    pub cycle: Option<Cycle>,
    /// 0 = unrated, otherwise 1-5.
    pub rating: u8,
    /// Free-text health goal.
    pub reason: String,
    pub archived: bool,
}

impl Supplement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dosage: String::new(),
            price: 0.0,
            quantity: None,
            unit_type: UnitType::Pills,
            dosing: Dosing::default(),
            cycle: None,
            rating: 0,
            reason: String::new(),
            archived: false,
        }
    }

    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = dosage.into();
        self
    }

    pub fn with_price(mut self, price: f64, quantity: f64) -> Self {
        self.price = price;
        self.quantity = Some(quantity);
        self
    }

    pub fn with_dosing(mut self, dosing: Dosing) -> Self {
        self.dosing = dosing;
        self
    }

    pub fn with_cycle(mut self, cycle: Cycle) -> Self {
        self.cycle = Some(cycle);
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating.min(5);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Health goal used for grouping; blank reasons fall back to [`DEFAULT_GOAL`].
    pub fn goal_label(&self) -> &str {
        let r = self.reason.trim();
        if r.is_empty() { DEFAULT_GOAL } else { r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_rating() {
        let s = Supplement::new("s1", "Magnesium").with_rating(9);
        assert_eq!(s.rating, 5);
    }

    #[test]
    fn test_goal_label_default() {
        let s = Supplement::new("s1", "Zinc").with_reason("   ");
        assert_eq!(s.goal_label(), DEFAULT_GOAL);
        let s = s.with_reason(" Sleep ");
        assert_eq!(s.goal_label(), "Sleep");
    }

    #[test]
    fn test_dosing_serde_tagged() {
        let d = Dosing::RelativeWake { offset_minutes: 30 };
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"type":"relative_wake","offset_minutes":30}"#);
        let back: Dosing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}

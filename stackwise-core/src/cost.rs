//! Cost projection: per-unit price, daily/monthly/yearly burn, value score.

use serde::{Deserialize, Serialize};

use crate::supplement::{Dosing, Supplement};

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// How relative-wake supplements count toward daily units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelativeWakeUnits {
    /// Relative-wake items carry no pill counts and cost nothing per day.
    #[default]
    Ignore,
    /// Count a relative-wake item as one unit per day.
    OneDosePerDay,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CostPolicy {
    #[serde(default)]
    pub relative_wake_units: RelativeWakeUnits,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CostBreakdown {
    pub price_per_unit: f64,
    pub daily_units: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    /// rating / daily_cost; 0 means "not ranked", not "free".
    pub value_score: f64,
    /// How long one container lasts at the current daily units.
    pub days_of_supply: Option<f64>,
}

/// Units taken per day under `policy`.
pub fn daily_units(dosing: &Dosing, policy: CostPolicy) -> f64 {
    match *dosing {
        Dosing::Fixed { am, pm, am_units, pm_units } => {
            let am = if am { am_units.max(0.0) } else { 0.0 };
            let pm = if pm { pm_units.max(0.0) } else { 0.0 };
            am + pm
        }
        Dosing::RelativeWake { .. } => match policy.relative_wake_units {
            RelativeWakeUnits::Ignore => 0.0,
            RelativeWakeUnits::OneDosePerDay => 1.0,
        },
    }
}

pub fn project(supplement: &Supplement, policy: CostPolicy) -> CostBreakdown {
    let units = daily_units(&supplement.dosing, policy);
    let quantity = supplement.quantity.filter(|q| *q > 0.0);

    let days_of_supply = match quantity {
        Some(q) if units > 0.0 => Some(q / units),
        _ => None,
    };

    let price_per_unit = match quantity {
        Some(q) if supplement.price > 0.0 => supplement.price / q,
        _ => 0.0,
    };

    let daily_cost = price_per_unit * units;
    let value_score = if supplement.rating > 0 && daily_cost > 0.0 {
        f64::from(supplement.rating) / daily_cost
    } else {
        0.0
    };

    CostBreakdown {
        price_per_unit,
        daily_units: units,
        daily_cost,
        monthly_cost: daily_cost * DAYS_PER_MONTH,
        yearly_cost: daily_cost * DAYS_PER_YEAR,
        value_score,
        days_of_supply,
    }
}

//! Protocol assembly: Morning/Night stacks and portfolio cost summaries.
//!
//! Archived supplements are dropped before anything else. Paused (cycled off)
//! supplements stay in their stack and carry their status for the caller.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::WakeTime;
use crate::cost::{self, CostBreakdown, CostPolicy, DAYS_PER_MONTH, DAYS_PER_YEAR};
use crate::cycle::{self, CycleStatus};
use crate::supplement::{Supplement, UnitType};
use crate::timing::{self, Bucket, ResolvedTiming};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayItem {
    pub supplement_id: String,
    pub name: String,
    pub dosage: String,
    pub unit_type: UnitType,
    pub sort_time: u16,
    pub label: String,
    pub timing: ResolvedTiming,
    pub cycle: Option<CycleStatus>,
}

impl DisplayItem {
    pub fn is_paused(&self) -> bool {
        self.cycle.is_some_and(|c| !c.is_active)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Protocol {
    pub morning: Vec<DisplayItem>,
    pub night: Vec<DisplayItem>,
    /// Ids of active supplements that belong to neither stack.
    pub unscheduled: Vec<String>,
}

/// Build both stacks, each sorted ascending by time of day.
///
/// Ties keep input order.
pub fn assemble(supplements: &[Supplement], wake: WakeTime, today: NaiveDate) -> Protocol {
    let mut protocol = Protocol::default();

    for s in supplements.iter().filter(|s| !s.archived) {
        let slots = timing::resolve(s, wake);
        if slots.is_empty() {
            protocol.unscheduled.push(s.id.clone());
            continue;
        }

        let status = cycle::status(s.cycle.as_ref(), today);
        for t in slots {
            let item = DisplayItem {
                supplement_id: s.id.clone(),
                name: s.name.clone(),
                dosage: s.dosage.clone(),
                unit_type: s.unit_type,
                sort_time: t.minute_of_day,
                label: timing::timing_label(&t),
                cycle: status,
                timing: t,
            };
            match item.timing.bucket {
                Bucket::Morning => protocol.morning.push(item),
                Bucket::Night => protocol.night.push(item),
            }
        }
    }

    // sort_by_key is stable
    protocol.morning.sort_by_key(|i| i.sort_time);
    protocol.night.sort_by_key(|i| i.sort_time);

    tracing::debug!(
        morning = protocol.morning.len(),
        night = protocol.night.len(),
        unscheduled = protocol.unscheduled.len(),
        "assembled protocol"
    );

    protocol
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemCost {
    pub supplement_id: String,
    pub name: String,
    pub goal: String,
    pub cost: CostBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalSpend {
    pub goal: String,
    pub daily_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    pub items: Vec<ItemCost>,
    pub daily_total: f64,
    pub monthly_total: f64,
    pub yearly_total: f64,
    pub top_spender: Option<ItemCost>,
    /// Highest value score among rated items with a daily cost.
    pub best_value: Option<ItemCost>,
    /// Lowest daily cost among items that cost anything.
    pub cheapest: Option<ItemCost>,
    /// Daily spend per health goal, highest first.
    pub spend_by_goal: Vec<GoalSpend>,
}

/// Cost projection for every active supplement plus portfolio aggregates.
///
/// Ranking ties go to the earliest supplement in input order.
pub fn summarize(supplements: &[Supplement], policy: CostPolicy) -> PortfolioSummary {
    let items: Vec<ItemCost> = supplements
        .iter()
        .filter(|s| !s.archived)
        .map(|s| ItemCost {
            supplement_id: s.id.clone(),
            name: s.name.clone(),
            goal: s.goal_label().to_string(),
            cost: cost::project(s, policy),
        })
        .collect();

    let daily_total: f64 = items.iter().map(|i| i.cost.daily_cost).sum();

    let top_spender = first_best(items.iter(), |i| i.cost.daily_cost, |a, b| a > b);
    let best_value = first_best(
        items.iter().filter(|i| i.cost.value_score > 0.0),
        |i| i.cost.value_score,
        |a, b| a > b,
    );
    let cheapest = first_best(
        items.iter().filter(|i| i.cost.daily_cost > 0.0),
        |i| i.cost.daily_cost,
        |a, b| a < b,
    );

    PortfolioSummary {
        daily_total,
        monthly_total: daily_total * DAYS_PER_MONTH,
        yearly_total: daily_total * DAYS_PER_YEAR,
        top_spender,
        best_value,
        cheapest,
        spend_by_goal: spend_by_goal(&items),
        items,
    }
}

fn first_best<'a>(
    items: impl Iterator<Item = &'a ItemCost>,
    key: impl Fn(&ItemCost) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<ItemCost> {
    let mut best: Option<&ItemCost> = None;
    for item in items {
        match best {
            Some(b) if !better(key(item), key(b)) => {}
            _ => best = Some(item),
        }
    }
    best.cloned()
}

fn spend_by_goal(items: &[ItemCost]) -> Vec<GoalSpend> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<GoalSpend> = Vec::new();

    for item in items {
        match index.get(item.goal.as_str()) {
            Some(&i) => out[i].daily_cost += item.cost.daily_cost,
            None => {
                index.insert(item.goal.as_str(), out.len());
                out.push(GoalSpend { goal: item.goal.clone(), daily_cost: item.cost.daily_cost });
            }
        }
    }

    // Stable: equal totals keep first-seen order.
    out.sort_by(|a, b| b.daily_cost.total_cmp(&a.daily_cost));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplement::{Cycle, DEFAULT_GOAL, Dosing};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn wake() -> WakeTime {
        WakeTime::parse("07:00").unwrap()
    }

    fn relative(id: &str, offset: u32) -> Supplement {
        Supplement::new(id, id).with_dosing(Dosing::RelativeWake { offset_minutes: offset })
    }

    fn ids(items: &[DisplayItem]) -> Vec<&str> {
        items.iter().map(|i| i.supplement_id.as_str()).collect()
    }

    #[test]
    fn test_assemble_sorts_by_time_of_day() {
        let stack = vec![
            Supplement::new("fixed-am", "D3").with_dosing(Dosing::fixed_am(1.0)),
            relative("wake", 0),
            relative("late-morning", 240),
            relative("evening", 720),
            Supplement::new("fixed-pm", "Magnesium").with_dosing(Dosing::fixed_pm(2.0)),
            relative("bedtime", 900),
        ];
        let p = assemble(&stack, wake(), today());
        assert_eq!(ids(&p.morning), vec!["wake", "fixed-am", "late-morning"]);
        assert_eq!(ids(&p.night), vec!["evening", "fixed-pm", "bedtime"]);
        assert_eq!(p.morning[0].label, "Upon Waking");
        assert_eq!(p.night[0].label, "7:00 PM");
        assert_eq!(p.night[1].label, "PM");
    }

    #[test]
    fn test_assemble_ties_keep_input_order() {
        let stack = vec![
            Supplement::new("b", "B").with_dosing(Dosing::fixed_am(1.0)),
            relative("a", 60), // 08:00, same as the fixed AM anchor
            Supplement::new("c", "C").with_dosing(Dosing::fixed_am(1.0)),
        ];
        let p = assemble(&stack, wake(), today());
        assert_eq!(ids(&p.morning), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let stack = vec![
            relative("x", 30),
            Supplement::new("y", "Y").with_dosing(Dosing::Fixed { am: true, pm: true, am_units: 1.0, pm_units: 1.0 }),
            relative("z", 30),
        ];
        let a = assemble(&stack, wake(), today());
        let b = assemble(&stack, wake(), today());
        assert_eq!(a, b);
    }

    #[test]
    fn test_archived_never_assembled() {
        let archived = relative("gone", 60)
            .with_cycle(Cycle::new(5, 2, today()))
            .archived();
        let mut both = Supplement::new("gone-fixed", "Old").with_dosing(Dosing::Fixed {
            am: true,
            pm: true,
            am_units: 1.0,
            pm_units: 1.0,
        });
        both.archived = true;
        let p = assemble(&[archived, both], wake(), today());
        assert!(p.morning.is_empty());
        assert!(p.night.is_empty());
        assert!(p.unscheduled.is_empty());
    }

    #[test]
    fn test_paused_items_stay_visible() {
        let start = today() - chrono::Duration::days(5);
        let s = relative("cycled", 30).with_cycle(Cycle::new(5, 2, start));
        let p = assemble(&[s], wake(), today());
        assert_eq!(p.morning.len(), 1);
        assert!(p.morning[0].is_paused());
        assert_eq!(p.morning[0].cycle.map(|c| c.days_remaining), Some(2));
    }

    #[test]
    fn test_unscheduled_listed_separately() {
        let stack = vec![Supplement::new("prn", "As needed"), relative("r", 10)];
        let p = assemble(&stack, wake(), today());
        assert_eq!(p.unscheduled, vec!["prn".to_string()]);
        assert_eq!(p.morning.len(), 1);
    }

    #[test]
    fn test_summarize_rankings() {
        let stack = vec![
            Supplement::new("a", "Protein")
                .with_price(60.0, 30.0)
                .with_dosing(Dosing::fixed_am(1.0))
                .with_rating(3)
                .with_reason("Muscle"),
            Supplement::new("b", "Creatine")
                .with_price(30.0, 60.0)
                .with_dosing(Dosing::fixed_am(2.0))
                .with_rating(5)
                .with_reason("Muscle"),
            Supplement::new("c", "Zinc")
                .with_price(10.0, 100.0)
                .with_dosing(Dosing::fixed_pm(1.0)),
            Supplement::new("d", "Free sample").with_dosing(Dosing::fixed_pm(1.0)).with_rating(5),
            Supplement::new("e", "Old").with_price(100.0, 10.0).with_dosing(Dosing::fixed_am(1.0)).archived(),
        ];

        let s = summarize(&stack, CostPolicy::default());
        assert_eq!(s.items.len(), 4);
        assert!((s.daily_total - 3.1).abs() < 1e-9);
        assert!((s.monthly_total - 93.0).abs() < 1e-9);
        assert_eq!(s.top_spender.as_ref().map(|i| i.supplement_id.as_str()), Some("a"));
        assert_eq!(s.best_value.as_ref().map(|i| i.supplement_id.as_str()), Some("b"));
        assert_eq!(s.cheapest.as_ref().map(|i| i.supplement_id.as_str()), Some("c"));

        let goals: Vec<&str> = s.spend_by_goal.iter().map(|g| g.goal.as_str()).collect();
        assert_eq!(goals, vec!["Muscle", DEFAULT_GOAL]);
        assert!((s.spend_by_goal[0].daily_cost - 3.0).abs() < 1e-9);
        assert!((s.spend_by_goal[1].daily_cost - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_ties_go_to_first() {
        let stack = vec![
            Supplement::new("first", "A").with_price(10.0, 10.0).with_dosing(Dosing::fixed_am(1.0)),
            Supplement::new("second", "B").with_price(10.0, 10.0).with_dosing(Dosing::fixed_am(1.0)),
        ];
        let s = summarize(&stack, CostPolicy::default());
        assert_eq!(s.top_spender.unwrap().supplement_id, "first");
        assert_eq!(s.cheapest.unwrap().supplement_id, "first");
        assert!(s.best_value.is_none());
    }

    #[test]
    fn test_summarize_empty() {
        let s = summarize(&[], CostPolicy::default());
        assert_eq!(s, PortfolioSummary::default());
    }
}

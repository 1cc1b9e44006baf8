//! Plain-text rendering of protocol, cost and cycle reports.

use chrono::NaiveDate;
use stackwise_core::{DisplayItem, PortfolioSummary, Protocol, Supplement, WakeTime, cycle};

fn units_suffix(item: &DisplayItem) -> String {
    match item.timing.units {
        Some(u) if u > 0.0 => format!(" x{} {}", trim_float(u), item.unit_type.label()),
        _ => String::new(),
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

fn print_stack(title: &str, items: &[DisplayItem]) {
    println!("## {title}\n");
    if items.is_empty() {
        println!("(nothing scheduled)\n");
        return;
    }
    for item in items {
        let mut line = format!("- {:<12} {}", item.label, item.name);
        if !item.dosage.is_empty() {
            line.push_str(&format!(" ({})", item.dosage));
        }
        line.push_str(&units_suffix(item));
        if let Some(c) = item.cycle {
            line.push_str(&format!(
                " [{} day {}, {} left]",
                c.phase(),
                c.day_in_cycle,
                c.days_remaining
            ));
        }
        println!("{line}");
    }
    println!();
}

pub fn print_protocol(protocol: &Protocol, supplements: &[Supplement], wake: WakeTime, today: NaiveDate) {
    println!("# Protocol for {today} (wake {wake})\n");
    print_stack("Morning", &protocol.morning);
    print_stack("Night", &protocol.night);

    if !protocol.unscheduled.is_empty() {
        println!("## No specific time\n");
        for id in &protocol.unscheduled {
            let name = supplements
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.name.as_str())
                .unwrap_or(id.as_str());
            println!("- {name}");
        }
        println!();
    }
}

pub fn print_costs(summary: &PortfolioSummary) {
    println!("# Costs\n");
    println!(
        "{:<28} {:>10} {:>8} {:>10} {:>11} {:>8}",
        "Supplement", "Per unit", "Daily", "Monthly", "Yearly", "Supply"
    );
    for item in &summary.items {
        let c = &item.cost;
        let supply = c
            .days_of_supply
            .map(|d| format!("{:.0}d", d.floor()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>10.3} {:>8.2} {:>10.2} {:>11.2} {:>8}",
            truncate(&item.name, 28),
            c.price_per_unit,
            c.daily_cost,
            c.monthly_cost,
            c.yearly_cost,
            supply
        );
    }

    println!(
        "\nTotal: ${:.2}/day | ${:.2}/month | ${:.2}/year",
        summary.daily_total, summary.monthly_total, summary.yearly_total
    );

    if let Some(top) = &summary.top_spender {
        println!("Top spender: {} (${:.2}/day)", top.name, top.cost.daily_cost);
    }
    if let Some(best) = &summary.best_value {
        println!("Best value: {} (score {:.1})", best.name, best.cost.value_score);
    }
    if let Some(cheap) = &summary.cheapest {
        println!("Cheapest: {} (${:.2}/day)", cheap.name, cheap.cost.daily_cost);
    }

    if !summary.spend_by_goal.is_empty() {
        println!("\n## Spend by goal\n");
        for g in &summary.spend_by_goal {
            println!("- {}: ${:.2}/day", g.goal, g.daily_cost);
        }
    }
}

pub fn print_cycles(supplements: &[Supplement], today: NaiveDate) {
    println!("# Cycles on {today}\n");
    let mut any = false;
    for s in supplements.iter().filter(|s| !s.archived) {
        let Some(c) = s.cycle else { continue };
        any = true;
        match cycle::status(Some(&c), today) {
            Some(st) => println!(
                "- {}: {} (day {} of {}, {} left; {} on / {} off since {})",
                s.name,
                st.phase(),
                st.day_in_cycle,
                c.length(),
                st.days_remaining,
                c.on_days,
                c.off_days,
                c.start_date
            ),
            None => println!("- {}: cycle ignored (zero-length period)", s.name),
        }
    }
    if !any {
        println!("(no cycled supplements)");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('~');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_float() {
        assert_eq!(trim_float(2.0), "2");
        assert_eq!(trim_float(0.5), "0.50");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Zinc", 8), "Zinc");
        assert_eq!(truncate("Magnesium Glycinate", 8), "Magnesi~");
    }
}

//! Flat CSV export parser.
//!
//! Header row (order does not matter, unknown columns are ignored):
//! id,name,dosage,price,quantity,unit_type,am,pm,am_pills,pm_pills,
//! timing,offset_minutes,cycle_on,cycle_off,cycle_start,rating,reason,archived

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use stackwise_core::Supplement;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::record::{CycleRecord, ScheduleRecord, SupplementRecord, TimingKind, TimingRecord};

struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl Row<'_> {
    fn text(&self, col: &str) -> Option<&str> {
        let idx = *self.columns.get(col)?;
        let v = self.record.get(idx)?.trim();
        if v.is_empty() { None } else { Some(v) }
    }

    fn number(&self, col: &str) -> Result<Option<f64>> {
        let Some(v) = self.text(col) else {
            return Ok(None);
        };
        let cleaned = v.replace(['$', ','], "");
        let n: f64 = cleaned
            .parse()
            .with_context(|| format!("column {col}: '{v}' is not a number"))?;
        Ok(Some(n))
    }

    fn integer(&self, col: &str) -> Result<Option<i64>> {
        Ok(self.number(col)?.map(|n| n.round() as i64))
    }

    fn flag(&self, col: &str) -> Result<bool> {
        match self.text(col).map(str::to_lowercase).as_deref() {
            None | Some("false" | "no" | "n" | "0") => Ok(false),
            Some("true" | "yes" | "y" | "1") => Ok(true),
            Some(other) => bail!("column {col}: '{other}' is not a boolean"),
        }
    }

    fn to_record(&self) -> Result<SupplementRecord> {
        let Some(name) = self.text("name") else {
            bail!("missing name");
        };

        let kind = match self.text("timing").map(str::to_lowercase).as_deref() {
            None | Some("fixed") => TimingKind::Fixed,
            Some("relative_wake" | "relative" | "wake") => TimingKind::RelativeWake,
            Some(other) => bail!("column timing: unknown timing type '{other}'"),
        };

        let cycle = CycleRecord {
            on_days: self.integer("cycle_on")?,
            off_days: self.integer("cycle_off")?,
            start_date: self.text("cycle_start").map(str::to_string),
        };

        Ok(SupplementRecord {
            id: self.text("id").map(str::to_string),
            name: name.to_string(),
            dosage: self.text("dosage").map(str::to_string),
            price: self.number("price")?,
            quantity: self.number("quantity")?,
            unit_type: self.text("unit_type").map(str::to_string),
            schedule: ScheduleRecord {
                am: self.flag("am")?,
                pm: self.flag("pm")?,
                am_pills: self.number("am_pills")?.unwrap_or(0.0),
                pm_pills: self.number("pm_pills")?.unwrap_or(0.0),
            },
            timing: TimingRecord {
                kind,
                offset_minutes: self.integer("offset_minutes")?.unwrap_or(0),
            },
            cycle: Some(cycle),
            rating: self.integer("rating")?,
            reason: self.text("reason").map(str::to_string),
            archived: self.flag("archived")?,
        })
    }
}

/// Parse a CSV export from any reader. Unparseable rows are skipped.
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<Vec<Supplement>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    if !columns.contains_key("name") {
        bail!("CSV header has no 'name' column");
    }

    let mut out = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row, error = %e, "skipping CSV row");
                continue;
            }
        };
        let parsed = Row { columns: &columns, record: &record }.to_record();
        match parsed {
            Ok(rec) => out.push(rec.into_supplement(row)),
            Err(e) => tracing::warn!(row, error = %e, "skipping CSV row"),
        }
    }

    Ok(out)
}

pub fn parse_csv(path: impl AsRef<Path>) -> Result<Vec<Supplement>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_csv_reader(file).with_context(|| format!("parsing {}", path.display()))
}

//! JSON catalog parser.
//!
//! Accepts the storage layer's export: either a bare array of records or an
//! object with a `supplements` array. Records that fail to deserialize are
//! skipped so one bad entry does not hide the rest of the stack.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use stackwise_core::Supplement;
use std::path::Path;

use crate::record::SupplementRecord;

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<Value>),
    Wrapped { supplements: Vec<Value> },
}

pub fn parse_json_str(text: &str) -> Result<Vec<Supplement>> {
    let doc: Document = serde_json::from_str(text).context("catalog JSON is not a list of supplements")?;
    let values = match doc {
        Document::List(v) | Document::Wrapped { supplements: v } => v,
    };

    let mut out = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<SupplementRecord>(value) {
            Ok(rec) if !rec.name.trim().is_empty() => out.push(rec.into_supplement(row)),
            Ok(_) => tracing::warn!(row, "skipping supplement without a name"),
            Err(e) => tracing::warn!(row, error = %e, "skipping malformed supplement"),
        }
    }
    Ok(out)
}

pub fn parse_json(path: impl AsRef<Path>) -> Result<Vec<Supplement>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_json_str(&text).with_context(|| format!("parsing {}", path.display()))
}

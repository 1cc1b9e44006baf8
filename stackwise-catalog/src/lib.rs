//! stackwise-catalog: load supplement catalogs (JSON/CSV exports) into the engine model.

pub mod parsers;
pub mod record;

pub use parsers::{parse_csv, parse_json};
pub use record::SupplementRecord;

use anyhow::{Result, bail};
use stackwise_core::Supplement;
use std::path::Path;

/// Load a catalog, picking the parser from the file extension.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Supplement>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("catalog not found: {}", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let supplements = match ext.as_str() {
        "json" => parse_json(path)?,
        "csv" => parse_csv(path)?,
        other => bail!("unsupported catalog format '.{other}' (expected .json or .csv)"),
    };

    tracing::debug!(count = supplements.len(), path = %path.display(), "loaded catalog");
    Ok(supplements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_catalog() {
        let err = load_catalog("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("catalog not found"));
    }

    #[test]
    fn test_unsupported_extension() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let err = load_catalog(path).unwrap_err();
        assert!(err.to_string().contains("unsupported catalog format '.toml'"));
    }
}

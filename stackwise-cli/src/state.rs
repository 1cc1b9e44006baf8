use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn stackwise_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".stackwise"))
}

pub fn ensure_stackwise_home() -> Result<PathBuf> {
    let dir = stackwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Catalog used when `--file` is not given.
pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(stackwise_home()?.join("stack.json"))
}

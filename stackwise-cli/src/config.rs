use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use stackwise_core::time::parse_timezone;
use stackwise_core::{CostPolicy, RelativeWakeUnits, WakeTime};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_stackwise_home;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub cost: CostPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleSection {
    /// `HH:MM`; validated by `set-wake`, read leniently everywhere else.
    pub wake_time: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule: ScheduleSection {
                wake_time: "07:00".to_string(),
                timezone: default_timezone(),
            },
            cost: CostPolicy::default(),
        }
    }
}

impl Config {
    /// Wake time for display passes. A hand-edited bad value degrades to 00:00.
    pub fn wake_time(&self) -> WakeTime {
        WakeTime::parse_lenient(&self.schedule.wake_time)
    }

    pub fn timezone(&self) -> Result<Tz> {
        Ok(parse_timezone(&self.schedule.timezone)?)
    }

    pub fn set_wake_time(&mut self, value: &str) -> Result<()> {
        let wake = WakeTime::parse(value)?;
        self.schedule.wake_time = wake.to_string();
        Ok(())
    }

    pub fn set_timezone(&mut self, value: &str) -> Result<()> {
        let tz = parse_timezone(value)?;
        self.schedule.timezone = tz.name().to_string();
        Ok(())
    }
}

pub fn parse_relative_wake_units(s: &str) -> Result<RelativeWakeUnits> {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "ignore" => Ok(RelativeWakeUnits::Ignore),
        "one_dose_per_day" | "one" => Ok(RelativeWakeUnits::OneDosePerDay),
        other => bail!("unknown cost policy '{other}' (expected ignore or one-dose-per-day)"),
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_stackwise_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

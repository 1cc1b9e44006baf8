use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use stackwise_catalog::load_catalog;
use stackwise_core::time::local_today;
use stackwise_core::{CostPolicy, Supplement, WakeTime, assemble, summarize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

use config::{Config, load_config, save_config};

#[derive(Parser, Debug)]
#[command(name = "stackwise", version, about = "Supplement stack timing, cycling and cost reports")]
struct Cli {
    /// Override the configured wake time (HH:MM)
    #[arg(long, global = true)]
    wake: Option<WakeTime>,

    /// Evaluate cycles on this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Morning and Night stacks in the order they are taken
    Protocol {
        /// Catalog export (.json or .csv); defaults to ~/.stackwise/stack.json
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Per-supplement cost projection and portfolio summary
    Costs {
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// On/off state of every cycled supplement
    Cycles {
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Read or update ~/.stackwise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,

    /// Set the wake time used for relative-wake dosing (HH:MM)
    SetWake { time: String },

    /// Set the IANA timezone used to decide "today"
    SetTimezone { timezone: String },

    /// How relative-wake supplements count toward cost: ignore | one-dose-per-day
    SetCostPolicy { policy: String },
}

/// Effective inputs for one report.
struct Settings {
    wake: WakeTime,
    today: NaiveDate,
    policy: CostPolicy,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STACKWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Protocol { file, json } => {
            let settings = settings(cli.wake, cli.today)?;
            let stack = read_catalog(file)?;
            let protocol = assemble(&stack, settings.wake, settings.today);
            if json {
                println!("{}", serde_json::to_string_pretty(&protocol)?);
            } else {
                report::print_protocol(&protocol, &stack, settings.wake, settings.today);
            }
        }

        Command::Costs { file, json } => {
            let settings = settings(cli.wake, cli.today)?;
            let stack = read_catalog(file)?;
            let summary = summarize(&stack, settings.policy);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                report::print_costs(&summary);
            }
        }

        Command::Cycles { file } => {
            let settings = settings(cli.wake, cli.today)?;
            let stack = read_catalog(file)?;
            report::print_cycles(&stack, settings.today);
        }

        Command::Config { command } => run_config(command)?,
    }

    Ok(())
}

fn settings(wake: Option<WakeTime>, today: Option<NaiveDate>) -> Result<Settings> {
    let cfg = load_config()?;
    let today = match today {
        Some(d) => d,
        None => local_today(Utc::now(), cfg.timezone()?),
    };
    let settings = Settings {
        wake: wake.unwrap_or_else(|| cfg.wake_time()),
        today,
        policy: cfg.cost,
    };
    tracing::debug!(
        wake = %settings.wake,
        today = %settings.today,
        policy = ?settings.policy.relative_wake_units,
        "effective settings"
    );
    Ok(settings)
}

fn read_catalog(file: Option<PathBuf>) -> Result<Vec<Supplement>> {
    let path = match file {
        Some(p) => p,
        None => state::default_catalog_path()?,
    };
    load_catalog(&path).with_context(|| format!("loading {} (pass --file <catalog>)", path.display()))
}

fn run_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => config::init_config()?,
        ConfigCommand::Show => {
            let cfg = load_config()?;
            println!("# {}\n", config::config_path()?.display());
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigCommand::SetWake { time } => {
            update_config(|cfg| cfg.set_wake_time(&time))?;
            println!("Wake time set to {}", WakeTime::parse(&time)?);
        }
        ConfigCommand::SetTimezone { timezone } => {
            update_config(|cfg| cfg.set_timezone(&timezone))?;
            println!("Timezone set to {}", timezone.trim());
        }
        ConfigCommand::SetCostPolicy { policy } => {
            let units = config::parse_relative_wake_units(&policy)?;
            update_config(|cfg| {
                cfg.cost.relative_wake_units = units;
                Ok(())
            })?;
            println!("Relative-wake cost policy set to {units:?}");
        }
    }
    Ok(())
}

fn update_config(f: impl FnOnce(&mut Config) -> Result<()>) -> Result<()> {
    let mut cfg = load_config()?;
    f(&mut cfg)?;
    save_config(&cfg)
}

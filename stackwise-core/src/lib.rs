//! stackwise-core: dosage timing, cycling and cost engine for a supplement stack
//!
//! All functions are pure: inputs (supplements, wake time, today) are passed
//! explicitly and every output is freshly computed.

pub mod clock;
pub mod cost;
pub mod cycle;
pub mod error;
pub mod protocol;
pub mod supplement;
pub mod time;
pub mod timing;

pub use clock::{WakeTime, format_minute_of_day, resolve_absolute_minute};
pub use cost::{CostBreakdown, CostPolicy, RelativeWakeUnits};
pub use cycle::CycleStatus;
pub use error::{EngineError, Result};
pub use protocol::{DisplayItem, GoalSpend, ItemCost, PortfolioSummary, Protocol, assemble, summarize};
pub use supplement::{Cycle, DEFAULT_GOAL, Dosing, Supplement, UnitType};
pub use timing::{Bucket, ResolvedTiming, timing_label};

//! Stats module - per-year summaries

mod calculator;

pub use calculator::{StatsCalculator, YearSummary};

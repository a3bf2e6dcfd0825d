//! Stats module - Aggregations and correlation

mod calculator;

pub use calculator::{GroupValue, StatsCalculator};

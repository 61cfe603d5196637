//! Stats module - aggregates and correlation

mod calculator;

pub use calculator::{CorrelationMatrix, StatsCalculator, StatsError};

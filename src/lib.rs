//! World Happiness Dashboard
//!
//! Loads the cleaned happiness dataset once and derives everything the
//! dashboard displays: global averages, a correlation matrix, the filtered
//! country view and the top-N ranking.

pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

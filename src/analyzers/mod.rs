//! Pollutant aggregation and derived analysis.
//!
//! This module groups validated readings into yearly and monthly mean
//! concentrations, supplies the static fallback dataset, and derives the
//! policy-impact metrics and AQI categories shown alongside them.

pub mod aggregate;
pub mod fallback;
pub mod grade;
pub mod impact;
pub mod types;
pub mod utility;

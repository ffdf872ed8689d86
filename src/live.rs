//! Simulated "live" AQI indicator.
//!
//! The readings shown here are random draws in the range typically seen
//! during Delhi winters. They are independent of the aggregated dataset.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::analyzers::grade::AqiCategory;

/// Lowest simulated AQI (inclusive).
pub const SIMULATED_MIN: u32 = 150;
/// Highest simulated AQI (exclusive).
pub const SIMULATED_MAX: u32 = 350;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveReading {
    pub aqi: u32,
    pub category: AqiCategory,
    pub timestamp: DateTime<Utc>,
}

impl LiveReading {
    pub fn new(aqi: u32) -> Self {
        Self {
            aqi,
            category: AqiCategory::from_aqi(aqi),
            timestamp: Utc::now(),
        }
    }
}

pub fn simulate<R: Rng + ?Sized>(rng: &mut R) -> LiveReading {
    LiveReading::new(rng.gen_range(SIMULATED_MIN..SIMULATED_MAX))
}

/// Emits `ticks` simulated readings, one per `every`, to `on_tick`.
/// The first reading is emitted immediately.
pub async fn run_ticker<F>(every: Duration, ticks: usize, mut on_tick: F)
where
    F: FnMut(LiveReading),
{
    let mut interval = tokio::time::interval(every);
    for tick in 0..ticks {
        interval.tick().await;
        let reading = simulate(&mut rand::thread_rng());
        debug!(tick, aqi = reading.aqi, "Live AQI tick");
        on_tick(reading);
    }
}

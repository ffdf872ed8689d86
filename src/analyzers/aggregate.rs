use crate::analyzers::types::{
    GasAverages, MonthKey, MonthlyAverages, PollutantAggregates, YearlyAverages,
};
use crate::analyzers::utility::mean;
use crate::readings::{RawRow, Reading};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, trace};

/// Aggregates raw CSV rows into yearly and monthly mean concentrations.
///
/// Rows missing `Year`, `Gas` or `Concentration_Value`, or carrying values
/// that do not coerce to numbers, are dropped without being counted.
pub fn aggregate(rows: &[RawRow]) -> PollutantAggregates {
    aggregate_readings(validate(rows))
}

/// Keeps the rows that pass [`Reading::try_from`], in input order.
pub fn validate(rows: &[RawRow]) -> Vec<Reading> {
    rows.iter()
        .filter_map(|row| match Reading::try_from(row) {
            Ok(reading) => Some(reading),
            Err(reason) => {
                trace!(%reason, ?row, "Row skipped");
                None
            }
        })
        .collect()
}

/// Aggregates already-validated readings.
pub fn aggregate_readings<I>(readings: I) -> PollutantAggregates
where
    I: IntoIterator<Item = Reading>,
{
    let mut yearly: HashMap<i32, HashMap<String, Vec<f64>>> = HashMap::new();
    let mut monthly: HashMap<MonthKey, HashMap<String, Vec<f64>>> = HashMap::new();
    let mut count = 0usize;

    for reading in readings {
        count += 1;

        if let Some(month) = reading.month {
            monthly
                .entry(MonthKey::new(reading.year, month))
                .or_default()
                .entry(reading.gas.clone())
                .or_default()
                .push(reading.concentration);
        }

        yearly
            .entry(reading.year)
            .or_default()
            .entry(reading.gas)
            .or_default()
            .push(reading.concentration);
    }

    debug!(
        readings = count,
        years = yearly.len(),
        months = monthly.len(),
        "Readings bucketed"
    );

    PollutantAggregates::from_parts(
        average_buckets::<_, YearlyAverages>(yearly),
        average_buckets::<_, MonthlyAverages>(monthly),
    )
}

fn average_buckets<K, M>(buckets: HashMap<K, HashMap<String, Vec<f64>>>) -> M
where
    K: Eq + Hash,
    M: FromIterator<(K, GasAverages)>,
{
    buckets
        .into_iter()
        .map(|(key, gases)| {
            let averages: GasAverages = gases
                .into_iter()
                .map(|(gas, values)| (gas, mean(&values)))
                .collect();
            (key, averages)
        })
        .collect()
}

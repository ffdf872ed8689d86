//! Policy impact metrics derived from yearly averages.

use crate::analyzers::types::{GasAverages, YearlyAverages};
use crate::analyzers::utility::{mean, percent_change};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key policy milestones as `(YYYY-MM, label)`.
pub static POLICY_MILESTONES: &[(&str, &str)] = &[
    ("2020-04", "BS-VI Implementation"),
    ("2020-10", "CAQM Established"),
    ("2021-01", "GRAP Enhanced"),
    ("2022-01", "Stricter Vehicle Norms"),
    ("2023-01", "Enhanced Dust Control"),
    ("2024-01", "Clean Mobility Push"),
    ("2025-01", "Zero-Tolerance Burning"),
];

/// Percent change of every (year, gas) average relative to `baseline_year`.
///
/// Gases with no baseline value (or a zero baseline) are omitted. Years
/// left with no gases are omitted too.
pub fn percent_change_from_baseline(
    yearly: &YearlyAverages,
    baseline_year: i32,
) -> BTreeMap<i32, GasAverages> {
    let Some(baseline) = yearly.get(&baseline_year) else {
        return BTreeMap::new();
    };

    yearly
        .iter()
        .filter_map(|(year, gases)| {
            let changes: GasAverages = gases
                .iter()
                .filter_map(|(gas, value)| {
                    let base = *baseline.get(gas)?;
                    Some((gas.clone(), percent_change(base, *value)?))
                })
                .collect();
            (!changes.is_empty()).then_some((*year, changes))
        })
        .collect()
}

/// First-year to last-year change for one gas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallChange {
    pub gas: String,
    pub first_year: i32,
    pub first_value: f64,
    pub last_year: i32,
    pub last_value: f64,
    pub percent: f64,
}

impl OverallChange {
    /// Negative change means concentrations went down.
    pub fn is_improvement(&self) -> bool {
        self.percent < 0.0
    }
}

/// Compares the earliest and latest years that report `gas`.
/// Needs at least two such years.
pub fn overall_change(yearly: &YearlyAverages, gas: &str) -> Option<OverallChange> {
    let mut series = yearly
        .iter()
        .filter_map(|(year, gases)| gases.get(gas).map(|v| (*year, *v)));

    let (first_year, first_value) = series.next()?;
    let (last_year, last_value) = series.last()?;

    Some(OverallChange {
        gas: gas.to_string(),
        first_year,
        first_value,
        last_year,
        last_value,
        percent: percent_change(first_value, last_value)?,
    })
}

/// Year-over-year effectiveness score: for each year with a predecessor in
/// the table, the mean over `pollutants` of the percent reduction from the
/// previous year, with increases counted as zero.
pub fn effectiveness_scores(yearly: &YearlyAverages, pollutants: &[&str]) -> BTreeMap<i32, f64> {
    let mut scores = BTreeMap::new();

    for (year, current) in yearly {
        let Some(previous) = year.checked_sub(1).and_then(|prev| yearly.get(&prev)) else {
            continue;
        };

        let reductions: Vec<f64> = pollutants
            .iter()
            .filter_map(|gas| {
                let prev = *previous.get(*gas)?;
                let cur = *current.get(*gas)?;
                percent_change(prev, cur).map(|change| (-change).max(0.0))
            })
            .collect();

        if !reductions.is_empty() {
            scores.insert(*year, mean(&reductions));
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fallback::fallback_aggregates;
    use crate::analyzers::types::POLLUTANTS;

    fn table(rows: &[(i32, &[(&str, f64)])]) -> YearlyAverages {
        rows.iter()
            .map(|(year, gases)| {
                (
                    *year,
                    gases.iter().map(|(g, v)| (g.to_string(), *v)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_percent_change_from_baseline() {
        let yearly = table(&[
            (2020, &[("PM2.5", 200.0), ("CO", 800.0)]),
            (2021, &[("PM2.5", 150.0), ("CO", 1000.0), ("O3", 40.0)]),
        ]);

        let changes = percent_change_from_baseline(&yearly, 2020);

        assert_eq!(changes[&2020]["PM2.5"], 0.0);
        assert_eq!(changes[&2021]["PM2.5"], -25.0);
        assert_eq!(changes[&2021]["CO"], 25.0);
        assert!(!changes[&2021].contains_key("O3"));
    }

    #[test]
    fn test_percent_change_missing_baseline_year() {
        let yearly = table(&[(2021, &[("PM2.5", 150.0)])]);
        assert!(percent_change_from_baseline(&yearly, 2020).is_empty());
    }

    #[test]
    fn test_overall_change_uses_first_and_last_year() {
        let yearly = table(&[
            (2020, &[("NO2", 20.0)]),
            (2021, &[("NO2", 25.0)]),
            (2022, &[("PM10", 1.0)]),
            (2023, &[("NO2", 30.0)]),
        ]);

        let change = overall_change(&yearly, "NO2").unwrap();

        assert_eq!(change.first_year, 2020);
        assert_eq!(change.last_year, 2023);
        assert_eq!(change.percent, 50.0);
        assert!(!change.is_improvement());
    }

    #[test]
    fn test_overall_change_needs_two_years() {
        let yearly = table(&[(2020, &[("NO2", 20.0)])]);
        assert!(overall_change(&yearly, "NO2").is_none());
        assert!(overall_change(&yearly, "CO").is_none());
    }

    #[test]
    fn test_effectiveness_counts_only_reductions() {
        let yearly = table(&[
            (2020, &[("PM2.5", 200.0), ("CO", 100.0)]),
            (2021, &[("PM2.5", 150.0), ("CO", 120.0)]),
        ]);

        let scores = effectiveness_scores(&yearly, &["PM2.5", "CO"]);

        assert_eq!(scores.len(), 1);
        // PM2.5 fell 25%, CO rose and counts as 0.
        assert_eq!(scores[&2021], 12.5);
    }

    #[test]
    fn test_effectiveness_handles_lowest_possible_year() {
        let yearly = table(&[
            (i32::MIN, &[("PM2.5", 100.0)]),
            (i32::MIN + 1, &[("PM2.5", 50.0)]),
            (2020, &[("PM2.5", 200.0)]),
        ]);

        let scores = effectiveness_scores(&yearly, &["PM2.5"]);

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[&(i32::MIN + 1)], 50.0);
    }

    #[test]
    fn test_effectiveness_on_fallback_is_bounded() {
        let agg = fallback_aggregates();
        let scores = effectiveness_scores(agg.yearly_averages(), &POLLUTANTS);

        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec![2021, 2022, 2023, 2024, 2025]);
        assert!(scores.values().all(|s| (0.0..=100.0).contains(s)));
    }
}

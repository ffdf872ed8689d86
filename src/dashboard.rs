//! Dashboard state: the loaded aggregates plus the view filters applied to
//! them.
//!
//! [`Dashboard::load`] performs the single fetch-decode-aggregate pass and
//! hands back an owned [`DashboardState`]. The state is passed to whatever
//! renders it; nothing here is global.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{info, warn};

use crate::analyzers::aggregate::{aggregate_readings, validate};
use crate::analyzers::fallback::fallback_aggregates;
use crate::analyzers::types::{MonthKey, POLLUTANTS, PollutantAggregates};
use crate::fetch::{HttpClient, load_source};
use crate::parser::parse_rows;
use crate::policies::{Policy, catalog};
use crate::readings::Month;

/// Where the aggregates in a [`DashboardState`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataOrigin {
    /// `rows` decoded from the source, of which `readings` passed validation.
    Live { rows: usize, readings: usize },
    Fallback { reason: String },
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataOrigin::Fallback { .. })
    }
}

/// Loads and aggregates the readings source, degrading to the static
/// fallback dataset if it cannot be fetched, decoded, or yields no valid
/// readings. Never fails.
#[tracing::instrument(skip(client))]
pub async fn load_aggregates<C: HttpClient>(
    client: &C,
    source: &str,
) -> (PollutantAggregates, DataOrigin) {
    let bytes = match load_source(client, source).await {
        Ok(bytes) => bytes,
        Err(e) => return fallback(format!("fetch failed: {e:#}")),
    };

    let rows = match parse_rows(&bytes) {
        Ok(rows) => rows,
        Err(e) => return fallback(format!("decode failed: {e:#}")),
    };

    let readings = validate(&rows);
    if readings.is_empty() {
        return fallback(format!("no valid readings in {} rows", rows.len()));
    }

    let origin = DataOrigin::Live {
        rows: rows.len(),
        readings: readings.len(),
    };
    let aggregates = aggregate_readings(readings);
    info!(
        ?origin,
        years = aggregates.yearly_averages().len(),
        "Readings aggregated"
    );
    (aggregates, origin)
}

fn fallback(reason: String) -> (PollutantAggregates, DataOrigin) {
    warn!(%reason, "Readings source unusable, using fallback dataset");
    (fallback_aggregates(), DataOrigin::Fallback { reason })
}

/// Which months a view covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    All,
    /// October–January.
    Winter,
    /// February–September.
    NonWinter,
}

impl Season {
    pub fn includes(self, month: Month) -> bool {
        match self {
            Season::All => true,
            Season::Winter => month.is_winter(),
            Season::NonWinter => !month.is_winter(),
        }
    }
}

/// View filters owned by the top-level controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFilters {
    pub year_range: RangeInclusive<i32>,
    pub season: Season,
    pub pollutants: Vec<String>,
}

impl Default for DashboardFilters {
    fn default() -> Self {
        Self {
            year_range: 2020..=2025,
            season: Season::All,
            pollutants: POLLUTANTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Everything one dashboard view renders from.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub aggregates: PollutantAggregates,
    pub origin: DataOrigin,
    pub loaded_at: DateTime<Utc>,
    pub filters: DashboardFilters,
}

impl DashboardState {
    pub fn new(aggregates: PollutantAggregates, origin: DataOrigin) -> Self {
        Self {
            aggregates,
            origin,
            loaded_at: Utc::now(),
            filters: DashboardFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: DashboardFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Years with data that fall inside the filter's year range, ascending.
    pub fn visible_years(&self) -> Vec<i32> {
        self.aggregates
            .years()
            .into_iter()
            .filter(|y| self.filters.year_range.contains(y))
            .collect()
    }

    /// One value per visible year; missing slices read as zero.
    pub fn yearly_series(&self, gas: &str) -> Vec<(i32, f64)> {
        self.visible_years()
            .into_iter()
            .map(|year| (year, self.aggregates.yearly_or_zero(year, gas)))
            .collect()
    }

    /// One point per month in the season filter; `None` where there is no data.
    pub fn monthly_series(&self, year: i32, gas: &str) -> Vec<(Month, Option<f64>)> {
        Month::ALL
            .into_iter()
            .filter(|m| self.filters.season.includes(*m))
            .map(|m| (m, self.aggregates.monthly(MonthKey::new(year, m), gas)))
            .collect()
    }

    /// Catalog policies affecting at least one selected pollutant.
    pub fn relevant_policies(&self) -> Vec<&'static Policy> {
        catalog()
            .iter()
            .filter(|policy| {
                policy.pollutants_affected.iter().any(|affected| {
                    self.filters
                        .pollutants
                        .iter()
                        .any(|selected| selected.eq_ignore_ascii_case(affected))
                })
            })
            .collect()
    }
}

/// Entry point for building a [`DashboardState`].
pub struct Dashboard;

impl Dashboard {
    pub async fn load<C: HttpClient>(client: &C, source: &str) -> DashboardState {
        let (aggregates, origin) = load_aggregates(client, source).await;
        DashboardState::new(aggregates, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    fn live_origin() -> DataOrigin {
        DataOrigin::Live {
            rows: 0,
            readings: 0,
        }
    }

    fn temp_csv(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_load_aggregates_from_file() {
        let path = temp_csv(
            "ncr_aqi_dashboard_live.csv",
            "Year,Month,Gas,Concentration_Value\n2021,Jan,PM2.5,100\n2021,Feb,PM2.5,300\n2021,Mar,PM2.5,n/a\n",
        );

        let (agg, origin) = load_aggregates(&BasicClient::new(), &path).await;

        assert_eq!(
            origin,
            DataOrigin::Live {
                rows: 3,
                readings: 2
            }
        );
        assert_eq!(agg.yearly(2021, "PM2.5"), Some(200.0));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_source_falls_back() {
        let (agg, origin) =
            load_aggregates(&BasicClient::new(), "/nonexistent/ncr_aqi.csv").await;

        assert!(origin.is_fallback());
        assert_eq!(agg, fallback_aggregates());
    }

    #[tokio::test]
    async fn test_empty_source_falls_back() {
        let path = temp_csv("ncr_aqi_dashboard_empty.csv", "");

        let (agg, origin) = load_aggregates(&BasicClient::new(), &path).await;

        assert!(origin.is_fallback());
        assert_eq!(agg, fallback_aggregates());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_header_falls_back() {
        let path = std::env::temp_dir().join("ncr_aqi_dashboard_bad_header.csv");
        std::fs::write(&path, b"Ye\xffar,Month,Gas,Concentration_Value\n2021,Jan,PM2.5,100\n")
            .unwrap();

        let (agg, origin) =
            load_aggregates(&BasicClient::new(), &path.display().to_string()).await;

        match &origin {
            DataOrigin::Fallback { reason } => assert!(reason.starts_with("decode failed")),
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(agg, fallback_aggregates());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_all_invalid_rows_fall_back() {
        let path = temp_csv(
            "ncr_aqi_dashboard_invalid.csv",
            "Year,Month,Gas,Concentration_Value\n2021,Jan,PM2.5,n/a\n,Jan,PM2.5,100\n",
        );

        let (agg, origin) = load_aggregates(&BasicClient::new(), &path).await;

        assert_eq!(
            origin,
            DataOrigin::Fallback {
                reason: "no valid readings in 2 rows".into()
            }
        );
        assert_eq!(agg, fallback_aggregates());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_url_falls_back() {
        let state = Dashboard::load(&BasicClient::new(), "http://127.0.0.1:9/readings.csv").await;

        assert!(state.origin.is_fallback());
        assert_eq!(state.aggregates, fallback_aggregates());
    }

    #[test]
    fn test_visible_years_respect_range() {
        let state = DashboardState::new(fallback_aggregates(), live_origin())
            .with_filters(DashboardFilters {
                year_range: 2022..=2023,
                ..Default::default()
            });

        assert_eq!(state.visible_years(), vec![2022, 2023]);
        assert_eq!(
            state.yearly_series("PM2.5"),
            vec![(2022, 189.23), (2023, 205.67)]
        );
        assert_eq!(state.yearly_series("O3"), vec![(2022, 0.0), (2023, 0.0)]);
    }

    #[test]
    fn test_monthly_series_season_filter() {
        let state = DashboardState::new(fallback_aggregates(), live_origin())
            .with_filters(DashboardFilters {
                season: Season::Winter,
                ..Default::default()
            });

        let series = state.monthly_series(2020, "PM2.5");
        let months: Vec<_> = series.iter().map(|(m, _)| *m).collect();

        assert_eq!(months, vec![Month::Jan, Month::Oct, Month::Nov, Month::Dec]);
        assert!(series.iter().all(|(_, v)| *v == Some(159.99 * 1.4)));
        assert!(state.monthly_series(2019, "PM2.5").iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn test_relevant_policies_follow_pollutant_filter() {
        let state = DashboardState::new(fallback_aggregates(), live_origin())
            .with_filters(DashboardFilters {
                pollutants: vec!["so2".into()],
                ..Default::default()
            });

        let ids: Vec<u32> = state.relevant_policies().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 6, 12]);

        let all = DashboardState::new(fallback_aggregates(), live_origin());
        assert_eq!(all.relevant_policies().len(), catalog().len());
    }
}

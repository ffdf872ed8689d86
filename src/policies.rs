//! Catalog of Delhi-NCR air quality policies, 2020–2025.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Issuing tier of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ministry {
    Central,
    State,
    Caqm,
}

impl Ministry {
    pub fn as_str(self) -> &'static str {
        match self {
            Ministry::Central => "central",
            Ministry::State => "state",
            Ministry::Caqm => "caqm",
        }
    }
}

impl fmt::Display for Ministry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ministry: {0:?} (expected central, state or caqm)")]
pub struct UnknownMinistry(pub String);

impl FromStr for Ministry {
    type Err = UnknownMinistry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "central" => Ok(Ministry::Central),
            "state" => Ok(Ministry::State),
            "caqm" => Ok(Ministry::Caqm),
            _ => Err(UnknownMinistry(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: u32,
    pub year: i32,
    pub month: &'static str,
    pub name: &'static str,
    pub ministry: Ministry,
    pub agency: &'static str,
    pub objective: &'static str,
    pub source_targeted: &'static str,
    pub pollutants_affected: &'static [&'static str],
    pub mechanism: &'static str,
    pub expected_impact: &'static str,
    pub observed_outcome: &'static str,
    pub seasonality: &'static str,
    pub interstate_influence: &'static str,
    pub compliance: &'static str,
    pub challenges: &'static str,
}

impl Policy {
    /// Lowercased searchable text: every descriptive field plus pollutants.
    fn search_text(&self) -> String {
        let mut text = [
            self.name,
            self.month,
            self.agency,
            self.ministry.as_str(),
            self.objective,
            self.source_targeted,
            self.mechanism,
            self.expected_impact,
            self.observed_outcome,
            self.seasonality,
            self.interstate_influence,
            self.compliance,
            self.challenges,
        ]
        .join(" ");
        text.push(' ');
        text.push_str(&self.year.to_string());
        text.push(' ');
        text.push_str(&self.pollutants_affected.join(" "));
        text.to_lowercase()
    }
}

/// Criteria for narrowing the catalog. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyFilter {
    pub year: Option<i32>,
    pub ministry: Option<Ministry>,
    /// Exact pollutant label, e.g. `"SO2"`.
    pub pollutant: Option<String>,
    /// Case-insensitive substring of the targeted source.
    pub source: Option<String>,
    /// Case-insensitive substring of any descriptive field.
    pub search: Option<String>,
}

impl PolicyFilter {
    pub fn matches(&self, policy: &Policy) -> bool {
        if self.year.is_some_and(|y| y != policy.year) {
            return false;
        }
        if self.ministry.is_some_and(|m| m != policy.ministry) {
            return false;
        }
        if let Some(pollutant) = &self.pollutant {
            if !policy
                .pollutants_affected
                .iter()
                .any(|p| p.eq_ignore_ascii_case(pollutant))
            {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if !policy
                .source_targeted
                .to_lowercase()
                .contains(&source.to_lowercase())
            {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref().map(str::trim) {
            if !term.is_empty() && !policy.search_text().contains(&term.to_lowercase()) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, policies: &'a [Policy]) -> Vec<&'a Policy> {
        policies.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Policies grouped by year, ascending.
pub fn group_by_year<'a>(policies: &[&'a Policy]) -> BTreeMap<i32, Vec<&'a Policy>> {
    let mut groups: BTreeMap<i32, Vec<&Policy>> = BTreeMap::new();
    for policy in policies {
        groups.entry(policy.year).or_default().push(*policy);
    }
    groups
}

pub fn catalog() -> &'static [Policy] {
    POLICIES
}

pub fn find(id: u32) -> Option<&'static Policy> {
    POLICIES.iter().find(|p| p.id == id)
}

static POLICIES: &[Policy] = &[
    Policy {
        id: 1,
        year: 2020,
        month: "April",
        name: "Bharat Stage VI (BS-VI) Emission Norms",
        ministry: Ministry::Central,
        agency: "MoRTH",
        objective: "Reduce vehicular emissions by mandating stricter emission standards for all new vehicles",
        source_targeted: "Vehicular emissions",
        pollutants_affected: &["NO2", "PM2.5", "PM10", "CO"],
        mechanism: "70-80% reduction in NOx and PM emissions per vehicle through advanced emission control technology",
        expected_impact: "Gradual reduction in vehicular contribution as fleet turns over",
        observed_outcome: "CO reduced by 18% (2020-2025), but overall NO2 increased due to traffic growth",
        seasonality: "Year-round impact",
        interstate_influence: "National policy, uniform across India",
        compliance: "100% for new vehicles, enforcement through type-approval",
        challenges: "Slow fleet turnover, old vehicles still on roads",
    },
    Policy {
        id: 2,
        year: 2020,
        month: "October",
        name: "Commission for Air Quality Management (CAQM) Establishment",
        ministry: Ministry::Central,
        agency: "MoEFCC",
        objective: "Create statutory authority for coordinated air quality management across NCR",
        source_targeted: "All sources - regional coordination",
        pollutants_affected: &["PM2.5", "PM10", "NO2", "SO2", "CO"],
        mechanism: "Legal powers to issue directions to states, industries, and agencies",
        expected_impact: "Improved regional coordination and enforcement",
        observed_outcome: "Enabled GRAP implementation, interstate coordination on stubble burning",
        seasonality: "Year-round governance",
        interstate_influence: "Covers Delhi, Haryana, Punjab, Rajasthan, UP",
        compliance: "Statutory authority with legal backing",
        challenges: "Interstate coordination complexity, enforcement capacity",
    },
    Policy {
        id: 3,
        year: 2021,
        month: "January",
        name: "Graded Response Action Plan (GRAP) - Enhanced",
        ministry: Ministry::Caqm,
        agency: "CAQM",
        objective: "Emergency response framework based on AQI levels",
        source_targeted: "Construction dust, vehicular, industrial, biomass burning",
        pollutants_affected: &["PM2.5", "PM10"],
        mechanism: "4-stage restrictions: dust control, DG bans, construction bans, comprehensive restrictions",
        expected_impact: "20-30% AQI reduction during severe episodes",
        observed_outcome: "Prevented severe pollution episodes 15+ times, temporary relief",
        seasonality: "Primarily Oct-Jan (winter pollution)",
        interstate_influence: "NCR-wide implementation",
        compliance: "Variable, enforcement challenges",
        challenges: "Temporary measures, rebound after lifting, economic impact",
    },
    Policy {
        id: 4,
        year: 2021,
        month: "August",
        name: "Delhi Electric Vehicle Policy",
        ministry: Ministry::State,
        agency: "Delhi Government",
        objective: "Accelerate EV adoption through incentives and infrastructure",
        source_targeted: "Vehicular emissions",
        pollutants_affected: &["NO2", "PM2.5", "CO"],
        mechanism: "Subsidies up to ₹1.5 lakh, road tax waiver, charging infrastructure",
        expected_impact: "25% EV share in new registrations by 2024",
        observed_outcome: "150,000+ EVs registered, 5-7% vehicular emission reduction",
        seasonality: "Year-round impact",
        interstate_influence: "Delhi-specific, influenced neighboring states",
        compliance: "High adoption in 2-wheelers and commercial vehicles",
        challenges: "Charging infrastructure gaps, upfront cost",
    },
    Policy {
        id: 5,
        year: 2022,
        month: "January",
        name: "Old Vehicle Phase-Out Directive",
        ministry: Ministry::Caqm,
        agency: "CAQM",
        objective: "Remove high-emission old vehicles from NCR roads",
        source_targeted: "Vehicular emissions",
        pollutants_affected: &["NO2", "PM2.5", "PM10", "CO"],
        mechanism: "Ban on diesel >10 years, petrol >15 years; impounding and scrapping",
        expected_impact: "Removal of 1 million+ high-emission vehicles",
        observed_outcome: "Significant old vehicle removal, improved fleet average",
        seasonality: "Year-round enforcement",
        interstate_influence: "NCR-wide policy",
        compliance: "ANPR-based detection, improving",
        challenges: "Enforcement at borders, vehicle re-registration in other states",
    },
    Policy {
        id: 6,
        year: 2022,
        month: "March",
        name: "Industrial PNG Conversion Mandate",
        ministry: Ministry::Caqm,
        agency: "CAQM",
        objective: "Convert industrial units from coal/furnace oil to cleaner PNG",
        source_targeted: "Industrial emissions",
        pollutants_affected: &["SO2", "PM2.5", "PM10"],
        mechanism: "Mandatory fuel switching, closure for non-compliance",
        expected_impact: "40% reduction in industrial SO2 emissions",
        observed_outcome: "2,000+ units converted, significant SO2 reduction",
        seasonality: "Year-round impact",
        interstate_influence: "NCR industrial areas",
        compliance: "80% compliance achieved",
        challenges: "PNG availability, infrastructure costs",
    },
    Policy {
        id: 7,
        year: 2023,
        month: "January",
        name: "Enhanced Crop Residue Management Scheme",
        ministry: Ministry::Central,
        agency: "Ministry of Agriculture",
        objective: "Reduce stubble burning through mechanization and incentives",
        source_targeted: "Biomass burning",
        pollutants_affected: &["PM2.5", "PM10"],
        mechanism: "Subsidies for Happy Seeder, Super Seeder, balers; in-situ management",
        expected_impact: "70% reduction in stubble burning incidents",
        observed_outcome: "Fire events reduced from 35,000 to 22,000 (2020-2025)",
        seasonality: "Oct-Nov (post-harvest)",
        interstate_influence: "Punjab, Haryana primarily",
        compliance: "Improving with mechanization adoption",
        challenges: "Farmer economics, timely equipment availability",
    },
    Policy {
        id: 8,
        year: 2023,
        month: "March",
        name: "Anti-Dust Campaign & Mechanized Sweeping",
        ministry: Ministry::State,
        agency: "Delhi Government / CAQM",
        objective: "Reduce road dust re-suspension through mechanical sweeping",
        source_targeted: "Road dust",
        pollutants_affected: &["PM10", "PM2.5"],
        mechanism: "200+ mechanical sweepers, daily water sprinkling, paving",
        expected_impact: "30-40% reduction in dust contribution",
        observed_outcome: "Improved road cleanliness, moderate PM10 reduction",
        seasonality: "Year-round, critical in summer",
        interstate_influence: "Delhi primarily, extended to NCR",
        compliance: "60% coverage of major roads",
        challenges: "Unpaved areas, construction sites, vacant plots",
    },
    Policy {
        id: 9,
        year: 2024,
        month: "January",
        name: "Clean Mobility Mandate for Aggregators",
        ministry: Ministry::Caqm,
        agency: "CAQM",
        objective: "Transition commercial fleets to CNG/EV",
        source_targeted: "Vehicular emissions - commercial",
        pollutants_affected: &["NO2", "PM2.5", "CO"],
        mechanism: "Mandatory CNG/EV for ride-hailing, delivery services",
        expected_impact: "50% commercial fleet transition",
        observed_outcome: "Significant adoption in app-based cabs and delivery",
        seasonality: "Year-round impact",
        interstate_influence: "NCR-wide",
        compliance: "High compliance due to platform enforcement",
        challenges: "Charging infrastructure for EVs",
    },
    Policy {
        id: 10,
        year: 2024,
        month: "June",
        name: "Delhi Bus Fleet Electrification",
        ministry: Ministry::State,
        agency: "Delhi Government",
        objective: "Replace diesel buses with electric buses",
        source_targeted: "Public transport emissions",
        pollutants_affected: &["NO2", "PM2.5", "PM10"],
        mechanism: "Procurement of 2,000+ electric buses",
        expected_impact: "Reduced diesel consumption, cleaner public transport",
        observed_outcome: "Improved air quality along bus corridors",
        seasonality: "Year-round impact",
        interstate_influence: "Delhi, influenced NCR transport planning",
        compliance: "On track for 80% electric fleet by 2025",
        challenges: "Charging infrastructure, battery range",
    },
    Policy {
        id: 11,
        year: 2025,
        month: "January",
        name: "Zero-Tolerance Directive on Open Burning",
        ministry: Ministry::Caqm,
        agency: "CAQM",
        objective: "Complete ban on waste/biomass burning with strict enforcement",
        source_targeted: "Waste burning, biomass burning",
        pollutants_affected: &["PM2.5", "PM10", "toxic pollutants"],
        mechanism: "Drone surveillance, satellite monitoring, heavy penalties",
        expected_impact: "90% reduction in waste burning incidents",
        observed_outcome: "Significant reduction in open burning violations",
        seasonality: "Year-round enforcement",
        interstate_influence: "NCR-wide",
        compliance: "Improving with technology deployment",
        challenges: "Rural areas, informal waste disposal",
    },
    Policy {
        id: 12,
        year: 2025,
        month: "March",
        name: "Advanced Air Quality Forecasting System",
        ministry: Ministry::Central,
        agency: "CPCB / IMD",
        objective: "Enable proactive GRAP implementation through accurate forecasting",
        source_targeted: "All sources - predictive management",
        pollutants_affected: &["PM2.5", "PM10", "NO2", "SO2", "CO", "O3"],
        mechanism: "7-day AQI predictions with meteorological integration",
        expected_impact: "85% forecast accuracy, better preparedness",
        observed_outcome: "Improved GRAP timing, public advisories",
        seasonality: "Year-round forecasting",
        interstate_influence: "NCR-wide coverage",
        compliance: "Operational system",
        challenges: "Model accuracy during extreme events",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique_and_ordered() {
        let ids: Vec<_> = catalog().iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert_eq!(PolicyFilter::default().apply(catalog()).len(), 12);
    }

    #[test]
    fn test_filter_by_year_and_ministry() {
        let filter = PolicyFilter {
            year: Some(2022),
            ministry: Some(Ministry::Caqm),
            ..Default::default()
        };

        let names: Vec<_> = filter.apply(catalog()).iter().map(|p| p.id).collect();
        assert_eq!(names, vec![5, 6]);
    }

    #[test]
    fn test_filter_by_pollutant_is_exact_label() {
        let filter = PolicyFilter {
            pollutant: Some("so2".into()),
            ..Default::default()
        };

        let ids: Vec<_> = filter.apply(catalog()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 6, 12]);
    }

    #[test]
    fn test_filter_by_source_substring() {
        let filter = PolicyFilter {
            source: Some("BIOMASS".into()),
            ..Default::default()
        };

        let ids: Vec<_> = filter.apply(catalog()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 7, 11]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = PolicyFilter {
            search: Some("Stubble".into()),
            ..Default::default()
        };

        let ids: Vec<_> = filter.apply(catalog()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 7]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let filter = PolicyFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(catalog()).len(), 12);
    }

    #[test]
    fn test_group_by_year() {
        let all = PolicyFilter::default().apply(catalog());
        let groups = group_by_year(&all);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), (2020..=2025).collect::<Vec<_>>());
        assert!(groups.values().all(|g| g.len() == 2));
    }

    #[test]
    fn test_ministry_parse_and_find() {
        assert_eq!("CAQM".parse::<Ministry>(), Ok(Ministry::Caqm));
        assert!("regional".parse::<Ministry>().is_err());
        assert_eq!(find(4).map(|p| p.name), Some("Delhi Electric Vehicle Policy"));
        assert!(find(99).is_none());
    }
}

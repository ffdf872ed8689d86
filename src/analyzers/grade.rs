use serde::Serialize;
use std::fmt;

/// National AQI band for a given index value.
///
/// | Range     | Category     |
/// |-----------|--------------|
/// | 0–50      | Good         |
/// | 51–100    | Satisfactory |
/// | 101–200   | Moderate     |
/// | 201–300   | Poor         |
/// | 301–400   | Very Poor    |
/// | > 400     | Severe       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    VeryPoor,
    Severe,
}

impl AqiCategory {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            a if a <= 50 => AqiCategory::Good,
            a if a <= 100 => AqiCategory::Satisfactory,
            a if a <= 200 => AqiCategory::Moderate,
            a if a <= 300 => AqiCategory::Poor,
            a if a <= 400 => AqiCategory::VeryPoor,
            _ => AqiCategory::Severe,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Satisfactory => "Satisfactory",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Poor => "Poor",
            AqiCategory::VeryPoor => "Very Poor",
            AqiCategory::Severe => "Severe",
        }
    }

    /// Style slug used by front ends to colour the badge.
    pub fn class(self) -> &'static str {
        match self {
            AqiCategory::Good => "good",
            AqiCategory::Satisfactory => "satisfactory",
            AqiCategory::Moderate => "moderate",
            AqiCategory::Poor => "poor",
            AqiCategory::VeryPoor => "very-poor",
            AqiCategory::Severe => "severe",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

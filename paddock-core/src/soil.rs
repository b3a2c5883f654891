//! Soil survey properties for a plot.
//!
//! Drainage classes and hydrologic groups arrive as free-text survey strings.
//! Unrecognised values are kept in an `Unknown` variant so they can be
//! reported, and downstream models treat them as neutral.

use crate::timeseries::FloatValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalise a survey string for matching: lowercase, single spaces.
fn normalise(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// SSURGO natural drainage class, ordered from driest to wettest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrainageClass {
    Excessively,
    SomewhatExcessively,
    Well,
    ModeratelyWell,
    SomewhatPoorly,
    Poorly,
    VeryPoorly,
    Unknown(String),
}

impl DrainageClass {
    pub fn parse(raw: &str) -> Self {
        let key = normalise(raw);
        let key = key.strip_suffix(" drained").unwrap_or(&key);
        match key {
            "excessively" => DrainageClass::Excessively,
            "somewhat excessively" => DrainageClass::SomewhatExcessively,
            "well" => DrainageClass::Well,
            "moderately well" => DrainageClass::ModeratelyWell,
            "somewhat poorly" => DrainageClass::SomewhatPoorly,
            "poorly" => DrainageClass::Poorly,
            "very poorly" => DrainageClass::VeryPoorly,
            _ => DrainageClass::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DrainageClass::Excessively => "Excessively drained",
            DrainageClass::SomewhatExcessively => "Somewhat excessively drained",
            DrainageClass::Well => "Well drained",
            DrainageClass::ModeratelyWell => "Moderately well drained",
            DrainageClass::SomewhatPoorly => "Somewhat poorly drained",
            DrainageClass::Poorly => "Poorly drained",
            DrainageClass::VeryPoorly => "Very poorly drained",
            DrainageClass::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DrainageClass::Unknown(_))
    }
}

impl From<String> for DrainageClass {
    fn from(raw: String) -> Self {
        DrainageClass::parse(&raw)
    }
}

impl From<DrainageClass> for String {
    fn from(class: DrainageClass) -> Self {
        class.as_str().to_string()
    }
}

impl fmt::Display for DrainageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hydrologic soil group (A = high infiltration, D = very low).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HydrologicGroup {
    A,
    AD,
    B,
    BD,
    C,
    CD,
    D,
    Unknown(String),
}

impl HydrologicGroup {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "A" => HydrologicGroup::A,
            "A/D" => HydrologicGroup::AD,
            "B" => HydrologicGroup::B,
            "B/D" => HydrologicGroup::BD,
            "C" => HydrologicGroup::C,
            "C/D" => HydrologicGroup::CD,
            "D" => HydrologicGroup::D,
            _ => HydrologicGroup::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HydrologicGroup::A => "A",
            HydrologicGroup::AD => "A/D",
            HydrologicGroup::B => "B",
            HydrologicGroup::BD => "B/D",
            HydrologicGroup::C => "C",
            HydrologicGroup::CD => "C/D",
            HydrologicGroup::D => "D",
            HydrologicGroup::Unknown(raw) => raw,
        }
    }
}

impl From<String> for HydrologicGroup {
    fn from(raw: String) -> Self {
        HydrologicGroup::parse(&raw)
    }
}

impl From<HydrologicGroup> for String {
    fn from(group: HydrologicGroup) -> Self {
        group.as_str().to_string()
    }
}

/// Soil properties for one plot, as returned by the soil survey.
///
/// Every field is optional; models fall back to their defaults when a value
/// is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilProperties {
    pub drainage: Option<DrainageClass>,
    /// Available water capacity
    /// unit: cm water / cm soil
    pub awc_cm_per_cm: Option<FloatValue>,
    /// unit: %
    pub organic_matter_pct: Option<FloatValue>,
    pub hydrologic_group: Option<HydrologicGroup>,
}

/// A laboratory soil test for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTest {
    pub field: String,
    pub date: NaiveDate,
    /// unit: %
    pub organic_matter_pct: FloatValue,
    /// unit: lb N/acre
    pub total_n_lbs_acre: Option<FloatValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_survey_strings() {
        assert_eq!(DrainageClass::parse("Well drained"), DrainageClass::Well);
        assert_eq!(
            DrainageClass::parse("  Somewhat  poorly drained"),
            DrainageClass::SomewhatPoorly
        );
        assert_eq!(
            DrainageClass::parse("MODERATELY WELL DRAINED"),
            DrainageClass::ModeratelyWell
        );
        assert_eq!(DrainageClass::parse("very poorly"), DrainageClass::VeryPoorly);
    }

    #[test]
    fn test_unknown_drainage_keeps_raw_text() {
        let class = DrainageClass::parse("Subaqueous");
        assert_eq!(class, DrainageClass::Unknown("Subaqueous".to_string()));
        assert!(!class.is_known());
        assert_eq!(class.to_string(), "Subaqueous");
    }

    #[test]
    fn test_soil_properties_from_json() {
        let soil: SoilProperties = serde_json::from_str(
            r#"{"drainage": "Poorly drained", "awc_cm_per_cm": 0.18, "hydrologic_group": "c/d"}"#,
        )
        .unwrap();
        assert_eq!(soil.drainage, Some(DrainageClass::Poorly));
        assert_eq!(soil.awc_cm_per_cm, Some(0.18));
        assert_eq!(soil.organic_matter_pct, None);
        assert_eq!(soil.hydrologic_group, Some(HydrologicGroup::CD));
    }
}

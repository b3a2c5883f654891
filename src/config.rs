//! Farm configuration
//!
//! Every model parameter set, plus the handful of farm-level settings the
//! pipeline needs, loaded from a single TOML document. Any table or field
//! that is left out keeps its default.
//!
//! ```toml
//! [farm]
//! latitude = 48.5
//! management = "moderate"
//!
//! [moss.overrides]
//! "Solstice Field" = 0.18
//! ```

use paddock_components::carbon::ManagementIntensity;
use paddock_components::parameters::{
    BiomassParameters, CarbonBalanceParameters, CarbonProductionParameters, EmissionParameters,
    GrazingCorrectionParameters, GrowthParameters, IntakeParameters, MossParameters,
    SoilCarbonParameters,
};
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmSettings {
    /// unit: degrees north
    /// default: 48.5
    pub latitude: FloatValue,
    /// Soil water capacity used for the long-run growth history
    /// unit: mm
    /// default: 45.0
    pub default_awc_mm: FloatValue,
    /// default: moderate
    pub management: ManagementIntensity,
    /// Observations within this of the held value are not re-sent
    /// default: 1.0
    pub observation_tolerance: FloatValue,
    /// Weight of the satellite rate when blending with the model rate
    /// default: 0.5
    pub satellite_weight: FloatValue,
}

impl Default for FarmSettings {
    fn default() -> Self {
        Self {
            latitude: 48.5,
            default_awc_mm: 45.0,
            management: ManagementIntensity::Moderate,
            observation_tolerance: 1.0,
            satellite_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddockConfig {
    pub farm: FarmSettings,
    pub growth: GrowthParameters,
    pub biomass: BiomassParameters,
    pub grazing: GrazingCorrectionParameters,
    pub moss: MossParameters,
    pub intake: IntakeParameters,
    pub emissions: EmissionParameters,
    pub production: CarbonProductionParameters,
    pub balance: CarbonBalanceParameters,
    pub soil_carbon: SoilCarbonParameters,
}

impl PaddockConfig {
    pub fn from_toml_str(content: &str) -> PaddockResult<Self> {
        toml::from_str(content).map_err(|e| PaddockError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> PaddockResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| PaddockError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> PaddockResult<String> {
        toml::to_string(self).map_err(|e| PaddockError::Config(e.to_string()))
    }
}

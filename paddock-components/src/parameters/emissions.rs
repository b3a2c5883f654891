//! Livestock Methane Parameters
//!
//! # Reference
//!
//! - Sheep: IPCC 2019 Refinement, Vol 4 Ch 10, Tier 2 factors for temperate
//!   pasture sheep, by age class.
//! - Cattle: IPCC Tier 1 factors (beef 70, dairy 128 kg CH4/head/yr).
//! - GWP: AR5 100-year value for methane (28).

use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Sheep emission factors by class.
/// unit: kg CH4/head/yr
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheepEmissionFactors {
    /// default: 8.0
    pub ewe: FloatValue,
    /// Higher intake while milking drives more enteric fermentation
    /// default: 10.0
    pub ewe_lactating: FloatValue,
    /// default: 8.0
    pub ram: FloatValue,
    /// default: 4.0
    pub lamb: FloatValue,
    /// default: 8.0
    pub wether: FloatValue,
    /// Manure methane, applied per head regardless of class
    /// default: 0.28
    pub manure: FloatValue,
}

impl Default for SheepEmissionFactors {
    fn default() -> Self {
        Self {
            ewe: 8.0,
            ewe_lactating: 10.0,
            ram: 8.0,
            lamb: 4.0,
            wether: 8.0,
            manure: 0.28,
        }
    }
}

/// Cattle emission factors by type.
/// unit: kg CH4/head/yr
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CattleEmissionFactors {
    /// default: 70.0
    pub beef: FloatValue,
    /// default: 128.0
    pub dairy: FloatValue,
}

impl Default for CattleEmissionFactors {
    fn default() -> Self {
        Self {
            beef: 70.0,
            dairy: 128.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionParameters {
    pub sheep: SheepEmissionFactors,
    pub cattle: CattleEmissionFactors,
    /// unit: kg CO2eq / kg CH4
    /// default: 28.0
    pub ch4_gwp: FloatValue,
}

impl Default for EmissionParameters {
    fn default() -> Self {
        Self {
            sheep: SheepEmissionFactors::default(),
            cattle: CattleEmissionFactors::default(),
            ch4_gwp: 28.0,
        }
    }
}

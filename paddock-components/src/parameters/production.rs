//! Carbon Production Parameters
//!
//! Light-use-efficiency (LUE) model for gross and net primary production.
//!
//! # Reference
//!
//! - MOD17 (Running et al. 2004) and CASA (Potter et al. 1993) approaches.
//! - LUE for C3 temperate grasslands: Gilmanov et al. (2010).
//! - Extraterrestrial radiation: FAO-56, Allen et al. (1998), eq. 21.

use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for GPP, NPP, and soil sequestration estimates.
///
/// $$GPP = \varepsilon_{max} \times fPAR \times PAR \times f_T$$
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonProductionParameters {
    /// Maximum light use efficiency
    /// unit: g C / MJ PAR
    /// default: 1.2
    pub lue_max: FloatValue,
    /// unit: °C
    /// default: 20.0
    pub t_opt: FloatValue,
    /// unit: °C
    /// default: 0.0
    pub t_min: FloatValue,
    /// unit: °C
    /// default: 35.0
    pub t_max: FloatValue,
    /// Temperature scalar used when no temperature is supplied
    /// default: 0.7
    pub default_temperature_scalar: FloatValue,
    /// Clear-sky atmospheric transmission of extraterrestrial radiation
    /// default: 0.55
    pub atmospheric_transmission: FloatValue,
    /// Fraction of shortwave radiation that is photosynthetically active
    /// default: 0.48
    pub par_fraction: FloatValue,
    /// NPP as a fraction of GPP for grasslands
    /// default: 0.5
    pub npp_ratio: FloatValue,
    /// Soil (heterotrophic) respiration as a fraction of NPP
    /// default: 0.6
    pub soil_respiration_factor: FloatValue,
    /// Fraction of dry matter that is carbon
    /// default: 0.45
    pub carbon_fraction: FloatValue,
    /// Fraction of NPP that can enter stable soil organic matter before the
    /// management factor is applied
    /// default: 0.1
    pub stable_soil_fraction: FloatValue,
    /// Days per month in the annual integration
    /// default: 30
    pub days_per_month: u32,
}

impl Default for CarbonProductionParameters {
    fn default() -> Self {
        Self {
            lue_max: 1.2,
            t_opt: 20.0,
            t_min: 0.0,
            t_max: 35.0,
            default_temperature_scalar: 0.7,
            atmospheric_transmission: 0.55,
            par_fraction: 0.48,
            npp_ratio: 0.5,
            soil_respiration_factor: 0.6,
            carbon_fraction: 0.45,
            stable_soil_fraction: 0.1,
            days_per_month: 30,
        }
    }
}

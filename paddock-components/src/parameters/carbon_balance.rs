//! Carbon Balance Parameters
//!
//! Weather adjustment of dry-matter intake, and soil-test carbon conversion.
//!
//! # Reference
//!
//! - Cold-stress intake: NRC Nutrient Requirements of Small Ruminants.
//!   Intake rises 10-15% below ~12.8 °C (55 °F); 12% is used.
//! - van Bemmelen factor (SOC = 0.58 × OM).

use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherAdjustmentParameters {
    /// A day with mean temperature below this counts as cold
    /// unit: °C
    /// default: 12.8
    pub cold_threshold_c: FloatValue,
    /// A day with minimum temperature below this counts as a freeze
    /// unit: °C
    /// default: 0.0
    pub freeze_threshold_c: FloatValue,
    /// unit: °C
    /// default: 5.0
    pub gdd_base_c: FloatValue,
    /// Intake multiplier on a cold day
    /// default: 1.12
    pub cold_dmi_multiplier: FloatValue,
    /// Unadjusted dry-matter intake
    /// unit: kg DM/head/day
    /// default: 1.41
    pub base_dmi_kg_day: FloatValue,
}

impl Default for WeatherAdjustmentParameters {
    fn default() -> Self {
        Self {
            cold_threshold_c: 12.8,
            freeze_threshold_c: 0.0,
            gdd_base_c: 5.0,
            cold_dmi_multiplier: 1.12,
            base_dmi_kg_day: 1.41,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilCarbonParameters {
    /// unit: g C / g OM
    /// default: 0.58
    pub van_bemmelen_factor: FloatValue,
    /// unit: m
    /// default: 0.3
    pub sample_depth_m: FloatValue,
    /// unit: t/m³
    /// default: 1.2
    pub bulk_density: FloatValue,
    /// OM change (percentage points) treated as noise
    /// default: 0.1
    pub stable_band_pct: FloatValue,
}

impl Default for SoilCarbonParameters {
    fn default() -> Self {
        Self {
            van_bemmelen_factor: 0.58,
            sample_depth_m: 0.3,
            bulk_density: 1.2,
            stable_band_pct: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonBalanceParameters {
    pub weather: WeatherAdjustmentParameters,
    /// Global warming potential of methane, AR5 100-year
    /// default: 28.0
    pub ch4_gwp: FloatValue,
}

impl Default for CarbonBalanceParameters {
    fn default() -> Self {
        Self {
            weather: WeatherAdjustmentParameters::default(),
            ch4_gwp: 28.0,
        }
    }
}

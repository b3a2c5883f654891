//! Pasture Growth Parameters
//!
//! Thresholds for the temperature, moisture, and soil response curves, the
//! daily soil water balance, and the seasonal growth ceilings.
//!
//! # Reference
//!
//! Temperature and moisture thresholds follow common practice for temperate
//! C3 (ryegrass/fescue) pastures. Seasonal ceilings are tuned to an
//! unirrigated maritime Pacific-Northwest pasture, where spring is the peak
//! and summer is limited by drought dormancy.

use paddock_core::season::Season;
use paddock_core::soil::DrainageClass;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Multiplicative growth factor for each soil drainage class.
///
/// Both extremes are penalised: excessive drainage loses water, poor drainage
/// waterlogs roots. Unknown classes are neutral.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrainageFactors {
    /// default: 0.85
    pub excessively: FloatValue,
    /// default: 0.90
    pub somewhat_excessively: FloatValue,
    /// default: 1.0
    pub well: FloatValue,
    /// default: 1.0
    pub moderately_well: FloatValue,
    /// default: 0.95
    pub somewhat_poorly: FloatValue,
    /// default: 0.85
    pub poorly: FloatValue,
    /// default: 0.70
    pub very_poorly: FloatValue,
}

impl Default for DrainageFactors {
    fn default() -> Self {
        Self {
            excessively: 0.85,
            somewhat_excessively: 0.90,
            well: 1.0,
            moderately_well: 1.0,
            somewhat_poorly: 0.95,
            poorly: 0.85,
            very_poorly: 0.70,
        }
    }
}

impl DrainageFactors {
    pub fn factor(&self, class: &DrainageClass) -> FloatValue {
        match class {
            DrainageClass::Excessively => self.excessively,
            DrainageClass::SomewhatExcessively => self.somewhat_excessively,
            DrainageClass::Well => self.well,
            DrainageClass::ModeratelyWell => self.moderately_well,
            DrainageClass::SomewhatPoorly => self.somewhat_poorly,
            DrainageClass::Poorly => self.poorly,
            DrainageClass::VeryPoorly => self.very_poorly,
            DrainageClass::Unknown(_) => 1.0,
        }
    }
}

/// Soil moisture fractions (of available water capacity) shared by the
/// moisture response curve and the water balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MoistureThresholds {
    /// Below this no water is available to the plant
    /// unit: fraction of AWC
    /// default: 0.15
    pub wilting_point: FloatValue,
    /// Below this evapotranspiration and growth are restricted
    /// unit: fraction of AWC
    /// default: 0.40
    pub stress_point: FloatValue,
    /// unit: fraction of AWC
    /// default: 0.70
    pub optimal: FloatValue,
    /// Above this roots begin to suffer from lack of oxygen
    /// unit: fraction of AWC
    /// default: 0.95
    pub waterlogged: FloatValue,
}

impl Default for MoistureThresholds {
    fn default() -> Self {
        Self {
            wilting_point: 0.15,
            stress_point: 0.40,
            optimal: 0.70,
            waterlogged: 0.95,
        }
    }
}

/// Parameters for the response-curve library.
///
/// # Temperature
///
/// Trapezoidal response between `temp_base` and `temp_max` with a plateau
/// of 1.0 on `[temp_optimal_low, temp_optimal_high]`.
///
/// # Soil quality
///
/// $$f_{soil} = f_{drainage} \times \left(1 + \min(b_{max}, (OM - OM_0) \times s)\right)$$
///
/// where the bonus only applies when $OM > OM_0$.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseCurveParameters {
    /// unit: °C
    /// default: 4.0
    pub temp_base: FloatValue,
    /// unit: °C
    /// default: 12.0
    pub temp_optimal_low: FloatValue,
    /// unit: °C
    /// default: 22.0
    pub temp_optimal_high: FloatValue,
    /// unit: °C
    /// default: 32.0
    pub temp_max: FloatValue,

    pub moisture: MoistureThresholds,
    /// Linear decline of the moisture factor above the waterlog threshold
    /// unit: per unit fraction
    /// default: 2.0
    pub waterlog_slope: FloatValue,
    /// Some growth continues in saturated soil
    /// unit: dimensionless
    /// default: 0.3
    pub waterlog_floor: FloatValue,

    pub drainage: DrainageFactors,
    /// unit: %
    /// default: 3.0
    pub organic_matter_baseline: FloatValue,
    /// unit: per % OM
    /// default: 0.02
    pub organic_matter_slope: FloatValue,
    /// unit: dimensionless
    /// default: 0.15
    pub organic_matter_max_bonus: FloatValue,

    /// NDVI of bare soil, where fPAR bottoms out
    /// default: 0.08
    pub fpar_ndvi_min: FloatValue,
    /// NDVI of full canopy, where fPAR saturates
    /// default: 0.86
    pub fpar_ndvi_max: FloatValue,
    /// default: 0.01
    pub fpar_min: FloatValue,
    /// default: 0.95
    pub fpar_max: FloatValue,
}

impl Default for ResponseCurveParameters {
    fn default() -> Self {
        Self {
            temp_base: 4.0,
            temp_optimal_low: 12.0,
            temp_optimal_high: 22.0,
            temp_max: 32.0,
            moisture: MoistureThresholds::default(),
            waterlog_slope: 2.0,
            waterlog_floor: 0.3,
            drainage: DrainageFactors::default(),
            organic_matter_baseline: 3.0,
            organic_matter_slope: 0.02,
            organic_matter_max_bonus: 0.15,
            fpar_ndvi_min: 0.08,
            fpar_ndvi_max: 0.86,
            fpar_min: 0.01,
            fpar_max: 0.95,
        }
    }
}

/// Parameters for the single-bucket soil water balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterBalanceParameters {
    /// Effective pasture rooting depth
    /// unit: mm
    /// default: 300.0
    pub root_depth_mm: FloatValue,
    /// Used when the soil survey has no value
    /// unit: cm water / cm soil
    /// default: 0.15
    pub default_awc: FloatValue,
    /// Store level when a plot is first seen
    /// unit: fraction of AWC
    /// default: 0.5
    pub initial_fraction: FloatValue,
    /// Pasture crop coefficient applied to reference ET
    /// unit: dimensionless
    /// default: 0.9
    pub crop_coefficient: FloatValue,
}

impl Default for WaterBalanceParameters {
    fn default() -> Self {
        Self {
            root_depth_mm: 300.0,
            default_awc: 0.15,
            initial_fraction: 0.5,
            crop_coefficient: 0.9,
        }
    }
}

/// Maximum daily growth by season.
/// unit: kg DM/ha/day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalGrowthCeilings {
    /// default: 15.0
    pub winter: FloatValue,
    /// default: 80.0
    pub spring: FloatValue,
    /// default: 25.0
    pub summer: FloatValue,
    /// default: 50.0
    pub fall: FloatValue,
}

impl Default for SeasonalGrowthCeilings {
    fn default() -> Self {
        Self {
            winter: 15.0,
            spring: 80.0,
            summer: 25.0,
            fall: 50.0,
        }
    }
}

impl SeasonalGrowthCeilings {
    pub fn get(&self, season: Season) -> FloatValue {
        match season {
            Season::Winter => self.winter,
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Fall => self.fall,
        }
    }
}

/// Parameters for the daily growth model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParameters {
    pub curves: ResponseCurveParameters,
    pub water_balance: WaterBalanceParameters,
    pub ceilings: SeasonalGrowthCeilings,
}

//! NDVI to Biomass Parameters
//!
//! Calibration curves converting NDVI to standing dry matter, and the
//! grazing-pressure correction applied to the resulting feed on offer.
//!
//! # Reference
//!
//! Curves are of the exponential form used in satellite pasture monitoring
//! (Pasture.io, FarmShots, Pastures From Space), fitted to temperate
//! perennial ryegrass/fescue pastures and adjusted per season for the
//! Pacific Northwest.

use paddock_core::season::Season;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// One NDVI→SDM calibration curve.
///
/// $$SDM = \min\left(SDM_{max},\; a \cdot e^{b \cdot NDVI} + c\right)$$
///
/// Readings below `min_ndvi` are treated as bare soil (SDM = 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub name: String,
    /// a
    /// unit: kg DM/ha
    pub scale: FloatValue,
    /// b
    /// unit: per NDVI unit
    pub exponential_coefficient: FloatValue,
    /// c
    /// unit: kg DM/ha
    pub offset: FloatValue,
    pub min_ndvi: FloatValue,
    /// Cap applied because NDVI saturates at high leaf area
    /// unit: kg DM/ha
    pub max_sdm: FloatValue,
}

impl CalibrationModel {
    pub fn new(
        name: &str,
        scale: FloatValue,
        exponential_coefficient: FloatValue,
        offset: FloatValue,
        min_ndvi: FloatValue,
        max_sdm: FloatValue,
    ) -> Self {
        Self {
            name: name.to_string(),
            scale,
            exponential_coefficient,
            offset,
            min_ndvi,
            max_sdm,
        }
    }
}

/// The seasonal calibration set with an annual fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomassParameters {
    /// Dormant growth, lower NDVI baseline
    /// default: a=800, b=3.0, c=200, min NDVI 0.10, cap 2500
    pub winter: CalibrationModel,
    /// Peak growth, strongest NDVI response
    /// default: a=600, b=4.0, c=100, min NDVI 0.15, cap 4500
    pub spring: CalibrationModel,
    /// Dry-season dormancy, brown but still standing biomass
    /// default: a=1200, b=2.5, c=300, min NDVI 0.08, cap 3000
    pub summer: CalibrationModel,
    /// Autumn recovery after the rains return
    /// default: a=700, b=3.5, c=150, min NDVI 0.12, cap 3500
    pub fall: CalibrationModel,
    /// Used when no month is known
    /// default: a=700, b=3.5, c=200, min NDVI 0.10, cap 4000
    pub annual: CalibrationModel,
}

impl Default for BiomassParameters {
    fn default() -> Self {
        Self {
            winter: CalibrationModel::new("PNW Winter", 800.0, 3.0, 200.0, 0.10, 2500.0),
            spring: CalibrationModel::new("PNW Spring", 600.0, 4.0, 100.0, 0.15, 4500.0),
            summer: CalibrationModel::new("PNW Summer", 1200.0, 2.5, 300.0, 0.08, 3000.0),
            fall: CalibrationModel::new("PNW Fall", 700.0, 3.5, 150.0, 0.12, 3500.0),
            annual: CalibrationModel::new("PNW Annual", 700.0, 3.5, 200.0, 0.10, 4000.0),
        }
    }
}

impl BiomassParameters {
    pub fn seasonal(&self, season: Season) -> &CalibrationModel {
        match season {
            Season::Winter => &self.winter,
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Fall => &self.fall,
        }
    }
}

/// Expected error of the NDVI-derived estimates, for reporting alongside values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedUncertainty {
    /// unit: kg DM/ha
    pub sdm_kg_ha: FloatValue,
    /// unit: %
    pub sdm_pct: FloatValue,
    /// unit: kg DM/ha/day
    pub growth_rate_kg_ha_day: FloatValue,
}

pub const EXPECTED_UNCERTAINTY: ExpectedUncertainty = ExpectedUncertainty {
    sdm_kg_ha: 260.0,
    sdm_pct: 10.0,
    growth_rate_kg_ha_day: 15.0,
};

/// Parameters for the grazing-pressure correction.
///
/// NDVI sees greenness, not sward height, so a short grazed sward reads like
/// a tall rested one. The correction decays exponentially with pressure:
///
/// $$f = \max\left(f_{min},\; f_0 \, e^{-k P}\right)$$
///
/// Calibrated against plate-meter readings: pressure 50 → 0.63,
/// 94 → 0.48, 150 → 0.35.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrazingCorrectionParameters {
    /// Correction for an ungrazed paddock
    /// unit: dimensionless
    /// default: 0.85
    pub base_correction: FloatValue,
    /// k
    /// unit: ha·day/kg DM
    /// default: 0.006
    pub decay_rate: FloatValue,
    /// unit: dimensionless
    /// default: 0.25
    pub min_correction: FloatValue,
    /// Approach back toward the base correction while resting
    /// unit: day⁻¹
    /// default: 0.1
    pub recovery_rate: FloatValue,
}

impl Default for GrazingCorrectionParameters {
    fn default() -> Self {
        Self {
            base_correction: 0.85,
            decay_rate: 0.006,
            min_correction: 0.25,
            recovery_rate: 0.1,
        }
    }
}

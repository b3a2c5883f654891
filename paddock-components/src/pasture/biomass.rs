//! NDVI to Biomass Model
//!
//! Converts satellite NDVI composites into standing dry matter (SDM) and
//! derives growth rates from pairs of dated readings.
//!
//! # What This Component Does
//!
//! 1. Selects a calibration curve: an explicit override, else the seasonal
//!    curve for the month, else the annual fallback.
//! 2. Converts NDVI to SDM with a capped exponential:
//!
//! $$SDM = \min\left(SDM_{max},\; a \cdot e^{b \cdot NDVI} + c\right)$$
//!
//!    Readings below the curve's minimum NDVI are bare soil (SDM = 0).
//! 3. Derives a growth rate from two readings:
//!
//! $$G = \frac{SDM_{now} - SDM_{prev}}{\Delta t}$$
//!
//!    Each reading uses the curve for its own month, so an interval that
//!    crosses a season boundary uses two curves. Negative rates are valid
//!    (grazing, cutting, senescence).

use crate::parameters::{BiomassParameters, CalibrationModel};
use chrono::{Datelike, NaiveDate};
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::season::Season;
use paddock_core::timeseries::FloatValue;
use paddock_core::vegetation::VegetationReading;
use serde::{Deserialize, Serialize};

/// A standing dry matter estimate and the curve that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdmEstimate {
    /// unit: kg DM/ha
    pub sdm_kg_ha: FloatValue,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateEstimate {
    /// unit: kg DM/ha/day
    pub growth_kg_ha_day: FloatValue,
    pub sdm_now_kg_ha: FloatValue,
    pub sdm_prev_kg_ha: FloatValue,
    pub days_between: i64,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiomassModel {
    parameters: BiomassParameters,
}

impl BiomassModel {
    pub fn new() -> Self {
        Self::from_parameters(BiomassParameters::default())
    }

    pub fn from_parameters(parameters: BiomassParameters) -> Self {
        Self { parameters }
    }

    /// The curve used for a given month. Unknown or invalid months use the
    /// annual fallback.
    pub fn model_for_month(&self, month: Option<u32>) -> &CalibrationModel {
        match month.map(Season::from_month) {
            Some(Ok(season)) => self.parameters.seasonal(season),
            _ => &self.parameters.annual,
        }
    }

    /// Evaluate a calibration curve.
    ///
    /// This is the core conversion, extracted for testability.
    pub fn evaluate(model: &CalibrationModel, ndvi: FloatValue) -> FloatValue {
        if ndvi < model.min_ndvi {
            return 0.0;
        }
        let sdm = model.scale * (model.exponential_coefficient * ndvi).exp() + model.offset;
        sdm.min(model.max_sdm)
    }

    pub fn ndvi_to_standing_dry_matter(
        &self,
        ndvi: FloatValue,
        month: Option<u32>,
        model_override: Option<&CalibrationModel>,
    ) -> SdmEstimate {
        let model = model_override.unwrap_or_else(|| self.model_for_month(month));
        SdmEstimate {
            sdm_kg_ha: Self::evaluate(model, ndvi),
            model: model.name.clone(),
        }
    }

    /// Growth rate between two NDVI readings.
    ///
    /// Both readings are clamped to be non-negative first. Fails when
    /// `days_between` is not positive.
    pub fn calculate_growth_rate(
        &self,
        ndvi_now: FloatValue,
        ndvi_prev: FloatValue,
        days_between: i64,
        month_now: Option<u32>,
        month_prev: Option<u32>,
    ) -> PaddockResult<GrowthRateEstimate> {
        if days_between <= 0 {
            return Err(PaddockError::InvalidInterval { days: days_between });
        }

        let now = self.ndvi_to_standing_dry_matter(ndvi_now.max(0.0), month_now, None);
        let prev = self.ndvi_to_standing_dry_matter(ndvi_prev.max(0.0), month_prev, None);
        let growth_kg_ha_day = (now.sdm_kg_ha - prev.sdm_kg_ha) / days_between as FloatValue;

        let notes = if now.model == prev.model {
            format!("Model: {}", now.model)
        } else {
            format!("Models: {} -> {}", prev.model, now.model)
        };

        Ok(GrowthRateEstimate {
            growth_kg_ha_day,
            sdm_now_kg_ha: now.sdm_kg_ha,
            sdm_prev_kg_ha: prev.sdm_kg_ha,
            days_between,
            notes,
        })
    }

    /// Growth rate between two composites, dated by the end of each window.
    pub fn growth_between_readings(
        &self,
        now: &VegetationReading,
        prev: &VegetationReading,
    ) -> PaddockResult<GrowthRateEstimate> {
        let end_now: NaiveDate = now.date_range.end;
        let end_prev: NaiveDate = prev.date_range.end;
        self.calculate_growth_rate(
            now.ndvi_mean,
            prev.ndvi_mean,
            (end_now - end_prev).num_days(),
            Some(end_now.month()),
            Some(end_prev.month()),
        )
    }
}

//! Grazing-Pressure Correction
//!
//! NDVI measures canopy greenness, not sward height. A heavily grazed, short
//! but green paddock reads much like a tall rested one, so NDVI-derived feed
//! on offer (FOO) is systematically high in grazed paddocks.
//!
//! # What This Component Does
//!
//! 1. Decays the correction exponentially with grazing pressure:
//!
//! $$f = f_0 \, e^{-k P}$$
//!
//! 2. For a resting paddock (no current pressure, rested for $d$ days),
//!    blends back toward $f_0$ with weight $1 - e^{-r d}$. About half the
//!    way in 7 days, 90% by 21 days.
//!
//! 3. Floors the result at $f_{min}$.

use crate::parameters::GrazingCorrectionParameters;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrazingCorrection {
    parameters: GrazingCorrectionParameters,
}

impl GrazingCorrection {
    pub fn new() -> Self {
        Self::from_parameters(GrazingCorrectionParameters::default())
    }

    pub fn from_parameters(parameters: GrazingCorrectionParameters) -> Self {
        Self { parameters }
    }

    /// Correction factor in `[min_correction, base_correction]`.
    ///
    /// # Arguments
    ///
    /// * `pressure_kg_ha_day` - Current grazing intake per hectare
    /// * `days_since_rest` - Days the paddock has been rested, if known
    pub fn calculate_grazing_correction(
        &self,
        pressure_kg_ha_day: FloatValue,
        days_since_rest: Option<u32>,
    ) -> FloatValue {
        let p = &self.parameters;
        let pressure = pressure_kg_ha_day.max(0.0);
        let mut correction = p.base_correction * (-p.decay_rate * pressure).exp();

        if let Some(days) = days_since_rest {
            if days > 0 && pressure == 0.0 {
                let recovery = 1.0 - (-p.recovery_rate * FloatValue::from(days)).exp();
                correction += (p.base_correction - correction) * recovery;
            }
        }

        correction.max(p.min_correction)
    }

    /// Apply the correction to a raw NDVI-derived FOO.
    ///
    /// # Returns
    ///
    /// (adjusted_foo, factor_used)
    pub fn adjust_foo_for_grazing(
        &self,
        raw_foo_kg_ha: FloatValue,
        pressure_kg_ha_day: FloatValue,
        days_since_rest: Option<u32>,
    ) -> (FloatValue, FloatValue) {
        let factor = self.calculate_grazing_correction(pressure_kg_ha_day, days_since_rest);
        (raw_foo_kg_ha * factor, factor)
    }
}

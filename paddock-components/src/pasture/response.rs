//! Response-Curve Library
//!
//! Pure functions that turn a single environmental variable into a
//! dimensionless growth factor.
//!
//! # What This Component Does
//!
//! 1. Temperature: trapezoidal membership function. Zero at or below the
//!    base temperature, linear ramp to 1 across the lower band, plateau at 1
//!    across the optimum, linear fall to 0 across the heat-stress band.
//!
//! 2. Soil moisture (fraction of available water capacity): zero at the
//!    wilting point, 0 → 0.5 between wilting and stress points, 0.5 → 1
//!    between stress and optimal, 1 up to the waterlog threshold, then a
//!    linear decline floored at 0.3.
//!
//! 3. Soil quality: drainage-class multiplier times a capped organic-matter
//!    bonus.
//!
//! 4. fPAR: piecewise-linear mapping from NDVI to the fraction of absorbed
//!    photosynthetically active radiation.
//!
//! All curves are stateless and deterministic. Inputs outside the physical
//! range are the caller's responsibility.

use crate::parameters::ResponseCurveParameters;
use paddock_core::soil::DrainageClass;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseCurves {
    parameters: ResponseCurveParameters,
}

impl ResponseCurves {
    pub fn new() -> Self {
        Self::from_parameters(ResponseCurveParameters::default())
    }

    pub fn from_parameters(parameters: ResponseCurveParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &ResponseCurveParameters {
        &self.parameters
    }

    /// Temperature growth factor in [0, 1].
    ///
    /// $$f_T = \begin{cases}
    /// 0 & T \le T_b \\\\
    /// \frac{T - T_b}{T_{ol} - T_b} & T_b < T < T_{ol} \\\\
    /// 1 & T_{ol} \le T \le T_{oh} \\\\
    /// \frac{T_{max} - T}{T_{max} - T_{oh}} & T_{oh} < T < T_{max} \\\\
    /// 0 & T \ge T_{max}
    /// \end{cases}$$
    pub fn temperature_factor(&self, temp_c: FloatValue) -> FloatValue {
        let p = &self.parameters;
        if temp_c <= p.temp_base || temp_c >= p.temp_max {
            0.0
        } else if temp_c < p.temp_optimal_low {
            (temp_c - p.temp_base) / (p.temp_optimal_low - p.temp_base)
        } else if temp_c <= p.temp_optimal_high {
            1.0
        } else {
            (p.temp_max - temp_c) / (p.temp_max - p.temp_optimal_high)
        }
    }

    /// Moisture growth factor from the soil water fraction.
    ///
    /// Never reaches zero on the wet side: saturated pastures still grow
    /// slowly, so the waterlogged branch is floored.
    pub fn moisture_factor(&self, fraction: FloatValue) -> FloatValue {
        let m = &self.parameters.moisture;
        if fraction <= m.wilting_point {
            0.0
        } else if fraction < m.stress_point {
            0.5 * (fraction - m.wilting_point) / (m.stress_point - m.wilting_point)
        } else if fraction < m.optimal {
            0.5 + 0.5 * (fraction - m.stress_point) / (m.optimal - m.stress_point)
        } else if fraction <= m.waterlogged {
            1.0
        } else {
            let decline = 1.0 - (fraction - m.waterlogged) * self.parameters.waterlog_slope;
            decline.max(self.parameters.waterlog_floor)
        }
    }

    /// Soil quality multiplier from drainage class and organic matter.
    ///
    /// Missing inputs are neutral.
    pub fn soil_quality_factor(
        &self,
        drainage: Option<&DrainageClass>,
        organic_matter_pct: Option<FloatValue>,
    ) -> FloatValue {
        let p = &self.parameters;
        let mut factor = drainage.map_or(1.0, |class| p.drainage.factor(class));

        if let Some(om) = organic_matter_pct {
            if om > p.organic_matter_baseline {
                let bonus = ((om - p.organic_matter_baseline) * p.organic_matter_slope)
                    .min(p.organic_matter_max_bonus);
                factor *= 1.0 + bonus;
            }
        }
        factor
    }

    /// Fraction of absorbed PAR from NDVI, in `[fpar_min, fpar_max]`.
    pub fn ndvi_to_fpar(&self, ndvi: FloatValue) -> FloatValue {
        let p = &self.parameters;
        let ndvi = ndvi.clamp(0.0, 1.0);
        if ndvi <= p.fpar_ndvi_min {
            p.fpar_min
        } else if ndvi >= p.fpar_ndvi_max {
            p.fpar_max
        } else {
            p.fpar_min
                + (ndvi - p.fpar_ndvi_min) * (p.fpar_max - p.fpar_min)
                    / (p.fpar_ndvi_max - p.fpar_ndvi_min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn curves() -> ResponseCurves {
        ResponseCurves::new()
    }

    // ===== Temperature Tests =====

    #[test]
    fn test_temperature_zero_outside_range() {
        let c = curves();
        for t in [-10.0, 0.0, 4.0, 32.0, 40.0] {
            assert_eq!(c.temperature_factor(t), 0.0, "temp {}", t);
        }
    }

    #[test]
    fn test_temperature_plateau() {
        let c = curves();
        for t in [12.0, 15.0, 18.5, 22.0] {
            assert_eq!(c.temperature_factor(t), 1.0, "temp {}", t);
        }
    }

    #[test]
    fn test_temperature_ramps_are_strictly_monotonic() {
        let c = curves();
        let mut previous = c.temperature_factor(4.0);
        for i in 1..=80 {
            let t = 4.0 + i as f64 * 0.1;
            let f = c.temperature_factor(t);
            assert!(f > previous, "factor should rise at {:.1}: {} <= {}", t, f, previous);
            previous = f;
        }

        let mut previous = c.temperature_factor(22.0);
        for i in 1..=100 {
            let t = 22.0 + i as f64 * 0.1;
            let f = c.temperature_factor(t);
            assert!(f < previous, "factor should fall at {:.1}", t);
            previous = f;
        }
    }

    #[test]
    fn test_temperature_midpoints() {
        let c = curves();
        assert!(is_close!(c.temperature_factor(8.0), 0.5));
        assert!(is_close!(c.temperature_factor(27.0), 0.5));
    }

    // ===== Moisture Tests =====

    #[test]
    fn test_moisture_boundaries() {
        let c = curves();
        assert_eq!(c.moisture_factor(0.15), 0.0);
        assert_eq!(c.moisture_factor(0.0), 0.0);
        assert!(is_close!(c.moisture_factor(0.40), 0.5));
        assert_eq!(c.moisture_factor(0.70), 1.0);
        assert_eq!(c.moisture_factor(0.95), 1.0);
        assert_eq!(c.moisture_factor(1.5), 0.3);
    }

    #[test]
    fn test_moisture_waterlogged_decline() {
        let c = curves();
        // 1 - (1.0 - 0.95) * 2
        assert!(is_close!(c.moisture_factor(1.0), 0.9));
        assert!(c.moisture_factor(1.2) < c.moisture_factor(1.0));
    }

    // ===== Soil Quality Tests =====

    #[test]
    fn test_soil_quality_neutral_without_data() {
        assert_eq!(curves().soil_quality_factor(None, None), 1.0);
    }

    #[test]
    fn test_soil_quality_drainage() {
        let c = curves();
        assert!(is_close!(
            c.soil_quality_factor(Some(&DrainageClass::Poorly), None),
            0.85
        ));
        assert!(is_close!(
            c.soil_quality_factor(Some(&DrainageClass::Unknown("x".into())), None),
            1.0
        ));
    }

    #[test]
    fn test_organic_matter_bonus_is_capped() {
        let c = curves();
        assert!(is_close!(c.soil_quality_factor(None, Some(2.0)), 1.0));
        assert!(is_close!(c.soil_quality_factor(None, Some(5.0)), 1.04));
        assert!(is_close!(c.soil_quality_factor(None, Some(20.0)), 1.15));
        assert!(is_close!(
            c.soil_quality_factor(Some(&DrainageClass::Poorly), Some(5.0)),
            0.85 * 1.04
        ));
    }

    // ===== fPAR Tests =====

    #[test]
    fn test_fpar_breakpoints() {
        let c = curves();
        assert_eq!(c.ndvi_to_fpar(-0.2), 0.01);
        assert_eq!(c.ndvi_to_fpar(0.08), 0.01);
        assert_eq!(c.ndvi_to_fpar(0.86), 0.95);
        assert_eq!(c.ndvi_to_fpar(1.2), 0.95);
        assert!(is_close!(c.ndvi_to_fpar(0.47), 0.48));
    }

    #[test]
    fn test_curves_are_idempotent() {
        let c = curves();
        for x in [-3.0, 0.1, 0.33, 7.7, 19.0, 29.9] {
            assert_eq!(c.temperature_factor(x).to_bits(), c.temperature_factor(x).to_bits());
            assert_eq!(c.moisture_factor(x).to_bits(), c.moisture_factor(x).to_bits());
            assert_eq!(c.ndvi_to_fpar(x).to_bits(), c.ndvi_to_fpar(x).to_bits());
        }
    }
}

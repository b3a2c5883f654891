//! Soil Water Balance
//!
//! A single-bucket model of plant-available water in the root zone.
//!
//! # What This Component Does
//!
//! Each day:
//!
//! 1. Precipitation is added to the store.
//! 2. Potential ET is reference ET scaled by the crop coefficient.
//! 3. Actual ET equals potential ET while the store is above the stress
//!    point, falls linearly to zero between the stress and wilting points,
//!    and is zero below the wilting point. The fraction used is the one
//!    after precipitation has been added.
//! 4. Actual ET is removed, and the store is clamped to `[0, capacity]`.
//!    Water above capacity drains freely and is not tracked.
//!
//! # States
//!
//! [`SoilWaterState`] belongs to exactly one plot. The balance is written as
//! a fold, `(state, day) → (state', actual_et)`, so the ordering dependency
//! and single ownership are visible in the signature.

use crate::parameters::{MoistureThresholds, WaterBalanceParameters};
use paddock_core::soil::SoilProperties;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Plant-available water in one plot's root zone.
///
/// Invariant: `0 <= current_mm <= awc_mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilWaterState {
    awc_mm: FloatValue,
    current_mm: FloatValue,
    root_depth_mm: FloatValue,
}

impl SoilWaterState {
    /// A store with the given capacity, filled to `initial_fraction`.
    pub fn with_capacity(awc_mm: FloatValue, initial_fraction: FloatValue) -> Self {
        let awc_mm = awc_mm.max(0.0);
        Self {
            awc_mm,
            current_mm: awc_mm * initial_fraction.clamp(0.0, 1.0),
            root_depth_mm: 0.0,
        }
    }

    /// A store sized from a soil AWC fraction (cm/cm) and rooting depth.
    pub fn from_awc_fraction(
        awc_cm_per_cm: FloatValue,
        root_depth_mm: FloatValue,
        initial_fraction: FloatValue,
    ) -> Self {
        Self {
            root_depth_mm,
            ..Self::with_capacity(awc_cm_per_cm * root_depth_mm, initial_fraction)
        }
    }

    pub fn awc_mm(&self) -> FloatValue {
        self.awc_mm
    }

    pub fn current_mm(&self) -> FloatValue {
        self.current_mm
    }

    pub fn root_depth_mm(&self) -> FloatValue {
        self.root_depth_mm
    }

    /// Store as a fraction of capacity. A store with no capacity reports 0.5.
    pub fn fraction(&self) -> FloatValue {
        if self.awc_mm <= 0.0 {
            0.5
        } else {
            self.current_mm / self.awc_mm
        }
    }

    /// Advance the store by one day in place, returning actual ET (mm).
    ///
    /// Not idempotent: calling twice for the same day applies the day twice.
    pub fn update(
        &mut self,
        balance: &WaterBalance,
        precip_mm: FloatValue,
        et0_mm: FloatValue,
    ) -> FloatValue {
        let (next, actual_et) = balance.step(*self, precip_mm, et0_mm);
        *self = next;
        actual_et
    }
}

/// The daily water balance rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterBalance {
    parameters: WaterBalanceParameters,
    thresholds: MoistureThresholds,
}

impl WaterBalance {
    pub fn new() -> Self {
        Self::from_parameters(WaterBalanceParameters::default(), MoistureThresholds::default())
    }

    pub fn from_parameters(
        parameters: WaterBalanceParameters,
        thresholds: MoistureThresholds,
    ) -> Self {
        Self {
            parameters,
            thresholds,
        }
    }

    pub fn parameters(&self) -> &WaterBalanceParameters {
        &self.parameters
    }

    /// Starting state for a plot, using the soil survey AWC when known.
    pub fn initial_state(&self, soil: Option<&SoilProperties>) -> SoilWaterState {
        let awc = soil
            .and_then(|s| s.awc_cm_per_cm)
            .filter(|awc| *awc > 0.0)
            .unwrap_or(self.parameters.default_awc);
        SoilWaterState::from_awc_fraction(
            awc,
            self.parameters.root_depth_mm,
            self.parameters.initial_fraction,
        )
    }

    /// Actual ET given the current store fraction and potential ET.
    ///
    /// $$AET = PET \times \begin{cases}
    /// 1 & \theta > \theta_s \\\\
    /// \frac{\theta - \theta_w}{\theta_s - \theta_w} & \theta_w < \theta \le \theta_s \\\\
    /// 0 & \theta \le \theta_w
    /// \end{cases}$$
    pub fn actual_et(&self, fraction: FloatValue, potential_et: FloatValue) -> FloatValue {
        let t = &self.thresholds;
        if fraction > t.stress_point {
            potential_et
        } else if fraction > t.wilting_point {
            potential_et * (fraction - t.wilting_point) / (t.stress_point - t.wilting_point)
        } else {
            0.0
        }
    }

    /// One day of the balance with the configured crop coefficient.
    ///
    /// # Returns
    ///
    /// (new_state, actual_et_mm)
    pub fn step(
        &self,
        state: SoilWaterState,
        precip_mm: FloatValue,
        et0_mm: FloatValue,
    ) -> (SoilWaterState, FloatValue) {
        self.step_with_crop_coefficient(state, precip_mm, et0_mm, self.parameters.crop_coefficient)
    }

    /// One day of the balance with an explicit crop coefficient.
    pub fn step_with_crop_coefficient(
        &self,
        state: SoilWaterState,
        precip_mm: FloatValue,
        et0_mm: FloatValue,
        crop_coefficient: FloatValue,
    ) -> (SoilWaterState, FloatValue) {
        let wetted = SoilWaterState {
            current_mm: state.current_mm + precip_mm.max(0.0),
            ..state
        };

        let potential_et = et0_mm.max(0.0) * crop_coefficient;
        let actual_et = self.actual_et(wetted.fraction(), potential_et);

        let current_mm = (wetted.current_mm - actual_et).clamp(0.0, state.awc_mm);
        (
            SoilWaterState {
                current_mm,
                ..state
            },
            actual_et,
        )
    }
}

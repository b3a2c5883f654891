//! Molecular mass ratios used to convert between carbon and gas masses.

use paddock_core::timeseries::FloatValue;

/// CO2 mass per unit carbon mass (44/12).
pub const CO2_PER_C: FloatValue = 44.0 / 12.0;

/// CH4 mass per unit carbon mass (16/12).
pub const CH4_PER_C: FloatValue = 16.0 / 12.0;

/// Grams per square metre to kilograms per hectare.
pub const G_M2_TO_KG_HA: FloatValue = 10.0;

pub const KG_PER_TONNE: FloatValue = 1000.0;

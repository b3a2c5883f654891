//! Model parameters
//!
//! This module contains parameter structures for all components.
//! Each parameter struct provides literature defaults for a temperate
//! maritime sheep pasture and supports partial deserialization.

mod biomass;
mod carbon_balance;
mod emissions;
mod growth;
mod intake;
mod moss;
mod production;

pub use biomass::{
    BiomassParameters, CalibrationModel, ExpectedUncertainty, GrazingCorrectionParameters,
    EXPECTED_UNCERTAINTY,
};
pub use carbon_balance::{
    CarbonBalanceParameters, SoilCarbonParameters, WeatherAdjustmentParameters,
};
pub use emissions::{CattleEmissionFactors, EmissionParameters, SheepEmissionFactors};
pub use growth::{
    DrainageFactors, GrowthParameters, MoistureThresholds, ResponseCurveParameters,
    SeasonalGrowthCeilings, WaterBalanceParameters,
};
pub use intake::{base_intake_fraction, default_weight_kg, IntakeParameters};
pub use moss::MossParameters;
pub use production::CarbonProductionParameters;

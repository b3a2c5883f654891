//! Livestock domain components
//!
//! - `IntakeModel`: dry matter intake per animal and grazing pressure per
//!   paddock
//! - `LivestockEmissions`: enteric and manure methane for sheep and cattle
//! - `factors`: diet, breed and climate methane multipliers

pub mod factors;
mod emissions;
mod intake;

pub use emissions::{
    AppliedAdjustments, CattleMethane, ClassMethane, LivestockEmissions, LivestockMethaneEstimate,
    SheepMethaneEstimate, SheepSpec,
};
pub use factors::{Breed, CattleType, ClimateZone, EmissionAdjustmentFactors, FeedAdditive, ForageType};
pub use intake::{AnimalIntake, GrazingSummary, IntakeModel, PaddockConsumption, WeightSource};

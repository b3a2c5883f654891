//! Pasture domain components
//!
//! - `ResponseCurves`: temperature, moisture, soil-quality and fPAR responses
//! - `WaterBalance` / `SoilWaterState`: single-bucket root-zone water store
//! - `DailyGrowthModel`: weather-driven daily growth for one plot
//! - `BiomassModel`: NDVI to standing dry matter and growth rates
//! - `GrazingCorrection`: FOO correction for grazing pressure
//! - `MossModel`: FOO correction for moss ground cover
//! - `compositing`: seasonal satellite compositing windows

mod biomass;
pub mod compositing;
mod grazing;
mod growth;
mod moss;
mod response;
mod water_balance;

pub use biomass::{BiomassModel, GrowthRateEstimate, SdmEstimate};
pub use grazing::GrazingCorrection;
pub use growth::{DailyGrowthModel, DailyGrowthResult, GrowthNote};
pub use moss::{DataQuality, MossEstimate, MossModel, MossSource, SeasonalityIndex};
pub use response::ResponseCurves;
pub use water_balance::{SoilWaterState, WaterBalance};

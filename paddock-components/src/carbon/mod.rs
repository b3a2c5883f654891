//! Carbon estimation
//!
//! - `CarbonProduction`: NDVI-driven GPP/NPP and annual soil sequestration
//! - `SoilCarbon`: soil-test organic matter to carbon stocks and trends
//! - `CarbonBalance`: net farm balance, with an optional cold-weather intake
//!   adjustment

mod balance;
mod production;
mod soil;

pub use balance::{
    Band, Bands, CarbonBalance, CarbonBalanceInputs, CarbonBalanceReport, DmiAdjustment,
    YearlyDmi, YearlyWeatherStats,
};
pub use production::{
    AnnualSequestration, CarbonFlux, CarbonProduction, FarmCarbonTotals, ManagementIntensity,
    PlotCarbon, YearlyCarbon,
};
pub use soil::{
    OrganicMatterChange, OrganicMatterTrend, SoilCarbon, SoilCarbonResult, SoilCarbonStock,
};

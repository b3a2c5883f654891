//! Pasture growth and farm carbon estimation.
//!
//! The models live in [`paddock_components`] and the shared data types and
//! collaborator traits in [`paddock_core`]; both are re-exported here. This
//! crate adds the TOML configuration and the [`pipeline::Pipeline`] that runs
//! the models against a farm's weather, soil, satellite and livestock data.

pub mod config;
pub mod pipeline;

pub use paddock_components;
pub use paddock_core;

pub use config::{FarmSettings, PaddockConfig};
pub use pipeline::{CarbonReport, CarbonScenario, FeedOnOffer, Pipeline, Services, WeatherGrowth};

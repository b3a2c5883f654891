//! Interfaces to the external systems the models depend on.
//!
//! Network clients, caching and retry policy live behind these traits. The
//! models only see resolved plain data.

use crate::errors::PaddockResult;
use crate::livestock::{AnimalRecord, Paddock};
use crate::observation::Observation;
use crate::soil::SoilProperties;
use crate::timeseries::{DateRange, WeatherDay};
use crate::vegetation::{MonthlyNdvi, VegetationReading};

/// Daily weather for the farm location.
///
/// Implementors that serve dates beyond a forecast horizon are responsible
/// for any climatology fill.
pub trait WeatherService {
    fn daily_weather(&self, range: &DateRange) -> PaddockResult<Vec<WeatherDay>>;
}

/// Soil survey lookup keyed by plot name.
pub trait SoilPropertiesService {
    fn soil_properties(&self, plot: &str) -> PaddockResult<Option<SoilProperties>>;
}

/// Satellite vegetation index composites.
pub trait VegetationIndexService {
    /// Composite NDVI for a plot over `range`, or `None` if no cloud-free
    /// pixels were available.
    fn ndvi(&self, plot: &str, range: &DateRange) -> PaddockResult<Option<VegetationReading>>;

    /// Monthly NDVI history for a plot.
    fn ndvi_history(&self, plot: &str) -> PaddockResult<Vec<MonthlyNdvi>>;
}

/// The farm-management system.
pub trait FarmDataService {
    fn paddocks(&self) -> PaddockResult<Vec<Paddock>>;

    fn animals(&self) -> PaddockResult<Vec<AnimalRecord>>;

    /// Observations currently held for the given paddocks.
    fn existing_observations(&self, plots: &[String]) -> PaddockResult<Vec<Observation>>;

    /// Push observations, returning how many were accepted.
    fn push_observations(&self, observations: &[Observation]) -> PaddockResult<usize>;
}

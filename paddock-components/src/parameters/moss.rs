use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters for the moss ground-cover correction.
///
/// Moss stays green year round and inflates NDVI without contributing feed.
/// The drainage/seasonality estimate is uncalibrated, so by default a flat
/// fraction is used unless a paddock has a named override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MossParameters {
    /// Used when there is no override and the model estimate is disabled
    /// unit: fraction of ground cover
    /// default: 0.05
    pub default_fraction: FloatValue,
    /// Apply the drainage/seasonality estimate instead of the flat default
    /// default: false
    pub use_model_estimate: bool,
    /// Moss on a completely undrained soil
    /// unit: fraction of ground cover
    /// default: 0.35
    pub base_fraction: FloatValue,
    /// Seasonality below which evergreen cover adds moss
    /// default: 0.3
    pub seasonality_reference: FloatValue,
    /// Extra moss at zero seasonality
    /// default: 0.15
    pub seasonality_max_modifier: FloatValue,
    /// Extra moss when seasonality cannot be computed
    /// default: 0.05
    pub unknown_seasonality_modifier: FloatValue,
    /// default: 0.40
    pub max_fraction: FloatValue,
    /// Field-checked moss fractions by paddock name. These always win.
    pub overrides: BTreeMap<String, FloatValue>,
}

impl Default for MossParameters {
    fn default() -> Self {
        Self {
            default_fraction: 0.05,
            use_model_estimate: false,
            base_fraction: 0.35,
            seasonality_reference: 0.3,
            seasonality_max_modifier: 0.15,
            unknown_seasonality_modifier: 0.05,
            max_fraction: 0.40,
            overrides: BTreeMap::new(),
        }
    }
}

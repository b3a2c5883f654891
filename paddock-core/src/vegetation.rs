use crate::timeseries::{DateRange, FloatValue};
use serde::{Deserialize, Serialize};

/// A composite NDVI statistic for one plot over a date window.
///
/// `ndvi_mean` is nominally in [-1, 1] but cloud and sensor noise can push it
/// outside; models clamp before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationReading {
    pub plot_id: String,
    pub ndvi_mean: FloatValue,
    /// Advisory only, not used by the models.
    pub ndvi_stddev: Option<FloatValue>,
    pub date_range: DateRange,
    pub pixel_count: u32,
}

impl VegetationReading {
    /// NDVI clamped to the physical range [0, 1].
    pub fn clamped_ndvi(&self) -> FloatValue {
        self.ndvi_mean.clamp(0.0, 1.0)
    }
}

/// One month of an NDVI history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNdvi {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub ndvi_mean: Option<FloatValue>,
}

//! Farm-level aggregation
//!
//! - `FarmGrowthAggregator`: daily growth for every plot, summaries, current
//!   growth and forecasts
//! - `HistoricalGrowthModel` / `GrowthHistory`: modelled growth climatology
//!   and comparisons against it

mod aggregate;
mod historical;

pub use aggregate::{
    blend_growth_rate, CurrentGrowth, FarmGrowthAggregator, ForecastSummary, GrowthSummary,
};
pub use historical::{
    compare_to_historical, ComparisonStatus, GrowthHistory, HistoricalComparison, HistoricalDay,
    HistoricalGrowthModel, MonthlyStats, SeasonSummary, TrendAnalysis, TrendDirection,
};

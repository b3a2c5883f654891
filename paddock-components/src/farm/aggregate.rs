//! Farm Growth Aggregator
//!
//! Runs the daily growth model for every plot over a date range and reduces
//! the results to summaries, a current-growth estimate and a forecast.
//!
//! # What This Component Does
//!
//! 1. Builds one [`SoilWaterState`] per plot from its soil data (or the
//!    default AWC when unknown).
//! 2. Walks the requested dates in order. A date with no weather record is
//!    skipped for every plot: there is no interpolation and no error, and
//!    the skipped dates are logged.
//! 3. Each plot is an independent fold over the weather, so with the
//!    `parallel` feature plots run on a thread pool. Every task builds its
//!    own water state.

use crate::livestock::PaddockConsumption;
use crate::parameters::GrowthParameters;
use crate::pasture::{DailyGrowthModel, DailyGrowthResult, GrowthNote, SoilWaterState};
use chrono::NaiveDate;
use paddock_core::season::Season;
use paddock_core::soil::SoilProperties;
use paddock_core::timeseries::{DateRange, FloatValue, WeatherSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Days averaged for the current growth estimate.
const CURRENT_WINDOW_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub days: usize,
    /// unit: kg DM/ha
    pub total_growth_kg_ha: FloatValue,
    /// unit: kg DM/ha/day
    pub avg_growth_kg_ha_day: FloatValue,
    pub min_growth_kg_ha_day: FloatValue,
    pub max_growth_kg_ha_day: FloatValue,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Latest modelled growth for a plot, net of grazing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentGrowth {
    pub date: NaiveDate,
    pub growth_kg_ha_day: FloatValue,
    pub growth_7day_avg: FloatValue,
    pub consumption_kg_ha_day: FloatValue,
    /// 7-day average growth minus consumption
    pub net_change_kg_ha_day: FloatValue,
    pub animal_count: usize,
    pub moisture_fraction: FloatValue,
    pub temperature_factor: FloatValue,
    pub moisture_factor: FloatValue,
    pub season: Season,
    pub notes: Vec<GrowthNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub days: usize,
    pub total_growth_kg_ha: FloatValue,
    pub avg_growth_kg_ha_day: FloatValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmGrowthAggregator {
    model: DailyGrowthModel,
}

impl FarmGrowthAggregator {
    pub fn new() -> Self {
        Self::from_parameters(GrowthParameters::default())
    }

    pub fn from_parameters(parameters: GrowthParameters) -> Self {
        Self {
            model: DailyGrowthModel::from_parameters(parameters),
        }
    }

    pub fn model(&self) -> &DailyGrowthModel {
        &self.model
    }

    /// Growth for one plot over the days of `range` that have weather.
    pub fn plot_growth(
        &self,
        range: &DateRange,
        soil: Option<&SoilProperties>,
        weather: &WeatherSeries,
    ) -> Vec<DailyGrowthResult> {
        let state = self.model.initial_state(soil);
        let (_, results) = self.model.run(state, weather.range(range), soil);
        results
    }

    /// Daily growth for every plot, keyed by plot name.
    pub fn calculate_farm_growth(
        &self,
        range: &DateRange,
        soils: &BTreeMap<String, Option<SoilProperties>>,
        weather: &WeatherSeries,
    ) -> BTreeMap<String, Vec<DailyGrowthResult>> {
        let missing = weather.missing_dates(range);
        if let (Some(first), Some(last)) = (missing.first(), missing.last()) {
            warn!(
                missing = missing.len(),
                first = %first,
                last = %last,
                "No weather for some dates; skipping them for all plots"
            );
        }

        let run_plot = |(name, soil): (&String, &Option<SoilProperties>)| {
            debug!(plot = %name, "Calculating growth");
            (name.clone(), self.plot_growth(range, soil.as_ref(), weather))
        };

        #[cfg(feature = "parallel")]
        let results = soils.par_iter().map(run_plot).collect();
        #[cfg(not(feature = "parallel"))]
        let results = soils.iter().map(run_plot).collect();

        results
    }

    /// Per-plot totals. Plots with no results are omitted.
    pub fn summarize_growth(
        results: &BTreeMap<String, Vec<DailyGrowthResult>>,
    ) -> BTreeMap<String, GrowthSummary> {
        results
            .iter()
            .filter_map(|(name, daily)| {
                let first = daily.first()?;
                let last = daily.last()?;
                let growth = daily.iter().map(|r| r.growth_kg_ha_day);
                let total = growth.clone().sum::<FloatValue>();
                Some((
                    name.clone(),
                    GrowthSummary {
                        days: daily.len(),
                        total_growth_kg_ha: total,
                        avg_growth_kg_ha_day: total / daily.len() as FloatValue,
                        min_growth_kg_ha_day: growth.clone().fold(FloatValue::INFINITY, FloatValue::min),
                        max_growth_kg_ha_day: growth.fold(FloatValue::NEG_INFINITY, FloatValue::max),
                        start_date: first.date,
                        end_date: last.date,
                    },
                ))
            })
            .collect()
    }

    /// Current growth per plot from the trailing results.
    ///
    /// `consumption` is matched to plots by paddock name; ungrazed plots have
    /// zero consumption.
    pub fn current_growth(
        results: &BTreeMap<String, Vec<DailyGrowthResult>>,
        consumption: &BTreeMap<String, PaddockConsumption>,
    ) -> BTreeMap<String, CurrentGrowth> {
        let by_name: BTreeMap<&str, &PaddockConsumption> = consumption
            .values()
            .map(|c| (c.paddock_name.as_str(), c))
            .collect();

        results
            .iter()
            .filter_map(|(name, daily)| {
                let latest = daily.last()?;
                let window = &daily[daily.len().saturating_sub(CURRENT_WINDOW_DAYS)..];
                let growth_7day_avg = window.iter().map(|r| r.growth_kg_ha_day).sum::<FloatValue>()
                    / window.len() as FloatValue;

                let grazing = by_name.get(name.as_str());
                let consumption_kg_ha_day = grazing.map_or(0.0, |c| c.intake_per_ha_kg_day);

                Some((
                    name.clone(),
                    CurrentGrowth {
                        date: latest.date,
                        growth_kg_ha_day: latest.growth_kg_ha_day,
                        growth_7day_avg,
                        consumption_kg_ha_day,
                        net_change_kg_ha_day: growth_7day_avg - consumption_kg_ha_day,
                        animal_count: grazing.map_or(0, |c| c.animal_count),
                        moisture_fraction: latest.moisture_fraction,
                        temperature_factor: latest.temperature_factor,
                        moisture_factor: latest.moisture_factor,
                        season: latest.season,
                        notes: latest.notes.clone(),
                    },
                ))
            })
            .collect()
    }

    /// Totals over a forecast period. Plots with no results are omitted.
    pub fn forecast_summary(
        results: &BTreeMap<String, Vec<DailyGrowthResult>>,
    ) -> BTreeMap<String, ForecastSummary> {
        Self::summarize_growth(results)
            .into_iter()
            .map(|(name, s)| {
                (
                    name,
                    ForecastSummary {
                        days: s.days,
                        total_growth_kg_ha: s.total_growth_kg_ha,
                        avg_growth_kg_ha_day: s.avg_growth_kg_ha_day,
                    },
                )
            })
            .collect()
    }

    /// Fresh state for a plot, as used at the start of every range.
    pub fn initial_state(&self, soil: Option<&SoilProperties>) -> SoilWaterState {
        self.model.initial_state(soil)
    }
}

/// Weighted mean of a satellite-derived and a modelled growth rate.
///
/// `satellite_weight` is clamped to [0, 1]. When only one value exists it is
/// returned unchanged.
pub fn blend_growth_rate(
    satellite: Option<FloatValue>,
    model: Option<FloatValue>,
    satellite_weight: FloatValue,
) -> Option<FloatValue> {
    match (satellite, model) {
        (Some(s), Some(m)) => {
            let w = satellite_weight.clamp(0.0, 1.0);
            Some(w * s + (1.0 - w) * m)
        }
        (Some(s), None) => Some(s),
        (None, m) => m,
    }
}

//! Farm pipeline
//!
//! Drives the models against the external collaborators: fetches weather,
//! soil, satellite and livestock data, runs the components, and shapes the
//! results into observations and reports.
//!
//! Weather and the paddock list are needed for every plot, so failures there
//! are returned. A failure fetching data for one plot is logged and that
//! plot is left out of the result.

use crate::config::PaddockConfig;
use chrono::{Datelike, Days, NaiveDate};
use paddock_components::carbon::{
    Bands, CarbonBalance, CarbonBalanceInputs, CarbonBalanceReport, CarbonProduction,
    DmiAdjustment, FarmCarbonTotals, PlotCarbon,
};
use paddock_components::farm::{
    blend_growth_rate, CurrentGrowth, FarmGrowthAggregator, GrowthHistory, GrowthSummary,
    HistoricalGrowthModel,
};
use paddock_components::livestock::factors::CattleType;
use paddock_components::livestock::{
    IntakeModel, LivestockEmissions, LivestockMethaneEstimate, PaddockConsumption, SheepSpec,
};
use paddock_components::pasture::compositing::composite_window;
use paddock_components::pasture::{
    BiomassModel, DailyGrowthResult, GrazingCorrection, GrowthRateEstimate, MossEstimate,
    MossModel,
};
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::livestock::Paddock;
use paddock_core::observation::{
    classify_observations, ClassifiedObservation, Observation, ObservationKind, SyncStatus,
};
use paddock_core::services::{
    FarmDataService, SoilPropertiesService, VegetationIndexService, WeatherService,
};
use paddock_core::soil::SoilProperties;
use paddock_core::timeseries::{DateRange, FloatValue, WeatherSeries};
use paddock_core::vegetation::VegetationReading;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// The collaborators a pipeline reads from and writes to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub weather: &'a dyn WeatherService,
    pub soil: &'a dyn SoilPropertiesService,
    pub vegetation: &'a dyn VegetationIndexService,
    pub farm: &'a dyn FarmDataService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherGrowth {
    pub results: BTreeMap<String, Vec<DailyGrowthResult>>,
    pub summaries: BTreeMap<String, GrowthSummary>,
}

/// Standing dry matter for a paddock after grazing and moss corrections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedOnOffer {
    pub plot: String,
    pub date: NaiveDate,
    /// unit: kg DM/ha
    pub raw_sdm_kg_ha: FloatValue,
    pub grazing_factor: FloatValue,
    pub moss: MossEstimate,
    /// unit: kg DM/ha
    pub sdm_kg_ha: FloatValue,
    pub model: String,
}

/// What to include in a carbon report beyond the paddock NDVI history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonScenario {
    pub cattle_count: u32,
    pub cattle_type: CattleType,
    pub sheep: SheepSpec,
    /// unit: t CO2/yr
    pub rotational_grazing_enhancement_t_co2: FloatValue,
    /// unit: t C/yr
    pub manure_c_to_soil_t_c: FloatValue,
    /// unit: t CO2/yr
    pub carbon_exports_t_co2: FloatValue,
    /// unit: t CO2eq/yr
    pub avoided_fertilizer_t_co2eq: FloatValue,
    /// unit: t CO2eq/yr
    pub n2o_t_co2eq: Option<FloatValue>,
    /// Weather used for the cold-weather intake adjustment, if any
    pub weather_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonReport {
    pub plots: Vec<PlotCarbon>,
    pub yearly_totals: BTreeMap<i32, FarmCarbonTotals>,
    pub methane: LivestockMethaneEstimate,
    pub balance: CarbonBalanceReport,
    pub intake_adjustment: Option<DmiAdjustment>,
    pub weather_adjusted: Option<CarbonBalanceReport>,
}

pub struct Pipeline<'a> {
    config: PaddockConfig,
    services: Services<'a>,
    aggregator: FarmGrowthAggregator,
    biomass: BiomassModel,
    grazing: GrazingCorrection,
    moss: MossModel,
    intake: IntakeModel,
    emissions: LivestockEmissions,
    production: CarbonProduction,
    balance: CarbonBalance,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PaddockConfig, services: Services<'a>) -> Self {
        Self {
            aggregator: FarmGrowthAggregator::from_parameters(config.growth.clone()),
            biomass: BiomassModel::from_parameters(config.biomass.clone()),
            grazing: GrazingCorrection::from_parameters(config.grazing.clone()),
            moss: MossModel::from_parameters(config.moss.clone()),
            intake: IntakeModel::from_parameters(config.intake.clone()),
            emissions: LivestockEmissions::from_parameters(config.emissions.clone()),
            production: CarbonProduction::from_parameters(config.production.clone())
                .with_curves(config.growth.curves.clone()),
            balance: CarbonBalance::from_parameters(config.balance.clone()),
            config,
            services,
        }
    }

    pub fn config(&self) -> &PaddockConfig {
        &self.config
    }

    pub fn weather(&self, range: &DateRange) -> PaddockResult<WeatherSeries> {
        Ok(self.services.weather.daily_weather(range)?.into_iter().collect())
    }

    /// Soil properties keyed by paddock name. Paddocks whose lookup fails
    /// are left out.
    fn soils(&self, paddocks: &[Paddock]) -> BTreeMap<String, Option<SoilProperties>> {
        paddocks
            .iter()
            .filter_map(|p| match self.services.soil.soil_properties(&p.name) {
                Ok(soil) => Some((p.name.clone(), soil)),
                Err(e) => {
                    warn!(plot = %p.name, error = %e, "Soil lookup failed; skipping plot");
                    None
                }
            })
            .collect()
    }

    fn paddock(&self, plot: &str) -> PaddockResult<Paddock> {
        self.services
            .farm
            .paddocks()?
            .into_iter()
            .find(|p| p.name == plot || p.id == plot)
            .ok_or_else(|| PaddockError::UnknownPlot(plot.to_string()))
    }

    /// Weather-driven daily growth for every paddock over `range`.
    pub fn weather_growth(&self, range: &DateRange) -> PaddockResult<WeatherGrowth> {
        let paddocks = self.services.farm.paddocks()?;
        let weather = self.weather(range)?;
        let soils = self.soils(&paddocks);

        let results = self.aggregator.calculate_farm_growth(range, &soils, &weather);
        let summaries = FarmGrowthAggregator::summarize_growth(&results);
        info!(plots = results.len(), days = range.len(), "Calculated weather growth");
        Ok(WeatherGrowth { results, summaries })
    }

    /// Latest growth against current grazing pressure, per paddock name.
    pub fn current_growth(&self, range: &DateRange) -> PaddockResult<BTreeMap<String, CurrentGrowth>> {
        let growth = self.weather_growth(range)?;
        let consumption = self.consumption(range.end)?;
        Ok(FarmGrowthAggregator::current_growth(&growth.results, &consumption))
    }

    /// Grazing consumption keyed by paddock id.
    pub fn consumption(&self, date: NaiveDate) -> PaddockResult<BTreeMap<String, PaddockConsumption>> {
        let paddocks = self.services.farm.paddocks()?;
        let animals = self.services.farm.animals()?;
        Ok(self.intake.paddock_consumption(&animals, &paddocks, date))
    }

    /// Growth from satellite composites over two windows.
    ///
    /// `None` when either window has no usable composite.
    pub fn satellite_growth(
        &self,
        plot: &str,
        now: &DateRange,
        prev: &DateRange,
    ) -> PaddockResult<Option<GrowthRateEstimate>> {
        let vegetation = self.services.vegetation;
        let (Some(now), Some(prev)) = (vegetation.ndvi(plot, now)?, vegetation.ndvi(plot, prev)?) else {
            debug!(plot, "No composite for one of the windows");
            return Ok(None);
        };
        self.biomass.growth_between_readings(&now, &prev).map(Some)
    }

    /// Standing dry matter from a composite, corrected for grazing and moss.
    pub fn feed_on_offer(
        &self,
        plot: &str,
        reading: &VegetationReading,
        pressure_kg_ha_day: FloatValue,
        days_since_rest: Option<u32>,
    ) -> PaddockResult<FeedOnOffer> {
        let history = self.services.vegetation.ndvi_history(plot)?;
        let soil = self.services.soil.soil_properties(plot)?;
        let date = reading.date_range.end;

        let sdm = self.biomass.ndvi_to_standing_dry_matter(
            reading.clamped_ndvi(),
            Some(date.month()),
            None,
        );
        let (grazed, grazing_factor) =
            self.grazing
                .adjust_foo_for_grazing(sdm.sdm_kg_ha, pressure_kg_ha_day, days_since_rest);
        let moss = self.moss.estimate(plot, &history, soil.as_ref());

        Ok(FeedOnOffer {
            plot: plot.to_string(),
            date,
            raw_sdm_kg_ha: sdm.sdm_kg_ha,
            grazing_factor,
            sdm_kg_ha: grazed * moss.correction_factor,
            moss,
            model: sdm.model,
        })
    }

    /// Growth-rate and standing-dry-matter observations for the last modelled
    /// day of each paddock, classified against what the farm already holds.
    ///
    /// The growth rate blends the weather model with the satellite rate when
    /// both composites are available.
    pub fn growth_observations(&self, range: &DateRange) -> PaddockResult<Vec<ClassifiedObservation>> {
        let paddocks = self.services.farm.paddocks()?;
        let growth = self.weather_growth(range)?;
        let consumption = self.consumption(range.end)?;
        let settings = &self.config.farm;

        let mut observations = Vec::new();
        for paddock in &paddocks {
            let Some(latest) = growth.results.get(&paddock.name).and_then(|r| r.last()) else {
                continue;
            };

            let now = composite_window(latest.date);
            let prev = match now.start.checked_sub_days(Days::new(1)) {
                Some(end) => composite_window(end),
                None => continue,
            };

            let satellite = match self.satellite_growth(&paddock.name, &now, &prev) {
                Ok(estimate) => estimate.map(|e| e.growth_kg_ha_day),
                Err(e) => {
                    warn!(plot = %paddock.name, error = %e, "Satellite growth failed; using model only");
                    None
                }
            };
            if let Some(rate) =
                blend_growth_rate(satellite, Some(latest.growth_kg_ha_day), settings.satellite_weight)
            {
                observations.push(Observation {
                    plot_id: paddock.id.clone(),
                    date: latest.date,
                    kind: ObservationKind::GrowthRate,
                    value: rate,
                });
            }

            let pressure = consumption.get(&paddock.id).map_or(0.0, |c| c.intake_per_ha_kg_day);
            let foo = self
                .services
                .vegetation
                .ndvi(&paddock.name, &now)
                .and_then(|reading| {
                    reading
                        .map(|r| self.feed_on_offer(&paddock.name, &r, pressure, None))
                        .transpose()
                });
            match foo {
                Ok(Some(foo)) => observations.push(Observation {
                    plot_id: paddock.id.clone(),
                    date: latest.date,
                    kind: ObservationKind::StandingDryMatter,
                    value: foo.sdm_kg_ha,
                }),
                Ok(None) => {}
                Err(e) => warn!(plot = %paddock.name, error = %e, "Feed on offer failed; skipping"),
            }
        }

        let ids: Vec<String> = paddocks.iter().map(|p| p.id.clone()).collect();
        let existing = self.services.farm.existing_observations(&ids)?;
        Ok(classify_observations(&observations, &existing, settings.observation_tolerance))
    }

    /// Push the new and changed observations, returning how many were
    /// accepted.
    pub fn push_changed(&self, classified: &[ClassifiedObservation]) -> PaddockResult<usize> {
        let changed: Vec<Observation> = classified
            .iter()
            .filter(|c| c.status != SyncStatus::Unchanged)
            .map(|c| c.observation.clone())
            .collect();
        if changed.is_empty() {
            return Ok(0);
        }
        let accepted = self.services.farm.push_observations(&changed)?;
        info!(sent = changed.len(), accepted, "Pushed observations");
        Ok(accepted)
    }

    /// Long-run modelled growth from weather alone.
    pub fn growth_history(&self, range: &DateRange) -> PaddockResult<GrowthHistory> {
        let model = HistoricalGrowthModel::from_parameters(
            self.config.growth.clone(),
            self.config.farm.default_awc_mm,
        );
        Ok(model.calculate_historical_growth(&self.weather(range)?))
    }

    /// Per-year carbon for one paddock from its NDVI history.
    pub fn plot_carbon(&self, plot: &str) -> PaddockResult<PlotCarbon> {
        self.paddock_carbon(&self.paddock(plot)?)
    }

    fn paddock_carbon(&self, paddock: &Paddock) -> PaddockResult<PlotCarbon> {
        let history = self.services.vegetation.ndvi_history(&paddock.name)?;
        let settings = &self.config.farm;
        Ok(PlotCarbon {
            plot: paddock.name.clone(),
            area_ha: paddock.area_ha,
            years: self
                .production
                .analyse_history(&history, settings.latitude, settings.management)?,
        })
    }

    /// The farm carbon balance.
    ///
    /// Pasture sequestration bands are the lowest, mean and highest yearly
    /// farm totals across the NDVI history.
    pub fn carbon_report(&self, scenario: &CarbonScenario) -> PaddockResult<CarbonReport> {
        let paddocks = self.services.farm.paddocks()?;
        let plots: Vec<PlotCarbon> = paddocks
            .iter()
            .filter_map(|p| match self.paddock_carbon(p) {
                Ok(plot) => Some(plot),
                Err(e) => {
                    warn!(plot = %p.name, error = %e, "Carbon history failed; skipping plot");
                    None
                }
            })
            .collect();
        let yearly_totals = CarbonProduction::farm_totals(&plots);

        let methane = self.emissions.estimate_livestock_methane(
            scenario.cattle_count,
            &scenario.cattle_type,
            &scenario.sheep,
        );

        let inputs = CarbonBalanceInputs {
            pasture_sequestration_t_co2: sequestration_bands(&yearly_totals),
            rotational_grazing_enhancement_t_co2: scenario.rotational_grazing_enhancement_t_co2,
            manure_c_to_soil_t_c: scenario.manure_c_to_soil_t_c,
            methane_t_c: CarbonBalanceInputs::methane_t_c_from_ch4_kg(methane.total_ch4_kg),
            carbon_exports_t_co2: scenario.carbon_exports_t_co2,
            avoided_fertilizer_t_co2eq: scenario.avoided_fertilizer_t_co2eq,
            n2o_t_co2eq: scenario.n2o_t_co2eq,
        };
        let balance = self.balance.report(&inputs);

        let intake_adjustment = match &scenario.weather_range {
            Some(range) => Some(self.balance.dmi_adjustment(&self.weather(range)?)?),
            None => None,
        };
        let weather_adjusted = intake_adjustment
            .as_ref()
            .map(|adjustment| self.balance.weather_adjusted(&inputs, adjustment));

        Ok(CarbonReport {
            plots,
            yearly_totals,
            methane,
            balance,
            intake_adjustment,
            weather_adjusted,
        })
    }
}

fn sequestration_bands(totals: &BTreeMap<i32, FarmCarbonTotals>) -> Bands {
    let values: Vec<FloatValue> = totals.values().map(|t| t.sequestration_t_co2).collect();
    if values.is_empty() {
        return Bands::default();
    }
    Bands::new(
        values.iter().copied().fold(FloatValue::INFINITY, FloatValue::min),
        values.iter().sum::<FloatValue>() / values.len() as FloatValue,
        values.iter().copied().fold(FloatValue::NEG_INFINITY, FloatValue::max),
    )
}

//! End-to-end pipeline tests against in-memory collaborators.

use approx::assert_relative_eq;
use chrono::{Datelike, Days, NaiveDate};
use is_close::is_close;
use paddock_components::carbon::Band;
use paddock_components::livestock::factors::CattleType;
use paddock_components::livestock::SheepSpec;
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::livestock::{AgeClass, AnimalRecord, Paddock};
use paddock_core::observation::{Observation, ObservationKind, SyncStatus};
use paddock_core::services::{
    FarmDataService, SoilPropertiesService, VegetationIndexService, WeatherService,
};
use paddock_core::soil::{DrainageClass, SoilProperties};
use paddock_core::timeseries::{DateRange, WeatherDay};
use paddock_core::vegetation::{MonthlyNdvi, VegetationReading};
use paddock::{CarbonScenario, PaddockConfig, Pipeline, Services};
use std::cell::RefCell;

const SOLSTICE_FIELD_NDVI: [f64; 12] = [
    0.364, 0.312, 0.356, 0.695, 0.485, 0.370, 0.160, 0.122, 0.138, 0.449, 0.198, 0.30,
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn spring_2024() -> DateRange {
    DateRange::new(date(2024, 4, 1), date(2024, 6, 30))
}

struct MockWeather {
    days: Vec<WeatherDay>,
}

impl MockWeather {
    fn new() -> Self {
        let start = date(2023, 1, 1);
        let days = (0..730)
            .map(|i| {
                let day = start + Days::new(i);
                let temp = 10.0 + 7.0 * ((day.ordinal() as f64 - 110.0) / 58.0).sin();
                WeatherDay {
                    date: day,
                    temp_mean_c: temp,
                    temp_max_c: temp + 5.0,
                    temp_min_c: temp - 5.0,
                    precip_mm: if i % 4 == 0 { 8.0 } else { 0.0 },
                    et0_mm: 2.5,
                }
            })
            .collect();
        Self { days }
    }
}

impl WeatherService for MockWeather {
    fn daily_weather(&self, range: &DateRange) -> PaddockResult<Vec<WeatherDay>> {
        if range.start.year() < 2000 {
            return Err(PaddockError::service("weather", "archive unavailable"));
        }
        Ok(self.days.iter().filter(|d| range.contains(d.date)).copied().collect())
    }
}

struct MockSoil;

impl SoilPropertiesService for MockSoil {
    fn soil_properties(&self, plot: &str) -> PaddockResult<Option<SoilProperties>> {
        match plot {
            "Solstice Field" => Ok(Some(SoilProperties {
                drainage: Some(DrainageClass::Poorly),
                awc_cm_per_cm: Some(0.18),
                organic_matter_pct: Some(8.0),
                hydrologic_group: None,
            })),
            "Orchard" => Err(PaddockError::service("soil survey", "timeout")),
            _ => Ok(None),
        }
    }
}

struct MockVegetation;

impl VegetationIndexService for MockVegetation {
    fn ndvi(&self, plot: &str, range: &DateRange) -> PaddockResult<Option<VegetationReading>> {
        if plot != "Solstice Field" {
            return Ok(None);
        }
        Ok(Some(VegetationReading {
            plot_id: plot.to_string(),
            ndvi_mean: 0.1 + range.end.day() as f64 / 200.0,
            ndvi_stddev: Some(0.04),
            date_range: *range,
            pixel_count: 150,
        }))
    }

    fn ndvi_history(&self, plot: &str) -> PaddockResult<Vec<MonthlyNdvi>> {
        if plot != "Solstice Field" {
            return Err(PaddockError::service("satellite", "quota exceeded"));
        }
        Ok([2022, 2023]
            .into_iter()
            .flat_map(|year| {
                SOLSTICE_FIELD_NDVI
                    .iter()
                    .enumerate()
                    .map(move |(i, ndvi)| MonthlyNdvi {
                        year,
                        month: i as u32 + 1,
                        ndvi_mean: Some(*ndvi),
                    })
            })
            .collect())
    }
}

struct MockFarm {
    held: RefCell<Vec<Observation>>,
}

impl MockFarm {
    fn new() -> Self {
        Self {
            held: RefCell::new(Vec::new()),
        }
    }
}

impl FarmDataService for MockFarm {
    fn paddocks(&self) -> PaddockResult<Vec<Paddock>> {
        Ok(vec![
            Paddock { id: "p1".into(), name: "Solstice Field".into(), area_ha: 4.0 },
            Paddock { id: "p2".into(), name: "Hay Field".into(), area_ha: 6.0 },
            Paddock { id: "p3".into(), name: "Orchard".into(), area_ha: 1.0 },
        ])
    }

    fn animals(&self) -> PaddockResult<Vec<AnimalRecord>> {
        Ok((0..10)
            .map(|i| AnimalRecord {
                id: format!("ewe-{i}"),
                name: None,
                age_class: AgeClass::Ewe,
                on_farm: true,
                paddock_id: Some("p1".into()),
                weight_kg: Some(70.0),
                dam_id: None,
                birth_date: None,
                wean_date: None,
            })
            .collect())
    }

    fn existing_observations(&self, plots: &[String]) -> PaddockResult<Vec<Observation>> {
        Ok(self
            .held
            .borrow()
            .iter()
            .filter(|o| plots.contains(&o.plot_id))
            .cloned()
            .collect())
    }

    fn push_observations(&self, observations: &[Observation]) -> PaddockResult<usize> {
        self.held.borrow_mut().extend_from_slice(observations);
        Ok(observations.len())
    }
}

struct Fixture {
    weather: MockWeather,
    soil: MockSoil,
    vegetation: MockVegetation,
    farm: MockFarm,
}

impl Fixture {
    fn new() -> Self {
        Self {
            weather: MockWeather::new(),
            soil: MockSoil,
            vegetation: MockVegetation,
            farm: MockFarm::new(),
        }
    }

    fn pipeline(&self, config: PaddockConfig) -> Pipeline<'_> {
        Pipeline::new(
            config,
            Services {
                weather: &self.weather,
                soil: &self.soil,
                vegetation: &self.vegetation,
                farm: &self.farm,
            },
        )
    }
}

fn scenario() -> CarbonScenario {
    CarbonScenario {
        cattle_count: 0,
        cattle_type: CattleType::Beef,
        sheep: SheepSpec::HeadCount(100),
        rotational_grazing_enhancement_t_co2: 5.0,
        manure_c_to_soil_t_c: 1.2,
        carbon_exports_t_co2: 3.0,
        avoided_fertilizer_t_co2eq: 0.5,
        n2o_t_co2eq: Some(0.8),
        weather_range: None,
    }
}

mod growth {
    use super::*;

    #[test]
    fn test_weather_growth_skips_failed_soil_lookup() {
        let fixture = Fixture::new();
        let growth = fixture
            .pipeline(PaddockConfig::default())
            .weather_growth(&spring_2024())
            .unwrap();

        assert_eq!(growth.results.len(), 2);
        assert!(!growth.results.contains_key("Orchard"));
        assert_eq!(growth.summaries["Hay Field"].days, 91);
        assert_eq!(growth.summaries["Solstice Field"].end_date, date(2024, 6, 30));
    }

    #[test]
    fn test_weather_failure_is_returned() {
        let fixture = Fixture::new();
        let range = DateRange::new(date(1990, 1, 1), date(1990, 1, 31));
        let result = fixture.pipeline(PaddockConfig::default()).weather_growth(&range);
        assert!(matches!(result, Err(PaddockError::Service { .. })));
    }

    #[test]
    fn test_current_growth_includes_grazing() {
        let fixture = Fixture::new();
        let current = fixture
            .pipeline(PaddockConfig::default())
            .current_growth(&spring_2024())
            .unwrap();

        let solstice = &current["Solstice Field"];
        assert_eq!(solstice.animal_count, 10);
        assert!(solstice.consumption_kg_ha_day > 0.0);
        assert!(is_close!(
            solstice.net_change_kg_ha_day,
            solstice.growth_7day_avg - solstice.consumption_kg_ha_day
        ));
        assert_eq!(current["Hay Field"].animal_count, 0);
    }

    #[test]
    fn test_growth_history_covers_weather() {
        let fixture = Fixture::new();
        let range = DateRange::new(date(2023, 1, 1), date(2024, 12, 30));
        let history = fixture
            .pipeline(PaddockConfig::default())
            .growth_history(&range)
            .unwrap();
        assert_eq!(history.days().len(), 730);
        assert_eq!(history.monthly_stats().len(), 12);
    }
}

mod satellite {
    use super::*;

    #[test]
    fn test_satellite_growth_needs_both_composites() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(PaddockConfig::default());
        let now = DateRange::new(date(2024, 6, 10), date(2024, 6, 30));
        let prev = DateRange::new(date(2024, 5, 20), date(2024, 6, 9));

        let solstice = pipeline.satellite_growth("Solstice Field", &now, &prev).unwrap();
        let estimate = solstice.expect("both composites exist");
        assert_eq!(estimate.days_between, 21);
        // 0.145 -> 0.25 on the summer curve, both below its cap
        assert!(estimate.sdm_now_kg_ha < 3000.0);
        assert!(estimate.growth_kg_ha_day > 0.0);

        assert!(pipeline.satellite_growth("Hay Field", &now, &prev).unwrap().is_none());
    }

    #[test]
    fn test_feed_on_offer_applies_both_corrections() {
        let fixture = Fixture::new();
        let mut config = PaddockConfig::default();
        config.moss.overrides.insert("Solstice Field".to_string(), 0.18);
        let pipeline = fixture.pipeline(config);

        let reading = fixture
            .vegetation
            .ndvi("Solstice Field", &DateRange::new(date(2024, 5, 1), date(2024, 5, 20)))
            .unwrap()
            .unwrap();
        let foo = pipeline
            .feed_on_offer("Solstice Field", &reading, 94.0, None)
            .unwrap();

        assert_relative_eq!(foo.grazing_factor, 0.48, epsilon = 0.01);
        assert!(is_close!(foo.moss.correction_factor, 0.82));
        assert!(is_close!(
            foo.sdm_kg_ha,
            foo.raw_sdm_kg_ha * foo.grazing_factor * 0.82
        ));
        assert_eq!(foo.model, "PNW Spring");
    }
}

mod observations {
    use super::*;

    #[test]
    fn test_observations_are_built_and_deduplicated() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(PaddockConfig::default());

        let first = pipeline.growth_observations(&spring_2024()).unwrap();
        let kinds: Vec<_> = first
            .iter()
            .map(|c| (c.observation.plot_id.as_str(), c.observation.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("p1", ObservationKind::GrowthRate),
                ("p1", ObservationKind::StandingDryMatter),
                ("p2", ObservationKind::GrowthRate),
            ]
        );
        assert!(first.iter().all(|c| c.status == SyncStatus::New));
        assert!(first.iter().all(|c| c.observation.date == date(2024, 6, 30)));
        assert_eq!(pipeline.push_changed(&first).unwrap(), 3);

        let second = pipeline.growth_observations(&spring_2024()).unwrap();
        assert!(second.iter().all(|c| c.status == SyncStatus::Unchanged));
        assert_eq!(pipeline.push_changed(&second).unwrap(), 0);
        assert_eq!(fixture.farm.held.borrow().len(), 3);
    }
}

mod carbon {
    use super::*;

    #[test]
    fn test_carbon_report_skips_failed_history() {
        let fixture = Fixture::new();
        let report = fixture
            .pipeline(PaddockConfig::default())
            .carbon_report(&scenario())
            .unwrap();

        assert_eq!(report.plots.len(), 1);
        assert_eq!(report.plots[0].plot, "Solstice Field");
        assert_eq!(report.yearly_totals.len(), 2);
        assert!(is_close!(report.yearly_totals[&2023].area_ha, 4.0));
        assert!(report.weather_adjusted.is_none());
    }

    #[test]
    fn test_plot_carbon_lookup() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(PaddockConfig::default());

        let by_id = pipeline.plot_carbon("p1").unwrap();
        assert_eq!(by_id.plot, "Solstice Field");
        assert_eq!(by_id.years.len(), 2);
        assert!(matches!(
            pipeline.plot_carbon("Back Forty"),
            Err(PaddockError::UnknownPlot(_))
        ));
    }

    #[test]
    fn test_carbon_report_balance() {
        let fixture = Fixture::new();
        let report = fixture
            .pipeline(PaddockConfig::default())
            .carbon_report(&scenario())
            .unwrap();

        let b = &report.balance;
        // Both years have identical NDVI, so the bands collapse
        assert!(is_close!(b.pasture_sequestration_t_co2.low, b.pasture_sequestration_t_co2.high));
        assert!(is_close!(
            b.pasture_sequestration_t_co2.mid,
            report.yearly_totals[&2023].sequestration_t_co2
        ));
        assert!(is_close!(b.livestock_methane_t_co2eq, report.methane.total_co2eq_t()));
        let expected = b.pasture_sequestration_t_co2.mid + 5.0 + b.manure_c_to_soil_t_co2
            - b.livestock_methane_t_co2eq
            - 3.0
            + 0.5;
        assert_relative_eq!(b.net(Band::Mid), expected, epsilon = 1e-9);
        assert_eq!(report.methane.sheep_count, 100);
    }

    #[test]
    fn test_weather_adjusted_report() {
        let fixture = Fixture::new();
        let mut scenario = scenario();
        scenario.weather_range = Some(DateRange::new(date(2023, 1, 1), date(2024, 12, 30)));
        let report = fixture
            .pipeline(PaddockConfig::default())
            .carbon_report(&scenario)
            .unwrap();

        let adjustment = report.intake_adjustment.as_ref().unwrap();
        assert_eq!(adjustment.by_year.len(), 2);
        assert!(adjustment.average_multiplier > 1.0);

        let adjusted = report.weather_adjusted.as_ref().unwrap();
        assert!(adjusted.livestock_methane_t_co2eq > report.balance.livestock_methane_t_co2eq);
        assert!(adjusted.manure_c_to_soil_t_co2 > report.balance.manure_c_to_soil_t_co2);
        assert_eq!(report.balance.dmi_multiplier, 1.0);
    }
}

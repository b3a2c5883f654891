//! Farm Carbon Balance
//!
//! Sums the independently estimated carbon flows of a farm into a net
//! balance, once for each pasture-sequestration band.
//!
//! # What This Component Does
//!
//! $$net = S_{pasture} + S_{rotational} + M_{soil} - CH_4 - E + F_{avoided}$$
//!
//! All terms are in t CO2(eq)/yr. Sequestration, enhancement, manure carbon
//! and avoided fertiliser are credits; methane and exports are debits. N2O
//! is carried on the report but never enters the net.
//!
//! # Weather adjustment
//!
//! Sheep eat more in cold weather. Each year's cold-day fraction $f$ (mean
//! temperature below 12.8 °C) gives a dry-matter intake multiplier
//!
//! $$m = (1 - f) + 1.12 f$$
//!
//! and the multiplier averaged over years scales both manure carbon and
//! methane carbon. The adjusted balance is a new report; the base report is
//! untouched.
//!
//! # Reference
//!
//! - NRC (2007) Nutrient Requirements of Small Ruminants.
//! - IPCC AR5 GWP100 for CH4 (28).

use crate::constants::{CH4_PER_C, CO2_PER_C, KG_PER_TONNE};
use crate::parameters::CarbonBalanceParameters;
use chrono::Datelike;
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::timeseries::{FloatValue, WeatherSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Mid,
    High,
}

/// A value estimated at low, mid and high sequestration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub low: FloatValue,
    pub mid: FloatValue,
    pub high: FloatValue,
}

impl Bands {
    pub fn new(low: FloatValue, mid: FloatValue, high: FloatValue) -> Self {
        Self { low, mid, high }
    }

    pub fn uniform(value: FloatValue) -> Self {
        Self::new(value, value, value)
    }

    pub fn get(&self, band: Band) -> FloatValue {
        match band {
            Band::Low => self.low,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }

    pub fn map(self, f: impl Fn(FloatValue) -> FloatValue) -> Self {
        Self::new(f(self.low), f(self.mid), f(self.high))
    }
}

/// Upstream estimates feeding the balance.
///
/// Manure and methane are carried as carbon so that intake adjustments can
/// scale them before conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonBalanceInputs {
    /// unit: t CO2/yr
    pub pasture_sequestration_t_co2: Bands,
    /// unit: t CO2/yr
    pub rotational_grazing_enhancement_t_co2: FloatValue,
    /// Manure carbon retained as soil organic matter
    /// unit: t C/yr
    pub manure_c_to_soil_t_c: FloatValue,
    /// Carbon emitted as enteric and manure methane
    /// unit: t C/yr
    pub methane_t_c: FloatValue,
    /// Hay, wool and animals leaving the farm, as a positive quantity
    /// unit: t CO2/yr
    pub carbon_exports_t_co2: FloatValue,
    /// unit: t CO2eq/yr
    pub avoided_fertilizer_t_co2eq: FloatValue,
    /// unit: t CO2eq/yr
    pub n2o_t_co2eq: Option<FloatValue>,
}

impl CarbonBalanceInputs {
    /// Methane carbon (t C) from a methane mass in kg.
    pub fn methane_t_c_from_ch4_kg(ch4_kg: FloatValue) -> FloatValue {
        ch4_kg / KG_PER_TONNE / CH4_PER_C
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonBalanceReport {
    pub pasture_sequestration_t_co2: Bands,
    pub rotational_grazing_enhancement_t_co2: FloatValue,
    pub manure_c_to_soil_t_co2: FloatValue,
    /// Reported as a positive emission
    pub livestock_methane_t_co2eq: FloatValue,
    pub carbon_exports_t_co2: FloatValue,
    pub avoided_fertilizer_t_co2eq: FloatValue,
    /// Not included in `net_t_co2`
    pub n2o_t_co2eq: Option<FloatValue>,
    pub net_t_co2: Bands,
    /// 1.0 for a report without weather adjustment
    pub dmi_multiplier: FloatValue,
    pub inputs: CarbonBalanceInputs,
}

impl CarbonBalanceReport {
    pub fn net(&self, band: Band) -> FloatValue {
        self.net_t_co2.get(band)
    }

    /// Whether the mid estimate is a net sink.
    pub fn is_carbon_positive(&self) -> bool {
        self.net_t_co2.mid > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyWeatherStats {
    pub year: i32,
    pub days: usize,
    pub cold_days: usize,
    pub freeze_days: usize,
    pub growing_degree_days: FloatValue,
    pub precip_mm: FloatValue,
    pub et0_mm: FloatValue,
    pub avg_temp_c: FloatValue,
}

impl YearlyWeatherStats {
    pub fn cold_fraction(&self) -> FloatValue {
        if self.days == 0 {
            0.0
        } else {
            self.cold_days as FloatValue / self.days as FloatValue
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyDmi {
    pub year: i32,
    pub cold_days: usize,
    pub cold_fraction: FloatValue,
    pub dmi_multiplier: FloatValue,
    pub adjusted_dmi_kg_day: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmiAdjustment {
    pub by_year: Vec<YearlyDmi>,
    pub average_multiplier: FloatValue,
    pub average_cold_days: FloatValue,
    pub base_dmi_kg_day: FloatValue,
    pub adjusted_dmi_kg_day: FloatValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarbonBalance {
    parameters: CarbonBalanceParameters,
}

impl CarbonBalance {
    pub fn new() -> Self {
        Self::from_parameters(CarbonBalanceParameters::default())
    }

    pub fn from_parameters(parameters: CarbonBalanceParameters) -> Self {
        Self { parameters }
    }

    /// Balance with every flow at its unadjusted value.
    pub fn report(&self, inputs: &CarbonBalanceInputs) -> CarbonBalanceReport {
        self.build_report(inputs, 1.0)
    }

    /// A new report with manure and methane carbon scaled by the intake
    /// multiplier.
    pub fn weather_adjusted(
        &self,
        inputs: &CarbonBalanceInputs,
        adjustment: &DmiAdjustment,
    ) -> CarbonBalanceReport {
        self.build_report(inputs, adjustment.average_multiplier)
    }

    fn build_report(&self, inputs: &CarbonBalanceInputs, dmi_multiplier: FloatValue) -> CarbonBalanceReport {
        let manure_c_to_soil_t_co2 = inputs.manure_c_to_soil_t_c * dmi_multiplier * CO2_PER_C;
        let livestock_methane_t_co2eq =
            inputs.methane_t_c * dmi_multiplier * CH4_PER_C * self.parameters.ch4_gwp;

        CarbonBalanceReport {
            pasture_sequestration_t_co2: inputs.pasture_sequestration_t_co2,
            rotational_grazing_enhancement_t_co2: inputs.rotational_grazing_enhancement_t_co2,
            manure_c_to_soil_t_co2,
            livestock_methane_t_co2eq,
            carbon_exports_t_co2: inputs.carbon_exports_t_co2,
            avoided_fertilizer_t_co2eq: inputs.avoided_fertilizer_t_co2eq,
            n2o_t_co2eq: inputs.n2o_t_co2eq,
            net_t_co2: inputs.pasture_sequestration_t_co2.map(|s| {
                s + inputs.rotational_grazing_enhancement_t_co2 + manure_c_to_soil_t_co2
                    - livestock_methane_t_co2eq
                    - inputs.carbon_exports_t_co2
                    + inputs.avoided_fertilizer_t_co2eq
            }),
            dmi_multiplier,
            inputs: inputs.clone(),
        }
    }

    /// Per-year weather statistics, in year order.
    pub fn yearly_weather_stats(&self, weather: &WeatherSeries) -> Vec<YearlyWeatherStats> {
        let p = &self.parameters.weather;
        let mut years: BTreeMap<i32, YearlyWeatherStats> = BTreeMap::new();
        let mut temp_sums: BTreeMap<i32, FloatValue> = BTreeMap::new();

        for day in weather.iter() {
            let year = day.date.year();
            let stats = years.entry(year).or_insert(YearlyWeatherStats {
                year,
                days: 0,
                cold_days: 0,
                freeze_days: 0,
                growing_degree_days: 0.0,
                precip_mm: 0.0,
                et0_mm: 0.0,
                avg_temp_c: 0.0,
            });
            stats.days += 1;
            stats.precip_mm += day.precip_mm;
            stats.et0_mm += day.et0_mm;
            *temp_sums.entry(year).or_default() += day.temp_mean_c;

            if day.temp_mean_c < p.cold_threshold_c {
                stats.cold_days += 1;
            }
            if day.temp_min_c < p.freeze_threshold_c {
                stats.freeze_days += 1;
            }
            if day.temp_mean_c > p.gdd_base_c {
                stats.growing_degree_days += day.temp_mean_c - p.gdd_base_c;
            }
        }

        years
            .into_values()
            .map(|mut stats| {
                stats.avg_temp_c = temp_sums[&stats.year] / stats.days as FloatValue;
                stats
            })
            .collect()
    }

    /// Intake multiplier averaged over the years in `weather`.
    pub fn dmi_adjustment(&self, weather: &WeatherSeries) -> PaddockResult<DmiAdjustment> {
        let p = &self.parameters.weather;
        let stats = self.yearly_weather_stats(weather);
        if stats.is_empty() {
            return Err(PaddockError::Error(
                "Cannot derive an intake adjustment from an empty weather series".to_string(),
            ));
        }

        let by_year: Vec<YearlyDmi> = stats
            .iter()
            .map(|s| {
                let f = s.cold_fraction();
                let dmi_multiplier = (1.0 - f) + p.cold_dmi_multiplier * f;
                YearlyDmi {
                    year: s.year,
                    cold_days: s.cold_days,
                    cold_fraction: f,
                    dmi_multiplier,
                    adjusted_dmi_kg_day: p.base_dmi_kg_day * dmi_multiplier,
                }
            })
            .collect();

        let n = by_year.len() as FloatValue;
        let average_multiplier = by_year.iter().map(|y| y.dmi_multiplier).sum::<FloatValue>() / n;
        let average_cold_days = by_year.iter().map(|y| y.cold_days as FloatValue).sum::<FloatValue>() / n;

        Ok(DmiAdjustment {
            by_year,
            average_multiplier,
            average_cold_days,
            base_dmi_kg_day: p.base_dmi_kg_day,
            adjusted_dmi_kg_day: p.base_dmi_kg_day * average_multiplier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use is_close::is_close;
    use paddock_core::timeseries::WeatherDay;

    fn example_inputs() -> CarbonBalanceInputs {
        CarbonBalanceInputs {
            pasture_sequestration_t_co2: Bands::new(20.0, 45.0, 80.0),
            rotational_grazing_enhancement_t_co2: 12.0,
            manure_c_to_soil_t_c: 3.0,
            methane_t_c: 1.5,
            carbon_exports_t_co2: 9.0,
            avoided_fertilizer_t_co2eq: 2.5,
            n2o_t_co2eq: Some(4.0),
        }
    }

    fn series(days: &[(i32, u32, u32, f64, f64)]) -> WeatherSeries {
        days.iter()
            .map(|(y, m, d, mean, min)| WeatherDay {
                date: NaiveDate::from_ymd_opt(*y, *m, *d).unwrap(),
                temp_mean_c: *mean,
                temp_max_c: mean + 5.0,
                temp_min_c: *min,
                precip_mm: 2.0,
                et0_mm: 1.0,
            })
            .collect()
    }

    // ===== Net Balance Tests =====

    #[test]
    fn test_net_identity_each_band() {
        let balance = CarbonBalance::new();
        let report = balance.report(&example_inputs());
        for band in [Band::Low, Band::Mid, Band::High] {
            let expected = report.pasture_sequestration_t_co2.get(band)
                + report.rotational_grazing_enhancement_t_co2
                + report.manure_c_to_soil_t_co2
                - report.livestock_methane_t_co2eq
                - report.carbon_exports_t_co2
                + report.avoided_fertilizer_t_co2eq;
            assert!(is_close!(report.net(band), expected));
        }
    }

    #[test]
    fn test_bands_differ_only_by_sequestration() {
        let report = CarbonBalance::new().report(&example_inputs());
        assert!(is_close!(report.net_t_co2.high - report.net_t_co2.low, 60.0));
        assert!(is_close!(report.net_t_co2.mid - report.net_t_co2.low, 25.0));
    }

    #[test]
    fn test_unit_conversions() {
        let report = CarbonBalance::new().report(&example_inputs());
        assert!(is_close!(report.manure_c_to_soil_t_co2, 3.0 * 44.0 / 12.0));
        assert!(is_close!(report.livestock_methane_t_co2eq, 1.5 * 16.0 / 12.0 * 28.0));
        assert_eq!(report.dmi_multiplier, 1.0);
    }

    #[test]
    fn test_n2o_does_not_enter_net() {
        let mut inputs = example_inputs();
        let with = CarbonBalance::new().report(&inputs);
        inputs.n2o_t_co2eq = None;
        let without = CarbonBalance::new().report(&inputs);
        assert_eq!(with.net_t_co2, without.net_t_co2);
        assert_eq!(with.n2o_t_co2eq, Some(4.0));
    }

    #[test]
    fn test_methane_carbon_from_ch4_mass() {
        // 1 t CH4 carries 0.75 t C
        assert!(is_close!(CarbonBalanceInputs::methane_t_c_from_ch4_kg(1000.0), 0.75));
    }

    // ===== Weather Adjustment Tests =====

    #[test]
    fn test_yearly_weather_stats() {
        let weather = series(&[
            (2023, 1, 1, 4.0, -2.0),
            (2023, 7, 1, 20.0, 12.0),
            (2024, 1, 1, 6.0, 1.0),
        ]);
        let stats = CarbonBalance::new().yearly_weather_stats(&weather);
        assert_eq!(stats.len(), 2);

        let y2023 = stats[0];
        assert_eq!(y2023.year, 2023);
        assert_eq!(y2023.days, 2);
        assert_eq!(y2023.cold_days, 1);
        assert_eq!(y2023.freeze_days, 1);
        assert!(is_close!(y2023.growing_degree_days, 15.0));
        assert!(is_close!(y2023.avg_temp_c, 12.0));
        assert!(is_close!(y2023.precip_mm, 4.0));
        assert!(is_close!(y2023.cold_fraction(), 0.5));
    }

    #[test]
    fn test_dmi_adjustment_averages_years() {
        let weather = series(&[
            (2023, 1, 1, 4.0, -2.0),
            (2023, 7, 1, 20.0, 12.0),
            (2024, 1, 1, 6.0, 1.0),
        ]);
        let adj = CarbonBalance::new().dmi_adjustment(&weather).unwrap();
        // 2023: half cold -> 1.06; 2024: all cold -> 1.12
        assert!(is_close!(adj.by_year[0].dmi_multiplier, 1.06));
        assert!(is_close!(adj.by_year[1].dmi_multiplier, 1.12));
        assert!(is_close!(adj.average_multiplier, 1.09));
        assert!(is_close!(adj.adjusted_dmi_kg_day, 1.41 * 1.09));
        assert!(is_close!(adj.average_cold_days, 1.0));
    }

    #[test]
    fn test_dmi_adjustment_needs_weather() {
        let result = CarbonBalance::new().dmi_adjustment(&WeatherSeries::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_weather_adjusted_report_is_new_value() {
        let balance = CarbonBalance::new();
        let inputs = example_inputs();
        let base = balance.report(&inputs);
        let weather = series(&[(2024, 1, 1, 4.0, -1.0), (2024, 1, 2, 5.0, 0.5)]);
        let adj = balance.dmi_adjustment(&weather).unwrap();
        let adjusted = balance.weather_adjusted(&inputs, &adj);

        assert!(is_close!(adjusted.dmi_multiplier, 1.12));
        assert!(is_close!(adjusted.manure_c_to_soil_t_co2, base.manure_c_to_soil_t_co2 * 1.12));
        assert!(is_close!(adjusted.livestock_methane_t_co2eq, base.livestock_methane_t_co2eq * 1.12));
        assert_eq!(adjusted.pasture_sequestration_t_co2, base.pasture_sequestration_t_co2);
        assert_eq!(base.dmi_multiplier, 1.0);
    }
}

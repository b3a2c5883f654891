//! Historical Growth
//!
//! Runs the growth model over the whole weather archive to build a
//! climatology of modelled growth: what a typical month looks like, how the
//! seasons compare and whether growth is trending across years.
//!
//! The archive is modelled as a single generic plot with a 45 mm store and
//! no soil data, so the climatology reflects weather alone.

use crate::parameters::GrowthParameters;
use crate::pasture::{DailyGrowthModel, SoilWaterState};
use chrono::{Datelike, NaiveDate};
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::season::{month_name, Season};
use paddock_core::timeseries::{FloatValue, WeatherSeries};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Years need this many days to count towards the trend.
const MIN_DAYS_FOR_TREND_YEAR: usize = 300;
const MIN_TREND_YEARS: usize = 3;
const TREND_SLOPE_THRESHOLD: FloatValue = 0.1;

/// One modelled day of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub date: NaiveDate,
    /// unit: kg DM/ha/day
    pub growth_kg_ha_day: FloatValue,
    pub temp_mean_c: FloatValue,
    pub precip_mm: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: u32,
    pub month_name: String,
    pub years_of_data: usize,
    pub avg_growth_kg_ha_day: FloatValue,
    pub min_growth_kg_ha_day: FloatValue,
    pub max_growth_kg_ha_day: FloatValue,
    /// Population standard deviation of daily growth
    pub std_dev: FloatValue,
    pub avg_temp_c: FloatValue,
    pub avg_precip_mm: FloatValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    WellAboveAverage,
    AboveAverage,
    Normal,
    BelowAverage,
    WellBelowAverage,
}

impl ComparisonStatus {
    pub fn from_z_score(z: FloatValue) -> Self {
        if z > 1.5 {
            ComparisonStatus::WellAboveAverage
        } else if z > 0.5 {
            ComparisonStatus::AboveAverage
        } else if z > -0.5 {
            ComparisonStatus::Normal
        } else if z > -1.5 {
            ComparisonStatus::BelowAverage
        } else {
            ComparisonStatus::WellBelowAverage
        }
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonStatus::WellAboveAverage => "well above average",
            ComparisonStatus::AboveAverage => "above average",
            ComparisonStatus::Normal => "normal",
            ComparisonStatus::BelowAverage => "below average",
            ComparisonStatus::WellBelowAverage => "well below average",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalComparison {
    pub month: u32,
    pub month_name: String,
    pub current_growth: FloatValue,
    pub historical_avg: FloatValue,
    pub historical_min: FloatValue,
    pub historical_max: FloatValue,
    pub deviation: FloatValue,
    /// 0 when the historical average is not positive
    pub deviation_pct: FloatValue,
    /// 0 when the historical spread is zero
    pub z_score: FloatValue,
    pub status: ComparisonStatus,
    pub years_of_data: usize,
}

impl HistoricalComparison {
    pub fn historical_range(&self) -> String {
        format!("{:.1}-{:.1}", self.historical_min, self.historical_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub avg_growth_kg_ha_day: FloatValue,
    pub days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Mean daily growth for each year with enough data
    pub yearly_averages: BTreeMap<i32, FloatValue>,
    pub trend: TrendDirection,
    /// unit: kg DM/ha/day per year
    pub slope_per_year: FloatValue,
    pub years_analyzed: usize,
}

/// Compare a growth rate with the climatology for its month.
pub fn compare_to_historical(
    current_growth: FloatValue,
    month: u32,
    monthly_stats: &BTreeMap<u32, MonthlyStats>,
) -> PaddockResult<HistoricalComparison> {
    let stats = monthly_stats
        .get(&month)
        .ok_or(PaddockError::MissingHistoricalData { month })?;

    let deviation = current_growth - stats.avg_growth_kg_ha_day;
    let deviation_pct = if stats.avg_growth_kg_ha_day > 0.0 {
        deviation / stats.avg_growth_kg_ha_day * 100.0
    } else {
        0.0
    };
    let z_score = if stats.std_dev > 0.0 {
        deviation / stats.std_dev
    } else {
        0.0
    };

    Ok(HistoricalComparison {
        month,
        month_name: stats.month_name.clone(),
        current_growth,
        historical_avg: stats.avg_growth_kg_ha_day,
        historical_min: stats.min_growth_kg_ha_day,
        historical_max: stats.max_growth_kg_ha_day,
        deviation,
        deviation_pct,
        z_score,
        status: ComparisonStatus::from_z_score(z_score),
        years_of_data: stats.years_of_data,
    })
}

fn mean(values: &[FloatValue]) -> FloatValue {
    values.iter().sum::<FloatValue>() / values.len() as FloatValue
}

/// Modelled growth for every day of the archive, in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthHistory {
    days: Vec<HistoricalDay>,
}

impl GrowthHistory {
    pub fn days(&self) -> &[HistoricalDay] {
        &self.days
    }

    pub fn growth_on(&self, date: NaiveDate) -> Option<FloatValue> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| self.days[i].growth_kg_ha_day)
    }

    /// Climatology per calendar month. Months with no data are absent.
    pub fn monthly_stats(&self) -> BTreeMap<u32, MonthlyStats> {
        let mut by_month: BTreeMap<u32, Vec<&HistoricalDay>> = BTreeMap::new();
        for day in &self.days {
            by_month.entry(day.date.month()).or_default().push(day);
        }

        by_month
            .into_iter()
            .map(|(month, days)| {
                let rates: Vec<FloatValue> = days.iter().map(|d| d.growth_kg_ha_day).collect();
                let avg = mean(&rates);
                let variance = rates.iter().map(|r| (r - avg).powi(2)).sum::<FloatValue>()
                    / rates.len() as FloatValue;
                let years: BTreeSet<i32> = days.iter().map(|d| d.date.year()).collect();
                let temps: Vec<FloatValue> = days.iter().map(|d| d.temp_mean_c).collect();
                let precip: Vec<FloatValue> = days.iter().map(|d| d.precip_mm).collect();

                (
                    month,
                    MonthlyStats {
                        month,
                        month_name: month_name(month).unwrap_or_default().to_string(),
                        years_of_data: years.len(),
                        avg_growth_kg_ha_day: avg,
                        min_growth_kg_ha_day: rates.iter().copied().fold(FloatValue::INFINITY, FloatValue::min),
                        max_growth_kg_ha_day: rates.iter().copied().fold(FloatValue::NEG_INFINITY, FloatValue::max),
                        std_dev: variance.sqrt(),
                        avg_temp_c: mean(&temps),
                        avg_precip_mm: mean(&precip),
                    },
                )
            })
            .collect()
    }

    /// Mean daily growth for each (year, month).
    pub fn yearly_by_month(&self) -> BTreeMap<(i32, u32), FloatValue> {
        let mut groups: BTreeMap<(i32, u32), Vec<FloatValue>> = BTreeMap::new();
        for day in &self.days {
            groups
                .entry((day.date.year(), day.date.month()))
                .or_default()
                .push(day.growth_kg_ha_day);
        }
        groups.into_iter().map(|(k, v)| (k, mean(&v))).collect()
    }

    pub fn seasonal_summary(&self) -> BTreeMap<Season, SeasonSummary> {
        let mut groups: BTreeMap<Season, Vec<FloatValue>> = BTreeMap::new();
        for day in &self.days {
            groups
                .entry(Season::from_date(day.date))
                .or_default()
                .push(day.growth_kg_ha_day);
        }
        groups
            .into_iter()
            .map(|(season, rates)| {
                (
                    season,
                    SeasonSummary {
                        avg_growth_kg_ha_day: mean(&rates),
                        days: rates.len(),
                    },
                )
            })
            .collect()
    }

    /// Least-squares trend of annual mean growth.
    ///
    /// $$b = \frac{n\sum xy - \sum x \sum y}{n \sum x^2 - (\sum x)^2}$$
    ///
    /// Only years with at least 300 days are used, and at least three such
    /// years are needed.
    pub fn trend_analysis(&self) -> TrendAnalysis {
        let mut by_year: BTreeMap<i32, Vec<FloatValue>> = BTreeMap::new();
        for day in &self.days {
            by_year.entry(day.date.year()).or_default().push(day.growth_kg_ha_day);
        }

        let yearly_averages: BTreeMap<i32, FloatValue> = by_year
            .into_iter()
            .filter(|(_, rates)| rates.len() >= MIN_DAYS_FOR_TREND_YEAR)
            .map(|(year, rates)| (year, mean(&rates)))
            .collect();

        let (trend, slope_per_year) = if yearly_averages.len() >= MIN_TREND_YEARS {
            let n = yearly_averages.len() as FloatValue;
            let (sx, sy, sxy, sx2) = yearly_averages.iter().fold(
                (0.0, 0.0, 0.0, 0.0),
                |(sx, sy, sxy, sx2), (year, avg)| {
                    let x = FloatValue::from(*year);
                    (sx + x, sy + avg, sxy + x * avg, sx2 + x * x)
                },
            );
            let slope = (n * sxy - sx * sy) / (n * sx2 - sx * sx);
            let trend = if slope > TREND_SLOPE_THRESHOLD {
                TrendDirection::Increasing
            } else if slope < -TREND_SLOPE_THRESHOLD {
                TrendDirection::Decreasing
            } else {
                TrendDirection::Stable
            };
            (trend, slope)
        } else {
            (TrendDirection::InsufficientData, 0.0)
        };

        TrendAnalysis {
            years_analyzed: yearly_averages.len(),
            yearly_averages,
            trend,
            slope_per_year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalGrowthModel {
    model: DailyGrowthModel,
    /// unit: mm
    awc_mm: FloatValue,
    initial_fraction: FloatValue,
}

impl Default for HistoricalGrowthModel {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoricalGrowthModel {
    pub fn new() -> Self {
        Self::from_parameters(GrowthParameters::default(), 45.0)
    }

    pub fn from_parameters(parameters: GrowthParameters, awc_mm: FloatValue) -> Self {
        let initial_fraction = parameters.water_balance.initial_fraction;
        Self {
            model: DailyGrowthModel::from_parameters(parameters),
            awc_mm,
            initial_fraction,
        }
    }

    /// Run the growth fold over the full archive in date order.
    pub fn calculate_historical_growth(&self, weather: &WeatherSeries) -> GrowthHistory {
        let state = SoilWaterState::with_capacity(self.awc_mm, self.initial_fraction);
        let (_, results) = self.model.run(state, weather.iter(), None);

        GrowthHistory {
            days: weather
                .iter()
                .zip(results)
                .map(|(w, r)| HistoricalDay {
                    date: r.date,
                    growth_kg_ha_day: r.growth_kg_ha_day,
                    temp_mean_c: w.temp_mean_c,
                    precip_mm: w.precip_mm,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use paddock_core::timeseries::WeatherDay;

    fn stats(avg: f64, sd: f64) -> BTreeMap<u32, MonthlyStats> {
        BTreeMap::from([(
            4,
            MonthlyStats {
                month: 4,
                month_name: "April".to_string(),
                years_of_data: 6,
                avg_growth_kg_ha_day: avg,
                min_growth_kg_ha_day: 5.0,
                max_growth_kg_ha_day: 60.0,
                std_dev: sd,
                avg_temp_c: 10.0,
                avg_precip_mm: 2.5,
            },
        )])
    }

    fn history(days: Vec<(NaiveDate, f64)>) -> GrowthHistory {
        GrowthHistory {
            days: days
                .into_iter()
                .map(|(date, growth)| HistoricalDay {
                    date,
                    growth_kg_ha_day: growth,
                    temp_mean_c: 10.0,
                    precip_mm: 1.0,
                })
                .collect(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ===== Comparison Tests =====

    #[test]
    fn test_comparison_statuses() {
        let s = stats(30.0, 10.0);
        let status = |g| compare_to_historical(g, 4, &s).unwrap().status;
        assert_eq!(status(50.0), ComparisonStatus::WellAboveAverage);
        assert_eq!(status(40.0), ComparisonStatus::AboveAverage);
        assert_eq!(status(30.0), ComparisonStatus::Normal);
        assert_eq!(status(26.0), ComparisonStatus::Normal);
        assert_eq!(status(25.0), ComparisonStatus::BelowAverage);
        assert_eq!(status(20.0), ComparisonStatus::BelowAverage);
        assert_eq!(status(10.0), ComparisonStatus::WellBelowAverage);
    }

    #[test]
    fn test_comparison_values() {
        let c = compare_to_historical(36.0, 4, &stats(30.0, 4.0)).unwrap();
        assert_relative_eq!(c.deviation, 6.0);
        assert_relative_eq!(c.deviation_pct, 20.0);
        assert_relative_eq!(c.z_score, 1.5);
        assert_eq!(c.status, ComparisonStatus::AboveAverage);
        assert_eq!(c.month_name, "April");
        assert_eq!(c.historical_range(), "5.0-60.0");
        assert_eq!(c.status.to_string(), "above average");
    }

    #[test]
    fn test_comparison_degenerate_stats() {
        let c = compare_to_historical(12.0, 4, &stats(0.0, 0.0)).unwrap();
        assert_eq!(c.deviation_pct, 0.0);
        assert_eq!(c.z_score, 0.0);
        assert_eq!(c.status, ComparisonStatus::Normal);
    }

    #[test]
    fn test_missing_month_is_an_error() {
        let result = compare_to_historical(12.0, 9, &stats(30.0, 10.0));
        assert!(matches!(
            result,
            Err(PaddockError::MissingHistoricalData { month: 9 })
        ));
    }

    // ===== Aggregation Tests =====

    #[test]
    fn test_monthly_stats() {
        let h = history(vec![
            (date(2022, 4, 1), 10.0),
            (date(2022, 4, 2), 30.0),
            (date(2023, 4, 1), 20.0),
            (date(2023, 5, 1), 50.0),
        ]);
        let monthly = h.monthly_stats();
        let april = &monthly[&4];
        assert_eq!(april.years_of_data, 2);
        assert_relative_eq!(april.avg_growth_kg_ha_day, 20.0);
        assert_relative_eq!(april.std_dev, (200.0_f64 / 3.0).sqrt());
        assert_eq!(april.min_growth_kg_ha_day, 10.0);
        assert_eq!(april.max_growth_kg_ha_day, 30.0);
        assert!(!monthly.contains_key(&6));
    }

    #[test]
    fn test_yearly_and_seasonal_groupings() {
        let h = history(vec![
            (date(2022, 1, 1), 4.0),
            (date(2022, 1, 2), 6.0),
            (date(2022, 4, 1), 40.0),
        ]);
        assert_relative_eq!(h.yearly_by_month()[&(2022, 1)], 5.0);

        let seasons = h.seasonal_summary();
        assert_eq!(seasons[&Season::Winter].days, 2);
        assert_relative_eq!(seasons[&Season::Spring].avg_growth_kg_ha_day, 40.0);
        assert_eq!(h.growth_on(date(2022, 4, 1)), Some(40.0));
    }

    // ===== Trend Tests =====

    fn full_years(averages: &[(i32, f64)]) -> GrowthHistory {
        let mut days = Vec::new();
        for (year, avg) in averages {
            let start = date(*year, 1, 1);
            for d in start.iter_days().take(365) {
                days.push((d, *avg));
            }
        }
        history(days)
    }

    #[test]
    fn test_trend_increasing() {
        let h = full_years(&[(2020, 20.0), (2021, 21.0), (2022, 22.0)]);
        let t = h.trend_analysis();
        assert_eq!(t.trend, TrendDirection::Increasing);
        assert_relative_eq!(t.slope_per_year, 1.0, epsilon = 1e-6);
        assert_eq!(t.years_analyzed, 3);
    }

    #[test]
    fn test_trend_needs_three_full_years() {
        let mut h = full_years(&[(2020, 20.0), (2021, 25.0)]);
        h.days.push(HistoricalDay {
            date: date(2022, 1, 1),
            growth_kg_ha_day: 99.0,
            temp_mean_c: 5.0,
            precip_mm: 0.0,
        });
        let t = h.trend_analysis();
        assert_eq!(t.trend, TrendDirection::InsufficientData);
        assert_eq!(t.slope_per_year, 0.0);
        assert_eq!(t.years_analyzed, 2);
    }

    #[test]
    fn test_flat_trend_is_stable() {
        let t = full_years(&[(2019, 18.0), (2020, 18.05), (2021, 18.0), (2022, 18.05)]).trend_analysis();
        assert_eq!(t.trend, TrendDirection::Stable);
    }

    // ===== Model Tests =====

    #[test]
    fn test_historical_growth_covers_every_day() {
        let weather: WeatherSeries = date(2023, 3, 1)
            .iter_days()
            .take(60)
            .map(|d| WeatherDay {
                date: d,
                temp_mean_c: 14.0,
                temp_max_c: 18.0,
                temp_min_c: 9.0,
                precip_mm: 3.0,
                et0_mm: 2.0,
            })
            .collect();

        let history = HistoricalGrowthModel::new().calculate_historical_growth(&weather);
        assert_eq!(history.days().len(), 60);
        assert!(history.days().iter().all(|d| d.growth_kg_ha_day > 0.0));
        assert_eq!(history.monthly_stats().len(), 2);
    }
}

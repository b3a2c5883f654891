//! Soil-Test Carbon
//!
//! Converts laboratory organic-matter results into soil organic carbon and
//! tracks how organic matter changes between tests of the same field.
//!
//! # What This Component Does
//!
//! 1. Carbon percentage from organic matter with the van Bemmelen factor:
//!
//! $$C\% = OM\% \times 0.58$$
//!
//! 2. Carbon stock in the sampled layer:
//!
//! $$C_{stock} = C\% \times d \times \rho_b \times 100$$
//!
//!    in t C/ha, for depth $d$ (m) and bulk density $\rho_b$ (t/m³).
//! 3. Organic-matter change between the earliest and latest test of a
//!    field, classified as declining, stable or increasing.
//!
//! # Reference
//!
//! - van Bemmelen (1890), as used in most soil-test OM to SOC conversions.

use crate::parameters::SoilCarbonParameters;
use chrono::NaiveDate;
use paddock_core::soil::SoilTest;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DAYS_PER_YEAR: FloatValue = 365.25;

/// Pounds of soil per acre in the top six inches, used with lb N/acre.
const SOIL_LBS_PER_ACRE_PCT: FloatValue = 20_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilCarbonResult {
    pub date: NaiveDate,
    pub om_pct: FloatValue,
    pub carbon_pct: FloatValue,
    pub total_n_lbs_acre: Option<FloatValue>,
    pub cn_ratio: Option<FloatValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganicMatterTrend {
    Declining,
    Stable,
    Increasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicMatterChange {
    pub earliest_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub earliest_om_pct: FloatValue,
    pub latest_om_pct: FloatValue,
    /// Percentage points
    pub om_change_pct: FloatValue,
    pub years_between: FloatValue,
    pub om_change_per_year: FloatValue,
    pub carbon_change_per_year: FloatValue,
    pub status: OrganicMatterTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilCarbonStock {
    pub om_pct: FloatValue,
    pub carbon_pct: FloatValue,
    /// unit: t C/ha
    pub carbon_stock_t_ha: FloatValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoilCarbon {
    parameters: SoilCarbonParameters,
}

impl SoilCarbon {
    pub fn new() -> Self {
        Self::from_parameters(SoilCarbonParameters::default())
    }

    pub fn from_parameters(parameters: SoilCarbonParameters) -> Self {
        Self { parameters }
    }

    pub fn carbon_pct(&self, om_pct: FloatValue) -> FloatValue {
        om_pct * self.parameters.van_bemmelen_factor
    }

    /// unit: t C/ha
    pub fn carbon_stock_t_ha(&self, carbon_pct: FloatValue) -> FloatValue {
        let p = &self.parameters;
        carbon_pct * p.sample_depth_m * p.bulk_density * 100.0
    }

    /// Rough C:N ratio from OM % and total N. `None` without a positive N.
    pub fn cn_ratio(&self, om_pct: FloatValue, total_n_lbs_acre: Option<FloatValue>) -> Option<FloatValue> {
        total_n_lbs_acre
            .filter(|n| *n > 0.0)
            .map(|n| self.carbon_pct(om_pct) * SOIL_LBS_PER_ACRE_PCT / n)
    }

    /// Carbon results grouped by field, oldest test first.
    pub fn carbon_by_field(&self, tests: &[SoilTest]) -> BTreeMap<String, Vec<SoilCarbonResult>> {
        let mut fields: BTreeMap<String, Vec<SoilCarbonResult>> = BTreeMap::new();
        for test in tests {
            fields.entry(test.field.clone()).or_default().push(SoilCarbonResult {
                date: test.date,
                om_pct: test.organic_matter_pct,
                carbon_pct: self.carbon_pct(test.organic_matter_pct),
                total_n_lbs_acre: test.total_n_lbs_acre,
                cn_ratio: self.cn_ratio(test.organic_matter_pct, test.total_n_lbs_acre),
            });
        }
        for results in fields.values_mut() {
            results.sort_by_key(|r| r.date);
        }
        fields
    }

    /// Change between the earliest and latest test of each field.
    ///
    /// Fields with a single test, or with all tests on one day, are omitted.
    pub fn organic_matter_changes(&self, tests: &[SoilTest]) -> BTreeMap<String, OrganicMatterChange> {
        self.carbon_by_field(tests)
            .into_iter()
            .filter_map(|(field, results)| {
                let (earliest, latest) = (results.first()?, results.last()?);
                let years = (latest.date - earliest.date).num_days() as FloatValue / DAYS_PER_YEAR;
                if years <= 0.0 {
                    return None;
                }
                let change = latest.om_pct - earliest.om_pct;
                Some((
                    field,
                    OrganicMatterChange {
                        earliest_date: earliest.date,
                        latest_date: latest.date,
                        earliest_om_pct: earliest.om_pct,
                        latest_om_pct: latest.om_pct,
                        om_change_pct: change,
                        years_between: years,
                        om_change_per_year: change / years,
                        carbon_change_per_year: self.carbon_pct(change) / years,
                        status: self.classify_change(change),
                    },
                ))
            })
            .collect()
    }

    pub fn classify_change(&self, om_change_pct: FloatValue) -> OrganicMatterTrend {
        let band = self.parameters.stable_band_pct;
        if om_change_pct < -band {
            OrganicMatterTrend::Declining
        } else if om_change_pct > band {
            OrganicMatterTrend::Increasing
        } else {
            OrganicMatterTrend::Stable
        }
    }

    /// Carbon stock from each field's most recent test.
    pub fn carbon_stocks(&self, tests: &[SoilTest]) -> BTreeMap<String, SoilCarbonStock> {
        self.carbon_by_field(tests)
            .into_iter()
            .filter_map(|(field, results)| {
                let latest = results.last()?;
                Some((
                    field,
                    SoilCarbonStock {
                        om_pct: latest.om_pct,
                        carbon_pct: latest.carbon_pct,
                        carbon_stock_t_ha: self.carbon_stock_t_ha(latest.carbon_pct),
                    },
                ))
            })
            .collect()
    }
}

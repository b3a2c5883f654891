//! Carbon Production
//!
//! Light-use-efficiency estimates of gross and net primary production from
//! NDVI, and the annual soil carbon sequestration they imply.
//!
//! # What This Component Does
//!
//! 1. Estimates daily PAR from latitude and day of year using FAO-56
//!    extraterrestrial radiation, a clear-sky transmission and the PAR
//!    fraction of shortwave radiation.
//! 2. Converts NDVI to fPAR with the MOD17 linear ramp.
//! 3. Computes GPP:
//!
//! $$GPP = \varepsilon_{max} \cdot fPAR \cdot PAR \cdot T_{scalar}$$
//!
//!    in g C/m²/day, reported in kg C/ha/day.
//! 4. NPP is a fixed fraction of GPP. A management-dependent share of
//!    NPP is retained as stable soil carbon.
//!
//! # Reference
//!
//! - Running et al. (2004) MOD17; Potter et al. (1993) CASA.
//! - Gilmanov et al. (2010) for C3 temperate grassland LUE.
//! - Allen et al. (1998) FAO-56, eq. 21-25.

use crate::constants::{CO2_PER_C, G_M2_TO_KG_HA, KG_PER_TONNE};
use crate::parameters::{CarbonProductionParameters, ResponseCurveParameters};
use crate::pasture::ResponseCurves;
use paddock_core::errors::{PaddockError, PaddockResult};
use paddock_core::timeseries::FloatValue;
use paddock_core::vegetation::MonthlyNdvi;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

/// Solar constant
/// unit: MJ/m²/min
const SOLAR_CONSTANT: FloatValue = 0.0820;

/// A year needs this many valid NDVI months to be analysed.
const MIN_VALID_MONTHS: usize = 6;

/// NDVI used when a year has no valid months at all.
const FALLBACK_NDVI: FloatValue = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementIntensity {
    /// High input, frequent grazing
    Intensive,
    /// Rotational grazing
    #[default]
    Moderate,
    /// Low input, infrequent grazing
    Extensive,
    /// Trees and pasture
    Silvopasture,
}

impl ManagementIntensity {
    /// Share of the stable-carbon fraction of NPP actually retained.
    pub fn factor(&self) -> FloatValue {
        match self {
            ManagementIntensity::Intensive => 0.3,
            ManagementIntensity::Moderate => 0.5,
            ManagementIntensity::Extensive => 0.4,
            ManagementIntensity::Silvopasture => 0.7,
        }
    }
}

impl fmt::Display for ManagementIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ManagementIntensity::Intensive => "intensive",
            ManagementIntensity::Moderate => "moderate",
            ManagementIntensity::Extensive => "extensive",
            ManagementIntensity::Silvopasture => "silvopasture",
        })
    }
}

/// Daily carbon fluxes for a paddock.
///
/// unit: kg C/ha/day, except `carbon_stock_kg_c_ha`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonFlux {
    pub gpp: FloatValue,
    pub npp: FloatValue,
    pub plant_respiration: FloatValue,
    pub soil_respiration: FloatValue,
    /// Plant plus soil respiration
    pub respiration: FloatValue,
    /// Respiration minus GPP; negative is net uptake
    pub nee: FloatValue,
    /// Above-ground carbon in standing dry matter
    /// unit: kg C/ha
    pub carbon_stock_kg_c_ha: FloatValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualSequestration {
    pub annual_gpp_kg_c_ha: FloatValue,
    pub annual_npp_kg_c_ha: FloatValue,
    pub annual_gpp_t_c_ha: FloatValue,
    pub annual_npp_t_c_ha: FloatValue,
    pub soil_sequestration_t_c_ha: FloatValue,
    pub soil_sequestration_t_co2_ha: FloatValue,
    /// Months that contributed
    pub months_used: usize,
    pub management: ManagementIntensity,
}

/// One year of a plot's NDVI history, gap-filled and converted to carbon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCarbon {
    pub year: i32,
    pub valid_months: usize,
    /// Mean of the observed (unfilled) months
    pub avg_ndvi: FloatValue,
    pub sequestration: AnnualSequestration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotCarbon {
    pub plot: String,
    pub area_ha: FloatValue,
    pub years: Vec<YearlyCarbon>,
}

/// Area-weighted farm totals for one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmCarbonTotals {
    pub area_ha: FloatValue,
    /// unit: t C
    pub gpp_t_c: FloatValue,
    pub npp_t_c: FloatValue,
    pub sequestration_t_c: FloatValue,
    /// unit: t CO2
    pub sequestration_t_co2: FloatValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarbonProduction {
    parameters: CarbonProductionParameters,
    curves: ResponseCurves,
}

impl CarbonProduction {
    pub fn new() -> Self {
        Self::from_parameters(CarbonProductionParameters::default())
    }

    pub fn from_parameters(parameters: CarbonProductionParameters) -> Self {
        Self {
            parameters,
            curves: ResponseCurves::new(),
        }
    }

    /// Use a non-default NDVI to fPAR ramp.
    pub fn with_curves(mut self, curves: ResponseCurveParameters) -> Self {
        self.curves = ResponseCurves::from_parameters(curves);
        self
    }

    /// Daily PAR at the surface.
    ///
    /// $$R_a = \frac{24 \cdot 60}{\pi} G_{sc} d_r \left[\omega_s \sin\varphi \sin\delta + \cos\varphi \cos\delta \sin\omega_s\right]$$
    ///
    /// unit: MJ/m²/day
    pub fn estimate_par(&self, latitude: FloatValue, day_of_year: u32) -> FloatValue {
        let doy = FloatValue::from(day_of_year);
        let declination = 0.409 * (2.0 * PI * doy / 365.0 - 1.39).sin();
        let lat = latitude.to_radians();

        let sunset_angle = (-lat.tan() * declination.tan()).clamp(-1.0, 1.0).acos();
        let inverse_distance = 1.0 + 0.033 * (2.0 * PI * doy / 365.0).cos();

        let ra = (24.0 * 60.0 / PI)
            * SOLAR_CONSTANT
            * inverse_distance
            * (sunset_angle * lat.sin() * declination.sin()
                + lat.cos() * declination.cos() * sunset_angle.sin());

        (ra * self.parameters.atmospheric_transmission * self.parameters.par_fraction).max(0.0)
    }

    /// LUE temperature scalar, a ramp from `t_min` up to `t_opt` and down to
    /// `t_max`. Unknown temperature uses the moderate default.
    pub fn temperature_scalar(&self, temperature: Option<FloatValue>) -> FloatValue {
        let p = &self.parameters;
        let Some(t) = temperature else {
            return p.default_temperature_scalar;
        };
        if t <= p.t_min || t >= p.t_max {
            0.0
        } else if t <= p.t_opt {
            (t - p.t_min) / (p.t_opt - p.t_min)
        } else {
            (p.t_max - t) / (p.t_max - p.t_opt)
        }
    }

    /// Gross primary production.
    ///
    /// unit: kg C/ha/day
    pub fn calculate_gpp(
        &self,
        ndvi: FloatValue,
        latitude: FloatValue,
        day_of_year: u32,
        temperature: Option<FloatValue>,
    ) -> FloatValue {
        let fpar = self.curves.ndvi_to_fpar(ndvi);
        let par = self.estimate_par(latitude, day_of_year);
        self.parameters.lue_max * fpar * par * self.temperature_scalar(temperature) * G_M2_TO_KG_HA
    }

    pub fn calculate_carbon_flux(
        &self,
        ndvi: FloatValue,
        standing_dry_matter_kg_ha: FloatValue,
        latitude: FloatValue,
        day_of_year: u32,
        temperature: Option<FloatValue>,
    ) -> CarbonFlux {
        let p = &self.parameters;
        let gpp = self.calculate_gpp(ndvi, latitude, day_of_year, temperature);
        let npp = gpp * p.npp_ratio;
        let plant_respiration = gpp - npp;
        let soil_respiration = npp * p.soil_respiration_factor;
        let respiration = plant_respiration + soil_respiration;

        CarbonFlux {
            gpp,
            npp,
            plant_respiration,
            soil_respiration,
            respiration,
            nee: respiration - gpp,
            carbon_stock_kg_c_ha: standing_dry_matter_kg_ha * p.carbon_fraction,
        }
    }

    /// Annual production and sequestration from twelve monthly NDVI values
    /// (January first).
    ///
    /// Each month is evaluated at its mid-month day, `(m - 1) × 30 + 15`,
    /// and counts for 30 days. Missing or negative months are skipped.
    pub fn estimate_annual_sequestration(
        &self,
        monthly_ndvi: &[Option<FloatValue>],
        latitude: FloatValue,
        management: ManagementIntensity,
        monthly_temperature: Option<&[FloatValue]>,
    ) -> PaddockResult<AnnualSequestration> {
        if monthly_ndvi.len() != 12 {
            return Err(PaddockError::InvalidSeriesLength {
                expected: 12,
                actual: monthly_ndvi.len(),
            });
        }
        if let Some(temps) = monthly_temperature {
            if temps.len() != 12 {
                return Err(PaddockError::InvalidSeriesLength {
                    expected: 12,
                    actual: temps.len(),
                });
            }
        }

        let p = &self.parameters;
        let days = FloatValue::from(p.days_per_month);
        let mut annual_gpp = 0.0;
        let mut months_used = 0;

        for (index, ndvi) in monthly_ndvi.iter().enumerate() {
            let Some(ndvi) = ndvi.filter(|n| *n >= 0.0) else {
                continue;
            };
            let month = index as u32 + 1;
            let day_of_year = (month - 1) * p.days_per_month + 15;
            let temperature = monthly_temperature.map(|t| t[index]);

            annual_gpp += self.calculate_gpp(ndvi, latitude, day_of_year, temperature) * days;
            months_used += 1;
        }

        let annual_npp = annual_gpp * p.npp_ratio;
        let sequestration_kg = annual_npp * p.stable_soil_fraction * management.factor();

        Ok(AnnualSequestration {
            annual_gpp_kg_c_ha: annual_gpp,
            annual_npp_kg_c_ha: annual_npp,
            annual_gpp_t_c_ha: annual_gpp / KG_PER_TONNE,
            annual_npp_t_c_ha: annual_npp / KG_PER_TONNE,
            soil_sequestration_t_c_ha: sequestration_kg / KG_PER_TONNE,
            soil_sequestration_t_co2_ha: sequestration_kg / KG_PER_TONNE * CO2_PER_C,
            months_used,
            management,
        })
    }

    /// Fill gaps in a year of monthly NDVI.
    ///
    /// Months are filled in calendar order. A gap takes the mean of its
    /// neighbours (the previous month may itself have been filled), else the
    /// mean of every value known so far, else 0.2.
    pub fn fill_monthly_ndvi(monthly: &[Option<FloatValue>; 12]) -> [FloatValue; 12] {
        let mut filled = *monthly;
        for i in 0..12 {
            if filled[i].is_some() {
                continue;
            }
            let neighbours: Vec<FloatValue> = [i.checked_sub(1), Some(i + 1)]
                .into_iter()
                .flatten()
                .filter_map(|j| filled.get(j).copied().flatten())
                .collect();

            filled[i] = Some(if neighbours.is_empty() {
                let known: Vec<FloatValue> = filled.iter().flatten().copied().collect();
                if known.is_empty() {
                    FALLBACK_NDVI
                } else {
                    known.iter().sum::<FloatValue>() / known.len() as FloatValue
                }
            } else {
                neighbours.iter().sum::<FloatValue>() / neighbours.len() as FloatValue
            });
        }
        filled.map(|n| n.unwrap_or(FALLBACK_NDVI))
    }

    /// Per-year carbon for a plot's monthly NDVI history.
    ///
    /// Years with fewer than six valid months are dropped.
    pub fn analyse_history(
        &self,
        history: &[MonthlyNdvi],
        latitude: FloatValue,
        management: ManagementIntensity,
    ) -> PaddockResult<Vec<YearlyCarbon>> {
        let mut years: BTreeMap<i32, [Option<FloatValue>; 12]> = BTreeMap::new();
        for record in history {
            if !(1..=12).contains(&record.month) {
                return Err(PaddockError::InvalidMonth(record.month));
            }
            let months = years.entry(record.year).or_insert([None; 12]);
            if let Some(ndvi) = record.ndvi_mean.filter(|n| *n >= 0.0) {
                months[record.month as usize - 1] = Some(ndvi);
            }
        }

        years
            .into_iter()
            .filter_map(|(year, months)| {
                let observed: Vec<FloatValue> = months.iter().flatten().copied().collect();
                (observed.len() >= MIN_VALID_MONTHS).then_some((year, months, observed))
            })
            .map(|(year, months, observed)| {
                let filled = Self::fill_monthly_ndvi(&months).map(Some);
                let sequestration =
                    self.estimate_annual_sequestration(&filled, latitude, management, None)?;
                Ok(YearlyCarbon {
                    year,
                    valid_months: observed.len(),
                    avg_ndvi: observed.iter().sum::<FloatValue>() / observed.len() as FloatValue,
                    sequestration,
                })
            })
            .collect()
    }

    /// Area-weighted totals by year across plots.
    pub fn farm_totals(plots: &[PlotCarbon]) -> BTreeMap<i32, FarmCarbonTotals> {
        let mut totals: BTreeMap<i32, FarmCarbonTotals> = BTreeMap::new();
        for plot in plots {
            for year in &plot.years {
                let t = totals.entry(year.year).or_default();
                let s = &year.sequestration;
                t.area_ha += plot.area_ha;
                t.gpp_t_c += s.annual_gpp_t_c_ha * plot.area_ha;
                t.npp_t_c += s.annual_npp_t_c_ha * plot.area_ha;
                t.sequestration_t_c += s.soil_sequestration_t_c_ha * plot.area_ha;
            }
        }
        for t in totals.values_mut() {
            t.sequestration_t_co2 = t.sequestration_t_c * CO2_PER_C;
        }
        totals
    }
}

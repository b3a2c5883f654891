//! Livestock Methane
//!
//! Enteric and manure methane for a sheep flock, and a mixed cattle/sheep
//! total.
//!
//! # What This Component Does
//!
//! 1. Base enteric methane per class is the head count times the class
//!    factor (lamb 4, ewe 8, ram 8, wether 8, lactating ewe 10 kg CH4/yr).
//! 2. A single combined adjustment (forage × additives × breed × climate)
//!    scales every class alike.
//! 3. Manure methane is the total head count times the manure factor, also
//!    scaled by the combined adjustment.
//! 4. Total CH4 = adjusted enteric + manure, CO2eq = total × GWP.
//!
//! The unadjusted baseline is reported so the effect of the adjustments is
//! visible.
//!
//! # Reference
//!
//! IPCC 2019 Refinement to the 2006 Guidelines, Vol 4, Ch 10, Table 10.10.

use crate::livestock::factors::{CattleType, EmissionAdjustmentFactors};
use crate::parameters::EmissionParameters;
use paddock_core::livestock::FlockComposition;
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Methane by flock class.
///
/// unit: kg CH4/yr
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMethane {
    pub ewes: FloatValue,
    pub ewes_lactating: FloatValue,
    pub rams: FloatValue,
    pub lambs: FloatValue,
    pub wethers: FloatValue,
}

impl ClassMethane {
    pub fn total(&self) -> FloatValue {
        self.ewes + self.ewes_lactating + self.rams + self.lambs + self.wethers
    }

    fn scaled(&self, factor: FloatValue) -> Self {
        Self {
            ewes: self.ewes * factor,
            ewes_lactating: self.ewes_lactating * factor,
            rams: self.rams * factor,
            lambs: self.lambs * factor,
            wethers: self.wethers * factor,
        }
    }
}

/// The multipliers actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdjustments {
    pub forage_factor: FloatValue,
    pub additive_factor: FloatValue,
    pub breed_factor: FloatValue,
    pub climate_factor: FloatValue,
    pub combined_factor: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheepMethaneEstimate {
    pub flock: FlockComposition,
    pub enteric_base: ClassMethane,
    pub enteric_adjusted: ClassMethane,
    pub adjustments: AppliedAdjustments,
    /// Unadjusted enteric plus manure
    /// unit: kg CH4/yr
    pub baseline_ch4_kg: FloatValue,
    pub enteric_ch4_kg: FloatValue,
    pub manure_ch4_kg: FloatValue,
    pub total_ch4_kg: FloatValue,
    /// Positive when the adjustments lower emissions
    pub reduction_from_baseline_pct: FloatValue,
    pub co2eq_kg: FloatValue,
    pub avg_ch4_per_head_kg: FloatValue,
}

impl SheepMethaneEstimate {
    pub fn co2eq_t(&self) -> FloatValue {
        self.co2eq_kg / 1000.0
    }
}

/// How the sheep side of a mixed estimate is described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheepSpec {
    /// A bare head count, apportioned with [`FlockComposition::from_head_count`]
    HeadCount(u32),
    Composition {
        flock: FlockComposition,
        #[serde(default)]
        adjustments: EmissionAdjustmentFactors,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CattleMethane {
    pub count: u32,
    pub cattle_type: CattleType,
    /// unit: kg CH4/head/yr
    pub emission_factor: FloatValue,
    pub ch4_kg: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivestockMethaneEstimate {
    pub cattle: CattleMethane,
    pub sheep_count: u32,
    pub sheep: Option<SheepMethaneEstimate>,
    pub total_ch4_kg: FloatValue,
    pub total_co2eq_kg: FloatValue,
}

impl LivestockMethaneEstimate {
    pub fn sheep_ch4_kg(&self) -> FloatValue {
        self.sheep.as_ref().map_or(0.0, |s| s.total_ch4_kg)
    }

    pub fn total_co2eq_t(&self) -> FloatValue {
        self.total_co2eq_kg / 1000.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LivestockEmissions {
    parameters: EmissionParameters,
}

impl LivestockEmissions {
    pub fn new() -> Self {
        Self::from_parameters(EmissionParameters::default())
    }

    pub fn from_parameters(parameters: EmissionParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &EmissionParameters {
        &self.parameters
    }

    /// Unadjusted enteric methane per class.
    pub fn enteric_base(&self, flock: &FlockComposition) -> ClassMethane {
        let ef = &self.parameters.sheep;
        ClassMethane {
            ewes: FloatValue::from(flock.ewes) * ef.ewe,
            ewes_lactating: FloatValue::from(flock.ewes_lactating) * ef.ewe_lactating,
            rams: FloatValue::from(flock.rams) * ef.ram,
            lambs: FloatValue::from(flock.lambs) * ef.lamb,
            wethers: FloatValue::from(flock.wethers) * ef.wether,
        }
    }

    pub fn estimate_sheep_methane(
        &self,
        flock: &FlockComposition,
        factors: &EmissionAdjustmentFactors,
    ) -> SheepMethaneEstimate {
        for (category, raw) in factors.unrecognised() {
            warn!(category, key = %raw, "Unrecognised methane adjustment key; using 1.0");
        }

        let heads = FloatValue::from(flock.total());
        let combined = factors.combined();

        let enteric_base = self.enteric_base(flock);
        let enteric_adjusted = enteric_base.scaled(combined);
        let enteric_ch4_kg = enteric_adjusted.total();

        let base_manure = heads * self.parameters.sheep.manure;
        let manure_ch4_kg = base_manure * combined;
        let total_ch4_kg = enteric_ch4_kg + manure_ch4_kg;

        let baseline_ch4_kg = enteric_base.total() + base_manure;
        let reduction_from_baseline_pct = if baseline_ch4_kg > 0.0 {
            (1.0 - total_ch4_kg / baseline_ch4_kg) * 100.0
        } else {
            0.0
        };

        SheepMethaneEstimate {
            flock: *flock,
            enteric_base,
            enteric_adjusted,
            adjustments: AppliedAdjustments {
                forage_factor: factors.forage_factor(),
                additive_factor: factors.additive_factor(),
                breed_factor: factors.breed_factor(),
                climate_factor: factors.climate_factor(),
                combined_factor: combined,
            },
            baseline_ch4_kg,
            enteric_ch4_kg,
            manure_ch4_kg,
            total_ch4_kg,
            reduction_from_baseline_pct,
            co2eq_kg: total_ch4_kg * self.parameters.ch4_gwp,
            avg_ch4_per_head_kg: if heads > 0.0 {
                total_ch4_kg / heads
            } else {
                0.0
            },
        }
    }

    /// Tier 1 cattle factor for a production type. Unknown types use beef.
    pub fn cattle_factor(&self, cattle_type: &CattleType) -> FloatValue {
        match cattle_type {
            CattleType::Beef => self.parameters.cattle.beef,
            CattleType::Dairy => self.parameters.cattle.dairy,
            CattleType::Unknown(raw) => {
                warn!(cattle_type = %raw, "Unrecognised cattle type; using beef factor");
                self.parameters.cattle.beef
            }
        }
    }

    /// Combined cattle and sheep methane.
    ///
    /// A head count of zero contributes no sheep estimate. A bare head count
    /// is reported as given, even though the apportioned classes may sum to
    /// fewer animals.
    pub fn estimate_livestock_methane(
        &self,
        cattle_count: u32,
        cattle_type: &CattleType,
        sheep: &SheepSpec,
    ) -> LivestockMethaneEstimate {
        let emission_factor = self.cattle_factor(cattle_type);
        let cattle = CattleMethane {
            count: cattle_count,
            cattle_type: cattle_type.clone(),
            emission_factor,
            ch4_kg: FloatValue::from(cattle_count) * emission_factor,
        };

        let (sheep_count, sheep) = match sheep {
            SheepSpec::HeadCount(0) => (0, None),
            SheepSpec::HeadCount(heads) => {
                let flock = FlockComposition::from_head_count(*heads);
                let estimate =
                    self.estimate_sheep_methane(&flock, &EmissionAdjustmentFactors::default());
                (*heads, Some(estimate))
            }
            SheepSpec::Composition { flock, adjustments } => {
                (flock.total(), Some(self.estimate_sheep_methane(flock, adjustments)))
            }
        };

        let total_ch4_kg = cattle.ch4_kg + sheep.as_ref().map_or(0.0, |s| s.total_ch4_kg);
        LivestockMethaneEstimate {
            cattle,
            sheep_count,
            sheep,
            total_ch4_kg,
            total_co2eq_kg: total_ch4_kg * self.parameters.ch4_gwp,
        }
    }
}

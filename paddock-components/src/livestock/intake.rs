//! Dry Matter Intake and Grazing Pressure
//!
//! Daily intake per animal and its aggregation into per-paddock grazing
//! pressure, which drives the FOO grazing correction.
//!
//! # What This Component Does
//!
//! 1. Takes the animal's latest recorded weight, or the class default.
//! 2. Base intake is weight times the class intake fraction.
//! 3. Ewes suckling lambs eat more: the base is multiplied by 1.7, 2.3 or
//!    2.9 for one, two or three-plus nursing lambs.
//! 4. On-farm intake is summed per paddock and divided by paddock area.

use crate::parameters::{base_intake_fraction, default_weight_kg, IntakeParameters};
use chrono::NaiveDate;
use paddock_core::livestock::{nursing_lambs_by_dam, AgeClass, AnimalRecord, Paddock};
use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightSource {
    Recorded,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalIntake {
    pub animal_id: String,
    pub name: String,
    pub age_class: AgeClass,
    /// unit: kg
    pub weight_kg: FloatValue,
    pub weight_source: WeightSource,
    pub lambs_nursing: usize,
    /// unit: kg DM/day
    pub base_intake_kg: FloatValue,
    pub lactation_multiplier: FloatValue,
    /// unit: kg DM/day
    pub total_intake_kg: FloatValue,
    pub paddock_id: Option<String>,
}

impl AnimalIntake {
    pub fn is_lactating(&self) -> bool {
        self.lambs_nursing > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddockConsumption {
    pub paddock_id: String,
    pub paddock_name: String,
    pub area_ha: FloatValue,
    pub animal_count: usize,
    /// unit: kg DM/day
    pub total_intake_kg_day: FloatValue,
    /// Grazing pressure
    /// unit: kg DM/ha/day
    pub intake_per_ha_kg_day: FloatValue,
    pub animals: Vec<String>,
}

/// Farm-wide grazing totals on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrazingSummary {
    pub date: NaiveDate,
    pub paddocks: BTreeMap<String, PaddockConsumption>,
    pub total_animals_in_paddocks: usize,
    pub total_intake_kg_day: FloatValue,
    pub lactating_ewe_count: usize,
    pub total_lambs_nursing: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeModel {
    parameters: IntakeParameters,
}

impl IntakeModel {
    pub fn new() -> Self {
        Self::from_parameters(IntakeParameters::default())
    }

    pub fn from_parameters(parameters: IntakeParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &IntakeParameters {
        &self.parameters
    }

    /// Daily dry matter intake for one animal.
    pub fn animal_intake(&self, animal: &AnimalRecord, nursing_lambs: usize) -> AnimalIntake {
        let (weight_kg, weight_source) = match animal.weight_kg {
            Some(w) if w > 0.0 => (w, WeightSource::Recorded),
            _ => (default_weight_kg(&animal.age_class), WeightSource::Default),
        };

        let base_intake_kg = weight_kg * base_intake_fraction(&animal.age_class, &self.parameters);
        let lactation_multiplier = self.parameters.lactation_multiplier(nursing_lambs);

        AnimalIntake {
            animal_id: animal.id.clone(),
            name: animal
                .name
                .clone()
                .unwrap_or_else(|| animal.id.chars().take(8).collect()),
            age_class: animal.age_class.clone(),
            weight_kg,
            weight_source,
            lambs_nursing: nursing_lambs,
            base_intake_kg,
            lactation_multiplier,
            total_intake_kg: base_intake_kg * lactation_multiplier,
            paddock_id: animal.paddock_id.clone(),
        }
    }

    /// Intake of every on-farm animal on `date`.
    pub fn herd_intake(&self, animals: &[AnimalRecord], date: NaiveDate) -> Vec<AnimalIntake> {
        let nursing = nursing_lambs_by_dam(animals, date, self.parameters.weaning_days);
        animals
            .iter()
            .filter(|a| a.on_farm)
            .map(|a| self.animal_intake(a, nursing.get(&a.id).copied().unwrap_or(0)))
            .collect()
    }

    /// Grazing consumption per paddock, keyed by paddock id.
    ///
    /// Animals without a location are ignored. Paddocks smaller than the
    /// minimum area (or not in `paddocks` at all) are omitted.
    pub fn paddock_consumption(
        &self,
        animals: &[AnimalRecord],
        paddocks: &[Paddock],
        date: NaiveDate,
    ) -> BTreeMap<String, PaddockConsumption> {
        let by_id: HashMap<&str, &Paddock> = paddocks.iter().map(|p| (p.id.as_str(), p)).collect();
        let mut result: BTreeMap<String, PaddockConsumption> = BTreeMap::new();

        for intake in self.herd_intake(animals, date) {
            let Some(pid) = intake.paddock_id.as_deref() else {
                continue;
            };
            let entry = result.entry(pid.to_string()).or_insert_with(|| {
                let paddock = by_id.get(pid);
                PaddockConsumption {
                    paddock_id: pid.to_string(),
                    paddock_name: paddock.map_or_else(|| "Unknown".to_string(), |p| p.name.clone()),
                    area_ha: paddock.map_or(0.0, |p| p.area_ha),
                    animal_count: 0,
                    total_intake_kg_day: 0.0,
                    intake_per_ha_kg_day: 0.0,
                    animals: Vec::new(),
                }
            });
            entry.animal_count += 1;
            entry.total_intake_kg_day += intake.total_intake_kg;
            entry.animals.push(intake.name);
        }

        result.retain(|pid, c| {
            let keep = c.area_ha >= self.parameters.min_paddock_area_ha;
            if !keep {
                debug!(paddock = %pid, area_ha = c.area_ha, "Skipping small paddock");
            }
            keep
        });
        for c in result.values_mut() {
            c.intake_per_ha_kg_day = if c.area_ha > 0.0 {
                c.total_intake_kg_day / c.area_ha
            } else {
                0.0
            };
        }
        result
    }

    pub fn grazing_summary(
        &self,
        animals: &[AnimalRecord],
        paddocks: &[Paddock],
        date: NaiveDate,
    ) -> GrazingSummary {
        let on_farm: Vec<AnimalRecord> = animals.iter().filter(|a| a.on_farm).cloned().collect();
        let nursing = nursing_lambs_by_dam(&on_farm, date, self.parameters.weaning_days);
        let paddocks = self.paddock_consumption(animals, paddocks, date);

        GrazingSummary {
            date,
            total_animals_in_paddocks: paddocks.values().map(|c| c.animal_count).sum(),
            total_intake_kg_day: paddocks.values().map(|c| c.total_intake_kg_day).sum(),
            lactating_ewe_count: nursing
                .keys()
                .filter(|dam| on_farm.iter().any(|a| &a.id == *dam))
                .count(),
            total_lambs_nursing: nursing.values().sum(),
            paddocks,
        }
    }
}

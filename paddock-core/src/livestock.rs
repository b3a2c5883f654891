//! Livestock records and flock composition.
//!
//! Animal records come from the farm-management collaborator with a free-text
//! age class. [`FlockComposition`] is the reduced form the emissions model
//! works with.

use crate::timeseries::FloatValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Days after birth a lamb is assumed weaned when no wean record exists.
pub const DEFAULT_WEANING_DAYS: i64 = 120;

/// Sheep age/sex class as recorded by the farm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgeClass {
    Ewe,
    Ram,
    MaidenEwe,
    Wether,
    EweHogget,
    RamHogget,
    WetherHogget,
    EweWeaner,
    RamWeaner,
    WetherWeaner,
    EweLamb,
    RamLamb,
    WetherLamb,
    Lamb,
    Unknown(String),
}

impl AgeClass {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "ewe" => AgeClass::Ewe,
            "ram" => AgeClass::Ram,
            "maiden_ewe" => AgeClass::MaidenEwe,
            "wether" => AgeClass::Wether,
            "ewe_hogget" => AgeClass::EweHogget,
            "ram_hogget" => AgeClass::RamHogget,
            "wether_hogget" => AgeClass::WetherHogget,
            "ewe_weaner" => AgeClass::EweWeaner,
            "ram_weaner" => AgeClass::RamWeaner,
            "wether_weaner" => AgeClass::WetherWeaner,
            "ewe_lamb" => AgeClass::EweLamb,
            "ram_lamb" => AgeClass::RamLamb,
            "wether_lamb" => AgeClass::WetherLamb,
            "lamb" => AgeClass::Lamb,
            _ => AgeClass::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AgeClass::Ewe => "ewe",
            AgeClass::Ram => "ram",
            AgeClass::MaidenEwe => "maiden_ewe",
            AgeClass::Wether => "wether",
            AgeClass::EweHogget => "ewe_hogget",
            AgeClass::RamHogget => "ram_hogget",
            AgeClass::WetherHogget => "wether_hogget",
            AgeClass::EweWeaner => "ewe_weaner",
            AgeClass::RamWeaner => "ram_weaner",
            AgeClass::WetherWeaner => "wether_weaner",
            AgeClass::EweLamb => "ewe_lamb",
            AgeClass::RamLamb => "ram_lamb",
            AgeClass::WetherLamb => "wether_lamb",
            AgeClass::Lamb => "lamb",
            AgeClass::Unknown(raw) => raw,
        }
    }

    /// Lambs and weaners, the classes that can still be nursing.
    pub fn is_young(&self) -> bool {
        matches!(
            self,
            AgeClass::EweWeaner
                | AgeClass::RamWeaner
                | AgeClass::WetherWeaner
                | AgeClass::EweLamb
                | AgeClass::RamLamb
                | AgeClass::WetherLamb
                | AgeClass::Lamb
        )
    }
}

impl From<String> for AgeClass {
    fn from(raw: String) -> Self {
        AgeClass::parse(&raw)
    }
}

impl From<AgeClass> for String {
    fn from(class: AgeClass) -> Self {
        class.as_str().to_string()
    }
}

/// A single animal as held by the farm-management system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: String,
    pub name: Option<String>,
    pub age_class: AgeClass,
    pub on_farm: bool,
    pub paddock_id: Option<String>,
    /// Most recent recorded weight
    /// unit: kg
    pub weight_kg: Option<FloatValue>,
    pub dam_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub wean_date: Option<NaiveDate>,
}

impl AnimalRecord {
    /// Recorded wean date, else birth date plus `weaning_days`.
    pub fn expected_wean_date(&self, weaning_days: i64) -> Option<NaiveDate> {
        self.wean_date
            .or_else(|| Some(self.birth_date? + chrono::Duration::days(weaning_days)))
    }

    /// Whether this animal is a lamb still suckling on `date`.
    ///
    /// Animals with neither a wean record nor a birth date are never counted.
    pub fn is_nursing(&self, date: NaiveDate, weaning_days: i64) -> bool {
        self.on_farm
            && self.age_class.is_young()
            && self.dam_id.is_some()
            && self
                .expected_wean_date(weaning_days)
                .is_some_and(|wean| date < wean)
    }
}

/// Count of nursing lambs per dam id on `date`.
pub fn nursing_lambs_by_dam(
    records: &[AnimalRecord],
    date: NaiveDate,
    weaning_days: i64,
) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for lamb in records.iter().filter(|r| r.is_nursing(date, weaning_days)) {
        if let Some(dam) = &lamb.dam_id {
            *counts.entry(dam.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// A paddock (field) on the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddock {
    pub id: String,
    pub name: String,
    /// unit: ha
    pub area_ha: FloatValue,
}

/// Sheep head counts by emission class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockComposition {
    pub ewes: u32,
    pub ewes_lactating: u32,
    pub rams: u32,
    pub lambs: u32,
    pub wethers: u32,
}

impl FlockComposition {
    pub fn total(&self) -> u32 {
        self.ewes + self.ewes_lactating + self.rams + self.lambs + self.wethers
    }

    /// Apportion a bare head count as 60% ewes, 5% rams, 30% lambs and 5%
    /// wethers. Each share is truncated, so the parts may sum to less than
    /// `heads`.
    pub fn from_head_count(heads: u32) -> Self {
        let share = |fraction: FloatValue| (FloatValue::from(heads) * fraction) as u32;
        Self {
            ewes: share(0.6),
            ewes_lactating: 0,
            rams: share(0.05),
            lambs: share(0.30),
            wethers: share(0.05),
        }
    }

    /// Reduce on-farm animal records to class counts on `date`.
    ///
    /// Ewes with at least one nursing lamb count as lactating. Hoggets count
    /// with the adults of their sex; weaners and lambs count as lambs.
    pub fn from_records(records: &[AnimalRecord], date: NaiveDate, weaning_days: i64) -> Self {
        let nursing = nursing_lambs_by_dam(records, date, weaning_days);
        let mut flock = FlockComposition::default();

        for record in records.iter().filter(|r| r.on_farm) {
            match &record.age_class {
                AgeClass::Ewe | AgeClass::MaidenEwe | AgeClass::EweHogget => {
                    if nursing.get(&record.id).copied().unwrap_or(0) > 0 {
                        flock.ewes_lactating += 1;
                    } else {
                        flock.ewes += 1;
                    }
                }
                AgeClass::Ram | AgeClass::RamHogget => flock.rams += 1,
                AgeClass::Wether | AgeClass::WetherHogget => flock.wethers += 1,
                class if class.is_young() => flock.lambs += 1,
                AgeClass::Unknown(raw) => {
                    warn!(animal = %record.id, age_class = %raw, "Unrecognised age class; counting as ewe");
                    flock.ewes += 1;
                }
                _ => flock.ewes += 1,
            }
        }
        flock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn animal(id: &str, class: &str) -> AnimalRecord {
        AnimalRecord {
            id: id.to_string(),
            name: None,
            age_class: AgeClass::parse(class),
            on_farm: true,
            paddock_id: Some("p1".to_string()),
            weight_kg: None,
            dam_id: None,
            birth_date: None,
            wean_date: None,
        }
    }

    fn lamb_of(id: &str, dam: &str, born: NaiveDate) -> AnimalRecord {
        AnimalRecord {
            dam_id: Some(dam.to_string()),
            birth_date: Some(born),
            ..animal(id, "ewe_lamb")
        }
    }

    #[test]
    fn test_age_class_parsing() {
        assert_eq!(AgeClass::parse("Ewe Hogget"), AgeClass::EweHogget);
        assert_eq!(AgeClass::parse("ram-weaner"), AgeClass::RamWeaner);
        assert_eq!(
            AgeClass::parse("alpaca"),
            AgeClass::Unknown("alpaca".to_string())
        );
    }

    #[test]
    fn test_head_count_split_truncates() {
        let flock = FlockComposition::from_head_count(30);
        assert_eq!(flock.ewes, 18);
        assert_eq!(flock.rams, 1);
        assert_eq!(flock.lambs, 9);
        assert_eq!(flock.wethers, 1);
        assert_eq!(flock.total(), 29);
    }

    #[test]
    fn test_wean_date_falls_back_to_birth() {
        let lamb = lamb_of("l1", "e1", date(2024, 3, 1));
        assert_eq!(
            lamb.expected_wean_date(DEFAULT_WEANING_DAYS),
            Some(date(2024, 6, 29))
        );
        assert!(lamb.is_nursing(date(2024, 6, 28), DEFAULT_WEANING_DAYS));
        assert!(!lamb.is_nursing(date(2024, 6, 29), DEFAULT_WEANING_DAYS));
    }

    #[test]
    fn test_lamb_without_dates_is_not_nursing() {
        let lamb = AnimalRecord {
            dam_id: Some("e1".to_string()),
            ..animal("l1", "lamb")
        };
        assert!(!lamb.is_nursing(date(2024, 4, 1), DEFAULT_WEANING_DAYS));
    }

    #[test]
    fn test_flock_from_records() {
        let born = date(2024, 3, 1);
        let mut off_farm = animal("gone", "ewe");
        off_farm.on_farm = false;
        let records = vec![
            animal("e1", "ewe"),
            animal("e2", "ewe"),
            animal("r1", "ram"),
            animal("w1", "wether_hogget"),
            lamb_of("l1", "e1", born),
            lamb_of("l2", "e1", born),
            off_farm,
        ];

        let flock = FlockComposition::from_records(&records, date(2024, 4, 1), DEFAULT_WEANING_DAYS);
        assert_eq!(flock.ewes_lactating, 1);
        assert_eq!(flock.ewes, 1);
        assert_eq!(flock.rams, 1);
        assert_eq!(flock.wethers, 1);
        assert_eq!(flock.lambs, 2);
        assert_eq!(flock.total(), 6);

        let counts = nursing_lambs_by_dam(&records, date(2024, 4, 1), DEFAULT_WEANING_DAYS);
        assert_eq!(counts.get("e1"), Some(&2));
    }
}

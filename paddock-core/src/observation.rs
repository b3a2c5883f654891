//! Observations pushed back to the farm-management system.
//!
//! The models produce values; this module gives them the shape the
//! collaborator expects (plot, date, kind, value) and decides which ones are
//! worth sending by comparing against what the farm already holds.

use crate::timeseries::FloatValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// unit: kg DM/ha/day
    GrowthRate,
    /// unit: kg DM/ha
    StandingDryMatter,
}

impl ObservationKind {
    pub fn unit(&self) -> &'static str {
        match self {
            ObservationKind::GrowthRate => "kg DM/ha/day",
            ObservationKind::StandingDryMatter => "kg DM/ha",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub plot_id: String,
    pub date: NaiveDate,
    pub kind: ObservationKind,
    pub value: FloatValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    New,
    Update,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedObservation {
    pub observation: Observation,
    pub previous: Option<FloatValue>,
    pub status: SyncStatus,
}

/// Label each new observation against the values already held.
///
/// Observations are matched on plot, date and kind. A match whose value
/// differs by no more than `tolerance` is `Unchanged`.
pub fn classify_observations(
    new: &[Observation],
    existing: &[Observation],
    tolerance: FloatValue,
) -> Vec<ClassifiedObservation> {
    let held: HashMap<(&str, NaiveDate, ObservationKind), FloatValue> = existing
        .iter()
        .map(|o| ((o.plot_id.as_str(), o.date, o.kind), o.value))
        .collect();

    new.iter()
        .map(|observation| {
            let previous = held
                .get(&(observation.plot_id.as_str(), observation.date, observation.kind))
                .copied();
            let status = match previous {
                None => SyncStatus::New,
                Some(old) if (observation.value - old).abs() <= tolerance => SyncStatus::Unchanged,
                Some(_) => SyncStatus::Update,
            };
            ClassifiedObservation {
                observation: observation.clone(),
                previous,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(plot: &str, day: u32, value: FloatValue) -> Observation {
        Observation {
            plot_id: plot.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            kind: ObservationKind::GrowthRate,
            value,
        }
    }

    #[test]
    fn test_classification() {
        let existing = vec![obs("a", 1, 40.0), obs("b", 1, 20.0)];
        let new = vec![obs("a", 1, 40.8), obs("b", 1, 25.0), obs("c", 1, 10.0)];

        let classified = classify_observations(&new, &existing, 1.0);
        let statuses: Vec<_> = classified.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![SyncStatus::Unchanged, SyncStatus::Update, SyncStatus::New]
        );
        assert_eq!(classified[1].previous, Some(20.0));
    }

    #[test]
    fn test_kind_is_part_of_the_key() {
        let existing = vec![Observation {
            kind: ObservationKind::StandingDryMatter,
            ..obs("a", 1, 40.0)
        }];
        let classified = classify_observations(&[obs("a", 1, 40.0)], &existing, 1.0);
        assert_eq!(classified[0].status, SyncStatus::New);
    }
}

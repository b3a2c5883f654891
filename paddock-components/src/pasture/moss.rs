//! Moss Ground-Cover Correction
//!
//! Moss stays green through the dormant season and raises NDVI without
//! adding grazeable feed. The fraction of ground covered by moss is removed
//! from NDVI-derived FOO.
//!
//! # What This Component Does
//!
//! 1. Scores drainage from the soil survey (drainage class, then hydrologic
//!    group, else moderate).
//! 2. Computes a seasonality index from NDVI history: how much greener the
//!    May-Jul peak is than the Dec-Feb trough. Evergreen cover scores low.
//! 3. Estimates moss cover from poor drainage plus low seasonality.
//! 4. Resolves the fraction used: a named override always wins, then the
//!    model estimate if enabled, else the flat default.
//!
//! The model estimate is uncalibrated and overestimates, which is why it is
//! disabled by default.

use crate::parameters::MossParameters;
use paddock_core::soil::{DrainageClass, HydrologicGroup, SoilProperties};
use paddock_core::timeseries::FloatValue;
use paddock_core::vegetation::MonthlyNdvi;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Good,
    Limited,
    Insufficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityIndex {
    /// 0 = evergreen, 1 = fully seasonal
    pub value: Option<FloatValue>,
    pub quality: DataQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MossSource {
    Override,
    Model,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MossEstimate {
    pub paddock: String,
    pub seasonality: SeasonalityIndex,
    pub drainage_score: FloatValue,
    pub moss_fraction: FloatValue,
    /// Multiply FOO by this
    pub correction_factor: FloatValue,
    pub source: MossSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MossModel {
    parameters: MossParameters,
}

impl MossModel {
    pub fn new() -> Self {
        Self::from_parameters(MossParameters::default())
    }

    pub fn from_parameters(parameters: MossParameters) -> Self {
        Self { parameters }
    }

    /// Drainage score in [0, 1]: 0 is very poorly drained (moss likely),
    /// 1 is excessively drained.
    pub fn drainage_score(soil: Option<&SoilProperties>) -> FloatValue {
        let Some(soil) = soil else {
            return 0.5;
        };

        let by_class = soil.drainage.as_ref().and_then(|class| match class {
            DrainageClass::VeryPoorly => Some(0.0),
            DrainageClass::Poorly => Some(0.1),
            DrainageClass::SomewhatPoorly => Some(0.3),
            DrainageClass::ModeratelyWell => Some(0.5),
            DrainageClass::Well => Some(0.8),
            DrainageClass::SomewhatExcessively => Some(0.9),
            DrainageClass::Excessively => Some(1.0),
            DrainageClass::Unknown(_) => None,
        });

        let by_group = || {
            soil.hydrologic_group.as_ref().and_then(|group| match group {
                HydrologicGroup::A => Some(1.0),
                HydrologicGroup::AD => Some(0.7),
                HydrologicGroup::B => Some(0.8),
                HydrologicGroup::BD => Some(0.5),
                HydrologicGroup::C => Some(0.4),
                HydrologicGroup::CD => Some(0.3),
                HydrologicGroup::D => Some(0.1),
                HydrologicGroup::Unknown(_) => None,
            })
        };

        by_class.or_else(by_group).unwrap_or(0.5)
    }

    /// Seasonality from monthly NDVI history.
    ///
    /// $$s = \mathrm{clamp}\left(\frac{\overline{NDVI}_{MJJ} - \overline{NDVI}_{DJF}}{\overline{NDVI}_{MJJ}}, 0, 1\right)$$
    ///
    /// Needs at least two valid readings in each season.
    pub fn seasonality_index(history: &[MonthlyNdvi]) -> SeasonalityIndex {
        let insufficient = SeasonalityIndex {
            value: None,
            quality: DataQuality::Insufficient,
        };

        let valid = || {
            history
                .iter()
                .filter_map(|r| r.ndvi_mean.filter(|n| *n >= 0.0).map(|n| (r.month, n)))
        };
        let peak: Vec<_> = valid().filter(|(m, _)| (5..=7).contains(m)).map(|(_, n)| n).collect();
        let trough: Vec<_> = valid().filter(|(m, _)| matches!(m, 12 | 1 | 2)).map(|(_, n)| n).collect();

        if peak.len() < 2 || trough.len() < 2 {
            return insufficient;
        }

        let peak_avg = peak.iter().sum::<FloatValue>() / peak.len() as FloatValue;
        let trough_avg = trough.iter().sum::<FloatValue>() / trough.len() as FloatValue;
        if peak_avg <= 0.0 {
            return insufficient;
        }

        let years: BTreeSet<i32> = history
            .iter()
            .filter(|r| r.ndvi_mean.is_some())
            .map(|r| r.year)
            .collect();
        let quality = if years.len() >= 3 {
            DataQuality::Good
        } else {
            DataQuality::Limited
        };

        SeasonalityIndex {
            value: Some(((peak_avg - trough_avg) / peak_avg).clamp(0.0, 1.0)),
            quality,
        }
    }

    /// Model moss fraction from drainage score and seasonality.
    pub fn estimate_moss_fraction(
        &self,
        seasonality: Option<FloatValue>,
        drainage_score: FloatValue,
    ) -> FloatValue {
        let p = &self.parameters;
        let base = p.base_fraction * (1.0 - drainage_score);

        let modifier = match seasonality {
            Some(s) if s < p.seasonality_reference => {
                p.seasonality_max_modifier * (1.0 - s / p.seasonality_reference)
            }
            Some(_) => 0.0,
            None => p.unknown_seasonality_modifier,
        };

        (base + modifier).clamp(0.0, p.max_fraction)
    }

    /// Moss estimate for one paddock, resolving overrides first.
    pub fn estimate(
        &self,
        paddock: &str,
        history: &[MonthlyNdvi],
        soil: Option<&SoilProperties>,
    ) -> MossEstimate {
        let p = &self.parameters;
        let seasonality = Self::seasonality_index(history);
        let drainage_score = Self::drainage_score(soil);

        let (moss_fraction, source) = if let Some(fraction) = p.overrides.get(paddock) {
            (*fraction, MossSource::Override)
        } else if p.use_model_estimate {
            (
                self.estimate_moss_fraction(seasonality.value, drainage_score),
                MossSource::Model,
            )
        } else {
            (p.default_fraction, MossSource::Default)
        };

        MossEstimate {
            paddock: paddock.to_string(),
            seasonality,
            drainage_score,
            moss_fraction,
            correction_factor: 1.0 - moss_fraction,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn history(values: &[(i32, u32, f64)]) -> Vec<MonthlyNdvi> {
        values
            .iter()
            .map(|(year, month, ndvi)| MonthlyNdvi {
                year: *year,
                month: *month,
                ndvi_mean: Some(*ndvi),
            })
            .collect()
    }

    // ===== Drainage Score Tests =====

    #[test]
    fn test_drainage_score_prefers_class() {
        let soil = SoilProperties {
            drainage: Some(DrainageClass::Poorly),
            hydrologic_group: Some(HydrologicGroup::A),
            ..Default::default()
        };
        assert_eq!(MossModel::drainage_score(Some(&soil)), 0.1);
    }

    #[test]
    fn test_drainage_score_falls_back_to_group() {
        let soil = SoilProperties {
            drainage: Some(DrainageClass::Unknown("n/a".into())),
            hydrologic_group: Some(HydrologicGroup::CD),
            ..Default::default()
        };
        assert_eq!(MossModel::drainage_score(Some(&soil)), 0.3);
        assert_eq!(MossModel::drainage_score(Some(&SoilProperties::default())), 0.5);
        assert_eq!(MossModel::drainage_score(None), 0.5);
    }

    // ===== Seasonality Tests =====

    #[test]
    fn test_seasonality_index() {
        let h = history(&[
            (2022, 1, 0.3),
            (2022, 6, 0.6),
            (2023, 2, 0.3),
            (2023, 7, 0.6),
            (2024, 12, 0.3),
        ]);
        let s = MossModel::seasonality_index(&h);
        assert!(is_close!(s.value.unwrap(), 0.5));
        assert_eq!(s.quality, DataQuality::Good);
    }

    #[test]
    fn test_seasonality_needs_both_seasons() {
        let h = history(&[(2023, 1, 0.3), (2023, 2, 0.3), (2023, 6, 0.6)]);
        let s = MossModel::seasonality_index(&h);
        assert_eq!(s.value, None);
        assert_eq!(s.quality, DataQuality::Insufficient);
    }

    #[test]
    fn test_seasonality_is_clamped() {
        // Greener in winter than summer
        let h = history(&[(2023, 1, 0.7), (2023, 2, 0.7), (2023, 6, 0.4), (2023, 7, 0.4)]);
        let s = MossModel::seasonality_index(&h);
        assert_eq!(s.value, Some(0.0));
        assert_eq!(s.quality, DataQuality::Limited);
    }

    // ===== Fraction Tests =====

    #[test]
    fn test_estimate_moss_fraction() {
        let model = MossModel::new();
        // well drained, typical seasonal grass
        assert!(is_close!(model.estimate_moss_fraction(Some(0.5), 0.8), 0.07));
        // very poorly drained, evergreen: 0.35 + 0.15 capped at 0.40
        assert!(is_close!(model.estimate_moss_fraction(Some(0.0), 0.0), 0.40));
        // unknown seasonality adds 0.05
        assert!(is_close!(model.estimate_moss_fraction(None, 0.5), 0.225));
    }

    #[test]
    fn test_override_beats_model() {
        let mut params = MossParameters::default();
        params.overrides.insert("Solstice Field".to_string(), 0.18);
        params.use_model_estimate = true;
        let model = MossModel::from_parameters(params);

        let e = model.estimate("Solstice Field", &[], None);
        assert_eq!(e.source, MossSource::Override);
        assert!(is_close!(e.correction_factor, 0.82));

        let e = model.estimate("Back Paddock", &[], None);
        assert_eq!(e.source, MossSource::Model);
        assert!(is_close!(e.moss_fraction, 0.225));
    }

    #[test]
    fn test_default_fraction_without_override() {
        let e = MossModel::new().estimate("Back Paddock", &[], None);
        assert_eq!(e.source, MossSource::Default);
        assert!(is_close!(e.moss_fraction, 0.05));
        assert!(is_close!(e.correction_factor, 0.95));
    }
}

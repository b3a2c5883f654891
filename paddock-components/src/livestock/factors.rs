//! Methane Adjustment Factors
//!
//! Diet, breed and climate multipliers applied to the Tier 2 sheep factors.
//! Upstream livestock records are free text, so every category keeps an
//! `Unknown(raw)` variant. Unknown keys are neutral (factor 1.0) and are
//! reported so a report is still produced.
//!
//! # Reference
//!
//! - Forage and additives: Beauchemin et al. (2008); Roque et al. (2021)
//!   for Asparagopsis; Hristov et al. (2015) for 3-NOP.
//! - Breed: relative to a medium-sized crossbred ewe, scaled by mature size
//!   and intake capacity.
//! - Climate: intake rises in the cold and falls under heat stress.

use paddock_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase with spaces and hyphens folded to underscores.
fn normalise_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Implements parsing, display and serde string conversion for a factor
/// category with an `Unknown(String)` variant.
macro_rules! factor_category {
    ($name:ident { $($variant:ident => $key:literal $(| $alias:literal)* : $factor:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            pub fn parse(raw: &str) -> Self {
                match normalise_key(raw).as_str() {
                    $($key $(| $alias)* => $name::$variant,)+
                    _ => $name::Unknown(raw.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $key,)+
                    $name::Unknown(raw) => raw,
                }
            }

            /// Methane multiplier. Unknown keys are neutral.
            pub fn factor(&self) -> FloatValue {
                match self {
                    $($name::$variant => $factor,)+
                    $name::Unknown(_) => 1.0,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name::parse(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

factor_category!(ForageType {
    PastureFresh => "pasture_fresh": 1.0,
    PastureDry => "pasture_dry": 1.05,
    Hay => "hay": 1.08,
    Haylage => "haylage": 0.95,
    Silage => "silage": 0.92,
    GrainSupplement => "grain_supplement": 0.85,
    LegumePasture => "legume_pasture": 0.90,
});

factor_category!(FeedAdditive {
    NoAdditive => "none": 1.0,
    Kelp => "kelp": 0.88,
    Asparagopsis => "asparagopsis": 0.35,
    SeaweedMeal => "seaweed_meal": 0.85,
    Tannins => "tannins": 0.90,
    LipidsOils => "lipids_oils": 0.85,
    Nitrate => "nitrate": 0.80,
    ThreeNop => "3nop" | "3_nop": 0.70,
});

factor_category!(Breed {
    Suffolk => "suffolk": 1.05,
    Hampshire => "hampshire": 1.05,
    Texel => "texel": 1.0,
    Dorset => "dorset": 1.0,
    Corriedale => "corriedale": 1.0,
    Columbia => "columbia": 1.0,
    NorthCountryCheviot => "north_country_cheviot": 0.95,
    Cheviot => "cheviot": 0.95,
    Shetland => "shetland": 0.80,
    Soay => "soay": 0.75,
    Icelandic => "icelandic": 0.85,
    Katahdin => "katahdin": 0.90,
    Dorper => "dorper": 0.95,
    StCroix => "st_croix": 0.85,
    Merino => "merino": 0.90,
    Rambouillet => "rambouillet": 0.92,
    FinnishLandrace => "finnish_landrace" | "finnsheep" | "finn": 0.85,
    EastFriesian => "east_friesian": 1.10,
    Lacaune => "lacaune": 1.05,
    Awassi => "awassi": 1.05,
    BluefacedLeicester => "bluefaced_leicester" | "bfl": 1.0,
    LeicesterLongwool => "leicester_longwool": 1.02,
    Lincoln => "lincoln": 1.05,
    Cotswold => "cotswold": 1.03,
    FirstCross => "1st_cross": 1.0,
    Crossbred => "crossbred": 1.0,
    Mule => "mule": 0.95,
    Unspecified => "unknown": 1.0,
});

factor_category!(ClimateZone {
    Cold => "cold": 1.10,
    Cool => "cool": 1.05,
    Temperate => "temperate": 1.0,
    Warm => "warm": 0.95,
    Hot => "hot": 0.90,
});

/// Cattle production system. The emission factor comes from
/// [`crate::parameters::CattleEmissionFactors`]; unknown types are treated
/// as beef.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CattleType {
    Beef,
    Dairy,
    Unknown(String),
}

impl CattleType {
    pub fn parse(raw: &str) -> Self {
        match normalise_key(raw).as_str() {
            "beef" => CattleType::Beef,
            "dairy" => CattleType::Dairy,
            _ => CattleType::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CattleType::Beef => "beef",
            CattleType::Dairy => "dairy",
            CattleType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for CattleType {
    fn from(raw: String) -> Self {
        CattleType::parse(&raw)
    }
}

impl From<CattleType> for String {
    fn from(value: CattleType) -> Self {
        value.as_str().to_string()
    }
}

/// The diet, breed and climate of a flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionAdjustmentFactors {
    pub forage: ForageType,
    /// Stack multiplicatively
    pub additives: Vec<FeedAdditive>,
    pub breed: Breed,
    pub climate: ClimateZone,
}

impl Default for EmissionAdjustmentFactors {
    fn default() -> Self {
        Self {
            forage: ForageType::PastureFresh,
            additives: Vec::new(),
            breed: Breed::Unspecified,
            climate: ClimateZone::Temperate,
        }
    }
}

impl EmissionAdjustmentFactors {
    pub fn forage_factor(&self) -> FloatValue {
        self.forage.factor()
    }

    pub fn additive_factor(&self) -> FloatValue {
        self.additives.iter().map(FeedAdditive::factor).product()
    }

    pub fn breed_factor(&self) -> FloatValue {
        self.breed.factor()
    }

    pub fn climate_factor(&self) -> FloatValue {
        self.climate.factor()
    }

    /// Product of the forage, additive, breed and climate factors.
    pub fn combined(&self) -> FloatValue {
        self.forage_factor() * self.additive_factor() * self.breed_factor() * self.climate_factor()
    }

    /// Raw strings of every category that was not recognised.
    pub fn unrecognised(&self) -> Vec<(&'static str, String)> {
        let mut keys = Vec::new();
        if let ForageType::Unknown(raw) = &self.forage {
            keys.push(("forage", raw.clone()));
        }
        for additive in &self.additives {
            if let FeedAdditive::Unknown(raw) = additive {
                keys.push(("additive", raw.clone()));
            }
        }
        if let Breed::Unknown(raw) = &self.breed {
            keys.push(("breed", raw.clone()));
        }
        if let ClimateZone::Unknown(raw) = &self.climate {
            keys.push(("climate", raw.clone()));
        }
        keys
    }
}

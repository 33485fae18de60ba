use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::plan::PlanSlug;

/// Plans the recommender can return, in tie-break priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoredPlan {
    Standarte,
    Smart,
    Turbo,
    Ultra,
    Premium,
}

impl ScoredPlan {
    /// Declaration order doubles as the tie-break order: on equal scores
    /// the earlier entry wins.
    pub const ALL: [ScoredPlan; 5] =
        [Self::Standarte, Self::Smart, Self::Turbo, Self::Ultra, Self::Premium];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Standarte => "standarte",
            Self::Smart => "smart",
            Self::Turbo => "turbo",
            Self::Ultra => "ultra",
            Self::Premium => "premium",
        }
    }

    pub fn plan_slug(self) -> PlanSlug {
        PlanSlug::from(self.slug())
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScoredPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// How many people share the connection most of the time.
///
/// Parsing never fails: an empty value is `Unspecified` and anything the
/// form does not offer is kept as `Unrecognized` and scored like it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HouseholdSize {
    #[default]
    Unspecified,
    OneToThree,
    FourToSeven,
    EightPlus,
    Premium,
    Biznes,
    Unrecognized(String),
}

impl HouseholdSize {
    /// Exact match against the form values; padded input such as
    /// `" premium"` is unrecognised and scores like an unanswered question.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => Self::Unspecified,
            "1-3" => Self::OneToThree,
            "4-7" => Self::FourToSeven,
            "8+" => Self::EightPlus,
            "premium" => Self::Premium,
            "biznes" => Self::Biznes,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "",
            Self::OneToThree => "1-3",
            Self::FourToSeven => "4-7",
            Self::EightPlus => "8+",
            Self::Premium => "premium",
            Self::Biznes => "biznes",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Premium and business households skip device scoring entirely.
    pub fn overrides_devices(&self) -> bool {
        matches!(self, Self::Premium | Self::Biznes)
    }
}

impl From<String> for HouseholdSize {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for HouseholdSize {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<HouseholdSize> for String {
    fn from(value: HouseholdSize) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceFlags {
    /// PlayStation / Xbox.
    pub gaming: bool,
    #[serde(rename = "tvAndPc", alias = "tvpc")]
    pub tv_and_pc: bool,
    /// Cameras and other connected devices.
    pub camera: bool,
}

impl DeviceFlags {
    pub fn any(&self) -> bool {
        self.gaming || self.tv_and_pc || self.camera
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Questionnaire {
    pub household: HouseholdSize,
    pub devices: DeviceFlags,
}

impl Questionnaire {
    pub fn new(household: impl Into<HouseholdSize>, devices: DeviceFlags) -> Self {
        Self { household: household.into(), devices }
    }

    /// Nothing chosen at all; the recommender answers `smart`.
    pub fn is_blank(&self) -> bool {
        self.household == HouseholdSize::Unspecified && !self.devices.any()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanScore {
    pub plan: ScoredPlan,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub plan: ScoredPlan,
    /// Final score table in tie-break order. Holds the untouched baseline
    /// when `overridden` is set.
    pub scores: Vec<PlanScore>,
    pub overridden: bool,
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for a rated or rating account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Peer feedback left after a date. Owned by the rating workflow; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub rater: SubjectId,
    pub ratee: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_and_respect: Option<SafetyAndRespect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consideration: Option<Consideration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualities: Option<Qualities>,
    #[serde(default)]
    pub did_not_show_up: bool,
    #[serde(default)]
    pub cancelled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyAndRespect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub made_me_feel_safe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_described_in_profile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respectful_of_boundaries: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consideration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attentive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_manners: Option<bool>,
    /// Collected by the rating form but not scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communicated_clearly: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dressed_well: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smelled_nice: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_energy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charming_smile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athletic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_drive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_to_anything: Option<bool>,
}

/// Sections of the rating form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingSection {
    SafetyAndRespect,
    Consideration,
    Qualities,
}

/// Every boolean answer on the rating form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingField {
    MadeMeFeelSafe,
    AsDescribedInProfile,
    RespectfulOfBoundaries,
    OnTime,
    Attentive,
    GoodManners,
    CommunicatedClearly,
    DressedWell,
    SmelledNice,
    GoodEnergy,
    CharmingSmile,
    Athletic,
    CompetitiveDrive,
    OpenToAnything,
}

impl RatingField {
    pub const SAFETY: [Self; 3] = [
        Self::MadeMeFeelSafe,
        Self::AsDescribedInProfile,
        Self::RespectfulOfBoundaries,
    ];

    pub const fn section(self) -> RatingSection {
        match self {
            Self::MadeMeFeelSafe | Self::AsDescribedInProfile | Self::RespectfulOfBoundaries => {
                RatingSection::SafetyAndRespect
            }
            Self::OnTime | Self::Attentive | Self::GoodManners | Self::CommunicatedClearly => {
                RatingSection::Consideration
            }
            Self::DressedWell
            | Self::SmelledNice
            | Self::GoodEnergy
            | Self::CharmingSmile
            | Self::Athletic
            | Self::CompetitiveDrive
            | Self::OpenToAnything => RatingSection::Qualities,
        }
    }

    /// Column / JSON key used by exports.
    pub const fn key(self) -> &'static str {
        match self {
            Self::MadeMeFeelSafe => "madeMeFeelSafe",
            Self::AsDescribedInProfile => "asDescribedInProfile",
            Self::RespectfulOfBoundaries => "respectfulOfBoundaries",
            Self::OnTime => "onTime",
            Self::Attentive => "attentive",
            Self::GoodManners => "goodManners",
            Self::CommunicatedClearly => "communicatedClearly",
            Self::DressedWell => "dressedWell",
            Self::SmelledNice => "smelledNice",
            Self::GoodEnergy => "goodEnergy",
            Self::CharmingSmile => "charmingSmile",
            Self::Athletic => "athletic",
            Self::CompetitiveDrive => "competitiveDrive",
            Self::OpenToAnything => "openToAnything",
        }
    }

    pub const fn all() -> [Self; 14] {
        [
            Self::MadeMeFeelSafe,
            Self::AsDescribedInProfile,
            Self::RespectfulOfBoundaries,
            Self::OnTime,
            Self::Attentive,
            Self::GoodManners,
            Self::CommunicatedClearly,
            Self::DressedWell,
            Self::SmelledNice,
            Self::GoodEnergy,
            Self::CharmingSmile,
            Self::Athletic,
            Self::CompetitiveDrive,
            Self::OpenToAnything,
        ]
    }
}

impl RatingRecord {
    /// True for no-shows and cancellations, which never feed positive scoring.
    pub fn is_excluded(&self) -> bool {
        self.did_not_show_up || self.cancelled
    }

    /// Answer for a single field; `None` when either the section or the field was left out.
    pub fn field(&self, field: RatingField) -> Option<bool> {
        match field.section() {
            RatingSection::SafetyAndRespect => {
                let section = self.safety_and_respect.as_ref()?;
                match field {
                    RatingField::MadeMeFeelSafe => section.made_me_feel_safe,
                    RatingField::AsDescribedInProfile => section.as_described_in_profile,
                    _ => section.respectful_of_boundaries,
                }
            }
            RatingSection::Consideration => {
                let section = self.consideration.as_ref()?;
                match field {
                    RatingField::OnTime => section.on_time,
                    RatingField::Attentive => section.attentive,
                    RatingField::GoodManners => section.good_manners,
                    _ => section.communicated_clearly,
                }
            }
            RatingSection::Qualities => {
                let section = self.qualities.as_ref()?;
                match field {
                    RatingField::DressedWell => section.dressed_well,
                    RatingField::SmelledNice => section.smelled_nice,
                    RatingField::GoodEnergy => section.good_energy,
                    RatingField::CharmingSmile => section.charming_smile,
                    RatingField::Athletic => section.athletic,
                    RatingField::CompetitiveDrive => section.competitive_drive,
                    _ => section.open_to_anything,
                }
            }
        }
    }

    /// Percentage of answered fields that are `true`, or `None` when none were answered.
    pub(crate) fn true_percentage(&self, fields: &[RatingField]) -> Option<f64> {
        let (answered, positive) = tally(std::iter::once(self), fields);
        (answered > 0).then(|| positive as f64 / answered as f64 * 100.0)
    }
}

/// Count answered and `true` fields across a set of ratings.
pub(crate) fn tally<'a, I>(ratings: I, fields: &[RatingField]) -> (usize, usize)
where
    I: IntoIterator<Item = &'a RatingRecord>,
{
    ratings
        .into_iter()
        .flat_map(|rating| fields.iter().filter_map(move |field| rating.field(*field)))
        .fold((0, 0), |(answered, positive), value| {
            (answered + 1, positive + usize::from(value))
        })
}

/// A record that `blocker` no longer wants contact with `blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub blocker: SubjectId,
    pub blocked: SubjectId,
    pub created_at: DateTime<Utc>,
}

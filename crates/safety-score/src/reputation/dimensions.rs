use super::config::ReputationConfig;
use super::domain::{RatingField, RatingRecord};
use super::outcome::DimensionalScores;

/// Weighted sub-score aggregating a fixed subset of rating answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dimension {
    PhysicalSafety,
    Trustworthiness,
    Reliability,
    Respectfulness,
}

impl Dimension {
    pub(crate) const fn ordered() -> [Self; 4] {
        [
            Self::PhysicalSafety,
            Self::Trustworthiness,
            Self::Reliability,
            Self::Respectfulness,
        ]
    }

    pub(crate) fn fields(self) -> &'static [RatingField] {
        match self {
            Self::PhysicalSafety => &[
                RatingField::MadeMeFeelSafe,
                RatingField::RespectfulOfBoundaries,
            ],
            Self::Trustworthiness => &[RatingField::AsDescribedInProfile],
            Self::Reliability => &[RatingField::OnTime, RatingField::GoodManners],
            Self::Respectfulness => &[RatingField::Attentive],
        }
    }

    fn weight(self, config: &ReputationConfig) -> f64 {
        match self {
            Self::PhysicalSafety => config.physical_safety_weight,
            Self::Trustworthiness => config.trustworthiness_weight,
            Self::Reliability => config.reliability_weight,
            Self::Respectfulness => config.respectfulness_weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DimensionSummary {
    pub scores: DimensionalScores,
    pub weighted_score: f64,
    /// Largest per-dimension contributor count, used as the effective sample size.
    pub total_valid_ratings: usize,
}

/// Average each dimension over the ratings that answered at least one of its fields.
pub(crate) fn score_dimensions(
    qualifying: &[&RatingRecord],
    config: &ReputationConfig,
) -> DimensionSummary {
    let mut scores = DimensionalScores::default();
    let mut weighted_score = 0.0;
    let mut total_valid_ratings = 0;

    for dimension in Dimension::ordered() {
        let (score, contributors) = dimension_score(qualifying, dimension.fields());
        match dimension {
            Dimension::PhysicalSafety => scores.physical_safety = score,
            Dimension::Trustworthiness => scores.trustworthiness = score,
            Dimension::Reliability => scores.reliability = score,
            Dimension::Respectfulness => scores.respectfulness = score,
        }
        weighted_score += score * dimension.weight(config);
        total_valid_ratings = total_valid_ratings.max(contributors);
    }

    DimensionSummary {
        scores,
        weighted_score,
        total_valid_ratings,
    }
}

fn dimension_score(qualifying: &[&RatingRecord], fields: &[RatingField]) -> (f64, usize) {
    let percentages: Vec<f64> = qualifying
        .iter()
        .filter_map(|rating| rating.true_percentage(fields))
        .collect();

    if percentages.is_empty() {
        return (0.0, 0);
    }

    let average = percentages.iter().sum::<f64>() / percentages.len() as f64;
    (average, percentages.len())
}

use super::domain::{RatingField, RatingRecord};
use super::outcome::ConfidenceLevel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ConfidenceAssessment {
    pub level: ConfidenceLevel,
    pub consistency_score: f64,
}

/// Classify how much weight the sample can bear from its size and the spread of safety answers.
pub(crate) fn assess_confidence(
    qualifying: &[&RatingRecord],
    total_valid_ratings: usize,
) -> ConfidenceAssessment {
    let percentages: Vec<f64> = qualifying
        .iter()
        .filter_map(|rating| rating.true_percentage(&RatingField::SAFETY))
        .collect();

    let consistency_score = (100.0 - standard_deviation(&percentages)).max(0.0);
    let level = classify(total_valid_ratings, consistency_score);

    ConfidenceAssessment {
        level,
        consistency_score,
    }
}

fn classify(valid_count: usize, consistency: f64) -> ConfidenceLevel {
    if valid_count >= 10 && consistency >= 70.0 {
        ConfidenceLevel::High
    } else if valid_count >= 6 && consistency >= 60.0 {
        ConfidenceLevel::Moderate
    } else if valid_count >= 3 && consistency >= 40.0 {
        ConfidenceLevel::Low
    } else {
        ConfidenceLevel::VeryLow
    }
}

/// Population standard deviation; zero for fewer than two samples.
fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

/// Pull sparse or inconsistent evidence back toward a conservative ceiling.
pub(crate) fn dampen(score: i64, level: ConfidenceLevel) -> i64 {
    match level {
        ConfidenceLevel::Low if score > 70 => (score - 10).max(70),
        ConfidenceLevel::VeryLow if score > 60 => (score - 15).max(60),
        _ => score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::tests::common::safety_only;

    #[test]
    fn standard_deviation_is_population_based() {
        assert_eq!(standard_deviation(&[]), 0.0);
        assert_eq!(standard_deviation(&[42.0]), 0.0);
        assert!((standard_deviation(&[0.0, 100.0]) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn consistent_large_sample_is_high_confidence() {
        let ratings: Vec<_> = (0..10).map(|day| safety_only(day, true, true, true)).collect();
        let refs: Vec<_> = ratings.iter().collect();

        let assessment = assess_confidence(&refs, 10);

        assert_eq!(assessment.level, ConfidenceLevel::High);
        assert_eq!(assessment.consistency_score, 100.0);
    }

    #[test]
    fn polarized_answers_drop_confidence() {
        let ratings: Vec<_> = (0..10)
            .map(|day| {
                let positive = day % 2 == 0;
                safety_only(day, positive, positive, positive)
            })
            .collect();
        let refs: Vec<_> = ratings.iter().collect();

        let assessment = assess_confidence(&refs, 10);

        assert!((assessment.consistency_score - 50.0).abs() < 1e-9);
        assert_eq!(assessment.level, ConfidenceLevel::Low);
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify(10, 70.0), ConfidenceLevel::High);
        assert_eq!(classify(9, 100.0), ConfidenceLevel::Moderate);
        assert_eq!(classify(6, 60.0), ConfidenceLevel::Moderate);
        assert_eq!(classify(6, 59.9), ConfidenceLevel::Low);
        assert_eq!(classify(3, 40.0), ConfidenceLevel::Low);
        assert_eq!(classify(2, 100.0), ConfidenceLevel::VeryLow);
        assert_eq!(classify(20, 10.0), ConfidenceLevel::VeryLow);
    }

    #[test]
    fn dampening_only_applies_to_sparse_evidence() {
        assert_eq!(dampen(90, ConfidenceLevel::VeryLow), 75);
        assert_eq!(dampen(70, ConfidenceLevel::VeryLow), 60);
        assert_eq!(dampen(60, ConfidenceLevel::VeryLow), 60);
        assert_eq!(dampen(90, ConfidenceLevel::Low), 80);
        assert_eq!(dampen(75, ConfidenceLevel::Low), 70);
        assert_eq!(dampen(70, ConfidenceLevel::Low), 70);
        assert_eq!(dampen(95, ConfidenceLevel::Moderate), 95);
        assert_eq!(dampen(95, ConfidenceLevel::High), 95);
    }
}

use super::config::ReputationConfig;
use super::domain::{tally, RatingField, RatingRecord};
use super::outcome::{Trend, TrendAnalysis};

/// Compare the safety answers of the older half of the history against the recent half.
///
/// `qualifying` must be in ascending `createdAt` order.
pub(crate) fn analyze_trend(
    qualifying: &[&RatingRecord],
    config: &ReputationConfig,
) -> TrendAnalysis {
    if qualifying.len() < 4 {
        return TrendAnalysis::insufficient();
    }

    let (older, recent) = qualifying.split_at(qualifying.len() / 2);
    let improvement = half_score(recent) - half_score(older);

    let trend = if improvement > config.trend_threshold {
        Trend::Improving
    } else if improvement < -config.trend_threshold {
        Trend::Declining
    } else {
        Trend::Stable
    };

    TrendAnalysis { trend, improvement }
}

fn half_score(ratings: &[&RatingRecord]) -> f64 {
    let (answered, positive) = tally(ratings.iter().copied(), &RatingField::SAFETY);
    if answered == 0 {
        0.0
    } else {
        positive as f64 / answered as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::tests::common::safety_only;

    fn analyze(ratings: &[RatingRecord]) -> TrendAnalysis {
        let refs: Vec<_> = ratings.iter().collect();
        analyze_trend(&refs, &ReputationConfig::standard())
    }

    #[test]
    fn fewer_than_four_ratings_is_insufficient() {
        let ratings: Vec<_> = (0..3).map(|day| safety_only(day, true, true, true)).collect();
        assert_eq!(analyze(&ratings), TrendAnalysis::insufficient());
    }

    #[test]
    fn positive_older_half_and_negative_recent_half_is_declining() {
        let ratings = vec![
            safety_only(0, true, true, true),
            safety_only(1, true, true, true),
            safety_only(2, false, false, false),
            safety_only(3, false, false, false),
        ];
        let analysis = analyze(&ratings);
        assert_eq!(analysis.trend, Trend::Declining);
        assert_eq!(analysis.improvement, -100.0);
    }

    #[test]
    fn negative_older_half_and_positive_recent_half_is_improving() {
        let ratings = vec![
            safety_only(0, false, false, false),
            safety_only(1, false, false, false),
            safety_only(2, true, true, true),
            safety_only(3, true, true, true),
        ];
        let analysis = analyze(&ratings);
        assert_eq!(analysis.trend, Trend::Improving);
        assert_eq!(analysis.improvement, 100.0);
    }

    #[test]
    fn odd_counts_put_the_extra_rating_in_the_recent_half() {
        let ratings = vec![
            safety_only(0, true, true, true),
            safety_only(1, true, true, true),
            safety_only(2, true, true, true),
            safety_only(3, true, true, false),
            safety_only(4, true, true, true),
        ];
        let analysis = analyze(&ratings);
        assert!((analysis.improvement - (800.0 / 9.0 - 100.0)).abs() < 1e-9);
        assert_eq!(analysis.trend, Trend::Stable);
    }
}

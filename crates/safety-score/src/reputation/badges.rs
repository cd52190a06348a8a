use super::config::ReputationConfig;
use super::domain::{RatingField, RatingRecord};
use super::outcome::{ConfidenceLevel, DimensionalScores, Trend, TrendAnalysis};

/// Everything a badge rule may look at once the score is final.
pub(crate) struct BadgeContext<'a> {
    pub score: u8,
    pub confidence: ConfidenceLevel,
    pub dimensions: &'a DimensionalScores,
    pub trend: &'a TrendAnalysis,
    pub blocked_count: u32,
    pub qualifying: &'a [&'a RatingRecord],
    pub config: &'a ReputationConfig,
}

type BadgeRule = fn(&BadgeContext<'_>) -> Vec<&'static str>;

/// Evaluation order is the order labels appear on the profile.
const BADGE_RULES: [BadgeRule; 8] = [
    block_badges,
    safety_tier_badges,
    dimension_badges,
    trend_badges,
    established_badges,
    consideration_badges,
    quality_badges,
    experience_badges,
];

const CONSIDERATION_BADGES: [(RatingField, &str); 3] = [
    (RatingField::OnTime, "Punctual"),
    (RatingField::Attentive, "Attentive"),
    (RatingField::GoodManners, "Well-mannered"),
];

const QUALITY_BADGES: [(RatingField, &str); 7] = [
    (RatingField::DressedWell, "Sharp Dresser"),
    (RatingField::SmelledNice, "Smells Great"),
    (RatingField::GoodEnergy, "Great Energy"),
    (RatingField::CharmingSmile, "Charming Smile"),
    (RatingField::Athletic, "Athletic"),
    (RatingField::CompetitiveDrive, "Competitive Spirit"),
    (RatingField::OpenToAnything, "Adventurous"),
];

pub(crate) fn assemble_badges(context: &BadgeContext<'_>) -> Vec<String> {
    BADGE_RULES
        .iter()
        .flat_map(|rule| rule(context))
        .map(str::to_string)
        .collect()
}

fn block_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    match context.blocked_count {
        count if count >= 10 => vec!["Multiple Blocks"],
        count if count >= 5 => vec!["Several Blocks"],
        count if count >= 3 => vec!["Some Blocks"],
        _ => Vec::new(),
    }
}

fn safety_tier_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    let confidence = context.confidence.score();
    match context.score {
        score if score >= 90 && confidence >= 75 => vec!["Highly Trusted"],
        score if score >= 80 && confidence >= 60 => vec!["Trusted"],
        score if score >= 70 => vec!["Generally Safe"],
        score if score < 50 => vec!["Safety Concerns"],
        _ => Vec::new(),
    }
}

fn dimension_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    let dimensions = context.dimensions;
    [
        (dimensions.physical_safety, "Physical Safety Expert"),
        (dimensions.trustworthiness, "Completely Authentic"),
        (dimensions.reliability, "Ultra Reliable"),
    ]
    .into_iter()
    .filter(|(score, _)| *score >= 95.0)
    .map(|(_, label)| label)
    .collect()
}

fn trend_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    match context.trend.trend {
        Trend::Improving
            if context.trend.improvement >= context.config.rapid_improvement_threshold =>
        {
            vec!["Rapidly Improving"]
        }
        Trend::Improving => vec!["Getting Better"],
        _ => Vec::new(),
    }
}

fn established_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    if context.confidence == ConfidenceLevel::High && context.score >= 75 {
        vec!["Well-Established"]
    } else {
        Vec::new()
    }
}

fn consideration_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    earned_by_ratio(
        context,
        &CONSIDERATION_BADGES,
        context.config.consideration_badge_ratio,
    )
}

fn quality_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    earned_by_ratio(context, &QUALITY_BADGES, context.config.quality_badge_ratio)
}

/// Share of every qualifying rating (answered or not) that marked the field `true`.
fn earned_by_ratio(
    context: &BadgeContext<'_>,
    badges: &[(RatingField, &'static str)],
    threshold: f64,
) -> Vec<&'static str> {
    let total = context.qualifying.len();
    if total == 0 {
        return Vec::new();
    }

    badges
        .iter()
        .filter(|(field, _)| {
            let positive = context
                .qualifying
                .iter()
                .filter(|rating| rating.field(*field) == Some(true))
                .count();
            positive as f64 / total as f64 >= threshold
        })
        .map(|(_, label)| *label)
        .collect()
}

fn experience_badges(context: &BadgeContext<'_>) -> Vec<&'static str> {
    let count = context.qualifying.len();
    if count >= context.config.veteran_min_ratings {
        vec!["Veteran"]
    } else if count >= context.config.experienced_min_ratings {
        vec!["Experienced"]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::tests::common::{positive_rating, safety_only};

    struct Fixture {
        dimensions: DimensionalScores,
        trend: TrendAnalysis,
        config: ReputationConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dimensions: DimensionalScores::default(),
                trend: TrendAnalysis::insufficient(),
                config: ReputationConfig::standard(),
            }
        }

        fn context<'a>(
            &'a self,
            score: u8,
            confidence: ConfidenceLevel,
            blocked_count: u32,
            qualifying: &'a [&'a RatingRecord],
        ) -> BadgeContext<'a> {
            BadgeContext {
                score,
                confidence,
                dimensions: &self.dimensions,
                trend: &self.trend,
                blocked_count,
                qualifying,
                config: &self.config,
            }
        }
    }

    #[test]
    fn block_badges_pick_highest_threshold() {
        let fixture = Fixture::new();
        let cases = [
            (2, None),
            (3, Some("Some Blocks")),
            (5, Some("Several Blocks")),
            (12, Some("Multiple Blocks")),
        ];
        for (count, expected) in cases {
            let badges = block_badges(&fixture.context(60, ConfidenceLevel::Low, count, &[]));
            assert_eq!(badges.first().copied(), expected, "blocked count {count}");
            assert!(badges.len() <= 1);
        }
    }

    #[test]
    fn safety_tiers_respect_confidence() {
        let fixture = Fixture::new();
        let tier =
            |score, confidence| safety_tier_badges(&fixture.context(score, confidence, 0, &[]));

        assert_eq!(tier(95, ConfidenceLevel::High), vec!["Highly Trusted"]);
        assert_eq!(tier(95, ConfidenceLevel::Moderate), vec!["Highly Trusted"]);
        assert_eq!(tier(95, ConfidenceLevel::Low), vec!["Trusted"]);
        assert_eq!(tier(95, ConfidenceLevel::VeryLow), vec!["Generally Safe"]);
        assert_eq!(tier(60, ConfidenceLevel::High), Vec::<&str>::new());
        assert_eq!(tier(49, ConfidenceLevel::High), vec!["Safety Concerns"]);
    }

    #[test]
    fn trend_badges_distinguish_rapid_improvement() {
        let mut fixture = Fixture::new();
        fixture.trend = TrendAnalysis {
            trend: Trend::Improving,
            improvement: 20.0,
        };
        assert_eq!(
            trend_badges(&fixture.context(80, ConfidenceLevel::High, 0, &[])),
            vec!["Rapidly Improving"]
        );

        fixture.trend.improvement = 16.0;
        assert_eq!(
            trend_badges(&fixture.context(80, ConfidenceLevel::High, 0, &[])),
            vec!["Getting Better"]
        );

        fixture.trend = TrendAnalysis {
            trend: Trend::Declining,
            improvement: -40.0,
        };
        assert!(trend_badges(&fixture.context(80, ConfidenceLevel::High, 0, &[])).is_empty());
    }

    #[test]
    fn consideration_ratio_counts_unanswered_ratings_in_denominator() {
        let fixture = Fixture::new();
        let mut ratings: Vec<_> = (0..4).map(positive_rating).collect();
        ratings.push(safety_only(4, true, true, true));
        let refs: Vec<_> = ratings.iter().collect();

        let badges = consideration_badges(&fixture.context(90, ConfidenceLevel::High, 0, &refs));
        assert_eq!(badges, vec!["Punctual", "Attentive", "Well-mannered"]);

        ratings.push(safety_only(5, true, true, true));
        let refs: Vec<_> = ratings.iter().collect();
        let badges = consideration_badges(&fixture.context(90, ConfidenceLevel::High, 0, &refs));
        assert!(badges.is_empty(), "4/6 is below the 80% bar");
    }

    #[test]
    fn quality_badges_use_lower_threshold() {
        let fixture = Fixture::new();
        let mut ratings: Vec<_> = (0..3).map(positive_rating).collect();
        ratings.push(safety_only(3, true, true, true));
        let refs: Vec<_> = ratings.iter().collect();

        let badges = quality_badges(&fixture.context(90, ConfidenceLevel::High, 0, &refs));
        assert_eq!(badges.len(), QUALITY_BADGES.len());
        assert_eq!(badges[0], "Sharp Dresser");
    }

    #[test]
    fn experience_badges_are_exclusive() {
        let fixture = Fixture::new();
        let ratings: Vec<_> = (0..15).map(positive_rating).collect();
        let refs: Vec<_> = ratings.iter().collect();

        assert_eq!(
            experience_badges(&fixture.context(90, ConfidenceLevel::High, 0, &refs)),
            vec!["Veteran"]
        );
        assert_eq!(
            experience_badges(&fixture.context(90, ConfidenceLevel::High, 0, &refs[..8])),
            vec!["Experienced"]
        );
        assert!(
            experience_badges(&fixture.context(90, ConfidenceLevel::High, 0, &refs[..7]))
                .is_empty()
        );
    }

    #[test]
    fn assembly_preserves_rule_order() {
        let mut fixture = Fixture::new();
        fixture.dimensions.physical_safety = 100.0;
        let ratings: Vec<_> = (0..8).map(positive_rating).collect();
        let refs: Vec<_> = ratings.iter().collect();

        let badges = assemble_badges(&fixture.context(40, ConfidenceLevel::Moderate, 4, &refs));

        assert_eq!(badges[0], "Some Blocks");
        assert_eq!(badges[1], "Safety Concerns");
        assert_eq!(badges[2], "Physical Safety Expert");
        assert_eq!(badges.last().map(String::as_str), Some("Experienced"));
    }
}

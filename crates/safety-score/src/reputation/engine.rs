use chrono::{DateTime, Utc};
use tracing::debug;

use super::badges::{assemble_badges, BadgeContext};
use super::blocks::blocked_penalty;
use super::confidence::{assess_confidence, dampen};
use super::config::ReputationConfig;
use super::dimensions::score_dimensions;
use super::domain::RatingRecord;
use super::outcome::{ReputationResult, SafetyMetadata};
use super::risk::detect_risk_patterns;
use super::trend::analyze_trend;

/// Stateless scorer turning a subject's full rating history into a [`ReputationResult`].
#[derive(Debug, Clone, Default)]
pub struct ReputationEngine {
    config: ReputationConfig,
}

impl ReputationEngine {
    pub fn new(config: ReputationConfig) -> Self {
        Self { config }
    }

    /// Score `ratings` (every rating where the subject is the ratee) and stamp the result with now.
    pub fn compute(&self, ratings: &[RatingRecord], blocked_count: u32) -> ReputationResult {
        self.compute_at(ratings, blocked_count, Utc::now())
    }

    pub fn compute_at(
        &self,
        ratings: &[RatingRecord],
        blocked_count: u32,
        now: DateTime<Utc>,
    ) -> ReputationResult {
        if ratings.is_empty() {
            return ReputationResult::unrated();
        }

        let mut ordered: Vec<&RatingRecord> = ratings.iter().collect();
        ordered.sort_by_key(|rating| rating.created_at);
        let qualifying: Vec<&RatingRecord> = ordered
            .into_iter()
            .filter(|rating| !rating.is_excluded())
            .collect();

        let dimensions = score_dimensions(&qualifying, &self.config);
        let confidence = assess_confidence(&qualifying, dimensions.total_valid_ratings);

        // Order matters: each step clamps before the next subtracts.
        let mut score = dampen(dimensions.weighted_score.round() as i64, confidence.level);

        let risk = detect_risk_patterns(ratings, &qualifying, &self.config);
        score = (score - risk.penalty).max(0);

        let block_penalty = blocked_penalty(blocked_count, &self.config);
        let safety_score = (score as f64 - block_penalty).max(0.0).round().min(100.0) as u8;

        let trend = analyze_trend(&qualifying, &self.config);

        let badges = assemble_badges(&BadgeContext {
            score: safety_score,
            confidence: confidence.level,
            dimensions: &dimensions.scores,
            trend: &trend,
            blocked_count,
            qualifying: &qualifying,
            config: &self.config,
        });

        debug!(
            ratings = ratings.len(),
            sample_size = dimensions.total_valid_ratings,
            confidence = confidence.level.label(),
            consistency = confidence.consistency_score,
            risk_flags = risk.flags.len(),
            blocked_count,
            safety_score,
            "computed reputation"
        );

        ReputationResult {
            safety_score,
            badges,
            safety_metadata: Some(SafetyMetadata {
                confidence: confidence.level,
                sample_size: dimensions.total_valid_ratings,
                dimensional_scores: dimensions.scores,
                risk_flags: risk.flags,
                trend_analysis: trend,
                blocked_count,
                blocked_penalty: block_penalty,
                last_calculated: now,
            }),
        }
    }
}

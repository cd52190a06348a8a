use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::ReputationConfig;
use super::domain::{
    BlockRecord, Consideration, Qualities, RatingRecord, SafetyAndRespect, SubjectId,
};
use super::engine::ReputationEngine;
use super::repository::{
    BlockRepository, ProfileSafetyStats, ProfileStatsRepository, RatingRepository,
    RepositoryError,
};

/// Incoming rating as submitted after a date; `created_at` defaults to the time of receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmission {
    pub rater: SubjectId,
    pub ratee: SubjectId,
    #[serde(default)]
    pub safety_and_respect: Option<SafetyAndRespect>,
    #[serde(default)]
    pub consideration: Option<Consideration>,
    #[serde(default)]
    pub qualities: Option<Qualities>,
    #[serde(default)]
    pub did_not_show_up: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RatingSubmission {
    fn into_record(self, received_at: DateTime<Utc>) -> RatingRecord {
        RatingRecord {
            rater: self.rater,
            ratee: self.ratee,
            safety_and_respect: self.safety_and_respect,
            consideration: self.consideration,
            qualities: self.qualities,
            did_not_show_up: self.did_not_show_up,
            cancelled: self.cancelled,
            created_at: self.created_at.unwrap_or(received_at),
        }
    }
}

/// Result of recording a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockOutcome {
    pub blocked: SubjectId,
    pub blocked_count: u32,
    /// Refreshed stats, present only when the blocked subject has rating history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ProfileSafetyStats>,
}

/// Totals from a full recomputation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReseedSummary {
    pub recalculated: usize,
    pub failures: Vec<(SubjectId, String)>,
}

/// Rating-submission and maintenance workflow around the engine.
pub struct ReputationService<R, B, P> {
    ratings: Arc<R>,
    blocks: Arc<B>,
    profiles: Arc<P>,
    engine: Arc<ReputationEngine>,
}

impl<R, B, P> ReputationService<R, B, P>
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    pub fn new(
        ratings: Arc<R>,
        blocks: Arc<B>,
        profiles: Arc<P>,
        config: ReputationConfig,
    ) -> Self {
        Self {
            ratings,
            blocks,
            profiles,
            engine: Arc::new(ReputationEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &ReputationEngine {
        &self.engine
    }

    /// Store a rating and refresh the ratee's stats.
    pub fn submit_rating(
        &self,
        submission: RatingSubmission,
    ) -> Result<ProfileSafetyStats, ReputationServiceError> {
        if submission.rater == submission.ratee {
            return Err(ReputationServiceError::SelfRating);
        }

        // Fast path only; the repository insert is the authoritative duplicate check.
        let history = self.ratings.ratings_for(&submission.ratee)?;
        if history.iter().any(|rating| rating.rater == submission.rater) {
            return Err(RepositoryError::Conflict.into());
        }

        let stored = self.ratings.insert(submission.into_record(Utc::now()))?;
        info!(rater = %stored.rater, ratee = %stored.ratee, "rating recorded");

        self.recalculate(&stored.ratee)
    }

    /// Store a block; stats are refreshed only for subjects that already have ratings.
    pub fn record_block(
        &self,
        blocker: SubjectId,
        blocked: SubjectId,
    ) -> Result<BlockOutcome, ReputationServiceError> {
        if blocker == blocked {
            return Err(ReputationServiceError::SelfBlock);
        }

        self.blocks.insert(BlockRecord {
            blocker,
            blocked: blocked.clone(),
            created_at: Utc::now(),
        })?;
        let blocked_count = self.blocks.blocked_count(&blocked)?;
        info!(%blocked, blocked_count, "block recorded");

        let stats = if self.ratings.ratings_for(&blocked)?.is_empty() {
            None
        } else {
            Some(self.recalculate(&blocked)?)
        };

        Ok(BlockOutcome {
            blocked,
            blocked_count,
            stats,
        })
    }

    /// Recompute a subject from its complete history and persist the result.
    pub fn recalculate(
        &self,
        subject: &SubjectId,
    ) -> Result<ProfileSafetyStats, ReputationServiceError> {
        let ratings = self.ratings.ratings_for(subject)?;
        let blocked_count = self.blocks.blocked_count(subject)?;
        let result = self.engine.compute(&ratings, blocked_count);

        let stats = ProfileSafetyStats {
            subject: subject.clone(),
            result,
        };
        self.profiles.upsert(stats.clone())?;

        info!(
            %subject,
            safety_score = stats.result.safety_score,
            badges = stats.result.badges.len(),
            "safety stats updated"
        );
        Ok(stats)
    }

    /// Recompute every rated subject, continuing past individual failures.
    pub fn reseed(&self) -> Result<ReseedSummary, ReputationServiceError> {
        let mut summary = ReseedSummary::default();

        for subject in self.ratings.subjects()? {
            match self.recalculate(&subject) {
                Ok(_) => summary.recalculated += 1,
                Err(err) => {
                    warn!(%subject, error = %err, "failed to recalculate safety stats");
                    summary.failures.push((subject, err.to_string()));
                }
            }
        }

        info!(
            recalculated = summary.recalculated,
            failures = summary.failures.len(),
            "reseed complete"
        );
        Ok(summary)
    }

    /// Fetch persisted stats for API responses.
    pub fn stats(
        &self,
        subject: &SubjectId,
    ) -> Result<ProfileSafetyStats, ReputationServiceError> {
        let stats = self
            .profiles
            .fetch(subject)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(stats)
    }
}

/// Error raised by the reputation service.
#[derive(Debug, thiserror::Error)]
pub enum ReputationServiceError {
    #[error("subjects cannot rate themselves")]
    SelfRating,
    #[error("subjects cannot block themselves")]
    SelfBlock,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

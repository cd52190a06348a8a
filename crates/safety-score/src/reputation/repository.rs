use serde::{Deserialize, Serialize};

use super::domain::{BlockRecord, RatingRecord, SubjectId};
use super::outcome::ReputationResult;

/// Persisted reputation document for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSafetyStats {
    pub subject: SubjectId,
    #[serde(flatten)]
    pub result: ReputationResult,
}

/// Source of rating history.
pub trait RatingRepository: Send + Sync {
    /// Store a rating. A second rating for the same rater/ratee pair must fail with
    /// [`RepositoryError::Conflict`], checked atomically with the write.
    fn insert(&self, rating: RatingRecord) -> Result<RatingRecord, RepositoryError>;
    /// Every rating where `subject` is the ratee, oldest first.
    fn ratings_for(&self, subject: &SubjectId) -> Result<Vec<RatingRecord>, RepositoryError>;
    /// Every subject that has been rated at least once.
    fn subjects(&self) -> Result<Vec<SubjectId>, RepositoryError>;
}

/// Source of block records and per-subject block counts.
pub trait BlockRepository: Send + Sync {
    fn insert(&self, block: BlockRecord) -> Result<(), RepositoryError>;
    /// Distinct accounts that have blocked `subject`.
    fn blocked_count(&self, subject: &SubjectId) -> Result<u32, RepositoryError>;
}

/// Sink for computed reputation, keyed by subject.
pub trait ProfileStatsRepository: Send + Sync {
    fn upsert(&self, stats: ProfileSafetyStats) -> Result<(), RepositoryError>;
    fn fetch(&self, subject: &SubjectId) -> Result<Option<ProfileSafetyStats>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

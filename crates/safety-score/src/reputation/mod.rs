//! Safety-score reputation engine.
//!
//! The engine is a pure function of a subject's rating history and block count. The
//! repository traits, [`ReputationService`], CSV import, and HTTP router are the seams
//! through which that history arrives and the result is persisted.

mod badges;
mod blocks;
mod confidence;
pub mod config;
mod dimensions;
pub mod domain;
mod engine;
pub mod import;
pub mod outcome;
pub mod repository;
mod risk;
pub mod router;
pub mod service;
mod trend;

#[cfg(test)]
pub(crate) mod tests;

pub use config::ReputationConfig;
pub use domain::{
    BlockRecord, Consideration, Qualities, RatingField, RatingRecord, RatingSection,
    SafetyAndRespect, SubjectId,
};
pub use engine::ReputationEngine;
pub use import::{RatingImportError, RatingImporter};
pub use outcome::{
    ConfidenceLevel, DimensionalScores, ReputationResult, RiskFlag, RiskKind, RiskSeverity,
    SafetyMetadata, Trend, TrendAnalysis,
};
pub use repository::{
    BlockRepository, ProfileSafetyStats, ProfileStatsRepository, RatingRepository,
    RepositoryError,
};
pub use router::reputation_router;
pub use service::{
    BlockOutcome, RatingSubmission, ReputationService, ReputationServiceError, ReseedSummary,
};

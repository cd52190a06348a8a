use metrics_exporter_prometheus::PrometheusHandle;
use safety_score::reputation::{
    BlockRecord, BlockRepository, ProfileSafetyStats, ProfileStatsRepository, RatingRecord,
    RatingRepository, ReputationConfig, ReputationService, RepositoryError, SubjectId,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryReputationService = ReputationService<
    InMemoryRatingRepository,
    InMemoryBlockRepository,
    InMemoryProfileStatsRepository,
>;

/// Service wired to fresh in-memory stores with the standard scoring constants.
pub(crate) fn reputation_service() -> InMemoryReputationService {
    reputation_service_with(
        InMemoryRatingRepository::default(),
        InMemoryBlockRepository::default(),
    )
}

pub(crate) fn reputation_service_with(
    ratings: InMemoryRatingRepository,
    blocks: InMemoryBlockRepository,
) -> InMemoryReputationService {
    ReputationService::new(
        Arc::new(ratings),
        Arc::new(blocks),
        Arc::new(InMemoryProfileStatsRepository::default()),
        ReputationConfig::standard(),
    )
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRatingRepository {
    records: Arc<Mutex<Vec<RatingRecord>>>,
}

impl RatingRepository for InMemoryRatingRepository {
    fn insert(&self, rating: RatingRecord) -> Result<RatingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("ratings mutex poisoned");
        if guard
            .iter()
            .any(|stored| stored.rater == rating.rater && stored.ratee == rating.ratee)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(rating.clone());
        Ok(rating)
    }

    fn ratings_for(&self, subject: &SubjectId) -> Result<Vec<RatingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("ratings mutex poisoned");
        let mut history: Vec<RatingRecord> = guard
            .iter()
            .filter(|rating| &rating.ratee == subject)
            .cloned()
            .collect();
        history.sort_by_key(|rating| rating.created_at);
        Ok(history)
    }

    fn subjects(&self) -> Result<Vec<SubjectId>, RepositoryError> {
        let guard = self.records.lock().expect("ratings mutex poisoned");
        let subjects: BTreeSet<SubjectId> =
            guard.iter().map(|rating| rating.ratee.clone()).collect();
        Ok(subjects.into_iter().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBlockRepository {
    blockers: Arc<Mutex<HashMap<SubjectId, BTreeSet<SubjectId>>>>,
}

impl BlockRepository for InMemoryBlockRepository {
    fn insert(&self, block: BlockRecord) -> Result<(), RepositoryError> {
        let mut guard = self.blockers.lock().expect("blocks mutex poisoned");
        guard.entry(block.blocked).or_default().insert(block.blocker);
        Ok(())
    }

    fn blocked_count(&self, subject: &SubjectId) -> Result<u32, RepositoryError> {
        let guard = self.blockers.lock().expect("blocks mutex poisoned");
        Ok(guard.get(subject).map_or(0, |blockers| blockers.len() as u32))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStatsRepository {
    stats: Arc<Mutex<BTreeMap<SubjectId, ProfileSafetyStats>>>,
}

impl ProfileStatsRepository for InMemoryProfileStatsRepository {
    fn upsert(&self, stats: ProfileSafetyStats) -> Result<(), RepositoryError> {
        let mut guard = self.stats.lock().expect("profile stats mutex poisoned");
        guard.insert(stats.subject.clone(), stats);
        Ok(())
    }

    fn fetch(&self, subject: &SubjectId) -> Result<Option<ProfileSafetyStats>, RepositoryError> {
        let guard = self.stats.lock().expect("profile stats mutex poisoned");
        Ok(guard.get(subject).cloned())
    }
}

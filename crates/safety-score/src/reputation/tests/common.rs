use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::reputation::domain::{
    BlockRecord, Consideration, Qualities, RatingRecord, SafetyAndRespect, SubjectId,
};
use crate::reputation::repository::{
    BlockRepository, ProfileSafetyStats, ProfileStatsRepository, RatingRepository,
    RepositoryError,
};
use crate::reputation::{reputation_router, ReputationConfig, ReputationService};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0)
        .single()
        .expect("valid base time")
}

/// A rating with no answered sections, `day` days after the base time.
pub(crate) fn rating_at(day: i64) -> RatingRecord {
    RatingRecord {
        rater: SubjectId(format!("rater-{day}")),
        ratee: SubjectId::new("subject"),
        safety_and_respect: None,
        consideration: None,
        qualities: None,
        did_not_show_up: false,
        cancelled: false,
        created_at: base_time() + Duration::days(day),
    }
}

pub(crate) fn safety_only(
    day: i64,
    made_me_feel_safe: bool,
    as_described_in_profile: bool,
    respectful_of_boundaries: bool,
) -> RatingRecord {
    RatingRecord {
        safety_and_respect: Some(SafetyAndRespect {
            made_me_feel_safe: Some(made_me_feel_safe),
            as_described_in_profile: Some(as_described_in_profile),
            respectful_of_boundaries: Some(respectful_of_boundaries),
        }),
        ..rating_at(day)
    }
}

/// Every answer on the form marked `true`.
pub(crate) fn positive_rating(day: i64) -> RatingRecord {
    RatingRecord {
        consideration: Some(Consideration {
            on_time: Some(true),
            attentive: Some(true),
            good_manners: Some(true),
            communicated_clearly: Some(true),
        }),
        qualities: Some(Qualities {
            dressed_well: Some(true),
            smelled_nice: Some(true),
            good_energy: Some(true),
            charming_smile: Some(true),
            athletic: Some(true),
            competitive_drive: Some(true),
            open_to_anything: Some(true),
        }),
        ..safety_only(day, true, true, true)
    }
}

/// A no-show that still carries glowing answers, which must be ignored.
pub(crate) fn no_show(day: i64) -> RatingRecord {
    RatingRecord {
        did_not_show_up: true,
        ..positive_rating(day)
    }
}

pub(crate) fn for_subject(mut rating: RatingRecord, subject: &str) -> RatingRecord {
    rating.ratee = SubjectId::new(subject);
    rating
}

#[derive(Default)]
pub(crate) struct InMemoryRatings {
    records: Mutex<Vec<RatingRecord>>,
    pub(crate) fail_for: Mutex<Option<SubjectId>>,
}

impl RatingRepository for InMemoryRatings {
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
        if self.fail_for.lock().expect("fail mutex poisoned").as_ref() == Some(subject) {
            return Err(RepositoryError::Unavailable("ratings shard offline".to_string()));
        }

        let mut history: Vec<_> = self
            .records
            .lock()
            .expect("ratings mutex poisoned")
            .iter()
            .filter(|rating| &rating.ratee == subject)
            .cloned()
            .collect();
        history.sort_by_key(|rating| rating.created_at);
        Ok(history)
    }

    fn subjects(&self) -> Result<Vec<SubjectId>, RepositoryError> {
        let subjects: BTreeSet<_> = self
            .records
            .lock()
            .expect("ratings mutex poisoned")
            .iter()
            .map(|rating| rating.ratee.clone())
            .collect();
        Ok(subjects.into_iter().collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryBlocks {
    blockers: Mutex<HashMap<SubjectId, BTreeSet<SubjectId>>>,
}

impl BlockRepository for InMemoryBlocks {
    fn insert(&self, block: BlockRecord) -> Result<(), RepositoryError> {
        self.blockers
            .lock()
            .expect("blocks mutex poisoned")
            .entry(block.blocked)
            .or_default()
            .insert(block.blocker);
        Ok(())
    }

    fn blocked_count(&self, subject: &SubjectId) -> Result<u32, RepositoryError> {
        let guard = self.blockers.lock().expect("blocks mutex poisoned");
        Ok(guard.get(subject).map_or(0, |set| set.len() as u32))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProfiles {
    stats: Mutex<BTreeMap<SubjectId, ProfileSafetyStats>>,
}

impl ProfileStatsRepository for InMemoryProfiles {
    fn upsert(&self, stats: ProfileSafetyStats) -> Result<(), RepositoryError> {
        self.stats
            .lock()
            .expect("profiles mutex poisoned")
            .insert(stats.subject.clone(), stats);
        Ok(())
    }

    fn fetch(&self, subject: &SubjectId) -> Result<Option<ProfileSafetyStats>, RepositoryError> {
        Ok(self
            .stats
            .lock()
            .expect("profiles mutex poisoned")
            .get(subject)
            .cloned())
    }
}

pub(crate) type TestService = ReputationService<InMemoryRatings, InMemoryBlocks, InMemoryProfiles>;

pub(crate) struct ServiceHarness {
    pub(crate) ratings: Arc<InMemoryRatings>,
    pub(crate) profiles: Arc<InMemoryProfiles>,
    pub(crate) service: Arc<TestService>,
}

pub(crate) fn service_harness() -> ServiceHarness {
    let ratings = Arc::new(InMemoryRatings::default());
    let blocks = Arc::new(InMemoryBlocks::default());
    let profiles = Arc::new(InMemoryProfiles::default());
    let service = Arc::new(ReputationService::new(
        ratings.clone(),
        blocks,
        profiles.clone(),
        ReputationConfig::standard(),
    ));

    ServiceHarness {
        ratings,
        profiles,
        service,
    }
}

pub(crate) fn router(service: Arc<TestService>) -> axum::Router {
    reputation_router(service)
}

pub(crate) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("valid json")
    };
    (status, value)
}

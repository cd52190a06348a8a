use crate::infra::{
    reputation_service, reputation_service_with, InMemoryBlockRepository,
    InMemoryRatingRepository, InMemoryReputationService,
};
use clap::Args;
use safety_score::error::AppError;
use safety_score::reputation::{
    BlockRepository, Consideration, ProfileSafetyStats, RatingImporter, RatingRepository,
    RatingSubmission, ReputationEngine, SafetyAndRespect, SubjectId,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Rating export (CSV) containing the subject's history
    #[arg(long)]
    pub(crate) ratings_csv: PathBuf,
    /// Subject whose ratings should be scored
    #[arg(long)]
    pub(crate) subject: String,
    /// Number of distinct accounts that have blocked the subject
    #[arg(long, default_value_t = 0)]
    pub(crate) blocked_count: u32,
}

#[derive(Args, Debug)]
pub(crate) struct ReseedArgs {
    /// Rating export (CSV) covering every subject to recompute
    #[arg(long)]
    pub(crate) ratings_csv: PathBuf,
    /// Optional block export (CSV) with blocker, blocked, createdAt columns
    #[arg(long)]
    pub(crate) blocks_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Emit each subject's full result as JSON instead of a summary line.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        ratings_csv,
        subject,
        blocked_count,
    } = args;

    let histories = RatingImporter::from_path(ratings_csv)?;
    let ratings = histories
        .get(&SubjectId::new(subject.as_str()))
        .map(Vec::as_slice)
        .unwrap_or_default();

    let result = ReputationEngine::default().compute(ratings, blocked_count);
    let stats = ProfileSafetyStats {
        subject: SubjectId(subject),
        result,
    };
    print_json(&stats);
    Ok(())
}

pub(crate) fn run_reseed(args: ReseedArgs) -> Result<(), AppError> {
    let ratings = InMemoryRatingRepository::default();
    let blocks = InMemoryBlockRepository::default();

    for history in RatingImporter::from_path(&args.ratings_csv)?.into_values() {
        for rating in history {
            ratings.insert(rating)?;
        }
    }
    if let Some(path) = &args.blocks_csv {
        for block in RatingImporter::blocks_from_path(path)? {
            blocks.insert(block)?;
        }
    }

    let subjects = ratings.subjects()?;
    let service = reputation_service_with(ratings, blocks);
    let summary = service.reseed()?;

    println!(
        "Recalculated {} subject(s), {} failure(s)",
        summary.recalculated,
        summary.failures.len()
    );
    for subject in &subjects {
        if let Ok(stats) = service.stats(subject) {
            render_summary(&stats);
        }
    }
    for (subject, reason) in &summary.failures {
        println!("- {subject}: failed ({reason})");
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = reputation_service();
    seed_demo(&service)?;

    println!("Safety score demo");
    for subject in ["avery", "quinn", "rowan"] {
        let stats = service.stats(&SubjectId::new(subject))?;
        if args.json {
            print_json(&stats);
        } else {
            render_summary(&stats);
        }
    }

    Ok(())
}

fn seed_demo(service: &InMemoryReputationService) -> Result<(), AppError> {
    // avery: consistently positive, enough history for high confidence.
    for index in 0..11 {
        service.submit_rating(submission(&format!("fan-{index}"), "avery", true, None))?;
    }

    // quinn: a strong start that turned sour, plus a few blocks.
    for index in 0..3 {
        service.submit_rating(submission(&format!("early-{index}"), "quinn", true, None))?;
    }
    for index in 0..3 {
        service.submit_rating(submission(&format!("late-{index}"), "quinn", false, None))?;
    }
    for blocker in ["late-0", "late-1", "late-2"] {
        service.record_block(SubjectId::new(blocker), SubjectId::new("quinn"))?;
    }

    // rowan: mostly no-shows.
    service.submit_rating(submission("met-rowan", "rowan", true, None))?;
    for index in 0..2 {
        service.submit_rating(submission(
            &format!("stood-up-{index}"),
            "rowan",
            true,
            Some(true),
        ))?;
    }
    service.submit_rating(submission("met-rowan-again", "rowan", true, None))?;

    Ok(())
}

fn submission(rater: &str, ratee: &str, positive: bool, no_show: Option<bool>) -> RatingSubmission {
    RatingSubmission {
        rater: SubjectId::new(rater),
        ratee: SubjectId::new(ratee),
        safety_and_respect: Some(SafetyAndRespect {
            made_me_feel_safe: Some(positive),
            as_described_in_profile: Some(positive),
            respectful_of_boundaries: Some(positive),
        }),
        consideration: Some(Consideration {
            on_time: Some(positive),
            attentive: Some(positive),
            good_manners: Some(positive),
            communicated_clearly: None,
        }),
        qualities: None,
        did_not_show_up: no_show.unwrap_or(false),
        cancelled: false,
        created_at: None,
    }
}

fn render_summary(stats: &ProfileSafetyStats) {
    let confidence = stats
        .result
        .safety_metadata
        .as_ref()
        .map(|metadata| metadata.confidence.label())
        .unwrap_or("none");
    let badges = if stats.result.badges.is_empty() {
        "no badges".to_string()
    } else {
        stats.result.badges.join(", ")
    };

    println!(
        "- {}: score {} (confidence {}) | {}",
        stats.subject, stats.result.safety_score, confidence, badges
    );

    if let Some(metadata) = &stats.result.safety_metadata {
        for flag in &metadata.risk_flags {
            println!("    ! {:?} [{:?}]: {}", flag.kind, flag.severity, flag.description);
        }
    }
}

fn print_json(stats: &ProfileSafetyStats) {
    match serde_json::to_string_pretty(stats) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render stats for {}: {err}", stats.subject),
    }
}

use super::config::ReputationConfig;
use super::domain::{RatingField, RatingRecord};
use super::outcome::{RiskFlag, RiskKind, RiskSeverity};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RiskAssessment {
    pub flags: Vec<RiskFlag>,
    pub penalty: i64,
}

/// Detect repeated negative patterns. No pattern is evaluated with fewer than two qualifying ratings.
pub(crate) fn detect_risk_patterns(
    all: &[RatingRecord],
    qualifying: &[&RatingRecord],
    config: &ReputationConfig,
) -> RiskAssessment {
    if qualifying.len() < 2 {
        return RiskAssessment {
            flags: Vec::new(),
            penalty: 0,
        };
    }

    let negatives = |field: RatingField| {
        qualifying
            .iter()
            .filter(|rating| rating.field(field) == Some(false))
            .count()
    };
    let unsafe_count = negatives(RatingField::MadeMeFeelSafe);
    let boundary_count = negatives(RatingField::RespectfulOfBoundaries);
    let misrepresented_count = negatives(RatingField::AsDescribedInProfile);
    let no_show_count = all.iter().filter(|rating| rating.did_not_show_up).count();

    let mut flags = Vec::new();
    if unsafe_count >= 2 {
        flags.push(RiskFlag {
            kind: RiskKind::SafetyConcerns,
            severity: escalating(unsafe_count),
            description: format!("{unsafe_count} ratings reported not feeling safe"),
        });
    }
    if boundary_count >= 2 {
        flags.push(RiskFlag {
            kind: RiskKind::BoundaryViolations,
            severity: escalating(boundary_count),
            description: format!("{boundary_count} ratings reported boundaries not respected"),
        });
    }
    if no_show_count >= 2 {
        flags.push(RiskFlag {
            kind: RiskKind::ReliabilityIssues,
            severity: escalating(no_show_count),
            description: format!("did not show up to {no_show_count} dates"),
        });
    }
    if misrepresented_count >= 3 {
        flags.push(RiskFlag {
            kind: RiskKind::ProfileMisrepresentation,
            severity: RiskSeverity::Medium,
            description: format!(
                "{misrepresented_count} ratings reported a mismatch with the profile"
            ),
        });
    }

    let penalty = (config.risk_penalty_per_flag * flags.len() as i64).min(config.risk_penalty_cap);
    RiskAssessment { flags, penalty }
}

fn escalating(count: usize) -> RiskSeverity {
    if count >= 3 {
        RiskSeverity::High
    } else {
        RiskSeverity::Medium
    }
}

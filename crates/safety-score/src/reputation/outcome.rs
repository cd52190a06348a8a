use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score, badges, and audit metadata produced for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationResult {
    pub safety_score: u8,
    pub badges: Vec<String>,
    /// Absent when the subject has no rating history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_metadata: Option<SafetyMetadata>,
}

impl ReputationResult {
    pub fn unrated() -> Self {
        Self {
            safety_score: 0,
            badges: Vec::new(),
            safety_metadata: None,
        }
    }

    pub fn has_badge(&self, label: &str) -> bool {
        self.badges.iter().any(|badge| badge == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyMetadata {
    pub confidence: ConfidenceLevel,
    pub sample_size: usize,
    pub dimensional_scores: DimensionalScores,
    pub risk_flags: Vec<RiskFlag>,
    pub trend_analysis: TrendAnalysis,
    pub blocked_count: u32,
    /// One or two blocks cost 2.5 points each; only the final score is rounded.
    pub blocked_penalty: f64,
    pub last_calculated: DateTime<Utc>,
}

/// Per-dimension averages on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionalScores {
    pub physical_safety: f64,
    pub trustworthiness: f64,
    pub reliability: f64,
    pub respectfulness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl ConfidenceLevel {
    pub const fn score(self) -> u8 {
        match self {
            Self::High => 90,
            Self::Moderate => 75,
            Self::Low => 60,
            Self::VeryLow => 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::VeryLow => "very-low",
        }
    }
}

/// Repeated negative pattern in a subject's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: RiskSeverity,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    SafetyConcerns,
    BoundaryViolations,
    ReliabilityIssues,
    ProfileMisrepresentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub improvement: f64,
}

impl TrendAnalysis {
    pub const fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            improvement: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientData,
    Improving,
    Stable,
    Declining,
}

use serde::{Deserialize, Serialize};

/// Tunable constants for the reputation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationConfig {
    pub physical_safety_weight: f64,
    pub trustworthiness_weight: f64,
    pub reliability_weight: f64,
    pub respectfulness_weight: f64,
    pub risk_penalty_per_flag: i64,
    pub risk_penalty_cap: i64,
    pub blocked_penalty_cap: i64,
    pub trend_threshold: f64,
    pub rapid_improvement_threshold: f64,
    pub consideration_badge_ratio: f64,
    pub quality_badge_ratio: f64,
    pub experienced_min_ratings: usize,
    pub veteran_min_ratings: usize,
}

impl ReputationConfig {
    pub fn standard() -> Self {
        Self {
            physical_safety_weight: 0.40,
            trustworthiness_weight: 0.30,
            reliability_weight: 0.20,
            respectfulness_weight: 0.10,
            risk_penalty_per_flag: 5,
            risk_penalty_cap: 20,
            blocked_penalty_cap: 50,
            trend_threshold: 15.0,
            rapid_improvement_threshold: 20.0,
            consideration_badge_ratio: 0.80,
            quality_badge_ratio: 0.75,
            experienced_min_ratings: 8,
            veteran_min_ratings: 15,
        }
    }
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self::standard()
    }
}

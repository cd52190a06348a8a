use super::config::ReputationConfig;

/// Penalty for being blocked by `blocked_count` distinct accounts.
///
/// One or two blocks cost 2.5 points each; beyond that the penalty grows with
/// `log2(count - 1)` so each extra block matters less, capped at `blocked_penalty_cap`.
pub(crate) fn blocked_penalty(blocked_count: u32, config: &ReputationConfig) -> f64 {
    match blocked_count {
        0 => 0.0,
        1..=2 => f64::from(blocked_count) * 2.5,
        _ => {
            let scaled = (5.0 + 10.0 * f64::from(blocked_count - 1).log2()).round();
            scaled.min(config.blocked_penalty_cap as f64)
        }
    }
}

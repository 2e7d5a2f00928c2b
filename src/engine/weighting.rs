use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::names;

/// Selection weight for one question: base weight plus a freshness bonus
/// that grows with time since last use (a never-used question gets the full
/// bonus), minus a penalty per prior use. Floored so every eligible question
/// keeps a nonzero chance.
pub fn weight(
    usage_count: i32,
    last_used_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    horizon: Duration,
) -> f64 {
    let bonus = match last_used_at {
        None => names::MAX_FRESHNESS_BONUS,
        Some(last_used) => {
            let gap = (now - last_used).num_seconds().max(0) as f64;
            let horizon_secs = horizon.num_seconds().max(1) as f64;
            names::MAX_FRESHNESS_BONUS * (gap / horizon_secs).min(1.0)
        }
    };

    let penalty = f64::from(usage_count) * names::USAGE_PENALTY;
    (names::BASE_WEIGHT + bonus - penalty).max(names::MIN_WEIGHT)
}

/// Cumulative-weight roulette selection: draw in `[0, total)` and subtract
/// weights until the remainder runs out. Falls back to the last candidate if
/// floating-point drift leaves a remainder after the loop.
pub fn weighted_select<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    let mut remainder = rng.gen_range(0.0..total);

    for (idx, w) in weights.iter().enumerate() {
        remainder -= w;
        if remainder <= 0.0 {
            return Some(idx);
        }
    }

    Some(weights.len() - 1)
}

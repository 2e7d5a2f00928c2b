use rand::Rng;

use crate::models::clamp_difficulty;
use crate::names;

/// Pre-simulated difficulty sequence used while assembling a quiz, purely to
/// diversify which questions get picked. The live attempt difficulty is
/// driven separately, by the quiz's progression strategy.
///
/// Starts at 1; each following slot steps up with p=0.5 (capped at 5), holds
/// with p=0.3, or steps down with p=0.2 (floored at 1).
pub fn curation_walk<R: Rng>(len: usize, rng: &mut R) -> Vec<i32> {
    let mut walk = Vec::with_capacity(len);
    let mut difficulty = names::MIN_DIFFICULTY;

    for slot in 0..len {
        if slot > 0 {
            let roll = rng.gen_range(0..100u32);
            difficulty = if roll < names::CURATION_STEP_UP {
                clamp_difficulty(difficulty + 1)
            } else if roll < names::CURATION_STEP_UP + names::CURATION_STEP_HOLD {
                difficulty
            } else {
                clamp_difficulty(difficulty - 1)
            };
        }
        walk.push(difficulty);
    }

    walk
}

use crate::models::{clamp_difficulty, ProgressionStrategy};

impl ProgressionStrategy {
    /// The single progression contract: given the difficulty the answer was
    /// served at, whether it was correct, and the attempt's correctness log
    /// including the answer just recorded, produce the next difficulty.
    /// The result is always within [1, 5].
    pub fn next_difficulty(&self, current: i32, is_correct: bool, history: &[bool]) -> i32 {
        match self {
            ProgressionStrategy::Immediate => {
                clamp_difficulty(if is_correct { current + 1 } else { current - 1 })
            }

            ProgressionStrategy::Gradual => {
                let recent = &history[history.len().saturating_sub(3)..];
                let correct = recent.iter().filter(|c| **c).count();
                if correct >= 2 {
                    clamp_difficulty(current + 1)
                } else if history.len() >= 3 {
                    clamp_difficulty(current - 1)
                } else {
                    current
                }
            }

            ProgressionStrategy::MlBased => {
                if history.is_empty() {
                    return current;
                }
                let correct = history.iter().filter(|c| **c).count() as f64;
                let accuracy = correct / history.len() as f64;
                let target = clamp_difficulty((accuracy * 5.0).ceil() as i32);
                // Step toward the accuracy-derived target, never jump to it.
                clamp_difficulty(current + (target - current).signum())
            }
        }
    }
}

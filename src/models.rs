use serde::{Deserialize, Serialize};

use crate::names;

/// Policy governing how an attempt's difficulty reacts to answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStrategy {
    Immediate,
    Gradual,
    MlBased,
}

impl ProgressionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressionStrategy::Immediate => "immediate",
            ProgressionStrategy::Gradual => "gradual",
            ProgressionStrategy::MlBased => "ml_based",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "immediate" => Some(ProgressionStrategy::Immediate),
            "gradual" => Some(ProgressionStrategy::Gradual),
            "ml_based" => Some(ProgressionStrategy::MlBased),
            _ => None,
        }
    }
}

/// Per-quiz adaptive settings, embedded in the generated artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub target_correct: i32,
    pub strategy: ProgressionStrategy,
    pub starting_difficulty: i32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            target_correct: names::DEFAULT_TARGET_CORRECT,
            strategy: ProgressionStrategy::Immediate,
            starting_difficulty: names::DEFAULT_STARTING_DIFFICULTY,
        }
    }
}

/// Why an attempt reached its terminal state. Both paths share the same
/// completed state; only the reason differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    TargetReached,
    PoolExhausted,
}

impl CompletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionReason::TargetReached => "target_reached",
            CompletionReason::PoolExhausted => "pool_exhausted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "target_reached" => Some(CompletionReason::TargetReached),
            "pool_exhausted" => Some(CompletionReason::PoolExhausted),
            _ => None,
        }
    }
}

/// A question as ingested into the repository by the external admin flow.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub choices: Vec<String>,
    pub answer: String,
    pub difficulty: i32,
    pub topic: String,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub quiz_level: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub fn clamp_difficulty(d: i32) -> i32 {
    d.clamp(names::MIN_DIFFICULTY, names::MAX_DIFFICULTY)
}

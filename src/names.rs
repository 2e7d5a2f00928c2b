// Engine tuning knobs and shared constants.

/// Number of question snapshots embedded in every generated quiz.
pub const QUIZ_SIZE: usize = 20;

/// Minimum active-pool size required before generation is allowed.
pub const MIN_POOL_SIZE: usize = 40;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

// Selection weighting
pub const BASE_WEIGHT: f64 = 100.0;
pub const MAX_FRESHNESS_BONUS: f64 = 50.0;
pub const USAGE_PENALTY: f64 = 5.0;
pub const MIN_WEIGHT: f64 = 1.0;

/// Freshness horizon for generation: a question unused for a year (or never
/// used) gets the full bonus.
pub const FRESHNESS_HORIZON_DAYS: i64 = 365;

// Curation walk step odds, out of 100: step up / hold / step down.
pub const CURATION_STEP_UP: u32 = 50;
pub const CURATION_STEP_HOLD: u32 = 30;

// Adaptive config defaults applied when generation does not override them.
pub const DEFAULT_TARGET_CORRECT: i32 = 10;
pub const DEFAULT_STARTING_DIFFICULTY: i32 = 1;

/// Cumulative skill points required for levels 0..=5.
pub const SKILL_LEVEL_THRESHOLDS: [f64; 6] = [0.0, 25.0, 50.0, 100.0, 200.0, 400.0];

// Headers injected by the platform gateway. Identity and launch-window
// evaluation happen upstream; this core only consumes the results.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const QUIZ_ACCESS_HEADER: &str = "x-quiz-access";
pub const QUIZ_ACCESS_GRANTED: &str = "granted";

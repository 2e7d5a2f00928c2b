// Database model structs

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub question: String,
    pub choices: String,
    pub answer: String,
    pub difficulty: i32,
    pub topic: String,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub quiz_level: i32,
    pub is_active: bool,
    pub usage_count: i32,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct QuizRow {
    pub id: i64,
    pub title: String,
    pub quiz_level: i32,
    pub target_correct: i32,
    pub strategy: String,
    pub starting_difficulty: i32,
    pub generation_hash: String,
    pub trigger_reason: String,
    pub auto_generated: bool,
    pub student_id: Option<i64>,
    pub generation_seed: i64,
}

/// A fully assembled quiz artifact, ready to persist.
pub struct NewQuiz {
    pub title: String,
    pub quiz_level: i32,
    pub config: crate::models::AdaptiveConfig,
    pub generation_hash: String,
    pub trigger_reason: String,
    pub auto_generated: bool,
    pub student_id: Option<i64>,
    pub generation_seed: i64,
    pub created_at: DateTime<Utc>,
}

pub struct NewSnapshot {
    pub question_id: i64,
    pub question: String,
    pub choices: String,
    pub answer: String,
    pub difficulty: i32,
    pub slot_difficulty: i32,
    pub position: i32,
}

/// An embedded question snapshot. `difficulty` is the source question's own
/// difficulty (used for live serving); `slot_difficulty` is the curation-walk
/// target the slot was filled for.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnapshotRow {
    pub question_id: i64,
    pub question: String,
    pub choices: String,
    pub answer: String,
    pub difficulty: i32,
    pub slot_difficulty: i32,
    pub position: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub current_difficulty: i32,
    pub correct_count: i32,
    pub total_answered: i32,
    pub is_completed: bool,
    pub completion_reason: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerRow {
    pub question_id: i64,
    pub answer: String,
    pub is_correct: bool,
    pub difficulty_at_time: i32,
    pub answered_at: DateTime<Utc>,
}

/// One aggregation input per recorded answer: topic from the live question
/// record, difficulty from the embedded snapshot.
#[derive(Debug, sqlx::FromRow)]
pub struct SkillInputRow {
    pub topic: String,
    pub difficulty: i32,
    pub is_correct: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct TopicSkillRow {
    pub topic: String,
    pub points: f64,
    pub level: i32,
}

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    engine::assembler::{self, GenerateParams},
    models::{clamp_difficulty, AdaptiveConfig, ProgressionStrategy},
    names,
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/quizzes/generate", post(generate))
}

/// Body sent by the generation scheduler (or an operator poking the engine
/// by hand). Adaptive-config fields fall back to platform defaults.
#[derive(Deserialize)]
struct GenerateQuizBody {
    quiz_level: i32,
    grade: Option<i32>,
    subject: Option<String>,
    student_id: Option<i64>,
    #[serde(default = "default_trigger")]
    trigger_reason: String,
    #[serde(default)]
    auto_generated: bool,
    target_correct: Option<i32>,
    strategy: Option<ProgressionStrategy>,
    starting_difficulty: Option<i32>,
    seed: Option<u64>,
}

fn default_trigger() -> String {
    "manual".to_string()
}

#[derive(Serialize)]
struct GenerateQuizResponse {
    quiz_id: i64,
    title: String,
    generation_hash: String,
    question_count: usize,
}

async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateQuizBody>,
) -> Result<Json<GenerateQuizResponse>, AppError> {
    if body.quiz_level < 1 {
        return Err(AppError::Validation("quiz_level must be positive".to_string()));
    }

    let defaults = AdaptiveConfig::default();
    let config = AdaptiveConfig {
        target_correct: body.target_correct.unwrap_or(defaults.target_correct),
        strategy: body.strategy.unwrap_or(defaults.strategy),
        starting_difficulty: clamp_difficulty(
            body.starting_difficulty.unwrap_or(defaults.starting_difficulty),
        ),
    };
    if config.target_correct < 1 || config.target_correct > names::QUIZ_SIZE as i32 {
        return Err(AppError::Validation(format!(
            "target_correct must be between 1 and {}",
            names::QUIZ_SIZE
        )));
    }

    let generated = assembler::generate_quiz(
        &state.db,
        GenerateParams {
            quiz_level: body.quiz_level,
            grade: body.grade,
            subject: body.subject,
            student_id: body.student_id,
            trigger_reason: body.trigger_reason,
            auto_generated: body.auto_generated,
            config,
            seed: body.seed,
        },
    )
    .await?;

    Ok(Json(GenerateQuizResponse {
        quiz_id: generated.quiz_id,
        title: generated.title,
        generation_hash: generated.generation_hash,
        question_count: generated.question_count,
    }))
}

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    engine::attempt::{self, AttemptReport, NextQuestion, StartedAttempt, SubmitOutcome},
    extractors::{Caller, LaunchGrant},
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes/{quiz_id}/attempts", post(start_attempt))
        .route("/quizzes/{quiz_id}/attempts/active", get(active_attempt))
        .route("/attempts/{attempt_id}/next", get(next_question))
        .route("/attempts/{attempt_id}/answers", post(submit_answer))
        .route("/attempts/{attempt_id}/results", get(results))
}

async fn start_attempt(
    Caller(user_id): Caller,
    LaunchGrant(granted): LaunchGrant,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<StartedAttempt>, AppError> {
    let started = attempt::start(&state.db, user_id, quiz_id, granted).await?;
    Ok(Json(started))
}

#[derive(Serialize)]
struct ActiveAttemptResponse {
    attempt_id: i64,
    current_difficulty: i32,
    correct_count: i32,
    total_answered: i32,
}

/// Resume support: the caller's in-progress attempt for a quiz, if any.
async fn active_attempt(
    Caller(user_id): Caller,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<ActiveAttemptResponse>, AppError> {
    let attempt = state
        .db
        .find_active_attempt(user_id, quiz_id)
        .await
        .reject("could not look up active attempt")?
        .ok_or(AppError::NotFound { entity: "attempt" })?;

    Ok(Json(ActiveAttemptResponse {
        attempt_id: attempt.id,
        current_difficulty: attempt.current_difficulty,
        correct_count: attempt.correct_count,
        total_answered: attempt.total_answered,
    }))
}

async fn next_question(
    Caller(user_id): Caller,
    State(state): State<AppState>,
    Path(attempt_id): Path<i64>,
) -> Result<Json<NextQuestion>, AppError> {
    let row = attempt::load_owned(&state.db, attempt_id, user_id).await?;
    let next = attempt::next_question(&state.db, &row).await?;
    Ok(Json(next))
}

#[derive(Deserialize)]
struct SubmitAnswerBody {
    question_id: i64,
    answer: String,
}

async fn submit_answer(
    Caller(user_id): Caller,
    State(state): State<AppState>,
    Path(attempt_id): Path<i64>,
    Json(body): Json<SubmitAnswerBody>,
) -> Result<Json<SubmitOutcome>, AppError> {
    let row = attempt::load_owned(&state.db, attempt_id, user_id).await?;
    let outcome = attempt::submit_answer(&state.db, &row, body.question_id, &body.answer).await?;
    Ok(Json(outcome))
}

async fn results(
    Caller(user_id): Caller,
    State(state): State<AppState>,
    Path(attempt_id): Path<i64>,
) -> Result<Json<AttemptReport>, AppError> {
    let row = attempt::load_owned(&state.db, attempt_id, user_id).await?;
    let report = attempt::results(&state.db, &row).await?;
    Ok(Json(report))
}

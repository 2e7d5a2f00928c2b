use std::collections::HashMap;

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::skills;
use crate::db::{AttemptRow, Db, QuizRow, SnapshotRow};
use crate::models::{clamp_difficulty, CompletionReason, ProgressionStrategy};
use crate::rejections::{AppError, ResultExt};

#[derive(Debug, Serialize)]
pub struct StartedAttempt {
    pub attempt_id: i64,
    pub starting_difficulty: i32,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub choices: Vec<String>,
    pub difficulty: i32,
}

#[derive(Debug, Serialize)]
pub struct AttemptSummary {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub correct_count: i32,
    pub total_answered: i32,
    pub accuracy: i32,
    pub target_correct: i32,
    pub completion_reason: CompletionReason,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NextQuestion {
    Pending {
        completed: bool,
        question: QuestionView,
    },
    Done {
        completed: bool,
        summary: AttemptSummary,
    },
}

#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub is_correct: bool,
    pub correct_answer: String,
    pub new_difficulty: i32,
    pub correct_count: i32,
    pub total_answered: i32,
}

#[derive(Debug, Serialize)]
pub struct AnswerReport {
    pub question_id: i64,
    pub question: String,
    pub answer: String,
    pub is_correct: bool,
    pub difficulty_at_time: i32,
}

#[derive(Debug, Serialize)]
pub struct AttemptReport {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub completed: bool,
    pub completion_reason: Option<CompletionReason>,
    pub correct_count: i32,
    pub total_answered: i32,
    pub accuracy: i32,
    pub current_difficulty: i32,
    pub answers: Vec<AnswerReport>,
    pub difficulty_trace: Vec<i32>,
}

/// Open a new attempt for (user, quiz). The launch-availability verdict comes
/// from the authorization collaborator; this core only consumes it.
pub async fn start(
    db: &Db,
    user_id: i64,
    quiz_id: i64,
    launch_granted: bool,
) -> Result<StartedAttempt, AppError> {
    if !launch_granted {
        return Err(AppError::Forbidden("quiz is not available to this caller"));
    }

    let quiz = db
        .get_quiz(quiz_id)
        .await
        .reject("could not load quiz")?
        .ok_or(AppError::NotFound { entity: "quiz" })?;

    if db
        .find_active_attempt(user_id, quiz_id)
        .await
        .reject("could not check for an active attempt")?
        .is_some()
    {
        return Err(AppError::Conflict(
            "an attempt for this quiz is already in progress".to_string(),
        ));
    }

    let starting_difficulty = clamp_difficulty(quiz.starting_difficulty);
    let attempt_id = db
        .create_attempt(user_id, quiz_id, starting_difficulty, Utc::now())
        .await
        .reject("could not create attempt")?;

    Ok(StartedAttempt {
        attempt_id,
        starting_difficulty,
    })
}

/// Load an attempt and verify it belongs to the caller.
pub async fn load_owned(db: &Db, attempt_id: i64, user_id: i64) -> Result<AttemptRow, AppError> {
    let attempt = db
        .get_attempt(attempt_id)
        .await
        .reject("could not load attempt")?
        .ok_or(AppError::NotFound { entity: "attempt" })?;

    if attempt.user_id != user_id {
        return Err(AppError::Forbidden("attempt belongs to another user"));
    }

    Ok(attempt)
}

/// Serve the next question, or the completion summary once the target is
/// reached or no suitable question remains.
pub async fn next_question(db: &Db, attempt: &AttemptRow) -> Result<NextQuestion, AppError> {
    let quiz = db
        .get_quiz(attempt.quiz_id)
        .await
        .reject("could not load quiz")?
        .ok_or(AppError::NotFound { entity: "quiz" })?;

    // Completed attempts answer idempotently with their stored summary.
    if attempt.is_completed {
        let reason = attempt
            .completion_reason
            .as_deref()
            .and_then(CompletionReason::parse)
            .unwrap_or(CompletionReason::TargetReached);
        return Ok(NextQuestion::Done {
            completed: true,
            summary: summary_of(attempt, &quiz, reason),
        });
    }

    if attempt.correct_count >= quiz.target_correct {
        let summary = complete(db, attempt, &quiz, CompletionReason::TargetReached).await?;
        return Ok(NextQuestion::Done {
            completed: true,
            summary,
        });
    }

    let unanswered = db
        .unanswered_snapshots(attempt.quiz_id, attempt.id)
        .await
        .reject("could not load unanswered questions")?;

    let mut candidates: Vec<&SnapshotRow> = unanswered
        .iter()
        .filter(|s| s.difficulty == attempt.current_difficulty)
        .collect();
    if candidates.is_empty() {
        candidates = unanswered
            .iter()
            .filter(|s| (s.difficulty - attempt.current_difficulty).abs() <= 1)
            .collect();
    }

    let Some(snapshot) = candidates.choose(&mut rand::thread_rng()) else {
        // Nothing servable near the current difficulty: finish early.
        let summary = complete(db, attempt, &quiz, CompletionReason::PoolExhausted).await?;
        return Ok(NextQuestion::Done {
            completed: true,
            summary,
        });
    };

    let choices: Vec<String> =
        serde_json::from_str(&snapshot.choices).reject("could not decode stored choices")?;

    Ok(NextQuestion::Pending {
        completed: false,
        question: QuestionView {
            id: snapshot.question_id,
            text: snapshot.question.clone(),
            choices,
            difficulty: snapshot.difficulty,
        },
    })
}

/// Grade one answer against the embedded snapshot, fold it into the attempt,
/// and adjust difficulty per the quiz's progression strategy.
pub async fn submit_answer(
    db: &Db,
    attempt: &AttemptRow,
    question_id: i64,
    answer: &str,
) -> Result<SubmitOutcome, AppError> {
    if answer.trim().is_empty() {
        return Err(AppError::Validation("answer must not be empty".to_string()));
    }
    if attempt.is_completed {
        return Err(AppError::Conflict("attempt is already completed".to_string()));
    }

    let quiz = db
        .get_quiz(attempt.quiz_id)
        .await
        .reject("could not load quiz")?
        .ok_or(AppError::NotFound { entity: "quiz" })?;

    let snapshot = db
        .get_snapshot(attempt.quiz_id, question_id)
        .await
        .reject("could not load question snapshot")?
        .ok_or_else(|| AppError::Conflict("question is not part of this quiz".to_string()))?;

    if db
        .is_question_answered(attempt.id, question_id)
        .await
        .reject("could not check for a prior answer")?
    {
        return Err(AppError::Conflict("question was already answered".to_string()));
    }

    // Graded against the snapshot stored at generation time, never the live
    // question record.
    let is_correct = normalize(answer) == normalize(&snapshot.answer);

    let mut history: Vec<bool> = db
        .attempt_answers(attempt.id)
        .await
        .reject("could not load answer history")?
        .iter()
        .map(|a| a.is_correct)
        .collect();
    history.push(is_correct);

    let strategy = ProgressionStrategy::parse(&quiz.strategy)
        .ok_or(AppError::Internal("unknown progression strategy"))?;
    let new_difficulty = strategy.next_difficulty(attempt.current_difficulty, is_correct, &history);

    db.record_answer(
        attempt.id,
        question_id,
        answer,
        is_correct,
        attempt.current_difficulty,
        new_difficulty,
        Utc::now(),
    )
    .await
    .reject("could not record answer")?;

    Ok(SubmitOutcome {
        is_correct,
        correct_answer: snapshot.answer,
        new_difficulty,
        correct_count: attempt.correct_count + i32::from(is_correct),
        total_answered: attempt.total_answered + 1,
    })
}

/// Read-only projection of an attempt: accuracy, the answer timeline, and the
/// per-question difficulty trace.
pub async fn results(db: &Db, attempt: &AttemptRow) -> Result<AttemptReport, AppError> {
    let answers = db
        .attempt_answers(attempt.id)
        .await
        .reject("could not load answers")?;
    let snapshots = db
        .quiz_snapshots(attempt.quiz_id)
        .await
        .reject("could not load quiz questions")?;

    let text_by_id: HashMap<i64, &str> = snapshots
        .iter()
        .map(|s| (s.question_id, s.question.as_str()))
        .collect();

    let difficulty_trace: Vec<i32> = answers.iter().map(|a| a.difficulty_at_time).collect();
    let answers: Vec<AnswerReport> = answers
        .into_iter()
        .map(|a| AnswerReport {
            question: text_by_id
                .get(&a.question_id)
                .copied()
                .unwrap_or_default()
                .to_string(),
            question_id: a.question_id,
            answer: a.answer,
            is_correct: a.is_correct,
            difficulty_at_time: a.difficulty_at_time,
        })
        .collect();

    Ok(AttemptReport {
        attempt_id: attempt.id,
        quiz_id: attempt.quiz_id,
        completed: attempt.is_completed,
        completion_reason: attempt
            .completion_reason
            .as_deref()
            .and_then(CompletionReason::parse),
        correct_count: attempt.correct_count,
        total_answered: attempt.total_answered,
        accuracy: accuracy_pct(attempt.correct_count, attempt.total_answered),
        current_difficulty: attempt.current_difficulty,
        answers,
        difficulty_trace,
    })
}

/// Flip the attempt to completed and, if this call did the flip, feed the
/// answers to the skill aggregator. Aggregation is best-effort: failures are
/// logged and never surfaced to the caller.
async fn complete(
    db: &Db,
    attempt: &AttemptRow,
    quiz: &QuizRow,
    reason: CompletionReason,
) -> Result<AttemptSummary, AppError> {
    let flipped = db
        .complete_attempt(attempt.id, reason.as_str(), Utc::now())
        .await
        .reject("could not complete attempt")?;

    if flipped {
        match db.skill_inputs(attempt.id).await {
            Ok(inputs) => {
                if let Err(e) = skills::update_skills(db, attempt.user_id, &inputs).await {
                    tracing::warn!("skill aggregation failed for attempt {}: {e}", attempt.id);
                }
            }
            Err(e) => {
                tracing::warn!("could not load skill inputs for attempt {}: {e}", attempt.id);
            }
        }
    }

    Ok(summary_of(attempt, quiz, reason))
}

fn summary_of(attempt: &AttemptRow, quiz: &QuizRow, reason: CompletionReason) -> AttemptSummary {
    AttemptSummary {
        attempt_id: attempt.id,
        quiz_id: attempt.quiz_id,
        correct_count: attempt.correct_count,
        total_answered: attempt.total_answered,
        accuracy: accuracy_pct(attempt.correct_count, attempt.total_answered),
        target_correct: quiz.target_correct,
        completion_reason: reason,
    }
}

fn accuracy_pct(correct: i32, total: i32) -> i32 {
    if total == 0 {
        0
    } else {
        (f64::from(correct) / f64::from(total) * 100.0).round() as i32
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

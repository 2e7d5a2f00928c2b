use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ulid::Ulid;

use super::{curation, weighting};
use crate::db::{Db, NewQuiz, NewSnapshot, QuestionRow};
use crate::models::AdaptiveConfig;
use crate::names;
use crate::rejections::{AppError, ResultExt};

pub struct GenerateParams {
    pub quiz_level: i32,
    pub grade: Option<i32>,
    pub subject: Option<String>,
    pub student_id: Option<i64>,
    pub trigger_reason: String,
    pub auto_generated: bool,
    pub config: AdaptiveConfig,
    /// RNG seed override for reproducible generation. A random seed is drawn
    /// (and persisted on the artifact) when absent.
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub struct GeneratedQuiz {
    pub quiz_id: i64,
    pub title: String,
    pub generation_hash: String,
    pub question_count: usize,
    pub generation_seed: i64,
}

/// Assemble and persist one quiz artifact from the active question pool.
///
/// Selection is freshness-weighted roulette over a 20-slot curation walk,
/// with per-slot fallback (exact difficulty, then ±1, then whatever is
/// left), no duplicates, and an immediate usage-counter write per pick.
/// Repeated calls yield different artifacts; usage counters accumulate.
pub async fn generate_quiz(db: &Db, params: GenerateParams) -> Result<GeneratedQuiz, AppError> {
    let pool = db
        .active_question_pool(params.quiz_level, params.grade, params.subject.as_deref())
        .await
        .reject("could not load question pool")?;

    if pool.len() < names::MIN_POOL_SIZE {
        return Err(AppError::InsufficientQuestions {
            found: pool.len(),
            required: names::MIN_POOL_SIZE,
        });
    }

    let seed = params.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Utc::now();
    let horizon = Duration::days(names::FRESHNESS_HORIZON_DAYS);

    let targets = curation::curation_walk(names::QUIZ_SIZE, &mut rng);
    let mut remaining = pool;
    let mut picks: Vec<(QuestionRow, i32)> = Vec::with_capacity(names::QUIZ_SIZE);

    for (slot, &target) in targets.iter().enumerate() {
        if remaining.is_empty() {
            return Err(AppError::PoolExhausted { slot });
        }

        // Exact difficulty first, then ±1, then whatever remains.
        let mut candidates: Vec<usize> = (0..remaining.len())
            .filter(|&i| remaining[i].difficulty == target)
            .collect();
        if candidates.is_empty() {
            candidates = (0..remaining.len())
                .filter(|&i| (remaining[i].difficulty - target).abs() <= 1)
                .collect();
        }
        if candidates.is_empty() {
            candidates = (0..remaining.len()).collect();
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|&i| {
                let q = &remaining[i];
                weighting::weight(q.usage_count, q.last_used_at, now, horizon)
            })
            .collect();

        let chosen = weighting::weighted_select(&weights, &mut rng)
            .ok_or(AppError::PoolExhausted { slot })?;
        let question = remaining.swap_remove(candidates[chosen]);

        // One awaited usage write per slot, not batched.
        db.touch_question_usage(question.id, now)
            .await
            .reject("could not update question usage")?;

        picks.push((question, target));
    }

    // Presentation order is decoupled from the curation order.
    picks.shuffle(&mut rng);

    let snapshots: Vec<NewSnapshot> = picks
        .iter()
        .enumerate()
        .map(|(i, (q, slot_difficulty))| NewSnapshot {
            question_id: q.id,
            question: q.question.clone(),
            choices: q.choices.clone(),
            answer: q.answer.clone(),
            difficulty: q.difficulty,
            slot_difficulty: *slot_difficulty,
            position: i as i32 + 1,
        })
        .collect();

    let quiz = NewQuiz {
        title: format!("Level {} quiz ({})", params.quiz_level, params.trigger_reason),
        quiz_level: params.quiz_level,
        config: params.config,
        generation_hash: generation_hash(params.quiz_level, params.student_id),
        trigger_reason: params.trigger_reason,
        auto_generated: params.auto_generated,
        student_id: params.student_id,
        generation_seed: seed as i64,
        created_at: now,
    };

    let quiz_id = db
        .create_quiz(&quiz, &snapshots)
        .await
        .reject("could not persist quiz")?;

    Ok(GeneratedQuiz {
        quiz_id,
        title: quiz.title,
        generation_hash: quiz.generation_hash,
        question_count: snapshots.len(),
        generation_seed: quiz.generation_seed,
    })
}

/// Short traceability stamp: level, student, and a ULID prefix (which itself
/// encodes the generation timestamp plus randomness).
fn generation_hash(quiz_level: i32, student_id: Option<i64>) -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    match student_id {
        Some(student) => format!("{quiz_level}-{student}-{}", &ulid[..10]),
        None => format!("{quiz_level}-anon-{}", &ulid[..10]),
    }
}

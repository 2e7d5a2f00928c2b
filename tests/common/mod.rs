#![allow(dead_code)]

use chrono::Utc;

use adaptiq::db::{Db, NewQuiz, NewSnapshot};
use adaptiq::models::{AdaptiveConfig, NewQuestion};

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("adaptiq_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite:{}?mode=rwc", path.display());
    Db::new(&url).await.expect("failed to create test database")
}

pub fn question(n: usize, difficulty: i32, quiz_level: i32) -> NewQuestion {
    NewQuestion {
        question: format!("Question {n}"),
        choices: vec![
            format!("Correct {n}"),
            format!("Wrong {n}"),
            "Neither".to_string(),
        ],
        answer: format!("Correct {n}"),
        difficulty,
        topic: format!("Topic {}", n % 3),
        subject: Some("math".to_string()),
        grade: Some(4),
        quiz_level,
        is_active: true,
    }
}

/// Seed `per_difficulty` questions at each difficulty 1..=5.
pub async fn seed_pool(db: &Db, per_difficulty: usize, quiz_level: i32) -> Vec<i64> {
    let mut ids = Vec::new();
    let mut n = 0;
    for difficulty in 1..=5 {
        for _ in 0..per_difficulty {
            n += 1;
            let id = db
                .insert_question(&question(n, difficulty, quiz_level))
                .await
                .expect("failed to seed question");
            ids.push(id);
        }
    }
    ids
}

/// Persist a quiz with hand-built snapshots (question `n` has answer
/// `Correct n`), for driving the state machine over a known difficulty
/// layout. Returns the quiz id and the underlying question ids in snapshot
/// order.
pub async fn fixed_quiz(
    db: &Db,
    difficulties: &[i32],
    config: AdaptiveConfig,
) -> (i64, Vec<i64>) {
    let mut snapshots = Vec::new();
    let mut question_ids = Vec::new();

    for (i, &difficulty) in difficulties.iter().enumerate() {
        let q = question(i + 1, difficulty, 1);
        let question_id = db
            .insert_question(&q)
            .await
            .expect("failed to insert fixture question");
        question_ids.push(question_id);
        snapshots.push(NewSnapshot {
            question_id,
            question: q.question.clone(),
            choices: serde_json::to_string(&q.choices).expect("choices encode"),
            answer: q.answer.clone(),
            difficulty,
            slot_difficulty: difficulty,
            position: i as i32 + 1,
        });
    }

    let quiz = NewQuiz {
        title: "Fixture quiz".to_string(),
        quiz_level: 1,
        config,
        generation_hash: "1-test-fixture".to_string(),
        trigger_reason: "test".to_string(),
        auto_generated: false,
        student_id: None,
        generation_seed: 0,
        created_at: Utc::now(),
    };

    let quiz_id = db
        .create_quiz(&quiz, &snapshots)
        .await
        .expect("failed to persist fixture quiz");
    (quiz_id, question_ids)
}

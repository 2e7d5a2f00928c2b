mod common;

use chrono::Utc;

use adaptiq::models::AdaptiveConfig;
use common::create_test_db;

#[tokio::test]
async fn schema_bootstrap_and_question_round_trip() {
    let db = create_test_db().await;

    let id = db.insert_question(&common::question(1, 3, 1)).await.unwrap();
    let q = db.get_question(id).await.unwrap().expect("question exists");

    assert_eq!(q.question, "Question 1");
    assert_eq!(q.difficulty, 3);
    assert_eq!(q.quiz_level, 1);
    assert_eq!(q.usage_count, 0);
    assert!(q.last_used_at.is_none());

    let choices: Vec<String> = serde_json::from_str(&q.choices).unwrap();
    assert_eq!(choices, vec!["Correct 1", "Wrong 1", "Neither"]);
}

#[tokio::test]
async fn question_pool_filters_by_level_activity_grade_and_subject() {
    let db = create_test_db().await;

    db.insert_question(&common::question(1, 1, 1)).await.unwrap();

    let mut inactive = common::question(2, 1, 1);
    inactive.is_active = false;
    db.insert_question(&inactive).await.unwrap();

    db.insert_question(&common::question(3, 1, 2)).await.unwrap();

    let mut other_grade = common::question(4, 1, 1);
    other_grade.grade = Some(6);
    db.insert_question(&other_grade).await.unwrap();

    let pool = db.active_question_pool(1, None, None).await.unwrap();
    assert_eq!(pool.len(), 2);

    let pool = db.active_question_pool(1, Some(4), None).await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].question, "Question 1");

    let pool = db.active_question_pool(1, None, Some("science")).await.unwrap();
    assert!(pool.is_empty());

    let pool = db.active_question_pool(1, None, Some("math")).await.unwrap();
    assert_eq!(pool.len(), 2);
}

#[tokio::test]
async fn touching_usage_accumulates_and_refreshes_the_timestamp() {
    let db = create_test_db().await;
    let id = db.insert_question(&common::question(1, 2, 1)).await.unwrap();

    db.touch_question_usage(id, Utc::now()).await.unwrap();
    db.touch_question_usage(id, Utc::now()).await.unwrap();

    let q = db.get_question(id).await.unwrap().unwrap();
    assert_eq!(q.usage_count, 2);
    assert!(q.last_used_at.is_some());
}

#[tokio::test]
async fn quiz_round_trip_with_snapshots() {
    let db = create_test_db().await;
    let (quiz_id, question_ids) =
        common::fixed_quiz(&db, &[1, 2, 3], AdaptiveConfig::default()).await;

    let quiz = db.get_quiz(quiz_id).await.unwrap().expect("quiz exists");
    assert_eq!(quiz.strategy, "immediate");
    assert_eq!(quiz.target_correct, 10);
    assert_eq!(quiz.starting_difficulty, 1);
    assert_eq!(quiz.generation_hash, "1-test-fixture");

    let snapshots = db.quiz_snapshots(quiz_id).await.unwrap();
    assert_eq!(snapshots.len(), 3);
    let positions: Vec<i32> = snapshots.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);

    let snap = db
        .get_snapshot(quiz_id, question_ids[0])
        .await
        .unwrap()
        .expect("snapshot exists");
    assert_eq!(snap.answer, "Correct 1");
    assert_eq!(snap.difficulty, 1);

    assert!(db.get_snapshot(quiz_id, 9999).await.unwrap().is_none());
    assert!(db.get_quiz(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn attempt_rows_track_answers_and_complete_exactly_once() {
    let db = create_test_db().await;
    let (quiz_id, question_ids) =
        common::fixed_quiz(&db, &[1, 1], AdaptiveConfig::default()).await;

    let attempt_id = db.create_attempt(7, quiz_id, 3, Utc::now()).await.unwrap();

    let active = db.find_active_attempt(7, quiz_id).await.unwrap();
    assert_eq!(active.map(|a| a.id), Some(attempt_id));
    assert!(db.find_active_attempt(8, quiz_id).await.unwrap().is_none());

    let attempt = db.get_attempt(attempt_id).await.unwrap().unwrap();
    assert_eq!(attempt.current_difficulty, 3);
    assert_eq!(attempt.correct_count, 0);
    assert_eq!(attempt.total_answered, 0);
    assert!(!attempt.is_completed);

    db.record_answer(attempt_id, question_ids[0], "Correct 1", true, 3, 4, Utc::now())
        .await
        .unwrap();

    assert!(db.is_question_answered(attempt_id, question_ids[0]).await.unwrap());
    assert!(!db.is_question_answered(attempt_id, question_ids[1]).await.unwrap());

    let attempt = db.get_attempt(attempt_id).await.unwrap().unwrap();
    assert_eq!(attempt.correct_count, 1);
    assert_eq!(attempt.total_answered, 1);
    assert_eq!(attempt.current_difficulty, 4);

    let unanswered = db.unanswered_snapshots(quiz_id, attempt_id).await.unwrap();
    assert_eq!(unanswered.len(), 1);
    assert_eq!(unanswered[0].question_id, question_ids[1]);

    assert!(db
        .complete_attempt(attempt_id, "target_reached", Utc::now())
        .await
        .unwrap());
    // second flip is a no-op
    assert!(!db
        .complete_attempt(attempt_id, "pool_exhausted", Utc::now())
        .await
        .unwrap());

    let attempt = db.get_attempt(attempt_id).await.unwrap().unwrap();
    assert!(attempt.is_completed);
    assert_eq!(attempt.completion_reason.as_deref(), Some("target_reached"));
    assert!(attempt.completed_at.is_some());

    assert!(db.find_active_attempt(7, quiz_id).await.unwrap().is_none());
}

#[tokio::test]
async fn topic_skill_upsert_overwrites_the_existing_row() {
    let db = create_test_db().await;

    assert!(db.topic_skill(7, "Topic 1").await.unwrap().is_none());

    db.upsert_topic_skill(7, "Topic 1", 10.0, 0, Utc::now()).await.unwrap();
    db.upsert_topic_skill(7, "Topic 1", 30.0, 1, Utc::now()).await.unwrap();
    db.upsert_topic_skill(8, "Topic 1", 5.0, 0, Utc::now()).await.unwrap();

    let skill = db.topic_skill(7, "Topic 1").await.unwrap().unwrap();
    assert_eq!(skill.points, 30.0);
    assert_eq!(skill.level, 1);

    let other = db.topic_skill(8, "Topic 1").await.unwrap().unwrap();
    assert_eq!(other.points, 5.0);
}

#[tokio::test]
async fn skill_inputs_join_topics_with_snapshot_difficulties() {
    let db = create_test_db().await;
    let (quiz_id, question_ids) =
        common::fixed_quiz(&db, &[2, 4], AdaptiveConfig::default()).await;

    let attempt_id = db.create_attempt(7, quiz_id, 2, Utc::now()).await.unwrap();
    db.record_answer(attempt_id, question_ids[0], "Correct 1", true, 2, 3, Utc::now())
        .await
        .unwrap();
    db.record_answer(attempt_id, question_ids[1], "nope", false, 3, 2, Utc::now())
        .await
        .unwrap();

    let inputs = db.skill_inputs(attempt_id).await.unwrap();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].topic, "Topic 1");
    assert_eq!(inputs[0].difficulty, 2);
    assert!(inputs[0].is_correct);
    assert_eq!(inputs[1].topic, "Topic 2");
    assert_eq!(inputs[1].difficulty, 4);
    assert!(!inputs[1].is_correct);
}

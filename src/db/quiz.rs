use color_eyre::Result;

use super::models::{NewQuiz, NewSnapshot, QuizRow, SnapshotRow};
use super::Db;

impl Db {
    /// Insert a quiz with its embedded question snapshots atomically.
    pub async fn create_quiz(&self, quiz: &NewQuiz, snapshots: &[NewSnapshot]) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let quiz_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes (title, quiz_level, target_correct, strategy, starting_difficulty,
                                 generation_hash, trigger_reason, auto_generated, student_id,
                                 generation_seed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&quiz.title)
        .bind(quiz.quiz_level)
        .bind(quiz.config.target_correct)
        .bind(quiz.config.strategy.as_str())
        .bind(quiz.config.starting_difficulty)
        .bind(&quiz.generation_hash)
        .bind(&quiz.trigger_reason)
        .bind(quiz.auto_generated)
        .bind(quiz.student_id)
        .bind(quiz.generation_seed)
        .bind(quiz.created_at)
        .fetch_one(&mut *tx)
        .await?;

        for s in snapshots {
            sqlx::query(
                r#"
                INSERT INTO quiz_questions (quiz_id, question_id, question, choices, answer,
                                            difficulty, slot_difficulty, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(quiz_id)
            .bind(s.question_id)
            .bind(&s.question)
            .bind(&s.choices)
            .bind(&s.answer)
            .bind(s.difficulty)
            .bind(s.slot_difficulty)
            .bind(s.position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "quiz created: id={quiz_id}, hash={}, questions={}",
            quiz.generation_hash,
            snapshots.len()
        );
        Ok(quiz_id)
    }

    pub async fn get_quiz(&self, quiz_id: i64) -> Result<Option<QuizRow>> {
        let quiz = sqlx::query_as::<_, QuizRow>(
            r#"
            SELECT id, title, quiz_level, target_correct, strategy, starting_difficulty,
                   generation_hash, trigger_reason, auto_generated, student_id, generation_seed
            FROM quizzes WHERE id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn quiz_snapshots(&self, quiz_id: i64) -> Result<Vec<SnapshotRow>> {
        let snapshots = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT question_id, question, choices, answer, difficulty, slot_difficulty, position
            FROM quiz_questions WHERE quiz_id = $1 ORDER BY position
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(snapshots)
    }

    pub async fn get_snapshot(
        &self,
        quiz_id: i64,
        question_id: i64,
    ) -> Result<Option<SnapshotRow>> {
        let snapshot = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT question_id, question, choices, answer, difficulty, slot_difficulty, position
            FROM quiz_questions WHERE quiz_id = $1 AND question_id = $2
            "#,
        )
        .bind(quiz_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// Snapshots of the quiz the attempt has not answered yet, in position order.
    pub async fn unanswered_snapshots(
        &self,
        quiz_id: i64,
        attempt_id: i64,
    ) -> Result<Vec<SnapshotRow>> {
        let snapshots = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT question_id, question, choices, answer, difficulty, slot_difficulty, position
            FROM quiz_questions
            WHERE quiz_id = $1
              AND question_id NOT IN (
                  SELECT question_id FROM attempt_answers WHERE attempt_id = $2
              )
            ORDER BY position
            "#,
        )
        .bind(quiz_id)
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(snapshots)
    }
}

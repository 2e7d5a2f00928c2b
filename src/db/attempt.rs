use chrono::{DateTime, Utc};
use color_eyre::Result;

use super::models::{AnswerRow, AttemptRow};
use super::Db;

const ATTEMPT_COLUMNS: &str = "id, user_id, quiz_id, current_difficulty, correct_count, \
                               total_answered, is_completed, completion_reason, started_at, \
                               completed_at";

impl Db {
    pub async fn create_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
        starting_difficulty: i32,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO attempts (user_id, quiz_id, current_difficulty, started_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(starting_difficulty)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("attempt created: id={id}, user={user_id}, quiz={quiz_id}");
        Ok(id)
    }

    pub async fn get_attempt(&self, attempt_id: i64) -> Result<Option<AttemptRow>> {
        let attempt = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM attempts WHERE id = $1"
        ))
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    /// The caller's in-progress attempt for a quiz, if one exists.
    pub async fn find_active_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<AttemptRow>> {
        let attempt = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM attempts \
             WHERE user_id = $1 AND quiz_id = $2 AND is_completed = 0"
        ))
        .bind(user_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn is_question_answered(&self, attempt_id: i64, question_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM attempt_answers WHERE attempt_id = $1 AND question_id = $2)",
        )
        .bind(attempt_id)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn attempt_answers(&self, attempt_id: i64) -> Result<Vec<AnswerRow>> {
        let answers = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT question_id, answer, is_correct, difficulty_at_time, answered_at
            FROM attempt_answers WHERE attempt_id = $1 ORDER BY id
            "#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    /// Append an answer and fold it into the attempt's counters and current
    /// difficulty, atomically.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_answer(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: &str,
        is_correct: bool,
        difficulty_at_time: i32,
        new_difficulty: i32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO attempt_answers (attempt_id, question_id, answer, is_correct,
                                         difficulty_at_time, answered_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(attempt_id)
        .bind(question_id)
        .bind(answer)
        .bind(is_correct)
        .bind(difficulty_at_time)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE attempts
            SET total_answered = total_answered + 1,
                correct_count = correct_count + $2,
                current_difficulty = $3
            WHERE id = $1
            "#,
        )
        .bind(attempt_id)
        .bind(if is_correct { 1 } else { 0 })
        .bind(new_difficulty)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "answer recorded for attempt={attempt_id} question={question_id}: correct={is_correct}"
        );
        Ok(())
    }

    /// Flip the attempt to completed. Returns whether this call did the flip;
    /// an already-completed attempt is left untouched.
    pub async fn complete_attempt(
        &self,
        attempt_id: i64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attempts
            SET is_completed = 1, completion_reason = $2, completed_at = $3
            WHERE id = $1 AND is_completed = 0
            "#,
        )
        .bind(attempt_id)
        .bind(reason)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let flipped = result.rows_affected() == 1;
        if flipped {
            tracing::info!("attempt {attempt_id} completed: {reason}");
        }
        Ok(flipped)
    }
}

use chrono::{DateTime, Utc};
use color_eyre::Result;

use super::models::QuestionRow;
use super::Db;
use crate::models::NewQuestion;

impl Db {
    /// Ingest a question into the repository. Authoring lives in the external
    /// admin flow; this is the glue it (and the tests) write through.
    pub async fn insert_question(&self, q: &NewQuestion) -> Result<i64> {
        let choices = serde_json::to_string(&q.choices)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO questions (question, choices, answer, difficulty, topic, subject, grade, quiz_level, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&q.question)
        .bind(&choices)
        .bind(&q.answer)
        .bind(q.difficulty)
        .bind(&q.topic)
        .bind(&q.subject)
        .bind(q.grade)
        .bind(q.quiz_level)
        .bind(q.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// The eligible generation pool: active questions at the given level,
    /// narrowed by grade and subject when provided.
    pub async fn active_question_pool(
        &self,
        quiz_level: i32,
        grade: Option<i32>,
        subject: Option<&str>,
    ) -> Result<Vec<QuestionRow>> {
        let pool = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, question, choices, answer, difficulty, topic, subject, grade,
                   quiz_level, is_active, usage_count, last_used_at
            FROM questions
            WHERE quiz_level = $1
              AND is_active = 1
              AND ($2 IS NULL OR grade = $2)
              AND ($3 IS NULL OR subject = $3)
            ORDER BY id
            "#,
        )
        .bind(quiz_level)
        .bind(grade)
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(pool)
    }

    /// Record that a question was selected for a quiz: bump its usage count
    /// and refresh the freshness timestamp.
    pub async fn touch_question_usage(&self, question_id: i64, now: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE questions SET usage_count = usage_count + 1, last_used_at = $2 WHERE id = $1",
        )
        .bind(question_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_question(&self, question_id: i64) -> Result<Option<QuestionRow>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, question, choices, answer, difficulty, topic, subject, grade,
                   quiz_level, is_active, usage_count, last_used_at
            FROM questions WHERE id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

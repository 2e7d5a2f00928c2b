use chrono::{DateTime, Utc};
use color_eyre::Result;

use super::models::{SkillInputRow, TopicSkillRow};
use super::Db;

impl Db {
    /// Aggregation inputs for a completed attempt: one row per recorded
    /// answer, topic taken from the live question record and difficulty from
    /// the embedded snapshot.
    pub async fn skill_inputs(&self, attempt_id: i64) -> Result<Vec<SkillInputRow>> {
        let inputs = sqlx::query_as::<_, SkillInputRow>(
            r#"
            SELECT q.topic AS topic, s.difficulty AS difficulty, aa.is_correct AS is_correct
            FROM attempt_answers aa
            JOIN attempts a ON a.id = aa.attempt_id
            JOIN quiz_questions s ON s.quiz_id = a.quiz_id AND s.question_id = aa.question_id
            JOIN questions q ON q.id = aa.question_id
            WHERE aa.attempt_id = $1
            ORDER BY aa.id
            "#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inputs)
    }

    pub async fn topic_skill(&self, user_id: i64, topic: &str) -> Result<Option<TopicSkillRow>> {
        let skill = sqlx::query_as::<_, TopicSkillRow>(
            "SELECT topic, points, level FROM topic_skills WHERE user_id = $1 AND topic = $2",
        )
        .bind(user_id)
        .bind(topic)
        .fetch_optional(&self.pool)
        .await?;

        Ok(skill)
    }

    pub async fn upsert_topic_skill(
        &self,
        user_id: i64,
        topic: &str,
        points: f64,
        level: i32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO topic_skills (user_id, topic, points, level, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(user_id, topic)
            DO UPDATE SET points = $3, level = $4, updated_at = $5
            "#,
        )
        .bind(user_id)
        .bind(topic)
        .bind(points)
        .bind(level)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

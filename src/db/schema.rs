// Database schema initialization

use color_eyre::Result;

pub async fn create_schema(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY,
            question TEXT NOT NULL,
            choices TEXT NOT NULL,
            answer TEXT NOT NULL,
            difficulty INTEGER NOT NULL,
            topic TEXT NOT NULL,
            subject TEXT,
            grade INTEGER,
            quiz_level INTEGER NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            usage_count INTEGER NOT NULL DEFAULT 0,
            last_used_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quizzes (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            quiz_level INTEGER NOT NULL,
            target_correct INTEGER NOT NULL,
            strategy TEXT NOT NULL,
            starting_difficulty INTEGER NOT NULL,
            generation_hash TEXT NOT NULL,
            trigger_reason TEXT NOT NULL,
            auto_generated BOOLEAN NOT NULL DEFAULT 0,
            student_id INTEGER,
            generation_seed INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_questions (
            id INTEGER PRIMARY KEY,
            quiz_id INTEGER NOT NULL,
            question_id INTEGER NOT NULL,
            question TEXT NOT NULL,
            choices TEXT NOT NULL,
            answer TEXT NOT NULL,
            difficulty INTEGER NOT NULL,
            slot_difficulty INTEGER NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY(quiz_id) REFERENCES quizzes(id) ON DELETE CASCADE,
            UNIQUE(quiz_id, question_id),
            UNIQUE(quiz_id, position)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            quiz_id INTEGER NOT NULL,
            current_difficulty INTEGER NOT NULL,
            correct_count INTEGER NOT NULL DEFAULT 0,
            total_answered INTEGER NOT NULL DEFAULT 0,
            is_completed BOOLEAN NOT NULL DEFAULT 0,
            completion_reason TEXT,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            FOREIGN KEY(quiz_id) REFERENCES quizzes(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One in-progress attempt per (user, quiz)
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_attempts_one_active
        ON attempts(user_id, quiz_id) WHERE is_completed = 0
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attempt_answers (
            id INTEGER PRIMARY KEY,
            attempt_id INTEGER NOT NULL,
            question_id INTEGER NOT NULL,
            answer TEXT NOT NULL,
            is_correct BOOLEAN NOT NULL,
            difficulty_at_time INTEGER NOT NULL,
            answered_at TEXT NOT NULL,
            FOREIGN KEY(attempt_id) REFERENCES attempts(id) ON DELETE CASCADE,
            UNIQUE(attempt_id, question_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS topic_skills (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            topic TEXT NOT NULL,
            points REAL NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            UNIQUE(user_id, topic)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

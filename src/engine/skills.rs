use std::collections::BTreeMap;

use chrono::Utc;
use color_eyre::Result;

use crate::db::{Db, SkillInputRow};
use crate::names;

/// Difficulty → points mapping for graded answers. Defaults follow the
/// platform's scale: easy questions reward little and punish hard, difficult
/// questions the reverse (1 ⇒ +1/−2.5 … 5 ⇒ +5/−0.5).
pub struct SkillTable {
    correct: [f64; 5],
    incorrect: [f64; 5],
}

impl Default for SkillTable {
    fn default() -> Self {
        Self {
            correct: [1.0, 2.0, 3.0, 4.0, 5.0],
            incorrect: [-2.5, -2.0, -1.5, -1.0, -0.5],
        }
    }
}

impl SkillTable {
    pub fn points_delta(&self, difficulty: i32, is_correct: bool) -> f64 {
        let idx = difficulty.clamp(names::MIN_DIFFICULTY, names::MAX_DIFFICULTY) as usize - 1;
        if is_correct {
            self.correct[idx]
        } else {
            self.incorrect[idx]
        }
    }
}

/// Discrete mastery level for a cumulative point total.
pub fn level_for_points(points: f64) -> i32 {
    names::SKILL_LEVEL_THRESHOLDS
        .iter()
        .rposition(|t| points >= *t)
        .unwrap_or(0) as i32
}

/// Fold a completed attempt's answers into the user's per-topic mastery:
/// sum the per-answer deltas by topic, clamp the cumulative total at 0, and
/// re-derive the level.
pub async fn update_skills(db: &Db, user_id: i64, answers: &[SkillInputRow]) -> Result<()> {
    let table = SkillTable::default();

    let mut deltas: BTreeMap<&str, f64> = BTreeMap::new();
    for a in answers {
        *deltas.entry(a.topic.as_str()).or_default() += table.points_delta(a.difficulty, a.is_correct);
    }

    let now = Utc::now();
    for (topic, delta) in deltas {
        let current = db
            .topic_skill(user_id, topic)
            .await?
            .map(|s| s.points)
            .unwrap_or(0.0);
        let points = (current + delta).max(0.0);
        let level = level_for_points(points);

        db.upsert_topic_skill(user_id, topic, points, level, now).await?;
        tracing::info!(
            "skills updated for user={user_id} topic={topic}: points={points:.1}, level={level}"
        );
    }

    Ok(())
}

//! Solve record repository
//!
//! Solve records live in the `submissions` table. Every query that depends on
//! whether a user solved a problem counts distinct problems, so repeated
//! records for the same pair never double count.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Difficulty, SolvedProblem},
};

/// Repository for solve record database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Number of distinct problems the user solved, optionally within one tier
    pub async fn count_distinct_solved(
        pool: &PgPool,
        user_id: &Uuid,
        difficulty: Option<Difficulty>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT s.problem_id) FROM submissions s
            JOIN problems p ON p.id = s.problem_id
            WHERE s.user_id = $1 AND ($2::difficulty IS NULL OR p.difficulty = $2)
            "#,
        )
        .bind(user_id)
        .bind(difficulty)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Per-topic catalog size and number of those problems the user solved
    pub async fn topic_progress(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<(String, i64, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT
                topic,
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE EXISTS (
                    SELECT 1 FROM submissions s
                    WHERE s.user_id = $1 AND s.problem_id = p.id
                )) AS solved
            FROM problems p, UNNEST(p.topics) AS topic
            GROUP BY topic
            ORDER BY topic
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Solve history, newest first
    pub async fn list_solved(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<SolvedProblem>> {
        let solved = sqlx::query_as::<_, SolvedProblem>(
            r#"
            SELECT s.id AS record_id, s.contest_id, s.solved_at, p.*
            FROM submissions s
            JOIN problems p ON p.id = s.problem_id
            WHERE s.user_id = $1
            ORDER BY s.solved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(solved)
    }
}

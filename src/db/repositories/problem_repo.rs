//! Problem repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    catalog::CatalogEntry,
    error::AppResult,
    models::{Difficulty, Problem},
    selection::UnsolvedProblemSource,
};

/// Repository for problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Insert all catalog entries in one transaction
    pub async fn insert_catalog(pool: &PgPool, entries: &[CatalogEntry]) -> AppResult<usize> {
        let mut tx = pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO problems (
                    title, slug, difficulty, topics, leetcode_url, neetcode_url, order_index
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&entry.title)
            .bind(&entry.slug)
            .bind(entry.difficulty)
            .bind(&entry.topics)
            .bind(&entry.leetcode_url)
            .bind(&entry.neetcode_url)
            .bind(entry.order_index)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(entries.len())
    }

    /// Find problem by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(problem)
    }

    /// All problems in catalog order
    pub async fn list_all(pool: &PgPool) -> AppResult<Vec<Problem>> {
        let problems =
            sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems ORDER BY order_index ASC"#)
                .fetch_all(pool)
                .await?;

        Ok(problems)
    }

    /// Problems of one difficulty the user has no solve record for
    pub async fn find_unsolved(
        pool: &PgPool,
        user_id: &Uuid,
        difficulty: Difficulty,
    ) -> AppResult<Vec<Problem>> {
        let problems = sqlx::query_as::<_, Problem>(
            r#"
            SELECT p.* FROM problems p
            WHERE p.difficulty = $2
                AND NOT EXISTS (
                    SELECT 1 FROM submissions s
                    WHERE s.user_id = $1 AND s.problem_id = p.id
                )
            ORDER BY p.order_index ASC
            "#,
        )
        .bind(user_id)
        .bind(difficulty)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }

    /// Get total problem count
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM problems"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Problem counts per difficulty
    pub async fn count_by_difficulty(pool: &PgPool) -> AppResult<Vec<(Difficulty, i64)>> {
        let rows = sqlx::query_as::<_, (Difficulty, i64)>(
            r#"
            SELECT difficulty, COUNT(*) FROM problems
            GROUP BY difficulty
            ORDER BY difficulty
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Problem counts per topic tag
    pub async fn count_by_topic(pool: &PgPool) -> AppResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT topic, COUNT(*) FROM problems, UNNEST(topics) AS topic
            GROUP BY topic
            ORDER BY topic
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Unsolved pools read straight from Postgres, queried fresh on every call
#[derive(Clone)]
pub struct ProblemPoolSource {
    pool: PgPool,
}

impl ProblemPoolSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnsolvedProblemSource for ProblemPoolSource {
    async fn fetch_unsolved(&self, user_id: Uuid, difficulty: Difficulty) -> AppResult<Vec<Problem>> {
        ProblemRepository::find_unsolved(&self.pool, &user_id, difficulty).await
    }
}

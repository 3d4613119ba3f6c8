//! Problem service

use std::collections::BTreeMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::ProblemRepository,
    error::{AppError, AppResult},
    handlers::problems::{request::ListProblemsQuery, response::ProblemStatsResponse},
    models::{Difficulty, Problem},
};

/// Problem service for business logic
pub struct ProblemService;

impl ProblemService {
    /// Catalog problems in order, optionally filtered
    pub async fn list_problems(pool: &PgPool, query: &ListProblemsQuery) -> AppResult<Vec<Problem>> {
        let difficulty = query
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let problems = ProblemRepository::list_all(pool).await?;
        Ok(Self::filter(problems, difficulty, query.topic.as_deref()))
    }

    /// Get problem by ID
    pub async fn get_problem(pool: &PgPool, id: &Uuid) -> AppResult<Problem> {
        ProblemRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))
    }

    /// Catalog size by difficulty and by topic
    pub async fn get_stats(pool: &PgPool) -> AppResult<ProblemStatsResponse> {
        let (total, by_difficulty, by_topic) = tokio::try_join!(
            ProblemRepository::count(pool),
            ProblemRepository::count_by_difficulty(pool),
            ProblemRepository::count_by_topic(pool),
        )?;

        // Every tier is reported, even when empty
        let mut difficulty_counts: BTreeMap<String, i64> = Difficulty::ALL
            .iter()
            .map(|d| (d.to_string(), 0))
            .collect();
        for (difficulty, count) in by_difficulty {
            difficulty_counts.insert(difficulty.to_string(), count);
        }

        Ok(ProblemStatsResponse {
            total,
            by_difficulty: difficulty_counts,
            by_topic: by_topic.into_iter().collect(),
        })
    }

    fn filter(
        problems: Vec<Problem>,
        difficulty: Option<Difficulty>,
        topic: Option<&str>,
    ) -> Vec<Problem> {
        problems
            .into_iter()
            .filter(|p| difficulty.is_none_or(|d| p.difficulty == d))
            .filter(|p| {
                topic.is_none_or(|t| p.topics.iter().any(|pt| pt.eq_ignore_ascii_case(t)))
            })
            .collect()
    }
}

//! User service

use std::collections::BTreeMap;

use futures::future::try_join_all;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ContestRepository, SubmissionRepository, UserRepository},
    error::{AppError, AppResult},
    handlers::users::response::{SolvedListResponse, TopicStats, UserProgressResponse},
    models::{ContestStats, Difficulty, User},
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Solve progress for a user.
    ///
    /// The overall and per-difficulty distinct solve counts are fetched
    /// concurrently with the topic and contest breakdowns; any failing query
    /// fails the whole request.
    pub async fn get_progress(pool: &PgPool, user_id: &Uuid) -> AppResult<UserProgressResponse> {
        let tiers = [
            None,
            Some(Difficulty::Easy),
            Some(Difficulty::Medium),
            Some(Difficulty::Hard),
        ];
        let counts = try_join_all(
            tiers
                .into_iter()
                .map(|tier| SubmissionRepository::count_distinct_solved(pool, user_id, tier)),
        );

        let (counts, topics, contest_stats) = tokio::try_join!(
            counts,
            SubmissionRepository::topic_progress(pool, user_id),
            ContestRepository::stats_for_user(pool, user_id),
        )?;

        Ok(Self::build_progress(&counts, topics, contest_stats))
    }

    /// Solve history, newest first
    pub async fn get_solved(pool: &PgPool, user_id: &Uuid) -> AppResult<SolvedListResponse> {
        let solved: Vec<_> = SubmissionRepository::list_solved(pool, user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(SolvedListResponse {
            total: solved.len(),
            solved,
        })
    }

    /// `counts` is `[total, easy, medium, hard]`
    fn build_progress(
        counts: &[i64],
        topics: Vec<(String, i64, i64)>,
        contest_stats: ContestStats,
    ) -> UserProgressResponse {
        let count = |i: usize| counts.get(i).copied().unwrap_or(0);

        UserProgressResponse {
            total_solved: count(0),
            easy_solved: count(1),
            medium_solved: count(2),
            hard_solved: count(3),
            topic_progress: topics
                .into_iter()
                .map(|(topic, total, solved)| (topic, TopicStats { total, solved }))
                .collect::<BTreeMap<_, _>>(),
            contest_stats,
        }
    }
}

//! Contest service

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::ContestRepository,
    error::{AppError, AppResult},
    handlers::contests::response::{ContestResponse, CreateContestResponse},
    metrics,
    models::{Contest, ContestProblem, ContestStatus},
    selection::{ContestSelector, Selection},
};

/// Contest service for business logic
pub struct ContestService;

impl ContestService {
    /// Select problems for the user and start a contest with them.
    ///
    /// An expired active contest is closed first; a running one blocks the
    /// request. Nothing is persisted unless selection succeeds.
    pub async fn create_contest(
        pool: &PgPool,
        selector: &ContestSelector,
        user_id: &Uuid,
        problem_count: u32,
        duration_minutes: i32,
    ) -> AppResult<CreateContestResponse> {
        if let Some(active) = ContestRepository::find_active_by_user(pool, user_id).await? {
            if !active.is_expired() {
                return Err(AppError::ActiveContestExists);
            }
            Self::close_expired(pool, &active).await?;
        }

        let selection = selector.select(*user_id, problem_count as usize).await?;

        let contest = ContestRepository::create_with_problems(
            pool,
            user_id,
            duration_minutes,
            &Self::slots(&selection),
        )
        .await?;

        let problems = ContestRepository::find_problems(pool, &contest.id).await?;
        metrics::contest_started();

        tracing::info!(
            contest_id = %contest.id,
            user_id = %user_id,
            requested = problem_count,
            selected = selection.len(),
            truncated = selection.truncated,
            "Contest created"
        );

        Ok(CreateContestResponse {
            notice: Self::truncation_notice(&selection),
            requested_problems: problem_count,
            contest: ContestResponse::build(contest, problems, Utc::now()),
        })
    }

    /// Get a contest owned by the user
    pub async fn get_contest(
        pool: &PgPool,
        user_id: &Uuid,
        contest_id: &Uuid,
    ) -> AppResult<ContestResponse> {
        let mut contest = Self::find_owned(pool, user_id, contest_id).await?;

        if contest.is_expired() {
            contest = Self::close_expired(pool, &contest).await?;
        }

        let problems = ContestRepository::find_problems(pool, &contest.id).await?;
        Ok(ContestResponse::build(contest, problems, Utc::now()))
    }

    /// All of the user's contests, newest first
    pub async fn list_contests(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<ContestResponse>> {
        let contests = ContestRepository::list_by_user(pool, user_id).await?;
        if contests.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = contests.iter().map(|c| c.id).collect();
        let problems = ContestRepository::find_problems_for(pool, &ids).await?;

        Ok(Self::assemble_list(contests, problems))
    }

    /// The user's running contest, if any
    pub async fn get_active_contest(
        pool: &PgPool,
        user_id: &Uuid,
    ) -> AppResult<Option<ContestResponse>> {
        let Some(contest) = ContestRepository::find_active_by_user(pool, user_id).await? else {
            return Ok(None);
        };

        if contest.is_expired() {
            Self::close_expired(pool, &contest).await?;
            return Ok(None);
        }

        let problems = ContestRepository::find_problems(pool, &contest.id).await?;
        Ok(Some(ContestResponse::build(contest, problems, Utc::now())))
    }

    /// Mark a problem of a running contest complete or incomplete
    pub async fn set_problem_completed(
        pool: &PgPool,
        user_id: &Uuid,
        contest_id: &Uuid,
        problem_id: &Uuid,
        is_completed: bool,
    ) -> AppResult<()> {
        let contest = Self::find_owned(pool, user_id, contest_id).await?;

        if contest.status != ContestStatus::Active {
            return Err(AppError::ContestNotActive);
        }
        if contest.is_expired() {
            return Err(AppError::ContestExpired);
        }

        let new_solve = ContestRepository::set_problem_completed(
            pool,
            contest_id,
            user_id,
            problem_id,
            is_completed,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found in this contest".to_string()))?;

        if new_solve {
            metrics::problem_solved();
        }

        tracing::debug!(
            contest_id = %contest_id,
            problem_id = %problem_id,
            is_completed,
            "Contest problem updated"
        );
        Ok(())
    }

    /// Complete or abandon a running contest
    pub async fn finish_contest(
        pool: &PgPool,
        user_id: &Uuid,
        contest_id: &Uuid,
        status: ContestStatus,
    ) -> AppResult<Contest> {
        let contest = Self::find_owned(pool, user_id, contest_id).await?;

        if contest.status != ContestStatus::Active {
            return Err(AppError::ContestNotActive);
        }

        let finished = ContestRepository::finish(pool, contest_id, status)
            .await?
            .ok_or(AppError::ContestNotActive)?;
        metrics::contest_finished(&status.to_string());

        tracing::info!(contest_id = %contest_id, user_id = %user_id, status = %status, "Contest finished");
        Ok(finished)
    }

    async fn find_owned(pool: &PgPool, user_id: &Uuid, contest_id: &Uuid) -> AppResult<Contest> {
        let contest = ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        Self::ensure_owner(&contest, user_id)?;
        Ok(contest)
    }

    fn ensure_owner(contest: &Contest, user_id: &Uuid) -> AppResult<()> {
        if contest.user_id != *user_id {
            return Err(AppError::Forbidden(
                "You don't have access to this contest".to_string(),
            ));
        }
        Ok(())
    }

    /// Time ran out: the contest counts as completed
    async fn close_expired(pool: &PgPool, contest: &Contest) -> AppResult<Contest> {
        let closed = ContestRepository::finish(pool, &contest.id, ContestStatus::Completed).await?;

        match closed {
            Some(closed) => {
                metrics::contest_finished(&closed.status.to_string());
                tracing::info!(contest_id = %contest.id, "Expired contest auto-completed");
                Ok(closed)
            }
            // Finished concurrently by another request
            None => ContestRepository::find_by_id(pool, &contest.id)
                .await?
                .ok_or_else(|| AppError::NotFound("Contest not found".to_string())),
        }
    }

    /// `(problem_id, position)` rows to persist
    fn slots(selection: &Selection) -> Vec<(Uuid, i32)> {
        selection
            .problems
            .iter()
            .map(|s| (s.problem.id, s.position as i32))
            .collect()
    }

    fn truncation_notice(selection: &Selection) -> Option<String> {
        selection.truncated.then(|| {
            format!(
                "Only {} unsolved problems were available, so the contest has {} of the {} requested",
                selection.len(),
                selection.len(),
                selection.requested
            )
        })
    }

    fn assemble_list(contests: Vec<Contest>, problems: Vec<ContestProblem>) -> Vec<ContestResponse> {
        let mut by_contest: HashMap<Uuid, Vec<ContestProblem>> = HashMap::new();
        for problem in problems {
            by_contest.entry(problem.contest_id).or_default().push(problem);
        }

        let now = Utc::now();
        contests
            .into_iter()
            .map(|contest| {
                let mut problems = by_contest.remove(&contest.id).unwrap_or_default();
                problems.sort_by_key(|p| p.position);
                ContestResponse::build(contest, problems, now)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Difficulty,
        selection::{SelectedProblem, plan_distribution, testing::problem},
    };

    fn contest(user_id: Uuid) -> Contest {
        let now = Utc::now();
        Contest {
            id: Uuid::new_v4(),
            user_id,
            duration_minutes: 60,
            started_at: now,
            ended_at: None,
            status: ContestStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn selection(found: usize, requested: usize) -> Selection {
        Selection {
            problems: (0..found)
                .map(|i| SelectedProblem {
                    position: i as u32 + 1,
                    problem: problem(Difficulty::Easy, i as i32 + 1),
                })
                .collect(),
            requested,
            distribution: plan_distribution(requested),
            truncated: found < requested,
        }
    }

    #[test]
    fn test_ensure_owner() {
        let owner = Uuid::new_v4();
        let c = contest(owner);

        assert!(ContestService::ensure_owner(&c, &owner).is_ok());
        let err = ContestService::ensure_owner(&c, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_slots_keep_engine_positions() {
        let s = selection(3, 3);
        let slots = ContestService::slots(&s);

        assert_eq!(slots.len(), 3);
        assert_eq!(
            slots.iter().map(|(_, pos)| *pos).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(slots[0].0, s.problems[0].problem.id);
    }

    #[test]
    fn test_notice_only_when_truncated() {
        assert!(ContestService::truncation_notice(&selection(5, 5)).is_none());

        let notice = ContestService::truncation_notice(&selection(2, 5)).unwrap();
        assert!(notice.contains("2 of the 5"));
    }

    #[test]
    fn test_assemble_list_groups_problems() {
        let user = Uuid::new_v4();
        let first = contest(user);
        let second = contest(user);

        let slot = |contest_id: Uuid, position: i32, is_completed: bool| ContestProblem {
            contest_id,
            position,
            is_completed,
            problem: problem(Difficulty::Medium, position),
        };
        let problems = vec![
            slot(second.id, 2, false),
            slot(first.id, 1, true),
            slot(second.id, 1, true),
        ];

        let list = ContestService::assemble_list(vec![first.clone(), second.clone()], problems);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, first.id);
        assert_eq!(list[0].total_problems, 1);
        assert_eq!(list[0].completed_problems, 1);
        assert_eq!(list[1].total_problems, 2);
        assert_eq!(
            list[1].problems.iter().map(|p| p.position).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}

//! Contest repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Contest, ContestProblem, ContestStats, ContestStatus},
};

const ONE_ACTIVE_PER_USER_INDEX: &str = "idx_contests_one_active_per_user";

const CONTEST_PROBLEMS_QUERY: &str = r#"
    SELECT cp.contest_id, cp.position, cp.is_completed, p.*
    FROM contest_problems cp
    JOIN problems p ON p.id = cp.problem_id
"#;

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Create an active contest together with its problem slots.
    ///
    /// `problems` holds `(problem_id, position)` pairs. Both inserts share one
    /// transaction, so a failure leaves nothing behind. A second active
    /// contest for the same user is rejected by the database.
    pub async fn create_with_problems(
        pool: &PgPool,
        user_id: &Uuid,
        duration_minutes: i32,
        problems: &[(Uuid, i32)],
    ) -> AppResult<Contest> {
        let mut tx = pool.begin().await?;

        let contest = sqlx::query_as::<_, Contest>(
            r#"
            INSERT INTO contests (user_id, duration_minutes, status)
            VALUES ($1, $2, 'active')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(duration_minutes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let second_active = matches!(
                &e,
                sqlx::Error::Database(db_err)
                    if db_err.constraint() == Some(ONE_ACTIVE_PER_USER_INDEX)
            );
            if second_active {
                AppError::ActiveContestExists
            } else {
                AppError::from(e)
            }
        })?;

        let (problem_ids, positions): (Vec<Uuid>, Vec<i32>) = problems.iter().copied().unzip();

        sqlx::query(
            r#"
            INSERT INTO contest_problems (contest_id, problem_id, position)
            SELECT $1, problem_id, position
            FROM UNNEST($2::uuid[], $3::int4[]) AS t(problem_id, position)
            "#,
        )
        .bind(contest.id)
        .bind(&problem_ids)
        .bind(&positions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(contest)
    }

    /// Find contest by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(contest)
    }

    /// The user's active contest, if any
    pub async fn find_active_by_user(pool: &PgPool, user_id: &Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"SELECT * FROM contests WHERE user_id = $1 AND status = 'active'"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(contest)
    }

    /// All of a user's contests, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(
            r#"SELECT * FROM contests WHERE user_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(contests)
    }

    /// Problems of one contest by position
    pub async fn find_problems(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<ContestProblem>> {
        let problems = sqlx::query_as::<_, ContestProblem>(&format!(
            "{} WHERE cp.contest_id = $1 ORDER BY cp.position ASC",
            CONTEST_PROBLEMS_QUERY
        ))
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }

    /// Problems of several contests, grouped by the caller
    pub async fn find_problems_for(
        pool: &PgPool,
        contest_ids: &[Uuid],
    ) -> AppResult<Vec<ContestProblem>> {
        let problems = sqlx::query_as::<_, ContestProblem>(&format!(
            "{} WHERE cp.contest_id = ANY($1) ORDER BY cp.contest_id, cp.position ASC",
            CONTEST_PROBLEMS_QUERY
        ))
        .bind(contest_ids)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }

    /// Move an active contest to a final status.
    ///
    /// Returns `None` when the contest was no longer active.
    pub async fn finish(
        pool: &PgPool,
        id: &Uuid,
        status: ContestStatus,
    ) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            UPDATE contests
            SET status = $2, ended_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(contest)
    }

    /// Set a contest problem's completion flag.
    ///
    /// Marking it complete also records a solve for the user unless one
    /// already exists. Returns `None` when the problem is not part of the
    /// contest, otherwise whether a new solve record was written.
    pub async fn set_problem_completed(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        problem_id: &Uuid,
        is_completed: bool,
    ) -> AppResult<Option<bool>> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE contest_problems SET is_completed = $3
            WHERE contest_id = $1 AND problem_id = $2
            "#,
        )
        .bind(contest_id)
        .bind(problem_id)
        .bind(is_completed)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let mut new_solve = false;
        if is_completed {
            let inserted = sqlx::query(
                r#"
                INSERT INTO submissions (user_id, problem_id, contest_id)
                SELECT $1, $2, $3
                WHERE NOT EXISTS (
                    SELECT 1 FROM submissions WHERE user_id = $1 AND problem_id = $2
                )
                "#,
            )
            .bind(user_id)
            .bind(problem_id)
            .bind(contest_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            new_solve = inserted == 1;
        }

        tx.commit().await?;
        Ok(Some(new_solve))
    }

    /// Number of running contests across all users
    pub async fn count_active(pool: &PgPool) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM contests WHERE status = 'active'"#)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Contest counts by outcome for a user
    pub async fn stats_for_user(pool: &PgPool, user_id: &Uuid) -> AppResult<ContestStats> {
        let stats = sqlx::query_as::<_, ContestStats>(
            r#"
            SELECT
                COUNT(*) AS total_contests,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_contests,
                COUNT(*) FILTER (WHERE status = 'abandoned') AS abandoned_contests
            FROM contests
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}

//! Solve record model
//!
//! A solve record states that a user solved a problem, optionally during a
//! contest. Records are append-only; for exclusion purposes only their
//! existence matters, not how many there are for the same pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Problem;

/// Solve record database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SolveRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub solved_at: DateTime<Utc>,
}

/// Solve record joined with the solved problem, for history listings
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SolvedProblem {
    pub record_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub solved_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub problem: Problem,
}

//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Contest, ContestProblem, ContestStatus, Problem};

/// Problem slot in a contest
#[derive(Debug, Serialize)]
pub struct ContestProblemResponse {
    pub position: i32,
    pub is_completed: bool,
    pub problem: Problem,
}

impl From<ContestProblem> for ContestProblemResponse {
    fn from(cp: ContestProblem) -> Self {
        Self {
            position: cp.position,
            is_completed: cp.is_completed,
            problem: cp.problem,
        }
    }
}

/// Contest with its problems and timer
#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub id: Uuid,
    pub duration_minutes: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: ContestStatus,
    pub time_remaining_seconds: i64,
    pub total_problems: usize,
    pub completed_problems: usize,
    pub problems: Vec<ContestProblemResponse>,
}

impl ContestResponse {
    pub fn build(contest: Contest, problems: Vec<ContestProblem>, now: DateTime<Utc>) -> Self {
        let completed_problems = problems.iter().filter(|p| p.is_completed).count();

        Self {
            id: contest.id,
            duration_minutes: contest.duration_minutes,
            started_at: contest.started_at,
            ended_at: contest.ended_at,
            status: contest.status,
            time_remaining_seconds: contest.time_remaining_seconds_at(now),
            total_problems: problems.len(),
            completed_problems,
            problems: problems.into_iter().map(Into::into).collect(),
        }
    }
}

/// Newly created contest
#[derive(Debug, Serialize)]
pub struct CreateContestResponse {
    #[serde(flatten)]
    pub contest: ContestResponse,
    pub requested_problems: u32,
    /// Set when fewer unsolved problems were available than requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// User's contests
#[derive(Debug, Serialize)]
pub struct ContestListResponse {
    pub contests: Vec<ContestResponse>,
    pub total: usize,
}

/// Active contest, `null` when there is none
#[derive(Debug, Serialize)]
pub struct ActiveContestResponse {
    pub contest: Option<ContestResponse>,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

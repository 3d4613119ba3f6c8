//! User response DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ContestStats, Problem, SolvedProblem, User};

/// Public user profile
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Solved versus available problems for one topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicStats {
    pub total: i64,
    pub solved: i64,
}

/// Solve progress across the catalog
#[derive(Debug, Serialize)]
pub struct UserProgressResponse {
    pub total_solved: i64,
    pub easy_solved: i64,
    pub medium_solved: i64,
    pub hard_solved: i64,
    pub topic_progress: BTreeMap<String, TopicStats>,
    pub contest_stats: ContestStats,
}

/// One entry of the solve history
#[derive(Debug, Serialize)]
pub struct SolvedProblemResponse {
    pub record_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub solved_at: DateTime<Utc>,
    pub problem: Problem,
}

impl From<SolvedProblem> for SolvedProblemResponse {
    fn from(solved: SolvedProblem) -> Self {
        Self {
            record_id: solved.record_id,
            contest_id: solved.contest_id,
            solved_at: solved.solved_at,
            problem: solved.problem,
        }
    }
}

/// Solve history response
#[derive(Debug, Serialize)]
pub struct SolvedListResponse {
    pub solved: Vec<SolvedProblemResponse>,
    pub total: usize,
}

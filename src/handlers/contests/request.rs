//! Contest request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_CONTEST_DURATION_MINUTES, MAX_PROBLEM_COUNT, MIN_CONTEST_DURATION_MINUTES,
    MIN_PROBLEM_COUNT,
};

/// Create contest request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContestRequest {
    #[validate(range(min = MIN_PROBLEM_COUNT, max = MAX_PROBLEM_COUNT))]
    pub problem_count: u32,

    #[validate(range(min = MIN_CONTEST_DURATION_MINUTES, max = MAX_CONTEST_DURATION_MINUTES))]
    pub duration_minutes: i32,
}

/// Toggle a contest problem's completion
#[derive(Debug, Deserialize)]
pub struct UpdateContestProblemRequest {
    pub is_completed: bool,
}

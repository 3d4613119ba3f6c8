//! Problem response DTOs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Problem;

/// Problem listing in catalog order
#[derive(Debug, Serialize)]
pub struct ProblemsListResponse {
    pub problems: Vec<Problem>,
    pub total: usize,
}

/// Catalog composition
#[derive(Debug, Serialize)]
pub struct ProblemStatsResponse {
    pub total: i64,
    pub by_difficulty: BTreeMap<String, i64>,
    pub by_topic: BTreeMap<String, i64>,
}

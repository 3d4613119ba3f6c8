//! Problem handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{error::AppResult, models::Problem, services::ProblemService, state::AppState};

use super::{
    request::ListProblemsQuery,
    response::{ProblemStatsResponse, ProblemsListResponse},
};

/// List catalog problems
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListProblemsQuery>,
) -> AppResult<Json<ProblemsListResponse>> {
    let problems = ProblemService::list_problems(state.db(), &query).await?;

    Ok(Json(ProblemsListResponse {
        total: problems.len(),
        problems,
    }))
}

/// Catalog statistics
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<ProblemStatsResponse>> {
    let stats = ProblemService::get_stats(state.db()).await?;
    Ok(Json(stats))
}

/// Get a single problem
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Problem>> {
    let problem = ProblemService::get_problem(state.db(), &id).await?;
    Ok(Json(problem))
}

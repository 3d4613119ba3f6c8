//! Contest handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult, middleware::auth::AuthenticatedUser, models::ContestStatus,
    services::ContestService, state::AppState,
};

use super::{
    request::{CreateContestRequest, UpdateContestProblemRequest},
    response::{
        ActiveContestResponse, ContestListResponse, ContestResponse, CreateContestResponse,
        MessageResponse,
    },
};

/// Create a contest with freshly selected problems
pub async fn create_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateContestRequest>,
) -> AppResult<(StatusCode, Json<CreateContestResponse>)> {
    payload.validate()?;

    let response = ContestService::create_contest(
        state.db(),
        state.selector(),
        &auth_user.id,
        payload.problem_count,
        payload.duration_minutes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List the user's contests
pub async fn list_contests(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ContestListResponse>> {
    let contests = ContestService::list_contests(state.db(), &auth_user.id).await?;

    Ok(Json(ContestListResponse {
        total: contests.len(),
        contests,
    }))
}

/// Get the user's active contest
pub async fn get_active_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ActiveContestResponse>> {
    let contest = ContestService::get_active_contest(state.db(), &auth_user.id).await?;
    Ok(Json(ActiveContestResponse { contest }))
}

/// Get contest by ID
pub async fn get_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestResponse>> {
    let contest = ContestService::get_contest(state.db(), &auth_user.id, &id).await?;
    Ok(Json(contest))
}

/// Mark a contest problem complete or incomplete
pub async fn update_contest_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, problem_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateContestProblemRequest>,
) -> AppResult<Json<MessageResponse>> {
    ContestService::set_problem_completed(
        state.db(),
        &auth_user.id,
        &id,
        &problem_id,
        payload.is_completed,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Problem status updated".to_string(),
    }))
}

/// Finish a contest early
pub async fn complete_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    ContestService::finish_contest(state.db(), &auth_user.id, &id, ContestStatus::Completed)
        .await?;

    Ok(Json(MessageResponse {
        message: "Contest completed".to_string(),
    }))
}

/// Give up on a contest
pub async fn abandon_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    ContestService::finish_contest(state.db(), &auth_user.id, &id, ContestStatus::Abandoned)
        .await?;

    Ok(Json(MessageResponse {
        message: "Contest abandoned".to_string(),
    }))
}

//! User handler implementations

use axum::{Json, extract::State};

use crate::{
    error::AppResult, middleware::auth::AuthenticatedUser, services::UserService,
    state::AppState,
};

use super::response::{SolvedListResponse, UserProgressResponse, UserResponse};

/// Get the authenticated user's profile
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::get_user(state.db(), &auth_user.id).await?;
    Ok(Json(user.into()))
}

/// Get the authenticated user's solve progress
pub async fn get_progress(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserProgressResponse>> {
    let progress = UserService::get_progress(state.db(), &auth_user.id).await?;
    Ok(Json(progress))
}

/// Get the authenticated user's solve history
pub async fn get_solved(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<SolvedListResponse>> {
    let solved = UserService::get_solved(state.db(), &auth_user.id).await?;
    Ok(Json(solved))
}

//! Authentication handler implementations

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    error::AppResult, middleware::auth::AuthenticatedUser, services::AuthService,
    services::auth_service::TokenPair, state::AppState,
};

use super::{
    request::{LoginRequest, RefreshTokenRequest, SignupRequest},
    response::{AuthResponse, LogoutResponse},
};

/// Create an account and sign in
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;

    let (user, tokens) = AuthService::signup(
        state.db(),
        state.redis(),
        &state.config().jwt,
        &payload.email,
        &payload.username,
        &payload.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            tokens,
        }),
    ))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (user, tokens) = AuthService::login(
        state.db(),
        state.redis(),
        &state.config().jwt,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// Rotate a refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<TokenPair>> {
    payload.validate()?;

    let tokens = AuthService::refresh(
        state.db(),
        state.redis(),
        &state.config().jwt,
        &payload.refresh_token,
    )
    .await?;

    Ok(Json(tokens))
}

/// Logout (revoke all refresh sessions)
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<LogoutResponse>> {
    AuthService::logout(state.redis(), &auth_user.id).await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

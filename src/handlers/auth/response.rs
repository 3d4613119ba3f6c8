//! Authentication response DTOs

use serde::Serialize;

use crate::{handlers::users::response::UserResponse, services::auth_service::TokenPair};

/// Signup and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

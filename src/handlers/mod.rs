//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod contests;
pub mod health;
pub mod metrics;
pub mod problems;
pub mod users;

use axum::{Router, middleware};

use crate::{
    middleware::{auth_middleware, rate_limit_middleware},
    state::AppState,
};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .nest(
            "/auth",
            auth::routes()
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                ))
                .merge(auth::protected_routes().route_layer(authenticated())),
        )
        .nest("/users", users::routes().route_layer(authenticated()))
        .nest("/contests", contests::routes().route_layer(authenticated()))
        .nest("/problems", problems::routes())
}

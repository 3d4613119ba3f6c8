//! Contest handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Contest routes (all authenticated)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_contest))
        .route("/", get(handler::list_contests))
        .route("/active", get(handler::get_active_contest))
        .route("/{id}", get(handler::get_contest))
        .route(
            "/{id}/problems/{problem_id}",
            patch(handler::update_contest_problem),
        )
        .route("/{id}/complete", post(handler::complete_contest))
        .route("/{id}/abandon", post(handler::abandon_contest))
}

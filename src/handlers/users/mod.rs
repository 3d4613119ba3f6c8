//! User handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// User routes (all authenticated)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handler::get_me))
        .route("/me/progress", get(handler::get_progress))
        .route("/me/solved", get(handler::get_solved))
}

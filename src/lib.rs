//! Contest Maker 150 - Timed Practice Contests
//!
//! This library provides the core functionality for Contest Maker, which
//! builds timed practice contests from a fixed 150-problem catalog and tracks
//! what each user has solved so later contests avoid repeats.
//!
//! # Features
//!
//! - Difficulty distribution that grows harder with the contest size
//! - Random sampling of unsolved problems per difficulty tier
//! - Contest timer with auto-completion on expiry
//! - Solve history and topic progress
//! - Prometheus metrics at `/metrics`
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Selection**: Problem selection engine, storage-agnostic
//! - **Repositories**: Database access
//! - **Models**: Domain models

pub mod catalog;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod selection;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

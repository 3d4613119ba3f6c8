//! Business logic services

pub mod auth_service;
pub mod contest_service;
pub mod problem_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use contest_service::ContestService;
pub use problem_service::ProblemService;
pub use user_service::UserService;

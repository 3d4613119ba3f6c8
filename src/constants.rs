//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default deployment environment
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Overall request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum request body size in bytes
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// DATABASE & CACHE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 25;

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default access token expiry in minutes
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Default refresh token expiry in hours (7 days)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS: i64 = 168;

/// Default JWT issuer claim
pub const DEFAULT_JWT_ISSUER: &str = "contest-maker-150";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 50;

/// Token type claim values
pub mod token_types {
    pub const ACCESS: &str = "access";
    pub const REFRESH: &str = "refresh";
}

/// Redis key prefix for refresh sessions
pub const REFRESH_SESSION_PREFIX: &str = "refresh_session";

// =============================================================================
// CONTEST SETTINGS
// =============================================================================

/// Smallest contest
pub const MIN_PROBLEM_COUNT: u32 = 1;

/// Largest contest
pub const MAX_PROBLEM_COUNT: u32 = 20;

/// Shortest contest duration in minutes
pub const MIN_CONTEST_DURATION_MINUTES: i32 = 10;

/// Longest contest duration in minutes
pub const MAX_CONTEST_DURATION_MINUTES: i32 = 300;

/// Default timeout for fetching all unsolved pools, in milliseconds
pub const DEFAULT_SELECTION_FETCH_TIMEOUT_MS: u64 = 3000;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 10;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;
}

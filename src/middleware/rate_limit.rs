//! Rate limiting middleware

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;

use crate::{constants::rate_limits, error::AppError, state::AppState};

/// Per-IP fixed window limit for authentication routes.
///
/// Redis failures let the request through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = bucket_key(&addr);
    let mut redis = state.redis();

    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit check failed, allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        // Set expiry on first request
        if let Err(e) = redis
            .expire::<_, ()>(&key, rate_limits::AUTH_WINDOW_SECS)
            .await
        {
            tracing::warn!(error = %e, key = %key, "Failed to set rate limit window");
        }
    }

    if count > rate_limits::AUTH_MAX_REQUESTS {
        tracing::debug!(ip = %addr.ip(), count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

fn bucket_key(addr: &SocketAddr) -> String {
    format!("rate_limit:auth:{}", addr.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_key_ignores_port() {
        let a: SocketAddr = "10.0.0.7:5000".parse().unwrap();
        let b: SocketAddr = "10.0.0.7:6000".parse().unwrap();
        assert_eq!(bucket_key(&a), bucket_key(&b));
        assert_eq!(bucket_key(&a), "rate_limit:auth:10.0.0.7");
    }
}

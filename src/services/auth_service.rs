//! Authentication service

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::JwtConfig,
    constants::{REFRESH_SESSION_PREFIX, token_types},
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
    utils::{hash_string, normalize_email},
};

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub token_type: String,
}

/// JWT claims for refresh tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub token_type: String,
    /// Session ID for rotation and revocation
    pub session_id: Uuid,
}

/// Access and refresh token pair handed to clients
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user and open a session
    pub async fn signup(
        pool: &PgPool,
        redis: ConnectionManager,
        jwt: &JwtConfig,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<(User, TokenPair)> {
        let email = normalize_email(email);

        if UserRepository::email_exists(pool, &email).await? {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(password)?;

        // A concurrent signup with the same email hits the unique index
        let user = UserRepository::create(pool, &email, username.trim(), &password_hash)
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(_) => {
                    AppError::AlreadyExists("Email already registered".to_string())
                }
                other => other,
            })?;

        let tokens = Self::open_session(redis, jwt, &user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok((user, tokens))
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        redis: ConnectionManager,
        jwt: &JwtConfig,
        email: &str,
        password: &str,
    ) -> AppResult<(User, TokenPair)> {
        let user = UserRepository::find_by_email(pool, &normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = Self::open_session(redis, jwt, &user).await?;
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new pair, retiring the old session
    pub async fn refresh(
        pool: &PgPool,
        mut redis: ConnectionManager,
        jwt: &JwtConfig,
        refresh_token: &str,
    ) -> AppResult<TokenPair> {
        let claims = Self::verify_refresh_token(refresh_token, jwt)?;

        let key = Self::session_key(&claims.sub, &claims.session_id);
        let removed: i64 = redis.del(&key).await?;
        if removed == 0 {
            // Already rotated, revoked or expired
            return Err(AppError::InvalidToken);
        }

        let user = UserRepository::find_by_id(pool, &claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Self::open_session(redis, jwt, &user).await
    }

    /// Revoke every refresh session of a user
    pub async fn logout(mut redis: ConnectionManager, user_id: &Uuid) -> AppResult<()> {
        let pattern = format!("{}:{}:*", REFRESH_SESSION_PREFIX, user_id);
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut redis)
            .await?;

        for key in keys {
            redis.del::<_, ()>(&key).await?;
        }

        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Verify an access token and extract its claims
    pub fn verify_access_token(token: &str, jwt: &JwtConfig) -> AppResult<AccessTokenClaims> {
        let claims = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(jwt.secret.as_bytes()),
            &Self::validation(jwt),
        )?
        .claims;

        if claims.token_type != token_types::ACCESS {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    /// Verify a refresh token and extract its claims
    pub fn verify_refresh_token(token: &str, jwt: &JwtConfig) -> AppResult<RefreshTokenClaims> {
        let claims = decode::<RefreshTokenClaims>(
            token,
            &DecodingKey::from_secret(jwt.secret.as_bytes()),
            &Self::validation(jwt),
        )?
        .claims;

        if claims.token_type != token_types::REFRESH {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    /// Issue a token pair and remember its refresh session
    async fn open_session(
        mut redis: ConnectionManager,
        jwt: &JwtConfig,
        user: &User,
    ) -> AppResult<TokenPair> {
        let session_id = Uuid::new_v4();
        let tokens = Self::issue_tokens(jwt, user, session_id)?;

        let ttl = (jwt.refresh_expiry_hours * 3600).max(1) as u64;
        redis
            .set_ex::<_, _, ()>(Self::session_key(&user.id, &session_id), "1", ttl)
            .await?;

        Ok(tokens)
    }

    fn issue_tokens(jwt: &JwtConfig, user: &User, session_id: Uuid) -> AppResult<TokenPair> {
        let now = Utc::now();
        let key = EncodingKey::from_secret(jwt.secret.as_bytes());

        let access = AccessTokenClaims {
            sub: user.id,
            email: user.email.clone(),
            exp: (now + Duration::minutes(jwt.access_expiry_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: jwt.issuer.clone(),
            token_type: token_types::ACCESS.to_string(),
        };

        let refresh = RefreshTokenClaims {
            sub: user.id,
            exp: (now + Duration::hours(jwt.refresh_expiry_hours)).timestamp(),
            iat: now.timestamp(),
            iss: jwt.issuer.clone(),
            token_type: token_types::REFRESH.to_string(),
            session_id,
        };

        let access_token = encode(&Header::default(), &access, &key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh, &key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.access_expiry_minutes * 60,
        })
    }

    fn validation(jwt: &JwtConfig) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[jwt.issuer.as_str()]);
        validation
    }

    /// Redis key for a refresh session; the session id is stored hashed
    fn session_key(user_id: &Uuid, session_id: &Uuid) -> String {
        format!(
            "{}:{}:{}",
            REFRESH_SESSION_PREFIX,
            user_id,
            hash_string(&session_id.to_string())
        )
    }

    /// Hash password using Argon2
    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 168,
            issuer: "contest-maker-150".to_string(),
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let jwt = jwt_config();
        let user = user();
        let session_id = Uuid::new_v4();

        let tokens = AuthService::issue_tokens(&jwt, &user, session_id).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 15 * 60);

        let access = AuthService::verify_access_token(&tokens.access_token, &jwt).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.email, user.email);

        let refresh = AuthService::verify_refresh_token(&tokens.refresh_token, &jwt).unwrap();
        assert_eq!(refresh.sub, user.id);
        assert_eq!(refresh.session_id, session_id);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let jwt = jwt_config();
        let tokens = AuthService::issue_tokens(&jwt, &user(), Uuid::new_v4()).unwrap();

        assert!(AuthService::verify_access_token(&tokens.refresh_token, &jwt).is_err());
        assert!(AuthService::verify_refresh_token(&tokens.access_token, &jwt).is_err());
    }

    #[test]
    fn test_rejects_foreign_issuer_and_secret() {
        let jwt = jwt_config();
        let tokens = AuthService::issue_tokens(&jwt, &user(), Uuid::new_v4()).unwrap();

        let other_issuer = JwtConfig {
            issuer: "someone-else".to_string(),
            ..jwt_config()
        };
        assert!(AuthService::verify_access_token(&tokens.access_token, &other_issuer).is_err());

        let other_secret = JwtConfig {
            secret: "a-completely-different-secret".to_string(),
            ..jwt_config()
        };
        let err = AuthService::verify_access_token(&tokens.access_token, &other_secret).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_expired_access_token() {
        let jwt = JwtConfig {
            access_expiry_minutes: -10,
            ..jwt_config()
        };
        let tokens = AuthService::issue_tokens(&jwt, &user(), Uuid::new_v4()).unwrap();

        let err = AuthService::verify_access_token(&tokens.access_token, &jwt).unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn test_password_hashing() {
        let hash = AuthService::hash_password("correct horse battery").unwrap();
        assert!(AuthService::verify_password("correct horse battery", &hash).unwrap());
        assert!(!AuthService::verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_session_key_hides_session_id() {
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let key = AuthService::session_key(&user_id, &session_id);

        assert!(key.starts_with(&format!("refresh_session:{}:", user_id)));
        assert!(!key.contains(&session_id.to_string()));
    }
}

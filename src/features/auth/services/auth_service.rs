use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, RefreshTokenRequestDto,
    RegisterRequestDto,
};
use crate::features::auth::models::{AuthenticatedUser, User};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::JwtService;

/// Service for registration, login and token refresh
pub struct AuthService {
    pool: PgPool,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtService>) -> Self {
        Self { pool, jwt }
    }

    /// Register a new user and issue a first token pair
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let existing = self.find_by_username(&dto.username).await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Username already exists.".to_string()));
        }

        let password_hash = hash_password(&dto.password)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, refresh_token_hash, refresh_token_expires_at, created_at
            "#,
        )
        .bind(&dto.username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("User registered: id={}, username={}", user.id, user.username);

        self.issue_tokens(&user).await
    }

    /// Authenticate with username and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .find_by_username(&dto.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let password_valid = verify_password(&dto.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

        if !password_valid {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        self.issue_tokens(&user).await
    }

    /// Exchange a valid refresh token for a fresh token pair.
    ///
    /// The stored refresh token is rotated on every successful exchange.
    pub async fn refresh_token(&self, dto: RefreshTokenRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .find_by_username(&dto.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        let expired = user
            .refresh_token_expires_at
            .map(|expiry| expiry < Utc::now())
            .unwrap_or(true);
        if expired {
            return Err(AppError::Unauthorized(
                "Refresh token expired. Please login again.".to_string(),
            ));
        }

        let incoming_hash = JwtService::hash_refresh_token(&dto.refresh_token);
        if user.refresh_token_hash.as_deref() != Some(incoming_hash.as_str()) {
            return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
        }

        self.issue_tokens(&user).await
    }

    /// Get current authenticated user info
    pub async fn get_current_user(&self, auth: AuthenticatedUser) -> Result<MeResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, refresh_token_hash, refresh_token_expires_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(auth.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(MeResponseDto {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, refresh_token_hash, refresh_token_expires_at, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user by username: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Issue an access token and a rotated refresh token for `user`.
    async fn issue_tokens(&self, user: &User) -> Result<AuthResponseDto> {
        let (access_token, expires_in) =
            self.jwt.generate_access_token(user.id, &user.username)?;
        let (refresh_token, refresh_hash) = self.jwt.generate_refresh_token();
        let refresh_expiry = self.jwt.refresh_token_expiry();

        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, refresh_token_expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&refresh_hash)
        .bind(refresh_expiry)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store refresh token: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            refresh_token,
            user: AuthUserDto {
                id: user.id,
                username: user.username.clone(),
            },
        })
    }
}

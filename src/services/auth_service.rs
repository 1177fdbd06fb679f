use chrono::Duration;
use sqlx::PgPool;

use crate::config::Config;
use crate::dto::auth_dto::TokenPairResponse;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::{self, TokenType};

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Signs an access/refresh pair and records the refresh token's id so it
    /// can be revoked on rotation.
    async fn issue_pair(&self, user_id: i64) -> Result<TokenPairResponse> {
        let access = token::issue(&self.jwt_secret, user_id, TokenType::Access, self.access_ttl)?;
        let refresh = token::issue(
            &self.jwt_secret,
            user_id,
            TokenType::Refresh,
            self.refresh_ttl,
        )?;

        sqlx::query("INSERT INTO refresh_tokens (jti, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(refresh.claims.jti)
            .bind(user_id)
            .bind(refresh.claims.expires_at())
            .execute(&self.pool)
            .await?;

        Ok(TokenPairResponse {
            access: access.token,
            refresh: refresh.token,
        })
    }

    pub async fn obtain(&self, username: &str, password: &str) -> Result<TokenPairResponse> {
        let invalid = || Error::Unauthorized("invalid_credentials".into());

        let user = self.find_user(username).await?.ok_or_else(invalid)?;
        if !user.is_active || !verify_password(password, &user.password_hash) {
            tracing::warn!(username, "rejected login attempt");
            return Err(invalid());
        }

        tracing::info!(user_id = user.id, "issued token pair");
        self.issue_pair(user.id).await
    }

    /// Rotates a refresh token: the presented one is revoked and can never be
    /// exchanged again.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPairResponse> {
        let claims = token::verify(&self.jwt_secret, refresh_token, TokenType::Refresh)?;
        let user_id = claims.user_id()?;

        let revoked = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = NOW()
            WHERE jti = $1 AND user_id = $2 AND revoked_at IS NULL
            RETURNING jti
            "#,
        )
        .bind(claims.jti)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if revoked.is_none() {
            tracing::warn!(user_id, jti = %claims.jti, "refresh token reuse or unknown token");
            return Err(Error::Unauthorized("invalid_token".into()));
        }

        self.issue_pair(user_id).await
    }

    /// Creates the user when missing; an existing user keeps its password.
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<bool> {
        let hash = hash_password(password)?;
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(id) = inserted {
            tracing::info!(user_id = id, username, "created user");
        }
        Ok(inserted.is_some())
    }
}

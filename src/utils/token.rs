use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: Uuid,
    pub token_type: TokenType,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::Unauthorized("invalid_token".into()))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp as i64, 0).unwrap_or_default()
    }
}

pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

pub fn issue(secret: &str, user_id: i64, token_type: TokenType, ttl: Duration) -> Result<IssuedToken> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp().max(0) as usize,
        iat: now.timestamp().max(0) as usize,
        jti: Uuid::new_v4(),
        token_type,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))?;
    Ok(IssuedToken { token, claims })
}

/// Verifies signature and expiry and that the token is of the `expected`
/// kind; a refresh token is never usable as an access token.
pub fn verify(secret: &str, token: &str, expected: TokenType) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| Error::Unauthorized("invalid_token".into()))?;
    if data.claims.token_type != expected {
        return Err(Error::Unauthorized("invalid_token".into()));
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn access_token_round_trips() {
        let issued = issue(SECRET, 42, TokenType::Access, Duration::minutes(5)).unwrap();
        let claims = verify(SECRET, &issued.token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.jti, issued.claims.jti);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let issued = issue(SECRET, 1, TokenType::Refresh, Duration::days(1)).unwrap();
        assert!(verify(SECRET, &issued.token, TokenType::Access).is_err());
        assert!(verify(SECRET, &issued.token, TokenType::Refresh).is_ok());
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let expired = issue(SECRET, 1, TokenType::Access, Duration::hours(-2)).unwrap();
        assert!(verify(SECRET, &expired.token, TokenType::Access).is_err());

        let other = issue("another_secret", 1, TokenType::Access, Duration::minutes(5)).unwrap();
        assert!(verify(SECRET, &other.token, TokenType::Access).is_err());
    }
}

use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Lifetime policy for issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        }
    }
}

/// Signed access token and its expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    /// Expiration (Unix timestamp)
    pub expires_at: i64,
}

/// Stateless issuer and validator of session tokens.
///
/// Access and refresh tokens are signed with the same keys and validated
/// through the same path; the caller decides which flow a token is used for.
#[derive(Debug)]
pub struct TokenIssuer {
    handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(handler: JwtHandler, lifetimes: TokenLifetimes) -> Self {
        Self { handler, lifetimes }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Issue a short-lived access token for `user_id`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_access_token(&self, user_id: i64) -> Result<AccessToken, JwtError> {
        let claims = Claims::for_user(user_id, self.lifetimes.access);
        let token = self.handler.encode(&claims)?;

        Ok(AccessToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Issue a long-lived refresh token for `user_id`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, JwtError> {
        self.handler
            .encode(&Claims::for_user(user_id, self.lifetimes.refresh))
    }

    /// Verify signature and expiration of a token and return its claims.
    ///
    /// # Errors
    /// * `Malformed`, `UnknownKey`, `InvalidSignature`, `TokenExpired`
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

use async_trait::async_trait;
use auth::Claims;
use auth::TokenPair;
use tokio_util::sync::CancellationToken;

use super::errors::AuthError;
use super::models::LoginCommand;
use super::models::LoginResult;

/// Port for session operations: login, refresh and bearer validation.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access and refresh token pair.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    /// * `cancel` - Aborts store and hashing work when triggered
    ///
    /// # Errors
    /// * `WrongCredentials` - Unknown email, malformed email or wrong password
    /// * `TokenGenerationError` - Signing failed
    /// * `Cancelled` - `cancel` fired before completion
    /// * `Store` - User store failure
    async fn login(
        &self,
        command: LoginCommand,
        cancel: &CancellationToken,
    ) -> Result<LoginResult, AuthError>;

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented refresh token stays valid until it expires.
    ///
    /// # Errors
    /// * `InvalidToken` - Token failed validation
    /// * `UserNotFound` - Account was deleted after the token was issued
    /// * `TokenGenerationError` - Signing failed
    /// * `Cancelled` - `cancel` fired before completion
    /// * `Store` - User store failure
    async fn refresh(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenPair, AuthError>;

    /// Validate a bearer token without touching the store.
    ///
    /// # Errors
    /// * `InvalidToken` - Token failed validation
    fn validate_bearer_token(&self, token: &str) -> Result<Claims, AuthError>;
}

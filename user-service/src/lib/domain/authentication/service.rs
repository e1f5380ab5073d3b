use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use auth::TokenPair;
use tokio_util::sync::CancellationToken;

use super::errors::AuthError;
use super::models::LoginCommand;
use super::models::LoginResult;
use super::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Authentication orchestrator over the user store and the token issuer.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Burn one verification worth of CPU so unknown accounts answer as slowly
    /// as wrong passwords.
    async fn reject_unknown(
        &self,
        password: String,
        cancel: &CancellationToken,
    ) -> Result<LoginResult, AuthError> {
        let hasher = self.authenticator.password_hasher();
        cancellable(
            cancel,
            tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)),
        )
        .await?;

        Err(AuthError::WrongCredentials)
    }

    fn issue_tokens(&self, user_id: &UserId) -> Result<TokenPair, AuthError> {
        self.authenticator
            .issue_token_pair(user_id.as_i64())
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Token generation failed");
                AuthError::TokenGenerationError(e.to_string())
            })
    }
}

/// Race `operation` against `cancel`, preferring cancellation when both are ready.
async fn cancellable<T, E, F>(cancel: &CancellationToken, operation: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, E>>,
    AuthError: From<E>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuthError::Cancelled),
        result = operation => result.map_err(AuthError::from),
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(
        &self,
        command: LoginCommand,
        cancel: &CancellationToken,
    ) -> Result<LoginResult, AuthError> {
        let LoginCommand { email, password } = command;

        let Ok(email) = EmailAddress::new(email) else {
            tracing::warn!("Login rejected: malformed email");
            return self.reject_unknown(password, cancel).await;
        };

        let Some(user) = cancellable(cancel, self.repository.find_by_email(&email)).await? else {
            tracing::warn!(email = %email, "Login rejected: unknown email");
            return self.reject_unknown(password, cancel).await;
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let user_id = user.id.as_i64();
        let authenticated = cancellable(
            cancel,
            tokio::task::spawn_blocking(move || {
                authenticator.authenticate(&password, stored_hash.as_str(), user_id)
            }),
        )
        .await?;

        let tokens = match authenticated {
            Ok(tokens) => tokens,
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AuthError::WrongCredentials);
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Token generation failed");
                return Err(AuthError::TokenGenerationError(e.to_string()));
            }
        };
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            user_id: user.id,
            role: user.role,
            tokens,
        })
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenPair, AuthError> {
        let claims = self.validate_bearer_token(refresh_token)?;
        let user_id = UserId(claims.user_id);

        if cancellable(cancel, self.repository.find_by_id(&user_id))
            .await?
            .is_none()
        {
            tracing::warn!(user_id = %user_id, "Refresh rejected: user no longer exists");
            return Err(AuthError::UserNotFound);
        }

        let tokens = self.issue_tokens(&user_id)?;
        tracing::info!(user_id = %user_id, "Session refreshed");

        Ok(tokens)
    }

    fn validate_bearer_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::InvalidToken
        })
    }
}

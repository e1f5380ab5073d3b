use thiserror::Error;

use crate::user::errors::UserError;

/// Errors surfaced by login, refresh and bearer token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown email and wrong password share this variant and message.
    #[error("Invalid email or password")]
    WrongCredentials,

    /// Expired, forged, malformed or signed with an unknown key.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User no longer exists")]
    UserNotFound,

    #[error("Token generation failed: {0}")]
    TokenGenerationError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] UserError),
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {}", err))
    }
}

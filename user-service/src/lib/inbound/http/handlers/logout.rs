use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Tokens are stateless, so logout only acknowledges; the client discards them.
pub async fn logout(Extension(user): Extension<AuthenticatedUser>) -> ApiSuccess<MessageData> {
    tracing::info!(user_id = %user.user_id, "User logged out");

    ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "Logged out".to_string(),
        },
    )
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::LoginResult;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let cancel = state.shutdown.child_token();

    state
        .auth_service
        .login(LoginCommand::new(body.email, body.password), &cancel)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user_id: i64,
    pub role: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl From<LoginResult> for LoginResponseData {
    fn from(result: LoginResult) -> Self {
        Self {
            user_id: result.user_id.as_i64(),
            role: result.role.as_str().to_string(),
            access_token: result.tokens.access_token,
            refresh_token: result.tokens.refresh_token,
            expires_at: result.tokens.expires_at,
        }
    }
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn check_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CheckPasswordRequestBody>,
) -> Result<ApiSuccess<CheckPasswordResponseData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .check_password(&user_id, body.password)
        .await
        .map_err(ApiError::from)
        .map(|valid| ApiSuccess::new(StatusCode::OK, CheckPasswordResponseData { valid }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckPasswordRequestBody {
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckPasswordResponseData {
    pub valid: bool,
}

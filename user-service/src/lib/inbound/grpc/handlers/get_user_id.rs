use crate::domain::authentication::ports::AuthServicePort;
use crate::proto::TokenRequest;
use crate::proto::UserIdResponse;

pub fn get_user_id(service: &dyn AuthServicePort, request: TokenRequest) -> UserIdResponse {
    match service.validate_bearer_token(&request.token) {
        Ok(claims) => UserIdResponse {
            user_id: claims.user_id,
            error: String::new(),
        },
        Err(e) => UserIdResponse {
            user_id: 0,
            error: e.to_string(),
        },
    }
}

use crate::domain::authentication::ports::AuthServicePort;
use crate::proto::TokenRequest;
use crate::proto::TokenResponse;

/// Rejections are reported in-band; this never fails at the transport level.
pub fn validate_token(service: &dyn AuthServicePort, request: TokenRequest) -> TokenResponse {
    match service.validate_bearer_token(&request.token) {
        Ok(_) => TokenResponse {
            valid: true,
            error: String::new(),
        },
        Err(e) => TokenResponse {
            valid: false,
            error: e.to_string(),
        },
    }
}

use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::get_user_id;
use super::handlers::validate_token;
use crate::domain::authentication::ports::AuthServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::TokenRequest;
use crate::proto::TokenResponse;
use crate::proto::UserIdResponse;

pub struct AuthGrpcService {
    service: Arc<dyn AuthServicePort>,
}

impl AuthGrpcService {
    pub fn new(service: Arc<dyn AuthServicePort>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn validate_token(
        &self,
        request: Request<TokenRequest>,
    ) -> Result<Response<TokenResponse>, Status> {
        let response = validate_token::validate_token(self.service.as_ref(), request.into_inner());
        Ok(Response::new(response))
    }

    async fn get_user_id(
        &self,
        request: Request<TokenRequest>,
    ) -> Result<Response<UserIdResponse>, Status> {
        let response = get_user_id::get_user_id(self.service.as_ref(), request.into_inner());
        Ok(Response::new(response))
    }
}

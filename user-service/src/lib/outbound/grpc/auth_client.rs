use anyhow::anyhow;
use anyhow::Context;
use tonic::transport::Channel;

use crate::proto::auth_service_client::AuthServiceClient;
use crate::proto::TokenRequest;

/// Client for the token validation RPC of a remote user service.
///
/// Lets other services check tokens they did not issue.
#[derive(Debug, Clone)]
pub struct GrpcAuthClient {
    client: AuthServiceClient<Channel>,
}

impl GrpcAuthClient {
    /// Connect to a remote instance, e.g. `http://localhost:50051`.
    pub async fn connect(url: impl Into<String>) -> anyhow::Result<Self> {
        let url = url.into();
        let client = AuthServiceClient::connect(url.clone())
            .await
            .with_context(|| format!("Failed to connect to auth service at {}", url))?;

        Ok(Self { client })
    }

    /// Whether `token` is currently valid. Rejection is `Ok(false)`; only
    /// transport failures are errors.
    pub async fn validate_token(&self, token: &str) -> anyhow::Result<bool> {
        let response = self
            .client
            .clone()
            .validate_token(TokenRequest {
                token: token.to_string(),
            })
            .await
            .context("ValidateToken call failed")?
            .into_inner();

        if !response.valid {
            tracing::debug!(reason = %response.error, "Remote token validation rejected");
        }

        Ok(response.valid)
    }

    /// User id carried by `token`.
    ///
    /// # Errors
    /// Transport failure, or the remote rejected the token.
    pub async fn get_user_id(&self, token: &str) -> anyhow::Result<i64> {
        let response = self
            .client
            .clone()
            .get_user_id(TokenRequest {
                token: token.to_string(),
            })
            .await
            .context("GetUserID call failed")?
            .into_inner();

        if !response.error.is_empty() {
            return Err(anyhow!("Token rejected: {}", response.error));
        }

        Ok(response.user_id)
    }
}

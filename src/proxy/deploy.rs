use bytes::Bytes;
use hyper::{Method, StatusCode};
use tracing::{debug, warn};

use super::FUNCTIONS_PATH;
use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::types::FunctionDeployment;

/// Whether a deploy creates a new function or updates an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployMethod {
    /// `PUT`: update in place.
    #[default]
    Update,
    /// `POST`: create.
    Create,
}

impl DeployMethod {
    pub fn http_method(self) -> Method {
        match self {
            DeployMethod::Update => Method::PUT,
            DeployMethod::Create => Method::POST,
        }
    }
}

/// Outcome of a deploy call the gateway answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResponse {
    /// Status returned by the gateway.
    pub status: StatusCode,
    /// Response body, usually empty on success.
    pub body: String,
}

impl DeployResponse {
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
        )
    }
}

impl GatewayClient {
    /// Send a deployment spec.
    ///
    /// Non-success statuses are returned rather than raised so a batch can
    /// keep going; only request, auth and transport failures are errors.
    pub async fn deploy_function(
        &self,
        ctx: &Context,
        deployment: &FunctionDeployment,
        method: DeployMethod,
    ) -> Result<DeployResponse, ClientError> {
        let body = Bytes::from(serde_json::to_vec(deployment)?);
        let request = self.build_request(method.http_method(), FUNCTIONS_PATH, &[], Some(body))?;
        let response = self.execute(ctx, request).await?;

        let outcome = DeployResponse {
            status: response.status,
            body: response.text(),
        };
        if outcome.is_success() {
            debug!(function = %deployment.service, status = %outcome.status, "function deployed");
        } else {
            warn!(function = %deployment.service, status = %outcome.status, "deploy rejected");
        }
        Ok(outcome)
    }
}

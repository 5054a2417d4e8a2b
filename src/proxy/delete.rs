use bytes::Bytes;
use hyper::{Method, StatusCode};
use tracing::debug;

use super::{unexpected_status, FUNCTIONS_PATH};
use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::types::DeleteFunctionRequest;

impl GatewayClient {
    /// Remove a function. A `404` becomes [`ClientError::NoSuchFunction`].
    pub async fn delete_function(
        &self,
        ctx: &Context,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), ClientError> {
        let body = DeleteFunctionRequest {
            function_name: name.to_string(),
            namespace: namespace.unwrap_or_default().to_string(),
        };
        let body = Bytes::from(serde_json::to_vec(&body)?);
        let request = self.build_request(Method::DELETE, FUNCTIONS_PATH, &[], Some(body))?;
        let response = self.execute(ctx, request).await?;

        match response.status {
            StatusCode::OK | StatusCode::ACCEPTED => {
                debug!(function = name, "function removed");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(ClientError::NoSuchFunction(name.to_string())),
            _ => Err(unexpected_status(&response)),
        }
    }
}

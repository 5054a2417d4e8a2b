use hyper::{Method, StatusCode};

use super::{unexpected_status, NAMESPACES_PATH};
use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;

impl GatewayClient {
    /// List the namespaces the gateway can deploy into.
    pub async fn list_namespaces(&self, ctx: &Context) -> Result<Vec<String>, ClientError> {
        let request = self.build_request(Method::GET, NAMESPACES_PATH, &[], None)?;
        let response = self.execute(ctx, request).await?;

        if response.status != StatusCode::OK {
            return Err(unexpected_status(&response));
        }
        Ok(response.json()?)
    }
}

use hyper::{Method, StatusCode};
use tracing::debug;

use super::{namespace_query, unexpected_status, FUNCTIONS_PATH};
use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::types::FunctionStatus;

impl GatewayClient {
    /// List deployed functions, optionally within `namespace`.
    pub async fn list_functions(
        &self,
        ctx: &Context,
        namespace: Option<&str>,
    ) -> Result<Vec<FunctionStatus>, ClientError> {
        let query = namespace_query(namespace);
        let request = self.build_request(Method::GET, FUNCTIONS_PATH, &query, None)?;
        let response = self.execute(ctx, request).await?;

        if response.status != StatusCode::OK {
            return Err(unexpected_status(&response));
        }

        let functions: Vec<FunctionStatus> = response.json()?;
        debug!(count = functions.len(), "listed functions");
        Ok(functions)
    }
}

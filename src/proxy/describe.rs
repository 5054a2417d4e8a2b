use hyper::{Method, StatusCode};

use super::{function_segment, namespace_query, unexpected_status, FUNCTION_PATH};
use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::types::FunctionStatus;

impl GatewayClient {
    /// Fetch the status of a single function.
    ///
    /// A `404` becomes [`ClientError::NoSuchFunction`]; any other status
    /// but `200` is [`ClientError::UnexpectedStatus`]. Names that are not a
    /// single path segment fail with [`ClientError::InvalidFunctionName`].
    pub async fn get_function_info(
        &self,
        ctx: &Context,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<FunctionStatus, ClientError> {
        let query = namespace_query(namespace);
        let path = format!("{FUNCTION_PATH}/{}", function_segment(name)?);
        let request = self.build_request(Method::GET, &path, &query, None)?;
        let response = self.execute(ctx, request).await?;

        match response.status {
            StatusCode::OK => Ok(response.json()?),
            StatusCode::NOT_FOUND => Err(ClientError::NoSuchFunction(name.to_string())),
            _ => Err(unexpected_status(&response)),
        }
    }
}

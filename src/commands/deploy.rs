//! `deploy`: send each deployment and report every failure at the end.

use std::io::Write;

use hyper::StatusCode;
use tracing::warn;

use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::proxy::{function_urls, DeployMethod, DeployReport, DeployResponse};
use crate::types::FunctionDeployment;

/// Deploy every function in `deployments`, one request at a time.
///
/// A rejected or failed deploy does not stop the batch. Once all have been
/// attempted the collected statuses are evaluated and any bad ones are
/// returned as a single [`ClientError::PartialDeployFailure`]. Cancelling
/// `ctx` stops the batch immediately.
pub async fn run<W: Write>(
    client: &GatewayClient,
    ctx: &Context,
    deployments: &[FunctionDeployment],
    method: DeployMethod,
    out: &mut W,
) -> Result<(), ClientError> {
    let mut report = DeployReport::new();

    for deployment in deployments {
        writeln!(out, "Deploying: {}.", deployment.service)?;

        let status = match client.deploy_function(ctx, deployment, method).await {
            Ok(response) => {
                render_response(client, deployment, &response, out)?;
                response.status_code()
            }
            Err(ClientError::Context(cause)) => return Err(cause.into()),
            Err(err) => {
                warn!("deploy of {} failed: {}", deployment.service, err);
                writeln!(out, "Error: {err}")?;
                StatusCode::INTERNAL_SERVER_ERROR.as_u16()
            }
        };
        report.record(deployment.service.clone(), status);
    }

    report.evaluate()
}

fn render_response<W: Write>(
    client: &GatewayClient,
    deployment: &FunctionDeployment,
    response: &DeployResponse,
    out: &mut W,
) -> std::io::Result<()> {
    if response.is_success() {
        let namespace = Some(deployment.namespace.as_str());
        let (url, _) = function_urls(client.gateway(), &deployment.service, namespace);
        writeln!(out)?;
        writeln!(out, "Deployed. {}.", response.status)?;
        writeln!(out, "URL: {url}")?;
        return Ok(());
    }

    if response.status == StatusCode::UNAUTHORIZED {
        writeln!(
            out,
            "unauthorized access, log in to the gateway to set up authentication"
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "Unexpected status: {}, message: {}",
        response.status_code(),
        response.body.trim()
    )
}

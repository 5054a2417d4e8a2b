use std::io::Write;

use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;

pub async fn run<W: Write>(
    client: &GatewayClient,
    ctx: &Context,
    out: &mut W,
) -> Result<(), ClientError> {
    let namespaces = client.list_namespaces(ctx).await?;
    render(&namespaces, out)?;
    Ok(())
}

pub fn render<W: Write>(namespaces: &[String], out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Available namespaces:")?;
    for namespace in namespaces {
        writeln!(out, "{namespace}")?;
    }
    Ok(())
}

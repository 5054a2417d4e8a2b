//! `remove`: delete functions by name.

use std::io::Write;

use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;

/// Delete each function in turn. Missing functions are reported and
/// skipped; any other failure stops the run.
pub async fn run<W: Write>(
    client: &GatewayClient,
    ctx: &Context,
    names: &[String],
    namespace: Option<&str>,
    out: &mut W,
) -> Result<(), ClientError> {
    for name in names {
        writeln!(out, "Deleting: {name}.")?;
        match client.delete_function(ctx, name, namespace).await {
            Ok(()) => writeln!(out, "Removed: {name}")?,
            Err(ClientError::NoSuchFunction(_)) => {
                writeln!(out, "No existing function to remove: {name}")?
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

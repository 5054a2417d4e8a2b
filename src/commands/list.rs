//! `list`: tabulate deployed functions.

use std::io::Write;

use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::types::FunctionStatus;

/// Table layout for [`render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStyle {
    #[default]
    Table,
    /// Adds the image column.
    Verbose,
    /// Function names only.
    Quiet,
}

pub async fn run<W: Write>(
    client: &GatewayClient,
    ctx: &Context,
    namespace: Option<&str>,
    style: ListStyle,
    out: &mut W,
) -> Result<(), ClientError> {
    let mut functions = client.list_functions(ctx, namespace).await?;
    functions.sort_by(|a, b| a.name.cmp(&b.name));
    render(&functions, style, out)?;
    Ok(())
}

pub fn render<W: Write>(
    functions: &[FunctionStatus],
    style: ListStyle,
    out: &mut W,
) -> std::io::Result<()> {
    match style {
        ListStyle::Quiet => {
            for function in functions {
                writeln!(out, "{}", function.name)?;
            }
        }
        ListStyle::Table => {
            writeln!(out, "{:<30}\t{:<15}\t{:<5}", "Function", "Invocations", "Replicas")?;
            for function in functions {
                writeln!(
                    out,
                    "{:<30}\t{:<15}\t{:<5}",
                    function.name,
                    format!("{:.0}", function.invocation_count),
                    function.replicas
                )?;
            }
        }
        ListStyle::Verbose => {
            writeln!(
                out,
                "{:<30}\t{:<40}\t{:<15}\t{:<5}",
                "Function", "Image", "Invocations", "Replicas"
            )?;
            for function in functions {
                writeln!(
                    out,
                    "{:<30}\t{:<40}\t{:<15}\t{:<5}",
                    function.name,
                    shorten_image(&function.image),
                    format!("{:.0}", function.invocation_count),
                    function.replicas
                )?;
            }
        }
    }
    Ok(())
}

fn shorten_image(image: &str) -> String {
    if image.chars().count() > 40 {
        let head: String = image.chars().take(38).collect();
        format!("{head}..")
    } else {
        image.to_string()
    }
}

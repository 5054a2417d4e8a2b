//! `describe`: detailed view of one function.

use std::collections::BTreeMap;
use std::io::Write;

use crate::client::GatewayClient;
use crate::context::Context;
use crate::error::ClientError;
use crate::proxy::function_urls;
use crate::types::{FunctionResources, FunctionStatus, FunctionUsage};

const KEY_WIDTH: usize = 20;
const NONE: &str = "<none>";

/// A function's status plus the URLs it can be invoked on.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescription {
    pub function: FunctionStatus,
    pub url: String,
    pub async_url: String,
}

impl FunctionDescription {
    pub fn new(function: FunctionStatus, gateway: &str) -> Self {
        let (url, async_url) =
            function_urls(gateway, &function.name, Some(function.namespace.as_str()));
        Self {
            function,
            url,
            async_url,
        }
    }
}

pub async fn run<W: Write>(
    client: &GatewayClient,
    ctx: &Context,
    name: &str,
    namespace: Option<&str>,
    verbose: bool,
    out: &mut W,
) -> Result<(), ClientError> {
    let function = client.get_function_info(ctx, name, namespace).await?;
    let description = FunctionDescription::new(function, client.gateway());
    render(&description, verbose, out)?;
    Ok(())
}

/// Render a description. Empty sections are skipped unless `verbose`, in
/// which case they print as `<none>`.
pub fn render<W: Write>(
    description: &FunctionDescription,
    verbose: bool,
    out: &mut W,
) -> std::io::Result<()> {
    let function = &description.function;
    let process = if function.env_process.is_empty() {
        "<default>"
    } else {
        function.env_process.as_str()
    };

    field(out, "Name:", &function.name)?;
    field(out, "Status:", function.readiness())?;
    field(out, "Replicas:", &function.replicas.to_string())?;
    field(out, "Available Replicas:", &function.available_replicas.to_string())?;
    field(out, "Invocations:", &format!("{:.0}", function.invocation_count))?;
    field(out, "Image:", &function.image)?;
    field(out, "Function Process:", process)?;

    if verbose {
        field(out, "URL:", or_none(&description.url))?;
        field(out, "Async URL:", or_none(&description.async_url))?;
    }

    map_section(out, "Labels:", function.labels.as_ref(), verbose)?;
    map_section(out, "Annotations:", function.annotations.as_ref(), verbose)?;
    list_section(out, "Constraints:", &function.constraints, verbose)?;
    map_section(out, "Environment:", Some(&function.env_vars), verbose)?;
    list_section(out, "Secrets:", &function.secrets, verbose)?;
    resources_section(out, "Requests:", function.requests.as_ref(), verbose)?;
    resources_section(out, "Limits:", function.limits.as_ref(), verbose)?;
    usage_section(out, function.usage.as_ref(), verbose)
}

fn field<W: Write>(out: &mut W, key: &str, value: &str) -> std::io::Result<()> {
    writeln!(out, "{:<width$}{}", key, value, width = KEY_WIDTH)
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        NONE
    } else {
        value
    }
}

fn map_section<W: Write>(
    out: &mut W,
    title: &str,
    values: Option<&BTreeMap<String, String>>,
    verbose: bool,
) -> std::io::Result<()> {
    match values.filter(|values| !values.is_empty()) {
        Some(values) => {
            writeln!(out, "{title}")?;
            for (key, value) in values {
                writeln!(out, " {key}: {value}")?;
            }
            Ok(())
        }
        None if verbose => field(out, title, NONE),
        None => Ok(()),
    }
}

fn list_section<W: Write>(
    out: &mut W,
    title: &str,
    values: &[String],
    verbose: bool,
) -> std::io::Result<()> {
    if values.is_empty() {
        return if verbose { field(out, title, NONE) } else { Ok(()) };
    }
    writeln!(out, "{title}")?;
    for value in values {
        writeln!(out, " - {value}")?;
    }
    Ok(())
}

fn resources_section<W: Write>(
    out: &mut W,
    title: &str,
    resources: Option<&FunctionResources>,
    verbose: bool,
) -> std::io::Result<()> {
    match resources.filter(|resources| !resources.is_empty()) {
        Some(resources) => {
            writeln!(out, "{title}")?;
            if !resources.memory.is_empty() {
                writeln!(out, " Memory: {}", resources.memory)?;
            }
            if !resources.cpu.is_empty() {
                writeln!(out, " CPU: {}", resources.cpu)?;
            }
            Ok(())
        }
        None if verbose => field(out, title, NONE),
        None => Ok(()),
    }
}

fn usage_section<W: Write>(
    out: &mut W,
    usage: Option<&FunctionUsage>,
    verbose: bool,
) -> std::io::Result<()> {
    match usage {
        Some(usage) => {
            writeln!(out, "Usage:")?;
            writeln!(out, "  RAM:  {:.2} MB", usage.total_memory_bytes / 1024.0 / 1024.0)?;
            writeln!(out, "  CPU:  {:.0} Mi", usage.cpu)
        }
        None if verbose => field(out, "Usage:", NONE),
        None => Ok(()),
    }
}

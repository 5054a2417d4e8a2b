//! faasctl - command-line client for a FaaS gateway.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use faasctl::auth::{BasicAuth, BearerAuth, ClientAuth, NoAuth};
use faasctl::commands::{self, list::ListStyle};
use faasctl::config::{ClientConfig, DEFAULT_GATEWAY, ENV_GATEWAY};
use faasctl::proxy::DeployMethod;
use faasctl::types::FunctionDeployment;
use faasctl::{ClientError, Context};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "faasctl")]
#[command(version, about = "Deploy and manage functions on a FaaS gateway")]
struct Cli {
    /// Gateway URL
    #[arg(short, long, global = true, env = ENV_GATEWAY, default_value = DEFAULT_GATEWAY)]
    gateway: String,

    /// Bearer token for the gateway
    #[arg(long, global = true, env = "OPENFAAS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Basic-auth username
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Basic-auth password
    #[arg(long, global = true, env = "OPENFAAS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds; 0 uses the default
    #[arg(long, global = true, default_value_t = 60.0)]
    timeout: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List deployed functions
    List {
        #[arg(short, long)]
        namespace: Option<String>,
        /// Include the image column
        #[arg(short, long, conflicts_with = "quiet")]
        verbose: bool,
        /// Print function names only
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show details of a function
    Describe {
        name: String,
        #[arg(short, long)]
        namespace: Option<String>,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Deploy a function
    Deploy(DeployArgs),
    /// Remove one or more functions
    Remove {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// List namespaces available on the gateway
    Namespaces,
}

#[derive(Args, Debug)]
struct DeployArgs {
    /// Function name
    #[arg(long)]
    name: String,
    /// Container image
    #[arg(long)]
    image: String,
    #[arg(short, long)]
    namespace: Option<String>,
    /// Process to run for each request
    #[arg(long)]
    fprocess: Option<String>,
    /// Environment variable, KEY=VALUE
    #[arg(short, long = "env", value_parser = parse_key_val)]
    env: Vec<(String, String)>,
    /// Label, KEY=VALUE
    #[arg(short, long = "label", value_parser = parse_key_val)]
    label: Vec<(String, String)>,
    /// Annotation, KEY=VALUE
    #[arg(long = "annotation", value_parser = parse_key_val)]
    annotation: Vec<(String, String)>,
    /// Secret to mount
    #[arg(long = "secret")]
    secret: Vec<String>,
    /// Placement constraint
    #[arg(long = "constraint")]
    constraint: Vec<String>,
    /// Mount the root filesystem read-only
    #[arg(long)]
    readonly: bool,
    /// Create with POST instead of updating with PUT
    #[arg(long)]
    create: bool,
}

impl DeployArgs {
    fn into_deployment(self) -> (FunctionDeployment, DeployMethod) {
        let mut deployment = FunctionDeployment::new(self.name, self.image);
        deployment.namespace = self.namespace.unwrap_or_default();
        deployment.env_process = self.fprocess.unwrap_or_default();
        deployment.env_vars.extend(self.env);
        for (key, value) in self.label {
            deployment = deployment.label(key, value);
        }
        for (key, value) in self.annotation {
            deployment = deployment.annotation(key, value);
        }
        deployment.secrets = self.secret;
        deployment.constraints = self.constraint;
        deployment.read_only_root_filesystem = self.readonly;

        let method = if self.create {
            DeployMethod::Create
        } else {
            DeployMethod::Update
        };
        (deployment, method)
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

fn authenticator(cli: &Cli) -> Arc<dyn ClientAuth> {
    if let Some(token) = cli.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Arc::new(BearerAuth::new(token));
    }
    match &cli.username {
        Some(username) => Arc::new(BasicAuth::new(
            username.clone(),
            cli.password.clone().unwrap_or_default(),
        )),
        None => Arc::new(NoAuth),
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = ClientConfig::from_env()
        .gateway(cli.gateway.clone())
        .timeout(Duration::try_from_secs_f64(cli.timeout).unwrap_or_default());
    let client = config.build(authenticator(&cli))?;

    let (ctx, cancel) = Context::background().with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling in-flight request");
            cancel.cancel();
        }
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Command::List {
            namespace,
            verbose,
            quiet,
        } => {
            let style = match (verbose, quiet) {
                (_, true) => ListStyle::Quiet,
                (true, _) => ListStyle::Verbose,
                _ => ListStyle::Table,
            };
            commands::list::run(&client, &ctx, namespace.as_deref(), style, &mut out).await
        }
        Command::Describe {
            name,
            namespace,
            verbose,
        } => {
            commands::describe::run(&client, &ctx, &name, namespace.as_deref(), verbose, &mut out)
                .await
        }
        Command::Deploy(args) => {
            let (deployment, method) = args.into_deployment();
            commands::deploy::run(&client, &ctx, &[deployment], method, &mut out).await
        }
        Command::Remove { names, namespace } => {
            commands::remove::run(&client, &ctx, &names, namespace.as_deref(), &mut out).await
        }
        Command::Namespaces => commands::namespaces::run(&client, &ctx, &mut out).await,
    };

    out.flush()?;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use swis_client::{DEFAULT_PORT, DEFAULT_SERVER, Envelope, Query, SwisClient, SwisConfig, endpoints};

#[derive(Debug, Parser)]
#[command(
    name = "swis-cli",
    version,
    about = "Small async CLI for the SolarWinds Information Service"
)]
struct Cli {
    /// Orion server host.
    #[arg(long, env = "SWIS_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Information Service port.
    #[arg(long, env = "SWIS_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Username for Basic authentication.
    #[arg(long, env = "SWIS_USERNAME", default_value = "")]
    username: String,

    /// Password for Basic authentication.
    #[arg(long, env = "SWIS_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Verify the server's TLS certificate instead of accepting any.
    #[arg(long)]
    verify_tls: bool,

    /// Emit compact JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the endpoint URLs derived from the connection options.
    Endpoints,
    /// Run a SWQL query.
    Query {
        /// SWQL text, e.g. "SELECT NodeID FROM Orion.Nodes WHERE Vendor = @v".
        swql: String,

        /// Query parameter in form name=value. Repeat as needed.
        #[arg(long = "param", value_name = "NAME=VALUE")]
        param: Vec<String>,
    },
    /// Invoke a verb with positional JSON arguments.
    Invoke {
        /// Entity and verb, e.g. Orion.Nodes/Unmanage.
        verb: String,

        /// JSON literal for one argument. Repeat in signature order.
        #[arg(long = "arg", value_name = "JSON")]
        arg: Vec<String>,
    },
    /// Read the object at a SWIS URI.
    Read { uri: String },
    /// Update properties of the object at a SWIS URI.
    Update {
        uri: String,

        #[command(flatten)]
        body: BodyInput,
    },
    /// Create an instance of an entity type.
    Create {
        /// Entity type, e.g. Orion.Nodes.
        entity: String,

        #[command(flatten)]
        body: BodyInput,
    },
    /// Delete the object at a SWIS URI.
    Remove { uri: String },
    /// Delete several objects in one request.
    RemoveBulk {
        #[arg(required = true)]
        uris: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct BodyInput {
    /// JSON request body literal.
    #[arg(long, conflicts_with = "body_file")]
    body_json: Option<String>,

    /// Path to a file containing a JSON request body.
    #[arg(long, value_name = "PATH", conflicts_with = "body_json")]
    body_file: Option<PathBuf>,
}

/// Entry point for the async CLI.
///
/// Parses command-line arguments, builds the client, dispatches the
/// subcommand and prints the results as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = SwisConfig::new(&cli.server, &cli.username, &cli.password)
        .with_port(cli.port)
        .with_accept_invalid_certs(!cli.verify_tls);

    if let Command::Endpoints = &cli.command {
        print_endpoints(&config);
        return Ok(());
    }

    let client = SwisClient::new(config).context("failed to create SWIS client")?;

    let envelope = match &cli.command {
        Command::Endpoints => unreachable!("handled above"),
        Command::Query { swql, param } => {
            let query = build_query(swql, param).context("failed to parse --param arguments")?;
            client.query(&query).await
        }
        Command::Invoke { verb, arg } => {
            let args = parse_args(arg).context("failed to parse --arg values")?;
            client.invoke(verb, &args).await
        }
        Command::Read { uri } => client.read(uri).await,
        Command::Update { uri, body } => {
            let patch = parse_body(body).context("failed to parse request body input")?;
            client.update(&patch, uri).await
        }
        Command::Create { entity, body } => {
            let data = parse_body(body).context("failed to parse request body input")?;
            client.create(&data, entity).await
        }
        Command::Remove { uri } => client.remove(uri).await,
        Command::RemoveBulk { uris } => client.remove_bulk(uris).await,
    };

    print_results(envelope, cli.compact)
}

/// Sends log events to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_endpoints(config: &SwisConfig) {
    let urls = endpoints(config);
    for (name, url) in [
        ("base", &urls.base),
        ("query", &urls.query),
        ("create", &urls.create),
        ("invoke", &urls.invoke),
        ("bulk_delete", &urls.bulk_delete),
    ] {
        println!("{name:<12} {url}");
    }
}

/// Builds a query from repeated `name=value` arguments.
///
/// Values that parse as JSON are sent as such; anything else is sent as a
/// string.
fn build_query(swql: &str, params: &[String]) -> Result<Query> {
    let mut parameters = Map::new();
    for item in params {
        let Some((name, raw)) = item.split_once('=') else {
            bail!("invalid --param value '{item}': expected name=value");
        };
        if name.is_empty() {
            bail!("invalid --param value '{item}': empty name");
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        parameters.insert(name.to_owned(), value);
    }
    Ok(Query {
        query: swql.to_owned(),
        parameters,
    })
}

fn parse_args(raw_args: &[String]) -> Result<Vec<Value>> {
    raw_args
        .iter()
        .map(|raw| {
            serde_json::from_str(raw).with_context(|| format!("invalid JSON argument '{raw}'"))
        })
        .collect()
}

/// Parses a JSON body from inline text or a file path.
///
/// Exactly one of `--body-json` or `--body-file` must be set.
fn parse_body(body: &BodyInput) -> Result<Value> {
    match (&body.body_json, &body.body_file) {
        (Some(raw), None) => {
            serde_json::from_str(raw).context("failed to parse JSON from --body-json")
        }
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read --body-file '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse JSON in --body-file '{}'", path.display()))
        }
        (None, None) => bail!("one of --body-json or --body-file is required"),
        (Some(_), Some(_)) => bail!("use only one of --body-json or --body-file"),
    }
}

/// Prints successful results as JSON, or fails with the server's answer.
fn print_results(envelope: Envelope, compact: bool) -> Result<()> {
    let results = envelope
        .into_result()
        .context("SWIS operation failed")?
        .unwrap_or(Value::Null);

    let rendered = if compact {
        serde_json::to_string(&results)
    } else {
        serde_json::to_string_pretty(&results)
    }
    .context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

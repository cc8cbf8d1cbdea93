//! mail-api-cli: dispatch a single request descriptor from the command line.
//!
//! Usage:
//!   mail-api-cli request <METHOD> <PATH> [OPTIONS]   Send one request
//!   mail-api-cli config [--config <file>]            Print the effective transport config
//!   mail-api-cli version                             Show version information

use anyhow::{bail, Context};
use mail_api_route::auth::EnvCredentialProvider;
use mail_api_route::{HttpMethod, HttpTransport, RequestDescriptor, TransportConfig};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    mail_api_route::telemetry::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "request" => cmd_request(&args[2..]).await,
        "config" => cmd_config(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("mail-api-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"mail-api-cli: dispatch mail API requests

USAGE:
    mail-api-cli <COMMAND> [OPTIONS]

COMMANDS:
    request <METHOD> <PATH>     Send one request (METHOD: GET, POST, PUT, DELETE)
        --param <key=value>     Add a parameter (value parsed as JSON, else string)
        --header <key=value>    Add a request header
        --api-version <n>       Override the API version (default 3)
        --no-auth               Send without credentials
        --no-retry              Disable automatic retry
        --config <file>         Load transport config from YAML
    config [--config <file>]    Print the effective transport configuration
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    MAIL_API_BASE_URL           API base URL
    MAIL_API_SESSION_ID         Session id for authenticated requests
    MAIL_API_ACCESS_TOKEN       Access token for authenticated requests
    MAIL_API_MAX_RETRIES        Retry budget for transient failures"#
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> anyhow::Result<TransportConfig> {
    let base = match flag_value(args, "--config") {
        Some(path) => TransportConfig::from_file(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => TransportConfig::default(),
    };
    Ok(base.with_env_overrides())
}

fn split_pair(raw: &str) -> anyhow::Result<(String, String)> {
    match raw.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => bail!("expected key=value, got {raw:?}"),
    }
}

fn cmd_config(args: &[String]) -> anyhow::Result<()> {
    let config = load_config(args)?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

async fn cmd_request(args: &[String]) -> anyhow::Result<()> {
    let (method, path) = match args {
        [method, path, ..] => (method.parse::<HttpMethod>()?, path.clone()),
        _ => bail!("usage: mail-api-cli request <METHOD> <PATH> [OPTIONS]"),
    };
    let options = &args[2..];

    let mut descriptor = RequestDescriptor::new(path).with_method(method);
    let mut params = serde_json::Map::new();
    let mut i = 0;
    while i < options.len() {
        match options[i].as_str() {
            "--param" | "--header" | "--api-version" | "--config" => {
                let value = options
                    .get(i + 1)
                    .with_context(|| format!("{} needs a value", options[i]))?;
                match options[i].as_str() {
                    "--param" => {
                        let (k, v) = split_pair(value)?;
                        let parsed = serde_json::from_str::<Value>(&v).unwrap_or(Value::String(v));
                        params.insert(k, parsed);
                    }
                    "--header" => {
                        let (k, v) = split_pair(value)?;
                        descriptor = descriptor.with_header(k, v);
                    }
                    "--api-version" => {
                        let version = value
                            .parse::<u32>()
                            .with_context(|| format!("invalid api version {value:?}"))?;
                        descriptor = descriptor.with_version(version);
                    }
                    _ => {}
                }
                i += 2;
            }
            "--no-auth" => {
                descriptor = descriptor.with_authenticated(false);
                i += 1;
            }
            "--no-retry" => {
                descriptor = descriptor.with_auto_retry(false);
                i += 1;
            }
            other => bail!("unknown option {other}"),
        }
    }
    if !params.is_empty() {
        descriptor = descriptor.with_parameters(params);
    }

    let transport = HttpTransport::new(load_config(options)?)?
        .with_credentials(Arc::new(EnvCredentialProvider));
    let resp = transport.dispatch(&descriptor).await?;

    eprintln!("HTTP {} (retries: {})", resp.status, resp.retry_count);
    match resp.json::<Value>() {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", resp.text()),
    }
    Ok(())
}

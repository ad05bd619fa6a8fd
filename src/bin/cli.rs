//! vadm CLI
//!
//! Broadcasts one management command across a set of cache servers and
//! prints the per-server replies.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use vadm::{http_purge_url, AdminError, BatchResult, Command, Endpoint, Manager};

/// Cache server management client
#[derive(Parser, Debug)]
#[command(name = "vadm")]
#[command(about = "Broadcast management commands to cache servers")]
#[command(version)]
struct Args {
    /// Management endpoint (host:port), repeatable
    #[arg(short, long = "server", required = true)]
    servers: Vec<String>,

    /// Shared secret for authenticated endpoints
    #[arg(long, conflicts_with = "secret_file")]
    secret: Option<String>,

    /// File holding the shared secret (trailing newline stripped)
    #[arg(long)]
    secret_file: Option<PathBuf>,

    /// One worker thread per server instead of sequential execution
    #[arg(short, long)]
    concurrent: bool,

    /// Connect/read timeout in seconds
    #[arg(long, default_value = "5")]
    timeout_secs: u64,

    /// Command verb followed by its arguments, e.g. `vcl.use boot`.
    /// The special verb `purge-url <http-url>` issues an HTTP purge
    /// against the data port instead.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,vadm=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    std::process::exit(match run(args) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            tracing::error!("{}", e);
            2
        }
    });
}

/// Returns Ok(true) when every server slot succeeded
fn run(args: Args) -> Result<bool, AdminError> {
    let verb = args.command[0].as_str();
    let command_args = &args.command[1..];

    // HTTP purge goes to the data port, not the admin protocol
    if verb == "purge-url" {
        let mut all_ok = true;
        for url in command_args {
            let status = http_purge_url(url)?;
            println!("{url}: {status}");
            all_ok &= status == 200;
        }
        return Ok(all_ok);
    }

    let command = Command::parse(verb, command_args.iter().cloned())?;

    let timeout = Duration::from_secs(args.timeout_secs);
    let endpoints = args
        .servers
        .iter()
        .map(|s| {
            s.parse::<Endpoint>().map(|mut ep| {
                ep.timeout = timeout;
                ep
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let labels: Vec<String> = endpoints.iter().map(|ep| ep.to_string()).collect();

    let secret = match (&args.secret, &args.secret_file) {
        (Some(secret), _) => Some(secret.clone()),
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(path)?;
            Some(raw.trim_end_matches('\n').to_string())
        }
        (None, None) => None,
    };

    let mut manager = Manager::new(endpoints);
    if let Some(secret) = secret {
        manager = manager.with_secret(secret);
    }

    let results: Vec<BatchResult> = if args.concurrent {
        manager
            .run_concurrent(std::slice::from_ref(&command))?
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(AdminError::Protocol("worker panicked".to_string())))
            })
            .collect()
    } else {
        manager.run(std::slice::from_ref(&command))?
    };

    let mut all_ok = true;
    for (label, result) in labels.iter().zip(results) {
        match result {
            Ok(replies) => {
                for reply in replies {
                    println!("{label}: {}", reply.status);
                    let text = reply.text();
                    if !text.is_empty() {
                        println!("{text}");
                    }
                }
            }
            Err(e) => {
                all_ok = false;
                eprintln!("{label}: {e}");
            }
        }
    }
    manager.close();
    Ok(all_ok)
}

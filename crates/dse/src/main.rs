//! Command-line entry point for the `dse` tool.
//!
//! Serves the data-structure engines over HTTP, runs request scripts against
//! them, and lists the engine catalogue.

use std::{
    fs, io,
    net::IpAddr,
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsengine::registry;
use tracing_subscriber::EnvFilter;

/// Request-script parsing and execution.
mod script;
/// HTTP transport.
mod server;

use crate::server::{DEFAULT_HOST, DEFAULT_PORT, ServeOptions};

/// Command line interface for `dse`.
#[derive(Parser)]
#[command(name = "dse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Verbosity: `-v` for debug, `-vv` for trace. `RUST_LOG` overrides it.
    #[arg(short, action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    v: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Serve the engines over HTTP.
    #[command(about = "Serve the engines over HTTP")]
    Serve {
        /// Address to bind.
        #[arg(long, default_value_t = IpAddr::V4(DEFAULT_HOST), help = "Address to bind")]
        host: IpAddr,

        /// Port to bind.
        #[arg(
            short = 'p',
            long,
            env = "PORT",
            default_value_t = DEFAULT_PORT,
            help = "Port to bind"
        )]
        port: u16,

        /// Worker threads.
        #[arg(
            short = 'w',
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u16).range(1..=64),
            help = "Worker threads sharing the registry"
        )]
        workers: u16,
    },

    /// Run a request script.
    #[command(about = "Run a file of requests and print each response as JSON")]
    Run {
        /// Pretty-print each response.
        #[arg(long, help = "Pretty-print each response")]
        pretty: bool,

        /// Exit non-zero when any request fails.
        #[arg(long, help = "Exit with status 2 when any request does not succeed")]
        strict: bool,

        /// Script file.
        #[arg(help = "Script file: one `METHOD /path [json]` per line")]
        script: PathBuf,
    },

    /// List the engine catalogue.
    #[command(
        name = "list-engines",
        about = "List supported engines and their constraints"
    )]
    ListEngines,
}

/// Install the log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Handle the `run` subcommand. Returns the number of failed requests.
fn handle_run(script: &Path, pretty: bool) -> Result<usize> {
    let source = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let mut stdout = io::stdout().lock();
    script::run(&source, &mut stdout, pretty)
        .with_context(|| format!("failed to run script {}", script.display()))
}

/// Handle the `list-engines` subcommand.
fn handle_list_engines() {
    println!("Supported engines (key: display, constraints):");
    for entry in registry::ENGINES {
        println!("- {}: {}, {}", entry.key, entry.display, entry.constraints);
    }
    println!();
    println!("Limits:");
    for (name, value) in registry::limits() {
        println!("- {name}: {value}");
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

/// Dispatch the selected subcommand.
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.v);

    match cli.command {
        Commands::Serve {
            host,
            port,
            workers,
        } => server::serve(ServeOptions {
            host,
            port,
            workers: usize::from(workers),
        }),
        Commands::Run {
            script,
            pretty,
            strict,
        } => {
            let failed = handle_run(&script, pretty)?;
            if strict && failed > 0 {
                eprintln!("{failed} request(s) did not succeed");
                process::exit(2);
            }
            Ok(())
        }
        Commands::ListEngines => {
            handle_list_engines();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["dse", "serve", "--port", "4000"]).expect("parses");
        let Commands::Serve {
            host,
            port,
            workers,
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(port, 4000);
        assert_eq!(workers, 1);
    }

    #[test]
    fn rejects_zero_workers() {
        assert!(Cli::try_parse_from(["dse", "serve", "--workers", "0"]).is_err());
    }
}

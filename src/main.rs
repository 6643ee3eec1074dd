mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use memlog::config::MemlogConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memlog", version, about = "Per-user memory log MCP server for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport to serve on (defaults to `server.transport` from config)
        #[arg(long, value_enum)]
        transport: Option<Transport>,
    },
    /// Print one user's memory list with indices
    Inspect {
        /// User identity, e.g. an email address
        user: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MemlogConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = match transport {
                Some(t) => t,
                None => match config.server.transport.as_str() {
                    "stdio" => Transport::Stdio,
                    "http" => Transport::Http,
                    other => anyhow::bail!("unknown transport: {other}. Supported: stdio, http"),
                },
            };
            match transport {
                Transport::Stdio => server::serve_stdio(config).await?,
                Transport::Http => server::serve_http(config).await?,
            }
        }
        Command::Inspect { user } => {
            cli::inspect::inspect(&config, &user)?;
        }
    }

    Ok(())
}

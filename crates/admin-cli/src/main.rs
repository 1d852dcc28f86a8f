//! CMS Admin CLI - inspect session tokens and call the backend with dashboard credentials.

mod commands;
mod output;

use std::path::PathBuf;

use admin_config::{init_logging, Config, Paths};
use clap::{Parser, Subcommand};
use tracing::debug;

/// CMS Admin command-line interface.
#[derive(Parser)]
#[command(name = "cms-admin")]
#[command(about = "Inspect session tokens and call the CMS backend like the admin dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the config file value
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base directory for config and logs. Defaults to ~/.cms-admin
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a session token and show its claims
    Decode {
        /// Compact token (header.payload.signature)
        token: String,
    },
    /// Exit with an error unless the token is decodable and unexpired
    Check {
        /// Compact token (header.payload.signature)
        token: String,
    },
    /// Log in with email and password and print the issued token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Account password
        #[arg(short, long, env = "CMS_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Send a request through the dashboard's request client
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,
        /// Path relative to the API base URL, e.g. /courses
        path: String,
        /// Session token to restore before sending
        #[arg(short, long, env = "CMS_ADMIN_SESSION_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, Some(paths.log_file()));
    debug!(api_base_url = %config.api_base_url, "Configuration loaded");

    match cli.command {
        Commands::Decode { token } => commands::decode(&token, &cli.format),
        Commands::Check { token } => commands::check(&token, &cli.format),
        Commands::Login { email, password } => {
            commands::login(&config, &email, &password, &cli.format).await
        }
        Commands::Request {
            method,
            path,
            token,
            data,
        } => {
            commands::request(
                &config,
                &method,
                &path,
                token.as_deref(),
                data.as_deref(),
                &cli.format,
            )
            .await
        }
    }
}

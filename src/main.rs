use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use oidc_login::{AppConfig, LoginFormError, MemorySession, ServerState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "oidc-login",
    about = "Serve the OpenID Connect login/registration form."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the login form over HTTP.
    Serve {
        /// Path to the JSON provider configuration.
        #[arg(long)]
        config: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), LoginFormError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config, host, port } => serve(config, host, port).await,
    }
}

async fn serve(config: PathBuf, host: String, port: u16) -> Result<(), LoginFormError> {
    let config = AppConfig::load(&config)?;
    let enabled = config.providers.iter().filter(|p| p.enabled).count();
    tracing::info!(
        providers = config.providers.len(),
        enabled,
        "loaded provider configuration"
    );

    let state = ServerState::new(
        Arc::new(MemorySession::new()),
        config.build_registry(),
        config.claims(),
    );

    let listener = TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("listening on http://{host}:{port}/login");
    oidc_login::serve(listener, state).await
}

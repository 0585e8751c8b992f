// crates/replier-server/src/main.rs
// Replier - reply generation backend for the browser extension

use anyhow::Result;
use clap::{Parser, Subcommand};
use replier::{
    config::Config,
    generator::AnthropicReplyGenerator,
    http::create_shared_client,
    llm::AnthropicClient,
    web::{self, state::AppState},
};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "replier")]
#[command(about = "Reply generation backend for the Replier browser extension")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides REPLIER_HOST)
        #[arg(long)]
        host: Option<String>,
    },
}

async fn run_server(mut config: Config, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    let client = AnthropicClient::new(
        create_shared_client(),
        config.anthropic_api_key.clone(),
        config.anthropic_base_url.clone(),
    );
    let state = AppState::new(Arc::new(AnthropicReplyGenerator::new(client)));
    let app = web::create_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server running on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real env vars take precedence
    let _ = dotenvy::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve { port, host }) => run_server(config, port, host).await,
        None => run_server(config, None, None).await,
    }
}

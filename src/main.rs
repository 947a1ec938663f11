//! Feedback Engine server binary
//!
//! Entry point for the feedback aggregation service: loads configuration,
//! opens the store, rebuilds the analytics aggregate, and serves the HTTP
//! API.

use clap::Parser;
use feedback_core::{
    api::{ApiServer, ApiServerConfig},
    error::Result,
    storage::libsql::LibsqlStorage,
    FeedbackService, Settings,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feedbackd")]
#[command(about = "Feedback aggregation engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database path (overrides FEEDBACK_DATABASE__PATH env var and config file)
    #[arg(long)]
    db_path: Option<String>,

    /// Bind address (overrides FEEDBACK_HTTP__ADDR env var and config file)
    #[arg(long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use the specified level for this crate, WARN for noisy external crates
    let filter = EnvFilter::new(format!(
        "feedback_core={level},feedbackd={level},tower_http=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("feedbackd v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut settings = Settings::load()?;
    if let Some(db_path) = cli.db_path {
        settings.database.path = db_path;
    }
    if let Some(addr) = cli.addr {
        settings.http.addr = addr;
    }

    let addr: SocketAddr = settings
        .http
        .addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", settings.http.addr, e))?;

    let store = Arc::new(LibsqlStorage::from_path(&settings.database.path).await?);
    let service = Arc::new(FeedbackService::new(store, settings.classifier.policy).await?);

    let server = ApiServer::new(ApiServerConfig { addr }, service);
    server.serve().await?;

    Ok(())
}

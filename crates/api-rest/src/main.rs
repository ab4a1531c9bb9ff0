//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the site router on its own, without loading a `.env` file.
//!
//! ## Intended use
//! Useful for development and debugging when the environment is already set up. The workspace's
//! main `newsdesk-run` binary is the usual entry point.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the newsdesk REST API server
///
/// Starts the server on the configured address (default: 0.0.0.0:3000).
///
/// # Environment Variables
/// - `NEWSDESK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - see [`api_rest::config_from_env`] for the rest
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("newsdesk_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("NEWSDESK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = api_rest::config_from_env()?;
    tracing::info!(
        "-- Starting newsdesk REST API on {} (data dir {})",
        addr,
        cfg.data_dir().display()
    );

    let app = api_rest::app(api_rest::AppState::from_config(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, app, config_from_env};

/// Main entry point for the newsdesk application
///
/// Loads `.env`, resolves configuration once and serves the site router (pages, JSON API
/// and Swagger UI).
///
/// # Environment Variables
/// - `NEWSDESK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `NEWSDESK_DATA_DIR`: Document store root (default: "news_data")
/// - `NEWSDESK_HOME_LIMIT`: Articles on the home page (default: 20)
/// - `IMGBB_API_KEY`: Image host API key; uploads are disabled without it
/// - `IMGBB_UPLOAD_URL`: Image host endpoint override
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newsdesk_run=info".parse()?)
                .add_directive("newsdesk_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("NEWSDESK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = config_from_env()?;
    tracing::info!("++ Starting newsdesk on {}", rest_addr);
    tracing::info!("++ Documents stored under {}", cfg.data_dir().display());

    let rest_app = app(AppState::from_config(cfg));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, rest_app).await?;

    Ok(())
}

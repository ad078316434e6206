use arcep_api_eligibility::config::{Config, Transport};
use arcep_api_eligibility::directory_client::ArcepClient;
use arcep_api_eligibility::handlers::{self, AppState};
use arcep_api_eligibility::mcp_server::StdioServer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging (to stderr, stdout belongs to the stdio protocol),
/// loads configuration, builds the ARCEP client and serves the tool on the
/// configured transport.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcep_api_eligibility=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let client = ArcepClient::from_config(&config)?;
    tracing::info!("✓ ARCEP client initialized: {}", client.base_url());

    match config.transport {
        Transport::Stdio => {
            StdioServer::new(client).run().await?;
        }
        Transport::Http => {
            let addr = format!("0.0.0.0:{}", config.port);
            let app = handlers::router(Arc::new(AppState { config, client }));

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Server listening on {}", addr);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

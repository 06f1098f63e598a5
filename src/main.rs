//! Visual Inspection MCP Server - Entry point
//!
//! Renders local PDF, image, and HTML files for MCP clients.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visual_inspect_mcp::{run_server_with_config, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout carries the MCP transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visual_inspect_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Visual Inspection MCP Server");

    run_server_with_config(ServerConfig::from_env()).await
}

//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the document
//! store and the MCP tool handler into a running server.

use anyhow::Result;
use memlog::config::MemlogConfig;
use memlog::store::{self, DocumentStore};
use rmcp::ServiceExt;
use std::sync::Arc;

use crate::tools::MemlogTools;

/// Shared setup: open the backing store. Returns (store, config) wrapped in Arc for sharing.
fn setup_shared_state(config: MemlogConfig) -> Result<(Arc<dyn DocumentStore>, Arc<MemlogConfig>)> {
    let store = store::create_store(&config.storage)?;
    tracing::info!(backend = store.backend(), "document store ready");
    Ok((store, Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MemlogConfig) -> Result<()> {
    tracing::info!("starting memlog MCP server on stdio");
    if config.identity.stdio_user.is_none() {
        tracing::warn!("no stdio user configured (MEMLOG_USER); all calls will be treated as guest");
    }

    let (store, config) = setup_shared_state(config)?;

    let tools = MemlogTools::new(store, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
///
/// The caller identity is read from the configured request header on every call.
pub async fn serve_http(config: MemlogConfig) -> Result<()> {
    let bind_addr = config.bind_addr();

    tracing::info!(
        addr = %bind_addr,
        identity_header = %config.identity.header,
        "starting memlog MCP server on HTTP"
    );

    let (store, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(MemlogTools::new(store.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                return;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}

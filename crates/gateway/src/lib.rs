//! API Gateway Library
//!
//! HTTP REST facade that translates requests to user-service gRPC calls and
//! maps gRPC statuses back to HTTP responses.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clients::UserClient;
use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the gateway as an embedded component (for combined binary).
///
/// The user service is expected on `user_port` of the same host.
pub async fn run_embedded(
    host: &str,
    port: u16,
    user_port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), BoxError> {
    let mut config = GatewayConfig::from_env()?;
    config.user_service.endpoint = format!("http://{}:{}", loopback(host), user_port);

    run_server_with_config(host, port, config, shutdown).await
}

/// Run the gateway until ctrl-c.
pub async fn run_standalone(host: &str, port: u16) -> Result<(), BoxError> {
    let config = GatewayConfig::from_env()?;
    run_server_with_config(host, port, config, shutdown_signal()).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: GatewayConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), BoxError> {
    // Create gRPC client
    let user_client = Arc::new(UserClient::connect(&config.user_service)?);

    // Create app state
    let state = AppState::new(user_client);

    // Build router
    let app = create_router(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
}

/// A wildcard bind address is not dialable; use loopback instead.
fn loopback(host: &str) -> &str {
    match host {
        "0.0.0.0" | "::" => "127.0.0.1",
        other => other,
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

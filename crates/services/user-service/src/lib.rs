//! User Service Library
//!
//! User management over gRPC: the command/query application layer, its
//! storage adapters, the JWT interceptor and the tonic transport. It can be
//! run as a standalone service or embedded in the combined binary.

pub mod app;
pub mod auth;
pub mod config;
pub mod grpc;
pub mod infra;
pub mod repository;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tonic::codegen::InterceptedService;
use tonic::transport::Server;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::app::command::TracingReporter;
use crate::app::Application;
use crate::auth::{AuthInterceptor, JwtManager};
use crate::config::{StorageBackend, UserServiceConfig};
use crate::grpc::UserGrpcService;
use crate::infra::{Database, RecordValidator};
use crate::repository::{InMemoryUserStore, UserStore};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The gRPC service as mounted on the server, auth interceptor included.
pub type UserServer =
    InterceptedService<proto::UserServiceServer<UserGrpcService>, AuthInterceptor>;

/// Run the user service as an embedded component (for combined binary).
///
/// The server drains in-flight calls once `shutdown` resolves.
pub async fn run_embedded(
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()>,
) -> Result<(), BoxError> {
    let config = UserServiceConfig::from_env()?;
    run_server_with_config(host, port, config, shutdown).await
}

/// Run the user service until ctrl-c.
pub async fn run_standalone(host: &str, port: u16) -> Result<(), BoxError> {
    let config = UserServiceConfig::from_env()?;
    run_server_with_config(host, port, config, shutdown_signal()).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), BoxError> {
    let config = common::DatabaseConfig::from_env()?;
    let db = Database::connect_without_migrations(&config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action, shared by every binary exposing a `migrate` command.
#[derive(Debug, Clone, Copy, clap::Subcommand)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

/// Mint a bearer token for local testing.
pub fn mint_token(user_id: Uuid, roles: &[&str]) -> Result<String, BoxError> {
    let jwt = common::JwtConfig::from_env()?;
    Ok(JwtManager::new(&jwt).generate(user_id, roles)?)
}

/// Build the application over the configured storage backend.
pub async fn build_application(config: &UserServiceConfig) -> Result<Application, BoxError> {
    let reporter = Arc::new(TracingReporter);
    let validator = RecordValidator::new();

    let app = match config.storage {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            let store = Arc::new(UserStore::new(db.into_connection(), validator));
            Application::from_store(store, reporter)
        }
        StorageBackend::Memory => {
            info!("Using in-memory user storage");
            Application::from_store(Arc::new(InMemoryUserStore::new(validator)), reporter)
        }
    };

    Ok(app)
}

/// Wrap the application in the gRPC service and its auth interceptor.
pub fn grpc_service(app: Application, config: &UserServiceConfig) -> UserServer {
    let jwt = Arc::new(JwtManager::new(&config.jwt));
    let service = UserGrpcService::new(app, config.request_timeout());

    proto::UserServiceServer::with_interceptor(service, AuthInterceptor::new(jwt))
}

/// Run the gRPC server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: UserServiceConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), BoxError> {
    let app = build_application(&config).await?;
    let service = grpc_service(app, &config);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("User service listening on {}", addr);

    Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .add_service(service)
        .serve_with_shutdown(addr, shutdown)
        .await?;

    info!("User service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Development binary: the user service and its HTTP gateway in one process.
//!
//! Both servers share a single shutdown signal, so ctrl-c drains them
//! together instead of dropping in-flight requests.

use std::future::Future;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service_lib::{BoxError, MigrateAction};

#[derive(Parser)]
#[command(name = "rust-api")]
#[command(about = "User service and HTTP gateway in a single binary for development")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gRPC service and the gateway side by side
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "GATEWAY_PORT", default_value = "3000")]
        gateway_port: u16,
        #[arg(long, env = "USER_SERVICE_PORT", default_value = "50051")]
        user_port: u16,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Commands::Serve {
            host,
            gateway_port,
            user_port,
        } => serve(host, gateway_port, user_port).await,
        Commands::Migrate { action } => user_service_lib::run_migrations(action).await,
    }
}

async fn serve(host: String, gateway_port: u16, user_port: u16) -> Result<(), BoxError> {
    info!(%host, gateway_port, user_port, "starting user service and gateway");

    let (stop_tx, stop_rx) = watch::channel(false);

    let user_host = host.clone();
    let user_stop = stopped(stop_rx.clone());
    let mut user_handle = tokio::spawn(async move {
        user_service_lib::run_embedded(&user_host, user_port, user_stop).await
    });

    // The gateway dials lazily, so start order does not matter.
    let gateway_stop = stopped(stop_rx);
    let mut gateway_handle = tokio::spawn(async move {
        gateway_lib::run_embedded(&host, gateway_port, user_port, gateway_stop).await
    });

    tokio::select! {
        result = &mut user_handle => {
            report("user service", result);
        }
        result = &mut gateway_handle => {
            report("gateway", result);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    // Whichever server is still running drains and stops.
    let _ = stop_tx.send(true);
    for handle in [user_handle, gateway_handle] {
        if !handle.is_finished() {
            if let Err(err) = handle.await {
                error!(error = %err, "server task panicked");
            }
        }
    }

    info!("All services stopped");
    Ok(())
}

/// Resolves once the shutdown flag is raised or every sender is gone.
fn stopped(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

fn report(name: &str, result: Result<Result<(), BoxError>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => error!("{} exited unexpectedly", name),
        Ok(Err(err)) => error!(error = %err, "{} failed", name),
        Err(err) => error!(error = %err, "{} task panicked", name),
    }
}

//! User Service - gRPC server for user management.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use domain::ROLE_USER;
use user_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User management microservice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gRPC server
    Serve {
        #[arg(long, env = "USER_SERVICE_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "USER_SERVICE_PORT", default_value = "50051")]
        port: u16,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Print a bearer token for a user (development only)
    Token {
        /// User the token is issued for; a random id when omitted
        #[arg(long)]
        user_id: Option<Uuid>,
        /// Roles to embed in the token
        #[arg(long = "role", default_value = ROLE_USER)]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            user_service_lib::run_standalone(&host, port).await?;
        }
        Commands::Migrate { action } => {
            user_service_lib::run_migrations(action).await?;
        }
        Commands::Token { user_id, roles } => {
            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
            let token = user_service_lib::mint_token(user_id, &roles)?;
            println!("user id: {}", user_id);
            println!("Bearer {}", token);
        }
    }

    Ok(())
}

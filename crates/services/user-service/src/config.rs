//! User service configuration.

use std::str::FromStr;
use std::time::Duration;

use common::{env_parse, ConfigError, DatabaseConfig, JwtConfig};

/// Which adapter backs the repository ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend {:?}", other)),
        }
    }
}

/// User service configuration.
///
/// The bind address is a CLI argument (`--host`, `--port`), not part of this
/// struct.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Upper bound on every request, also used when the client sends no deadline
    pub request_timeout_ms: u64,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            request_timeout_ms: env_parse(
                "USER_SERVICE_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            )?,
            storage: env_parse("USER_SERVICE_STORAGE", defaults.storage)?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            storage: StorageBackend::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
        }
    }
}

//! Gateway configuration.

use common::{ConfigError, GrpcClientConfig};

/// Gateway configuration.
///
/// The bind address comes from the CLI (`--host`, `--port`).
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// User service gRPC client settings
    pub user_service: GrpcClientConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            user_service: GrpcClientConfig::from_env(
                "USER_SERVICE_URL",
                &defaults.user_service.endpoint,
            )?,
        })
    }
}

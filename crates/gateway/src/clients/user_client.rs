//! gRPC client for user-service.

use async_trait::async_trait;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::AUTHORIZATION_METADATA_KEY;
use proto::user::{
    user_service_client::UserServiceClient as ProtoUserServiceClient, CreateUserRequest,
    FindUsersRequest, GetUserRequest, HealthcheckRequest, User as ProtoUser,
};

/// User operations exposed over HTTP.
///
/// `authorization` is the caller's `Authorization` header, forwarded as-is.
#[async_trait]
pub trait UserServiceApi: Send + Sync {
    async fn create_user(&self, email: String) -> AppResult<ProtoUser>;

    async fn find_users(
        &self,
        authorization: Option<String>,
        email: Option<String>,
    ) -> AppResult<Vec<ProtoUser>>;

    async fn get_user(&self, authorization: Option<String>, id: String) -> AppResult<ProtoUser>;

    async fn healthcheck(&self) -> AppResult<String>;
}

/// gRPC client wrapper for user-service.
pub struct UserClient {
    client: ProtoUserServiceClient<Channel>,
}

impl UserClient {
    /// Create a lazily connecting client; the first call dials the service.
    pub fn connect(config: &GrpcClientConfig) -> Result<Self, tonic::transport::Error> {
        debug!("Connecting to user-service at {}", config.endpoint);
        let channel = Endpoint::from_shared(config.endpoint.clone())?
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .connect_lazy();

        Ok(Self {
            client: ProtoUserServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl UserServiceApi for UserClient {
    async fn create_user(&self, email: String) -> AppResult<ProtoUser> {
        let request = tonic::Request::new(CreateUserRequest { email });

        let mut client = self.client.clone();
        let response = client.create_user(request).await.map_err(AppError::from)?;
        response
            .into_inner()
            .user
            .ok_or_else(|| AppError::internal("user-service returned no user"))
    }

    async fn find_users(
        &self,
        authorization: Option<String>,
        email: Option<String>,
    ) -> AppResult<Vec<ProtoUser>> {
        let request = authorized(FindUsersRequest { email }, authorization)?;

        let mut client = self.client.clone();
        let response = client.find_users(request).await.map_err(AppError::from)?;
        Ok(response.into_inner().users)
    }

    async fn get_user(&self, authorization: Option<String>, id: String) -> AppResult<ProtoUser> {
        let request = authorized(GetUserRequest { id }, authorization)?;

        let mut client = self.client.clone();
        let response = client.get_user(request).await.map_err(AppError::from)?;
        response
            .into_inner()
            .user
            .ok_or_else(|| AppError::internal("user-service returned no user"))
    }

    async fn healthcheck(&self) -> AppResult<String> {
        let mut client = self.client.clone();
        let response = client
            .healthcheck(tonic::Request::new(HealthcheckRequest {}))
            .await
            .map_err(AppError::from)?;
        Ok(response.into_inner().status)
    }
}

/// Wrap `message` and attach the caller's credentials, if any.
fn authorized<T>(message: T, authorization: Option<String>) -> AppResult<tonic::Request<T>> {
    let mut request = tonic::Request::new(message);
    if let Some(value) = authorization {
        let value: MetadataValue<Ascii> = value.parse().map_err(|_| {
            AppError::from(domain::DomainError::unauthorized("auth token is invalid"))
        })?;
        request
            .metadata_mut()
            .insert(AUTHORIZATION_METADATA_KEY, value);
    }
    Ok(request)
}

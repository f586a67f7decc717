//! gRPC implementation for UserService.

use std::time::Duration;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use common::AppResult;
use domain::{DomainError, Filter, ROLE_USER};
use proto::user::{
    user_service_server::UserService as UserServiceProto, CreateUserRequest, CreateUserResponse,
    FindUsersRequest, FindUsersResponse, GetUserRequest, GetUserResponse, HealthcheckRequest,
    HealthcheckResponse, User as UserProto,
};

use super::deadline::parse_grpc_timeout;
use super::error::handle_err;
use crate::app::command::CreateUser;
use crate::app::{query, Application, Context};
use crate::auth::AuthenticatedUser;

/// gRPC service wrapper around the application.
pub struct UserGrpcService {
    app: Application,
    request_timeout: Duration,
}

impl UserGrpcService {
    pub fn new(app: Application, request_timeout: Duration) -> Self {
        Self {
            app,
            request_timeout,
        }
    }

    /// Deadline from the client, capped by the server's own timeout.
    fn context<T>(&self, request: &Request<T>) -> Context {
        let timeout = parse_grpc_timeout(request.metadata())
            .map_or(self.request_timeout, |client| client.min(self.request_timeout));
        Context::with_timeout(timeout)
    }

    async fn create(&self, ctx: &Context, email: String) -> AppResult<UserProto> {
        let id = Uuid::new_v4();
        self.app
            .commands
            .create_user
            .handle(
                ctx,
                CreateUser {
                    id,
                    email: email.clone(),
                },
            )
            .await
            .map_err(|err| err.context("create user command"))?;

        Ok(UserProto {
            id: id.to_string(),
            email,
        })
    }

    async fn find(
        &self,
        ctx: &Context,
        caller: AppResult<AuthenticatedUser>,
        email: Option<String>,
    ) -> AppResult<Vec<UserProto>> {
        let caller = caller?.require_role(ROLE_USER)?;

        let mut filter = Filter::by_id(caller.id);
        if let Some(email) = email.filter(|e| !e.is_empty()) {
            filter = filter.with_email(email);
        }

        let users = self
            .app
            .queries
            .find_users
            .handle(ctx, filter)
            .await
            .map_err(|err| err.context("find users query"))?;

        Ok(users.iter().map(user_to_proto).collect())
    }

    async fn get(
        &self,
        ctx: &Context,
        caller: AppResult<AuthenticatedUser>,
        id: &str,
    ) -> AppResult<UserProto> {
        let caller = caller?;
        let id = parse_uuid(id)?;
        if caller.id != id {
            return Err(DomainError::unauthorized("user").into());
        }

        let user = self
            .app
            .queries
            .user_by_id
            .handle(ctx, id)
            .await
            .map_err(|err| err.context("user by id query"))?;

        Ok(user_to_proto(&user))
    }

    async fn respond<T>(&self, result: AppResult<T>) -> Result<Response<T>, Status> {
        match result {
            Ok(message) => Ok(Response::new(message)),
            Err(err) => Err(handle_err(&self.app, err).await),
        }
    }
}

#[tonic::async_trait]
impl UserServiceProto for UserGrpcService {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<CreateUserResponse>, Status> {
        let ctx = self.context(&request);
        let req = request.into_inner();

        let result = self
            .create(&ctx, req.email)
            .await
            .map(|user| CreateUserResponse { user: Some(user) });
        self.respond(result).await
    }

    async fn find_users(
        &self,
        request: Request<FindUsersRequest>,
    ) -> Result<Response<FindUsersResponse>, Status> {
        let ctx = self.context(&request);
        let caller = AuthenticatedUser::from_request(&request);
        let req = request.into_inner();

        let result = self
            .find(&ctx, caller, req.email)
            .await
            .map(|users| FindUsersResponse { users });
        self.respond(result).await
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let ctx = self.context(&request);
        let caller = AuthenticatedUser::from_request(&request);
        let req = request.into_inner();

        let result = self
            .get(&ctx, caller, &req.id)
            .await
            .map(|user| GetUserResponse { user: Some(user) });
        self.respond(result).await
    }

    async fn healthcheck(
        &self,
        _request: Request<HealthcheckRequest>,
    ) -> Result<Response<HealthcheckResponse>, Status> {
        Ok(Response::new(HealthcheckResponse {
            status: "ok".to_string(),
        }))
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Parse UUID from string, classifying failures as invalid input.
fn parse_uuid(s: &str) -> AppResult<Uuid> {
    Uuid::parse_str(s).map_err(|_| DomainError::invalid("invalid user id").into())
}

fn user_to_proto(user: &query::User) -> UserProto {
    UserProto {
        id: user.id.to_string(),
        email: user.email.clone(),
    }
}

//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use common::AppResult;

use crate::extractors::ApiJson;
use crate::state::AppState;

/// User create request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Email address of the new user
    #[schema(example = "jane@example.com")]
    #[serde(default)]
    pub email: String,
}

/// Optional filters for listing users
#[derive(Debug, Deserialize, IntoParams)]
pub struct FindUsersQuery {
    /// Only return users with this email
    pub email: Option<String>,
}

/// Public user representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "0b6a3b5e-8f5e-4a8f-9d57-4f1f2b3c4d5e")]
    pub id: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

impl From<proto::user::User> for UserResponse {
    fn from(user: proto::user::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(find_users).post(create_user))
        .route("/:id", get(get_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Body unreadable, email missing or malformed"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_client.create_user(payload.email).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List the users visible to the caller
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(FindUsersQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn find_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FindUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_client
        .find_users(authorization(&headers), query.email)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get the caller's own user by ID
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed user ID"),
        (status = 401, description = "Unauthorized or not the caller's own ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_client
        .get_user(authorization(&headers), id)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

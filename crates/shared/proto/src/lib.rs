//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated gRPC service definitions for
//! `user.v1.UserService`: create, find and get users plus a healthcheck,
//! and the error detail messages attached to failed calls.

/// User service definitions.
pub mod user {
    tonic::include_proto!("user.v1");

    /// Type URL used when packing [`ErrorResponse`] into a `google.protobuf.Any`.
    pub const ERROR_RESPONSE_TYPE_URL: &str = "type.googleapis.com/user.v1.ErrorResponse";
}

// Re-export commonly used items
pub use user::user_service_client::UserServiceClient;
pub use user::user_service_server::{UserService, UserServiceServer};

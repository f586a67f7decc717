//! gRPC transport adapter.

mod deadline;
mod error;
mod user_grpc;

pub use deadline::parse_grpc_timeout;
pub use user_grpc::UserGrpcService;

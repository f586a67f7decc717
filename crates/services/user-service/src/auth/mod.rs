//! Bearer-token authentication for the gRPC server.

mod interceptor;
mod jwt;

pub use interceptor::{AuthInterceptor, AuthenticatedUser};
pub use jwt::{Claims, JwtManager};

//! gRPC auth interceptor.
//!
//! Requests carrying an `authorization: Bearer <jwt>` entry are verified and
//! tagged with an [`AuthenticatedUser`] extension. The interceptor never
//! rejects a call itself: a missing or bad token only matters to RPCs that
//! ask for a caller, so public RPCs keep working with stale credentials.

use std::sync::Arc;

use tonic::{service::Interceptor, Request, Status};
use uuid::Uuid;

use common::AppResult;
use domain::{DomainError, AUTHORIZATION_METADATA_KEY, BEARER_TOKEN_PREFIX};

use super::JwtManager;

/// Identity of the caller, taken from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub roles: Vec<String>,
}

/// Marker left by the interceptor when a token was sent but did not verify.
#[derive(Debug, Clone, Copy)]
struct RejectedToken;

impl AuthenticatedUser {
    /// The caller attached to `request`, or `unauthorized`.
    pub fn from_request<T>(request: &Request<T>) -> AppResult<Self> {
        let extensions = request.extensions();
        if let Some(caller) = extensions.get::<AuthenticatedUser>() {
            return Ok(caller.clone());
        }

        let message = if extensions.get::<RejectedToken>().is_some() {
            "auth token is invalid"
        } else {
            "auth token is missing"
        };
        Err(DomainError::unauthorized(message).into())
    }

    pub fn require_role(self, role: &str) -> AppResult<Self> {
        if self.roles.iter().any(|r| r == role) {
            Ok(self)
        } else {
            Err(DomainError::unauthorized("no permission to access this RPC").into())
        }
    }
}

#[derive(Clone)]
pub struct AuthInterceptor {
    jwt: Arc<JwtManager>,
}

impl AuthInterceptor {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self { jwt }
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let Some(raw) = request.metadata().get(AUTHORIZATION_METADATA_KEY) else {
            return Ok(request);
        };

        let verified = raw
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
            .map(|token| self.jwt.verify(token));

        match verified {
            Some(Ok(claims)) => {
                request.extensions_mut().insert(AuthenticatedUser {
                    id: claims.sub,
                    roles: claims.roles,
                });
            }
            Some(Err(err)) => {
                tracing::debug!(error = %err, "rejected bearer token");
                request.extensions_mut().insert(RejectedToken);
            }
            None => {
                tracing::debug!("malformed authorization metadata");
                request.extensions_mut().insert(RejectedToken);
            }
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::JwtConfig;
    use domain::{ErrorKind, ROLE_ADMIN, ROLE_USER};

    fn interceptor() -> (AuthInterceptor, Arc<JwtManager>) {
        let jwt = Arc::new(JwtManager::new(&JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".to_string(),
            expiration_hours: 1,
        }));
        (AuthInterceptor::new(jwt.clone()), jwt)
    }

    fn with_authorization(value: &str) -> Request<()> {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert(AUTHORIZATION_METADATA_KEY, value.parse().unwrap());
        request
    }

    #[test]
    fn anonymous_request_passes_without_identity() {
        let (mut interceptor, _) = interceptor();
        let request = interceptor.call(Request::new(())).unwrap();

        let err = AuthenticatedUser::from_request(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn valid_token_attaches_caller() {
        let (mut interceptor, jwt) = interceptor();
        let user_id = Uuid::new_v4();
        let token = jwt.generate(user_id, &[ROLE_USER]).unwrap();

        let request = interceptor
            .call(with_authorization(&format!("Bearer {}", token)))
            .unwrap();
        let caller = AuthenticatedUser::from_request(&request).unwrap();

        assert_eq!(caller.id, user_id);
        assert!(caller.require_role(ROLE_USER).is_ok());
    }

    #[test]
    fn bad_credentials_pass_through_but_yield_no_caller() {
        let (mut interceptor, _) = interceptor();

        for value in ["Token abc", "Bearer abc"] {
            let request = interceptor.call(with_authorization(value)).unwrap();

            let err = AuthenticatedUser::from_request(&request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
            assert_eq!(err.user_message(), "auth token is invalid");
        }
    }

    #[test]
    fn missing_role_is_unauthorized() {
        let caller = AuthenticatedUser {
            id: Uuid::new_v4(),
            roles: vec![ROLE_USER.to_string()],
        };

        let err = caller.require_role(ROLE_ADMIN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}

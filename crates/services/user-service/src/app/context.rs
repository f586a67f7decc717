//! Per-request cancellation scope.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use common::{AppError, AppResult};

/// Carries the caller's deadline into the application layer.
///
/// Handlers race their single repository call against the deadline. Dropping
/// the handler future (client disconnect) abandons the call as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Drive `fut` to completion unless the deadline passes first.
    pub async fn run<F, T>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match self.deadline {
            Some(deadline) => timeout_at(deadline, fut)
                .await
                .map_err(|_| AppError::DeadlineExceeded)?,
            None => fut.await,
        }
    }
}

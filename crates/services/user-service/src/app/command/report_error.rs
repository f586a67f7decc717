//! Report unexpected failures to an external sink.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, ResultExt};

use crate::app::Context;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Destination for errors nobody classified.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn report_error(&self, err: &AppError) -> AppResult<()>;
}

/// Reports errors as structured log events.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

#[async_trait]
impl ReportService for TracingReporter {
    async fn report_error(&self, err: &AppError) -> AppResult<()> {
        tracing::error!(
            error = %err,
            kind = %err.kind(),
            "unexpected error reported"
        );
        Ok(())
    }
}

pub struct ReportError<'a> {
    pub err: &'a AppError,
}

#[derive(Clone)]
pub struct ReportErrorHandler {
    service: Arc<dyn ReportService>,
}

impl ReportErrorHandler {
    pub fn new(service: Arc<dyn ReportService>) -> Self {
        Self { service }
    }

    pub async fn handle(&self, ctx: &Context, cmd: ReportError<'_>) -> AppResult<()> {
        ctx.run(self.service.report_error(cmd.err))
            .await
            .context("report")
    }
}

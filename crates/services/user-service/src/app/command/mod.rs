//! Commands change the state of the system.

mod create_user;
mod report_error;

pub use create_user::{CreateUser, CreateUserHandler};
pub use report_error::{ReportError, ReportErrorHandler, ReportService, TracingReporter};

#[cfg(any(test, feature = "test-utils"))]
pub use report_error::MockReportService;

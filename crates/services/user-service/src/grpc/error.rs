//! Error exit of every RPC.

use tonic::Status;

use common::{status_from_error, AppError};
use domain::ErrorKind;

use crate::app::command::ReportError;
use crate::app::{Application, Context};

/// Log `err`, report it when nobody classified it, and build the status.
///
/// Reporting runs on a fresh context so an expired request deadline does
/// not swallow the report.
pub(crate) async fn handle_err(app: &Application, err: AppError) -> Status {
    if err.kind() == ErrorKind::Internal && !err.is_cancellation() {
        tracing::error!(error = %err, "rpc failed");

        let report = app
            .commands
            .report_error
            .handle(&Context::background(), ReportError { err: &err })
            .await;
        if let Err(report_err) = report {
            tracing::error!(error = %report_err, "failed to report error");
        }
    } else {
        tracing::info!(error = %err, kind = %err.kind(), "rpc rejected");
    }

    status_from_error(&err)
}

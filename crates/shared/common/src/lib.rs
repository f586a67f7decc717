//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling for HTTP and gRPC
//! - The single error to gRPC status mapping
//! - Configuration structures

pub mod config;
pub mod error;
pub mod status;

pub use config::*;
pub use error::{AppError, AppResult, ResultExt, INTERNAL_ERROR_MESSAGE};
pub use status::{code_for_kind, decode_details, status_from_error};

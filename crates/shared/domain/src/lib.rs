//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the `User` entity, the read filter and the application error taxonomy.

pub mod constants;
pub mod error;
pub mod user;

pub use constants::*;
pub use error::{ApplicationErrorCode, DomainError, DomainResult, ErrorDetails, ErrorKind};
pub use user::{Filter, User};

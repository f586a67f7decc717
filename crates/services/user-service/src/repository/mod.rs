//! Repository layer for data access.
//!
//! The write port lives here; the read-model ports are declared by the
//! query side in [`crate::app::query`]. Both storage adapters implement all
//! of them.

pub mod entities;
mod memory;
mod user_repository;

use async_trait::async_trait;

use common::AppResult;
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use memory::InMemoryUserStore;
pub use user_repository::UserStore;

/// Write port for users.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a validated user.
    ///
    /// A duplicate id or email is an opaque storage failure.
    async fn create_user(&self, user: &User) -> AppResult<()>;
}

//! Queries read the system without changing it.

mod find_users;
mod types;
mod user_by_id;

pub use find_users::{FindUsersHandler, FindUsersReadModel};
pub use types::User;
pub use user_by_id::{UserByIdHandler, UserByIdReadModel};

#[cfg(any(test, feature = "test-utils"))]
pub use find_users::MockFindUsersReadModel;
#[cfg(any(test, feature = "test-utils"))]
pub use user_by_id::MockUserByIdReadModel;

//! Application layer: command and query handlers.
//!
//! Handlers are stateless apart from the ports they hold, so the whole
//! [`Application`] is cheap to clone and safe to share across requests.

pub mod command;
mod context;
pub mod query;

use std::sync::Arc;

pub use context::Context;

use crate::repository::UserRepository;
use command::{CreateUserHandler, ReportErrorHandler, ReportService};
use query::{FindUsersHandler, FindUsersReadModel, UserByIdHandler, UserByIdReadModel};

#[derive(Clone)]
pub struct Application {
    pub commands: Commands,
    pub queries: Queries,
}

#[derive(Clone)]
pub struct Commands {
    pub create_user: CreateUserHandler,
    pub report_error: ReportErrorHandler,
}

#[derive(Clone)]
pub struct Queries {
    pub find_users: FindUsersHandler,
    pub user_by_id: UserByIdHandler,
}

impl Application {
    pub fn new(
        users: Arc<dyn UserRepository>,
        find_users: Arc<dyn FindUsersReadModel>,
        user_by_id: Arc<dyn UserByIdReadModel>,
        reporter: Arc<dyn ReportService>,
    ) -> Self {
        Self {
            commands: Commands {
                create_user: CreateUserHandler::new(users),
                report_error: ReportErrorHandler::new(reporter),
            },
            queries: Queries {
                find_users: FindUsersHandler::new(find_users),
                user_by_id: UserByIdHandler::new(user_by_id),
            },
        }
    }

    /// Wire every port to a single store implementing all of them.
    pub fn from_store<S>(store: Arc<S>, reporter: Arc<dyn ReportService>) -> Self
    where
        S: UserRepository + FindUsersReadModel + UserByIdReadModel + 'static,
    {
        Self::new(store.clone(), store.clone(), store, reporter)
    }
}

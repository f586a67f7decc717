//! Infrastructure layer - database and record validation.

mod db;
pub mod migrations;
mod validation;

pub use db::Database;
pub use migrations::Migrator;
pub use validation::RecordValidator;

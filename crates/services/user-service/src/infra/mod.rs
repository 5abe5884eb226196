//! Infrastructure layer - database connection and migrations.

mod db;

pub use db::Database;
pub use migration::Migrator;

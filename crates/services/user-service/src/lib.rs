//! User Service Library
//!
//! Accounts, profiles, travel preferences and the email verification
//! workflow. Also owns the shared [`Database`] wrapper and migration CLI
//! entry point used by the combined binary.

pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use common::DatabaseConfig;

pub use crate::infra::Database;
pub use crate::repository::{UserRepository, UserStore, VerificationRepository, VerificationStore};
pub use crate::service::{UserManager, UserService, VerificationManager, VerificationService};

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env();
    let db = Database::connect_without_migrations(&config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

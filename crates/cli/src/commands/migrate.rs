//! Database migration command.
//!
//! Applies the migrations in `crates/server/migrations/`; already-applied
//! migrations are skipped.

use roster_server::db;

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations complete!");
    Ok(())
}

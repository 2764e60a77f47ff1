//! User inspection commands.

use roster_server::db::{PgUserStore, UserStore};

use super::{CommandError, connect};

/// Print the number of stored users.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn count() -> Result<(), CommandError> {
    let store = PgUserStore::new(connect().await?);
    let total = store.count().await?;
    store.close().await;

    #[allow(clippy::print_stdout)]
    {
        println!("{total}");
    }
    Ok(())
}

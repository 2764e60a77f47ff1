//! Seed the users table with sample data.
//!
//! Entries are validated with the same rules as `POST /api/users`, so a seed
//! file can never store a record the API would reject.

use std::path::Path;

use serde_json::Value;

use roster_core::{CreateUserRequest, FromPayload, NewUser};
use roster_server::db::{PgUserStore, UserStore};

use super::{CommandError, connect};

/// Bundled sample users.
const SAMPLE_USERS: &str = include_str!("../../seed/users.yaml");

/// Parse and validate a seed document.
fn parse_seed(content: &str) -> Result<Vec<NewUser>, CommandError> {
    let entries: Vec<Value> = serde_yaml::from_str(content)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            CreateUserRequest::from_payload(entry)
                .map(CreateUserRequest::into_inner)
                .map_err(|errors| CommandError::InvalidSeed { index, errors })
        })
        .collect()
}

/// Load users from `file` (or the bundled set), truncating first unless
/// `keep` is set.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or if any insert
/// fails (including an email that already exists). A failed insert rolls
/// back the whole seed, truncation included.
pub async fn run(keep: bool, file: Option<&Path>) -> Result<(), CommandError> {
    let users = match file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading users from file");
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CommandError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
            parse_seed(&content)?
        }
        None => parse_seed(SAMPLE_USERS)?,
    };
    tracing::info!(users = users.len(), "Parsed seed data");

    let store = PgUserStore::new(connect().await?);

    let created = store.seed(users, !keep).await?;
    if !keep {
        tracing::info!("Cleared existing users");
    }
    for user in &created {
        tracing::info!(user_id = %user.id, email = %user.email, "Inserted user");
    }

    store.close().await;
    tracing::info!("Seed completed.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_seed_is_valid() {
        let users = parse_seed(SAMPLE_USERS).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Leanne Graham");
        assert_eq!(users[1].address.city, "Wisokyburgh");
        assert!((users[1].address.geo.lat + 43.9509).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_entry_is_reported_with_index() {
        let content = "- name: Ok\n  email: broken\n";
        let err = parse_seed(content).unwrap_err();
        assert!(matches!(err, CommandError::InvalidSeed { index: 0, .. }));
        assert!(err.to_string().contains("\"email\" must be a valid email"));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            parse_seed("- name: [unterminated"),
            Err(CommandError::Yaml(_))
        ));
    }
}

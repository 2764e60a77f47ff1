//! Store abstraction shared by the `PostgreSQL` and in-memory backends.

use async_trait::async_trait;
use roster_core::{NewUser, User, UserId, UserListQuery, UserPatch};

use super::RepositoryError;

/// One page (or the whole set) of list results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPage {
    pub users: Vec<User>,
    /// Total matching records, ignoring paging. Only computed when paging.
    pub total: Option<u64>,
}

/// Persistent user records.
///
/// Writes that would duplicate an email fail with
/// [`RepositoryError::Conflict`]; missing ids yield `None` / `false` rather
/// than an error.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; the store assigns id and timestamps.
    async fn create(&self, input: NewUser) -> Result<User, RepositoryError>;

    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Search, order and optionally page through users.
    async fn list(&self, query: &UserListQuery) -> Result<UserPage, RepositoryError>;

    /// Overwrite every writable field.
    async fn replace(&self, id: UserId, input: NewUser) -> Result<Option<User>, RepositoryError>;

    /// Merge a partial update; address sub-fields are merged individually.
    async fn patch(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, RepositoryError>;

    /// Hard-delete a user. Returns `false` if it did not exist.
    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Release pooled resources during shutdown.
    async fn close(&self) {}
}

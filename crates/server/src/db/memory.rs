//! In-process user store.
//!
//! Mirrors the `PostgreSQL` store's semantics (email uniqueness, search,
//! ordering, paging) so the API behaves identically in tests and demos.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use roster_core::{
    Email, NewUser, Sort, SortDirection, SortField, User, UserId, UserListQuery, UserPatch,
};

use super::{RepositoryError, UserPage, UserStore};

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    next_id: i32,
}

impl Inner {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|u| &u.email == email && Some(u.id) != except)
    }

    fn find_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }
}

/// User store held in memory behind an async mutex.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.lock().await;
        if inner.email_taken(&input.email, None) {
            return Err(RepositoryError::email_taken());
        }

        inner.next_id = inner
            .next_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::DataCorruption("user id sequence exhausted".into()))?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(inner.next_id),
            name: input.name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            address: input.address,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self, query: &UserListQuery) -> Result<UserPage, RepositoryError> {
        let inner = self.inner.lock().await;

        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut users: Vec<User> = inner
            .users
            .iter()
            .filter(|u| needle.as_deref().is_none_or(|needle| matches_search(u, needle)))
            .cloned()
            .collect();
        drop(inner);

        users.sort_by(|a, b| compare(a, b, query.sort));

        let Some(paging) = query.paging else {
            return Ok(UserPage { users, total: None });
        };

        let total = u64::try_from(users.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(paging.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(paging.limit).unwrap_or(usize::MAX);
        let users = users.into_iter().skip(offset).take(limit).collect();

        Ok(UserPage {
            users,
            total: Some(total),
        })
    }

    async fn replace(&self, id: UserId, input: NewUser) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.lock().await;
        if inner.find_mut(id).is_none() {
            return Ok(None);
        }
        if inner.email_taken(&input.email, Some(id)) {
            return Err(RepositoryError::email_taken());
        }

        let Some(user) = inner.find_mut(id) else {
            return Ok(None);
        };
        user.replace_with(&input, Utc::now());
        Ok(Some(user.clone()))
    }

    async fn patch(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.lock().await;
        if inner.find_mut(id).is_none() {
            return Ok(None);
        }
        if let Some(email) = &patch.email
            && inner.email_taken(email, Some(id))
        {
            return Err(RepositoryError::email_taken());
        }

        let Some(user) = inner.find_mut(id) else {
            return Ok(None);
        };
        user.apply_patch(&patch, Utc::now());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.lock().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        Ok(inner.users.len() != before)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Case-insensitive substring match over the searchable fields.
fn matches_search(user: &User, needle: &str) -> bool {
    [
        user.name.as_str(),
        user.email.as_str(),
        user.phone.as_str(),
        user.company.as_str(),
        user.address.city.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &User, b: &User, sort: Sort) -> Ordering {
    let primary = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Email => a.email.as_str().cmp(b.email.as_str()),
        SortField::Company => a.company.cmp(&b.company),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
    .then_with(|| a.id.cmp(&b.id));

    match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roster_core::{Address, AddressPatch, Geo, Paging};

    use super::*;

    fn new_user(name: &str, email: &str, company: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: Email::parse(email).unwrap(),
            phone: "010-692-6593".to_string(),
            company: company.to_string(),
            address: Address {
                street: "Victor Plains".to_string(),
                city: "Wisokyburgh".to_string(),
                zipcode: "90566-7771".to_string(),
                geo: Geo {
                    lat: -43.9509,
                    lng: -34.4618,
                },
            },
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("A", "a@x.com", "Acme")).await.unwrap();
        let b = store.create(new_user("B", "b@x.com", "Acme")).await.unwrap();
        assert_eq!(a.id, UserId::new(1));
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("A", "a@x.com", "Acme")).await.unwrap();
        let err = store
            .create(new_user("B", "a@x.com", "Acme"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { field, .. } if field == "email"));

        // Differently cased emails are distinct.
        assert!(store.create(new_user("C", "A@x.com", "Acme")).await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_and_patch_check_uniqueness_against_others() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("A", "a@x.com", "Acme")).await.unwrap();
        store.create(new_user("B", "b@x.com", "Acme")).await.unwrap();

        // Keeping your own email is fine.
        let replaced = store
            .replace(a.id, new_user("A2", "a@x.com", "Acme"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.name, "A2");

        let patch = UserPatch {
            email: Some(Email::parse("b@x.com").unwrap()),
            ..UserPatch::default()
        };
        assert!(matches!(
            store.patch(a.id, patch).await,
            Err(RepositoryError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_patch_merges_address() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("A", "a@x.com", "Acme")).await.unwrap();

        let patch = UserPatch {
            address: Some(AddressPatch {
                city: Some("Gwenborough".to_string()),
                ..AddressPatch::default()
            }),
            ..UserPatch::default()
        };
        let patched = store.patch(a.id, patch).await.unwrap().unwrap();
        assert_eq!(patched.address.city, "Gwenborough");
        assert_eq!(patched.address.street, "Victor Plains");
        assert_eq!(patched.address.geo, a.address.geo);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = MemoryUserStore::new();
        let id = UserId::new(9999);
        assert!(store.get(id).await.unwrap().is_none());
        assert!(
            store
                .replace(id, new_user("A", "a@x.com", "Acme"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .patch(id, UserPatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_search_sort_and_page() {
        let store = MemoryUserStore::new();
        for (i, name) in ["Carol", "alice", "Bob", "Dave"].iter().enumerate() {
            let company = if i == 2 { "Romaguera-Crona" } else { "Acme" };
            store
                .create(new_user(name, &format!("{i}@x.com"), company))
                .await
                .unwrap();
        }

        let found = store
            .list(&UserListQuery {
                search: Some("CRONA".to_string()),
                ..UserListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(found.users.len(), 1);
        assert_eq!(found.users[0].name, "Bob");
        assert_eq!(found.total, None);

        let page = store
            .list(&UserListQuery {
                sort: Sort::parse("-id"),
                paging: Some(Paging { page: 2, limit: 3 }),
                ..UserListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, Some(4));
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.users[0].id, UserId::new(1));
    }
}

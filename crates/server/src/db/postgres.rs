//! `PostgreSQL` user store.
//!
//! Queries are built at runtime with [`QueryBuilder`] since search, ordering
//! and paging vary per request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use roster_core::{Address, Email, NewUser, Sort, SortField, User, UserId, UserListQuery, UserPatch};

use super::{RepositoryError, UserPage, UserStore};

const COLUMNS: &str = "id, name, email, phone, company, address, created_at, updated_at";

/// Columns matched by free-text search.
const SEARCH_COLUMNS: [&str; 5] = ["name", "email", "phone", "company", "address->>'city'"];

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    phone: String,
    company: String,
    address: Json<Address>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            company: row.company,
            address: row.address.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// User store backed by a `PgPool`.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert `users` in a single transaction, first truncating the table
    /// (restarting ids at 1) when `reset` is set.
    ///
    /// Nothing is committed unless every insert succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an email already exists, or
    /// `RepositoryError::Database` if any statement fails.
    pub async fn seed(
        &self,
        users: Vec<NewUser>,
        reset: bool,
    ) -> Result<Vec<User>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if reset {
            sqlx::query("TRUNCATE TABLE users RESTART IDENTITY")
                .execute(&mut *tx)
                .await?;
        }

        let mut created = Vec::with_capacity(users.len());
        for user in &users {
            created.push(insert_user(&mut *tx, user).await?);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Count all stored users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

async fn insert_user<'e, E>(executor: E, input: &NewUser) -> Result<User, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row: UserRow = sqlx::query_as(&format!(
        r"
        INSERT INTO users (name, email, phone, company, address)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "
    ))
    .bind(&input.name)
    .bind(input.email.as_str())
    .bind(&input.phone)
    .bind(&input.company)
    .bind(Json(&input.address))
    .fetch_one(executor)
    .await
    .map_err(map_write_error)?;

    row.try_into()
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: NewUser) -> Result<User, RepositoryError> {
        insert_user(&self.pool, &input).await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self, query: &UserListQuery) -> Result<UserPage, RepositoryError> {
        let search = query.search.as_deref().map(like_pattern);

        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM users"));
        push_search(&mut builder, search.as_deref());
        push_order(&mut builder, query.sort);
        if let Some(paging) = query.paging {
            builder
                .push(" LIMIT ")
                .push_bind(i64::from(paging.limit))
                .push(" OFFSET ")
                .push_bind(i64::try_from(paging.offset()).unwrap_or(i64::MAX));
        }

        let rows: Vec<UserRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let total = if query.paging.is_some() {
            let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
            push_search(&mut count, search.as_deref());
            let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;
            Some(u64::try_from(total).unwrap_or_default())
        } else {
            None
        };

        Ok(UserPage { users, total })
    }

    async fn replace(&self, id: UserId, input: NewUser) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r"
            UPDATE users
            SET name = $2, email = $3, phone = $4, company = $5, address = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.email.as_str())
        .bind(&input.phone)
        .bind(&input.company)
        .bind(Json(&input.address))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(User::try_from).transpose()
    }

    async fn patch(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, RepositoryError> {
        // `address || $6` replaces only the keys present in the patch; a
        // NULL patch leaves the column untouched via COALESCE.
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                address = COALESCE(address || $6::jsonb, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.email.as_ref().map(Email::as_str))
        .bind(patch.phone.as_deref())
        .bind(patch.company.as_deref())
        .bind(patch.address.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Append the case-insensitive search predicate, if any.
fn push_search(builder: &mut QueryBuilder<'_, Postgres>, pattern: Option<&str>) {
    let Some(pattern) = pattern else {
        return;
    };

    builder.push(" WHERE (");
    let mut predicates = builder.separated(" OR ");
    for column in SEARCH_COLUMNS {
        predicates
            .push(format_args!("{column} ILIKE "))
            .push_bind_unseparated(pattern.to_owned());
    }
    builder.push(")");
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: Sort) {
    let direction = sort.direction.as_sql();
    builder.push(format_args!(" ORDER BY {} {direction}", sort.field.column()));
    if sort.field != SortField::Id {
        builder.push(format_args!(", id {direction}"));
    }
}

/// Build an `ILIKE` substring pattern with wildcards in `term` escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Map unique violations to `Conflict`, naming the offending column.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let field = db_err.constraint().map_or("value", constraint_column);
        return RepositoryError::Conflict {
            field: field.to_owned(),
            message: format!("{field} must be unique"),
        };
    }
    RepositoryError::Database(e)
}

/// `users_email_key` -> `email`.
fn constraint_column(constraint: &str) -> &str {
    constraint
        .strip_prefix("users_")
        .and_then(|rest| rest.strip_suffix("_key"))
        .unwrap_or(constraint)
}

#[cfg(test)]
mod tests {
    use roster_core::SortDirection;

    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("crona"), "%crona%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_constraint_column() {
        assert_eq!(constraint_column("users_email_key"), "email");
        assert_eq!(constraint_column("custom_idx"), "custom_idx");
    }

    #[test]
    fn test_list_sql_shape() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM users");
        push_search(&mut builder, Some("%a%"));
        push_order(
            &mut builder,
            Sort {
                field: SortField::Name,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(
            builder.sql(),
            "SELECT id FROM users WHERE (name ILIKE $1 OR email ILIKE $2 OR phone ILIKE $3 \
             OR company ILIKE $4 OR address->>'city' ILIKE $5) ORDER BY name DESC, id DESC"
        );
    }

    #[test]
    fn test_order_by_id_has_no_tiebreaker() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM users");
        push_order(
            &mut builder,
            Sort {
                field: SortField::Id,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(builder.sql(), "SELECT id FROM users ORDER BY id ASC");
    }
}

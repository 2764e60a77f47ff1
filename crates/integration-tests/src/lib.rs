//! Integration tests for Roster.
//!
//! # Running Tests
//!
//! ```bash
//! # Against a running server (defaults to http://localhost:5000)
//! ROSTER_BASE_URL=http://localhost:5000 cargo test -p roster-integration-tests -- --ignored
//!
//! # Against a scratch database (migrations are applied automatically)
//! ROSTER_TEST_DATABASE_URL=postgres://localhost/roster_test \
//!     cargo test -p roster-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `api_server` - HTTP tests against a live server
//! - `pg_store` - `PgUserStore` tests against a real database
//!
//! Records are made unique with random emails and companies so the suites can
//! share a database and run in parallel.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use roster_server::db;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("ROSTER_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A short random token for isolating test data.
#[must_use]
pub fn unique_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// An email no other test will use.
#[must_use]
pub fn unique_email() -> String {
    format!("user-{}@example.com", unique_token())
}

/// A valid create payload.
#[must_use]
pub fn user_payload(name: &str, email: &str, company: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "1-770-736-8031",
        "company": company,
        "address": {
            "street": "Kulas Light",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "1", "lng": 81.1496 }
        }
    })
}

/// Connect to the scratch database and bring its schema up to date.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("ROSTER_TEST_DATABASE_URL")
        .map(SecretString::from)
        .expect("ROSTER_TEST_DATABASE_URL must be set");
    let pool = db::create_pool(&url, 5)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

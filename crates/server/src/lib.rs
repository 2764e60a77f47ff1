//! Roster server library.
//!
//! Serves the JSON user API under `/api` and the server-rendered dashboard at
//! the root. Exposed as a library so the router can be tested in-process and
//! the CLI can reuse the store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::app;
pub use state::AppState;

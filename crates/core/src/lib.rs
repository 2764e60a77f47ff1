//! Roster Core - Shared types library.
//!
//! This crate provides the types used across all Roster components:
//! - `server` - JSON API and browser dashboard
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Request payloads are validated here so the API and the
//! dashboard apply exactly the same rules.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and emails, the user record, list queries
//! - [`validation`] - Create / replace / patch payload validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{
    CreateUserRequest, FieldError, FromPayload, PatchUserRequest, ReplaceUserRequest,
};

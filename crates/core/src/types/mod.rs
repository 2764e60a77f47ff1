//! Core types for Roster.
//!
//! This module provides type-safe wrappers for the user domain.

pub mod address;
pub mod email;
pub mod id;
pub mod list;
pub mod user;

pub use address::{Address, AddressPatch, Geo};
pub use email::{Email, EmailError};
pub use id::*;
pub use list::{ListParams, PageMeta, Paging, Sort, SortDirection, SortField, UserListQuery};
pub use user::{NewUser, User, UserPatch};

//! User record and write inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, AddressPatch, Email, UserId};

/// A stored user.
///
/// Serialized with camelCase keys (`createdAt`, `updatedAt`) for API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub company: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, complete user payload for create and full replace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub company: String,
    pub address: Address,
}

/// A validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<AddressPatch>,
}

impl User {
    /// Overwrite every writable field with a full payload.
    pub fn replace_with(&mut self, input: &NewUser, now: DateTime<Utc>) {
        self.name.clone_from(&input.name);
        self.email = input.email.clone();
        self.phone.clone_from(&input.phone);
        self.company.clone_from(&input.company);
        self.address = input.address.clone();
        self.updated_at = now;
    }

    /// Merge a partial update into this record.
    pub fn apply_patch(&mut self, patch: &UserPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone.clone_from(phone);
        }
        if let Some(company) = &patch.company {
            self.company.clone_from(company);
        }
        if let Some(address) = &patch.address {
            address.apply_to(&mut self.address);
        }
        self.updated_at = now;
    }
}

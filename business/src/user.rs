//! User records as served by the upstream `/users` endpoints.
//!
//! Records are read-only: they are deserialized from the API and never mutated locally.
//! Fields the dashboard does not show (e.g. `address.geo`) are ignored on decode.

use serde::{Deserialize, Serialize};

/// Stable identifier of a user.
pub type UserId = u64;

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: Company,
    pub address: Address,
}

/// Employer details attached to a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

/// Postal address attached to a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

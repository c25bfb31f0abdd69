//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better
/// compile time errors, and more flexible generics that can have distinct
/// implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a raw integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer, e.g. for use in SQL query parameters.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized, so a `User` can be embedded directly
/// in API responses.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The ID of the user.
    pub id: UserID,
    /// The unique name the user signs in with.
    pub username: String,
    /// An optional display name. Falls back to the username at registration.
    pub nickname: Option<String>,
    /// An optional URL to the user's avatar image.
    pub avatar: Option<String>,
    /// The bcrypt hash of the user's password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

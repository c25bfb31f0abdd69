//! Defines the user store trait and its parameter types.

use crate::{
    Error,
    models::{User, UserID},
};

/// The data needed to register a user. The password must already be hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    /// The unique sign-in name.
    pub username: String,
    /// The bcrypt hash of the user's password.
    pub password_hash: String,
    /// An optional display name.
    pub nickname: Option<String>,
}

/// The mutable profile fields of a user. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct ProfilePatch {
    /// A replacement display name.
    pub nickname: Option<String>,
    /// A replacement avatar URL.
    pub avatar: Option<String>,
}

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if the username is taken.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Retrieve a user by id.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given id.
    fn get_by_id(&self, id: UserID) -> Result<User, Error>;

    /// Retrieve a user by username.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given username.
    fn get_by_username(&self, username: &str) -> Result<User, Error>;

    /// Update the profile fields of a user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has the given id.
    fn update_profile(&mut self, id: UserID, patch: ProfilePatch) -> Result<User, Error>;
}

//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{User, UserID},
    stores::{NewUser, ProfilePatch, UserStore},
};

/// Creates and retrieves users to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create a user in the database.
    ///
    /// # Errors
    /// This function will return [Error::DuplicateUsername] if the username is
    /// taken, or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        let user = connection
            .prepare(
                "INSERT INTO user (username, password_hash, nickname, avatar, created_at)
                 VALUES (?1, ?2, ?3, NULL, ?4)
                 RETURNING id, username, nickname, avatar, password_hash, created_at",
            )?
            .query_row(
                (
                    &new_user.username,
                    &new_user.password_hash,
                    &new_user.nickname,
                    Utc::now(),
                ),
                Self::map_row,
            )?;

        Ok(user)
    }

    fn get_by_id(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, username, nickname, avatar, password_hash, created_at
                 FROM user WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, username, nickname, avatar, password_hash, created_at
                 FROM user WHERE username = :username",
            )?
            .query_row(&[(":username", &username)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn update_profile(&mut self, id: UserID, patch: ProfilePatch) -> Result<User, Error> {
        let mut user = self.get_by_id(id)?;

        if let Some(nickname) = patch.nickname {
            user.nickname = Some(nickname);
        }

        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }

        self.connection.lock().unwrap().execute(
            "UPDATE user SET nickname = ?1, avatar = ?2 WHERE id = ?3",
            (&user.nickname, &user.avatar, id.as_i64()),
        )?;

        Ok(user)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                nickname TEXT,
                avatar TEXT,
                created_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(User {
            id: UserID::new(row.get(offset)?),
            username: row.get(offset + 1)?,
            nickname: row.get(offset + 2)?,
            avatar: row.get(offset + 3)?,
            password_hash: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
        })
    }
}

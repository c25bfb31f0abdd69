//! Contains the SQLite backed implementations of the store traits and a
//! convenience function for building an [AppState] on top of them.

pub mod category;
pub mod transaction;
pub mod user;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::{initialize, seed_system_categories},
    pagination::PaginationConfig,
};

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models and seeding the built-in system categories.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    db_connection: Connection,
    jwt_secret: &str,
    default_account_type: &str,
    pagination_config: PaginationConfig,
) -> Result<AppState, Error> {
    initialize(&db_connection)?;
    seed_system_categories(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        jwt_secret,
        default_account_type,
        pagination_config,
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    ))
}

//! This module defines traits for interacting with the application's
//! database, along with schema initialization and system category seeding.

use chrono::Utc;
use rusqlite::{Connection, Row, Transaction as SqlTransaction};

use crate::{
    Error,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore},
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a
/// concrete rust type.
pub trait MapRow {
    /// The type that rows are mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the
    /// table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from. This
    /// is useful in cases where tables have been joined and you want to
    /// construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the application tables if they do not exist.
///
/// Foreign key enforcement is switched on for the connection; deleting a
/// category that transactions still reference is rejected by the schema.
///
/// # Errors
/// Returns an error if the database could not be modified.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteCategoryStore::create_table(&transaction)?;
    SQLiteTransactionStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// The built-in categories every user sees: name, icon, color.
const SYSTEM_EXPENSE_CATEGORIES: [(&str, &str, &str); 10] = [
    ("Dining", "🍽️", "#FF6B6B"),
    ("Transport", "🚗", "#4ECDC4"),
    ("Shopping", "🛒", "#FFE66D"),
    ("Entertainment", "🎮", "#A8E6CF"),
    ("Health", "💊", "#FF8B94"),
    ("Housing", "🏠", "#C7CEEA"),
    ("Education", "📚", "#FFDAB9"),
    ("Snacks", "🍭", "#FFB6D9"),
    ("Daily Necessities", "🧴", "#A0E7E5"),
    ("Other Expenses", "💸", "#B4A7D6"),
];

const SYSTEM_INCOME_CATEGORIES: [(&str, &str, &str); 5] = [
    ("Salary", "💰", "#06D6A0"),
    ("Part-time", "💼", "#118AB2"),
    ("Investment", "📈", "#EF476F"),
    ("Gifts", "🧧", "#FFD166"),
    ("Other Income", "💵", "#06FFA5"),
];

/// Seed the built-in system categories.
///
/// Idempotent: categories that already exist (matched by name and type) are
/// left untouched, so this can run on every server start.
///
/// # Errors
/// Returns an error if the database could not be modified.
pub fn seed_system_categories(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Deferred)?;

    {
        let mut exists_statement = transaction.prepare(
            "SELECT EXISTS (
                SELECT 1 FROM category
                WHERE name = ?1 AND type = ?2 AND is_system = 1
            )",
        )?;
        let mut insert_statement = transaction.prepare(
            "INSERT INTO category
                (name, type, icon, color, is_system, user_id, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, NULL, ?5, ?6)",
        )?;

        for (category_type, categories) in [
            ("expense", SYSTEM_EXPENSE_CATEGORIES.as_slice()),
            ("income", SYSTEM_INCOME_CATEGORIES.as_slice()),
        ] {
            for (position, (name, icon, color)) in categories.iter().enumerate() {
                let already_seeded: bool =
                    exists_statement.query_row((name, category_type), |row| row.get(0))?;

                if already_seeded {
                    continue;
                }

                insert_statement.execute((
                    name,
                    category_type,
                    icon,
                    color,
                    position as i64 + 1,
                    Utc::now(),
                ))?;
            }
        }
    }

    transaction.commit()?;

    Ok(())
}

//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, TransactionType, UserID},
    stores::{CategoryPatch, CategoryStore, NewCategory},
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Fetch a category by id alone, regardless of owner.
    fn get_any(connection: &Connection, category_id: DatabaseID) -> Result<Category, Error> {
        connection
            .prepare(
                "SELECT id, name, type, icon, color, is_system, user_id, sort_order, created_at
                 FROM category WHERE id = :id",
            )?
            .query_row(&[(":id", &category_id)], Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
                error => error.into(),
            })
    }

    /// Fetch a category that `user_id` owns and may modify.
    ///
    /// Absent and foreign categories are indistinguishable to the caller;
    /// system categories are reported as immutable rather than missing
    /// because they are visible to everyone.
    fn get_owned(
        connection: &Connection,
        user_id: UserID,
        category_id: DatabaseID,
    ) -> Result<Category, Error> {
        let category = Self::get_any(connection, category_id)?;

        if category.is_system {
            return Err(Error::SystemCategoryImmutable);
        }

        if category.user_id != Some(user_id) {
            return Err(Error::NotFound);
        }

        Ok(category)
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Retrieve the categories visible to `user_id` in display order.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn list(
        &self,
        user_id: UserID,
        type_filter: Option<TransactionType>,
    ) -> Result<Vec<Category>, Error> {
        let connection = self.connection.lock().unwrap();

        let mut query_string_parts = vec![
            "SELECT id, name, type, icon, color, is_system, user_id, sort_order, created_at
             FROM category WHERE (is_system = 1 OR user_id = ?1)"
                .to_string(),
        ];
        let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

        if let Some(type_filter) = type_filter {
            query_string_parts.push(format!("AND type = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(type_filter.as_str().to_string()));
        }

        query_string_parts
            .push("ORDER BY is_system DESC, sort_order ASC, created_at ASC, id ASC".to_string());

        let result = connection
            .prepare(&query_string_parts.join(" "))?
            .query_map(params_from_iter(query_parameters.iter()), Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect();
        result
    }

    /// Create a user category at the end of its type partition.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&mut self, new_category: NewCategory) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();

        // System categories take part in the maximum so a fresh custom
        // category always lands after the built-ins.
        let max_sort_order: Option<i64> = connection.query_row(
            "SELECT MAX(sort_order) FROM category
             WHERE type = ?1 AND (is_system = 1 OR user_id = ?2)",
            (new_category.r#type, new_category.user_id.as_i64()),
            |row| row.get(0),
        )?;
        let sort_order = max_sort_order.map_or(0, |max| max + 1);

        let category = connection
            .prepare(
                "INSERT INTO category
                    (name, type, icon, color, is_system, user_id, sort_order, created_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7)
                 RETURNING id, name, type, icon, color, is_system, user_id, sort_order, created_at",
            )?
            .query_row(
                (
                    new_category.name.as_ref(),
                    new_category.r#type,
                    &new_category.icon,
                    &new_category.color,
                    new_category.user_id.as_i64(),
                    sort_order,
                    Utc::now(),
                ),
                Self::map_row,
            )?;

        Ok(category)
    }

    fn update(
        &mut self,
        user_id: UserID,
        category_id: DatabaseID,
        patch: CategoryPatch,
    ) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();

        let mut category = Self::get_owned(&connection, user_id, category_id)?;

        if let Some(name) = patch.name {
            category.name = name;
        }

        if let Some(icon) = patch.icon {
            category.icon = Some(icon);
        }

        if let Some(color) = patch.color {
            category.color = Some(color);
        }

        connection.execute(
            "UPDATE category SET name = ?1, icon = ?2, color = ?3 WHERE id = ?4",
            (
                category.name.as_ref(),
                &category.icon,
                &category.color,
                category.id,
            ),
        )?;

        Ok(category)
    }

    fn delete(&mut self, user_id: UserID, category_id: DatabaseID) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();

        let category = Self::get_owned(&connection, user_id, category_id)?;

        connection
            .execute("DELETE FROM category WHERE id = ?1", (category.id,))
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed:
                // transactions still reference this category.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 787 =>
                {
                    Error::CategoryInUse
                }
                error => error.into(),
            })?;

        Ok(())
    }

    /// Reassign sort orders from an ordered id list, all or nothing.
    ///
    /// The visibility check and every row update run inside a single SQL
    /// transaction; a failure part-way leaves the previous ordering intact.
    ///
    /// # Errors
    /// This function will return [Error::ReorderDenied] if any id does not
    /// exist or is not visible to `user_id`, or [Error::SqlError] if there is
    /// some other SQL error.
    fn reorder(&mut self, user_id: UserID, ordered_ids: &[DatabaseID]) -> Result<(), Error> {
        if ordered_ids.is_empty() {
            return Ok(());
        }

        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        let placeholders = vec!["?"; ordered_ids.len()].join(", ");
        let count_query = format!(
            "SELECT COUNT(id) FROM category
             WHERE id IN ({placeholders}) AND (is_system = 1 OR user_id = ?)"
        );

        let mut query_parameters: Vec<Value> = ordered_ids
            .iter()
            .map(|&id| Value::Integer(id))
            .collect();
        query_parameters.push(Value::Integer(user_id.as_i64()));

        let visible_count: i64 = transaction.query_row(
            &count_query,
            params_from_iter(query_parameters.iter()),
            |row| row.get(0),
        )?;

        // Duplicated ids in the input also fail this check, since each
        // category row is counted once.
        if visible_count != ordered_ids.len() as i64 {
            return Err(Error::ReorderDenied);
        }

        let mut statement =
            transaction.prepare("UPDATE category SET sort_order = ?1 WHERE id = ?2")?;

        for (index, id) in ordered_ids.iter().enumerate() {
            statement.execute((index as i64 + 1, id))?;
        }

        drop(statement);
        transaction.commit()?;

        Ok(())
    }

    fn exists(&self, category_id: DatabaseID) -> Result<bool, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM category WHERE id = ?1)",
                (category_id,),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                icon TEXT,
                color TEXT,
                is_system INTEGER NOT NULL DEFAULT 0,
                user_id INTEGER,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_name: String = row.get(offset + 1)?;
        let raw_user_id: Option<i64> = row.get(offset + 6)?;

        Ok(Category {
            id: row.get(offset)?,
            name: CategoryName::new_unchecked(&raw_name),
            r#type: row.get(offset + 2)?,
            icon: row.get(offset + 3)?,
            color: row.get(offset + 4)?,
            is_system: row.get(offset + 5)?,
            user_id: raw_user_id.map(UserID::new),
            sort_order: row.get(offset + 7)?,
            created_at: row.get(offset + 8)?,
        })
    }
}

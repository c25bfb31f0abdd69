//! This file defines the `Category` type and the types needed to create a
//! category. Every transaction is filed under exactly one category.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a category (and the transactions filed under it) records money
/// coming in or going out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received, e.g. wages.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string stored in the database and used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if the non-empty invariant is violated it will cause incorrect
    /// behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for income or expenses, e.g. 'Groceries' or 'Salary'.
///
/// System categories are seeded at database initialization, visible to every
/// user and owned by none (`user_id` is `None`). User categories are created
/// through the API and visible only to their owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The display name of the category.
    pub name: CategoryName,
    /// Whether the category holds income or expense transactions. Fixed at
    /// creation.
    pub r#type: TransactionType,
    /// An optional icon name shown by the client.
    pub icon: Option<String>,
    /// An optional display color, e.g. `#FF6B6B`.
    pub color: Option<String>,
    /// Whether this is a built-in category. Fixed at creation.
    pub is_system: bool,
    /// The owning user, or `None` for system categories.
    pub user_id: Option<UserID>,
    /// Display position within the category's type partition, lower first.
    pub sort_order: i64,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Whether `user_id` is allowed to see this category.
    pub fn is_visible_to(&self, user_id: UserID) -> bool {
        self.is_system || self.user_id == Some(user_id)
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use crate::Error;

    use super::TransactionType;

    #[test]
    fn parses_known_values() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
    }

    #[test]
    fn rejects_unknown_value() {
        let parsed: Result<TransactionType, Error> = "transfer".parse();

        assert_eq!(parsed, Err(Error::InvalidTransactionType));
    }
}

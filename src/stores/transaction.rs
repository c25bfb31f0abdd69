//! Defines the transaction store trait, its query types and the statistics
//! summary types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionType, UserID},
};

/// The data needed to create a transaction.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    /// The user recording the transaction.
    pub user_id: UserID,
    /// The category to file the transaction under. Any existing category is
    /// accepted; ownership is not required.
    pub category_id: DatabaseID,
    /// Whether the transaction is income or an expense.
    pub r#type: TransactionType,
    /// The amount of money. Must be greater than zero.
    pub amount: Decimal,
    /// The calendar date of the transaction. Defaults to today when `None`.
    pub date: Option<NaiveDate>,
    /// An optional free-text note.
    pub description: Option<String>,
    /// The account the money moved through.
    pub account_type: String,
}

/// The mutable fields of a transaction. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    /// Re-point the transaction at a different category.
    pub category_id: Option<DatabaseID>,
    /// A replacement transaction type.
    pub r#type: Option<TransactionType>,
    /// A replacement amount. Must be greater than zero.
    pub amount: Option<Decimal>,
    /// A replacement date.
    pub date: Option<NaiveDate>,
    /// A replacement description.
    pub description: Option<String>,
    /// A replacement account type.
    pub account_type: Option<String>,
}

/// Defines which transactions to fetch from [TransactionStore::get_query],
/// and how many.
///
/// All filters are optional and combined with AND; results are always scoped
/// to `user_id`.
#[derive(Clone, Debug)]
pub struct TransactionQuery {
    /// The user whose transactions to fetch.
    pub user_id: UserID,
    /// Include only transactions of this type.
    pub r#type: Option<TransactionType>,
    /// Include only transactions filed under this category.
    pub category_id: Option<DatabaseID>,
    /// Include only transactions on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Include only transactions on or before this date.
    pub date_to: Option<NaiveDate>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: u64,
    /// Skips the first N (`offset`) transactions.
    pub offset: u64,
}

/// The income/expense totals for a statistics query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income amounts in range.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    /// The sum of all expense amounts in range.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    /// `total_income - total_expense`. May be negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// The aggregate for one (type, category) group in a statistics query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    /// Whether the group holds income or expense transactions.
    pub r#type: TransactionType,
    /// The category the group belongs to.
    pub category_id: DatabaseID,
    /// The category's display name.
    pub name: String,
    /// The category's icon, if any.
    pub icon: Option<String>,
    /// The category's display color, if any.
    pub color: Option<String>,
    /// The sum of the group's amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// The number of transactions in the group.
    pub count: u64,
}

/// The full result of a statistics query: overall totals plus the
/// per-category breakdown ordered by descending total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The overall income/expense totals and balance.
    pub summary: Summary,
    /// Per-(type, category) aggregates, largest total first.
    pub category_stats: Vec<CategoryStat>,
}

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not greater than zero
    /// and [Error::CategoryNotFound] if the category does not exist.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if the transaction does not exist
    /// or belongs to another user.
    fn get(&self, user_id: UserID, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve transactions in the way defined by `query`, newest first,
    /// along with the total number of matches before pagination.
    fn get_query(&self, query: &TransactionQuery) -> Result<(Vec<Transaction>, u64), Error>;

    /// Update a transaction owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if the transaction does not exist
    /// or belongs to another user, [Error::CategoryNotFound] if the patch
    /// points at a category that does not exist and [Error::InvalidAmount] if
    /// the patch carries a non-positive amount.
    fn update(
        &mut self,
        user_id: UserID,
        id: DatabaseID,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error>;

    /// Delete a transaction owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if the transaction does not exist
    /// or belongs to another user.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error>;

    /// Aggregate the user's transactions over an optional inclusive date
    /// range: overall totals plus a per-(type, category) breakdown.
    ///
    /// Sums are computed in exact integer cents; an empty range produces
    /// zero totals, not an error.
    fn statistics(
        &self,
        user_id: UserID,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Statistics, Error>;
}

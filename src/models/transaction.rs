//! This file defines the `Transaction` type, a single income or expense
//! record belonging to a user.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, TransactionType, UserID};

/// A single income or expense record.
///
/// Amounts are strictly positive decimals with two fractional digits; the
/// sign is carried by [TransactionType], not the amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The category the transaction is filed under.
    pub category_id: DatabaseID,
    /// Whether the transaction is income or an expense.
    pub r#type: TransactionType,
    /// The transaction amount. Always greater than zero.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// The calendar date the transaction took place on.
    pub date: NaiveDate,
    /// An optional free-text note.
    pub description: Option<String>,
    /// The account the money moved through, e.g. `cash` or `card`.
    pub account_type: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

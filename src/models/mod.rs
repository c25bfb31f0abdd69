//! This module defines the domain data types.

pub use category::{Category, CategoryName, TransactionType};
pub use transaction::Transaction;
pub use user::{User, UserID};

mod category;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

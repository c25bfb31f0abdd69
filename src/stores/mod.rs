//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

mod category;
mod transaction;
mod user;

pub mod sqlite;

pub use category::{CategoryPatch, CategoryStore, NewCategory};
pub use transaction::{
    CategoryStat, NewTransaction, Statistics, Summary, TransactionPatch, TransactionQuery,
    TransactionStore,
};
pub use user::{NewUser, ProfilePatch, UserStore};

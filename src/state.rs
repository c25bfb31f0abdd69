//! Implements a struct that holds the state of the REST server.

use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::{
    pagination::PaginationConfig,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore},
};

/// The signing and verification keys for JWTs, derived from one secret.
#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The state of the REST server.
///
/// All stores share one underlying database connection. There is no other
/// shared mutable state between requests.
#[derive(Clone)]
pub struct AppState {
    /// The store for income/expense categories.
    pub category_store: SQLiteCategoryStore,
    /// The store for transactions.
    pub transaction_store: SQLiteTransactionStore,
    /// The store for user accounts.
    pub user_store: SQLiteUserStore,
    /// The account type recorded on transactions that do not specify one.
    pub default_account_type: String,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
    /// How long issued auth tokens stay valid.
    pub token_duration: Duration,
    jwt_keys: JwtKeys,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `jwt_secret` is used for both signing and verifying auth tokens.
    pub fn new(
        jwt_secret: &str,
        default_account_type: &str,
        pagination_config: PaginationConfig,
        category_store: SQLiteCategoryStore,
        transaction_store: SQLiteTransactionStore,
        user_store: SQLiteUserStore,
    ) -> Self {
        Self {
            category_store,
            transaction_store,
            user_store,
            default_account_type: default_account_type.to_owned(),
            pagination_config,
            token_duration: Duration::days(7),
            jwt_keys: JwtKeys::new(jwt_secret),
        }
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }
}

//! Defines the app level error type and its conversion to API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::ApiResponse;

/// The errors that may occur in the application.
///
/// Every error maps to a business status code that is mirrored by the HTTP
/// status of the response envelope: 400 for invalid input, 401 for
/// authentication failures, 403 for operations on resources the caller may
/// see but not touch, 404 for absent or invisible resources, 409 for
/// referential-integrity conflicts and 500 for everything unexpected.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username or password field was missing or empty.
    #[error("username and password must not be empty")]
    MissingCredentials,

    /// The username does not satisfy the length rule.
    #[error("username must be between 3 and 50 characters")]
    InvalidUsername,

    /// The password does not satisfy the length rule.
    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    /// The username is already registered.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// The username/password combination did not match a registered user.
    ///
    /// Unknown usernames and wrong passwords intentionally produce the same
    /// error so that account existence cannot be probed.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The request did not carry a bearer token.
    #[error("authentication token is missing or malformed")]
    MissingToken,

    /// The bearer token failed verification.
    #[error("the authentication token is invalid")]
    InvalidToken,

    /// The bearer token was valid once but has expired.
    #[error("the authentication token has expired")]
    ExpiredToken,

    /// A category was created without a name or type.
    #[error("category name and type must not be empty")]
    MissingCategoryFields,

    /// An empty string was used as a category name.
    #[error("an empty string is not a valid category name")]
    EmptyCategoryName,

    /// A type value other than `income` or `expense` was supplied.
    #[error("type must be either income or expense")]
    InvalidTransactionType,

    /// A transaction was created without a category, type or amount.
    #[error("category, type and amount are required")]
    MissingTransactionFields,

    /// A transaction amount was zero, negative or out of range.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The referenced category does not exist, or is not visible to the
    /// requesting user.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// The referenced transaction does not exist, or belongs to another user.
    #[error("the transaction could not be found")]
    TransactionNotFound,

    /// The caller tried to modify or delete a built-in category.
    #[error("system categories cannot be modified")]
    SystemCategoryImmutable,

    /// A reorder request referenced at least one category that does not exist
    /// or is not visible to the caller. The whole batch is rejected.
    #[error("one or more categories do not exist or are not accessible")]
    ReorderDenied,

    /// The category is still referenced by transactions and cannot be
    /// deleted.
    #[error("the category is still referenced by transactions")]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// never sent to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The JWT library failed to sign a token.
    #[error("could not create the authentication token")]
    TokenCreation,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// The business status code carried in the response envelope.
    pub fn business_code(&self) -> u16 {
        match self {
            Error::MissingCredentials
            | Error::InvalidUsername
            | Error::PasswordTooShort
            | Error::DuplicateUsername
            | Error::MissingCategoryFields
            | Error::EmptyCategoryName
            | Error::InvalidTransactionType
            | Error::MissingTransactionFields
            | Error::InvalidAmount => 400,
            Error::InvalidCredentials
            | Error::MissingToken
            | Error::InvalidToken
            | Error::ExpiredToken => 401,
            Error::SystemCategoryImmutable | Error::ReorderDenied => 403,
            Error::CategoryNotFound | Error::TransactionNotFound | Error::NotFound => 404,
            Error::CategoryInUse => 409,
            Error::HashingError(_) | Error::TokenCreation | Error::SqlError(_) => 500,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = self.business_code();

        // Internals are logged server-side and replaced with a generic
        // message on the wire.
        let msg = if code == 500 {
            tracing::error!("an unexpected error occurred: {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        ApiResponse::<()>::error(status, code, msg).into_response()
    }
}

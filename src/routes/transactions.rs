//! Route handlers for the transaction CRUD endpoints, the filtered paginated
//! listing and the statistics summary.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::Claims,
    models::{DatabaseID, Transaction, TransactionType},
    pagination::{PageQuery, Pagination},
    response::ApiResponse,
    state::AppState,
    stores::{
        NewTransaction, Statistics, TransactionPatch, TransactionQuery, TransactionStore,
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListTransactionsParams {
    /// Restrict the listing to one type. Unknown values are ignored.
    r#type: Option<String>,
    /// Restrict the listing to one category.
    category_id: Option<DatabaseID>,
    /// The inclusive lower date bound.
    start_date: Option<NaiveDate>,
    /// The inclusive upper date bound.
    end_date: Option<NaiveDate>,
    /// The 1-based page number.
    page: Option<u64>,
    /// The number of items per page.
    limit: Option<u64>,
}

#[derive(Serialize)]
pub(crate) struct TransactionsData {
    transactions: Vec<Transaction>,
    pagination: Pagination,
}

#[derive(Serialize)]
pub(crate) struct TransactionData {
    transaction: Transaction,
}

/// A route handler for the filtered, paginated transaction listing.
///
/// Results are always scoped to the caller and sorted newest first.
pub(crate) async fn list_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<ListTransactionsParams>,
) -> Result<ApiResponse<TransactionsData>, Error> {
    let page_query = PageQuery {
        page: params.page,
        limit: params.limit,
    };
    let (page, limit) = page_query.resolve(&state.pagination_config);

    let query = TransactionQuery {
        user_id: claims.user_id(),
        r#type: params
            .r#type
            .as_deref()
            .and_then(|raw_type| raw_type.parse::<TransactionType>().ok()),
        category_id: params.category_id,
        date_from: params.start_date,
        date_to: params.end_date,
        limit,
        offset: (page - 1) * limit,
    };

    let (transactions, total) = state.transaction_store.get_query(&query)?;

    Ok(ApiResponse::ok(
        "ok",
        TransactionsData {
            transactions,
            pagination: Pagination::new(total, page, limit),
        },
    ))
}

/// A route handler for fetching one of the caller's transactions.
pub(crate) async fn get_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<ApiResponse<TransactionData>, Error> {
    let transaction = state
        .transaction_store
        .get(claims.user_id(), transaction_id)?;

    Ok(ApiResponse::ok("ok", TransactionData { transaction }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTransactionBody {
    category_id: Option<DatabaseID>,
    r#type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
    date: Option<NaiveDate>,
    description: Option<String>,
    account_type: Option<String>,
}

/// A route handler for recording a new transaction.
///
/// The referenced category must exist but does not have to belong to the
/// caller; system categories and even other users' categories are accepted.
pub(crate) async fn create_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(body): Json<CreateTransactionBody>,
) -> Result<ApiResponse<TransactionData>, Error> {
    let (Some(category_id), Some(raw_type), Some(amount)) =
        (body.category_id, body.r#type, body.amount)
    else {
        return Err(Error::MissingTransactionFields);
    };

    let account_type = body
        .account_type
        .unwrap_or_else(|| state.default_account_type.clone());

    let transaction = state.transaction_store.create(NewTransaction {
        user_id: claims.user_id(),
        category_id,
        r#type: raw_type.parse()?,
        amount,
        date: body.date,
        description: body.description,
        account_type,
    })?;

    Ok(ApiResponse::ok("created", TransactionData { transaction }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTransactionBody {
    category_id: Option<DatabaseID>,
    r#type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
    date: Option<NaiveDate>,
    description: Option<String>,
    account_type: Option<String>,
}

/// A route handler for updating one of the caller's transactions.
///
/// Every field is optional; omitted fields keep their current value. A
/// non-positive amount is rejected, the same as on creation.
pub(crate) async fn update_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(body): Json<UpdateTransactionBody>,
) -> Result<ApiResponse<TransactionData>, Error> {
    let r#type = body
        .r#type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()?;

    let transaction = state.transaction_store.update(
        claims.user_id(),
        transaction_id,
        TransactionPatch {
            category_id: body.category_id,
            r#type,
            amount: body.amount,
            date: body.date,
            description: body.description,
            account_type: body.account_type,
        },
    )?;

    Ok(ApiResponse::ok("updated", TransactionData { transaction }))
}

/// A route handler for deleting one of the caller's transactions.
pub(crate) async fn delete_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<ApiResponse<()>, Error> {
    state
        .transaction_store
        .delete(claims.user_id(), transaction_id)?;

    Ok(ApiResponse::message("deleted"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatisticsParams {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// A route handler for the caller's aggregate income/expense statistics.
pub(crate) async fn get_statistics(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<StatisticsParams>,
) -> Result<ApiResponse<Statistics>, Error> {
    let statistics = state.transaction_store.statistics(
        claims.user_id(),
        params.start_date,
        params.end_date,
    )?;

    Ok(ApiResponse::ok("ok", statistics))
}

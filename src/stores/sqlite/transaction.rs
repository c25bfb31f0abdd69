//! Implements a SQLite backed transaction store.
//!
//! Amounts are persisted as integer cents so that the aggregate queries sum
//! in exact integer arithmetic; see [crate::money].

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Transaction, TransactionType, UserID},
    money,
    stores::{
        CategoryStat, NewTransaction, Statistics, Summary, TransactionPatch, TransactionQuery,
        TransactionStore,
    },
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the
/// [User](crate::models::User) and [Category](crate::models::Category)
/// models, these models must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn category_exists(connection: &Connection, category_id: DatabaseID) -> Result<bool, Error> {
        connection
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM category WHERE id = ?1)",
                (category_id,),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    fn get_owned(
        connection: &Connection,
        user_id: UserID,
        id: DatabaseID,
    ) -> Result<Transaction, Error> {
        connection
            .prepare(
                "SELECT id, user_id, category_id, type, amount_cents, date, description,
                        account_type, created_at
                 FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
                error => error.into(),
            })
    }

    /// Assemble the WHERE clause shared by the list and count queries.
    ///
    /// `column_prefix` qualifies column names for queries that join other
    /// tables, e.g. `"t."`.
    fn build_filter(
        query: &TransactionQuery,
        column_prefix: &str,
    ) -> (String, Vec<Value>) {
        let mut clause_parts = vec![format!("{column_prefix}user_id = ?1")];
        let mut parameters = vec![Value::Integer(query.user_id.as_i64())];

        if let Some(r#type) = query.r#type {
            clause_parts.push(format!(
                "{column_prefix}type = ?{}",
                parameters.len() + 1
            ));
            parameters.push(Value::Text(r#type.as_str().to_string()));
        }

        if let Some(category_id) = query.category_id {
            clause_parts.push(format!(
                "{column_prefix}category_id = ?{}",
                parameters.len() + 1
            ));
            parameters.push(Value::Integer(category_id));
        }

        if let Some(date_from) = query.date_from {
            clause_parts.push(format!(
                "{column_prefix}date >= ?{}",
                parameters.len() + 1
            ));
            parameters.push(Value::Text(date_from.to_string()));
        }

        if let Some(date_to) = query.date_to {
            clause_parts.push(format!(
                "{column_prefix}date <= ?{}",
                parameters.len() + 1
            ));
            parameters.push(Value::Text(date_to.to_string()));
        }

        (clause_parts.join(" AND "), parameters)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// The date defaults to today (UTC) and amounts are rounded to two
    /// decimal places before storage.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidAmount] if the amount is not greater than zero,
    /// - [Error::CategoryNotFound] if `category_id` does not refer to an
    ///   existing category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let amount_cents = money::to_cents(new_transaction.amount)?;

        let connection = self.connection.lock().unwrap();

        // Any existing category is accepted here, even one belonging to
        // another user; ownership only gates category mutation.
        if !Self::category_exists(&connection, new_transaction.category_id)? {
            return Err(Error::CategoryNotFound);
        }

        let date = new_transaction
            .date
            .unwrap_or_else(|| Utc::now().date_naive());

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\"
                    (user_id, category_id, type, amount_cents, date, description,
                     account_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id, user_id, category_id, type, amount_cents, date, description,
                           account_type, created_at",
            )?
            .query_row(
                (
                    new_transaction.user_id.as_i64(),
                    new_transaction.category_id,
                    new_transaction.r#type,
                    amount_cents,
                    date,
                    &new_transaction.description,
                    &new_transaction.account_type,
                    Utc::now(),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    fn get(&self, user_id: UserID, id: DatabaseID) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        Self::get_owned(&connection, user_id, id)
    }

    /// Query for transactions in the database, newest first.
    ///
    /// Returns the page of matching transactions along with the total number
    /// of matches before `limit`/`offset` were applied.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn get_query(&self, query: &TransactionQuery) -> Result<(Vec<Transaction>, u64), Error> {
        let connection = self.connection.lock().unwrap();

        let (where_clause, parameters) = Self::build_filter(query, "");

        let total_count: i64 = connection.query_row(
            &format!("SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"),
            params_from_iter(parameters.iter()),
            |row| row.get(0),
        )?;

        let select_query = format!(
            "SELECT id, user_id, category_id, type, amount_cents, date, description,
                    account_type, created_at
             FROM \"transaction\"
             WHERE {where_clause}
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT {} OFFSET {}",
            query.limit, query.offset
        );

        let transactions = connection
            .prepare(&select_query)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((transactions, total_count as u64))
    }

    /// Update a transaction in the database.
    ///
    /// The read-modify-write runs inside a single SQL transaction.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::TransactionNotFound] if `id` does not refer to a transaction
    ///   owned by `user_id`,
    /// - [Error::CategoryNotFound] if the patch points at a category that
    ///   does not exist,
    /// - [Error::InvalidAmount] if the patch carries a non-positive amount,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        user_id: UserID,
        id: DatabaseID,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();
        let sql_transaction = connection.unchecked_transaction()?;

        let mut transaction = Self::get_owned(&sql_transaction, user_id, id)?;

        if let Some(category_id) = patch.category_id {
            if category_id != transaction.category_id
                && !Self::category_exists(&sql_transaction, category_id)?
            {
                return Err(Error::CategoryNotFound);
            }

            transaction.category_id = category_id;
        }

        if let Some(r#type) = patch.r#type {
            transaction.r#type = r#type;
        }

        if let Some(amount) = patch.amount {
            // A non-positive amount is rejected here just as it is on
            // creation, rather than silently keeping the previous value.
            transaction.amount = money::from_cents(money::to_cents(amount)?);
        }

        if let Some(date) = patch.date {
            transaction.date = date;
        }

        if let Some(description) = patch.description {
            transaction.description = Some(description);
        }

        if let Some(account_type) = patch.account_type {
            transaction.account_type = account_type;
        }

        sql_transaction.execute(
            "UPDATE \"transaction\"
             SET category_id = ?1, type = ?2, amount_cents = ?3, date = ?4,
                 description = ?5, account_type = ?6
             WHERE id = ?7",
            (
                transaction.category_id,
                transaction.r#type,
                money::to_cents(transaction.amount)?,
                transaction.date,
                &transaction.description,
                &transaction.account_type,
                transaction.id,
            ),
        )?;

        sql_transaction.commit()?;

        Ok(transaction)
    }

    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Err(Error::TransactionNotFound);
        }

        Ok(())
    }

    /// Aggregate a user's transactions over an optional inclusive date range.
    ///
    /// Totals and the per-category breakdown are summed as integer cents in
    /// SQL, so repeated aggregation of small amounts cannot drift the way
    /// binary floating-point sums would.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn statistics(
        &self,
        user_id: UserID,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Statistics, Error> {
        let connection = self.connection.lock().unwrap();

        let range_query = TransactionQuery {
            user_id,
            r#type: None,
            category_id: None,
            date_from,
            date_to,
            limit: 0,
            offset: 0,
        };

        let (where_clause, parameters) = Self::build_filter(&range_query, "");

        let mut total_income_cents = 0i64;
        let mut total_expense_cents = 0i64;

        let totals_query = format!(
            "SELECT type, SUM(amount_cents) FROM \"transaction\"
             WHERE {where_clause} GROUP BY type"
        );
        let mut statement = connection.prepare(&totals_query)?;
        let mut rows = statement.query(params_from_iter(parameters.iter()))?;

        while let Some(row) = rows.next()? {
            let r#type: TransactionType = row.get(0)?;
            let cents: i64 = row.get(1)?;

            match r#type {
                TransactionType::Income => total_income_cents = cents,
                TransactionType::Expense => total_expense_cents = cents,
            }
        }

        drop(rows);
        drop(statement);

        let (join_where_clause, join_parameters) = Self::build_filter(&range_query, "t.");

        let breakdown_query = format!(
            "SELECT t.type, t.category_id, c.name, c.icon, c.color,
                    SUM(t.amount_cents), COUNT(t.id)
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE {join_where_clause}
             GROUP BY t.type, t.category_id
             ORDER BY SUM(t.amount_cents) DESC, t.category_id ASC, t.type ASC"
        );

        let category_stats = connection
            .prepare(&breakdown_query)?
            .query_map(params_from_iter(join_parameters.iter()), |row| {
                let total_cents: i64 = row.get(5)?;
                let count: i64 = row.get(6)?;

                Ok(CategoryStat {
                    r#type: row.get(0)?,
                    category_id: row.get(1)?,
                    name: row.get(2)?,
                    icon: row.get(3)?,
                    color: row.get(4)?,
                    total: money::from_cents(total_cents),
                    count: count as u64,
                })
            })?
            .map(|maybe_stat| maybe_stat.map_err(Error::SqlError))
            .collect::<Result<Vec<_>, _>>()?;

        let total_income = money::from_cents(total_income_cents);
        let total_expense = money::from_cents(total_expense_cents);

        Ok(Statistics {
            summary: Summary {
                total_income,
                total_expense,
                balance: total_income - total_expense,
            },
            category_stats,
        })
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
                date TEXT NOT NULL,
                description TEXT,
                account_type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let amount_cents: i64 = row.get(offset + 4)?;

        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            category_id: row.get(offset + 2)?,
            r#type: row.get(offset + 3)?,
            amount: money::from_cents(amount_cents),
            date: row.get(offset + 5)?,
            description: row.get(offset + 6)?,
            account_type: row.get(offset + 7)?,
            created_at: row.get(offset + 8)?,
        })
    }
}

#[cfg(test)]
mod transaction_store_tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{
        Error,
        db::initialize,
        models::{DatabaseID, TransactionType, UserID},
        stores::{
            CategoryStore, NewCategory, NewTransaction, NewUser, TransactionPatch,
            TransactionQuery, TransactionStore, UserStore,
        },
        stores::sqlite::{SQLiteCategoryStore, SQLiteUserStore},
    };

    use super::SQLiteTransactionStore;

    struct Fixture {
        store: SQLiteTransactionStore,
        category_store: SQLiteCategoryStore,
        user_store: SQLiteUserStore,
        user_id: UserID,
        category_id: DatabaseID,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let mut user_store = SQLiteUserStore::new(connection.clone());
        let user = user_store
            .create(NewUser {
                username: "alice".to_string(),
                password_hash: "not-a-real-hash".to_string(),
                nickname: None,
            })
            .unwrap();

        let mut category_store = SQLiteCategoryStore::new(connection.clone());
        let category = category_store
            .create(NewCategory {
                user_id: user.id,
                name: crate::models::CategoryName::new_unchecked("Groceries"),
                r#type: TransactionType::Expense,
                icon: None,
                color: None,
            })
            .unwrap();

        Fixture {
            store: SQLiteTransactionStore::new(connection),
            category_store,
            user_store,
            user_id: user.id,
            category_id: category.id,
        }
    }

    fn new_transaction(fixture: &Fixture, amount: Decimal) -> NewTransaction {
        NewTransaction {
            user_id: fixture.user_id,
            category_id: fixture.category_id,
            r#type: TransactionType::Expense,
            amount,
            date: None,
            description: None,
            account_type: "cash".to_string(),
        }
    }

    fn query_for(user_id: UserID) -> TransactionQuery {
        TransactionQuery {
            user_id,
            r#type: None,
            category_id: None,
            date_from: None,
            date_to: None,
            limit: 100,
            offset: 0,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn create_succeeds_and_defaults_the_date_to_today() {
        let mut fixture = get_fixture();

        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, Decimal::new(1050, 2));
        assert_eq!(transaction.date, chrono::Utc::now().date_naive());
        assert_eq!(transaction.account_type, "cash");
    }

    #[test]
    fn create_fails_on_zero_or_negative_amount() {
        let mut fixture = get_fixture();

        let zero = fixture
            .store
            .create(new_transaction(&fixture, Decimal::ZERO));
        let negative = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(-100, 2)));

        assert_eq!(zero, Err(Error::InvalidAmount));
        assert_eq!(negative, Err(Error::InvalidAmount));
    }

    #[test]
    fn create_succeeds_with_one_cent() {
        let mut fixture = get_fixture();

        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1, 2)))
            .unwrap();

        assert_eq!(transaction.amount, Decimal::new(1, 2));
    }

    #[test]
    fn create_fails_on_unknown_category() {
        let mut fixture = get_fixture();
        let mut transaction = new_transaction(&fixture, Decimal::new(1050, 2));
        transaction.category_id = 999;

        let result = fixture.store.create(transaction);

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn create_accepts_another_users_category() {
        let mut fixture = get_fixture();
        let other_user = fixture
            .user_store
            .create(NewUser {
                username: "bob".to_string(),
                password_hash: "not-a-real-hash".to_string(),
                nickname: None,
            })
            .unwrap();
        let foreign_category = fixture
            .category_store
            .create(NewCategory {
                user_id: other_user.id,
                name: crate::models::CategoryName::new_unchecked("Secret"),
                r#type: TransactionType::Expense,
                icon: None,
                color: None,
            })
            .unwrap();

        let mut transaction = new_transaction(&fixture, Decimal::new(1050, 2));
        transaction.category_id = foreign_category.id;

        let result = fixture.store.create(transaction);

        assert!(result.is_ok());
    }

    #[test]
    fn get_fails_for_other_users_transaction() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();
        let other_user = fixture
            .user_store
            .create(NewUser {
                username: "bob".to_string(),
                password_hash: "not-a-real-hash".to_string(),
                nickname: None,
            })
            .unwrap();

        let result = fixture.store.get(other_user.id, transaction.id);

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn get_query_sorts_newest_first() {
        let mut fixture = get_fixture();
        let mut oldest = new_transaction(&fixture, Decimal::new(100, 2));
        oldest.date = Some(date(2024, 1, 1));
        let mut newest = new_transaction(&fixture, Decimal::new(200, 2));
        newest.date = Some(date(2024, 3, 1));
        let mut middle = new_transaction(&fixture, Decimal::new(300, 2));
        middle.date = Some(date(2024, 2, 1));

        let oldest = fixture.store.create(oldest).unwrap();
        let newest = fixture.store.create(newest).unwrap();
        let middle = fixture.store.create(middle).unwrap();

        let (transactions, total) = fixture
            .store
            .get_query(&query_for(fixture.user_id))
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(transactions, vec![newest, middle, oldest]);
    }

    #[test]
    fn get_query_breaks_same_date_ties_by_most_recent_creation() {
        let mut fixture = get_fixture();
        let mut first = new_transaction(&fixture, Decimal::new(100, 2));
        first.date = Some(date(2024, 1, 1));
        let mut second = new_transaction(&fixture, Decimal::new(200, 2));
        second.date = Some(date(2024, 1, 1));

        let first = fixture.store.create(first).unwrap();
        let second = fixture.store.create(second).unwrap();

        let (transactions, _) = fixture
            .store
            .get_query(&query_for(fixture.user_id))
            .unwrap();

        assert_eq!(transactions, vec![second, first]);
    }

    #[test]
    fn get_query_filters_by_type_and_category() {
        let mut fixture = get_fixture();
        let income_category = fixture
            .category_store
            .create(NewCategory {
                user_id: fixture.user_id,
                name: crate::models::CategoryName::new_unchecked("Wages"),
                r#type: TransactionType::Income,
                icon: None,
                color: None,
            })
            .unwrap();

        let expense = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(4000, 2)))
            .unwrap();
        let mut income = new_transaction(&fixture, Decimal::new(10000, 2));
        income.category_id = income_category.id;
        income.r#type = TransactionType::Income;
        let income = fixture.store.create(income).unwrap();

        let mut income_query = query_for(fixture.user_id);
        income_query.r#type = Some(TransactionType::Income);
        let (income_only, income_total) = fixture.store.get_query(&income_query).unwrap();

        let mut category_query = query_for(fixture.user_id);
        category_query.category_id = Some(fixture.category_id);
        let (category_only, _) = fixture.store.get_query(&category_query).unwrap();

        assert_eq!(income_total, 1);
        assert_eq!(income_only, vec![income]);
        assert_eq!(category_only, vec![expense]);
    }

    #[test]
    fn get_query_date_range_bounds_are_inclusive() {
        let mut fixture = get_fixture();

        for day in [1, 5, 10, 15] {
            let mut transaction = new_transaction(&fixture, Decimal::new(100, 2));
            transaction.date = Some(date(2024, 6, day));
            fixture.store.create(transaction).unwrap();
        }

        let mut query = query_for(fixture.user_id);
        query.date_from = Some(date(2024, 6, 5));
        query.date_to = Some(date(2024, 6, 10));

        let (transactions, total) = fixture.store.get_query(&query).unwrap();

        assert_eq!(total, 2);
        assert_eq!(
            transactions
                .iter()
                .map(|transaction| transaction.date)
                .collect::<Vec<_>>(),
            vec![date(2024, 6, 10), date(2024, 6, 5)]
        );
    }

    #[test]
    fn get_query_open_ended_ranges() {
        let mut fixture = get_fixture();

        for day in [1, 10, 20] {
            let mut transaction = new_transaction(&fixture, Decimal::new(100, 2));
            transaction.date = Some(date(2024, 6, day));
            fixture.store.create(transaction).unwrap();
        }

        let mut from_query = query_for(fixture.user_id);
        from_query.date_from = Some(date(2024, 6, 10));
        let (_, from_total) = fixture.store.get_query(&from_query).unwrap();

        let mut to_query = query_for(fixture.user_id);
        to_query.date_to = Some(date(2024, 6, 10));
        let (_, to_total) = fixture.store.get_query(&to_query).unwrap();

        assert_eq!(from_total, 2);
        assert_eq!(to_total, 2);
    }

    #[test]
    fn get_query_paginates_and_reports_the_total() {
        let mut fixture = get_fixture();

        for _ in 0..25 {
            fixture
                .store
                .create(new_transaction(&fixture, Decimal::new(100, 2)))
                .unwrap();
        }

        let mut first_page = query_for(fixture.user_id);
        first_page.limit = 20;
        let (first_items, first_total) = fixture.store.get_query(&first_page).unwrap();

        let mut second_page = first_page.clone();
        second_page.offset = 20;
        let (second_items, second_total) = fixture.store.get_query(&second_page).unwrap();

        assert_eq!(first_items.len(), 20);
        assert_eq!(first_total, 25);
        assert_eq!(second_items.len(), 5);
        assert_eq!(second_total, 25);
    }

    #[test]
    fn update_patches_only_provided_fields() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        let updated = fixture
            .store
            .update(
                fixture.user_id,
                transaction.id,
                TransactionPatch {
                    amount: Some(Decimal::new(2000, 2)),
                    description: Some("Weekly shop".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, Decimal::new(2000, 2));
        assert_eq!(updated.description, Some("Weekly shop".to_string()));
        assert_eq!(updated.date, transaction.date);
        assert_eq!(updated.category_id, transaction.category_id);
        assert_eq!(
            fixture.store.get(fixture.user_id, transaction.id),
            Ok(updated)
        );
    }

    #[test]
    fn update_rejects_non_positive_amount() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        let result = fixture.store.update(
            fixture.user_id,
            transaction.id,
            TransactionPatch {
                amount: Some(Decimal::ZERO),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::InvalidAmount));
        // The stored amount must be unchanged.
        assert_eq!(
            fixture
                .store
                .get(fixture.user_id, transaction.id)
                .unwrap()
                .amount,
            Decimal::new(1050, 2)
        );
    }

    #[test]
    fn update_fails_when_new_category_does_not_exist() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        let result = fixture.store.update(
            fixture.user_id,
            transaction.id,
            TransactionPatch {
                category_id: Some(999),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn update_fails_for_other_users_transaction() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();
        let other_user = fixture
            .user_store
            .create(NewUser {
                username: "bob".to_string(),
                password_hash: "not-a-real-hash".to_string(),
                nickname: None,
            })
            .unwrap();

        let result = fixture
            .store
            .update(other_user.id, transaction.id, TransactionPatch::default());

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn delete_removes_transaction() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        fixture.store.delete(fixture.user_id, transaction.id).unwrap();

        assert_eq!(
            fixture.store.get(fixture.user_id, transaction.id),
            Err(Error::TransactionNotFound)
        );
    }

    #[test]
    fn delete_fails_for_other_users_transaction() {
        let mut fixture = get_fixture();
        let transaction = fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();
        let other_user = fixture
            .user_store
            .create(NewUser {
                username: "bob".to_string(),
                password_hash: "not-a-real-hash".to_string(),
                nickname: None,
            })
            .unwrap();

        let result = fixture.store.delete(other_user.id, transaction.id);

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn statistics_sums_income_and_expense_exactly() {
        let mut fixture = get_fixture();
        let income_category = fixture
            .category_store
            .create(NewCategory {
                user_id: fixture.user_id,
                name: crate::models::CategoryName::new_unchecked("Wages"),
                r#type: TransactionType::Income,
                icon: None,
                color: None,
            })
            .unwrap();

        let mut income = new_transaction(&fixture, Decimal::new(10000, 2));
        income.category_id = income_category.id;
        income.r#type = TransactionType::Income;
        fixture.store.create(income).unwrap();
        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(4000, 2)))
            .unwrap();
        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        let statistics = fixture
            .store
            .statistics(fixture.user_id, None, None)
            .unwrap();

        assert_eq!(statistics.summary.total_income, Decimal::new(10000, 2));
        assert_eq!(statistics.summary.total_expense, Decimal::new(5050, 2));
        assert_eq!(statistics.summary.balance, Decimal::new(4950, 2));
    }

    #[test]
    fn statistics_returns_zero_totals_for_no_transactions() {
        let fixture = get_fixture();

        let statistics = fixture
            .store
            .statistics(fixture.user_id, None, None)
            .unwrap();

        assert_eq!(statistics.summary.total_income, Decimal::ZERO);
        assert_eq!(statistics.summary.total_expense, Decimal::ZERO);
        assert_eq!(statistics.summary.balance, Decimal::ZERO);
        assert_eq!(statistics.category_stats, vec![]);
    }

    #[test]
    fn statistics_does_not_drift_on_repeated_small_amounts() {
        let mut fixture = get_fixture();

        // 0.1 + 0.2 != 0.3 in binary floating point; integer cents must not
        // reproduce that artifact.
        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(10, 2)))
            .unwrap();
        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(20, 2)))
            .unwrap();

        let statistics = fixture
            .store
            .statistics(fixture.user_id, None, None)
            .unwrap();

        assert_eq!(statistics.summary.total_expense, Decimal::new(30, 2));
    }

    #[test]
    fn statistics_orders_categories_by_descending_total() {
        let mut fixture = get_fixture();
        let second_category = fixture
            .category_store
            .create(NewCategory {
                user_id: fixture.user_id,
                name: crate::models::CategoryName::new_unchecked("Rent"),
                r#type: TransactionType::Expense,
                icon: None,
                color: None,
            })
            .unwrap();

        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(5000, 2)))
            .unwrap();
        let mut rent = new_transaction(&fixture, Decimal::new(100000, 2));
        rent.category_id = second_category.id;
        fixture.store.create(rent).unwrap();

        let statistics = fixture
            .store
            .statistics(fixture.user_id, None, None)
            .unwrap();

        assert_eq!(statistics.category_stats.len(), 2);
        assert_eq!(statistics.category_stats[0].category_id, second_category.id);
        assert_eq!(statistics.category_stats[0].total, Decimal::new(100000, 2));
        assert_eq!(statistics.category_stats[0].count, 1);
        assert_eq!(statistics.category_stats[1].name, "Groceries");
    }

    #[test]
    fn statistics_respects_the_date_range() {
        let mut fixture = get_fixture();
        let mut in_range = new_transaction(&fixture, Decimal::new(1000, 2));
        in_range.date = Some(date(2024, 6, 15));
        let mut out_of_range = new_transaction(&fixture, Decimal::new(99900, 2));
        out_of_range.date = Some(date(2024, 7, 1));

        fixture.store.create(in_range).unwrap();
        fixture.store.create(out_of_range).unwrap();

        let statistics = fixture
            .store
            .statistics(
                fixture.user_id,
                Some(date(2024, 6, 1)),
                Some(date(2024, 6, 30)),
            )
            .unwrap();

        assert_eq!(statistics.summary.total_expense, Decimal::new(1000, 2));
    }

    #[test]
    fn statistics_is_idempotent() {
        let mut fixture = get_fixture();
        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();

        let first = fixture
            .store
            .statistics(fixture.user_id, None, None)
            .unwrap();
        let second = fixture
            .store
            .statistics(fixture.user_id, None, None)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn statistics_excludes_other_users_transactions() {
        let mut fixture = get_fixture();
        fixture
            .store
            .create(new_transaction(&fixture, Decimal::new(1050, 2)))
            .unwrap();
        let other_user = fixture
            .user_store
            .create(NewUser {
                username: "bob".to_string(),
                password_hash: "not-a-real-hash".to_string(),
                nickname: None,
            })
            .unwrap();

        let statistics = fixture
            .store
            .statistics(other_user.id, None, None)
            .unwrap();

        assert_eq!(statistics.summary.total_expense, Decimal::ZERO);
        assert_eq!(statistics.category_stats, vec![]);
    }
}

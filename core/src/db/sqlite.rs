// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{DbError, DbResult};
use futures::TryStreamExt;
use sqlx::Transaction;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};

/// Prefix of the messages SQLite uses to report unique constraint violations.
const UNIQUE_FAILED_PREFIX: &str = "UNIQUE constraint failed: ";

/// Synthesizes the name PostgreSQL would assign to an inline unique constraint from the column
/// list SQLite reports, which looks like `table.col1, table.col2`.
fn constraint_name(columns: &str) -> String {
    let mut table = None;
    let mut parts = vec![];
    for column in columns.split(", ") {
        match column.split_once('.') {
            Some((t, c)) => {
                table.get_or_insert(t);
                parts.push(c);
            }
            None => parts.push(column),
        }
    }
    match table {
        Some(table) => format!("{}_{}_key", table, parts.join("_")),
        None => format!("{}_key", parts.join("_")),
    }
}

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        sqlx::Error::Database(e) => match e.kind() {
            ErrorKind::ForeignKeyViolation => DbError::NotFound,
            ErrorKind::UniqueViolation => {
                let detail = e.message().to_owned();
                let constraint = match detail.strip_prefix(UNIQUE_FAILED_PREFIX) {
                    Some(columns) => constraint_name(columns),
                    None => String::new(),
                };
                DbError::UniqueViolation { constraint, detail }
            }
            _ => DbError::BackendError(e.to_string()),
        },
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        e => DbError::BackendError(e.to_string()),
    }
}

/// A database instance backed by an SQLite database.
///
/// Connections are serialized through a single pooled connection, which keeps in-memory
/// databases alive and shared for the lifetime of the pool.
#[derive(Clone)]
pub struct SqliteDb {
    /// Shared SQLite connection pool.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Opens the database identified by `conn_str`, such as `:memory:`.
    pub async fn connect(conn_str: &str) -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(conn_str)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    /// Begins a transaction.
    ///
    /// It is the responsibility of the caller to call `commit` on the returned transaction.
    /// Otherwise the transaction is rolled back on drop.
    pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(map_sqlx_error)
    }

    /// Returns the connection pool for direct, non-transactional queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes all connections to the database.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
pub async fn run_schema(db: &SqliteDb, schema: &str) -> DbResult<()> {
    let mut tx = db.begin().await?;
    {
        let mut results = sqlx::query(schema).execute_many(&mut *tx).await;
        while results.try_next().await.map_err(map_sqlx_error)?.is_some() {
            // Nothing to do.
        }
    }
    tx.commit().await.map_err(map_sqlx_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Schema with a couple of unique constraints to trigger violations against.
    const SCHEMA: &str = "
        CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            first TEXT NOT NULL,
            last TEXT NOT NULL,
            UNIQUE (first, last)
        );
    ";

    async fn setup() -> SqliteDb {
        let db = SqliteDb::connect(":memory:").await.unwrap();
        run_schema(&db, SCHEMA).await.unwrap();
        db
    }

    async fn insert(db: &SqliteDb, id: i64, email: &str, first: &str, last: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO people (id, email, first, last) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(email)
            .bind(first)
            .bind(last)
            .execute(db.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    #[test]
    fn test_constraint_name() {
        assert_eq!("drivers_license_number_key", constraint_name("drivers.license_number"));
        assert_eq!("people_first_last_key", constraint_name("people.first, people.last"));
        assert_eq!("weird_key", constraint_name("weird"));
    }

    #[tokio::test]
    async fn test_map_unique_violation_single_column() {
        let db = setup().await;
        insert(&db, 1, "a@example.com", "A", "B").await.unwrap();

        match insert(&db, 2, "a@example.com", "C", "D").await.unwrap_err() {
            DbError::UniqueViolation { constraint, detail } => {
                assert_eq!("people_email_key", constraint);
                assert!(detail.contains("people.email"), "Unexpected detail {}", detail);
            }
            e => panic!("Unexpected error {:?}", e),
        }
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_unique_violation_multiple_columns() {
        let db = setup().await;
        insert(&db, 1, "a@example.com", "A", "B").await.unwrap();

        match insert(&db, 2, "b@example.com", "A", "B").await.unwrap_err() {
            DbError::UniqueViolation { constraint, .. } => {
                assert_eq!("people_first_last_key", constraint);
            }
            e => panic!("Unexpected error {:?}", e),
        }
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_row_not_found() {
        let db = setup().await;
        let err = sqlx::query("SELECT id FROM people WHERE id = 1")
            .fetch_one(db.pool())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
            .unwrap_err();
        assert_eq!(DbError::NotFound, err);
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_backend_error() {
        let db = setup().await;
        let err = sqlx::query("SELECT * FROM missing_table")
            .execute(db.pool())
            .await
            .map_err(map_sqlx_error)
            .unwrap_err();
        match err {
            DbError::BackendError(msg) => assert!(msg.contains("missing_table"), "{}", msg),
            e => panic!("Unexpected error {:?}", e),
        }
        db.close().await;
    }

    #[tokio::test]
    async fn test_tx_rollback_on_drop() {
        let db = setup().await;
        {
            let mut tx = db.begin().await.unwrap();
            sqlx::query("INSERT INTO people (id, email, first, last) VALUES (1, 'x', 'y', 'z')")
                .execute(&mut *tx)
                .await
                .unwrap();
        }
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM people").fetch_one(db.pool()).await.unwrap();
        assert_eq!(0, count);
        db.close().await;
    }
}

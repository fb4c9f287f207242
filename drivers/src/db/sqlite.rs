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

//! Implementation of the database abstraction using SQLite.

use crate::db::DriversStore;
use crate::model::Driver;
use async_trait::async_trait;
use drivers_core::db::sqlite::{SqliteDb, map_sqlx_error, run_schema};
use drivers_core::db::{DbError, DbResult, id_from_i64, id_to_i64};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Schema to use to initialize the test database.
const SCHEMA: &str = include_str!("sqlite.sql");

/// Statement to insert or overwrite a single driver.
const UPSERT_QUERY: &str = "
    INSERT INTO drivers (id, name, license_number)
    VALUES (?, ?, ?)
    ON CONFLICT (id) DO UPDATE
        SET name = excluded.name, license_number = excluded.license_number
";

/// Converts a raw `row` into a driver.
fn driver_from_row(row: SqliteRow) -> DbResult<Driver> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(map_sqlx_error)?;
    let license_number: String = row.try_get("license_number").map_err(map_sqlx_error)?;
    Ok(Driver::new(id_from_i64(id)?, name, license_number))
}

/// A drivers store backed by an SQLite database.
#[derive(Clone)]
pub struct SqliteDriversStore {
    /// Connection to the database.
    db: SqliteDb,
}

impl SqliteDriversStore {
    /// Opens the database at `conn_str` and creates the tables needed by the store.
    pub async fn connect(conn_str: &str) -> DbResult<Self> {
        let db = SqliteDb::connect(conn_str).await?;
        run_schema(&db, SCHEMA).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl DriversStore for SqliteDriversStore {
    async fn upsert_batch(&self, drivers: &[Driver]) -> DbResult<()> {
        let mut tx = self.db.begin().await?;
        for driver in drivers {
            sqlx::query(UPSERT_QUERY)
                .bind(id_to_i64(*driver.id())?)
                .bind(driver.name().as_str())
                .bind(driver.license_number().as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn get_by_id(&self, id: u64) -> DbResult<Driver> {
        let Ok(id) = i64::try_from(id) else {
            return Err(DbError::NotFound);
        };

        let query_str = "SELECT id, name, license_number FROM drivers WHERE id = ?";
        let row = sqlx::query(query_str)
            .bind(id)
            .fetch_one(self.db.pool())
            .await
            .map_err(map_sqlx_error)?;
        driver_from_row(row)
    }
}

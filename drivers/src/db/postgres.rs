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

//! Implementation of the database abstraction using PostgreSQL.

use crate::db::DriversStore;
use crate::model::Driver;
use async_trait::async_trait;
use drivers_core::db::postgres::{PostgresDb, map_sqlx_error, run_schema};
use drivers_core::db::{DbError, DbResult, id_from_i64, id_to_i64};
use sqlx::Row;
use sqlx::postgres::PgRow;

/// Schema to use to initialize the production database.
const SCHEMA: &str = include_str!("postgres.sql");

/// Statement to insert or overwrite a single driver.
const UPSERT_QUERY: &str = "
    INSERT INTO drivers (id, name, license_number)
    VALUES ($1, $2, $3)
    ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name, license_number = EXCLUDED.license_number
";

/// Converts a raw `row` into a driver.
fn driver_from_row(row: PgRow) -> DbResult<Driver> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(map_sqlx_error)?;
    let license_number: String = row.try_get("license_number").map_err(map_sqlx_error)?;
    Ok(Driver::new(id_from_i64(id)?, name, license_number))
}

/// A drivers store backed by a PostgreSQL database.
#[derive(Clone)]
pub struct PostgresDriversStore {
    /// Connection pool to the database.
    db: PostgresDb,
}

impl PostgresDriversStore {
    /// Creates a new store backed by `db`.
    pub fn new(db: PostgresDb) -> Self {
        Self { db }
    }

    /// Creates the tables needed by the store if they do not exist yet.
    pub async fn init_schema(&self) -> DbResult<()> {
        run_schema(&self.db, SCHEMA).await
    }
}

#[async_trait]
impl DriversStore for PostgresDriversStore {
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

        let query_str = "SELECT id, name, license_number FROM drivers WHERE id = $1";
        let row = sqlx::query(query_str)
            .bind(id)
            .fetch_one(self.db.pool())
            .await
            .map_err(map_sqlx_error)?;
        driver_from_row(row)
    }
}

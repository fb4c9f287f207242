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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::Driver;
use async_trait::async_trait;
use drivers_core::db::DbResult;

pub mod postgres;
#[cfg(any(feature = "sqlite", test))]
pub mod sqlite;

/// Name of the uniqueness constraint on license numbers.
pub(crate) const LICENSE_NUMBER_CONSTRAINT: &str = "drivers_license_number_key";

/// Persistence operations on drivers.
///
/// Implementations are shared by all concurrent requests and must not hold any state across
/// calls other than their connection pool.
#[async_trait]
pub trait DriversStore: Send + Sync {
    /// Inserts the `drivers` whose ids are new and overwrites the name and license number of the
    /// ones that already exist.
    ///
    /// The batch is applied atomically: either every driver is stored or none is.  A license number
    /// that collides with the one of a different driver fails with `DbError::UniqueViolation` on
    /// the `drivers_license_number_key` constraint.
    async fn upsert_batch(&self, drivers: &[Driver]) -> DbResult<()>;

    /// Gets the driver with the given `id`, failing with `DbError::NotFound` if there is none.
    async fn get_by_id(&self, id: u64) -> DbResult<Driver>;
}

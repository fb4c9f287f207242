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

//! Bulk import of drivers.

use crate::db::LICENSE_NUMBER_CONSTRAINT;
use crate::model::{Driver, validate_batch_size, validate_driver};
use crate::service::DriversService;
use drivers_core::db::DbError;
use drivers_core::service::{ServiceError, ServiceResult};

impl DriversService {
    /// Inserts or overwrites all `drivers` at once.
    ///
    /// The whole batch is rejected if its size is out of bounds or if any driver is invalid, in
    /// which case nothing is stored.  A license number that belongs to a different driver is
    /// reported as a conflict.
    pub async fn import(self, drivers: Vec<Driver>) -> ServiceResult<()> {
        validate_batch_size(drivers.len()).map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        for driver in &drivers {
            validate_driver(driver).map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        }

        match self.store.upsert_batch(&drivers).await {
            Ok(()) => Ok(()),
            Err(DbError::UniqueViolation { constraint, detail })
                if constraint == LICENSE_NUMBER_CONSTRAINT =>
            {
                Err(ServiceError::Conflict(detail))
            }
            Err(e) => Err(e.into()),
        }
    }
}

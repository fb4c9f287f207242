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

//! Lookup of individual drivers.

use crate::model::{Driver, ValidationError};
use crate::service::DriversService;
use drivers_core::db::DbError;
use drivers_core::service::{ServiceError, ServiceResult};

impl DriversService {
    /// Gets the driver identified by `id`.
    pub async fn get_by_id(self, id: u64) -> ServiceResult<Driver> {
        if id == 0 {
            return Err(ServiceError::BadRequest(ValidationError::ZeroId.to_string()));
        }

        match self.store.get_by_id(id).await {
            Ok(driver) => Ok(driver),
            Err(DbError::NotFound) => {
                Err(ServiceError::NotFound(format!("driver with id={} is not found", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

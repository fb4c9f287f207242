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

//! API to get a single driver.

use crate::model::Driver;
use crate::service::DriversService;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use drivers_core::rest::{JsonResponse, RequestId, RestError, log_recover};

/// API handler.
pub(crate) async fn handler(
    State(service): State<DriversService>,
    request_id: RequestId,
    path: Result<Path<String>, PathRejection>,
) -> Result<JsonResponse<Driver>, RestError> {
    log_recover(&request_id, async move {
        let Path(raw_id) = path.map_err(|e| RestError::InvalidRequest(e.body_text()))?;
        let id = raw_id.parse::<u64>().map_err(|e| {
            RestError::InvalidRequest(format!(
                "invalid id; {} is not an unsigned integer: {}",
                raw_id, e
            ))
        })?;
        let driver = service.get_by_id(id).await?;
        Ok::<_, RestError>(JsonResponse(driver))
    })
    .await
}

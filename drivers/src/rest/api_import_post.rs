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

//! API to import a batch of drivers.

use crate::model::Driver;
use crate::service::DriversService;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use drivers_core::rest::{JsonResponse, RequestId, RestError, log_recover};
use serde::Serialize;

/// Message returned on success.
#[derive(Serialize)]
pub(crate) struct EmptyResponse {}

/// API handler.
pub(crate) async fn handler(
    State(service): State<DriversService>,
    request_id: RequestId,
    body: Result<Bytes, BytesRejection>,
) -> Result<JsonResponse<EmptyResponse>, RestError> {
    log_recover(&request_id, async move {
        let body = body.map_err(|e| RestError::InvalidRequest(e.body_text()))?;
        let drivers: Vec<Driver> = serde_json::from_slice(&body)?;
        service.import(drivers).await?;
        Ok::<_, RestError>(JsonResponse(EmptyResponse {}))
    })
    .await
}

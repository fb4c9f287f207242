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

//! Entry point to the REST server.

use crate::service::DriversService;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use drivers_core::rest::{correlate, method_not_allowed, route_not_found};

mod api_driver_get;
mod api_import_post;
#[cfg(test)]
mod testutils;

/// Maximum size of an import request.  Large enough to carry the biggest valid batch.
const MAX_IMPORT_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Creates the router for the application.
pub(crate) fn app(service: DriversService) -> Router {
    use axum::routing::{get, post};
    Router::new()
        .route(
            "/api/import",
            post(api_import_post::handler)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(MAX_IMPORT_BODY_SIZE)),
        )
        .route("/api/driver/:id", get(api_driver_get::handler).fallback(method_not_allowed))
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn(correlate))
        .with_state(service)
}

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

//! REST service to bulk import driver records and look them up by id.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use drivers_core::env::get_optional_var;
use log::info;
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub mod db;
use db::DriversStore;
pub mod model;
mod rest;
use rest::app;
pub mod service;
use service::DriversService;

/// Port to listen on when none is configured.
const DEFAULT_PORT: u16 = 8080;

/// Gets the address to listen on from the `<prefix>_ADDR` and `<prefix>_PORT` environment
/// variables, falling back to all interfaces on `DEFAULT_PORT`.
pub fn bind_addr_from_env(prefix: &str) -> Result<SocketAddr, String> {
    let addr: IpAddr =
        get_optional_var(prefix, "ADDR")?.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let port: u16 = get_optional_var(prefix, "PORT")?.unwrap_or(DEFAULT_PORT);
    Ok(SocketAddr::new(addr, port))
}

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    store: Arc<dyn DriversStore>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let service = DriversService::new(store);
    let app = app(service);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

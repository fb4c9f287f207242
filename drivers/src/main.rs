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

//! Entry point to the drivers service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use drivers::db::postgres::PostgresDriversStore;
use drivers::{bind_addr_from_env, serve};
use drivers_core::db::postgres::{PostgresDb, PostgresOptions};
use log::{error, info};
use std::error::Error;
use std::process;
use std::sync::Arc;

/// Gathers the configuration, prepares the database and serves requests until failure.
async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = bind_addr_from_env("DRIVERS")?;
    let db_opts = PostgresOptions::from_env("DRIVERS_PGSQL")?;

    let db = PostgresDb::connect(db_opts)?;
    let store = PostgresDriversStore::new(db.clone());
    store.init_schema().await?;
    info!("Database schema initialized");

    let result = serve(addr, Arc::new(store)).await;
    db.close().await;
    result
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}

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

//! Test utilities for the REST API.

use crate::db::DriversStore;
use crate::db::sqlite::SqliteDriversStore;
use crate::model::Driver;
use crate::rest::app;
use crate::service::DriversService;
use async_trait::async_trait;
use axum::Router;
use drivers_core::db::{DbError, DbResult};
use std::sync::Arc;

/// A store whose operations crash, to exercise fault recovery.
struct PanickingStore;

#[async_trait]
impl DriversStore for PanickingStore {
    async fn upsert_batch(&self, _drivers: &[Driver]) -> DbResult<()> {
        panic!("store exploded");
    }

    async fn get_by_id(&self, _id: u64) -> DbResult<Driver> {
        panic!("store exploded");
    }
}

pub(crate) struct TestContext {
    store: Arc<dyn DriversStore>,
    app: Router,
}

impl TestContext {
    fn with_store(store: Arc<dyn DriversStore>) -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let app = app(DriversService::new(store.clone()));
        Self { store, app }
    }

    pub(crate) async fn setup() -> Self {
        let store = SqliteDriversStore::connect(":memory:").await.unwrap();
        Self::with_store(Arc::new(store))
    }

    pub(crate) async fn setup_panicking() -> Self {
        Self::with_store(Arc::new(PanickingStore))
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) async fn import(&self, drivers: &[Driver]) {
        self.store.upsert_batch(drivers).await.unwrap();
    }

    pub(crate) async fn get(&self, id: u64) -> Driver {
        self.store.get_by_id(id).await.unwrap()
    }

    pub(crate) async fn has(&self, id: u64) -> bool {
        match self.store.get_by_id(id).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("Unexpected error {:?}", e),
        }
    }
}

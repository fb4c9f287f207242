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

//! Test utilities for the business layer.

use crate::db::DriversStore;
use crate::db::sqlite::SqliteDriversStore;
use crate::model::Driver;
use crate::service::DriversService;
use async_trait::async_trait;
use drivers_core::db::{DbError, DbResult};
use std::sync::{Arc, Mutex};

/// State of the business layer backed by a real, in-memory store.
pub(crate) struct TestContext {
    store: SqliteDriversStore,
    service: DriversService,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let store = SqliteDriversStore::connect(":memory:").await.unwrap();
        let service = DriversService::new(Arc::new(store.clone()));
        Self { store, service }
    }

    pub(crate) fn service(&self) -> DriversService {
        self.service.clone()
    }

    /// Gets the driver `id` straight from the store, which must exist.
    pub(crate) async fn get(&self, id: u64) -> Driver {
        self.store.get_by_id(id).await.unwrap()
    }

    /// Checks whether the driver `id` exists in the store.
    pub(crate) async fn has(&self, id: u64) -> bool {
        match self.store.get_by_id(id).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("Unexpected error {:?}", e),
        }
    }
}

#[derive(Default)]
struct MockState {
    upsert_error: Option<DbError>,
    upsert_calls: usize,
    get_error: Option<DbError>,
    get_calls: usize,
}

/// A store that records calls and fails on demand, for tests that need to inject store errors.
#[derive(Clone, Default)]
pub(crate) struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl MockStore {
    /// Creates a service backed by a new mock store and returns both.
    pub(crate) fn service() -> (DriversService, MockStore) {
        let store = MockStore::default();
        (DriversService::new(Arc::new(store.clone())), store)
    }

    /// Makes all future calls to `upsert_batch` fail with `e`.
    pub(crate) fn fail_upsert(&self, e: DbError) {
        self.state.lock().unwrap().upsert_error = Some(e);
    }

    /// Makes all future calls to `get_by_id` fail with `e`.
    pub(crate) fn fail_get(&self, e: DbError) {
        self.state.lock().unwrap().get_error = Some(e);
    }

    pub(crate) fn upsert_calls(&self) -> usize {
        self.state.lock().unwrap().upsert_calls
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.state.lock().unwrap().get_calls
    }
}

#[async_trait]
impl DriversStore for MockStore {
    async fn upsert_batch(&self, _drivers: &[Driver]) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.upsert_calls += 1;
        match &state.upsert_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn get_by_id(&self, id: u64) -> DbResult<Driver> {
        let mut state = self.state.lock().unwrap();
        state.get_calls += 1;
        match &state.get_error {
            Some(e) => Err(e.clone()),
            None => Ok(Driver::new(id, "Mock".to_owned(), "00-000-00".to_owned())),
        }
    }
}

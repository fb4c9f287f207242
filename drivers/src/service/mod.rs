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

//! Business logic for the service.

use crate::db::DriversStore;
use std::sync::Arc;

mod get;
mod import;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic.
///
/// The public operations exposed by the service are all "one shot": they validate their input
/// and issue at most one call to the store, so it's incorrect for the caller to chain two
/// separate calls.  For this reason, these operations consume the service.
#[derive(Clone)]
pub struct DriversService {
    /// The store that the service uses for persistence.
    store: Arc<dyn DriversStore>,
}

impl DriversService {
    /// Creates a new service backed by the given injected components.
    pub fn new(store: Arc<dyn DriversStore>) -> Self {
        Self { store }
    }
}

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

//! Generic business logic for any service.
//!
//! Every service should implement its own service type.  In most cases, this type will hold a
//! shared handle to a store trait object and will be cheap to clone, as a copy is handed to every
//! request.  Operations consume `self` because each one is a self-contained unit of work that
//! validates its input, issues at most one call to the store and classifies the outcome.
//!
//! Errors raised by this layer always carry their status classification: there is no such thing
//! as an unclassified `ServiceError`.  Failures coming from the store are classified once, at the
//! boundary, and never need to be inspected again by upper layers.

use crate::db::DbError;

/// Business logic errors.  Every variant corresponds to one status classification and carries
/// the message that will be shown to the caller.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Indicates malformed input or a violated validation rule.
    #[error("{0}")]
    BadRequest(String),

    /// Indicates that a write conflicts with data owned by another entity.
    #[error("{0}")]
    Conflict(String),

    /// Catch-all error type for unexpected backend failures.
    #[error("{0}")]
    InternalServerError(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => ServiceError::NotFound(e.to_string()),
            DbError::BackendError(_)
            | DbError::DataIntegrityError(_)
            | DbError::UniqueViolation { .. }
            | DbError::Unavailable => ServiceError::InternalServerError(e.to_string()),
        }
    }
}

/// Result type for this module.
pub type ServiceResult<T> = Result<T, ServiceError>;

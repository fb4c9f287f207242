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

//! Generic abstraction to access different database systems.
//!
//! The facilities in this module provide an abstraction over different database systems such as
//! PostgreSQL and SQLite.  The PostgreSQL backend is for production use and the SQLite backend is
//! primarily intended to support unit tests.
//!
//! Both backends report failures using the same `DbError` type so that the business logic layer
//! can classify them without knowing which backend produced them.

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(any(feature = "sqlite", test))]
pub mod sqlite;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Catch-all error type for unexpected database errors.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that a write violated a uniqueness constraint.
    ///
    /// `constraint` follows PostgreSQL's naming (such as `<table>_<column>_key` for constraints
    /// declared inline) regardless of the backend, and `detail` is the backend's description of
    /// the offending values.
    #[error("{detail}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: String,

        /// Human-readable details about the violation as reported by the backend.
        detail: String,
    },

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// Converts an id received from the outside world into the signed representation used by the
/// database backends, which lack unsigned 64-bit integers.
pub fn id_to_i64(id: u64) -> DbResult<i64> {
    i64::try_from(id).map_err(|_| DbError::BackendError(format!("id {} is out of range", id)))
}

/// Converts an id read from the database into its unsigned representation.
pub fn id_from_i64(id: i64) -> DbResult<u64> {
    u64::try_from(id).map_err(|_| DbError::DataIntegrityError(format!("Invalid stored id {}", id)))
}

/// Macros to help instantiate tests for multiple database systems.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    pub use paste::paste;

    /// Instantiates the `module::name` test for the database configured by `setup`.
    ///
    /// The `extra` metadata parameter can be used to tag the generated tests.
    #[macro_export]
    macro_rules! generate_one_test [
        ( $name:ident, $setup:expr, $module:path $(, #[$extra:meta] )? ) => {
            #[tokio::test]
            $(#[$extra])?
            async fn $name() {
                $crate::db::testutils::paste! {
                    $module :: [< $name >]($setup).await;
                }
            }
        }
    ];

    pub use generate_one_test;

    /// Instantiates a collection of tests for a specific database system.
    ///
    /// The database implementation to run the tests against is determined by the `setup`
    /// expression, which needs to return a store already initialized with the desired schema.
    ///
    /// The `extra` metadata parameter can be used to tag the generated tests.
    #[macro_export]
    macro_rules! generate_tests [
        ( #[$extra:meta], $setup:expr, $module:path $(, $name:ident)+ ) => {
            $(
                $crate::db::testutils::generate_one_test!($name, $setup, $module, #[$extra]);
            )+
        };

        ( $setup:expr, $module:path $(, $name:ident)+ ) => {
            $(
                $crate::db::testutils::generate_one_test!($name, $setup, $module);
            )+
        };
    ];

    pub use generate_tests;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_to_i64() {
        assert_eq!(1, id_to_i64(1).unwrap());
        assert_eq!(i64::MAX, id_to_i64(i64::MAX as u64).unwrap());
        assert_eq!(
            DbError::BackendError("id 9223372036854775808 is out of range".to_owned()),
            id_to_i64(i64::MAX as u64 + 1).unwrap_err()
        );
    }

    #[test]
    fn test_id_from_i64() {
        assert_eq!(5, id_from_i64(5).unwrap());
        assert_eq!(
            DbError::DataIntegrityError("Invalid stored id -1".to_owned()),
            id_from_i64(-1).unwrap_err()
        );
    }

    #[test]
    fn test_unique_violation_displays_detail() {
        let e = DbError::UniqueViolation {
            constraint: "t_c_key".to_owned(),
            detail: "Key (c)=(x) already exists.".to_owned(),
        };
        assert_eq!("Key (c)=(x) already exists.", e.to_string());
    }
}

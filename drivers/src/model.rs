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

//! High-level data types and the rules that validate them.

use derive_getters::Getters;
use derive_more::Constructor;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Minimum number of drivers accepted in one import.
pub(crate) const MIN_BATCH_SIZE: usize = 1;

/// Maximum number of drivers accepted in one import.
pub(crate) const MAX_BATCH_SIZE: usize = 1000;

/// Minimum length of a driver's name, in Unicode code points.
const MIN_NAME_LENGTH: usize = 4;

/// Maximum length of a driver's name, in Unicode code points.
const MAX_NAME_LENGTH: usize = 1000;

/// Format that license numbers must follow.
const LICENSE_NUMBER_PATTERN: &str = "^[0-9]{2}-[0-9]{3}-[0-9]{2}$";

/// Compiled version of `LICENSE_NUMBER_PATTERN`.
static LICENSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LICENSE_NUMBER_PATTERN).expect("Hardcoded pattern must be valid"));

/// A driver record.
///
/// Ids are assigned by the caller, not by the store, and license numbers are unique across all
/// drivers.
#[derive(Clone, Constructor, Debug, Deserialize, Eq, Getters, PartialEq, Serialize)]
pub struct Driver {
    /// Identity of the driver.  Must be positive.
    id: u64,

    /// Human-readable name of the driver.
    name: String,

    /// Driver's license number in the `NN-NNN-NN` format.
    license_number: String,
}

/// Reasons why a driver or a batch of drivers is rejected.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The driver's id is zero.
    #[error("invalid id; should be greater than 0")]
    ZeroId,

    /// A string field has too few or too many Unicode code points.
    #[error("invalid length; field {field} should be from {min} to {max} UTF-8 symbols, but not {actual}")]
    InvalidLength {
        /// Name of the offending field.
        field: &'static str,

        /// Minimum accepted length.
        min: usize,

        /// Maximum accepted length.
        max: usize,

        /// Length of the rejected value.
        actual: usize,
    },

    /// A string field does not match its expected format.
    #[error("invalid format; {field} field should match {pattern}, but was {value}")]
    InvalidFormat {
        /// Name of the offending field.
        field: &'static str,

        /// Regular expression that the field must match.
        pattern: &'static str,

        /// The rejected value.
        value: String,
    },

    /// A collection has too few or too many elements.
    #[error(
        "invalid collection length; collection {collection} should be from {min} to {max} elements, but not {actual}"
    )]
    InvalidCollectionLength {
        /// Name of the offending collection.
        collection: &'static str,

        /// Minimum accepted number of elements.
        min: usize,

        /// Maximum accepted number of elements.
        max: usize,

        /// Number of elements in the rejected collection.
        actual: usize,
    },
}

/// Result type for this module.
pub type ValidationResult = Result<(), ValidationError>;

/// Checks that a batch of `len` drivers is within the accepted size bounds.
pub fn validate_batch_size(len: usize) -> ValidationResult {
    if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&len) {
        return Err(ValidationError::InvalidCollectionLength {
            collection: "drivers",
            min: MIN_BATCH_SIZE,
            max: MAX_BATCH_SIZE,
            actual: len,
        });
    }
    Ok(())
}

/// Checks the field constraints of a single `driver`.  The first violated rule wins.
pub fn validate_driver(driver: &Driver) -> ValidationResult {
    if driver.id == 0 {
        return Err(ValidationError::ZeroId);
    }

    let name_len = driver.name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name_len) {
        return Err(ValidationError::InvalidLength {
            field: "name",
            min: MIN_NAME_LENGTH,
            max: MAX_NAME_LENGTH,
            actual: name_len,
        });
    }

    if !LICENSE_NUMBER_RE.is_match(&driver.license_number) {
        return Err(ValidationError::InvalidFormat {
            field: "license_number",
            pattern: LICENSE_NUMBER_PATTERN,
            value: driver.license_number.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(id: u64, name: &str, license_number: &str) -> Driver {
        Driver::new(id, name.to_owned(), license_number.to_owned())
    }

    #[test]
    fn test_validate_batch_size_ok() {
        validate_batch_size(1).unwrap();
        validate_batch_size(500).unwrap();
        validate_batch_size(1000).unwrap();
    }

    #[test]
    fn test_validate_batch_size_out_of_bounds() {
        for len in [0, 1001, 5000] {
            assert_eq!(
                ValidationError::InvalidCollectionLength {
                    collection: "drivers",
                    min: 1,
                    max: 1000,
                    actual: len
                },
                validate_batch_size(len).unwrap_err()
            );
        }
        assert_eq!(
            "invalid collection length; collection drivers should be from 1 to 1000 elements, but not 0",
            validate_batch_size(0).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_validate_driver_ok() {
        validate_driver(&driver(1, "John", "11-222-33")).unwrap();
        validate_driver(&driver(u64::MAX, &"a".repeat(1000), "00-000-00")).unwrap();
    }

    #[test]
    fn test_validate_driver_zero_id() {
        let err = validate_driver(&driver(0, "jo", "bad")).unwrap_err();
        assert_eq!(ValidationError::ZeroId, err);
        assert_eq!("invalid id; should be greater than 0", err.to_string());
    }

    #[test]
    fn test_validate_driver_name_too_short() {
        let err = validate_driver(&driver(1, "jo", "bad")).unwrap_err();
        assert_eq!(
            "invalid length; field name should be from 4 to 1000 UTF-8 symbols, but not 2",
            err.to_string()
        );
    }

    #[test]
    fn test_validate_driver_name_too_long() {
        let err = validate_driver(&driver(1, &"a".repeat(1001), "11-222-33")).unwrap_err();
        assert_eq!(
            ValidationError::InvalidLength { field: "name", min: 4, max: 1000, actual: 1001 },
            err
        );
    }

    #[test]
    fn test_validate_driver_name_counts_code_points() {
        // Four code points but twelve bytes.
        validate_driver(&driver(1, "Ёжик", "11-222-33")).unwrap();
        validate_driver(&driver(1, "日本語名", "11-222-33")).unwrap();

        let err = validate_driver(&driver(1, "Ёжи", "11-222-33")).unwrap_err();
        assert_eq!(
            ValidationError::InvalidLength { field: "name", min: 4, max: 1000, actual: 3 },
            err
        );

        validate_driver(&driver(1, &"ж".repeat(1000), "11-222-33")).unwrap();
    }

    #[test]
    fn test_validate_driver_bad_license_number() {
        for value in ["11-222-333", "1-222-33", "aa-bbb-cc", "11222-33", " 11-222-33", ""] {
            let err = validate_driver(&driver(1, "John", value)).unwrap_err();
            assert_eq!(
                ValidationError::InvalidFormat {
                    field: "license_number",
                    pattern: "^[0-9]{2}-[0-9]{3}-[0-9]{2}$",
                    value: value.to_owned(),
                },
                err
            );
        }
        assert_eq!(
            "invalid format; license_number field should match ^[0-9]{2}-[0-9]{3}-[0-9]{2}$, but was 11-222-333",
            validate_driver(&driver(1, "John", "11-222-333")).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_driver_json_shape() {
        let d = driver(1, "John", "11-222-33");
        assert_eq!(
            r#"{"id":1,"name":"John","license_number":"11-222-33"}"#,
            serde_json::to_string(&d).unwrap()
        );
        assert_eq!(d, serde_json::from_str(r#"{"license_number":"11-222-33","name":"John","id":1}"#).unwrap());
    }
}

// crates/snowflake-ddl-core/src/decode/mod.rs
// ============================================================================
// Module: Row Decoding Helpers
// Description: Field-level conversions from raw result columns to domain values.
// Purpose: Log and skip malformed optional fields, fail on identity fields.
// Dependencies: serde, serde_json, thiserror, time, tracing
// ============================================================================

//! ## Overview
//! Row types deserialize raw columns as optional scalars; domain conversion
//! then lifts them through these helpers. [`lenient`] logs a warning and
//! leaves the field unset when parsing fails. [`required`] turns an absent
//! or malformed identity field into a [`DecodeError`] that aborts the row.

use std::any::type_name;
use std::fmt::Display;

use serde::de::DeserializeOwned;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::interfaces::Row;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Row-level decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A column required for the object's identity is absent.
    #[error("{row}: missing required column {field}")]
    MissingField {
        /// Row type name.
        row: &'static str,
        /// Column name.
        field: &'static str,
    },
    /// A column required for the object's identity failed to parse.
    #[error("{row}: invalid column {field}: {reason}")]
    InvalidField {
        /// Row type name.
        row: &'static str,
        /// Column name.
        field: &'static str,
        /// Parser diagnostic.
        reason: String,
    },
    /// The row does not match the expected column layout.
    #[error("{row}: {reason}")]
    Shape {
        /// Row type name.
        row: &'static str,
        /// Deserializer diagnostic.
        reason: String,
    },
    /// A query expected to return a row returned none.
    #[error("{row}: no rows returned")]
    Empty {
        /// Row type name.
        row: &'static str,
    },
}

// ============================================================================
// SECTION: Row Helpers
// ============================================================================

/// Deserializes a raw row into a typed row structure.
///
/// # Errors
///
/// Returns [`DecodeError::Shape`] when a column has an unexpected type.
pub fn decode_row<R: DeserializeOwned>(row: &Row) -> Result<R, DecodeError> {
    row.decode().map_err(|err| DecodeError::Shape {
        row: short_type_name::<R>(),
        reason: err.to_string(),
    })
}

/// Deserializes every raw row.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered.
pub fn decode_rows<R: DeserializeOwned>(rows: &[Row]) -> Result<Vec<R>, DecodeError> {
    rows.iter().map(decode_row::<R>).collect()
}

/// Returns the unqualified name of a type.
fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Grantee-name prefix the service adds to user grantees.
pub const USER_GRANTEE_PREFIX: &str = "USER$";

/// Parses an optional column, logging and dropping malformed values.
pub fn lenient<T, E: Display>(
    row: &'static str,
    field: &'static str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;
    match parse(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(row, field, error = %err, "failed to decode column; leaving it unset");
            None
        }
    }
}

/// Parses a column required for the object's identity.
///
/// # Errors
///
/// Returns [`DecodeError`] when the column is absent, empty, or malformed.
pub fn required<T, E: Display>(
    row: &'static str,
    field: &'static str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, DecodeError> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty()).ok_or(DecodeError::MissingField {
        row,
        field,
    })?;
    parse(raw).map_err(|err| DecodeError::InvalidField {
        row,
        field,
        reason: err.to_string(),
    })
}

/// Parses an RFC 3339 timestamp leniently.
pub fn timestamp(row: &'static str, field: &'static str, raw: Option<&str>) -> Option<OffsetDateTime> {
    lenient(row, field, raw, |raw| OffsetDateTime::parse(raw, &Rfc3339))
}

/// Returns a non-empty trimmed string column.
#[must_use]
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|raw| !raw.is_empty()).map(str::to_string)
}

/// Removes the `USER$` prefix from user grantee names.
#[must_use]
pub fn strip_grantee_prefix(name: &str) -> &str {
    name.strip_prefix(USER_GRANTEE_PREFIX).unwrap_or(name)
}

/// Parses a JSON array of strings such as `["A","B"]`.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when the payload is not a string array.
pub fn json_string_list(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Splits a comma-separated column into trimmed, non-empty entries.
#[must_use]
pub fn comma_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect()
    })
    .unwrap_or_default()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_drops_malformed_values() {
        let parsed: Option<i64> = lenient("TestRow", "count", Some("ten"), str::parse::<i64>);
        assert_eq!(parsed, None);
    }

    #[test]
    fn required_reports_missing_column() {
        let parsed: Result<i64, DecodeError> =
            required("TestRow", "count", Some("  "), str::parse::<i64>);
        assert_eq!(
            parsed,
            Err(DecodeError::MissingField {
                row: "TestRow",
                field: "count",
            })
        );
    }

    #[test]
    fn grantee_prefix_is_stripped_once() {
        assert_eq!(strip_grantee_prefix("USER$USER$X"), "USER$X");
        assert_eq!(strip_grantee_prefix("ROLE_A"), "ROLE_A");
    }

    #[test]
    fn comma_list_skips_blank_entries() {
        assert_eq!(comma_list(Some("a, ,b")), vec!["a".to_string(), "b".to_string()]);
        assert!(comma_list(None).is_empty());
    }
}

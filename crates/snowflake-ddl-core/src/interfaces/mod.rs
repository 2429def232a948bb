// crates/snowflake-ddl-core/src/interfaces/mod.rs
// ============================================================================
// Module: Driver Interfaces
// Description: Backend-agnostic driver seam, result rows, and request context.
// Purpose: Define the contract the session façade dispatches statements through.
// Dependencies: async-trait, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The library never speaks the wire protocol itself. A [`Driver`] executes
//! rendered statements and returns [`Row`]s: case-insensitive column maps
//! backed by JSON values. [`RequestContext`] carries per-request metadata
//! (timeout, labels, query-ID sink) that is forwarded to the driver verbatim.
//! Drivers must be safe for concurrent use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Driver error code for "object does not exist or not authorized".
pub const ERROR_CODE_OBJECT_DOES_NOT_EXIST: i32 = 2003;

/// Driver error code for "object does not exist, or operation cannot be
/// performed".
pub const ERROR_CODE_OBJECT_NOT_FOUND: i32 = 2043;

/// Message fragments recognized when the driver reports no error code.
const DOES_NOT_EXIST_FRAGMENTS: &[&str] =
    &["does not exist or not authorized", "does not exist", "object not found"];

// ============================================================================
// SECTION: Driver Error
// ============================================================================

/// Error surfaced by the driver. Displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    /// Numeric error code, when the driver exposes one.
    pub code: Option<i32>,
    /// SQL state, when the driver exposes one.
    pub sql_state: Option<String>,
    /// Driver-provided message.
    pub message: String,
    /// Query identifier of the failed statement, if known.
    pub query_id: Option<String>,
}

impl DriverError {
    /// Creates an error carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            sql_state: None,
            message: message.into(),
            query_id: None,
        }
    }

    /// Creates an error with a numeric code.
    #[must_use]
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            ..Self::new(message)
        }
    }

    /// Error returned by [`Driver::query_one`] when no row matched.
    #[must_use]
    pub fn no_rows() -> Self {
        Self::new("no rows in result set")
    }

    /// Returns true when the error means the target object is missing.
    ///
    /// Stable error codes are checked first; message fragments are only
    /// consulted when the driver supplies no code.
    #[must_use]
    pub fn indicates_missing_object(&self) -> bool {
        match self.code {
            Some(code) => {
                code == ERROR_CODE_OBJECT_DOES_NOT_EXIST || code == ERROR_CODE_OBJECT_NOT_FOUND
            }
            None => {
                let message = self.message.to_ascii_lowercase();
                DOES_NOT_EXIST_FRAGMENTS.iter().any(|fragment| message.contains(fragment))
            }
        }
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// One result row. Column names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Columns keyed by lower-cased name.
    columns: Map<String, Value>,
}

impl Row {
    /// Creates a row from a column map, lower-casing column names.
    #[must_use]
    pub fn new(columns: Map<String, Value>) -> Self {
        let columns =
            columns.into_iter().map(|(name, value)| (name.to_ascii_lowercase(), value)).collect();
        Self {
            columns,
        }
    }

    /// Returns a column value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(&column.to_ascii_lowercase())
    }

    /// Returns a column as a string when it holds one.
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Deserializes the row into a typed row structure.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when a column has an unexpected type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.columns.clone()))
    }
}

impl From<Map<String, Value>> for Row {
    fn from(columns: Map<String, Value>) -> Self {
        Self::new(columns)
    }
}

impl TryFrom<Value> for Row {
    type Error = DriverError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(columns) => Ok(Self::new(columns)),
            _ => Err(DriverError::new("row is not a JSON object")),
        }
    }
}

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Receives the query identifier of the statement executed with a context.
#[derive(Debug, Clone, Default)]
pub struct QueryIdSink {
    /// Last recorded query identifier.
    slot: Arc<Mutex<Option<String>>>,
}

impl QueryIdSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query identifier, replacing any previous one.
    pub fn record(&self, query_id: impl Into<String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(query_id.into());
        }
    }

    /// Returns the last recorded query identifier.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Per-request metadata forwarded to the driver untouched.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Statement timeout requested by the caller.
    pub timeout: Option<Duration>,
    /// Opaque caller labels (query tags, trace ids).
    pub labels: BTreeMap<String, String>,
    /// Optional receiver for the executed statement's query identifier.
    pub query_id_sink: Option<QueryIdSink>,
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the statement timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds an opaque label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Attaches a query-ID sink.
    #[must_use]
    pub fn with_query_id_sink(mut self, sink: QueryIdSink) -> Self {
        self.query_id_sink = Some(sink);
        self
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Database driver executing rendered statements.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Executes a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when execution fails.
    async fn exec(&self, ctx: &RequestContext, sql: &str) -> Result<(), DriverError>;

    /// Executes a statement and returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when execution fails.
    async fn query(&self, ctx: &RequestContext, sql: &str) -> Result<Vec<Row>, DriverError>;

    /// Executes a statement and returns the first row.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when execution fails or no row is returned.
    async fn query_one(&self, ctx: &RequestContext, sql: &str) -> Result<Row, DriverError> {
        self.query(ctx, sql).await?.into_iter().next().ok_or_else(DriverError::no_rows)
    }

    /// Fetches the result rows of a previously executed query.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the results cannot be retrieved.
    async fn fetch_results(
        &self,
        ctx: &RequestContext,
        query_id: &str,
    ) -> Result<Vec<Row>, DriverError>;
}

// crates/snowflake-ddl/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Scripted in-memory driver for façade and orchestration tests.
// Purpose: Record dispatched statements and serve canned rows or failures.
// Dependencies: async-trait, serde_json, snowflake-ddl
// ============================================================================

//! ## Overview
//! [`ScriptedDriver`] matches each statement against registered prefixes.
//! The most recently registered matching script wins, so a test can
//! override a default response later in its setup.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Not every test binary uses every helper.")]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use snowflake_ddl::Client;
use snowflake_ddl::Driver;
use snowflake_ddl::DriverError;
use snowflake_ddl::RequestContext;
use snowflake_ddl::Row;

/// Canned outcome for statements starting with a prefix.
#[derive(Clone)]
enum Script {
    /// Rows returned by `query`, or stored for `fetch_results` after `exec`.
    Rows(Vec<Row>),
    /// Failure returned by either call.
    Fail(DriverError),
}

/// Mutable driver state.
#[derive(Default)]
struct State {
    /// Registered scripts in registration order.
    scripts: Vec<(String, Script)>,
    /// Every statement received, in order.
    statements: Vec<String>,
    /// Labels of every received context, in order.
    labels: Vec<BTreeMap<String, String>>,
    /// Results stored per issued query id.
    results: BTreeMap<String, Vec<Row>>,
    /// Counter for issued query ids.
    next_query_id: u32,
}

/// In-memory driver driven by prefix scripts.
#[derive(Default)]
pub struct ScriptedDriver {
    /// Scripts and recorded traffic.
    state: Mutex<State>,
}

impl ScriptedDriver {
    /// Creates a driver with no scripts.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Serves `rows` (a JSON array of objects) for statements starting with
    /// `prefix`.
    pub fn respond(&self, prefix: &str, rows: Value) -> &Self {
        self.state.lock().unwrap().scripts.push((prefix.to_string(), Script::Rows(to_rows(rows))));
        self
    }

    /// Fails statements starting with `prefix`.
    pub fn fail(&self, prefix: &str, error: DriverError) -> &Self {
        self.state.lock().unwrap().scripts.push((prefix.to_string(), Script::Fail(error)));
        self
    }

    /// Returns every statement received so far.
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }

    /// Returns the statements starting with `prefix`.
    pub fn statements_starting_with(&self, prefix: &str) -> Vec<String> {
        self.statements().into_iter().filter(|sql| sql.starts_with(prefix)).collect()
    }

    /// Returns the labels of every received context.
    pub fn labels(&self) -> Vec<BTreeMap<String, String>> {
        self.state.lock().unwrap().labels.clone()
    }

    /// Records a statement and returns its script, if any.
    fn receive(&self, ctx: &RequestContext, sql: &str) -> Option<Script> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());
        state.labels.push(ctx.labels.clone());
        state.scripts.iter().rev().find(|(prefix, _)| sql.starts_with(prefix.as_str())).map(|(_, script)| script.clone())
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn exec(&self, ctx: &RequestContext, sql: &str) -> Result<(), DriverError> {
        let rows = match self.receive(ctx, sql) {
            Some(Script::Fail(err)) => return Err(err),
            Some(Script::Rows(rows)) => rows,
            None => Vec::new(),
        };
        let mut state = self.state.lock().unwrap();
        state.next_query_id += 1;
        let query_id = format!("01b2-{:04}", state.next_query_id);
        state.results.insert(query_id.clone(), rows);
        if let Some(sink) = &ctx.query_id_sink {
            sink.record(query_id);
        }
        Ok(())
    }

    async fn query(&self, ctx: &RequestContext, sql: &str) -> Result<Vec<Row>, DriverError> {
        match self.receive(ctx, sql) {
            Some(Script::Fail(err)) => Err(err),
            Some(Script::Rows(rows)) => Ok(rows),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_results(&self, _ctx: &RequestContext, query_id: &str) -> Result<Vec<Row>, DriverError> {
        self.state
            .lock()
            .unwrap()
            .results
            .get(query_id)
            .cloned()
            .ok_or_else(|| DriverError::new(format!("unknown query id {query_id}")))
    }
}

/// Converts a JSON array of objects into rows.
pub fn to_rows(rows: Value) -> Vec<Row> {
    match rows {
        Value::Array(items) => items.into_iter().map(|item| Row::try_from(item).unwrap()).collect(),
        other => panic!("expected a JSON array of rows, got {other}"),
    }
}

/// Builds a client over `driver`.
pub fn client(driver: &Arc<ScriptedDriver>) -> Client {
    Client::new(driver.clone())
}

/// Missing-object driver failure as reported by the service.
pub fn does_not_exist(object: &str) -> DriverError {
    DriverError::with_code(2003, format!("Object '{object}' does not exist or not authorized."))
}

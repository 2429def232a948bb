// crates/snowflake-ddl/src/functions.rs
// ============================================================================
// Module: Context And System Functions
// Description: Typed wrappers over CURRENT_ROLE() and SYSTEM$ pipe functions.
// Purpose: Give the ownership orchestrators typed reads of session state.
// Dependencies: serde, serde_json, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Each function is issued as a single-column `SELECT` with a fixed,
//! double-quoted alias so the row decodes by name regardless of the
//! service's column casing.

use std::borrow::Cow;

use serde::Deserialize;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SqlBuilder;
use snowflake_ddl_core::Statement;
use snowflake_ddl_core::ValidationErrors;
use snowflake_ddl_core::Validator;
use snowflake_ddl_core::decode::json_string_list;
use snowflake_ddl_core::sql::Node;
use snowflake_ddl_core::sql_enum;

use crate::client::Client;
use crate::error::SdkError;

/// Argument that lets `SYSTEM$PIPE_FORCE_RESUME` resume a pipe paused
/// before an ownership transfer.
pub const OWNERSHIP_TRANSFER_CHECK_OVERRIDE: &str = "ownership_transfer_check_override";

// ============================================================================
// SECTION: Statements
// ============================================================================

/// `SELECT CURRENT_ROLE()`.
#[derive(Debug, Clone, Copy, Default)]
struct CurrentRoleQuery;

impl Render for CurrentRoleQuery {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword(r#"SELECT CURRENT_ROLE() AS "CURRENT_ROLE""#);
    }
}

impl Statement for CurrentRoleQuery {
    const OPERATION: &'static str = "CurrentRole";

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// `SELECT CURRENT_AVAILABLE_ROLES()`.
#[derive(Debug, Clone, Copy, Default)]
struct CurrentAvailableRolesQuery;

impl Render for CurrentAvailableRolesQuery {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword(r#"SELECT CURRENT_AVAILABLE_ROLES() AS "CURRENT_AVAILABLE_ROLES""#);
    }
}

impl Statement for CurrentAvailableRolesQuery {
    const OPERATION: &'static str = "CurrentAvailableRoles";

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// `SELECT SYSTEM$PIPE_STATUS('<pipe>')`.
#[derive(Debug, Clone)]
struct PipeStatusQuery {
    /// Pipe whose status is read.
    pipe: SchemaObjectIdentifier,
}

impl Render for PipeStatusQuery {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.push(Node::Static(Cow::Owned(format!(
            r#"SELECT SYSTEM$PIPE_STATUS({}) AS "PIPE_STATUS""#,
            string_literal(&self.pipe.fully_qualified_name())
        ))));
    }
}

impl Statement for PipeStatusQuery {
    const OPERATION: &'static str = "PipeStatus";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("pipe", &self.pipe);
        v.finish()
    }
}

/// `SELECT SYSTEM$PIPE_FORCE_RESUME('<pipe>'[, '<override>'])`.
#[derive(Debug, Clone)]
struct PipeForceResumeQuery {
    /// Pipe to resume.
    pipe: SchemaObjectIdentifier,
    /// Optional override argument.
    check_override: Option<&'static str>,
}

impl Render for PipeForceResumeQuery {
    fn render(&self, sql: &mut SqlBuilder) {
        let mut arguments = string_literal(&self.pipe.fully_qualified_name());
        if let Some(check_override) = self.check_override {
            arguments.push_str(", ");
            arguments.push_str(&string_literal(check_override));
        }
        sql.push(Node::Static(Cow::Owned(format!(
            r#"SELECT SYSTEM$PIPE_FORCE_RESUME({arguments}) AS "PIPE_FORCE_RESUME""#
        ))));
    }
}

impl Statement for PipeForceResumeQuery {
    const OPERATION: &'static str = "PipeForceResume";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("pipe", &self.pipe);
        v.finish()
    }
}

/// Renders a single-quoted string literal, doubling embedded quotes.
fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// `CURRENT_ROLE()` result row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentRoleRow {
    /// Active primary role.
    #[serde(rename = "CURRENT_ROLE", alias = "current_role")]
    current_role: Option<String>,
}

/// `CURRENT_AVAILABLE_ROLES()` result row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentAvailableRolesRow {
    /// JSON list of role names.
    #[serde(rename = "CURRENT_AVAILABLE_ROLES", alias = "current_available_roles")]
    current_available_roles: Option<String>,
}

/// `SYSTEM$PIPE_STATUS` result row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PipeStatusRow {
    /// JSON status document.
    #[serde(rename = "PIPE_STATUS", alias = "pipe_status")]
    pipe_status: Option<String>,
}

sql_enum! {
    /// Execution state reported by `SYSTEM$PIPE_STATUS`.
    pub enum PipeExecutionState: "pipe execution state" {
        /// Loading notifications.
        Running => "RUNNING",
        /// Paused through `PIPE_EXECUTION_PAUSED`.
        Paused => "PAUSED",
        /// The pipe was cloned and must be resumed explicitly.
        StoppedCloned => "STOPPED_CLONED",
        /// The pipe feature is disabled.
        StoppedFeatureDisabled => "STOPPED_FEATURE_DISABLED",
        /// The stage definition changed.
        StoppedStageAltered => "STOPPED_STAGE_ALTERED",
        /// The stage was dropped.
        StoppedStageDropped => "STOPPED_STAGE_DROPPED",
        /// The file format was dropped.
        StoppedFileFormatDropped => "STOPPED_FILE_FORMAT_DROPPED",
        /// The notification integration was dropped.
        StoppedNotificationIntegrationDropped => "STOPPED_NOTIFICATION_INTEGRATION_DROPPED",
        /// The pipe itself is missing.
        StoppedMissingPipe => "STOPPED_MISSING_PIPE",
        /// The target table is missing.
        StoppedMissingTable => "STOPPED_MISSING_TABLE",
        /// The COPY statement no longer compiles.
        StalledCompilationError => "STALLED_COMPILATION_ERROR",
        /// Initialization failed.
        StalledInitializationError => "STALLED_INITIALIZATION_ERROR",
        /// Loading failed.
        StalledExecutionError => "STALLED_EXECUTION_ERROR",
        /// An internal failure occurred.
        StalledInternalError => "STALLED_INTERNAL_ERROR",
        /// The stage is not readable.
        StalledStagePermissionError => "STALLED_STAGE_PERMISSION_ERROR",
    }
}

/// Decoded `SYSTEM$PIPE_STATUS` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipeStatus {
    /// Raw execution state.
    pub execution_state: Option<String>,
    /// Files queued for loading.
    pub pending_file_count: Option<u64>,
    /// Last notification received.
    pub last_received_message_timestamp: Option<String>,
    /// Last notification forwarded for loading.
    pub last_forwarded_message_timestamp: Option<String>,
    /// Last ingested file.
    pub last_ingested_file_path: Option<String>,
    /// Error reported by the notification channel.
    pub notification_channel_error_message: Option<String>,
}

impl PipeStatus {
    /// Returns the parsed execution state, if recognized.
    #[must_use]
    pub fn state(&self) -> Option<PipeExecutionState> {
        self.execution_state.as_deref().and_then(|raw| PipeExecutionState::parse(raw).ok())
    }

    /// Returns true when the pipe is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == Some(PipeExecutionState::Running)
    }
}

// ============================================================================
// SECTION: Context Functions
// ============================================================================

/// Session context functions bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct ContextFunctions<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> ContextFunctions<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Returns the session's primary role.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver failure or when the session has no role.
    pub async fn current_role(&self, ctx: &RequestContext) -> Result<AccountObjectIdentifier, SdkError> {
        let row: CurrentRoleRow = self.client.query_one(ctx, &CurrentRoleQuery).await?;
        let role = row.current_role.filter(|role| !role.trim().is_empty()).ok_or(DecodeError::MissingField {
            row: "CurrentRoleRow",
            field: "CURRENT_ROLE",
        })?;
        Ok(AccountObjectIdentifier::new(role.trim()))
    }

    /// Returns every role available to the session, primary and secondary.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver failure or a malformed role list.
    pub async fn current_available_roles(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<AccountObjectIdentifier>, SdkError> {
        let row: CurrentAvailableRolesRow = self.client.query_one(ctx, &CurrentAvailableRolesQuery).await?;
        let Some(raw) = row.current_available_roles else {
            return Ok(Vec::new());
        };
        let roles = json_string_list(&raw).map_err(|err| DecodeError::InvalidField {
            row: "CurrentAvailableRolesRow",
            field: "CURRENT_AVAILABLE_ROLES",
            reason: err.to_string(),
        })?;
        Ok(roles.iter().map(AccountObjectIdentifier::new).collect())
    }
}

// ============================================================================
// SECTION: System Functions
// ============================================================================

/// `SYSTEM$` functions bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct SystemFunctions<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> SystemFunctions<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Reads the status document of a pipe.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver failure or a malformed document.
    pub async fn pipe_status(&self, ctx: &RequestContext, pipe: &SchemaObjectIdentifier) -> Result<PipeStatus, SdkError> {
        let query = PipeStatusQuery {
            pipe: pipe.clone(),
        };
        let row: PipeStatusRow = self.client.query_one(ctx, &query).await?;
        let raw = row.pipe_status.ok_or(DecodeError::MissingField {
            row: "PipeStatusRow",
            field: "PIPE_STATUS",
        })?;
        let status = serde_json::from_str(&raw).map_err(|err| DecodeError::InvalidField {
            row: "PipeStatusRow",
            field: "PIPE_STATUS",
            reason: err.to_string(),
        })?;
        Ok(status)
    }

    /// Resumes a paused pipe. `override_ownership_check` allows resuming a
    /// pipe paused before its ownership was transferred.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver failure.
    pub async fn pipe_force_resume(
        &self,
        ctx: &RequestContext,
        pipe: &SchemaObjectIdentifier,
        override_ownership_check: bool,
    ) -> Result<(), SdkError> {
        let query = PipeForceResumeQuery {
            pipe: pipe.clone(),
            check_override: override_ownership_check.then_some(OWNERSHIP_TRANSFER_CHECK_OVERRIDE),
        };
        self.client.query_rows(ctx, &query).await?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use snowflake_ddl_core::to_sql;

    use super::*;

    #[test]
    fn force_resume_renders_override() {
        let query = PipeForceResumeQuery {
            pipe: SchemaObjectIdentifier::new("db", "sc", "p"),
            check_override: Some(OWNERSHIP_TRANSFER_CHECK_OVERRIDE),
        };
        assert_eq!(
            to_sql(&query),
            r#"SELECT SYSTEM$PIPE_FORCE_RESUME('"db"."sc"."p"', 'ownership_transfer_check_override') AS "PIPE_FORCE_RESUME""#
        );
    }

    #[test]
    fn status_document_reports_running() {
        let status: PipeStatus = serde_json::from_str(r#"{"executionState":"RUNNING","pendingFileCount":0}"#).unwrap();
        assert!(status.is_running());
        assert_eq!(status.pending_file_count, Some(0));
    }
}

// crates/snowflake-ddl/src/objects/pipes.rs
// ============================================================================
// Module: Pipes
// Description: CREATE / ALTER / DROP / SHOW / DESCRIBE PIPE grammars.
// Purpose: Manage continuous-load pipes.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Pipes wrap a `COPY INTO` statement, rendered verbatim after `AS`. Pausing
//! is a SET of `PIPE_EXECUTION_PAUSED`; resuming after an ownership transfer
//! goes through `SYSTEM$PIPE_FORCE_RESUME` instead (see
//! [`crate::functions::SystemFunctions`]).

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
use snowflake_ddl_core::decode::lenient;
use snowflake_ddl_core::decode::non_empty;
use snowflake_ddl_core::decode::required;
use snowflake_ddl_core::decode::timestamp;
use snowflake_ddl_core::sql::Encoding;
use snowflake_ddl_core::sql::ListOptions;
use time::OffsetDateTime;

use crate::client::Client;
use crate::client::find_by_id;
use crate::client::ignore_missing;
use crate::client::missing_as_not_found;
use crate::error::SdkError;
use crate::objects::common::In;
use crate::objects::common::Like;
use crate::objects::common::TagAssociation;
use crate::objects::common::set_tags;
use crate::objects::common::text;
use crate::objects::common::unset_tags;
use crate::objects::common::validate_tags;

// ============================================================================
// SECTION: Create
// ============================================================================

/// `CREATE PIPE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePipeOptions {
    /// Replace an existing pipe.
    pub or_replace: bool,
    /// Skip when the pipe already exists.
    pub if_not_exists: bool,
    /// Pipe name.
    pub name: SchemaObjectIdentifier,
    /// Load automatically on cloud storage notifications.
    pub auto_ingest: Option<bool>,
    /// Notification integration receiving load errors.
    pub error_integration: Option<AccountObjectIdentifier>,
    /// SNS topic for S3 notifications.
    pub aws_sns_topic: Option<String>,
    /// Notification integration for Azure or GCS.
    pub integration: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// `COPY INTO` statement.
    pub copy_statement: String,
}

impl CreatePipeOptions {
    /// Creates options for `name` loading with `copy_statement`.
    #[must_use]
    pub fn new(name: SchemaObjectIdentifier, copy_statement: impl Into<String>) -> Self {
        Self {
            or_replace: false,
            if_not_exists: false,
            name,
            auto_ingest: None,
            error_integration: None,
            aws_sns_topic: None,
            integration: None,
            comment: None,
            copy_statement: copy_statement.into(),
        }
    }
}

impl Render for CreatePipeOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE")
            .keyword(self.or_replace, "OR REPLACE")
            .static_keyword("PIPE")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name)
            .parameter("AUTO_INGEST", self.auto_ingest.as_ref(), Encoding::PLAIN)
            .identifier_assigned("ERROR_INTEGRATION", self.error_integration.as_ref())
            .parameter("AWS_SNS_TOPIC", self.aws_sns_topic.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("INTEGRATION", self.integration.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("AS", Some(&self.copy_statement), Encoding::PLAIN.no_equals());
    }
}

impl Statement for CreatePipeOptions {
    const OPERATION: &'static str = "CreatePipeOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .conflicting(("OrReplace", self.or_replace), ("IfNotExists", self.if_not_exists))
            .required("CopyStatement", &self.copy_statement)
            .valid_identifier_if_set("ErrorIntegration", self.error_integration.as_ref());
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER PIPE ... SET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeSet {
    /// Notification integration receiving load errors.
    pub error_integration: Option<AccountObjectIdentifier>,
    /// Pause or resume the pipe.
    pub pipe_execution_paused: Option<bool>,
    /// Comment.
    pub comment: Option<String>,
}

impl Render for PipeSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .identifier_assigned("ERROR_INTEGRATION", self.error_integration.as_ref())
            .parameter("PIPE_EXECUTION_PAUSED", self.pipe_execution_paused.as_ref(), Encoding::PLAIN)
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

/// `ALTER PIPE ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeUnset {
    /// Reset `PIPE_EXECUTION_PAUSED`.
    pub pipe_execution_paused: bool,
    /// Remove the comment.
    pub comment: bool,
}

impl Render for PipeUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.pipe_execution_paused, "PIPE_EXECUTION_PAUSED").keyword(self.comment, "COMMENT");
        });
    }
}

/// `ALTER PIPE ... REFRESH` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeRefresh {
    /// Path prefix to scan.
    pub prefix: Option<String>,
    /// Only files modified after this timestamp.
    pub modified_after: Option<String>,
}

impl Render for PipeRefresh {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("REFRESH")
            .parameter("PREFIX", self.prefix.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("MODIFIED_AFTER", self.modified_after.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

/// Action of an `ALTER PIPE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterPipeAction {
    /// `SET ...`.
    Set(PipeSet),
    /// `UNSET ...`.
    Unset(PipeUnset),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
    /// `REFRESH ...`: queue staged files for loading.
    Refresh(PipeRefresh),
}

/// `ALTER PIPE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterPipeOptions {
    /// Skip when the pipe does not exist.
    pub if_exists: bool,
    /// Pipe name.
    pub name: SchemaObjectIdentifier,
    /// Action to apply.
    pub action: AlterPipeAction,
}

impl AlterPipeOptions {
    /// `ALTER PIPE <name> SET PIPE_EXECUTION_PAUSED = <paused>`.
    #[must_use]
    pub fn set_paused(name: SchemaObjectIdentifier, paused: bool) -> Self {
        Self {
            if_exists: false,
            name,
            action: AlterPipeAction::Set(PipeSet {
                pipe_execution_paused: Some(paused),
                ..PipeSet::default()
            }),
        }
    }
}

impl Render for AlterPipeOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER PIPE").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterPipeAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterPipeAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterPipeAction::SetTags(tags) => set_tags(sql, tags),
            AlterPipeAction::UnsetTags(tags) => unset_tags(sql, tags),
            AlterPipeAction::Refresh(refresh) => {
                sql.nested(Some(refresh));
            }
        }
    }
}

impl Statement for AlterPipeOptions {
    const OPERATION: &'static str = "AlterPipeOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterPipeAction::Set(set) => {
                v.scope("Set", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("ErrorIntegration", set.error_integration.is_some()),
                            ("PipeExecutionPaused", set.pipe_execution_paused.is_some()),
                            ("Comment", set.comment.is_some()),
                        ],
                    )
                    .valid_identifier_if_set("ErrorIntegration", set.error_integration.as_ref());
                });
            }
            AlterPipeAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.at_least_one_of(
                        "",
                        &[("PipeExecutionPaused", unset.pipe_execution_paused), ("Comment", unset.comment)],
                    );
                });
            }
            AlterPipeAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterPipeAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
            AlterPipeAction::Refresh(_) => {}
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe
// ============================================================================

/// `DROP PIPE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPipeOptions {
    /// Skip when the pipe does not exist.
    pub if_exists: bool,
    /// Pipe name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DropPipeOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP PIPE").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropPipeOptions {
    const OPERATION: &'static str = "DropPipeOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE PIPE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribePipeOptions {
    /// Pipe name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DescribePipeOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE PIPE").identifier(&self.name);
    }
}

impl Statement for DescribePipeOptions {
    const OPERATION: &'static str = "DescribePipeOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW PIPES` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowPipeOptions {
    /// Name filter.
    pub like: Option<Like>,
    /// Scope.
    pub in_scope: Option<In>,
}

impl Render for ShowPipeOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW PIPES").nested(self.like.as_ref()).nested(self.in_scope.as_ref());
    }
}

impl Statement for ShowPipeOptions {
    const OPERATION: &'static str = "ShowPipeOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        if let Some(scope) = &self.in_scope {
            scope.validate(&mut v);
        }
        v.finish()
    }
}

/// Raw `SHOW PIPES` / `DESCRIBE PIPE` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipeRow {
    /// Creation time.
    pub created_on: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Database.
    pub database_name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// `COPY INTO` statement.
    pub definition: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Notification channel for auto-ingest.
    pub notification_channel: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Notification integration.
    pub integration: Option<String>,
    /// File pattern of the COPY statement.
    pub pattern: Option<String>,
    /// Error notification integration.
    pub error_integration: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Reason the pipe is invalid.
    pub invalid_reason: Option<String>,
    /// Pipe kind.
    pub kind: Option<String>,
}

/// Decoded pipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Name.
    pub name: String,
    /// Database.
    pub database_name: String,
    /// Schema.
    pub schema_name: String,
    /// `COPY INTO` statement.
    pub definition: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Notification channel for auto-ingest.
    pub notification_channel: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Notification integration.
    pub integration: Option<String>,
    /// File pattern of the COPY statement.
    pub pattern: Option<String>,
    /// Error notification integration.
    pub error_integration: Option<AccountObjectIdentifier>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Reason the pipe is invalid.
    pub invalid_reason: Option<String>,
    /// Pipe kind.
    pub kind: Option<String>,
}

impl Pipe {
    /// Returns the pipe identifier.
    #[must_use]
    pub fn id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.name)
    }
}

impl TryFrom<PipeRow> for Pipe {
    type Error = DecodeError;

    fn try_from(row: PipeRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "PipeRow";
        Ok(Self {
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            name: required(ROW, "name", row.name.as_deref(), text)?,
            database_name: required(ROW, "database_name", row.database_name.as_deref(), text)?,
            schema_name: required(ROW, "schema_name", row.schema_name.as_deref(), text)?,
            definition: non_empty(row.definition.as_deref()),
            owner: non_empty(row.owner.as_deref()),
            notification_channel: non_empty(row.notification_channel.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            integration: non_empty(row.integration.as_deref()),
            pattern: non_empty(row.pattern.as_deref()),
            error_integration: lenient(ROW, "error_integration", row.error_integration.as_deref(), str::parse),
            owner_role_type: non_empty(row.owner_role_type.as_deref()),
            invalid_reason: non_empty(row.invalid_reason.as_deref()),
            kind: non_empty(row.kind.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Pipe operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Pipes<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> Pipes<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates a pipe.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreatePipeOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters a pipe.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterPipeOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a pipe.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropPipeOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a pipe, treating a missing pipe as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing pipe.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<(), SdkError> {
        let options = DropPipeOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists pipes.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(&self, ctx: &RequestContext, options: &ShowPipeOptions) -> Result<Vec<Pipe>, SdkError> {
        self.client.query_as::<_, PipeRow, Pipe>(ctx, options).await
    }

    /// Returns the pipe `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no pipe matches.
    pub async fn show_by_id(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Pipe, SdkError> {
        let options = ShowPipeOptions {
            like: Some(Like::new(id.name())),
            in_scope: Some(In::Schema(id.schema_id())),
        };
        let pipes = self.show(ctx, &options).await?;
        find_by_id(pipes, "pipe", id, |pipe| pipe.id() == *id)
    }

    /// Like [`Self::show_by_id`], with driver missing-object errors reported
    /// as [`SdkError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] or other failures.
    pub async fn show_by_id_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Pipe, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "pipe", id)
    }

    /// Describes a pipe.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Pipe, SdkError> {
        let options = DescribePipeOptions {
            name: id.clone(),
        };
        let row: PipeRow = self.client.query_one(ctx, &options).await?;
        Ok(Pipe::try_from(row)?)
    }
}

// crates/snowflake-ddl/src/objects/tasks.rs
// ============================================================================
// Module: Tasks
// Description: Task grammars, EXECUTE TASK, and task-graph helpers.
// Purpose: Manage scheduled and dependent tasks, including their root tasks.
// Dependencies: serde, serde_json, snowflake-ddl-core, tracing
// ============================================================================

//! ## Overview
//! Tasks form graphs: a root task carries the schedule and child tasks
//! name their predecessors with `AFTER`. A child may only be altered while
//! its root is suspended, so [`Tasks::suspend_root_tasks`] walks the graph
//! upwards and suspends every started root, returning the tasks it touched
//! for a later [`Tasks::resume_tasks`].
//! Invariants:
//! - Root discovery visits each task at most once, so cyclic or shared
//!   predecessors terminate.
//! - Finalizer tasks resolve to the root task they finalize.

use std::collections::BTreeSet;

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
use snowflake_ddl_core::decode::lenient;
use snowflake_ddl_core::decode::non_empty;
use snowflake_ddl_core::decode::required;
use snowflake_ddl_core::decode::timestamp;
use snowflake_ddl_core::sql::Encoding;
use snowflake_ddl_core::sql::ListOptions;
use snowflake_ddl_core::sql::Quotes;
use snowflake_ddl_core::sql_enum;
use time::OffsetDateTime;

use crate::client::Client;
use crate::client::find_by_id;
use crate::client::ignore_missing;
use crate::client::missing_as_not_found;
use crate::error::SdkError;
use crate::objects::common::In;
use crate::objects::common::LimitFrom;
use crate::objects::common::Like;
use crate::objects::common::Parameter;
use crate::objects::common::TagAssociation;
use crate::objects::common::parameters;
use crate::objects::common::set_tags;
use crate::objects::common::starts_with;
use crate::objects::common::text;
use crate::objects::common::unset_tags;
use crate::objects::common::validate_parameters;
use crate::objects::common::validate_tags;
use crate::objects::common::with_tags;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

sql_enum! {
    /// Scheduling state of a task.
    pub enum TaskState: "task state" {
        /// Scheduled or triggered runs are enabled.
        Started => "started",
        /// Runs are disabled.
        Suspended => "suspended",
    }
}

/// Compute used by a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskWarehouse {
    /// `WAREHOUSE = <warehouse>`.
    Warehouse(AccountObjectIdentifier),
    /// `USER_TASK_MANAGED_INITIAL_WAREHOUSE_SIZE = '<size>'` for serverless
    /// tasks.
    ManagedInitialSize(String),
}

impl Render for TaskWarehouse {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::Warehouse(id) => {
                sql.identifier_assigned("WAREHOUSE", Some(id));
            }
            Self::ManagedInitialSize(size) => {
                sql.parameter("USER_TASK_MANAGED_INITIAL_WAREHOUSE_SIZE", Some(size), Encoding::SINGLE_QUOTES);
            }
        }
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

/// `CREATE TASK` options.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskOptions {
    /// Replace an existing task.
    pub or_replace: bool,
    /// Skip when the task already exists.
    pub if_not_exists: bool,
    /// Task name.
    pub name: SchemaObjectIdentifier,
    /// Compute; serverless with the default size when absent.
    pub warehouse: Option<TaskWarehouse>,
    /// `n MINUTE` or `USING CRON ...`.
    pub schedule: Option<String>,
    /// JSON configuration available to the graph.
    pub config: Option<String>,
    /// Allow concurrent graph runs.
    pub allow_overlapping_execution: Option<bool>,
    /// Session parameters for runs.
    pub session_parameters: Vec<Parameter>,
    /// Run timeout in milliseconds.
    pub user_task_timeout_ms: Option<u32>,
    /// Consecutive failures before automatic suspension.
    pub suspend_task_after_num_failures: Option<u32>,
    /// Notification integration receiving errors.
    pub error_integration: Option<AccountObjectIdentifier>,
    /// Comment.
    pub comment: Option<String>,
    /// Root task this task finalizes.
    pub finalize: Option<SchemaObjectIdentifier>,
    /// Automatic retries of a failed graph.
    pub task_auto_retry_attempts: Option<u32>,
    /// Tags.
    pub tags: Vec<TagAssociation>,
    /// Minimum seconds between triggered runs.
    pub user_task_minimum_trigger_interval_in_seconds: Option<u32>,
    /// Predecessor tasks.
    pub after: Vec<SchemaObjectIdentifier>,
    /// Boolean condition gating runs.
    pub when: Option<String>,
    /// Body executed by the task.
    pub sql_statement: String,
}

impl CreateTaskOptions {
    /// Creates options for `name` running `sql_statement`.
    #[must_use]
    pub fn new(name: SchemaObjectIdentifier, sql_statement: impl Into<String>) -> Self {
        Self {
            or_replace: false,
            if_not_exists: false,
            name,
            warehouse: None,
            schedule: None,
            config: None,
            allow_overlapping_execution: None,
            session_parameters: Vec::new(),
            user_task_timeout_ms: None,
            suspend_task_after_num_failures: None,
            error_integration: None,
            comment: None,
            finalize: None,
            task_auto_retry_attempts: None,
            tags: Vec::new(),
            user_task_minimum_trigger_interval_in_seconds: None,
            after: Vec::new(),
            when: None,
            sql_statement: sql_statement.into(),
        }
    }
}

impl Render for CreateTaskOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE")
            .keyword(self.or_replace, "OR REPLACE")
            .static_keyword("TASK")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name)
            .nested(self.warehouse.as_ref())
            .parameter("SCHEDULE", self.schedule.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("CONFIG", self.config.as_ref(), Encoding::DOLLAR_QUOTES)
            .parameter("ALLOW_OVERLAPPING_EXECUTION", self.allow_overlapping_execution.as_ref(), Encoding::PLAIN);
        parameters(sql, &self.session_parameters);
        sql.parameter("USER_TASK_TIMEOUT_MS", self.user_task_timeout_ms.as_ref(), Encoding::PLAIN)
            .parameter(
                "SUSPEND_TASK_AFTER_NUM_FAILURES",
                self.suspend_task_after_num_failures.as_ref(),
                Encoding::PLAIN,
            )
            .identifier_assigned("ERROR_INTEGRATION", self.error_integration.as_ref())
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES)
            .identifier_assigned("FINALIZE", self.finalize.as_ref())
            .parameter("TASK_AUTO_RETRY_ATTEMPTS", self.task_auto_retry_attempts.as_ref(), Encoding::PLAIN);
        with_tags(sql, "TAG", &self.tags);
        sql.parameter(
            "USER_TASK_MINIMUM_TRIGGER_INTERVAL_IN_SECONDS",
            self.user_task_minimum_trigger_interval_in_seconds.as_ref(),
            Encoding::PLAIN,
        )
        .list(Some("AFTER"), &self.after, ListOptions::COMMA)
        .parameter("WHEN", self.when.as_ref(), Encoding::PLAIN.no_equals())
        .parameter("AS", Some(&self.sql_statement), Encoding::PLAIN.no_equals());
    }
}

impl Statement for CreateTaskOptions {
    const OPERATION: &'static str = "CreateTaskOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .conflicting(("OrReplace", self.or_replace), ("IfNotExists", self.if_not_exists))
            .at_most_one_of(
                "",
                &[
                    ("Schedule", self.schedule.is_some()),
                    ("After", !self.after.is_empty()),
                    ("Finalize", self.finalize.is_some()),
                ],
            )
            .required("SqlStatement", &self.sql_statement)
            .valid_identifier_if_set("ErrorIntegration", self.error_integration.as_ref())
            .valid_identifier_if_set("Finalize", self.finalize.as_ref())
            .valid_identifiers("After", &self.after);
        if let Some(TaskWarehouse::Warehouse(id)) = &self.warehouse {
            v.valid_identifier("Warehouse", id);
        }
        validate_parameters(&mut v, "SessionParameters", &self.session_parameters);
        validate_tags(&mut v, "Tag", &self.tags);
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER TASK ... SET` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    /// Warehouse.
    pub warehouse: Option<AccountObjectIdentifier>,
    /// Serverless initial size.
    pub user_task_managed_initial_warehouse_size: Option<String>,
    /// Schedule.
    pub schedule: Option<String>,
    /// JSON configuration.
    pub config: Option<String>,
    /// Allow concurrent graph runs.
    pub allow_overlapping_execution: Option<bool>,
    /// Run timeout in milliseconds.
    pub user_task_timeout_ms: Option<u32>,
    /// Consecutive failures before automatic suspension.
    pub suspend_task_after_num_failures: Option<u32>,
    /// Notification integration receiving errors.
    pub error_integration: Option<AccountObjectIdentifier>,
    /// Comment.
    pub comment: Option<String>,
    /// Session parameters.
    pub session_parameters: Vec<Parameter>,
    /// Automatic retries.
    pub task_auto_retry_attempts: Option<u32>,
    /// Minimum seconds between triggered runs.
    pub user_task_minimum_trigger_interval_in_seconds: Option<u32>,
}

impl Render for TaskSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .identifier_assigned("WAREHOUSE", self.warehouse.as_ref())
            .parameter(
                "USER_TASK_MANAGED_INITIAL_WAREHOUSE_SIZE",
                self.user_task_managed_initial_warehouse_size.as_ref(),
                Encoding::SINGLE_QUOTES,
            )
            .parameter("SCHEDULE", self.schedule.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("CONFIG", self.config.as_ref(), Encoding::DOLLAR_QUOTES)
            .parameter("ALLOW_OVERLAPPING_EXECUTION", self.allow_overlapping_execution.as_ref(), Encoding::PLAIN)
            .parameter("USER_TASK_TIMEOUT_MS", self.user_task_timeout_ms.as_ref(), Encoding::PLAIN)
            .parameter(
                "SUSPEND_TASK_AFTER_NUM_FAILURES",
                self.suspend_task_after_num_failures.as_ref(),
                Encoding::PLAIN,
            )
            .identifier_assigned("ERROR_INTEGRATION", self.error_integration.as_ref())
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
        parameters(sql, &self.session_parameters);
        sql.parameter("TASK_AUTO_RETRY_ATTEMPTS", self.task_auto_retry_attempts.as_ref(), Encoding::PLAIN)
            .parameter(
                "USER_TASK_MINIMUM_TRIGGER_INTERVAL_IN_SECONDS",
                self.user_task_minimum_trigger_interval_in_seconds.as_ref(),
                Encoding::PLAIN,
            );
    }
}

/// `ALTER TASK ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUnset {
    /// Remove the warehouse.
    pub warehouse: bool,
    /// Remove the schedule.
    pub schedule: bool,
    /// Remove the configuration.
    pub config: bool,
    /// Reset overlapping execution.
    pub allow_overlapping_execution: bool,
    /// Reset the run timeout.
    pub user_task_timeout_ms: bool,
    /// Reset the failure threshold.
    pub suspend_task_after_num_failures: bool,
    /// Remove the error integration.
    pub error_integration: bool,
    /// Remove the comment.
    pub comment: bool,
    /// Reset automatic retries.
    pub task_auto_retry_attempts: bool,
    /// Reset the minimum trigger interval.
    pub user_task_minimum_trigger_interval_in_seconds: bool,
    /// Session parameters to reset.
    pub session_parameters: Vec<String>,
}

impl TaskUnset {
    /// Returns whether no property is selected for unsetting.
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Render for TaskUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.warehouse, "WAREHOUSE")
                .keyword(self.schedule, "SCHEDULE")
                .keyword(self.config, "CONFIG")
                .keyword(self.allow_overlapping_execution, "ALLOW_OVERLAPPING_EXECUTION")
                .keyword(self.user_task_timeout_ms, "USER_TASK_TIMEOUT_MS")
                .keyword(self.suspend_task_after_num_failures, "SUSPEND_TASK_AFTER_NUM_FAILURES")
                .keyword(self.error_integration, "ERROR_INTEGRATION")
                .keyword(self.comment, "COMMENT")
                .keyword(self.task_auto_retry_attempts, "TASK_AUTO_RETRY_ATTEMPTS")
                .keyword(
                    self.user_task_minimum_trigger_interval_in_seconds,
                    "USER_TASK_MINIMUM_TRIGGER_INTERVAL_IN_SECONDS",
                );
            for parameter in &self.session_parameters {
                sql.value(Some(&parameter.to_ascii_uppercase()), Quotes::None);
            }
        });
    }
}

/// Action of an `ALTER TASK` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTaskAction {
    /// `RESUME`.
    Resume,
    /// `SUSPEND`.
    Suspend,
    /// `REMOVE AFTER <task>, ...`.
    RemoveAfter(Vec<SchemaObjectIdentifier>),
    /// `ADD AFTER <task>, ...`.
    AddAfter(Vec<SchemaObjectIdentifier>),
    /// `SET ...`.
    Set(TaskSet),
    /// `UNSET ...`.
    Unset(TaskUnset),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
    /// `SET FINALIZE = <root task>`.
    SetFinalize(SchemaObjectIdentifier),
    /// `UNSET FINALIZE`.
    UnsetFinalize,
    /// `MODIFY AS <sql>`.
    ModifyAs(String),
    /// `MODIFY WHEN <condition>`.
    ModifyWhen(String),
    /// `REMOVE WHEN`.
    RemoveWhen,
}

/// `ALTER TASK` options.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTaskOptions {
    /// Skip when the task does not exist.
    pub if_exists: bool,
    /// Task name.
    pub name: SchemaObjectIdentifier,
    /// Action to apply.
    pub action: AlterTaskAction,
}

impl AlterTaskOptions {
    /// Creates options applying `action` to `name`.
    #[must_use]
    pub const fn new(name: SchemaObjectIdentifier, action: AlterTaskAction) -> Self {
        Self {
            if_exists: false,
            name,
            action,
        }
    }
}

impl Render for AlterTaskOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER TASK").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterTaskAction::Resume => {
                sql.static_keyword("RESUME");
            }
            AlterTaskAction::Suspend => {
                sql.static_keyword("SUSPEND");
            }
            AlterTaskAction::RemoveAfter(tasks) => {
                sql.list(Some("REMOVE AFTER"), tasks, ListOptions::COMMA);
            }
            AlterTaskAction::AddAfter(tasks) => {
                sql.list(Some("ADD AFTER"), tasks, ListOptions::COMMA);
            }
            AlterTaskAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterTaskAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterTaskAction::SetTags(tags) => set_tags(sql, tags),
            AlterTaskAction::UnsetTags(tags) => unset_tags(sql, tags),
            AlterTaskAction::SetFinalize(root) => {
                sql.identifier_assigned("SET FINALIZE", Some(root));
            }
            AlterTaskAction::UnsetFinalize => {
                sql.static_keyword("UNSET FINALIZE");
            }
            AlterTaskAction::ModifyAs(statement) => {
                sql.parameter("MODIFY AS", Some(statement), Encoding::PLAIN.no_equals());
            }
            AlterTaskAction::ModifyWhen(condition) => {
                sql.parameter("MODIFY WHEN", Some(condition), Encoding::PLAIN.no_equals());
            }
            AlterTaskAction::RemoveWhen => {
                sql.static_keyword("REMOVE WHEN");
            }
        }
    }
}

impl Statement for AlterTaskOptions {
    const OPERATION: &'static str = "AlterTaskOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterTaskAction::RemoveAfter(tasks) => {
                v.required("RemoveAfter", tasks).valid_identifiers("RemoveAfter", tasks);
            }
            AlterTaskAction::AddAfter(tasks) => {
                v.required("AddAfter", tasks).valid_identifiers("AddAfter", tasks);
            }
            AlterTaskAction::Set(set) => {
                v.scope("Set", |v| {
                    v.check(*set == TaskSet::default(), "", "at least one property or parameter must be set")
                        .conflicting(
                            ("Warehouse", set.warehouse.is_some()),
                            (
                                "UserTaskManagedInitialWarehouseSize",
                                set.user_task_managed_initial_warehouse_size.is_some(),
                            ),
                        )
                        .valid_identifier_if_set("Warehouse", set.warehouse.as_ref())
                        .valid_identifier_if_set("ErrorIntegration", set.error_integration.as_ref());
                    validate_parameters(v, "SessionParameters", &set.session_parameters);
                });
            }
            AlterTaskAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.check(unset.is_empty(), "", "at least one property or parameter must be unset");
                });
            }
            AlterTaskAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterTaskAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
            AlterTaskAction::SetFinalize(root) => {
                v.valid_identifier("SetFinalize", root);
            }
            AlterTaskAction::ModifyAs(statement) => {
                v.required("ModifyAs", statement);
            }
            AlterTaskAction::ModifyWhen(condition) => {
                v.required("ModifyWhen", condition);
            }
            AlterTaskAction::Resume
            | AlterTaskAction::Suspend
            | AlterTaskAction::UnsetFinalize
            | AlterTaskAction::RemoveWhen => {}
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe / Execute
// ============================================================================

/// `DROP TASK` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTaskOptions {
    /// Skip when the task does not exist.
    pub if_exists: bool,
    /// Task name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DropTaskOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP TASK").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropTaskOptions {
    const OPERATION: &'static str = "DropTaskOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE TASK` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeTaskOptions {
    /// Task name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DescribeTaskOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE TASK").identifier(&self.name);
    }
}

impl Statement for DescribeTaskOptions {
    const OPERATION: &'static str = "DescribeTaskOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `EXECUTE TASK` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteTaskOptions {
    /// Task name.
    pub name: SchemaObjectIdentifier,
    /// Re-run only the failed tasks of the last graph run.
    pub retry_last: bool,
}

impl Render for ExecuteTaskOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("EXECUTE TASK").identifier(&self.name).keyword(self.retry_last, "RETRY LAST");
    }
}

impl Statement for ExecuteTaskOptions {
    const OPERATION: &'static str = "ExecuteTaskOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW TASKS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowTaskOptions {
    /// Return the reduced column set.
    pub terse: bool,
    /// Name filter.
    pub like: Option<Like>,
    /// Scope.
    pub in_scope: Option<In>,
    /// Name prefix filter.
    pub starts_with: Option<String>,
    /// Only root tasks.
    pub root_only: bool,
    /// Pagination.
    pub limit: Option<LimitFrom>,
}

impl Render for ShowTaskOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW")
            .keyword(self.terse, "TERSE")
            .static_keyword("TASKS")
            .nested(self.like.as_ref())
            .nested(self.in_scope.as_ref());
        starts_with(sql, self.starts_with.as_ref());
        sql.keyword(self.root_only, "ROOT ONLY").nested(self.limit.as_ref());
    }
}

impl Statement for ShowTaskOptions {
    const OPERATION: &'static str = "ShowTaskOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        if let Some(scope) = &self.in_scope {
            scope.validate(&mut v);
        }
        v.finish()
    }
}

/// Raw `SHOW TASKS` / `DESCRIBE TASK` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskRow {
    /// Creation time.
    pub created_on: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Service-assigned task id.
    pub id: Option<String>,
    /// Database.
    pub database_name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Warehouse.
    pub warehouse: Option<String>,
    /// Schedule.
    pub schedule: Option<String>,
    /// Predecessors, JSON list of qualified names.
    pub predecessors: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Body.
    pub definition: Option<String>,
    /// `WHEN` condition.
    pub condition: Option<String>,
    /// Overlapping execution flag, `true`/`false` text.
    pub allow_overlapping_execution: Option<String>,
    /// Error integration; the literal `null` when unset.
    pub error_integration: Option<String>,
    /// Last definition change.
    pub last_committed_on: Option<String>,
    /// Last suspension.
    pub last_suspended_on: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// JSON configuration.
    pub config: Option<String>,
    /// Budget.
    pub budget: Option<String>,
    /// Graph relations, JSON object.
    pub task_relations: Option<String>,
    /// Reason for the last suspension.
    pub last_suspended_reason: Option<String>,
}

/// Graph relations reported in `task_relations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRelations {
    /// Predecessor tasks.
    pub predecessors: Vec<SchemaObjectIdentifier>,
    /// Finalizer of this root task.
    pub finalizer_task: Option<SchemaObjectIdentifier>,
    /// Root task this finalizer belongs to.
    pub finalized_root_task: Option<SchemaObjectIdentifier>,
}

/// Raw `task_relations` payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TaskRelationsPayload {
    /// Predecessor names.
    #[serde(rename = "Predecessors")]
    predecessors: Vec<String>,
    /// Finalizer name.
    #[serde(rename = "FinalizerTask")]
    finalizer_task: Option<String>,
    /// Finalized root name.
    #[serde(rename = "FinalizedRootTask")]
    finalized_root_task: Option<String>,
}

impl TaskRelations {
    /// Parses the `task_relations` JSON object.
    ///
    /// # Errors
    ///
    /// Returns a message when the payload or a task name is malformed.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let payload: TaskRelationsPayload = serde_json::from_str(raw).map_err(|err| err.to_string())?;
        let parse_id = |name: &str| name.parse::<SchemaObjectIdentifier>().map_err(|err| err.to_string());
        Ok(Self {
            predecessors: payload.predecessors.iter().map(|name| parse_id(name)).collect::<Result<_, _>>()?,
            finalizer_task: payload.finalizer_task.as_deref().map(parse_id).transpose()?,
            finalized_root_task: payload.finalized_root_task.as_deref().map(parse_id).transpose()?,
        })
    }
}

/// Parses the `predecessors` JSON list.
fn predecessor_list(raw: &str) -> Result<Vec<SchemaObjectIdentifier>, String> {
    json_string_list(raw)
        .map_err(|err| err.to_string())?
        .iter()
        .map(|name| name.parse::<SchemaObjectIdentifier>().map_err(|err| err.to_string()))
        .collect()
}

/// Decoded task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Name.
    pub name: String,
    /// Service-assigned task id.
    pub task_id: Option<String>,
    /// Database.
    pub database_name: String,
    /// Schema.
    pub schema_name: String,
    /// Owner role.
    pub owner: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Warehouse; serverless when absent.
    pub warehouse: Option<AccountObjectIdentifier>,
    /// Schedule.
    pub schedule: Option<String>,
    /// Predecessor tasks.
    pub predecessors: Vec<SchemaObjectIdentifier>,
    /// State.
    pub state: Option<TaskState>,
    /// Body.
    pub definition: Option<String>,
    /// `WHEN` condition.
    pub condition: Option<String>,
    /// Overlapping execution flag.
    pub allow_overlapping_execution: bool,
    /// Error integration.
    pub error_integration: Option<AccountObjectIdentifier>,
    /// Last definition change.
    pub last_committed_on: Option<OffsetDateTime>,
    /// Last suspension.
    pub last_suspended_on: Option<OffsetDateTime>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// JSON configuration.
    pub config: Option<String>,
    /// Budget.
    pub budget: Option<String>,
    /// Graph relations.
    pub task_relations: TaskRelations,
    /// Reason for the last suspension.
    pub last_suspended_reason: Option<String>,
}

impl Task {
    /// Returns the task identifier.
    #[must_use]
    pub fn id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.name)
    }

    /// Returns true when the task is started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state == Some(TaskState::Started)
    }

    /// Returns the predecessors, preferring the graph relations.
    #[must_use]
    pub fn all_predecessors(&self) -> &[SchemaObjectIdentifier] {
        if self.task_relations.predecessors.is_empty() {
            &self.predecessors
        } else {
            &self.task_relations.predecessors
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = DecodeError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "TaskRow";
        let error_integration = row.error_integration.as_deref().filter(|raw| !raw.eq_ignore_ascii_case("null"));
        Ok(Self {
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            name: required(ROW, "name", row.name.as_deref(), text)?,
            task_id: non_empty(row.id.as_deref()),
            database_name: required(ROW, "database_name", row.database_name.as_deref(), text)?,
            schema_name: required(ROW, "schema_name", row.schema_name.as_deref(), text)?,
            owner: non_empty(row.owner.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            warehouse: lenient(ROW, "warehouse", row.warehouse.as_deref(), str::parse),
            schedule: non_empty(row.schedule.as_deref()),
            predecessors: lenient(ROW, "predecessors", row.predecessors.as_deref(), predecessor_list)
                .unwrap_or_default(),
            state: lenient(ROW, "state", row.state.as_deref(), TaskState::parse),
            definition: non_empty(row.definition.as_deref()),
            condition: non_empty(row.condition.as_deref()),
            allow_overlapping_execution: lenient(
                ROW,
                "allow_overlapping_execution",
                row.allow_overlapping_execution.as_deref(),
                str::parse::<bool>,
            )
            .unwrap_or(false),
            error_integration: lenient(ROW, "error_integration", error_integration, str::parse),
            last_committed_on: timestamp(ROW, "last_committed_on", row.last_committed_on.as_deref()),
            last_suspended_on: timestamp(ROW, "last_suspended_on", row.last_suspended_on.as_deref()),
            owner_role_type: non_empty(row.owner_role_type.as_deref()),
            config: non_empty(row.config.as_deref()),
            budget: non_empty(row.budget.as_deref()),
            task_relations: lenient(ROW, "task_relations", row.task_relations.as_deref(), TaskRelations::parse)
                .unwrap_or_default(),
            last_suspended_reason: non_empty(row.last_suspended_reason.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Task operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Tasks<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> Tasks<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreateTaskOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters a task.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterTaskOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a task.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropTaskOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a task, treating a missing task as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing task.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<(), SdkError> {
        let options = DropTaskOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Runs a task once, outside its schedule.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn execute(&self, ctx: &RequestContext, options: &ExecuteTaskOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Lists tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(&self, ctx: &RequestContext, options: &ShowTaskOptions) -> Result<Vec<Task>, SdkError> {
        self.client.query_as::<_, TaskRow, Task>(ctx, options).await
    }

    /// Returns the task `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no task matches.
    pub async fn show_by_id(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Task, SdkError> {
        let options = ShowTaskOptions {
            like: Some(Like::new(id.name())),
            in_scope: Some(In::Schema(id.schema_id())),
            ..ShowTaskOptions::default()
        };
        let tasks = self.show(ctx, &options).await?;
        find_by_id(tasks, "task", id, |task| task.id() == *id)
    }

    /// Like [`Self::show_by_id`], with driver missing-object errors reported
    /// as [`SdkError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] or other failures.
    pub async fn show_by_id_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Task, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "task", id)
    }

    /// Describes a task.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Task, SdkError> {
        let options = DescribeTaskOptions {
            name: id.clone(),
        };
        let row: TaskRow = self.client.query_one(ctx, &options).await?;
        Ok(Task::try_from(row)?)
    }

    /// Returns the root tasks of the graph containing `id`, in discovery
    /// order. A root task returns itself.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when a task on the path cannot be read.
    pub async fn root_tasks(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Vec<Task>, SdkError> {
        let mut visited = BTreeSet::new();
        let mut pending = vec![id.clone()];
        let mut roots = Vec::new();
        while let Some(current) = pending.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let task = self.describe(ctx, &current).await?;
            if let Some(root) = &task.task_relations.finalized_root_task {
                pending.push(root.clone());
                continue;
            }
            let predecessors = task.all_predecessors();
            if predecessors.is_empty() {
                roots.push(task);
            } else {
                pending.extend(predecessors.iter().rev().cloned());
            }
        }
        Ok(roots)
    }

    /// Suspends every started root task of the graph containing `id`,
    /// skipping `exclude`. Returns the suspended tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when discovery fails, or the joined suspension
    /// failures.
    pub async fn suspend_root_tasks(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifier,
        exclude: &SchemaObjectIdentifier,
    ) -> Result<Vec<SchemaObjectIdentifier>, SdkError> {
        let roots = self.root_tasks(ctx, id).await?;
        let mut suspended = Vec::new();
        let mut errors = Vec::new();
        for root in roots.iter().filter(|root| root.id() != *exclude && root.is_started()) {
            let root_id = root.id();
            tracing::debug!(task = %root_id, "suspending root task");
            match self.alter(ctx, &AlterTaskOptions::new(root_id.clone(), AlterTaskAction::Suspend)).await {
                Ok(()) => suspended.push(root_id),
                Err(err) => errors.push(err),
            }
        }
        match SdkError::join(errors) {
            Some(err) => Err(err),
            None => Ok(suspended),
        }
    }

    /// Resumes `ids` in order, attempting every task.
    ///
    /// # Errors
    ///
    /// Returns the joined resume failures.
    pub async fn resume_tasks(&self, ctx: &RequestContext, ids: &[SchemaObjectIdentifier]) -> Result<(), SdkError> {
        let mut errors = Vec::new();
        for id in ids {
            if let Err(err) = self.alter(ctx, &AlterTaskOptions::new(id.clone(), AlterTaskAction::Resume)).await {
                errors.push(err);
            }
        }
        SdkError::join(errors).map_or(Ok(()), Err)
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

    fn id(name: &str) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new("db", "sc", name)
    }

    #[test]
    fn child_task_renders_after_and_body() {
        let mut options = CreateTaskOptions::new(id("child"), "SELECT 1");
        options.warehouse = Some(TaskWarehouse::Warehouse(AccountObjectIdentifier::new("wh")));
        options.after = vec![id("root"), id("other")];
        assert_eq!(
            to_sql(&options),
            r#"CREATE TASK "db"."sc"."child" WAREHOUSE = "wh" AFTER "db"."sc"."root", "db"."sc"."other" AS SELECT 1"#
        );
    }

    #[test]
    fn schedule_and_after_are_exclusive() {
        let mut options = CreateTaskOptions::new(id("child"), "SELECT 1");
        options.schedule = Some("5 MINUTE".into());
        options.after = vec![id("root")];
        let err = options.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "CreateTaskOptions: options: at-most-one-of: Schedule, After, Finalize"
        );
    }

    #[test]
    fn task_relations_parse_qualified_names() {
        let relations = TaskRelations::parse(
            r#"{"Predecessors":["\"db\".\"sc\".\"root\""],"FinalizerTask":"\"db\".\"sc\".\"fin\""}"#,
        )
        .unwrap();
        assert_eq!(relations.predecessors, vec![id("root")]);
        assert_eq!(relations.finalizer_task, Some(id("fin")));
    }
}

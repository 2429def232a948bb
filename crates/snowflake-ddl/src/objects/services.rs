// crates/snowflake-ddl/src/objects/services.rs
// ============================================================================
// Module: Services
// Description: Service and job-service grammars for Snowpark Container Services.
// Purpose: Create, run, alter, and list containerized services.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! A service is a schema object running on a compute pool. Its container
//! specification comes either from a stage file or from an inline body,
//! optionally as a template filled by `USING (key => value)` variables.
//! Job services run to completion and are listed with `SHOW JOB SERVICES`.

use std::borrow::Cow;

use serde::Deserialize;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DatabaseObjectIdentifier;
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
use snowflake_ddl_core::sql::Node;
use snowflake_ddl_core::sql_enum;
use time::OffsetDateTime;

use crate::client::Client;
use crate::client::find_by_id;
use crate::client::ignore_missing;
use crate::client::missing_as_not_found;
use crate::error::SdkError;
use crate::objects::common::LimitFrom;
use crate::objects::common::Like;
use crate::objects::common::TagAssociation;
use crate::objects::common::set_tags;
use crate::objects::common::starts_with;
use crate::objects::common::text;
use crate::objects::common::unset_tags;
use crate::objects::common::validate_tags;
use crate::objects::common::with_tags;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

sql_enum! {
    /// Lifecycle status of a service.
    pub enum ServiceStatus: "service status" {
        /// Waiting for resources.
        Pending => "PENDING",
        /// Running.
        Running => "RUNNING",
        /// Failed.
        Failed => "FAILED",
        /// Job finished.
        Done => "DONE",
        /// Suspending.
        Suspending => "SUSPENDING",
        /// Suspended.
        Suspended => "SUSPENDED",
        /// Being deleted.
        Deleting => "DELETING",
        /// Deleted.
        Deleted => "DELETED",
        /// Internal error.
        InternalError => "INTERNAL_ERROR",
    }
}

sql_enum! {
    /// Long-running service or run-to-completion job.
    pub enum ServiceType: "service type" {
        /// Long-running service.
        Service => "SERVICE",
        /// Job service.
        JobService => "JOB_SERVICE",
    }
}

// ============================================================================
// SECTION: Shared Fragments
// ============================================================================

/// `<key> => <value>` template variable. The value is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
    /// Variable name.
    pub key: String,
    /// SQL literal or JSON value.
    pub value: String,
}

impl TemplateVariable {
    /// Creates a template variable.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Source of a service specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSpecification {
    /// `FROM @<stage> SPECIFICATION_FILE = '<file>'`.
    FromStage {
        /// Stage name without the leading `@`.
        stage: String,
        /// Path of the YAML file within the stage.
        file: String,
    },
    /// `FROM SPECIFICATION $$<body>$$`.
    Inline(String),
    /// `FROM @<stage> SPECIFICATION_TEMPLATE_FILE = '<file>' USING (...)`.
    TemplateFromStage {
        /// Stage name without the leading `@`.
        stage: String,
        /// Path of the template file within the stage.
        file: String,
        /// Template variables.
        using: Vec<TemplateVariable>,
    },
    /// `FROM SPECIFICATION_TEMPLATE $$<body>$$ USING (...)`.
    InlineTemplate {
        /// Template body.
        template: String,
        /// Template variables.
        using: Vec<TemplateVariable>,
    },
}

impl Render for ServiceSpecification {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::FromStage {
                stage,
                file,
            } => {
                sql.parameter("FROM", Some(&format!("@{stage}")), Encoding::PLAIN.no_equals())
                    .parameter("SPECIFICATION_FILE", Some(file), Encoding::SINGLE_QUOTES);
            }
            Self::Inline(body) => {
                sql.parameter("FROM SPECIFICATION", Some(body), Encoding::DOLLAR_QUOTES.no_equals());
            }
            Self::TemplateFromStage {
                stage,
                file,
                using,
            } => {
                sql.parameter("FROM", Some(&format!("@{stage}")), Encoding::PLAIN.no_equals())
                    .parameter("SPECIFICATION_TEMPLATE_FILE", Some(file), Encoding::SINGLE_QUOTES);
                render_using(sql, using);
            }
            Self::InlineTemplate {
                template,
                using,
            } => {
                sql.parameter(
                    "FROM SPECIFICATION_TEMPLATE",
                    Some(template),
                    Encoding::DOLLAR_QUOTES.no_equals(),
                );
                render_using(sql, using);
            }
        }
    }
}

impl ServiceSpecification {
    /// Validates the source fields of the chosen variant.
    fn validate(&self, v: &mut Validator) {
        match self {
            Self::FromStage {
                stage,
                file,
            } => {
                v.required("Stage", stage).required("SpecificationFile", file);
            }
            Self::Inline(body) => {
                v.required("Specification", body);
            }
            Self::TemplateFromStage {
                stage,
                file,
                using,
            } => {
                v.required("Stage", stage).required("SpecificationTemplateFile", file).required("Using", using);
            }
            Self::InlineTemplate {
                template,
                using,
            } => {
                v.required("SpecificationTemplate", template).required("Using", using);
            }
        }
    }
}

/// Renders `USING (key => value, ...)`.
fn render_using(sql: &mut SqlBuilder, using: &[TemplateVariable]) {
    sql.list_of(Some("USING"), ListOptions::COMMA_PARENTHESES, |sql| {
        for variable in using {
            sql.push(Node::Static(Cow::Owned(format!("{} => {}", variable.key, variable.value))));
        }
    });
}

/// Scope of `SHOW SERVICES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceIn {
    /// The whole account.
    Account,
    /// A single database.
    Database(AccountObjectIdentifier),
    /// A single schema.
    Schema(DatabaseObjectIdentifier),
    /// Services running on a compute pool.
    ComputePool(AccountObjectIdentifier),
}

impl Render for ServiceIn {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::Account => {
                sql.static_keyword("IN ACCOUNT");
            }
            Self::Database(id) => {
                sql.identifier_with("IN DATABASE", Some(id));
            }
            Self::Schema(id) => {
                sql.identifier_with("IN SCHEMA", Some(id));
            }
            Self::ComputePool(id) => {
                sql.identifier_with("IN COMPUTE POOL", Some(id));
            }
        }
    }
}

// ============================================================================
// SECTION: Create / Execute Job
// ============================================================================

/// `CREATE SERVICE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateServiceOptions {
    /// Skip when the service already exists.
    pub if_not_exists: bool,
    /// Service name.
    pub name: SchemaObjectIdentifier,
    /// Compute pool running the service.
    pub in_compute_pool: AccountObjectIdentifier,
    /// Container specification.
    pub specification: ServiceSpecification,
    /// Idle seconds before automatic suspension.
    pub auto_suspend_secs: Option<u32>,
    /// External access integrations.
    pub external_access_integrations: Vec<AccountObjectIdentifier>,
    /// Resume automatically when called.
    pub auto_resume: Option<bool>,
    /// Minimum instance count.
    pub min_instances: Option<u32>,
    /// Instances that must be ready before the service is considered ready.
    pub min_ready_instances: Option<u32>,
    /// Maximum instance count.
    pub max_instances: Option<u32>,
    /// Warehouse for queries issued by the service.
    pub query_warehouse: Option<AccountObjectIdentifier>,
    /// Tags attached on creation.
    pub tags: Vec<TagAssociation>,
    /// Comment.
    pub comment: Option<String>,
}

impl CreateServiceOptions {
    /// Creates options with the required fields.
    #[must_use]
    pub const fn new(
        name: SchemaObjectIdentifier,
        in_compute_pool: AccountObjectIdentifier,
        specification: ServiceSpecification,
    ) -> Self {
        Self {
            if_not_exists: false,
            name,
            in_compute_pool,
            specification,
            auto_suspend_secs: None,
            external_access_integrations: Vec::new(),
            auto_resume: None,
            min_instances: None,
            min_ready_instances: None,
            max_instances: None,
            query_warehouse: None,
            tags: Vec::new(),
            comment: None,
        }
    }
}

impl Render for CreateServiceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE SERVICE")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name)
            .identifier_with("IN COMPUTE POOL", Some(&self.in_compute_pool))
            .nested(Some(&self.specification))
            .parameter("AUTO_SUSPEND_SECS", self.auto_suspend_secs.as_ref(), Encoding::PLAIN)
            .list(
                Some("EXTERNAL_ACCESS_INTEGRATIONS"),
                &self.external_access_integrations,
                ListOptions::ASSIGNED_PARENTHESES,
            )
            .parameter("AUTO_RESUME", self.auto_resume.as_ref(), Encoding::PLAIN)
            .parameter("MIN_INSTANCES", self.min_instances.as_ref(), Encoding::PLAIN)
            .parameter("MIN_READY_INSTANCES", self.min_ready_instances.as_ref(), Encoding::PLAIN)
            .parameter("MAX_INSTANCES", self.max_instances.as_ref(), Encoding::PLAIN)
            .identifier_assigned("QUERY_WAREHOUSE", self.query_warehouse.as_ref());
        with_tags(sql, "TAG", &self.tags);
        sql.parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

impl Statement for CreateServiceOptions {
    const OPERATION: &'static str = "CreateServiceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .valid_identifier("InComputePool", &self.in_compute_pool)
            .scope("Specification", |v| self.specification.validate(v))
            .valid_identifiers("ExternalAccessIntegrations", &self.external_access_integrations)
            .valid_identifier_if_set("QueryWarehouse", self.query_warehouse.as_ref());
        validate_instances(&mut v, self.min_instances, self.min_ready_instances, self.max_instances);
        validate_tags(&mut v, "Tag", &self.tags);
        v.finish()
    }
}

/// Checks instance bounds shared by CREATE and ALTER.
fn validate_instances(
    v: &mut Validator,
    min_instances: Option<u32>,
    min_ready_instances: Option<u32>,
    max_instances: Option<u32>,
) {
    v.int_greater_than("MinInstances", min_instances, 0)
        .int_greater_than("MaxInstances", max_instances, 0)
        .int_greater_or_equal_field("MaxInstances", max_instances, "MinInstances", min_instances)
        .int_greater_or_equal_field("MinInstances", min_instances, "MinReadyInstances", min_ready_instances);
}

/// `EXECUTE JOB SERVICE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteJobServiceOptions {
    /// Compute pool running the job.
    pub in_compute_pool: AccountObjectIdentifier,
    /// Job service name.
    pub name: SchemaObjectIdentifier,
    /// Return immediately instead of waiting for completion.
    pub async_execution: Option<bool>,
    /// Warehouse for queries issued by the job.
    pub query_warehouse: Option<AccountObjectIdentifier>,
    /// Comment.
    pub comment: Option<String>,
    /// External access integrations.
    pub external_access_integrations: Vec<AccountObjectIdentifier>,
    /// Container specification.
    pub specification: ServiceSpecification,
}

impl Render for ExecuteJobServiceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("EXECUTE JOB SERVICE")
            .identifier_with("IN COMPUTE POOL", Some(&self.in_compute_pool))
            .identifier_assigned("NAME", Some(&self.name))
            .parameter("ASYNC", self.async_execution.as_ref(), Encoding::PLAIN)
            .identifier_assigned("QUERY_WAREHOUSE", self.query_warehouse.as_ref())
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES)
            .list(
                Some("EXTERNAL_ACCESS_INTEGRATIONS"),
                &self.external_access_integrations,
                ListOptions::ASSIGNED_PARENTHESES,
            )
            .nested(Some(&self.specification));
    }
}

impl Statement for ExecuteJobServiceOptions {
    const OPERATION: &'static str = "ExecuteJobServiceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("InComputePool", &self.in_compute_pool)
            .valid_identifier("Name", &self.name)
            .valid_identifier_if_set("QueryWarehouse", self.query_warehouse.as_ref())
            .valid_identifiers("ExternalAccessIntegrations", &self.external_access_integrations)
            .scope("Specification", |v| self.specification.validate(v));
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER SERVICE ... SET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSet {
    /// Minimum instance count.
    pub min_instances: Option<u32>,
    /// Maximum instance count.
    pub max_instances: Option<u32>,
    /// Idle seconds before automatic suspension.
    pub auto_suspend_secs: Option<u32>,
    /// Instances that must be ready.
    pub min_ready_instances: Option<u32>,
    /// Warehouse for queries issued by the service.
    pub query_warehouse: Option<AccountObjectIdentifier>,
    /// Resume automatically when called.
    pub auto_resume: Option<bool>,
    /// External access integrations.
    pub external_access_integrations: Vec<AccountObjectIdentifier>,
    /// Comment.
    pub comment: Option<String>,
}

impl Render for ServiceSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .parameter("MIN_INSTANCES", self.min_instances.as_ref(), Encoding::PLAIN)
            .parameter("MAX_INSTANCES", self.max_instances.as_ref(), Encoding::PLAIN)
            .parameter("AUTO_SUSPEND_SECS", self.auto_suspend_secs.as_ref(), Encoding::PLAIN)
            .parameter("MIN_READY_INSTANCES", self.min_ready_instances.as_ref(), Encoding::PLAIN)
            .identifier_assigned("QUERY_WAREHOUSE", self.query_warehouse.as_ref())
            .parameter("AUTO_RESUME", self.auto_resume.as_ref(), Encoding::PLAIN)
            .list(
                Some("EXTERNAL_ACCESS_INTEGRATIONS"),
                &self.external_access_integrations,
                ListOptions::ASSIGNED_PARENTHESES,
            )
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

/// `ALTER SERVICE ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceUnset {
    /// Reset `MIN_INSTANCES`.
    pub min_instances: bool,
    /// Reset `AUTO_SUSPEND_SECS`.
    pub auto_suspend_secs: bool,
    /// Reset `MAX_INSTANCES`.
    pub max_instances: bool,
    /// Reset `MIN_READY_INSTANCES`.
    pub min_ready_instances: bool,
    /// Reset `QUERY_WAREHOUSE`.
    pub query_warehouse: bool,
    /// Reset `AUTO_RESUME`.
    pub auto_resume: bool,
    /// Reset `EXTERNAL_ACCESS_INTEGRATIONS`.
    pub external_access_integrations: bool,
    /// Remove the comment.
    pub comment: bool,
}

impl Render for ServiceUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.min_instances, "MIN_INSTANCES")
                .keyword(self.auto_suspend_secs, "AUTO_SUSPEND_SECS")
                .keyword(self.max_instances, "MAX_INSTANCES")
                .keyword(self.min_ready_instances, "MIN_READY_INSTANCES")
                .keyword(self.query_warehouse, "QUERY_WAREHOUSE")
                .keyword(self.auto_resume, "AUTO_RESUME")
                .keyword(self.external_access_integrations, "EXTERNAL_ACCESS_INTEGRATIONS")
                .keyword(self.comment, "COMMENT");
        });
    }
}

/// `RESTORE VOLUME <volume> INSTANCES <n, ...> FROM SNAPSHOT <snapshot>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRestore {
    /// Volume name from the specification.
    pub volume: String,
    /// Instance indexes to restore.
    pub instances: Vec<u32>,
    /// Snapshot to restore from.
    pub from_snapshot: SchemaObjectIdentifier,
}

impl Render for ServiceRestore {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.parameter("RESTORE VOLUME", Some(&self.volume), Encoding::DOUBLE_QUOTES.no_equals())
            .list(Some("INSTANCES"), &self.instances, ListOptions::COMMA)
            .identifier_with("FROM SNAPSHOT", Some(&self.from_snapshot));
    }
}

/// Action of an `ALTER SERVICE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterServiceAction {
    /// `RESUME`.
    Resume,
    /// `SUSPEND`.
    Suspend,
    /// Replace the specification.
    FromSpecification(ServiceSpecification),
    /// Restore block volumes from a snapshot.
    Restore(ServiceRestore),
    /// `SET ...`.
    Set(ServiceSet),
    /// `UNSET ...`.
    Unset(ServiceUnset),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
}

/// `ALTER SERVICE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterServiceOptions {
    /// Skip when the service does not exist.
    pub if_exists: bool,
    /// Service name.
    pub name: SchemaObjectIdentifier,
    /// Action to apply.
    pub action: AlterServiceAction,
}

impl Render for AlterServiceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER SERVICE").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterServiceAction::Resume => {
                sql.static_keyword("RESUME");
            }
            AlterServiceAction::Suspend => {
                sql.static_keyword("SUSPEND");
            }
            AlterServiceAction::FromSpecification(specification) => {
                sql.nested(Some(specification));
            }
            AlterServiceAction::Restore(restore) => {
                sql.nested(Some(restore));
            }
            AlterServiceAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterServiceAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterServiceAction::SetTags(tags) => set_tags(sql, tags),
            AlterServiceAction::UnsetTags(tags) => unset_tags(sql, tags),
        }
    }
}

impl Statement for AlterServiceOptions {
    const OPERATION: &'static str = "AlterServiceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterServiceAction::Resume | AlterServiceAction::Suspend => {}
            AlterServiceAction::FromSpecification(specification) => {
                v.scope("FromSpecification", |v| specification.validate(v));
            }
            AlterServiceAction::Restore(restore) => {
                v.scope("Restore", |v| {
                    v.required("Volume", &restore.volume)
                        .required("Instances", &restore.instances)
                        .valid_identifier("FromSnapshot", &restore.from_snapshot);
                });
            }
            AlterServiceAction::Set(set) => {
                v.scope("Set", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("MinInstances", set.min_instances.is_some()),
                            ("MaxInstances", set.max_instances.is_some()),
                            ("AutoSuspendSecs", set.auto_suspend_secs.is_some()),
                            ("MinReadyInstances", set.min_ready_instances.is_some()),
                            ("QueryWarehouse", set.query_warehouse.is_some()),
                            ("AutoResume", set.auto_resume.is_some()),
                            ("ExternalAccessIntegrations", !set.external_access_integrations.is_empty()),
                            ("Comment", set.comment.is_some()),
                        ],
                    )
                    .valid_identifier_if_set("QueryWarehouse", set.query_warehouse.as_ref())
                    .valid_identifiers("ExternalAccessIntegrations", &set.external_access_integrations);
                    validate_instances(v, set.min_instances, set.min_ready_instances, set.max_instances);
                });
            }
            AlterServiceAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("MinInstances", unset.min_instances),
                            ("AutoSuspendSecs", unset.auto_suspend_secs),
                            ("MaxInstances", unset.max_instances),
                            ("MinReadyInstances", unset.min_ready_instances),
                            ("QueryWarehouse", unset.query_warehouse),
                            ("AutoResume", unset.auto_resume),
                            ("ExternalAccessIntegrations", unset.external_access_integrations),
                            ("Comment", unset.comment),
                        ],
                    );
                });
            }
            AlterServiceAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterServiceAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe
// ============================================================================

/// `DROP SERVICE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropServiceOptions {
    /// Skip when the service does not exist.
    pub if_exists: bool,
    /// Service name.
    pub name: SchemaObjectIdentifier,
    /// Drop even when block volumes are attached.
    pub force: bool,
}

impl Render for DropServiceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP SERVICE")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.name)
            .keyword(self.force, "FORCE");
    }
}

impl Statement for DropServiceOptions {
    const OPERATION: &'static str = "DropServiceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE SERVICE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeServiceOptions {
    /// Service name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DescribeServiceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE SERVICE").identifier(&self.name);
    }
}

impl Statement for DescribeServiceOptions {
    const OPERATION: &'static str = "DescribeServiceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW [JOB] SERVICES` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowServiceOptions {
    /// List job services only.
    pub job: bool,
    /// Exclude job services.
    pub exclude_jobs: bool,
    /// Name filter.
    pub like: Option<Like>,
    /// Scope.
    pub in_scope: Option<ServiceIn>,
    /// Name prefix filter.
    pub starts_with: Option<String>,
    /// Pagination.
    pub limit: Option<LimitFrom>,
}

impl Render for ShowServiceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW")
            .keyword(self.job, "JOB")
            .static_keyword("SERVICES")
            .keyword(self.exclude_jobs, "EXCLUDE JOBS")
            .nested(self.like.as_ref())
            .nested(self.in_scope.as_ref());
        starts_with(sql, self.starts_with.as_ref());
        sql.nested(self.limit.as_ref());
    }
}

impl Statement for ShowServiceOptions {
    const OPERATION: &'static str = "ShowServiceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.conflicting(("Job", self.job), ("ExcludeJobs", self.exclude_jobs));
        match &self.in_scope {
            Some(ServiceIn::Database(id) | ServiceIn::ComputePool(id)) => {
                v.valid_identifier("In", id);
            }
            Some(ServiceIn::Schema(id)) => {
                v.valid_identifier("In", id);
            }
            Some(ServiceIn::Account) | None => {}
        }
        v.finish()
    }
}

/// Raw `SHOW SERVICES` / `DESCRIBE SERVICE` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRow {
    /// Name.
    pub name: Option<String>,
    /// Status.
    pub status: Option<String>,
    /// Database.
    pub database_name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Compute pool.
    pub compute_pool: Option<String>,
    /// DNS name.
    pub dns_name: Option<String>,
    /// Running instances.
    pub current_instances: Option<u32>,
    /// Target instances.
    pub target_instances: Option<u32>,
    /// Minimum ready instances.
    pub min_ready_instances: Option<u32>,
    /// Minimum instances.
    pub min_instances: Option<u32>,
    /// Maximum instances.
    pub max_instances: Option<u32>,
    /// Auto-resume flag.
    pub auto_resume: Option<bool>,
    /// External access integrations as a JSON array.
    pub external_access_integrations: Option<String>,
    /// Creation time.
    pub created_on: Option<String>,
    /// Update time.
    pub updated_on: Option<String>,
    /// Resume time.
    pub resumed_on: Option<String>,
    /// Suspend time.
    pub suspended_on: Option<String>,
    /// Auto-suspend seconds.
    pub auto_suspend_secs: Option<u32>,
    /// Comment.
    pub comment: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Query warehouse.
    pub query_warehouse: Option<String>,
    /// Job service flag.
    pub is_job: Option<bool>,
    /// Asynchronous job flag.
    pub is_async_job: Option<bool>,
    /// Specification digest.
    pub spec_digest: Option<String>,
    /// Upgrade in progress.
    pub is_upgrading: Option<bool>,
    /// Specification text, returned by DESCRIBE only.
    pub spec: Option<String>,
}

/// Decoded service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Name.
    pub name: String,
    /// Database.
    pub database_name: String,
    /// Schema.
    pub schema_name: String,
    /// Status.
    pub status: Option<ServiceStatus>,
    /// Owner role.
    pub owner: Option<String>,
    /// Compute pool.
    pub compute_pool: AccountObjectIdentifier,
    /// DNS name.
    pub dns_name: Option<String>,
    /// Running instances.
    pub current_instances: Option<u32>,
    /// Target instances.
    pub target_instances: Option<u32>,
    /// Minimum ready instances.
    pub min_ready_instances: Option<u32>,
    /// Minimum instances.
    pub min_instances: Option<u32>,
    /// Maximum instances.
    pub max_instances: Option<u32>,
    /// Auto-resume flag.
    pub auto_resume: bool,
    /// External access integrations.
    pub external_access_integrations: Vec<AccountObjectIdentifier>,
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Update time.
    pub updated_on: Option<OffsetDateTime>,
    /// Resume time.
    pub resumed_on: Option<OffsetDateTime>,
    /// Suspend time.
    pub suspended_on: Option<OffsetDateTime>,
    /// Auto-suspend seconds.
    pub auto_suspend_secs: Option<u32>,
    /// Comment.
    pub comment: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Query warehouse.
    pub query_warehouse: Option<AccountObjectIdentifier>,
    /// Service or job service.
    pub service_type: ServiceType,
    /// Asynchronous job flag.
    pub is_async_job: bool,
    /// Specification digest.
    pub spec_digest: Option<String>,
    /// Upgrade in progress.
    pub is_upgrading: bool,
    /// Specification text, set by DESCRIBE only.
    pub spec: Option<String>,
}

impl Service {
    /// Returns the service identifier.
    #[must_use]
    pub fn id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.name)
    }
}

impl TryFrom<ServiceRow> for Service {
    type Error = DecodeError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "ServiceRow";
        let external_access_integrations = lenient(
            ROW,
            "external_access_integrations",
            row.external_access_integrations.as_deref(),
            |raw| {
                json_string_list(raw)
                    .map_err(|err| err.to_string())?
                    .iter()
                    .map(|name| name.parse::<AccountObjectIdentifier>().map_err(|err| err.to_string()))
                    .collect::<Result<Vec<_>, String>>()
            },
        )
        .unwrap_or_default();
        let is_job = row.is_job.unwrap_or(false);
        Ok(Self {
            name: required(ROW, "name", row.name.as_deref(), text)?,
            database_name: required(ROW, "database_name", row.database_name.as_deref(), text)?,
            schema_name: required(ROW, "schema_name", row.schema_name.as_deref(), text)?,
            status: lenient(ROW, "status", row.status.as_deref(), ServiceStatus::parse),
            owner: non_empty(row.owner.as_deref()),
            compute_pool: required(ROW, "compute_pool", row.compute_pool.as_deref(), str::parse)?,
            dns_name: non_empty(row.dns_name.as_deref()),
            current_instances: row.current_instances,
            target_instances: row.target_instances,
            min_ready_instances: row.min_ready_instances,
            min_instances: row.min_instances,
            max_instances: row.max_instances,
            auto_resume: row.auto_resume.unwrap_or(false),
            external_access_integrations,
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            updated_on: timestamp(ROW, "updated_on", row.updated_on.as_deref()),
            resumed_on: timestamp(ROW, "resumed_on", row.resumed_on.as_deref()),
            suspended_on: timestamp(ROW, "suspended_on", row.suspended_on.as_deref()),
            auto_suspend_secs: row.auto_suspend_secs,
            comment: non_empty(row.comment.as_deref()),
            owner_role_type: non_empty(row.owner_role_type.as_deref()),
            query_warehouse: lenient(ROW, "query_warehouse", row.query_warehouse.as_deref(), str::parse),
            service_type: if is_job { ServiceType::JobService } else { ServiceType::Service },
            is_async_job: row.is_async_job.unwrap_or(false),
            spec_digest: non_empty(row.spec_digest.as_deref()),
            is_upgrading: row.is_upgrading.unwrap_or(false),
            spec: non_empty(row.spec.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Service operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Services<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> Services<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreateServiceOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Runs a job service.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn execute_job(
        &self,
        ctx: &RequestContext,
        options: &ExecuteJobServiceOptions,
    ) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters a service.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterServiceOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a service.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropServiceOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a service, treating a missing service as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing service.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<(), SdkError> {
        let options = DropServiceOptions {
            if_exists: false,
            name: id.clone(),
            force: false,
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists services.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(&self, ctx: &RequestContext, options: &ShowServiceOptions) -> Result<Vec<Service>, SdkError> {
        self.client.query_as::<_, ServiceRow, Service>(ctx, options).await
    }

    /// Returns the service identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no service matches.
    pub async fn show_by_id(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Service, SdkError> {
        let options = ShowServiceOptions {
            like: Some(Like::new(id.name())),
            in_scope: Some(ServiceIn::Schema(id.schema_id())),
            ..ShowServiceOptions::default()
        };
        let services = self.show(ctx, &options).await?;
        find_by_id(services, "service", id, |service| service.id() == *id)
    }

    /// Like [`Self::show_by_id`], with driver missing-object errors reported
    /// as [`SdkError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] or other failures.
    pub async fn show_by_id_safely(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifier,
    ) -> Result<Service, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "service", id)
    }

    /// Describes a service, including its specification.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<Service, SdkError> {
        let options = DescribeServiceOptions {
            name: id.clone(),
        };
        let row: ServiceRow = self.client.query_one(ctx, &options).await?;
        Ok(Service::try_from(row)?)
    }
}

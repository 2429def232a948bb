// crates/snowflake-ddl/src/objects/compute_pools.rs
// ============================================================================
// Module: Compute Pools
// Description: CREATE / ALTER / DROP / SHOW / DESCRIBE COMPUTE POOL grammars.
// Purpose: Manage Snowpark Container Services compute pools.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Compute pools are account-level objects. Node counts are validated
//! before rendering: both must be positive and `MAX_NODES` may not be
//! lower than `MIN_NODES`.

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
    /// Machine type of compute pool nodes.
    pub enum ComputePoolInstanceFamily: "compute pool instance family" {
        /// Extra small CPU.
        CpuX64Xs => "CPU_X64_XS",
        /// Small CPU.
        CpuX64S => "CPU_X64_S",
        /// Medium CPU.
        CpuX64M => "CPU_X64_M",
        /// Large CPU.
        CpuX64L => "CPU_X64_L",
        /// Small high-memory CPU.
        HighMemX64S => "HIGHMEM_X64_S",
        /// Medium high-memory CPU.
        HighMemX64M => "HIGHMEM_X64_M",
        /// Large high-memory CPU.
        HighMemX64L => "HIGHMEM_X64_L",
        /// Small NVIDIA GPU.
        GpuNvS => "GPU_NV_S",
        /// Medium NVIDIA GPU.
        GpuNvM => "GPU_NV_M",
        /// Large NVIDIA GPU.
        GpuNvL => "GPU_NV_L",
    }
}

sql_enum! {
    /// Lifecycle state of a compute pool.
    pub enum ComputePoolState: "compute pool state" {
        /// Running with no services.
        Idle => "IDLE",
        /// Running services.
        Active => "ACTIVE",
        /// Suspended.
        Suspended => "SUSPENDED",
        /// Starting nodes.
        Starting => "STARTING",
        /// Stopping nodes.
        Stopping => "STOPPING",
        /// Changing node count.
        Resizing => "RESIZING",
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

/// `CREATE COMPUTE POOL` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateComputePoolOptions {
    /// Skip when the pool already exists.
    pub if_not_exists: bool,
    /// Pool name.
    pub name: AccountObjectIdentifier,
    /// Native application the pool is created for.
    pub for_application: Option<AccountObjectIdentifier>,
    /// Minimum node count.
    pub min_nodes: u32,
    /// Maximum node count.
    pub max_nodes: u32,
    /// Node machine type.
    pub instance_family: ComputePoolInstanceFamily,
    /// Resume automatically when a service is submitted.
    pub auto_resume: Option<bool>,
    /// Create in the suspended state.
    pub initially_suspended: Option<bool>,
    /// Idle seconds before automatic suspension.
    pub auto_suspend_secs: Option<u32>,
    /// Tags attached on creation.
    pub tags: Vec<TagAssociation>,
    /// Comment.
    pub comment: Option<String>,
}

impl CreateComputePoolOptions {
    /// Creates options with the required fields.
    #[must_use]
    pub const fn new(
        name: AccountObjectIdentifier,
        min_nodes: u32,
        max_nodes: u32,
        instance_family: ComputePoolInstanceFamily,
    ) -> Self {
        Self {
            if_not_exists: false,
            name,
            for_application: None,
            min_nodes,
            max_nodes,
            instance_family,
            auto_resume: None,
            initially_suspended: None,
            auto_suspend_secs: None,
            tags: Vec::new(),
            comment: None,
        }
    }
}

impl Render for CreateComputePoolOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE COMPUTE POOL")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name)
            .identifier_with("FOR APPLICATION", self.for_application.as_ref())
            .parameter("MIN_NODES", Some(&self.min_nodes), Encoding::PLAIN)
            .parameter("MAX_NODES", Some(&self.max_nodes), Encoding::PLAIN)
            .parameter("INSTANCE_FAMILY", Some(&self.instance_family), Encoding::PLAIN)
            .parameter("AUTO_RESUME", self.auto_resume.as_ref(), Encoding::PLAIN)
            .parameter("INITIALLY_SUSPENDED", self.initially_suspended.as_ref(), Encoding::PLAIN)
            .parameter("AUTO_SUSPEND_SECS", self.auto_suspend_secs.as_ref(), Encoding::PLAIN);
        with_tags(sql, "TAG", &self.tags);
        sql.parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

impl Statement for CreateComputePoolOptions {
    const OPERATION: &'static str = "CreateComputePoolOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .valid_identifier_if_set("ForApplication", self.for_application.as_ref())
            .int_greater_than("MinNodes", Some(self.min_nodes), 0)
            .int_greater_than("MaxNodes", Some(self.max_nodes), 0)
            .int_greater_or_equal_field(
                "MaxNodes",
                Some(self.max_nodes),
                "MinNodes",
                Some(self.min_nodes),
            );
        validate_tags(&mut v, "Tag", &self.tags);
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER COMPUTE POOL ... SET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputePoolSet {
    /// Minimum node count.
    pub min_nodes: Option<u32>,
    /// Maximum node count.
    pub max_nodes: Option<u32>,
    /// Resume automatically when a service is submitted.
    pub auto_resume: Option<bool>,
    /// Idle seconds before automatic suspension.
    pub auto_suspend_secs: Option<u32>,
    /// Comment.
    pub comment: Option<String>,
}

impl Render for ComputePoolSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .parameter("MIN_NODES", self.min_nodes.as_ref(), Encoding::PLAIN)
            .parameter("MAX_NODES", self.max_nodes.as_ref(), Encoding::PLAIN)
            .parameter("AUTO_RESUME", self.auto_resume.as_ref(), Encoding::PLAIN)
            .parameter("AUTO_SUSPEND_SECS", self.auto_suspend_secs.as_ref(), Encoding::PLAIN)
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

/// `ALTER COMPUTE POOL ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputePoolUnset {
    /// Reset `AUTO_RESUME`.
    pub auto_resume: bool,
    /// Reset `AUTO_SUSPEND_SECS`.
    pub auto_suspend_secs: bool,
    /// Remove the comment.
    pub comment: bool,
}

impl Render for ComputePoolUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.auto_resume, "AUTO_RESUME")
                .keyword(self.auto_suspend_secs, "AUTO_SUSPEND_SECS")
                .keyword(self.comment, "COMMENT");
        });
    }
}

/// Action of an `ALTER COMPUTE POOL` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterComputePoolAction {
    /// `RESUME`.
    Resume,
    /// `SUSPEND`.
    Suspend,
    /// `STOP ALL`: stop every service on the pool.
    StopAll,
    /// `SET ...`.
    Set(ComputePoolSet),
    /// `UNSET ...`.
    Unset(ComputePoolUnset),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
}

/// `ALTER COMPUTE POOL` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterComputePoolOptions {
    /// Skip when the pool does not exist.
    pub if_exists: bool,
    /// Pool name.
    pub name: AccountObjectIdentifier,
    /// Action to apply.
    pub action: AlterComputePoolAction,
}

impl Render for AlterComputePoolOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER COMPUTE POOL").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterComputePoolAction::Resume => {
                sql.static_keyword("RESUME");
            }
            AlterComputePoolAction::Suspend => {
                sql.static_keyword("SUSPEND");
            }
            AlterComputePoolAction::StopAll => {
                sql.static_keyword("STOP ALL");
            }
            AlterComputePoolAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterComputePoolAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterComputePoolAction::SetTags(tags) => set_tags(sql, tags),
            AlterComputePoolAction::UnsetTags(tags) => unset_tags(sql, tags),
        }
    }
}

impl Statement for AlterComputePoolOptions {
    const OPERATION: &'static str = "AlterComputePoolOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterComputePoolAction::Resume
            | AlterComputePoolAction::Suspend
            | AlterComputePoolAction::StopAll => {}
            AlterComputePoolAction::Set(set) => {
                v.scope("Set", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("MinNodes", set.min_nodes.is_some()),
                            ("MaxNodes", set.max_nodes.is_some()),
                            ("AutoResume", set.auto_resume.is_some()),
                            ("AutoSuspendSecs", set.auto_suspend_secs.is_some()),
                            ("Comment", set.comment.is_some()),
                        ],
                    )
                    .int_greater_than("MinNodes", set.min_nodes, 0)
                    .int_greater_than("MaxNodes", set.max_nodes, 0)
                    .int_greater_or_equal_field("MaxNodes", set.max_nodes, "MinNodes", set.min_nodes);
                });
            }
            AlterComputePoolAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("AutoResume", unset.auto_resume),
                            ("AutoSuspendSecs", unset.auto_suspend_secs),
                            ("Comment", unset.comment),
                        ],
                    );
                });
            }
            AlterComputePoolAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterComputePoolAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe
// ============================================================================

/// `DROP COMPUTE POOL` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropComputePoolOptions {
    /// Skip when the pool does not exist.
    pub if_exists: bool,
    /// Pool name.
    pub name: AccountObjectIdentifier,
}

impl Render for DropComputePoolOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP COMPUTE POOL").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropComputePoolOptions {
    const OPERATION: &'static str = "DropComputePoolOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE COMPUTE POOL` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeComputePoolOptions {
    /// Pool name.
    pub name: AccountObjectIdentifier,
}

impl Render for DescribeComputePoolOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE COMPUTE POOL").identifier(&self.name);
    }
}

impl Statement for DescribeComputePoolOptions {
    const OPERATION: &'static str = "DescribeComputePoolOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW COMPUTE POOLS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowComputePoolOptions {
    /// Name filter.
    pub like: Option<Like>,
    /// Name prefix filter.
    pub starts_with: Option<String>,
    /// Pagination.
    pub limit: Option<LimitFrom>,
}

impl Render for ShowComputePoolOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW COMPUTE POOLS").nested(self.like.as_ref());
        starts_with(sql, self.starts_with.as_ref());
        sql.nested(self.limit.as_ref());
    }
}

impl Statement for ShowComputePoolOptions {
    const OPERATION: &'static str = "ShowComputePoolOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Raw `SHOW` / `DESCRIBE COMPUTE POOL` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComputePoolRow {
    /// Name.
    pub name: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Minimum nodes.
    pub min_nodes: Option<u32>,
    /// Maximum nodes.
    pub max_nodes: Option<u32>,
    /// Instance family.
    pub instance_family: Option<String>,
    /// Services running on the pool.
    pub num_services: Option<u32>,
    /// Jobs running on the pool.
    pub num_jobs: Option<u32>,
    /// Auto-suspend seconds.
    pub auto_suspend_secs: Option<u32>,
    /// Auto-resume flag.
    pub auto_resume: Option<bool>,
    /// Active nodes.
    pub active_nodes: Option<u32>,
    /// Idle nodes.
    pub idle_nodes: Option<u32>,
    /// Target nodes.
    pub target_nodes: Option<u32>,
    /// Creation time.
    pub created_on: Option<String>,
    /// Resume time.
    pub resumed_on: Option<String>,
    /// Update time.
    pub updated_on: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Exclusive to an application.
    pub is_exclusive: Option<bool>,
    /// Owning application.
    pub application: Option<String>,
}

/// Decoded compute pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputePool {
    /// Name.
    pub name: String,
    /// State.
    pub state: Option<ComputePoolState>,
    /// Minimum nodes.
    pub min_nodes: Option<u32>,
    /// Maximum nodes.
    pub max_nodes: Option<u32>,
    /// Instance family.
    pub instance_family: Option<ComputePoolInstanceFamily>,
    /// Services running on the pool.
    pub num_services: Option<u32>,
    /// Jobs running on the pool.
    pub num_jobs: Option<u32>,
    /// Auto-suspend seconds.
    pub auto_suspend_secs: Option<u32>,
    /// Auto-resume flag.
    pub auto_resume: bool,
    /// Active nodes.
    pub active_nodes: Option<u32>,
    /// Idle nodes.
    pub idle_nodes: Option<u32>,
    /// Target nodes.
    pub target_nodes: Option<u32>,
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Resume time.
    pub resumed_on: Option<OffsetDateTime>,
    /// Update time.
    pub updated_on: Option<OffsetDateTime>,
    /// Owner role.
    pub owner: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Exclusive to an application.
    pub is_exclusive: bool,
    /// Owning application.
    pub application: Option<AccountObjectIdentifier>,
}

impl ComputePool {
    /// Returns the pool identifier.
    #[must_use]
    pub fn id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(&self.name)
    }
}

impl TryFrom<ComputePoolRow> for ComputePool {
    type Error = DecodeError;

    fn try_from(row: ComputePoolRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "ComputePoolRow";
        Ok(Self {
            name: required(ROW, "name", row.name.as_deref(), text)?,
            state: lenient(ROW, "state", row.state.as_deref(), ComputePoolState::parse),
            min_nodes: row.min_nodes,
            max_nodes: row.max_nodes,
            instance_family: lenient(
                ROW,
                "instance_family",
                row.instance_family.as_deref(),
                ComputePoolInstanceFamily::parse,
            ),
            num_services: row.num_services,
            num_jobs: row.num_jobs,
            auto_suspend_secs: row.auto_suspend_secs,
            auto_resume: row.auto_resume.unwrap_or(false),
            active_nodes: row.active_nodes,
            idle_nodes: row.idle_nodes,
            target_nodes: row.target_nodes,
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            resumed_on: timestamp(ROW, "resumed_on", row.resumed_on.as_deref()),
            updated_on: timestamp(ROW, "updated_on", row.updated_on.as_deref()),
            owner: non_empty(row.owner.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            is_exclusive: row.is_exclusive.unwrap_or(false),
            application: lenient(ROW, "application", row.application.as_deref(), str::parse),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Compute pool operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct ComputePools<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> ComputePools<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates a compute pool.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreateComputePoolOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters a compute pool.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterComputePoolOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a compute pool.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropComputePoolOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a compute pool, treating a missing pool as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing pool.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<(), SdkError> {
        let options = DropComputePoolOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists compute pools.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn show(
        &self,
        ctx: &RequestContext,
        options: &ShowComputePoolOptions,
    ) -> Result<Vec<ComputePool>, SdkError> {
        self.client.query_as::<_, ComputePoolRow, ComputePool>(ctx, options).await
    }

    /// Returns the compute pool named `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no pool matches.
    pub async fn show_by_id(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<ComputePool, SdkError> {
        let options = ShowComputePoolOptions {
            like: Some(Like::new(id.name())),
            ..ShowComputePoolOptions::default()
        };
        let pools = self.show(ctx, &options).await?;
        find_by_id(pools, "compute pool", id, |pool| pool.id() == *id)
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
        id: &AccountObjectIdentifier,
    ) -> Result<ComputePool, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "compute pool", id)
    }

    /// Describes a compute pool.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<ComputePool, SdkError> {
        let options = DescribeComputePoolOptions {
            name: id.clone(),
        };
        let row: ComputePoolRow = self.client.query_one(ctx, &options).await?;
        Ok(ComputePool::try_from(row)?)
    }
}

// crates/snowflake-ddl/src/objects/grants.rs
// ============================================================================
// Module: Grants
// Description: GRANT OWNERSHIP, GRANT / REVOKE privileges, and SHOW GRANTS.
// Purpose: Manage access control, routing stateful transfers to orchestrators.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Grant targets name a securable through [`GrantOn`]: a single object, all
//! objects of a kind in a container, or future objects of a kind. Ownership
//! transfers of pipes and tasks are routed through the ownership
//! orchestrator; every other transfer is a single statement.

use serde::Deserialize;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DatabaseObjectIdentifier;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::Rule;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SchemaObjectIdentifierWithArguments;
use snowflake_ddl_core::SqlBuilder;
use snowflake_ddl_core::Statement;
use snowflake_ddl_core::ValidationErrors;
use snowflake_ddl_core::Validator;
use snowflake_ddl_core::decode::lenient;
use snowflake_ddl_core::decode::non_empty;
use snowflake_ddl_core::decode::required;
use snowflake_ddl_core::decode::strip_grantee_prefix;
use snowflake_ddl_core::decode::timestamp;
use snowflake_ddl_core::sql::ListOptions;
use snowflake_ddl_core::sql_enum;
use time::OffsetDateTime;

use crate::client::Client;
use crate::error::SdkError;
use crate::objects::common::ObjectType;
use crate::ownership;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

sql_enum! {
    /// Treatment of existing grants when ownership moves.
    pub enum OutboundPrivileges: "outbound privileges" {
        /// Keep existing grants.
        Copy => "COPY",
        /// Drop existing grants.
        Revoke => "REVOKE",
    }
}

sql_enum! {
    /// Behavior of a revoke on dependent grants.
    pub enum RevokeBehavior: "revoke behavior" {
        /// Fail when dependent grants exist.
        Restrict => "RESTRICT",
        /// Revoke dependent grants too.
        Cascade => "CASCADE",
    }
}

// ============================================================================
// SECTION: Targets
// ============================================================================

/// Identifier of a securable of any nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectName {
    /// Account-level object.
    Account(AccountObjectIdentifier),
    /// Database-level object.
    Database(DatabaseObjectIdentifier),
    /// Schema-level object.
    Schema(SchemaObjectIdentifier),
    /// Overloadable callable.
    Callable(SchemaObjectIdentifierWithArguments),
}

impl ObjectName {
    /// Returns the quoted, dotted identifier.
    #[must_use]
    pub fn fully_qualified_name(&self) -> String {
        match self {
            Self::Account(id) => id.fully_qualified_name(),
            Self::Database(id) => id.fully_qualified_name(),
            Self::Schema(id) => id.fully_qualified_name(),
            Self::Callable(id) => id.fully_qualified_name(),
        }
    }

    /// Returns whether the wrapped identifier is valid.
    fn is_valid(&self) -> bool {
        match self {
            Self::Account(id) => id.is_valid(),
            Self::Database(id) => id.is_valid(),
            Self::Schema(id) => id.is_valid(),
            Self::Callable(id) => id.is_valid(),
        }
    }
}

impl Render for ObjectName {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::Account(id) => sql.identifier(id),
            Self::Database(id) => sql.identifier(id),
            Self::Schema(id) => sql.identifier(id),
            Self::Callable(id) => sql.identifier(id),
        };
    }
}

/// Container of a bulk grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkScope {
    /// `IN DATABASE <db>`.
    Database(AccountObjectIdentifier),
    /// `IN SCHEMA <db>.<schema>`.
    Schema(DatabaseObjectIdentifier),
}

impl BulkScope {
    /// Returns the quoted container identifier.
    #[must_use]
    pub fn fully_qualified_name(&self) -> String {
        match self {
            Self::Database(id) => id.fully_qualified_name(),
            Self::Schema(id) => id.fully_qualified_name(),
        }
    }

    /// Returns whether the container identifier is valid.
    fn is_valid(&self) -> bool {
        match self {
            Self::Database(id) => id.is_valid(),
            Self::Schema(id) => id.is_valid(),
        }
    }
}

impl Render for BulkScope {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::Database(id) => sql.identifier_with("IN DATABASE", Some(id)),
            Self::Schema(id) => sql.identifier_with("IN SCHEMA", Some(id)),
        };
    }
}

/// Securable named by a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOn {
    /// The current account.
    Account,
    /// `<TYPE> <name>`.
    Object {
        /// Object kind.
        object_type: ObjectType,
        /// Object identifier.
        name: ObjectName,
    },
    /// `ALL <TYPES> IN ...`.
    All {
        /// Object kind.
        object_type: ObjectType,
        /// Container.
        scope: BulkScope,
    },
    /// `FUTURE <TYPES> IN ...`.
    Future {
        /// Object kind.
        object_type: ObjectType,
        /// Container.
        scope: BulkScope,
    },
}

impl Render for GrantOn {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ON");
        match self {
            Self::Account => {
                sql.static_keyword("ACCOUNT");
            }
            Self::Object {
                object_type,
                name,
            } => {
                sql.keyword_value(Some(object_type)).nested(Some(name));
            }
            Self::All {
                object_type,
                scope,
            } => {
                sql.static_keyword("ALL").keyword_value(Some(&object_type.plural())).nested(Some(scope));
            }
            Self::Future {
                object_type,
                scope,
            } => {
                sql.static_keyword("FUTURE").keyword_value(Some(&object_type.plural())).nested(Some(scope));
            }
        }
    }
}

impl GrantOn {
    /// Validates the grant target.
    fn validate(&self, v: &mut Validator) {
        match self {
            Self::Account => {}
            Self::Object {
                name, ..
            } => {
                if !name.is_valid() {
                    v.fail("On.Object", Rule::InvalidIdentifier);
                }
            }
            Self::All {
                scope, ..
            }
            | Self::Future {
                scope, ..
            } => {
                if !scope.is_valid() {
                    v.fail("On.Scope", Rule::InvalidIdentifier);
                }
            }
        }
    }
}

/// Recipient of a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    /// `ROLE <role>`.
    Role(AccountObjectIdentifier),
    /// `DATABASE ROLE <db>.<role>`.
    DatabaseRole(DatabaseObjectIdentifier),
}

impl Grantee {
    /// Returns the unqualified role name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Role(id) => id.name(),
            Self::DatabaseRole(id) => id.name(),
        }
    }

    /// Returns whether the grantee identifier is valid.
    fn is_valid(&self) -> bool {
        match self {
            Self::Role(id) => id.is_valid(),
            Self::DatabaseRole(id) => id.is_valid(),
        }
    }
}

impl Render for Grantee {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::Role(id) => sql.identifier_with("ROLE", Some(id)),
            Self::DatabaseRole(id) => sql.identifier_with("DATABASE ROLE", Some(id)),
        };
    }
}

// ============================================================================
// SECTION: Grant Ownership
// ============================================================================

/// `GRANT OWNERSHIP` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOwnershipOptions {
    /// Securable.
    pub on: GrantOn,
    /// New owner.
    pub to: Grantee,
    /// Treatment of existing grants.
    pub current_grants: Option<OutboundPrivileges>,
}

impl Render for GrantOwnershipOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("GRANT OWNERSHIP").nested(Some(&self.on)).static_keyword("TO").nested(Some(&self.to));
        if let Some(current_grants) = self.current_grants {
            sql.keyword_value(Some(&current_grants)).static_keyword("CURRENT GRANTS");
        }
    }
}

impl Statement for GrantOwnershipOptions {
    const OPERATION: &'static str = "GrantOwnershipOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.check(self.on == GrantOn::Account, "On", "ownership of the account cannot be granted");
        if !self.to.is_valid() {
            v.fail("To", Rule::InvalidIdentifier);
        }
        self.on.validate(&mut v);
        v.finish()
    }
}

// ============================================================================
// SECTION: Grant / Revoke Privileges
// ============================================================================

/// Privileges named by a grant or revoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRolePrivileges {
    /// `ALL PRIVILEGES`.
    AllPrivileges,
    /// Explicit privileges such as `USAGE` or `EXECUTE TASK`.
    Privileges(Vec<String>),
}

impl Render for AccountRolePrivileges {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::AllPrivileges => {
                sql.static_keyword("ALL PRIVILEGES");
            }
            Self::Privileges(privileges) => {
                let upper: Vec<String> = privileges.iter().map(|privilege| privilege.to_ascii_uppercase()).collect();
                sql.list(None, &upper, ListOptions::COMMA);
            }
        }
    }
}

impl AccountRolePrivileges {
    /// Validates the privilege target.
    fn validate(&self, v: &mut Validator) {
        if let Self::Privileges(privileges) = self {
            v.required("Privileges", privileges).check(
                privileges.iter().any(String::is_empty),
                "Privileges",
                "privilege names must be non-empty",
            );
        }
    }
}

/// `GRANT <privileges> ON ... TO ROLE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantPrivilegesToAccountRoleOptions {
    /// Privileges.
    pub privileges: AccountRolePrivileges,
    /// Securable.
    pub on: GrantOn,
    /// Receiving role.
    pub role: AccountObjectIdentifier,
    /// Allow the role to re-grant.
    pub with_grant_option: bool,
}

impl Render for GrantPrivilegesToAccountRoleOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("GRANT")
            .nested(Some(&self.privileges))
            .nested(Some(&self.on))
            .identifier_with("TO ROLE", Some(&self.role))
            .keyword(self.with_grant_option, "WITH GRANT OPTION");
    }
}

impl Statement for GrantPrivilegesToAccountRoleOptions {
    const OPERATION: &'static str = "GrantPrivilegesToAccountRoleOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("role", &self.role);
        self.privileges.validate(&mut v);
        self.on.validate(&mut v);
        v.finish()
    }
}

/// `REVOKE <privileges> ON ... FROM ROLE` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokePrivilegesFromAccountRoleOptions {
    /// Revoke only the grant option.
    pub grant_option_for: bool,
    /// Privileges.
    pub privileges: AccountRolePrivileges,
    /// Securable.
    pub on: GrantOn,
    /// Role losing the privileges.
    pub role: AccountObjectIdentifier,
    /// Treatment of dependent grants.
    pub behavior: Option<RevokeBehavior>,
}

impl Render for RevokePrivilegesFromAccountRoleOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("REVOKE")
            .keyword(self.grant_option_for, "GRANT OPTION FOR")
            .nested(Some(&self.privileges))
            .nested(Some(&self.on))
            .identifier_with("FROM ROLE", Some(&self.role))
            .keyword_value(self.behavior.as_ref());
    }
}

impl Statement for RevokePrivilegesFromAccountRoleOptions {
    const OPERATION: &'static str = "RevokePrivilegesFromAccountRoleOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("role", &self.role);
        self.privileges.validate(&mut v);
        self.on.validate(&mut v);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// Subject of a `SHOW GRANTS` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowGrantsTarget {
    /// `ON ACCOUNT`.
    OnAccount,
    /// `ON <TYPE> <name>`.
    On {
        /// Object kind.
        object_type: ObjectType,
        /// Object identifier.
        name: ObjectName,
    },
    /// `TO ROLE <role>`.
    ToRole(AccountObjectIdentifier),
    /// `TO DATABASE ROLE <role>`.
    ToDatabaseRole(DatabaseObjectIdentifier),
    /// `TO USER <user>`.
    ToUser(AccountObjectIdentifier),
    /// `OF ROLE <role>`.
    OfRole(AccountObjectIdentifier),
    /// `FUTURE GRANTS IN ...`.
    FutureIn(BulkScope),
}

impl Render for ShowGrantsTarget {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::OnAccount => {
                sql.static_keyword("ON ACCOUNT");
            }
            Self::On {
                object_type,
                name,
            } => {
                sql.static_keyword("ON").keyword_value(Some(object_type)).nested(Some(name));
            }
            Self::ToRole(id) => {
                sql.identifier_with("TO ROLE", Some(id));
            }
            Self::ToDatabaseRole(id) => {
                sql.identifier_with("TO DATABASE ROLE", Some(id));
            }
            Self::ToUser(id) => {
                sql.identifier_with("TO USER", Some(id));
            }
            Self::OfRole(id) => {
                sql.identifier_with("OF ROLE", Some(id));
            }
            Self::FutureIn(scope) => {
                sql.static_keyword("FUTURE").nested(Some(scope));
            }
        }
    }
}

/// `SHOW GRANTS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowGrantOptions {
    /// Subject; the current user's grants when absent.
    pub target: Option<ShowGrantsTarget>,
}

impl ShowGrantOptions {
    /// Grants on a single object.
    #[must_use]
    pub const fn on(object_type: ObjectType, name: ObjectName) -> Self {
        Self {
            target: Some(ShowGrantsTarget::On {
                object_type,
                name,
            }),
        }
    }
}

impl Render for ShowGrantOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW GRANTS").nested(self.target.as_ref());
    }
}

impl Statement for ShowGrantOptions {
    const OPERATION: &'static str = "ShowGrantOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        match &self.target {
            Some(ShowGrantsTarget::On {
                name, ..
            }) => {
                if !name.is_valid() {
                    v.fail("On", Rule::InvalidIdentifier);
                }
            }
            Some(ShowGrantsTarget::ToRole(id) | ShowGrantsTarget::ToUser(id) | ShowGrantsTarget::OfRole(id)) => {
                v.valid_identifier("Target", id);
            }
            Some(ShowGrantsTarget::ToDatabaseRole(id)) => {
                v.valid_identifier("Target", id);
            }
            Some(ShowGrantsTarget::FutureIn(scope)) => {
                if !scope.is_valid() {
                    v.fail("FutureIn", Rule::InvalidIdentifier);
                }
            }
            Some(ShowGrantsTarget::OnAccount) | None => {}
        }
        v.finish()
    }
}

/// Raw `SHOW GRANTS` row. Future grants report `grant_on` instead of
/// `granted_on`; `OF ROLE` rows report `role`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GrantRow {
    /// Creation time.
    pub created_on: Option<String>,
    /// Privilege name.
    pub privilege: Option<String>,
    /// Object kind of a current grant.
    pub granted_on: Option<String>,
    /// Object kind of a future grant.
    pub grant_on: Option<String>,
    /// Object name.
    pub name: Option<String>,
    /// Grantee kind.
    pub granted_to: Option<String>,
    /// Grantee kind of a future grant.
    pub grant_to: Option<String>,
    /// Grantee name.
    pub grantee_name: Option<String>,
    /// Re-grant flag.
    pub grant_option: Option<String>,
    /// Granting role.
    pub granted_by: Option<String>,
    /// Role granted, for `OF ROLE`.
    pub role: Option<String>,
}

/// Decoded grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Privilege name, such as `OWNERSHIP` or `OPERATE`.
    pub privilege: Option<String>,
    /// Object kind.
    pub granted_on: Option<ObjectType>,
    /// Object name as reported.
    pub name: Option<String>,
    /// Grantee kind, such as `ROLE` or `USER`.
    pub granted_to: Option<String>,
    /// Grantee name with any `USER$` prefix removed.
    pub grantee_name: String,
    /// Re-grant flag.
    pub grant_option: bool,
    /// Granting role.
    pub granted_by: Option<String>,
    /// Role granted, for `OF ROLE`.
    pub role: Option<String>,
}

impl Grant {
    /// Returns true when `role` holds `privilege` through this grant.
    #[must_use]
    pub fn grants(&self, privilege: &str, role: &str) -> bool {
        self.privilege.as_deref().is_some_and(|held| held.eq_ignore_ascii_case(privilege))
            && self.granted_to.as_deref().is_none_or(|kind| kind.eq_ignore_ascii_case("ROLE"))
            && self.grantee_name == role
    }
}

/// Parses a reported object kind such as `COMPUTE_POOL`.
fn object_type(raw: &str) -> Result<ObjectType, snowflake_ddl_core::ParseError> {
    raw.replace('_', " ").parse()
}

impl TryFrom<GrantRow> for Grant {
    type Error = DecodeError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "GrantRow";
        let grantee_name = required(ROW, "grantee_name", row.grantee_name.as_deref(), |raw| {
            Ok::<_, std::convert::Infallible>(strip_grantee_prefix(raw).to_string())
        })?;
        let granted_on = row.granted_on.as_deref().or(row.grant_on.as_deref());
        Ok(Self {
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            privilege: non_empty(row.privilege.as_deref()),
            granted_on: lenient(ROW, "granted_on", granted_on, object_type),
            name: non_empty(row.name.as_deref()),
            granted_to: non_empty(row.granted_to.as_deref().or(row.grant_to.as_deref())),
            grantee_name,
            grant_option: lenient(ROW, "grant_option", row.grant_option.as_deref(), str::parse::<bool>)
                .unwrap_or(false),
            granted_by: non_empty(row.granted_by.as_deref()),
            role: non_empty(row.role.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Grant operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Grants<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> Grants<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Transfers ownership. Pipes and tasks, singly or in bulk, go through
    /// the pause, grant, and resume sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::OwnershipTransfer`] naming the failed step for
    /// orchestrated transfers, or the validation or driver error otherwise.
    pub async fn grant_ownership(&self, ctx: &RequestContext, options: &GrantOwnershipOptions) -> Result<(), SdkError> {
        ownership::grant_ownership(self.client, ctx, options).await
    }

    /// Grants privileges to an account role.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn grant_privileges_to_account_role(
        &self,
        ctx: &RequestContext,
        options: &GrantPrivilegesToAccountRoleOptions,
    ) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Revokes privileges from an account role.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn revoke_privileges_from_account_role(
        &self,
        ctx: &RequestContext,
        options: &RevokePrivilegesFromAccountRoleOptions,
    ) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Lists grants.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(&self, ctx: &RequestContext, options: &ShowGrantOptions) -> Result<Vec<Grant>, SdkError> {
        self.client.query_as::<_, GrantRow, Grant>(ctx, options).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

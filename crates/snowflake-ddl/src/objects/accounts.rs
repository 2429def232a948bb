// crates/snowflake-ddl/src/objects/accounts.rs
// ============================================================================
// Module: Accounts
// Description: CREATE / ALTER / DROP / UNDROP / SHOW ACCOUNT grammars.
// Purpose: Manage accounts of an organization and decode their listings.
// Dependencies: serde, serde_json, url, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Account statements run in an organization-admin context. `CREATE ACCOUNT`
//! delivers its result asynchronously: the façade captures the query ID and
//! fetches the `status` column, a JSON document parsed by
//! [`parse_account_create_response`]. The organization name is not part of
//! that document and is derived from the account URL.

use serde::Deserialize;
use snowflake_ddl_core::AccountIdentifier;
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
use url::Url;

use crate::client::Client;
use crate::client::find_by_id;
use crate::client::ignore_missing;
use crate::client::missing_as_not_found;
use crate::error::SdkError;
use crate::objects::common::Like;
use crate::objects::common::Parameter;
use crate::objects::common::TagAssociation;
use crate::objects::common::parameters;
use crate::objects::common::set_tags;
use crate::objects::common::text;
use crate::objects::common::unset_tags;
use crate::objects::common::validate_parameters;
use crate::objects::common::validate_tags;
use crate::objects::users::UserType;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

sql_enum! {
    /// Snowflake edition of an account.
    pub enum AccountEdition: "account edition" {
        /// Standard edition.
        Standard => "STANDARD",
        /// Enterprise edition.
        Enterprise => "ENTERPRISE",
        /// Business Critical edition.
        BusinessCritical => "BUSINESS_CRITICAL",
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

/// `CREATE ACCOUNT` options.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAccountOptions {
    /// Account name.
    pub name: AccountObjectIdentifier,
    /// Login name of the initial administrator.
    pub admin_name: String,
    /// Administrator password.
    pub admin_password: Option<String>,
    /// Administrator RSA public key.
    pub admin_rsa_public_key: Option<String>,
    /// Administrator user type.
    pub admin_user_type: Option<UserType>,
    /// Administrator first name.
    pub first_name: Option<String>,
    /// Administrator last name.
    pub last_name: Option<String>,
    /// Administrator email.
    pub email: String,
    /// Force a password change on first login.
    pub must_change_password: Option<bool>,
    /// Edition of the new account.
    pub edition: AccountEdition,
    /// Region group.
    pub region_group: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Create a Polaris catalog account.
    pub polaris: Option<bool>,
}

impl CreateAccountOptions {
    /// Creates options with the required fields.
    #[must_use]
    pub fn new(
        name: AccountObjectIdentifier,
        admin_name: impl Into<String>,
        email: impl Into<String>,
        edition: AccountEdition,
    ) -> Self {
        Self {
            name,
            admin_name: admin_name.into(),
            admin_password: None,
            admin_rsa_public_key: None,
            admin_user_type: None,
            first_name: None,
            last_name: None,
            email: email.into(),
            must_change_password: None,
            edition,
            region_group: None,
            region: None,
            comment: None,
            polaris: None,
        }
    }
}

impl Render for CreateAccountOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE ACCOUNT")
            .identifier(&self.name)
            .parameter("ADMIN_NAME", Some(&self.admin_name), Encoding::SINGLE_QUOTES)
            .parameter("ADMIN_PASSWORD", self.admin_password.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("ADMIN_RSA_PUBLIC_KEY", self.admin_rsa_public_key.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("ADMIN_USER_TYPE", self.admin_user_type.as_ref(), Encoding::PLAIN)
            .parameter("FIRST_NAME", self.first_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("LAST_NAME", self.last_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("EMAIL", Some(&self.email), Encoding::SINGLE_QUOTES)
            .parameter("MUST_CHANGE_PASSWORD", self.must_change_password.as_ref(), Encoding::PLAIN)
            .parameter("EDITION", Some(&self.edition), Encoding::PLAIN)
            .parameter("REGION_GROUP", self.region_group.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("REGION", self.region.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("POLARIS", self.polaris.as_ref(), Encoding::PLAIN);
    }
}

impl Statement for CreateAccountOptions {
    const OPERATION: &'static str = "CreateAccountOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .required("AdminName", &self.admin_name)
            .required("Email", &self.email)
            .at_least_one_of(
                "",
                &[
                    ("AdminPassword", self.admin_password.is_some()),
                    ("AdminRSAPublicKey", self.admin_rsa_public_key.is_some()),
                ],
            );
        v.finish()
    }
}

// ============================================================================
// SECTION: Create Response
// ============================================================================

/// Result document of `CREATE ACCOUNT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCreateResponse {
    /// Account locator.
    pub account_locator: Option<String>,
    /// Locator-based URL.
    pub account_locator_url: Option<String>,
    /// Organization name derived from the account URL, uppercased.
    pub organization_name: Option<String>,
    /// Account name.
    pub account_name: Option<String>,
    /// Organization-based account URL.
    pub url: Option<String>,
    /// Edition.
    pub edition: Option<AccountEdition>,
    /// Region group.
    pub region_group: Option<String>,
    /// Cloud provider.
    pub cloud: Option<String>,
    /// Region.
    pub region: Option<String>,
}

impl AccountCreateResponse {
    /// Returns the `"ORG"."ACCOUNT"` identifier when both names are known.
    #[must_use]
    pub fn account_id(&self) -> Option<AccountIdentifier> {
        match (&self.organization_name, &self.account_name) {
            (Some(org), Some(account)) => Some(AccountIdentifier::new(org, account)),
            _ => None,
        }
    }
}

/// Raw `CREATE ACCOUNT` status document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountCreatePayload {
    /// Account locator.
    account_locator: Option<String>,
    /// Locator-based URL.
    account_locator_url: Option<String>,
    /// Account name.
    account_name: Option<String>,
    /// Organization URL; its first label is the organization name.
    url: Option<String>,
    /// Edition.
    edition: Option<String>,
    /// Region group.
    region_group: Option<String>,
    /// Cloud provider.
    cloud: Option<String>,
    /// Region.
    region: Option<String>,
}

/// Parses the JSON status document returned by `CREATE ACCOUNT`.
///
/// # Errors
///
/// Returns [`DecodeError::Shape`] when the document is not a JSON object
/// of the expected shape.
pub fn parse_account_create_response(raw: &str) -> Result<AccountCreateResponse, DecodeError> {
    /// Row name used in decode diagnostics.
    const ROW: &str = "AccountCreateResponse";
    let payload: AccountCreatePayload = serde_json::from_str(raw).map_err(|err| DecodeError::Shape {
        row: ROW,
        reason: err.to_string(),
    })?;
    let organization_name =
        lenient(ROW, "url", payload.url.as_deref(), organization_name_from_url);
    Ok(AccountCreateResponse {
        account_locator: payload.account_locator,
        account_locator_url: payload.account_locator_url,
        organization_name,
        account_name: payload.account_name,
        url: payload.url.clone(),
        edition: lenient(ROW, "edition", payload.edition.as_deref(), AccountEdition::parse),
        region_group: payload.region_group,
        cloud: payload.cloud,
        region: payload.region,
    })
}

/// Extracts `ORG` from `https://org-account.snowflakecomputing.com`.
fn organization_name_from_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    let host = url.host_str().ok_or_else(|| String::from("url has no host"))?;
    let label = host.split('.').next().unwrap_or(host);
    match label.split_once('-') {
        Some((org, _)) if !org.is_empty() => Ok(org.to_ascii_uppercase()),
        _ => Err(String::from("host does not start with <organization>-<account>")),
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// Feature policy attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFeaturePolicy {
    /// Policy identifier.
    pub policy: SchemaObjectIdentifier,
    /// Apply to every application in the account.
    pub for_all_applications: bool,
}

/// `ALTER ACCOUNT ... SET` body. Exactly one field may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSet {
    /// Account, session, or object parameters.
    pub parameters: Vec<Parameter>,
    /// Deprecated account parameters still accepted by the service.
    pub legacy_parameters: Vec<Parameter>,
    /// Resource monitor.
    pub resource_monitor: Option<AccountObjectIdentifier>,
    /// Packages policy.
    pub packages_policy: Option<SchemaObjectIdentifier>,
    /// Password policy.
    pub password_policy: Option<SchemaObjectIdentifier>,
    /// Session policy.
    pub session_policy: Option<SchemaObjectIdentifier>,
    /// Authentication policy.
    pub authentication_policy: Option<SchemaObjectIdentifier>,
    /// Feature policy.
    pub feature_policy_set: Option<AccountFeaturePolicy>,
    /// Organization administrator flag.
    pub org_admin: Option<bool>,
    /// Consumption billing entity.
    pub consumption_billing_entity: Option<String>,
    /// Replace an existing policy.
    pub force: bool,
}

impl Render for AccountSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET");
        parameters(sql, &self.parameters);
        parameters(sql, &self.legacy_parameters);
        sql.identifier_assigned("RESOURCE_MONITOR", self.resource_monitor.as_ref())
            .identifier_with("PACKAGES POLICY", self.packages_policy.as_ref())
            .identifier_with("PASSWORD POLICY", self.password_policy.as_ref())
            .identifier_with("SESSION POLICY", self.session_policy.as_ref())
            .identifier_with("AUTHENTICATION POLICY", self.authentication_policy.as_ref());
        if let Some(feature) = &self.feature_policy_set {
            sql.identifier_with("FEATURE POLICY", Some(&feature.policy))
                .keyword(feature.for_all_applications, "FOR ALL APPLICATIONS");
        }
        sql.parameter("IS_ORG_ADMIN", self.org_admin.as_ref(), Encoding::PLAIN)
            .parameter(
                "CONSUMPTION_BILLING_ENTITY",
                self.consumption_billing_entity.as_ref(),
                Encoding::DOUBLE_QUOTES,
            )
            .keyword(self.force, "FORCE");
    }
}

impl AccountSet {
    /// Validates the SET block.
    fn validate(&self, v: &mut Validator) {
        v.exactly_one_of(
            "",
            &[
                ("Parameters", !self.parameters.is_empty()),
                ("LegacyParameters", !self.legacy_parameters.is_empty()),
                ("ResourceMonitor", self.resource_monitor.is_some()),
                ("PackagesPolicy", self.packages_policy.is_some()),
                ("PasswordPolicy", self.password_policy.is_some()),
                ("SessionPolicy", self.session_policy.is_some()),
                ("AuthenticationPolicy", self.authentication_policy.is_some()),
                ("FeaturePolicySet", self.feature_policy_set.is_some()),
                ("OrgAdmin", self.org_admin.is_some()),
                ("ConsumptionBillingEntity", self.consumption_billing_entity.is_some()),
            ],
        );
        validate_parameters(v, "Parameters", &self.parameters);
        validate_parameters(v, "LegacyParameters", &self.legacy_parameters);
        v.valid_identifier_if_set("ResourceMonitor", self.resource_monitor.as_ref())
            .valid_identifier_if_set("PackagesPolicy", self.packages_policy.as_ref())
            .valid_identifier_if_set("PasswordPolicy", self.password_policy.as_ref())
            .valid_identifier_if_set("SessionPolicy", self.session_policy.as_ref())
            .valid_identifier_if_set("AuthenticationPolicy", self.authentication_policy.as_ref())
            .valid_identifier_if_set(
                "FeaturePolicySet",
                self.feature_policy_set.as_ref().map(|feature| &feature.policy),
            )
            .check(
                self.force && self.packages_policy.is_none() && self.feature_policy_set.is_none(),
                "Force",
                "FORCE requires PackagesPolicy or FeaturePolicySet",
            );
    }
}

/// `ALTER ACCOUNT ... UNSET` body. Exactly one field may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUnset {
    /// Parameter names to reset.
    pub parameters: Vec<String>,
    /// Deprecated parameter names to reset.
    pub legacy_parameters: Vec<String>,
    /// Detach the resource monitor.
    pub resource_monitor: bool,
    /// Detach the packages policy.
    pub packages_policy: bool,
    /// Detach the password policy.
    pub password_policy: bool,
    /// Detach the session policy.
    pub session_policy: bool,
    /// Detach the authentication policy.
    pub authentication_policy: bool,
    /// Detach the feature policy from every application.
    pub feature_policy_set: bool,
}

impl Render for AccountUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("UNSET")
            .list(None, &self.parameters, ListOptions::COMMA)
            .list(None, &self.legacy_parameters, ListOptions::COMMA)
            .keyword(self.resource_monitor, "RESOURCE_MONITOR")
            .keyword(self.packages_policy, "PACKAGES POLICY")
            .keyword(self.password_policy, "PASSWORD POLICY")
            .keyword(self.session_policy, "SESSION POLICY")
            .keyword(self.authentication_policy, "AUTHENTICATION POLICY")
            .keyword(self.feature_policy_set, "FEATURE POLICY FOR ALL APPLICATIONS");
    }
}

impl AccountUnset {
    /// Validates the UNSET block.
    fn validate(&self, v: &mut Validator) {
        v.exactly_one_of(
            "",
            &[
                ("Parameters", !self.parameters.is_empty()),
                ("LegacyParameters", !self.legacy_parameters.is_empty()),
                ("ResourceMonitor", self.resource_monitor),
                ("PackagesPolicy", self.packages_policy),
                ("PasswordPolicy", self.password_policy),
                ("SessionPolicy", self.session_policy),
                ("AuthenticationPolicy", self.authentication_policy),
                ("FeaturePolicySet", self.feature_policy_set),
            ],
        );
    }
}

/// Action of an `ALTER ACCOUNT` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAccountAction {
    /// `SET ...`.
    Set(AccountSet),
    /// `UNSET ...`.
    Unset(AccountUnset),
    /// `SET TAG ...`.
    SetTag(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTag(Vec<SchemaObjectIdentifier>),
    /// `RENAME TO <new> [SAVE_OLD_URL = <bool>]`.
    Rename {
        /// New account name.
        new_name: AccountObjectIdentifier,
        /// Keep the old URL working.
        save_old_url: Option<bool>,
    },
    /// `DROP OLD URL`.
    DropOldUrl,
    /// `DROP OLD ORGANIZATION URL`.
    DropOldOrganizationUrl,
}

/// `ALTER ACCOUNT` options. Without a name the current account is altered.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterAccountOptions {
    /// Account to alter.
    pub name: Option<AccountObjectIdentifier>,
    /// Action to apply.
    pub action: AlterAccountAction,
}

impl Render for AlterAccountOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER ACCOUNT");
        if let Some(name) = &self.name {
            sql.identifier(name);
        }
        match &self.action {
            AlterAccountAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterAccountAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterAccountAction::SetTag(tags) => set_tags(sql, tags),
            AlterAccountAction::UnsetTag(tags) => unset_tags(sql, tags),
            AlterAccountAction::Rename {
                new_name,
                save_old_url,
            } => {
                sql.identifier_with("RENAME TO", Some(new_name)).parameter(
                    "SAVE_OLD_URL",
                    save_old_url.as_ref(),
                    Encoding::PLAIN,
                );
            }
            AlterAccountAction::DropOldUrl => {
                sql.static_keyword("DROP OLD URL");
            }
            AlterAccountAction::DropOldOrganizationUrl => {
                sql.static_keyword("DROP OLD ORGANIZATION URL");
            }
        }
    }
}

impl Statement for AlterAccountOptions {
    const OPERATION: &'static str = "AlterAccountOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier_if_set("name", self.name.as_ref());
        match &self.action {
            AlterAccountAction::Set(set) => {
                v.scope("Set", |v| set.validate(v));
            }
            AlterAccountAction::Unset(unset) => {
                v.scope("Unset", |v| unset.validate(v));
            }
            AlterAccountAction::SetTag(tags) => {
                v.required("SetTag", tags);
                validate_tags(&mut v, "SetTag", tags);
            }
            AlterAccountAction::UnsetTag(tags) => {
                v.required("UnsetTag", tags).valid_identifiers("UnsetTag", tags);
            }
            AlterAccountAction::Rename {
                new_name,
                ..
            } => {
                v.required("name", &self.name).valid_identifier("Rename.NewName", new_name);
            }
            AlterAccountAction::DropOldUrl | AlterAccountAction::DropOldOrganizationUrl => {
                v.required("name", &self.name);
            }
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Undrop
// ============================================================================

/// `DROP ACCOUNT` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropAccountOptions {
    /// Account to drop.
    pub name: AccountObjectIdentifier,
    /// Skip when the account does not exist.
    pub if_exists: bool,
    /// Days the account stays recoverable, between 3 and 90.
    pub grace_period_in_days: u32,
}

impl DropAccountOptions {
    /// Creates drop options.
    #[must_use]
    pub const fn new(name: AccountObjectIdentifier, grace_period_in_days: u32) -> Self {
        Self {
            name,
            if_exists: false,
            grace_period_in_days,
        }
    }
}

impl Render for DropAccountOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP ACCOUNT")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.name)
            .parameter("GRACE_PERIOD_IN_DAYS", Some(&self.grace_period_in_days), Encoding::PLAIN);
    }
}

impl Statement for DropAccountOptions {
    const OPERATION: &'static str = "DropAccountOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name).int_in_range(
            "GracePeriodInDays",
            Some(self.grace_period_in_days),
            3,
            90,
        );
        v.finish()
    }
}

/// `UNDROP ACCOUNT` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndropAccountOptions {
    /// Account to restore.
    pub name: AccountObjectIdentifier,
}

impl Render for UndropAccountOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("UNDROP ACCOUNT").identifier(&self.name);
    }
}

impl Statement for UndropAccountOptions {
    const OPERATION: &'static str = "UndropAccountOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW ACCOUNTS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowAccountOptions {
    /// Include dropped accounts still within their grace period.
    pub history: bool,
    /// Name filter.
    pub like: Option<Like>,
}

impl Render for ShowAccountOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW ACCOUNTS").keyword(self.history, "HISTORY").nested(self.like.as_ref());
    }
}

impl Statement for ShowAccountOptions {
    const OPERATION: &'static str = "ShowAccountOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Raw `SHOW ACCOUNTS` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountRow {
    /// Organization name.
    pub organization_name: Option<String>,
    /// Account name.
    pub account_name: Option<String>,
    /// Region group.
    pub region_group: Option<String>,
    /// Region.
    pub snowflake_region: Option<String>,
    /// Edition.
    pub edition: Option<String>,
    /// Account URL.
    pub account_url: Option<String>,
    /// Creation time.
    pub created_on: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Account locator.
    pub account_locator: Option<String>,
    /// Locator URL.
    pub account_locator_url: Option<String>,
    /// Number of managed accounts.
    pub managed_accounts: Option<i64>,
    /// Previous URL kept after a rename.
    pub old_account_url: Option<String>,
    /// Organization administrator flag.
    pub is_org_admin: Option<bool>,
    /// Drop time.
    pub dropped_on: Option<String>,
    /// Scheduled permanent deletion time.
    pub scheduled_deletion_time: Option<String>,
    /// Restore time.
    pub restored_on: Option<String>,
}

/// Decoded account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Organization name.
    pub organization_name: String,
    /// Account name.
    pub account_name: String,
    /// Region group.
    pub region_group: Option<String>,
    /// Region.
    pub snowflake_region: Option<String>,
    /// Edition.
    pub edition: Option<AccountEdition>,
    /// Account URL.
    pub account_url: Option<String>,
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Comment.
    pub comment: Option<String>,
    /// Account locator.
    pub account_locator: Option<String>,
    /// Locator URL.
    pub account_locator_url: Option<String>,
    /// Number of managed accounts.
    pub managed_accounts: Option<i64>,
    /// Previous URL kept after a rename.
    pub old_account_url: Option<String>,
    /// Organization administrator flag.
    pub is_org_admin: bool,
    /// Drop time.
    pub dropped_on: Option<OffsetDateTime>,
    /// Scheduled permanent deletion time.
    pub scheduled_deletion_time: Option<OffsetDateTime>,
    /// Restore time.
    pub restored_on: Option<OffsetDateTime>,
}

impl Account {
    /// Returns the organization-qualified identifier.
    #[must_use]
    pub fn id(&self) -> AccountIdentifier {
        AccountIdentifier::new(&self.organization_name, &self.account_name)
    }

    /// Returns the identifier used by account statements.
    #[must_use]
    pub fn object_id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(&self.account_name)
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = DecodeError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "AccountRow";
        Ok(Self {
            organization_name: required(ROW, "organization_name", row.organization_name.as_deref(), text)?,
            account_name: required(ROW, "account_name", row.account_name.as_deref(), text)?,
            region_group: non_empty(row.region_group.as_deref()),
            snowflake_region: non_empty(row.snowflake_region.as_deref()),
            edition: lenient(ROW, "edition", row.edition.as_deref(), AccountEdition::parse),
            account_url: non_empty(row.account_url.as_deref()),
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            account_locator: non_empty(row.account_locator.as_deref()),
            account_locator_url: non_empty(row.account_locator_url.as_deref()),
            managed_accounts: row.managed_accounts,
            old_account_url: non_empty(row.old_account_url.as_deref()),
            is_org_admin: row.is_org_admin.unwrap_or(false),
            dropped_on: timestamp(ROW, "dropped_on", row.dropped_on.as_deref()),
            scheduled_deletion_time: timestamp(
                ROW,
                "scheduled_deletion_time",
                row.scheduled_deletion_time.as_deref(),
            ),
            restored_on: timestamp(ROW, "restored_on", row.restored_on.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Account operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> Accounts<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates an account and returns its status document.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        options: &CreateAccountOptions,
    ) -> Result<AccountCreateResponse, SdkError> {
        let rows = self.client.exec_for_results(ctx, options).await?;
        let row = rows.first().ok_or(DecodeError::Empty {
            row: "AccountCreateResponse",
        })?;
        let status = row.get_str("status").ok_or(DecodeError::MissingField {
            row: "AccountCreateResponse",
            field: "status",
        })?;
        Ok(parse_account_create_response(status)?)
    }

    /// Alters an account.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterAccountOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops an account.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropAccountOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops an account, treating a missing account as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing account.
    pub async fn drop_safely(
        &self,
        ctx: &RequestContext,
        options: &DropAccountOptions,
    ) -> Result<(), SdkError> {
        ignore_missing(self.drop(ctx, options).await)
    }

    /// Restores a dropped account.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn undrop(&self, ctx: &RequestContext, name: &AccountObjectIdentifier) -> Result<(), SdkError> {
        self.client
            .exec(ctx, &UndropAccountOptions {
                name: name.clone(),
            })
            .await
    }

    /// Lists accounts.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn show(&self, ctx: &RequestContext, options: &ShowAccountOptions) -> Result<Vec<Account>, SdkError> {
        self.client.query_as::<_, AccountRow, Account>(ctx, options).await
    }

    /// Returns the account named `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no account matches.
    pub async fn show_by_id(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<Account, SdkError> {
        let accounts = self
            .show(ctx, &ShowAccountOptions {
                history: false,
                like: Some(Like::new(id.name())),
            })
            .await?;
        find_by_id(accounts, "account", id, |account| account.account_name == id.name())
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
    ) -> Result<Account, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "account", id)
    }
}

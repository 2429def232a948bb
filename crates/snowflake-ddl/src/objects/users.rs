// crates/snowflake-ddl/src/objects/users.rs
// ============================================================================
// Module: Users
// Description: CREATE / ALTER / DROP / SHOW / DESCRIBE USER grammars.
// Purpose: Manage human and service users, their properties and policies.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Users are account-level objects. Object properties are shared between
//! CREATE and `ALTER USER ... SET`; an empty SET body is rejected.
//! `DESCRIBE USER` returns one property per row; the rows are folded into
//! [`UserDetails`], with the literal `null` treated as absent.

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
    /// Kind of user.
    pub enum UserType: "user type" {
        /// Interactive human user.
        Person => "PERSON",
        /// Non-interactive service user.
        Service => "SERVICE",
        /// Service user still allowed to use passwords.
        LegacyService => "LEGACY_SERVICE",
    }
}

sql_enum! {
    /// Secondary roles activated at login.
    pub enum SecondaryRolesOption: "secondary roles option" {
        /// Service default, equivalent to `ALL`.
        Default => "DEFAULT",
        /// No secondary roles.
        None => "NONE",
        /// Every granted role.
        All => "ALL",
    }
}

impl SecondaryRolesOption {
    /// Returns the `DEFAULT_SECONDARY_ROLES` literal.
    #[must_use]
    pub const fn literal(self) -> &'static str {
        match self {
            Self::Default | Self::All => "('ALL')",
            Self::None => "()",
        }
    }

    /// Parses the JSON list reported by SHOW and DESCRIBE, such as `["ALL"]`.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload is not a string array.
    pub fn from_reported(raw: &str) -> Result<Self, serde_json::Error> {
        let roles = json_string_list(raw)?;
        Ok(if roles.iter().any(|role| role.eq_ignore_ascii_case("ALL")) { Self::All } else { Self::None })
    }
}

sql_enum! {
    /// Policy kinds attachable to a user.
    pub enum PolicyKind: "policy kind" {
        /// Authentication policy.
        AuthenticationPolicy => "AUTHENTICATION POLICY",
        /// Password policy.
        PasswordPolicy => "PASSWORD POLICY",
        /// Session policy.
        SessionPolicy => "SESSION POLICY",
    }
}

// ============================================================================
// SECTION: Properties
// ============================================================================

/// User object properties shared by CREATE and `ALTER USER ... SET`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserObjectProperties {
    /// Password.
    pub password: Option<String>,
    /// Login name.
    pub login_name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Force a password change at next login.
    pub must_change_password: Option<bool>,
    /// Disable the user.
    pub disabled: Option<bool>,
    /// Days until the user expires.
    pub days_to_expiry: Option<u32>,
    /// Minutes until a temporary lock clears.
    pub mins_to_unlock: Option<u32>,
    /// Default warehouse.
    pub default_warehouse: Option<AccountObjectIdentifier>,
    /// Default namespace, `db` or `db.schema`.
    pub default_namespace: Option<String>,
    /// Default primary role.
    pub default_role: Option<AccountObjectIdentifier>,
    /// Default secondary roles.
    pub default_secondary_roles: Option<SecondaryRolesOption>,
    /// Minutes MFA may be bypassed.
    pub mins_to_bypass_mfa: Option<u32>,
    /// RSA public key.
    pub rsa_public_key: Option<String>,
    /// Second RSA public key, for rotation.
    pub rsa_public_key_2: Option<String>,
    /// User kind.
    pub user_type: Option<UserType>,
    /// Comment.
    pub comment: Option<String>,
}

impl UserObjectProperties {
    /// Returns true when no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Render for UserObjectProperties {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.parameter("PASSWORD", self.password.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("LOGIN_NAME", self.login_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("DISPLAY_NAME", self.display_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("FIRST_NAME", self.first_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("MIDDLE_NAME", self.middle_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("LAST_NAME", self.last_name.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("EMAIL", self.email.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("MUST_CHANGE_PASSWORD", self.must_change_password.as_ref(), Encoding::PLAIN)
            .parameter("DISABLED", self.disabled.as_ref(), Encoding::PLAIN)
            .parameter("DAYS_TO_EXPIRY", self.days_to_expiry.as_ref(), Encoding::PLAIN)
            .parameter("MINS_TO_UNLOCK", self.mins_to_unlock.as_ref(), Encoding::PLAIN)
            .identifier_assigned("DEFAULT_WAREHOUSE", self.default_warehouse.as_ref())
            .parameter("DEFAULT_NAMESPACE", self.default_namespace.as_ref(), Encoding::PLAIN)
            .identifier_assigned("DEFAULT_ROLE", self.default_role.as_ref())
            .parameter(
                "DEFAULT_SECONDARY_ROLES",
                self.default_secondary_roles.map(SecondaryRolesOption::literal),
                Encoding::PLAIN,
            )
            .parameter("MINS_TO_BYPASS_MFA", self.mins_to_bypass_mfa.as_ref(), Encoding::PLAIN)
            .parameter("RSA_PUBLIC_KEY", self.rsa_public_key.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("RSA_PUBLIC_KEY_2", self.rsa_public_key_2.as_ref(), Encoding::SINGLE_QUOTES)
            .parameter("TYPE", self.user_type.as_ref(), Encoding::PLAIN)
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

impl UserObjectProperties {
    /// Validates properties shared by CREATE and ALTER ... SET.
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier_if_set("DefaultWarehouse", self.default_warehouse.as_ref())
            .valid_identifier_if_set("DefaultRole", self.default_role.as_ref());
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

/// `CREATE USER` options.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserOptions {
    /// Replace an existing user.
    pub or_replace: bool,
    /// Skip when the user exists.
    pub if_not_exists: bool,
    /// User name.
    pub name: AccountObjectIdentifier,
    /// Object properties.
    pub properties: UserObjectProperties,
    /// Session parameter defaults.
    pub session_parameters: Vec<Parameter>,
    /// Tags.
    pub tags: Vec<TagAssociation>,
}

impl CreateUserOptions {
    /// Creates options for `name` with no properties.
    #[must_use]
    pub fn new(name: AccountObjectIdentifier) -> Self {
        Self {
            or_replace: false,
            if_not_exists: false,
            name,
            properties: UserObjectProperties::default(),
            session_parameters: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl Render for CreateUserOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE")
            .keyword(self.or_replace, "OR REPLACE")
            .static_keyword("USER")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name)
            .nested(Some(&self.properties));
        parameters(sql, &self.session_parameters);
        with_tags(sql, "WITH TAG", &self.tags);
    }
}

impl Statement for CreateUserOptions {
    const OPERATION: &'static str = "CreateUserOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .conflicting(("OrReplace", self.or_replace), ("IfNotExists", self.if_not_exists));
        self.properties.validate(&mut v);
        validate_parameters(&mut v, "SessionParameters", &self.session_parameters);
        validate_tags(&mut v, "Tags", &self.tags);
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER USER ... SET` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSet {
    /// Object properties.
    pub properties: UserObjectProperties,
    /// Session parameters.
    pub session_parameters: Vec<Parameter>,
}

impl Render for UserSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET").nested(Some(&self.properties));
        parameters(sql, &self.session_parameters);
    }
}

/// `ALTER USER ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUnset {
    /// Remove the password.
    pub password: bool,
    /// Reset the login name.
    pub login_name: bool,
    /// Remove the display name.
    pub display_name: bool,
    /// Remove the first name.
    pub first_name: bool,
    /// Remove the middle name.
    pub middle_name: bool,
    /// Remove the last name.
    pub last_name: bool,
    /// Remove the email address.
    pub email: bool,
    /// Reset the password-change flag.
    pub must_change_password: bool,
    /// Re-enable the user.
    pub disabled: bool,
    /// Remove the expiry.
    pub days_to_expiry: bool,
    /// Remove the unlock delay.
    pub mins_to_unlock: bool,
    /// Remove the default warehouse.
    pub default_warehouse: bool,
    /// Remove the default namespace.
    pub default_namespace: bool,
    /// Remove the default role.
    pub default_role: bool,
    /// Reset the default secondary roles.
    pub default_secondary_roles: bool,
    /// Remove the MFA bypass.
    pub mins_to_bypass_mfa: bool,
    /// Remove the RSA public key.
    pub rsa_public_key: bool,
    /// Remove the second RSA public key.
    pub rsa_public_key_2: bool,
    /// Reset the user kind.
    pub user_type: bool,
    /// Remove the comment.
    pub comment: bool,
    /// Session parameters to reset.
    pub session_parameters: Vec<String>,
}

impl UserUnset {
    /// Returns whether no property is selected for unsetting.
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Render for UserUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.password, "PASSWORD")
                .keyword(self.login_name, "LOGIN_NAME")
                .keyword(self.display_name, "DISPLAY_NAME")
                .keyword(self.first_name, "FIRST_NAME")
                .keyword(self.middle_name, "MIDDLE_NAME")
                .keyword(self.last_name, "LAST_NAME")
                .keyword(self.email, "EMAIL")
                .keyword(self.must_change_password, "MUST_CHANGE_PASSWORD")
                .keyword(self.disabled, "DISABLED")
                .keyword(self.days_to_expiry, "DAYS_TO_EXPIRY")
                .keyword(self.mins_to_unlock, "MINS_TO_UNLOCK")
                .keyword(self.default_warehouse, "DEFAULT_WAREHOUSE")
                .keyword(self.default_namespace, "DEFAULT_NAMESPACE")
                .keyword(self.default_role, "DEFAULT_ROLE")
                .keyword(self.default_secondary_roles, "DEFAULT_SECONDARY_ROLES")
                .keyword(self.mins_to_bypass_mfa, "MINS_TO_BYPASS_MFA")
                .keyword(self.rsa_public_key, "RSA_PUBLIC_KEY")
                .keyword(self.rsa_public_key_2, "RSA_PUBLIC_KEY_2")
                .keyword(self.user_type, "TYPE")
                .keyword(self.comment, "COMMENT");
            for parameter in &self.session_parameters {
                sql.value(Some(&parameter.to_ascii_uppercase()), Quotes::None);
            }
        });
    }
}

/// Action of an `ALTER USER` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterUserAction {
    /// `RENAME TO <name>`.
    RenameTo(AccountObjectIdentifier),
    /// `RESET PASSWORD`: issue a one-time password-reset URL.
    ResetPassword,
    /// `ABORT ALL QUERIES`.
    AbortAllQueries,
    /// `SET ...`.
    Set(UserSet),
    /// `UNSET ...`.
    Unset(UserUnset),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
    /// `SET <kind> <policy> [FORCE]`.
    SetPolicy {
        /// Policy kind.
        kind: PolicyKind,
        /// Policy identifier.
        policy: SchemaObjectIdentifier,
        /// Replace an already attached policy.
        force: bool,
    },
    /// `UNSET <kind>`.
    UnsetPolicy(PolicyKind),
}

/// `ALTER USER` options.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterUserOptions {
    /// Skip when the user does not exist.
    pub if_exists: bool,
    /// User name.
    pub name: AccountObjectIdentifier,
    /// Action to apply.
    pub action: AlterUserAction,
}

impl Render for AlterUserOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER USER").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterUserAction::RenameTo(new_name) => {
                sql.identifier_with("RENAME TO", Some(new_name));
            }
            AlterUserAction::ResetPassword => {
                sql.static_keyword("RESET PASSWORD");
            }
            AlterUserAction::AbortAllQueries => {
                sql.static_keyword("ABORT ALL QUERIES");
            }
            AlterUserAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterUserAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterUserAction::SetTags(tags) => set_tags(sql, tags),
            AlterUserAction::UnsetTags(tags) => unset_tags(sql, tags),
            AlterUserAction::SetPolicy {
                kind,
                policy,
                force,
            } => {
                sql.static_keyword("SET")
                    .keyword_value(Some(kind))
                    .identifier(policy)
                    .keyword(*force, "FORCE");
            }
            AlterUserAction::UnsetPolicy(kind) => {
                sql.static_keyword("UNSET").keyword_value(Some(kind));
            }
        }
    }
}

impl Statement for AlterUserOptions {
    const OPERATION: &'static str = "AlterUserOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterUserAction::RenameTo(new_name) => {
                v.valid_identifier("NewName", new_name);
            }
            AlterUserAction::Set(set) => {
                v.scope("Set", |v| {
                    v.check(
                        set.properties.is_empty() && set.session_parameters.is_empty(),
                        "",
                        "at least one property or parameter must be set",
                    );
                    set.properties.validate(v);
                    validate_parameters(v, "SessionParameters", &set.session_parameters);
                });
            }
            AlterUserAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.check(unset.is_empty(), "", "at least one property or parameter must be unset");
                });
            }
            AlterUserAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterUserAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
            AlterUserAction::SetPolicy {
                policy, ..
            } => {
                v.valid_identifier("Policy", policy);
            }
            AlterUserAction::ResetPassword | AlterUserAction::AbortAllQueries | AlterUserAction::UnsetPolicy(_) => {}
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe
// ============================================================================

/// `DROP USER` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropUserOptions {
    /// Skip when the user does not exist.
    pub if_exists: bool,
    /// User name.
    pub name: AccountObjectIdentifier,
}

impl Render for DropUserOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP USER").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropUserOptions {
    const OPERATION: &'static str = "DropUserOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE USER` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeUserOptions {
    /// User name.
    pub name: AccountObjectIdentifier,
}

impl Render for DescribeUserOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE USER").identifier(&self.name);
    }
}

impl Statement for DescribeUserOptions {
    const OPERATION: &'static str = "DescribeUserOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// Raw `DESCRIBE USER` property row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPropertyRow {
    /// Property name.
    pub property: Option<String>,
    /// Current value; `null` when unset.
    pub value: Option<String>,
    /// Default value.
    pub default: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// `DESCRIBE USER` properties folded into one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDetails {
    /// Name.
    pub name: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// User kind.
    pub user_type: Option<UserType>,
    /// Login name.
    pub login_name: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Password-change flag.
    pub must_change_password: Option<bool>,
    /// Disabled flag.
    pub disabled: Option<bool>,
    /// Temporary lock flag.
    pub snowflake_lock: Option<bool>,
    /// Days until expiry.
    pub days_to_expiry: Option<String>,
    /// Minutes until unlock.
    pub mins_to_unlock: Option<String>,
    /// Default warehouse.
    pub default_warehouse: Option<AccountObjectIdentifier>,
    /// Default namespace.
    pub default_namespace: Option<String>,
    /// Default role.
    pub default_role: Option<AccountObjectIdentifier>,
    /// Default secondary roles.
    pub default_secondary_roles: Option<SecondaryRolesOption>,
    /// MFA bypass minutes.
    pub mins_to_bypass_mfa: Option<String>,
    /// Fingerprint of the RSA public key.
    pub rsa_public_key_fp: Option<String>,
    /// Fingerprint of the second RSA public key.
    pub rsa_public_key_2_fp: Option<String>,
    /// Last password change.
    pub password_last_set_time: Option<String>,
}

impl UserDetails {
    /// Folds property rows; unknown properties are ignored.
    #[must_use]
    pub fn from_properties(rows: &[UserPropertyRow]) -> Self {
        /// Row name used in decode diagnostics.
        const ROW: &str = "UserPropertyRow";
        let mut details = Self::default();
        for row in rows {
            let Some(property) = row.property.as_deref() else {
                continue;
            };
            let value = row.value.as_deref().filter(|value| !value.trim().eq_ignore_ascii_case("null"));
            match property.to_ascii_uppercase().as_str() {
                "NAME" => details.name = non_empty(value),
                "COMMENT" => details.comment = non_empty(value),
                "DISPLAY_NAME" => details.display_name = non_empty(value),
                "TYPE" => details.user_type = lenient(ROW, "TYPE", value, UserType::parse),
                "LOGIN_NAME" => details.login_name = non_empty(value),
                "FIRST_NAME" => details.first_name = non_empty(value),
                "MIDDLE_NAME" => details.middle_name = non_empty(value),
                "LAST_NAME" => details.last_name = non_empty(value),
                "EMAIL" => details.email = non_empty(value),
                "MUST_CHANGE_PASSWORD" => {
                    details.must_change_password = lenient(ROW, "MUST_CHANGE_PASSWORD", value, str::parse);
                }
                "DISABLED" => details.disabled = lenient(ROW, "DISABLED", value, str::parse),
                "SNOWFLAKE_LOCK" => details.snowflake_lock = lenient(ROW, "SNOWFLAKE_LOCK", value, str::parse),
                "DAYS_TO_EXPIRY" => details.days_to_expiry = non_empty(value),
                "MINS_TO_UNLOCK" => details.mins_to_unlock = non_empty(value),
                "DEFAULT_WAREHOUSE" => {
                    details.default_warehouse = lenient(ROW, "DEFAULT_WAREHOUSE", value, str::parse);
                }
                "DEFAULT_NAMESPACE" => details.default_namespace = non_empty(value),
                "DEFAULT_ROLE" => details.default_role = lenient(ROW, "DEFAULT_ROLE", value, str::parse),
                "DEFAULT_SECONDARY_ROLES" => {
                    details.default_secondary_roles =
                        lenient(ROW, "DEFAULT_SECONDARY_ROLES", value, SecondaryRolesOption::from_reported);
                }
                "MINS_TO_BYPASS_MFA" => details.mins_to_bypass_mfa = non_empty(value),
                "RSA_PUBLIC_KEY_FP" => details.rsa_public_key_fp = non_empty(value),
                "RSA_PUBLIC_KEY_2_FP" => details.rsa_public_key_2_fp = non_empty(value),
                "PASSWORD_LAST_SET_TIME" => details.password_last_set_time = non_empty(value),
                _ => {}
            }
        }
        details
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW USERS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowUserOptions {
    /// Return the reduced column set.
    pub terse: bool,
    /// Name filter.
    pub like: Option<Like>,
    /// Name prefix filter.
    pub starts_with: Option<String>,
    /// Pagination.
    pub limit: Option<LimitFrom>,
}

impl Render for ShowUserOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW")
            .keyword(self.terse, "TERSE")
            .static_keyword("USERS")
            .nested(self.like.as_ref());
        starts_with(sql, self.starts_with.as_ref());
        sql.nested(self.limit.as_ref());
    }
}

impl Statement for ShowUserOptions {
    const OPERATION: &'static str = "ShowUserOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Raw `SHOW USERS` row. Flag columns arrive as `true`/`false` text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRow {
    /// Name.
    pub name: Option<String>,
    /// Creation time.
    pub created_on: Option<String>,
    /// Login name.
    pub login_name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Disabled flag.
    pub disabled: Option<String>,
    /// Password-change flag.
    pub must_change_password: Option<String>,
    /// Temporary lock flag.
    pub snowflake_lock: Option<String>,
    /// Default warehouse.
    pub default_warehouse: Option<String>,
    /// Default namespace.
    pub default_namespace: Option<String>,
    /// Default role.
    pub default_role: Option<String>,
    /// Default secondary roles, JSON list.
    pub default_secondary_roles: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Last successful login.
    pub last_success_login: Option<String>,
    /// Expiry time.
    pub expires_at_time: Option<String>,
    /// Lock expiry time.
    pub locked_until_time: Option<String>,
    /// Password flag.
    pub has_password: Option<String>,
    /// Key-pair flag.
    pub has_rsa_public_key: Option<String>,
    /// User kind.
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    /// MFA enrollment flag.
    pub has_mfa: Option<String>,
}

/// Decoded user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Name.
    pub name: String,
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Login name.
    pub login_name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Disabled flag.
    pub disabled: bool,
    /// Password-change flag.
    pub must_change_password: bool,
    /// Temporary lock flag.
    pub snowflake_lock: bool,
    /// Default warehouse.
    pub default_warehouse: Option<AccountObjectIdentifier>,
    /// Default namespace.
    pub default_namespace: Option<String>,
    /// Default role.
    pub default_role: Option<AccountObjectIdentifier>,
    /// Default secondary roles.
    pub default_secondary_roles: Option<SecondaryRolesOption>,
    /// Owner role.
    pub owner: Option<String>,
    /// Last successful login.
    pub last_success_login: Option<OffsetDateTime>,
    /// Expiry time.
    pub expires_at_time: Option<OffsetDateTime>,
    /// Lock expiry time.
    pub locked_until_time: Option<OffsetDateTime>,
    /// Password flag.
    pub has_password: bool,
    /// Key-pair flag.
    pub has_rsa_public_key: bool,
    /// User kind.
    pub user_type: Option<UserType>,
    /// MFA enrollment flag.
    pub has_mfa: bool,
}

impl User {
    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(&self.name)
    }
}

/// Reads a `true`/`false` text column, defaulting to false.
fn text_flag(row: &'static str, field: &'static str, raw: Option<&str>) -> bool {
    lenient(row, field, raw, str::parse::<bool>).unwrap_or(false)
}

impl TryFrom<UserRow> for User {
    type Error = DecodeError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "UserRow";
        Ok(Self {
            name: required(ROW, "name", row.name.as_deref(), text)?,
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            login_name: non_empty(row.login_name.as_deref()),
            display_name: non_empty(row.display_name.as_deref()),
            first_name: non_empty(row.first_name.as_deref()),
            last_name: non_empty(row.last_name.as_deref()),
            email: non_empty(row.email.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            disabled: text_flag(ROW, "disabled", row.disabled.as_deref()),
            must_change_password: text_flag(ROW, "must_change_password", row.must_change_password.as_deref()),
            snowflake_lock: text_flag(ROW, "snowflake_lock", row.snowflake_lock.as_deref()),
            default_warehouse: lenient(ROW, "default_warehouse", row.default_warehouse.as_deref(), str::parse),
            default_namespace: non_empty(row.default_namespace.as_deref()),
            default_role: lenient(ROW, "default_role", row.default_role.as_deref(), str::parse),
            default_secondary_roles: lenient(
                ROW,
                "default_secondary_roles",
                row.default_secondary_roles.as_deref(),
                SecondaryRolesOption::from_reported,
            ),
            owner: non_empty(row.owner.as_deref()),
            last_success_login: timestamp(ROW, "last_success_login", row.last_success_login.as_deref()),
            expires_at_time: timestamp(ROW, "expires_at_time", row.expires_at_time.as_deref()),
            locked_until_time: timestamp(ROW, "locked_until_time", row.locked_until_time.as_deref()),
            has_password: text_flag(ROW, "has_password", row.has_password.as_deref()),
            has_rsa_public_key: text_flag(ROW, "has_rsa_public_key", row.has_rsa_public_key.as_deref()),
            user_type: lenient(ROW, "type", row.user_type.as_deref(), UserType::parse),
            has_mfa: text_flag(ROW, "has_mfa", row.has_mfa.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// User operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> Users<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreateUserOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters a user.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterUserOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a user.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropUserOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a user, treating a missing user as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing user.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<(), SdkError> {
        let options = DropUserOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists users.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn show(&self, ctx: &RequestContext, options: &ShowUserOptions) -> Result<Vec<User>, SdkError> {
        self.client.query_as::<_, UserRow, User>(ctx, options).await
    }

    /// Returns the user named `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no user matches.
    pub async fn show_by_id(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<User, SdkError> {
        let options = ShowUserOptions {
            like: Some(Like::new(id.name())),
            ..ShowUserOptions::default()
        };
        let users = self.show(ctx, &options).await?;
        find_by_id(users, "user", id, |user| user.id() == *id)
    }

    /// Like [`Self::show_by_id`], with driver missing-object errors reported
    /// as [`SdkError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] or other failures.
    pub async fn show_by_id_safely(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<User, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "user", id)
    }

    /// Describes a user.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(&self, ctx: &RequestContext, id: &AccountObjectIdentifier) -> Result<UserDetails, SdkError> {
        let options = DescribeUserOptions {
            name: id.clone(),
        };
        let rows: Vec<UserPropertyRow> = self.client.query(ctx, &options).await?;
        Ok(UserDetails::from_properties(&rows))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use snowflake_ddl_core::to_sql;

    use super::*;

    #[test]
    fn secondary_roles_render_as_literals() {
        let mut options = CreateUserOptions::new(AccountObjectIdentifier::new("alice"));
        options.properties.default_secondary_roles = Some(SecondaryRolesOption::None);
        options.properties.user_type = Some(UserType::Service);
        assert_eq!(to_sql(&options), r#"CREATE USER "alice" DEFAULT_SECONDARY_ROLES = () TYPE = SERVICE"#);
    }

    #[test]
    fn describe_rows_treat_null_as_absent() {
        let rows = vec![
            UserPropertyRow {
                property: Some("DISPLAY_NAME".into()),
                value: Some("null".into()),
                ..UserPropertyRow::default()
            },
            UserPropertyRow {
                property: Some("DEFAULT_SECONDARY_ROLES".into()),
                value: Some(r#"["ALL"]"#.into()),
                ..UserPropertyRow::default()
            },
        ];
        let details = UserDetails::from_properties(&rows);
        assert_eq!(details.display_name, None);
        assert_eq!(details.default_secondary_roles, Some(SecondaryRolesOption::All));
    }
}

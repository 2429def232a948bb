// crates/snowflake-ddl/src/objects/programmatic_access_tokens.rs
// ============================================================================
// Module: Programmatic Access Tokens
// Description: ADD / MODIFY / ROTATE / REMOVE / SHOW token grammars.
// Purpose: Manage per-user programmatic access tokens.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Tokens are addressed through their user with `ALTER USER` statements.
//! ADD and ROTATE return the token secret exactly once; the result types
//! redact it from their `Debug` output.

use std::fmt;

use serde::Deserialize;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::RequestContext;
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
use crate::objects::common::text;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

sql_enum! {
    /// Token lifecycle state.
    pub enum ProgrammaticAccessTokenStatus: "programmatic access token status" {
        /// Usable.
        Active => "ACTIVE",
        /// Past its expiry.
        Expired => "EXPIRED",
        /// Disabled by an administrator.
        Disabled => "DISABLED",
    }
}

/// Inclusive bounds of `DAYS_TO_EXPIRY`.
const DAYS_TO_EXPIRY_RANGE: (i64, i64) = (1, 365);

/// Inclusive bounds of `MINS_TO_BYPASS_NETWORK_POLICY_REQUIREMENT`.
const BYPASS_MINUTES_RANGE: (i64, i64) = (1, 1440);

// ============================================================================
// SECTION: Add
// ============================================================================

/// `ALTER USER ... ADD PROGRAMMATIC ACCESS TOKEN` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddProgrammaticAccessTokenOptions {
    /// Skip when the user does not exist.
    pub if_exists: bool,
    /// Owning user.
    pub user: AccountObjectIdentifier,
    /// Token name.
    pub name: AccountObjectIdentifier,
    /// Role the token is restricted to.
    pub role_restriction: Option<AccountObjectIdentifier>,
    /// Lifetime in days.
    pub days_to_expiry: Option<u32>,
    /// Minutes the token may bypass the network policy requirement.
    pub mins_to_bypass_network_policy_requirement: Option<u32>,
    /// Comment.
    pub comment: Option<String>,
}

impl AddProgrammaticAccessTokenOptions {
    /// Creates options for token `name` of `user`.
    #[must_use]
    pub const fn new(user: AccountObjectIdentifier, name: AccountObjectIdentifier) -> Self {
        Self {
            if_exists: false,
            user,
            name,
            role_restriction: None,
            days_to_expiry: None,
            mins_to_bypass_network_policy_requirement: None,
            comment: None,
        }
    }
}

impl Render for AddProgrammaticAccessTokenOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER USER")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.user)
            .static_keyword("ADD PROGRAMMATIC ACCESS TOKEN")
            .identifier(&self.name)
            .identifier_assigned("ROLE_RESTRICTION", self.role_restriction.as_ref())
            .parameter("DAYS_TO_EXPIRY", self.days_to_expiry.as_ref(), Encoding::PLAIN)
            .parameter(
                "MINS_TO_BYPASS_NETWORK_POLICY_REQUIREMENT",
                self.mins_to_bypass_network_policy_requirement.as_ref(),
                Encoding::PLAIN,
            )
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

impl Statement for AddProgrammaticAccessTokenOptions {
    const OPERATION: &'static str = "AddProgrammaticAccessTokenOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("user", &self.user)
            .valid_identifier("name", &self.name)
            .valid_identifier_if_set("RoleRestriction", self.role_restriction.as_ref())
            .int_in_range("DaysToExpiry", self.days_to_expiry, DAYS_TO_EXPIRY_RANGE.0, DAYS_TO_EXPIRY_RANGE.1)
            .int_in_range(
                "MinsToBypassNetworkPolicyRequirement",
                self.mins_to_bypass_network_policy_requirement,
                BYPASS_MINUTES_RANGE.0,
                BYPASS_MINUTES_RANGE.1,
            );
        v.finish()
    }
}

/// Row returned by ADD.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddProgrammaticAccessTokenResult {
    /// Token name.
    pub token_name: Option<String>,
    /// Token secret, shown once.
    pub token_secret: Option<String>,
}

impl fmt::Debug for AddProgrammaticAccessTokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddProgrammaticAccessTokenResult")
            .field("token_name", &self.token_name)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// SECTION: Modify
// ============================================================================

/// `MODIFY ... SET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammaticAccessTokenSet {
    /// Disable or enable the token.
    pub disabled: Option<bool>,
    /// Network policy bypass minutes.
    pub mins_to_bypass_network_policy_requirement: Option<u32>,
    /// Comment.
    pub comment: Option<String>,
}

impl Render for ProgrammaticAccessTokenSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .parameter("DISABLED", self.disabled.as_ref(), Encoding::PLAIN)
            .parameter(
                "MINS_TO_BYPASS_NETWORK_POLICY_REQUIREMENT",
                self.mins_to_bypass_network_policy_requirement.as_ref(),
                Encoding::PLAIN,
            )
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

/// `MODIFY ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammaticAccessTokenUnset {
    /// Re-enable the token.
    pub disabled: bool,
    /// Remove the network policy bypass.
    pub mins_to_bypass_network_policy_requirement: bool,
    /// Remove the comment.
    pub comment: bool,
}

impl Render for ProgrammaticAccessTokenUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.disabled, "DISABLED")
                .keyword(
                    self.mins_to_bypass_network_policy_requirement,
                    "MINS_TO_BYPASS_NETWORK_POLICY_REQUIREMENT",
                )
                .keyword(self.comment, "COMMENT");
        });
    }
}

/// Action of a `MODIFY PROGRAMMATIC ACCESS TOKEN` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyProgrammaticAccessTokenAction {
    /// `SET ...`.
    Set(ProgrammaticAccessTokenSet),
    /// `UNSET ...`.
    Unset(ProgrammaticAccessTokenUnset),
    /// `RENAME TO <name>`.
    RenameTo(AccountObjectIdentifier),
}

/// `ALTER USER ... MODIFY PROGRAMMATIC ACCESS TOKEN` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyProgrammaticAccessTokenOptions {
    /// Skip when the user does not exist.
    pub if_exists: bool,
    /// Owning user.
    pub user: AccountObjectIdentifier,
    /// Token name.
    pub name: AccountObjectIdentifier,
    /// Action to apply.
    pub action: ModifyProgrammaticAccessTokenAction,
}

impl Render for ModifyProgrammaticAccessTokenOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER USER")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.user)
            .static_keyword("MODIFY PROGRAMMATIC ACCESS TOKEN")
            .identifier(&self.name);
        match &self.action {
            ModifyProgrammaticAccessTokenAction::Set(set) => {
                sql.nested(Some(set));
            }
            ModifyProgrammaticAccessTokenAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            ModifyProgrammaticAccessTokenAction::RenameTo(new_name) => {
                sql.identifier_with("RENAME TO", Some(new_name));
            }
        }
    }
}

impl Statement for ModifyProgrammaticAccessTokenOptions {
    const OPERATION: &'static str = "ModifyProgrammaticAccessTokenOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("user", &self.user).valid_identifier("name", &self.name);
        match &self.action {
            ModifyProgrammaticAccessTokenAction::Set(set) => {
                v.scope("Set", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("Disabled", set.disabled.is_some()),
                            (
                                "MinsToBypassNetworkPolicyRequirement",
                                set.mins_to_bypass_network_policy_requirement.is_some(),
                            ),
                            ("Comment", set.comment.is_some()),
                        ],
                    )
                    .int_in_range(
                        "MinsToBypassNetworkPolicyRequirement",
                        set.mins_to_bypass_network_policy_requirement,
                        BYPASS_MINUTES_RANGE.0,
                        BYPASS_MINUTES_RANGE.1,
                    );
                });
            }
            ModifyProgrammaticAccessTokenAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("Disabled", unset.disabled),
                            ("MinsToBypassNetworkPolicyRequirement", unset.mins_to_bypass_network_policy_requirement),
                            ("Comment", unset.comment),
                        ],
                    );
                });
            }
            ModifyProgrammaticAccessTokenAction::RenameTo(new_name) => {
                v.valid_identifier("RenameTo", new_name);
            }
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Rotate / Remove
// ============================================================================

/// `ALTER USER ... ROTATE PROGRAMMATIC ACCESS TOKEN` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateProgrammaticAccessTokenOptions {
    /// Skip when the user does not exist.
    pub if_exists: bool,
    /// Owning user.
    pub user: AccountObjectIdentifier,
    /// Token name.
    pub name: AccountObjectIdentifier,
    /// Hours the rotated-out secret stays valid.
    pub expire_rotated_token_after_hours: Option<u32>,
}

impl Render for RotateProgrammaticAccessTokenOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER USER")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.user)
            .static_keyword("ROTATE PROGRAMMATIC ACCESS TOKEN")
            .identifier(&self.name)
            .parameter(
                "EXPIRE_ROTATED_TOKEN_AFTER_HOURS",
                self.expire_rotated_token_after_hours.as_ref(),
                Encoding::PLAIN,
            );
    }
}

impl Statement for RotateProgrammaticAccessTokenOptions {
    const OPERATION: &'static str = "RotateProgrammaticAccessTokenOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("user", &self.user).valid_identifier("name", &self.name);
        v.finish()
    }
}

/// Row returned by ROTATE.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RotateProgrammaticAccessTokenResult {
    /// Token name.
    pub token_name: Option<String>,
    /// New token secret, shown once.
    pub token_secret: Option<String>,
    /// Name given to the rotated-out token.
    pub rotated_token_name: Option<String>,
}

impl fmt::Debug for RotateProgrammaticAccessTokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotateProgrammaticAccessTokenResult")
            .field("token_name", &self.token_name)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("rotated_token_name", &self.rotated_token_name)
            .finish()
    }
}

/// `ALTER USER ... REMOVE PROGRAMMATIC ACCESS TOKEN` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveProgrammaticAccessTokenOptions {
    /// Skip when the user does not exist.
    pub if_exists: bool,
    /// Owning user.
    pub user: AccountObjectIdentifier,
    /// Token name.
    pub name: AccountObjectIdentifier,
}

impl Render for RemoveProgrammaticAccessTokenOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER USER")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.user)
            .static_keyword("REMOVE PROGRAMMATIC ACCESS TOKEN")
            .identifier(&self.name);
    }
}

impl Statement for RemoveProgrammaticAccessTokenOptions {
    const OPERATION: &'static str = "RemoveProgrammaticAccessTokenOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("user", &self.user).valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW USER PROGRAMMATIC ACCESS TOKENS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowProgrammaticAccessTokenOptions {
    /// Restrict to one user; defaults to the current user.
    pub user: Option<AccountObjectIdentifier>,
}

impl Render for ShowProgrammaticAccessTokenOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW USER PROGRAMMATIC ACCESS TOKENS").identifier_with("FOR USER", self.user.as_ref());
    }
}

impl Statement for ShowProgrammaticAccessTokenOptions {
    const OPERATION: &'static str = "ShowProgrammaticAccessTokenOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier_if_set("User", self.user.as_ref());
        v.finish()
    }
}

/// Raw `SHOW USER PROGRAMMATIC ACCESS TOKENS` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgrammaticAccessTokenRow {
    /// Token name.
    pub name: Option<String>,
    /// Owning user.
    pub user_name: Option<String>,
    /// Role restriction.
    pub role_restriction: Option<String>,
    /// Expiry time.
    pub expires_at: Option<String>,
    /// Status.
    pub status: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Creation time.
    pub created_on: Option<String>,
    /// Creator.
    pub created_by: Option<String>,
    /// Network policy bypass minutes.
    pub mins_to_bypass_network_policy_requirement: Option<u32>,
    /// Name of the token this one was rotated to.
    pub rotated_to: Option<String>,
}

/// Decoded programmatic access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammaticAccessToken {
    /// Token name.
    pub name: String,
    /// Owning user.
    pub user_name: AccountObjectIdentifier,
    /// Role restriction.
    pub role_restriction: Option<AccountObjectIdentifier>,
    /// Expiry time.
    pub expires_at: Option<OffsetDateTime>,
    /// Status.
    pub status: Option<ProgrammaticAccessTokenStatus>,
    /// Comment.
    pub comment: Option<String>,
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Creator.
    pub created_by: Option<String>,
    /// Network policy bypass minutes.
    pub mins_to_bypass_network_policy_requirement: Option<u32>,
    /// Name of the token this one was rotated to.
    pub rotated_to: Option<String>,
}

impl ProgrammaticAccessToken {
    /// Returns the token identifier.
    #[must_use]
    pub fn id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(&self.name)
    }
}

impl TryFrom<ProgrammaticAccessTokenRow> for ProgrammaticAccessToken {
    type Error = DecodeError;

    fn try_from(row: ProgrammaticAccessTokenRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "ProgrammaticAccessTokenRow";
        Ok(Self {
            name: required(ROW, "name", row.name.as_deref(), text)?,
            user_name: required(ROW, "user_name", row.user_name.as_deref(), str::parse)?,
            role_restriction: lenient(ROW, "role_restriction", row.role_restriction.as_deref(), str::parse),
            expires_at: timestamp(ROW, "expires_at", row.expires_at.as_deref()),
            status: lenient(ROW, "status", row.status.as_deref(), ProgrammaticAccessTokenStatus::parse),
            comment: non_empty(row.comment.as_deref()),
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            created_by: non_empty(row.created_by.as_deref()),
            mins_to_bypass_network_policy_requirement: row.mins_to_bypass_network_policy_requirement,
            rotated_to: non_empty(row.rotated_to.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Programmatic access token operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct ProgrammaticAccessTokens<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> ProgrammaticAccessTokens<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Adds a token and returns its one-time secret.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn add(
        &self,
        ctx: &RequestContext,
        options: &AddProgrammaticAccessTokenOptions,
    ) -> Result<AddProgrammaticAccessTokenResult, SdkError> {
        self.client.query_one(ctx, options).await
    }

    /// Modifies a token.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn modify(
        &self,
        ctx: &RequestContext,
        options: &ModifyProgrammaticAccessTokenOptions,
    ) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Rotates a token and returns the new secret.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn rotate(
        &self,
        ctx: &RequestContext,
        options: &RotateProgrammaticAccessTokenOptions,
    ) -> Result<RotateProgrammaticAccessTokenResult, SdkError> {
        self.client.query_one(ctx, options).await
    }

    /// Removes a token.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn remove(
        &self,
        ctx: &RequestContext,
        options: &RemoveProgrammaticAccessTokenOptions,
    ) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Removes a token, treating a missing token as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing token.
    pub async fn remove_safely(
        &self,
        ctx: &RequestContext,
        user: &AccountObjectIdentifier,
        name: &AccountObjectIdentifier,
    ) -> Result<(), SdkError> {
        let options = RemoveProgrammaticAccessTokenOptions {
            if_exists: false,
            user: user.clone(),
            name: name.clone(),
        };
        ignore_missing(self.remove(ctx, &options).await)
    }

    /// Lists tokens.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(
        &self,
        ctx: &RequestContext,
        options: &ShowProgrammaticAccessTokenOptions,
    ) -> Result<Vec<ProgrammaticAccessToken>, SdkError> {
        self.client.query_as::<_, ProgrammaticAccessTokenRow, ProgrammaticAccessToken>(ctx, options).await
    }

    /// Returns the token `name` of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no token matches.
    pub async fn show_by_id(
        &self,
        ctx: &RequestContext,
        user: &AccountObjectIdentifier,
        name: &AccountObjectIdentifier,
    ) -> Result<ProgrammaticAccessToken, SdkError> {
        let options = ShowProgrammaticAccessTokenOptions {
            user: Some(user.clone()),
        };
        let tokens = self.show(ctx, &options).await?;
        find_by_id(tokens, "programmatic access token", name, |token| {
            token.id() == *name && token.user_name == *user
        })
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
        user: &AccountObjectIdentifier,
        name: &AccountObjectIdentifier,
    ) -> Result<ProgrammaticAccessToken, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, user, name).await, "programmatic access token", name)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

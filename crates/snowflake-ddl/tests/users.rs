// crates/snowflake-ddl/tests/users.rs
// ============================================================================
// Module: User Statement Tests
// Description: Byte-exact rendering and validation of user grammars.
// Purpose: Pin CREATE, ALTER, DROP, DESCRIBE, and SHOW USER text.
// ============================================================================

//! User statement tests.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use snowflake_ddl::AccountObjectIdentifier;
use snowflake_ddl::SchemaObjectIdentifier;
use snowflake_ddl::Statement;
use snowflake_ddl::objects::common::LimitFrom;
use snowflake_ddl::objects::common::Like;
use snowflake_ddl::objects::common::Parameter;
use snowflake_ddl::objects::common::ParameterValue;
use snowflake_ddl::objects::common::TagAssociation;
use snowflake_ddl::objects::users::AlterUserAction;
use snowflake_ddl::objects::users::AlterUserOptions;
use snowflake_ddl::objects::users::CreateUserOptions;
use snowflake_ddl::objects::users::DescribeUserOptions;
use snowflake_ddl::objects::users::DropUserOptions;
use snowflake_ddl::objects::users::PolicyKind;
use snowflake_ddl::objects::users::SecondaryRolesOption;
use snowflake_ddl::objects::users::ShowUserOptions;
use snowflake_ddl::objects::users::UserObjectProperties;
use snowflake_ddl::objects::users::UserSet;
use snowflake_ddl::objects::users::UserType;
use snowflake_ddl::objects::users::UserUnset;
use snowflake_ddl::to_sql;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn user() -> AccountObjectIdentifier {
    AccountObjectIdentifier::new("jsmith")
}

fn alter(action: AlterUserAction) -> AlterUserOptions {
    AlterUserOptions {
        if_exists: false,
        name: user(),
        action,
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

#[test]
fn create_user_renders_properties_parameters_and_tags() {
    let mut options = CreateUserOptions::new(user());
    options.if_not_exists = true;
    options.properties = UserObjectProperties {
        password: Some(String::from("secret")),
        login_name: Some(String::from("jsmith")),
        display_name: Some(String::from("J Smith")),
        must_change_password: Some(true),
        days_to_expiry: Some(30),
        default_warehouse: Some(AccountObjectIdentifier::new("wh")),
        default_namespace: Some(String::from("db.sc")),
        default_role: Some(AccountObjectIdentifier::new("analyst")),
        default_secondary_roles: Some(SecondaryRolesOption::All),
        user_type: Some(UserType::Person),
        comment: Some(String::from("c")),
        ..UserObjectProperties::default()
    };
    options.session_parameters = vec![Parameter::new("statement_timeout_in_seconds", ParameterValue::Integer(60))];
    options.tags = vec![TagAssociation::new(SchemaObjectIdentifier::new("db", "sc", "tag"), "v")];
    assert_eq!(
        to_sql(&options),
        r#"CREATE USER IF NOT EXISTS "jsmith" PASSWORD = 'secret' LOGIN_NAME = 'jsmith' DISPLAY_NAME = 'J Smith' MUST_CHANGE_PASSWORD = true DAYS_TO_EXPIRY = 30 DEFAULT_WAREHOUSE = "wh" DEFAULT_NAMESPACE = db.sc DEFAULT_ROLE = "analyst" DEFAULT_SECONDARY_ROLES = ('ALL') TYPE = PERSON COMMENT = 'c' STATEMENT_TIMEOUT_IN_SECONDS = 60 WITH TAG ("db"."sc"."tag" = 'v')"#
    );
    assert!(options.validate().is_ok());
}

#[test]
fn create_user_renders_service_user_with_empty_secondary_roles() {
    let mut options = CreateUserOptions::new(user());
    options.or_replace = true;
    options.properties.rsa_public_key = Some(String::from("MIIB"));
    options.properties.default_secondary_roles = Some(SecondaryRolesOption::None);
    options.properties.user_type = Some(UserType::Service);
    assert_eq!(
        to_sql(&options),
        r#"CREATE OR REPLACE USER "jsmith" DEFAULT_SECONDARY_ROLES = () RSA_PUBLIC_KEY = 'MIIB' TYPE = SERVICE"#
    );
}

#[test]
fn create_user_rejects_or_replace_with_if_not_exists() {
    let mut options = CreateUserOptions::new(user());
    options.or_replace = true;
    options.if_not_exists = true;
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateUserOptions: options: conflicting: OrReplace, IfNotExists"
    );
}

#[test]
fn create_user_rejects_malformed_parameter_names() {
    let mut options = CreateUserOptions::new(user());
    options.session_parameters = vec![Parameter::new("bad name", ParameterValue::Boolean(true))];
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateUserOptions: SessionParameters: invalid: parameter names must be non-empty words"
    );
}

// ============================================================================
// SECTION: Alter
// ============================================================================

#[test]
fn alter_user_renders_simple_actions() {
    let mut rename = alter(AlterUserAction::RenameTo(AccountObjectIdentifier::new("jdoe")));
    rename.if_exists = true;
    assert_eq!(to_sql(&rename), r#"ALTER USER IF EXISTS "jsmith" RENAME TO "jdoe""#);
    assert_eq!(to_sql(&alter(AlterUserAction::ResetPassword)), r#"ALTER USER "jsmith" RESET PASSWORD"#);
    assert_eq!(to_sql(&alter(AlterUserAction::AbortAllQueries)), r#"ALTER USER "jsmith" ABORT ALL QUERIES"#);
}

#[test]
fn alter_user_set_renders_properties_then_parameters() {
    let options = alter(AlterUserAction::Set(UserSet {
        properties: UserObjectProperties {
            display_name: Some(String::from("x")),
            disabled: Some(false),
            ..UserObjectProperties::default()
        },
        session_parameters: vec![Parameter::new("STATEMENT_TIMEOUT_IN_SECONDS", ParameterValue::Integer(10))],
    }));
    assert_eq!(
        to_sql(&options),
        r#"ALTER USER "jsmith" SET DISPLAY_NAME = 'x' DISABLED = false STATEMENT_TIMEOUT_IN_SECONDS = 10"#
    );
}

#[test]
fn empty_user_set_is_rejected() {
    let options = alter(AlterUserAction::Set(UserSet::default()));
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterUserOptions: Set: invalid: at least one property or parameter must be set"
    );
}

#[test]
fn alter_user_unset_renders_properties_then_parameters() {
    let options = alter(AlterUserAction::Unset(UserUnset {
        display_name: true,
        comment: true,
        session_parameters: vec![String::from("statement_timeout_in_seconds")],
        ..UserUnset::default()
    }));
    assert_eq!(
        to_sql(&options),
        r#"ALTER USER "jsmith" UNSET DISPLAY_NAME, COMMENT, STATEMENT_TIMEOUT_IN_SECONDS"#
    );
}

#[test]
fn empty_user_unset_is_rejected() {
    let options = alter(AlterUserAction::Unset(UserUnset::default()));
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterUserOptions: Unset: invalid: at least one property or parameter must be unset"
    );
}

#[test]
fn alter_user_renders_tag_changes() {
    let tag = SchemaObjectIdentifier::new("db", "sc", "tag");
    assert_eq!(
        to_sql(&alter(AlterUserAction::SetTags(vec![TagAssociation::new(tag.clone(), "v")]))),
        r#"ALTER USER "jsmith" SET TAG "db"."sc"."tag" = 'v'"#
    );
    assert_eq!(
        to_sql(&alter(AlterUserAction::UnsetTags(vec![tag]))),
        r#"ALTER USER "jsmith" UNSET TAG "db"."sc"."tag""#
    );
}

#[test]
fn alter_user_renders_policy_attachment() {
    let set = alter(AlterUserAction::SetPolicy {
        kind: PolicyKind::PasswordPolicy,
        policy: SchemaObjectIdentifier::new("db", "sc", "pp"),
        force: true,
    });
    assert_eq!(to_sql(&set), r#"ALTER USER "jsmith" SET PASSWORD POLICY "db"."sc"."pp" FORCE"#);
    let unset = alter(AlterUserAction::UnsetPolicy(PolicyKind::SessionPolicy));
    assert_eq!(to_sql(&unset), r#"ALTER USER "jsmith" UNSET SESSION POLICY"#);
}

#[test]
fn alter_user_rejects_invalid_policy_identifier() {
    let options = alter(AlterUserAction::SetPolicy {
        kind: PolicyKind::AuthenticationPolicy,
        policy: SchemaObjectIdentifier::new("db", "", "ap"),
        force: false,
    });
    assert_eq!(options.validate().unwrap_err().to_string(), "AlterUserOptions: Policy: invalid-identifier");
}

// ============================================================================
// SECTION: Drop / Describe / Show
// ============================================================================

#[test]
fn drop_and_describe_user_render_name() {
    let drop = DropUserOptions {
        if_exists: true,
        name: user(),
    };
    assert_eq!(to_sql(&drop), r#"DROP USER IF EXISTS "jsmith""#);
    let describe = DescribeUserOptions {
        name: user(),
    };
    assert_eq!(to_sql(&describe), r#"DESCRIBE USER "jsmith""#);
}

#[test]
fn show_terse_users_renders_filters_in_order() {
    let options = ShowUserOptions {
        terse: true,
        like: Some(Like::new("j%")),
        starts_with: Some(String::from("j")),
        limit: Some(LimitFrom::rows(5)),
    };
    assert_eq!(to_sql(&options), "SHOW TERSE USERS LIKE 'j%' STARTS WITH 'j' LIMIT 5");
}

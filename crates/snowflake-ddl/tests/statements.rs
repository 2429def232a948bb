// crates/snowflake-ddl/tests/statements.rs
// ============================================================================
// Module: Statement Tests
// Description: Byte-exact rendering and validation of object grammars.
// Purpose: Pin representative statements across object kinds.
// ============================================================================

//! Object grammar rendering and validation tests.

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
use snowflake_ddl::objects::accounts::AccountEdition;
use snowflake_ddl::objects::accounts::AccountSet;
use snowflake_ddl::objects::accounts::AlterAccountAction;
use snowflake_ddl::objects::accounts::AlterAccountOptions;
use snowflake_ddl::objects::accounts::DropAccountOptions;
use snowflake_ddl::objects::accounts::ShowAccountOptions;
use snowflake_ddl::objects::accounts::parse_account_create_response;
use snowflake_ddl::objects::common::Like;
use snowflake_ddl::objects::compute_pools::ComputePoolInstanceFamily;
use snowflake_ddl::objects::compute_pools::CreateComputePoolOptions;
use snowflake_ddl::objects::pipes::AlterPipeOptions;
use snowflake_ddl::objects::pipes::CreatePipeOptions;
use snowflake_ddl::objects::tasks::AlterTaskAction;
use snowflake_ddl::objects::tasks::AlterTaskOptions;
use snowflake_ddl::objects::tasks::ExecuteTaskOptions;
use snowflake_ddl::objects::tasks::ShowTaskOptions;
use snowflake_ddl::objects::tasks::TaskSet;
use snowflake_ddl::objects::tasks::TaskUnset;
use snowflake_ddl::to_sql;

// ============================================================================
// SECTION: Accounts
// ============================================================================

#[test]
fn drop_account_renders_grace_period() {
    let options = DropAccountOptions::new(AccountObjectIdentifier::new("ACME"), 10);
    assert_eq!(to_sql(&options), r#"DROP ACCOUNT "ACME" GRACE_PERIOD_IN_DAYS = 10"#);
}

#[test]
fn drop_account_rejects_short_grace_period() {
    let options = DropAccountOptions::new(AccountObjectIdentifier::new("ACME"), 1);
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "DropAccountOptions: GracePeriodInDays: in-range [3, 90]"
    );
}

#[test]
fn show_accounts_renders_history_before_like() {
    let options = ShowAccountOptions {
        history: true,
        like: Some(Like::new("myaccount")),
    };
    assert_eq!(to_sql(&options), "SHOW ACCOUNTS HISTORY LIKE 'myaccount'");
}

#[test]
fn alter_account_set_requires_exactly_one_property() {
    let options = AlterAccountOptions {
        name: None,
        action: AlterAccountAction::Set(AccountSet::default()),
    };
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterAccountOptions: Set: exactly-one-of: Parameters, LegacyParameters, ResourceMonitor, \
         PackagesPolicy, PasswordPolicy, SessionPolicy, AuthenticationPolicy, FeaturePolicySet, OrgAdmin, \
         ConsumptionBillingEntity"
    );
}

#[test]
fn edition_parses_documented_names_only() {
    assert_eq!("standard".parse::<AccountEdition>().unwrap(), AccountEdition::Standard);
    assert!("businesscritical".parse::<AccountEdition>().is_err());
}

#[test]
fn create_account_response_derives_organization_from_url() {
    let response = parse_account_create_response(
        r#"{"accountLocator":"AB12345","accountName":"acc_name","url":"https://org_name-acc_name.snowflakecomputing.com","edition":"STANDARD","regionGroup":"PUBLIC","cloud":"aws","region":"us-west-2"}"#,
    )
    .unwrap();
    assert_eq!(response.organization_name.as_deref(), Some("ORG_NAME"));
    assert_eq!(response.account_name.as_deref(), Some("acc_name"));
    assert_eq!(response.edition, Some(AccountEdition::Standard));
}

// ============================================================================
// SECTION: Compute Pools
// ============================================================================

#[test]
fn create_compute_pool_renders_required_properties() {
    let options = CreateComputePoolOptions::new(
        AccountObjectIdentifier::new("mypool"),
        1,
        3,
        ComputePoolInstanceFamily::CpuX64Xs,
    );
    assert_eq!(
        to_sql(&options),
        r#"CREATE COMPUTE POOL "mypool" MIN_NODES = 1 MAX_NODES = 3 INSTANCE_FAMILY = CPU_X64_XS"#
    );
}

#[test]
fn create_compute_pool_rejects_max_below_min() {
    let options = CreateComputePoolOptions::new(
        AccountObjectIdentifier::new("mypool"),
        2,
        1,
        ComputePoolInstanceFamily::CpuX64Xs,
    );
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateComputePoolOptions: MaxNodes: greater-or-equal to MinNodes (2)"
    );
}

// ============================================================================
// SECTION: Pipes And Tasks
// ============================================================================

#[test]
fn create_pipe_renders_copy_statement_verbatim() {
    let mut options = CreatePipeOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "p"),
        "COPY INTO t FROM @stage",
    );
    options.auto_ingest = Some(true);
    assert_eq!(
        to_sql(&options),
        r#"CREATE PIPE "db"."sc"."p" AUTO_INGEST = true AS COPY INTO t FROM @stage"#
    );
}

#[test]
fn pause_pipe_renders_execution_flag() {
    let options = AlterPipeOptions::set_paused(SchemaObjectIdentifier::new("db", "sc", "p"), false);
    assert_eq!(to_sql(&options), r#"ALTER PIPE "db"."sc"."p" SET PIPE_EXECUTION_PAUSED = false"#);
}

#[test]
fn alter_task_set_renders_schedule_and_timeout() {
    let options = AlterTaskOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "t"),
        AlterTaskAction::Set(TaskSet {
            schedule: Some("USING CRON 0 * * * * UTC".into()),
            user_task_timeout_ms: Some(60_000),
            ..TaskSet::default()
        }),
    );
    assert_eq!(
        to_sql(&options),
        r#"ALTER TASK "db"."sc"."t" SET SCHEDULE = 'USING CRON 0 * * * * UTC' USER_TASK_TIMEOUT_MS = 60000"#
    );
}

#[test]
fn alter_task_unset_renders_comma_list() {
    let options = AlterTaskOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "t"),
        AlterTaskAction::Unset(TaskUnset {
            schedule: true,
            comment: true,
            ..TaskUnset::default()
        }),
    );
    assert_eq!(to_sql(&options), r#"ALTER TASK "db"."sc"."t" UNSET SCHEDULE, COMMENT"#);
}

#[test]
fn empty_task_set_is_rejected() {
    let options = AlterTaskOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "t"),
        AlterTaskAction::Set(TaskSet::default()),
    );
    let err = options.validate().unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].field, "Set");
}

#[test]
fn add_after_requires_predecessors() {
    let options = AlterTaskOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "t"),
        AlterTaskAction::AddAfter(Vec::new()),
    );
    assert_eq!(options.validate().unwrap_err().to_string(), "AlterTaskOptions: AddAfter: required");
}

#[test]
fn execute_task_renders_retry_last() {
    let options = ExecuteTaskOptions {
        name: SchemaObjectIdentifier::new("db", "sc", "t"),
        retry_last: true,
    };
    assert_eq!(to_sql(&options), r#"EXECUTE TASK "db"."sc"."t" RETRY LAST"#);
}

#[test]
fn show_tasks_renders_root_only_after_starts_with() {
    let options = ShowTaskOptions {
        terse: true,
        starts_with: Some("LOAD".into()),
        root_only: true,
        ..ShowTaskOptions::default()
    };
    assert_eq!(to_sql(&options), "SHOW TERSE TASKS STARTS WITH 'LOAD' ROOT ONLY");
}

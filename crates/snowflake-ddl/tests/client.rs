// crates/snowflake-ddl/tests/client.rs
// ============================================================================
// Module: Client Tests
// Description: Façade dispatch, safe variants, and row decoding.
// Purpose: Pin the validate-render-dispatch-decode path over a driver.
// ============================================================================

//! Session façade tests.

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

mod common;

use serde_json::json;
use snowflake_ddl::AccountObjectIdentifier;
use snowflake_ddl::DriverError;
use snowflake_ddl::RequestContext;
use snowflake_ddl::SchemaObjectIdentifier;
use snowflake_ddl::SdkError;
use snowflake_ddl::objects::accounts::AccountEdition;
use snowflake_ddl::objects::accounts::CreateAccountOptions;
use snowflake_ddl::objects::common::ObjectType;
use snowflake_ddl::objects::compute_pools::ComputePoolInstanceFamily;
use snowflake_ddl::objects::compute_pools::CreateComputePoolOptions;
use snowflake_ddl::objects::grants::ShowGrantOptions;
use snowflake_ddl::objects::grants::ShowGrantsTarget;
use snowflake_ddl::objects::pipes::ShowPipeOptions;
use snowflake_ddl::objects::programmatic_access_tokens::AddProgrammaticAccessTokenOptions;
use snowflake_ddl::objects::tasks::TaskState;

use crate::common::ScriptedDriver;
use crate::common::client;
use crate::common::does_not_exist;

// ============================================================================
// SECTION: Dispatch
// ============================================================================

#[tokio::test]
async fn invalid_options_never_reach_the_driver() {
    let driver = ScriptedDriver::new();
    let client = client(&driver);
    let options = CreateComputePoolOptions::new(
        AccountObjectIdentifier::new("mypool"),
        2,
        1,
        ComputePoolInstanceFamily::CpuX64Xs,
    );

    let err = client.compute_pools().create(&RequestContext::new(), &options).await.unwrap_err();

    assert!(matches!(err, SdkError::Validation(_)));
    assert!(driver.statements().is_empty());
}

#[tokio::test]
async fn request_context_is_forwarded_untouched() {
    let driver = ScriptedDriver::new();
    let client = client(&driver);
    let ctx = RequestContext::new().with_label("QUERY_TAG", "nightly-load");
    let options = CreateComputePoolOptions::new(
        AccountObjectIdentifier::new("mypool"),
        1,
        3,
        ComputePoolInstanceFamily::CpuX64Xs,
    );

    client.compute_pools().create(&ctx, &options).await.unwrap();

    assert_eq!(driver.labels()[0].get("QUERY_TAG").map(String::as_str), Some("nightly-load"));
}

#[tokio::test]
async fn create_account_reads_status_through_the_query_id() {
    let driver = ScriptedDriver::new();
    driver.respond(
        "CREATE ACCOUNT",
        json!([{
            "status": r#"{"accountLocator":"AB12345","accountName":"acc_name","url":"https://org_name-acc_name.snowflakecomputing.com","edition":"ENTERPRISE"}"#
        }]),
    );
    let client = client(&driver);
    let mut options = CreateAccountOptions::new(
        AccountObjectIdentifier::new("acc_name"),
        "admin",
        "admin@example.com",
        AccountEdition::Enterprise,
    );
    options.admin_password = Some("Secret-Passw0rd".into());

    let response = client.accounts().create(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(response.account_locator.as_deref(), Some("AB12345"));
    assert_eq!(response.edition, Some(AccountEdition::Enterprise));
    assert_eq!(response.account_id().unwrap().account_name(), "acc_name");
}

#[tokio::test]
async fn programmatic_access_token_secret_is_returned_once() {
    let driver = ScriptedDriver::new();
    driver.respond("ALTER USER", json!([{ "token_name": "CI", "token_secret": "ey.secret" }]));
    let client = client(&driver);
    let options = AddProgrammaticAccessTokenOptions::new(
        AccountObjectIdentifier::new("svc"),
        AccountObjectIdentifier::new("ci"),
    );

    let result = client.programmatic_access_tokens().add(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(result.token_secret.as_deref(), Some("ey.secret"));
    assert!(!format!("{result:?}").contains("ey.secret"));
}

// ============================================================================
// SECTION: Safe Variants
// ============================================================================

#[tokio::test]
async fn drop_safely_ignores_missing_objects() {
    let driver = ScriptedDriver::new();
    driver.fail("DROP COMPUTE POOL", does_not_exist("MYPOOL"));
    let client = client(&driver);

    client.compute_pools().drop_safely(&RequestContext::new(), &AccountObjectIdentifier::new("mypool")).await.unwrap();

    assert_eq!(driver.statements(), vec![r#"DROP COMPUTE POOL "mypool""#.to_string()]);
}

#[tokio::test]
async fn drop_safely_propagates_other_failures() {
    let driver = ScriptedDriver::new();
    driver.fail("DROP PIPE", DriverError::new("Insufficient privileges to operate on pipe"));
    let client = client(&driver);

    let err = client
        .pipes()
        .drop_safely(&RequestContext::new(), &SchemaObjectIdentifier::new("db", "sc", "p"))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Driver(_)));
}

#[tokio::test]
async fn show_by_id_reports_not_found_when_no_row_matches() {
    let driver = ScriptedDriver::new();
    driver.respond("SHOW PIPES", json!([{ "name": "other", "database_name": "db", "schema_name": "sc" }]));
    let client = client(&driver);

    let err = client
        .pipes()
        .show_by_id(&RequestContext::new(), &SchemaObjectIdentifier::new("db", "sc", "p"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), r#"pipe "db"."sc"."p" not found"#);
}

#[tokio::test]
async fn show_by_id_safely_downgrades_missing_schema() {
    let driver = ScriptedDriver::new();
    driver.fail("SHOW PIPES", does_not_exist("DB.SC"));
    let client = client(&driver);

    let err = client
        .pipes()
        .show_by_id_safely(&RequestContext::new(), &SchemaObjectIdentifier::new("db", "sc", "p"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

#[tokio::test]
async fn malformed_optional_columns_are_left_unset() {
    let driver = ScriptedDriver::new();
    driver.respond(
        "SHOW PIPES",
        json!([{
            "name": "p",
            "database_name": "db",
            "schema_name": "sc",
            "created_on": "yesterday",
            "definition": "COPY INTO t FROM @stage",
        }]),
    );
    let client = client(&driver);

    let pipes = client.pipes().show(&RequestContext::new(), &ShowPipeOptions::default()).await.unwrap();

    assert_eq!(pipes.len(), 1);
    assert_eq!(pipes[0].created_on, None);
    assert_eq!(pipes[0].definition.as_deref(), Some("COPY INTO t FROM @stage"));
    assert_eq!(pipes[0].id(), SchemaObjectIdentifier::new("db", "sc", "p"));
}

#[tokio::test]
async fn missing_identity_column_fails_the_listing() {
    let driver = ScriptedDriver::new();
    driver.respond("SHOW PIPES", json!([{ "name": "p", "database_name": "db" }]));
    let client = client(&driver);

    let err = client.pipes().show(&RequestContext::new(), &ShowPipeOptions::default()).await.unwrap_err();

    assert!(matches!(err, SdkError::Decode(_)));
}

#[tokio::test]
async fn task_rows_decode_predecessors_and_state() {
    let driver = ScriptedDriver::new();
    driver.respond(
        "DESCRIBE TASK",
        json!([{
            "name": "child",
            "database_name": "db",
            "schema_name": "sc",
            "state": "suspended",
            "predecessors": r#"["\"db\".\"sc\".\"root\""]"#,
            "allow_overlapping_execution": "true",
            "error_integration": "null",
        }]),
    );
    let client = client(&driver);

    let task = client.tasks().describe(&RequestContext::new(), &SchemaObjectIdentifier::new("db", "sc", "child")).await.unwrap();

    assert_eq!(task.state, Some(TaskState::Suspended));
    assert_eq!(task.predecessors, vec![SchemaObjectIdentifier::new("db", "sc", "root")]);
    assert!(task.allow_overlapping_execution);
    assert_eq!(task.error_integration, None);
}

#[tokio::test]
async fn user_grantee_prefix_is_stripped() {
    let driver = ScriptedDriver::new();
    driver.respond(
        "SHOW GRANTS",
        json!([{
            "privilege": "USAGE",
            "granted_on": "COMPUTE_POOL",
            "name": "MYPOOL",
            "granted_to": "USER",
            "grantee_name": "USER$ALICE",
        }]),
    );
    let client = client(&driver);
    let options = ShowGrantOptions {
        target: Some(ShowGrantsTarget::ToUser(AccountObjectIdentifier::new("ALICE"))),
    };

    let grants = client.grants().show(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(grants[0].grantee_name, "ALICE");
    assert_eq!(grants[0].granted_on, Some(ObjectType::ComputePool));
    assert_eq!(driver.statements(), vec![r#"SHOW GRANTS TO USER "ALICE""#.to_string()]);
}

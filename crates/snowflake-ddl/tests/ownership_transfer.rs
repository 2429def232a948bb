// crates/snowflake-ddl/tests/ownership_transfer.rs
// ============================================================================
// Module: Ownership Transfer Tests
// Description: Scripted pipe and task ownership transfers.
// Purpose: Pin the statement sequence and resume decisions of transfers.
// ============================================================================

//! Ownership transfer orchestration tests.

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
use snowflake_ddl::DatabaseObjectIdentifier;
use snowflake_ddl::RequestContext;
use snowflake_ddl::SchemaObjectIdentifier;
use snowflake_ddl::SdkError;
use snowflake_ddl::TransferStep;
use snowflake_ddl::objects::common::ObjectType;
use snowflake_ddl::objects::grants::BulkScope;
use snowflake_ddl::objects::grants::GrantOn;
use snowflake_ddl::objects::grants::GrantOwnershipOptions;
use snowflake_ddl::objects::grants::Grantee;
use snowflake_ddl::objects::grants::ObjectName;
use snowflake_ddl::objects::grants::OutboundPrivileges;

use crate::common::ScriptedDriver;
use crate::common::client;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn pipe() -> SchemaObjectIdentifier {
    SchemaObjectIdentifier::new("db", "sc", "p")
}

fn ownership(on: GrantOn, role: &str, current_grants: OutboundPrivileges) -> GrantOwnershipOptions {
    GrantOwnershipOptions {
        on,
        to: Grantee::Role(AccountObjectIdentifier::new(role)),
        current_grants: Some(current_grants),
    }
}

fn pipe_grant(id: SchemaObjectIdentifier, role: &str, current_grants: OutboundPrivileges) -> GrantOwnershipOptions {
    ownership(
        GrantOn::Object {
            object_type: ObjectType::Pipe,
            name: ObjectName::Schema(id),
        },
        role,
        current_grants,
    )
}

fn role_grant(privilege: &str, granted_on: &str, name: &str, grantee: &str) -> serde_json::Value {
    json!({
        "privilege": privilege,
        "granted_on": granted_on,
        "name": name,
        "granted_to": "ROLE",
        "grantee_name": grantee,
        "grant_option": "false",
    })
}

/// Session role ADMIN owning a running pipe and holding OPERATE on it.
fn running_pipe_driver() -> std::sync::Arc<ScriptedDriver> {
    let driver = ScriptedDriver::new();
    driver
        .respond("SELECT CURRENT_ROLE()", json!([{ "CURRENT_ROLE": "ADMIN" }]))
        .respond(
            "SHOW GRANTS ON PIPE",
            json!([
                role_grant("OWNERSHIP", "PIPE", "DB.SC.P", "ADMIN"),
                role_grant("OPERATE", "PIPE", "DB.SC.P", "ADMIN"),
            ]),
        )
        .respond(
            "SELECT SYSTEM$PIPE_STATUS",
            json!([{ "PIPE_STATUS": r#"{"executionState":"RUNNING","pendingFileCount":0}"# }]),
        );
    driver
}

fn task_row(name: &str, state: &str, predecessors: &str) -> serde_json::Value {
    json!({
        "name": name,
        "database_name": "db",
        "schema_name": "sc",
        "owner": "ADMIN",
        "warehouse": "WH",
        "state": state,
        "predecessors": predecessors,
        "definition": "SELECT 1",
        "allow_overlapping_execution": "false",
        "error_integration": "null",
    })
}

/// Session role ADMIN able to run the started graph `root -> child`.
fn task_graph_driver() -> std::sync::Arc<ScriptedDriver> {
    let driver = ScriptedDriver::new();
    driver
        .respond("SELECT CURRENT_ROLE()", json!([{ "CURRENT_ROLE": "ADMIN" }]))
        .respond(
            "SELECT CURRENT_AVAILABLE_ROLES()",
            json!([{ "CURRENT_AVAILABLE_ROLES": r#"["ADMIN","PUBLIC"]"# }]),
        )
        .respond("SHOW TASKS", json!([task_row("child", "started", r#"["\"db\".\"sc\".\"root\""]"#)]))
        .respond(
            "SHOW GRANTS TO ROLE",
            json!([
                role_grant("EXECUTE TASK", "ACCOUNT", "ACME", "ADMIN"),
                role_grant("USAGE", "WAREHOUSE", "WH", "ADMIN"),
            ]),
        )
        .respond(
            r#"DESCRIBE TASK "db"."sc"."child""#,
            json!([task_row("child", "started", r#"["\"db\".\"sc\".\"root\""]"#)]),
        )
        .respond(r#"DESCRIBE TASK "db"."sc"."root""#, json!([task_row("root", "started", "[]")]));
    driver
}

fn task_grant(role: &str, current_grants: OutboundPrivileges) -> GrantOwnershipOptions {
    ownership(
        GrantOn::Object {
            object_type: ObjectType::Task,
            name: ObjectName::Schema(SchemaObjectIdentifier::new("db", "sc", "child")),
        },
        role,
        current_grants,
    )
}

// ============================================================================
// SECTION: Pipes
// ============================================================================

#[tokio::test]
async fn running_pipe_is_paused_granted_and_resumed_when_operate_is_copied() {
    let driver = running_pipe_driver();
    let client = client(&driver);
    let options = pipe_grant(pipe(), "LOADER", OutboundPrivileges::Copy);

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(driver.statements(), vec![
        r#"SELECT CURRENT_ROLE() AS "CURRENT_ROLE""#.to_string(),
        r#"SHOW GRANTS ON PIPE "db"."sc"."p""#.to_string(),
        r#"SELECT SYSTEM$PIPE_STATUS('"db"."sc"."p"') AS "PIPE_STATUS""#.to_string(),
        r#"ALTER PIPE "db"."sc"."p" SET PIPE_EXECUTION_PAUSED = true"#.to_string(),
        r#"GRANT OWNERSHIP ON PIPE "db"."sc"."p" TO ROLE "LOADER" COPY CURRENT GRANTS"#.to_string(),
        r#"SELECT SYSTEM$PIPE_FORCE_RESUME('"db"."sc"."p"', 'ownership_transfer_check_override') AS "PIPE_FORCE_RESUME""#
            .to_string(),
    ]);
}

#[tokio::test]
async fn pipe_stays_paused_when_grants_are_revoked() {
    let driver = running_pipe_driver();
    let client = client(&driver);
    let options = pipe_grant(pipe(), "LOADER", OutboundPrivileges::Revoke);

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    let statements = driver.statements();
    assert_eq!(statements.len(), 5);
    assert!(statements[3].ends_with("SET PIPE_EXECUTION_PAUSED = true"));
    assert!(statements[4].starts_with("GRANT OWNERSHIP ON PIPE"));
    assert!(driver.statements_starting_with("SELECT SYSTEM$PIPE_FORCE_RESUME").is_empty());
}

#[tokio::test]
async fn pipe_stays_paused_when_grants_are_revoked_to_the_session_role() {
    let driver = running_pipe_driver();
    let client = client(&driver);
    let options = pipe_grant(pipe(), "ADMIN", OutboundPrivileges::Revoke);

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(driver.statements_starting_with("ALTER PIPE").len(), 1);
    assert_eq!(driver.statements_starting_with("GRANT OWNERSHIP").len(), 1);
    assert!(driver.statements_starting_with("SELECT SYSTEM$PIPE_FORCE_RESUME").is_empty());
}

#[tokio::test]
async fn pipe_stays_paused_when_only_ownership_granted_operate() {
    let driver = running_pipe_driver();
    driver.respond("SHOW GRANTS ON PIPE", json!([role_grant("OWNERSHIP", "PIPE", "DB.SC.P", "ADMIN")]));
    let client = client(&driver);
    let options = pipe_grant(pipe(), "ADMIN", OutboundPrivileges::Copy);

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(driver.statements_starting_with("ALTER PIPE").len(), 1);
    assert!(driver.statements_starting_with("SELECT SYSTEM$PIPE_FORCE_RESUME").is_empty());
}

#[tokio::test]
async fn pipe_without_operate_is_granted_without_pausing() {
    let driver = ScriptedDriver::new();
    driver
        .respond("SELECT CURRENT_ROLE()", json!([{ "CURRENT_ROLE": "SECURITYADMIN" }]))
        .respond("SHOW GRANTS ON PIPE", json!([role_grant("OWNERSHIP", "PIPE", "DB.SC.P", "ADMIN")]));
    let client = client(&driver);
    let options = pipe_grant(pipe(), "LOADER", OutboundPrivileges::Copy);

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    let statements = driver.statements();
    assert_eq!(statements.len(), 3);
    assert!(statements[2].starts_with("GRANT OWNERSHIP ON PIPE"));
}

#[tokio::test]
async fn paused_pipe_is_not_touched_around_the_grant() {
    let driver = running_pipe_driver();
    driver.respond("SELECT SYSTEM$PIPE_STATUS", json!([{ "PIPE_STATUS": r#"{"executionState":"PAUSED"}"# }]));
    let client = client(&driver);
    let options = pipe_grant(pipe(), "LOADER", OutboundPrivileges::Copy);

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    assert!(driver.statements_starting_with("ALTER PIPE").is_empty());
    assert!(driver.statements_starting_with("SELECT SYSTEM$PIPE_FORCE_RESUME").is_empty());
}

#[tokio::test]
async fn failed_grant_reports_the_grant_step_and_keeps_the_pipe_paused() {
    let driver = running_pipe_driver();
    driver.fail("GRANT OWNERSHIP", snowflake_ddl::DriverError::new("Insufficient privileges"));
    let client = client(&driver);
    let options = pipe_grant(pipe(), "LOADER", OutboundPrivileges::Copy);

    let err = client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap_err();

    assert_eq!(err.transfer_step(), Some(TransferStep::Grant));
    match &err {
        SdkError::OwnershipTransfer {
            object, ..
        } => assert_eq!(object, r#""db"."sc"."p""#),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(driver.statements_starting_with("ALTER PIPE").len(), 1);
    assert!(driver.statements_starting_with("SELECT SYSTEM$PIPE_FORCE_RESUME").is_empty());
}

#[tokio::test]
async fn failed_role_lookup_reports_the_first_step() {
    let driver = ScriptedDriver::new();
    driver.fail("SELECT CURRENT_ROLE()", snowflake_ddl::DriverError::new("session expired"));
    let client = client(&driver);
    let options = pipe_grant(pipe(), "LOADER", OutboundPrivileges::Copy);

    let err = client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap_err();

    assert_eq!(err.transfer_step(), Some(TransferStep::ReadCurrentRole));
    assert_eq!(driver.statements().len(), 1);
}

#[tokio::test]
async fn bulk_pipe_transfer_attempts_every_pipe() {
    let driver = running_pipe_driver();
    driver
        .respond(
            "SHOW PIPES",
            json!([
                { "name": "a", "database_name": "db", "schema_name": "sc" },
                { "name": "b", "database_name": "db", "schema_name": "sc" },
            ]),
        )
        .fail(r#"GRANT OWNERSHIP ON PIPE "db"."sc"."a""#, snowflake_ddl::DriverError::new("denied"));
    let client = client(&driver);
    let options = ownership(
        GrantOn::All {
            object_type: ObjectType::Pipe,
            scope: BulkScope::Schema(DatabaseObjectIdentifier::new("db", "sc")),
        },
        "LOADER",
        OutboundPrivileges::Copy,
    );

    let err = client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap_err();

    assert_eq!(err.transfer_step(), Some(TransferStep::Grant));
    assert_eq!(driver.statements()[0], r#"SHOW PIPES IN SCHEMA "db"."sc""#);
    assert_eq!(driver.statements_starting_with("GRANT OWNERSHIP ON PIPE").len(), 2);
    assert_eq!(driver.statements_starting_with("SELECT SYSTEM$PIPE_FORCE_RESUME").len(), 1);
}

#[tokio::test]
async fn future_grants_take_the_direct_path() {
    let driver = ScriptedDriver::new();
    let client = client(&driver);
    let options = ownership(
        GrantOn::Future {
            object_type: ObjectType::Pipe,
            scope: BulkScope::Schema(DatabaseObjectIdentifier::new("db", "sc")),
        },
        "LOADER",
        OutboundPrivileges::Revoke,
    );

    client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap();

    assert_eq!(driver.statements(), vec![
        r#"GRANT OWNERSHIP ON FUTURE PIPES IN SCHEMA "db"."sc" TO ROLE "LOADER" REVOKE CURRENT GRANTS"#.to_string()
    ]);
}

#[tokio::test]
async fn invalid_ownership_request_never_reaches_the_driver() {
    let driver = ScriptedDriver::new();
    let client = client(&driver);
    let options = pipe_grant(SchemaObjectIdentifier::new("db", "", "p"), "LOADER", OutboundPrivileges::Copy);

    let err = client.grants().grant_ownership(&RequestContext::new(), &options).await.unwrap_err();

    assert!(matches!(err, SdkError::Validation(_)));
    assert!(driver.statements().is_empty());
}

// ============================================================================
// SECTION: Tasks
// ============================================================================

#[tokio::test]
async fn started_graph_is_suspended_granted_and_resumed() {
    let driver = task_graph_driver();
    let client = client(&driver);

    client
        .grants()
        .grant_ownership(&RequestContext::new(), &task_grant("DEPLOYER", OutboundPrivileges::Copy))
        .await
        .unwrap();

    assert_eq!(driver.statements(), vec![
        r#"SELECT CURRENT_ROLE() AS "CURRENT_ROLE""#.to_string(),
        r#"SELECT CURRENT_AVAILABLE_ROLES() AS "CURRENT_AVAILABLE_ROLES""#.to_string(),
        r#"SHOW TASKS LIKE 'child' IN SCHEMA "db"."sc""#.to_string(),
        r#"SHOW GRANTS TO ROLE "ADMIN""#.to_string(),
        r#"DESCRIBE TASK "db"."sc"."child""#.to_string(),
        r#"DESCRIBE TASK "db"."sc"."root""#.to_string(),
        r#"ALTER TASK "db"."sc"."root" SUSPEND"#.to_string(),
        r#"ALTER TASK "db"."sc"."child" SUSPEND"#.to_string(),
        r#"GRANT OWNERSHIP ON TASK "db"."sc"."child" TO ROLE "DEPLOYER" COPY CURRENT GRANTS"#.to_string(),
        r#"ALTER TASK "db"."sc"."child" RESUME"#.to_string(),
        r#"ALTER TASK "db"."sc"."root" RESUME"#.to_string(),
    ]);
}

#[tokio::test]
async fn graph_stays_suspended_when_the_session_loses_the_owner() {
    let driver = task_graph_driver();
    let client = client(&driver);

    client
        .grants()
        .grant_ownership(&RequestContext::new(), &task_grant("DEPLOYER", OutboundPrivileges::Revoke))
        .await
        .unwrap();

    assert_eq!(driver.statements_starting_with("ALTER TASK").len(), 2);
    assert!(driver.statements().iter().all(|sql| !sql.ends_with("RESUME")));
}

#[tokio::test]
async fn graph_is_resumed_when_the_session_holds_the_new_owner() {
    let driver = task_graph_driver();
    let client = client(&driver);

    client
        .grants()
        .grant_ownership(&RequestContext::new(), &task_grant("PUBLIC", OutboundPrivileges::Revoke))
        .await
        .unwrap();

    assert_eq!(driver.statements().iter().filter(|sql| sql.ends_with("RESUME")).count(), 2);
}

#[tokio::test]
async fn graph_stays_suspended_without_warehouse_usage() {
    let driver = task_graph_driver();
    driver.respond("SHOW GRANTS TO ROLE", json!([role_grant("EXECUTE TASK", "ACCOUNT", "ACME", "ADMIN")]));
    let client = client(&driver);

    client
        .grants()
        .grant_ownership(&RequestContext::new(), &task_grant("DEPLOYER", OutboundPrivileges::Copy))
        .await
        .unwrap();

    assert!(driver.statements().iter().all(|sql| !sql.ends_with("RESUME")));
}

#[tokio::test]
async fn failed_root_suspension_stops_before_the_grant() {
    let driver = task_graph_driver();
    driver.fail(r#"ALTER TASK "db"."sc"."root" SUSPEND"#, snowflake_ddl::DriverError::new("denied"));
    let client = client(&driver);

    let err = client
        .grants()
        .grant_ownership(&RequestContext::new(), &task_grant("DEPLOYER", OutboundPrivileges::Copy))
        .await
        .unwrap_err();

    assert_eq!(err.transfer_step(), Some(TransferStep::SuspendRootTasks));
    assert!(driver.statements_starting_with("GRANT").is_empty());
}

#[tokio::test]
async fn missing_task_reports_the_read_state_step() {
    let driver = task_graph_driver();
    driver.respond("SHOW TASKS", json!([]));
    let client = client(&driver);

    let err = client
        .grants()
        .grant_ownership(&RequestContext::new(), &task_grant("DEPLOYER", OutboundPrivileges::Copy))
        .await
        .unwrap_err();

    assert_eq!(err.transfer_step(), Some(TransferStep::ReadState));
    match err {
        SdkError::OwnershipTransfer {
            source, ..
        } => assert!(source.is_not_found()),
        other => panic!("unexpected error {other:?}"),
    }
}

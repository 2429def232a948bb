// crates/snowflake-ddl/tests/services.rs
// ============================================================================
// Module: Service Statement Tests
// Description: Byte-exact rendering and validation of service grammars.
// Purpose: Pin CREATE, EXECUTE JOB, ALTER, DROP, and SHOW SERVICE text.
// ============================================================================

//! Snowpark Container Services statement tests.

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
use snowflake_ddl::DatabaseObjectIdentifier;
use snowflake_ddl::SchemaObjectIdentifier;
use snowflake_ddl::Statement;
use snowflake_ddl::objects::common::LimitFrom;
use snowflake_ddl::objects::common::Like;
use snowflake_ddl::objects::common::TagAssociation;
use snowflake_ddl::objects::services::AlterServiceAction;
use snowflake_ddl::objects::services::AlterServiceOptions;
use snowflake_ddl::objects::services::CreateServiceOptions;
use snowflake_ddl::objects::services::DescribeServiceOptions;
use snowflake_ddl::objects::services::DropServiceOptions;
use snowflake_ddl::objects::services::ExecuteJobServiceOptions;
use snowflake_ddl::objects::services::ServiceIn;
use snowflake_ddl::objects::services::ServiceRestore;
use snowflake_ddl::objects::services::ServiceSet;
use snowflake_ddl::objects::services::ServiceSpecification;
use snowflake_ddl::objects::services::ServiceUnset;
use snowflake_ddl::objects::services::ShowServiceOptions;
use snowflake_ddl::objects::services::TemplateVariable;
use snowflake_ddl::to_sql;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn service() -> SchemaObjectIdentifier {
    SchemaObjectIdentifier::new("db", "sc", "svc")
}

fn create(specification: ServiceSpecification) -> CreateServiceOptions {
    CreateServiceOptions {
        if_not_exists: false,
        name: service(),
        in_compute_pool: AccountObjectIdentifier::new("pool"),
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

fn alter(action: AlterServiceAction) -> AlterServiceOptions {
    AlterServiceOptions {
        if_exists: false,
        name: service(),
        action,
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

#[test]
fn create_service_from_stage_renders_every_property() {
    let mut options = create(ServiceSpecification::FromStage {
        stage: String::from("db.sc.specs"),
        file: String::from("spec.yaml"),
    });
    options.if_not_exists = true;
    options.auto_suspend_secs = Some(600);
    options.external_access_integrations = vec![AccountObjectIdentifier::new("eai")];
    options.auto_resume = Some(true);
    options.min_instances = Some(1);
    options.min_ready_instances = Some(1);
    options.max_instances = Some(2);
    options.query_warehouse = Some(AccountObjectIdentifier::new("wh"));
    options.tags = vec![TagAssociation::new(SchemaObjectIdentifier::new("db", "sc", "tag"), "v")];
    options.comment = Some(String::from("c"));
    assert_eq!(
        to_sql(&options),
        r#"CREATE SERVICE IF NOT EXISTS "db"."sc"."svc" IN COMPUTE POOL "pool" FROM @db.sc.specs SPECIFICATION_FILE = 'spec.yaml' AUTO_SUSPEND_SECS = 600 EXTERNAL_ACCESS_INTEGRATIONS = ("eai") AUTO_RESUME = true MIN_INSTANCES = 1 MIN_READY_INSTANCES = 1 MAX_INSTANCES = 2 QUERY_WAREHOUSE = "wh" TAG ("db"."sc"."tag" = 'v') COMMENT = 'c'"#
    );
    assert!(options.validate().is_ok());
}

#[test]
fn create_service_inline_wraps_specification_in_dollar_quotes() {
    let options = create(ServiceSpecification::Inline(String::from("spec: {}")));
    assert_eq!(
        to_sql(&options),
        r#"CREATE SERVICE "db"."sc"."svc" IN COMPUTE POOL "pool" FROM SPECIFICATION $$spec: {}$$"#
    );
}

#[test]
fn create_service_from_stage_template_renders_using_clause() {
    let options = create(ServiceSpecification::TemplateFromStage {
        stage: String::from("specs"),
        file: String::from("tpl.yaml"),
        using: vec![TemplateVariable::new("tag", "'latest'"), TemplateVariable::new("replicas", "2")],
    });
    assert_eq!(
        to_sql(&options),
        r#"CREATE SERVICE "db"."sc"."svc" IN COMPUTE POOL "pool" FROM @specs SPECIFICATION_TEMPLATE_FILE = 'tpl.yaml' USING (tag => 'latest', replicas => 2)"#
    );
}

#[test]
fn create_service_inline_template_renders_using_clause() {
    let options = create(ServiceSpecification::InlineTemplate {
        template: String::from("spec: {{ tag }}"),
        using: vec![TemplateVariable::new("tag", "'v1'")],
    });
    assert_eq!(
        to_sql(&options),
        r#"CREATE SERVICE "db"."sc"."svc" IN COMPUTE POOL "pool" FROM SPECIFICATION_TEMPLATE $$spec: {{ tag }}$$ USING (tag => 'v1')"#
    );
}

#[test]
fn create_service_rejects_max_below_min_instances() {
    let mut options = create(ServiceSpecification::Inline(String::from("spec: {}")));
    options.min_instances = Some(3);
    options.max_instances = Some(2);
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateServiceOptions: MaxInstances: greater-or-equal to MinInstances (3)"
    );
}

#[test]
fn create_service_requires_stage_and_template_variables() {
    let options = create(ServiceSpecification::TemplateFromStage {
        stage: String::new(),
        file: String::from("tpl.yaml"),
        using: Vec::new(),
    });
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateServiceOptions: Specification.Stage: required\nCreateServiceOptions: Specification.Using: required"
    );
}

// ============================================================================
// SECTION: Execute Job
// ============================================================================

#[test]
fn execute_job_service_renders_specification_last() {
    let options = ExecuteJobServiceOptions {
        in_compute_pool: AccountObjectIdentifier::new("pool"),
        name: SchemaObjectIdentifier::new("db", "sc", "job"),
        async_execution: Some(true),
        query_warehouse: Some(AccountObjectIdentifier::new("wh")),
        comment: Some(String::from("nightly")),
        external_access_integrations: vec![AccountObjectIdentifier::new("eai")],
        specification: ServiceSpecification::Inline(String::from("spec: {}")),
    };
    assert_eq!(
        to_sql(&options),
        r#"EXECUTE JOB SERVICE IN COMPUTE POOL "pool" NAME = "db"."sc"."job" ASYNC = true QUERY_WAREHOUSE = "wh" COMMENT = 'nightly' EXTERNAL_ACCESS_INTEGRATIONS = ("eai") FROM SPECIFICATION $$spec: {}$$"#
    );
    assert!(options.validate().is_ok());
}

#[test]
fn execute_job_service_requires_specification_file() {
    let options = ExecuteJobServiceOptions {
        in_compute_pool: AccountObjectIdentifier::new("pool"),
        name: SchemaObjectIdentifier::new("db", "sc", "job"),
        async_execution: None,
        query_warehouse: None,
        comment: None,
        external_access_integrations: Vec::new(),
        specification: ServiceSpecification::FromStage {
            stage: String::from("specs"),
            file: String::new(),
        },
    };
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "ExecuteJobServiceOptions: Specification.SpecificationFile: required"
    );
}

// ============================================================================
// SECTION: Alter
// ============================================================================

#[test]
fn alter_service_renders_resume_and_suspend() {
    let mut options = alter(AlterServiceAction::Resume);
    options.if_exists = true;
    assert_eq!(to_sql(&options), r#"ALTER SERVICE IF EXISTS "db"."sc"."svc" RESUME"#);
    assert_eq!(to_sql(&alter(AlterServiceAction::Suspend)), r#"ALTER SERVICE "db"."sc"."svc" SUSPEND"#);
}

#[test]
fn alter_service_replaces_specification() {
    let options = alter(AlterServiceAction::FromSpecification(ServiceSpecification::FromStage {
        stage: String::from("specs"),
        file: String::from("v2.yaml"),
    }));
    assert_eq!(
        to_sql(&options),
        r#"ALTER SERVICE "db"."sc"."svc" FROM @specs SPECIFICATION_FILE = 'v2.yaml'"#
    );
}

#[test]
fn alter_service_restore_renders_volume_instances_and_snapshot() {
    let options = alter(AlterServiceAction::Restore(ServiceRestore {
        volume: String::from("data"),
        instances: vec![0, 2],
        from_snapshot: SchemaObjectIdentifier::new("db", "sc", "snap"),
    }));
    assert_eq!(
        to_sql(&options),
        r#"ALTER SERVICE "db"."sc"."svc" RESTORE VOLUME "data" INSTANCES 0, 2 FROM SNAPSHOT "db"."sc"."snap""#
    );
}

#[test]
fn alter_service_restore_requires_instances() {
    let options = alter(AlterServiceAction::Restore(ServiceRestore {
        volume: String::from("data"),
        instances: Vec::new(),
        from_snapshot: SchemaObjectIdentifier::new("db", "sc", "snap"),
    }));
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterServiceOptions: Restore.Instances: required"
    );
}

#[test]
fn alter_service_set_renders_properties_in_grammar_order() {
    let options = alter(AlterServiceAction::Set(ServiceSet {
        min_instances: Some(1),
        auto_resume: Some(false),
        comment: Some(String::from("c")),
        ..ServiceSet::default()
    }));
    assert_eq!(
        to_sql(&options),
        r#"ALTER SERVICE "db"."sc"."svc" SET MIN_INSTANCES = 1 AUTO_RESUME = false COMMENT = 'c'"#
    );
}

#[test]
fn empty_service_set_is_rejected() {
    let options = alter(AlterServiceAction::Set(ServiceSet::default()));
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterServiceOptions: Set: at-least-one-of: MinInstances, MaxInstances, AutoSuspendSecs, \
         MinReadyInstances, QueryWarehouse, AutoResume, ExternalAccessIntegrations, Comment"
    );
}

#[test]
fn alter_service_unset_renders_comma_list() {
    let options = alter(AlterServiceAction::Unset(ServiceUnset {
        min_instances: true,
        comment: true,
        ..ServiceUnset::default()
    }));
    assert_eq!(to_sql(&options), r#"ALTER SERVICE "db"."sc"."svc" UNSET MIN_INSTANCES, COMMENT"#);
}

#[test]
fn alter_service_renders_tag_changes() {
    let tag = SchemaObjectIdentifier::new("db", "sc", "tag");
    let set = alter(AlterServiceAction::SetTags(vec![TagAssociation::new(tag.clone(), "v")]));
    assert_eq!(to_sql(&set), r#"ALTER SERVICE "db"."sc"."svc" SET TAG "db"."sc"."tag" = 'v'"#);
    let unset = alter(AlterServiceAction::UnsetTags(vec![tag]));
    assert_eq!(to_sql(&unset), r#"ALTER SERVICE "db"."sc"."svc" UNSET TAG "db"."sc"."tag""#);
}

// ============================================================================
// SECTION: Drop / Describe / Show
// ============================================================================

#[test]
fn drop_service_renders_force() {
    let options = DropServiceOptions {
        if_exists: true,
        name: service(),
        force: true,
    };
    assert_eq!(to_sql(&options), r#"DROP SERVICE IF EXISTS "db"."sc"."svc" FORCE"#);
}

#[test]
fn describe_service_renders_name() {
    let options = DescribeServiceOptions {
        name: service(),
    };
    assert_eq!(to_sql(&options), r#"DESCRIBE SERVICE "db"."sc"."svc""#);
}

#[test]
fn show_services_renders_compute_pool_scope_and_pagination() {
    let options = ShowServiceOptions {
        exclude_jobs: true,
        like: Some(Like::new("svc%")),
        in_scope: Some(ServiceIn::ComputePool(AccountObjectIdentifier::new("pool"))),
        starts_with: Some(String::from("svc")),
        limit: Some(LimitFrom {
            rows: 10,
            from: Some(String::from("svc_a")),
        }),
        ..ShowServiceOptions::default()
    };
    assert_eq!(
        to_sql(&options),
        r#"SHOW SERVICES EXCLUDE JOBS LIKE 'svc%' IN COMPUTE POOL "pool" STARTS WITH 'svc' LIMIT 10 FROM 'svc_a'"#
    );
}

#[test]
fn show_job_services_renders_schema_scope() {
    let options = ShowServiceOptions {
        job: true,
        in_scope: Some(ServiceIn::Schema(DatabaseObjectIdentifier::new("db", "sc"))),
        ..ShowServiceOptions::default()
    };
    assert_eq!(to_sql(&options), r#"SHOW JOB SERVICES IN SCHEMA "db"."sc""#);
}

#[test]
fn show_services_rejects_job_with_exclude_jobs() {
    let options = ShowServiceOptions {
        job: true,
        exclude_jobs: true,
        ..ShowServiceOptions::default()
    };
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "ShowServiceOptions: options: conflicting: Job, ExcludeJobs"
    );
}

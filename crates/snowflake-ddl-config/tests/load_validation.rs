// crates/snowflake-ddl-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Profile loading, schema checks, and redaction guarantees.
// Purpose: Ensure configuration input is strict and never echoes values.
// ============================================================================

//! Config load validation tests for snowflake-ddl-config.

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

use std::io::Write;
use std::path::Path;

use snowflake_ddl_config::ConfigBool;
use snowflake_ddl_config::ConfigError;
use snowflake_ddl_config::load_profile;
use snowflake_ddl_config::load_profiles;
use snowflake_ddl_config::parse_profiles;
use tempfile::NamedTempFile;

use crate::common::config_file;
use crate::common::error_message;

#[test]
fn loads_every_profile_by_name() {
    let file = config_file(
        r#"
[default]
account_name = "acc"
organization_name = "org"
user = "alice"
password = "hunter2"
port = 443
insecure_mode = true

[secondary]
role = "SYSADMIN"
ocsp_fail_open = false

[secondary.params]
QUERY_TAG = "ci"
"#,
    );
    let profiles = load_profiles(Some(file.path())).unwrap();
    assert_eq!(profiles.len(), 2);
    let default = &profiles["default"];
    assert_eq!(default.account_name.as_deref(), Some("acc"));
    assert_eq!(default.port, Some(443));
    assert_eq!(default.insecure_mode, ConfigBool::True);
    assert_eq!(default.keep_session_alive, ConfigBool::NotSet);
    assert_eq!(default.password.as_ref().map(|secret| secret.expose()), Some("hunter2"));
    let secondary = &profiles["secondary"];
    assert_eq!(secondary.ocsp_fail_open, ConfigBool::False);
    assert_eq!(secondary.params.as_ref().unwrap()["QUERY_TAG"], "ci");
}

#[test]
fn unknown_fields_name_profile_and_field() {
    let err = parse_profiles("[default]\npasword = \"hunter2\"\n").unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownField {
            profile: "default".to_string(),
            field: "pasword".to_string(),
        }
    );
    assert!(!err.to_string().contains("hunter2"));
}

#[test]
fn type_mismatches_name_expected_type_without_value() {
    let err = parse_profiles("[default]\nport = \"secret-port\"\n").unwrap_err();
    assert_eq!(err.to_string(), "config profile default: field port must be of type integer");
    assert!(!err.to_string().contains("secret-port"));
}

#[test]
fn syntax_errors_report_position_only() {
    let message = error_message(parse_profiles("[default]\npassword = \"hunter2\nuser = 1\n"));
    assert!(message.starts_with("config syntax error at line"), "{message}");
    assert!(!message.contains("hunter2"));
}

#[test]
fn non_table_profiles_are_rejected() {
    let err = parse_profiles("default = 1\n").unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidProfile {
            profile: "default".to_string(),
        }
    );
}

#[test]
fn missing_profiles_are_reported() {
    let file = config_file("[default]\nuser = \"alice\"\n");
    let err = load_profile("prod", Some(file.path())).unwrap_err();
    assert_eq!(err.to_string(), "config profile prod not found");
}

#[test]
fn debug_output_redacts_secrets() {
    let profiles = parse_profiles("[default]\ntoken = \"tok-123\"\n").unwrap();
    assert!(!format!("{profiles:?}").contains("tok-123"));
}

#[test]
fn load_rejects_path_component_too_long() {
    let long_component = "a".repeat(300);
    let message = error_message(load_profiles(Some(Path::new(&long_component))));
    assert!(message.contains("config path component too long"));
}

#[test]
fn load_rejects_oversized_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&vec![b'#'; 1_048_577]).unwrap();
    let message = error_message(load_profiles(Some(file.path())));
    assert!(message.contains("config file exceeds size limit"));
}

#[test]
fn load_rejects_non_utf8_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xFF, 0xFE, 0xFF]).unwrap();
    let message = error_message(load_profiles(Some(file.path())));
    assert!(message.contains("utf-8"));
}

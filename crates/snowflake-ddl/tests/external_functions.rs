// crates/snowflake-ddl/tests/external_functions.rs
// ============================================================================
// Module: External Function Statement Tests
// Description: Byte-exact rendering and validation of external function grammars.
// Purpose: Pin CREATE, ALTER, DROP, DESCRIBE, and SHOW text for overloads.
// ============================================================================

//! External function statement tests.

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
use snowflake_ddl::SchemaObjectIdentifierWithArguments;
use snowflake_ddl::Statement;
use snowflake_ddl::objects::common::In;
use snowflake_ddl::objects::common::Like;
use snowflake_ddl::objects::external_functions::AlterExternalFunctionAction;
use snowflake_ddl::objects::external_functions::AlterExternalFunctionOptions;
use snowflake_ddl::objects::external_functions::CreateExternalFunctionOptions;
use snowflake_ddl::objects::external_functions::DescribeExternalFunctionOptions;
use snowflake_ddl::objects::external_functions::DropExternalFunctionOptions;
use snowflake_ddl::objects::external_functions::ExternalFunctionArgument;
use snowflake_ddl::objects::external_functions::ExternalFunctionCompression;
use snowflake_ddl::objects::external_functions::ExternalFunctionDetails;
use snowflake_ddl::objects::external_functions::ExternalFunctionHeader;
use snowflake_ddl::objects::external_functions::ExternalFunctionPropertyRow;
use snowflake_ddl::objects::external_functions::ExternalFunctionSet;
use snowflake_ddl::objects::external_functions::ExternalFunctionUnset;
use snowflake_ddl::objects::external_functions::NullInputBehavior;
use snowflake_ddl::objects::external_functions::ReturnNullValues;
use snowflake_ddl::objects::external_functions::ReturnResultsBehavior;
use snowflake_ddl::objects::external_functions::ShowExternalFunctionOptions;
use snowflake_ddl::to_sql;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn create() -> CreateExternalFunctionOptions {
    CreateExternalFunctionOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "fn"),
        "VARIANT",
        AccountObjectIdentifier::new("api"),
        "https://example.com/fn",
    )
}

fn signature() -> SchemaObjectIdentifierWithArguments {
    SchemaObjectIdentifierWithArguments::new("db", "sc", "fn", ["number", "varchar"])
}

fn alter(action: AlterExternalFunctionAction) -> AlterExternalFunctionOptions {
    AlterExternalFunctionOptions {
        if_exists: false,
        name: signature(),
        action,
    }
}

fn property(name: &str, value: &str) -> ExternalFunctionPropertyRow {
    ExternalFunctionPropertyRow {
        property: Some(name.to_string()),
        value: Some(value.to_string()),
    }
}

// ============================================================================
// SECTION: Create
// ============================================================================

#[test]
fn create_external_function_renders_minimal_form() {
    assert_eq!(
        to_sql(&create()),
        r#"CREATE EXTERNAL FUNCTION "db"."sc"."fn" () RETURNS VARIANT API_INTEGRATION = "api" AS 'https://example.com/fn'"#
    );
    assert!(create().validate().is_ok());
}

#[test]
fn create_external_function_renders_every_clause() {
    let mut options = create();
    options.or_replace = true;
    options.secure = true;
    options.arguments =
        vec![ExternalFunctionArgument::new("a", "NUMBER"), ExternalFunctionArgument::new("b", "VARCHAR")];
    options.return_null_values = Some(ReturnNullValues::NotNull);
    options.null_input_behavior = Some(NullInputBehavior::ReturnsNullOnNullInput);
    options.return_results_behavior = Some(ReturnResultsBehavior::Immutable);
    options.comment = Some(String::from("c"));
    options.headers = vec![ExternalFunctionHeader {
        name: String::from("volume-measure"),
        value: String::from("liters"),
    }];
    options.context_headers = vec![String::from("CURRENT_ACCOUNT")];
    options.max_batch_rows = Some(100);
    options.compression = Some(ExternalFunctionCompression::Gzip);
    options.request_translator = Some(SchemaObjectIdentifier::new("db", "sc", "req"));
    options.response_translator = Some(SchemaObjectIdentifier::new("db", "sc", "resp"));
    assert_eq!(
        to_sql(&options),
        r#"CREATE OR REPLACE SECURE EXTERNAL FUNCTION "db"."sc"."fn" (a NUMBER, b VARCHAR) RETURNS VARIANT NOT NULL RETURNS NULL ON NULL INPUT IMMUTABLE COMMENT = 'c' API_INTEGRATION = "api" HEADERS = ('volume-measure' = 'liters') CONTEXT_HEADERS = (CURRENT_ACCOUNT) MAX_BATCH_ROWS = 100 COMPRESSION = GZIP REQUEST_TRANSLATOR = "db"."sc"."req" RESPONSE_TRANSLATOR = "db"."sc"."resp" AS 'https://example.com/fn'"#
    );
    assert!(options.validate().is_ok());
}

#[test]
fn create_external_function_requires_result_type_and_url() {
    let options = CreateExternalFunctionOptions::new(
        SchemaObjectIdentifier::new("db", "sc", "fn"),
        "",
        AccountObjectIdentifier::new("api"),
        "",
    );
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateExternalFunctionOptions: ResultDataType: required\nCreateExternalFunctionOptions: As: required"
    );
}

#[test]
fn create_external_function_rejects_untyped_arguments() {
    let mut options = create();
    options.arguments = vec![ExternalFunctionArgument::new("a", "")];
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "CreateExternalFunctionOptions: Arguments: invalid: arguments need a name and a data type"
    );
}

// ============================================================================
// SECTION: Alter
// ============================================================================

#[test]
fn alter_external_function_addresses_the_overload() {
    let mut options = alter(AlterExternalFunctionAction::Set(ExternalFunctionSet {
        max_batch_rows: Some(50),
        ..ExternalFunctionSet::default()
    }));
    options.if_exists = true;
    assert_eq!(
        to_sql(&options),
        r#"ALTER FUNCTION IF EXISTS "db"."sc"."fn"(NUMBER, VARCHAR) SET MAX_BATCH_ROWS = 50"#
    );
    assert!(options.validate().is_ok());
}

#[test]
fn alter_external_function_set_renders_headers_and_integration() {
    let headers = alter(AlterExternalFunctionAction::Set(ExternalFunctionSet {
        headers: vec![ExternalFunctionHeader {
            name: String::from("a"),
            value: String::from("b"),
        }],
        ..ExternalFunctionSet::default()
    }));
    assert_eq!(
        to_sql(&headers),
        r#"ALTER FUNCTION "db"."sc"."fn"(NUMBER, VARCHAR) SET HEADERS = ('a' = 'b')"#
    );
    let integration = alter(AlterExternalFunctionAction::Set(ExternalFunctionSet {
        api_integration: Some(AccountObjectIdentifier::new("api_2")),
        ..ExternalFunctionSet::default()
    }));
    assert_eq!(
        to_sql(&integration),
        r#"ALTER FUNCTION "db"."sc"."fn"(NUMBER, VARCHAR) SET API_INTEGRATION = "api_2""#
    );
}

#[test]
fn alter_external_function_set_accepts_exactly_one_property() {
    let options = alter(AlterExternalFunctionAction::Set(ExternalFunctionSet {
        max_batch_rows: Some(50),
        compression: Some(ExternalFunctionCompression::None),
        ..ExternalFunctionSet::default()
    }));
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterExternalFunctionOptions: Set: exactly-one-of: ApiIntegration, Headers, ContextHeaders, \
         MaxBatchRows, Compression, RequestTranslator, ResponseTranslator"
    );
}

#[test]
fn alter_external_function_unset_renders_one_keyword() {
    let options = alter(AlterExternalFunctionAction::Unset(ExternalFunctionUnset {
        secure: true,
        ..ExternalFunctionUnset::default()
    }));
    assert_eq!(to_sql(&options), r#"ALTER FUNCTION "db"."sc"."fn"(NUMBER, VARCHAR) UNSET SECURE"#);
}

#[test]
fn empty_external_function_unset_is_rejected() {
    let options = alter(AlterExternalFunctionAction::Unset(ExternalFunctionUnset::default()));
    assert_eq!(
        options.validate().unwrap_err().to_string(),
        "AlterExternalFunctionOptions: Unset: exactly-one-of: Comment, Headers, ContextHeaders, MaxBatchRows, \
         Compression, Secure, RequestTranslator, ResponseTranslator"
    );
}

// ============================================================================
// SECTION: Drop / Describe / Show
// ============================================================================

#[test]
fn drop_external_function_renders_signature() {
    let options = DropExternalFunctionOptions {
        if_exists: true,
        name: signature(),
    };
    assert_eq!(to_sql(&options), r#"DROP FUNCTION IF EXISTS "db"."sc"."fn"(NUMBER, VARCHAR)"#);
}

#[test]
fn describe_external_function_renders_empty_argument_list() {
    let options = DescribeExternalFunctionOptions {
        name: SchemaObjectIdentifierWithArguments::new("db", "sc", "fn", Vec::<String>::new()),
    };
    assert_eq!(to_sql(&options), r#"DESCRIBE FUNCTION "db"."sc"."fn"()"#);
}

#[test]
fn show_external_functions_renders_like_and_scope() {
    let options = ShowExternalFunctionOptions {
        like: Some(Like::new("fn%")),
        in_scope: Some(In::Schema(DatabaseObjectIdentifier::new("db", "sc"))),
    };
    assert_eq!(to_sql(&options), r#"SHOW EXTERNAL FUNCTIONS LIKE 'fn%' IN SCHEMA "db"."sc""#);
}

#[test]
fn describe_properties_fold_into_details() {
    let details = ExternalFunctionDetails::from_properties(&[
        property("signature", "(A NUMBER)"),
        property("returns", "VARIANT"),
        property("VOLATILITY", "IMMUTABLE"),
        property("max_batch_rows", "100"),
        property("compression", "GZIP"),
        property("unknown", "ignored"),
    ]);
    assert_eq!(details.signature.as_deref(), Some("(A NUMBER)"));
    assert_eq!(details.returns.as_deref(), Some("VARIANT"));
    assert_eq!(details.volatility, Some(ReturnResultsBehavior::Immutable));
    assert_eq!(details.max_batch_rows, Some(100));
    assert_eq!(details.compression, Some(ExternalFunctionCompression::Gzip));
}

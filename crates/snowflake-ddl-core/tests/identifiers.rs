// crates/snowflake-ddl-core/tests/identifiers.rs
// ============================================================================
// Module: Identifier Tests
// Description: Parsing, quoting, and round-trip properties of identifiers.
// Purpose: Pin canonical quoting and precise parse diagnostics.
// ============================================================================

//! Identifier model tests.

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

use proptest::prelude::*;
use snowflake_ddl_core::AccountIdentifier;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DatabaseObjectIdentifier;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::ParseError;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SchemaObjectIdentifierWithArguments;
use snowflake_ddl_core::ScopedIdentifier;
use snowflake_ddl_core::core::PartDefect;
use snowflake_ddl_core::core::parse_identifier_list;
use snowflake_ddl_core::core::strip_quotes;

// ============================================================================
// SECTION: Quoting
// ============================================================================

#[test]
fn fully_qualified_names_quote_every_part() {
    let id = SchemaObjectIdentifier::new("DB", "PUBLIC", "my pipe");
    assert_eq!(id.fully_qualified_name(), r#""DB"."PUBLIC"."my pipe""#);
    assert_eq!(id.name(), "my pipe");
    assert_eq!(id.to_string(), id.fully_qualified_name());
}

#[test]
fn embedded_quotes_are_doubled() {
    let id = AccountObjectIdentifier::new(r#"a"b"#);
    assert_eq!(id.fully_qualified_name(), r#""a""b""#);
    assert_eq!(id.fully_qualified_name().parse::<AccountObjectIdentifier>().unwrap(), id);
}

#[test]
fn parent_projections_drop_the_last_part() {
    let id = SchemaObjectIdentifier::new("DB", "SCH", "T");
    assert_eq!(id.parent(), DatabaseObjectIdentifier::new("DB", "SCH"));
    assert_eq!(id.parent().parent(), AccountObjectIdentifier::new("DB"));
}

#[test]
fn account_identifier_renders_organization_and_account() {
    let id = AccountIdentifier::new("ORG", "ACC");
    assert_eq!(id.fully_qualified_name(), r#""ORG"."ACC""#);
    assert_eq!(id.as_account_object_identifier().fully_qualified_name(), r#""ACC""#);
}

#[test]
fn callable_identifiers_include_normalized_arguments() {
    let id = SchemaObjectIdentifierWithArguments::new("DB", "SCH", "F", ["number", "varchar"]);
    assert_eq!(id.fully_qualified_name(), r#""DB"."SCH"."F"(NUMBER, VARCHAR)"#);
    let other = SchemaObjectIdentifierWithArguments::new("DB", "SCH", "F", ["VARCHAR"]);
    assert_ne!(id, other);
}

// ============================================================================
// SECTION: Validity
// ============================================================================

#[test]
fn empty_and_overlong_parts_are_invalid() {
    assert!(!AccountObjectIdentifier::new("").is_valid());
    assert!(!DatabaseObjectIdentifier::new("DB", "a".repeat(256)).is_valid());
    assert!(DatabaseObjectIdentifier::new("DB", "a".repeat(255)).is_valid());
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn parse_accepts_unquoted_and_quoted_parts() {
    let id: SchemaObjectIdentifier = r#"db."my.schema".obj"#.parse().unwrap();
    assert_eq!(id, SchemaObjectIdentifier::new("db", "my.schema", "obj"));
}

#[test]
fn parse_rejects_wrong_part_count() {
    let err = "a.b".parse::<SchemaObjectIdentifier>().unwrap_err();
    assert_eq!(
        err,
        ParseError::PartCount {
            input: "a.b".to_string(),
            expected: 3,
            actual: 2,
        }
    );
}

#[test]
fn parse_reports_the_empty_part_index() {
    let err = "a..c".parse::<SchemaObjectIdentifier>().unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidPart {
            input: "a..c".to_string(),
            index: 2,
            defect: PartDefect::Empty,
        }
    );
    assert!(err.to_string().contains("part 2 is empty"));
}

#[test]
fn parse_rejects_unterminated_quotes() {
    let err = r#""db"."sch"#.parse::<DatabaseObjectIdentifier>().unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidPart {
            index: 2,
            defect: PartDefect::UnterminatedQuote,
            ..
        }
    ));
}

#[test]
fn parse_rejects_characters_after_closing_quote() {
    let err = r#""db"x.sch"#.parse::<DatabaseObjectIdentifier>().unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidPart {
            index: 1,
            defect: PartDefect::StrayCharacters,
            ..
        }
    ));
}

#[test]
fn parse_callable_with_precision_arguments() {
    let id: SchemaObjectIdentifierWithArguments =
        r#""DB"."SCH"."F"(NUMBER(38, 0), varchar)"#.parse().unwrap();
    assert_eq!(id.argument_data_types(), ["NUMBER(38, 0)", "VARCHAR"]);
    assert_eq!(id.schema_object_id(), SchemaObjectIdentifier::new("DB", "SCH", "F"));
}

#[test]
fn parse_callable_without_argument_list_fails() {
    let err = "DB.SCH.F".parse::<SchemaObjectIdentifierWithArguments>().unwrap_err();
    assert!(matches!(err, ParseError::MalformedArguments { .. }));
}

#[test]
fn identifier_lists_respect_quoted_commas() {
    let ids: Vec<AccountObjectIdentifier> = parse_identifier_list(r#""a,b", c"#).unwrap();
    assert_eq!(ids, vec![AccountObjectIdentifier::new("a,b"), AccountObjectIdentifier::new("c")]);
    let empty: Vec<AccountObjectIdentifier> = parse_identifier_list("  ").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn strip_quotes_removes_one_surrounding_pair() {
    assert_eq!(strip_quotes(r#""ROLE""#), "ROLE");
    assert_eq!(strip_quotes("ROLE"), "ROLE");
}

// ============================================================================
// SECTION: Properties
// ============================================================================

fn part() -> impl Strategy<Value = String> {
    "[^\\x00]{1,24}"
}

proptest! {
    #[test]
    fn account_object_round_trips(name in part()) {
        let id = AccountObjectIdentifier::new(name);
        prop_assert_eq!(id.fully_qualified_name().parse::<AccountObjectIdentifier>().unwrap(), id);
    }

    #[test]
    fn database_object_round_trips(database in part(), name in part()) {
        let id = DatabaseObjectIdentifier::new(database, name);
        prop_assert_eq!(id.fully_qualified_name().parse::<DatabaseObjectIdentifier>().unwrap(), id);
    }

    #[test]
    fn schema_object_round_trips(database in part(), schema in part(), name in part()) {
        let id = SchemaObjectIdentifier::new(database, schema, name);
        prop_assert_eq!(id.fully_qualified_name().parse::<SchemaObjectIdentifier>().unwrap(), id);
    }

    #[test]
    fn callable_round_trips(
        database in part(),
        schema in part(),
        name in part(),
        arguments in prop::collection::vec("[A-Z]{1,8}", 0 .. 4),
    ) {
        let id = SchemaObjectIdentifierWithArguments::new(database, schema, name, arguments);
        prop_assert_eq!(
            id.fully_qualified_name().parse::<SchemaObjectIdentifierWithArguments>().unwrap(),
            id
        );
    }
}

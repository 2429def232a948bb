// crates/snowflake-ddl-core/tests/enums.rs
// ============================================================================
// Module: Enumeration Tests
// Description: Parse and render contract of macro-declared enumerations.
// Purpose: Ensure case-insensitive parsing and strict rejection.
// ============================================================================

//! Enumeration macro tests.

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
use snowflake_ddl_core::AuthenticationType;
use snowflake_ddl_core::DriverLogLevel;
use snowflake_ddl_core::ParseError;
use snowflake_ddl_core::sql::SqlValue;

snowflake_ddl_core::sql_enum! {
    /// Fixture enumeration.
    pub enum Flavor: "flavor" {
        /// Plain.
        Plain => "PLAIN",
        /// Spicy.
        Spicy => "EXTRA_SPICY",
    }
}

#[test]
fn parse_is_case_insensitive_and_trims() {
    assert_eq!(Flavor::parse(" extra_spicy ").unwrap(), Flavor::Spicy);
    assert_eq!("Plain".parse::<Flavor>().unwrap(), Flavor::Plain);
}

#[test]
fn unknown_values_name_the_enumeration() {
    let err = Flavor::parse("mild").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownVariant {
            kind: "flavor",
            value: "mild".to_string(),
        }
    );
    assert_eq!(err.to_string(), "unknown flavor: 'mild'");
}

#[test]
fn variants_render_their_canonical_spelling() {
    assert_eq!(Flavor::Spicy.to_sql(), "EXTRA_SPICY");
    assert_eq!(Flavor::Spicy.to_string(), "EXTRA_SPICY");
    assert_eq!(AuthenticationType::Jwt.as_str(), "SNOWFLAKE_JWT");
}

#[test]
fn serde_uses_the_canonical_spelling() {
    let json = serde_json::to_string(&Flavor::Spicy).unwrap();
    assert_eq!(json, "\"EXTRA_SPICY\"");
    let parsed: DriverLogLevel = serde_json::from_str("\"WARNING\"").unwrap();
    assert_eq!(parsed, DriverLogLevel::Warning);
    assert!(serde_json::from_str::<Flavor>("\"mild\"").is_err());
}

proptest! {
    #[test]
    fn every_variant_parses_in_any_case(index in 0 .. AuthenticationType::ALL.len()) {
        let variant = AuthenticationType::ALL[index];
        let canonical = variant.as_str();
        prop_assert_eq!(AuthenticationType::parse(canonical).unwrap(), variant);
        prop_assert_eq!(AuthenticationType::parse(&canonical.to_lowercase()).unwrap(), variant);
    }

    #[test]
    fn non_members_are_rejected(value in "[a-z_]{1,16}") {
        prop_assume!(!DriverLogLevel::ALL.iter().any(|level| level.as_str() == value));
        prop_assert!(DriverLogLevel::parse(&value).is_err());
    }
}

// crates/snowflake-ddl-core/tests/renderer.rs
// ============================================================================
// Module: Renderer Tests
// Description: Byte-exact rendering of every node kind through the builder.
// Purpose: Pin the token joining and encoding rules shared by all grammars.
// ============================================================================

//! SQL renderer tests.

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

use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SqlBuilder;
use snowflake_ddl_core::sql::Encoding;
use snowflake_ddl_core::sql::ListOptions;
use snowflake_ddl_core::sql::Quotes;
use snowflake_ddl_core::to_sql;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

struct WarehouseSet {
    size: Option<String>,
    auto_resume: Option<bool>,
    comment: Option<String>,
}

impl Render for WarehouseSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .parameter("WAREHOUSE_SIZE", self.size.as_ref(), Encoding::PLAIN)
            .parameter("AUTO_RESUME", self.auto_resume.as_ref(), Encoding::PLAIN)
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

struct AlterWarehouse {
    if_exists: bool,
    name: AccountObjectIdentifier,
    set: Option<WarehouseSet>,
    unset: Vec<&'static str>,
}

impl Render for AlterWarehouse {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER WAREHOUSE")
            .keyword(self.if_exists, "IF EXISTS")
            .identifier(&self.name)
            .nested(self.set.as_ref())
            .list(Some("UNSET"), &self.unset, ListOptions::COMMA);
    }
}

fn alter(set: Option<WarehouseSet>, unset: Vec<&'static str>) -> AlterWarehouse {
    AlterWarehouse {
        if_exists: true,
        name: AccountObjectIdentifier::new("WH"),
        set,
        unset,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn nested_parameters_render_in_declared_order() {
    let options = alter(
        Some(WarehouseSet {
            size: Some("XSMALL".to_string()),
            auto_resume: Some(false),
            comment: Some("nightly".to_string()),
        }),
        Vec::new(),
    );
    assert_eq!(
        to_sql(&options),
        r#"ALTER WAREHOUSE IF EXISTS "WH" SET WAREHOUSE_SIZE = XSMALL AUTO_RESUME = false COMMENT = 'nightly'"#
    );
}

#[test]
fn present_zero_values_are_emitted() {
    let options = alter(
        Some(WarehouseSet {
            size: None,
            auto_resume: Some(false),
            comment: None,
        }),
        Vec::new(),
    );
    assert_eq!(to_sql(&options), r#"ALTER WAREHOUSE IF EXISTS "WH" SET AUTO_RESUME = false"#);
}

#[test]
fn empty_lists_render_nothing() {
    let options = alter(None, vec!["COMMENT", "AUTO_RESUME"]);
    assert_eq!(to_sql(&options), r#"ALTER WAREHOUSE IF EXISTS "WH" UNSET COMMENT, AUTO_RESUME"#);
    let options = alter(None, Vec::new());
    assert_eq!(to_sql(&options), r#"ALTER WAREHOUSE IF EXISTS "WH""#);
}

#[test]
fn encodings_cover_quotes_equals_and_parentheses() {
    let mut sql = SqlBuilder::new();
    sql.parameter("A", Some(&1_i64), Encoding::PLAIN)
        .parameter("B", Some("x"), Encoding::DOUBLE_QUOTES)
        .parameter("C", Some("body"), Encoding::DOLLAR_QUOTES)
        .parameter("D", Some("y"), Encoding::SINGLE_QUOTES.no_equals())
        .parameter("E", Some(&2.5_f64), Encoding::PLAIN.parentheses())
        .value(Some("tail"), Quotes::Single);
    assert_eq!(
        snowflake_ddl_core::sql::render_nodes(sql.nodes()),
        "A = 1 B = \"x\" C = $$body$$ D 'y' E = (2.5) 'tail'"
    );
}

#[test]
fn identifier_lists_can_be_parenthesized() {
    let ids = vec![
        SchemaObjectIdentifier::new("D", "S", "A"),
        SchemaObjectIdentifier::new("D", "S", "B"),
    ];
    let mut sql = SqlBuilder::new();
    sql.list(Some("AFTER"), &ids, ListOptions::COMMA)
        .list(Some("ALLOWED"), &["x", "y"], ListOptions::ASSIGNED_PARENTHESES.quoted(Quotes::Single));
    assert_eq!(
        snowflake_ddl_core::sql::render_nodes(sql.nodes()),
        r#"AFTER "D"."S"."A", "D"."S"."B" ALLOWED = ('x', 'y')"#
    );
}

#[test]
fn flags_only_render_when_true() {
    let mut sql = SqlBuilder::new();
    sql.keyword(false, "OR REPLACE").keyword(Some(true), "FORCE").keyword(None::<bool>, "CASCADE");
    assert_eq!(snowflake_ddl_core::sql::render_nodes(sql.nodes()), "FORCE");
}

// crates/snowflake-ddl/src/objects/common.rs
// ============================================================================
// Module: Shared Grammar Fragments
// Description: Like, In, LimitFrom, tag associations, and object parameters.
// Purpose: Reuse the clauses that appear across SHOW, CREATE, and ALTER.
// Dependencies: snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Fragments shared by several object grammars. Each one renders through a
//! [`SqlBuilder`] like any other option type, so object grammars embed them
//! with [`SqlBuilder::nested`].

use std::convert::Infallible;

use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DatabaseObjectIdentifier;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::Rule;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SqlBuilder;
use snowflake_ddl_core::Validator;
use snowflake_ddl_core::sql::Encoding;
use snowflake_ddl_core::sql::ListOptions;
use snowflake_ddl_core::sql_enum;

// ============================================================================
// SECTION: Show Filters
// ============================================================================

/// `LIKE '<pattern>'` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    /// Case-insensitive pattern with `%` and `_` wildcards.
    pub pattern: String,
}

impl Like {
    /// Creates a filter matching `pattern`.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Render for Like {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.parameter("LIKE", Some(&self.pattern), Encoding::SINGLE_QUOTES.no_equals());
    }
}

/// `IN ACCOUNT | DATABASE <db> | SCHEMA <schema>` scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum In {
    /// The whole account.
    Account,
    /// A single database.
    Database(AccountObjectIdentifier),
    /// A single schema.
    Schema(DatabaseObjectIdentifier),
}

impl Render for In {
    fn render(&self, sql: &mut SqlBuilder) {
        match self {
            Self::Account => {
                sql.static_keyword("IN ACCOUNT");
            }
            Self::Database(id) => {
                sql.identifier_with("IN DATABASE", Some(id));
            }
            Self::Schema(id) => {
                sql.identifier_with("IN SCHEMA", Some(id));
            }
        }
    }
}

impl In {
    /// Checks the scope identifier.
    pub fn validate(&self, v: &mut Validator) {
        match self {
            Self::Account => {}
            Self::Database(id) => {
                v.valid_identifier("In.Database", id);
            }
            Self::Schema(id) => {
                v.valid_identifier("In.Schema", id);
            }
        }
    }
}

/// `LIMIT <rows> [FROM '<name>']` pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitFrom {
    /// Maximum number of rows returned.
    pub rows: u32,
    /// Name after which to start listing.
    pub from: Option<String>,
}

impl LimitFrom {
    /// Limits the listing to `rows` rows.
    #[must_use]
    pub const fn rows(rows: u32) -> Self {
        Self {
            rows,
            from: None,
        }
    }
}

impl Render for LimitFrom {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.parameter("LIMIT", Some(&self.rows), Encoding::PLAIN.no_equals());
        sql.parameter("FROM", self.from.as_ref(), Encoding::SINGLE_QUOTES.no_equals());
    }
}

/// Renders `STARTS WITH '<prefix>'`.
pub fn starts_with(sql: &mut SqlBuilder, prefix: Option<&String>) {
    sql.parameter("STARTS WITH", prefix, Encoding::SINGLE_QUOTES.no_equals());
}

// ============================================================================
// SECTION: Tags
// ============================================================================

/// `<tag> = '<value>'` association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAssociation {
    /// Tag identifier.
    pub name: SchemaObjectIdentifier,
    /// Tag value.
    pub value: String,
}

impl TagAssociation {
    /// Associates `value` with the tag `name`.
    #[must_use]
    pub fn new(name: SchemaObjectIdentifier, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

impl Render for TagAssociation {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.parameter(self.name.fully_qualified_name(), Some(&self.value), Encoding::SINGLE_QUOTES);
    }
}

/// Renders `<keyword> (<tag> = '<value>', ...)` for CREATE statements.
pub fn with_tags(sql: &mut SqlBuilder, keyword: &'static str, tags: &[TagAssociation]) {
    if tags.is_empty() {
        return;
    }
    sql.list_of(Some(keyword), ListOptions::COMMA_PARENTHESES, |sql| {
        for tag in tags {
            sql.nested(Some(tag));
        }
    });
}

/// Renders `SET TAG <tag> = '<value>', ...`.
pub fn set_tags(sql: &mut SqlBuilder, tags: &[TagAssociation]) {
    if tags.is_empty() {
        return;
    }
    sql.list_of(Some("SET TAG"), ListOptions::COMMA, |sql| {
        for tag in tags {
            sql.nested(Some(tag));
        }
    });
}

/// Renders `UNSET TAG <tag>, ...`.
pub fn unset_tags(sql: &mut SqlBuilder, tags: &[SchemaObjectIdentifier]) {
    sql.list(Some("UNSET TAG"), tags, ListOptions::COMMA);
}

/// Checks tag identifiers.
pub fn validate_tags(v: &mut Validator, field: &str, tags: &[TagAssociation]) {
    if tags.iter().any(|tag| !tag.name.is_valid()) {
        v.fail(field, Rule::InvalidIdentifier);
    }
}

// ============================================================================
// SECTION: Object Parameters
// ============================================================================

/// Value of a session or object parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Boolean, rendered `true`/`false`.
    Boolean(bool),
    /// Integer, rendered as a decimal.
    Integer(i64),
    /// Text, rendered single-quoted.
    Text(String),
}

/// `NAME = value` parameter assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name, such as `STATEMENT_TIMEOUT_IN_SECONDS`.
    pub name: String,
    /// Assigned value.
    pub value: ParameterValue,
}

impl Parameter {
    /// Creates a parameter assignment.
    #[must_use]
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Render for Parameter {
    fn render(&self, sql: &mut SqlBuilder) {
        let name = self.name.to_ascii_uppercase();
        match &self.value {
            ParameterValue::Boolean(value) => {
                sql.parameter(name, Some(value), Encoding::PLAIN);
            }
            ParameterValue::Integer(value) => {
                sql.parameter(name, Some(value), Encoding::PLAIN);
            }
            ParameterValue::Text(value) => {
                sql.parameter(name, Some(value), Encoding::SINGLE_QUOTES);
            }
        }
    }
}

/// Renders a space-separated run of parameter assignments.
pub fn parameters(sql: &mut SqlBuilder, parameters: &[Parameter]) {
    for parameter in parameters {
        sql.nested(Some(parameter));
    }
}

/// Checks that parameter names are non-empty identifiers.
pub fn validate_parameters(v: &mut Validator, field: &str, parameters: &[Parameter]) {
    let malformed = parameters.iter().any(|parameter| {
        parameter.name.is_empty()
            || !parameter.name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
    });
    v.check(malformed, field, "parameter names must be non-empty words");
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Identity parser for required text columns.
///
/// # Errors
///
/// Never fails.
pub fn text(raw: &str) -> Result<String, Infallible> {
    Ok(raw.to_string())
}

// ============================================================================
// SECTION: Object Types
// ============================================================================

sql_enum! {
    /// Securable object kinds named in grants.
    pub enum ObjectType: "object type" {
        /// Account.
        Account => "ACCOUNT",
        /// Compute pool.
        ComputePool => "COMPUTE POOL",
        /// Database.
        Database => "DATABASE",
        /// Database role.
        DatabaseRole => "DATABASE ROLE",
        /// External function.
        Function => "FUNCTION",
        /// Git repository.
        GitRepository => "GIT REPOSITORY",
        /// Image repository.
        ImageRepository => "IMAGE REPOSITORY",
        /// Integration.
        Integration => "INTEGRATION",
        /// Pipe.
        Pipe => "PIPE",
        /// Account role.
        Role => "ROLE",
        /// Schema.
        Schema => "SCHEMA",
        /// Service.
        Service => "SERVICE",
        /// Stage.
        Stage => "STAGE",
        /// Table.
        Table => "TABLE",
        /// Task.
        Task => "TASK",
        /// User.
        User => "USER",
        /// View.
        View => "VIEW",
        /// Warehouse.
        Warehouse => "WAREHOUSE",
    }
}

impl ObjectType {
    /// Returns the plural keyword used by `ALL <plural> IN ...`.
    #[must_use]
    pub fn plural(self) -> String {
        let singular = self.as_str();
        match singular.strip_suffix('Y') {
            Some(stem) => format!("{stem}IES"),
            None => format!("{singular}S"),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use snowflake_ddl_core::sql::render_nodes;

    use super::*;

    fn render(build: impl FnOnce(&mut SqlBuilder)) -> String {
        let mut sql = SqlBuilder::new();
        build(&mut sql);
        render_nodes(sql.nodes())
    }

    #[test]
    fn plural_keywords() {
        assert_eq!(ObjectType::GitRepository.plural(), "GIT REPOSITORIES");
        assert_eq!(ObjectType::Pipe.plural(), "PIPES");
        assert_eq!(ObjectType::ComputePool.plural(), "COMPUTE POOLS");
    }

    #[test]
    fn tags_render_in_each_position() {
        let tags = vec![TagAssociation::new(SchemaObjectIdentifier::new("db", "sc", "env"), "prod")];
        assert_eq!(render(|sql| with_tags(sql, "TAG", &tags)), r#"TAG ("db"."sc"."env" = 'prod')"#);
        assert_eq!(render(|sql| set_tags(sql, &tags)), r#"SET TAG "db"."sc"."env" = 'prod'"#);
        assert_eq!(render(|sql| with_tags(sql, "TAG", &[])), "");
    }

    #[test]
    fn parameters_render_by_value_kind() {
        let params = vec![
            Parameter::new("statement_timeout_in_seconds", ParameterValue::Integer(60)),
            Parameter::new("QUERY_TAG", ParameterValue::Text("nightly".into())),
            Parameter::new("AUTOCOMMIT", ParameterValue::Boolean(false)),
        ];
        assert_eq!(
            render(|sql| parameters(sql, &params)),
            "STATEMENT_TIMEOUT_IN_SECONDS = 60 QUERY_TAG = 'nightly' AUTOCOMMIT = false"
        );
    }

    #[test]
    fn scopes_and_pagination() {
        let scope = In::Schema(DatabaseObjectIdentifier::new("db", "sc"));
        assert_eq!(render(|sql| { sql.nested(Some(&scope)); }), r#"IN SCHEMA "db"."sc""#);
        let limit = LimitFrom {
            rows: 10,
            from: Some("abc".into()),
        };
        assert_eq!(render(|sql| { sql.nested(Some(&limit)); }), "LIMIT 10 FROM 'abc'");
    }
}

// crates/snowflake-ddl-core/src/core/identifiers.rs
// ============================================================================
// Module: Object Identifiers
// Description: Qualified names for account, database, and schema objects.
// Purpose: Provide canonical quoting, parsing, and parent projections.
// Dependencies: thiserror (via crate::core::errors)
// ============================================================================

//! ## Overview
//! Identifiers name remote objects at one, two, or three levels of nesting.
//! The part count is encoded in the type, so a schema object identifier can
//! never be handed to an operation expecting an account object. Constructors
//! are infallible and never normalize case; [`ObjectIdentifier::is_valid`]
//! reports whether every part is non-empty and within
//! [`MAX_IDENTIFIER_PART_LENGTH`] characters. Parsing is strict and rejects
//! malformed input with the index of the offending part.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::core::errors::ParseError;
use crate::core::errors::PartDefect;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters allowed in a single identifier part.
pub const MAX_IDENTIFIER_PART_LENGTH: usize = 255;

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Common surface shared by every identifier kind.
pub trait ObjectIdentifier: fmt::Display {
    /// Returns the last (object) part of the identifier.
    fn name(&self) -> &str;

    /// Returns every part double-quoted and joined with `.`.
    fn fully_qualified_name(&self) -> String;

    /// Returns true when every part is non-empty and within length limits.
    fn is_valid(&self) -> bool;
}

/// Identifier that lives inside a containing scope.
pub trait ScopedIdentifier: ObjectIdentifier {
    /// Identifier type of the containing scope.
    type Parent: ObjectIdentifier;

    /// Projects the identifier onto its containing scope.
    fn parent(&self) -> Self::Parent;
}

// ============================================================================
// SECTION: Account Object Identifier
// ============================================================================

/// Single-part identifier for account-level objects (warehouses, users,
/// compute pools, roles, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountObjectIdentifier {
    /// Object name.
    name: String,
}

impl AccountObjectIdentifier {
    /// Creates a new account object identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
        }
    }
}

impl ObjectIdentifier for AccountObjectIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn fully_qualified_name(&self) -> String {
        quote_part(&self.name)
    }

    fn is_valid(&self) -> bool {
        is_valid_part(&self.name)
    }
}

impl FromStr for AccountObjectIdentifier {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [name] = parse_exact::<1>(value)?;
        Ok(Self {
            name,
        })
    }
}

// ============================================================================
// SECTION: Database Object Identifier
// ============================================================================

/// Two-part identifier for database-level objects (schemas, database roles).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatabaseObjectIdentifier {
    /// Containing database name.
    database_name: String,
    /// Object name.
    name: String,
}

impl DatabaseObjectIdentifier {
    /// Creates a new database object identifier.
    #[must_use]
    pub fn new(database_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            name: name.into(),
        }
    }

    /// Returns the containing database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Returns the identifier of the containing database.
    #[must_use]
    pub fn database_id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(self.database_name.clone())
    }
}

impl ObjectIdentifier for DatabaseObjectIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn fully_qualified_name(&self) -> String {
        format!("{}.{}", quote_part(&self.database_name), quote_part(&self.name))
    }

    fn is_valid(&self) -> bool {
        is_valid_part(&self.database_name) && is_valid_part(&self.name)
    }
}

impl ScopedIdentifier for DatabaseObjectIdentifier {
    type Parent = AccountObjectIdentifier;

    fn parent(&self) -> Self::Parent {
        self.database_id()
    }
}

impl FromStr for DatabaseObjectIdentifier {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [database_name, name] = parse_exact::<2>(value)?;
        Ok(Self {
            database_name,
            name,
        })
    }
}

// ============================================================================
// SECTION: Schema Object Identifier
// ============================================================================

/// Three-part identifier for schema-level objects (pipes, tasks, services,
/// repositories, policies, secrets, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaObjectIdentifier {
    /// Containing database name.
    database_name: String,
    /// Containing schema name.
    schema_name: String,
    /// Object name.
    name: String,
}

impl SchemaObjectIdentifier {
    /// Creates a new schema object identifier.
    #[must_use]
    pub fn new(
        database_name: impl Into<String>,
        schema_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            schema_name: schema_name.into(),
            name: name.into(),
        }
    }

    /// Creates a schema object identifier inside the given schema.
    #[must_use]
    pub fn in_schema(schema: &DatabaseObjectIdentifier, name: impl Into<String>) -> Self {
        Self::new(schema.database_name(), schema.name(), name)
    }

    /// Returns the containing database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Returns the containing schema name.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Returns the identifier of the containing database.
    #[must_use]
    pub fn database_id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(self.database_name.clone())
    }

    /// Returns the identifier of the containing schema.
    #[must_use]
    pub fn schema_id(&self) -> DatabaseObjectIdentifier {
        DatabaseObjectIdentifier::new(self.database_name.clone(), self.schema_name.clone())
    }

    /// Attaches an argument type list, producing a callable identifier.
    #[must_use]
    pub fn with_arguments<S: Into<String>>(
        self,
        argument_data_types: impl IntoIterator<Item = S>,
    ) -> SchemaObjectIdentifierWithArguments {
        SchemaObjectIdentifierWithArguments {
            database_name: self.database_name,
            schema_name: self.schema_name,
            name: self.name,
            argument_data_types: argument_data_types
                .into_iter()
                .map(|argument| normalize_data_type(&argument.into()))
                .collect(),
        }
    }
}

impl ObjectIdentifier for SchemaObjectIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn fully_qualified_name(&self) -> String {
        format!(
            "{}.{}.{}",
            quote_part(&self.database_name),
            quote_part(&self.schema_name),
            quote_part(&self.name)
        )
    }

    fn is_valid(&self) -> bool {
        is_valid_part(&self.database_name)
            && is_valid_part(&self.schema_name)
            && is_valid_part(&self.name)
    }
}

impl ScopedIdentifier for SchemaObjectIdentifier {
    type Parent = DatabaseObjectIdentifier;

    fn parent(&self) -> Self::Parent {
        self.schema_id()
    }
}

impl FromStr for SchemaObjectIdentifier {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [database_name, schema_name, name] = parse_exact::<3>(value)?;
        Ok(Self {
            database_name,
            schema_name,
            name,
        })
    }
}

// ============================================================================
// SECTION: Schema Object Identifier With Arguments
// ============================================================================

/// Three-part identifier for overloaded callables. The argument data types
/// participate in identity: `f(NUMBER)` and `f(VARCHAR)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaObjectIdentifierWithArguments {
    /// Containing database name.
    database_name: String,
    /// Containing schema name.
    schema_name: String,
    /// Callable name.
    name: String,
    /// Normalized argument data types in declaration order.
    argument_data_types: Vec<String>,
}

impl SchemaObjectIdentifierWithArguments {
    /// Creates a new callable identifier.
    #[must_use]
    pub fn new<S: Into<String>>(
        database_name: impl Into<String>,
        schema_name: impl Into<String>,
        name: impl Into<String>,
        argument_data_types: impl IntoIterator<Item = S>,
    ) -> Self {
        SchemaObjectIdentifier::new(database_name, schema_name, name)
            .with_arguments(argument_data_types)
    }

    /// Returns the containing database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Returns the containing schema name.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Returns the argument data types.
    #[must_use]
    pub fn argument_data_types(&self) -> &[String] {
        &self.argument_data_types
    }

    /// Returns the identifier without its argument list.
    #[must_use]
    pub fn schema_object_id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(
            self.database_name.clone(),
            self.schema_name.clone(),
            self.name.clone(),
        )
    }

    /// Returns the identifier of the containing schema.
    #[must_use]
    pub fn schema_id(&self) -> DatabaseObjectIdentifier {
        DatabaseObjectIdentifier::new(self.database_name.clone(), self.schema_name.clone())
    }
}

impl ObjectIdentifier for SchemaObjectIdentifierWithArguments {
    fn name(&self) -> &str {
        &self.name
    }

    fn fully_qualified_name(&self) -> String {
        format!(
            "{}.{}.{}({})",
            quote_part(&self.database_name),
            quote_part(&self.schema_name),
            quote_part(&self.name),
            self.argument_data_types.join(", ")
        )
    }

    fn is_valid(&self) -> bool {
        is_valid_part(&self.database_name)
            && is_valid_part(&self.schema_name)
            && is_valid_part(&self.name)
            && self.argument_data_types.iter().all(|argument| !argument.is_empty())
    }
}

impl ScopedIdentifier for SchemaObjectIdentifierWithArguments {
    type Parent = DatabaseObjectIdentifier;

    fn parent(&self) -> Self::Parent {
        self.schema_id()
    }
}

impl FromStr for SchemaObjectIdentifierWithArguments {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (head, arguments) = split_argument_list(trimmed)?;
        let [database_name, schema_name, name] = parse_exact::<3>(head)?;
        Ok(Self {
            database_name,
            schema_name,
            name,
            argument_data_types: arguments,
        })
    }
}

// ============================================================================
// SECTION: Account Identifier
// ============================================================================

/// Organization-qualified account identifier (`"ORG"."ACCOUNT"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountIdentifier {
    /// Organization name.
    organization_name: String,
    /// Account name within the organization.
    account_name: String,
}

impl AccountIdentifier {
    /// Creates a new account identifier.
    #[must_use]
    pub fn new(organization_name: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            organization_name: organization_name.into(),
            account_name: account_name.into(),
        }
    }

    /// Returns the organization name.
    #[must_use]
    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    /// Returns the account name.
    #[must_use]
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Returns the account name as an account object identifier, the form
    /// used by organization-level `ALTER ACCOUNT` / `DROP ACCOUNT`.
    #[must_use]
    pub fn as_account_object_identifier(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(self.account_name.clone())
    }
}

impl ObjectIdentifier for AccountIdentifier {
    fn name(&self) -> &str {
        &self.account_name
    }

    fn fully_qualified_name(&self) -> String {
        format!("{}.{}", quote_part(&self.organization_name), quote_part(&self.account_name))
    }

    fn is_valid(&self) -> bool {
        is_valid_part(&self.organization_name) && is_valid_part(&self.account_name)
    }
}

impl FromStr for AccountIdentifier {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [organization_name, account_name] = parse_exact::<2>(value)?;
        Ok(Self {
            organization_name,
            account_name,
        })
    }
}

// ============================================================================
// SECTION: Display
// ============================================================================

/// Implements `Display` as the fully qualified name.
macro_rules! display_fully_qualified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.fully_qualified_name())
                }
            }
        )+
    };
}

display_fully_qualified!(
    AccountObjectIdentifier,
    DatabaseObjectIdentifier,
    SchemaObjectIdentifier,
    SchemaObjectIdentifierWithArguments,
    AccountIdentifier,
);

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Splits a dotted, possibly quoted identifier into its unquoted parts.
///
/// Quoted parts may contain `.` and doubled `""` escapes. Unquoted parts are
/// taken verbatim.
///
/// # Errors
///
/// Returns [`ParseError`] when a part is empty, too long, or malformed, or
/// when a quoted part is unterminated.
pub fn parse_identifier_parts(value: &str) -> Result<Vec<String>, ParseError> {
    let input = value.trim();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut closed = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                    closed = true;
                }
            } else {
                current.push(ch);
            }
            continue;
        }
        match ch {
            '.' => {
                push_part(input, &mut parts, std::mem::take(&mut current))?;
                quoted = false;
                closed = false;
            }
            '"' if current.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            _ if closed || ch == '"' => {
                return Err(ParseError::InvalidPart {
                    input: input.to_string(),
                    index: parts.len() + 1,
                    defect: PartDefect::StrayCharacters,
                });
            }
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err(ParseError::InvalidPart {
            input: input.to_string(),
            index: parts.len() + 1,
            defect: PartDefect::UnterminatedQuote,
        });
    }
    push_part(input, &mut parts, current)?;
    Ok(parts)
}

/// Parses a comma-separated list of identifiers, respecting quoted commas.
///
/// # Errors
///
/// Returns [`ParseError`] when any element fails to parse.
pub fn parse_identifier_list<T>(value: &str) -> Result<Vec<T>, ParseError>
where
    T: FromStr<Err = ParseError>,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    split_outside_quotes(trimmed, ',').into_iter().map(|item| item.trim().parse()).collect()
}

/// Removes one pair of surrounding double quotes, if present.
#[must_use]
pub fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

/// Double-quotes a single identifier part, escaping embedded quotes.
#[must_use]
pub fn quote_part(part: &str) -> String {
    format!("\"{}\"", part.replace('"', "\"\""))
}

/// Returns true when a part is non-empty and within the length limit.
fn is_valid_part(part: &str) -> bool {
    !part.is_empty() && part.chars().count() <= MAX_IDENTIFIER_PART_LENGTH
}

/// Validates a parsed part and appends it.
fn push_part(input: &str, parts: &mut Vec<String>, part: String) -> Result<(), ParseError> {
    let defect = if part.is_empty() {
        Some(PartDefect::Empty)
    } else if part.chars().count() > MAX_IDENTIFIER_PART_LENGTH {
        Some(PartDefect::TooLong)
    } else {
        None
    };
    if let Some(defect) = defect {
        return Err(ParseError::InvalidPart {
            input: input.to_string(),
            index: parts.len() + 1,
            defect,
        });
    }
    parts.push(part);
    Ok(())
}

/// Parses exactly `N` identifier parts.
fn parse_exact<const N: usize>(value: &str) -> Result<[String; N], ParseError> {
    let parts = parse_identifier_parts(value)?;
    let actual = parts.len();
    parts.try_into().map_err(|_| ParseError::PartCount {
        input: value.trim().to_string(),
        expected: N,
        actual,
    })
}

/// Splits `head(arg, arg)` into the head and its normalized argument types.
fn split_argument_list(value: &str) -> Result<(&str, Vec<String>), ParseError> {
    let malformed = || ParseError::MalformedArguments {
        input: value.to_string(),
    };
    let Some(open) = find_outside_quotes(value, '(') else {
        return Err(malformed());
    };
    let Some(inner) = value[open + 1 ..].strip_suffix(')') else {
        return Err(malformed());
    };
    if inner.contains('(') != inner.contains(')') {
        return Err(malformed());
    }
    let arguments = if inner.trim().is_empty() {
        Vec::new()
    } else {
        let mut arguments = Vec::new();
        for argument in split_top_level(inner) {
            let normalized = normalize_data_type(argument);
            if normalized.is_empty() {
                return Err(malformed());
            }
            arguments.push(normalized);
        }
        arguments
    };
    Ok((&value[.. open], arguments))
}

/// Collapses whitespace and upper-cases a data type for stable identity.
fn normalize_data_type(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase()
}

/// Returns the byte offset of the first `target` outside double quotes.
fn find_outside_quotes(value: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    for (offset, ch) in value.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == target && !in_quotes {
            return Some(offset);
        }
    }
    None
}

/// Splits on `separator` occurrences outside double quotes.
fn split_outside_quotes(value: &str, separator: char) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (offset, ch) in value.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == separator && !in_quotes {
            items.push(&value[start .. offset]);
            start = offset + ch.len_utf8();
        }
    }
    items.push(&value[start ..]);
    items
}

/// Splits an argument list on commas outside nested parentheses, so that
/// `NUMBER(38, 0), VARCHAR` yields two entries.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (offset, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&value[start .. offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start ..]);
    items
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use super::*;

    #[test]
    fn split_top_level_keeps_precision_arguments_together() {
        assert_eq!(split_top_level("NUMBER(38, 0), VARCHAR"), vec!["NUMBER(38, 0)", " VARCHAR"]);
    }

    #[test]
    fn split_outside_quotes_ignores_quoted_commas() {
        assert_eq!(split_outside_quotes("\"a,b\",c", ','), vec!["\"a,b\"", "c"]);
    }

    #[test]
    fn normalize_data_type_collapses_whitespace() {
        assert_eq!(normalize_data_type("  number( 38,  0 ) "), "NUMBER( 38, 0 )");
    }
}

// crates/snowflake-ddl/src/objects/external_functions.rs
// ============================================================================
// Module: External Functions
// Description: External function grammars and DESCRIBE property folding.
// Purpose: Manage functions backed by a remote service behind an API gateway.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! External functions are overloadable, so ALTER, DROP, and lookups address
//! them with a [`SchemaObjectIdentifierWithArguments`]. `SHOW EXTERNAL
//! FUNCTIONS` reports the signature in the `arguments` column as
//! `NAME(TYPE, ...) RETURN TYPE`; the identifier is rebuilt from it.
//! `DESCRIBE FUNCTION` returns one property per row and is folded into
//! [`ExternalFunctionDetails`].

use std::borrow::Cow;

use serde::Deserialize;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SchemaObjectIdentifierWithArguments;
use snowflake_ddl_core::SqlBuilder;
use snowflake_ddl_core::Statement;
use snowflake_ddl_core::ValidationErrors;
use snowflake_ddl_core::Validator;
use snowflake_ddl_core::decode::lenient;
use snowflake_ddl_core::decode::non_empty;
use snowflake_ddl_core::decode::required;
use snowflake_ddl_core::decode::timestamp;
use snowflake_ddl_core::sql::Encoding;
use snowflake_ddl_core::sql::ListOptions;
use snowflake_ddl_core::sql::Node;
use snowflake_ddl_core::sql_enum;
use time::OffsetDateTime;

use crate::client::Client;
use crate::client::find_by_id;
use crate::client::ignore_missing;
use crate::client::missing_as_not_found;
use crate::error::SdkError;
use crate::objects::common::In;
use crate::objects::common::Like;
use crate::objects::common::text;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

sql_enum! {
    /// Nullability of the returned value.
    pub enum ReturnNullValues: "return null values" {
        /// May return NULL.
        Null => "NULL",
        /// Never returns NULL.
        NotNull => "NOT NULL",
    }
}

sql_enum! {
    /// Behavior when an argument is NULL.
    pub enum NullInputBehavior: "null input behavior" {
        /// Call the function with NULL arguments.
        CalledOnNullInput => "CALLED ON NULL INPUT",
        /// Return NULL without calling.
        ReturnsNullOnNullInput => "RETURNS NULL ON NULL INPUT",
        /// Alias of `RETURNS NULL ON NULL INPUT`.
        Strict => "STRICT",
    }
}

sql_enum! {
    /// Determinism of the function results.
    pub enum ReturnResultsBehavior: "return results behavior" {
        /// Results may differ between calls.
        Volatile => "VOLATILE",
        /// Same inputs yield the same results.
        Immutable => "IMMUTABLE",
    }
}

sql_enum! {
    /// Payload compression between Snowflake and the proxy service.
    pub enum ExternalFunctionCompression: "external function compression" {
        /// No compression.
        None => "NONE",
        /// Gzip, the default.
        Auto => "AUTO",
        /// Gzip.
        Gzip => "GZIP",
        /// Deflate.
        Deflate => "DEFLATE",
    }
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Function argument declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFunctionArgument {
    /// Argument name.
    pub name: String,
    /// SQL data type.
    pub data_type: String,
}

impl ExternalFunctionArgument {
    /// Declares an argument.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// `'<name>' = '<value>'` HTTP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFunctionHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Renders `HEADERS = ('h' = 'v', ...)`.
fn render_headers(sql: &mut SqlBuilder, headers: &[ExternalFunctionHeader]) {
    if headers.is_empty() {
        return;
    }
    sql.list_of(Some("HEADERS"), ListOptions::ASSIGNED_PARENTHESES, |sql| {
        for header in headers {
            sql.push(Node::Static(Cow::Owned(format!("'{}' = '{}'", header.name, header.value))));
        }
    });
}

// ============================================================================
// SECTION: Create
// ============================================================================

/// `CREATE EXTERNAL FUNCTION` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateExternalFunctionOptions {
    /// Replace an existing function with the same signature.
    pub or_replace: bool,
    /// Hide the definition from non-owners.
    pub secure: bool,
    /// Function name.
    pub name: SchemaObjectIdentifier,
    /// Argument declarations.
    pub arguments: Vec<ExternalFunctionArgument>,
    /// Result data type.
    pub result_data_type: String,
    /// Result nullability.
    pub return_null_values: Option<ReturnNullValues>,
    /// NULL argument handling.
    pub null_input_behavior: Option<NullInputBehavior>,
    /// Determinism.
    pub return_results_behavior: Option<ReturnResultsBehavior>,
    /// Comment.
    pub comment: Option<String>,
    /// API integration authorizing the proxy service.
    pub api_integration: AccountObjectIdentifier,
    /// Static HTTP headers.
    pub headers: Vec<ExternalFunctionHeader>,
    /// Context functions forwarded as headers.
    pub context_headers: Vec<String>,
    /// Maximum rows per batch.
    pub max_batch_rows: Option<u32>,
    /// Payload compression.
    pub compression: Option<ExternalFunctionCompression>,
    /// Request translator function.
    pub request_translator: Option<SchemaObjectIdentifier>,
    /// Response translator function.
    pub response_translator: Option<SchemaObjectIdentifier>,
    /// Proxy service URL.
    pub url: String,
}

impl CreateExternalFunctionOptions {
    /// Creates options with the required fields.
    #[must_use]
    pub fn new(
        name: SchemaObjectIdentifier,
        result_data_type: impl Into<String>,
        api_integration: AccountObjectIdentifier,
        url: impl Into<String>,
    ) -> Self {
        Self {
            or_replace: false,
            secure: false,
            name,
            arguments: Vec::new(),
            result_data_type: result_data_type.into(),
            return_null_values: None,
            null_input_behavior: None,
            return_results_behavior: None,
            comment: None,
            api_integration,
            headers: Vec::new(),
            context_headers: Vec::new(),
            max_batch_rows: None,
            compression: None,
            request_translator: None,
            response_translator: None,
            url: url.into(),
        }
    }
}

impl Render for CreateExternalFunctionOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE")
            .keyword(self.or_replace, "OR REPLACE")
            .keyword(self.secure, "SECURE")
            .static_keyword("EXTERNAL FUNCTION")
            .identifier(&self.name);
        if self.arguments.is_empty() {
            sql.static_keyword("()");
        } else {
            sql.list_of(None, ListOptions::COMMA_PARENTHESES, |sql| {
                for argument in &self.arguments {
                    sql.push(Node::Static(Cow::Owned(format!("{} {}", argument.name, argument.data_type))));
                }
            });
        }
        sql.parameter("RETURNS", Some(&self.result_data_type), Encoding::PLAIN.no_equals())
            .keyword_value(self.return_null_values.as_ref())
            .keyword_value(self.null_input_behavior.as_ref())
            .keyword_value(self.return_results_behavior.as_ref())
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES)
            .identifier_assigned("API_INTEGRATION", Some(&self.api_integration));
        render_headers(sql, &self.headers);
        sql.list(Some("CONTEXT_HEADERS"), &self.context_headers, ListOptions::ASSIGNED_PARENTHESES)
            .parameter("MAX_BATCH_ROWS", self.max_batch_rows.as_ref(), Encoding::PLAIN)
            .parameter("COMPRESSION", self.compression.as_ref(), Encoding::PLAIN)
            .identifier_assigned("REQUEST_TRANSLATOR", self.request_translator.as_ref())
            .identifier_assigned("RESPONSE_TRANSLATOR", self.response_translator.as_ref())
            .parameter("AS", Some(&self.url), Encoding::SINGLE_QUOTES.no_equals());
    }
}

impl Statement for CreateExternalFunctionOptions {
    const OPERATION: &'static str = "CreateExternalFunctionOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .required("ResultDataType", &self.result_data_type)
            .valid_identifier("ApiIntegration", &self.api_integration)
            .required("As", &self.url)
            .valid_identifier_if_set("RequestTranslator", self.request_translator.as_ref())
            .valid_identifier_if_set("ResponseTranslator", self.response_translator.as_ref())
            .check(
                self.arguments.iter().any(|argument| argument.name.is_empty() || argument.data_type.is_empty()),
                "Arguments",
                "arguments need a name and a data type",
            );
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER FUNCTION ... SET` body. Exactly one field may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalFunctionSet {
    /// API integration.
    pub api_integration: Option<AccountObjectIdentifier>,
    /// Static HTTP headers.
    pub headers: Vec<ExternalFunctionHeader>,
    /// Context functions forwarded as headers.
    pub context_headers: Vec<String>,
    /// Maximum rows per batch.
    pub max_batch_rows: Option<u32>,
    /// Payload compression.
    pub compression: Option<ExternalFunctionCompression>,
    /// Request translator function.
    pub request_translator: Option<SchemaObjectIdentifier>,
    /// Response translator function.
    pub response_translator: Option<SchemaObjectIdentifier>,
}

impl Render for ExternalFunctionSet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET").identifier_assigned("API_INTEGRATION", self.api_integration.as_ref());
        render_headers(sql, &self.headers);
        sql.list(Some("CONTEXT_HEADERS"), &self.context_headers, ListOptions::ASSIGNED_PARENTHESES)
            .parameter("MAX_BATCH_ROWS", self.max_batch_rows.as_ref(), Encoding::PLAIN)
            .parameter("COMPRESSION", self.compression.as_ref(), Encoding::PLAIN)
            .identifier_assigned("REQUEST_TRANSLATOR", self.request_translator.as_ref())
            .identifier_assigned("RESPONSE_TRANSLATOR", self.response_translator.as_ref());
    }
}

/// `ALTER FUNCTION ... UNSET` body. Exactly one field may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalFunctionUnset {
    /// Remove the comment.
    pub comment: bool,
    /// Remove the headers.
    pub headers: bool,
    /// Remove the context headers.
    pub context_headers: bool,
    /// Reset the batch size.
    pub max_batch_rows: bool,
    /// Reset the compression.
    pub compression: bool,
    /// Remove the secure flag.
    pub secure: bool,
    /// Remove the request translator.
    pub request_translator: bool,
    /// Remove the response translator.
    pub response_translator: bool,
}

impl Render for ExternalFunctionUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("UNSET")
            .keyword(self.comment, "COMMENT")
            .keyword(self.headers, "HEADERS")
            .keyword(self.context_headers, "CONTEXT_HEADERS")
            .keyword(self.max_batch_rows, "MAX_BATCH_ROWS")
            .keyword(self.compression, "COMPRESSION")
            .keyword(self.secure, "SECURE")
            .keyword(self.request_translator, "REQUEST_TRANSLATOR")
            .keyword(self.response_translator, "RESPONSE_TRANSLATOR");
    }
}

/// Action of an `ALTER FUNCTION` statement on an external function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterExternalFunctionAction {
    /// `SET ...`.
    Set(ExternalFunctionSet),
    /// `UNSET ...`.
    Unset(ExternalFunctionUnset),
}

/// `ALTER FUNCTION` options for an external function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterExternalFunctionOptions {
    /// Skip when the function does not exist.
    pub if_exists: bool,
    /// Function signature.
    pub name: SchemaObjectIdentifierWithArguments,
    /// Action to apply.
    pub action: AlterExternalFunctionAction,
}

impl Render for AlterExternalFunctionOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER FUNCTION").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterExternalFunctionAction::Set(set) => sql.nested(Some(set)),
            AlterExternalFunctionAction::Unset(unset) => sql.nested(Some(unset)),
        };
    }
}

impl Statement for AlterExternalFunctionOptions {
    const OPERATION: &'static str = "AlterExternalFunctionOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterExternalFunctionAction::Set(set) => {
                v.scope("Set", |v| {
                    v.exactly_one_of(
                        "",
                        &[
                            ("ApiIntegration", set.api_integration.is_some()),
                            ("Headers", !set.headers.is_empty()),
                            ("ContextHeaders", !set.context_headers.is_empty()),
                            ("MaxBatchRows", set.max_batch_rows.is_some()),
                            ("Compression", set.compression.is_some()),
                            ("RequestTranslator", set.request_translator.is_some()),
                            ("ResponseTranslator", set.response_translator.is_some()),
                        ],
                    )
                    .valid_identifier_if_set("ApiIntegration", set.api_integration.as_ref())
                    .valid_identifier_if_set("RequestTranslator", set.request_translator.as_ref())
                    .valid_identifier_if_set("ResponseTranslator", set.response_translator.as_ref());
                });
            }
            AlterExternalFunctionAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.exactly_one_of(
                        "",
                        &[
                            ("Comment", unset.comment),
                            ("Headers", unset.headers),
                            ("ContextHeaders", unset.context_headers),
                            ("MaxBatchRows", unset.max_batch_rows),
                            ("Compression", unset.compression),
                            ("Secure", unset.secure),
                            ("RequestTranslator", unset.request_translator),
                            ("ResponseTranslator", unset.response_translator),
                        ],
                    );
                });
            }
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe
// ============================================================================

/// `DROP FUNCTION` options for an external function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropExternalFunctionOptions {
    /// Skip when the function does not exist.
    pub if_exists: bool,
    /// Function signature.
    pub name: SchemaObjectIdentifierWithArguments,
}

impl Render for DropExternalFunctionOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP FUNCTION").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropExternalFunctionOptions {
    const OPERATION: &'static str = "DropExternalFunctionOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE FUNCTION` options for an external function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeExternalFunctionOptions {
    /// Function signature.
    pub name: SchemaObjectIdentifierWithArguments,
}

impl Render for DescribeExternalFunctionOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE FUNCTION").identifier(&self.name);
    }
}

impl Statement for DescribeExternalFunctionOptions {
    const OPERATION: &'static str = "DescribeExternalFunctionOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// Raw `DESCRIBE FUNCTION` property row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExternalFunctionPropertyRow {
    /// Property name.
    pub property: Option<String>,
    /// Property value.
    pub value: Option<String>,
}

/// `DESCRIBE FUNCTION` properties folded into one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalFunctionDetails {
    /// Argument signature, such as `(A NUMBER)`.
    pub signature: Option<String>,
    /// Result type.
    pub returns: Option<String>,
    /// Implementation language.
    pub language: Option<String>,
    /// NULL argument handling.
    pub null_handling: Option<NullInputBehavior>,
    /// Determinism.
    pub volatility: Option<ReturnResultsBehavior>,
    /// Proxy service URL.
    pub body: Option<String>,
    /// Static headers as reported.
    pub headers: Option<String>,
    /// Context headers as reported.
    pub context_headers: Option<String>,
    /// Maximum rows per batch.
    pub max_batch_rows: Option<u32>,
    /// Payload compression.
    pub compression: Option<ExternalFunctionCompression>,
    /// API integration.
    pub api_integration: Option<AccountObjectIdentifier>,
    /// Request translator.
    pub request_translator: Option<SchemaObjectIdentifier>,
    /// Response translator.
    pub response_translator: Option<SchemaObjectIdentifier>,
}

impl ExternalFunctionDetails {
    /// Folds property rows; unknown properties are ignored.
    #[must_use]
    pub fn from_properties(rows: &[ExternalFunctionPropertyRow]) -> Self {
        /// Row name used in decode diagnostics.
        const ROW: &str = "ExternalFunctionPropertyRow";
        let mut details = Self::default();
        for row in rows {
            let Some(property) = row.property.as_deref() else {
                continue;
            };
            let value = row.value.as_deref();
            match property.to_ascii_lowercase().as_str() {
                "signature" => details.signature = non_empty(value),
                "returns" => details.returns = non_empty(value),
                "language" => details.language = non_empty(value),
                "null handling" => {
                    details.null_handling = lenient(ROW, "null handling", value, NullInputBehavior::parse);
                }
                "volatility" => {
                    details.volatility = lenient(ROW, "volatility", value, ReturnResultsBehavior::parse);
                }
                "body" => details.body = non_empty(value),
                "headers" => details.headers = non_empty(value),
                "context_headers" => details.context_headers = non_empty(value),
                "max_batch_rows" => {
                    details.max_batch_rows = lenient(ROW, "max_batch_rows", value, str::parse);
                }
                "compression" => {
                    details.compression = lenient(ROW, "compression", value, ExternalFunctionCompression::parse);
                }
                "api_integration" => {
                    details.api_integration = lenient(ROW, "api_integration", value, str::parse);
                }
                "request_translator" => {
                    details.request_translator = lenient(ROW, "request_translator", value, str::parse);
                }
                "response_translator" => {
                    details.response_translator = lenient(ROW, "response_translator", value, str::parse);
                }
                _ => {}
            }
        }
        details
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW EXTERNAL FUNCTIONS` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowExternalFunctionOptions {
    /// Name filter.
    pub like: Option<Like>,
    /// Scope.
    pub in_scope: Option<In>,
}

impl Render for ShowExternalFunctionOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW EXTERNAL FUNCTIONS").nested(self.like.as_ref()).nested(self.in_scope.as_ref());
    }
}

impl Statement for ShowExternalFunctionOptions {
    const OPERATION: &'static str = "ShowExternalFunctionOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        if let Some(scope) = &self.in_scope {
            scope.validate(&mut v);
        }
        v.finish()
    }
}

/// Raw `SHOW EXTERNAL FUNCTIONS` row. Flag columns hold `Y` or `N`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExternalFunctionRow {
    /// Creation time.
    pub created_on: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// Built-in flag.
    pub is_builtin: Option<String>,
    /// Aggregate flag.
    pub is_aggregate: Option<String>,
    /// ANSI flag.
    pub is_ansi: Option<String>,
    /// Minimum argument count.
    pub min_num_arguments: Option<u32>,
    /// Maximum argument count.
    pub max_num_arguments: Option<u32>,
    /// Signature such as `F(NUMBER) RETURN NUMBER`.
    pub arguments: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Database.
    pub catalog_name: Option<String>,
    /// Table function flag.
    pub is_table_function: Option<String>,
    /// Clustering flag.
    pub valid_for_clustering: Option<String>,
    /// Secure flag.
    pub is_secure: Option<String>,
    /// External flag.
    pub is_external_function: Option<String>,
    /// Language.
    pub language: Option<String>,
    /// Memoizable flag.
    pub is_memoizable: Option<String>,
}

/// Decoded external function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFunction {
    /// Signature identifier.
    pub id: SchemaObjectIdentifierWithArguments,
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Result type from the signature.
    pub return_type: Option<String>,
    /// Built-in flag.
    pub is_builtin: bool,
    /// Aggregate flag.
    pub is_aggregate: bool,
    /// ANSI flag.
    pub is_ansi: bool,
    /// Minimum argument count.
    pub min_num_arguments: Option<u32>,
    /// Maximum argument count.
    pub max_num_arguments: Option<u32>,
    /// Description.
    pub description: Option<String>,
    /// Table function flag.
    pub is_table_function: bool,
    /// Clustering flag.
    pub valid_for_clustering: bool,
    /// Secure flag.
    pub is_secure: bool,
    /// External flag.
    pub is_external_function: bool,
    /// Language.
    pub language: Option<String>,
    /// Memoizable flag.
    pub is_memoizable: bool,
}

/// Reads a `Y`/`N` flag column.
fn flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|raw| raw.trim().eq_ignore_ascii_case("Y"))
}

/// Splits `NAME(T1, T2) RETURN T` into argument types and the return type.
fn parse_signature(raw: &str) -> Result<(Vec<String>, Option<String>), String> {
    let open = raw.find('(').ok_or_else(|| String::from("missing '('"))?;
    let close = raw.rfind(')').filter(|close| *close > open).ok_or_else(|| String::from("missing ')'"))?;
    let arguments = raw[open + 1 .. close]
        .split(',')
        .map(str::trim)
        .filter(|argument| !argument.is_empty())
        .map(str::to_string)
        .collect();
    let return_type = raw[close + 1 ..].trim().strip_prefix("RETURN").map(|rest| rest.trim().to_string());
    Ok((arguments, return_type.filter(|rest| !rest.is_empty())))
}

impl TryFrom<ExternalFunctionRow> for ExternalFunction {
    type Error = DecodeError;

    fn try_from(row: ExternalFunctionRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "ExternalFunctionRow";
        let database_name = required(ROW, "catalog_name", row.catalog_name.as_deref(), text)?;
        let schema_name = required(ROW, "schema_name", row.schema_name.as_deref(), text)?;
        let name = required(ROW, "name", row.name.as_deref(), text)?;
        let (arguments, return_type) = required(ROW, "arguments", row.arguments.as_deref(), parse_signature)?;
        Ok(Self {
            id: SchemaObjectIdentifierWithArguments::new(database_name, schema_name, name, arguments),
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            return_type,
            is_builtin: flag(row.is_builtin.as_deref()),
            is_aggregate: flag(row.is_aggregate.as_deref()),
            is_ansi: flag(row.is_ansi.as_deref()),
            min_num_arguments: row.min_num_arguments,
            max_num_arguments: row.max_num_arguments,
            description: non_empty(row.description.as_deref()),
            is_table_function: flag(row.is_table_function.as_deref()),
            valid_for_clustering: flag(row.valid_for_clustering.as_deref()),
            is_secure: flag(row.is_secure.as_deref()),
            is_external_function: flag(row.is_external_function.as_deref()),
            language: non_empty(row.language.as_deref()),
            is_memoizable: flag(row.is_memoizable.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// External function operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct ExternalFunctions<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> ExternalFunctions<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates an external function.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        options: &CreateExternalFunctionOptions,
    ) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters an external function.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterExternalFunctionOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops an external function.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropExternalFunctionOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops an external function, treating a missing one as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing function.
    pub async fn drop_safely(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifierWithArguments,
    ) -> Result<(), SdkError> {
        let options = DropExternalFunctionOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists external functions.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(
        &self,
        ctx: &RequestContext,
        options: &ShowExternalFunctionOptions,
    ) -> Result<Vec<ExternalFunction>, SdkError> {
        self.client.query_as::<_, ExternalFunctionRow, ExternalFunction>(ctx, options).await
    }

    /// Returns the external function with the exact signature `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no function matches.
    pub async fn show_by_id(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifierWithArguments,
    ) -> Result<ExternalFunction, SdkError> {
        let options = ShowExternalFunctionOptions {
            like: Some(Like::new(id.name())),
            in_scope: Some(In::Schema(id.schema_id())),
        };
        let functions = self.show(ctx, &options).await?;
        find_by_id(functions, "external function", id, |function| function.id == *id)
    }

    /// Like [`Self::show_by_id`], with driver missing-object errors reported
    /// as [`SdkError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] or other failures.
    pub async fn show_by_id_safely(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifierWithArguments,
    ) -> Result<ExternalFunction, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "external function", id)
    }

    /// Describes an external function.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifierWithArguments,
    ) -> Result<ExternalFunctionDetails, SdkError> {
        let options = DescribeExternalFunctionOptions {
            name: id.clone(),
        };
        let rows: Vec<ExternalFunctionPropertyRow> = self.client.query(ctx, &options).await?;
        Ok(ExternalFunctionDetails::from_properties(&rows))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use super::*;

    #[test]
    fn signature_splits_arguments_and_return_type() {
        let (arguments, return_type) = parse_signature("F(NUMBER, VARCHAR) RETURN VARIANT").unwrap();
        assert_eq!(arguments, vec!["NUMBER".to_string(), "VARCHAR".to_string()]);
        assert_eq!(return_type.as_deref(), Some("VARIANT"));
        let (arguments, _) = parse_signature("F() RETURN NUMBER").unwrap();
        assert!(arguments.is_empty());
        assert!(parse_signature("F").is_err());
    }
}

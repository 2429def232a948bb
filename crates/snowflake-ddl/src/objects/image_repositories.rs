// crates/snowflake-ddl/src/objects/image_repositories.rs
// ============================================================================
// Module: Image Repositories
// Description: Container image repository grammars.
// Purpose: Manage OCI registries backing Snowpark Container Services.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Image repositories hold the container images that services run. Rows
//! carry the registry URL used by `docker push`.

use serde::Deserialize;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::SqlBuilder;
use snowflake_ddl_core::Statement;
use snowflake_ddl_core::ValidationErrors;
use snowflake_ddl_core::Validator;
use snowflake_ddl_core::decode::non_empty;
use snowflake_ddl_core::decode::required;
use snowflake_ddl_core::decode::timestamp;
use snowflake_ddl_core::sql::Encoding;
use time::OffsetDateTime;

use crate::client::Client;
use crate::client::find_by_id;
use crate::client::ignore_missing;
use crate::client::missing_as_not_found;
use crate::error::SdkError;
use crate::objects::common::In;
use crate::objects::common::Like;
use crate::objects::common::TagAssociation;
use crate::objects::common::set_tags;
use crate::objects::common::text;
use crate::objects::common::unset_tags;
use crate::objects::common::validate_tags;
use crate::objects::common::with_tags;

// ============================================================================
// SECTION: Statements
// ============================================================================

/// `CREATE IMAGE REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateImageRepositoryOptions {
    /// Replace an existing repository.
    pub or_replace: bool,
    /// Skip when the repository already exists.
    pub if_not_exists: bool,
    /// Repository name.
    pub name: SchemaObjectIdentifier,
    /// Tags attached on creation.
    pub tags: Vec<TagAssociation>,
    /// Comment.
    pub comment: Option<String>,
}

impl CreateImageRepositoryOptions {
    /// Creates options for `name`.
    #[must_use]
    pub const fn new(name: SchemaObjectIdentifier) -> Self {
        Self {
            or_replace: false,
            if_not_exists: false,
            name,
            tags: Vec::new(),
            comment: None,
        }
    }
}

impl Render for CreateImageRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE")
            .keyword(self.or_replace, "OR REPLACE")
            .static_keyword("IMAGE REPOSITORY")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name);
        with_tags(sql, "TAG", &self.tags);
        sql.parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

impl Statement for CreateImageRepositoryOptions {
    const OPERATION: &'static str = "CreateImageRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .conflicting(("OrReplace", self.or_replace), ("IfNotExists", self.if_not_exists));
        validate_tags(&mut v, "Tag", &self.tags);
        v.finish()
    }
}

/// Action of an `ALTER IMAGE REPOSITORY` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterImageRepositoryAction {
    /// `SET COMMENT = '...'`.
    SetComment(String),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
}

/// `ALTER IMAGE REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterImageRepositoryOptions {
    /// Skip when the repository does not exist.
    pub if_exists: bool,
    /// Repository name.
    pub name: SchemaObjectIdentifier,
    /// Action to apply.
    pub action: AlterImageRepositoryAction,
}

impl Render for AlterImageRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER IMAGE REPOSITORY").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterImageRepositoryAction::SetComment(comment) => {
                sql.static_keyword("SET").parameter("COMMENT", Some(comment), Encoding::SINGLE_QUOTES);
            }
            AlterImageRepositoryAction::SetTags(tags) => set_tags(sql, tags),
            AlterImageRepositoryAction::UnsetTags(tags) => unset_tags(sql, tags),
        }
    }
}

impl Statement for AlterImageRepositoryOptions {
    const OPERATION: &'static str = "AlterImageRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterImageRepositoryAction::SetComment(_) => {}
            AlterImageRepositoryAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterImageRepositoryAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
        }
        v.finish()
    }
}

/// `DROP IMAGE REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropImageRepositoryOptions {
    /// Skip when the repository does not exist.
    pub if_exists: bool,
    /// Repository name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DropImageRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP IMAGE REPOSITORY").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropImageRepositoryOptions {
    const OPERATION: &'static str = "DropImageRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `SHOW IMAGE REPOSITORIES` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowImageRepositoryOptions {
    /// Name filter.
    pub like: Option<Like>,
    /// Scope.
    pub in_scope: Option<In>,
}

impl Render for ShowImageRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW IMAGE REPOSITORIES").nested(self.like.as_ref()).nested(self.in_scope.as_ref());
    }
}

impl Statement for ShowImageRepositoryOptions {
    const OPERATION: &'static str = "ShowImageRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        if let Some(scope) = &self.in_scope {
            scope.validate(&mut v);
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Raw `SHOW IMAGE REPOSITORIES` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageRepositoryRow {
    /// Creation time.
    pub created_on: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Database.
    pub database_name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// Registry URL.
    pub repository_url: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Private-link registry URL.
    pub privatelink_repository_url: Option<String>,
}

/// Decoded image repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRepository {
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Name.
    pub name: String,
    /// Database.
    pub database_name: String,
    /// Schema.
    pub schema_name: String,
    /// Registry URL.
    pub repository_url: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Private-link registry URL.
    pub privatelink_repository_url: Option<String>,
}

impl ImageRepository {
    /// Returns the repository identifier.
    #[must_use]
    pub fn id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.name)
    }
}

impl TryFrom<ImageRepositoryRow> for ImageRepository {
    type Error = DecodeError;

    fn try_from(row: ImageRepositoryRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "ImageRepositoryRow";
        Ok(Self {
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            name: required(ROW, "name", row.name.as_deref(), text)?,
            database_name: required(ROW, "database_name", row.database_name.as_deref(), text)?,
            schema_name: required(ROW, "schema_name", row.schema_name.as_deref(), text)?,
            repository_url: non_empty(row.repository_url.as_deref()),
            owner: non_empty(row.owner.as_deref()),
            owner_role_type: non_empty(row.owner_role_type.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            privatelink_repository_url: non_empty(row.privatelink_repository_url.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Image repository operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct ImageRepositories<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> ImageRepositories<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates an image repository.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreateImageRepositoryOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters an image repository.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterImageRepositoryOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops an image repository.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropImageRepositoryOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops an image repository, treating a missing one as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing repository.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<(), SdkError> {
        let options = DropImageRepositoryOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists image repositories.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(
        &self,
        ctx: &RequestContext,
        options: &ShowImageRepositoryOptions,
    ) -> Result<Vec<ImageRepository>, SdkError> {
        self.client.query_as::<_, ImageRepositoryRow, ImageRepository>(ctx, options).await
    }

    /// Returns the repository identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotFound`] when no repository matches.
    pub async fn show_by_id(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifier,
    ) -> Result<ImageRepository, SdkError> {
        let options = ShowImageRepositoryOptions {
            like: Some(Like::new(id.name())),
            in_scope: Some(In::Schema(id.schema_id())),
        };
        let repositories = self.show(ctx, &options).await?;
        find_by_id(repositories, "image repository", id, |repository| repository.id() == *id)
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
        id: &SchemaObjectIdentifier,
    ) -> Result<ImageRepository, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "image repository", id)
    }
}

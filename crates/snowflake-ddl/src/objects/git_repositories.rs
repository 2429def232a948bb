// crates/snowflake-ddl/src/objects/git_repositories.rs
// ============================================================================
// Module: Git Repositories
// Description: Git repository clone grammars plus branch and tag listings.
// Purpose: Mirror remote Git repositories into a schema.
// Dependencies: serde, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! A Git repository clone is a schema object bound to an API integration
//! and optional credentials secret. `ALTER ... FETCH` refreshes it; branches
//! and tags are listed with `SHOW GIT BRANCHES|TAGS IN <repository>`.

use serde::Deserialize;
use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::Render;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;
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
// SECTION: Create
// ============================================================================

/// `CREATE GIT REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGitRepositoryOptions {
    /// Replace an existing repository.
    pub or_replace: bool,
    /// Skip when the repository already exists.
    pub if_not_exists: bool,
    /// Repository name.
    pub name: SchemaObjectIdentifier,
    /// HTTPS origin URL.
    pub origin: String,
    /// API integration allowing access to the origin.
    pub api_integration: AccountObjectIdentifier,
    /// Secret holding the origin credentials.
    pub git_credentials: Option<SchemaObjectIdentifier>,
    /// Comment.
    pub comment: Option<String>,
    /// Tags attached on creation.
    pub tags: Vec<TagAssociation>,
}

impl CreateGitRepositoryOptions {
    /// Creates options with the required fields.
    #[must_use]
    pub fn new(
        name: SchemaObjectIdentifier,
        origin: impl Into<String>,
        api_integration: AccountObjectIdentifier,
    ) -> Self {
        Self {
            or_replace: false,
            if_not_exists: false,
            name,
            origin: origin.into(),
            api_integration,
            git_credentials: None,
            comment: None,
            tags: Vec::new(),
        }
    }
}

impl Render for CreateGitRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("CREATE")
            .keyword(self.or_replace, "OR REPLACE")
            .static_keyword("GIT REPOSITORY")
            .keyword(self.if_not_exists, "IF NOT EXISTS")
            .identifier(&self.name)
            .parameter("ORIGIN", Some(&self.origin), Encoding::SINGLE_QUOTES)
            .identifier_assigned("API_INTEGRATION", Some(&self.api_integration))
            .identifier_assigned("GIT_CREDENTIALS", self.git_credentials.as_ref())
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
        with_tags(sql, "TAG", &self.tags);
    }
}

impl Statement for CreateGitRepositoryOptions {
    const OPERATION: &'static str = "CreateGitRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name)
            .conflicting(("OrReplace", self.or_replace), ("IfNotExists", self.if_not_exists))
            .required("Origin", &self.origin)
            .valid_identifier("ApiIntegration", &self.api_integration)
            .valid_identifier_if_set("GitCredentials", self.git_credentials.as_ref());
        validate_tags(&mut v, "Tag", &self.tags);
        v.finish()
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `ALTER GIT REPOSITORY ... SET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitRepositorySet {
    /// API integration.
    pub api_integration: Option<AccountObjectIdentifier>,
    /// Credentials secret.
    pub git_credentials: Option<SchemaObjectIdentifier>,
    /// Comment.
    pub comment: Option<String>,
}

impl Render for GitRepositorySet {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SET")
            .identifier_assigned("API_INTEGRATION", self.api_integration.as_ref())
            .identifier_assigned("GIT_CREDENTIALS", self.git_credentials.as_ref())
            .parameter("COMMENT", self.comment.as_ref(), Encoding::SINGLE_QUOTES);
    }
}

/// `ALTER GIT REPOSITORY ... UNSET` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitRepositoryUnset {
    /// Remove the credentials secret.
    pub git_credentials: bool,
    /// Remove the comment.
    pub comment: bool,
}

impl Render for GitRepositoryUnset {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.list_of(Some("UNSET"), ListOptions::COMMA, |sql| {
            sql.keyword(self.git_credentials, "GIT_CREDENTIALS").keyword(self.comment, "COMMENT");
        });
    }
}

/// Action of an `ALTER GIT REPOSITORY` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterGitRepositoryAction {
    /// `SET ...`.
    Set(GitRepositorySet),
    /// `UNSET ...`.
    Unset(GitRepositoryUnset),
    /// `SET TAG ...`.
    SetTags(Vec<TagAssociation>),
    /// `UNSET TAG ...`.
    UnsetTags(Vec<SchemaObjectIdentifier>),
    /// `FETCH`: refresh from the origin.
    Fetch,
}

/// `ALTER GIT REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterGitRepositoryOptions {
    /// Skip when the repository does not exist.
    pub if_exists: bool,
    /// Repository name.
    pub name: SchemaObjectIdentifier,
    /// Action to apply.
    pub action: AlterGitRepositoryAction,
}

impl Render for AlterGitRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("ALTER GIT REPOSITORY").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
        match &self.action {
            AlterGitRepositoryAction::Set(set) => {
                sql.nested(Some(set));
            }
            AlterGitRepositoryAction::Unset(unset) => {
                sql.nested(Some(unset));
            }
            AlterGitRepositoryAction::SetTags(tags) => set_tags(sql, tags),
            AlterGitRepositoryAction::UnsetTags(tags) => unset_tags(sql, tags),
            AlterGitRepositoryAction::Fetch => {
                sql.static_keyword("FETCH");
            }
        }
    }
}

impl Statement for AlterGitRepositoryOptions {
    const OPERATION: &'static str = "AlterGitRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        match &self.action {
            AlterGitRepositoryAction::Set(set) => {
                v.scope("Set", |v| {
                    v.at_least_one_of(
                        "",
                        &[
                            ("ApiIntegration", set.api_integration.is_some()),
                            ("GitCredentials", set.git_credentials.is_some()),
                            ("Comment", set.comment.is_some()),
                        ],
                    )
                    .valid_identifier_if_set("ApiIntegration", set.api_integration.as_ref())
                    .valid_identifier_if_set("GitCredentials", set.git_credentials.as_ref());
                });
            }
            AlterGitRepositoryAction::Unset(unset) => {
                v.scope("Unset", |v| {
                    v.at_least_one_of(
                        "",
                        &[("GitCredentials", unset.git_credentials), ("Comment", unset.comment)],
                    );
                });
            }
            AlterGitRepositoryAction::SetTags(tags) => {
                v.required("SetTags", tags);
                validate_tags(&mut v, "SetTags", tags);
            }
            AlterGitRepositoryAction::UnsetTags(tags) => {
                v.required("UnsetTags", tags).valid_identifiers("UnsetTags", tags);
            }
            AlterGitRepositoryAction::Fetch => {}
        }
        v.finish()
    }
}

// ============================================================================
// SECTION: Drop / Describe
// ============================================================================

/// `DROP GIT REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropGitRepositoryOptions {
    /// Skip when the repository does not exist.
    pub if_exists: bool,
    /// Repository name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DropGitRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DROP GIT REPOSITORY").keyword(self.if_exists, "IF EXISTS").identifier(&self.name);
    }
}

impl Statement for DropGitRepositoryOptions {
    const OPERATION: &'static str = "DropGitRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

/// `DESCRIBE GIT REPOSITORY` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGitRepositoryOptions {
    /// Repository name.
    pub name: SchemaObjectIdentifier,
}

impl Render for DescribeGitRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("DESCRIBE GIT REPOSITORY").identifier(&self.name);
    }
}

impl Statement for DescribeGitRepositoryOptions {
    const OPERATION: &'static str = "DescribeGitRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("name", &self.name);
        v.finish()
    }
}

// ============================================================================
// SECTION: Show
// ============================================================================

/// `SHOW GIT REPOSITORIES` options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowGitRepositoryOptions {
    /// Name filter.
    pub like: Option<Like>,
    /// Scope.
    pub in_scope: Option<In>,
}

impl Render for ShowGitRepositoryOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword("SHOW GIT REPOSITORIES").nested(self.like.as_ref()).nested(self.in_scope.as_ref());
    }
}

impl Statement for ShowGitRepositoryOptions {
    const OPERATION: &'static str = "ShowGitRepositoryOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        if let Some(scope) = &self.in_scope {
            scope.validate(&mut v);
        }
        v.finish()
    }
}

/// Kind of Git reference listed by [`ShowGitReferenceOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitReferenceKind {
    /// `SHOW GIT BRANCHES`.
    Branches,
    /// `SHOW GIT TAGS`.
    Tags,
}

/// `SHOW GIT BRANCHES|TAGS [LIKE ...] IN <repository>` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowGitReferenceOptions {
    /// Branches or tags.
    pub kind: GitReferenceKind,
    /// Name filter.
    pub like: Option<Like>,
    /// Repository to inspect.
    pub repository: SchemaObjectIdentifier,
}

impl Render for ShowGitReferenceOptions {
    fn render(&self, sql: &mut SqlBuilder) {
        sql.static_keyword(match self.kind {
            GitReferenceKind::Branches => "SHOW GIT BRANCHES",
            GitReferenceKind::Tags => "SHOW GIT TAGS",
        })
        .nested(self.like.as_ref())
        .identifier_with("IN", Some(&self.repository));
    }
}

impl Statement for ShowGitReferenceOptions {
    const OPERATION: &'static str = "ShowGitReferenceOptions";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(Self::OPERATION);
        v.valid_identifier("Repository", &self.repository);
        v.finish()
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Raw `SHOW GIT REPOSITORIES` / `DESCRIBE GIT REPOSITORY` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitRepositoryRow {
    /// Creation time.
    pub created_on: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Database.
    pub database_name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// Origin URL.
    pub origin: Option<String>,
    /// API integration.
    pub api_integration: Option<String>,
    /// Credentials secret.
    pub git_credentials: Option<String>,
    /// Owner role.
    pub owner: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Last fetch time.
    pub last_fetched_at: Option<String>,
}

/// Decoded Git repository clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepository {
    /// Creation time.
    pub created_on: Option<OffsetDateTime>,
    /// Name.
    pub name: String,
    /// Database.
    pub database_name: String,
    /// Schema.
    pub schema_name: String,
    /// Origin URL.
    pub origin: Option<String>,
    /// API integration.
    pub api_integration: Option<AccountObjectIdentifier>,
    /// Credentials secret.
    pub git_credentials: Option<SchemaObjectIdentifier>,
    /// Owner role.
    pub owner: Option<String>,
    /// Owner role type.
    pub owner_role_type: Option<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Last fetch time.
    pub last_fetched_at: Option<OffsetDateTime>,
}

impl GitRepository {
    /// Returns the repository identifier.
    #[must_use]
    pub fn id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.name)
    }
}

impl TryFrom<GitRepositoryRow> for GitRepository {
    type Error = DecodeError;

    fn try_from(row: GitRepositoryRow) -> Result<Self, Self::Error> {
        /// Row name used in decode diagnostics.
        const ROW: &str = "GitRepositoryRow";
        Ok(Self {
            created_on: timestamp(ROW, "created_on", row.created_on.as_deref()),
            name: required(ROW, "name", row.name.as_deref(), text)?,
            database_name: required(ROW, "database_name", row.database_name.as_deref(), text)?,
            schema_name: required(ROW, "schema_name", row.schema_name.as_deref(), text)?,
            origin: non_empty(row.origin.as_deref()),
            api_integration: lenient(ROW, "api_integration", row.api_integration.as_deref(), str::parse),
            git_credentials: lenient(ROW, "git_credentials", row.git_credentials.as_deref(), str::parse),
            owner: non_empty(row.owner.as_deref()),
            owner_role_type: non_empty(row.owner_role_type.as_deref()),
            comment: non_empty(row.comment.as_deref()),
            last_fetched_at: timestamp(ROW, "last_fetched_at", row.last_fetched_at.as_deref()),
        })
    }
}

/// Raw `SHOW GIT BRANCHES|TAGS` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitReferenceRow {
    /// Branch or tag name.
    pub name: Option<String>,
    /// Path inside the repository stage.
    pub path: Option<String>,
    /// Checkouts of the branch.
    pub checkouts: Option<String>,
    /// Commit hash.
    pub commit_hash: Option<String>,
    /// Tag author.
    pub author: Option<String>,
    /// Tag message.
    pub message: Option<String>,
}

/// Decoded Git branch or tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitReference {
    /// Branch or tag name.
    pub name: String,
    /// Path inside the repository stage.
    pub path: Option<String>,
    /// Checkouts of the branch.
    pub checkouts: Option<String>,
    /// Commit hash.
    pub commit_hash: Option<String>,
    /// Tag author.
    pub author: Option<String>,
    /// Tag message.
    pub message: Option<String>,
}

impl TryFrom<GitReferenceRow> for GitReference {
    type Error = DecodeError;

    fn try_from(row: GitReferenceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("GitReferenceRow", "name", row.name.as_deref(), text)?,
            path: non_empty(row.path.as_deref()),
            checkouts: non_empty(row.checkouts.as_deref()),
            commit_hash: non_empty(row.commit_hash.as_deref()),
            author: non_empty(row.author.as_deref()),
            message: non_empty(row.message.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Git repository operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct GitRepositories<'a> {
    /// Owning client.
    client: &'a Client,
}

impl<'a> GitRepositories<'a> {
    /// Binds the accessor to a client.
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
        }
    }

    /// Creates a Git repository clone.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn create(&self, ctx: &RequestContext, options: &CreateGitRepositoryOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Alters a Git repository clone.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn alter(&self, ctx: &RequestContext, options: &AlterGitRepositoryOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a Git repository clone.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation or driver failure.
    pub async fn drop(&self, ctx: &RequestContext, options: &DropGitRepositoryOptions) -> Result<(), SdkError> {
        self.client.exec(ctx, options).await
    }

    /// Drops a Git repository clone, treating a missing one as success.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for failures other than a missing repository.
    pub async fn drop_safely(&self, ctx: &RequestContext, id: &SchemaObjectIdentifier) -> Result<(), SdkError> {
        let options = DropGitRepositoryOptions {
            if_exists: false,
            name: id.clone(),
        };
        ignore_missing(self.drop(ctx, &options).await)
    }

    /// Lists Git repository clones.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show(
        &self,
        ctx: &RequestContext,
        options: &ShowGitRepositoryOptions,
    ) -> Result<Vec<GitRepository>, SdkError> {
        self.client.query_as::<_, GitRepositoryRow, GitRepository>(ctx, options).await
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
    ) -> Result<GitRepository, SdkError> {
        let options = ShowGitRepositoryOptions {
            like: Some(Like::new(id.name())),
            in_scope: Some(In::Schema(id.schema_id())),
        };
        let repositories = self.show(ctx, &options).await?;
        find_by_id(repositories, "git repository", id, |repository| repository.id() == *id)
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
    ) -> Result<GitRepository, SdkError> {
        missing_as_not_found(self.show_by_id(ctx, id).await, "git repository", id)
    }

    /// Describes a Git repository clone.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on driver or decoding failure.
    pub async fn describe(
        &self,
        ctx: &RequestContext,
        id: &SchemaObjectIdentifier,
    ) -> Result<GitRepository, SdkError> {
        let options = DescribeGitRepositoryOptions {
            name: id.clone(),
        };
        let row: GitRepositoryRow = self.client.query_one(ctx, &options).await?;
        Ok(GitRepository::try_from(row)?)
    }

    /// Lists the branches of a repository clone.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show_branches(
        &self,
        ctx: &RequestContext,
        repository: &SchemaObjectIdentifier,
        like: Option<Like>,
    ) -> Result<Vec<GitReference>, SdkError> {
        self.show_references(ctx, GitReferenceKind::Branches, repository, like).await
    }

    /// Lists the tags of a repository clone.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] on validation, driver, or decoding failure.
    pub async fn show_tags(
        &self,
        ctx: &RequestContext,
        repository: &SchemaObjectIdentifier,
        like: Option<Like>,
    ) -> Result<Vec<GitReference>, SdkError> {
        self.show_references(ctx, GitReferenceKind::Tags, repository, like).await
    }

    /// Lists branches or tags of a repository.
    async fn show_references(
        &self,
        ctx: &RequestContext,
        kind: GitReferenceKind,
        repository: &SchemaObjectIdentifier,
        like: Option<Like>,
    ) -> Result<Vec<GitReference>, SdkError> {
        let options = ShowGitReferenceOptions {
            kind,
            like,
            repository: repository.clone(),
        };
        self.client.query_as::<_, GitReferenceRow, GitReference>(ctx, &options).await
    }
}

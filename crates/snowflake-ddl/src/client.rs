// crates/snowflake-ddl/src/client.rs
// ============================================================================
// Module: Session Façade
// Description: Validate, render, dispatch, and decode on top of a driver.
// Purpose: Give every object grammar one execution path.
// Dependencies: serde, tracing, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! [`Client`] wraps a shared [`Driver`]. Every call validates the option
//! value, renders it, dispatches the text, and decodes the returned rows.
//! Validation failures never reach the driver. Request contexts are
//! forwarded verbatim. Only the operation name is logged; statement text
//! can carry credentials and is never logged.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::Driver;
use snowflake_ddl_core::DriverError;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::QueryIdSink;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::Row;
use snowflake_ddl_core::Statement;
use snowflake_ddl_core::decode::decode_row;
use snowflake_ddl_core::decode::decode_rows;
use snowflake_ddl_core::to_sql;

use crate::error::SdkError;
use crate::functions::ContextFunctions;
use crate::functions::SystemFunctions;
use crate::objects::accounts::Accounts;
use crate::objects::compute_pools::ComputePools;
use crate::objects::external_functions::ExternalFunctions;
use crate::objects::git_repositories::GitRepositories;
use crate::objects::grants::Grants;
use crate::objects::image_repositories::ImageRepositories;
use crate::objects::pipes::Pipes;
use crate::objects::programmatic_access_tokens::ProgrammaticAccessTokens;
use crate::objects::services::Services;
use crate::objects::tasks::Tasks;
use crate::objects::users::Users;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Session handle shared by every object accessor.
#[derive(Clone)]
pub struct Client {
    /// Driver executing rendered statements.
    driver: Arc<dyn Driver>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client over a driver.
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
        }
    }

    /// Returns the underlying driver.
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Executes a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] before dispatch when the options are
    /// invalid, or the driver's error verbatim.
    pub async fn exec<S: Statement>(&self, ctx: &RequestContext, statement: &S) -> Result<(), SdkError> {
        let sql = prepare(statement)?;
        self.driver.exec(ctx, &sql).await?;
        Ok(())
    }

    /// Executes a statement and returns its raw rows.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] or the driver's error.
    pub async fn query_rows<S: Statement>(
        &self,
        ctx: &RequestContext,
        statement: &S,
    ) -> Result<Vec<Row>, SdkError> {
        let sql = prepare(statement)?;
        Ok(self.driver.query(ctx, &sql).await?)
    }

    /// Executes a statement and decodes every row.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`], the driver's error, or
    /// [`SdkError::Decode`] when a row does not match `R`.
    pub async fn query<S: Statement, R: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        statement: &S,
    ) -> Result<Vec<R>, SdkError> {
        let rows = self.query_rows(ctx, statement).await?;
        Ok(decode_rows(&rows)?)
    }

    /// Executes a statement and decodes its first row.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`], the driver's error (including the
    /// no-rows error), or [`SdkError::Decode`].
    pub async fn query_one<S: Statement, R: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        statement: &S,
    ) -> Result<R, SdkError> {
        let sql = prepare(statement)?;
        let row = self.driver.query_one(ctx, &sql).await?;
        Ok(decode_row(&row)?)
    }

    /// Executes a statement, decodes rows as `R`, and lifts them into `T`.
    pub(crate) async fn query_as<S, R, T>(
        &self,
        ctx: &RequestContext,
        statement: &S,
    ) -> Result<Vec<T>, SdkError>
    where
        S: Statement,
        R: DeserializeOwned,
        T: TryFrom<R, Error = DecodeError>,
    {
        let rows: Vec<R> = self.query(ctx, statement).await?;
        let items = rows.into_iter().map(T::try_from).collect::<Result<Vec<T>, DecodeError>>()?;
        Ok(items)
    }

    /// Executes a statement whose payload is delivered through its query ID,
    /// then fetches the payload rows.
    pub(crate) async fn exec_for_results<S: Statement>(
        &self,
        ctx: &RequestContext,
        statement: &S,
    ) -> Result<Vec<Row>, SdkError> {
        let sql = prepare(statement)?;
        let sink = QueryIdSink::new();
        let exec_ctx = ctx.clone().with_query_id_sink(sink.clone());
        self.driver.exec(&exec_ctx, &sql).await?;
        let query_id = sink.get().ok_or_else(|| DriverError::new("driver did not report a query id"))?;
        Ok(self.driver.fetch_results(ctx, &query_id).await?)
    }

    // ------------------------------------------------------------------------
    // Object accessors
    // ------------------------------------------------------------------------

    /// Accounts.
    #[must_use]
    pub const fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    /// Snowpark Container Services compute pools.
    #[must_use]
    pub const fn compute_pools(&self) -> ComputePools<'_> {
        ComputePools::new(self)
    }

    /// Snowpark Container Services services and job services.
    #[must_use]
    pub const fn services(&self) -> Services<'_> {
        Services::new(self)
    }

    /// Git repository clones.
    #[must_use]
    pub const fn git_repositories(&self) -> GitRepositories<'_> {
        GitRepositories::new(self)
    }

    /// Container image repositories.
    #[must_use]
    pub const fn image_repositories(&self) -> ImageRepositories<'_> {
        ImageRepositories::new(self)
    }

    /// External functions.
    #[must_use]
    pub const fn external_functions(&self) -> ExternalFunctions<'_> {
        ExternalFunctions::new(self)
    }

    /// Programmatic access tokens.
    #[must_use]
    pub const fn programmatic_access_tokens(&self) -> ProgrammaticAccessTokens<'_> {
        ProgrammaticAccessTokens::new(self)
    }

    /// Grants, including orchestrated ownership transfers.
    #[must_use]
    pub const fn grants(&self) -> Grants<'_> {
        Grants::new(self)
    }

    /// Users.
    #[must_use]
    pub const fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// Pipes.
    #[must_use]
    pub const fn pipes(&self) -> Pipes<'_> {
        Pipes::new(self)
    }

    /// Tasks.
    #[must_use]
    pub const fn tasks(&self) -> Tasks<'_> {
        Tasks::new(self)
    }

    /// Context functions such as `CURRENT_ROLE()`.
    #[must_use]
    pub const fn context_functions(&self) -> ContextFunctions<'_> {
        ContextFunctions::new(self)
    }

    /// System functions such as `SYSTEM$PIPE_STATUS`.
    #[must_use]
    pub const fn system_functions(&self) -> SystemFunctions<'_> {
        SystemFunctions::new(self)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates and renders a statement.
fn prepare<S: Statement>(statement: &S) -> Result<String, SdkError> {
    statement.validate()?;
    let sql = to_sql(statement);
    tracing::debug!(operation = S::OPERATION, "dispatching statement");
    Ok(sql)
}

/// Returns the first item accepted by `matches`, or [`SdkError::NotFound`].
pub(crate) fn find_by_id<T, I: ObjectIdentifier + ?Sized>(
    items: Vec<T>,
    object: &'static str,
    id: &I,
    matches: impl Fn(&T) -> bool,
) -> Result<T, SdkError> {
    items.into_iter().find(|item| matches(item)).ok_or_else(|| SdkError::NotFound {
        object,
        id: id.fully_qualified_name(),
    })
}

/// Treats a missing-object failure of a drop as success.
pub(crate) fn ignore_missing(result: Result<(), SdkError>) -> Result<(), SdkError> {
    match result {
        Err(err) if err.indicates_missing_object() => Ok(()),
        other => other,
    }
}

/// Downgrades a driver missing-object failure to [`SdkError::NotFound`].
pub(crate) fn missing_as_not_found<T, I: ObjectIdentifier + ?Sized>(
    result: Result<T, SdkError>,
    object: &'static str,
    id: &I,
) -> Result<T, SdkError> {
    match result {
        Err(SdkError::Driver(err)) if err.indicates_missing_object() => Err(SdkError::NotFound {
            object,
            id: id.fully_qualified_name(),
        }),
        other => other,
    }
}

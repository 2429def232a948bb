// crates/snowflake-ddl/src/ownership/mod.rs
// ============================================================================
// Module: Ownership Transfer
// Description: Routing of GRANT OWNERSHIP requests to transfer orchestrators.
// Purpose: Keep running pipes and task graphs consistent across a transfer.
// Dependencies: snowflake-ddl-core, tracing
// ============================================================================

//! ## Overview
//! A plain `GRANT OWNERSHIP` on a running pipe or a task in a started graph
//! either fails or leaves the object stalled. Transfers of single pipes and
//! tasks, and bulk transfers of all pipes or tasks in a container, are
//! routed to an orchestrator that pauses, grants, and resumes when the
//! session can still operate the object afterwards. Every other securable
//! takes the direct path.
//! Invariants:
//! - Orchestrated failures carry the [`crate::error::TransferStep`] that
//!   failed and the object it failed on.
//! - Completed steps are never rolled back.
//! - Bulk transfers attempt every object and join the failures.

mod pipes;
mod tasks;

use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;
use snowflake_ddl_core::Statement;

use crate::client::Client;
use crate::error::SdkError;
use crate::objects::common::In;
use crate::objects::common::ObjectType;
use crate::objects::grants::BulkScope;
use crate::objects::grants::GrantOn;
use crate::objects::grants::GrantOwnershipOptions;
use crate::objects::grants::Grantee;
use crate::objects::grants::ObjectName;
use crate::objects::grants::OutboundPrivileges;

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Executes `GRANT OWNERSHIP`, orchestrating pipe and task transfers.
///
/// # Errors
///
/// Returns [`SdkError::Validation`] before any statement is issued,
/// [`SdkError::OwnershipTransfer`] for a failed orchestration step, or
/// [`SdkError::Joined`] for several failed objects of a bulk transfer.
pub(crate) async fn grant_ownership(
    client: &Client,
    ctx: &RequestContext,
    options: &GrantOwnershipOptions,
) -> Result<(), SdkError> {
    options.validate()?;
    match &options.on {
        GrantOn::Object {
            object_type: ObjectType::Pipe,
            name: ObjectName::Schema(id),
        } => pipes::transfer(client, ctx, id, options).await,
        GrantOn::Object {
            object_type: ObjectType::Task,
            name: ObjectName::Schema(id),
        } => tasks::transfer(client, ctx, id, options).await,
        GrantOn::All {
            object_type: ObjectType::Pipe,
            scope,
        } => pipes::transfer_all(client, ctx, scope, options).await,
        GrantOn::All {
            object_type: ObjectType::Task,
            scope,
        } => tasks::transfer_all(client, ctx, scope, options).await,
        _ => client.exec(ctx, options).await,
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Narrows a request to a single object of `object_type`.
fn single_object(
    options: &GrantOwnershipOptions,
    object_type: ObjectType,
    id: &SchemaObjectIdentifier,
) -> GrantOwnershipOptions {
    GrantOwnershipOptions {
        on: GrantOn::Object {
            object_type,
            name: ObjectName::Schema(id.clone()),
        },
        to: options.to.clone(),
        current_grants: options.current_grants,
    }
}

/// Listing scope matching a bulk grant container.
fn listing_scope(scope: &BulkScope) -> In {
    match scope {
        BulkScope::Database(id) => In::Database(id.clone()),
        BulkScope::Schema(id) => In::Schema(id.clone()),
    }
}

/// Returns true when existing grants are copied to the new owner.
fn copies_grants(options: &GrantOwnershipOptions) -> bool {
    options.current_grants == Some(OutboundPrivileges::Copy)
}

/// Returns the new owner when it is an account role.
fn new_owner_role(options: &GrantOwnershipOptions) -> Option<&str> {
    match &options.to {
        Grantee::Role(role) => Some(role.name()),
        Grantee::DatabaseRole(_) => None,
    }
}

/// Collapses per-object failures of a bulk transfer.
fn joined(errors: Vec<SdkError>) -> Result<(), SdkError> {
    SdkError::join(errors).map_or(Ok(()), Err)
}

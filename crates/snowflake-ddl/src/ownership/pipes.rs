// crates/snowflake-ddl/src/ownership/pipes.rs
// ============================================================================
// Module: Pipe Ownership Transfer
// Description: Pause, grant, and conditionally resume a pipe.
// Purpose: Transfer a running pipe without leaving it stalled.
// Dependencies: snowflake-ddl-core, tracing
// ============================================================================

//! ## Overview
//! A running pipe is paused before the grant because the service stops a
//! pipe whose owner changes while it runs. Afterwards the pipe is
//! force-resumed only when the grants were copied and the session role held
//! an explicit `OPERATE` grant that survives the transfer. In every other
//! case the pipe stays paused and a warning is logged.

use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;

use super::copies_grants;
use super::joined;
use super::listing_scope;
use super::single_object;
use crate::client::Client;
use crate::error::SdkError;
use crate::error::TransferStep;
use crate::objects::common::ObjectType;
use crate::objects::grants::BulkScope;
use crate::objects::grants::GrantOwnershipOptions;
use crate::objects::grants::ObjectName;
use crate::objects::grants::ShowGrantOptions;
use crate::objects::pipes::AlterPipeOptions;
use crate::objects::pipes::ShowPipeOptions;

/// Transfers ownership of one pipe.
pub(super) async fn transfer(
    client: &Client,
    ctx: &RequestContext,
    id: &SchemaObjectIdentifier,
    options: &GrantOwnershipOptions,
) -> Result<(), SdkError> {
    let object = id.fully_qualified_name();
    let current_role = client
        .context_functions()
        .current_role(ctx)
        .await
        .map_err(|err| err.at_step(TransferStep::ReadCurrentRole, &object))?;
    let role = current_role.name();
    let grants = client
        .grants()
        .show(ctx, &ShowGrantOptions::on(ObjectType::Pipe, ObjectName::Schema(id.clone())))
        .await
        .map_err(|err| err.at_step(TransferStep::ReadGrants, &object))?;

    let owns = grants.iter().any(|grant| grant.grants("OWNERSHIP", role));
    let explicit_operate = grants.iter().any(|grant| grant.grants("OPERATE", role));
    let can_operate = owns || explicit_operate;
    let can_monitor = owns || grants.iter().any(|grant| grant.grants("MONITOR", role));

    let mut paused = false;
    if can_operate && can_monitor {
        let status = client
            .system_functions()
            .pipe_status(ctx, id)
            .await
            .map_err(|err| err.at_step(TransferStep::ReadState, &object))?;
        if status.is_running() {
            tracing::debug!(pipe = %object, "pausing running pipe before ownership transfer");
            client
                .pipes()
                .alter(ctx, &AlterPipeOptions::set_paused(id.clone(), true))
                .await
                .map_err(|err| err.at_step(TransferStep::Pause, &object))?;
            paused = true;
        }
    } else {
        tracing::debug!(pipe = %object, role, "session role cannot operate the pipe; granting without pausing");
    }

    client
        .exec(ctx, &single_object(options, ObjectType::Pipe, id))
        .await
        .map_err(|err| err.at_step(TransferStep::Grant, &object))?;
    if !paused {
        return Ok(());
    }

    let keeps_operate = copies_grants(options) && explicit_operate;
    if keeps_operate {
        client
            .system_functions()
            .pipe_force_resume(ctx, id, true)
            .await
            .map_err(|err| err.at_step(TransferStep::Resume, &object))?;
    } else {
        tracing::warn!(
            pipe = %object,
            "pipe was paused for the ownership transfer and must be resumed by its new owner"
        );
    }
    Ok(())
}

/// Transfers ownership of every pipe in a database or schema.
pub(super) async fn transfer_all(
    client: &Client,
    ctx: &RequestContext,
    scope: &BulkScope,
    options: &GrantOwnershipOptions,
) -> Result<(), SdkError> {
    let listing = ShowPipeOptions {
        like: None,
        in_scope: Some(listing_scope(scope)),
    };
    let pipes = client
        .pipes()
        .show(ctx, &listing)
        .await
        .map_err(|err| err.at_step(TransferStep::Enumerate, scope.fully_qualified_name()))?;
    let mut errors = Vec::new();
    for pipe in &pipes {
        if let Err(err) = transfer(client, ctx, &pipe.id(), options).await {
            errors.push(err);
        }
    }
    joined(errors)
}

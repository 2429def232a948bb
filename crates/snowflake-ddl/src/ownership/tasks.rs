// crates/snowflake-ddl/src/ownership/tasks.rs
// ============================================================================
// Module: Task Ownership Transfer
// Description: Suspend the graph, grant, and conditionally resume.
// Purpose: Transfer a task without leaving its graph suspended needlessly.
// Dependencies: snowflake-ddl-core, tracing
// ============================================================================

//! ## Overview
//! A task can only change owner while its graph is suspended. The started
//! root tasks and the task itself are suspended first. After the grant they
//! are resumed only when the session can still run them: it holds
//! `EXECUTE TASK` on the account, can use the task's warehouse, and either
//! keeps the new owner role or had its grants copied.

use snowflake_ddl_core::AccountObjectIdentifier;
use snowflake_ddl_core::ObjectIdentifier;
use snowflake_ddl_core::RequestContext;
use snowflake_ddl_core::SchemaObjectIdentifier;

use super::copies_grants;
use super::joined;
use super::listing_scope;
use super::new_owner_role;
use super::single_object;
use crate::client::Client;
use crate::error::SdkError;
use crate::error::TransferStep;
use crate::objects::common::ObjectType;
use crate::objects::grants::BulkScope;
use crate::objects::grants::Grant;
use crate::objects::grants::GrantOwnershipOptions;
use crate::objects::grants::ShowGrantOptions;
use crate::objects::grants::ShowGrantsTarget;
use crate::objects::tasks::AlterTaskAction;
use crate::objects::tasks::AlterTaskOptions;
use crate::objects::tasks::ShowTaskOptions;

/// Returns true when `grants` give `role` usage of `warehouse`.
fn can_use_warehouse(grants: &[Grant], role: &str, warehouse: &AccountObjectIdentifier) -> bool {
    grants.iter().any(|grant| {
        grant.granted_on == Some(ObjectType::Warehouse)
            && grant.name.as_deref().is_some_and(|name| name.trim_matches('"') == warehouse.name())
            && (grant.grants("USAGE", role) || grant.grants("OWNERSHIP", role))
    })
}

/// Transfers ownership of one task.
pub(super) async fn transfer(
    client: &Client,
    ctx: &RequestContext,
    id: &SchemaObjectIdentifier,
    options: &GrantOwnershipOptions,
) -> Result<(), SdkError> {
    let object = id.fully_qualified_name();
    let context = client.context_functions();
    let current_role = context
        .current_role(ctx)
        .await
        .map_err(|err| err.at_step(TransferStep::ReadCurrentRole, &object))?;
    let available_roles = context
        .current_available_roles(ctx)
        .await
        .map_err(|err| err.at_step(TransferStep::ReadCurrentRole, &object))?;
    let role = current_role.name();

    let task = client
        .tasks()
        .show_by_id(ctx, id)
        .await
        .map_err(|err| err.at_step(TransferStep::ReadState, &object))?;
    let listing = ShowGrantOptions {
        target: Some(ShowGrantsTarget::ToRole(current_role.clone())),
    };
    let role_grants = client
        .grants()
        .show(ctx, &listing)
        .await
        .map_err(|err| err.at_step(TransferStep::ReadGrants, &object))?;
    let can_execute = role_grants.iter().any(|grant| grant.grants("EXECUTE TASK", role));
    let has_compute = task.warehouse.as_ref().is_none_or(|warehouse| can_use_warehouse(&role_grants, role, warehouse));

    let mut suspended = client
        .tasks()
        .suspend_root_tasks(ctx, id, id)
        .await
        .map_err(|err| err.at_step(TransferStep::SuspendRootTasks, &object))?;
    if task.is_started() {
        tracing::debug!(task = %object, "suspending task before ownership transfer");
        client
            .tasks()
            .alter(ctx, &AlterTaskOptions::new(id.clone(), AlterTaskAction::Suspend))
            .await
            .map_err(|err| err.at_step(TransferStep::Pause, &object))?;
        suspended.push(id.clone());
    }

    client
        .exec(ctx, &single_object(options, ObjectType::Task, id))
        .await
        .map_err(|err| err.at_step(TransferStep::Grant, &object))?;
    if suspended.is_empty() {
        return Ok(());
    }

    let keeps_owner = new_owner_role(options)
        .is_some_and(|owner| available_roles.iter().any(|available| available.name() == owner));
    if can_execute && has_compute && (copies_grants(options) || keeps_owner) {
        // Children resume before their roots.
        suspended.reverse();
        client
            .tasks()
            .resume_tasks(ctx, &suspended)
            .await
            .map_err(|err| err.at_step(TransferStep::Resume, &object))?;
    } else {
        let names = suspended.iter().map(ObjectIdentifier::fully_qualified_name).collect::<Vec<_>>().join(", ");
        tracing::warn!(
            task = %object,
            suspended = %names,
            "tasks were suspended for the ownership transfer and must be resumed manually"
        );
    }
    Ok(())
}

/// Transfers ownership of every task in a database or schema.
pub(super) async fn transfer_all(
    client: &Client,
    ctx: &RequestContext,
    scope: &BulkScope,
    options: &GrantOwnershipOptions,
) -> Result<(), SdkError> {
    let listing = ShowTaskOptions {
        in_scope: Some(listing_scope(scope)),
        ..ShowTaskOptions::default()
    };
    let tasks = client
        .tasks()
        .show(ctx, &listing)
        .await
        .map_err(|err| err.at_step(TransferStep::Enumerate, scope.fully_qualified_name()))?;
    let mut errors = Vec::new();
    for task in &tasks {
        if let Err(err) = transfer(client, ctx, &task.id(), options).await {
            errors.push(err);
        }
    }
    joined(errors)
}

// crates/snowflake-ddl/src/lib.rs
// ============================================================================
// Module: Snowflake DDL Client Library
// Description: Object grammars, session façade, and ownership transfers.
// Purpose: Manage Snowflake control-plane objects through typed options.
// Dependencies: snowflake-ddl-core, serde, tracing
// ============================================================================

//! ## Overview
//! [`Client`] validates, renders, and dispatches typed option values through
//! a [`Driver`], decoding result rows into domain values. Object accessors
//! such as [`Client::pipes`] group the operations of one object kind.
//! `GRANT OWNERSHIP` on pipes and tasks is orchestrated so running objects
//! are paused and resumed around the transfer.
//! Invariants:
//! - Invalid option values never reach the driver.
//! - Statement text is never logged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod functions;
pub mod objects;
mod ownership;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::Client;
pub use error::SdkError;
pub use error::TransferStep;
pub use functions::ContextFunctions;
pub use functions::PipeExecutionState;
pub use functions::PipeStatus;
pub use functions::SystemFunctions;
pub use snowflake_ddl_core::AccountIdentifier;
pub use snowflake_ddl_core::AccountObjectIdentifier;
pub use snowflake_ddl_core::DatabaseObjectIdentifier;
pub use snowflake_ddl_core::Driver;
pub use snowflake_ddl_core::DriverError;
pub use snowflake_ddl_core::ObjectIdentifier;
pub use snowflake_ddl_core::QueryIdSink;
pub use snowflake_ddl_core::RequestContext;
pub use snowflake_ddl_core::Row;
pub use snowflake_ddl_core::SchemaObjectIdentifier;
pub use snowflake_ddl_core::SchemaObjectIdentifierWithArguments;
pub use snowflake_ddl_core::Statement;
pub use snowflake_ddl_core::to_sql;

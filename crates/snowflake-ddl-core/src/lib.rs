// crates/snowflake-ddl-core/src/lib.rs
// ============================================================================
// Module: Snowflake DDL Core Library
// Description: Identifier model, SQL renderer, validation kernel, driver seam.
// Purpose: Provide the backend-agnostic kernel every object grammar builds on.
// Dependencies: async-trait, serde, serde_json, thiserror, time, tracing
// ============================================================================

//! ## Overview
//! The core crate turns strongly-typed option values into byte-exact SQL.
//! Object grammars implement [`sql::Render`] through a [`sql::SqlBuilder`]
//! and [`sql::Statement`] through a [`validation::Validator`]; the single
//! interpreter in [`sql::render_nodes`] prints the resulting token tree.
//! Invariants:
//! - Identifier part counts are encoded in the type.
//! - Rendering is pure and never fails; validation reports every violated
//!   rule at once.
//! - Drivers receive statement text and request context only.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod decode;
pub mod interfaces;
pub mod sql;
pub mod validation;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::AccountIdentifier;
pub use crate::core::AccountObjectIdentifier;
pub use crate::core::AuthenticationType;
pub use crate::core::DatabaseObjectIdentifier;
pub use crate::core::DriverLogLevel;
pub use crate::core::ObjectIdentifier;
pub use crate::core::ParseError;
pub use crate::core::SchemaObjectIdentifier;
pub use crate::core::SchemaObjectIdentifierWithArguments;
pub use crate::core::ScopedIdentifier;
pub use decode::DecodeError;
pub use interfaces::Driver;
pub use interfaces::DriverError;
pub use interfaces::QueryIdSink;
pub use interfaces::RequestContext;
pub use interfaces::Row;
pub use sql::Render;
pub use sql::SqlBuilder;
pub use sql::Statement;
pub use sql::to_sql;
pub use validation::Rule;
pub use validation::ValidationErrors;
pub use validation::ValidationFailure;
pub use validation::Validator;

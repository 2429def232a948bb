// crates/snowflake-ddl-core/src/sql/mod.rs
// ============================================================================
// Module: SQL Rendering
// Description: Render/Statement contracts over the token-tree interpreter.
// Purpose: Turn validated option values into byte-exact statement text.
// Dependencies: crate::validation
// ============================================================================

//! ## Overview
//! Every option type implements [`Render`] by declaring its fields through a
//! [`SqlBuilder`]; operations additionally implement [`Statement`], pairing
//! the render with a stable operation name and a `validate()` contract.
//! [`to_sql`] is pure and never fails: callers are expected to validate first,
//! which the session façade enforces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod builder;
pub mod node;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::Flag;
pub use builder::ListOptions;
pub use builder::SqlBuilder;
pub use node::Encoding;
pub use node::Node;
pub use node::Quotes;
pub use node::Separator;
pub use node::render_node;
pub use node::render_nodes;
pub use value::SqlValue;

use crate::validation::ValidationErrors;

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Option structure that can describe itself as statement tokens.
pub trait Render {
    /// Pushes this value's tokens in declared field order.
    fn render(&self, sql: &mut SqlBuilder);
}

/// A complete operation: renderable, named, and validated.
pub trait Statement: Render {
    /// Stable operation name used as the prefix of validation failures.
    const OPERATION: &'static str;

    /// Checks every grammar rule of the operation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violated rule in
    /// declaration order.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Renders an option value into a single-line statement.
#[must_use]
pub fn to_sql<R: Render + ?Sized>(value: &R) -> String {
    let mut builder = SqlBuilder::new();
    value.render(&mut builder);
    render_nodes(builder.nodes())
}

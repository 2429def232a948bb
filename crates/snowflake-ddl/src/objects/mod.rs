// crates/snowflake-ddl/src/objects/mod.rs
// ============================================================================
// Module: Object Grammars
// Description: Per-object option types, row decoders, and accessors.
// Purpose: Group the DDL grammars supported by the client.
// Dependencies: snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Each module follows one shape: `<Verb><Object>Options` values that
//! render and validate themselves, a raw row type with a lenient domain
//! conversion, and an accessor bound to [`crate::Client`].

pub mod accounts;
pub mod common;
pub mod compute_pools;
pub mod external_functions;
pub mod git_repositories;
pub mod grants;
pub mod image_repositories;
pub mod pipes;
pub mod programmatic_access_tokens;
pub mod services;
pub mod tasks;
pub mod users;

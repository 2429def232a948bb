// crates/snowflake-ddl-core/src/core/mod.rs
// ============================================================================
// Module: Core Model
// Description: Identifiers, closed enumerations, and parse errors.
// Purpose: Group the backend-agnostic value types of the library.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Value types shared by every object grammar: qualified identifiers, the
//! enumeration macro with driver-level enumerations, and parse errors.

pub mod enums;
pub mod errors;
pub mod identifiers;

pub use enums::AuthenticationType;
pub use enums::DriverLogLevel;
pub use errors::ParseError;
pub use errors::PartDefect;
pub use identifiers::AccountIdentifier;
pub use identifiers::AccountObjectIdentifier;
pub use identifiers::DatabaseObjectIdentifier;
pub use identifiers::MAX_IDENTIFIER_PART_LENGTH;
pub use identifiers::ObjectIdentifier;
pub use identifiers::SchemaObjectIdentifier;
pub use identifiers::SchemaObjectIdentifierWithArguments;
pub use identifiers::ScopedIdentifier;
pub use identifiers::parse_identifier_list;
pub use identifiers::parse_identifier_parts;
pub use identifiers::quote_part;
pub use identifiers::strip_quotes;

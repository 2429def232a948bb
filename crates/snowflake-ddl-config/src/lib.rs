// crates/snowflake-ddl-config/src/lib.rs
// ============================================================================
// Module: Snowflake DDL Config Library
// Description: Connection profile loading and driver configuration.
// Purpose: Provide strict, value-redacting configuration input.
// Dependencies: base64, serde, toml, url, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! Profiles are read from a TOML file selected by an explicit path, the
//! [`CONFIG_ENV_VAR`] environment variable, or `$HOME/.snowflake/config.toml`.
//! [`load_profiles`] returns every profile by name; [`DriverConfig`] turns a
//! profile into typed driver settings.
//! Invariants:
//! - Unknown keys and type mismatches fail closed with field-level errors.
//! - Errors and `Debug` output never contain credential values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod driver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigBool;
pub use config::ConfigError;
pub use config::DEFAULT_PROFILE;
pub use config::ProfileConfig;
pub use config::Profiles;
pub use config::Secret;
pub use config::load_profile;
pub use config::load_profiles;
pub use config::parse_profiles;
pub use driver::DriverConfig;
pub use driver::DriverConfigError;
pub use driver::PrivateKey;
pub use driver::PrivateKeyError;

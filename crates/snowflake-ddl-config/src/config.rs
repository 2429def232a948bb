// crates/snowflake-ddl-config/src/config.rs
// ============================================================================
// Module: Profile Configuration
// Description: Profile-keyed TOML configuration loading and validation.
// Purpose: Load connection profiles without ever echoing configured values.
// Dependencies: serde, toml, thiserror, tracing
// ============================================================================

//! ## Overview
//! The configuration file is a TOML document whose top-level tables are
//! named profiles. Loading is strict and happens in two passes: the file is
//! first parsed into a generic table and every key is checked against the
//! profile schema, then the checked table is deserialized into
//! [`ProfileConfig`]. Every error is produced by this module and carries
//! only profile names, field names, expected types, and source positions.
//! Security posture: the file holds credentials; no error or `Debug` output
//! contains a configured value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use thiserror::Error;
use toml::Table;
use toml::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the configuration file.
pub const CONFIG_ENV_VAR: &str = "SNOWFLAKE_CONFIG_PATH";
/// Profile used when the caller does not name one.
pub const DEFAULT_PROFILE: &str = "default";
/// Directory under the home directory holding the default file.
const DEFAULT_CONFIG_DIR: &str = ".snowflake";
/// Default configuration filename.
const DEFAULT_CONFIG_NAME: &str = "config.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Secrets
// ============================================================================

/// Credential value whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a credential value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying credential.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

// ============================================================================
// SECTION: Tri-State Booleans
// ============================================================================

/// Boolean that distinguishes "not configured" from an explicit value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConfigBool {
    /// The key is absent; the driver default applies.
    #[default]
    NotSet,
    /// Explicitly enabled.
    True,
    /// Explicitly disabled.
    False,
}

impl ConfigBool {
    /// Returns the explicit value, if any.
    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::NotSet => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }

    /// Returns the explicit value or `default`.
    #[must_use]
    pub const fn unwrap_or(self, default: bool) -> bool {
        match self.value() {
            Some(value) => value,
            None => default,
        }
    }
}

impl From<bool> for ConfigBool {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for ConfigBool {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::NotSet, Self::from)
    }
}

impl<'de> Deserialize<'de> for ConfigBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SECTION: Profile Schema
// ============================================================================

/// Value type a profile key must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// TOML string.
    String,
    /// TOML integer.
    Integer,
    /// TOML boolean.
    Boolean,
    /// TOML table whose values are strings.
    StringTable,
}

impl FieldKind {
    /// Human-readable expected type.
    const fn expected(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::StringTable => "table of strings",
        }
    }

    /// Returns true when `value` has this kind.
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Boolean, Value::Boolean(_)) => true,
            (Self::StringTable, Value::Table(table)) => {
                table.values().all(|entry| matches!(entry, Value::String(_)))
            }
            _ => false,
        }
    }
}

/// Every key a profile may carry, with its value type.
const PROFILE_FIELDS: &[(&str, FieldKind)] = &[
    ("account_name", FieldKind::String),
    ("organization_name", FieldKind::String),
    ("user", FieldKind::String),
    ("username", FieldKind::String),
    ("password", FieldKind::String),
    ("host", FieldKind::String),
    ("warehouse", FieldKind::String),
    ("role", FieldKind::String),
    ("params", FieldKind::StringTable),
    ("client_ip", FieldKind::String),
    ("protocol", FieldKind::String),
    ("passcode", FieldKind::String),
    ("port", FieldKind::Integer),
    ("passcode_in_password", FieldKind::Boolean),
    ("okta_url", FieldKind::String),
    ("client_timeout", FieldKind::Integer),
    ("jwt_client_timeout", FieldKind::Integer),
    ("login_timeout", FieldKind::Integer),
    ("request_timeout", FieldKind::Integer),
    ("jwt_expire_timeout", FieldKind::Integer),
    ("external_browser_timeout", FieldKind::Integer),
    ("max_retry_count", FieldKind::Integer),
    ("authenticator", FieldKind::String),
    ("insecure_mode", FieldKind::Boolean),
    ("ocsp_fail_open", FieldKind::Boolean),
    ("token", FieldKind::String),
    ("keep_session_alive", FieldKind::Boolean),
    ("private_key", FieldKind::String),
    ("private_key_passphrase", FieldKind::String),
    ("disable_telemetry", FieldKind::Boolean),
    ("validate_default_parameters", FieldKind::Boolean),
    ("client_request_mfa_token", FieldKind::Boolean),
    ("client_store_temporary_credential", FieldKind::Boolean),
    ("driver_tracing", FieldKind::String),
    ("tmp_directory_path", FieldKind::String),
    ("disable_query_context_cache", FieldKind::Boolean),
    ("include_retry_reason", FieldKind::Boolean),
    ("disable_console_login", FieldKind::Boolean),
];

// ============================================================================
// SECTION: Profile Configuration
// ============================================================================

/// One connection profile as written in the file. Values are not yet
/// interpreted; see [`crate::DriverConfig::from_profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Account name within the organization.
    pub account_name: Option<String>,
    /// Organization name.
    pub organization_name: Option<String>,
    /// Login name.
    pub user: Option<String>,
    /// Login name alias; `user` wins when both are set.
    pub username: Option<String>,
    /// Password.
    pub password: Option<Secret>,
    /// Endpoint host.
    pub host: Option<String>,
    /// Default warehouse.
    pub warehouse: Option<String>,
    /// Default role.
    pub role: Option<String>,
    /// Session parameters.
    pub params: Option<BTreeMap<String, String>>,
    /// Client IP address.
    pub client_ip: Option<String>,
    /// Endpoint protocol (`http` or `https`).
    pub protocol: Option<String>,
    /// MFA passcode.
    pub passcode: Option<Secret>,
    /// Endpoint port.
    pub port: Option<i64>,
    /// Whether the passcode is appended to the password.
    pub passcode_in_password: ConfigBool,
    /// Okta endpoint for native SSO.
    pub okta_url: Option<String>,
    /// Client timeout in seconds.
    pub client_timeout: Option<i64>,
    /// JWT client timeout in seconds.
    pub jwt_client_timeout: Option<i64>,
    /// Login timeout in seconds.
    pub login_timeout: Option<i64>,
    /// Request timeout in seconds.
    pub request_timeout: Option<i64>,
    /// JWT expiry in seconds.
    pub jwt_expire_timeout: Option<i64>,
    /// External browser timeout in seconds.
    pub external_browser_timeout: Option<i64>,
    /// Maximum retry count.
    pub max_retry_count: Option<i64>,
    /// Authenticator name.
    pub authenticator: Option<String>,
    /// Disables certificate revocation checks.
    pub insecure_mode: ConfigBool,
    /// Fail-open policy for revocation checks.
    pub ocsp_fail_open: ConfigBool,
    /// OAuth or programmatic access token.
    pub token: Option<Secret>,
    /// Keeps the session alive between requests.
    pub keep_session_alive: ConfigBool,
    /// PEM-encoded private key.
    pub private_key: Option<Secret>,
    /// Passphrase of an encrypted private key.
    pub private_key_passphrase: Option<Secret>,
    /// Disables driver telemetry.
    pub disable_telemetry: ConfigBool,
    /// Validates default database/schema/warehouse on connect.
    pub validate_default_parameters: ConfigBool,
    /// Caches MFA tokens.
    pub client_request_mfa_token: ConfigBool,
    /// Caches SSO credentials.
    pub client_store_temporary_credential: ConfigBool,
    /// Driver log level name.
    pub driver_tracing: Option<String>,
    /// Directory for temporary files.
    pub tmp_directory_path: Option<String>,
    /// Disables the query context cache.
    pub disable_query_context_cache: ConfigBool,
    /// Includes retry reasons in retried requests.
    pub include_retry_reason: ConfigBool,
    /// Disables console login.
    pub disable_console_login: ConfigBool,
}

/// Every profile in a configuration file, keyed by name.
pub type Profiles = BTreeMap<String, ProfileConfig>;

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads every profile from the resolved configuration file.
///
/// Resolution order: `path`, then [`CONFIG_ENV_VAR`], then
/// `$HOME/.snowflake/config.toml`.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or is invalid.
pub fn load_profiles(path: Option<&Path>) -> Result<Profiles, ConfigError> {
    let resolved = resolve_path(path)?;
    validate_path(&resolved)?;
    tracing::debug!(path = %resolved.display(), "loading configuration profiles");
    let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.kind().to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    parse_profiles(content)
}

/// Loads a single named profile.
///
/// # Errors
///
/// Returns [`ConfigError::ProfileNotFound`] when the profile is absent, or
/// any error of [`load_profiles`].
pub fn load_profile(name: &str, path: Option<&Path>) -> Result<ProfileConfig, ConfigError> {
    let mut profiles = load_profiles(path)?;
    profiles.remove(name).ok_or_else(|| ConfigError::ProfileNotFound {
        profile: name.to_string(),
    })
}

/// Parses configuration text into profiles.
///
/// # Errors
///
/// Returns [`ConfigError`] on syntax errors, unknown keys, or type
/// mismatches. Messages never include configured values.
pub fn parse_profiles(content: &str) -> Result<Profiles, ConfigError> {
    let table: Table = toml::from_str(content).map_err(|err| {
        let offset = err.span().map_or(0, |span| span.start);
        let (line, column) = line_and_column(content, offset);
        ConfigError::Syntax {
            line,
            column,
        }
    })?;
    let mut profiles = Profiles::new();
    for (name, value) in table {
        let Value::Table(fields) = value else {
            return Err(ConfigError::InvalidProfile {
                profile: name,
            });
        };
        check_profile(&name, &fields)?;
        let profile: ProfileConfig = Value::Table(fields)
            .try_into()
            .map_err(|_| ConfigError::Invalid(format!("profile {name} could not be decoded")))?;
        profiles.insert(name, profile);
    }
    Ok(profiles)
}

/// Checks every key of a profile against the schema.
fn check_profile(profile: &str, fields: &Table) -> Result<(), ConfigError> {
    for (field, value) in fields {
        let Some((_, kind)) = PROFILE_FIELDS.iter().find(|(name, _)| name == field) else {
            return Err(ConfigError::UnknownField {
                profile: profile.to_string(),
                field: field.clone(),
            });
        };
        if !kind.accepts(value) {
            return Err(ConfigError::InvalidType {
                profile: profile.to_string(),
                field: field.clone(),
                expected: kind.expected(),
            });
        }
    }
    Ok(())
}

/// Converts a byte offset into a 1-based line and column.
fn line_and_column(content: &str, offset: usize) -> (usize, usize) {
    let prefix = content.get(.. offset).unwrap_or(content);
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().map_or(0, |tail| tail.chars().count()) + 1;
    (line, column)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors. No variant carries a configured value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// The file is not valid TOML.
    #[error("config syntax error at line {line}, column {column}")]
    Syntax {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
    },
    /// A top-level entry is not a table.
    #[error("config profile {profile} must be a table")]
    InvalidProfile {
        /// Profile name.
        profile: String,
    },
    /// A profile carries a key outside the schema.
    #[error("config profile {profile}: unknown field {field}")]
    UnknownField {
        /// Profile name.
        profile: String,
        /// Offending key.
        field: String,
    },
    /// A profile key has the wrong value type.
    #[error("config profile {profile}: field {field} must be of type {expected}")]
    InvalidType {
        /// Profile name.
        profile: String,
        /// Offending key.
        field: String,
        /// Expected value type.
        expected: &'static str,
    },
    /// The requested profile is absent.
    #[error("config profile {profile} not found")]
    ProfileNotFound {
        /// Requested profile name.
        profile: String,
    },
    /// Invalid configuration data or path.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Resolves the config path from the argument, environment, or home.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    let home = env::var_os("HOME")
        .ok_or_else(|| ConfigError::Invalid("home directory is not set".to_string()))?;
    Ok(PathBuf::from(home).join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::use_debug, reason = "Redaction is asserted through Debug output.")]

    use super::*;

    #[test]
    fn line_and_column_are_one_based() {
        assert_eq!(line_and_column("a\nbc\nd", 4), (2, 3));
        assert_eq!(line_and_column("abc", 0), (1, 1));
    }

    #[test]
    fn secret_debug_is_redacted() {
        assert_eq!(format!("{:?}", Secret::new("hunter2")), "***");
    }
}

// crates/snowflake-ddl-config/src/driver.rs
// ============================================================================
// Module: Driver Configuration
// Description: Materialization of a driver configuration from a profile.
// Purpose: Interpret profile values into typed connection settings.
// Dependencies: base64, url, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! [`DriverConfig::from_profile`] turns the raw strings and integers of a
//! [`ProfileConfig`] into typed settings: enumerations are parsed, timeouts
//! become [`Duration`]s, the account locator is derived from the
//! organization and account names, and a PEM private key is unwrapped into
//! DER bytes. Errors name fields only; key material and passphrases are
//! never echoed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use snowflake_ddl_core::AuthenticationType;
use snowflake_ddl_core::DriverLogLevel;
use thiserror::Error;
use url::Url;

use crate::config::ConfigBool;
use crate::config::ConfigError;
use crate::config::DEFAULT_PROFILE;
use crate::config::ProfileConfig;
use crate::config::Secret;
use crate::config::load_profile;

// ============================================================================
// SECTION: Private Keys
// ============================================================================

/// PEM label of an unencrypted PKCS#8 key.
const PEM_PRIVATE_KEY: &str = "PRIVATE KEY";
/// PEM label of an encrypted PKCS#8 key.
const PEM_ENCRYPTED_PRIVATE_KEY: &str = "ENCRYPTED PRIVATE KEY";

/// PKCS#8 private key unwrapped from its PEM armor.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    /// DER-encoded key bytes.
    der: Vec<u8>,
    /// Passphrase for encrypted keys.
    passphrase: Option<Secret>,
}

impl PrivateKey {
    /// Parses a PEM-encoded PKCS#8 key.
    ///
    /// # Errors
    ///
    /// Returns [`PrivateKeyError`] when the armor or body is malformed, or
    /// when an encrypted key has no passphrase.
    pub fn from_pem(pem: &str, passphrase: Option<Secret>) -> Result<Self, PrivateKeyError> {
        let (label, body) = pem_body(pem)?;
        let encrypted = match label {
            PEM_PRIVATE_KEY => false,
            PEM_ENCRYPTED_PRIVATE_KEY => true,
            _ => return Err(PrivateKeyError::UnsupportedLabel),
        };
        if encrypted && passphrase.is_none() {
            return Err(PrivateKeyError::MissingPassphrase);
        }
        let der = STANDARD.decode(body).map_err(|_| PrivateKeyError::InvalidBase64)?;
        if der.is_empty() {
            return Err(PrivateKeyError::InvalidBase64);
        }
        Ok(Self {
            der,
            passphrase: if encrypted { passphrase } else { None },
        })
    }

    /// Returns the DER-encoded key.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Returns true when the key must be decrypted with a passphrase.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Returns the passphrase of an encrypted key.
    #[must_use]
    pub const fn passphrase(&self) -> Option<&Secret> {
        self.passphrase.as_ref()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("der", &"***")
            .field("encrypted", &self.is_encrypted())
            .finish()
    }
}

/// Extracts the label and joined base64 body of a single PEM block.
fn pem_body(pem: &str) -> Result<(&str, String), PrivateKeyError> {
    let mut lines = pem.lines().map(str::trim).filter(|line| !line.is_empty());
    let header = lines.next().ok_or(PrivateKeyError::MissingArmor)?;
    let label = header
        .strip_prefix("-----BEGIN ")
        .and_then(|rest| rest.strip_suffix("-----"))
        .ok_or(PrivateKeyError::MissingArmor)?;
    let footer = format!("-----END {label}-----");
    let mut body = String::new();
    for line in lines {
        if line == footer {
            return Ok((label, body));
        }
        body.push_str(line);
    }
    Err(PrivateKeyError::MissingArmor)
}

/// Private-key parsing errors. No variant carries key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrivateKeyError {
    /// The value is not a single PEM block.
    #[error("private key is not a PEM block")]
    MissingArmor,
    /// The PEM label is not a PKCS#8 key.
    #[error("private key must be PKCS#8 (PRIVATE KEY or ENCRYPTED PRIVATE KEY)")]
    UnsupportedLabel,
    /// The PEM body is not valid base64.
    #[error("private key body is not valid base64")]
    InvalidBase64,
    /// An encrypted key was supplied without `private_key_passphrase`.
    #[error("encrypted private key requires private_key_passphrase")]
    MissingPassphrase,
}

// ============================================================================
// SECTION: Driver Configuration
// ============================================================================

/// Typed connection settings consumed by a driver implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverConfig {
    /// Account locator (`organization-account`).
    pub account: Option<String>,
    /// Login name.
    pub user: Option<String>,
    /// Password.
    pub password: Option<Secret>,
    /// Endpoint host.
    pub host: Option<String>,
    /// Endpoint port.
    pub port: Option<u16>,
    /// Endpoint protocol.
    pub protocol: Option<String>,
    /// Default warehouse.
    pub warehouse: Option<String>,
    /// Default role.
    pub role: Option<String>,
    /// Session parameters.
    pub params: BTreeMap<String, String>,
    /// Client IP address.
    pub client_ip: Option<IpAddr>,
    /// MFA passcode.
    pub passcode: Option<Secret>,
    /// Whether the passcode is appended to the password.
    pub passcode_in_password: ConfigBool,
    /// Okta endpoint.
    pub okta_url: Option<Url>,
    /// Client timeout.
    pub client_timeout: Option<Duration>,
    /// JWT client timeout.
    pub jwt_client_timeout: Option<Duration>,
    /// Login timeout.
    pub login_timeout: Option<Duration>,
    /// Request timeout.
    pub request_timeout: Option<Duration>,
    /// JWT expiry.
    pub jwt_expire_timeout: Option<Duration>,
    /// External browser timeout.
    pub external_browser_timeout: Option<Duration>,
    /// Maximum retry count.
    pub max_retry_count: Option<u32>,
    /// Authenticator.
    pub authenticator: Option<AuthenticationType>,
    /// Disables revocation checks.
    pub insecure_mode: ConfigBool,
    /// Fail-open policy for revocation checks.
    pub ocsp_fail_open: ConfigBool,
    /// OAuth or programmatic access token.
    pub token: Option<Secret>,
    /// Keeps the session alive.
    pub keep_session_alive: ConfigBool,
    /// Key-pair authentication key.
    pub private_key: Option<PrivateKey>,
    /// Disables telemetry.
    pub disable_telemetry: ConfigBool,
    /// Validates default parameters on connect.
    pub validate_default_parameters: ConfigBool,
    /// Caches MFA tokens.
    pub client_request_mfa_token: ConfigBool,
    /// Caches SSO credentials.
    pub client_store_temporary_credential: ConfigBool,
    /// Driver log level.
    pub driver_tracing: Option<DriverLogLevel>,
    /// Directory for temporary files.
    pub tmp_directory_path: Option<PathBuf>,
    /// Disables the query context cache.
    pub disable_query_context_cache: ConfigBool,
    /// Includes retry reasons.
    pub include_retry_reason: ConfigBool,
    /// Disables console login.
    pub disable_console_login: ConfigBool,
}

impl DriverConfig {
    /// Materializes a driver configuration from a profile.
    ///
    /// # Errors
    ///
    /// Returns [`DriverConfigError`] naming the first field that cannot be
    /// interpreted.
    pub fn from_profile(profile: &ProfileConfig) -> Result<Self, DriverConfigError> {
        let account = match (&profile.organization_name, &profile.account_name) {
            (Some(organization), Some(account)) => Some(format!("{organization}-{account}")),
            (None, Some(account)) => Some(account.clone()),
            (Some(_), None) => {
                return Err(DriverConfigError::Incomplete {
                    field: "account_name",
                    requires: "organization_name",
                });
            }
            (None, None) => None,
        };
        let port = profile
            .port
            .map(|port| u16::try_from(port).map_err(|_| out_of_range("port")))
            .transpose()?;
        let client_ip = profile
            .client_ip
            .as_deref()
            .map(|ip| ip.parse::<IpAddr>().map_err(|_| invalid("client_ip", "IP address")))
            .transpose()?;
        let okta_url = profile
            .okta_url
            .as_deref()
            .map(|url| Url::parse(url).map_err(|_| invalid("okta_url", "URL")))
            .transpose()?;
        let authenticator = profile
            .authenticator
            .as_deref()
            .map(|name| {
                AuthenticationType::parse(name)
                    .map_err(|_| invalid("authenticator", "authentication type"))
            })
            .transpose()?;
        let driver_tracing = profile
            .driver_tracing
            .as_deref()
            .map(|name| {
                DriverLogLevel::parse(name).map_err(|_| invalid("driver_tracing", "log level"))
            })
            .transpose()?;
        let max_retry_count = profile
            .max_retry_count
            .map(|count| u32::try_from(count).map_err(|_| out_of_range("max_retry_count")))
            .transpose()?;
        let private_key = profile
            .private_key
            .as_ref()
            .map(|pem| {
                PrivateKey::from_pem(pem.expose(), profile.private_key_passphrase.clone())
                    .map_err(DriverConfigError::PrivateKey)
            })
            .transpose()?;
        Ok(Self {
            account,
            user: profile.user.clone().or_else(|| profile.username.clone()),
            password: profile.password.clone(),
            host: profile.host.clone(),
            port,
            protocol: profile.protocol.clone(),
            warehouse: profile.warehouse.clone(),
            role: profile.role.clone(),
            params: profile.params.clone().unwrap_or_default(),
            client_ip,
            passcode: profile.passcode.clone(),
            passcode_in_password: profile.passcode_in_password,
            okta_url,
            client_timeout: seconds("client_timeout", profile.client_timeout)?,
            jwt_client_timeout: seconds("jwt_client_timeout", profile.jwt_client_timeout)?,
            login_timeout: seconds("login_timeout", profile.login_timeout)?,
            request_timeout: seconds("request_timeout", profile.request_timeout)?,
            jwt_expire_timeout: seconds("jwt_expire_timeout", profile.jwt_expire_timeout)?,
            external_browser_timeout: seconds(
                "external_browser_timeout",
                profile.external_browser_timeout,
            )?,
            max_retry_count,
            authenticator,
            insecure_mode: profile.insecure_mode,
            ocsp_fail_open: profile.ocsp_fail_open,
            token: profile.token.clone(),
            keep_session_alive: profile.keep_session_alive,
            private_key,
            disable_telemetry: profile.disable_telemetry,
            validate_default_parameters: profile.validate_default_parameters,
            client_request_mfa_token: profile.client_request_mfa_token,
            client_store_temporary_credential: profile.client_store_temporary_credential,
            driver_tracing,
            tmp_directory_path: profile.tmp_directory_path.as_ref().map(PathBuf::from),
            disable_query_context_cache: profile.disable_query_context_cache,
            include_retry_reason: profile.include_retry_reason,
            disable_console_login: profile.disable_console_login,
        })
    }

    /// Loads a named profile (or `default`) and materializes it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverConfigError`] when loading or interpretation fails.
    pub fn load(profile: Option<&str>, path: Option<&Path>) -> Result<Self, DriverConfigError> {
        let profile = load_profile(profile.unwrap_or(DEFAULT_PROFILE), path)?;
        Self::from_profile(&profile)
    }
}

/// Converts a second count into a duration.
fn seconds(field: &'static str, value: Option<i64>) -> Result<Option<Duration>, DriverConfigError> {
    value
        .map(|value| {
            u64::try_from(value).map(Duration::from_secs).map_err(|_| out_of_range(field))
        })
        .transpose()
}

/// Builds an out-of-range error.
const fn out_of_range(field: &'static str) -> DriverConfigError {
    DriverConfigError::OutOfRange {
        field,
    }
}

/// Builds an invalid-value error.
const fn invalid(field: &'static str, expected: &'static str) -> DriverConfigError {
    DriverConfigError::InvalidValue {
        field,
        expected,
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Driver configuration errors. No variant carries a configured value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverConfigError {
    /// Loading the profile failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A field could not be interpreted.
    #[error("field {field} must be a valid {expected}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Expected interpretation.
        expected: &'static str,
    },
    /// A numeric field is outside its allowed range.
    #[error("field {field} is out of range")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
    },
    /// A field requires another field to be set.
    #[error("field {requires} requires {field}")]
    Incomplete {
        /// Missing field.
        field: &'static str,
        /// Field that was set.
        requires: &'static str,
    },
    /// The private key could not be parsed.
    #[error("field private_key: {0}")]
    PrivateKey(PrivateKeyError),
}

// crates/snowflake-ddl-core/src/core/enums.rs
// ============================================================================
// Module: Closed Enumerations
// Description: Declarative macro and shared string enumerations.
// Purpose: Give every closed set of SQL constants one parse/render contract.
// Dependencies: serde, crate::sql
// ============================================================================

//! ## Overview
//! [`sql_enum!`](crate::sql_enum) declares an enumeration of SQL string
//! constants with `as_str`, `Display`, a case-insensitive `FromStr` that
//! rejects unknown inputs, an `ALL` table, string serde, and a
//! [`SqlValue`](crate::sql::SqlValue) impl so variants render verbatim.
//! Driver-facing enumerations used by more than one crate live here; object
//! specific ones are declared next to their grammar.

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Declares a closed enumeration of SQL string constants.
///
/// ```
/// snowflake_ddl_core::sql_enum! {
///     /// Example size.
///     pub enum Size: "size" {
///         /// Small.
///         Small => "SMALL",
///         /// Large.
///         Large => "LARGE",
///     }
/// }
/// assert_eq!("small".parse::<Size>().ok(), Some(Size::Small));
/// ```
#[macro_export]
macro_rules! sql_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the canonical SQL spelling.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Parses a value case-insensitively.
            ///
            /// # Errors
            ///
            /// Returns a parse error for unknown inputs.
            pub fn parse(value: &str) -> ::std::result::Result<Self, $crate::ParseError> {
                value.parse()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::ParseError;

            fn from_str(value: &str) -> ::std::result::Result<Self, Self::Err> {
                let trimmed = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| $crate::ParseError::UnknownVariant {
                        kind: $kind,
                        value: trimmed.to_string(),
                    })
            }
        }

        impl $crate::sql::SqlValue for $name {
            fn to_sql(&self) -> ::std::string::String {
                self.as_str().to_string()
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                raw.parse().map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

// ============================================================================
// SECTION: Driver Enumerations
// ============================================================================

sql_enum! {
    /// Authenticator used by the driver to establish a session.
    pub enum AuthenticationType: "authentication type" {
        /// Username and password.
        Snowflake => "SNOWFLAKE",
        /// OAuth access token.
        OAuth => "OAUTH",
        /// Browser-based SSO.
        ExternalBrowser => "EXTERNALBROWSER",
        /// Native Okta SSO.
        Okta => "OKTA",
        /// Key-pair JWT.
        Jwt => "SNOWFLAKE_JWT",
        /// Token accessor callback.
        TokenAccessor => "TOKENACCESSOR",
        /// Username, password, and MFA.
        UsernamePasswordMfa => "USERNAME_PASSWORD_MFA",
        /// Programmatic access token.
        ProgrammaticAccessToken => "PROGRAMMATIC_ACCESS_TOKEN",
    }
}

sql_enum! {
    /// Driver log verbosity.
    pub enum DriverLogLevel: "driver log level" {
        /// Trace.
        Trace => "trace",
        /// Debug.
        Debug => "debug",
        /// Info.
        Info => "info",
        /// Print.
        Print => "print",
        /// Warning.
        Warning => "warning",
        /// Error.
        Error => "error",
        /// Fatal.
        Fatal => "fatal",
        /// Panic.
        Panic => "panic",
    }
}

// crates/snowflake-ddl-core/src/core/errors.rs
// ============================================================================
// Module: Parse Errors
// Description: Errors raised while parsing identifiers and enumerations.
// Purpose: Report exactly which part of an input string is malformed.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Parse errors carry the offending input and, for identifiers, the 1-based
//! index of the malformed part so callers can point at the exact defect.

use std::fmt;

use thiserror::Error;

/// Defect found in a single identifier part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartDefect {
    /// The part is empty.
    Empty,
    /// The part exceeds the maximum part length.
    TooLong,
    /// A quoted part has no closing quote.
    UnterminatedQuote,
    /// Characters appear after a closing quote or a quote appears mid-part.
    StrayCharacters,
}

impl fmt::Display for PartDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "empty",
            Self::TooLong => "longer than 255 characters",
            Self::UnterminatedQuote => "an unterminated quoted part",
            Self::StrayCharacters => "malformed around a quote",
        };
        f.write_str(text)
    }
}

/// Errors raised by identifier and enumeration parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The identifier has the wrong number of parts for the requested kind.
    #[error("identifier '{input}': expected {expected} part(s), found {actual}")]
    PartCount {
        /// Original input.
        input: String,
        /// Number of parts required by the identifier kind.
        expected: usize,
        /// Number of parts found.
        actual: usize,
    },
    /// A single part is malformed.
    #[error("identifier '{input}': part {index} is {defect}")]
    InvalidPart {
        /// Original input.
        input: String,
        /// 1-based index of the malformed part.
        index: usize,
        /// What is wrong with the part.
        defect: PartDefect,
    },
    /// The argument list of a callable identifier is malformed.
    #[error("identifier '{input}': malformed argument list")]
    MalformedArguments {
        /// Original input.
        input: String,
    },
    /// A string does not name any variant of a closed enumeration.
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant {
        /// Enumeration name.
        kind: &'static str,
        /// Rejected input.
        value: String,
    },
    /// A structured value (JSON payload, URL, list) could not be parsed.
    #[error("invalid {kind}: {reason}")]
    InvalidValue {
        /// Kind of value being parsed.
        kind: &'static str,
        /// Parser diagnostic.
        reason: String,
    },
}

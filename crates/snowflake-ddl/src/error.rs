// crates/snowflake-ddl/src/error.rs
// ============================================================================
// Module: SDK Errors
// Description: Error surface of the session façade and orchestrators.
// Purpose: Separate validation, driver, lookup, and orchestration failures.
// Dependencies: thiserror, snowflake-ddl-core
// ============================================================================

//! ## Overview
//! [`SdkError`] is returned by every façade call. Validation failures carry
//! the joined per-rule messages; driver errors pass through untouched;
//! [`SdkError::NotFound`] is produced by identifier lookups and the
//! `*_safely` wrappers. Orchestrator steps wrap their cause in
//! [`SdkError::OwnershipTransfer`] so a resume failure is distinguishable
//! from a grant failure.

use std::fmt;

use snowflake_ddl_core::DecodeError;
use snowflake_ddl_core::DriverError;
use snowflake_ddl_core::ParseError;
use snowflake_ddl_core::ValidationErrors;
use thiserror::Error;

// ============================================================================
// SECTION: Transfer Steps
// ============================================================================

/// Step of an ownership transfer that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    /// Reading the session's current role.
    ReadCurrentRole,
    /// Reading grants on the object or its dependencies.
    ReadGrants,
    /// Reading the object's execution state.
    ReadState,
    /// Pausing or suspending the object.
    Pause,
    /// Suspending root tasks of a task graph.
    SuspendRootTasks,
    /// Issuing `GRANT OWNERSHIP`.
    Grant,
    /// Resuming the object after transfer.
    Resume,
    /// Enumerating objects for a bulk transfer.
    Enumerate,
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ReadCurrentRole => "read current role",
            Self::ReadGrants => "read grants",
            Self::ReadState => "read state",
            Self::Pause => "pause",
            Self::SuspendRootTasks => "suspend root tasks",
            Self::Grant => "grant ownership",
            Self::Resume => "resume",
            Self::Enumerate => "enumerate",
        };
        f.write_str(text)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by the session façade.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Option values violated the operation's grammar.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// The driver reported an error; passed through verbatim.
    #[error(transparent)]
    Driver(#[from] DriverError),
    /// The requested object does not exist.
    #[error("{object} {id} not found")]
    NotFound {
        /// Object kind, such as `compute pool`.
        object: &'static str,
        /// Fully qualified identifier.
        id: String,
    },
    /// A result row could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A returned value could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A step of an ownership transfer failed. Earlier steps are not undone.
    #[error("ownership transfer of {object} failed at step '{step}': {source}")]
    OwnershipTransfer {
        /// Failed step.
        step: TransferStep,
        /// Fully qualified identifier of the object.
        object: String,
        /// Underlying failure.
        source: Box<SdkError>,
    },
    /// Failures of a fan-out over several objects.
    #[error("{}", join_messages(.0))]
    Joined(Vec<SdkError>),
}

impl SdkError {
    /// Returns true for [`SdkError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true when the driver reported a missing object.
    #[must_use]
    pub fn indicates_missing_object(&self) -> bool {
        match self {
            Self::Driver(err) => err.indicates_missing_object(),
            Self::NotFound {
                ..
            } => true,
            _ => false,
        }
    }

    /// Wraps an error as a failed transfer step.
    #[must_use]
    pub fn at_step(self, step: TransferStep, object: impl Into<String>) -> Self {
        Self::OwnershipTransfer {
            step,
            object: object.into(),
            source: Box::new(self),
        }
    }

    /// Returns the failed transfer step, if any.
    #[must_use]
    pub const fn transfer_step(&self) -> Option<TransferStep> {
        match self {
            Self::OwnershipTransfer {
                step,
                ..
            } => Some(*step),
            _ => None,
        }
    }

    /// Joins several errors; `None` when the list is empty and the error
    /// itself when it holds one.
    #[must_use]
    pub fn join(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Joined(errors)),
        }
    }
}

/// Joins error messages one per line.
fn join_messages(errors: &[SdkError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

// crates/snowflake-ddl-core/src/validation/mod.rs
// ============================================================================
// Module: Validation Kernel
// Description: Reusable grammar predicates that collect composite failures.
// Purpose: Report every rule violation of an option value in one error.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! A [`Validator`] is created per operation and fed predicates in field
//! declaration order. Predicates never short-circuit: each violated rule is
//! appended as a [`ValidationFailure`] and [`Validator::finish`] returns the
//! joined [`ValidationErrors`]. Failures render as
//! `<Operation>: <field>: <rule>`, one per line, so messages are stable and
//! machine-parseable. Nested option bodies validate inside
//! [`Validator::scope`], which prefixes their field paths.

use std::error::Error;
use std::fmt;

use crate::core::identifiers::ObjectIdentifier;

// ============================================================================
// SECTION: Set Semantics
// ============================================================================

/// Field types that can be "set" or "unset".
pub trait IsSet {
    /// Returns true when the field carries a value.
    fn is_set(&self) -> bool;
}

impl<T> IsSet for Option<T> {
    fn is_set(&self) -> bool {
        self.is_some()
    }
}

impl IsSet for bool {
    fn is_set(&self) -> bool {
        *self
    }
}

impl IsSet for String {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl IsSet for str {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> IsSet for Vec<T> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> IsSet for [T] {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: IsSet + ?Sized> IsSet for &T {
    fn is_set(&self) -> bool {
        (**self).is_set()
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// A violated grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A required option structure was absent.
    NilOptions,
    /// A required field is unset.
    Required,
    /// Exactly one of the listed fields must be set.
    ExactlyOneOf(Vec<&'static str>),
    /// At least one of the listed fields must be set.
    AtLeastOneOf(Vec<&'static str>),
    /// At most one of the listed fields may be set.
    AtMostOneOf(Vec<&'static str>),
    /// Two fields may not both be set.
    Conflicting(&'static str, &'static str),
    /// An identifier has an empty or over-long part.
    InvalidIdentifier,
    /// A number must be strictly greater than the bound.
    GreaterThan(i64),
    /// A number must be greater than or equal to the bound.
    GreaterOrEqual(i64),
    /// A number must be greater than or equal to another field's value.
    GreaterOrEqualField {
        /// Name of the other field.
        other: &'static str,
        /// Value of the other field.
        value: i64,
    },
    /// A number must lie within an inclusive range.
    InRange {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// A floating-point number must be finite.
    Finite,
    /// A free-form constraint specific to one operation.
    Invalid(&'static str),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NilOptions => f.write_str("nil-options"),
            Self::Required => f.write_str("required"),
            Self::ExactlyOneOf(fields) => write!(f, "exactly-one-of: {}", fields.join(", ")),
            Self::AtLeastOneOf(fields) => write!(f, "at-least-one-of: {}", fields.join(", ")),
            Self::AtMostOneOf(fields) => write!(f, "at-most-one-of: {}", fields.join(", ")),
            Self::Conflicting(first, second) => write!(f, "conflicting: {first}, {second}"),
            Self::InvalidIdentifier => f.write_str("invalid-identifier"),
            Self::GreaterThan(min) => write!(f, "greater-than {min}"),
            Self::GreaterOrEqual(min) => write!(f, "greater-or-equal {min}"),
            Self::GreaterOrEqualField {
                other,
                value,
            } => write!(f, "greater-or-equal to {other} ({value})"),
            Self::InRange {
                min,
                max,
            } => write!(f, "in-range [{min}, {max}]"),
            Self::Finite => f.write_str("finite-number"),
            Self::Invalid(reason) => write!(f, "invalid: {reason}"),
        }
    }
}

// ============================================================================
// SECTION: Failures
// ============================================================================

/// One atomic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Operation (option type) name.
    pub operation: &'static str,
    /// Dotted field path within the operation.
    pub field: String,
    /// Violated rule.
    pub rule: Rule,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.operation, self.field, self.rule)
    }
}

/// Joined validation failures, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Individual failures.
    failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    /// Returns the individual failures.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Returns true when any failure matches `field` and `rule`.
    #[must_use]
    pub fn contains(&self, field: &str, rule: &Rule) -> bool {
        self.failures.iter().any(|failure| failure.field == field && &failure.rule == rule)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Collects rule violations for one operation.
#[derive(Debug, Clone)]
pub struct Validator {
    /// Operation name used as the failure prefix.
    operation: &'static str,
    /// Current nested scope path segments.
    scope: Vec<&'static str>,
    /// Collected failures.
    failures: Vec<ValidationFailure>,
}

impl Validator {
    /// Creates a validator for an operation.
    #[must_use]
    pub const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            scope: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Runs `check` with field paths prefixed by `segment`.
    pub fn scope(&mut self, segment: &'static str, check: impl FnOnce(&mut Self)) -> &mut Self {
        self.scope.push(segment);
        check(self);
        self.scope.pop();
        self
    }

    /// Records a failure for `field` (empty = the current scope itself).
    pub fn fail(&mut self, field: &str, rule: Rule) -> &mut Self {
        let field = self.path(field);
        self.failures.push(ValidationFailure {
            operation: self.operation,
            field,
            rule,
        });
        self
    }

    /// Requires `value` to be set.
    pub fn required<T: IsSet + ?Sized>(&mut self, field: &str, value: &T) -> &mut Self {
        if !value.is_set() {
            self.fail(field, Rule::Required);
        }
        self
    }

    /// Requires a nested option structure to be present.
    pub fn present<T>(&mut self, field: &str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.fail(field, Rule::NilOptions);
        }
        self
    }

    /// Requires exactly one candidate to be set. `field` names the owning
    /// structure (empty = current scope).
    pub fn exactly_one_of(&mut self, field: &str, candidates: &[(&'static str, bool)]) -> &mut Self {
        if count_set(candidates) != 1 {
            self.fail(field, Rule::ExactlyOneOf(names(candidates)));
        }
        self
    }

    /// Requires at least one candidate to be set.
    pub fn at_least_one_of(
        &mut self,
        field: &str,
        candidates: &[(&'static str, bool)],
    ) -> &mut Self {
        if count_set(candidates) == 0 {
            self.fail(field, Rule::AtLeastOneOf(names(candidates)));
        }
        self
    }

    /// Allows at most one candidate to be set.
    pub fn at_most_one_of(&mut self, field: &str, candidates: &[(&'static str, bool)]) -> &mut Self {
        if count_set(candidates) > 1 {
            self.fail(field, Rule::AtMostOneOf(names(candidates)));
        }
        self
    }

    /// Forbids setting both fields.
    pub fn conflicting(
        &mut self,
        first: (&'static str, bool),
        second: (&'static str, bool),
    ) -> &mut Self {
        if first.1 && second.1 {
            self.fail("", Rule::Conflicting(first.0, second.0));
        }
        self
    }

    /// Requires an identifier to be valid.
    pub fn valid_identifier<I: ObjectIdentifier + ?Sized>(&mut self, field: &str, id: &I) -> &mut Self {
        if !id.is_valid() {
            self.fail(field, Rule::InvalidIdentifier);
        }
        self
    }

    /// Requires an identifier to be valid when present.
    pub fn valid_identifier_if_set<I: ObjectIdentifier + ?Sized>(
        &mut self,
        field: &str,
        id: Option<&I>,
    ) -> &mut Self {
        if let Some(id) = id {
            self.valid_identifier(field, id);
        }
        self
    }

    /// Requires every identifier in a slice to be valid.
    pub fn valid_identifiers<I: ObjectIdentifier>(&mut self, field: &str, ids: &[I]) -> &mut Self {
        if ids.iter().any(|id| !id.is_valid()) {
            self.fail(field, Rule::InvalidIdentifier);
        }
        self
    }

    /// Requires a present number to be strictly greater than `min`.
    pub fn int_greater_than<N: Into<i64> + Copy>(
        &mut self,
        field: &str,
        value: Option<N>,
        min: i64,
    ) -> &mut Self {
        if value.is_some_and(|value| Into::<i64>::into(value) <= min) {
            self.fail(field, Rule::GreaterThan(min));
        }
        self
    }

    /// Requires a present number to be greater than or equal to `min`.
    pub fn int_greater_or_equal<N: Into<i64> + Copy>(
        &mut self,
        field: &str,
        value: Option<N>,
        min: i64,
    ) -> &mut Self {
        if value.is_some_and(|value| Into::<i64>::into(value) < min) {
            self.fail(field, Rule::GreaterOrEqual(min));
        }
        self
    }

    /// Requires `value` to be greater than or equal to another field.
    pub fn int_greater_or_equal_field<N: Into<i64> + Copy>(
        &mut self,
        field: &str,
        value: Option<N>,
        other: &'static str,
        other_value: Option<N>,
    ) -> &mut Self {
        if let (Some(value), Some(other_value)) = (value, other_value) {
            let other_value: i64 = other_value.into();
            if Into::<i64>::into(value) < other_value {
                self.fail(
                    field,
                    Rule::GreaterOrEqualField {
                        other,
                        value: other_value,
                    },
                );
            }
        }
        self
    }

    /// Requires a present number to lie within `[min, max]`.
    pub fn int_in_range<N: Into<i64> + Copy>(
        &mut self,
        field: &str,
        value: Option<N>,
        min: i64,
        max: i64,
    ) -> &mut Self {
        if value.is_some_and(|value| !(min ..= max).contains(&Into::<i64>::into(value))) {
            self.fail(
                field,
                Rule::InRange {
                    min,
                    max,
                },
            );
        }
        self
    }

    /// Requires a present floating-point number to be finite.
    pub fn finite(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if value.is_some_and(|value| !value.is_finite()) {
            self.fail(field, Rule::Finite);
        }
        self
    }

    /// Records `reason` against `field` when `violated` is true.
    pub fn check(&mut self, violated: bool, field: &str, reason: &'static str) -> &mut Self {
        if violated {
            self.fail(field, Rule::Invalid(reason));
        }
        self
    }

    /// Consumes the validator.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when any rule was violated.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                failures: self.failures,
            })
        }
    }

    /// Builds the dotted path for `field` under the current scope.
    fn path(&self, field: &str) -> String {
        let mut segments: Vec<&str> = self.scope.clone();
        if !field.is_empty() {
            segments.push(field);
        }
        if segments.is_empty() {
            return "options".to_string();
        }
        segments.join(".")
    }
}

/// Counts set candidates.
fn count_set(candidates: &[(&'static str, bool)]) -> usize {
    candidates.iter().filter(|(_, set)| *set).count()
}

/// Extracts candidate names in declaration order.
fn names(candidates: &[(&'static str, bool)]) -> Vec<&'static str> {
    candidates.iter().map(|(name, _)| *name).collect()
}

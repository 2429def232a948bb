// crates/snowflake-ddl-core/src/sql/value.rs
// ============================================================================
// Module: SQL Values
// Description: Conversion of Rust scalars and identifiers into SQL text.
// Purpose: Keep literal formatting rules in one place.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! [`SqlValue`] produces the unquoted SQL spelling of a value. Quoting is the
//! renderer's job and is selected per field through
//! [`Encoding`](crate::sql::Encoding). Booleans render lowercase; numbers
//! render as plain decimals; identifiers render fully qualified.

use crate::core::identifiers::AccountIdentifier;
use crate::core::identifiers::AccountObjectIdentifier;
use crate::core::identifiers::DatabaseObjectIdentifier;
use crate::core::identifiers::ObjectIdentifier;
use crate::core::identifiers::SchemaObjectIdentifier;
use crate::core::identifiers::SchemaObjectIdentifierWithArguments;

/// Value that can be spliced into a rendered statement.
pub trait SqlValue {
    /// Returns the unquoted SQL text for the value.
    fn to_sql(&self) -> String;
}

impl SqlValue for str {
    fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl SqlValue for String {
    fn to_sql(&self) -> String {
        self.clone()
    }
}

impl SqlValue for bool {
    fn to_sql(&self) -> String {
        String::from(if *self { "true" } else { "false" })
    }
}

/// Implements [`SqlValue`] for integer types via `Display`.
macro_rules! integer_sql_value {
    ($($ty:ty),+) => {
        $(
            impl SqlValue for $ty {
                fn to_sql(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

integer_sql_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Finite values render as plain decimals. `NaN` and the infinities have no
/// SQL literal and render as `NULL`; option types reject them up front
/// through [`Validator::finite`](crate::validation::Validator::finite).
impl SqlValue for f64 {
    // `Display` for floats never uses exponent notation.
    fn to_sql(&self) -> String {
        if self.is_finite() { self.to_string() } else { String::from("NULL") }
    }
}

/// Implements [`SqlValue`] for identifier types as their qualified name.
macro_rules! identifier_sql_value {
    ($($ty:ty),+) => {
        $(
            impl SqlValue for $ty {
                fn to_sql(&self) -> String {
                    self.fully_qualified_name()
                }
            }
        )+
    };
}

identifier_sql_value!(
    AccountObjectIdentifier,
    DatabaseObjectIdentifier,
    SchemaObjectIdentifier,
    SchemaObjectIdentifierWithArguments,
    AccountIdentifier
);

impl<T: SqlValue + ?Sized> SqlValue for &T {
    fn to_sql(&self) -> String {
        (**self).to_sql()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_as_plain_decimals() {
        assert_eq!(2.5_f64.to_sql(), "2.5");
        assert_eq!(1e21_f64.to_sql(), "1000000000000000000000");
    }

    #[test]
    fn non_finite_floats_never_reach_statement_text() {
        assert_eq!(f64::NAN.to_sql(), "NULL");
        assert_eq!(f64::INFINITY.to_sql(), "NULL");
        assert_eq!(f64::NEG_INFINITY.to_sql(), "NULL");
    }
}

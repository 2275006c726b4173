//! Shared types for logquery
//!
//! This crate contains the values passed into and out of the query helpers:
//! raw search terms, boolean operators, concatenation options and the
//! sentinels understood by the search backend.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Constants
// ============================================================================

/// Bucket key the backend reports for documents where a field is absent
pub const MISSING_BUCKET_NAME: &str = "(Empty Value)";

/// Query that matches every document
pub const MATCH_ALL: &str = "*";

/// Datetime pattern the indexer stores timestamps in (`YYYY-MM-DD HH:mm:ss.SSS`)
pub const INTERNAL_INDEXER_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Rendered in place of a timestamp that could not be parsed
pub const INVALID_DATE: &str = "Invalid date";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unknown operator '{0}', expected one of AND, OR, NOT")]
    UnknownOperator(String),

    #[error("cannot interpret '{0}' as a timestamp")]
    InvalidTimestamp(String),
}

// ============================================================================
// Terms
// ============================================================================

/// A raw search value as supplied by the caller
///
/// Stringifies the way a generic string coercion would: nullish values
/// become `null` / `undefined`, integral numbers carry no fractional part.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
    Undefined,
}

impl Term {
    /// Borrow the text of a `Text` term
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => f.write_str(&format_float(*n)),
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// Number-to-text coercion: non-finite names, unsigned zero, and exponent
/// form (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`
fn format_float(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        format_exponent(n)
    } else {
        format!("{}", n)
    }
}

/// Shortest mantissa with an explicitly signed exponent
fn format_exponent(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Term {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i32> for Term {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<u32> for Term {
    fn from(n: u32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u64> for Term {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Integer)
    }
}

impl From<usize> for Term {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Integer)
    }
}

impl From<f32> for Term {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<f64> for Term {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl<T: Into<Term>> From<Option<T>> for Term {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Boolean joiner between query fragments
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    And,
    Or,
    Not,
}

impl Operator {
    /// Token as written in a query
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Operator {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Operators are case-sensitive; `and` is a search term, not a joiner
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "NOT" => Ok(Self::Not),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }
}

// ============================================================================
// Concatenation options
// ============================================================================

/// Options for joining several fragments into one query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcatOptions {
    /// Token placed between fragments
    pub operator: String,

    /// Wrap each fragment in parentheses when more than one is joined
    pub with_brackets: bool,
}

impl Default for ConcatOptions {
    fn default() -> Self {
        Self {
            operator: Operator::And.as_str().to_string(),
            with_brackets: true,
        }
    }
}

impl ConcatOptions {
    /// Join with a different operator
    pub fn with_operator(mut self, operator: impl AsRef<str>) -> Self {
        self.operator = operator.as_ref().to_string();
        self
    }

    /// Set whether multi-fragment joins are bracketed
    pub fn with_brackets(mut self, with_brackets: bool) -> Self {
        self.with_brackets = with_brackets;
        self
    }

    /// Never bracket fragments
    pub fn without_brackets(self) -> Self {
        self.with_brackets(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        assert_eq!(Term::from("foo").to_string(), "foo");
        assert_eq!(Term::from(42).to_string(), "42");
        assert_eq!(Term::from(-7_i64).to_string(), "-7");
        assert_eq!(Term::from(1.5).to_string(), "1.5");
        assert_eq!(Term::from(3.0).to_string(), "3");
        assert_eq!(Term::Null.to_string(), "null");
        assert_eq!(Term::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(Term::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Term::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Term::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Term::from(-0.0).to_string(), "0");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(Term::from(1e21).to_string(), "1e+21");
        assert_eq!(Term::from(-1.5e22).to_string(), "-1.5e+22");
        assert_eq!(Term::from(1.23e-18).to_string(), "1.23e-18");
        assert_eq!(Term::from(1e-7).to_string(), "1e-7");
        assert_eq!(Term::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(Term::from(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn test_unsigned_and_f32_terms() {
        assert_eq!(Term::from(7_u64), Term::Integer(7));
        assert_eq!(Term::from(3_usize), Term::Integer(3));
        assert_eq!(Term::from(u64::MAX), Term::Float(u64::MAX as f64));
        assert_eq!(Term::from(0.5_f32).to_string(), "0.5");
    }

    #[test]
    fn test_option_term() {
        assert_eq!(Term::from(None::<&str>), Term::Null);
        assert_eq!(Term::from(Some("x")), Term::Text("x".to_string()));
        assert_eq!(Term::from(None::<i64>), Term::Null);
    }

    #[test]
    fn test_operator_parse_is_case_sensitive() {
        assert_eq!("AND".parse::<Operator>().unwrap(), Operator::And);
        assert_eq!("OR".parse::<Operator>().unwrap(), Operator::Or);
        assert_eq!("NOT".parse::<Operator>().unwrap(), Operator::Not);
        assert_eq!(
            "or".parse::<Operator>(),
            Err(QueryError::UnknownOperator("or".to_string()))
        );
    }

    #[test]
    fn test_operator_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            op: Operator,
        }

        let w: Wrapper = toml::from_str("op = \"OR\"").unwrap();
        assert_eq!(w.op, Operator::Or);
    }

    #[test]
    fn test_concat_options_builder() {
        let options = ConcatOptions::default();
        assert_eq!(options.operator, "AND");
        assert!(options.with_brackets);

        let options = ConcatOptions::default()
            .with_operator(Operator::Or)
            .without_brackets();
        assert_eq!(options.operator, "OR");
        assert!(!options.with_brackets);
    }
}

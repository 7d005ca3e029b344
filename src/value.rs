use std::fmt;

use serde::Serialize;

/// A literal operand appearing on the right-hand side of a rule.
///
/// The search language only knows two literal types: quoted strings and
/// signed integers. Lists used by `in [...]` may freely mix the two.
///
/// `Display` writes query text. String literals have no escape sequences,
/// so a string is quoted with whichever quote character it does not contain.
/// A string containing both `"` and `'` has no query-text form: it is
/// written in single quotes and the text will not tokenize back. Parsed
/// strings never contain both, since the closing quote ends the literal.
///
/// # Examples
///
/// ```
/// use attrql::Value;
///
/// let lab = Value::String("Doe Lab".to_string());
/// let count = Value::Integer(32);
///
/// assert_eq!(lab.to_string(), "\"Doe Lab\"");
/// assert_eq!(count.to_string(), "32");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Quoted string, stored without its quotes
    String(String),

    /// Signed integer
    Integer(i64),
}

impl Value {
    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::String(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Strings have no escapes; quote with the character they lack.
            // With both present the single-quoted form is written as is.
            Value::String(s) if s.contains('"') => write!(f, "'{}'", s),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

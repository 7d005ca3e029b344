//! JSON wire form of compiled predicates, facet columns and facet counts.
//!
//! Predicates serialize as tagged objects so a store on the other side of a
//! process boundary can rebuild the tree without knowing the query syntax.
//!
//! # Examples
//!
//! ```
//! use attrql::{Predicate, output::to_json};
//!
//! let predicate = Predicate::negate(Predicate::eq("units", 5));
//!
//! assert_eq!(
//!     to_json(&predicate).unwrap(),
//!     r#"{"type":"not","inner":{"type":"comparison","field":"units","op":"eq","value":5}}"#
//! );
//! ```

use serde::Serialize;

/// Compact JSON text
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// JSON text indented by two spaces
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Compact or pretty JSON text, as chosen by `pretty`
pub fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        to_json_pretty(value)
    } else {
        to_json(value)
    }
}

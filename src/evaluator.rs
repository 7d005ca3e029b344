//! Reference evaluator running predicates and facets over in-memory JSON
//! records.
//!
//! The compiler never evaluates anything itself; this module stands in for
//! the data store that normally consumes its output, with the semantics such
//! a store is expected to provide:
//!
//! - Field paths walk nested objects one `__` segment at a time. Arrays fan
//!   out, so `keywords__keyword` reaches the `keyword` of every entry in
//!   `keywords`, and a comparison holds when it holds for any reached value.
//! - String equality ignores case; membership does not.
//! - Ordering comparisons only ever hold for numbers.
//! - Missing and `null` values satisfy no comparison.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as Json;
use tracing::debug;

use crate::{
    ast::{CompareOp, FacetExpression, Predicate},
    value::Value,
};

/// Separator between relation hops in a field path
pub const PATH_SEPARATOR: &str = "__";

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Ordering comparison against a non-integer literal. The grammar never
    /// produces one, but hand-built predicates can.
    #[error("Type error: cannot order {field} {op} {value}, ordering needs an integer")]
    NonIntegerOrdering {
        field: String,
        op: CompareOp,
        value: Value,
    },
}

/// Number of records sharing one facet value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetCount {
    pub facet: Json,
    pub count: usize,
}

/// Values reached by following `field` from `record`, arrays flattened.
pub fn resolve_path<'r>(record: &'r Json, field: &str) -> Vec<&'r Json> {
    let mut nodes = vec![record];

    for segment in field.split(PATH_SEPARATOR) {
        let mut next = Vec::new();
        for node in nodes {
            match node.get(segment) {
                Some(Json::Array(items)) => next.extend(items.iter().filter(|v| !v.is_null())),
                Some(Json::Null) | None => {}
                Some(value) => next.push(value),
            }
        }
        nodes = next;
    }
    nodes
}

fn equals_ignore_case(leaf: &Json, value: &Value) -> bool {
    match (leaf, value) {
        (Json::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
        (Json::Number(_), Value::Integer(n)) => equals_integer(leaf, *n),
        _ => false,
    }
}

fn equals_exact(leaf: &Json, value: &Value) -> bool {
    match (leaf, value) {
        (Json::String(a), Value::String(b)) => a == b,
        (Json::Number(_), Value::Integer(n)) => equals_integer(leaf, *n),
        _ => false,
    }
}

fn equals_integer(leaf: &Json, n: i64) -> bool {
    match leaf.as_i64() {
        Some(i) => i == n,
        None => leaf.as_f64().is_some_and(|f| f == n as f64),
    }
}

fn orders(leaf: &Json, op: CompareOp, n: i64) -> bool {
    match leaf.as_i64() {
        Some(i) => compare_ordered(i, op, n),
        None => leaf.as_f64().is_some_and(|x| compare_ordered(x, op, n as f64)),
    }
}

fn compare_ordered<T: PartialOrd>(a: T, op: CompareOp, b: T) -> bool {
    match op {
        CompareOp::Lt => a < b,
        CompareOp::Lte => a <= b,
        CompareOp::Gt => a > b,
        CompareOp::Gte => a >= b,
        CompareOp::Eq => a == b,
        CompareOp::NotEq => a != b,
    }
}

/// Evaluates predicates and facet columns against JSON records.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Whether `record` satisfies `predicate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use attrql::{Evaluator, Predicate};
    /// use serde_json::json;
    ///
    /// let record = json!({"lab": "Doe Lab", "keywords": [{"keyword": "cortex"}]});
    /// let evaluator = Evaluator::new();
    ///
    /// assert!(evaluator.matches(&Predicate::eq("lab", "doe lab"), &record).unwrap());
    /// assert!(evaluator.matches(&Predicate::eq("keywords__keyword", "cortex"), &record).unwrap());
    /// ```
    pub fn matches(&self, predicate: &Predicate, record: &Json) -> Result<bool, EvalError> {
        match predicate {
            Predicate::Comparison { field, op, value } => {
                let leaves = resolve_path(record, field);
                match op {
                    CompareOp::Eq => Ok(leaves.iter().any(|leaf| equals_ignore_case(leaf, value))),
                    CompareOp::NotEq => Ok(!leaves.iter().any(|leaf| equals_ignore_case(leaf, value))),
                    _ => {
                        let n = value.as_int().ok_or_else(|| EvalError::NonIntegerOrdering {
                            field: field.clone(),
                            op: *op,
                            value: value.clone(),
                        })?;
                        Ok(leaves.iter().any(|leaf| orders(leaf, *op, n)))
                    }
                }
            }
            Predicate::Membership { field, values } => Ok(resolve_path(record, field)
                .iter()
                .any(|leaf| values.iter().any(|value| equals_exact(leaf, value)))),
            Predicate::And { left, right } => {
                Ok(self.matches(left, record)? && self.matches(right, record)?)
            }
            Predicate::Or { left, right } => {
                Ok(self.matches(left, record)? || self.matches(right, record)?)
            }
            Predicate::Not { inner } => Ok(!self.matches(inner, record)?),
        }
    }

    /// Records satisfying `predicate`, in input order.
    pub fn filter<'r>(
        &self,
        predicate: &Predicate,
        records: &'r [Json],
    ) -> Result<Vec<&'r Json>, EvalError> {
        let mut kept = Vec::new();
        for record in records {
            if self.matches(predicate, record)? {
                kept.push(record);
            }
        }
        debug!(total = records.len(), kept = kept.len(), "filtered records");
        Ok(kept)
    }

    /// Count records per facet value.
    ///
    /// Null and missing values are not counted. Results are ordered by count,
    /// largest first, then by the value's JSON text.
    pub fn facet_counts<'r, I>(
        &self,
        facet: &FacetExpression,
        records: I,
    ) -> Result<Vec<FacetCount>, EvalError>
    where
        I: IntoIterator<Item = &'r Json>,
    {
        let mut groups: BTreeMap<String, FacetCount> = BTreeMap::new();
        let mut bump = |key: Json| {
            groups
                .entry(key.to_string())
                .or_insert_with(|| FacetCount {
                    facet: key,
                    count: 0,
                })
                .count += 1;
        };

        for record in records {
            match &facet.bucket {
                Some(rule) => bump(Json::Bool(self.matches(rule, record)?)),
                None => {
                    for leaf in resolve_path(record, &facet.field) {
                        bump(leaf.clone());
                    }
                }
            }
        }

        let mut counts: Vec<FacetCount> = groups.into_values().collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        debug!(facet = %facet, groups = counts.len(), "counted facet");
        Ok(counts)
    }
}

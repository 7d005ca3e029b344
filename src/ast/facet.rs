use std::fmt;

use serde::Serialize;

use crate::ast::Predicate;

/// Column expression used to group records for aggregation.
///
/// A plain attribute groups by the field's own values. An attribute written
/// as a rule (`electrodes >= 32`) groups records into `true`/`false` buckets
/// by whether the rule holds for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetExpression {
    /// Resolved field path
    pub field: String,

    /// Bucketing rule, if the column was written as a rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Predicate>,
}

impl FacetExpression {
    pub fn column(field: impl Into<String>) -> Self {
        FacetExpression {
            field: field.into(),
            bucket: None,
        }
    }

    pub fn bucketed(field: impl Into<String>, bucket: Predicate) -> Self {
        FacetExpression {
            field: field.into(),
            bucket: Some(bucket),
        }
    }
}

impl fmt::Display for FacetExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bucket {
            Some(rule) => write!(f, "{}", rule),
            None => f.write_str(&self.field),
        }
    }
}

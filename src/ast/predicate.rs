use std::fmt;
use std::ops;

use serde::Serialize;

use crate::ast::CompareOp;
use crate::value::Value;

/// Boolean filter tree produced by parsing a search expression.
///
/// Fields are internal field paths (already resolved through the attribute
/// table), never the public attribute names typed by the user. Grouping
/// parentheses leave no trace in the tree.
///
/// Negation is structural: `not (a and b)` is `Not(And(a, b))`, and `x != 5`
/// is `Not(Comparison(x = 5))`. Nothing is rewritten through De Morgan.
///
/// Trees from the parser are at most [`MAX_DEPTH`](crate::parser::MAX_DEPTH)
/// deep. Dropping, rendering and evaluating recurse over the tree, so trees
/// built by hand should stay within the same bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// Field compared against a single literal
    ///
    /// # Example
    /// ```text
    /// electrodes >= 32
    /// ```
    Comparison {
        field: String,
        op: CompareOp,
        value: Value,
    },

    /// Set membership, values kept in input order
    ///
    /// # Example
    /// ```text
    /// keyword in ["cortex", "hippocampus"]
    /// ```
    Membership { field: String, values: Vec<Value> },

    /// Conjunction
    And {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },

    /// Disjunction
    Or {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },

    /// Negation wrapper
    Not { inner: Box<Predicate> },
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Predicate::Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::compare(field, CompareOp::Eq, value)
    }

    pub fn membership(field: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::Membership {
            field: field.into(),
            values,
        }
    }

    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Wrap `inner` in a negation node.
    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not {
            inner: Box::new(inner),
        }
    }

    /// Field paths referenced by the tree, in order of first appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Comparison { field, .. } | Predicate::Membership { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            Predicate::And { left, right } | Predicate::Or { left, right } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
            Predicate::Not { inner } => inner.collect_fields(out),
        }
    }

    /// Number of nodes on the longest root-to-leaf path. A single rule has
    /// depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];

        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match node {
                Predicate::And { left, right } | Predicate::Or { left, right } => {
                    pending.push((left.as_ref(), depth + 1));
                    pending.push((right.as_ref(), depth + 1));
                }
                Predicate::Not { inner } => pending.push((inner.as_ref(), depth + 1)),
                Predicate::Comparison { .. } | Predicate::Membership { .. } => {}
            }
        }
        deepest
    }

    /// Binding strength used when rendering; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Predicate::Or { .. } => 1,
            Predicate::And { .. } => 2,
            Predicate::Not { .. } => 3,
            Predicate::Comparison { .. } | Predicate::Membership { .. } => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { field, op, value } => write!(f, "{} {} {}", field, op, value),
            Predicate::Membership { field, values } => {
                write!(f, "{} in [", field)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            // Left-associative: a right operand of the same strength needs
            // parentheses to keep its shape.
            Predicate::And { left, right } => {
                left.fmt_operand(f, 2)?;
                f.write_str(" and ")?;
                right.fmt_operand(f, 3)
            }
            Predicate::Or { left, right } => {
                left.fmt_operand(f, 1)?;
                f.write_str(" or ")?;
                right.fmt_operand(f, 2)
            }
            Predicate::Not { inner } => {
                f.write_str("not ")?;
                inner.fmt_operand(f, 3)
            }
        }
    }
}

impl ops::BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        Predicate::and(self, rhs)
    }
}

impl ops::BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        Predicate::or(self, rhs)
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Predicate::negate(self)
    }
}

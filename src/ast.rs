//! # Attribute Search Language - Abstract Syntax Tree
//!
//! This module defines the tokens and trees of the attribute search language,
//! a small filter language for picking records out of a collection by their
//! attributes:
//!
//! ```text
//! lab = "Doe Lab" and electrodes >= 32 and keyword in ["cortex", "hippocampus"]
//! ```
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison operators used by rules
//! - **[predicate]** - The boolean filter tree
//! - **[facet]** - Column expressions used for grouping
//!
//! ## Core Concepts
//!
//! ### Rules
//!
//! A rule compares one attribute with a literal:
//!
//! ```text
//! lab = "Doe Lab"        // strings or integers
//! units != 0             // negated equality
//! electrodes >= 32       // ordering takes integers only
//! doi in ["10.1/a", "10.1/b"]
//! ```
//!
//! ### Combinators
//!
//! Rules combine with `and`, `or` and `not`; `not` binds tightest, then
//! `and`, then `or`. Parentheses regroup:
//!
//! ```text
//! lab = "x" or lab = "y" and units > 3      // x or (y and units)
//! (lab = "x" or lab = "y") and units > 3
//! not (lab = "x" and units > 3)
//! ```
//!
//! ### Attributes
//!
//! Attribute names are resolved at lex time through the attribute table, so
//! every field in a tree is an internal field path (`keyword` becomes
//! `keywords__keyword`). Names are case-insensitive.
pub mod tokens;
pub mod operators;
pub mod predicate;
pub mod facet;

pub use tokens::{Token, TokenKind};
pub use operators::CompareOp;
pub use predicate::Predicate;
pub use facet::FacetExpression;

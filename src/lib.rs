pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod schema;
pub mod value;

pub use ast::{CompareOp, FacetExpression, Predicate, Token, TokenKind};
pub use compiler::SearchCompiler;
pub use evaluator::{EvalError, Evaluator, FacetCount};
pub use lexer::{LexError, Lexer, Lexicon, Position};
pub use output::{to_json, to_json_pretty};
pub use parser::{Error, ParseError, Parser};
pub use schema::{Attribute, AttributeTable, SchemaError};
pub use value::Value;

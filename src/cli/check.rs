//! Validate search queries and run them against JSON records

use serde_json::Value as Json;

use super::{parse_records, CliError};
use crate::{Evaluator, Predicate, SearchCompiler, Token};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The search query to compile
    pub query: String,
    /// JSON records to filter
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Compiled predicate, when there were no records to run it against
    Compiled(Predicate),
    /// Records matching the query, in input order
    Matches(Vec<Json>),
}

/// Execute a check operation
pub fn execute_check(
    compiler: &SearchCompiler,
    options: &CheckOptions,
) -> Result<CheckResult, CliError> {
    let predicate = compiler.parse(&options.query)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let Some(input) = &options.input else {
        return Ok(CheckResult::Compiled(predicate));
    };

    let records = parse_records(input)?;
    let matches = Evaluator::new()
        .filter(&predicate, &records)?
        .into_iter()
        .cloned()
        .collect();
    Ok(CheckResult::Matches(matches))
}

/// Tokenize a query, stopping at the first lexing error
pub fn execute_tokens(compiler: &SearchCompiler, query: &str) -> Result<Vec<Token>, CliError> {
    compiler
        .tokenize(query)
        .map(|token| token.map_err(|e| CliError::Query(e.into())))
        .collect()
}

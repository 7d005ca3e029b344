//! CLI support for attrql
//!
//! Provides programmatic access to the attrql CLI commands so they can be
//! embedded in other tools and exercised from tests.

mod check;
mod docs;
mod facet;
mod logging;
mod records;

pub use check::{execute_check, execute_tokens, CheckOptions, CheckResult};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};
pub use facet::{execute_facet, FacetOptions};
pub use logging::{filter_directive, init_logging, LOG_ENV_VAR};
pub use records::parse_records;

use std::io;
use std::path::Path;

use crate::{AttributeTable, EvalError, SchemaError, SearchCompiler};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Query or facet column failed to lex or parse
    #[error("invalid query: {0}")]
    Query(#[from] crate::Error),

    /// Attribute table could not be built
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// JSON parsing or printing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input parsed as JSON but holds something other than records
    #[error("Expected JSON objects as records, found {0}")]
    NotRecords(&'static str),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON records to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'attrql docs' to see available categories.")]
    UnknownCategory(String),
}

/// Build a compiler from a TOML schema file, or the default table.
pub fn load_compiler(schema: Option<&Path>) -> Result<SearchCompiler, CliError> {
    let table = match schema {
        Some(path) => AttributeTable::load(path)?,
        None => AttributeTable::default(),
    };
    Ok(SearchCompiler::new(table)?)
}

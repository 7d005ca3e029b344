//! Facet counts over JSON records

use super::{parse_records, CliError};
use crate::{Evaluator, FacetCount, SearchCompiler};

/// Options for the facet command
#[derive(Debug, Clone, Default)]
pub struct FacetOptions {
    /// Facet column, an attribute optionally written as a rule
    pub column: String,
    /// Query selecting the records to count; all records when absent
    pub query: Option<String>,
    /// JSON records
    pub input: Option<String>,
}

/// Count matching records per facet value
pub fn execute_facet(
    compiler: &SearchCompiler,
    options: &FacetOptions,
) -> Result<Vec<FacetCount>, CliError> {
    let facet = compiler.parse_facet(&options.column)?;
    let predicate = options
        .query
        .as_deref()
        .map(|query| compiler.parse(query))
        .transpose()?;

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = parse_records(input)?;

    let evaluator = Evaluator::new();
    let counts = match &predicate {
        Some(predicate) => evaluator.facet_counts(&facet, evaluator.filter(predicate, &records)?)?,
        None => evaluator.facet_counts(&facet, &records)?,
    };
    Ok(counts)
}

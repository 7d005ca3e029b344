//! Entry point tying the lexicon, lexer and parser together.

use tracing::debug;

use crate::{
    ast::{FacetExpression, Predicate},
    lexer::{Lexer, Lexicon},
    parser::{Error, Parser},
    schema::{AttributeTable, SchemaError},
};

/// Compiles search text into predicates and facet columns.
///
/// Holds only the attribute table and the patterns compiled from it, both
/// read-only after construction. One compiler can serve any number of
/// threads; every call gets its own lexer and parser.
///
/// # Examples
///
/// ```
/// use attrql::{CompareOp, Predicate, SearchCompiler};
///
/// let compiler = SearchCompiler::with_default_table().unwrap();
/// let predicate = compiler.parse("electrodes >= 32 and lab = 'Doe Lab'").unwrap();
///
/// assert_eq!(
///     predicate,
///     Predicate::and(
///         Predicate::compare("number_of_electrodes", CompareOp::Gte, 32),
///         Predicate::eq("lab", "Doe Lab"),
///     )
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SearchCompiler {
    lexicon: Lexicon,
}

impl SearchCompiler {
    pub fn new(table: AttributeTable) -> Result<Self, SchemaError> {
        Ok(SearchCompiler {
            lexicon: Lexicon::new(table)?,
        })
    }

    /// Compiler over the built-in dataset attribute table.
    pub fn with_default_table() -> Result<Self, SchemaError> {
        Self::new(AttributeTable::default())
    }

    pub fn table(&self) -> &AttributeTable {
        self.lexicon.table()
    }

    /// Lazily tokenize `text`. The stream ends after the first error.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> Lexer<'a> {
        Lexer::new(text, &self.lexicon)
    }

    /// Parse a filter expression into a predicate tree.
    pub fn parse(&self, text: &str) -> Result<Predicate, Error> {
        debug!(query = text, "parsing filter");
        let predicate = Parser::new(self.tokenize(text))?.parse();
        match &predicate {
            Ok(p) => debug!(predicate = %p, "parsed filter"),
            Err(e) => debug!(error = %e, "rejected filter"),
        }
        predicate
    }

    /// Parse a facet column reference.
    pub fn parse_facet(&self, text: &str) -> Result<FacetExpression, Error> {
        debug!(column = text, "parsing facet");
        let facet = Parser::new(self.tokenize(text))?.parse_facet();
        if let Err(e) = &facet {
            debug!(error = %e, "rejected facet");
        }
        facet
    }
}

//! Documentation content for attrql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Attributes,
    Facets,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "attributes" | "attribute" | "schema" => Some(Self::Attributes),
            "facets" | "facet" => Some(Self::Facets),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"ATTRQL DOCUMENTATION

attrql compiles attribute search expressions into filter predicates. A query
compares attributes with literals and combines the comparisons with and, or
and not.

DOCUMENTATION CATEGORIES

  syntax            Rules, literals, grouping and comments
  operators         Comparison, membership and logical operators
  attributes        Attribute names and the schema file format
  facets            Facet columns for grouped counts
  errors            What lexing and parsing errors report

QUICK REFERENCE

  lab = "Doe Lab"                     String equality (case-insensitive)
  electrodes >= 32                    Integer ordering
  keyword in ["cortex", "thalamus"]   Membership
  a and b, a or b, not a              Combinators
  (a or b) and c                      Grouping

Run 'attrql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Attributes) => Ok(ATTRIBUTES_DOC),
        Some(DocCategory::Facets) => Ok(FACETS_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

RULES
  A rule is an attribute, an operator and a literal:

    lab = "Doe Lab"
    electrodes > 16

LITERALS
  Strings     "double" or 'single' quoted, no escapes. Use the other quote
              character to embed one: 'say "hi"'
  Integers    Optional minus sign, then digits: 32, -4

CASE
  Keywords and attribute names ignore case: LAB = "x" AND NOT units < 3

GROUPING
  Parentheses override precedence and leave nothing behind in the result:

    (lab = "a" or lab = "b") and electrodes >= 32

COMMENTS
  '#' starts a comment that runs to the end of the line:

    lab = "a"   # only this lab
    and units > 0
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

COMPARISON
  =     Equal. Strings compare case-insensitively.
  !=    Not equal. Compiled as not (attr = value).
  >     Greater than       (integers only)
  >=    Greater or equal   (integers only)
  <     Less than          (integers only)
  <=    Less or equal      (integers only)

  A string after an ordering operator is a syntax error:
    lab > "x"           => parsing error

MEMBERSHIP
  attr in [v1, v2, ...]
    At least one value. Strings and integers may be mixed.

LOGICAL
  not   Negates the expression to its right
  and   Both sides hold
  or    Either side holds

PRECEDENCE (tightest first)
  not
  and
  or

  a or b and c          => a or (b and c)
  not a and b           => (not a) and b
  not not a             => not (not a)
"#;

const ATTRIBUTES_DOC: &str = r#"ATTRIBUTES

Every attribute in a query must appear in the attribute table; anything else
fails to tokenize. Each name maps to an internal field path, which is what
the compiled predicate refers to.

DEFAULT TABLE
  keyword         keywords__keyword
  lab             lab
  institution     institution
  doi             related_publications__doi
  experimenter    experimenter
  units           units
  electrodes      number_of_electrodes

  Run 'attrql attributes' to print the table in use.

FIELD PATHS
  '__' separates relation hops. keywords__keyword is the keyword field of
  every related keywords record.

SCHEMA FILES
  Pass --schema <file> to use another table:

    [[attribute]]
    name = "species"
    path = "species"

    [[attribute]]
    name = "tag"
    path = "tags__name"

  Names must be identifiers, unique ignoring case, and cannot be and, or,
  in or not.
"#;

const FACETS_DOC: &str = r#"FACETS

A facet column groups records and counts each group.

PLAIN COLUMN
  attrql facet lab --input records.json
    Counts records per lab. Records with no lab are not counted.

  Fields across relations fan out: a record with two keywords counts once
  under each.

RULE COLUMN
  attrql facet 'electrodes >= 32' --input records.json
    Counts records in two buckets, true and false.

FILTERING
  attrql facet lab --query 'units > 0' --input records.json
    Counts only records matching the query.

ORDER
  Largest count first, ties by value.
"#;

const ERRORS_DOC: &str = r#"ERRORS

Both kinds stop at the first problem and report its line and column.

TOKENIZING ERRORS
  Text that starts no token: an unknown attribute, a stray character, an
  unterminated string.

    bogus = 1           => Error tokenizing "bogus" at line 1, column 1
    lab = "x            => Error tokenizing ""x" at line 1, column 7

PARSING ERRORS
  Tokens in an order the grammar does not allow.

    lab and             => unexpected AND "and" at line 1, column 5
    lab = 1 and         => unexpected end of input

DEPTH LIMIT
  More than 256 nested 'not's or parentheses, or a chain of more than 256
  rules joined by and/or, is rejected: expression deeper than 256 levels.

Errors exit with status 1 and never print a partial result.
"#;

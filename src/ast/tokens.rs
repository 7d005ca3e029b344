use std::fmt;

use crate::lexer::Position;

/// Kind of a lexical token, carrying the resolved value where one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Operands
    /// Attribute name, already resolved to its internal field path
    ///
    /// # Examples
    /// ```text
    /// lab         // Attribute("lab")
    /// Electrodes  // Attribute("number_of_electrodes")
    /// doi         // Attribute("related_publications__doi")
    /// ```
    Attribute(String),

    /// String literal in single or double quotes, stored dequoted
    ///
    /// No escape sequences are recognised; everything between the quotes is
    /// taken verbatim.
    ///
    /// # Examples
    /// ```text
    /// "Doe Lab"
    /// 'cortex'
    /// ```
    String(String),

    /// Signed integer literal
    ///
    /// # Examples
    /// ```text
    /// 32
    /// -4
    /// ```
    Integer(i64),

    // Comparison
    /// Equality (`=`)
    Equal,

    /// Inequality (`!=`)
    NotEqual,

    /// Greater than (`>`)
    Greater,

    /// Greater than or equal (`>=`)
    GreaterEqual,

    /// Less than (`<`)
    Less,

    /// Less than or equal (`<=`)
    LessEqual,

    /// Membership (`in`)
    In,

    // Logical
    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Logical negation (word, not symbol)
    Not,

    // Delimiters
    /// Left bracket opening a value list
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma separating list values
    Comma,
}

impl TokenKind {
    /// Diagnostic name of the token kind
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Attribute(_) => "ATTRIBUTE",
            TokenKind::String(_) => "STRING",
            TokenKind::Integer(_) => "INTEGER",
            TokenKind::Equal => "EQUAL",
            TokenKind::NotEqual => "NOTEQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATEREQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESSEQUAL",
            TokenKind::In => "IN",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token produced by the lexer.
///
/// Tokens keep the raw lexeme as typed by the user next to the resolved
/// kind, so diagnostics can echo the input back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Attribute(path) => {
                write!(f, "{} {:?} -> {} at {}", self.kind, self.lexeme, path, self.position)
            }
            _ => write!(f, "{} {:?} at {}", self.kind, self.lexeme, self.position),
        }
    }
}

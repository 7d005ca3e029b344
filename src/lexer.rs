use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::ast::{Token, TokenKind};
use crate::schema::{AttributeTable, SchemaError};

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Position::new(0, 1, 1)
    }

    /// Position just past `text`, read from `self`.
    pub fn advance_str(self, text: &str) -> Self {
        text.chars().fold(self, |pos, ch| match ch {
            '\n' => Position::new(pos.offset + 1, pos.line + 1, 1),
            _ => Position::new(pos.offset + ch.len_utf8(), pos.line, pos.column + 1),
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Text that matches no token production.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// Nothing in the grammar starts with this text. `fragment` runs up to
    /// the next whitespace.
    #[error("Error tokenizing \"{fragment}\" at {position}")]
    UnexpectedInput { fragment: String, position: Position },

    /// Integer literal outside the signed 64-bit range
    #[error("Integer literal {lexeme} is out of range at {position}")]
    IntegerOverflow { lexeme: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedInput { position, .. } | LexError::IntegerOverflow { position, .. } => {
                *position
            }
        }
    }
}

/// Compiled lexing patterns for one attribute table.
///
/// Built once and shared by every lexer borrowing it; holds no per-call
/// state.
#[derive(Debug, Clone)]
pub struct Lexicon {
    table: AttributeTable,
    ignored: Regex,
    string: Regex,
    integer: Regex,
    operator: Regex,
    not: Regex,
    /// `None` when the table is empty
    attribute: Option<Regex>,
}

impl Lexicon {
    pub fn new(table: AttributeTable) -> Result<Self, SchemaError> {
        // Longest names first, so a name that prefixes another never wins.
        let mut names: Vec<&str> = table.names().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let attribute = if names.is_empty() {
            None
        } else {
            let alternation = names
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?i)^(?:{})\b", alternation))?)
        };

        Ok(Lexicon {
            ignored: Regex::new(r"^(?:\s+|#[^\n]*)+")?,
            string: Regex::new(r#"^(?:"[^"]*"|'[^']*')"#)?,
            integer: Regex::new(r"^-?[0-9]+")?,
            operator: Regex::new(r"(?i)^(?:!=|>=|<=|=|>|<|(?:in|and|or)\b)")?,
            not: Regex::new(r"(?i)^not\b")?,
            attribute,
            table,
        })
    }

    pub fn table(&self) -> &AttributeTable {
        &self.table
    }
}

fn operator_kind(lexeme: &str) -> Option<TokenKind> {
    let kind = match lexeme.to_ascii_lowercase().as_str() {
        "=" => TokenKind::Equal,
        "!=" => TokenKind::NotEqual,
        ">=" => TokenKind::GreaterEqual,
        ">" => TokenKind::Greater,
        "<=" => TokenKind::LessEqual,
        "<" => TokenKind::Less,
        "in" => TokenKind::In,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        _ => return None,
    };
    Some(kind)
}

fn literal_kind(ch: char) -> Option<TokenKind> {
    match ch {
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        ',' => Some(TokenKind::Comma),
        _ => None,
    }
}

/// Streams tokens out of one input string.
///
/// Stops at the first error: once an error has been returned, the lexer
/// yields nothing more.
pub struct Lexer<'a> {
    lexicon: &'a Lexicon,
    input: &'a str,
    position: Position,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, lexicon: &'a Lexicon) -> Self {
        Lexer {
            lexicon,
            input,
            position: Position::start(),
            finished: false,
        }
    }

    /// Position of the next unread character
    pub fn position(&self) -> Position {
        self.position
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    fn matched(&self, pattern: &Regex) -> Option<&'a str> {
        let rest = self.rest();
        pattern.find(rest).map(|m| &rest[..m.end()])
    }

    fn consume(&mut self, lexeme: &str) -> Position {
        let start = self.position;
        self.position = self.position.advance_str(lexeme);
        start
    }

    fn skip_ignored(&mut self) {
        let lexicon = self.lexicon;
        if let Some(ignored) = self.matched(&lexicon.ignored) {
            self.consume(ignored);
        }
    }

    fn fail(&mut self, error: LexError) -> Result<Option<Token>, LexError> {
        self.finished = true;
        Err(error)
    }

    /// Read the next token; `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.finished {
            return Ok(None);
        }

        let lexicon = self.lexicon;
        self.skip_ignored();

        let rest = self.rest();
        if rest.is_empty() {
            self.finished = true;
            return Ok(None);
        }

        let token = if let Some(lexeme) = self.matched(&lexicon.string) {
            // Both quote characters are one byte wide.
            let contents = &lexeme[1..lexeme.len() - 1];
            let position = self.consume(lexeme);
            Token::new(TokenKind::String(contents.to_string()), lexeme, position)
        } else if let Some(lexeme) = self.matched(&lexicon.integer) {
            let position = self.consume(lexeme);
            match lexeme.parse::<i64>() {
                Ok(n) => Token::new(TokenKind::Integer(n), lexeme, position),
                Err(_) => {
                    return self.fail(LexError::IntegerOverflow {
                        lexeme: lexeme.to_string(),
                        position,
                    });
                }
            }
        } else if let Some((lexeme, kind)) = self
            .matched(&lexicon.operator)
            .and_then(|lexeme| operator_kind(lexeme).map(|kind| (lexeme, kind)))
        {
            let position = self.consume(lexeme);
            Token::new(kind, lexeme, position)
        } else if let Some(lexeme) = self.matched(&lexicon.not) {
            let position = self.consume(lexeme);
            Token::new(TokenKind::Not, lexeme, position)
        } else if let Some((lexeme, path)) = lexicon
            .attribute
            .as_ref()
            .and_then(|pattern| self.matched(pattern))
            .and_then(|lexeme| lexicon.table.resolve(lexeme).map(|path| (lexeme, path)))
        {
            let position = self.consume(lexeme);
            Token::new(TokenKind::Attribute(path.to_string()), lexeme, position)
        } else if let Some((ch, kind)) = rest
            .chars()
            .next()
            .and_then(|ch| literal_kind(ch).map(|kind| (ch, kind)))
        {
            let lexeme = &rest[..ch.len_utf8()];
            let position = self.consume(lexeme);
            Token::new(kind, lexeme, position)
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            return self.fail(LexError::UnexpectedInput {
                fragment: rest[..end].to_string(),
                position: self.position,
            });
        };

        trace!(kind = token.kind.name(), lexeme = %token.lexeme, "token");
        Ok(Some(token))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[test]
fn test_keywords() {
    let lexicon = Lexicon::new(AttributeTable::default()).unwrap();
    let mut lexer = Lexer::new("and OR In not", &lexicon);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, TokenKind::And);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, TokenKind::Or);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, TokenKind::In);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, TokenKind::Not);
    assert_eq!(lexer.next_token().unwrap(), None);
}

#[test]
fn test_rule() {
    let lexicon = Lexicon::new(AttributeTable::default()).unwrap();
    let kinds: Vec<TokenKind> = Lexer::new("electrodes >= 32", &lexicon)
        .map(|t| t.unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Attribute("number_of_electrodes".to_string()),
            TokenKind::GreaterEqual,
            TokenKind::Integer(32),
        ]
    );
}

#[test]
fn test_fused_after_error() {
    let lexicon = Lexicon::new(AttributeTable::default()).unwrap();
    let mut lexer = Lexer::new("lab ~ lab", &lexicon);
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

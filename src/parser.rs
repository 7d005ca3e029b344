use crate::{
    ast::{CompareOp, FacetExpression, Predicate, Token, TokenKind},
    lexer::{LexError, Lexer, Position},
    value::Value,
};

/// A well-formed token sequence that matches no grammar production.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("parsing error: unexpected {kind} \"{lexeme}\" at {position}, expected {expected}")]
    UnexpectedToken {
        lexeme: String,
        kind: TokenKind,
        position: Position,
        expected: &'static str,
    },

    #[error("parsing error: unexpected end of input at {position}, expected {expected}")]
    UnexpectedEnd {
        position: Position,
        expected: &'static str,
    },

    /// Nesting or combinator chain deeper than [`MAX_DEPTH`]
    #[error("parsing error: expression deeper than {limit} levels at {position}")]
    TooDeep { position: Position, limit: usize },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEnd { position, .. }
            | ParseError::TooDeep { position, .. } => *position,
        }
    }
}

/// Deepest predicate tree a parse may build, and deepest nesting of `not`
/// and parentheses it may enter.
pub const MAX_DEPTH: usize = 256;

/// Failure of a single compile call. Either kind is terminal for the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn position(&self) -> Position {
        match self {
            Error::Lex(e) => e.position(),
            Error::Parse(e) => e.position(),
        }
    }
}

/// Predicate under construction with its tree depth.
struct Node {
    predicate: Predicate,
    depth: usize,
}

impl Node {
    fn leaf(predicate: Predicate) -> Self {
        let depth = predicate.depth();
        Node { predicate, depth }
    }
}

/// Shape of a rule, decided by its operator token.
enum RuleShape {
    Equality { negated: bool },
    Ordering(CompareOp),
    Membership,
}

/// Recursive-descent parser over a token stream with one token of lookahead.
///
/// Precedence, loosest first: `or`, `and`, `not`. `and` and `or` are
/// left-associative, `not` is right-associative.
///
/// Trees and nesting are bounded by [`MAX_DEPTH`]; deeper input fails with
/// [`ParseError::TooDeep`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
    /// Open `not` and `(` frames
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, Error> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<(), Error> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn current_kind(&self) -> Option<&TokenKind> {
        self.current.as_ref().map(|token| &token.kind)
    }

    /// Compare kinds by variant, ignoring any carried value.
    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind()
            .is_some_and(|current| std::mem::discriminant(current) == std::mem::discriminant(kind))
    }

    fn unexpected(&self, expected: &'static str) -> Error {
        let error = match &self.current {
            Some(token) => ParseError::UnexpectedToken {
                lexeme: token.lexeme.clone(),
                kind: token.kind.clone(),
                position: token.position,
                expected,
            },
            None => ParseError::UnexpectedEnd {
                position: self.lexer.position(),
                expected,
            },
        };
        error.into()
    }

    fn token_position(&self) -> Position {
        self.current
            .as_ref()
            .map_or_else(|| self.lexer.position(), |token| token.position)
    }

    fn too_deep(position: Position) -> Error {
        ParseError::TooDeep {
            position,
            limit: MAX_DEPTH,
        }
        .into()
    }

    /// Open one `not` or `(` frame.
    fn enter(&mut self) -> Result<(), Error> {
        if self.nesting >= MAX_DEPTH {
            return Err(Self::too_deep(self.token_position()));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn join(
        left: Node,
        right: Node,
        position: Position,
        build: fn(Predicate, Predicate) -> Predicate,
    ) -> Result<Node, Error> {
        let depth = left.depth.max(right.depth) + 1;
        if depth > MAX_DEPTH {
            return Err(Self::too_deep(position));
        }
        Ok(Node {
            predicate: build(left.predicate, right.predicate),
            depth,
        })
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), Error> {
        if !self.check(&kind) {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    fn expect_end(&mut self, expected: &'static str) -> Result<(), Error> {
        match self.current {
            None => Ok(()),
            Some(_) => Err(self.unexpected(expected)),
        }
    }

    fn parse_or(&mut self) -> Result<Node, Error> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            let position = self.token_position();
            self.advance()?;
            let right = self.parse_and()?;
            left = Self::join(left, right, position, Predicate::or)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node, Error> {
        let mut left = self.parse_unary()?;

        while self.check(&TokenKind::And) {
            let position = self.token_position();
            self.advance()?;
            let right = self.parse_unary()?;
            left = Self::join(left, right, position, Predicate::and)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, Error> {
        if self.check(&TokenKind::Not) {
            let position = self.token_position();
            self.enter()?;
            self.advance()?;
            let inner = self.parse_unary()?; // Right-associative
            self.leave();

            let depth = inner.depth + 1;
            if depth > MAX_DEPTH {
                return Err(Self::too_deep(position));
            }
            return Ok(Node {
                predicate: Predicate::negate(inner.predicate),
                depth,
            });
        }
        self.parse_primary()
    }

    /// Parse a parenthesised group or a single rule
    fn parse_primary(&mut self) -> Result<Node, Error> {
        if self.check(&TokenKind::LParen) {
            self.enter()?;
            self.advance()?;
            let inner = self.parse_or()?;
            self.expect(TokenKind::RParen, "')'")?;
            self.leave();
            return Ok(inner);
        }
        self.parse_rule().map(Node::leaf)
    }

    fn parse_attribute(&mut self, expected: &'static str) -> Result<String, Error> {
        let field = match self.current_kind() {
            Some(TokenKind::Attribute(path)) => path.clone(),
            _ => return Err(self.unexpected(expected)),
        };
        self.advance()?;
        Ok(field)
    }

    fn parse_rule(&mut self) -> Result<Predicate, Error> {
        let field = self.parse_attribute("an attribute, 'not' or '('")?;
        self.parse_rule_tail(field)
    }

    /// Everything in a rule after its attribute
    fn parse_rule_tail(&mut self, field: String) -> Result<Predicate, Error> {
        let shape = match self.current_kind() {
            Some(TokenKind::Equal) => RuleShape::Equality { negated: false },
            Some(TokenKind::NotEqual) => RuleShape::Equality { negated: true },
            Some(TokenKind::Greater) => RuleShape::Ordering(CompareOp::Gt),
            Some(TokenKind::GreaterEqual) => RuleShape::Ordering(CompareOp::Gte),
            Some(TokenKind::Less) => RuleShape::Ordering(CompareOp::Lt),
            Some(TokenKind::LessEqual) => RuleShape::Ordering(CompareOp::Lte),
            Some(TokenKind::In) => RuleShape::Membership,
            _ => return Err(self.unexpected("a comparison operator")),
        };
        self.advance()?;

        match shape {
            RuleShape::Equality { negated } => {
                let equal = Predicate::eq(field, self.parse_value()?);
                Ok(if negated { Predicate::negate(equal) } else { equal })
            }
            RuleShape::Ordering(op) => {
                let value = self.parse_integer()?;
                Ok(Predicate::compare(field, op, value))
            }
            RuleShape::Membership => {
                self.expect(TokenKind::LBracket, "'['")?;
                let values = self.parse_value_list()?;
                self.expect(TokenKind::RBracket, "',' or ']'")?;
                Ok(Predicate::membership(field, values))
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        let value = match self.current_kind() {
            Some(TokenKind::String(s)) => Value::String(s.clone()),
            Some(TokenKind::Integer(n)) => Value::Integer(*n),
            _ => return Err(self.unexpected("a string or integer")),
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_integer(&mut self) -> Result<i64, Error> {
        let n = match self.current_kind() {
            Some(TokenKind::Integer(n)) => *n,
            _ => return Err(self.unexpected("an integer")),
        };
        self.advance()?;
        Ok(n)
    }

    fn parse_value_list(&mut self) -> Result<Vec<Value>, Error> {
        let mut values = vec![self.parse_value()?];

        while self.check(&TokenKind::Comma) {
            self.advance()?;
            values.push(self.parse_value()?);
        }
        Ok(values)
    }

    pub fn parse_expression(&mut self) -> Result<Predicate, Error> {
        self.parse_or().map(|node| node.predicate)
    }

    /// Parse a complete filter; the whole input must be consumed.
    pub fn parse(&mut self) -> Result<Predicate, Error> {
        let predicate = self.parse_expression()?;
        self.expect_end("'and', 'or' or end of input")?;
        Ok(predicate)
    }

    /// Parse a complete facet column: one attribute, optionally as a rule.
    pub fn parse_facet(&mut self) -> Result<FacetExpression, Error> {
        let field = self.parse_attribute("an attribute")?;

        if self.current.is_none() {
            return Ok(FacetExpression::column(field));
        }

        let bucket = self.parse_rule_tail(field.clone())?;
        self.expect_end("end of input")?;
        Ok(FacetExpression::bucketed(field, bucket))
    }
}

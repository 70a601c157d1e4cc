use regex::bytes::Regex;

use crate::ast::*;
use crate::error::{Error, Result, SourceLocation};
use crate::lexer::{Token, TokenKind};

/// Query parser using recursive descent
///
/// Grammar, loosest binding first:
///
/// ```text
/// query     := or
/// or        := and ( '||' and )*
/// and       := unary ( '&&' unary )*
/// unary     := '-' unary | '(' query ')' | predicate
/// predicate := key ( cmp operand | '~' STR | 'in' '(' operand, ... ')' )
/// key       := WORD | INT            (INT addresses a field by position)
/// operand   := INT | FLOAT | STR | WORD | '-' (INT | FLOAT)
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse a complete query, consuming all tokens
    pub fn parse(&mut self) -> Result<Query> {
        let query = self.parse_or()?;

        if !self.is_at_end() {
            let loc = self.current_location();
            return Err(Error::parser(
                format!("unexpected {:?} after query", self.peek_kind()),
                loc.line,
                loc.column,
            ));
        }

        Ok(query)
    }

    fn parse_or(&mut self) -> Result<Query> {
        let mut left = self.parse_and()?;

        while self.match_token(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Query::Or(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Query> {
        let mut left = self.parse_unary()?;

        while self.match_token(&TokenKind::And) {
            let right = self.parse_unary()?;
            left = Query::And(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Query> {
        if self.match_token(&TokenKind::Minus) {
            let child = self.parse_unary()?;
            return Ok(Query::Not(Box::new(child)));
        }

        if self.match_token(&TokenKind::LeftParen) {
            let query = self.parse_or()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(query);
        }

        self.parse_predicate()
    }

    /// Parse a leaf predicate: comparison, regex match, or membership
    fn parse_predicate(&mut self) -> Result<Query> {
        let key = self.expect_key_ref()?;
        let loc = self.current_location();

        match self.peek_kind() {
            Some(k) if k.is_compare_op() => {
                let op = self.parse_compare_op()?;
                let operand = self.expect_operand()?;
                Ok(Query::Compare { key, op, operand })
            }
            Some(TokenKind::Match) => {
                self.advance();
                let pattern = self.expect_pattern()?;
                Ok(Query::Match { key, pattern })
            }
            Some(TokenKind::In) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;

                let mut set = vec![self.expect_operand()?];
                while self.match_token(&TokenKind::Comma) {
                    set.push(self.expect_operand()?);
                }
                self.expect(&TokenKind::RightParen)?;

                Ok(Query::In { key, set })
            }
            other => Err(Error::parser(
                format!("expected comparison, '~', or 'in', found {:?}", other),
                loc.line,
                loc.column,
            )),
        }
    }

    fn parse_compare_op(&mut self) -> Result<CompareOp> {
        let loc = self.current_location();
        let op = match self.peek_kind() {
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Ne) => CompareOp::Ne,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Le) => CompareOp::Le,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Ge) => CompareOp::Ge,
            other => {
                return Err(Error::parser(
                    format!("expected comparison operator, found {:?}", other),
                    loc.line,
                    loc.column,
                ));
            }
        };
        self.advance();
        Ok(op)
    }

    /// A field reference: a word names a key, an integer addresses a
    /// 0-based position.
    fn expect_key_ref(&mut self) -> Result<KeyRef> {
        let loc = self.current_location();
        match self.peek_kind() {
            Some(TokenKind::Word(name)) => {
                let name = name.clone();
                self.advance();
                Ok(KeyRef::Name(name))
            }
            Some(TokenKind::Int(n)) => {
                let n = *n;
                if n < 0 {
                    return Err(Error::parser(
                        format!("field position must be non-negative, found {}", n),
                        loc.line,
                        loc.column,
                    ));
                }
                self.advance();
                Ok(KeyRef::Position(n as usize))
            }
            other => Err(Error::parser(
                format!("expected field name or position, found {:?}", other),
                loc.line,
                loc.column,
            )),
        }
    }

    /// A literal operand. A bare word is a string literal (`level=error`);
    /// a leading '-' negates a numeric literal.
    fn expect_operand(&mut self) -> Result<Operand> {
        let loc = self.current_location();
        let operand = match self.peek_kind() {
            Some(TokenKind::Int(n)) => Operand::Int(*n),
            Some(TokenKind::Float(n)) => Operand::Float(*n),
            Some(TokenKind::Str(s)) => Operand::Str(s.clone()),
            Some(TokenKind::Word(w)) => Operand::Str(w.clone()),
            Some(TokenKind::Minus) => {
                self.advance();
                let loc = self.current_location();
                match self.peek_kind() {
                    Some(TokenKind::Int(n)) => {
                        let n = *n;
                        self.advance();
                        return Ok(Operand::Int(-n));
                    }
                    Some(TokenKind::Float(n)) => {
                        let n = *n;
                        self.advance();
                        return Ok(Operand::Float(-n));
                    }
                    other => {
                        return Err(Error::parser(
                            format!("expected numeric literal after '-', found {:?}", other),
                            loc.line,
                            loc.column,
                        ));
                    }
                }
            }
            other => {
                return Err(Error::parser(
                    format!("expected literal, found {:?}", other),
                    loc.line,
                    loc.column,
                ));
            }
        };
        self.advance();
        Ok(operand)
    }

    /// A quoted pattern after '~', compiled eagerly so matching never
    /// re-parses it. Unanchored: it matches anywhere within the value.
    fn expect_pattern(&mut self) -> Result<Regex> {
        let loc = self.current_location();
        match self.peek_kind() {
            Some(TokenKind::Str(pattern)) => {
                let pattern = pattern.clone();
                self.advance();
                Ok(Regex::new(&pattern)?)
            }
            other => Err(Error::parser(
                format!("expected quoted pattern after '~', found {:?}", other),
                loc.line,
                loc.column,
            )),
        }
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.current).map(|t| &t.kind)
    }

    fn current_location(&self) -> SourceLocation {
        self.tokens
            .get(self.current)
            .map(|t| t.location)
            .unwrap_or(SourceLocation::new(0, 0))
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), None | Some(TokenKind::Eof))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind()
            .map(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
            .unwrap_or(false)
    }

    fn advance(&mut self) -> Option<&Token> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens.get(self.current - 1)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token> {
        if self.check(kind) {
            // advance() cannot fail after a successful check
            Ok(self.advance().expect("token present"))
        } else {
            let loc = self.current_location();
            Err(Error::parser(
                format!("expected {:?}, found {:?}", kind, self.peek_kind()),
                loc.line,
                loc.column,
            ))
        }
    }
}

mod tokens;

pub use tokens::{keyword_to_token, Token, TokenKind};

use crate::error::{Error, Result};

/// Query lexer that tokenizes the query source string
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire query, returning all tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let estimated_tokens = self.source.len() / 4 + 1;
        let mut tokens = Vec::with_capacity(estimated_tokens.min(256));

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the next token from the query source
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let (line, col) = (self.line, self.column);

        let Some((_pos, ch)) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, line, col));
        };

        let token = match ch {
            // String literals
            '"' => self.scan_string()?,

            // Numbers
            '0'..='9' => self.scan_number()?,

            // Words and keywords
            'a'..='z' | 'A'..='Z' | '_' => self.scan_word()?,

            // Operators and delimiters
            '=' => {
                self.advance();
                Token::new(TokenKind::Eq, line, col)
            }
            '!' => {
                self.advance();
                if self.peek_char_is('=') {
                    self.advance();
                    Token::new(TokenKind::Ne, line, col)
                } else {
                    return Err(Error::lexer("unexpected '!', did you mean '!='?", line, col));
                }
            }
            '<' => {
                self.advance();
                if self.peek_char_is('=') {
                    self.advance();
                    Token::new(TokenKind::Le, line, col)
                } else {
                    Token::new(TokenKind::Lt, line, col)
                }
            }
            '>' => {
                self.advance();
                if self.peek_char_is('=') {
                    self.advance();
                    Token::new(TokenKind::Ge, line, col)
                } else {
                    Token::new(TokenKind::Gt, line, col)
                }
            }
            '&' => {
                self.advance();
                if self.peek_char_is('&') {
                    self.advance();
                    Token::new(TokenKind::And, line, col)
                } else {
                    return Err(Error::lexer("unexpected '&', did you mean '&&'?", line, col));
                }
            }
            '|' => {
                self.advance();
                if self.peek_char_is('|') {
                    self.advance();
                    Token::new(TokenKind::Or, line, col)
                } else {
                    return Err(Error::lexer("unexpected '|', did you mean '||'?", line, col));
                }
            }
            '~' => {
                self.advance();
                Token::new(TokenKind::Match, line, col)
            }
            '-' => {
                self.advance();
                Token::new(TokenKind::Minus, line, col)
            }
            '(' => {
                self.advance();
                Token::new(TokenKind::LeftParen, line, col)
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::RightParen, line, col)
            }
            ',' => {
                self.advance();
                Token::new(TokenKind::Comma, line, col)
            }

            _ => {
                return Err(Error::lexer(
                    format!("unexpected character '{}'", ch),
                    line,
                    col,
                ));
            }
        };

        Ok(token)
    }

    fn peek_char(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn peek_char_is(&mut self, expected: char) -> bool {
        self.chars.peek().map(|(_, c)| *c == expected).unwrap_or(false)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((_, ch)) = result {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, ' ' | '\t' | '\r' | '\n')) = self.peek_char() {
            self.advance();
        }
    }

    fn scan_string(&mut self) -> Result<Token> {
        let (line, col) = (self.line, self.column);
        self.advance(); // consume opening quote

        let mut value = String::new();

        loop {
            match self.advance() {
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.advance() {
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, c)) => {
                        return Err(Error::lexer(
                            format!("invalid escape sequence '\\{}'", c),
                            self.line,
                            self.column,
                        ));
                    }
                    None => {
                        return Err(Error::lexer("unterminated string", line, col));
                    }
                },
                Some((_, ch)) => value.push(ch),
                None => {
                    return Err(Error::lexer("unterminated string", line, col));
                }
            }
        }

        Ok(Token::new(TokenKind::Str(value), line, col))
    }

    fn scan_number(&mut self) -> Result<Token> {
        let (line, col) = (self.line, self.column);
        let start_pos = self.chars.peek().map(|(pos, _)| *pos).unwrap_or(0);
        let mut end_pos = start_pos;
        let mut is_float = false;

        // Integer part
        while let Some((pos, ch)) = self.peek_char() {
            if ch.is_ascii_digit() {
                end_pos = pos + 1;
                self.advance();
            } else {
                break;
            }
        }

        // Decimal part
        if self.peek_char_is('.') {
            is_float = true;
            self.advance();
            end_pos += 1;

            while let Some((pos, ch)) = self.peek_char() {
                if ch.is_ascii_digit() {
                    end_pos = pos + 1;
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // Exponent part
        if let Some((_, 'e' | 'E')) = self.peek_char() {
            is_float = true;
            self.advance();
            end_pos += 1;

            if let Some((_, '+' | '-')) = self.peek_char() {
                self.advance();
                end_pos += 1;
            }

            while let Some((pos, ch)) = self.peek_char() {
                if ch.is_ascii_digit() {
                    end_pos = pos + 1;
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let number_str = &self.source[start_pos..end_pos];

        if is_float {
            let value: f64 = number_str
                .parse()
                .map_err(|_| Error::number(number_str, line, col))?;
            if !value.is_finite() {
                return Err(Error::number(number_str, line, col));
            }
            Ok(Token::new(TokenKind::Float(value), line, col))
        } else {
            let value: i64 = number_str
                .parse()
                .map_err(|_| Error::number(number_str, line, col))?;
            Ok(Token::new(TokenKind::Int(value), line, col))
        }
    }

    fn scan_word(&mut self) -> Result<Token> {
        let (line, col) = (self.line, self.column);
        let start_pos = self.chars.peek().map(|(pos, _)| *pos).unwrap_or(0);
        let mut end_pos = start_pos;

        while let Some((pos, ch)) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '#' | '.' | '_') {
                end_pos = pos + 1;
                self.advance();
            } else {
                break;
            }
        }

        let word = &self.source[start_pos..end_pos];

        // Check if it's a keyword
        let kind = keyword_to_token(word).unwrap_or_else(|| TokenKind::Word(word.to_string()));

        Ok(Token::new(kind, line, col))
    }
}

use crate::error::SourceLocation;

/// All token types in the query language
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Word(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Keywords
    In, // in

    // Operators - Comparison
    Eq, // =
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=

    // Operators - Logical
    And,   // &&
    Or,    // ||
    Minus, // - (negation)

    // Operators - Regex
    Match, // ~

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // End of query
    Eof,
}

impl TokenKind {
    /// Check if this token can begin a predicate (a field reference)
    pub fn is_key_ref(&self) -> bool {
        matches!(self, TokenKind::Word(_) | TokenKind::Int(_))
    }

    /// Check if this token is a comparison operator
    pub fn is_compare_op(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge
        )
    }
}

/// A token with its location in the query source
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            location: SourceLocation::new(line, column),
        }
    }
}

/// Map keyword strings to token kinds
pub fn keyword_to_token(s: &str) -> Option<TokenKind> {
    match s {
        "in" => Some(TokenKind::In),
        _ => None,
    }
}

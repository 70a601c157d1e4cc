use std::fmt;
use thiserror::Error;

/// Location in query source for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// All error types for lineq
#[derive(Error, Debug)]
pub enum Error {
    #[error("lexer error at {location}: {message}")]
    Lexer {
        message: String,
        location: SourceLocation,
    },

    #[error("invalid numeric literal '{literal}' at {location}")]
    Number {
        literal: String,
        location: SourceLocation,
    },

    #[error("parser error at {location}: {message}")]
    Parser {
        message: String,
        location: SourceLocation,
    },

    /// Tokenizer error on an input line. Recoverable: the run loop reports
    /// the line on the diagnostic stream and moves on.
    #[error("record {record}, column {column}: {message}")]
    Line {
        message: String,
        record: usize,
        column: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn lexer(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Lexer {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    pub fn number(literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Number {
            literal: literal.into(),
            location: SourceLocation::new(line, column),
        }
    }

    pub fn parser(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parser {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    pub fn line(message: impl Into<String>, record: usize, column: usize) -> Self {
        Self::Line {
            message: message.into(),
            record,
            column,
        }
    }

    /// True for errors that spoil a single input line rather than the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Line { .. })
    }
}

/// Result type alias for lineq operations
pub type Result<T> = std::result::Result<T, Error>;

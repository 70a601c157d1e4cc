//! lineq - a streaming line filter with a small field query language
//!
//! Each input line is tokenized into fields: bare tokens, quoted strings,
//! numbers, and `key=value` pairs. A query (boolean combinators over
//! comparison, regex-match, and set-membership predicates) selects which
//! lines are written to the output, byte for byte as they were read.
//!
//! # Example
//!
//! ```
//! use lineq::{Filter, Lexer, Parser};
//!
//! // Compile a query once per run
//! let mut lexer = Lexer::new(r#"level=error && msg~"timeout""#);
//! let tokens = lexer.tokenize().unwrap();
//! let query = Parser::new(tokens).parse().unwrap();
//!
//! // Filter a stream against it
//! let input = "level=error msg=\"connection timeout\"\nlevel=info msg=ok\n";
//! let mut output = Vec::new();
//! let mut diagnostics = Vec::new();
//!
//! let mut filter = Filter::new(query);
//! let stats = filter
//!     .run(input.as_bytes(), &mut output, &mut diagnostics)
//!     .unwrap();
//!
//! assert_eq!(output, b"level=error msg=\"connection timeout\"\n");
//! assert_eq!(stats.matched, 1);
//! ```
//!
//! # Tokenizing a line by hand
//!
//! ```
//! use lineq::{Cursor, Tokenizer};
//!
//! let mut cursor = Cursor::new();
//! Tokenizer::new()
//!     .tokenize(b"level=error retries=3\n", 1, &mut cursor)
//!     .unwrap();
//!
//! let retries = cursor.find(b"retries").unwrap();
//! assert_eq!(cursor.value_bytes(retries), b"3");
//! ```

pub mod ast;
pub mod buffer;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod tokenizer;

pub use ast::{CompareOp, KeyRef, Operand, Query};
pub use buffer::{Buffer, Span};
pub use cursor::{Cursor, Field, Number, ValueType};
pub use error::{Error, Result, SourceLocation};
pub use filter::{Filter, Stats};
pub use lexer::{Lexer, Token, TokenKind};
pub use matcher::matches;
pub use parser::Parser;
pub use tokenizer::Tokenizer;

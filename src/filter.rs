use std::io::{BufRead, Write};

use crate::ast::Query;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::matcher;
use crate::tokenizer::Tokenizer;

/// Counters for one filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Lines read from the input
    pub records: usize,
    /// Lines written to the output
    pub matched: usize,
    /// Lines skipped because they failed to tokenize
    pub malformed: usize,
}

/// The line-at-a-time filtering runtime
///
/// Owns the compiled query, the tokenizer configuration, and one cursor
/// reused across all lines of the stream.
pub struct Filter {
    query: Query,
    tokenizer: Tokenizer,
    cursor: Cursor,
}

impl Filter {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            tokenizer: Tokenizer::new(),
            cursor: Cursor::with_capacity(4096),
        }
    }

    pub fn with_tokenizer(query: Query, tokenizer: Tokenizer) -> Self {
        Self {
            query,
            tokenizer,
            cursor: Cursor::with_capacity(4096),
        }
    }

    /// Set the field delimiter (the `-F` option).
    pub fn set_field_delim(&mut self, delim: u8) {
        self.tokenizer.set_field_delim(delim);
    }

    /// Filter `input` into `output`.
    ///
    /// Matched lines are written byte for byte as read, including their
    /// line delimiter (a final line without one is written without one).
    /// A line that fails to tokenize is reported on `diagnostics` and
    /// skipped; only I/O errors abort the run.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
        diagnostics: &mut E,
    ) -> Result<Stats> {
        let mut stats = Stats::default();
        let mut line: Vec<u8> = Vec::with_capacity(4096);
        let delim = self.tokenizer.line_delim();

        loop {
            line.clear();
            let bytes_read = input.read_until(delim, &mut line)?;
            if bytes_read == 0 {
                break; // EOF
            }

            stats.records += 1;

            match self.tokenizer.tokenize(&line, stats.records, &mut self.cursor) {
                Ok(()) => {
                    if matcher::matches(&self.query, &self.cursor) {
                        output.write_all(&line)?;
                        stats.matched += 1;
                    }
                }
                Err(err) => {
                    // Malformed lines are excluded from output but never
                    // abort the stream.
                    writeln!(diagnostics, "lineq: skipping {}", err)?;
                    stats.malformed += 1;
                }
            }
        }

        output.flush()?;
        Ok(stats)
    }
}

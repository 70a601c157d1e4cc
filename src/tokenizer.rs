use crate::buffer::Span;
use crate::cursor::{Cursor, Field, Number, ValueType};
use crate::error::{Error, Result};

/// Default field delimiter
pub const DEFAULT_FIELD_DELIM: u8 = b' ';
/// Default line delimiter
pub const DEFAULT_LINE_DELIM: u8 = b'\n';

/// Line tokenizer: scans one line's bytes into a [`Cursor`].
///
/// A byte state machine over whitespace-separated fields: bare words,
/// numbers, quoted strings, and `key=value` pairs. Only byte spans are
/// written into the cursor, never copies, so re-tokenizing every line of a
/// stream stays cheap.
pub struct Tokenizer {
    field_delim: u8,
    line_delim: u8,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            field_delim: DEFAULT_FIELD_DELIM,
            line_delim: DEFAULT_LINE_DELIM,
        }
    }

    pub fn with_delims(field_delim: u8, line_delim: u8) -> Self {
        Self {
            field_delim,
            line_delim,
        }
    }

    /// Set the field delimiter (the `-F` option).
    pub fn set_field_delim(&mut self, delim: u8) {
        self.field_delim = delim;
    }

    pub fn field_delim(&self) -> u8 {
        self.field_delim
    }

    pub fn line_delim(&self) -> u8 {
        self.line_delim
    }

    /// Tokenize one line into `cursor`, resetting it first.
    ///
    /// `line` is the raw bytes of a single line; a trailing line delimiter
    /// is tolerated (and kept in the cursor's buffer for verbatim output)
    /// but never becomes part of a field. `record` is the 1-based input
    /// record number, used only for error context.
    pub fn tokenize(&self, line: &[u8], record: usize, cursor: &mut Cursor) -> Result<()> {
        cursor.reset();
        cursor.buffer_mut().extend(line);

        let mut scan = Scan {
            bytes: line,
            pos: 0,
            field_delim: self.field_delim,
            line_delim: self.line_delim,
            pending_key: None,
            record,
        };
        scan.run(cursor)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-line scanning state. Spans are indices into `bytes`, which the
/// caller has already copied into the cursor's buffer at the same offsets.
struct Scan<'a> {
    bytes: &'a [u8],
    pos: usize,
    field_delim: u8,
    line_delim: u8,
    /// Open key span after `word=`, attached to the next committed field.
    pending_key: Option<Span>,
    record: usize,
}

impl Scan<'_> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    fn is_delim(&self, c: u8) -> bool {
        c == self.field_delim || c == self.line_delim
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::line(message, self.record, self.pos + 1)
    }

    /// A `key=` immediately followed by a delimiter has no value half; the
    /// key is demoted to a positional String field covering the key text.
    fn flush_pending_key(&mut self, cursor: &mut Cursor) {
        if let Some(key) = self.pending_key.take() {
            cursor.push(Field::string(None, key));
        }
    }

    /// The dispatch state: decide what the next field is and scan it.
    fn run(&mut self, cursor: &mut Cursor) -> Result<()> {
        loop {
            let Some(c) = self.peek() else {
                self.flush_pending_key(cursor);
                return Ok(());
            };

            if c == self.line_delim {
                self.flush_pending_key(cursor);
                self.advance();
                return Ok(());
            }

            if c == self.field_delim {
                // Runs of delimiters yield no fields.
                self.flush_pending_key(cursor);
                self.advance();
                continue;
            }

            match c {
                b'0'..=b'9' | b'+' | b'-' | b'.' => self.numeric(cursor)?,
                b'"' => self.quoted(cursor)?,
                c if c.is_ascii_alphabetic() || c == b'_' => self.word(cursor)?,
                _ => self.extra(cursor, self.pos)?,
            }
        }
    }

    /// Word state: a candidate key, or the value half of an open pair.
    fn word(&mut self, cursor: &mut Cursor) -> Result<()> {
        let start = self.pos;
        self.advance();

        loop {
            match self.peek() {
                None => {
                    self.commit_string(cursor, start, self.pos);
                    return Ok(());
                }
                Some(c) if self.is_delim(c) => {
                    self.commit_string(cursor, start, self.pos);
                    return Ok(());
                }
                Some(b'=') if self.pending_key.is_none() => {
                    self.pending_key = Some(Span::new(start, self.pos - start));
                    self.advance();
                    return Ok(());
                }
                Some(c) if is_word_byte(c) => self.advance(),
                // Not a key after all; the accumulated prefix starts a
                // plain String value.
                Some(_) => return self.extra(cursor, start),
            }
        }
    }

    /// Numeric state: Integer unless a decimal point or exponent was seen.
    fn numeric(&mut self, cursor: &mut Cursor) -> Result<()> {
        let start = self.pos;
        let mut saw_float = self.peek() == Some(b'.');
        self.advance();

        loop {
            match self.peek() {
                None => break,
                Some(c) if self.is_delim(c) => break,
                Some(b'.') if !saw_float => {
                    saw_float = true;
                    self.advance();
                }
                Some(b'e' | b'E') => {
                    saw_float = true;
                    self.advance();
                }
                Some(c) if c.is_ascii_digit() || c == b'+' || c == b'-' => self.advance(),
                // Not a number after all; re-classify from the same offset,
                // keeping any pending key.
                Some(_) => return self.extra(cursor, start),
            }
        }

        self.commit_numeric(cursor, start, self.pos, saw_float);
        Ok(())
    }

    /// Quoted state: raw bytes between double quotes. Only `\\` and `\"`
    /// are valid escapes; the committed span excludes the quotes but keeps
    /// escape sequences as written.
    fn quoted(&mut self, cursor: &mut Cursor) -> Result<()> {
        self.advance(); // opening quote
        let start = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.err("unterminated quoted string")),
                Some(c) if c == self.line_delim => {
                    return Err(self.err("unterminated quoted string"));
                }
                Some(b'\\') => {
                    self.advance();
                    match self.peek() {
                        Some(b'\\' | b'"') => self.advance(),
                        Some(c) => {
                            return Err(
                                self.err(format!("invalid escape sequence '\\{}'", c as char))
                            );
                        }
                        None => return Err(self.err("unterminated quoted string")),
                    }
                }
                Some(b'"') => {
                    self.commit_string(cursor, start, self.pos);
                    self.advance(); // closing quote
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Catch-all state: accumulate until a delimiter, commit as String.
    fn extra(&mut self, cursor: &mut Cursor, start: usize) -> Result<()> {
        loop {
            match self.peek() {
                None => break,
                Some(c) if self.is_delim(c) => break,
                Some(_) => self.advance(),
            }
        }
        self.commit_string(cursor, start, self.pos);
        Ok(())
    }

    fn commit_string(&mut self, cursor: &mut Cursor, start: usize, end: usize) {
        let key = self.pending_key.take();
        cursor.push(Field::string(key, Span::new(start, end - start)));
    }

    /// Commit a numeric field, parsing and caching its value once. Text
    /// that fails to parse is committed as a plain String field instead;
    /// data lines never raise numeric errors.
    fn commit_numeric(&mut self, cursor: &mut Cursor, start: usize, end: usize, saw_float: bool) {
        let key = self.pending_key.take();
        let span = Span::new(start, end - start);
        // The numeric alphabet is pure ASCII, so this cannot fail.
        let text = std::str::from_utf8(&self.bytes[start..end]).unwrap_or("");

        if !saw_float {
            if let Ok(n) = text.parse::<i64>() {
                cursor.push(Field::numeric(key, span, ValueType::Integer, Number::Int(n)));
                return;
            }
        }
        // Float-marked text, or an integer too large for i64.
        if let Ok(f) = text.parse::<f64>() {
            cursor.push(Field::numeric(key, span, ValueType::Float, Number::Float(f)));
        } else {
            cursor.push(Field::string(key, span));
        }
    }
}

#[inline]
fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'#' | b'.' | b'_' | b'-')
}

use crate::buffer::{Buffer, Span};

/// Inferred type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    String,
}

/// Cached parsed numeric value for Integer/Float fields, filled when the
/// tokenizer commits the field so evaluation never re-parses the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

/// One parsed field ("bit") of the current line.
///
/// Spans index into the owning cursor's buffer. `key` is `None` for a
/// positional field; `value` always names the value text (zero-length only
/// for an explicitly empty quoted value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub key: Option<Span>,
    pub value: Span,
    pub value_type: ValueType,
    pub number: Option<Number>,
}

impl Field {
    pub fn string(key: Option<Span>, value: Span) -> Self {
        Self {
            key,
            value,
            value_type: ValueType::String,
            number: None,
        }
    }

    pub fn numeric(key: Option<Span>, value: Span, value_type: ValueType, number: Number) -> Self {
        Self {
            key,
            value,
            value_type,
            number: Some(number),
        }
    }
}

/// The current line: its raw bytes plus the ordered fields parsed from it.
///
/// One cursor is created per filtering run and soft-reset before each line,
/// so the buffer and field storage amortize across the whole stream.
#[derive(Debug, Default)]
pub struct Cursor {
    buffer: Buffer,
    fields: Vec<Field>,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            buffer: Buffer::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Buffer::with_capacity(capacity),
            fields: Vec::new(),
        }
    }

    /// Soft reset: drop the fields and rewind the buffer, keep allocations.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.fields.clear();
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// First field whose key bytes equal `name`, in line order.
    pub fn find(&self, name: &[u8]) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.key.is_some_and(|k| self.buffer.slice(k) == name))
    }

    /// Field by 0-based position of appearance on the line.
    pub fn get(&self, position: usize) -> Option<&Field> {
        self.fields.get(position)
    }

    pub fn key_bytes(&self, field: &Field) -> Option<&[u8]> {
        field.key.map(|k| self.buffer.slice(k))
    }

    pub fn value_bytes(&self, field: &Field) -> &[u8] {
        self.buffer.slice(field.value)
    }

    /// The raw line bytes as read, including the line delimiter if the
    /// input carried one. Written verbatim when the line matches.
    pub fn line_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

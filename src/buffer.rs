/// Append-only byte buffer reused across input lines.
///
/// Growth is amortized doubling (delegated to `Vec`). Callers hold
/// `(start, len)` spans into the buffer and resolve them through
/// [`Buffer::slice`] at read time; spans stay valid until [`Buffer::reset`]
/// even though growth may move the backing storage.
#[derive(Debug)]
pub struct Buffer {
    bytes: Vec<u8>,
}

/// A byte range into a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn append(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Resolve a span against the current contents.
    #[inline]
    pub fn slice(&self, span: Span) -> &[u8] {
        &self.bytes[span.start..span.start + span.len]
    }

    /// Soft reset: logical length back to zero, capacity retained.
    #[inline]
    pub fn reset(&mut self) {
        self.bytes.clear();
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

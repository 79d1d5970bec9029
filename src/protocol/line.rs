//! Fixed-capacity line buffer.
//!
//! Handshake lines are assembled in place on the stack. A line that does not
//! fit is truncated: the first `N` bytes are kept and the rest are dropped.
//! The same buffer formats outgoing request lines, with the same truncation.

use std::fmt;

/// Capacity of request and response line buffers, in bytes.
pub const LINE_CAPACITY: usize = 128;

/// A line of at most `N` bytes, reused across lines.
#[derive(Clone)]
pub struct LineBuffer<const N: usize = LINE_CAPACITY> {
    buf: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            truncated: false,
        }
    }

    /// Append one byte. Returns `false` if the byte was dropped.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len < N {
            self.buf[self.len] = byte;
            self.len += 1;
            true
        } else {
            self.truncated = true;
            false
        }
    }

    /// Append as many bytes as fit.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let room = N - self.len;
        let take = bytes.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&bytes[..take]);
        self.len += take;
        if take < bytes.len() {
            self.truncated = true;
        }
    }

    /// Cut the line at the first `\r` or `\n`, if any.
    pub fn strip_line_ending(&mut self) {
        if let Some(pos) = self.as_bytes().iter().position(|&b| b == b'\r' || b == b'\n') {
            self.len = pos;
        }
    }

    /// Forget the current line.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }

    /// Bytes currently held.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Number of bytes currently held.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any byte was dropped since the last [`clear`](Self::clear).
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Maximum number of bytes held.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Split the line into a header name and its first value token.
    ///
    /// The name runs up to the first `:`. At most one space after the colon
    /// is skipped, and the token then runs up to the next space. A line
    /// without a colon yields the whole line as name and an empty token.
    #[must_use]
    pub fn header(&self) -> (&[u8], &[u8]) {
        let line = self.as_bytes();
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return (line, &[]);
        };
        let name = &line[..colon];
        let mut rest = &line[colon + 1..];
        if let [b' ', tail @ ..] = rest {
            rest = tail;
        }
        let end = rest.iter().position(|&b| b == b' ').unwrap_or(rest.len());
        (name, &rest[..end])
    }
}

impl<const N: usize> fmt::Write for LineBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for LineBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("line", &String::from_utf8_lossy(self.as_bytes()))
            .field("truncated", &self.truncated)
            .finish()
    }
}

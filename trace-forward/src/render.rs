//! Bounded message rendering
//!
//! Trace messages are rendered into a fixed stack buffer of
//! [`TRACE_BUFFER_CAPACITY`] bytes, one of which is reserved for the NUL
//! terminator handed to C observers. Output past the capacity is dropped
//! silently, always on a UTF-8 character boundary.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt::{self, Write};

/// Capacity of the render buffer in bytes, terminator included
pub const TRACE_BUFFER_CAPACITY: usize = 1024;

/// Longest message that survives rendering
pub const MAX_MESSAGE_LEN: usize = TRACE_BUFFER_CAPACITY - 1;

/// Fixed-capacity text buffer that truncates instead of growing
pub struct TraceBuffer {
    bytes: [u8; TRACE_BUFFER_CAPACITY],
    len: usize,
    truncated: bool,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0; TRACE_BUFFER_CAPACITY],
            len: 0,
            truncated: false,
        }
    }

    /// Render `args` into a fresh buffer
    pub fn render(args: fmt::Arguments<'_>) -> Self {
        let mut buffer = Self::new();
        // A full buffer stops formatting early with fmt::Error; that is the
        // truncation path, not a failure.
        let _ = buffer.write_fmt(args);
        buffer
    }

    pub fn as_str(&self) -> &str {
        // Only whole characters are ever copied in
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any output was dropped
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// NUL-terminated view of the contents
    ///
    /// An interior NUL ends the string early, as it would for any C reader.
    pub fn as_c_str(&mut self) -> &CStr {
        self.bytes[self.len] = 0;
        match CStr::from_bytes_until_nul(&self.bytes[..=self.len]) {
            Ok(text) => text,
            Err(_) => c"",
        }
    }

    fn remaining(&self) -> usize {
        MAX_MESSAGE_LEN - self.len
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for TraceBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Err(fmt::Error);
        }

        let mut take = s.len().min(self.remaining());
        while !s.is_char_boundary(take) {
            take -= 1;
        }

        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;

        if take < s.len() {
            self.truncated = true;
            return Err(fmt::Error);
        }
        Ok(())
    }
}

impl fmt::Debug for TraceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceBuffer")
            .field("text", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}

/// Decode bytes rendered by the C shim
///
/// `vsnprintf` truncates on a byte boundary, so a multi-byte character may be
/// cut at the end; that partial tail is dropped. Any other invalid sequence is
/// replaced lossily.
pub(crate) fn decode_native(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) if e.error_len().is_none() => String::from_utf8_lossy(&bytes[..e.valid_up_to()]),
        Err(_) => String::from_utf8_lossy(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_short() {
        let buffer = TraceBuffer::render(format_args!("hello {}", "world"));
        assert_eq!(buffer.as_str(), "hello world");
        assert!(!buffer.is_truncated());
    }

    #[test]
    fn test_render_exact_fit() {
        let text = "a".repeat(MAX_MESSAGE_LEN);
        let buffer = TraceBuffer::render(format_args!("{text}"));
        assert_eq!(buffer.len(), MAX_MESSAGE_LEN);
        assert!(!buffer.is_truncated());
    }

    #[test]
    fn test_render_truncates() {
        let buffer = TraceBuffer::render(format_args!("{:>2000}", 7));
        assert_eq!(buffer.len(), MAX_MESSAGE_LEN);
        assert!(buffer.is_truncated());
        assert!(buffer.as_str().chars().all(|c| c == ' '));
    }

    #[test]
    fn test_truncation_keeps_char_boundary() {
        // 'é' is two bytes, so 1023 bytes cannot be filled exactly
        let text = "é".repeat(600);
        let buffer = TraceBuffer::render(format_args!("{text}"));
        assert_eq!(buffer.len(), 1022);
        assert!(text.starts_with(buffer.as_str()));
        assert!(buffer.is_truncated());
    }

    #[test]
    fn test_truncation_across_writes() {
        let chunk = "x".repeat(500);
        let buffer = TraceBuffer::render(format_args!("{chunk}|{chunk}|{chunk}"));
        let full = format!("{chunk}|{chunk}|{chunk}");
        assert_eq!(buffer.as_str(), &full[..MAX_MESSAGE_LEN]);
    }

    #[test]
    fn test_as_c_str() {
        let mut buffer = TraceBuffer::render(format_args!("INFO: {}", 42));
        assert_eq!(buffer.as_c_str().to_bytes(), b"INFO: 42");

        let mut full = TraceBuffer::render(format_args!("{}", "z".repeat(4096)));
        assert_eq!(full.as_c_str().to_bytes().len(), MAX_MESSAGE_LEN);

        let mut nul = TraceBuffer::render(format_args!("before\0after"));
        assert_eq!(nul.as_c_str().to_bytes(), b"before");
    }

    #[test]
    fn test_decode_native() {
        assert_eq!(decode_native(b"plain"), "plain");

        // "é" cut after its first byte
        assert_eq!(decode_native(b"caf\xc3"), "caf");

        assert_eq!(decode_native(b"bad\xffbyte"), "bad\u{FFFD}byte");
    }
}

//! Output buffer with escaping helpers.
//!
//! Every output format writes into one growable byte buffer. Input slices
//! are valid UTF-8 and only ever split at ASCII bytes, so the buffer stays
//! valid UTF-8 as well.

use crate::escape;
use crate::Range;

/// Output writer with a pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use mkdown::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.open_tag("p");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.close_tag("p");
///
/// assert_eq!(writer.into_string(), "<p>Hello &lt;World&gt;</p>");
/// ```
#[derive(Debug)]
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create with capacity based on the input size.
    ///
    /// Rendered HTML is typically about 1.25x the Markdown source.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        let capacity = input_len + input_len / 4;
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes without escaping.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Write a static string.
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Write text with HTML escaping.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write escaped text from a range of the input.
    #[inline]
    pub fn write_escaped_range(&mut self, input: &[u8], range: Range) {
        escape::escape_text_into(&mut self.out, range.slice(input));
    }

    /// Write an attribute value, escaping quotes too.
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &[u8]) {
        escape::escape_attr_into(&mut self.out, attr);
    }

    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Write a newline unless the buffer is empty or already ends in one.
    #[inline]
    pub fn ensure_newline(&mut self) {
        if self.out.last().is_some_and(|&b| b != b'\n') {
            self.out.push(b'\n');
        }
    }

    /// Write `level` two-space indents.
    pub fn write_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.extend_from_slice(b"  ");
        }
    }

    /// Write opening tag: `<tagname>`
    #[inline]
    pub fn open_tag(&mut self, tag: &'static str) {
        self.out.push(b'<');
        self.out.extend_from_slice(tag.as_bytes());
        self.out.push(b'>');
    }

    /// Write closing tag: `</tagname>`
    #[inline]
    pub fn close_tag(&mut self, tag: &'static str) {
        self.out.extend_from_slice(b"</");
        self.out.extend_from_slice(tag.as_bytes());
        self.out.push(b'>');
    }

    /// Take ownership of the output as a `String`.
    pub fn into_string(self) -> String {
        String::from_utf8(self.out)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }
}

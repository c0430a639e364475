//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for the first escapable byte with memchr,
//! then bulk-copies the segments between escapes.

use memchr::{memchr, memchr3};

/// Lookup table for bytes escaped in text content.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Lookup table for bytes escaped in attribute values.
const ATTR_ESCAPE_TABLE: [bool; 256] = {
    let mut table = TEXT_ESCAPE_TABLE;
    table[b'\'' as usize] = true;
    table
};

/// Longest entity name we accept (`&CounterClockwiseContourIntegral;`).
const MAX_ENTITY_LEN: usize = 34;

/// Escape HTML text content into an output buffer.
///
/// # Example
/// ```
/// use mkdown::escape::escape_text_into;
///
/// let mut out = Vec::new();
/// escape_text_into(&mut out, b"<b> & \"q\"");
/// assert_eq!(out, b"&lt;b&gt; &amp; &quot;q&quot;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut Vec<u8>, input: &[u8]) {
    escape_with_table(out, input, &TEXT_ESCAPE_TABLE, false);
}

/// Escape text, passing `&` through when it starts a valid entity.
///
/// Rendering `AT&amp;T` yields `AT&amp;T` rather than `AT&amp;amp;T`, so
/// authors who already typed entities see them unchanged.
///
/// # Example
/// ```
/// use mkdown::escape::escape_text_keep_entities_into;
///
/// let mut out = Vec::new();
/// escape_text_keep_entities_into(&mut out, b"Fish &amp; Chips & Peas");
/// assert_eq!(out, b"Fish &amp; Chips &amp; Peas");
/// ```
#[inline]
pub fn escape_text_keep_entities_into(out: &mut Vec<u8>, input: &[u8]) {
    escape_with_table(out, input, &TEXT_ESCAPE_TABLE, true);
}

/// Escape an attribute value (also escapes `'`).
#[inline]
pub fn escape_attr_into(out: &mut Vec<u8>, input: &[u8]) {
    escape_with_table(out, input, &ATTR_ESCAPE_TABLE, false);
}

fn escape_with_table(out: &mut Vec<u8>, input: &[u8], table: &[bool; 256], keep_entities: bool) {
    let mut pos = match first_escape(input) {
        Some(p) => p,
        None => {
            out.extend_from_slice(input);
            return;
        }
    };
    out.extend_from_slice(&input[..pos]);

    while pos < input.len() {
        let scan_start = pos;
        while pos < input.len() && !table[input[pos] as usize] {
            pos += 1;
        }
        out.extend_from_slice(&input[scan_start..pos]);

        if pos < input.len() {
            match input[pos] {
                b'<' => out.extend_from_slice(b"&lt;"),
                b'>' => out.extend_from_slice(b"&gt;"),
                b'"' => out.extend_from_slice(b"&quot;"),
                b'\'' => out.extend_from_slice(b"&#39;"),
                b'&' => {
                    if keep_entities {
                        if let Some(len) = entity_len(&input[pos..]) {
                            out.extend_from_slice(&input[pos..pos + len]);
                            pos += len;
                            continue;
                        }
                    }
                    out.extend_from_slice(b"&amp;");
                }
                other => out.push(other),
            }
            pos += 1;
        }
    }
}

#[inline]
fn first_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr(b'"', input);
    let c = memchr(b'\'', input);
    [a, b, c].into_iter().flatten().min()
}

/// Length of the entity reference at the start of `input`, if any.
///
/// Accepts `&#123;`, `&#x1F4A9;` and named references known to the HTML
/// entity table.
pub fn entity_len(input: &[u8]) -> Option<usize> {
    if input.first() != Some(&b'&') {
        return None;
    }
    let semi = memchr(b';', &input[..input.len().min(MAX_ENTITY_LEN + 2)])?;
    let body = &input[1..semi];
    if body.is_empty() {
        return None;
    }

    let valid = if let Some(num) = body.strip_prefix(b"#") {
        match num.first() {
            Some(b'x') | Some(b'X') => {
                num.len() > 1 && num.len() <= 7 && num[1..].iter().all(u8::is_ascii_hexdigit)
            }
            _ => !num.is_empty() && num.len() <= 7 && num.iter().all(u8::is_ascii_digit),
        }
    } else if body.iter().all(u8::is_ascii_alphanumeric) && body[0].is_ascii_alphabetic() {
        // Named reference: valid if the entity table knows it.
        let candidate = std::str::from_utf8(&input[..=semi]).ok()?;
        html_escape::decode_html_entities(candidate) != candidate
    } else {
        false
    };

    valid.then_some(semi + 1)
}

/// Characters that can be backslash-escaped in Markdown.
#[inline]
pub fn is_ascii_punctuation(b: u8) -> bool {
    matches!(b,
        b'!' | b'"' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'(' | b')' |
        b'*' | b'+' | b',' | b'-' | b'.' | b'/' | b':' | b';' | b'<' |
        b'=' | b'>' | b'?' | b'@' | b'[' | b'\\' | b']' | b'^' | b'_' |
        b'`' | b'{' | b'|' | b'}' | b'~'
    )
}

/// Escape a link destination for an `href` attribute.
///
/// Spaces, quotes, control bytes and non-ASCII bytes are percent-encoded;
/// `&` is kept when it already starts an entity.
pub fn escape_url_into(out: &mut Vec<u8>, input: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut pos = 0;
    while pos < input.len() {
        let b = input[pos];
        match b {
            b' ' => out.extend_from_slice(b"%20"),
            b'"' => out.extend_from_slice(b"%22"),
            b'\\' => out.extend_from_slice(b"%5C"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'\'' => out.extend_from_slice(b"&#39;"),
            b'&' => match entity_len(&input[pos..]) {
                Some(len) => {
                    out.extend_from_slice(&input[pos..pos + len]);
                    pos += len;
                    continue;
                }
                None => out.extend_from_slice(b"&amp;"),
            },
            0x00..=0x1F | 0x7F..=0xFF => {
                out.push(b'%');
                out.push(HEX[(b >> 4) as usize]);
                out.push(HEX[(b & 0xF) as usize]);
            }
            _ => out.push(b),
        }
        pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(input: &str) -> String {
        let mut out = Vec::new();
        escape_text_into(&mut out, input.as_bytes());
        String::from_utf8(out).unwrap()
    }

    fn keep(input: &str) -> String {
        let mut out = Vec::new();
        escape_text_keep_entities_into(&mut out, input.as_bytes());
        String::from_utf8(out).unwrap()
    }

    fn url(input: &str) -> String {
        let mut out = Vec::new();
        escape_url_into(&mut out, input.as_bytes());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escape_no_special() {
        assert_eq!(text("plain words"), "plain words");
    }

    #[test]
    fn test_escape_all_text_chars() {
        assert_eq!(text("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_escape_attr_quotes() {
        let mut out = Vec::new();
        escape_attr_into(&mut out, b"it's");
        assert_eq!(out, b"it&#39;s");
    }

    #[test]
    fn test_keep_entities() {
        assert_eq!(keep("&amp; &copy; &#169; &#xA9;"), "&amp; &copy; &#169; &#xA9;");
        assert_eq!(keep("& &; &nosuchthing; &#xZZ;"), "&amp; &amp;; &amp;nosuchthing; &amp;#xZZ;");
    }

    #[test]
    fn test_keep_entities_is_idempotent_on_output() {
        let once = keep("Tom & Jerry <3");
        assert_eq!(once, "Tom &amp; Jerry &lt;3");
        assert_eq!(keep(&once), once);
    }

    #[test]
    fn test_entity_len() {
        assert_eq!(entity_len(b"&amp;rest"), Some(5));
        assert_eq!(entity_len(b"&#12;"), Some(5));
        assert_eq!(entity_len(b"&#x;"), None);
        assert_eq!(entity_len(b"& amp;"), None);
        assert_eq!(entity_len(b"&amp"), None);
    }

    #[test]
    fn test_url_escaping() {
        assert_eq!(url("https://example.com/a b?x=1&y=2"), "https://example.com/a%20b?x=1&amp;y=2");
        assert_eq!(url("caf\u{e9}"), "caf%C3%A9");
    }
}

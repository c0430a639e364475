//! Chunking: split a text block into atomic inline tokens.
//!
//! Chunks live in a flat `Vec` and are addressed by index. Resolution passes
//! only ever rewrite a chunk's `kind`; ranges never change.

use crate::escape::is_ascii_punctuation;
use crate::limits;
use crate::Range;

/// Chunk kinds: raw character classes, then resolved roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    /// Run of ordinary characters (may contain spaces).
    Plain,
    Asterisk,
    Underscore,
    /// Run of backticks.
    Backtick,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    DoubleQuote,
    SingleQuote,
    Ampersand,
    LeftAngle,
    /// `\` plus the punctuation character it escapes.
    Escaped,
    /// A backslash that escapes nothing at the end of the text.
    Backslash,
    /// Hard line break.
    LineBreak,

    /// Resolved to plain text.
    Literal,
    StartEmphasis,
    EndEmphasis,
    /// First and second chunk of a `**` opener.
    StartStrong1,
    StartStrong2,
    /// First and second chunk of a `**` closer.
    EndStrong1,
    EndStrong2,
    StartCode,
    EndCode,
    /// `[` of a link.
    StartLink,
    /// `]` after link text.
    EndText,
    /// `(` before a destination.
    StartUrl,
    /// `)` closing a link, or `]` closing a shortcut reference.
    EndLink,
    StartTitle,
    EndTitle,
    /// `[` of a reference label.
    StartLabel,
    /// `]` of a reference label; also closes the link.
    EndLabel,
    StartWikiLink1,
    StartWikiLink2,
    EndWikiLink1,
    EndWikiLink2,
}

impl ChunkType {
    /// Emphasis delimiter not yet resolved.
    #[inline]
    pub fn is_delimiter(self) -> bool {
        matches!(self, Self::Asterisk | Self::Underscore)
    }

    /// Roles that delimit a link or wiki-link.
    #[inline]
    pub fn is_link_role(self) -> bool {
        matches!(
            self,
            Self::StartLink
                | Self::EndText
                | Self::StartUrl
                | Self::EndLink
                | Self::StartTitle
                | Self::EndTitle
                | Self::StartLabel
                | Self::EndLabel
                | Self::StartWikiLink1
                | Self::StartWikiLink2
                | Self::EndWikiLink1
                | Self::EndWikiLink2
        )
    }
}

/// One inline token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub range: Range,
    pub kind: ChunkType,
    pub starts_with_space: bool,
    pub ends_with_space: bool,
}

impl Chunk {
    fn new(text: &[u8], start: usize, end: usize, kind: ChunkType) -> Self {
        let is_space = |b: u8| b == b' ' || b == b'\t' || b == b'\n';
        Self {
            range: Range::from_usize(start, end),
            kind,
            starts_with_space: text.get(start).copied().is_some_and(is_space),
            ends_with_space: end > start && is_space(text[end - 1]),
        }
    }

    #[inline]
    pub fn slice<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        self.range.slice(text)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.range.len() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Characters that end a plain run.
static SPECIAL: [bool; 256] = {
    let mut table = [false; 256];
    table[b'\\' as usize] = true;
    table[b'*' as usize] = true;
    table[b'_' as usize] = true;
    table[b'`' as usize] = true;
    table[b'[' as usize] = true;
    table[b']' as usize] = true;
    table[b'(' as usize] = true;
    table[b')' as usize] = true;
    table[b'"' as usize] = true;
    table[b'\'' as usize] = true;
    table[b'&' as usize] = true;
    table[b'<' as usize] = true;
    table[b'\n' as usize] = true;
    table
};

/// Split `text` into chunks, appending to `out`.
pub fn chunk_text(text: &[u8], out: &mut Vec<Chunk>) {
    let len = text.len();
    let mut pos = 0;
    let mut plain_start: Option<usize> = None;

    while pos < len {
        if out.len() + 1 >= limits::MAX_INLINE_CHUNKS {
            let start = plain_start.take().unwrap_or(pos);
            out.push(Chunk::new(text, start, len, ChunkType::Plain));
            return;
        }

        let b = text[pos];
        if !SPECIAL[b as usize] {
            plain_start.get_or_insert(pos);
            pos += 1;
            continue;
        }

        let (kind, width) = match b {
            b'\\' => match text.get(pos + 1) {
                Some(&next) if is_ascii_punctuation(next) => (ChunkType::Escaped, 2),
                None => (ChunkType::Backslash, 1),
                Some(_) => {
                    plain_start.get_or_insert(pos);
                    pos += 1;
                    continue;
                }
            },
            b'`' => (ChunkType::Backtick, text[pos..].iter().take_while(|&&c| c == b'`').count()),
            b'*' => (ChunkType::Asterisk, 1),
            b'_' => (ChunkType::Underscore, 1),
            b'[' => (ChunkType::LeftBracket, 1),
            b']' => (ChunkType::RightBracket, 1),
            b'(' => (ChunkType::LeftParen, 1),
            b')' => (ChunkType::RightParen, 1),
            b'"' => (ChunkType::DoubleQuote, 1),
            b'\'' => (ChunkType::SingleQuote, 1),
            b'&' => (ChunkType::Ampersand, 1),
            b'<' => (ChunkType::LeftAngle, 1),
            _ => (ChunkType::LineBreak, 1),
        };

        if let Some(start) = plain_start.take() {
            out.push(Chunk::new(text, start, pos, ChunkType::Plain));
        }
        out.push(Chunk::new(text, pos, pos + width, kind));
        pos += width;
    }

    if let Some(start) = plain_start {
        out.push(Chunk::new(text, start, len, ChunkType::Plain));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<ChunkType> {
        let mut chunks = Vec::new();
        chunk_text(text.as_bytes(), &mut chunks);
        chunks.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_plain_run() {
        assert_eq!(kinds("hello world"), vec![ChunkType::Plain]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_delimiters_are_single_chunks() {
        use ChunkType::*;
        assert_eq!(kinds("**a**"), vec![Asterisk, Asterisk, Plain, Asterisk, Asterisk]);
        assert_eq!(kinds("_a_"), vec![Underscore, Plain, Underscore]);
    }

    #[test]
    fn test_backtick_run_is_one_chunk() {
        let mut chunks = Vec::new();
        chunk_text(b"``code``", &mut chunks);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 2);
    }

    #[test]
    fn test_escapes() {
        use ChunkType::*;
        assert_eq!(kinds(r"\*a"), vec![Escaped, Plain]);
        assert_eq!(kinds(r"a\"), vec![Plain, Backslash]);
        // Backslash before a letter is ordinary text.
        assert_eq!(kinds(r"a\b"), vec![Plain]);
    }

    #[test]
    fn test_link_punctuation() {
        use ChunkType::*;
        assert_eq!(
            kinds("[a](b \"c\")"),
            vec![
                LeftBracket, Plain, RightBracket, LeftParen, Plain, DoubleQuote, Plain, DoubleQuote,
                RightParen
            ]
        );
    }

    #[test]
    fn test_space_flags() {
        let mut chunks = Vec::new();
        chunk_text(b"a * b", &mut chunks);
        assert!(chunks[0].ends_with_space);
        assert!(!chunks[1].starts_with_space);
        assert!(chunks[2].starts_with_space);
        assert!(!chunks[2].ends_with_space);
    }

    #[test]
    fn test_line_break() {
        assert_eq!(kinds("a\nb"), vec![ChunkType::Plain, ChunkType::LineBreak, ChunkType::Plain]);
    }

    #[test]
    fn test_role_classes() {
        assert!(ChunkType::Asterisk.is_delimiter());
        assert!(!ChunkType::StartEmphasis.is_delimiter());
        assert!(ChunkType::EndText.is_link_role());
        assert!(!ChunkType::Literal.is_link_role());
    }
}

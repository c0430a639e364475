//! Side-channel statistics gathered while rendering.

use serde::Serialize;

use crate::block::{Line, LineType};

/// Counts shown next to a rendered note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Physical lines in the input.
    pub lines: usize,
    pub blank_lines: usize,
    /// Words in headings, paragraphs and list items.
    pub words: usize,
    /// Wiki-links and `@id` links encountered.
    pub wiki_links: usize,
    /// Of those, the ones the resolver found.
    pub wiki_links_resolved: usize,
}

impl Counts {
    /// Line and word counts from classified lines.
    pub fn from_lines(input: &[u8], lines: &[Line]) -> Self {
        let mut counts = Self {
            lines: lines.len(),
            ..Self::default()
        };
        for line in lines {
            match line.kind {
                LineType::Blank => counts.blank_lines += 1,
                kind if kind.is_text() => counts.words += count_words(line.text.slice(input)),
                _ => {}
            }
        }
        counts
    }

    /// Record one note link.
    #[inline]
    pub fn add_wiki_link(&mut self, resolved: bool) {
        self.wiki_links += 1;
        if resolved {
            self.wiki_links_resolved += 1;
        }
    }
}

/// Whitespace-separated tokens containing at least one letter or digit.
pub fn count_words(text: &[u8]) -> usize {
    String::from_utf8_lossy(text)
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::LineClassifier;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(b"one two  three"), 3);
        assert_eq!(count_words(b"a - b"), 2);
        assert_eq!(count_words(b""), 0);
    }

    #[test]
    fn test_counts_from_lines() {
        let input = b"# Title here\n\nSome *body* text.\n\n    code is not counted\n";
        let classified = LineClassifier::new(input).classify();
        let counts = Counts::from_lines(input, &classified.lines);
        assert_eq!(counts.lines, 5);
        assert_eq!(counts.blank_lines, 2);
        assert_eq!(counts.words, 5);
    }

    #[test]
    fn test_wiki_link_tally() {
        let mut counts = Counts::default();
        counts.add_wiki_link(true);
        counts.add_wiki_link(false);
        assert_eq!(counts.wiki_links, 2);
        assert_eq!(counts.wiki_links_resolved, 1);
    }
}

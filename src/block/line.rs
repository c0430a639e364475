//! Classified physical lines.

use crate::Range;

use super::stack::BlockStack;

/// Classification of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Empty or whitespace-only (a bare `>` counts as blank inside a quote).
    Blank,
    /// ATX heading, or ordinary text promoted by an underline.
    Heading,
    /// Paragraph text, including follow-on lines.
    Ordinary,
    /// First line of a list item.
    ListItem,
    /// A line of code (indented, or inside a fence).
    Code,
    /// Opening code fence.
    FenceStart,
    /// Closing code fence.
    FenceEnd,
    /// Raw HTML passed through unchanged.
    HtmlBlock,
    /// Horizontal rule.
    HorizontalRule,
    /// Reference link definition (or its title continuation).
    LinkDef,
    /// `===` or `---` under a heading; produces no output.
    Underline,
}

impl LineType {
    /// Lines whose content is inline text.
    #[inline]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Heading | Self::Ordinary | Self::ListItem)
    }
}

/// A repeating-character line such as `---` or `= = =`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub ch: u8,
    pub count: u32,
    /// Whether spaces separate the characters.
    pub spaced: bool,
}

/// One physical line of input after classification.
#[derive(Debug, Clone)]
pub struct Line {
    pub kind: LineType,
    /// Content with markers, indentation and trailing spaces removed.
    pub text: Range,
    /// Heading level 1-6; 0 unless `kind` is `Heading`.
    pub heading_level: u8,
    /// Blockquotes, lists and list items containing this line.
    pub containers: BlockStack,
    /// Leading indentation in tab or four-space units.
    pub indent: u8,
    /// Number of `>` markers.
    pub quote_depth: u8,
    pub trailing_spaces: u8,
    /// Two or more trailing spaces, or a trailing backslash.
    pub hard_break: bool,
    /// Continues the previous paragraph or list item.
    pub follow_on: bool,
    pub repeat: Option<Repeat>,
    /// Info string of an opening fence.
    pub fence_info: Option<Range>,
}

impl Line {
    pub(crate) fn new(kind: LineType, text: Range) -> Self {
        Self {
            kind,
            text,
            heading_level: 0,
            containers: BlockStack::new(),
            indent: 0,
            quote_depth: 0,
            trailing_spaces: 0,
            hard_break: false,
            follow_on: false,
            repeat: None,
            fence_info: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_kinds() {
        assert!(LineType::Heading.is_text());
        assert!(LineType::ListItem.is_text());
        assert!(!LineType::Code.is_text());
    }

    #[test]
    fn test_new_line_defaults() {
        let line = Line::new(LineType::Ordinary, Range::new(0, 3));
        assert!(!line.follow_on);
        assert!(line.containers.is_empty());
        assert_eq!(line.heading_level, 0);
    }
}

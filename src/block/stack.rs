//! Block stacks and the close/open diff between consecutive lines.

use smallvec::SmallVec;

/// Structural element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Blockquote,
    /// Heading with level 1-6.
    Heading(u8),
    /// Indented or fenced code.
    Code,
    /// Raw HTML passthrough.
    Html,
}

impl BlockTag {
    /// HTML tag name for this block.
    pub fn html_name(self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::ListItem => "li",
            Self::Blockquote => "blockquote",
            Self::Heading(1) => "h1",
            Self::Heading(2) => "h2",
            Self::Heading(3) => "h3",
            Self::Heading(4) => "h4",
            Self::Heading(5) => "h5",
            Self::Heading(_) => "h6",
            Self::Code => "code",
            Self::Html => "",
        }
    }

    #[inline]
    pub fn is_list(self) -> bool {
        matches!(self, Self::UnorderedList | Self::OrderedList)
    }
}

/// A single open structural element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub tag: BlockTag,
    /// List item number for `ListItem`; unused otherwise.
    pub ordinal: u32,
    /// Instance identity. Two blocks with the same tag are the same element
    /// only when their serials match.
    pub serial: u32,
}

impl Block {
    pub fn new(tag: BlockTag, ordinal: u32, serial: u32) -> Self {
        Self { tag, ordinal, serial }
    }

    /// Whether `other` continues this block.
    #[inline]
    pub fn same_as(&self, other: &Block) -> bool {
        self.tag == other.tag && self.serial == other.serial
    }
}

/// Full nesting context at one line, outermost first.
pub type BlockStack = SmallVec<[Block; 8]>;

/// Index of the first position where the stacks differ.
///
/// Everything in `old` from there on must be closed (innermost first), and
/// everything in `new` from there on must be opened (outermost first).
///
/// # Example
/// ```
/// use mkdown::block::{common_prefix, Block, BlockStack, BlockTag};
///
/// let ul = Block::new(BlockTag::UnorderedList, 0, 1);
/// let first = Block::new(BlockTag::ListItem, 1, 2);
/// let second = Block::new(BlockTag::ListItem, 2, 3);
/// let old: BlockStack = [ul, first].into_iter().collect();
/// let new: BlockStack = [ul, second].into_iter().collect();
/// assert_eq!(common_prefix(&old, &new), 1);
/// ```
pub fn common_prefix(old: &[Block], new: &[Block]) -> usize {
    old.iter()
        .zip(new.iter())
        .take_while(|(a, b)| a.same_as(b))
        .count()
}

/// Issues fresh serials for new blocks.
#[derive(Debug, Default)]
pub struct SerialSource {
    next: u32,
}

impl SerialSource {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a new block instance.
    pub fn block(&mut self, tag: BlockTag, ordinal: u32) -> Block {
        let serial = self.next;
        self.next = self.next.wrapping_add(1);
        Block::new(tag, ordinal, serial)
    }
}

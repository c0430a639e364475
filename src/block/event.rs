//! Block-level event types.

use crate::Range;

use super::stack::Block;

/// Events emitted by the block tracker.
///
/// Opens and closes always nest: every `Open` is matched by a `Close` of the
/// same block, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEvent {
    /// A block starts.
    Open(Block),
    /// A block ends.
    Close(Block),
    /// Inline text of one line.
    Text {
        range: Range,
        /// Joins the previous text line of the same block.
        follow_on: bool,
        /// The line ends with a hard break.
        hard_break: bool,
    },
    /// Info string of the fenced code block opened next.
    CodeInfo(Range),
    /// One line of code (no inline parsing).
    Code(Range),
    /// One raw HTML line.
    Html(Range),
    /// Horizontal rule.
    Rule,
}

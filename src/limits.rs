//! Caps that keep pathological input linear.

/// Maximum blockquote depth; deeper `>` markers are kept as text.
pub const MAX_QUOTE_DEPTH: usize = 16;

/// Maximum list nesting depth.
pub const MAX_LIST_DEPTH: usize = 16;

/// Maximum ATX heading level.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Longest delimiter run that can open or close emphasis.
/// Longer runs render literally.
pub const MAX_DELIMITER_RUN: usize = 3;

/// Maximum digits in an ordered list marker.
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum backtick run length for code spans.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum chunks resolved per text block; the rest stay literal.
pub const MAX_INLINE_CHUNKS: usize = 1 << 16;

//! Block-level structure.
//!
//! Two passes over the input:
//! - [`LineClassifier`] types each physical line and computes the
//!   container stack it belongs to (blockquotes, lists, list items)
//! - [`BlockTracker`] adds leaf blocks and diffs consecutive stacks into
//!   nested [`BlockEvent`]s

mod classify;
mod event;
mod line;
mod stack;
mod tracker;

pub use classify::{Classified, LineClassifier};
pub use event::BlockEvent;
pub use line::{Line, LineType, Repeat};
pub use stack::{common_prefix, Block, BlockStack, BlockTag, SerialSource};
pub use tracker::BlockTracker;

/// Classify `input` and track its block structure in one call.
///
/// Returns the classified lines (for counts and link definitions) alongside
/// the events.
pub fn parse(input: &[u8], allow_html: bool) -> (Classified, Vec<BlockEvent>) {
    let classified = LineClassifier::new(input).allow_html(allow_html).classify();
    let mut events = Vec::with_capacity((input.len() / 16).max(16));
    BlockTracker::new(&classified).track(&mut events);
    (classified, events)
}

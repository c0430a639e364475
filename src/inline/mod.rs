//! Inline parser.
//!
//! Works on the joined text of one leaf block in four steps:
//! 1. Chunking: split the text into single-character-class chunks
//! 2. Code spans: matched backtick runs, contents become literal
//! 3. Links: inline, reference and wiki-links
//! 4. Emphasis: delimiter runs of `*` and `_`
//!
//! Later steps only see chunks that earlier steps left raw, so delimiters
//! inside code or link destinations never become emphasis.

mod chunk;
mod code_span;
mod emphasis;
mod links;

pub use chunk::{chunk_text, Chunk, ChunkType};

use crate::link_ref::LinkRefStore;
use code_span::resolve_code_spans;
use emphasis::resolve_emphasis;
use links::resolve_links;

/// Inline parser state.
///
/// Keeps its chunk arena between calls so one parser can serve a whole
/// document without reallocating.
#[derive(Debug, Default)]
pub struct InlineParser {
    chunks: Vec<Chunk>,
}

impl InlineParser {
    /// Create a new inline parser.
    pub fn new() -> Self {
        Self {
            chunks: Vec::with_capacity(64),
        }
    }

    /// Chunk and resolve `text`.
    ///
    /// `wiki_links` enables `[[...]]` parsing.
    pub fn parse(&mut self, text: &[u8], link_refs: &LinkRefStore, wiki_links: bool) -> &[Chunk] {
        self.chunks.clear();
        chunk_text(text, &mut self.chunks);
        resolve_code_spans(&mut self.chunks);
        resolve_links(text, &mut self.chunks, link_refs, wiki_links);
        resolve_emphasis(text, &mut self.chunks);
        &self.chunks
    }
}

//! Code span resolution.
//!
//! Code spans have the highest precedence among inline elements.
//! Backtick runs must match exactly.

use crate::limits;

use super::chunk::{Chunk, ChunkType};

/// Match backtick runs and turn everything between them into literals.
pub fn resolve_code_spans(chunks: &mut [Chunk]) {
    let len = chunks.len();
    let mut i = 0;

    while i < len {
        if chunks[i].kind != ChunkType::Backtick {
            i += 1;
            continue;
        }

        let opener_len = chunks[i].len();
        if opener_len > limits::MAX_CODE_SPAN_BACKTICKS {
            chunks[i].kind = ChunkType::Literal;
            i += 1;
            continue;
        }

        let closer = (i + 1..len)
            .find(|&j| chunks[j].kind == ChunkType::Backtick && chunks[j].len() == opener_len);

        match closer {
            Some(j) => {
                chunks[i].kind = ChunkType::StartCode;
                chunks[j].kind = ChunkType::EndCode;
                for chunk in &mut chunks[i + 1..j] {
                    chunk.kind = ChunkType::Literal;
                }
                i = j + 1;
            }
            None => {
                chunks[i].kind = ChunkType::Literal;
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::chunk::chunk_text;

    fn resolve(text: &str) -> Vec<ChunkType> {
        let mut chunks = Vec::new();
        chunk_text(text.as_bytes(), &mut chunks);
        resolve_code_spans(&mut chunks);
        chunks.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_simple_span() {
        use ChunkType::*;
        assert_eq!(resolve("`*a*`"), vec![StartCode, Literal, Literal, Literal, EndCode]);
    }

    #[test]
    fn test_run_lengths_must_match() {
        use ChunkType::*;
        assert_eq!(resolve("``a`b``"), vec![StartCode, Literal, Literal, Literal, EndCode]);
        assert_eq!(resolve("``a`"), vec![Literal, Plain, Literal]);
    }

    #[test]
    fn test_unmatched_backtick_is_literal() {
        assert_eq!(resolve("a ` b"), vec![ChunkType::Plain, ChunkType::Literal, ChunkType::Plain]);
    }

    #[test]
    fn test_two_spans() {
        use ChunkType::*;
        assert_eq!(
            resolve("`a` and `b`"),
            vec![StartCode, Literal, EndCode, Plain, StartCode, Literal, EndCode]
        );
    }
}

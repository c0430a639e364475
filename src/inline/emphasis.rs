//! Emphasis resolution.
//!
//! Runs of one to three identical delimiter chunks open or close emphasis.
//! An opener scans forward for the first run of the same character that
//! can close it. Closer chunks owed to nested openers are skipped, so in
//! `**a *b***` the inner pair takes one `*` and the outer pair the rest. Equal
//! runs resolve directly: one is `<em>`, two `<strong>`, three
//! `<strong><em>`. Unequal runs match the smaller count (two wins over one
//! when three are available) from the opener's inner end and the closer's
//! outer start; the rest of the opener keeps scanning after the closer.
//!
//! Matched pairs bound the scans of everything between them, so pairs never
//! interleave. Scans also never cross into or out of a link.

use smallvec::SmallVec;

use crate::limits;

use super::chunk::{Chunk, ChunkType};

/// Resolve emphasis and strong emphasis in place.
pub fn resolve_emphasis(text: &[u8], chunks: &mut [Chunk]) {
    let len = chunks.len();
    let mut bounds: Vec<usize> = Vec::new();
    let mut closers: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < len {
        while bounds.last().is_some_and(|&b| i >= b) {
            bounds.pop();
        }

        let kind = chunks[i].kind;
        if !kind.is_delimiter() {
            i += 1;
            continue;
        }

        let n = run_len(chunks, i, kind);
        if n > limits::MAX_DELIMITER_RUN || isolated(chunks, i, n) {
            set_kind(chunks, i, i + n, ChunkType::Literal);
            i += n;
            continue;
        }
        if !can_open(text, chunks, i, n, kind) {
            i += n;
            continue;
        }

        let limit = bounds.last().copied().unwrap_or(len);
        let mut remaining = n;
        let mut from = i + n;
        closers.clear();

        while remaining > 0 {
            let Some((j, m)) = find_closer(text, chunks, from, limit, kind) else {
                break;
            };
            let used = if remaining == m {
                pair(chunks, i, j, remaining);
                remaining
            } else {
                let k = remaining.min(m);
                pair(chunks, i + remaining - k, j, k);
                k
            };
            remaining -= used;
            from = j + used;
            closers.push(j);
        }

        // Innermost bound on top.
        bounds.extend(closers.iter().rev().copied());
        i += n;
    }

    for chunk in chunks.iter_mut().filter(|c| c.kind.is_delimiter()) {
        chunk.kind = ChunkType::Literal;
    }
}

/// Assign roles to `count` opener chunks at `open` and closer chunks at `close`.
fn pair(chunks: &mut [Chunk], open: usize, close: usize, count: usize) {
    use ChunkType::*;
    let (opener, closer): (&[ChunkType], &[ChunkType]) = match count {
        1 => (&[StartEmphasis], &[EndEmphasis]),
        2 => (&[StartStrong1, StartStrong2], &[EndStrong1, EndStrong2]),
        _ => (
            &[StartStrong1, StartStrong2, StartEmphasis],
            &[EndEmphasis, EndStrong1, EndStrong2],
        ),
    };
    for (offset, &role) in opener.iter().enumerate() {
        chunks[open + offset].kind = role;
    }
    for (offset, &role) in closer.iter().enumerate() {
        chunks[close + offset].kind = role;
    }
}

/// Find the closer run for an opener, as `(start, len)`.
///
/// Nested openers of the same character are kept on a stack of run
/// lengths. A closer run pays off the innermost nested openers first; what
/// is left of the run closes the current opener.
fn find_closer(
    text: &[u8],
    chunks: &[Chunk],
    from: usize,
    limit: usize,
    kind: ChunkType,
) -> Option<(usize, usize)> {
    let mut nested: SmallVec<[usize; 4]> = SmallVec::new();
    let mut p = from;

    while p < limit {
        let current = chunks[p].kind;
        match current {
            ChunkType::StartLink => {
                p = skip_past(chunks, p, |k| {
                    matches!(k, ChunkType::EndLink | ChunkType::EndLabel)
                })?;
                continue;
            }
            ChunkType::StartWikiLink1 => {
                p = skip_past(chunks, p, |k| k == ChunkType::EndWikiLink2)?;
                continue;
            }
            k if k.is_link_role() => return None,
            k if k == kind => {
                let m = run_len(chunks, p, kind);
                if m <= limits::MAX_DELIMITER_RUN && !isolated(chunks, p, m) {
                    if can_close(text, chunks, p, m, kind) {
                        let mut left = m;
                        while left > 0 {
                            let Some(top) = nested.last_mut() else {
                                break;
                            };
                            let take = left.min(*top);
                            *top -= take;
                            left -= take;
                            if *top == 0 {
                                nested.pop();
                            }
                        }
                        if left > 0 {
                            return Some((p + m - left, left));
                        }
                    } else if can_open(text, chunks, p, m, kind) {
                        nested.push(m);
                    }
                }
                p += m;
                continue;
            }
            _ => {}
        }
        p += 1;
    }
    None
}

/// Index after the first chunk from `start` whose kind matches `end`.
fn skip_past(chunks: &[Chunk], start: usize, end: impl Fn(ChunkType) -> bool) -> Option<usize> {
    chunks[start + 1..]
        .iter()
        .position(|c| end(c.kind))
        .map(|offset| start + 1 + offset + 1)
}

fn set_kind(chunks: &mut [Chunk], from: usize, to: usize, kind: ChunkType) {
    for chunk in &mut chunks[from..to] {
        chunk.kind = kind;
    }
}

fn run_len(chunks: &[Chunk], start: usize, kind: ChunkType) -> usize {
    chunks[start..].iter().take_while(|c| c.kind == kind).count()
}

fn space_before(chunks: &[Chunk], i: usize) -> bool {
    i == 0 || chunks[i - 1].ends_with_space || chunks[i - 1].kind == ChunkType::LineBreak
}

fn space_after(chunks: &[Chunk], p: usize) -> bool {
    p >= chunks.len() || chunks[p].starts_with_space || chunks[p].kind == ChunkType::LineBreak
}

fn isolated(chunks: &[Chunk], start: usize, n: usize) -> bool {
    space_before(chunks, start) && space_after(chunks, start + n)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b >= 0x80
}

fn word_before(text: &[u8], chunks: &[Chunk], i: usize) -> bool {
    i > 0
        && matches!(chunks[i - 1].kind, ChunkType::Plain | ChunkType::Literal)
        && chunks[i - 1].slice(text).last().copied().is_some_and(is_word_byte)
}

fn word_after(text: &[u8], chunks: &[Chunk], p: usize) -> bool {
    p < chunks.len()
        && matches!(chunks[p].kind, ChunkType::Plain | ChunkType::Literal)
        && chunks[p].slice(text).first().copied().is_some_and(is_word_byte)
}

/// A run opens when text follows it; `_` may not open inside a word.
fn can_open(text: &[u8], chunks: &[Chunk], start: usize, n: usize, kind: ChunkType) -> bool {
    !space_after(chunks, start + n)
        && (kind != ChunkType::Underscore || !word_before(text, chunks, start))
}

/// A run closes when text precedes it; `_` may not close inside a word.
fn can_close(text: &[u8], chunks: &[Chunk], start: usize, n: usize, kind: ChunkType) -> bool {
    !space_before(chunks, start)
        && (kind != ChunkType::Underscore || !word_after(text, chunks, start + n))
}

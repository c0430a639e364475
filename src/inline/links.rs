//! Link resolution: inline links, reference links and wiki-links.
//!
//! Each `[` is tried as a wiki-link, an inline link, then a reference link.
//! A scan gives up as soon as its shape cannot complete and leaves the
//! bracket as literal text. On success the structural chunks get their
//! roles and everything inside destinations, titles, labels and wiki text
//! becomes literal, so emphasis never resolves there.

use crate::link_ref::LinkRefStore;

use super::chunk::{Chunk, ChunkType};

/// Resolve all link structures in place.
pub fn resolve_links(
    text: &[u8],
    chunks: &mut [Chunk],
    link_refs: &LinkRefStore,
    wiki_links: bool,
) {
    let mut i = 0;
    while i < chunks.len() {
        if chunks[i].kind != ChunkType::LeftBracket {
            i += 1;
            continue;
        }

        let wiki = if wiki_links { match_wiki(chunks, i) } else { None };
        let matched = wiki
            .or_else(|| match_inline(text, chunks, i))
            .or_else(|| match_reference(text, chunks, i, link_refs));

        match matched {
            Some(last) => i = last + 1,
            None => {
                log::trace!("bracket at {} left literal", chunks[i].range.start);
                i += 1;
            }
        }
    }
}

#[inline]
fn adjacent(chunks: &[Chunk], a: usize, b: usize) -> bool {
    chunks[a].range.end == chunks[b].range.start
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == b' ' || b == b'\t')
}

/// Next raw `]`, unless a raw `[` comes first.
fn close_bracket(chunks: &[Chunk], from: usize) -> Option<usize> {
    for (p, chunk) in chunks.iter().enumerate().skip(from) {
        match chunk.kind {
            ChunkType::RightBracket => return Some(p),
            ChunkType::LeftBracket => return None,
            _ => {}
        }
    }
    None
}

fn set_literal(chunks: &mut [Chunk], from: usize, to: usize) {
    for chunk in &mut chunks[from..to] {
        chunk.kind = ChunkType::Literal;
    }
}

/// `[[target]]` or `[[target|alias]]`.
fn match_wiki(chunks: &mut [Chunk], i: usize) -> Option<usize> {
    let len = chunks.len();
    if i + 1 >= len || chunks[i + 1].kind != ChunkType::LeftBracket || !adjacent(chunks, i, i + 1) {
        return None;
    }

    let mut p = i + 2;
    while p + 1 < len {
        match chunks[p].kind {
            ChunkType::RightBracket => {
                let closes = p > i + 2
                    && chunks[p + 1].kind == ChunkType::RightBracket
                    && adjacent(chunks, p, p + 1);
                if !closes {
                    return None;
                }
                chunks[i].kind = ChunkType::StartWikiLink1;
                chunks[i + 1].kind = ChunkType::StartWikiLink2;
                set_literal(chunks, i + 2, p);
                chunks[p].kind = ChunkType::EndWikiLink1;
                chunks[p + 1].kind = ChunkType::EndWikiLink2;
                return Some(p + 1);
            }
            ChunkType::LeftBracket | ChunkType::LineBreak => return None,
            _ => p += 1,
        }
    }
    None
}

/// `[text](url)` or `[text](url "title")`.
fn match_inline(text: &[u8], chunks: &mut [Chunk], i: usize) -> Option<usize> {
    let j = close_bracket(chunks, i + 1)?;
    let open = j + 1;
    if open >= chunks.len()
        || chunks[open].kind != ChunkType::LeftParen
        || !adjacent(chunks, j, open)
    {
        return None;
    }

    // Destination: no inner whitespace, ends at `)` or at whitespace before a title.
    let mut p = open + 1;
    let mut url_seen = false;
    let mut url_done = false;
    let title_open = loop {
        let chunk = *chunks.get(p)?;
        match chunk.kind {
            ChunkType::RightParen => {
                apply_inline(chunks, i, j, open, None, p);
                return Some(p);
            }
            ChunkType::LeftParen
            | ChunkType::LeftBracket
            | ChunkType::RightBracket
            | ChunkType::LineBreak => return None,
            ChunkType::DoubleQuote | ChunkType::SingleQuote if url_done => break p,
            ChunkType::Plain => {
                let bytes = chunk.slice(text);
                if url_done {
                    if !is_blank(bytes) {
                        return None;
                    }
                } else {
                    let inner = bytes.trim_ascii();
                    if inner.iter().any(|b| b.is_ascii_whitespace()) {
                        return None;
                    }
                    if url_seen && chunk.starts_with_space && !inner.is_empty() {
                        return None;
                    }
                    url_seen |= !inner.is_empty();
                    url_done = url_seen && chunk.ends_with_space;
                }
            }
            _ => {
                if url_done {
                    return None;
                }
                url_seen = true;
            }
        }
        p += 1;
    };

    // Title: quoted, then only whitespace before `)`.
    let quote = chunks[title_open].kind;
    let mut p = title_open + 1;
    let title_close = loop {
        let chunk = *chunks.get(p)?;
        if chunk.kind == quote {
            break p;
        }
        if chunk.kind == ChunkType::LineBreak {
            return None;
        }
        p += 1;
    };
    let mut p = title_close + 1;
    let close = loop {
        let chunk = *chunks.get(p)?;
        match chunk.kind {
            ChunkType::RightParen => break p,
            ChunkType::Plain if is_blank(chunk.slice(text)) => p += 1,
            _ => return None,
        }
    };

    apply_inline(chunks, i, j, open, Some((title_open, title_close)), close);
    Some(close)
}

fn apply_inline(
    chunks: &mut [Chunk],
    start: usize,
    end_text: usize,
    open: usize,
    title: Option<(usize, usize)>,
    close: usize,
) {
    chunks[start].kind = ChunkType::StartLink;
    chunks[end_text].kind = ChunkType::EndText;
    chunks[open].kind = ChunkType::StartUrl;
    match title {
        Some((t_open, t_close)) => {
            set_literal(chunks, open + 1, t_open);
            chunks[t_open].kind = ChunkType::StartTitle;
            set_literal(chunks, t_open + 1, t_close);
            chunks[t_close].kind = ChunkType::EndTitle;
            set_literal(chunks, t_close + 1, close);
        }
        None => set_literal(chunks, open + 1, close),
    }
    chunks[close].kind = ChunkType::EndLink;
}

/// `[text][label]`, `[text][]`, or a defined shortcut `[label]`.
fn match_reference(
    text: &[u8],
    chunks: &mut [Chunk],
    i: usize,
    link_refs: &LinkRefStore,
) -> Option<usize> {
    let j = close_bracket(chunks, i + 1)?;
    let next = j + 1;

    if next < chunks.len()
        && chunks[next].kind == ChunkType::LeftBracket
        && adjacent(chunks, j, next)
    {
        let k = close_bracket(chunks, next + 1)?;
        chunks[i].kind = ChunkType::StartLink;
        chunks[j].kind = ChunkType::EndText;
        chunks[next].kind = ChunkType::StartLabel;
        set_literal(chunks, next + 1, k);
        chunks[k].kind = ChunkType::EndLabel;
        return Some(k);
    }

    if j == i + 1 {
        return None;
    }
    let start = chunks[i].range.end as usize;
    let end = chunks[j].range.start as usize;
    let label = String::from_utf8_lossy(&text[start..end]);
    if !link_refs.contains(&label) {
        return None;
    }
    chunks[i].kind = ChunkType::StartLink;
    chunks[j].kind = ChunkType::EndLink;
    Some(j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::chunk::chunk_text;
    use crate::link_ref::LinkRefDef;
    use ChunkType::*;

    fn resolve_with(text: &str, refs: &LinkRefStore, wiki: bool) -> Vec<ChunkType> {
        let mut chunks = Vec::new();
        chunk_text(text.as_bytes(), &mut chunks);
        resolve_links(text.as_bytes(), &mut chunks, refs, wiki);
        chunks.iter().map(|c| c.kind).collect()
    }

    fn resolve(text: &str) -> Vec<ChunkType> {
        resolve_with(text, &LinkRefStore::new(), true)
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(resolve("[a](b)"), vec![StartLink, Plain, EndText, StartUrl, Literal, EndLink]);
    }

    #[test]
    fn test_inline_link_with_title() {
        assert_eq!(
            resolve("[a](b \"t\")"),
            vec![
                StartLink, Plain, EndText, StartUrl, Literal, StartTitle, Literal, EndTitle, EndLink
            ]
        );
        assert_eq!(
            resolve("[a](b 't' )"),
            vec![
                StartLink, Plain, EndText, StartUrl, Literal, StartTitle, Literal, EndTitle,
                Literal, EndLink
            ]
        );
    }

    #[test]
    fn test_emphasis_in_url_is_literal() {
        assert_eq!(
            resolve("[a](x_y_z)"),
            vec![
                StartLink, Plain, EndText, StartUrl, Literal, Literal, Literal, Literal, Literal,
                EndLink
            ]
        );
    }

    #[test]
    fn test_whitespace_in_url_aborts() {
        assert_eq!(resolve("[a](b c)")[0], LeftBracket);
        assert_eq!(resolve("[a] (b)")[0], LeftBracket);
    }

    #[test]
    fn test_unterminated_title_aborts() {
        assert_eq!(resolve("[a](b \"t)")[0], LeftBracket);
        assert_eq!(resolve("[a](b \"t\" x)")[0], LeftBracket);
    }

    #[test]
    fn test_full_reference() {
        assert_eq!(
            resolve("[a][b]"),
            vec![StartLink, Plain, EndText, StartLabel, Literal, EndLabel]
        );
        assert_eq!(resolve("[a][]"), vec![StartLink, Plain, EndText, StartLabel, EndLabel]);
    }

    #[test]
    fn test_shortcut_needs_definition() {
        assert_eq!(resolve("[a]"), vec![LeftBracket, Plain, RightBracket]);

        let mut refs = LinkRefStore::new();
        refs.insert(
            "A",
            LinkRefDef {
                url: "/a".into(),
                title: None,
            },
        );
        assert_eq!(resolve_with("[a]", &refs, true), vec![StartLink, Plain, EndLink]);
    }

    #[test]
    fn test_wiki_link() {
        assert_eq!(
            resolve("[[Meeting Notes]]"),
            vec![StartWikiLink1, StartWikiLink2, Literal, EndWikiLink1, EndWikiLink2]
        );
    }

    #[test]
    fn test_wiki_link_disabled() {
        let kinds = resolve_with("[[x]]", &LinkRefStore::new(), false);
        assert!(!kinds.contains(&StartWikiLink1));
    }

    #[test]
    fn test_empty_wiki_link_is_literal() {
        assert!(!resolve("[[]]").contains(&StartWikiLink1));
    }

    #[test]
    fn test_nested_bracket_aborts_text() {
        assert_eq!(resolve("[a [b](c)")[0], LeftBracket);
        assert_eq!(resolve("[a [b](c)")[2], StartLink);
    }
}

//! Format-aware rendering of block events and resolved inline chunks.
//!
//! The renderer consumes [`BlockEvent`]s in order. Text events of one leaf
//! are buffered until the leaf ends, then parsed by the [`InlineParser`] and
//! emitted chunk by chunk. Link chunks divert output into a [`LinkContext`]
//! until the link is complete, because an anchor cannot be written before
//! its destination is known.

use crate::block::{Block, BlockEvent, BlockTag};
use crate::counts::Counts;
use crate::escape;
use crate::inline::{Chunk, ChunkType, InlineParser};
use crate::link_ref::LinkRefStore;
use crate::render::HtmlWriter;
use crate::wiki::{self, LinkResolver};
use crate::{Options, OutputFormat, Range};

const XBEL_DOCTYPE: &str = concat!(
    "<!DOCTYPE xbel PUBLIC ",
    "\"+//IDN python.org//DTD XML Bookmark Exchange Language 1.0//EN//XML\" ",
    "\"http://www.python.org/topics/xml/dtds/xbel-1.0.dtd\">\n",
);

/// Where chunk output currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Diversion {
    #[default]
    Off,
    Text,
    Url,
    Title,
    Label,
    Wiki,
    /// Between the parts of a link; output is dropped.
    Tail,
}

/// Buffers for a link being collected.
#[derive(Debug, Default)]
struct LinkContext {
    mode: Diversion,
    /// Rendered link text.
    text: Vec<u8>,
    /// Source of the link text, or of the wiki-link target.
    raw: Vec<u8>,
    url: Vec<u8>,
    title: Vec<u8>,
    label: Vec<u8>,
    has_url: bool,
    has_label: bool,
}

impl LinkContext {
    fn start(&mut self, mode: Diversion) {
        *self = Self {
            mode,
            ..Self::default()
        };
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.mode != Diversion::Off
    }
}

/// Open container while writing Markdown.
#[derive(Debug)]
enum MdFrame {
    Quote,
    List { ordered: bool },
    /// List item; the marker is written on its first line only.
    Item { marker: Option<String> },
}

/// Streaming renderer for one document.
pub struct Renderer<'r> {
    input: &'r [u8],
    options: &'r Options,
    link_refs: &'r LinkRefStore,
    resolver: Option<&'r dyn LinkResolver>,
    writer: HtmlWriter,
    parser: InlineParser,
    counts: Counts,

    /// Joined text of the current leaf.
    text: Vec<u8>,
    /// Rendered inline output of the current leaf.
    scratch: Vec<u8>,
    pending_break: bool,
    /// The pending break was written as a trailing backslash.
    break_backslash: bool,
    code_info: Option<Range>,
    leaf: Option<BlockTag>,
    in_code: bool,
    link: LinkContext,

    md_frames: Vec<MdFrame>,
    md_blank: bool,

    /// Heading levels of open bookmark folders.
    folders: Vec<u8>,
    heading_title: Vec<u8>,
}

impl<'r> Renderer<'r> {
    pub fn new(
        input: &'r [u8],
        link_refs: &'r LinkRefStore,
        options: &'r Options,
        resolver: Option<&'r dyn LinkResolver>,
    ) -> Self {
        Self {
            input,
            options,
            link_refs,
            resolver,
            writer: HtmlWriter::with_capacity_for(input.len()),
            parser: InlineParser::new(),
            counts: Counts::default(),
            text: Vec::with_capacity(256),
            scratch: Vec::with_capacity(256),
            pending_break: false,
            break_backslash: false,
            code_info: None,
            leaf: None,
            in_code: false,
            link: LinkContext::default(),
            md_frames: Vec::new(),
            md_blank: false,
            folders: Vec::new(),
            heading_title: Vec::new(),
        }
    }

    /// Start from line and word counts gathered by the classifier.
    pub fn with_counts(mut self, counts: Counts) -> Self {
        self.counts = counts;
        self
    }

    /// Write the document preamble of wrapping formats.
    pub fn begin(&mut self) {
        match self.options.format {
            OutputFormat::HtmlDoc => {
                let w = &mut self.writer;
                w.write_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>");
                if let Some(title) = &self.options.title {
                    w.write_escaped_text(title.as_bytes());
                }
                w.write_str("</title>\n</head>\n<body>\n");
            }
            OutputFormat::BookmarksXml => {
                let w = &mut self.writer;
                w.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
                w.write_str(XBEL_DOCTYPE);
                w.write_str("<xbel version=\"1.0\">\n");
                if let Some(title) = &self.options.title {
                    w.write_indent(1);
                    w.write_str("<title>");
                    w.write_escaped_text(title.as_bytes());
                    w.write_str("</title>\n");
                }
            }
            OutputFormat::HtmlFragment | OutputFormat::Markdown => {}
        }
    }

    /// Render one block event.
    pub fn event(&mut self, event: &BlockEvent) {
        if let BlockEvent::Text {
            range,
            follow_on,
            hard_break,
        } = *event
        {
            self.push_text(range, follow_on, hard_break);
            return;
        }

        self.flush_text();
        match *event {
            BlockEvent::Open(block) => self.open(block),
            BlockEvent::Close(block) => self.close(block),
            BlockEvent::CodeInfo(range) => self.code_info = Some(range),
            BlockEvent::Code(range) => self.code_line(range),
            BlockEvent::Html(range) => self.html_line(range),
            BlockEvent::Rule => self.rule(),
            BlockEvent::Text { .. } => {}
        }
    }

    /// Close wrapping formats and return the output with final counts.
    pub fn finish(mut self) -> (String, Counts) {
        self.flush_text();
        match self.options.format {
            OutputFormat::HtmlDoc => {
                self.writer.ensure_newline();
                self.writer.write_str("</body>\n</html>\n");
            }
            OutputFormat::BookmarksXml => {
                self.close_folders(0);
                self.writer.write_str("</xbel>\n");
            }
            OutputFormat::HtmlFragment | OutputFormat::Markdown => {}
        }
        (self.writer.into_string(), self.counts)
    }

    // --- Text accumulation ---

    fn push_text(&mut self, range: Range, follow_on: bool, hard_break: bool) {
        if !follow_on {
            self.flush_text();
        } else if !self.text.is_empty() {
            self.text.push(if self.pending_break { b'\n' } else { b' ' });
        }
        self.text.extend_from_slice(range.slice(self.input));
        self.pending_break = hard_break;
        self.break_backslash = hard_break && self.input.get(range.end as usize) == Some(&b'\\');
    }

    fn flush_text(&mut self) {
        // A backslash break with no line after it is literal text.
        if self.pending_break && self.break_backslash {
            self.text.push(b'\\');
        }
        self.pending_break = false;
        self.break_backslash = false;
        if self.text.is_empty() {
            return;
        }

        let text = std::mem::take(&mut self.text);
        let mut parser = std::mem::take(&mut self.parser);
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();

        let chunks = parser.parse(&text, self.link_refs, self.options.double_bracket_parsing);
        self.render_inline(&text, chunks, &mut scratch);
        self.place_inline(&scratch);

        self.parser = parser;
        self.scratch = scratch;
        self.text = text;
        self.text.clear();
    }

    fn place_inline(&mut self, rendered: &[u8]) {
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => self.writer.write_bytes(rendered),
            OutputFormat::Markdown => self.md_text(rendered),
            OutputFormat::BookmarksXml => {
                if matches!(self.leaf, Some(BlockTag::Heading(_))) {
                    self.heading_title.extend_from_slice(rendered);
                }
            }
        }
    }

    // --- Blocks ---

    fn open(&mut self, block: Block) {
        if matches!(block.tag, BlockTag::Paragraph | BlockTag::Heading(_)) {
            self.leaf = Some(block.tag);
        }
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => self.open_html(block),
            OutputFormat::Markdown => self.open_markdown(block),
            OutputFormat::BookmarksXml => {
                if let BlockTag::Heading(_) = block.tag {
                    self.heading_title.clear();
                }
            }
        }
    }

    fn close(&mut self, block: Block) {
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => self.close_html(block),
            OutputFormat::Markdown => self.close_markdown(block),
            OutputFormat::BookmarksXml => {
                if let BlockTag::Heading(level) = block.tag {
                    self.open_folder(level);
                }
            }
        }
        if self.leaf == Some(block.tag) {
            self.leaf = None;
        }
    }

    fn open_html(&mut self, block: Block) {
        let w = &mut self.writer;
        w.ensure_newline();
        match block.tag {
            BlockTag::Blockquote | BlockTag::UnorderedList | BlockTag::OrderedList => {
                w.open_tag(block.tag.html_name());
                w.newline();
            }
            BlockTag::ListItem | BlockTag::Paragraph | BlockTag::Heading(_) => {
                w.open_tag(block.tag.html_name());
            }
            BlockTag::Code => {
                w.write_str("<pre><code");
                if let Some(info) = self.code_info.take() {
                    let info = info.slice(self.input);
                    let lang = info.split(u8::is_ascii_whitespace).next().unwrap_or(info);
                    if !lang.is_empty() {
                        w.write_str(" class=\"language-");
                        w.write_escaped_attr(lang);
                        w.write_byte(b'"');
                    }
                }
                w.write_byte(b'>');
            }
            BlockTag::Html => {}
        }
    }

    fn close_html(&mut self, block: Block) {
        let w = &mut self.writer;
        match block.tag {
            BlockTag::Paragraph | BlockTag::Heading(_) | BlockTag::ListItem => {
                w.close_tag(block.tag.html_name());
                w.newline();
            }
            BlockTag::Blockquote | BlockTag::UnorderedList | BlockTag::OrderedList => {
                w.ensure_newline();
                w.close_tag(block.tag.html_name());
                w.newline();
            }
            BlockTag::Code => w.write_str("</code></pre>\n"),
            BlockTag::Html => w.ensure_newline(),
        }
    }

    fn code_line(&mut self, range: Range) {
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => {
                self.writer.write_escaped_range(self.input, range);
                self.writer.newline();
            }
            OutputFormat::Markdown => {
                let mut line = b"    ".to_vec();
                line.extend_from_slice(range.slice(self.input));
                self.md_line(&line);
            }
            OutputFormat::BookmarksXml => {}
        }
    }

    fn html_line(&mut self, range: Range) {
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => {
                self.writer.write_bytes(range.slice(self.input));
                self.writer.newline();
            }
            OutputFormat::Markdown => self.md_line(range.slice(self.input)),
            OutputFormat::BookmarksXml => {}
        }
    }

    fn rule(&mut self) {
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => {
                self.writer.ensure_newline();
                self.writer.write_str("<hr>\n");
            }
            OutputFormat::Markdown => {
                self.md_separate();
                self.md_line(b"---");
                self.md_blank = true;
            }
            OutputFormat::BookmarksXml => {}
        }
    }

    // --- Inline chunks ---

    fn render_inline(&mut self, text: &[u8], chunks: &[Chunk], out: &mut Vec<u8>) {
        self.in_code = false;
        self.link = LinkContext::default();
        for chunk in chunks {
            self.inline_chunk(text, chunk, out);
        }
        if self.link.is_active() {
            log::debug!("link left open at end of block");
            let link = std::mem::take(&mut self.link);
            escape::escape_text_into(out, &link.raw);
        }
    }

    fn inline_chunk(&mut self, text: &[u8], chunk: &Chunk, out: &mut Vec<u8>) {
        match chunk.kind {
            ChunkType::StartLink => return self.link.start(Diversion::Text),
            ChunkType::EndText | ChunkType::EndTitle => {
                self.link.mode = Diversion::Tail;
                return;
            }
            ChunkType::StartUrl => {
                self.link.mode = Diversion::Url;
                self.link.has_url = true;
                return;
            }
            ChunkType::StartTitle => {
                self.link.mode = Diversion::Title;
                return;
            }
            ChunkType::StartLabel => {
                self.link.mode = Diversion::Label;
                self.link.has_label = true;
                return;
            }
            ChunkType::EndLink | ChunkType::EndLabel => return self.finish_link(out),
            ChunkType::StartWikiLink1 => return self.link.start(Diversion::Wiki),
            ChunkType::StartWikiLink2 | ChunkType::EndWikiLink1 => return,
            ChunkType::EndWikiLink2 => return self.finish_wiki_link(out),
            _ => {}
        }

        let bytes = chunk.slice(text);
        match self.link.mode {
            Diversion::Off => self.render_chunk(text, chunk, out),
            Diversion::Text => {
                self.link.raw.extend_from_slice(bytes);
                let mut rendered = std::mem::take(&mut self.link.text);
                self.render_chunk(text, chunk, &mut rendered);
                self.link.text = rendered;
            }
            Diversion::Url => self.link.url.extend_from_slice(bytes),
            Diversion::Title => self.link.title.extend_from_slice(bytes),
            Diversion::Label => self.link.label.extend_from_slice(bytes),
            Diversion::Wiki => self.link.raw.extend_from_slice(bytes),
            Diversion::Tail => {}
        }
    }

    fn render_chunk(&mut self, text: &[u8], chunk: &Chunk, out: &mut Vec<u8>) {
        match chunk.kind {
            ChunkType::StartCode => self.in_code = true,
            ChunkType::EndCode => self.in_code = false,
            _ => {}
        }
        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => self.html_chunk(text, chunk, out),
            OutputFormat::Markdown => markdown_chunk(text, chunk, out),
            OutputFormat::BookmarksXml => self.plain_chunk(text, chunk, out),
        }
    }

    fn html_chunk(&self, text: &[u8], chunk: &Chunk, out: &mut Vec<u8>) {
        let tag: &[u8] = match chunk.kind {
            ChunkType::StartEmphasis => b"<em>",
            ChunkType::EndEmphasis => b"</em>",
            ChunkType::StartStrong1 => b"<strong>",
            ChunkType::EndStrong2 => b"</strong>",
            ChunkType::StartStrong2 | ChunkType::EndStrong1 => b"",
            ChunkType::StartCode => b"<code>",
            ChunkType::EndCode => b"</code>",
            ChunkType::LineBreak => b"<br>\n",
            _ => return self.text_chunk(text, chunk, out),
        };
        out.extend_from_slice(tag);
    }

    fn plain_chunk(&self, text: &[u8], chunk: &Chunk, out: &mut Vec<u8>) {
        match chunk.kind {
            ChunkType::LineBreak => out.push(b' '),
            kind if is_markup(kind) => {}
            _ => self.text_chunk(text, chunk, out),
        }
    }

    /// Escaped text of a chunk without markup role.
    fn text_chunk(&self, text: &[u8], chunk: &Chunk, out: &mut Vec<u8>) {
        let bytes = chunk.slice(text);
        if self.in_code {
            escape::escape_text_into(out, bytes);
            return;
        }
        match chunk.kind {
            ChunkType::Escaped => escape::escape_text_into(out, &bytes[1..]),
            _ if bytes == b"&" => {
                let start = chunk.range.start_usize();
                if escape::entity_len(&text[start..]).is_some() {
                    out.push(b'&');
                } else {
                    out.extend_from_slice(b"&amp;");
                }
            }
            _ => escape::escape_text_into(out, bytes),
        }
    }

    // --- Links ---

    fn finish_link(&mut self, out: &mut Vec<u8>) {
        let link = std::mem::take(&mut self.link);

        let (url, title) = if link.has_url {
            let title = (!link.title.is_empty()).then(|| link.title.clone());
            (link.url.trim_ascii().to_vec(), title)
        } else {
            let source = if link.has_label && !link.label.trim_ascii().is_empty() {
                &link.label
            } else {
                &link.raw
            };
            let label = String::from_utf8_lossy(source);
            match self.link_refs.get(&label) {
                Some(def) => (
                    def.url.as_bytes().to_vec(),
                    def.title.as_ref().map(|t| t.as_bytes().to_vec()),
                ),
                None => {
                    log::debug!("undefined link reference [{label}]");
                    (Vec::new(), None)
                }
            }
        };

        let href = match url.strip_prefix(b"@") {
            Some(id) if !id.is_empty() => {
                let id = String::from_utf8_lossy(id);
                let target = wiki::resolve(&id, self.resolver, self.options);
                self.counts.add_wiki_link(target.is_resolved());
                target.href.into_bytes()
            }
            _ => {
                let mut href = Vec::with_capacity(url.len());
                escape::escape_url_into(&mut href, &url);
                href
            }
        };

        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => {
                out.extend_from_slice(b"<a href=\"");
                out.extend_from_slice(&href);
                out.push(b'"');
                if let Some(title) = &title {
                    out.extend_from_slice(b" title=\"");
                    escape::escape_attr_into(out, title);
                    out.push(b'"');
                }
                out.push(b'>');
                out.extend_from_slice(&link.text);
                out.extend_from_slice(b"</a>");
            }
            OutputFormat::Markdown => {
                out.push(b'[');
                out.extend_from_slice(&link.text);
                out.extend_from_slice(b"](");
                out.extend_from_slice(&url);
                if let Some(title) = &title {
                    out.extend_from_slice(b" \"");
                    out.extend_from_slice(title);
                    out.push(b'"');
                }
                out.push(b')');
            }
            OutputFormat::BookmarksXml => {
                out.extend_from_slice(&link.text);
                self.bookmark(&href, &link.text);
            }
        }
    }

    fn finish_wiki_link(&mut self, out: &mut Vec<u8>) {
        let link = std::mem::take(&mut self.link);
        let raw = String::from_utf8_lossy(&link.raw);
        let (target, alias) = match raw.split_once('|') {
            Some((target, alias)) => (target.trim(), Some(alias.trim()).filter(|a| !a.is_empty())),
            None => (raw.trim(), None),
        };

        let resolved = wiki::resolve(target, self.resolver, self.options);
        self.counts.add_wiki_link(resolved.is_resolved());
        let visible = alias.or(resolved.title.as_deref()).unwrap_or(target);

        match self.options.format {
            OutputFormat::HtmlFragment | OutputFormat::HtmlDoc => {
                out.extend_from_slice(b"<a href=\"");
                out.extend_from_slice(resolved.href.as_bytes());
                out.extend_from_slice(b"\">");
                escape::escape_text_keep_entities_into(out, visible.as_bytes());
                out.extend_from_slice(b"</a>");
            }
            OutputFormat::Markdown => {
                out.extend_from_slice(b"[[");
                out.extend_from_slice(&link.raw);
                out.extend_from_slice(b"]]");
            }
            OutputFormat::BookmarksXml => {
                let mut title = Vec::with_capacity(visible.len());
                escape::escape_text_keep_entities_into(&mut title, visible.as_bytes());
                out.extend_from_slice(&title);
                self.bookmark(resolved.href.as_bytes(), &title);
            }
        }
    }

    // --- Markdown ---

    fn open_markdown(&mut self, block: Block) {
        self.md_separate();
        match block.tag {
            BlockTag::Blockquote => self.md_frames.push(MdFrame::Quote),
            BlockTag::UnorderedList => self.md_frames.push(MdFrame::List { ordered: false }),
            BlockTag::OrderedList => self.md_frames.push(MdFrame::List { ordered: true }),
            BlockTag::ListItem => {
                let ordered =
                    matches!(self.md_frames.last(), Some(MdFrame::List { ordered: true }));
                let marker = if ordered {
                    format!("{}. ", block.ordinal)
                } else {
                    "- ".to_string()
                };
                self.md_frames.push(MdFrame::Item { marker: Some(marker) });
            }
            _ => {}
        }
    }

    fn close_markdown(&mut self, block: Block) {
        match block.tag {
            BlockTag::Paragraph | BlockTag::Heading(_) | BlockTag::Code | BlockTag::Html => {
                self.md_blank = true;
            }
            BlockTag::ListItem => {
                if let Some(MdFrame::Item { marker: Some(_) }) = self.md_frames.last() {
                    self.md_line(b"");
                }
                self.md_frames.pop();
            }
            BlockTag::UnorderedList | BlockTag::OrderedList => {
                self.md_frames.pop();
                self.md_blank = !matches!(self.md_frames.last(), Some(MdFrame::Item { .. }));
            }
            BlockTag::Blockquote => {
                self.md_frames.pop();
                self.md_blank = true;
            }
        }
    }

    /// Write the blank line owed after the previous block.
    fn md_separate(&mut self) {
        if !self.md_blank {
            return;
        }
        self.md_blank = false;
        let mut line = Vec::new();
        for frame in &self.md_frames {
            if let MdFrame::Quote = frame {
                line.extend_from_slice(b"> ");
            }
        }
        while line.last() == Some(&b' ') {
            line.pop();
        }
        self.writer.write_bytes(&line);
        self.writer.newline();
    }

    fn md_text(&mut self, rendered: &[u8]) {
        let level = match self.leaf {
            Some(BlockTag::Heading(level)) => level as usize,
            _ => 0,
        };
        let mut line = Vec::new();
        for (i, part) in rendered.split(|&b| b == b'\n').enumerate() {
            line.clear();
            if i == 0 && level > 0 {
                line.resize(level, b'#');
                line.push(b' ');
            }
            line.extend_from_slice(part);
            self.md_line(&line);
        }
    }

    /// Write one output line behind the container prefixes.
    fn md_line(&mut self, content: &[u8]) {
        let mut line = Vec::with_capacity(content.len() + 8);
        for frame in &mut self.md_frames {
            match frame {
                MdFrame::Quote => line.extend_from_slice(b"> "),
                MdFrame::List { .. } => {}
                MdFrame::Item { marker } => match marker.take() {
                    Some(marker) => line.extend_from_slice(marker.as_bytes()),
                    None => line.extend_from_slice(b"    "),
                },
            }
        }
        line.extend_from_slice(content);
        if content.is_empty() {
            while line.last() == Some(&b' ') {
                line.pop();
            }
        }
        self.writer.write_bytes(&line);
        self.writer.newline();
    }

    // --- Bookmarks ---

    fn bookmark(&mut self, href: &[u8], title: &[u8]) {
        let depth = self.folders.len() + 1;
        let w = &mut self.writer;
        w.write_indent(depth);
        w.write_str("<bookmark href=\"");
        w.write_bytes(href);
        w.write_str("\">\n");
        w.write_indent(depth + 1);
        w.write_str("<title>");
        w.write_bytes(title);
        w.write_str("</title>\n");
        w.write_indent(depth);
        w.write_str("</bookmark>\n");
    }

    /// A heading opens a folder, closing folders of the same or deeper level.
    fn open_folder(&mut self, level: u8) {
        self.close_folders(level);
        let depth = self.folders.len() + 1;
        let title = std::mem::take(&mut self.heading_title);
        let w = &mut self.writer;
        w.write_indent(depth);
        w.write_str("<folder>\n");
        w.write_indent(depth + 1);
        w.write_str("<title>");
        w.write_bytes(&title);
        w.write_str("</title>\n");
        self.folders.push(level);
        self.heading_title = title;
        self.heading_title.clear();
    }

    /// Close folders opened by headings at `level` or deeper; 0 closes all.
    fn close_folders(&mut self, level: u8) {
        while let Some(&open) = self.folders.last() {
            if level != 0 && open < level {
                break;
            }
            self.folders.pop();
            self.writer.write_indent(self.folders.len() + 1);
            self.writer.write_str("</folder>\n");
        }
    }
}

/// Roles that produce markup rather than text.
fn is_markup(kind: ChunkType) -> bool {
    matches!(
        kind,
        ChunkType::StartEmphasis
            | ChunkType::EndEmphasis
            | ChunkType::StartStrong1
            | ChunkType::StartStrong2
            | ChunkType::EndStrong1
            | ChunkType::EndStrong2
            | ChunkType::StartCode
            | ChunkType::EndCode
    )
}

/// Markdown keeps source text; emphasis is normalized to `*`.
fn markdown_chunk(text: &[u8], chunk: &Chunk, out: &mut Vec<u8>) {
    match chunk.kind {
        ChunkType::StartEmphasis
        | ChunkType::EndEmphasis
        | ChunkType::StartStrong1
        | ChunkType::StartStrong2
        | ChunkType::EndStrong1
        | ChunkType::EndStrong2 => out.push(b'*'),
        ChunkType::LineBreak => out.extend_from_slice(b"\\\n"),
        _ => out.extend_from_slice(chunk.slice(text)),
    }
}

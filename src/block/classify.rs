//! First pass: split the input into classified lines.
//!
//! The classifier walks each physical line byte by byte: a leading phase
//! (blockquote markers and indentation), a marker phase (fences, rules,
//! headings, list markers, HTML blocks, link definitions) and a text phase
//! (trailing `#`, trailing spaces, hard breaks). Every line gets its
//! container stack here, so the tracker only has to add the leaf block and
//! diff consecutive stacks.
//!
//! Link definitions are collected as they are recognized, which is why
//! references resolve regardless of where in the document they are defined.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::limits;
use crate::link_ref::{LinkRefDef, LinkRefStore};
use crate::Range;

use super::line::{Line, LineType, Repeat};
use super::stack::{Block, BlockStack, BlockTag, SerialSource};

/// Output of the first pass.
#[derive(Debug)]
pub struct Classified {
    pub lines: Vec<Line>,
    pub link_refs: LinkRefStore,
    /// Serials of lists whose items are separated by blank lines.
    pub loose_lists: FxHashSet<u32>,
}

impl Classified {
    /// Whether a list block renders its item text in paragraphs.
    #[inline]
    pub fn is_loose(&self, list: &Block) -> bool {
        self.loose_lists.contains(&list.serial)
    }
}

/// State for an open fenced code block.
#[derive(Debug, Clone)]
struct FenceState {
    ch: u8,
    len: usize,
    quote_depth: u8,
    inner: Option<InnerQuote>,
    /// Indentation of the opening fence, removed from content lines.
    strip: usize,
    containers: BlockStack,
}

/// Blockquote markers that follow the indentation of open list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InnerQuote {
    /// List levels kept before the markers.
    levels: u8,
    depth: u8,
}

/// Leading structure of a line.
#[derive(Debug)]
struct Lead {
    /// Markers at the start of the line.
    quote_depth: u8,
    inner: Option<InnerQuote>,
    /// Offset after the last quote marker.
    quote_end: usize,
    indent: u8,
    /// Offset just after each indentation level.
    level_ends: SmallVec<[usize; 4]>,
    /// Offset of the first byte after indentation.
    content: usize,
}

impl Lead {
    /// All quote markers of the line, outer and inner.
    fn quotes(&self) -> u8 {
        self.quote_depth + self.inner.map_or(0, |q| q.depth)
    }
}

/// List marker at the start of a line's content.
#[derive(Debug, Clone, Copy)]
struct ListMarker {
    ordered: bool,
    /// Marker plus the whitespace after it.
    width: usize,
}

/// States of the link definition scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefState {
    LeftBracket,
    RightBracket,
    Colon,
    LinkStart,
    LinkEnd,
    TitleStart,
    TitleEnd,
}

/// A recognized `[label]: url "title"` line.
#[derive(Debug, PartialEq, Eq)]
struct DefParts {
    label: String,
    url: String,
    title: Option<String>,
}

/// Block-level tags that start an HTML passthrough block.
const HTML_BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas", "center", "dd",
    "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "html", "iframe", "li", "main",
    "menu", "nav", "noscript", "ol", "p", "pre", "script", "section", "style", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul", "video",
];

/// Line classifier.
pub struct LineClassifier<'a> {
    input: &'a [u8],
    cursor: Cursor<'a>,
    allow_html: bool,
    serials: SerialSource,
    lines: Vec<Line>,
    link_refs: LinkRefStore,
    loose_lists: FxHashSet<u32>,
    /// Containers of the last line that produced a block.
    context: BlockStack,
    /// Blank lines since the last non-blank line.
    blank_run: usize,
    fence: Option<FenceState>,
    in_html: bool,
    /// Definition that may still take a title from the next line.
    open_def: Option<usize>,
}

impl<'a> LineClassifier<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            cursor: Cursor::new(input),
            allow_html: true,
            serials: SerialSource::new(),
            lines: Vec::with_capacity(input.len() / 32 + 1),
            link_refs: LinkRefStore::new(),
            loose_lists: FxHashSet::default(),
            context: BlockStack::new(),
            blank_run: 0,
            fence: None,
            in_html: false,
            open_def: None,
        }
    }

    /// Whether lines starting with a block-level HTML tag pass through raw.
    pub fn allow_html(mut self, allow: bool) -> Self {
        self.allow_html = allow;
        self
    }

    /// Classify every line of the input.
    pub fn classify(mut self) -> Classified {
        while !self.cursor.is_eof() {
            let start = self.cursor.offset();
            let end = self.cursor.line_end();
            if !self.fence_line(start, end) {
                let lead = self.scan_lead(start, end);
                if lead.content == end {
                    self.blank_line(&lead);
                } else {
                    self.content_line(&lead, end);
                }
            }
            self.cursor.consume_line();
        }
        Classified {
            lines: self.lines,
            link_refs: self.link_refs,
            loose_lists: self.loose_lists,
        }
    }

    fn scan_lead(&self, start: usize, end: usize) -> Lead {
        let b = self.input;
        let (quote_depth, quote_end) = quote_markers(b, start, end, limits::MAX_QUOTE_DEPTH);
        let (indent, level_ends, content) = indentation(b, quote_end, end);
        let lead = Lead {
            quote_depth,
            inner: None,
            quote_end,
            indent,
            level_ends,
            content,
        };

        let keep = (indent as usize).min(self.outer_levels(quote_depth));
        if keep == 0 {
            return lead;
        }
        let room = limits::MAX_QUOTE_DEPTH.saturating_sub(quote_depth as usize);
        let (depth, quote_end) = quote_markers(b, lead.level_ends[keep - 1], end, room);
        if depth == 0 {
            return lead;
        }
        let (indent, level_ends, content) = indentation(b, quote_end, end);
        Lead {
            quote_depth,
            inner: Some(InnerQuote {
                levels: keep as u8,
                depth,
            }),
            quote_end,
            indent,
            level_ends,
            content,
        }
    }

    fn blank_line(&mut self, lead: &Lead) {
        self.blank_run += 1;
        self.in_html = false;
        self.open_def = None;
        let mut line = Line::new(LineType::Blank, Range::empty_at(lead.content as u32));
        line.quote_depth = lead.quotes();
        self.lines.push(line);
    }

    fn content_line(&mut self, lead: &Lead, end: usize) {
        let b = self.input;
        let rest = &b[lead.content..end];

        if self.in_html {
            let containers = self.context.clone();
            let mut line = Line::new(LineType::HtmlBlock, Range::from_usize(lead.quote_end, end));
            line.containers = containers;
            self.push_line(line, lead);
            return;
        }

        if let Some(idx) = self.open_def.take() {
            if let Some(title) = parse_title_only(rest) {
                self.link_refs.extend_title(idx, title);
                let range = Range::from_usize(lead.content, end);
                self.push_silent(Line::new(LineType::LinkDef, range));
                return;
            }
        }

        let levels = self.list_levels(lead);
        if lead.indent as usize > levels {
            match self.prev_paragraph() {
                None => {
                    self.code_line(lead, levels, end);
                    return;
                }
                // Too deep to start a block; continues the paragraph.
                Some(prev) if lead.quotes() <= prev.quote_depth => {
                    self.follow_on_line(lead, end);
                    return;
                }
                Some(_) => {}
            }
        }

        if let Some((ch, len, info)) = fence_open(rest) {
            let containers = self.block_containers(lead, lead.indent);
            self.fence = Some(FenceState {
                ch,
                len,
                quote_depth: lead.quote_depth,
                inner: lead.inner,
                strip: lead.content - lead.quote_end,
                containers: containers.clone(),
            });
            let mut line = Line::new(LineType::FenceStart, Range::from_usize(lead.content, end));
            line.fence_info =
                info.map(|(s, e)| Range::from_usize(lead.content + s, lead.content + e));
            line.containers = containers;
            self.push_line(line, lead);
            return;
        }

        if let Some(rep) = repeat_run(rest) {
            let underline = matches!(rep.ch, b'=' | b'-') && !rep.spaced && rep.count >= 2;
            if underline && self.try_underline(lead, rep) {
                return;
            }
            if rep.ch != b'=' && rep.count >= 3 {
                let containers = self.block_containers(lead, lead.indent);
                let range = Range::from_usize(lead.content, end);
                let mut line = Line::new(LineType::HorizontalRule, range);
                line.repeat = Some(rep);
                line.containers = containers;
                self.push_line(line, lead);
                return;
            }
        }

        if rest[0] == b'#' {
            if let Some(line) = self.heading_line(lead, end) {
                self.push_line(line, lead);
                return;
            }
        }

        if let Some(marker) = list_marker(rest) {
            self.list_item_line(lead, end, marker);
            return;
        }

        if self.allow_html && lead.indent == 0 && is_html_block_start(rest) {
            self.in_html = true;
            let containers = self.block_containers(lead, 0);
            let mut line = Line::new(LineType::HtmlBlock, Range::from_usize(lead.quote_end, end));
            line.containers = containers;
            self.push_line(line, lead);
            return;
        }

        if rest[0] == b'[' && lead.indent == 0 {
            if let Some(def) = scan_link_def(rest) {
                log::trace!("link definition [{}] -> {}", def.label, def.url);
                let has_title = def.title.is_some();
                let idx = self.link_refs.insert(
                    &def.label,
                    LinkRefDef {
                        url: def.url,
                        title: def.title,
                    },
                );
                if !has_title {
                    self.open_def = Some(idx);
                }
                let range = Range::from_usize(lead.content, end);
                self.push_silent(Line::new(LineType::LinkDef, range));
                return;
            }
        }

        if self.prev_paragraph().is_some_and(|prev| lead.quotes() <= prev.quote_depth) {
            self.follow_on_line(lead, end);
            return;
        }

        let containers = self.block_containers(lead, lead.indent);
        let mut line = self.text_line(LineType::Ordinary, lead.content, end);
        line.containers = containers;
        self.push_line(line, lead);
    }

    /// Continue the previous paragraph line with this one.
    fn follow_on_line(&mut self, lead: &Lead, end: usize) {
        let containers = self
            .lines
            .last()
            .map(|prev| prev.containers.clone())
            .unwrap_or_default();
        let mut line = self.text_line(LineType::Ordinary, lead.content, end);
        line.follow_on = true;
        line.containers = containers;
        // Lazy lines keep the quote depth of the paragraph they continue.
        let depth = self.lines.last().map_or(0, |prev| prev.quote_depth);
        self.push_line(line, lead);
        if let Some(last) = self.lines.last_mut() {
            last.quote_depth = depth;
        }
    }

    fn code_line(&mut self, lead: &Lead, levels: usize, end: usize) {
        let start = lead.level_ends.get(levels).copied().unwrap_or(lead.content);
        let containers = self.block_containers(lead, levels as u8);
        let mut line = Line::new(LineType::Code, Range::from_usize(start, end));
        line.containers = containers;
        self.push_line(line, lead);
    }

    /// Classify a line inside an open fence; `false` when no fence is open
    /// or the line has left the fence's blockquote.
    fn fence_line(&mut self, start: usize, end: usize) -> bool {
        let Some(fence) = self.fence.as_ref() else {
            return false;
        };
        let b = self.input;

        let (outer, mut pos) = quote_markers(b, start, end, fence.quote_depth as usize);
        let mut found = outer;
        if let Some(inner) = fence.inner.filter(|_| outer == fence.quote_depth) {
            pos = skip_levels(b, pos, end, inner.levels as usize);
            let (depth, after) = quote_markers(b, pos, end, inner.depth as usize);
            found += depth;
            pos = after;
        }
        let wanted = fence.quote_depth + fence.inner.map_or(0, |q| q.depth);
        if found < wanted {
            log::trace!("fence ends with its blockquote");
            self.fence = None;
            return false;
        }

        let mut stripped = 0;
        while stripped < fence.strip && pos < end && b[pos] == b' ' {
            pos += 1;
            stripped += 1;
        }

        let containers = fence.containers.clone();
        let closing = {
            let rest = &b[pos..end];
            let lead_spaces = rest.iter().take(3).take_while(|&&c| c == b' ').count();
            let run = rest[lead_spaces..].iter().take_while(|&&c| c == fence.ch).count();
            run >= fence.len && rest[lead_spaces + run..].iter().all(|&c| c == b' ' || c == b'\t')
        };

        let mut line = if closing {
            self.fence = None;
            Line::new(LineType::FenceEnd, Range::from_usize(pos, end))
        } else {
            Line::new(LineType::Code, Range::from_usize(pos, end))
        };
        line.containers = containers.clone();
        self.context = containers;
        self.blank_run = 0;
        self.lines.push(line);
        true
    }

    fn heading_line(&mut self, lead: &Lead, end: usize) -> Option<Line> {
        let b = self.input;
        let mut pos = lead.content;
        let mut level = 0u8;
        while pos < end && b[pos] == b'#' {
            level += 1;
            pos += 1;
        }
        if level > limits::MAX_HEADING_LEVEL || (pos < end && b[pos] != b' ' && b[pos] != b'\t') {
            return None;
        }
        while pos < end && (b[pos] == b' ' || b[pos] == b'\t') {
            pos += 1;
        }

        let mut text_end = end;
        while text_end > pos && (b[text_end - 1] == b' ' || b[text_end - 1] == b'\t') {
            text_end -= 1;
        }
        let after_hashes = text_end;
        while text_end > pos && b[text_end - 1] == b'#' {
            text_end -= 1;
        }
        if text_end < after_hashes {
            if text_end == pos || b[text_end - 1] == b' ' || b[text_end - 1] == b'\t' {
                while text_end > pos && (b[text_end - 1] == b' ' || b[text_end - 1] == b'\t') {
                    text_end -= 1;
                }
            } else {
                text_end = after_hashes;
            }
        }

        let containers = self.block_containers(lead, lead.indent);
        let mut line = Line::new(LineType::Heading, Range::from_usize(pos, text_end));
        line.heading_level = level;
        line.containers = containers;
        Some(line)
    }

    fn list_item_line(&mut self, lead: &Lead, end: usize, marker: ListMarker) {
        let levels = self.list_levels(lead);
        let level = (lead.indent as usize).min(levels).min(limits::MAX_LIST_DEPTH - 1);
        let tag = if marker.ordered {
            BlockTag::OrderedList
        } else {
            BlockTag::UnorderedList
        };

        let mut stack = self.base(lead);
        let cq = stack.len();
        if level > 0 {
            stack.extend_from_slice(&self.context[cq..cq + level * 2]);
        }

        let continued = if level < levels {
            let list = self.context[cq + level * 2];
            let item = self.context[cq + level * 2 + 1];
            (list.tag == tag).then_some((list, item))
        } else {
            None
        };
        let (list, ordinal) = match continued {
            Some((list, item)) => {
                if self.blank_run > 0 {
                    self.loose_lists.insert(list.serial);
                }
                (list, item.ordinal + 1)
            }
            None => {
                if self.blank_run > 0 && level > 0 {
                    self.loose_lists.insert(self.context[cq + (level - 1) * 2].serial);
                }
                (self.serials.block(tag, 0), 1)
            }
        };
        stack.push(list);
        stack.push(self.serials.block(BlockTag::ListItem, ordinal));

        let text_start = (lead.content + marker.width).min(end);
        let mut line = self.text_line(LineType::ListItem, text_start, end);
        line.containers = stack;
        self.push_line(line, lead);
    }

    /// Promote the previous line to a heading if it can take an underline.
    fn try_underline(&mut self, lead: &Lead, rep: Repeat) -> bool {
        if lead.indent > 0 {
            return false;
        }
        let Some(prev) = self.prev_paragraph() else {
            return false;
        };
        if prev.kind != LineType::Ordinary
            || prev.quote_depth != lead.quotes()
            || prev.containers.iter().any(|b| b.tag == BlockTag::ListItem)
        {
            return false;
        }

        let level = if rep.ch == b'=' { 1 } else { 2 };
        let containers = prev.containers.clone();
        if let Some(prev) = self.lines.last_mut() {
            prev.kind = LineType::Heading;
            prev.heading_level = level;
            prev.follow_on = false;
            prev.hard_break = false;
        }
        log::trace!("underline promotes previous line to h{level}");

        let range = Range::from_usize(lead.content, lead.content);
        let mut line = Line::new(LineType::Underline, range);
        line.repeat = Some(rep);
        line.containers = containers;
        line.quote_depth = lead.quotes();
        self.push_silent(line);
        true
    }

    /// Build a text line, trimming trailing spaces and detecting hard breaks.
    fn text_line(&self, kind: LineType, start: usize, end: usize) -> Line {
        let b = self.input;
        let mut e = end;
        while e > start && (b[e - 1] == b' ' || b[e - 1] == b'\t') {
            e -= 1;
        }
        let trailing = (end - e).min(u8::MAX as usize) as u8;
        let mut hard_break = trailing >= 2;
        if e > start && b[e - 1] == b'\\' {
            let run = b[start..e].iter().rev().take_while(|&&c| c == b'\\').count();
            if run % 2 == 1 {
                hard_break = true;
                e -= 1;
            }
        }
        let mut line = Line::new(kind, Range::from_usize(start, e));
        line.trailing_spaces = trailing;
        line.hard_break = hard_break;
        line
    }

    /// The previous line, if it is paragraph text that a new line may continue.
    fn prev_paragraph(&self) -> Option<&Line> {
        if self.blank_run > 0 {
            return None;
        }
        self.lines
            .last()
            .filter(|l| matches!(l.kind, LineType::Ordinary | LineType::ListItem))
    }

    /// Consecutive blockquotes in the context starting at `pos`.
    fn quote_run_at(&self, pos: usize) -> usize {
        self.context
            .get(pos..)
            .unwrap_or_default()
            .iter()
            .take_while(|b| b.tag == BlockTag::Blockquote)
            .count()
    }

    /// Consecutive list/item pairs in the context starting at `pos`.
    fn pairs_at(&self, pos: usize) -> usize {
        self.context
            .get(pos..)
            .unwrap_or_default()
            .chunks(2)
            .take_while(|pair| {
                pair.len() == 2 && pair[0].tag.is_list() && pair[1].tag == BlockTag::ListItem
            })
            .count()
    }

    /// Open list levels directly inside `quote_depth` leading quotes.
    fn outer_levels(&self, quote_depth: u8) -> usize {
        if self.quote_run_at(0) != quote_depth as usize {
            return 0;
        }
        self.pairs_at(quote_depth as usize)
    }

    /// Open list levels inside the line's quotes.
    fn list_levels(&self, lead: &Lead) -> usize {
        let mut pos = lead.quote_depth as usize;
        if self.quote_run_at(0) != pos {
            return 0;
        }
        if let Some(inner) = lead.inner {
            pos += inner.levels as usize * 2;
            if self.quote_run_at(pos) != inner.depth as usize {
                return 0;
            }
            pos += inner.depth as usize;
        }
        self.pairs_at(pos)
    }

    /// Quotes of the line, with the list items kept between them, reusing
    /// open blocks where the context has them.
    fn base(&mut self, lead: &Lead) -> BlockStack {
        let mut stack = BlockStack::new();
        self.push_quotes(&mut stack, lead.quote_depth);
        if let Some(inner) = lead.inner {
            let from = stack.len();
            let kept = inner.levels as usize * 2;
            stack.extend_from_slice(&self.context[from..from + kept]);
            if self.blank_run > 0 {
                self.loose_lists.insert(self.context[from + kept - 2].serial);
            }
            self.push_quotes(&mut stack, inner.depth);
        }
        stack
    }

    fn push_quotes(&mut self, stack: &mut BlockStack, depth: u8) {
        let from = stack.len();
        let open = self.quote_run_at(from);
        for i in 0..depth as usize {
            if i < open {
                stack.push(self.context[from + i]);
            } else {
                stack.push(self.serials.block(BlockTag::Blockquote, 0));
            }
        }
    }

    /// Containers for a block that is not a list item.
    ///
    /// Indentation selects how many open list items the block stays inside.
    fn block_containers(&mut self, lead: &Lead, indent: u8) -> BlockStack {
        let levels = self.list_levels(lead);
        let keep = (indent as usize).min(levels);
        let mut stack = self.base(lead);
        if keep > 0 {
            let cq = stack.len();
            stack.extend_from_slice(&self.context[cq..cq + keep * 2]);
            if self.blank_run > 0 {
                self.loose_lists.insert(self.context[cq + (keep - 1) * 2].serial);
            }
        }
        stack
    }

    fn push_line(&mut self, mut line: Line, lead: &Lead) {
        line.indent = lead.indent;
        line.quote_depth = lead.quotes();
        log::trace!(
            "line {}: {:?} depth={} indent={} follow_on={}",
            self.lines.len() + 1,
            line.kind,
            line.containers.len(),
            line.indent,
            line.follow_on
        );
        self.context = line.containers.clone();
        self.blank_run = 0;
        self.lines.push(line);
    }

    /// Push a line that produces no block and leaves the context alone.
    fn push_silent(&mut self, line: Line) {
        self.blank_run = 0;
        self.lines.push(line);
    }
}

/// Consume up to `max` blockquote markers, each after at most three spaces.
fn quote_markers(b: &[u8], start: usize, end: usize, max: usize) -> (u8, usize) {
    let mut pos = start;
    let mut depth = 0u8;
    while (depth as usize) < max {
        let mut p = pos;
        while p < end && p - pos < 3 && b[p] == b' ' {
            p += 1;
        }
        if p >= end || b[p] != b'>' {
            break;
        }
        depth += 1;
        p += 1;
        if p < end && b[p] == b' ' {
            p += 1;
        }
        pos = p;
    }
    (depth, pos)
}

/// Indentation levels from `start`: a tab or four spaces each.
fn indentation(b: &[u8], start: usize, end: usize) -> (u8, SmallVec<[usize; 4]>, usize) {
    let mut pos = start;
    let mut indent = 0u8;
    let mut level_ends = SmallVec::new();
    let mut spaces = 0;
    while pos < end {
        match b[pos] {
            b'\t' => {
                pos += 1;
                spaces = 0;
                indent = indent.saturating_add(1);
                level_ends.push(pos);
            }
            b' ' => {
                pos += 1;
                spaces += 1;
                if spaces == 4 {
                    spaces = 0;
                    indent = indent.saturating_add(1);
                    level_ends.push(pos);
                }
            }
            _ => break,
        }
    }
    (indent, level_ends, pos)
}

/// Skip up to `levels` indentation levels.
fn skip_levels(b: &[u8], start: usize, end: usize, levels: usize) -> usize {
    if levels == 0 {
        return start;
    }
    let (_, level_ends, content) = indentation(b, start, end);
    level_ends.get(levels - 1).copied().unwrap_or(content)
}

/// Opening code fence: returns (char, run length, info string bounds).
fn fence_open(rest: &[u8]) -> Option<(u8, usize, Option<(usize, usize)>)> {
    let ch = *rest.first()?;
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let len = rest.iter().take_while(|&&c| c == ch).count();
    if len < 3 {
        return None;
    }
    let mut start = len;
    while start < rest.len() && (rest[start] == b' ' || rest[start] == b'\t') {
        start += 1;
    }
    let mut end = rest.len();
    while end > start && (rest[end - 1] == b' ' || rest[end - 1] == b'\t') {
        end -= 1;
    }
    if ch == b'`' && rest[start..end].contains(&b'`') {
        return None;
    }
    Some((ch, len, (end > start).then_some((start, end))))
}

/// A line made only of one of `-`, `*`, `_`, `=` (and spaces).
fn repeat_run(rest: &[u8]) -> Option<Repeat> {
    let ch = *rest.first()?;
    if !matches!(ch, b'-' | b'*' | b'_' | b'=') {
        return None;
    }
    let mut end = rest.len();
    while end > 0 && (rest[end - 1] == b' ' || rest[end - 1] == b'\t') {
        end -= 1;
    }
    let mut count = 0u32;
    let mut spaced = false;
    for &c in &rest[..end] {
        if c == ch {
            count += 1;
        } else if c == b' ' || c == b'\t' {
            spaced = true;
        } else {
            return None;
        }
    }
    Some(Repeat { ch, count, spaced })
}

fn list_marker(rest: &[u8]) -> Option<ListMarker> {
    let first = *rest.first()?;
    let (ordered, marker_len) = match first {
        b'-' | b'+' | b'*' => (false, 1),
        b'0'..=b'9' => {
            let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
            if digits > limits::MAX_LIST_MARKER_DIGITS {
                return None;
            }
            match rest.get(digits) {
                Some(b'.') | Some(b')') => (true, digits + 1),
                _ => return None,
            }
        }
        _ => return None,
    };
    match rest.get(marker_len) {
        None => Some(ListMarker {
            ordered,
            width: marker_len,
        }),
        Some(b' ') | Some(b'\t') => {
            let gap = rest[marker_len..]
                .iter()
                .take_while(|&&c| c == b' ' || c == b'\t')
                .count();
            Some(ListMarker {
                ordered,
                width: marker_len + gap,
            })
        }
        _ => None,
    }
}

fn is_html_block_start(rest: &[u8]) -> bool {
    if rest.first() != Some(&b'<') {
        return false;
    }
    if rest.starts_with(b"<!--") {
        return true;
    }
    let name_start = if rest.get(1) == Some(&b'/') { 2 } else { 1 };
    let name_len = rest[name_start.min(rest.len())..]
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return false;
    }
    let name_end = name_start + name_len;
    if !matches!(rest.get(name_end), None | Some(b' ') | Some(b'\t') | Some(b'>') | Some(b'/')) {
        return false;
    }
    let name = String::from_utf8_lossy(&rest[name_start..name_end]).to_ascii_lowercase();
    HTML_BLOCK_TAGS.contains(&name.as_str())
}

/// Scan `[label]: url "title"` one character at a time.
fn scan_link_def(line: &[u8]) -> Option<DefParts> {
    let mut state = DefState::LeftBracket;
    let (mut label_start, mut label_end) = (0, 0);
    let (mut url_start, mut url_end) = (0, 0);
    let (mut title_start, mut title_end) = (0, 0);
    let mut angle = false;
    let mut closer = 0u8;
    let mut title_closed = false;

    let mut i = 0;
    while i < line.len() {
        let c = line[i];
        match state {
            DefState::LeftBracket => {
                if c != b'[' {
                    return None;
                }
                label_start = i + 1;
                state = DefState::RightBracket;
            }
            DefState::RightBracket => match c {
                b']' => {
                    label_end = i;
                    state = DefState::Colon;
                }
                b'\\' => i += 1,
                b'[' => return None,
                _ => {}
            },
            DefState::Colon => {
                if c != b':' {
                    return None;
                }
                state = DefState::LinkStart;
            }
            DefState::LinkStart => {
                if c == b'<' {
                    angle = true;
                    url_start = i + 1;
                    state = DefState::LinkEnd;
                } else if c != b' ' && c != b'\t' {
                    url_start = i;
                    state = DefState::LinkEnd;
                }
            }
            DefState::LinkEnd => {
                if angle {
                    if c == b'>' {
                        url_end = i;
                        state = DefState::TitleStart;
                    }
                } else if c == b' ' || c == b'\t' {
                    url_end = i;
                    state = DefState::TitleStart;
                }
            }
            DefState::TitleStart => match c {
                b' ' | b'\t' => {}
                b'"' | b'\'' | b'(' => {
                    closer = if c == b'(' { b')' } else { c };
                    title_start = i + 1;
                    state = DefState::TitleEnd;
                }
                _ => return None,
            },
            DefState::TitleEnd => {
                if title_closed {
                    if c != b' ' && c != b'\t' {
                        return None;
                    }
                } else if c == closer {
                    title_end = i;
                    title_closed = true;
                }
            }
        }
        i += 1;
    }

    match state {
        DefState::LinkEnd if !angle => url_end = line.len(),
        DefState::TitleStart => {}
        DefState::TitleEnd if title_closed => {}
        _ => return None,
    }

    let label = String::from_utf8_lossy(&line[label_start..label_end]);
    if label.trim().is_empty() || label.starts_with('[') || url_end <= url_start {
        return None;
    }
    Some(DefParts {
        label: label.into_owned(),
        url: String::from_utf8_lossy(&line[url_start..url_end]).into_owned(),
        title: title_closed
            .then(|| String::from_utf8_lossy(&line[title_start..title_end]).into_owned()),
    })
}

/// A line holding only a quoted title, continuing the previous definition.
fn parse_title_only(rest: &[u8]) -> Option<String> {
    let mut end = rest.len();
    while end > 0 && (rest[end - 1] == b' ' || rest[end - 1] == b'\t') {
        end -= 1;
    }
    let rest = &rest[..end];
    let open = *rest.first()?;
    let close = match open {
        b'"' | b'\'' => open,
        b'(' => b')',
        _ => return None,
    };
    if rest.len() < 2 || rest[rest.len() - 1] != close {
        return None;
    }
    let inner = &rest[1..rest.len() - 1];
    if inner.contains(&close) {
        return None;
    }
    Some(String::from_utf8_lossy(inner).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: &str) -> Classified {
        LineClassifier::new(input.as_bytes()).classify()
    }

    fn kinds(input: &str) -> Vec<LineType> {
        classify(input).lines.iter().map(|l| l.kind).collect()
    }

    fn text<'a>(input: &'a str, line: &Line) -> &'a str {
        std::str::from_utf8(line.text.slice(input.as_bytes())).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(classify("").lines.is_empty());
    }

    #[test]
    fn test_paragraph_and_follow_on() {
        let input = "one\ntwo\n\nthree";
        let c = classify(input);
        assert_eq!(
            kinds(input),
            vec![LineType::Ordinary, LineType::Ordinary, LineType::Blank, LineType::Ordinary]
        );
        assert!(!c.lines[0].follow_on);
        assert!(c.lines[1].follow_on);
        assert!(!c.lines[3].follow_on);
        assert_eq!(text(input, &c.lines[1]), "two");
    }

    #[test]
    fn test_atx_heading() {
        let input = "## Title ##";
        let c = classify(input);
        assert_eq!(c.lines[0].kind, LineType::Heading);
        assert_eq!(c.lines[0].heading_level, 2);
        assert_eq!(text(input, &c.lines[0]), "Title");
    }

    #[test]
    fn test_hash_without_space_is_text() {
        assert_eq!(kinds("#hashtag"), vec![LineType::Ordinary]);
        assert_eq!(kinds("####### seven"), vec![LineType::Ordinary]);
    }

    #[test]
    fn test_underline_promotes_previous_line() {
        let input = "Title\n=====\n";
        let c = classify(input);
        assert_eq!(c.lines[0].kind, LineType::Heading);
        assert_eq!(c.lines[0].heading_level, 1);
        assert_eq!(c.lines[1].kind, LineType::Underline);

        let c = classify("Sub\n---");
        assert_eq!(c.lines[0].heading_level, 2);
    }

    #[test]
    fn test_rule_after_blank_line() {
        assert_eq!(
            kinds("text\n\n---"),
            vec![LineType::Ordinary, LineType::Blank, LineType::HorizontalRule]
        );
        assert_eq!(kinds("* * *"), vec![LineType::HorizontalRule]);
        assert_eq!(kinds("text\n***"), vec![LineType::Ordinary, LineType::HorizontalRule]);
    }

    #[test]
    fn test_equals_without_text_is_ordinary() {
        assert_eq!(kinds("==="), vec![LineType::Ordinary]);
    }

    #[test]
    fn test_bullet_items_share_list() {
        let c = classify("- a\n- b");
        let first = &c.lines[0].containers;
        let second = &c.lines[1].containers;
        assert_eq!(first[0], second[0]);
        assert_eq!(first[1].ordinal, 1);
        assert_eq!(second[1].ordinal, 2);
        assert!(!first[1].same_as(&second[1]));
    }

    #[test]
    fn test_ordered_item_counter() {
        let c = classify("1. a\n1. b\n7. c");
        let ordinals: Vec<u32> = c.lines.iter().map(|l| l.containers[1].ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(c.lines[0].containers[0].tag, BlockTag::OrderedList);
    }

    #[test]
    fn test_list_kind_switch_starts_new_list() {
        let c = classify("- a\n1. b");
        assert!(!c.lines[0].containers[0].same_as(&c.lines[1].containers[0]));
        assert_eq!(c.lines[1].containers[1].ordinal, 1);
    }

    #[test]
    fn test_nested_list() {
        let c = classify("- a\n    - b\n- c");
        assert_eq!(c.lines[1].containers.len(), 4);
        assert_eq!(c.lines[2].containers.len(), 2);
        assert_eq!(c.lines[0].containers[0], c.lines[2].containers[0]);
    }

    #[test]
    fn test_loose_list_detection() {
        let c = classify("- a\n\n- b");
        let list = c.lines[0].containers[0];
        assert!(c.is_loose(&list));

        let c = classify("- a\n- b\n\npara");
        let list = c.lines[0].containers[0];
        assert!(!c.is_loose(&list));
        assert!(c.lines[3].containers.is_empty());
    }

    #[test]
    fn test_blockquote_depth() {
        let input = "> > deep";
        let c = classify(input);
        assert_eq!(c.lines[0].quote_depth, 2);
        assert_eq!(c.lines[0].containers.len(), 2);
        assert_eq!(text(input, &c.lines[0]), "deep");
    }

    #[test]
    fn test_lazy_quote_continuation() {
        let c = classify("> quoted\nlazy");
        assert!(c.lines[1].follow_on);
        assert_eq!(c.lines[1].containers.len(), 1);
    }

    #[test]
    fn test_indented_code() {
        let input = "    let x = 1;\n\n    let y = 2;";
        let c = classify(input);
        assert_eq!(c.lines[0].kind, LineType::Code);
        assert_eq!(text(input, &c.lines[0]), "let x = 1;");
        assert_eq!(c.lines[2].kind, LineType::Code);
    }

    #[test]
    fn test_indented_line_does_not_interrupt_paragraph() {
        let c = classify("para\n    more");
        assert_eq!(c.lines[1].kind, LineType::Ordinary);
        assert!(c.lines[1].follow_on);
    }

    #[test]
    fn test_code_inside_list_needs_extra_level() {
        let c = classify("- item\n\n    continued\n\n        code");
        assert_eq!(c.lines[2].kind, LineType::Ordinary);
        assert_eq!(c.lines[2].containers.len(), 2);
        assert_eq!(c.lines[4].kind, LineType::Code);
    }

    #[test]
    fn test_quote_inside_list_item() {
        let input = "- a\n    > q";
        let c = classify(input);
        let tags: Vec<BlockTag> = c.lines[1].containers.iter().map(|b| b.tag).collect();
        assert_eq!(
            tags,
            vec![BlockTag::UnorderedList, BlockTag::ListItem, BlockTag::Blockquote]
        );
        assert_eq!(c.lines[1].quote_depth, 1);
        assert_eq!(text(input, &c.lines[1]), "q");
    }

    #[test]
    fn test_indented_rule_continues_paragraph() {
        let c = classify("foo\n    ---");
        assert_eq!(c.lines[1].kind, LineType::Ordinary);
        assert!(c.lines[1].follow_on);
    }

    #[test]
    fn test_quoted_fence_ends_without_marker() {
        let input = "> ```\n> x\n\ny";
        let c = classify(input);
        assert_eq!(c.lines[1].kind, LineType::Code);
        let last = c.lines.last().unwrap();
        assert_eq!(last.kind, LineType::Ordinary);
        assert_eq!(last.quote_depth, 0);
        assert!(last.containers.is_empty());
    }

    #[test]
    fn test_fenced_code() {
        let input = "```rust\nfn main() {}\n\n```\nafter";
        let c = classify(input);
        assert_eq!(
            kinds(input),
            vec![
                LineType::FenceStart,
                LineType::Code,
                LineType::Code,
                LineType::FenceEnd,
                LineType::Ordinary
            ]
        );
        let info = c.lines[0].fence_info.unwrap();
        assert_eq!(info.slice(input.as_bytes()), b"rust");
    }

    #[test]
    fn test_hard_breaks() {
        let c = classify("two spaces  \nbackslash\\\nescaped\\\\\nnone");
        assert!(c.lines[0].hard_break);
        assert_eq!(c.lines[0].trailing_spaces, 2);
        assert!(c.lines[1].hard_break);
        assert!(!c.lines[2].hard_break);
        assert!(!c.lines[3].hard_break);
    }

    #[test]
    fn test_link_definition() {
        let c = classify("[Home]: https://example.com \"Home Page\"\ntext");
        assert_eq!(c.lines[0].kind, LineType::LinkDef);
        let def = c.link_refs.get("home").unwrap();
        assert_eq!(def.url, "https://example.com");
        assert_eq!(def.title.as_deref(), Some("Home Page"));
        assert!(!c.lines[1].follow_on);
    }

    #[test]
    fn test_link_definition_variants() {
        assert_eq!(
            scan_link_def(b"[a]: <http://x y> 'T'"),
            Some(DefParts {
                label: "a".into(),
                url: "http://x y".into(),
                title: Some("T".into())
            })
        );
        let def = scan_link_def(b"[a]: /u (paren title)").unwrap();
        assert_eq!(def.title.as_deref(), Some("paren title"));
        assert!(scan_link_def(b"[a] /u").is_none());
        assert!(scan_link_def(b"[a]:").is_none());
        assert!(scan_link_def(b"[a]: /u \"open").is_none());
        assert!(scan_link_def(b"[a]: /u \"t\" junk").is_none());
        assert!(scan_link_def(b"[]: /u").is_none());
    }

    #[test]
    fn test_link_definition_title_on_next_line() {
        let c = classify("[id]: /url\n    \"Later Title\"");
        assert_eq!(c.lines[1].kind, LineType::LinkDef);
        assert_eq!(c.link_refs.get("id").unwrap().title.as_deref(), Some("Later Title"));
    }

    #[test]
    fn test_malformed_definition_is_text() {
        assert_eq!(kinds("[not a def] here"), vec![LineType::Ordinary]);
    }

    #[test]
    fn test_html_block_until_blank() {
        assert_eq!(
            kinds("<div>\n*raw*\n</div>\n\ntext"),
            vec![
                LineType::HtmlBlock,
                LineType::HtmlBlock,
                LineType::HtmlBlock,
                LineType::Blank,
                LineType::Ordinary
            ]
        );
        assert_eq!(kinds("<span>inline</span>"), vec![LineType::Ordinary]);
    }

    #[test]
    fn test_html_disabled() {
        let c = LineClassifier::new(b"<div>x</div>").allow_html(false).classify();
        assert_eq!(c.lines[0].kind, LineType::Ordinary);
    }

    #[test]
    fn test_tabs_count_as_levels() {
        let c = classify("\tcode");
        assert_eq!(c.lines[0].kind, LineType::Code);
        assert_eq!(c.lines[0].indent, 1);
    }

    #[test]
    fn test_list_marker_shapes() {
        assert!(list_marker(b"- x").is_some());
        assert!(list_marker(b"-").is_some());
        assert!(list_marker(b"12. x").unwrap().ordered);
        assert!(list_marker(b"-x").is_none());
        assert!(list_marker(b"1.x").is_none());
        assert!(list_marker(b"1234567890. x").is_none());
    }
}

//! Second pass over classified lines: block stack transitions.

use crate::Range;

use super::classify::Classified;
use super::event::BlockEvent;
use super::line::{Line, LineType};
use super::stack::{common_prefix, Block, BlockStack, BlockTag, SerialSource};

/// Turns classified lines into nested open/close events.
pub struct BlockTracker<'c> {
    classified: &'c Classified,
    /// Serials for leaf blocks. Leaf tags never equal container tags, so
    /// these cannot collide with the classifier's serials.
    serials: SerialSource,
    /// Currently emitted stack.
    open: BlockStack,
    /// Indented code block that the next code line may continue.
    code: Option<Block>,
    /// Inside a fence; code lines always continue the open block.
    in_fence: bool,
    /// HTML block that the next HTML line may continue.
    html: Option<Block>,
    /// Blank lines seen since the last indented code line.
    code_blanks: usize,
}

impl<'c> BlockTracker<'c> {
    pub fn new(classified: &'c Classified) -> Self {
        Self {
            classified,
            serials: SerialSource::new(),
            open: BlockStack::new(),
            code: None,
            in_fence: false,
            html: None,
            code_blanks: 0,
        }
    }

    /// Emit events for every line, closing everything at the end.
    pub fn track(mut self, events: &mut Vec<BlockEvent>) {
        let classified = self.classified;
        events.reserve(classified.lines.len() * 2);
        for line in &classified.lines {
            self.line(line, events);
        }
        self.transition(BlockStack::new(), None, events);
    }

    fn line(&mut self, line: &Line, events: &mut Vec<BlockEvent>) {
        // A fence can also end without a closing line, when its quote ends.
        if !matches!(line.kind, LineType::Code | LineType::FenceEnd) {
            self.in_fence = false;
        }
        match line.kind {
            LineType::Blank => {
                if self.code.is_some() {
                    self.code_blanks += 1;
                }
                self.html = None;
            }
            LineType::LinkDef | LineType::Underline => {}
            LineType::Heading | LineType::Ordinary | LineType::ListItem => {
                self.reset_leaves();
                if line.follow_on && self.open.len() >= line.containers.len() {
                    events.push(text_event(line));
                    return;
                }
                let mut target = line.containers.clone();
                if line.kind == LineType::Heading {
                    let level = line.heading_level.clamp(1, 6);
                    target.push(self.serials.block(BlockTag::Heading(level), 0));
                } else if self.wraps_in_paragraph(&line.containers) {
                    target.push(self.serials.block(BlockTag::Paragraph, 0));
                }
                self.transition(target, None, events);
                events.push(text_event(line));
            }
            LineType::FenceStart => {
                self.reset_leaves();
                let mut target = line.containers.clone();
                let block = self.serials.block(BlockTag::Code, 0);
                target.push(block);
                self.transition(target, line.fence_info, events);
                self.in_fence = true;
            }
            LineType::FenceEnd => {
                self.in_fence = false;
                self.code = None;
            }
            LineType::Code => self.code_line(line, events),
            LineType::HtmlBlock => {
                self.code = None;
                self.code_blanks = 0;
                let block = match self.html {
                    Some(block) => block,
                    None => self.serials.block(BlockTag::Html, 0),
                };
                self.html = Some(block);
                let mut target = line.containers.clone();
                target.push(block);
                self.transition(target, None, events);
                events.push(BlockEvent::Html(line.text));
            }
            LineType::HorizontalRule => {
                self.reset_leaves();
                self.transition(line.containers.clone(), None, events);
                events.push(BlockEvent::Rule);
            }
        }
    }

    fn code_line(&mut self, line: &Line, events: &mut Vec<BlockEvent>) {
        self.html = None;
        if self.in_fence {
            events.push(BlockEvent::Code(line.text));
            return;
        }

        let continues = match self.code {
            Some(block) => {
                let depth = line.containers.len();
                self.open.len() == depth + 1
                    && self.open.last().is_some_and(|b| b.same_as(&block))
                    && common_prefix(&self.open, &line.containers) == depth
            }
            None => false,
        };

        if continues {
            for _ in 0..self.code_blanks {
                events.push(BlockEvent::Code(Range::empty_at(line.text.start)));
            }
        } else {
            let block = self.serials.block(BlockTag::Code, 0);
            self.code = Some(block);
            let mut target = line.containers.clone();
            target.push(block);
            self.transition(target, None, events);
        }
        self.code_blanks = 0;
        events.push(BlockEvent::Code(line.text));
    }

    /// Text directly inside a list item only gets a paragraph in loose lists.
    fn wraps_in_paragraph(&self, containers: &[Block]) -> bool {
        match containers {
            [.., list, item] if item.tag == BlockTag::ListItem => self.classified.is_loose(list),
            _ => true,
        }
    }

    fn reset_leaves(&mut self) {
        self.code = None;
        self.code_blanks = 0;
        self.html = None;
    }

    /// Close the old tail, then open the new one.
    fn transition(
        &mut self,
        target: BlockStack,
        info: Option<Range>,
        events: &mut Vec<BlockEvent>,
    ) {
        let keep = common_prefix(&self.open, &target);
        for block in self.open[keep..].iter().rev() {
            log::trace!("close {:?}#{}", block.tag, block.serial);
            events.push(BlockEvent::Close(*block));
        }
        let mut info = info;
        for block in &target[keep..] {
            log::trace!("open {:?}#{}", block.tag, block.serial);
            if block.tag == BlockTag::Code {
                if let Some(range) = info.take() {
                    events.push(BlockEvent::CodeInfo(range));
                }
            }
            events.push(BlockEvent::Open(*block));
        }
        self.open = target;
    }
}

fn text_event(line: &Line) -> BlockEvent {
    BlockEvent::Text {
        range: line.text,
        follow_on: line.follow_on,
        hard_break: line.hard_break,
    }
}

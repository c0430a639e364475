//! mkdown: Markdown to HTML for note collections
//!
//! Renders a Markdown dialect with wiki-links (`[[Note Title]]`) and
//! note-id links (`[text](@id)`) into an HTML fragment, a full HTML
//! document, normalized Markdown, or an XBEL bookmark list.
//!
//! # Pipeline
//! - Line classification: one type and container stack per physical line
//! - Block tracking: stacks of consecutive lines diffed into open/close events
//! - Inline chunking and resolution: code spans, links, emphasis
//! - Writing: one pass over the events in the chosen [`OutputFormat`]
//!
//! Rendering never fails. Malformed Markdown degrades to literal text and
//! unknown note links still produce a link to the would-be note.

pub mod block;
pub mod counts;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod link_ref;
pub mod range;
pub mod render;
pub mod renderer;
pub mod wiki;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export primary types
pub use block::{BlockEvent, LineClassifier};
pub use counts::Counts;
pub use error::{Error, Result};
pub use inline::InlineParser;
pub use link_ref::{LinkRefDef, LinkRefStore};
pub use range::Range;
pub use render::HtmlWriter;
pub use renderer::Renderer;
pub use wiki::{LinkResolver, NoteIndex, ResolvedNote, WikiLinkFormat};

/// What the writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// HTML body content only.
    #[default]
    HtmlFragment,
    /// Complete HTML document with head and body.
    HtmlDoc,
    /// Normalized Markdown.
    Markdown,
    /// XBEL bookmarks: headings become folders, links become bookmarks.
    BookmarksXml,
}

/// Rendering options.
///
/// Hosts typically load these from configuration; every field has a
/// default so partial JSON works.
///
/// ```
/// let options: mkdown::Options = serde_json::from_str(r#"{"wikiLinkPrefix": "/n/"}"#).unwrap();
/// assert_eq!(options.wiki_link_prefix, "/n/");
/// assert!(options.double_bracket_parsing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub format: OutputFormat,
    /// How note ids are written into hrefs.
    pub wiki_link_format: WikiLinkFormat,
    /// Parse `[[...]]` as wiki-links.
    pub double_bracket_parsing: bool,
    pub wiki_link_prefix: String,
    pub wiki_link_suffix: String,
    /// Pass raw HTML blocks through.
    pub allow_html: bool,
    /// Document title for `HtmlDoc` and `BookmarksXml`.
    pub title: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: OutputFormat::HtmlFragment,
            wiki_link_format: WikiLinkFormat::Common,
            double_bracket_parsing: true,
            wiki_link_prefix: "note://".to_string(),
            wiki_link_suffix: String::new(),
            allow_html: true,
            title: None,
        }
    }
}

/// Output of [`render`]: the document plus counts gathered along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    pub counts: Counts,
}

/// Convert Markdown to an HTML fragment.
///
/// # Example
/// ```
/// let html = mkdown::to_html("# Hello\n\nWorld");
/// assert_eq!(html, "<h1>Hello</h1>\n<p>World</p>\n");
/// ```
pub fn to_html(input: &str) -> String {
    render(input, &Options::default(), None).output
}

/// Convert Markdown with options and no note resolver.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    render(input, options, None).output
}

/// Render `input` in `options.format`, resolving note links with `resolver`.
///
/// # Example
/// ```
/// use mkdown::{render, NoteIndex, Options};
///
/// let mut notes = NoteIndex::new();
/// notes.insert("Meeting Notes", "20230101120000");
///
/// let rendered = render("See [[meeting notes]].", &Options::default(), Some(&notes));
/// assert_eq!(
///     rendered.output,
///     "<p>See <a href=\"note://20230101120000\">Meeting Notes</a>.</p>\n"
/// );
/// assert_eq!(rendered.counts.wiki_links_resolved, 1);
/// ```
pub fn render(input: &str, options: &Options, resolver: Option<&dyn LinkResolver>) -> Rendered {
    let input = input.as_bytes();
    let (classified, events) = block::parse(input, options.allow_html);
    let counts = Counts::from_lines(input, &classified.lines);

    let mut renderer =
        Renderer::new(input, &classified.link_refs, options, resolver).with_counts(counts);
    renderer.begin();
    for event in &events {
        renderer.event(event);
    }
    let (output, counts) = renderer.finish();
    Rendered { output, counts }
}

/// A Markdown document loaded from a string, file or reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mkdown {
    text: String,
}

impl Mkdown {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load a UTF-8 file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { text })
    }

    /// Read all of `reader`, which must yield UTF-8.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self {
            text: String::from_utf8(bytes)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn render(&self, options: &Options, resolver: Option<&dyn LinkResolver>) -> Rendered {
        render(&self.text, options, resolver)
    }

    pub fn to_html(&self) -> String {
        to_html(&self.text)
    }
}

//! Wiki-link resolution: `[[Note Title]]`, `[[Target|Alias]]` and `[text](@id)`.
//!
//! Targets are normalized (case-folded, punctuation dropped, whitespace
//! collapsed) before they are looked up, and the href is built from the
//! canonical id in the configured [`WikiLinkFormat`]. Unresolved targets
//! still get a link so the note can be created later.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::escape;
use crate::Options;

/// A note found by a [`LinkResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNote {
    /// Display title of the note.
    pub title: String,
    /// Stable identifier used to build the href.
    pub canonical_id: String,
}

/// Looks up notes by normalized title or id.
///
/// Implementations receive the output of [`normalize_id`].
pub trait LinkResolver {
    fn lookup(&self, id: &str) -> Option<ResolvedNote>;
}

impl<F> LinkResolver for F
where
    F: Fn(&str) -> Option<ResolvedNote>,
{
    fn lookup(&self, id: &str) -> Option<ResolvedNote> {
        self(id)
    }
}

/// How ids are written into hrefs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WikiLinkFormat {
    /// Lowercase letters and digits only: `meetingnotes`.
    #[default]
    Common,
    /// Lowercase words joined by `-`: `meeting-notes`.
    FileName,
}

impl WikiLinkFormat {
    pub fn format(self, id: &str) -> String {
        match self {
            Self::Common => common_id(id),
            Self::FileName => file_name_id(id),
        }
    }
}

/// Case-fold, drop punctuation and collapse whitespace.
///
/// ```
/// assert_eq!(mkdown::wiki::normalize_id("  Meeting -- Notes! "), "meeting notes");
/// ```
pub fn normalize_id(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_space = !out.is_empty();
        } else if ch.is_alphanumeric() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Lowercase alphanumerics only.
pub fn common_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized words joined by `-`.
pub fn file_name_id(id: &str) -> String {
    normalize_id(id).replace(' ', "-")
}

/// Outcome of resolving one note link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiTarget {
    /// Escaped href attribute value.
    pub href: String,
    /// Resolver title, if the note exists.
    pub title: Option<String>,
}

impl WikiTarget {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.title.is_some()
    }
}

/// Resolve a wiki-link target or `@id` and build its href.
///
/// A `#heading` suffix on the target is ignored for the lookup.
pub fn resolve(raw: &str, resolver: Option<&dyn LinkResolver>, options: &Options) -> WikiTarget {
    let target = raw.split('#').next().unwrap_or(raw);
    let id = normalize_id(target);
    let found = resolver.and_then(|r| r.lookup(&id));
    if found.is_none() {
        log::debug!("unresolved note link [[{raw}]]");
    }

    let canonical = found.as_ref().map_or(id.as_str(), |note| note.canonical_id.as_str());
    let mut href = Vec::with_capacity(options.wiki_link_prefix.len() + canonical.len() + 8);
    href.extend_from_slice(options.wiki_link_prefix.as_bytes());
    href.extend_from_slice(options.wiki_link_format.format(canonical).as_bytes());
    href.extend_from_slice(options.wiki_link_suffix.as_bytes());

    let mut escaped = Vec::with_capacity(href.len());
    escape::escape_url_into(&mut escaped, &href);
    WikiTarget {
        href: String::from_utf8_lossy(&escaped).into_owned(),
        title: found.map(|note| note.title),
    }
}

/// One entry of a [`NoteIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub title: String,
    pub id: String,
}

/// In-memory pick-list of known notes.
///
/// Notes are found by normalized title or by normalized id. Load it from a
/// JSON array of `{"title": ..., "id": ...}` objects.
#[derive(Debug, Clone, Default)]
pub struct NoteIndex {
    notes: Vec<NoteEntry>,
    by_key: FxHashMap<String, usize>,
}

impl NoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note. Earlier notes keep their keys.
    pub fn insert(&mut self, title: impl Into<String>, id: impl Into<String>) {
        let entry = NoteEntry {
            title: title.into(),
            id: id.into(),
        };
        let idx = self.notes.len();
        for key in [normalize_id(&entry.title), normalize_id(&entry.id)] {
            if !key.is_empty() {
                self.by_key.entry(key).or_insert(idx);
            }
        }
        self.notes.push(entry);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<NoteEntry> = serde_json::from_str(json)?;
        Ok(entries.into_iter().collect())
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let entries: Vec<NoteEntry> = serde_json::from_reader(reader)?;
        Ok(entries.into_iter().collect())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteEntry> {
        self.notes.iter()
    }
}

impl FromIterator<NoteEntry> for NoteIndex {
    fn from_iter<I: IntoIterator<Item = NoteEntry>>(iter: I) -> Self {
        let mut index = Self::new();
        for entry in iter {
            index.insert(entry.title, entry.id);
        }
        index
    }
}

impl LinkResolver for NoteIndex {
    fn lookup(&self, id: &str) -> Option<ResolvedNote> {
        let idx = *self.by_key.get(id)?;
        let entry = self.notes.get(idx)?;
        Some(ResolvedNote {
            title: entry.title.clone(),
            canonical_id: entry.id.clone(),
        })
    }
}

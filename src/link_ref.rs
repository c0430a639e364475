//! Reference link definitions (`[label]: url "title"`).

use rustc_hash::FxHashMap;

/// A reference link definition (URL + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDef {
    pub url: String,
    pub title: Option<String>,
}

/// Store of link reference definitions, keyed by normalized label.
///
/// Definitions are collected by the line classifier before any output is
/// produced, so a reference may appear before or after its definition.
#[derive(Debug, Default)]
pub struct LinkRefStore {
    defs: Vec<LinkRefDef>,
    by_label: FxHashMap<String, usize>,
}

impl LinkRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. First definition wins.
    ///
    /// A duplicate may still extend a title-less definition with its title;
    /// the URL is never replaced. Returns the index of the stored definition.
    pub fn insert(&mut self, label: &str, def: LinkRefDef) -> usize {
        let key = normalize_label(label);
        if let Some(&idx) = self.by_label.get(&key) {
            log::debug!("duplicate link definition [{key}] ignored");
            if let Some(title) = def.title {
                self.extend_title(idx, title);
            }
            return idx;
        }
        let idx = self.defs.len();
        self.defs.push(def);
        self.by_label.insert(key, idx);
        idx
    }

    /// Attach a title to a definition that does not have one yet.
    pub fn extend_title(&mut self, idx: usize, title: String) {
        if let Some(def) = self.defs.get_mut(idx) {
            if def.title.is_none() {
                def.title = Some(title);
            }
        }
    }

    /// Look a label up (normalizing it first).
    pub fn get(&self, label: &str) -> Option<&LinkRefDef> {
        let idx = *self.by_label.get(&normalize_label(label))?;
        self.defs.get(idx)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Normalize a link label: collapse internal whitespace to single spaces,
/// trim, and lowercase.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for word in label.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in word.chars() {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(url: &str, title: Option<&str>) -> LinkRefDef {
        LinkRefDef {
            url: url.to_string(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Foo   BAR "), "foo bar");
        assert_eq!(normalize_label("Ünïcode"), "ünïcode");
    }

    #[test]
    fn test_first_definition_wins() {
        let mut store = LinkRefStore::new();
        store.insert("Home", def("https://one.example", None));
        store.insert("home", def("https://two.example", Some("Two")));
        let found = store.get("HOME").unwrap();
        assert_eq!(found.url, "https://one.example");
        // The duplicate extends the missing title.
        assert_eq!(found.title.as_deref(), Some("Two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_does_not_replace_title() {
        let mut store = LinkRefStore::new();
        store.insert("a", def("/a", Some("First")));
        store.insert("a", def("/b", Some("Second")));
        assert_eq!(store.get("a").unwrap().title.as_deref(), Some("First"));
    }

    #[test]
    fn test_missing_label() {
        let store = LinkRefStore::new();
        assert!(store.is_empty());
        assert!(store.get("nothing").is_none());
        assert!(!store.contains("nothing"));
    }
}

// src/source/fixture.rs
// =============================================================================
// StaticSource: a PageSource backed by a fixed table of pages.
//
// Used for offline runs (`build --fixture pages.json`) and for tests, where
// the exact graph must be reproducible.
//
// Fixture file format:
//   {
//     "en": {
//       "Cat": { "outlinks": ["Dog"], "translations": [{"lang": "fr", "title": "Chat"}] }
//     },
//     "fr": { "Chat": { "outlinks": ["Chien"] } }
//   }
//
// Pages missing from the table are reported as unavailable.
// =============================================================================

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::{PageLinks, PageSource, Translation};
use crate::error::{ExportError, SourceError};

#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: HashMap<(String, String), PageLinks>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, handy for tests.
    pub fn page(
        mut self,
        lang: &str,
        title: &str,
        outlinks: &[&str],
        translations: &[(&str, &str)],
    ) -> Self {
        self.insert(
            lang,
            title,
            PageLinks {
                outlinks: outlinks.iter().map(|t| t.to_string()).collect(),
                translations: translations
                    .iter()
                    .map(|(l, t)| Translation::new(*l, *t))
                    .collect(),
            },
        );
        self
    }

    pub fn insert(&mut self, lang: &str, title: &str, links: PageLinks) {
        self.pages.insert((lang.to_string(), title.to_string()), links);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ExportError> {
        let table: BTreeMap<String, BTreeMap<String, PageLinks>> = serde_json::from_str(json)?;

        let mut source = Self::new();
        for (lang, pages) in table {
            for (title, links) in pages {
                source.insert(&lang, &title, links);
            }
        }
        Ok(source)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ExportError> {
        let json = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl PageSource for StaticSource {
    async fn fetch_links(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError> {
        self.pages
            .get(&(lang.to_string(), title.to_string()))
            .cloned()
            .ok_or_else(|| SourceError::unavailable(lang, title, "not in fixture"))
    }
}

// src/source/mod.rs
// =============================================================================
// Page sources: where the builder gets links from.
//
// Submodules:
// - wiki: live MediaWiki API client (reqwest)
// - lead: extracts article links from the rendered lead section (scraper)
// - fixture: deterministic in-memory link table, loadable from JSON
//
// The builder only depends on the PageSource trait, so tests and offline
// runs swap the network out for a fixture.
// =============================================================================

mod fixture;
mod lead;
mod wiki;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

pub use fixture::StaticSource;
pub use lead::extract_lead_links;
pub use wiki::{WikiSource, WikiSourceConfig, DEFAULT_API_TEMPLATE, DEFAULT_USER_AGENT};

/// A cross-language equivalent of a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Translation {
    pub lang: String,
    pub title: String,
}

impl Translation {
    pub fn new(lang: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            title: title.into(),
        }
    }
}

/// Everything the builder needs to know about one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Titles of same-language pages this page links to, in page order
    #[serde(default)]
    pub outlinks: Vec<String>,
    /// Equivalent pages in other languages
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// Something that can look up the links of a page.
///
/// Implementations report every failure (missing page, network error, ...)
/// as SourceError::PageUnavailable. Timeouts are applied by the caller.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_links(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError>;
}

impl<S: PageSource> PageSource for &S {
    async fn fetch_links(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError> {
        (**self).fetch_links(lang, title).await
    }
}

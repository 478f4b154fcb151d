// src/error.rs
// =============================================================================
// Error types shared across the crate.
//
// Each layer gets its own enum so callers can match on exactly what went wrong:
// - SourceError: a page could not be fetched (always recoverable)
// - ClientError: a page source could not be set up
// - GraphError: an insertion into the GraphStore was rejected
// - BuildError: the build as a whole could not produce a graph
// - ConfigError: invalid BuildConfig values
// - ExportError: saving, loading or rendering a graph failed
//
// main.rs wraps all of these in anyhow::Error for reporting.
// =============================================================================

use std::path::PathBuf;

/// A page could not be retrieved from a PageSource.
///
/// Missing pages, API errors, transport failures and timeouts all fold into
/// this single variant; the builder treats it as "zero links discovered".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("page unavailable: {lang}:{title} ({reason})")]
    PageUnavailable {
        lang: String,
        title: String,
        reason: String,
    },
}

impl SourceError {
    pub fn unavailable(lang: &str, title: &str, reason: impl Into<String>) -> Self {
        SourceError::PageUnavailable {
            lang: lang.to_string(),
            title: title.to_string(),
            reason: reason.into(),
        }
    }
}

/// A page source could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Rejected GraphStore mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("graph is full ({max_pages} pages), cannot add {lang}:{title}")]
    CapacityExceeded {
        max_pages: usize,
        lang: String,
        title: String,
    },

    #[error("unknown node id {0}")]
    UnknownNode(usize),

    #[error("link edge must stay within one language, got {source_lang} -> {target_lang}")]
    LanguageMismatch {
        source_lang: String,
        target_lang: String,
    },

    #[error("translation edge must cross languages, both ends are '{0}'")]
    SameLanguage(String),
}

/// Failures that stop a build from producing any graph.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("seed '{title}' for language '{lang}' could not be resolved: {source}")]
    FatalSeed {
        lang: String,
        title: String,
        #[source]
        source: SourceError,
    },

    #[error("none of the configured seeds could be resolved")]
    NoResolvableSeeds,
}

/// Invalid build configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one seed is required")]
    NoSeeds,

    #[error("language '{0}' has more than one seed")]
    DuplicateLanguage(String),

    #[error("invalid language code '{0}'")]
    InvalidLanguage(String),

    #[error("seed title for language '{0}' is empty")]
    EmptyTitle(String),

    #[error("{name} must be within [0, 1], got {value}")]
    ChanceOutOfRange { name: &'static str, value: f64 },

    #[error("max pages must be at least 1")]
    ZeroMaxPages,

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("invalid seed '{0}', expected LANG=TITLE")]
    MalformedSeed(String),
}

/// Failures while persisting, reloading or rendering a graph.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("saved graph is inconsistent: {0}")]
    Inconsistent(#[from] GraphError),

    #[error("saved nodes are out of order: expected id {expected}, found {found}")]
    NodeOrder { expected: usize, found: usize },
}

// src/source/wiki.rs
// =============================================================================
// WikiSource: fetches page links from a live MediaWiki installation.
//
// Two API requests per page:
// 1. action=parse&section=0   -> rendered HTML of the lead section,
//                                 from which outlinks are extracted
// 2. action=query&prop=langlinks -> interlanguage links (translations)
//
// Both follow redirects server-side (redirects=1).
//
// Politeness:
// - A fixed delay follows every request so we don't hammer the API
// - Requests carry a descriptive User-Agent, as Wikimedia asks of bots
//
// Every failure is folded into SourceError::PageUnavailable; the builder
// decides what to do with it.
// =============================================================================

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{extract_lead_links, PageLinks, PageSource, Translation};
use crate::error::{ClientError, SourceError};

pub const DEFAULT_API_TEMPLATE: &str = "https://{lang}.wikipedia.org/w/api.php";

pub const DEFAULT_USER_AGENT: &str =
    concat!("wiki-excavator/", env!("CARGO_PKG_VERSION"), " (multilingual link graph crawler)");

#[derive(Debug, Clone)]
pub struct WikiSourceConfig {
    /// API endpoint; "{lang}" is replaced by the language code
    pub api_template: String,
    pub user_agent: String,
    /// Transport-level timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Delay after each request
    pub politeness: Duration,
}

impl Default for WikiSourceConfig {
    fn default() -> Self {
        Self {
            api_template: DEFAULT_API_TEMPLATE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(10),
            politeness: Duration::from_millis(100),
        }
    }
}

pub struct WikiSource {
    client: Client,
    config: WikiSourceConfig,
}

impl WikiSource {
    pub fn new(config: WikiSourceConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    fn api_url(&self, lang: &str, params: &[(&str, &str)]) -> Result<Url, url::ParseError> {
        let endpoint = self.config.api_template.replace("{lang}", lang);
        Url::parse_with_params(&endpoint, params)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        lang: &str,
        title: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = self
            .api_url(lang, params)
            .map_err(|e| SourceError::unavailable(lang, title, format!("bad API URL: {}", e)))?;

        debug!(url = %url.as_str(), "requesting");
        let result = self.client.get(url).send().await;

        // Polite crawling: small delay after every request, failed or not
        tokio::time::sleep(self.config.politeness).await;

        let response = result.map_err(|e| SourceError::unavailable(lang, title, describe_error(&e)))?;

        if !response.status().is_success() {
            return Err(SourceError::unavailable(
                lang,
                title,
                format!("HTTP {}", response.status().as_u16()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::unavailable(lang, title, describe_error(&e)))
    }
}

impl PageSource for WikiSource {
    async fn fetch_links(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError> {
        let parse: ParseResponse = self
            .get_json(
                lang,
                title,
                &[
                    ("action", "parse"),
                    ("page", title),
                    ("prop", "text"),
                    ("section", "0"),
                    ("redirects", "1"),
                    ("format", "json"),
                    ("formatversion", "2"),
                ],
            )
            .await?;

        let query: QueryResponse = self
            .get_json(
                lang,
                title,
                &[
                    ("action", "query"),
                    ("prop", "langlinks"),
                    ("titles", title),
                    ("lllimit", "max"),
                    ("redirects", "1"),
                    ("format", "json"),
                    ("formatversion", "2"),
                ],
            )
            .await?;

        links_from_responses(lang, title, parse, query)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    title: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    langlinks: Vec<Translation>,
}

fn links_from_responses(
    lang: &str,
    title: &str,
    parse: ParseResponse,
    query: QueryResponse,
) -> Result<PageLinks, SourceError> {
    if let Some(err) = parse.error.or(query.error) {
        return Err(SourceError::unavailable(
            lang,
            title,
            format!("{}: {}", err.code, err.info),
        ));
    }

    let parsed = parse
        .parse
        .ok_or_else(|| SourceError::unavailable(lang, title, "empty parse response"))?;

    let page = query
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| SourceError::unavailable(lang, title, "empty query response"))?;

    if page.missing || page.invalid {
        return Err(SourceError::unavailable(lang, title, "missing page"));
    }

    Ok(PageLinks {
        outlinks: extract_lead_links(&parsed.text, &parsed.title),
        translations: page.langlinks,
    })
}

// Turns a reqwest error into a short human-readable reason
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_decode() {
        "malformed API response".to_string()
    } else {
        error.to_string()
    }
}

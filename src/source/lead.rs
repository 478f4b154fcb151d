// src/source/lead.rs
// =============================================================================
// Extracts article links from the rendered HTML of a page's lead section.
//
// Only the lead (the text before the first heading) is used: it holds the
// links most closely related to the subject and keeps the graph sparse.
//
// Rules:
// - only internal article links (<a href="/wiki/...">) count
// - red links to pages that don't exist (class="new") are skipped
// - the target title is read from the anchor's title attribute
// - titles containing '.', '#', ',' or ':' are dropped; the colon also
//   removes namespaced pages such as File: or Category:
// - links back to the page itself are dropped
// - duplicates are removed, first occurrence wins
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;

// characters that should not appear in a followed page title
const BAD_CHARS: [char; 4] = ['.', '#', ',', ':'];

pub fn extract_lead_links(html: &str, page_title: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let document = Html::parse_fragment(html);

    // Constant selector, known to be valid
    let selector = Selector::parse(r#"a[href^="/wiki/"]:not(.new)"#).unwrap();

    for element in document.select(&selector) {
        let Some(title) = element.value().attr("title") else {
            continue;
        };
        let title = title.trim();

        if title.is_empty() || title == page_title || title.contains(&BAD_CHARS[..]) {
            continue;
        }

        if seen.insert(title.to_string()) {
            links.push(title.to_string());
        }
    }

    links
}

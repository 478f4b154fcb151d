// src/export/summary.rs
// =============================================================================
// Per-language counts of a graph, for the terminal table and --json output.
// =============================================================================

use serde::Serialize;

use crate::graph::{EdgeKind, GraphStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageSummary {
    pub lang: String,
    pub pages: usize,
    pub link_edges: usize,
    /// Translation edges whose source page is in this language
    pub translation_edges: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub pages: usize,
    pub link_edges: usize,
    pub translation_edges: usize,
    pub languages: Vec<LanguageSummary>,
}

impl GraphSummary {
    pub fn of(graph: &GraphStore) -> Self {
        let mut languages: Vec<LanguageSummary> = graph
            .languages()
            .into_iter()
            .map(|lang| LanguageSummary {
                lang: lang.to_string(),
                pages: graph.nodes_of(lang).count(),
                link_edges: 0,
                translation_edges: 0,
            })
            .collect();

        for edge in graph.edges() {
            let Some(source) = graph.node(edge.source) else {
                continue;
            };
            if let Some(entry) = languages.iter_mut().find(|l| l.lang == source.lang) {
                match edge.kind {
                    EdgeKind::Link => entry.link_edges += 1,
                    EdgeKind::Translation => entry.translation_edges += 1,
                }
            }
        }

        Self {
            pages: graph.size(),
            link_edges: graph.link_edge_count(),
            translation_edges: graph.translation_edge_count(),
            languages,
        }
    }
}

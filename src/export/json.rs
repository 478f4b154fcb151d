// src/export/json.rs
// =============================================================================
// Node-link JSON persistence.
//
// The document layout follows the common "node-link" graph exchange shape
// (nodes array + links array referencing node ids), so saved graphs can be
// loaded by other graph tooling as well as by `wiki-excavator inspect`.
//
//   {
//     "directed": true,
//     "graph": { "max_pages": 100, "languages": ["en", "fr"] },
//     "nodes": [ { "id": 0, "lang": "en", "title": "Cat" }, ... ],
//     "links": [ { "source": 0, "target": 1, "kind": "translation",
//                  "color": "blue", "inverted": false }, ... ]
//   }
//
// Loading replays every node and edge through GraphStore, so a tampered
// file that breaks an invariant is rejected instead of loaded.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::write_file;
use crate::error::ExportError;
use crate::graph::{EdgeKind, GraphStore, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub directed: bool,
    pub graph: GraphMeta,
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    pub max_pages: usize,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub lang: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    // Informational, derived from kind
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub inverted: bool,
}

impl GraphDocument {
    pub fn from_graph(graph: &GraphStore) -> Self {
        Self {
            directed: true,
            graph: GraphMeta {
                max_pages: graph.max_pages(),
                languages: graph.languages().into_iter().map(str::to_string).collect(),
            },
            nodes: graph
                .nodes()
                .map(|node| NodeRecord {
                    id: node.id,
                    lang: node.lang.clone(),
                    title: node.title.clone(),
                })
                .collect(),
            links: graph
                .edges()
                .iter()
                .map(|edge| LinkRecord {
                    source: edge.source,
                    target: edge.target,
                    kind: edge.kind,
                    color: edge.kind.color().to_string(),
                    inverted: edge.inverted,
                })
                .collect(),
        }
    }

    /// Rebuilds a GraphStore, validating every node and edge on the way.
    ///
    /// Saved pages are replayed as seeds, so a graph whose seeds went past
    /// its cap reloads with the same cap.
    pub fn into_graph(self) -> Result<GraphStore, ExportError> {
        let mut graph = GraphStore::new(self.graph.max_pages);

        for record in &self.nodes {
            let id = graph.seed_node(&record.lang, &record.title);
            if id != record.id {
                return Err(ExportError::NodeOrder {
                    expected: id.0,
                    found: record.id.0,
                });
            }
        }

        for link in &self.links {
            match link.kind {
                EdgeKind::Link => {
                    graph.add_link_edge(link.source, link.target)?;
                }
                // An inverted edge was discovered from its target
                EdgeKind::Translation if link.inverted => {
                    graph.add_translation_edge(link.target, link.source, true)?;
                }
                EdgeKind::Translation => {
                    graph.add_translation_edge(link.source, link.target, false)?;
                }
            }
        }

        Ok(graph)
    }
}

pub fn save_json(graph: &GraphStore, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(&GraphDocument::from_graph(graph))?;
    write_file(path, &json)
}

pub fn load_json(path: &Path) -> Result<GraphStore, ExportError> {
    let json = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: GraphDocument = serde_json::from_str(&json)?;
    document.into_graph()
}

// src/graph/store.rs
// =============================================================================
// GraphStore: owns every node and edge of one build.
//
// Lookup structures:
// - index: (lang, title) -> NodeId, so add_node is idempotent in O(1)
// - edge_set: (source, target, kind), so duplicate edges are no-ops
//
// NodeIds are dense and assigned in discovery order, which makes them a
// stable enumeration for exporters.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::error::GraphError;

/// Position of a page in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A page in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    /// Discovery order, also the node's index in the store
    pub id: NodeId,
    /// Language code, e.g. "en"
    pub lang: String,
    /// Article title as reported by the page source
    pub title: String,
    /// Targets of link edges already materialized from this page
    pub outlinks: BTreeSet<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Same-language hyperlink (drawn red)
    Link,
    /// Cross-language translation (drawn blue)
    Translation,
}

impl EdgeKind {
    pub fn color(&self) -> &'static str {
        match self {
            EdgeKind::Link => "red",
            EdgeKind::Translation => "blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    /// Translation edges only: direction was flipped from discovery order
    pub inverted: bool,
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    max_pages: usize,
    nodes: Vec<PageNode>,
    index: HashMap<(String, String), NodeId>,
    edges: Vec<Edge>,
    edge_set: HashSet<(NodeId, NodeId, EdgeKind)>,
}

impl GraphStore {
    /// Creates an empty store holding at most `max_pages` pages.
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() >= self.max_pages
    }

    pub fn find(&self, lang: &str, title: &str) -> Option<NodeId> {
        self.index
            .get(&(lang.to_string(), title.to_string()))
            .copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&PageNode> {
        self.nodes.get(id.0)
    }

    /// Adds a page, or returns the existing one.
    ///
    /// Fails with CapacityExceeded only when the page is new and the store
    /// already holds `max_pages` pages.
    pub fn add_node(&mut self, lang: &str, title: &str) -> Result<NodeId, GraphError> {
        if let Some(id) = self.find(lang, title) {
            return Ok(id);
        }
        if self.is_full() {
            return Err(GraphError::CapacityExceeded {
                max_pages: self.max_pages,
                lang: lang.to_string(),
                title: title.to_string(),
            });
        }
        Ok(self.insert(lang, title))
    }

    /// Adds a seed page. Seeds are admitted even past the cap.
    pub fn seed_node(&mut self, lang: &str, title: &str) -> NodeId {
        match self.find(lang, title) {
            Some(id) => id,
            None => self.insert(lang, title),
        }
    }

    fn insert(&mut self, lang: &str, title: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(PageNode {
            id,
            lang: lang.to_string(),
            title: title.to_string(),
            outlinks: BTreeSet::new(),
        });
        self.index.insert((lang.to_string(), title.to_string()), id);
        id
    }

    /// Adds a same-language link edge. Returns false if it already existed.
    pub fn add_link_edge(&mut self, src: NodeId, dst: NodeId) -> Result<bool, GraphError> {
        let (source_lang, target_lang) = self.langs_of(src, dst)?;
        if source_lang != target_lang {
            return Err(GraphError::LanguageMismatch {
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
            });
        }

        let inserted = self.push_edge(src, dst, EdgeKind::Link, false);
        if inserted {
            self.nodes[src.0].outlinks.insert(dst);
        }
        Ok(inserted)
    }

    /// Adds a translation edge discovered while expanding `a`.
    ///
    /// With `inverted` the stored edge points b -> a instead of a -> b.
    /// Returns false if the (directed) edge already existed.
    pub fn add_translation_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        inverted: bool,
    ) -> Result<bool, GraphError> {
        let (lang_a, lang_b) = self.langs_of(a, b)?;
        if lang_a == lang_b {
            return Err(GraphError::SameLanguage(lang_a.to_string()));
        }

        let (source, target) = if inverted { (b, a) } else { (a, b) };
        Ok(self.push_edge(source, target, EdgeKind::Translation, inverted))
    }

    fn langs_of(&self, a: NodeId, b: NodeId) -> Result<(&str, &str), GraphError> {
        let a = self.node(a).ok_or(GraphError::UnknownNode(a.0))?;
        let b = self.node(b).ok_or(GraphError::UnknownNode(b.0))?;
        Ok((a.lang.as_str(), b.lang.as_str()))
    }

    fn push_edge(&mut self, source: NodeId, target: NodeId, kind: EdgeKind, inverted: bool) -> bool {
        if !self.edge_set.insert((source, target, kind)) {
            return false;
        }
        self.edges.push(Edge {
            source,
            target,
            kind,
            inverted,
        });
        true
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PageNode> {
        self.nodes.iter()
    }

    pub fn nodes_of<'a>(&'a self, lang: &'a str) -> impl Iterator<Item = &'a PageNode> + 'a {
        self.nodes.iter().filter(move |node| node.lang == lang)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn link_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Link).count()
    }

    pub fn translation_edge_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Translation)
            .count()
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId, kind: EdgeKind) -> bool {
        self.edge_set.contains(&(source, target, kind))
    }

    /// Distinct languages in order of first appearance.
    pub fn languages(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for node in &self.nodes {
            if !seen.contains(&node.lang.as_str()) {
                seen.push(node.lang.as_str());
            }
        }
        seen
    }
}

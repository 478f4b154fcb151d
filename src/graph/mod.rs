// src/graph/mod.rs
// =============================================================================
// The in-memory multilingual page graph.
//
// Nodes are pages keyed by (language, title). Edges come in two kinds:
// - Link ("red"): a hyperlink between two pages of the same language
// - Translation ("blue"): the same concept in two different languages
//
// The store only grows during a build; every insertion either succeeds
// completely or leaves the graph untouched.
// =============================================================================

mod store;

pub use store::{Edge, EdgeKind, GraphStore, NodeId, PageNode};

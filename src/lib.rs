// src/lib.rs
// =============================================================================
// wiki-excavator: builds a multilingual graph of encyclopedia articles.
//
// Nodes are pages keyed by (language, title). Red edges are same-language
// hyperlinks, blue edges are translations of the same subject.
//
// Modules, leaves first:
// - error: typed errors for every layer
// - config: the immutable BuildConfig
// - graph: GraphStore, the in-memory graph
// - source: the PageSource trait, the MediaWiki client and a fixture source
// - builder: GraphBuilder, the capped breadth-first traversal
// - export: JSON save/load, Graphviz rendering, summaries
//
// Typical use:
//   let config = BuildConfig::new(seeds, 0.8, 0.1, 100)?;
//   let report = GraphBuilder::new(config, source).build(&StopSignal::new()).await?;
//   export::save_json(&report.graph, &path)?;
// =============================================================================

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod source;

pub use builder::{BuildReport, GraphBuilder, StopSignal, Termination};
pub use config::{BuildConfig, Seed, SeedPolicy};
pub use graph::GraphStore;

// src/export/mod.rs
// =============================================================================
// Everything that happens to a graph after it is built.
//
// Submodules:
// - json: save a graph as a node-link JSON document and load it back
// - dot: render a graph as Graphviz DOT (red links, blue translations)
// - summary: per-language counts for terminal / JSON output
//
// None of these mutate the graph; they only read the stable enumeration of
// nodes and edges that GraphStore exposes.
// =============================================================================

mod dot;
mod json;
mod summary;

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::ExportError;

pub use dot::{render_dot, write_dot};
pub use json::{load_json, save_json, GraphDocument};
pub use summary::{GraphSummary, LanguageSummary};

/// Directory (under the output root) for saved graphs.
pub const GRAPHS_DIR: &str = "Excavated Graphs";
/// Directory (under the output root) for rendered figures.
pub const FIGURES_DIR: &str = "Figures";

/// File stem shared by the saved graph and its figure:
/// "{first seed title}_{max pages}_samples_graph".
pub fn file_stem(config: &BuildConfig) -> String {
    let title = config
        .seeds()
        .first()
        .map(|seed| seed.title.as_str())
        .unwrap_or("graph");

    let safe: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    format!("{}_{}_samples_graph", safe, config.max_pages())
}

pub fn graph_path(out_dir: &Path, config: &BuildConfig) -> PathBuf {
    out_dir.join(GRAPHS_DIR).join(format!("{}.json", file_stem(config)))
}

pub fn figure_path(out_dir: &Path, config: &BuildConfig) -> PathBuf {
    out_dir.join(FIGURES_DIR).join(format!("{}.dot", file_stem(config)))
}

// Writes a file, creating its parent directory first
fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}

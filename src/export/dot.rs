// src/export/dot.rs
// =============================================================================
// Renders a graph as Graphviz DOT.
//
// - one cluster per language, nodes filled with that language's colour
// - link edges red, translation edges blue
// - inverted translation edges dashed
//
// Render with e.g. `sfdp -Tpng Figures/Cat_100_samples_graph.dot -o cat.png`
// =============================================================================

use std::fmt::Write as _;
use std::path::Path;

use super::write_file;
use crate::error::ExportError;
use crate::graph::{EdgeKind, GraphStore};

// Qualitative palette, one colour per language in order of appearance
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn render_dot(graph: &GraphStore) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail, so the fmt::Results are ignored
    let _ = writeln!(out, "digraph excavation {{");
    let _ = writeln!(out, "  graph [overlap=false, splines=true];");
    let _ = writeln!(out, "  node [style=filled, fontname=\"Helvetica\", fontsize=10];");

    for (i, lang) in graph.languages().into_iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let _ = writeln!(out, "  subgraph cluster_{} {{", i);
        let _ = writeln!(out, "    label=\"{}\";", escape(lang));
        let _ = writeln!(out, "    color=\"{}\";", color);
        for node in graph.nodes_of(lang) {
            let _ = writeln!(
                out,
                "    n{} [label=\"{}\", fillcolor=\"{}\"];",
                node.id.0,
                escape(&node.title),
                color
            );
        }
        let _ = writeln!(out, "  }}");
    }

    for edge in graph.edges() {
        let style = match edge.kind {
            EdgeKind::Translation if edge.inverted => ", style=dashed",
            _ => "",
        };
        let _ = writeln!(
            out,
            "  n{} -> n{} [color={}{}];",
            edge.source.0,
            edge.target.0,
            edge.kind.color(),
            style
        );
    }

    let _ = writeln!(out, "}}");
    out
}

pub fn write_dot(graph: &GraphStore, path: &Path) -> Result<(), ExportError> {
    write_file(path, &render_dot(graph))
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_colors_edges_by_kind() {
        let mut graph = GraphStore::new(10);
        let cat = graph.add_node("en", "Cat").unwrap();
        let chat = graph.add_node("fr", "Chat").unwrap();
        let dog = graph.add_node("en", "Dog").unwrap();
        graph.add_link_edge(cat, dog).unwrap();
        graph.add_translation_edge(cat, chat, false).unwrap();
        graph.add_translation_edge(dog, chat, true).unwrap();

        let dot = render_dot(&graph);
        assert!(dot.starts_with("digraph excavation {"));
        assert!(dot.contains("n0 -> n2 [color=red];"));
        assert!(dot.contains("n0 -> n1 [color=blue];"));
        assert!(dot.contains("n1 -> n2 [color=blue, style=dashed];"));
        assert!(dot.contains("subgraph cluster_0 {"));
        assert!(dot.contains("label=\"fr\";"));
        assert!(dot.contains("n1 [label=\"Chat\", fillcolor=\"#ff7f0e\"];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escapes_quotes_in_titles() {
        let mut graph = GraphStore::new(10);
        graph.add_node("en", "The \"Cat\"").unwrap();
        assert!(render_dot(&graph).contains(r#"label="The \"Cat\"""#));
    }

    #[test]
    fn test_write_creates_figures_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Figures").join("g.dot");
        let mut graph = GraphStore::new(1);
        graph.add_node("en", "Cat").unwrap();

        write_dot(&graph, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Cat"));
    }
}

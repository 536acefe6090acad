use std::collections::HashSet;
use std::fmt::Write;

use crate::graph::ImportGraph;
use crate::graph::node::SourceFile;
use crate::query::circular::Cycle;
use crate::query::output::DisplayNames;

const CYCLE_EDGE_STYLE: &str = "color=red penwidth=2";
const CYCLE_NODE_FILL: &str = "#F1948A";
const NODE_FILL: &str = "#EAECEE";

/// Escape a label for use inside a double-quoted DOT string.
pub fn escape_label(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole import graph as a Graphviz digraph.
///
/// One node per scanned file, labelled with its display name; node IDs are
/// `n<index>` in scan order. Edges that belong to a reported cycle, and the
/// files on them, are highlighted.
pub fn render_dot(graph: &ImportGraph, cycles: &[Cycle], names: &DisplayNames<'_>) -> String {
    let cycle_edges: HashSet<(&SourceFile, &SourceFile)> =
        cycles.iter().flat_map(|c| c.edges()).collect();
    let cycle_files: HashSet<&SourceFile> = cycles.iter().flat_map(|c| c.files.iter()).collect();

    let mut out = String::new();
    writeln!(out, "digraph imports {{").unwrap();
    writeln!(out, "    rankdir=LR;").unwrap();
    writeln!(out, "    node [shape=box style=filled fontname=monospace];").unwrap();

    for idx in graph.node_indices() {
        let file = graph.file(idx);
        let fill = if cycle_files.contains(file) {
            CYCLE_NODE_FILL
        } else {
            NODE_FILL
        };
        writeln!(
            out,
            "    n{} [label=\"{}\" fillcolor=\"{}\"];",
            idx.index(),
            escape_label(&names.name(file)),
            fill
        )
        .unwrap();
    }

    for edge in graph.edges() {
        let (Some(src), Some(tgt)) = (graph.index_of(edge.origin), graph.index_of(edge.target))
        else {
            continue;
        };
        if cycle_edges.contains(&(edge.origin, edge.target)) {
            writeln!(
                out,
                "    n{} -> n{} [{}];",
                src.index(),
                tgt.index(),
                CYCLE_EDGE_STYLE
            )
            .unwrap();
        } else {
            writeln!(out, "    n{} -> n{};", src.index(), tgt.index()).unwrap();
        }
    }

    writeln!(out, "}}").unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::query::circular::find_circular;
    use std::path::PathBuf;

    fn file(name: &str) -> SourceFile {
        SourceFile::new(format!("/proj/src/{name}"))
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("plain.js"), "plain.js");
        assert_eq!(escape_label(r#"we"ird\name"#), r#"we\"ird\\name"#);
    }

    #[test]
    fn test_render_dot_highlights_cycle_edges() {
        let files = vec![file("a.js"), file("b.js"), file("c.js")];
        let targets = vec![
            vec![file("b.js"), file("c.js")],
            vec![file("a.js")],
            Vec::new(),
        ];
        let (graph, _) = build_graph(&files, &targets);
        let cycles = find_circular(&graph);

        let canonical = PathBuf::from("/proj/src");
        let display = PathBuf::from("src");
        let names = DisplayNames::new(&canonical, &display);
        let dot = render_dot(&graph, &cycles, &names);

        assert!(dot.starts_with("digraph imports {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("n0 [label=\"src/a.js\" fillcolor=\"#F1948A\"];"));
        assert!(dot.contains("n2 [label=\"src/c.js\" fillcolor=\"#EAECEE\"];"));
        assert!(dot.contains("n0 -> n1 [color=red penwidth=2];"));
        assert!(dot.contains("n1 -> n0 [color=red penwidth=2];"));
        assert!(dot.contains("    n0 -> n2;\n"));
    }

    #[test]
    fn test_render_dot_empty_graph() {
        let graph = ImportGraph::new();
        let canonical = PathBuf::from("/proj/src");
        let display = PathBuf::from("src");
        let names = DisplayNames::new(&canonical, &display);

        let dot = render_dot(&graph, &[], &names);
        assert_eq!(dot.lines().count(), 4);
    }
}

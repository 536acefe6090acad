pub mod edge;
pub mod node;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::graph::{Graph, NodeIndex};

use edge::Edge;
use node::SourceFile;

/// The file-level import graph: a directed petgraph `Graph` with an O(1) path lookup index.
///
/// Node indices follow insertion order, which the builder makes equal to the
/// scanner's deterministic file order. At most one edge exists per
/// (origin, target) pair.
pub struct ImportGraph {
    graph: Graph<SourceFile, (), Directed>,
    /// Maps file paths to their node indices for O(1) lookup.
    file_index: HashMap<SourceFile, NodeIndex>,
}

impl ImportGraph {
    /// Create an empty import graph.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            file_index: HashMap::new(),
        }
    }

    /// Add a file node to the graph. Returns the new node's index.
    /// If the file has already been added, returns the existing index.
    pub fn add_file(&mut self, file: SourceFile) -> NodeIndex {
        if let Some(&existing) = self.file_index.get(&file) {
            return existing;
        }
        let idx = self.graph.add_node(file.clone());
        self.file_index.insert(file, idx);
        idx
    }

    /// Add an `origin -> target` import edge.
    ///
    /// Returns `false` without touching the graph when `target` is not a node
    /// (it was never scanned). Duplicate edges collapse into one.
    pub fn add_import(&mut self, origin: NodeIndex, target: &SourceFile) -> bool {
        let Some(&target_idx) = self.file_index.get(target) else {
            return false;
        };
        if !self.graph.contains_edge(origin, target_idx) {
            self.graph.add_edge(origin, target_idx, ());
        }
        true
    }

    /// Look up the node index of a scanned file.
    pub fn index_of(&self, file: &SourceFile) -> Option<NodeIndex> {
        self.file_index.get(file).copied()
    }

    pub fn file(&self, idx: NodeIndex) -> &SourceFile {
        &self.graph[idx]
    }

    /// Node indices in insertion (scan) order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Import targets of `idx`, in the order the edges were added.
    pub fn targets(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists neighbors most-recently-added first.
        let mut targets: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        targets.reverse();
        targets
    }

    /// All edges, grouped by origin in scan order, then in insertion order.
    pub fn edges(&self) -> Vec<Edge<'_>> {
        self.node_indices()
            .flat_map(|origin| {
                self.targets(origin).into_iter().map(move |target| Edge {
                    origin: &self.graph[origin],
                    target: &self.graph[target],
                })
            })
            .collect()
    }

    /// Number of file nodes in the graph.
    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct import edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for ImportGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters produced while assembling the graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Resolved imports whose target was not among the scanned files.
    pub dropped: usize,
    /// Resolved imports that repeated an existing edge.
    pub duplicates: usize,
}

/// Assemble the import graph.
///
/// `files` is the scanner's ordered file list; `targets[i]` holds the resolved
/// import targets of `files[i]` in extraction order. Targets outside `files`
/// are dropped. No traversal happens here.
pub fn build_graph(files: &[SourceFile], targets: &[Vec<SourceFile>]) -> (ImportGraph, BuildStats) {
    debug_assert_eq!(files.len(), targets.len());

    let mut graph = ImportGraph::new();
    let mut stats = BuildStats::default();

    // Nodes first so that forward references resolve.
    let indices: Vec<NodeIndex> = files.iter().map(|f| graph.add_file(f.clone())).collect();

    for (origin, file_targets) in indices.iter().zip(targets) {
        for target in file_targets {
            let before = graph.edge_count();
            if !graph.add_import(*origin, target) {
                tracing::debug!(
                    origin = %graph.file(*origin),
                    target = %target,
                    "dropping import of a file outside the scanned set"
                );
                stats.dropped += 1;
            } else if graph.edge_count() == before {
                stats.duplicates += 1;
            }
        }
    }

    (graph, stats)
}

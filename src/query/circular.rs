use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::graph::ImportGraph;
use crate::graph::node::SourceFile;

/// A circular import chain, as discovered by the traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Files along the cycle in import order. The first file is repeated at
    /// the end to close it: `a -> b -> a`. A self-import is `[a, a]`.
    pub files: Vec<SourceFile>,
}

impl Cycle {
    /// Consecutive `(origin, target)` pairs along the cycle.
    pub fn edges(&self) -> impl Iterator<Item = (&SourceFile, &SourceFile)> {
        self.files.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// One level of the explicit DFS stack: a node on the current path and the
/// position of the next outgoing edge to examine.
struct Frame {
    node: NodeIndex,
    next_edge: usize,
}

/// Detect circular imports with a depth-first traversal.
///
/// Traversal starts from every node, in scan order, that is still unvisited.
/// An edge to an in-progress node (an ancestor on the current path) closes a
/// cycle: the path suffix from that node, plus the node again. Edges to
/// finished nodes are never followed again, so this reports the cycles a
/// single DFS pass discovers, not every elementary cycle. Cycles that share
/// nodes with an earlier report can be missed, and overlapping cycles reached
/// from different roots are each reported.
///
/// Iterative: graph depth is bounded by memory, not by the call stack.
pub fn find_circular(graph: &ImportGraph) -> Vec<Cycle> {
    let successors: Vec<Vec<NodeIndex>> = graph.node_indices().map(|n| graph.targets(n)).collect();
    let node_count = successors.len();

    let mut state = vec![VisitState::Unvisited; node_count];
    // Position of each in-progress node on the path.
    let mut path_pos: Vec<Option<usize>> = vec![None; node_count];
    let mut path: Vec<Frame> = Vec::new();
    let mut cycles = Vec::new();

    for root in graph.node_indices() {
        if state[root.index()] != VisitState::Unvisited {
            continue;
        }

        state[root.index()] = VisitState::InProgress;
        path_pos[root.index()] = Some(0);
        path.push(Frame {
            node: root,
            next_edge: 0,
        });

        while let Some(frame) = path.last_mut() {
            let node = frame.node;
            let Some(&target) = successors[node.index()].get(frame.next_edge) else {
                state[node.index()] = VisitState::Done;
                path_pos[node.index()] = None;
                path.pop();
                continue;
            };
            frame.next_edge += 1;

            match state[target.index()] {
                VisitState::Unvisited => {
                    state[target.index()] = VisitState::InProgress;
                    path_pos[target.index()] = Some(path.len());
                    path.push(Frame {
                        node: target,
                        next_edge: 0,
                    });
                }
                VisitState::InProgress => {
                    // In-progress nodes always have a path position.
                    let start = path_pos[target.index()].unwrap_or(0);
                    let mut files: Vec<SourceFile> = path[start..]
                        .iter()
                        .map(|f| graph.file(f.node).clone())
                        .collect();
                    files.push(graph.file(target).clone());
                    cycles.push(Cycle { files });
                }
                VisitState::Done => {}
            }
        }
    }

    cycles
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

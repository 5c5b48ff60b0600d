//! Longest-path (critical-path) search.
//!
//! Two independent algorithms:
//!
//! - [`critical_paths_exhaustive`] enumerates every source-to-sink path with
//!   an explicit DFS stack and keeps all paths of maximal length. Exponential
//!   in the worst case; it serves as the reference answer on small circuits.
//! - [`longest_path_dp`] relaxes edges once in topological order and walks
//!   parent links back from the best sink. Linear in nodes plus edges.
//!
//! Path length is counted in nodes, so a single isolated node has length 1.

use crate::error::{GatepathError, Result};
use crate::graph::Dag;

/// One longest path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LongestPath {
    /// Node names from a source to a sink
    pub path: Vec<String>,
    /// Number of nodes on the path
    pub length: usize,
}

impl LongestPath {
    /// Edges traversed along the path, i.e. gate crossings.
    pub fn logic_depth(&self) -> usize {
        self.length.saturating_sub(1)
    }
}

/// Every path achieving the maximal length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CriticalPaths {
    /// Number of nodes on each path
    pub length: usize,
    /// Paths in lexicographic order of their node names
    pub paths: Vec<Vec<String>>,
}

/// Longest distance (in nodes) to every node, with the predecessor that
/// achieved it.
pub(crate) struct DistanceTable {
    pub order: Vec<usize>,
    pub dist: Vec<usize>,
    pub parent: Vec<Option<usize>>,
}

pub(crate) fn longest_distances(graph: &Dag<String>) -> Result<DistanceTable> {
    let order = graph.topological_indices()?;
    let mut dist = vec![1usize; graph.len()];
    let mut parent = vec![None; graph.len()];

    for &u in &order {
        for v in graph.child_indices(u) {
            if dist[u] + 1 > dist[v] {
                dist[v] = dist[u] + 1;
                parent[v] = Some(u);
            }
        }
    }

    Ok(DistanceTable { order, dist, parent })
}

/// Longest path by dynamic programming over a topological order.
///
/// Among sinks with the greatest distance the one with the smallest name is
/// chosen. Fails with [`GatepathError::CyclicGraph`] if the graph is cyclic.
pub fn longest_path_dp(graph: &Dag<String>) -> Result<LongestPath> {
    let table = longest_distances(graph)?;

    let best_sink = (0..graph.len())
        .filter(|&i| graph.child_indices(i).next().is_none())
        .max_by(|&a, &b| {
            table.dist[a]
                .cmp(&table.dist[b])
                .then_with(|| graph.node(b).cmp(graph.node(a)))
        });

    let Some(sink) = best_sink else {
        return Ok(LongestPath::default());
    };

    let mut path = vec![graph.node(sink).clone()];
    let mut current = sink;
    while let Some(prev) = table.parent[current] {
        path.push(graph.node(prev).clone());
        current = prev;
    }
    path.reverse();

    Ok(LongestPath {
        length: table.dist[sink],
        path,
    })
}

/// All maximal-length source-to-sink paths, by exhaustive enumeration.
///
/// Fails with [`GatepathError::CyclicGraph`] when the DFS re-enters a node on
/// the current path, or when some node is unreachable from every source.
pub fn critical_paths_exhaustive(graph: &Dag<String>) -> Result<CriticalPaths> {
    let n = graph.len();
    let children: Vec<Vec<usize>> = (0..n).map(|i| graph.child_indices(i).collect()).collect();

    let mut sources: Vec<usize> = (0..n)
        .filter(|&i| graph.parent_indices(i).next().is_none())
        .collect();
    sources.sort_by(|&a, &b| graph.node(a).cmp(graph.node(b)));

    let mut visited = vec![false; n];
    let mut on_path = vec![false; n];
    let mut best_len = 0usize;
    let mut best: Vec<Vec<usize>> = Vec::new();

    for src in sources {
        let mut path = vec![src];
        let mut frames = vec![(src, 0usize)];
        visited[src] = true;
        on_path[src] = true;

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            if children[node].is_empty() {
                if path.len() > best_len {
                    best_len = path.len();
                    best.clear();
                }
                if path.len() == best_len {
                    best.push(path.clone());
                }
            }

            if let Some(&next) = children[node].get(frame.1) {
                frame.1 += 1;
                if on_path[next] {
                    let start = path.iter().position(|&p| p == next).unwrap_or(0);
                    return Err(GatepathError::CyclicGraph {
                        nodes: path[start..].iter().map(|&i| graph.node(i).clone()).collect(),
                    });
                }
                visited[next] = true;
                on_path[next] = true;
                path.push(next);
                frames.push((next, 0));
            } else {
                frames.pop();
                on_path[node] = false;
                path.pop();
            }
        }
    }

    if visited.iter().any(|&v| !v) {
        let mut nodes: Vec<String> = (0..n)
            .filter(|&i| !visited[i])
            .map(|i| graph.node(i).clone())
            .collect();
        nodes.sort();
        return Err(GatepathError::CyclicGraph { nodes });
    }

    let mut paths: Vec<Vec<String>> = best
        .into_iter()
        .map(|p| p.into_iter().map(|i| graph.node(i).clone()).collect())
        .collect();
    paths.sort();

    Ok(CriticalPaths {
        length: best_len,
        paths,
    })
}

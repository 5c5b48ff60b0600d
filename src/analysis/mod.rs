//! Read-only analyses over a built circuit.
//!
//! [`Analyzer`] freezes an analysis graph once: every gate plus every primary
//! input net becomes a node, with gate-to-gate edges and edges from each
//! primary input to the gates consuming it. Node names are resolved to dense
//! indices at that point and every query below works on the frozen graph, so
//! repeated queries return identical results and never touch the circuit.

mod depth;
mod fanout;
mod path;

use std::fmt;

use tracing::{info, instrument};

pub use depth::{logic_depths, DepthReport};
pub use fanout::{fanout, FanoutReport};
pub use path::{critical_paths_exhaustive, longest_path_dp, CriticalPaths, LongestPath};

use crate::circuit::Circuit;
use crate::error::Result;
use crate::graph::Dag;

/// Longest-path algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Enumerate every source-to-sink path (exponential, reference answer)
    #[cfg_attr(feature = "cli", value(name = "exhaustive"))]
    Exhaustive,
    /// Relax edges in topological order (linear)
    #[default]
    #[cfg_attr(feature = "cli", value(name = "dp"))]
    DynamicProgramming,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::DynamicProgramming => write!(f, "dp"),
        }
    }
}

/// Frozen analysis view of a circuit (or of a bare graph).
#[derive(Debug, Clone)]
pub struct Analyzer<'c> {
    circuit: Option<&'c Circuit>,
    graph: Dag<String>,
    boundary: Vec<bool>,
}

impl<'c> Analyzer<'c> {
    /// Freeze the analysis graph of `circuit`.
    pub fn new(circuit: &'c Circuit) -> Self {
        let mut graph = circuit.graph().clone();
        for net in circuit.primary_inputs() {
            graph.add_node(net.name.clone());
            for &dest in &net.destinations {
                // A primary input node has no predecessors, so it cannot close a cycle.
                graph.add_edge_unchecked(net.name.clone(), circuit.gate_by_id(dest).name.clone());
            }
        }
        let boundary = (0..graph.len()).map(|i| circuit.gate(graph.node(i)).is_none()).collect();
        Self {
            circuit: Some(circuit),
            graph,
            boundary,
        }
    }

    /// Analyze a bare graph whose nodes are all treated as gates.
    ///
    /// No acyclicity is assumed; cyclic input makes every path and depth query
    /// fail with [`crate::GatepathError::CyclicGraph`].
    pub fn from_graph(graph: Dag<String>) -> Analyzer<'static> {
        let boundary = vec![false; graph.len()];
        Analyzer {
            circuit: None,
            graph,
            boundary,
        }
    }

    /// The frozen analysis graph.
    pub fn graph(&self) -> &Dag<String> {
        &self.graph
    }

    /// Whether `name` is a boundary net rather than a gate.
    pub fn is_boundary(&self, name: &str) -> bool {
        self.graph
            .index_of(&name.to_string())
            .map(|i| self.boundary[i])
            .unwrap_or(false)
    }

    /// Fanout of every gate.
    pub fn fanout(&self) -> FanoutReport {
        match self.circuit {
            Some(circuit) => fanout(circuit),
            None => (0..self.graph.len())
                .map(|i| {
                    let children = self
                        .graph
                        .child_indices(i)
                        .map(|c| self.graph.node(c).clone())
                        .collect();
                    (self.graph.node(i).clone(), children)
                })
                .collect(),
        }
    }

    /// One longest path using `strategy`.
    ///
    /// The exhaustive strategy reports the lexicographically first of all
    /// maximal paths.
    #[instrument(skip(self), fields(nodes = self.graph.len()))]
    pub fn longest_path(&self, strategy: Strategy) -> Result<LongestPath> {
        let longest = match strategy {
            Strategy::DynamicProgramming => longest_path_dp(&self.graph)?,
            Strategy::Exhaustive => {
                let all = critical_paths_exhaustive(&self.graph)?;
                LongestPath {
                    length: all.length,
                    path: all.paths.into_iter().next().unwrap_or_default(),
                }
            }
        };
        info!(length = longest.length, depth = longest.logic_depth(), "longest path found");
        Ok(longest)
    }

    /// Every maximal-length path, by exhaustive enumeration.
    #[instrument(skip(self), fields(nodes = self.graph.len()))]
    pub fn all_longest_paths(&self) -> Result<CriticalPaths> {
        let all = critical_paths_exhaustive(&self.graph)?;
        info!(length = all.length, count = all.paths.len(), "critical paths enumerated");
        Ok(all)
    }

    /// Logic depth of every node and primary output.
    #[instrument(skip(self), fields(nodes = self.graph.len()))]
    pub fn logic_depths(&self) -> Result<DepthReport> {
        logic_depths(&self.graph, self.circuit)
    }

    /// The gates on `path`, dropping boundary nets.
    pub fn gates_on_path<'p>(&self, path: &'p [String]) -> Vec<&'p str> {
        path.iter()
            .filter(|name| !self.is_boundary(name))
            .map(String::as_str)
            .collect()
    }
}

//! Logic-depth assignment.

use indexmap::IndexMap;

use super::path::longest_distances;
use crate::circuit::Circuit;
use crate::error::Result;
use crate::graph::Dag;

/// Logic depth of every analyzed node and of every primary output net.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepthReport {
    /// Depth per node (primary input net or gate), in topological order
    pub nodes: IndexMap<String, usize>,
    /// Depth per primary output net, in designation order
    pub outputs: IndexMap<String, usize>,
}

impl DepthReport {
    /// Greatest node depth, 0 for an empty report.
    pub fn max_depth(&self) -> usize {
        self.nodes.values().copied().max().unwrap_or(0)
    }
}

/// Depth of each node: 0 for nodes without predecessors (primary inputs),
/// otherwise one more than the deepest predecessor.
///
/// When a circuit is given, each primary output net takes the depth of its
/// driving gate; undriven outputs and outputs that are also primary inputs
/// have depth 0.
pub fn logic_depths(graph: &Dag<String>, circuit: Option<&Circuit>) -> Result<DepthReport> {
    let table = longest_distances(graph)?;
    let nodes: IndexMap<String, usize> = table
        .order
        .iter()
        .map(|&i| (graph.node(i).clone(), table.dist[i] - 1))
        .collect();

    let outputs = match circuit {
        Some(circuit) => circuit
            .primary_outputs()
            .map(|net| {
                let depth = circuit
                    .driver(net)
                    .and_then(|gate| nodes.get(&gate.name).copied())
                    .unwrap_or(0);
                (net.name.clone(), depth)
            })
            .collect(),
        None => IndexMap::new(),
    };

    Ok(DepthReport { nodes, outputs })
}

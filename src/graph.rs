//! Generic directed acyclic graph.
//!
//! [`Dag`] knows nothing about gates or nets: it stores opaque node
//! identifiers, keeps the edge set acyclic at insertion time, and answers
//! reachability and ordering queries. Internally every identifier is resolved
//! to a dense index on insertion; the index-level accessors let analysis code
//! work on integers once the graph is frozen.
//!
//! All traversals use explicit worklists so that deep netlists (thousands of
//! gates in a single chain) cannot exhaust the call stack.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use tracing::debug;

use crate::error::{GatepathError, Result};

/// A directed graph that rejects edges closing a cycle.
///
/// Node iteration order is insertion order; child and parent lists keep the
/// order in which edges were added.
#[derive(Debug, Clone)]
pub struct Dag<N> {
    nodes: IndexSet<N>,
    children: Vec<IndexSet<usize>>,
    parents: Vec<IndexSet<usize>>,
}

impl<N> Default for Dag<N> {
    fn default() -> Self {
        Self {
            nodes: IndexSet::new(),
            children: Vec::new(),
            parents: Vec::new(),
        }
    }
}

impl<N> Dag<N>
where
    N: Clone + Eq + Hash + Ord + fmt::Display,
{
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.children.iter().map(IndexSet::len).sum()
    }

    /// Whether `id` is a node of this graph.
    pub fn contains(&self, id: &N) -> bool {
        self.nodes.contains(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Insert a node. Returns `true` if it was not already present.
    pub fn add_node(&mut self, id: N) -> bool {
        let before = self.nodes.len();
        self.insert(id);
        self.nodes.len() != before
    }

    /// Add the edge `src -> dst`, inserting either endpoint if absent.
    ///
    /// Fails with [`GatepathError::Cycle`] when `src` is already reachable from
    /// `dst` (a self-loop included). Returns `true` if the edge is new.
    pub fn add_edge(&mut self, src: N, dst: N) -> Result<bool> {
        let s = self.insert(src);
        let d = self.insert(dst);
        if self.reaches(d, s) {
            debug!(from = %self.nodes[s], to = %self.nodes[d], "rejecting edge that closes a cycle");
            return Err(GatepathError::cycle(&self.nodes[s], &self.nodes[d]));
        }
        Ok(self.link(s, d))
    }

    /// Add the edge `src -> dst` without the reachability check.
    ///
    /// Graphs built this way may contain cycles; [`Dag::topological_order`]
    /// still reports them.
    pub fn add_edge_unchecked(&mut self, src: N, dst: N) -> bool {
        let s = self.insert(src);
        let d = self.insert(dst);
        self.link(s, d)
    }

    /// Remove the edge `src -> dst`. Returns `true` if it existed.
    pub fn remove_edge(&mut self, src: &N, dst: &N) -> bool {
        let (Some(s), Some(d)) = (self.nodes.get_index_of(src), self.nodes.get_index_of(dst)) else {
            return false;
        };
        if !self.children[s].shift_remove(&d) {
            return false;
        }
        self.parents[d].shift_remove(&s);
        true
    }

    /// Remove a node and every edge touching it. Returns `true` if it existed.
    ///
    /// Indices of nodes inserted after the removed one shift down by one.
    pub fn remove_node(&mut self, id: &N) -> bool {
        let Some(idx) = self.nodes.get_index_of(id) else {
            return false;
        };
        for child in std::mem::take(&mut self.children[idx]) {
            self.parents[child].shift_remove(&idx);
        }
        for parent in std::mem::take(&mut self.parents[idx]) {
            self.children[parent].shift_remove(&idx);
        }
        self.nodes.shift_remove_index(idx);
        self.children.remove(idx);
        self.parents.remove(idx);

        for set in self.children.iter_mut().chain(self.parents.iter_mut()) {
            if set.iter().any(|&i| i > idx) {
                *set = set.iter().map(|&i| if i > idx { i - 1 } else { i }).collect();
            }
        }
        true
    }

    /// Direct successors of `id`, in edge insertion order.
    pub fn children(&self, id: &N) -> Result<Vec<&N>> {
        let idx = self.require(id)?;
        Ok(self.children[idx].iter().map(|&c| &self.nodes[c]).collect())
    }

    /// Direct predecessors of `id`, in edge insertion order.
    pub fn parents(&self, id: &N) -> Result<Vec<&N>> {
        let idx = self.require(id)?;
        Ok(self.parents[idx].iter().map(|&p| &self.nodes[p]).collect())
    }

    /// Every node reachable from `id`, excluding `id` itself, in discovery order.
    pub fn descendants(&self, id: &N) -> Result<Vec<&N>> {
        let idx = self.require(id)?;
        Ok(self.collect_closure(idx, &self.children))
    }

    /// Every node that can reach `id`, excluding `id` itself, in discovery order.
    pub fn ancestors(&self, id: &N) -> Result<Vec<&N>> {
        let idx = self.require(id)?;
        Ok(self.collect_closure(idx, &self.parents))
    }

    /// Nodes with no incoming edges, in ascending identifier order.
    pub fn sources(&self) -> Vec<&N> {
        self.sorted_where(|i| self.parents[i].is_empty())
    }

    /// Nodes with no outgoing edges, in ascending identifier order.
    pub fn sinks(&self) -> Vec<&N> {
        self.sorted_where(|i| self.children[i].is_empty())
    }

    /// Nodes in topological order.
    ///
    /// Kahn's algorithm; when several nodes are ready at once the smallest
    /// identifier goes first, so the result depends only on the graph and not
    /// on hashing or insertion order.
    pub fn topological_order(&self) -> Result<Vec<&N>> {
        Ok(self
            .topological_indices()?
            .into_iter()
            .map(|i| &self.nodes[i])
            .collect())
    }

    /// Whether the graph admits a topological order.
    pub fn is_acyclic(&self) -> bool {
        self.topological_indices().is_ok()
    }

    // ============ Index-level access ============

    /// Dense index of `id`.
    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Identifier stored at `idx`.
    ///
    /// # Panics
    /// If `idx >= self.len()`.
    pub fn node(&self, idx: usize) -> &N {
        &self.nodes[idx]
    }

    /// Successor indices of the node at `idx`.
    pub fn child_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.children[idx].iter().copied()
    }

    /// Predecessor indices of the node at `idx`.
    pub fn parent_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.parents[idx].iter().copied()
    }

    /// Topological order as node indices, with the same tie-break as
    /// [`Dag::topological_order`].
    pub fn topological_indices(&self) -> Result<Vec<usize>> {
        let mut in_degree: Vec<usize> = self.parents.iter().map(IndexSet::len).collect();
        let mut ready: BinaryHeap<Reverse<(&N, usize)>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(i, _)| Reverse((&self.nodes[i], i)))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse((_, idx))) = ready.pop() {
            order.push(idx);
            for &child in &self.children[idx] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    ready.push(Reverse((&self.nodes[child], child)));
                }
            }
        }

        if order.len() < self.nodes.len() {
            let mut residual: Vec<&N> = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, &deg)| deg > 0)
                .map(|(i, _)| &self.nodes[i])
                .collect();
            residual.sort();
            return Err(GatepathError::CyclicGraph {
                nodes: residual.into_iter().map(ToString::to_string).collect(),
            });
        }
        Ok(order)
    }

    fn insert(&mut self, id: N) -> usize {
        let (idx, inserted) = self.nodes.insert_full(id);
        if inserted {
            self.children.push(IndexSet::new());
            self.parents.push(IndexSet::new());
        }
        idx
    }

    fn link(&mut self, s: usize, d: usize) -> bool {
        let added = self.children[s].insert(d);
        self.parents[d].insert(s);
        added
    }

    fn require(&self, id: &N) -> Result<usize> {
        self.nodes
            .get_index_of(id)
            .ok_or_else(|| GatepathError::UnknownNode {
                node: id.to_string(),
            })
    }

    /// Whether `to` is reachable from `from` (a node reaches itself).
    fn reaches(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        visited[from] = true;
        while let Some(idx) = stack.pop() {
            for &next in &self.children[idx] {
                if next == to {
                    return true;
                }
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    fn collect_closure<'a>(&'a self, start: usize, adjacency: &[IndexSet<usize>]) -> Vec<&'a N> {
        let mut visited = vec![false; self.nodes.len()];
        visited[start] = true;
        let mut queue = std::collections::VecDeque::from([start]);
        let mut found = Vec::new();
        while let Some(idx) = queue.pop_front() {
            for &next in &adjacency[idx] {
                if !visited[next] {
                    visited[next] = true;
                    found.push(&self.nodes[next]);
                    queue.push_back(next);
                }
            }
        }
        found
    }

    fn sorted_where(&self, keep: impl Fn(usize) -> bool) -> Vec<&N> {
        let mut out: Vec<&N> = (0..self.nodes.len())
            .filter(|&i| keep(i))
            .map(|i| &self.nodes[i])
            .collect();
        out.sort();
        out
    }
}

impl<N> fmt::Display for Dag<N>
where
    N: Clone + Eq + Hash + Ord + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DAG:")?;
        let mut order: Vec<usize> = (0..self.nodes.len()).collect();
        order.sort_by(|&a, &b| self.nodes[a].cmp(&self.nodes[b]));
        for idx in order {
            let mut children: Vec<&N> = self.children[idx].iter().map(|&c| &self.nodes[c]).collect();
            children.sort();
            write!(f, "\n{}", self.nodes[idx])?;
            if !children.is_empty() {
                let joined: Vec<String> = children.iter().map(ToString::to_string).collect();
                write!(f, " -> {}", joined.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Dag<&'static str> {
        let mut g = Dag::new();
        g.add_edge("a", "b").unwrap();
        g.add_edge("a", "c").unwrap();
        g.add_edge("b", "d").unwrap();
        g.add_edge("c", "d").unwrap();
        g
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut g: Dag<&str> = Dag::new();
        assert!(g.add_node("x"));
        assert!(!g.add_node("x"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_add_edge_inserts_endpoints() {
        let mut g = Dag::new();
        assert!(g.add_edge("x", "y").unwrap());
        assert!(!g.add_edge("x", "y").unwrap());
        assert!(g.contains(&"x") && g.contains(&"y"));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_cycle_rejected_at_insertion() {
        let mut g = diamond();
        let err = g.add_edge("d", "a").unwrap_err();
        assert!(matches!(err, GatepathError::Cycle { ref from, ref to } if from == "d" && to == "a"));
        assert_eq!(g.edge_count(), 4);
        assert!(g.add_edge("b", "b").unwrap_err().is_cycle());
    }

    #[test]
    fn test_children_parents() {
        let g = diamond();
        assert_eq!(g.children(&"a").unwrap(), vec![&"b", &"c"]);
        assert_eq!(g.parents(&"d").unwrap(), vec![&"b", &"c"]);
        assert!(matches!(
            g.children(&"zz"),
            Err(GatepathError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_descendants_and_ancestors() {
        let g = diamond();
        let mut desc = g.descendants(&"a").unwrap();
        desc.sort();
        assert_eq!(desc, vec![&"b", &"c", &"d"]);
        let mut anc = g.ancestors(&"d").unwrap();
        anc.sort();
        assert_eq!(anc, vec![&"a", &"b", &"c"]);
        assert!(g.descendants(&"d").unwrap().is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut g = Dag::new();
        for i in 0..20_000u32 {
            g.add_edge(i, i + 1).unwrap();
        }
        assert_eq!(g.descendants(&0).unwrap().len(), 20_000);
        assert_eq!(g.topological_order().unwrap().len(), 20_001);
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let g = diamond();
        let order = g.topological_order().unwrap();
        let pos = |n: &str| order.iter().position(|x| **x == n).unwrap();
        for node in g.nodes() {
            for child in g.children(node).unwrap() {
                assert!(pos(node) < pos(child));
            }
        }
    }

    #[test]
    fn test_topological_tie_break_is_lexicographic() {
        let mut g = Dag::new();
        g.add_edge("z", "m").unwrap();
        g.add_edge("b", "m").unwrap();
        g.add_node("a");
        assert_eq!(g.topological_order().unwrap(), vec![&"a", &"b", &"z", &"m"]);
    }

    #[test]
    fn test_unchecked_cycle_caught_by_sort() {
        let mut g = Dag::new();
        g.add_edge("s", "x").unwrap();
        g.add_edge("x", "y").unwrap();
        g.add_edge_unchecked("y", "x");
        assert!(!g.is_acyclic());
        match g.topological_order() {
            Err(GatepathError::CyclicGraph { nodes }) => assert_eq!(nodes, vec!["x", "y"]),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_edge_and_node() {
        let mut g = diamond();
        assert!(g.remove_edge(&"a", &"b"));
        assert!(!g.remove_edge(&"a", &"b"));
        assert!(g.remove_node(&"b"));
        assert!(!g.contains(&"b"));
        assert_eq!(g.children(&"a").unwrap(), vec![&"c"]);
        assert_eq!(g.parents(&"d").unwrap(), vec![&"c"]);
        assert_eq!(g.topological_order().unwrap(), vec![&"a", &"c", &"d"]);
    }

    #[test]
    fn test_sources_and_sinks() {
        let g = diamond();
        assert_eq!(g.sources(), vec![&"a"]);
        assert_eq!(g.sinks(), vec![&"d"]);
    }

    #[test]
    fn test_display() {
        let g = diamond();
        assert_eq!(g.to_string(), "DAG:\na -> b, c\nb -> d\nc -> d\nd");
    }
}

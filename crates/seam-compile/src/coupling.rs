//! Device connectivity.
//!
//! A [`CouplingMap`] is an undirected graph over physical qubits: an edge
//! means a two-qubit gate may act on that pair directly.
//!
//! ## Performance
//!
//! On construction every factory precomputes an all-pairs distance matrix and
//! a predecessor matrix by BFS from each node, so `distance()` is a lookup and
//! `shortest_path()` is a walk over at most `distance` predecessors.
//! Neighbours are visited in ascending index order, which makes the chosen
//! path deterministic when several shortest paths exist.
//!
//! ## Deserialization
//!
//! Only the edge list and size are serialized. Call
//! [`rebuild_caches()`](CouplingMap::rebuild_caches) after deserializing;
//! until then `shortest_path()` returns `None`.

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingMap {
    /// Connected pairs, each stored once.
    edges: Vec<(u32, u32)>,
    /// Number of physical qubits.
    num_qubits: u32,
    #[serde(skip)]
    graph: UnGraph<(), ()>,
    /// `dist_matrix[from][to]`, `u32::MAX` when unreachable.
    #[serde(skip)]
    dist_matrix: Vec<Vec<u32>>,
    /// `pred_matrix[from][to]` is the node before `to` on the path from `from`.
    #[serde(skip)]
    pred_matrix: Vec<Vec<u32>>,
}

impl CouplingMap {
    /// A map with `num_qubits` isolated qubits.
    pub fn new(num_qubits: u32) -> Self {
        let mut graph = UnGraph::with_capacity(num_qubits as usize, 0);
        for _ in 0..num_qubits {
            graph.add_node(());
        }
        Self {
            edges: vec![],
            num_qubits,
            graph,
            dist_matrix: vec![],
            pred_matrix: vec![],
        }
    }

    /// Build a map from an explicit edge list.
    pub fn from_edges(num_qubits: u32, edges: &[(u32, u32)]) -> CompileResult<Self> {
        let mut map = Self::new(num_qubits);
        for &(a, b) in edges {
            map.add_edge(a, b)?;
        }
        map.precompute_distances();
        Ok(map)
    }

    /// Connect two qubits. Duplicate edges in either direction are ignored.
    ///
    /// Distances are not refreshed; call [`rebuild_caches`](Self::rebuild_caches)
    /// once all edges are in.
    pub fn add_edge(&mut self, q1: u32, q2: u32) -> CompileResult<()> {
        if q1 >= self.num_qubits || q2 >= self.num_qubits {
            return Err(CompileError::InvalidTopology(format!(
                "edge ({q1}, {q2}) references a qubit outside 0..{}",
                self.num_qubits
            )));
        }
        if q1 == q2 {
            return Err(CompileError::InvalidTopology(format!(
                "self-loop on qubit {q1}"
            )));
        }
        if self.is_connected(q1, q2) {
            return Ok(());
        }
        self.edges.push((q1, q2));
        self.graph
            .add_edge(NodeIndex::new(q1 as usize), NodeIndex::new(q2 as usize), ());
        Ok(())
    }

    fn push_edge(&mut self, q1: u32, q2: u32) {
        self.edges.push((q1, q2));
        self.graph
            .add_edge(NodeIndex::new(q1 as usize), NodeIndex::new(q2 as usize), ());
    }

    fn sorted_neighbors(&self, qubit: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .graph
            .neighbors(NodeIndex::new(qubit as usize))
            .map(|n| n.index() as u32)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn precompute_distances(&mut self) {
        let n = self.num_qubits as usize;
        let adjacency: Vec<Vec<u32>> = (0..self.num_qubits)
            .map(|q| self.sorted_neighbors(q))
            .collect();
        self.dist_matrix = vec![vec![u32::MAX; n]; n];
        self.pred_matrix = vec![vec![u32::MAX; n]; n];

        for src in 0..n {
            self.dist_matrix[src][src] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(src as u32);

            while let Some(current) = queue.pop_front() {
                let cur = current as usize;
                for &neighbor in &adjacency[cur] {
                    let nb = neighbor as usize;
                    if self.dist_matrix[src][nb] == u32::MAX {
                        self.dist_matrix[src][nb] = self.dist_matrix[src][cur] + 1;
                        self.pred_matrix[src][nb] = current;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    /// Rebuild the graph and the distance/predecessor matrices from the edge
    /// list.
    pub fn rebuild_caches(&mut self) {
        let edges = std::mem::take(&mut self.edges);
        let mut graph = UnGraph::with_capacity(self.num_qubits as usize, edges.len());
        for _ in 0..self.num_qubits {
            graph.add_node(());
        }
        self.graph = graph;
        for (a, b) in edges {
            if a < self.num_qubits && b < self.num_qubits && a != b && !self.is_connected(a, b) {
                self.push_edge(a, b);
            }
        }
        self.precompute_distances();
    }

    /// True if the two qubits share an edge.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        if q1 >= self.num_qubits || q2 >= self.num_qubits {
            return false;
        }
        self.graph
            .find_edge(NodeIndex::new(q1 as usize), NodeIndex::new(q2 as usize))
            .is_some()
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The coupling edges.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Neighbours of a qubit, ascending.
    pub fn neighbors(&self, qubit: u32) -> Vec<u32> {
        if qubit >= self.num_qubits {
            return vec![];
        }
        self.sorted_neighbors(qubit)
    }

    /// 0-1-2-...-(n-1).
    pub fn linear(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 0..n.saturating_sub(1) {
            map.push_edge(i, i + 1);
        }
        map.precompute_distances();
        map
    }

    /// A linear chain closed back onto qubit 0.
    pub fn ring(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 0..n.saturating_sub(1) {
            map.push_edge(i, i + 1);
        }
        if n > 2 {
            map.push_edge(n - 1, 0);
        }
        map.precompute_distances();
        map
    }

    /// Qubit 0 connected to all others.
    pub fn star(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 1..n {
            map.push_edge(0, i);
        }
        map.precompute_distances();
        map
    }

    /// All-to-all.
    pub fn full(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                map.push_edge(i, j);
            }
        }
        map.precompute_distances();
        map
    }

    /// `rows x cols` nearest-neighbour lattice, row-major numbering.
    ///
    /// Fails if the lattice has more than `u32::MAX` qubits.
    pub fn grid(rows: u32, cols: u32) -> CompileResult<Self> {
        let num_qubits = rows.checked_mul(cols).ok_or_else(|| {
            CompileError::InvalidTopology(format!("grid {rows}x{cols} overflows the qubit index"))
        })?;
        let mut map = Self::new(num_qubits);
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    map.push_edge(q, q + 1);
                }
                if r + 1 < rows {
                    map.push_edge(q, q + cols);
                }
            }
        }
        map.precompute_distances();
        Ok(map)
    }

    /// Shortest-path distance, `None` when unreachable or out of range.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        if from == to && from < self.num_qubits {
            return Some(0);
        }
        let d = *self.dist_matrix.get(from as usize)?.get(to as usize)?;
        (d != u32::MAX).then_some(d)
    }

    /// Shortest path `from..=to`, both endpoints included.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        self.distance(from, to)?;
        if from == to {
            return Some(vec![from]);
        }
        let preds = self.pred_matrix.get(from as usize)?;
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let pred = *preds.get(current as usize)?;
            if pred == u32::MAX {
                return None;
            }
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let map = CouplingMap::linear(5);
        assert_eq!(map.edges().len(), 4);
        assert!(map.is_connected(1, 2));
        assert!(map.is_connected(2, 1));
        assert!(!map.is_connected(0, 2));
        assert_eq!(map.distance(0, 4), Some(4));
        assert_eq!(map.shortest_path(0, 4), Some(vec![0, 1, 2, 3, 4]));
        assert_eq!(map.shortest_path(2, 2), Some(vec![2]));
    }

    #[test]
    fn test_ring_wraps_around() {
        let map = CouplingMap::ring(6);
        assert!(map.is_connected(5, 0));
        assert_eq!(map.distance(0, 4), Some(2));
        assert_eq!(map.shortest_path(0, 4), Some(vec![0, 5, 4]));
    }

    #[test]
    fn test_star_and_full() {
        let star = CouplingMap::star(4);
        assert_eq!(star.distance(1, 3), Some(2));
        assert_eq!(star.shortest_path(1, 3), Some(vec![1, 0, 3]));
        assert_eq!(star.neighbors(0), vec![1, 2, 3]);

        let full = CouplingMap::full(4);
        assert_eq!(full.edges().len(), 6);
        assert_eq!(full.distance(0, 3), Some(1));
    }

    #[test]
    fn test_grid() {
        let map = CouplingMap::grid(2, 3).unwrap();
        assert_eq!(map.num_qubits(), 6);
        assert_eq!(map.edges().len(), 7);
        assert!(map.is_connected(1, 4));
        assert_eq!(map.distance(0, 5), Some(3));
        // Lower-index neighbours are explored first.
        assert_eq!(map.shortest_path(0, 5), Some(vec![0, 1, 2, 5]));
    }

    #[test]
    fn test_grid_size_overflow() {
        assert!(matches!(
            CouplingMap::grid(65536, 65537),
            Err(CompileError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_from_edges_validates() {
        let map = CouplingMap::from_edges(4, &[(0, 1), (1, 0), (2, 3)]).unwrap();
        assert_eq!(map.edges().len(), 2);
        assert_eq!(map.distance(0, 3), None);
        assert_eq!(map.shortest_path(0, 3), None);

        assert!(matches!(
            CouplingMap::from_edges(2, &[(0, 2)]),
            Err(CompileError::InvalidTopology(_))
        ));
        assert!(CouplingMap::from_edges(2, &[(1, 1)]).is_err());
    }

    #[test]
    fn test_serde_then_rebuild() {
        let map = CouplingMap::linear(4);
        let json = serde_json::to_string(&map).unwrap();
        let mut back: CouplingMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shortest_path(0, 3), None);
        back.rebuild_caches();
        assert_eq!(back.edges(), map.edges());
        assert!(back.is_connected(2, 3));
        assert_eq!(back.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
    }
}

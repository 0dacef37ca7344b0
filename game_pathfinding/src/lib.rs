use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A directed, weighted edge out of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: usize,
    pub cost: f64,
}

/// A trait for graphs whose nodes are dense indices `0..node_count()`.
///
/// Costs must be non-negative; Dijkstra relies on it.
pub trait WeightedGraph {
    /// Number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// Outgoing edges of `node`.
    fn edges(&self, node: usize) -> &[Edge];
}

/// Plain adjacency list, the default [`WeightedGraph`] implementation.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyList {
    adjacency: Vec<Vec<Edge>>,
}

impl AdjacencyList {
    /// Create a graph with `nodes` nodes and no edges.
    pub fn with_nodes(nodes: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); nodes],
        }
    }

    /// Add a directed edge. An existing `from -> to` edge keeps the cheaper cost.
    pub fn add_edge(&mut self, from: usize, to: usize, cost: f64) {
        let list = &mut self.adjacency[from];
        if let Some(existing) = list.iter_mut().find(|e| e.to == to) {
            if cost < existing.cost {
                existing.cost = cost;
            }
            return;
        }
        list.push(Edge { to, cost });
    }

    /// Add `from -> to` and `to -> from` with the same cost.
    pub fn add_undirected(&mut self, a: usize, b: usize, cost: f64) {
        self.add_edge(a, b, cost);
        self.add_edge(b, a, cost);
    }

    /// Number of outgoing edges of `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Whether a direct edge `from -> to` exists.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency[from].iter().any(|e| e.to == to)
    }

    /// Make every edge bidirectional, keeping the cheaper of the two costs.
    pub fn symmetrize(&mut self) {
        let mut all = Vec::new();
        for (from, list) in self.adjacency.iter().enumerate() {
            for e in list {
                all.push((from, e.to, e.cost));
            }
        }
        for (from, to, cost) in all {
            self.add_edge(to, from, cost);
            self.add_edge(from, to, cost);
        }
    }
}

impl WeightedGraph for AdjacencyList {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn edges(&self, node: usize) -> &[Edge] {
        &self.adjacency[node]
    }
}

/// Result of a single-source search.
///
/// Unreachable nodes have distance `f64::INFINITY` and no predecessor.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    pub source: usize,
    pub dist: Vec<f64>,
    pub prev: Vec<Option<usize>>,
}

impl ShortestPaths {
    /// Reconstruct the node sequence `source ..= target`, or `None` if unreachable.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if !self.dist.get(target)?.is_finite() {
            return None;
        }
        let mut path = vec![target];
        let mut curr = target;
        while let Some(prev) = self.prev[curr] {
            path.push(prev);
            curr = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Dijkstra's algorithm over a [`WeightedGraph`].
pub struct Dijkstra;

impl Dijkstra {
    /// Shortest distances from `source` to every node.
    pub fn single_source<G: WeightedGraph + ?Sized>(graph: &G, source: usize) -> ShortestPaths {
        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![None; n];
        let mut done = vec![false; n];
        let mut open_set = BinaryHeap::new();

        if source < n {
            dist[source] = 0.0;
            open_set.push(State {
                node: source,
                cost: 0.0,
            });
        }

        while let Some(State { node, cost }) = open_set.pop() {
            // Skip stale queue entries
            if done[node] {
                continue;
            }
            done[node] = true;

            for edge in graph.edges(node) {
                if done[edge.to] {
                    continue;
                }
                let tentative = cost + edge.cost;
                if tentative < dist[edge.to] {
                    dist[edge.to] = tentative;
                    prev[edge.to] = Some(node);
                    open_set.push(State {
                        node: edge.to,
                        cost: tentative,
                    });
                }
            }
        }

        ShortestPaths { source, dist, prev }
    }
}

/// Helper struct for the priority queue.
#[derive(Copy, Clone, PartialEq)]
struct State {
    node: usize,
    cost: f64,
}

impl Eq for State {}

// Flip the ordering on costs so the queue becomes a min-heap.
// Ties break on node index to keep pops deterministic.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//! Province adjacency graph, all-pairs distances and trade hubs.
//!
//! Built once at construction:
//! 1. Declared neighbors become edges weighted by
//!    `normalized centroid distance × (0.85 + 0.9 / √shared_sides)`.
//! 2. Provinces with fewer than 2 links get up to 3 synthetic edges to their
//!    nearest centroids.
//! 3. The edge set is symmetrized and one Dijkstra run per source fills the
//!    distance table.

use crate::topology::ProvinceNode;
use game_pathfinding::{AdjacencyList, Dijkstra, ShortestPaths, WeightedGraph};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::instrument;

/// Gate distance reported for provinces that cannot reach any hub.
pub const UNREACHABLE_GATE: f64 = 9999.0;

/// Floor on normalized edge length so coincident centroids still cost something.
pub const MIN_EDGE_LENGTH: f64 = 0.05;

const MIN_DEGREE: usize = 2;
const SYNTHETIC_NEIGHBORS: usize = 3;

fn side_factor(shared_sides: u32) -> f64 {
    0.85 + 0.9 / f64::from(shared_sides.max(1)).sqrt()
}

#[derive(Debug, Clone)]
pub struct TradeGraph {
    adjacency: AdjacencyList,
    n: usize,
    /// Row-major `n × n` distance table.
    dist: Vec<f64>,
    paths: Vec<ShortestPaths>,
    synthetic_edges: usize,
    hubs: Vec<usize>,
    gate: Vec<f64>,
}

impl TradeGraph {
    /// Build the graph and distance table.
    ///
    /// `index` maps province ids to positions in `nodes`. Neighbor entries that
    /// name unknown provinces (or the province itself) are ignored.
    #[instrument(skip_all, name = "trade_graph", fields(provinces = nodes.len()))]
    pub fn build(nodes: &[ProvinceNode], index: &FxHashMap<u32, usize>) -> Self {
        let n = nodes.len();
        let scale = normalization_scale(nodes, index);
        let edge_length = |a: usize, b: usize| {
            (nodes[a].centroid.distance(&nodes[b].centroid) / scale).max(MIN_EDGE_LENGTH)
        };

        let mut adjacency = AdjacencyList::with_nodes(n);
        let mut linked: Vec<FxHashSet<usize>> = vec![FxHashSet::default(); n];

        for (i, node) in nodes.iter().enumerate() {
            for neighbor in &node.neighbors {
                let Some(&j) = index.get(&neighbor.pid) else {
                    log::warn!("province {}: unknown neighbor {} ignored", node.pid, neighbor.pid);
                    continue;
                };
                if i == j {
                    continue;
                }
                adjacency.add_edge(i, j, edge_length(i, j) * side_factor(neighbor.shared_sides));
                linked[i].insert(j);
                linked[j].insert(i);
            }
        }

        // Synthetic links for under-connected provinces
        let mut synthetic_edges = 0;
        for i in 0..n {
            if linked[i].len() >= MIN_DEGREE {
                continue;
            }
            let mut candidates: Vec<usize> = (0..n)
                .filter(|&j| j != i && !linked[i].contains(&j))
                .collect();
            candidates.sort_by(|&a, &b| {
                let da = nodes[i].centroid.distance(&nodes[a].centroid);
                let db = nodes[i].centroid.distance(&nodes[b].centroid);
                da.total_cmp(&db).then(a.cmp(&b))
            });
            for j in candidates.into_iter().take(SYNTHETIC_NEIGHBORS) {
                adjacency.add_edge(i, j, edge_length(i, j) * side_factor(1));
                linked[i].insert(j);
                linked[j].insert(i);
                synthetic_edges += 1;
            }
        }

        adjacency.symmetrize();

        let paths: Vec<ShortestPaths> = {
            let _span = tracing::info_span!("all_pairs", count = n).entered();
            (0..n)
                .into_par_iter()
                .map(|source| Dijkstra::single_source(&adjacency, source))
                .collect()
        };

        let mut dist = vec![f64::INFINITY; n * n];
        for sp in &paths {
            dist[sp.source * n..(sp.source + 1) * n].copy_from_slice(&sp.dist);
        }

        log::debug!(
            "trade graph: {} provinces, {} synthetic edges, scale {:.3}",
            n,
            synthetic_edges,
            scale
        );

        Self {
            adjacency,
            n,
            dist,
            paths,
            synthetic_edges,
            hubs: Vec::new(),
            gate: vec![UNREACHABLE_GATE; n],
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Shortest distance between two province indices (`INFINITY` if unreachable).
    ///
    /// Always read from the lower index's row so `dist(a, b) == dist(b, a)`.
    #[inline]
    pub fn dist(&self, a: usize, b: usize) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.dist[lo * self.n + hi]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.degree(node)
    }

    /// Direct neighbors of a province index.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.edges(node).iter().map(|e| e.to)
    }

    pub fn synthetic_edges(&self) -> usize {
        self.synthetic_edges
    }

    /// Full node sequence of the shortest path, endpoints included.
    pub fn path(&self, a: usize, b: usize) -> Option<Vec<usize>> {
        if a <= b {
            self.paths[a].path_to(b)
        } else {
            let mut path = self.paths[b].path_to(a)?;
            path.reverse();
            Some(path)
        }
    }

    /// Pick trade hubs and compute each province's distance to the nearest one.
    ///
    /// Hubs are the top `count` cities by `pop × infra`; with no cities the
    /// first `min(3, n)` provinces are used.
    pub fn select_hubs(&mut self, pop: &[u64], infra: &[f64], is_city: &[bool], count: usize) {
        let mut cities: Vec<usize> = (0..self.n).filter(|&i| is_city[i]).collect();
        let hubs: Vec<usize> = if cities.is_empty() {
            (0..self.n.min(3)).collect()
        } else {
            let weight = |i: usize| pop[i] as f64 * infra[i];
            cities.sort_by(|&a, &b| weight(b).total_cmp(&weight(a)).then(a.cmp(&b)));
            cities.truncate(count);
            cities
        };

        self.gate = (0..self.n)
            .map(|i| {
                hubs.iter()
                    .map(|&h| self.dist(i, h))
                    .filter(|d| d.is_finite())
                    .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))))
                    .unwrap_or(UNREACHABLE_GATE)
            })
            .collect();

        log::debug!("selected {} trade hubs: {:?}", hubs.len(), hubs);
        self.hubs = hubs;
    }

    pub fn hubs(&self) -> &[usize] {
        &self.hubs
    }

    pub fn is_hub(&self, node: usize) -> bool {
        self.hubs.contains(&node)
    }

    #[inline]
    pub fn gate_distance(&self, node: usize) -> f64 {
        self.gate[node]
    }

    /// Whether the province can reach a hub at all.
    #[inline]
    pub fn has_gate(&self, node: usize) -> bool {
        self.gate[node] < UNREACHABLE_GATE
    }
}

/// Mean centroid distance over declared borders, or over nearest neighbors
/// when no borders are declared.
fn normalization_scale(nodes: &[ProvinceNode], index: &FxHashMap<u32, usize>) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for node in nodes {
        for neighbor in &node.neighbors {
            if let Some(&j) = index.get(&neighbor.pid) {
                if nodes[j].pid != node.pid {
                    total += node.centroid.distance(&nodes[j].centroid);
                    count += 1;
                }
            }
        }
    }
    if count == 0 {
        for (i, node) in nodes.iter().enumerate() {
            let nearest = nodes
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| node.centroid.distance(&other.centroid))
                .fold(f64::INFINITY, f64::min);
            if nearest.is_finite() {
                total += nearest;
                count += 1;
            }
        }
    }
    let mean = if count > 0 { total / count as f64 } else { 0.0 };
    if mean.is_finite() && mean > 0.0 {
        mean
    } else {
        1.0
    }
}

/// Memoized intermediate provinces on shortest paths, for transit tax.
#[derive(Debug, Clone, Default)]
pub struct PathCache {
    cache: FxHashMap<(usize, usize), Vec<usize>>,
}

impl PathCache {
    /// Provinces strictly between `a` and `b` on the shortest path.
    pub fn intermediates(&mut self, graph: &TradeGraph, a: usize, b: usize) -> &[usize] {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.cache.entry(key).or_insert_with(|| match graph.path(key.0, key.1) {
            Some(path) if path.len() > 2 => path[1..path.len() - 1].to_vec(),
            _ => Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

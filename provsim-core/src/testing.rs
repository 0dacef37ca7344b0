//! Test scaffolding: topology builder and a single-system fixture.

use crate::catalog::Catalog;
use crate::config::SimConfig;
use crate::graph::TradeGraph;
use crate::state::ProvinceState;
use crate::systems::TickContext;
use crate::topology::{Centroid, Neighbor, ProvinceId, ProvinceNode};
use rustc_hash::FxHashMap;

pub struct TopologyBuilder {
    nodes: Vec<ProvinceNode>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a province with area 1.0 and name `P<pid>`.
    pub fn province(mut self, pid: ProvinceId, terrain: &str, at: (f64, f64)) -> Self {
        self.nodes.push(ProvinceNode::new(
            pid,
            &format!("P{pid}"),
            terrain,
            Centroid::new(at.0, at.1),
            1.0,
        ));
        self
    }

    pub fn area(mut self, pid: ProvinceId, area: f64) -> Self {
        if let Some(node) = self.node_mut(pid) {
            node.area = area;
        }
        self
    }

    pub fn free_city(mut self, pid: ProvinceId) -> Self {
        if let Some(node) = self.node_mut(pid) {
            node.free_city = true;
        }
        self
    }

    /// Declare a border on both sides.
    pub fn border(mut self, a: ProvinceId, b: ProvinceId, shared_sides: u32) -> Self {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(node) = self.node_mut(from) {
                node.neighbors.push(Neighbor { pid: to, shared_sides });
            }
        }
        self
    }

    pub fn build(self) -> Vec<ProvinceNode> {
        self.nodes
    }

    fn node_mut(&mut self, pid: ProvinceId) -> Option<&mut ProvinceNode> {
        self.nodes.iter_mut().find(|n| n.pid == pid)
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Graph, catalog and bare province states for exercising one system.
///
/// Provinces start empty (no population, stock or capacity) with prices at
/// base. Hubs use the no-city fallback unless topology marks cities.
pub struct SystemFixture {
    pub catalog: Catalog,
    pub graph: TradeGraph,
    pub config: SimConfig,
    pub provinces: Vec<ProvinceState>,
}

impl SystemFixture {
    pub fn new(nodes: Vec<ProvinceNode>, catalog: Catalog) -> Self {
        let index: FxHashMap<u32, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.pid, i)).collect();
        let mut graph = TradeGraph::build(&nodes, &index);
        let config = SimConfig::default();

        let provinces: Vec<ProvinceState> = nodes
            .iter()
            .map(|node| {
                let mut p = ProvinceState::new(node.pid, &node.name, &node.terrain, catalog.len());
                p.is_city = node.is_city();
                p.infra = 0.5;
                for (price, c) in p.price.iter_mut().zip(catalog.commodities()) {
                    *price = c.base_price;
                }
                p
            })
            .collect();

        let pop: Vec<u64> = provinces.iter().map(|p| p.pop).collect();
        let infra: Vec<f64> = provinces.iter().map(|p| p.infra).collect();
        let city: Vec<bool> = provinces.iter().map(|p| p.is_city).collect();
        graph.select_hubs(&pop, &infra, &city, config.effective_hub_count());

        let mut fx = Self {
            catalog,
            graph,
            config,
            provinces,
        };
        for &h in fx.graph.hubs() {
            fx.provinces[h].is_hub = true;
        }
        fx
    }

    /// Split into the read-only tick context and the mutable provinces.
    pub fn split(&mut self) -> (TickContext<'_>, &mut [ProvinceState]) {
        (
            TickContext {
                catalog: &self.catalog,
                graph: &self.graph,
                config: &self.config,
                day: 0,
            },
            self.provinces.as_mut_slice(),
        )
    }
}

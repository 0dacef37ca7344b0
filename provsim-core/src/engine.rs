//! Engine construction and read-only accessors.
//!
//! Construction is the only fallible operation. It validates the topology,
//! builds the trade graph and potential fields (both immutable afterwards)
//! and seeds every province's opening state.

use crate::catalog::Catalog;
use crate::config::SimConfig;
use crate::error::EngineError;
use crate::graph::{PathCache, TradeGraph};
use crate::metrics::SimMetrics;
use crate::overrides::ScenarioOverrides;
use crate::potential;
use crate::rng::SimRng;
use crate::state::ProvinceState;
use crate::systems::targets::recompute_targets;
use crate::systems::WorldStats;
use crate::topology::{ProvinceId, ProvinceNode};
use crate::worldgen;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

pub struct EconomyEngine {
    pub(crate) config: SimConfig,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) graph: TradeGraph,
    pub(crate) provinces: Vec<ProvinceState>,
    pub(crate) index: FxHashMap<ProvinceId, usize>,
    pub(crate) paths: PathCache,
    pub(crate) stats: WorldStats,
    pub(crate) day: u32,
    pub(crate) seed: u64,
    pub(crate) metrics: SimMetrics,
}

fn validate(topology: &[ProvinceNode]) -> Result<FxHashMap<ProvinceId, usize>, EngineError> {
    if topology.is_empty() {
        return Err(EngineError::EmptyTopology);
    }
    let mut index = FxHashMap::default();
    for (i, node) in topology.iter().enumerate() {
        if node.pid == 0 {
            return Err(EngineError::InvalidProvinceId { pid: node.pid });
        }
        if index.insert(node.pid, i).is_some() {
            return Err(EngineError::DuplicateProvince { pid: node.pid });
        }
    }
    Ok(index)
}

impl EconomyEngine {
    pub fn new(
        topology: &[ProvinceNode],
        catalog: impl Into<Arc<Catalog>>,
        config: SimConfig,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::with_overrides(topology, catalog, config, seed, &ScenarioOverrides::default())
    }

    #[instrument(skip_all, name = "construct", fields(provinces = topology.len(), seed = seed))]
    pub fn with_overrides(
        topology: &[ProvinceNode],
        catalog: impl Into<Arc<Catalog>>,
        config: SimConfig,
        seed: u64,
        overrides: &ScenarioOverrides,
    ) -> Result<Self, EngineError> {
        let start = Instant::now();
        let catalog: Arc<Catalog> = catalog.into();
        let index = validate(topology)?;
        let n_commodities = catalog.len();

        let mut graph = TradeGraph::build(topology, &index);
        let mut potentials =
            potential::generate(topology, &graph, &catalog, config.smooth_steps, seed);
        for (pid, values) in &overrides.potential {
            let Some(&i) = index.get(pid) else {
                log::warn!("potential override for unknown province {} ignored", pid);
                continue;
            };
            for (name, &value) in values {
                match catalog.commodity_id(name) {
                    Some(c) => potentials[i][c.index()] = crate::sanitize(value),
                    None => log::warn!("potential override: unknown commodity {}", name),
                }
            }
        }

        let mut rng = SimRng::derive(seed, worldgen::DEMOGRAPHY_STREAM);
        let mut provinces: Vec<ProvinceState> = topology
            .iter()
            .zip(potentials)
            .map(|(node, raw_potential)| {
                let mut p = ProvinceState::new(node.pid, &node.name, &node.terrain, n_commodities);
                p.is_city = node.is_city();
                p.pop = worldgen::seed_population(node.area, &node.terrain, p.is_city, &mut rng);
                p.infra = worldgen::seed_infra(p.is_city, &mut rng);
                if let Some(&pop) = overrides.population.get(&node.pid) {
                    p.pop = pop;
                }
                p.raw_potential = raw_potential;
                p
            })
            .collect();
        for pid in overrides.population.keys().filter(|pid| !index.contains_key(pid)) {
            log::warn!("population override for unknown province {} ignored", pid);
        }

        {
            let pop: Vec<u64> = provinces.iter().map(|p| p.pop).collect();
            let infra: Vec<f64> = provinces.iter().map(|p| p.infra).collect();
            let city: Vec<bool> = provinces.iter().map(|p| p.is_city).collect();
            graph.select_hubs(&pop, &infra, &city, config.effective_hub_count());
        }
        for &h in graph.hubs() {
            provinces[h].is_hub = true;
        }
        for p in provinces.iter_mut() {
            let (internal, world) = worldgen::transport_caps(p.pop, p.infra, p.is_city, p.is_hub);
            p.transport_cap = internal;
            p.world_transport_cap = crate::sanitize(world * config.world.capacity_scale);
        }

        if overrides.seed_buildings {
            let raw: Vec<Vec<f64>> = provinces.iter().map(|p| p.raw_potential.clone()).collect();
            let means = worldgen::world_means(&raw, n_commodities);
            let mut rng = SimRng::derive(seed, worldgen::BUILDING_STREAM);
            worldgen::seed_buildings(&mut provinces, &catalog, &means, &mut rng);
            worldgen::ensure_hub_coverage(&mut provinces, graph.hubs(), &catalog, &means);
        }
        for (pid, list) in &overrides.buildings {
            let Some(&i) = index.get(pid) else {
                log::warn!("building override for unknown province {} ignored", pid);
                continue;
            };
            let p = &mut provinces[i];
            p.buildings.clear();
            for entry in list {
                match catalog.recipe_id(&entry.recipe) {
                    Some(rid) => p.add_building(rid, entry.count, entry.efficiency),
                    None => log::warn!("building override: unknown recipe {}", entry.recipe),
                }
            }
        }

        for p in provinces.iter_mut() {
            worldgen::seed_opening_stock(p, &catalog);
        }
        for (pid, values) in &overrides.stock {
            let Some(&i) = index.get(pid) else {
                log::warn!("stock override for unknown province {} ignored", pid);
                continue;
            };
            for (name, &qty) in values {
                match catalog.commodity_id(name) {
                    Some(c) => provinces[i].stock[c.index()] = crate::sanitize(qty),
                    None => log::warn!("stock override: unknown commodity {}", name),
                }
            }
        }
        for p in provinces.iter_mut() {
            recompute_targets(p, &catalog);
        }

        let metrics = SimMetrics {
            construction_time: start.elapsed(),
            ..Default::default()
        };
        log::info!(
            "economy constructed: {} provinces, {} commodities, {} hubs, {} buildings, population {}",
            provinces.len(),
            n_commodities,
            graph.hubs().len(),
            provinces.iter().map(|p| p.building_count() as u64).sum::<u64>(),
            provinces.iter().map(|p| p.pop).sum::<u64>()
        );

        Ok(Self {
            config,
            stats: WorldStats::new(n_commodities),
            catalog,
            graph,
            provinces,
            index,
            paths: PathCache::default(),
            day: 0,
            seed,
            metrics,
        })
    }

    /// Days simulated so far.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &TradeGraph {
        &self.graph
    }

    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    pub fn world_stats(&self) -> &WorldStats {
        &self.stats
    }

    /// Provinces in topology order.
    pub fn provinces(&self) -> &[ProvinceState] {
        &self.provinces
    }

    pub fn index_of(&self, pid: ProvinceId) -> Option<usize> {
        self.index.get(&pid).copied()
    }

    pub fn province(&self, pid: ProvinceId) -> Option<&ProvinceState> {
        self.index_of(pid).map(|i| &self.provinces[i])
    }

    /// Graph distance between two provinces; `INFINITY` when unreachable,
    /// `None` for unknown ids.
    pub fn dist(&self, a: ProvinceId, b: ProvinceId) -> Option<f64> {
        Some(self.graph.dist(self.index_of(a)?, self.index_of(b)?))
    }

    /// Trade hub province ids.
    pub fn hubs(&self) -> Vec<ProvinceId> {
        self.graph.hubs().iter().map(|&h| self.provinces[h].pid).collect()
    }

    pub fn gate_distance(&self, pid: ProvinceId) -> Option<f64> {
        self.index_of(pid).map(|i| self.graph.gate_distance(i))
    }
}

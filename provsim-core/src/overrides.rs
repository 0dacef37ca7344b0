//! Construction-time overrides for scenarios and admin tooling.
//!
//! Overrides are applied while the engine is built, after the corresponding
//! seeded value has been drawn, so the random streams are consumed the same
//! way with or without them.

use crate::topology::ProvinceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingOverride {
    pub recipe: String,
    pub count: u32,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
}

fn default_efficiency() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOverrides {
    pub population: BTreeMap<ProvinceId, u64>,
    /// Raw potential by commodity name.
    pub potential: BTreeMap<ProvinceId, BTreeMap<String, f64>>,
    /// Replaces the province's building list.
    pub buildings: BTreeMap<ProvinceId, Vec<BuildingOverride>>,
    /// Initial stock by commodity name, replacing the seeded amount.
    pub stock: BTreeMap<ProvinceId, BTreeMap<String, f64>>,
    /// When false, no buildings are seeded and the hub coverage pass is skipped.
    pub seed_buildings: bool,
}

impl Default for ScenarioOverrides {
    fn default() -> Self {
        Self {
            population: BTreeMap::new(),
            potential: BTreeMap::new(),
            buildings: BTreeMap::new(),
            stock: BTreeMap::new(),
            seed_buildings: true,
        }
    }
}

impl ScenarioOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn population(mut self, pid: ProvinceId, pop: u64) -> Self {
        self.population.insert(pid, pop);
        self
    }

    pub fn potential(mut self, pid: ProvinceId, commodity: &str, value: f64) -> Self {
        self.potential
            .entry(pid)
            .or_default()
            .insert(commodity.to_string(), value);
        self
    }

    pub fn building(mut self, pid: ProvinceId, recipe: &str, count: u32) -> Self {
        self.buildings.entry(pid).or_default().push(BuildingOverride {
            recipe: recipe.to_string(),
            count,
            efficiency: default_efficiency(),
        });
        self
    }

    pub fn stock(mut self, pid: ProvinceId, commodity: &str, qty: f64) -> Self {
        self.stock
            .entry(pid)
            .or_default()
            .insert(commodity.to_string(), qty);
        self
    }

    pub fn without_seeded_buildings(mut self) -> Self {
        self.seed_buildings = false;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
            && self.potential.is_empty()
            && self.buildings.is_empty()
            && self.stock.is_empty()
            && self.seed_buildings
    }
}

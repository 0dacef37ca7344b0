use crate::catalog::{CommodityId, RecipeId};
use crate::defines::{self, production, stock};
use crate::ledger::{DailyLedger, RollingWindow};
use crate::topology::ProvinceId;
use serde::{Deserialize, Serialize};

/// Instances of one recipe type in a province.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub recipe: RecipeId,
    pub count: u32,
    /// Output multiplier in `[0.25, 1.15]`; degraded by missed upkeep.
    pub efficiency: f64,
}

/// Mutable economic state of one province.
///
/// All per-commodity vectors have the catalog's length and are indexed by
/// [`CommodityId::index`].
#[derive(Debug, Clone)]
pub struct ProvinceState {
    pub pid: ProvinceId,
    pub name: String,
    pub terrain: String,
    pub pop: u64,
    pub infra: f64,
    pub is_city: bool,
    pub is_hub: bool,

    pub stock: Vec<f64>,
    pub price: Vec<f64>,
    pub target: Vec<f64>,
    pub reserve: Vec<f64>,
    pub raw_potential: Vec<f64>,

    pub buildings: Vec<Building>,

    pub transport_cap: f64,
    pub transport_used: f64,
    pub world_transport_cap: f64,
    pub world_transport_used: f64,

    pub treasury: f64,
    pub today: DailyLedger,
    pub trailing: RollingWindow<DailyLedger>,
}

impl ProvinceState {
    pub fn new(pid: ProvinceId, name: &str, terrain: &str, commodities: usize) -> Self {
        Self {
            pid,
            name: name.to_string(),
            terrain: terrain.to_string(),
            pop: 0,
            infra: defines::demography::INFRA_MIN,
            is_city: false,
            is_hub: false,
            stock: vec![0.0; commodities],
            price: vec![1.0; commodities],
            target: vec![0.0; commodities],
            reserve: vec![0.0; commodities],
            raw_potential: vec![0.0; commodities],
            buildings: Vec::new(),
            transport_cap: 0.0,
            transport_used: 0.0,
            world_transport_cap: 0.0,
            world_transport_used: 0.0,
            treasury: 0.0,
            today: DailyLedger::default(),
            trailing: RollingWindow::new(defines::WINDOW_DAYS, DailyLedger::default()),
        }
    }

    /// Zero the per-day counters.
    pub fn reset_day(&mut self) {
        self.transport_used = 0.0;
        self.world_transport_used = 0.0;
        self.today = DailyLedger::default();
    }

    /// Stock that must stay in the province: reserve, or nothing when untargeted.
    #[inline]
    pub fn keep_threshold(&self, c: CommodityId) -> f64 {
        let i = c.index();
        if self.target[i] > 0.0 {
            self.reserve[i]
        } else {
            0.0
        }
    }

    /// Stock available to internal buyers.
    #[inline]
    pub fn sellable(&self, c: CommodityId) -> f64 {
        (self.stock[c.index()] - self.keep_threshold(c)).max(0.0)
    }

    /// Level above which stock can be exported (`0` for untargeted commodities).
    #[inline]
    pub fn export_ceiling(&self, c: CommodityId) -> f64 {
        self.target[c.index()] * stock::EXPORT_BUFFER
    }

    /// Stock available for world export.
    #[inline]
    pub fn exportable(&self, c: CommodityId) -> f64 {
        (self.stock[c.index()] - self.export_ceiling(c)).max(0.0)
    }

    #[inline]
    pub fn transport_remaining(&self) -> f64 {
        (self.transport_cap - self.transport_used).max(0.0)
    }

    #[inline]
    pub fn world_transport_remaining(&self) -> f64 {
        (self.world_transport_cap - self.world_transport_used).max(0.0)
    }

    /// Book internal logistics load; never exceeds the cap.
    #[inline]
    pub fn use_transport(&mut self, load: f64) {
        self.transport_used = (self.transport_used + crate::sanitize(load)).min(self.transport_cap);
    }

    /// Book external logistics load; never exceeds the cap.
    #[inline]
    pub fn use_world_transport(&mut self, load: f64) {
        self.world_transport_used =
            (self.world_transport_used + crate::sanitize(load)).min(self.world_transport_cap);
    }

    /// Daily workforce before any building draws on it.
    pub fn labor_pool(&self) -> f64 {
        self.pop as f64 * production::LABOR_PARTICIPATION
    }

    /// Total building instances.
    pub fn building_count(&self) -> u32 {
        self.buildings.iter().map(|b| b.count).sum()
    }

    /// Add instances of a recipe, merging with an existing entry.
    pub fn add_building(&mut self, recipe: RecipeId, count: u32, efficiency: f64) {
        if count == 0 {
            return;
        }
        if let Some(b) = self.buildings.iter_mut().find(|b| b.recipe == recipe) {
            b.count += count;
        } else {
            self.buildings.push(Building {
                recipe,
                count,
                efficiency: efficiency.clamp(0.25, 1.15),
            });
        }
    }

    pub fn has_building(&self, recipe: RecipeId) -> bool {
        self.buildings.iter().any(|b| b.recipe == recipe && b.count > 0)
    }

    /// Remove `qty` (clamped to what is there) and return the amount taken.
    #[inline]
    pub fn take(&mut self, c: CommodityId, qty: f64) -> f64 {
        let slot = &mut self.stock[c.index()];
        let taken = crate::sanitize(qty).min(*slot);
        *slot -= taken;
        taken
    }

    #[inline]
    pub fn put(&mut self, c: CommodityId, qty: f64) {
        self.stock[c.index()] += crate::sanitize(qty);
    }
}

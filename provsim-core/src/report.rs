//! Read-only reporting views and snapshot export.

use crate::catalog::Commodity;
use crate::config::SimConfig;
use crate::engine::EconomyEngine;
use crate::topology::ProvinceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpEntry {
    pub pid: ProvinceId,
    pub name: String,
    /// Trailing-window GDP turnover.
    pub gdp: f64,
}

/// World stock against world target for one commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyEntry {
    pub commodity: String,
    pub stock: f64,
    pub target: f64,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub day: u32,
    pub total_population: u64,
    pub top_gdp: Vec<GdpEntry>,
    /// Lowest stock/target first.
    pub most_scarce: Vec<SupplyEntry>,
    /// Highest stock/target first.
    pub most_oversupplied: Vec<SupplyEntry>,
    pub treasury_total: f64,
}

/// Trailing-window quantities for one commodity, world-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityBalance {
    pub commodity: String,
    pub produced: f64,
    /// Absorbed by population, production inputs and upkeep.
    pub sold: f64,
    /// `produced - sold`
    pub saldo: f64,
    pub imported: f64,
    pub exported: f64,
    /// Current world stock.
    pub stock: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceSummary {
    pub pid: ProvinceId,
    pub name: String,
    pub pop: u64,
    pub infra: f64,
    pub is_city: bool,
    pub is_hub: bool,
    pub buildings: u32,
    pub treasury: f64,
    /// Days covered by the trailing figures below.
    pub days: usize,
    pub gdp: f64,
    pub imports: f64,
    pub exports: f64,
    pub trade_tax: f64,
    pub customs: f64,
    pub transit_tax: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub recipe: String,
    pub count: u32,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceSnapshot {
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
    pub buildings: Vec<BuildingSnapshot>,
    pub transport_cap: f64,
    pub transport_used: f64,
    pub world_transport_cap: f64,
    pub world_transport_used: f64,
    pub treasury: f64,
}

/// Full serializable engine state for external persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub day: u32,
    pub seed: u64,
    pub config: SimConfig,
    pub commodities: Vec<Commodity>,
    pub hubs: Vec<ProvinceId>,
    pub provinces: Vec<ProvinceSnapshot>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl EconomyEngine {
    fn supply(&self) -> Vec<SupplyEntry> {
        self.catalog
            .ids()
            .filter_map(|c| {
                let i = c.index();
                let target: f64 = self.provinces.iter().map(|p| p.target[i]).sum();
                if target <= 0.0 {
                    return None;
                }
                let stock: f64 = self.provinces.iter().map(|p| p.stock[i]).sum();
                Some(SupplyEntry {
                    commodity: self.catalog.commodity(c).id.clone(),
                    stock,
                    target,
                    ratio: stock / target,
                })
            })
            .collect()
    }

    /// Headline figures; lists hold at most `top_n` entries.
    pub fn report(&self, top_n: usize) -> Report {
        let mut top_gdp: Vec<GdpEntry> = self
            .provinces
            .iter()
            .map(|p| GdpEntry {
                pid: p.pid,
                name: p.name.clone(),
                gdp: p.trailing.total().gdp,
            })
            .collect();
        top_gdp.sort_by(|a, b| b.gdp.total_cmp(&a.gdp).then(a.pid.cmp(&b.pid)));
        top_gdp.truncate(top_n);

        let mut supply = self.supply();
        supply.sort_by(|a, b| {
            a.ratio
                .total_cmp(&b.ratio)
                .then_with(|| a.commodity.cmp(&b.commodity))
        });
        let most_scarce: Vec<SupplyEntry> = supply.iter().take(top_n).cloned().collect();
        let most_oversupplied: Vec<SupplyEntry> =
            supply.iter().rev().take(top_n).cloned().collect();

        Report {
            day: self.day,
            total_population: self.provinces.iter().map(|p| p.pop).sum(),
            top_gdp,
            most_scarce,
            most_oversupplied,
            treasury_total: self.provinces.iter().map(|p| p.treasury).sum(),
        }
    }

    /// Per-commodity world balance over the trailing window, catalog order.
    pub fn global_trade_balance(&self) -> Vec<CommodityBalance> {
        let flows = self.stats.flows.total();
        self.catalog
            .ids()
            .map(|c| {
                let i = c.index();
                let at = |v: &Vec<f64>| v.get(i).copied().unwrap_or(0.0);
                let produced = at(&flows.produced);
                let sold = at(&flows.sold);
                CommodityBalance {
                    commodity: self.catalog.commodity(c).id.clone(),
                    produced,
                    sold,
                    saldo: produced - sold,
                    imported: at(&flows.imported),
                    exported: at(&flows.exported),
                    stock: self.provinces.iter().map(|p| p.stock[i]).sum(),
                }
            })
            .collect()
    }

    pub fn province_summary(&self, pid: ProvinceId) -> Option<ProvinceSummary> {
        let p = self.province(pid)?;
        let t = p.trailing.total();
        Some(ProvinceSummary {
            pid: p.pid,
            name: p.name.clone(),
            pop: p.pop,
            infra: p.infra,
            is_city: p.is_city,
            is_hub: p.is_hub,
            buildings: p.building_count(),
            treasury: p.treasury,
            days: p.trailing.len(),
            gdp: t.gdp,
            imports: t.imports,
            exports: t.exports,
            trade_tax: t.trade_tax,
            customs: t.customs,
            transit_tax: t.transit_tax,
            expenses: t.expenses,
        })
    }

    pub fn export_snapshot(&self) -> Snapshot {
        let provinces = self
            .provinces
            .iter()
            .map(|p| ProvinceSnapshot {
                pid: p.pid,
                name: p.name.clone(),
                terrain: p.terrain.clone(),
                pop: p.pop,
                infra: p.infra,
                is_city: p.is_city,
                is_hub: p.is_hub,
                stock: p.stock.clone(),
                price: p.price.clone(),
                target: p.target.clone(),
                reserve: p.reserve.clone(),
                raw_potential: p.raw_potential.clone(),
                buildings: p
                    .buildings
                    .iter()
                    .map(|b| BuildingSnapshot {
                        recipe: self.catalog.recipe_definition(b.recipe).id.clone(),
                        count: b.count,
                        efficiency: b.efficiency,
                    })
                    .collect(),
                transport_cap: p.transport_cap,
                transport_used: p.transport_used,
                world_transport_cap: p.world_transport_cap,
                world_transport_used: p.world_transport_used,
                treasury: p.treasury,
            })
            .collect();

        Snapshot {
            day: self.day,
            seed: self.seed,
            config: self.config.clone(),
            commodities: self.catalog.commodities().to_vec(),
            hubs: self.hubs(),
            provinces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::testing::TopologyBuilder;

    fn engine() -> EconomyEngine {
        let nodes = TopologyBuilder::new()
            .province(1, "city", (0.0, 0.0))
            .province(2, "farmland", (1.0, 0.0))
            .province(3, "forest", (1.0, 1.0))
            .border(1, 2, 2)
            .border(2, 3, 1)
            .border(3, 1, 1)
            .area(1, 3.0)
            .build();
        EconomyEngine::new(&nodes, Catalog::standard(), SimConfig::default(), 11).unwrap()
    }

    #[test]
    fn test_report_shapes() {
        let mut e = engine();
        e.run(3);
        let r = e.report(2);
        assert_eq!(r.day, 3);
        assert_eq!(r.top_gdp.len(), 2);
        assert!(r.top_gdp[0].gdp >= r.top_gdp[1].gdp);
        assert!(r.most_scarce.len() <= 2);
        if let (Some(s), Some(o)) = (r.most_scarce.first(), r.most_oversupplied.first()) {
            assert!(s.ratio <= o.ratio);
        }
        assert_eq!(r.total_population, e.provinces().iter().map(|p| p.pop).sum::<u64>());
    }

    #[test]
    fn test_trade_balance_saldo() {
        let mut e = engine();
        e.run(5);
        let balance = e.global_trade_balance();
        assert_eq!(balance.len(), e.catalog().len());
        for b in &balance {
            assert!((b.saldo - (b.produced - b.sold)).abs() < 1e-9);
            assert!(b.stock >= 0.0);
        }
        assert!(balance.iter().any(|b| b.produced > 0.0));
    }

    #[test]
    fn test_province_summary() {
        let mut e = engine();
        e.run(2);
        let s = e.province_summary(1).unwrap();
        assert_eq!(s.days, 2);
        assert!(s.is_hub);
        assert!(e.province_summary(42).is_none());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let e = engine();
        let snap = e.export_snapshot();
        let json = snap.to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.provinces.len(), 3);
        assert_eq!(back.commodities.len(), e.catalog().len());
        assert_eq!(back.hubs, vec![1]);
    }
}

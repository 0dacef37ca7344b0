//! External market-maker at the hubs.
//!
//! Hubs are topped up toward a per-tier floor quantity for every commodity
//! that some province wants, so world availability never collapses to zero.
//! Essentials use a doubled floor and are served first. Each hub has its own
//! logistics budget, independent of its world transport capacity.

use super::world_market::import_price;
use super::TickContext;
use crate::catalog::{Catalog, CommodityId, Tier};
use crate::defines::{trade, EPSILON};
use crate::ledger::CommodityFlows;
use crate::state::ProvinceState;
use tracing::instrument;

/// Quantity a hub keeps on hand for one commodity.
pub fn showcase_floor(catalog: &Catalog, c: CommodityId) -> f64 {
    let commodity = catalog.commodity(c);
    let base = match commodity.tier {
        Tier::Raw => 6.0,
        Tier::Component => 4.0,
        Tier::Product => 3.0,
        Tier::Animal => 2.0,
    };
    if commodity.essential {
        base * 2.0
    } else {
        base
    }
}

#[instrument(skip_all, name = "restock")]
pub fn run_restock_tick(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    flows: &mut CommodityFlows,
) {
    let catalog = ctx.catalog;
    let wanted: Vec<CommodityId> = catalog
        .ids()
        .filter(|&c| provinces.iter().any(|p| p.target[c.index()] > 0.0))
        .collect();
    if wanted.is_empty() {
        return;
    }
    let mut order: Vec<CommodityId> = wanted
        .iter()
        .copied()
        .filter(|&c| catalog.is_essential(c))
        .collect();
    order.extend(wanted.iter().copied().filter(|&c| !catalog.is_essential(c)));

    for &hub in ctx.graph.hubs() {
        let p = &mut provinces[hub];
        let mut budget = ctx.config.restock_budget.max(0.0);
        for &c in &order {
            if budget <= EPSILON {
                break;
            }
            let i = c.index();
            let missing = showcase_floor(catalog, c) - p.stock[i];
            if missing <= EPSILON {
                continue;
            }
            let commodity = catalog.commodity(c);
            let load = commodity.bulk.max(trade::MIN_BULK);
            let qty = missing.min(budget / load);
            p.put(c, qty);
            budget -= qty * load;

            let ship = ctx.config.world.port_fee * commodity.bulk;
            let value = qty * import_price(commodity, ship, ctx.config);
            p.today.imports += value;
            p.today.customs += value * ctx.config.fiscal.import_tax;
            flows.imported[i] += qty;
        }
    }
}

//! External market: world parity prices, imports and exports.
//!
//! Every province reaches the world through its nearest hub. Shipping cost is
//! `gate_distance × transport_unit_cost × bulk / infra + port_fee × bulk`.
//! Provinces with no reachable hub do not trade externally.

use super::TickContext;
use crate::catalog::{Commodity, CommodityId};
use crate::config::SimConfig;
use crate::defines::{demography, pricing, trade, EPSILON};
use crate::ledger::CommodityFlows;
use crate::state::ProvinceState;
use tracing::instrument;

/// World import and export reference prices for one province and commodity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parity {
    pub import: f64,
    pub export: f64,
}

pub fn ship_cost(gate_distance: f64, infra: f64, bulk: f64, config: &SimConfig) -> f64 {
    gate_distance * config.transport_unit_cost * bulk / infra.max(demography::INFRA_MIN)
        + config.world.port_fee * bulk
}

pub fn import_price(commodity: &Commodity, ship: f64, config: &SimConfig) -> f64 {
    commodity.base_price * (1.0 + config.world.import_markup) + ship
}

pub fn export_price(commodity: &Commodity, ship: f64, config: &SimConfig) -> f64 {
    (commodity.base_price * (1.0 - config.world.export_markdown) - ship)
        .max(commodity.base_price * pricing::EXPORT_FLOOR)
}

pub fn parity(commodity: &Commodity, gate_distance: f64, infra: f64, config: &SimConfig) -> Parity {
    let ship = ship_cost(gate_distance, infra, commodity.bulk, config);
    Parity {
        import: import_price(commodity, ship, config),
        export: export_price(commodity, ship, config),
    }
}

#[inline]
fn load_per_unit(commodity: &Commodity) -> f64 {
    commodity.bulk.max(trade::MIN_BULK)
}

/// Imports for provinces below target, then exports of surplus above the
/// export ceiling, both bounded by remaining world logistics capacity.
///
/// Untargeted commodities are never imported.
#[instrument(skip_all, name = "world_market")]
pub fn run_world_market_tick(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    flows: &mut CommodityFlows,
) {
    let catalog = ctx.catalog;
    let fiscal = &ctx.config.fiscal;
    // Essentials claim world capacity first
    let order: Vec<CommodityId> = catalog
        .essential()
        .iter()
        .copied()
        .chain(catalog.ids().filter(|&c| !catalog.is_essential(c)))
        .collect();

    for (idx, p) in provinces.iter_mut().enumerate() {
        if !ctx.graph.has_gate(idx) {
            continue;
        }
        let gate = ctx.graph.gate_distance(idx);

        for &c in &order {
            let i = c.index();
            let target = p.target[i];
            if target <= 0.0 || p.stock[i] >= target {
                continue;
            }
            let commodity = catalog.commodity(c);
            let world = parity(commodity, gate, p.infra, ctx.config);
            let load = load_per_unit(commodity);
            let shortfall = (target - p.stock[i]).min(target * trade::IMPORT_SHARE_PER_DAY);
            let qty = shortfall.min(p.world_transport_remaining() / load);
            if qty <= EPSILON {
                continue;
            }
            p.put(c, qty);
            p.use_world_transport(qty * load);
            let value = qty * world.import;
            p.today.imports += value;
            p.today.customs += value * fiscal.import_tax;
            flows.imported[i] += qty;
            log::trace!("province {} imports {:.2} {}", p.pid, qty, commodity.id);
        }

        for c in catalog.ids() {
            let surplus = p.exportable(c);
            if surplus <= EPSILON {
                continue;
            }
            let commodity = catalog.commodity(c);
            let load = load_per_unit(commodity);
            let qty =
                (surplus * trade::EXPORT_SHARE_PER_DAY).min(p.world_transport_remaining() / load);
            if qty <= EPSILON {
                continue;
            }
            let world = parity(commodity, gate, p.infra, ctx.config);
            let shipped = p.take(c, qty);
            p.use_world_transport(shipped * load);
            let value = shipped * world.export;
            p.today.exports += value;
            p.today.gdp += value;
            p.today.customs += value * fiscal.export_tax;
            flows.exported[c.index()] += shipped;
            log::trace!("province {} exports {:.2} {}", p.pid, shipped, commodity.id);
        }
    }
}

//! Daily price update.
//!
//! Each price moves with local scarcity, is pulled toward world parity when
//! the province is clearly short (import parity) or oversupplied (export
//! parity), and is finally clamped to a band around base price and parity.

use super::world_market::{parity, Parity};
use super::TickContext;
use crate::catalog::Commodity;
use crate::defines::{pricing, stock};
use crate::graph::UNREACHABLE_GATE;
use crate::state::ProvinceState;
use rayon::prelude::*;
use tracing::instrument;

/// Price band `[floor, ceiling]` for a commodity given its world parity.
pub fn price_bounds(commodity: &Commodity, world: Parity) -> (f64, f64) {
    let floor =
        (commodity.base_price * pricing::FLOOR_BASE).max(world.export * pricing::FLOOR_PARITY);
    let ceiling =
        (commodity.base_price * pricing::CEILING_BASE).max(world.import * pricing::CEILING_PARITY);
    (floor, ceiling.max(floor))
}

/// One day's price step.
pub fn next_price(
    price: f64,
    stock_level: f64,
    target: f64,
    commodity: &Commodity,
    world: Parity,
) -> f64 {
    let mut price = if price.is_finite() && price > 0.0 {
        price
    } else {
        commodity.base_price
    };

    if target > 0.0 {
        let scarcity = ((target - stock_level) / target)
            .clamp(-pricing::SCARCITY_CLAMP, pricing::SCARCITY_CLAMP);
        price *= 1.0 + pricing::SCARCITY_RATE * scarcity;

        let ratio = stock_level / target;
        if ratio < pricing::SCARCE_RATIO {
            price += pricing::PARITY_PULL * (world.import - price);
        } else if ratio > stock::EXPORT_BUFFER {
            price += pricing::PARITY_PULL * (world.export - price);
        }
    } else {
        price += pricing::IDLE_PULL * (world.export - price);
    }

    let (floor, ceiling) = price_bounds(commodity, world);
    price.clamp(floor, ceiling)
}

#[instrument(skip_all, name = "pricing")]
pub fn run_pricing_tick(provinces: &mut [ProvinceState], ctx: &TickContext) {
    let catalog = ctx.catalog;
    let graph = ctx.graph;
    let config = ctx.config;

    provinces.par_iter_mut().enumerate().for_each(|(idx, p)| {
        let gate = if graph.has_gate(idx) {
            graph.gate_distance(idx)
        } else {
            UNREACHABLE_GATE
        };
        for c in catalog.ids() {
            let i = c.index();
            let commodity = catalog.commodity(c);
            let world = parity(commodity, gate, p.infra, config);
            p.price[i] = next_price(p.price[i], p.stock[i], p.target[i], commodity, world);
        }
    });
}

//! Building production.
//!
//! Recipes run in sector order (primary first) so intermediate goods made
//! earlier in the day are available to later stages. Each building's
//! utilization is limited by the labor left in the province, by its scarcest
//! input and by how much its outputs are still wanted.

use super::TickContext;
use crate::catalog::{CommodityId, ResolvedRecipe};
use crate::defines::{production, stock, EPSILON};
use crate::ledger::CommodityFlows;
use crate::state::ProvinceState;
use tracing::instrument;

/// How much a province still wants of a commodity, in `[0, 1]`.
///
/// `1` at or below target, falling linearly to `0` at the export ceiling.
/// Untargeted commodities have no demand.
pub fn demand_factor(stock_level: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    let ceiling = target * stock::EXPORT_BUFFER;
    if stock_level >= ceiling {
        0.0
    } else if stock_level <= target {
        1.0
    } else {
        (ceiling - stock_level) / (ceiling - target)
    }
}

/// Utilization in `[0, 1]` for `count` instances of `recipe`.
pub fn utilization(
    p: &ProvinceState,
    recipe: &ResolvedRecipe,
    count: u32,
    efficiency: f64,
    labor_left: f64,
) -> f64 {
    let count = count as f64;
    let labor_need = recipe.labor * count;
    let labor_avail = if labor_need > 0.0 {
        (labor_left / labor_need).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let input_avail = recipe
        .input
        .iter()
        .map(|&(c, qty)| (p.stock[c.index()] / (qty * count)).min(1.0))
        .fold(1.0, f64::min);
    let demand = recipe
        .output
        .iter()
        .map(|&(c, _)| demand_factor(p.stock[c.index()], p.target[c.index()]))
        .fold(0.0, f64::max);

    let bound = labor_avail.min(input_avail);
    (bound.min(demand) * efficiency * recipe.cap).clamp(0.0, 1.0).min(bound)
}

fn essential_deficit(p: &ProvinceState, recipe: &ResolvedRecipe, ctx: &TickContext) -> bool {
    recipe.output.iter().any(|&(c, _)| {
        let i = c.index();
        ctx.catalog.is_essential(c) && p.stock[i] < p.target[i] * production::DEFICIT_OVERRIDE
    })
}

#[instrument(skip_all, name = "production")]
pub fn run_production_tick(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    flows: &mut CommodityFlows,
) {
    for p in provinces.iter_mut() {
        if p.buildings.is_empty() {
            continue;
        }
        let mut labor_left = p.labor_pool();

        for &rid in ctx.catalog.production_order() {
            let Some(building) = p.buildings.iter().find(|b| b.recipe == rid).copied() else {
                continue;
            };
            if building.count == 0 {
                continue;
            }
            let recipe = ctx.catalog.recipe(rid);
            let util = utilization(p, recipe, building.count, building.efficiency, labor_left);
            if util <= EPSILON {
                continue;
            }
            let runs = building.count as f64 * util;

            let priced = |entries: &[(CommodityId, f64)]| -> f64 {
                entries.iter().map(|&(c, q)| q * runs * p.price[c.index()]).sum()
            };
            let value = priced(&recipe.output[..]);
            let cost = priced(&recipe.input[..]);
            let wages = recipe.labor * runs * production::WAGE;
            let profitable = value >= cost * production::PROFIT_MARGIN + wages;
            if !profitable && !essential_deficit(p, recipe, ctx) {
                log::trace!("province {}: recipe {:?} unprofitable", p.pid, rid);
                continue;
            }

            for &(c, q) in &recipe.input {
                let used = p.take(c, q * runs);
                flows.sold[c.index()] += used;
            }
            for &(c, q) in &recipe.output {
                let made = q * runs;
                p.put(c, made);
                p.today.gdp += made * p.price[c.index()];
                flows.produced[c.index()] += made;
            }
            labor_left = (labor_left - recipe.labor * runs).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::testing::{SystemFixture, TopologyBuilder};

    fn sawmill_fixture() -> SystemFixture {
        let nodes = TopologyBuilder::new().province(1, "forest", (0.0, 0.0)).build();
        let mut fx = SystemFixture::new(nodes, Catalog::standard());
        let sawmill = fx.catalog.recipe_id("sawmill").unwrap();
        let p = &mut fx.provinces[0];
        p.pop = 10_000;
        p.add_building(sawmill, 1, 1.0);
        crate::systems::targets::recompute_targets(p, &fx.catalog);
        fx
    }

    #[test]
    fn test_demand_factor_curve() {
        assert_eq!(demand_factor(0.0, 0.0), 0.0);
        assert_eq!(demand_factor(5.0, 10.0), 1.0);
        assert_eq!(demand_factor(10.0, 10.0), 1.0);
        assert!((demand_factor(13.0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(demand_factor(16.0, 10.0), 0.0);
    }

    #[test]
    fn test_sawmill_converts_wood() {
        let mut fx = sawmill_fixture();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let planks = fx.catalog.commodity_id("wood_processed").unwrap();
        fx.provinces[0].stock[wood.index()] = 100.0;
        let mut flows = CommodityFlows::zeros(fx.catalog.len());

        let (ctx, provinces) = fx.split();
        run_production_tick(provinces, &ctx, &mut flows);

        assert!((provinces[0].stock[wood.index()] - 90.0).abs() < 1e-9);
        assert!((provinces[0].stock[planks.index()] - 8.0).abs() < 1e-9);
        assert!((flows.sold[wood.index()] - 10.0).abs() < 1e-9);
        assert!(provinces[0].today.gdp > 0.0);
    }

    #[test]
    fn test_scarce_input_limits_output() {
        let mut fx = sawmill_fixture();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let planks = fx.catalog.commodity_id("wood_processed").unwrap();
        fx.provinces[0].stock[wood.index()] = 5.0;
        let mut flows = CommodityFlows::zeros(fx.catalog.len());

        let (ctx, provinces) = fx.split();
        run_production_tick(provinces, &ctx, &mut flows);

        assert!(provinces[0].stock[wood.index()].abs() < 1e-9);
        assert!((provinces[0].stock[planks.index()] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_labor_no_output() {
        let mut fx = sawmill_fixture();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        fx.provinces[0].pop = 0;
        fx.provinces[0].stock[wood.index()] = 100.0;
        let mut flows = CommodityFlows::zeros(fx.catalog.len());

        let (ctx, provinces) = fx.split();
        run_production_tick(provinces, &ctx, &mut flows);
        assert_eq!(provinces[0].stock[wood.index()], 100.0);
    }

    #[test]
    fn test_saturated_output_stops_production() {
        let mut fx = sawmill_fixture();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let planks = fx.catalog.commodity_id("wood_processed").unwrap();
        let ceiling = fx.provinces[0].target[planks.index()] * 1.6;
        fx.provinces[0].stock[wood.index()] = 100.0;
        fx.provinces[0].stock[planks.index()] = ceiling;
        let mut flows = CommodityFlows::zeros(fx.catalog.len());

        let (ctx, provinces) = fx.split();
        run_production_tick(provinces, &ctx, &mut flows);
        assert_eq!(provinces[0].stock[wood.index()], 100.0);
    }

    #[test]
    fn test_unprofitable_recipe_is_skipped() {
        let mut fx = sawmill_fixture();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let planks = fx.catalog.commodity_id("wood_processed").unwrap();
        fx.provinces[0].stock[wood.index()] = 100.0;
        fx.provinces[0].price[wood.index()] = 10.0;
        fx.provinces[0].price[planks.index()] = 1.0;
        let mut flows = CommodityFlows::zeros(fx.catalog.len());

        let (ctx, provinces) = fx.split();
        run_production_tick(provinces, &ctx, &mut flows);
        assert_eq!(provinces[0].stock[wood.index()], 100.0);
    }
}

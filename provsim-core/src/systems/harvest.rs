use super::TickContext;
use crate::catalog::Commodity;
use crate::defines::{demography, production, EPSILON};
use crate::ledger::CommodityFlows;
use crate::state::ProvinceState;
use tracing::instrument;

/// Per-unit extraction cost; worse infrastructure makes extraction dearer.
pub fn extraction_cost(commodity: &Commodity, infra: f64) -> f64 {
    let infra = infra.max(demography::INFRA_MIN);
    commodity.base_price * production::EXTRACTION_COST_SHARE / infra.sqrt()
}

/// Daily yield for a raw commodity at the given local price.
///
/// Zero when the price does not cover extraction cost; otherwise between
/// 35% and 110% of potential depending on the margin.
pub fn harvest_yield(potential: f64, price: f64, cost: f64) -> f64 {
    if potential <= 0.0 || price <= cost || cost <= 0.0 {
        return 0.0;
    }
    let profit = ((price - cost) / cost).clamp(0.0, 1.0);
    potential * (production::YIELD_BASE + production::YIELD_PROFIT * profit)
}

#[instrument(skip_all, name = "harvest")]
pub fn run_harvest_tick(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    flows: &mut CommodityFlows,
) {
    let harvestable: Vec<_> = ctx.catalog.harvestable().collect();
    for p in provinces.iter_mut() {
        for &c in &harvestable {
            let i = c.index();
            let commodity = ctx.catalog.commodity(c);
            let cost = extraction_cost(commodity, p.infra);
            let qty = harvest_yield(p.raw_potential[i], p.price[i], cost);
            if qty <= EPSILON {
                continue;
            }
            p.put(c, qty);
            p.today.gdp += qty * p.price[i];
            flows.produced[i] += qty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Tier};

    #[test]
    fn test_no_yield_below_cost() {
        assert_eq!(harvest_yield(10.0, 0.5, 0.5), 0.0);
        assert_eq!(harvest_yield(10.0, 0.4, 0.5), 0.0);
        assert_eq!(harvest_yield(0.0, 5.0, 0.5), 0.0);
    }

    #[test]
    fn test_yield_scales_with_margin() {
        // 50% margin
        assert!((harvest_yield(10.0, 0.75, 0.5) - 10.0 * (0.35 + 0.375)).abs() < 1e-12);
        // margin clamps at 100%
        assert!((harvest_yield(10.0, 5.0, 0.5) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_extraction_cost_rises_with_poor_infra() {
        let c = Commodity::new("ore", Tier::Raw, "t", 2.0, 1.0, 0.0, 0.5);
        assert!((extraction_cost(&c, 1.0) - 1.1).abs() < 1e-12);
        assert!(extraction_cost(&c, 0.25) > extraction_cost(&c, 1.0));
    }

    #[test]
    fn test_harvest_books_gdp_and_flows() {
        let catalog = Catalog::standard();
        let wood = catalog.commodity_id("wood").unwrap();
        let mut p = ProvinceState::new(1, "Woods", "forest", catalog.len());
        p.infra = 1.0;
        p.raw_potential[wood.index()] = 10.0;
        p.price[wood.index()] = 0.8;

        let cost = extraction_cost(catalog.commodity(wood), 1.0);
        let expected = harvest_yield(10.0, 0.8, cost);
        assert!(expected > 0.0);

        let nodes = crate::testing::TopologyBuilder::new()
            .province(1, "forest", (0.0, 0.0))
            .build();
        let mut fx = crate::testing::SystemFixture::new(nodes, catalog);
        fx.provinces[0] = p;
        let mut flows = CommodityFlows::zeros(fx.catalog.len());
        let (ctx, provinces) = fx.split();
        run_harvest_tick(provinces, &ctx, &mut flows);

        assert!((provinces[0].stock[wood.index()] - expected).abs() < 1e-9);
        assert!((flows.produced[wood.index()] - expected).abs() < 1e-9);
        assert!((provinces[0].today.gdp - expected * 0.8).abs() < 1e-9);
    }
}

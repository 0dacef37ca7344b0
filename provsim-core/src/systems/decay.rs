use super::TickContext;
use crate::state::ProvinceState;
use tracing::instrument;

/// `stock[c] *= 1 - decay_per_day[c]`
#[instrument(skip_all, name = "decay")]
pub fn run_decay_tick(provinces: &mut [ProvinceState], ctx: &TickContext) {
    let keep: Vec<f64> = ctx.catalog.commodities().iter().map(|c| 1.0 - c.decay_per_day).collect();
    for p in provinces.iter_mut() {
        for (s, k) in p.stock.iter_mut().zip(&keep) {
            *s = crate::sanitize(*s * k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::testing::{SystemFixture, TopologyBuilder};

    #[test]
    fn test_decay_law() {
        let nodes = TopologyBuilder::new().province(1, "coast", (0.0, 0.0)).build();
        let mut fx = SystemFixture::new(nodes, Catalog::standard());
        let fish = fx.catalog.commodity_id("fish").unwrap();
        let stone = fx.catalog.commodity_id("stone").unwrap();
        fx.provinces[0].stock[fish.index()] = 100.0;
        fx.provinces[0].stock[stone.index()] = 100.0;

        let (ctx, provinces) = fx.split();
        run_decay_tick(provinces, &ctx);

        assert!((provinces[0].stock[fish.index()] - 97.0).abs() < 1e-9);
        assert_eq!(provinces[0].stock[stone.index()], 100.0);
    }
}

//! Internal trade between provinces.
//!
//! Greedy matching, one commodity at a time. Buyers are served most-starved
//! first (lowest stock/target ratio, ties by index). Each buyer looks at its
//! cheapest delivered sellers, where
//!
//! ```text
//! delivered = ask + distance × transport_unit_cost × bulk × (1 + friction)
//! ```
//!
//! and stops once delivered price exceeds its bid ceiling. A fill is bounded
//! by the buyer's need, the seller's stock above reserve and the remaining
//! transport capacity of both ends.

use super::TickContext;
use crate::catalog::CommodityId;
use crate::defines::{stock, trade, EPSILON};
use crate::graph::PathCache;
use crate::state::ProvinceState;
use tracing::instrument;

/// Which of the two daily trade passes is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradePhase {
    /// Before production: essentials only, buyers below reserve fill to reserve.
    PreTrade,
    /// After decay: all commodities, buyers below 98% of target fill to target.
    PostTrade,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TradeSummary {
    pub deals: usize,
    /// Units shipped (before in-transit loss).
    pub volume: f64,
    /// Value at the seller's ask.
    pub value: f64,
}

/// Mutable references to two distinct provinces.
fn pair_mut(
    provinces: &mut [ProvinceState],
    a: usize,
    b: usize,
) -> (&mut ProvinceState, &mut ProvinceState) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = provinces.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = provinces.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

struct Offer {
    seller: usize,
    distance: f64,
    delivered: f64,
}

#[instrument(skip_all, name = "trade", fields(phase = ?phase))]
pub fn run_internal_trade(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    paths: &mut PathCache,
    phase: TradePhase,
) -> TradeSummary {
    let catalog = ctx.catalog;
    let commodities: Vec<CommodityId> = match phase {
        TradePhase::PreTrade => catalog.essential().to_vec(),
        TradePhase::PostTrade => catalog.ids().collect(),
    };
    let mut summary = TradeSummary::default();

    for c in commodities {
        let i = c.index();
        let commodity = catalog.commodity(c);
        let load = commodity.bulk.max(trade::MIN_BULK);
        let haul =
            ctx.config.transport_unit_cost * commodity.bulk * (1.0 + ctx.config.trade_friction);

        let mut buyers: Vec<usize> = (0..provinces.len())
            .filter(|&b| {
                let p = &provinces[b];
                p.target[i] > 0.0
                    && match phase {
                        TradePhase::PreTrade => p.stock[i] < p.reserve[i],
                        TradePhase::PostTrade => p.stock[i] < p.target[i] * stock::BUYER_THRESHOLD,
                    }
            })
            .collect();
        if buyers.is_empty() {
            continue;
        }
        let ratio = |p: &ProvinceState| p.stock[i] / p.target[i];
        buyers.sort_by(|&a, &b| {
            ratio(&provinces[a])
                .total_cmp(&ratio(&provinces[b]))
                .then(a.cmp(&b))
        });

        for b in buyers {
            let goal = match phase {
                TradePhase::PreTrade => provinces[b].reserve[i],
                TradePhase::PostTrade => provinces[b].target[i],
            };
            let mut need = goal - provinces[b].stock[i];
            if need <= EPSILON || provinces[b].transport_remaining() <= EPSILON {
                continue;
            }
            let bid = provinces[b].price[i] * trade::BID_CEILING;

            let mut offers: Vec<Offer> = (0..provinces.len())
                .filter(|&s| s != b && provinces[s].sellable(c) > EPSILON)
                .filter_map(|s| {
                    let distance = ctx.graph.dist(b, s);
                    distance.is_finite().then(|| Offer {
                        seller: s,
                        distance,
                        delivered: provinces[s].price[i] + distance * haul,
                    })
                })
                .collect();
            offers.sort_by(|x, y| {
                x.delivered
                    .total_cmp(&y.delivered)
                    .then(x.seller.cmp(&y.seller))
            });
            offers.truncate(ctx.config.seller_candidates);

            for offer in offers {
                if offer.delivered > bid || need <= EPSILON {
                    break;
                }
                let s = offer.seller;
                let (buyer, seller) = pair_mut(provinces, b, s);
                let capacity = buyer.transport_remaining().min(seller.transport_remaining()) / load;
                let qty = need.min(seller.sellable(c)).min(capacity);
                if qty <= EPSILON {
                    if buyer.transport_remaining() <= EPSILON {
                        break;
                    }
                    continue;
                }

                let shipped = seller.take(c, qty);
                let loss = (offer.distance * commodity.decay_per_day).min(trade::MAX_TRANSIT_LOSS);
                let arrived = shipped * (1.0 - loss);
                buyer.put(c, arrived);
                buyer.use_transport(shipped * load);
                seller.use_transport(shipped * load);

                let ask = seller.price[i];
                let value = shipped * ask;
                seller.today.gdp += value;
                seller.today.trade_tax += value * ctx.config.fiscal.internal_trade_tax;
                need -= arrived;

                let transit =
                    shipped * commodity.bulk * offer.distance * ctx.config.fiscal.transit_fee;
                let mids = paths.intermediates(ctx.graph, b, s);
                if !mids.is_empty() && transit > 0.0 {
                    let share = transit / mids.len() as f64;
                    for &k in mids {
                        provinces[k].today.transit_tax += share;
                    }
                }

                summary.deals += 1;
                summary.volume += shipped;
                summary.value += value;
            }
        }
    }

    log::debug!(
        "{:?}: {} deals, {:.1} units, value {:.1}",
        phase,
        summary.deals,
        summary.volume,
        summary.value
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::testing::{SystemFixture, TopologyBuilder};

    fn chain() -> SystemFixture {
        let nodes = TopologyBuilder::new()
            .province(1, "plains", (0.0, 0.0))
            .province(2, "plains", (1.0, 0.0))
            .province(3, "plains", (2.0, 0.0))
            .border(1, 2, 1)
            .border(2, 3, 1)
            .build();
        let mut fx = SystemFixture::new(nodes, Catalog::standard());
        for p in &mut fx.provinces {
            p.transport_cap = 1_000.0;
        }
        fx
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut v = vec![
            ProvinceState::new(1, "a", "plains", 1),
            ProvinceState::new(2, "b", "plains", 1),
            ProvinceState::new(3, "c", "plains", 1),
        ];
        let (x, y) = pair_mut(&mut v, 2, 0);
        assert_eq!((x.pid, y.pid), (3, 1));
        let (x, y) = pair_mut(&mut v, 0, 1);
        assert_eq!((x.pid, y.pid), (1, 2));
    }

    #[test]
    fn test_post_trade_moves_surplus_and_pays_transit() {
        let mut fx = chain();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let i = wood.index();
        fx.provinces[0].stock[i] = 50.0;
        fx.provinces[2].target[i] = 20.0;
        fx.provinces[2].reserve[i] = 11.0;

        let mut paths = PathCache::default();
        let (ctx, provinces) = fx.split();
        let summary = run_internal_trade(provinces, &ctx, &mut paths, TradePhase::PostTrade);

        assert_eq!(summary.deals, 1);
        // wood has decay 0.001, so almost all 20 arrive
        assert!(provinces[2].stock[i] > 19.9);
        assert!(provinces[0].stock[i] < 30.1);
        assert!(provinces[0].today.gdp > 0.0);
        assert!(provinces[0].today.trade_tax > 0.0);
        assert!(provinces[1].today.transit_tax > 0.0);
        assert!(provinces[0].transport_used > 0.0);
        assert!(provinces[2].transport_used > 0.0);
    }

    #[test]
    fn test_deal_turnover_booked_by_seller_only() {
        let mut fx = chain();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let i = wood.index();
        fx.provinces[0].stock[i] = 50.0;
        fx.provinces[1].target[i] = 10.0;
        fx.provinces[1].reserve[i] = 5.5;

        let mut paths = PathCache::default();
        let (ctx, provinces) = fx.split();
        let summary = run_internal_trade(provinces, &ctx, &mut paths, TradePhase::PostTrade);

        let tax = ctx.config.fiscal.internal_trade_tax;
        assert_eq!(summary.deals, 1);
        assert!((provinces[0].today.gdp - summary.value).abs() < 1e-9);
        assert!((provinces[0].today.trade_tax - summary.value * tax).abs() < 1e-9);
        assert_eq!(provinces[1].today.gdp, 0.0);
        assert_eq!(provinces[1].today.trade_tax, 0.0);
        assert!(provinces[1].transport_used > 0.0);
    }

    #[test]
    fn test_reserve_is_not_sold() {
        let mut fx = chain();
        let bread = fx.catalog.commodity_id("bread").unwrap();
        let i = bread.index();
        fx.provinces[0].stock[i] = 10.0;
        fx.provinces[0].target[i] = 10.0;
        fx.provinces[0].reserve[i] = 5.5;
        fx.provinces[1].target[i] = 100.0;
        fx.provinces[1].reserve[i] = 55.0;

        let mut paths = PathCache::default();
        let (ctx, provinces) = fx.split();
        run_internal_trade(provinces, &ctx, &mut paths, TradePhase::PreTrade);
        assert!(provinces[0].stock[i] >= 5.5 - 1e-9);
    }

    #[test]
    fn test_expensive_sellers_are_rejected() {
        let mut fx = chain();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let i = wood.index();
        fx.provinces[0].stock[i] = 50.0;
        fx.provinces[0].price[i] = 5.0;
        fx.provinces[1].target[i] = 20.0;
        fx.provinces[1].price[i] = 1.0;

        let mut paths = PathCache::default();
        let (ctx, provinces) = fx.split();
        let summary = run_internal_trade(provinces, &ctx, &mut paths, TradePhase::PostTrade);
        assert_eq!(summary.deals, 0);
        assert_eq!(provinces[1].stock[i], 0.0);
    }

    #[test]
    fn test_transport_capacity_bounds_fill() {
        let mut fx = chain();
        let stone = fx.catalog.commodity_id("stone").unwrap();
        let i = stone.index();
        fx.provinces[0].stock[i] = 50.0;
        fx.provinces[1].target[i] = 40.0;
        fx.provinces[1].transport_cap = 10.0; // bulk 2.0 => 5 units

        let mut paths = PathCache::default();
        let (ctx, provinces) = fx.split();
        run_internal_trade(provinces, &ctx, &mut paths, TradePhase::PostTrade);
        assert!((provinces[1].stock[i] - 5.0).abs() < 1e-9);
        assert!(provinces[1].transport_used <= provinces[1].transport_cap);
    }

    #[test]
    fn test_pre_trade_ignores_non_essentials() {
        let mut fx = chain();
        let wood = fx.catalog.commodity_id("wood").unwrap();
        let i = wood.index();
        fx.provinces[0].stock[i] = 50.0;
        fx.provinces[1].target[i] = 20.0;
        fx.provinces[1].reserve[i] = 11.0;

        let mut paths = PathCache::default();
        let (ctx, provinces) = fx.split();
        let summary = run_internal_trade(provinces, &ctx, &mut paths, TradePhase::PreTrade);
        assert_eq!(summary.deals, 0);
    }
}

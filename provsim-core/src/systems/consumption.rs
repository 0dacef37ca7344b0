use super::targets::pop_need;
use super::TickContext;
use crate::defines::EPSILON;
use crate::ledger::CommodityFlows;
use crate::state::ProvinceState;
use tracing::instrument;

/// Population draws its daily per-capita needs from stock.
///
/// Unmet need in a commodity with a substitution rule is partly covered by
/// drawing `shortfall × ratio` of the fallback commodity.
#[instrument(skip_all, name = "consumption")]
pub fn run_consumption_tick(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    flows: &mut CommodityFlows,
) {
    let catalog = ctx.catalog;
    let mut shortfall = vec![0.0; catalog.len()];

    for p in provinces.iter_mut() {
        if p.pop == 0 {
            continue;
        }
        shortfall.iter_mut().for_each(|s| *s = 0.0);

        for c in catalog.ids() {
            let need = pop_need(p, catalog.commodity(c));
            if need <= 0.0 {
                continue;
            }
            let taken = p.take(c, need);
            flows.sold[c.index()] += taken;
            shortfall[c.index()] = need - taken;
        }

        for &(primary, fallback, ratio) in catalog.substitutions() {
            let missing = shortfall[primary.index()];
            if missing <= EPSILON {
                continue;
            }
            let taken = p.take(fallback, missing * ratio);
            flows.sold[fallback.index()] += taken;
        }
    }
}

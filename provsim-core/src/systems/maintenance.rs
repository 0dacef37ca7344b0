use super::TickContext;
use crate::defines::{maintenance, EPSILON};
use crate::ledger::CommodityFlows;
use crate::state::ProvinceState;
use tracing::instrument;

/// New efficiency after a day with the given upkeep coverage.
///
/// Full coverage restores slowly up to the maximum. Partial coverage degrades
/// in proportion to the gap, never below the minimum (or the current value if
/// it already sits under the minimum).
pub fn next_efficiency(efficiency: f64, coverage: f64) -> f64 {
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage >= 1.0 - EPSILON {
        (efficiency * maintenance::RESTORE_FACTOR).min(maintenance::MAX_EFFICIENCY.max(efficiency))
    } else {
        let degraded = efficiency * (1.0 - maintenance::DEGRADE_RATE * (1.0 - coverage));
        degraded.max(maintenance::MIN_EFFICIENCY.min(efficiency))
    }
}

/// Buildings draw their daily upkeep, and efficiency follows coverage.
#[instrument(skip_all, name = "maintenance")]
pub fn run_maintenance_tick(
    provinces: &mut [ProvinceState],
    ctx: &TickContext,
    flows: &mut CommodityFlows,
) {
    for p in provinces.iter_mut() {
        for bi in 0..p.buildings.len() {
            let building = p.buildings[bi];
            let recipe = ctx.catalog.recipe(building.recipe);
            let count = building.count as f64;

            let mut coverage: f64 = 1.0;
            for &(c, qty) in &recipe.upkeep {
                let need = qty * count;
                if need <= 0.0 {
                    continue;
                }
                let taken = p.take(c, need);
                flows.sold[c.index()] += taken;
                coverage = coverage.min(taken / need);
            }

            p.buildings[bi].efficiency = next_efficiency(building.efficiency, coverage);
        }
    }
}

//! The daily state transition.

use crate::engine::EconomyEngine;
use crate::profiling;
use crate::systems::{
    run_consumption_tick, run_decay_tick, run_expenses_tick, run_harvest_tick, run_internal_trade,
    run_maintenance_tick, run_pricing_tick, run_production_tick, run_restock_tick, run_stats_tick,
    run_targets_tick, run_world_market_tick, TickContext, TradePhase,
};
use std::time::Instant;
use tracing::instrument;

impl EconomyEngine {
    /// Simulate one day.
    ///
    /// Every phase sweeps all provinces before the next one starts. Never
    /// fails: malformed quantities are clamped, unreachable legs skipped.
    #[instrument(skip_all, name = "tick", fields(day = self.day))]
    pub fn tick(&mut self) {
        let tick_start = Instant::now();
        self.stats.begin_day();
        let ctx = TickContext {
            catalog: &self.catalog,
            graph: &self.graph,
            config: &self.config,
            day: self.day,
        };
        let provinces = &mut self.provinces;
        let flows = &mut self.stats.today;
        let metrics = &mut self.metrics;

        for p in provinces.iter_mut() {
            p.reset_day();
        }

        let t = Instant::now();
        run_targets_tick(provinces, &ctx);
        metrics.targets_time += t.elapsed();

        let t = Instant::now();
        run_restock_tick(provinces, &ctx, flows);
        metrics.world_market_time += t.elapsed();

        let t = Instant::now();
        let pre = {
            let _span = tracing::info_span!("pre_trade").entered();
            run_internal_trade(provinces, &ctx, &mut self.paths, TradePhase::PreTrade)
        };
        metrics.trade_time += t.elapsed();

        let t = Instant::now();
        run_harvest_tick(provinces, &ctx, flows);
        run_production_tick(provinces, &ctx, flows);
        run_consumption_tick(provinces, &ctx, flows);
        run_maintenance_tick(provinces, &ctx, flows);
        run_decay_tick(provinces, &ctx);
        metrics.economy_time += t.elapsed();

        let t = Instant::now();
        let post = {
            let _span = tracing::info_span!("post_trade").entered();
            let summary =
                run_internal_trade(provinces, &ctx, &mut self.paths, TradePhase::PostTrade);
            let m = Instant::now();
            run_world_market_tick(provinces, &ctx, flows);
            metrics.world_market_time += m.elapsed();
            summary
        };
        metrics.trade_time += t.elapsed();

        let t = Instant::now();
        run_expenses_tick(provinces, &ctx);
        metrics.fiscal_time += t.elapsed();

        let t = Instant::now();
        run_pricing_tick(provinces, &ctx);
        metrics.pricing_time += t.elapsed();

        let t = Instant::now();
        run_stats_tick(provinces, &mut self.stats);
        metrics.stats_time += t.elapsed();

        log::debug!(
            "day {}: {} pre-trade deals, {} post-trade deals, gdp {:.1}",
            self.day,
            pre.deals,
            post.deals,
            self.stats.ledger.latest().map_or(0.0, |l| l.gdp)
        );

        self.day += 1;
        metrics.total_ticks += 1;
        metrics.total_time += tick_start.elapsed();
        profiling::frame_mark_tick();
    }

    /// Simulate `days` consecutive days.
    pub fn run(&mut self, days: u32) {
        for _ in 0..days {
            self.tick();
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;

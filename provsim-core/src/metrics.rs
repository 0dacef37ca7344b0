use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accumulated wall-clock time per tick phase.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_ticks: u64,
    pub total_time: Duration,
    pub construction_time: Duration,
    pub targets_time: Duration,
    /// Market-maker restock plus world imports/exports.
    pub world_market_time: Duration,
    /// Both internal trade passes.
    pub trade_time: Duration,
    /// Harvest, production, consumption, maintenance and decay combined.
    pub economy_time: Duration,
    pub fiscal_time: Duration,
    pub pricing_time: Duration,
    pub stats_time: Duration,
}

impl SimMetrics {
    pub fn tick_avg_ms(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() * 1000.0 / self.total_ticks as f64
        }
    }

    pub fn days_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() == 0.0 {
            0.0
        } else {
            self.total_ticks as f64 / self.total_time.as_secs_f64()
        }
    }
}

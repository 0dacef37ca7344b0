//! Daily economy systems, run in order by [`EconomyEngine::tick`](crate::EconomyEngine::tick).

pub mod consumption;
pub mod decay;
pub mod expenses;
pub mod harvest;
pub mod maintenance;
pub mod pricing;
pub mod production;
pub mod restock;
pub mod stats;
pub mod targets;
pub mod trade;
pub mod world_market;

pub use consumption::run_consumption_tick;
pub use decay::run_decay_tick;
pub use expenses::run_expenses_tick;
pub use harvest::run_harvest_tick;
pub use maintenance::run_maintenance_tick;
pub use pricing::run_pricing_tick;
pub use production::run_production_tick;
pub use restock::run_restock_tick;
pub use stats::{run_stats_tick, WorldStats};
pub use targets::run_targets_tick;
pub use trade::{run_internal_trade, TradePhase, TradeSummary};
pub use world_market::run_world_market_tick;

use crate::catalog::Catalog;
use crate::config::SimConfig;
use crate::graph::TradeGraph;

/// Read-only inputs shared by every system during one tick.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub catalog: &'a Catalog,
    pub graph: &'a TradeGraph,
    pub config: &'a SimConfig,
    /// Day being simulated (0 for the first tick).
    pub day: u32,
}

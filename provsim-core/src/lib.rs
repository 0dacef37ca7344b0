//! # Provincial Economy Simulation Core
//!
//! Deterministic, graph-aware daily economy for a map of provinces: harvest,
//! production chains, population consumption, internal and world trade,
//! pricing and treasuries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ ProvinceNode │────▶│ TradeGraph   │────▶│ EconomyEngine │
//! │ (topology)   │     │ + potentials │     │ (construct)   │
//! └──────────────┘     └──────────────┘     └───────┬───────┘
//!                                                   │ tick()
//!                      ┌──────────────┐     ┌───────▼───────┐
//!                      │ Report /     │◀────│ ProvinceState │
//!                      │ Snapshot     │     │ (mutated)     │
//!                      └──────────────┘     └───────────────┘
//! ```
//!
//! The graph, distance table, hubs and raw potentials are computed once at
//! construction. Every [`EconomyEngine::tick`] then runs the systems in
//! [`systems`] in a fixed order over all provinces.
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`EconomyEngine`] | Owns all state; `tick()` plus reporting views |
//! | [`Catalog`] | Commodity and building-recipe tables |
//! | [`ProvinceNode`] | Static topology record |
//! | [`SimConfig`] | Tunable rates and world-market parameters |
//! | [`ScenarioOverrides`] | Construction-time population/stock/building overrides |
//! | [`Snapshot`] | Serializable full state |

pub mod catalog;
pub mod config;
pub mod defines;
pub mod engine;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod metrics;
pub mod overrides;
pub mod potential;
pub mod profiling;
pub mod report;
pub mod rng;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;
pub mod topology;
pub mod worldgen;

pub use catalog::{
    BuildingRecipe, Catalog, CatalogDocument, Commodity, CommodityId, RecipeId, Sector, Tier,
};
pub use config::{FiscalConfig, SimConfig, WorldMarketConfig};
pub use engine::EconomyEngine;
pub use error::{CatalogError, EngineError};
pub use graph::TradeGraph;
pub use metrics::SimMetrics;
pub use overrides::{BuildingOverride, ScenarioOverrides};
pub use report::{CommodityBalance, GdpEntry, ProvinceSummary, Report, Snapshot, SupplyEntry};
pub use rng::SimRng;
pub use state::{Building, ProvinceState};
pub use topology::{Centroid, Neighbor, ProvinceId, ProvinceNode};

/// Clamp a quantity to a finite non-negative value.
#[inline]
pub fn sanitize(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        0.0
    }
}

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Simulation configuration.
///
/// Every field has a default, so a partial JSON document only needs to name
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Cost per unit of bulk per unit of graph distance.
    pub transport_unit_cost: f64,
    /// Extra overhead on internal delivery costs (0.15 = +15%).
    pub trade_friction: f64,
    /// Diffusion rounds applied to raw-potential fields.
    pub smooth_steps: u32,
    /// Number of trade hubs to select (values below 2 are raised to 2).
    pub hub_count: usize,
    /// Cheapest-delivered sellers each buyer considers per commodity.
    pub seller_candidates: usize,
    /// Bulk the external market maker may ship into each hub per tick.
    pub restock_budget: f64,
    pub world: WorldMarketConfig,
    pub fiscal: FiscalConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            transport_unit_cost: 0.02,
            trade_friction: 0.15,
            smooth_steps: 8,
            hub_count: 6,
            seller_candidates: 70,
            restock_budget: 40.0,
            world: WorldMarketConfig::default(),
            fiscal: FiscalConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(EngineError::Config)
    }

    /// Hub count with the lower bound applied.
    pub fn effective_hub_count(&self) -> usize {
        self.hub_count.max(2)
    }
}

/// External market pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldMarketConfig {
    /// Markup over base price for imports.
    pub import_markup: f64,
    /// Markdown under base price for exports.
    pub export_markdown: f64,
    /// Flat port handling fee per unit of bulk.
    pub port_fee: f64,
    /// Multiplier on every province's world logistics capacity; 0 closes
    /// the world market (the hub restock has its own budget).
    pub capacity_scale: f64,
}

impl Default for WorldMarketConfig {
    fn default() -> Self {
        Self {
            import_markup: 0.35,
            export_markdown: 0.25,
            port_fee: 0.05,
            capacity_scale: 1.0,
        }
    }
}

/// Tax rates and administrative cost coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalConfig {
    /// Tax on internal deal value, collected by the seller province.
    pub internal_trade_tax: f64,
    /// Customs on import value.
    pub import_tax: f64,
    /// Customs on export value.
    pub export_tax: f64,
    /// Transit fee per bulk-distance unit, shared by pass-through provinces.
    pub transit_fee: f64,
    /// Daily administration cost per inhabitant.
    pub admin_base: f64,
    /// Daily infrastructure upkeep per inhabitant per infra point.
    pub admin_infra: f64,
    /// Daily building oversight cost per inhabitant per unit of building load.
    pub admin_building: f64,
}

impl Default for FiscalConfig {
    fn default() -> Self {
        Self {
            internal_trade_tax: 0.03,
            import_tax: 0.05,
            export_tax: 0.02,
            transit_fee: 0.004,
            admin_base: 0.000_02,
            admin_infra: 0.000_01,
            admin_building: 0.000_002,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.smooth_steps, 8);
        assert_eq!(config.hub_count, 6);
        assert_eq!(config.seller_candidates, 70);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            SimConfig::from_json_str(r#"{"trade_friction": 0.4, "fiscal": {"import_tax": 0.1}}"#)
                .unwrap();
        assert_eq!(config.trade_friction, 0.4);
        assert_eq!(config.fiscal.import_tax, 0.1);
        assert_eq!(config.fiscal.export_tax, FiscalConfig::default().export_tax);
        assert_eq!(config.transport_unit_cost, 0.02);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = SimConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_hub_count_floor() {
        let config = SimConfig {
            hub_count: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_hub_count(), 2);
    }
}

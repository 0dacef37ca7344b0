//! Scenario tests for the daily tick.
use crate::catalog::{Catalog, Commodity, Tier};
use crate::config::SimConfig;
use crate::engine::EconomyEngine;
use crate::graph::UNREACHABLE_GATE;
use crate::overrides::ScenarioOverrides;
use crate::systems::pricing::price_bounds;
use crate::systems::world_market::parity;
use crate::testing::TopologyBuilder;
use crate::topology::ProvinceNode;
use proptest::prelude::*;

fn ring(terrains: &[&str]) -> Vec<ProvinceNode> {
    let n = terrains.len() as u32;
    let mut b = TopologyBuilder::new();
    for (i, terrain) in terrains.iter().enumerate() {
        let angle = i as f64 / n as f64 * std::f64::consts::TAU;
        b = b.province(i as u32 + 1, terrain, (angle.cos() * 3.0, angle.sin() * 3.0));
    }
    for pid in 1..=n {
        b = b.border(pid, pid % n + 1, 1 + pid % 3);
    }
    b.build()
}

fn assert_invariants(engine: &EconomyEngine) {
    let catalog = engine.catalog();
    for (idx, p) in engine.provinces().iter().enumerate() {
        assert!(p.transport_used <= p.transport_cap + 1e-9, "province {}", p.pid);
        assert!(p.world_transport_used <= p.world_transport_cap + 1e-9, "province {}", p.pid);
        assert!(p.treasury >= 0.0);
        let gate = if engine.graph().has_gate(idx) {
            engine.graph().gate_distance(idx)
        } else {
            UNREACHABLE_GATE
        };
        for c in catalog.ids() {
            let i = c.index();
            assert!(p.stock[i].is_finite() && p.stock[i] >= 0.0, "stock {} in {}", i, p.pid);
            assert!(p.price[i].is_finite() && p.price[i] > 0.0, "price {} in {}", i, p.pid);
            assert!(p.target[i] >= 0.0 && p.raw_potential[i] >= 0.0);
            assert!((p.reserve[i] - p.target[i] * 0.55).abs() < 1e-9);

            let commodity = catalog.commodity(c);
            let world = parity(commodity, gate, p.infra, engine.config());
            let (lo, hi) = price_bounds(commodity, world);
            assert!(p.price[i] >= lo - 1e-9 && p.price[i] <= hi + 1e-9);
        }
        for b in &p.buildings {
            assert!((0.25..=1.15).contains(&b.efficiency));
        }
    }
}

#[test]
fn test_tick_advances_day_and_metrics() {
    let nodes = ring(&["city", "plains", "forest", "hills"]);
    let mut engine =
        EconomyEngine::new(&nodes, Catalog::standard(), SimConfig::default(), 3).unwrap();
    engine.tick();
    engine.tick();
    assert_eq!(engine.day(), 2);
    assert_eq!(engine.metrics().total_ticks, 2);
    assert_eq!(engine.world_stats().days(), 2);
    assert_invariants(&engine);
}

/// Forest province with a sawmill next to a plains province without one.
///
/// Restock and world trade are switched off so wood_processed can only come
/// from the sawmill.
fn sawmill_pair(with_sawmill: bool) -> EconomyEngine {
    let nodes = TopologyBuilder::new()
        .province(1, "forest", (0.0, 0.0))
        .province(2, "plains", (1.0, 0.0))
        .border(1, 2, 2)
        .build();
    let mut overrides = ScenarioOverrides::new()
        .without_seeded_buildings()
        .population(1, 20_000)
        .population(2, 20_000)
        .potential(1, "wood", 30.0)
        .potential(2, "wood", 0.0);
    if with_sawmill {
        overrides = overrides.building(1, "sawmill", 1);
    }
    let mut config = SimConfig::default();
    config.restock_budget = 0.0;
    config.world.capacity_scale = 0.0;
    EconomyEngine::with_overrides(&nodes, Catalog::standard(), config, 12, &overrides).unwrap()
}

#[test]
fn test_two_province_sawmill_supplies_neighbor() {
    let mut engine = sawmill_pair(true);
    let planks = engine.catalog().commodity_id("wood_processed").unwrap().index();
    let b = engine.index_of(2).unwrap();
    assert_eq!(engine.provinces()[b].stock[planks], 0.0);
    assert!(engine.provinces()[b].target[planks] > 0.0);
    assert!(engine.provinces()[b].buildings.is_empty());

    let mut both_shipped = false;
    for _ in 0..12 {
        engine.tick();
        let p = engine.provinces();
        both_shipped |= p[0].transport_used > 0.0 && p[1].transport_used > 0.0;
        assert_invariants(&engine);
    }
    let balance = engine
        .global_trade_balance()
        .into_iter()
        .find(|b| b.commodity == "wood_processed")
        .unwrap();
    assert!(balance.produced > 0.0);
    assert_eq!(balance.imported, 0.0);
    assert!(engine.provinces()[b].stock[planks] > 0.0);
    assert!(engine.province_summary(1).unwrap().trade_tax > 0.0);
    assert!(both_shipped);
}

#[test]
fn test_neighbor_without_supplier_stays_empty() {
    let mut engine = sawmill_pair(false);
    let planks = engine.catalog().commodity_id("wood_processed").unwrap().index();
    engine.run(12);
    assert!(engine.provinces().iter().all(|p| p.stock[planks] == 0.0));
}

#[test]
fn test_identical_isolated_provinces_are_connected() {
    let nodes = TopologyBuilder::new()
        .province(1, "plains", (0.0, 0.0))
        .province(2, "plains", (0.0, 0.0))
        .province(3, "plains", (0.0, 0.0))
        .build();
    let engine = EconomyEngine::new(&nodes, Catalog::standard(), SimConfig::default(), 0).unwrap();
    for a in 1..=3 {
        for b in 1..=3 {
            if a != b {
                let d = engine.dist(a, b).unwrap();
                assert!(d.is_finite() && d > 0.0, "{a}->{b}: {d}");
            }
        }
    }
}

#[test]
fn test_untargeted_commodity_is_exported_never_imported() {
    let mut doc = Catalog::standard().to_document();
    // First in catalog order so its export claims world capacity first
    doc.commodities
        .insert(0, Commodity::new("curios", Tier::Product, "box", 5.0, 0.2, 0.0, 0.9));
    let catalog = Catalog::from_document(doc).unwrap();

    let nodes = ring(&["city", "plains", "hills"]);
    let mut overrides = ScenarioOverrides::new()
        .without_seeded_buildings()
        .population(2, 0)
        .stock(2, "curios", 20.0);
    for c in catalog.harvestable() {
        overrides = overrides.potential(2, &catalog.commodity(c).id, 0.0);
    }
    let mut engine =
        EconomyEngine::with_overrides(&nodes, catalog, SimConfig::default(), 8, &overrides)
            .unwrap();
    let curios = engine.catalog().commodity_id("curios").unwrap().index();
    assert!(engine.provinces().iter().all(|p| p.target[curios] == 0.0));

    engine.run(5);
    let balance = engine
        .global_trade_balance()
        .into_iter()
        .find(|b| b.commodity == "curios")
        .unwrap();
    assert_eq!(balance.imported, 0.0);
    assert!(balance.exported > 0.0);
    assert!(engine.provinces()[1].stock[curios] < 20.0);
    assert!(engine.provinces().iter().all(|p| p.target[curios] == 0.0));
}

#[test]
fn test_same_seed_same_snapshot() {
    let nodes = ring(&["city", "farmland", "forest", "mountain", "coast", "urban plains"]);
    let build = |seed| {
        EconomyEngine::new(&nodes, Catalog::standard(), SimConfig::default(), seed).unwrap()
    };

    let mut a = build(2024);
    let mut b = build(2024);
    assert_eq!(a.export_snapshot().to_json().unwrap(), b.export_snapshot().to_json().unwrap());

    a.run(10);
    b.run(10);
    assert_eq!(a.export_snapshot().to_json().unwrap(), b.export_snapshot().to_json().unwrap());

    let c = build(2025);
    assert_ne!(
        build(2024).export_snapshot().to_json().unwrap(),
        c.export_snapshot().to_json().unwrap()
    );
}

#[test]
fn test_trailing_window_caps_at_one_year() {
    let nodes = ring(&["city", "plains", "forest"]);
    let mut engine =
        EconomyEngine::new(&nodes, Catalog::standard(), SimConfig::default(), 1).unwrap();
    engine.run(370);
    assert_eq!(engine.world_stats().days(), 365);
    assert_eq!(engine.province_summary(1).unwrap().days, 365);
    assert_invariants(&engine);
}

#[test]
fn test_config_changes_world_prices() {
    let nodes = ring(&["city", "plains", "forest"]);
    let config = SimConfig::from_json_str(r#"{"world": {"import_markup": 1.0}}"#).unwrap();
    let mut engine = EconomyEngine::new(&nodes, Catalog::standard(), config, 4).unwrap();
    assert_eq!(engine.config().world.import_markup, 1.0);
    engine.run(3);
    assert_invariants(&engine);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_tick_preserves_invariants(seed in any::<u64>(), days in 1u32..8) {
        let nodes = ring(&["city", "plains", "forest", "hills", "desert"]);
        let mut engine =
            EconomyEngine::new(&nodes, Catalog::standard(), SimConfig::default(), seed).unwrap();
        for _ in 0..days {
            engine.tick();
            assert_invariants(&engine);
        }
        prop_assert_eq!(engine.day(), days);
    }
}

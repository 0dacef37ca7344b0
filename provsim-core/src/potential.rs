//! Raw-material potential fields.
//!
//! One scalar field per harvestable commodity: seeded from a terrain-biased
//! normal draw, diffused over the graph, then rescaled to a rarity-derived
//! mean. Computed once at construction.

use crate::catalog::{Catalog, CommodityId};
use crate::graph::TradeGraph;
use crate::rng::SimRng;
use crate::topology::ProvinceNode;
use tracing::instrument;

/// Weight of a node's own value in one smoothing round.
const SELF_WEIGHT: f64 = 2.2;
const SEED_SPREAD: f64 = 0.6;
const FLOOR_SHARE: f64 = 0.12;

/// Target mean potential for a commodity of the given rarity.
pub fn target_mean(rarity: f64) -> f64 {
    (40.0 * (1.0 - rarity)).clamp(0.02, 30.0)
}

/// One diffusion round: `(2.2 × self + Σ neighbors) / (2.2 + degree)`.
pub fn smooth(field: &[f64], graph: &TradeGraph) -> Vec<f64> {
    (0..field.len())
        .map(|i| {
            let (sum, degree) = graph
                .neighbors(i)
                .fold((0.0, 0usize), |(s, d), j| (s + field[j], d + 1));
            (SELF_WEIGHT * field[i] + sum) / (SELF_WEIGHT + degree as f64)
        })
        .collect()
}

/// Rescale so the mean equals `mean`, then floor every entry at `mean × 0.12`.
pub fn rescale(field: &mut [f64], mean: f64) {
    if field.is_empty() {
        return;
    }
    let current = field.iter().sum::<f64>() / field.len() as f64;
    if current > 0.0 && current.is_finite() {
        let factor = mean / current;
        field.iter_mut().for_each(|v| *v *= factor);
    } else {
        field.iter_mut().for_each(|v| *v = mean);
    }
    let floor = mean * FLOOR_SHARE;
    field.iter_mut().for_each(|v| *v = v.max(floor));
}

/// Potential table indexed `[province][commodity]`.
///
/// Non-harvestable commodities stay at zero.
#[instrument(skip_all, name = "potentials")]
pub fn generate(
    nodes: &[ProvinceNode],
    graph: &TradeGraph,
    catalog: &Catalog,
    smooth_steps: u32,
    seed: u64,
) -> Vec<Vec<f64>> {
    let mut table = vec![vec![0.0; catalog.len()]; nodes.len()];
    for id in catalog.harvestable().collect::<Vec<CommodityId>>() {
        let commodity = catalog.commodity(id);
        let mut rng = SimRng::derive(seed, 0x1000 + id.0 as u64);

        let mut field: Vec<f64> = nodes
            .iter()
            .map(|node| {
                let bias = commodity.terrain_bias(&node.terrain);
                rng.gaussian(1.0 + bias, SEED_SPREAD).max(0.0)
            })
            .collect();

        for _ in 0..smooth_steps {
            field = smooth(&field, graph);
        }
        rescale(&mut field, target_mean(commodity.rarity));

        for (row, value) in table.iter_mut().zip(field) {
            row[id.index()] = value;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TopologyBuilder;
    use rustc_hash::FxHashMap;

    fn graph_for(nodes: &[ProvinceNode]) -> TradeGraph {
        let index: FxHashMap<u32, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.pid, i)).collect();
        TradeGraph::build(nodes, &index)
    }

    #[test]
    fn test_target_mean_bounds() {
        assert_eq!(target_mean(0.0), 30.0);
        assert_eq!(target_mean(1.0), 0.02);
        assert!((target_mean(0.5) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_rescale_hits_mean_and_floor() {
        let mut field = vec![0.0, 1.0, 3.0];
        rescale(&mut field, 4.0);
        // [0, 3, 9] before floor, floor = 0.48
        assert_eq!(field[0], 0.48);
        assert!((field[1] - 3.0).abs() < 1e-12);
        assert!((field[2] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_rescale_all_zero_field() {
        let mut field = vec![0.0; 4];
        rescale(&mut field, 2.0);
        assert!(field.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_smoothing_pulls_toward_neighbors() {
        let nodes = TopologyBuilder::new()
            .province(1, "plains", (0.0, 0.0))
            .province(2, "plains", (1.0, 0.0))
            .province(3, "plains", (2.0, 0.0))
            .border(1, 2, 1)
            .border(2, 3, 1)
            .border(1, 3, 1)
            .build();
        let graph = graph_for(&nodes);
        let smoothed = smooth(&[10.0, 0.0, 0.0], &graph);
        // (2.2 * 10) / 4.2
        assert!((smoothed[0] - 22.0 / 4.2).abs() < 1e-12);
        assert!((smoothed[1] - 10.0 / 4.2).abs() < 1e-12);
        let total_before = 10.0;
        let total_after: f64 = smoothed.iter().sum();
        assert!(total_after < total_before + 1e-9);
    }

    #[test]
    fn test_generation_is_deterministic_and_terrain_biased() {
        let mut builder = TopologyBuilder::new();
        for pid in 1..=12u32 {
            let terrain = if pid <= 6 { "forest" } else { "desert" };
            builder = builder.province(pid, terrain, (pid as f64, 0.0));
            if pid > 1 {
                builder = builder.border(pid - 1, pid, 1);
            }
        }
        let nodes = builder.build();
        let graph = graph_for(&nodes);
        let catalog = Catalog::standard();

        let a = generate(&nodes, &graph, &catalog, 2, 11);
        let b = generate(&nodes, &graph, &catalog, 2, 11);
        assert_eq!(a, b);

        let wood = catalog.commodity_id("wood").unwrap().index();
        let forest: f64 = a[..6].iter().map(|row| row[wood]).sum();
        let desert: f64 = a[6..].iter().map(|row| row[wood]).sum();
        assert!(forest > desert);

        let mean = a.iter().map(|row| row[wood]).sum::<f64>() / 12.0;
        assert!(mean >= target_mean(catalog.commodity(CommodityId(wood as u16)).rarity) - 1e-9);

        let bread = catalog.commodity_id("bread").unwrap().index();
        assert!(a.iter().all(|row| row[bread] == 0.0));
    }
}

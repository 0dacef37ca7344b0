//! Desired stock levels per province and commodity.
//!
//! `target = population buffer + building input/output buffers + upkeep
//! buffer + potential export buffer`, and `reserve = target × 0.55`.

use super::TickContext;
use crate::catalog::{Catalog, Commodity};
use crate::defines::stock;
use crate::state::ProvinceState;
use tracing::instrument;

/// Daily population need for one commodity.
#[inline]
pub fn pop_need(province: &ProvinceState, commodity: &Commodity) -> f64 {
    province.pop as f64 / 1000.0 * commodity.per_capita
}

/// Recompute `target` and `reserve` for one province.
pub fn recompute_targets(province: &mut ProvinceState, catalog: &Catalog) {
    let mut target = vec![0.0; catalog.len()];

    for id in catalog.ids() {
        let i = id.index();
        target[i] = pop_need(province, catalog.commodity(id)) * stock::POP_BUFFER_DAYS
            + province.raw_potential[i] * stock::POTENTIAL_BUFFER_DAYS;
    }

    for b in &province.buildings {
        let recipe = catalog.recipe(b.recipe);
        let count = b.count as f64;
        let planned = count * stock::PLANNING_UTILIZATION * recipe.cap.min(1.0);
        for &(c, qty) in &recipe.input {
            target[c.index()] += qty * planned * stock::INPUT_BUFFER_DAYS;
        }
        for &(c, qty) in &recipe.output {
            target[c.index()] += qty * planned * stock::OUTPUT_BUFFER_DAYS;
        }
        for &(c, qty) in &recipe.upkeep {
            target[c.index()] += qty * count * stock::UPKEEP_BUFFER_DAYS;
        }
    }

    for (i, t) in target.into_iter().enumerate() {
        let t = crate::sanitize(t);
        province.target[i] = t;
        province.reserve[i] = t * stock::RESERVE_SHARE;
    }
}

#[instrument(skip_all, name = "targets")]
pub fn run_targets_tick(provinces: &mut [ProvinceState], ctx: &TickContext) {
    for province in provinces.iter_mut() {
        recompute_targets(province, ctx.catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecipeId;

    fn province(catalog: &Catalog) -> ProvinceState {
        ProvinceState::new(1, "Test", "plains", catalog.len())
    }

    #[test]
    fn test_population_drives_staple_targets() {
        let catalog = Catalog::standard();
        let mut p = province(&catalog);
        p.pop = 10_000;
        recompute_targets(&mut p, &catalog);

        let bread = catalog.commodity_id("bread").unwrap();
        // 10 × 0.8 × 6 days
        assert!((p.target[bread.index()] - 48.0).abs() < 1e-9);
        assert!((p.reserve[bread.index()] - 48.0 * 0.55).abs() < 1e-9);

        let steel = catalog.commodity_id("steel").unwrap();
        assert_eq!(p.target[steel.index()], 0.0);
    }

    #[test]
    fn test_buildings_add_input_and_output_buffers() {
        let catalog = Catalog::standard();
        let mut p = province(&catalog);
        let sawmill: RecipeId = catalog.recipe_id("sawmill").unwrap();
        p.add_building(sawmill, 2, 1.0);
        recompute_targets(&mut p, &catalog);

        let wood = catalog.commodity_id("wood").unwrap();
        let planks = catalog.commodity_id("wood_processed").unwrap();
        let tools = catalog.commodity_id("tools").unwrap();
        assert!((p.target[wood.index()] - 10.0 * 2.0 * 0.75 * 4.0).abs() < 1e-9);
        assert!((p.target[planks.index()] - 8.0 * 2.0 * 0.75 * 1.5).abs() < 1e-9);
        assert!((p.target[tools.index()] - 0.02 * 2.0 * 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_potential_adds_export_buffer() {
        let catalog = Catalog::standard();
        let mut p = province(&catalog);
        let stone = catalog.commodity_id("stone").unwrap();
        p.raw_potential[stone.index()] = 12.0;
        recompute_targets(&mut p, &catalog);
        assert_eq!(p.target[stone.index()], 12.0);
    }

    #[test]
    fn test_empty_province_has_zero_targets() {
        let catalog = Catalog::standard();
        let mut p = province(&catalog);
        recompute_targets(&mut p, &catalog);
        assert!(p.target.iter().all(|&t| t == 0.0));
        assert!(p.reserve.iter().all(|&r| r == 0.0));
    }
}

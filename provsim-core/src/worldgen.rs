//! Seeded initial province state: demography, logistics capacity, buildings
//! and opening stock.
//!
//! All randomness comes from [`SimRng`] streams derived from the engine seed.

use crate::catalog::{Catalog, CommodityId, RecipeId};
use crate::defines::{demography, fiscal, logistics, stock};
use crate::rng::SimRng;
use crate::state::ProvinceState;
use crate::systems::targets::pop_need;

pub const DEMOGRAPHY_STREAM: u64 = 1;
pub const BUILDING_STREAM: u64 = 2;

const TERRAIN_MULTIPLIERS: &[(&str, f64)] = &[
    ("farmland", 1.4),
    ("plain", 1.2),
    ("river", 1.15),
    ("coast", 1.1),
    ("grassland", 1.0),
    ("forest", 0.7),
    ("hill", 0.8),
    ("mountain", 0.45),
    ("desert", 0.3),
    ("marsh", 0.5),
    ("taiga", 0.5),
    ("jungle", 0.6),
];

const COVERAGE_EFFICIENCY: f64 = 0.9;

/// Population density multiplier for a terrain label; first keyword wins.
pub fn terrain_multiplier(terrain: &str) -> f64 {
    let terrain = terrain.to_ascii_lowercase();
    TERRAIN_MULTIPLIERS
        .iter()
        .find(|(k, _)| terrain.contains(k))
        .map_or(1.0, |&(_, m)| m)
}

pub fn seed_population(area: f64, terrain: &str, is_city: bool, rng: &mut SimRng) -> u64 {
    let noise = (demography::NOISE_SD * rng.normal()).exp().clamp(0.5, 1.8);
    let city = if is_city { demography::CITY_BONUS } else { 1.0 };
    let density = demography::DENSITY * terrain_multiplier(terrain);
    let pop = crate::sanitize(area) * density * city * noise;
    pop.round() as u64
}

pub fn seed_infra(is_city: bool, rng: &mut SimRng) -> f64 {
    let base = if is_city {
        demography::INFRA_CITY
    } else {
        demography::INFRA_RURAL
    };
    rng.gaussian(base, demography::INFRA_SD)
        .clamp(demography::INFRA_MIN, demography::INFRA_MAX)
}

/// Daily internal and world logistics capacity.
pub fn transport_caps(pop: u64, infra: f64, is_city: bool, is_hub: bool) -> (f64, f64) {
    let thousands = pop as f64 / 1000.0;
    let city = if is_city {
        logistics::CITY_TRANSPORT_BONUS
    } else {
        1.0
    };
    let hub = if is_hub { logistics::HUB_WORLD_BONUS } else { 1.0 };
    let internal = (logistics::TRANSPORT_BASE + thousands * logistics::TRANSPORT_PER_THOUSAND)
        * infra
        * city;
    let world = (logistics::WORLD_BASE + thousands * logistics::WORLD_PER_THOUSAND) * infra * hub;
    (internal, world)
}

/// Mean potential of each commodity across all provinces.
pub fn world_means(potentials: &[Vec<f64>], commodities: usize) -> Vec<f64> {
    let n = potentials.len().max(1) as f64;
    (0..commodities)
        .map(|c| potentials.iter().map(|row| row[c]).sum::<f64>() / n)
        .collect()
}

fn terrain_matches(keywords: &[String], terrain: &str) -> Option<bool> {
    if keywords.is_empty() {
        return None;
    }
    let terrain = terrain.to_ascii_lowercase();
    Some(keywords.iter().any(|k| terrain.contains(&k.to_ascii_lowercase())))
}

fn potential_ok(p: &ProvinceState, required: Option<CommodityId>, means: &[f64]) -> bool {
    required.map_or(true, |c| {
        p.raw_potential[c.index()] > means[c.index()] * demography::POTENTIAL_THRESHOLD
    })
}

/// Probabilistic building placement from placement rules.
pub fn seed_buildings(
    provinces: &mut [ProvinceState],
    catalog: &Catalog,
    means: &[f64],
    rng: &mut SimRng,
) {
    for p in provinces.iter_mut() {
        for (i, def) in catalog.recipe_definitions().iter().enumerate() {
            let rid = RecipeId(i as u16);
            let placement = &def.placement;
            if placement.city_only && !p.is_city {
                continue;
            }
            if !potential_ok(p, catalog.recipe(rid).requires_potential, means) {
                continue;
            }
            let fit = match terrain_matches(&placement.terrain, &p.terrain) {
                Some(true) => 1.6,
                Some(false) => 0.35,
                None => 1.0,
            };
            let chance = (placement.base_chance * fit).min(0.95);
            if !rng.chance(chance) {
                continue;
            }
            let per_instance = def.pop_per_instance.max(1.0);
            let count = (1 + (p.pop as f64 / per_instance).floor() as u32)
                .min(demography::MAX_BUILDING_COUNT);
            let efficiency = 0.85 + 0.15 * rng.uniform();
            p.add_building(rid, count, efficiency);
        }
    }
}

/// Make sure every critical recipe has at least one instance at a hub.
///
/// Returns the number of buildings added.
pub fn ensure_hub_coverage(
    provinces: &mut [ProvinceState],
    hubs: &[usize],
    catalog: &Catalog,
    means: &[f64],
) -> usize {
    if hubs.is_empty() {
        return 0;
    }
    let mut added = 0;
    for (i, def) in catalog.recipe_definitions().iter().enumerate() {
        let rid = RecipeId(i as u16);
        if !def.placement.critical || hubs.iter().any(|&h| provinces[h].has_building(rid)) {
            continue;
        }
        let required = catalog.recipe(rid).requires_potential;
        let score = |h: usize| {
            let p = &provinces[h];
            let potential = required.map_or(0.0, |c| {
                p.raw_potential[c.index()] / means[c.index()].max(1e-9)
            });
            let terrain = match terrain_matches(&def.placement.terrain, &p.terrain) {
                Some(true) => 1.0,
                _ => 0.0,
            };
            (potential + terrain, p.pop)
        };
        let best = hubs.iter().copied().fold(hubs[0], |best, h| {
            let (sb, pb) = score(best);
            let (sh, ph) = score(h);
            if sh > sb || (sh == sb && ph > pb) {
                h
            } else {
                best
            }
        });
        provinces[best].add_building(rid, 1, COVERAGE_EFFICIENCY);
        log::debug!("coverage: {} placed at hub {}", def.id, provinces[best].pid);
        added += 1;
    }
    added
}

/// A few days of staples everywhere, small raw buffers at hubs, base prices
/// and a population-scaled treasury.
pub fn seed_opening_stock(p: &mut ProvinceState, catalog: &Catalog) {
    for (price, c) in p.price.iter_mut().zip(catalog.commodities()) {
        *price = c.base_price;
    }
    for &c in catalog.essential() {
        let qty = pop_need(p, catalog.commodity(c)) * stock::INITIAL_STAPLE_DAYS;
        p.put(c, qty);
    }
    if p.is_hub {
        for c in catalog.harvestable() {
            p.put(c, stock::HUB_RAW_BUFFER);
        }
    }
    p.treasury = p.pop as f64 * fiscal::INITIAL_TREASURY_PER_CAPITA;
}

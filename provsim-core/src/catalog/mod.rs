//! Static commodity and building-recipe tables.
//!
//! The catalog is resolved once: commodity names become [`CommodityId`]
//! indices and every recipe is flattened into index/quantity vectors. After
//! that the engine only reads it.

mod standard;

use crate::error::CatalogError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a commodity in the catalog (and in every per-commodity vector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommodityId(pub u16);

impl CommodityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a recipe in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u16);

impl RecipeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Raw,
    Component,
    Product,
    Animal,
}

/// Potential bias applied when a province's terrain label contains `keyword`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainBias {
    pub keyword: String,
    pub bias: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: String,
    pub tier: Tier,
    pub unit: String,
    pub base_price: f64,
    /// Logistics weight per unit.
    pub bulk: f64,
    pub decay_per_day: f64,
    pub rarity: f64,
    #[serde(default)]
    pub harvestable: bool,
    /// Staples that override profitability gating when short.
    #[serde(default)]
    pub essential: bool,
    /// Daily need per 1000 inhabitants.
    #[serde(default)]
    pub per_capita: f64,
    #[serde(default)]
    pub terrain_affinity: Vec<TerrainBias>,
}

impl Commodity {
    pub fn new(
        id: &str,
        tier: Tier,
        unit: &str,
        base_price: f64,
        bulk: f64,
        decay_per_day: f64,
        rarity: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            tier,
            unit: unit.to_string(),
            base_price,
            bulk,
            decay_per_day,
            rarity,
            harvestable: false,
            essential: false,
            per_capita: 0.0,
            terrain_affinity: Vec::new(),
        }
    }

    pub fn harvestable(mut self) -> Self {
        self.harvestable = true;
        self
    }

    pub fn essential(mut self) -> Self {
        self.essential = true;
        self
    }

    pub fn per_capita(mut self, per_thousand: f64) -> Self {
        self.per_capita = per_thousand;
        self
    }

    pub fn affinity(mut self, biases: &[(&str, f64)]) -> Self {
        self.terrain_affinity = biases
            .iter()
            .map(|&(keyword, bias)| TerrainBias {
                keyword: keyword.to_string(),
                bias,
            })
            .collect();
        self
    }

    /// Sum of biases whose keyword appears in `terrain` (case-insensitive).
    pub fn terrain_bias(&self, terrain: &str) -> f64 {
        let terrain = terrain.to_ascii_lowercase();
        self.terrain_affinity
            .iter()
            .filter(|b| terrain.contains(&b.keyword.to_ascii_lowercase()))
            .map(|b| b.bias)
            .sum()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason| CatalogError::InvalidCommodity {
            id: self.id.clone(),
            reason,
        };
        if !(self.base_price.is_finite() && self.base_price > 0.0) {
            return Err(invalid("base price must be positive"));
        }
        if !(self.bulk.is_finite() && self.bulk >= 0.0) {
            return Err(invalid("bulk must be non-negative"));
        }
        if !(0.0..1.0).contains(&self.decay_per_day) {
            return Err(invalid("decay per day must be in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.rarity) {
            return Err(invalid("rarity must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Production evaluation order, earliest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Primary,
    Metal,
    Chemical,
    Electronics,
    Assembly,
    Other,
}

/// Where construction may seed a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub base_chance: f64,
    /// Terrain keywords that double the chance. Empty means terrain-neutral.
    pub terrain: Vec<String>,
    /// Raw commodity whose potential must beat the world mean by 10%.
    pub requires_potential: Option<String>,
    pub city_only: bool,
    /// Coverage pass guarantees one instance among the hubs.
    pub critical: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            base_chance: 0.3,
            terrain: Vec::new(),
            requires_potential: None,
            city_only: false,
            critical: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecipe {
    pub id: String,
    pub sector: Sector,
    /// Workforce per instance at full utilization.
    pub labor: f64,
    /// Utilization multiplier.
    pub cap: f64,
    /// Daily inputs at 100% utilization.
    pub input: BTreeMap<String, f64>,
    /// Daily outputs at 100% utilization.
    pub output: BTreeMap<String, f64>,
    #[serde(default)]
    pub upkeep: BTreeMap<String, f64>,
    #[serde(default)]
    pub placement: Placement,
    /// Inhabitants per additional seeded instance.
    #[serde(default = "default_pop_per_instance")]
    pub pop_per_instance: f64,
}

fn default_pop_per_instance() -> f64 {
    40_000.0
}

fn quantity_map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

impl BuildingRecipe {
    pub fn new(id: &str, sector: Sector, labor: f64) -> Self {
        Self {
            id: id.to_string(),
            sector,
            labor,
            cap: 1.0,
            input: BTreeMap::new(),
            output: BTreeMap::new(),
            upkeep: BTreeMap::new(),
            placement: Placement::default(),
            pop_per_instance: default_pop_per_instance(),
        }
    }

    pub fn cap(mut self, cap: f64) -> Self {
        self.cap = cap;
        self
    }

    pub fn input(mut self, entries: &[(&str, f64)]) -> Self {
        self.input = quantity_map(entries);
        self
    }

    pub fn output(mut self, entries: &[(&str, f64)]) -> Self {
        self.output = quantity_map(entries);
        self
    }

    pub fn upkeep(mut self, entries: &[(&str, f64)]) -> Self {
        self.upkeep = quantity_map(entries);
        self
    }

    pub fn placed(mut self, base_chance: f64, terrain: &[&str]) -> Self {
        self.placement.base_chance = base_chance;
        self.placement.terrain = terrain.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn requires(mut self, commodity: &str) -> Self {
        self.placement.requires_potential = Some(commodity.to_string());
        self
    }

    pub fn city_only(mut self) -> Self {
        self.placement.city_only = true;
        self
    }

    pub fn critical(mut self) -> Self {
        self.placement.critical = true;
        self
    }

    pub fn pop_per_instance(mut self, pop: f64) -> Self {
        self.pop_per_instance = pop;
        self
    }
}

/// Shortfall in `primary` is partly covered by drawing `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub primary: String,
    pub fallback: String,
    pub ratio: f64,
}

/// Recipe with commodity names resolved to indices.
#[derive(Debug, Clone)]
pub struct ResolvedRecipe {
    pub id: RecipeId,
    pub sector: Sector,
    pub labor: f64,
    pub cap: f64,
    pub input: Vec<(CommodityId, f64)>,
    pub output: Vec<(CommodityId, f64)>,
    pub upkeep: Vec<(CommodityId, f64)>,
    pub requires_potential: Option<CommodityId>,
}

/// Document form of a catalog, for loading custom tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub commodities: Vec<Commodity>,
    #[serde(default)]
    pub recipes: Vec<BuildingRecipe>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    commodities: Vec<Commodity>,
    recipes: Vec<BuildingRecipe>,
    resolved: Vec<ResolvedRecipe>,
    index: FxHashMap<String, CommodityId>,
    recipe_index: FxHashMap<String, RecipeId>,
    substitutions: Vec<(CommodityId, CommodityId, f64)>,
    production_order: Vec<RecipeId>,
    essential: Vec<CommodityId>,
}

impl Catalog {
    /// Resolve and validate the tables.
    ///
    /// Recipe entries and substitutions that name unknown commodities are
    /// dropped with a warning; duplicate ids are an error.
    pub fn new(
        commodities: Vec<Commodity>,
        recipes: Vec<BuildingRecipe>,
        substitutions: Vec<Substitution>,
    ) -> Result<Self, CatalogError> {
        if commodities.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut index = FxHashMap::default();
        for (i, c) in commodities.iter().enumerate() {
            c.validate()?;
            if index.insert(c.id.clone(), CommodityId(i as u16)).is_some() {
                return Err(CatalogError::DuplicateCommodity { id: c.id.clone() });
            }
        }

        let resolve = |recipe: &str, entries: &BTreeMap<String, f64>| {
            entries
                .iter()
                .filter_map(|(name, &qty)| match index.get(name) {
                    Some(&id) if qty.is_finite() && qty > 0.0 => Some((id, qty)),
                    Some(_) => None,
                    None => {
                        log::warn!("recipe {}: unknown commodity {} skipped", recipe, name);
                        None
                    }
                })
                .collect::<Vec<_>>()
        };

        let mut recipe_index = FxHashMap::default();
        let mut resolved = Vec::with_capacity(recipes.len());
        for (i, r) in recipes.iter().enumerate() {
            let id = RecipeId(i as u16);
            if recipe_index.insert(r.id.clone(), id).is_some() {
                return Err(CatalogError::DuplicateRecipe { id: r.id.clone() });
            }
            let requires_potential = r.placement.requires_potential.as_ref().and_then(|name| {
                let found = index.get(name).copied();
                if found.is_none() {
                    log::warn!("recipe {}: unknown placement commodity {}", r.id, name);
                }
                found
            });
            resolved.push(ResolvedRecipe {
                id,
                sector: r.sector,
                labor: crate::sanitize(r.labor),
                cap: crate::sanitize(r.cap),
                input: resolve(&r.id, &r.input),
                output: resolve(&r.id, &r.output),
                upkeep: resolve(&r.id, &r.upkeep),
                requires_potential,
            });
        }

        let substitutions = substitutions
            .iter()
            .filter_map(|s| match (index.get(&s.primary), index.get(&s.fallback)) {
                (Some(&p), Some(&f)) => Some((p, f, crate::sanitize(s.ratio))),
                _ => {
                    log::warn!("substitution {} -> {} skipped", s.primary, s.fallback);
                    None
                }
            })
            .collect();

        // Stable sort keeps declaration order within a sector
        let mut production_order: Vec<RecipeId> = resolved.iter().map(|r| r.id).collect();
        production_order.sort_by_key(|id| resolved[id.index()].sector);

        let essential = commodities
            .iter()
            .enumerate()
            .filter(|(_, c)| c.essential)
            .map(|(i, _)| CommodityId(i as u16))
            .collect();

        Ok(Self {
            commodities,
            recipes,
            resolved,
            index,
            recipe_index,
            substitutions,
            production_order,
            essential,
        })
    }

    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        Self::new(doc.commodities, doc.recipes, doc.substitutions)
    }

    /// The built-in commodity and recipe tables.
    pub fn standard() -> Self {
        standard::build()
    }

    /// Document form of the resolved tables; entries dropped during
    /// resolution are not included.
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            commodities: self.commodities.clone(),
            recipes: self.recipes.clone(),
            substitutions: self
                .substitutions
                .iter()
                .map(|&(p, f, ratio)| Substitution {
                    primary: self.commodity(p).id.clone(),
                    fallback: self.commodity(f).id.clone(),
                    ratio,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }

    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    pub fn commodity(&self, id: CommodityId) -> &Commodity {
        &self.commodities[id.index()]
    }

    pub fn commodity_id(&self, name: &str) -> Option<CommodityId> {
        self.index.get(name).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = CommodityId> {
        (0..self.commodities.len() as u16).map(CommodityId)
    }

    pub fn recipe_definitions(&self) -> &[BuildingRecipe] {
        &self.recipes
    }

    pub fn recipe_definition(&self, id: RecipeId) -> &BuildingRecipe {
        &self.recipes[id.index()]
    }

    pub fn recipe(&self, id: RecipeId) -> &ResolvedRecipe {
        &self.resolved[id.index()]
    }

    pub fn recipes(&self) -> &[ResolvedRecipe] {
        &self.resolved
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_index.get(name).copied()
    }

    /// Recipe ids sorted by sector (primary first).
    pub fn production_order(&self) -> &[RecipeId] {
        &self.production_order
    }

    pub fn substitutions(&self) -> &[(CommodityId, CommodityId, f64)] {
        &self.substitutions
    }

    pub fn essential(&self) -> &[CommodityId] {
        &self.essential
    }

    pub fn is_essential(&self, id: CommodityId) -> bool {
        self.commodities[id.index()].essential
    }

    pub fn harvestable(&self) -> impl Iterator<Item = CommodityId> + '_ {
        self.ids()
            .filter(|&id| self.commodity(id).harvestable && self.commodity(id).tier == Tier::Raw)
    }
}

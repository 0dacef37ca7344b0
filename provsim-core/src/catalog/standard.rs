//! Built-in commodity and recipe tables.

use super::{BuildingRecipe, Catalog, Commodity, Sector, Substitution, Tier};

fn commodities() -> Vec<Commodity> {
    use Tier::*;
    vec![
        // Raw, harvestable
        Commodity::new("grain", Raw, "t", 1.0, 1.0, 0.002, 0.1)
            .harvestable()
            .affinity(&[("plain", 0.9), ("farmland", 1.2), ("grassland", 0.6), ("river", 0.5)]),
        Commodity::new("root_vegetables", Raw, "t", 0.9, 1.0, 0.006, 0.15)
            .harvestable()
            .essential()
            .per_capita(0.35)
            .affinity(&[("plain", 0.5), ("farmland", 0.8), ("hill", 0.3)]),
        Commodity::new("fish", Raw, "t", 1.4, 0.8, 0.03, 0.35)
            .harvestable()
            .essential()
            .per_capita(0.12)
            .affinity(&[("coast", 1.5), ("sea", 1.5), ("lake", 1.0), ("river", 0.6)]),
        Commodity::new("wood", Raw, "m3", 0.8, 1.2, 0.001, 0.2)
            .harvestable()
            .affinity(&[("forest", 1.3), ("wood", 1.2), ("taiga", 1.0), ("jungle", 0.9)]),
        Commodity::new("stone", Raw, "t", 0.6, 2.0, 0.0, 0.3)
            .harvestable()
            .affinity(&[("hill", 1.0), ("mountain", 1.2)]),
        Commodity::new("clay", Raw, "t", 0.5, 1.6, 0.0, 0.25)
            .harvestable()
            .affinity(&[("river", 0.8), ("marsh", 1.0), ("plain", 0.3)]),
        Commodity::new("iron_ore", Raw, "t", 1.6, 2.2, 0.0, 0.55)
            .harvestable()
            .affinity(&[("hill", 1.0), ("mountain", 1.4)]),
        Commodity::new("copper_ore", Raw, "t", 2.2, 2.0, 0.0, 0.7)
            .harvestable()
            .affinity(&[("mountain", 1.2), ("hill", 0.6), ("desert", 0.5)]),
        Commodity::new("coal", Raw, "t", 1.1, 1.8, 0.0, 0.5)
            .harvestable()
            .affinity(&[("hill", 0.9), ("mountain", 0.8)]),
        Commodity::new("salt", Raw, "t", 1.3, 1.0, 0.0, 0.6)
            .harvestable()
            .essential()
            .per_capita(0.02)
            .affinity(&[("coast", 0.8), ("desert", 1.0), ("marsh", 0.5)]),
        Commodity::new("cotton", Raw, "bale", 1.5, 0.9, 0.001, 0.5)
            .harvestable()
            .affinity(&[("jungle", 0.8), ("plain", 0.5), ("desert", 0.3)]),
        Commodity::new("sand", Raw, "t", 0.3, 1.8, 0.0, 0.2)
            .harvestable()
            .affinity(&[("desert", 1.5), ("coast", 0.8)]),
        // Livestock
        Commodity::new("cattle", Animal, "head", 6.0, 3.0, 0.004, 0.3),
        Commodity::new("sheep", Animal, "head", 3.5, 1.5, 0.004, 0.3),
        // Components
        Commodity::new("flour", Component, "t", 1.6, 0.9, 0.003, 0.2),
        Commodity::new("wood_processed", Component, "m3", 2.4, 1.0, 0.001, 0.3).per_capita(0.05),
        Commodity::new("bricks", Component, "t", 1.4, 1.8, 0.0, 0.3).per_capita(0.02),
        Commodity::new("iron", Component, "t", 4.5, 1.6, 0.0, 0.5),
        Commodity::new("steel", Component, "t", 7.5, 1.6, 0.0, 0.6),
        Commodity::new("copper", Component, "t", 6.0, 1.4, 0.0, 0.6),
        Commodity::new("chemicals", Component, "drum", 5.0, 1.0, 0.002, 0.6),
        Commodity::new("glass", Component, "t", 3.2, 1.2, 0.0, 0.5),
        Commodity::new("wool", Component, "bale", 2.0, 0.8, 0.001, 0.4),
        Commodity::new("cloth", Component, "bolt", 3.0, 0.6, 0.001, 0.4),
        Commodity::new("circuits", Component, "box", 22.0, 0.2, 0.0, 0.8),
        // Products
        Commodity::new("bread", Product, "t", 2.2, 0.9, 0.04, 0.2)
            .essential()
            .per_capita(0.8),
        Commodity::new("meat", Product, "t", 3.5, 1.0, 0.05, 0.35)
            .essential()
            .per_capita(0.15),
        Commodity::new("clothes", Product, "crate", 6.0, 0.5, 0.0005, 0.4).per_capita(0.02),
        Commodity::new("furniture", Product, "piece", 9.0, 2.0, 0.0005, 0.45).per_capita(0.006),
        Commodity::new("tools", Product, "crate", 11.0, 1.0, 0.0002, 0.5).per_capita(0.004),
        Commodity::new("electronics", Product, "unit", 45.0, 0.3, 0.0001, 0.85).per_capita(0.001),
        Commodity::new("machinery", Product, "unit", 60.0, 3.0, 0.0001, 0.8),
    ]
}

fn recipes() -> Vec<BuildingRecipe> {
    use Sector::*;
    vec![
        BuildingRecipe::new("sawmill", Primary, 60.0)
            .input(&[("wood", 10.0)])
            .output(&[("wood_processed", 8.0)])
            .upkeep(&[("tools", 0.02)])
            .placed(0.6, &["forest", "wood", "taiga", "jungle"])
            .requires("wood")
            .critical(),
        BuildingRecipe::new("mill", Primary, 40.0)
            .input(&[("grain", 12.0)])
            .output(&[("flour", 10.0)])
            .upkeep(&[("wood_processed", 0.05)])
            .placed(0.7, &["plain", "farmland", "grassland", "river"])
            .requires("grain")
            .critical(),
        BuildingRecipe::new("ranch", Primary, 30.0)
            .input(&[("grain", 6.0)])
            .output(&[("cattle", 1.2)])
            .placed(0.4, &["grassland", "plain", "steppe", "hill"]),
        BuildingRecipe::new("sheep_farm", Primary, 25.0)
            .input(&[("grain", 2.0)])
            .output(&[("sheep", 0.8)])
            .placed(0.35, &["hill", "grassland", "steppe"]),
        BuildingRecipe::new("shearing_station", Primary, 15.0)
            .input(&[("sheep", 0.5)])
            .output(&[("wool", 1.5), ("meat", 0.4)])
            .placed(0.3, &["hill", "grassland", "steppe"]),
        BuildingRecipe::new("smelter", Metal, 80.0)
            .input(&[("iron_ore", 8.0), ("coal", 4.0)])
            .output(&[("iron", 5.0)])
            .upkeep(&[("tools", 0.03), ("bricks", 0.05)])
            .placed(0.45, &["hill", "mountain"])
            .requires("iron_ore")
            .critical(),
        BuildingRecipe::new("steelworks", Metal, 90.0)
            .cap(0.95)
            .input(&[("iron", 4.0), ("coal", 2.0)])
            .output(&[("steel", 3.0)])
            .upkeep(&[("tools", 0.04), ("bricks", 0.05)])
            .placed(0.35, &[])
            .city_only(),
        BuildingRecipe::new("copper_smelter", Metal, 70.0)
            .input(&[("copper_ore", 6.0), ("coal", 2.0)])
            .output(&[("copper", 4.0)])
            .upkeep(&[("tools", 0.03)])
            .placed(0.4, &["mountain", "hill", "desert"])
            .requires("copper_ore"),
        BuildingRecipe::new("chemical_plant", Chemical, 70.0)
            .input(&[("salt", 3.0), ("coal", 2.0)])
            .output(&[("chemicals", 3.0)])
            .upkeep(&[("tools", 0.03), ("glass", 0.02)])
            .placed(0.3, &[])
            .city_only(),
        BuildingRecipe::new("glassworks", Chemical, 45.0)
            .input(&[("sand", 6.0), ("coal", 1.0)])
            .output(&[("glass", 4.0)])
            .upkeep(&[("bricks", 0.04)])
            .placed(0.35, &["desert", "coast"])
            .requires("sand"),
        BuildingRecipe::new("circuit_fab", Electronics, 120.0)
            .cap(0.9)
            .input(&[("copper", 1.0), ("glass", 0.5), ("chemicals", 0.5)])
            .output(&[("circuits", 1.2)])
            .upkeep(&[("tools", 0.05), ("machinery", 0.005)])
            .placed(0.2, &[])
            .city_only()
            .pop_per_instance(120_000.0),
        BuildingRecipe::new("electronics_assembly", Assembly, 100.0)
            .input(&[("circuits", 1.0), ("steel", 0.2), ("glass", 0.2)])
            .output(&[("electronics", 1.0)])
            .upkeep(&[("tools", 0.04)])
            .placed(0.2, &[])
            .city_only()
            .pop_per_instance(120_000.0),
        BuildingRecipe::new("machine_works", Assembly, 110.0)
            .input(&[("steel", 3.0), ("circuits", 0.3), ("tools", 0.2)])
            .output(&[("machinery", 1.0)])
            .upkeep(&[("bricks", 0.05)])
            .placed(0.2, &[])
            .city_only()
            .pop_per_instance(120_000.0),
        BuildingRecipe::new("toolmaker", Assembly, 50.0)
            .input(&[("iron", 2.0), ("wood_processed", 1.0)])
            .output(&[("tools", 3.0)])
            .placed(0.4, &[])
            .critical(),
        BuildingRecipe::new("furniture_workshop", Assembly, 40.0)
            .input(&[("wood_processed", 4.0), ("cloth", 0.2)])
            .output(&[("furniture", 2.0)])
            .upkeep(&[("tools", 0.02)])
            .placed(0.35, &["forest", "wood"]),
        BuildingRecipe::new("brickworks", Other, 35.0)
            .input(&[("clay", 8.0), ("coal", 1.0)])
            .output(&[("bricks", 7.0)])
            .upkeep(&[("tools", 0.02)])
            .placed(0.4, &["river", "marsh", "plain"])
            .requires("clay"),
        BuildingRecipe::new("bakery", Other, 50.0)
            .input(&[("flour", 6.0), ("salt", 0.2)])
            .output(&[("bread", 9.0)])
            .upkeep(&[("wood_processed", 0.03)])
            .placed(0.9, &[])
            .critical()
            .pop_per_instance(25_000.0),
        BuildingRecipe::new("butcher", Other, 20.0)
            .input(&[("cattle", 1.0)])
            .output(&[("meat", 2.5)])
            .placed(0.6, &[])
            .critical(),
        BuildingRecipe::new("textile_mill", Other, 60.0)
            .input(&[("cotton", 4.0)])
            .output(&[("cloth", 4.0)])
            .upkeep(&[("tools", 0.03)])
            .placed(0.3, &["plain", "jungle"]),
        BuildingRecipe::new("wool_weavery", Other, 45.0)
            .input(&[("wool", 3.0)])
            .output(&[("cloth", 3.0)])
            .upkeep(&[("tools", 0.02)])
            .placed(0.3, &["hill", "grassland"]),
        BuildingRecipe::new("tailor", Other, 40.0)
            .input(&[("cloth", 3.0)])
            .output(&[("clothes", 2.0)])
            .placed(0.5, &[])
            .critical(),
    ]
}

fn substitutions() -> Vec<Substitution> {
    [
        ("bread", "root_vegetables", 0.6),
        ("meat", "fish", 0.8),
        ("fish", "meat", 0.5),
        ("clothes", "cloth", 0.5),
    ]
    .into_iter()
    .map(|(primary, fallback, ratio)| Substitution {
        primary: primary.to_string(),
        fallback: fallback.to_string(),
        ratio,
    })
    .collect()
}

pub(super) fn build() -> Catalog {
    Catalog::new(commodities(), recipes(), substitutions()).expect("built-in catalog is valid")
}

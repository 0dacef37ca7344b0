//! Static province topology handed to the engine at construction.

use serde::{Deserialize, Serialize};

pub type ProvinceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Centroid) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A declared border with another province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub pid: ProvinceId,
    /// Number of hex sides shared with that province.
    #[serde(default = "default_shared_sides")]
    pub shared_sides: u32,
}

fn default_shared_sides() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceNode {
    pub pid: ProvinceId,
    pub name: String,
    /// Free-text terrain label; keywords like "forest" or "hills" are matched.
    pub terrain: String,
    pub centroid: Centroid,
    #[serde(default)]
    pub neighbors: Vec<Neighbor>,
    /// Hex count or area size.
    pub area: f64,
    #[serde(default)]
    pub free_city: bool,
}

impl ProvinceNode {
    pub fn new(pid: ProvinceId, name: &str, terrain: &str, centroid: Centroid, area: f64) -> Self {
        Self {
            pid,
            name: name.to_string(),
            terrain: terrain.to_string(),
            centroid,
            neighbors: Vec::new(),
            area,
            free_city: false,
        }
    }

    /// Whether construction treats this province as a city.
    pub fn is_city(&self) -> bool {
        if self.free_city {
            return true;
        }
        let terrain = self.terrain.to_ascii_lowercase();
        ["city", "urban", "capital"]
            .iter()
            .any(|k| terrain.contains(k))
    }
}

use crate::topology::ProvinceId;
use thiserror::Error;

/// Rejected construction input.
///
/// Only construction can fail; a running engine never returns errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("province topology is empty")]
    EmptyTopology,
    #[error("duplicate province id {pid}")]
    DuplicateProvince { pid: ProvinceId },
    #[error("invalid province id {pid}: ids must be greater than zero")]
    InvalidProvinceId { pid: ProvinceId },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no commodities")]
    EmptyCatalog,
    #[error("duplicate commodity id {id}")]
    DuplicateCommodity { id: String },
    #[error("duplicate recipe id {id}")]
    DuplicateRecipe { id: String },
    #[error("commodity {id}: {reason}")]
    InvalidCommodity { id: String, reason: &'static str },
}

/// Asset module - in-memory model mesh description
///
/// Produced by the asset-parsing collaborator and consumed read-only by mesh
/// compilation.

pub mod mesh_asset;

pub use mesh_asset::*;

#[cfg(test)]
pub(crate) mod fixtures;

//! Resource module
//!
//! Turns a parsed `MeshAsset` into GPU-resident buffers, compiled material
//! passes and a draw-list plan.

pub mod texture_mapping;
pub mod vertex_material;
pub mod texture_loader;
pub mod binding_layout;
pub mod mesh_builder;
pub mod pipeline_state;
pub mod material_pass;
pub mod draw_list;
pub mod mesh;

pub use texture_mapping::{TextureMapping, TextureMappingType, MapperArgs};
pub use vertex_material::VertexMaterial;
pub use texture_loader::TextureLoader;
#[cfg(test)]
pub use texture_loader::MockTextureLoader;
pub use mesh_builder::{MeshBuildConfig, MeshResourceBuilder, MeshResources, MeshVertex};
pub use pipeline_state::{PipelineStateId, PipelineStateClassifier, PipelineStateCache};
pub use material_pass::{MaterialPass, MaterialPassCompiler, MeshPart, compute_mesh_parts, expand_ids};
pub use draw_list::{DrawBatchPlanner, DrawGroup, DrawList, DrawLists};
pub use mesh::Mesh;

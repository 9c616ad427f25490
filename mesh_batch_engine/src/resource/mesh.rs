//! Compiled model mesh.
//!
//! A `Mesh` owns everything needed to draw one parsed `MeshAsset`:
//!
//! ```text
//! Mesh "tank_body"
//! ├── vertex buffer, index buffer, material table (shared by all passes)
//! ├── textures → set 1 binding group
//! ├── transform uniform → set 0 binding group
//! ├── material_passes[i]
//! │   ├── tex coord buffer, set 2 binding group
//! │   └── mesh parts (index ranges + pipeline state)
//! └── draw lists: opaque [state → passes], transparent [state → passes]
//! ```
//!
//! Built once with `Mesh::from_asset`; afterwards only the transform block
//! changes (`set_transform`). Dropping the mesh releases all of it.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::asset::{BoundingSphere, MeshAsset, MeshFlags};
use crate::error::Result;
use crate::renderer::{
    Buffer, BufferUsage, BindingGroup, BindingResource, Pipeline, Renderer, Texture, SamplerType,
};
use crate::resource::binding_layout::{
    mesh_textures_layout, mesh_transform_layout, MESH_TEXTURES_SET, MESH_TRANSFORM_SET,
};
use crate::resource::mesh_builder::upload_buffer;
use crate::resource::{
    DrawBatchPlanner, DrawLists, MaterialPass, MaterialPassCompiler, MeshBuildConfig,
    MeshResourceBuilder, PipelineStateCache, PipelineStateId, TextureLoader,
};
use crate::scene::{MeshTransform, MeshTransformConstants};
use crate::{engine_bail, engine_err};

pub struct Mesh {
    name: String,
    flags: MeshFlags,
    bounding_sphere: BoundingSphere,
    skinned: bool,

    vertex_buffer: Arc<dyn Buffer>,
    vertex_count: u32,
    index_buffer: Arc<dyn Buffer>,
    index_count: u32,
    material_buffer: Arc<dyn Buffer>,
    material_count: u32,
    textures: Vec<Arc<dyn Texture>>,

    transform_buffer: Arc<dyn Buffer>,
    transform_constants: MeshTransformConstants,
    transform_binding_group: Arc<dyn BindingGroup>,
    texture_binding_group: Arc<dyn BindingGroup>,

    material_passes: Vec<MaterialPass>,
    draw_lists: DrawLists,
    pipelines: FxHashMap<PipelineStateId, Arc<dyn Pipeline>>,
}

impl Mesh {
    /// Compile `asset` into GPU resources and a draw plan
    ///
    /// Pipelines are taken from (or added to) `pipelines`, so meshes built
    /// against the same cache share them.
    ///
    /// # Errors
    ///
    /// Any validation, texture, buffer or pipeline failure; no partially
    /// built mesh is returned. `InvalidResource` if the cache was created for
    /// a different `max_textures`.
    pub fn from_asset(
        renderer: &Arc<Mutex<dyn Renderer>>,
        loader: &dyn TextureLoader,
        pipelines: &mut PipelineStateCache,
        asset: &MeshAsset,
        config: &MeshBuildConfig,
    ) -> Result<Self> {
        if pipelines.max_textures() as usize != config.max_textures {
            engine_bail!(InvalidResource, "meshbatch::Mesh",
                "Pipeline cache has {} texture slots, mesh build config {}",
                pipelines.max_textures(), config.max_textures);
        }

        let resources = MeshResourceBuilder::new(renderer, config).build(loader, asset)?;
        let skinned = asset.is_skinned();

        // Set 0: transform block, written by set_transform
        let transform_constants = MeshTransformConstants::default();
        let transform_buffer = upload_buffer(
            renderer, BufferUsage::Uniform, bytemuck::bytes_of(&transform_constants),
        )?;

        let (transform_binding_group, texture_binding_group) = {
            let mut renderer = renderer.lock()
                .map_err(|_| engine_err!("meshbatch::Mesh", "Renderer lock poisoned"))?;

            let transform_group = renderer.create_binding_group(
                &mesh_transform_layout(),
                MESH_TRANSFORM_SET,
                &[BindingResource::UniformBuffer(transform_buffer.as_ref())],
            )?;

            // Set 1: loaded textures, then null slots up to max_textures
            let mut texture_resources: Vec<BindingResource> = resources.textures
                .iter()
                .map(|texture| BindingResource::SampledTexture(texture.as_ref(), SamplerType::LinearRepeat))
                .collect();
            texture_resources.resize_with(config.max_textures, || BindingResource::NullTexture);

            let texture_group = renderer.create_binding_group(
                &mesh_textures_layout(config.max_textures as u32),
                MESH_TEXTURES_SET,
                &texture_resources,
            )?;

            (transform_group, texture_group)
        };

        let compiler = MaterialPassCompiler::new(renderer, asset, &resources.material_buffer);
        let material_passes = asset.material_passes
            .iter()
            .enumerate()
            .map(|(index, desc)| compiler.compile(index, desc))
            .collect::<Result<Vec<_>>>()?;

        let draw_lists = DrawBatchPlanner::plan(material_passes.iter().map(|pass| pass.mesh_parts()));

        let mut mesh_pipelines = FxHashMap::default();
        for list in draw_lists.iter() {
            let pipeline = pipelines.get_or_create(renderer, list.pipeline_state)?;
            mesh_pipelines.insert(list.pipeline_state, pipeline);
        }

        crate::engine_debug!("meshbatch::Mesh",
            "Mesh '{}' compiled: {} passes, {} opaque / {} transparent draw lists{}",
            asset.name, material_passes.len(), draw_lists.opaque.len(), draw_lists.transparent.len(),
            if skinned { ", skinned" } else { "" });

        Ok(Self {
            name: asset.name.clone(),
            flags: asset.flags,
            bounding_sphere: asset.bounding_sphere,
            skinned,
            vertex_buffer: resources.vertex_buffer,
            vertex_count: resources.vertex_count,
            index_buffer: resources.index_buffer,
            index_count: resources.index_count,
            material_buffer: resources.material_buffer,
            material_count: resources.material_count,
            textures: resources.textures,
            transform_buffer,
            transform_constants,
            transform_binding_group,
            texture_binding_group,
            material_passes,
            draw_lists,
            pipelines: mesh_pipelines,
        })
    }

    /// Write this frame's transform block
    ///
    /// Skinning only turns on for meshes that have bone influences.
    pub fn set_transform(&mut self, transform: &MeshTransform) -> Result<()> {
        let constants = MeshTransformConstants::new(transform, self.skinned);
        self.transform_buffer.update(0, bytemuck::bytes_of(&constants))?;
        self.transform_constants = constants;
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> MeshFlags {
        self.flags
    }

    /// Hidden meshes are skipped when drawing
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(MeshFlags::HIDDEN)
    }

    pub fn skinned(&self) -> bool {
        self.skinned
    }

    pub fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.vertex_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_buffer(&self) -> &Arc<dyn Buffer> {
        &self.index_buffer
    }

    /// Three per triangle
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn material_buffer(&self) -> &Arc<dyn Buffer> {
        &self.material_buffer
    }

    pub fn material_count(&self) -> u32 {
        self.material_count
    }

    /// Resolved textures, in asset order (slot i of set 1)
    pub fn textures(&self) -> &[Arc<dyn Texture>] {
        &self.textures
    }

    /// Last block written by `set_transform` (identity before the first call)
    pub fn transform_constants(&self) -> &MeshTransformConstants {
        &self.transform_constants
    }

    pub fn transform_binding_group(&self) -> &Arc<dyn BindingGroup> {
        &self.transform_binding_group
    }

    pub fn texture_binding_group(&self) -> &Arc<dyn BindingGroup> {
        &self.texture_binding_group
    }

    pub fn material_passes(&self) -> &[MaterialPass] {
        &self.material_passes
    }

    pub fn draw_lists(&self) -> &DrawLists {
        &self.draw_lists
    }

    /// Pipeline of a state used by this mesh
    pub fn pipeline(&self, state: &PipelineStateId) -> Option<&Arc<dyn Pipeline>> {
        self.pipelines.get(state)
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;

//! Material passes and mesh parts.
//!
//! A material pass is one shading layer over the whole mesh. Compiling a pass
//! produces its texture-coordinate vertex buffer, its set-2 binding group
//! (material table plus per-vertex material ids and per-triangle texture ids)
//! and the list of mesh parts: maximal runs of consecutive triangles drawn
//! with the same shader.

use std::sync::{Arc, Mutex};
use glam::Vec2;
use crate::asset::{MaterialPassDesc, MaterialShader, MeshAsset};
use crate::engine_bail;
use crate::error::Result;
use crate::renderer::{Buffer, BufferUsage, BindingGroup, BindingResource, Renderer};
use crate::resource::binding_layout::{material_pass_layout, MATERIAL_PASS_SET, MAX_TEXTURE_STAGES};
use crate::resource::mesh_builder::upload_buffer;
use crate::resource::{PipelineStateClassifier, PipelineStateId};

// ============================================================================
// MESH PART
// ============================================================================

/// Contiguous index range drawn with one pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPart {
    pub start_index: u32,
    pub index_count: u32,
    pub alpha_test: bool,
    pub texturing: bool,
    pub pipeline_state: PipelineStateId,
}

impl MeshPart {
    /// One past the last index of the part
    pub fn end_index(&self) -> u32 {
        self.start_index + self.index_count
    }

    /// First triangle of the part
    pub fn primitive_offset(&self) -> u32 {
        self.start_index / 3
    }
}

/// Split triangles into parts, one per maximal run of equal shader ids
///
/// `shader_ids` holds one entry per triangle and every id must index
/// `shaders` (see `expand_ids`).
pub fn compute_mesh_parts(
    shader_ids: &[u32],
    shaders: &[MaterialShader],
    texture_stage_count: u32,
) -> Vec<MeshPart> {
    let mut parts = Vec::new();
    let mut run_start = 0usize;

    for triangle in 1..=shader_ids.len() {
        let run_ends = triangle == shader_ids.len() || shader_ids[triangle] != shader_ids[run_start];
        if !run_ends {
            continue;
        }

        let shader = &shaders[shader_ids[run_start] as usize];
        parts.push(MeshPart {
            start_index: run_start as u32 * 3,
            index_count: (triangle - run_start) as u32 * 3,
            alpha_test: shader.alpha_test,
            texturing: shader.texturing,
            pipeline_state: PipelineStateClassifier::classify(shader, texture_stage_count),
        });
        run_start = triangle;
    }

    parts
}

/// Expand a shared-or-per-element id array to exactly `count` entries
///
/// # Errors
///
/// `DataIntegrity` when the array is neither one entry nor `count` entries
/// long, or an id is not below `bound`.
pub fn expand_ids(ids: &[u32], count: usize, bound: usize, what: &str) -> Result<Vec<u32>> {
    let expanded = match ids.len() {
        1 => vec![ids[0]; count],
        len if len == count => ids.to_vec(),
        len => engine_bail!(DataIntegrity, "meshbatch::MaterialPassCompiler",
            "{}: {} entries, expected 1 or {}", what, len, count),
    };

    if let Some(bad) = expanded.iter().find(|&&id| id as usize >= bound) {
        engine_bail!(DataIntegrity, "meshbatch::MaterialPassCompiler",
            "{}: id {} out of range (count {})", what, bad, bound);
    }

    Ok(expanded)
}

// ============================================================================
// MATERIAL PASS
// ============================================================================

/// Compiled material pass
pub struct MaterialPass {
    tex_coord_buffer: Arc<dyn Buffer>,
    material_id_buffer: Arc<dyn Buffer>,
    texture_id_buffers: [Arc<dyn Buffer>; 2],
    binding_group: Arc<dyn BindingGroup>,
    mesh_parts: Vec<MeshPart>,
    num_texture_stages: u32,
}

impl MaterialPass {
    /// Vertex buffer bound at `TEX_COORD_BINDING`
    pub fn tex_coord_buffer(&self) -> &Arc<dyn Buffer> {
        &self.tex_coord_buffer
    }

    /// Material table index per vertex (set 2, binding 1)
    pub fn material_id_buffer(&self) -> &Arc<dyn Buffer> {
        &self.material_id_buffer
    }

    /// Texture index per triangle of stage 0 and 1 (set 2, bindings 2 and 3)
    pub fn texture_id_buffers(&self) -> &[Arc<dyn Buffer>; 2] {
        &self.texture_id_buffers
    }

    /// Binding group bound at `MATERIAL_PASS_SET`
    pub fn binding_group(&self) -> &Arc<dyn BindingGroup> {
        &self.binding_group
    }

    pub fn mesh_parts(&self) -> &[MeshPart] {
        &self.mesh_parts
    }

    /// 1 or 2
    pub fn num_texture_stages(&self) -> u32 {
        self.num_texture_stages
    }
}

// ============================================================================
// COMPILER
// ============================================================================

/// Compiles the material passes of one mesh
pub struct MaterialPassCompiler<'a> {
    renderer: &'a Arc<Mutex<dyn Renderer>>,
    asset: &'a MeshAsset,
    material_buffer: &'a Arc<dyn Buffer>,
}

impl<'a> MaterialPassCompiler<'a> {
    pub fn new(
        renderer: &'a Arc<Mutex<dyn Renderer>>,
        asset: &'a MeshAsset,
        material_buffer: &'a Arc<dyn Buffer>,
    ) -> Self {
        Self { renderer, asset, material_buffer }
    }

    /// Compile pass `pass_index` of the asset
    ///
    /// A pass without texture stages is compiled as one stage of zero UVs
    /// sampling texture 0.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` for more than two stages, UV arrays not matching the
    /// vertex count, or malformed id arrays.
    pub fn compile(&self, pass_index: usize, desc: &MaterialPassDesc) -> Result<MaterialPass> {
        let asset = self.asset;
        let vertex_count = asset.vertices.len();
        let triangle_count = asset.triangles.len();

        if desc.texture_stages.len() > MAX_TEXTURE_STAGES as usize {
            engine_bail!(DataIntegrity, "meshbatch::MaterialPassCompiler",
                "Mesh '{}' pass {} has {} texture stages, at most {} are supported",
                asset.name, pass_index, desc.texture_stages.len(), MAX_TEXTURE_STAGES);
        }
        let num_texture_stages = desc.texture_stages.len().max(1) as u32;

        let material_ids = expand_ids(
            &desc.vertex_material_ids, vertex_count, asset.materials.len(),
            &format!("Mesh '{}' pass {} vertex material ids", asset.name, pass_index),
        )?;
        let shader_ids = expand_ids(
            &desc.shader_ids, triangle_count, asset.shaders.len(),
            &format!("Mesh '{}' pass {} shader ids", asset.name, pass_index),
        )?;

        // Texture ids per stage (the unused second slot stays zero)
        let mut texture_ids = [vec![0u32; triangle_count], vec![0u32; triangle_count]];
        let mut tex_coords: Vec<Vec2> = vec![Vec2::ZERO; vertex_count * num_texture_stages as usize];

        for (stage_index, stage) in desc.texture_stages.iter().enumerate() {
            texture_ids[stage_index] = expand_ids(
                &stage.texture_ids, triangle_count, asset.textures.len(),
                &format!("Mesh '{}' pass {} stage {} texture ids", asset.name, pass_index, stage_index),
            )?;

            if stage.tex_coords.len() != vertex_count {
                engine_bail!(DataIntegrity, "meshbatch::MaterialPassCompiler",
                    "Mesh '{}' pass {} stage {} has {} texture coordinates for {} vertices",
                    asset.name, pass_index, stage_index, stage.tex_coords.len(), vertex_count);
            }

            // Interleaved: [uv0, uv1] per vertex
            for (vertex, uv) in stage.tex_coords.iter().enumerate() {
                tex_coords[vertex * num_texture_stages as usize + stage_index] = *uv;
            }
        }

        let mesh_parts = compute_mesh_parts(&shader_ids, &asset.shaders, num_texture_stages);

        let tex_coord_buffer = upload_buffer(self.renderer, BufferUsage::Vertex, bytemuck::cast_slice(&tex_coords))?;
        let material_id_buffer = upload_buffer(self.renderer, BufferUsage::Storage, bytemuck::cast_slice(&material_ids))?;
        let texture_id_buffer0 = upload_buffer(self.renderer, BufferUsage::Storage, bytemuck::cast_slice(&texture_ids[0]))?;
        let texture_id_buffer1 = upload_buffer(self.renderer, BufferUsage::Storage, bytemuck::cast_slice(&texture_ids[1]))?;

        let binding_group = {
            let mut renderer = self.renderer.lock()
                .map_err(|_| crate::engine_err!("meshbatch::MaterialPassCompiler", "Renderer lock poisoned"))?;
            renderer.create_binding_group(
                &material_pass_layout(),
                MATERIAL_PASS_SET,
                &[
                    BindingResource::StorageBuffer(self.material_buffer.as_ref()),
                    BindingResource::StorageBuffer(material_id_buffer.as_ref()),
                    BindingResource::StorageBuffer(texture_id_buffer0.as_ref()),
                    BindingResource::StorageBuffer(texture_id_buffer1.as_ref()),
                ],
            )?
        };

        crate::engine_trace!("meshbatch::MaterialPassCompiler",
            "Mesh '{}' pass {}: {} stages, {} parts",
            asset.name, pass_index, num_texture_stages, mesh_parts.len());

        Ok(MaterialPass {
            tex_coord_buffer,
            material_id_buffer,
            texture_id_buffers: [texture_id_buffer0, texture_id_buffer1],
            binding_group,
            mesh_parts,
            num_texture_stages,
        })
    }
}

#[cfg(test)]
#[path = "material_pass_tests.rs"]
mod tests;

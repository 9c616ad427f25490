//! Conversion of a parsed mesh into GPU buffers and resolved textures.
//!
//! The builder is split into pure steps (`build_vertices`, `build_indices`,
//! `build_materials`) that validate and lay out data, and `build`, which
//! uploads the results through the renderer and resolves textures.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::asset::MeshAsset;
use crate::error::Result;
use crate::renderer::{Renderer, Buffer, BufferDesc, BufferUsage, Texture, IndexType};
use crate::resource::{TextureLoader, VertexMaterial};
use crate::{engine_bail, engine_err, engine_warn};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Mesh build configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshBuildConfig {
    /// Directory texture names are resolved against
    pub texture_directory: PathBuf,
    /// Texture slots of the mesh texture set
    pub max_textures: usize,
}

impl Default for MeshBuildConfig {
    fn default() -> Self {
        Self {
            texture_directory: PathBuf::from("Art").join("Textures"),
            max_textures: 16,
        }
    }
}

// ============================================================================
// VERTEX FORMAT
// ============================================================================

/// One vertex of the mesh vertex buffer (28 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Influence bone, 0 for unskinned meshes
    pub bone_index: u32,
}

/// Buffers and textures shared by every material pass of a mesh
pub struct MeshResources {
    pub vertex_buffer: Arc<dyn Buffer>,
    pub vertex_count: u32,
    pub index_buffer: Arc<dyn Buffer>,
    pub index_count: u32,
    pub material_buffer: Arc<dyn Buffer>,
    pub material_count: u32,
    pub textures: Vec<Arc<dyn Texture>>,
}

// ============================================================================
// UPLOAD
// ============================================================================

/// Create a buffer holding `data`
///
/// Backends reject zero-sized buffers, so empty data still gets 4 bytes.
pub(crate) fn upload_buffer(
    renderer: &Arc<Mutex<dyn Renderer>>,
    usage: BufferUsage,
    data: &[u8],
) -> Result<Arc<dyn Buffer>> {
    let buffer = {
        let mut renderer = renderer.lock()
            .map_err(|_| engine_err!("meshbatch::MeshResourceBuilder", "Renderer lock poisoned"))?;
        renderer.create_buffer(BufferDesc {
            size: (data.len() as u64).max(4),
            usage,
        })?
    };
    if !data.is_empty() {
        buffer.update(0, data)?;
    }
    Ok(buffer)
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct MeshResourceBuilder<'a> {
    renderer: &'a Arc<Mutex<dyn Renderer>>,
    config: &'a MeshBuildConfig,
}

impl<'a> MeshResourceBuilder<'a> {
    pub fn new(renderer: &'a Arc<Mutex<dyn Renderer>>, config: &'a MeshBuildConfig) -> Self {
        Self { renderer, config }
    }

    /// Vertex records, one per asset vertex, in asset order
    ///
    /// # Errors
    ///
    /// - `SizeLimit` above 65536 vertices (16-bit indices)
    /// - `DataIntegrity` when normals (or influences of a skinned mesh) don't
    ///   match the vertex count
    pub fn build_vertices(asset: &MeshAsset) -> Result<Vec<MeshVertex>> {
        let vertex_count = asset.vertices.len();

        if vertex_count as u64 > IndexType::U16.max_vertex_count() {
            engine_bail!(SizeLimit, "meshbatch::MeshResourceBuilder",
                "Mesh '{}' has {} vertices, 16-bit indices address at most {}",
                asset.name, vertex_count, IndexType::U16.max_vertex_count());
        }

        if asset.normals.len() != vertex_count {
            engine_bail!(DataIntegrity, "meshbatch::MeshResourceBuilder",
                "Mesh '{}' has {} normals for {} vertices",
                asset.name, asset.normals.len(), vertex_count);
        }

        let skinned = asset.is_skinned();
        if skinned && asset.influences.len() != vertex_count {
            engine_bail!(DataIntegrity, "meshbatch::MeshResourceBuilder",
                "Skinned mesh '{}' has {} influences for {} vertices",
                asset.name, asset.influences.len(), vertex_count);
        }

        Ok((0..vertex_count)
            .map(|i| MeshVertex {
                position: asset.vertices[i],
                normal: asset.normals[i],
                bone_index: if skinned { asset.influences[i].bone_index } else { 0 },
            })
            .collect())
    }

    /// Triangle indices flattened in order (`3 × triangles`)
    ///
    /// # Errors
    ///
    /// `DataIntegrity` if a triangle references a vertex past the end of the
    /// vertex array.
    pub fn build_indices(asset: &MeshAsset) -> Result<Vec<u16>> {
        let vertex_count = asset.vertices.len();
        let index_count = asset.triangles.len().checked_mul(3)
            .filter(|count| *count <= u32::MAX as usize)
            .ok_or_else(|| engine_err!(SizeLimit, "meshbatch::MeshResourceBuilder",
                "Mesh '{}' has too many triangles ({})", asset.name, asset.triangles.len()))?;

        let mut indices = Vec::with_capacity(index_count);
        for (triangle_index, triangle) in asset.triangles.iter().enumerate() {
            for &vertex in &triangle.indices {
                if vertex as usize >= vertex_count {
                    engine_bail!(DataIntegrity, "meshbatch::MeshResourceBuilder",
                        "Mesh '{}' triangle {} references vertex {} (vertex count {})",
                        asset.name, triangle_index, vertex, vertex_count);
                }
                indices.push(vertex as u16);
            }
        }
        Ok(indices)
    }

    /// Material table entries in input order
    pub fn build_materials(asset: &MeshAsset) -> Result<Vec<VertexMaterial>> {
        asset.materials.iter().map(VertexMaterial::from_desc).collect()
    }

    /// Load every texture named by the asset
    ///
    /// # Errors
    ///
    /// - `SizeLimit` with more textures than `max_textures` slots
    /// - `TextureNotFound` when a load fails and the loader has no placeholder
    pub fn resolve_textures(
        &self,
        loader: &dyn TextureLoader,
        asset: &MeshAsset,
    ) -> Result<Vec<Arc<dyn Texture>>> {
        if asset.textures.len() > self.config.max_textures {
            engine_bail!(SizeLimit, "meshbatch::MeshResourceBuilder",
                "Mesh '{}' uses {} textures, only {} slots are available",
                asset.name, asset.textures.len(), self.config.max_textures);
        }

        let mut textures = Vec::with_capacity(asset.textures.len());
        for texture in &asset.textures {
            let path = self.config.texture_directory.join(&texture.name);
            match loader.load(&path) {
                Ok(loaded) => textures.push(loaded),
                Err(err) => match loader.placeholder() {
                    Some(placeholder) => {
                        engine_warn!("meshbatch::MeshResourceBuilder",
                            "Texture '{}' unavailable ({}), using placeholder", path.display(), err);
                        textures.push(placeholder);
                    }
                    None => engine_bail!(TextureNotFound, "meshbatch::MeshResourceBuilder",
                        "Mesh '{}': {} ({})", asset.name, path.display(), err),
                },
            }
        }
        Ok(textures)
    }

    /// Validate, lay out and upload the shared mesh resources
    pub fn build(&self, loader: &dyn TextureLoader, asset: &MeshAsset) -> Result<MeshResources> {
        let vertices = Self::build_vertices(asset)?;
        let indices = Self::build_indices(asset)?;
        let materials = Self::build_materials(asset)?;
        let textures = self.resolve_textures(loader, asset)?;

        let vertex_buffer = upload_buffer(self.renderer, BufferUsage::Vertex, bytemuck::cast_slice(&vertices))?;
        let index_buffer = upload_buffer(self.renderer, BufferUsage::Index, bytemuck::cast_slice(&indices))?;
        let material_buffer = upload_buffer(self.renderer, BufferUsage::Storage, bytemuck::cast_slice(&materials))?;

        crate::engine_trace!("meshbatch::MeshResourceBuilder",
            "Mesh '{}': {} vertices, {} indices, {} materials, {} textures",
            asset.name, vertices.len(), indices.len(), materials.len(), textures.len());

        Ok(MeshResources {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            index_buffer,
            index_count: indices.len() as u32,
            material_buffer,
            material_count: materials.len() as u32,
            textures,
        })
    }
}

#[cfg(test)]
#[path = "mesh_builder_tests.rs"]
mod tests;

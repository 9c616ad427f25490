//! Parsed model mesh description.
//!
//! A `MeshAsset` is what the binary model reader hands over: raw geometry,
//! the material table, the shader table and one `MaterialPassDesc` per
//! shading layer. Nothing here touches the GPU.
//!
//! # Id arrays
//!
//! Per-pass id arrays (`vertex_material_ids`, `shader_ids`, `texture_ids`)
//! hold either a single entry shared by every element, or exactly one entry
//! per vertex / triangle. Mesh compilation rejects any other length.

use bitflags::bitflags;
use glam::{Vec2, Vec3};
use crate::renderer::BlendFactor;

bitflags! {
    /// Mesh header attribute flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MeshFlags: u32 {
        /// Mesh is not drawn
        const HIDDEN = 0x0000_1000;
        /// Back faces are not culled
        const TWO_SIDED = 0x0000_2000;
        /// Mesh casts shadows
        const CAST_SHADOW = 0x0000_8000;
        /// Vertices are skinned to bones through the influence array
        const GEOMETRY_TYPE_SKIN = 0x0002_0000;
    }
}

/// Sphere enclosing every vertex of the mesh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Bone influence of one vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexInfluence {
    /// Index of the bone the vertex follows
    pub bone_index: u32,
}

/// One triangle, as three indices into the vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [u32; 3],
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }
}

/// UV generation mode of one texture stage, as authored
///
/// Only `Uv`, the environment modes and `LinearOffset` are evaluated by the
/// mesh shaders; the remaining kinds are accepted and drawn as `Uv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageMapping {
    #[default]
    Uv,
    Environment,
    CheapEnvironment,
    Screen,
    LinearOffset,
    Silhouette,
    Scale,
    Grid,
    Rotate,
    Sine,
    Step,
    ZigZag,
    WsClassicEnvironment,
    WsEnvironment,
    GridClassicEnvironment,
    GridEnvironment,
    Random,
    Edge,
    BumpEnvironment,
}

/// Lighting and texture-mapping parameters of one vertex material
#[derive(Debug, Clone, PartialEq)]
pub struct VertexMaterialDesc {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emissive: Vec3,
    pub shininess: f32,
    pub opacity: f32,
    pub stage0_mapping: StageMapping,
    pub stage1_mapping: StageMapping,
}

impl Default for VertexMaterialDesc {
    fn default() -> Self {
        Self {
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            specular: Vec3::ZERO,
            emissive: Vec3::ZERO,
            shininess: 0.0,
            opacity: 1.0,
            stage0_mapping: StageMapping::Uv,
            stage1_mapping: StageMapping::Uv,
        }
    }
}

/// Entry of the mesh material table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialDesc {
    /// Material name (informational)
    pub name: String,
    pub vertex_material: VertexMaterialDesc,
    /// Mapper arguments of stage 0, `key=value` lines (e.g. `UPerSec=0.5`)
    pub mapper_args0: String,
    /// Mapper arguments of stage 1
    pub mapper_args1: String,
}

/// Fixed-function shading state of a triangle range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialShader {
    pub src_blend: BlendFactor,
    pub dest_blend: BlendFactor,
    /// Discard fragments below the alpha reference
    pub alpha_test: bool,
    /// Sample the pass textures (false draws vertex color only)
    pub texturing: bool,
    pub depth_write: bool,
}

impl MaterialShader {
    /// Opaque, textured, no alpha test
    pub fn opaque() -> Self {
        Self {
            src_blend: BlendFactor::One,
            dest_blend: BlendFactor::Zero,
            alpha_test: false,
            texturing: true,
            depth_write: true,
        }
    }

    /// Standard alpha-blended, textured, no depth write
    pub fn alpha_blended() -> Self {
        Self {
            src_blend: BlendFactor::SrcAlpha,
            dest_blend: BlendFactor::OneMinusSrcAlpha,
            alpha_test: false,
            texturing: true,
            depth_write: false,
        }
    }

    /// Anything other than `One`/`Zero` blends with the framebuffer
    pub fn blend_enabled(&self) -> bool {
        !(self.src_blend == BlendFactor::One && self.dest_blend == BlendFactor::Zero)
    }
}

impl Default for MaterialShader {
    fn default() -> Self {
        Self::opaque()
    }
}

/// One texture stage of a material pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextureStageDesc {
    /// Index into `MeshAsset::textures`, shared or one per triangle
    pub texture_ids: Vec<u32>,
    /// Texture coordinates, one per vertex
    pub tex_coords: Vec<Vec2>,
}

/// One shading layer applied across the whole mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialPassDesc {
    /// Index into `MeshAsset::materials`, shared or one per vertex
    pub vertex_material_ids: Vec<u32>,
    /// Index into `MeshAsset::shaders`, shared or one per triangle
    pub shader_ids: Vec<u32>,
    /// Zero, one or two texture stages
    pub texture_stages: Vec<TextureStageDesc>,
}

/// Reference to a texture file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextureRef {
    /// File name, relative to the configured texture directory
    pub name: String,
}

impl TextureRef {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

/// Complete parsed mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshAsset {
    pub name: String,
    pub flags: MeshFlags,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// One per vertex when `GEOMETRY_TYPE_SKIN` is set, ignored otherwise
    pub influences: Vec<VertexInfluence>,
    pub triangles: Vec<Triangle>,
    pub materials: Vec<MaterialDesc>,
    pub shaders: Vec<MaterialShader>,
    pub material_passes: Vec<MaterialPassDesc>,
    pub textures: Vec<TextureRef>,
    pub bounding_sphere: BoundingSphere,
}

impl MeshAsset {
    /// Whether vertices follow the influence array
    pub fn is_skinned(&self) -> bool {
        self.flags.contains(MeshFlags::GEOMETRY_TYPE_SKIN)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(MeshFlags::HIDDEN)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

#[cfg(test)]
#[path = "mesh_asset_tests.rs"]
mod tests;

/// Constant blocks written while drawing meshes.
///
/// `MeshTransformConstants` lives in a per-mesh uniform buffer (set 0) and is
/// rewritten once per frame. `PerDrawConstants` is pushed inline right before
/// every indexed draw.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-frame transform input supplied by the animation/scene collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// Animation requests bone-driven deformation this frame
    pub skinning_enabled: bool,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            skinning_enabled: false,
        }
    }
}

/// Frame timing input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Elapsed time driving scrolling texture mappings
    pub time_in_seconds: f32,
}

impl FrameContext {
    pub fn new(time_in_seconds: f32) -> Self {
        Self { time_in_seconds }
    }
}

/// Mesh transform uniform block (144 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshTransformConstants {
    pub world_view_projection: Mat4,
    pub world: Mat4,
    /// 0 or 1
    pub skinning_enabled: u32,
    pub _padding: [u32; 3],
}

impl MeshTransformConstants {
    /// Build the block for one mesh
    ///
    /// Skinning is only enabled when the mesh has bone influences and the
    /// transform asks for it.
    pub fn new(transform: &MeshTransform, mesh_skinned: bool) -> Self {
        Self {
            world_view_projection: transform.projection * transform.view * transform.world,
            world: transform.world,
            skinning_enabled: (transform.skinning_enabled && mesh_skinned) as u32,
            _padding: [0; 3],
        }
    }
}

impl Default for MeshTransformConstants {
    fn default() -> Self {
        Self::new(&MeshTransform::default(), false)
    }
}

/// Per-draw push constant block (20 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PerDrawConstants {
    /// First triangle of the draw (`start_index / 3`), offsets per-triangle lookups
    pub primitive_offset: u32,
    pub num_texture_stages: u32,
    pub alpha_test: u32,
    pub texturing: u32,
    pub time_in_seconds: f32,
}

impl PerDrawConstants {
    /// Size of the push constant range declared by every mesh pipeline
    pub const SIZE: u32 = std::mem::size_of::<PerDrawConstants>() as u32;
}

#[cfg(test)]
#[path = "constants_tests.rs"]
mod tests;

//! Fixed resource interface between mesh data and the mesh shaders.
//!
//! | set | contents | owner |
//! |-----|----------|-------|
//! | 0 | transform uniform block | mesh |
//! | 1 | `max_textures` combined image samplers | mesh |
//! | 2 | material table, material ids, stage 0/1 texture ids | material pass |
//!
//! Vertex binding 0 is the mesh vertex buffer, binding 1 the material pass
//! texture coordinates. Per-draw constants are a single push constant range.

use crate::renderer::{
    BindingGroupLayoutDesc, BindingSlotDesc, BindingType, ShaderStageFlags, ShaderStage,
    VertexLayout, VertexBinding, VertexAttribute, VertexInputRate, BufferFormat,
    PushConstantRange,
};
use crate::scene::PerDrawConstants;

pub const MESH_TRANSFORM_SET: u32 = 0;
pub const MESH_TEXTURES_SET: u32 = 1;
pub const MATERIAL_PASS_SET: u32 = 2;

/// Vertex binding of the mesh vertex buffer
pub const MESH_VERTEX_BINDING: u32 = 0;
/// Vertex binding of the material pass texture coordinates
pub const TEX_COORD_BINDING: u32 = 1;

/// Stride of one mesh vertex: position, normal, bone index
pub const MESH_VERTEX_STRIDE: u32 = 28;

/// Texture stages a material pass can sample
pub const MAX_TEXTURE_STAGES: u32 = 2;

pub fn mesh_transform_layout() -> BindingGroupLayoutDesc {
    BindingGroupLayoutDesc {
        entries: vec![BindingSlotDesc {
            binding: 0,
            binding_type: BindingType::UniformBuffer,
            count: 1,
            stage_flags: ShaderStageFlags::VERTEX_FRAGMENT,
        }],
    }
}

pub fn mesh_textures_layout(max_textures: u32) -> BindingGroupLayoutDesc {
    BindingGroupLayoutDesc {
        entries: vec![BindingSlotDesc {
            binding: 0,
            binding_type: BindingType::CombinedImageSampler,
            count: max_textures,
            stage_flags: ShaderStageFlags::FRAGMENT,
        }],
    }
}

/// Set 2: bindings 0..=3 are all read-only storage buffers
pub fn material_pass_layout() -> BindingGroupLayoutDesc {
    let storage = |binding: u32, stage_flags: ShaderStageFlags| BindingSlotDesc {
        binding,
        binding_type: BindingType::StorageBuffer,
        count: 1,
        stage_flags,
    };

    BindingGroupLayoutDesc {
        entries: vec![
            storage(0, ShaderStageFlags::VERTEX_FRAGMENT), // material table
            storage(1, ShaderStageFlags::VERTEX),          // material id per vertex
            storage(2, ShaderStageFlags::FRAGMENT),        // stage 0 texture id per triangle
            storage(3, ShaderStageFlags::FRAGMENT),        // stage 1 texture id per triangle
        ],
    }
}

/// All three set layouts, indexed by set
pub fn mesh_binding_group_layouts(max_textures: u32) -> Vec<BindingGroupLayoutDesc> {
    vec![
        mesh_transform_layout(),
        mesh_textures_layout(max_textures),
        material_pass_layout(),
    ]
}

/// Vertex input for a pass with `texture_stage_count` UV sets
pub fn mesh_vertex_layout(texture_stage_count: u32) -> VertexLayout {
    let mut attributes = vec![
        VertexAttribute { location: 0, binding: MESH_VERTEX_BINDING, format: BufferFormat::R32G32B32_SFLOAT, offset: 0 },
        VertexAttribute { location: 1, binding: MESH_VERTEX_BINDING, format: BufferFormat::R32G32B32_SFLOAT, offset: 12 },
        VertexAttribute { location: 2, binding: MESH_VERTEX_BINDING, format: BufferFormat::R32_UINT, offset: 24 },
    ];

    let uv_size = BufferFormat::R32G32_SFLOAT.size_bytes();
    for stage in 0..texture_stage_count {
        attributes.push(VertexAttribute {
            location: 3 + stage,
            binding: TEX_COORD_BINDING,
            format: BufferFormat::R32G32_SFLOAT,
            offset: stage * uv_size,
        });
    }

    VertexLayout {
        bindings: vec![
            VertexBinding { binding: MESH_VERTEX_BINDING, stride: MESH_VERTEX_STRIDE, input_rate: VertexInputRate::Vertex },
            VertexBinding { binding: TEX_COORD_BINDING, stride: texture_stage_count * uv_size, input_rate: VertexInputRate::Vertex },
        ],
        attributes,
    }
}

pub fn per_draw_push_constant_range() -> PushConstantRange {
    PushConstantRange {
        stages: vec![ShaderStage::Vertex, ShaderStage::Fragment],
        offset: 0,
        size: PerDrawConstants::SIZE,
    }
}

#[cfg(test)]
#[path = "binding_layout_tests.rs"]
mod tests;

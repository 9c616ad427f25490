//! Vertex material record of the mesh material table.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::asset::MaterialDesc;
use crate::error::Result;
use crate::resource::TextureMapping;

/// GPU layout of one material table entry (96 bytes, std430-compatible)
///
/// | offset | field |
/// |--------|-------|
/// | 0  | ambient |
/// | 12 | diffuse |
/// | 24 | specular |
/// | 36 | shininess |
/// | 40 | emissive |
/// | 52 | opacity |
/// | 56 | stage 0 mapping |
/// | 76 | stage 1 mapping |
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexMaterial {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    pub emissive: Vec3,
    pub opacity: f32,
    pub texture_mapping_stage0: TextureMapping,
    pub texture_mapping_stage1: TextureMapping,
}

impl VertexMaterial {
    /// Size of one entry in the material table buffer
    pub const SIZE: usize = std::mem::size_of::<VertexMaterial>();

    /// Convert a material table entry, parsing both stages' mapper arguments
    pub fn from_desc(material: &MaterialDesc) -> Result<Self> {
        let vm = &material.vertex_material;
        Ok(Self {
            ambient: vm.ambient,
            diffuse: vm.diffuse,
            specular: vm.specular,
            shininess: vm.shininess,
            emissive: vm.emissive,
            opacity: vm.opacity,
            texture_mapping_stage0: TextureMapping::from_stage(vm.stage0_mapping, &material.mapper_args0)?,
            texture_mapping_stage1: TextureMapping::from_stage(vm.stage1_mapping, &material.mapper_args1)?,
        })
    }
}

#[cfg(test)]
#[path = "vertex_material_tests.rs"]
mod tests;

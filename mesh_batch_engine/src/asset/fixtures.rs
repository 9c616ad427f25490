//! Small hand-built assets shared by unit tests.

use glam::{Vec2, Vec3};
use super::*;

/// Unit quad: 4 vertices, 2 triangles, one opaque textured shader, one pass
/// with a single texture stage sampling `grass.tga`
pub fn quad_asset() -> MeshAsset {
    MeshAsset {
        name: "quad".to_string(),
        flags: MeshFlags::empty(),
        vertices: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        influences: Vec::new(),
        triangles: vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
        materials: vec![MaterialDesc {
            name: "grass".to_string(),
            ..Default::default()
        }],
        shaders: vec![MaterialShader::opaque()],
        material_passes: vec![MaterialPassDesc {
            vertex_material_ids: vec![0],
            shader_ids: vec![0],
            texture_stages: vec![TextureStageDesc {
                texture_ids: vec![0],
                tex_coords: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(1.0, 0.0),
                    Vec2::new(1.0, 1.0),
                    Vec2::new(0.0, 1.0),
                ],
            }],
        }],
        textures: vec![TextureRef::new("grass.tga")],
        bounding_sphere: BoundingSphere::new(Vec3::new(0.5, 0.5, 0.0), 0.75),
    }
}

/// Strip of `triangle_count` triangles over `triangle_count + 2` vertices,
/// with the given shader table, one texture (`strip.tga`) and no passes
pub fn strip_asset(triangle_count: u32, shaders: Vec<MaterialShader>) -> MeshAsset {
    let vertex_count = triangle_count + 2;
    MeshAsset {
        name: "strip".to_string(),
        vertices: (0..vertex_count).map(|i| Vec3::new(i as f32, (i % 2) as f32, 0.0)).collect(),
        normals: vec![Vec3::Z; vertex_count as usize],
        triangles: (0..triangle_count).map(|i| Triangle::new(i, i + 1, i + 2)).collect(),
        materials: vec![MaterialDesc::default()],
        shaders,
        textures: vec![TextureRef::new("strip.tga")],
        ..Default::default()
    }
}

/// Pass over `asset` with per-triangle shader ids and `stages` texture
/// stages, every stage sampling texture 0
pub fn pass_with_shader_ids(asset: &MeshAsset, shader_ids: Vec<u32>, stages: usize) -> MaterialPassDesc {
    MaterialPassDesc {
        vertex_material_ids: vec![0],
        shader_ids,
        texture_stages: (0..stages)
            .map(|_| TextureStageDesc {
                texture_ids: vec![0],
                tex_coords: vec![Vec2::ZERO; asset.vertices.len()],
            })
            .collect(),
    }
}

/// Tests for Mesh compilation
///
/// These tests build meshes against a MockRenderer and inspect the recorded
/// buffers, binding groups and pipelines.

use super::*;
use crate::asset::fixtures::{quad_asset, strip_asset, pass_with_shader_ids};
use crate::asset::{MaterialShader, VertexInfluence};
use crate::error::Error;
use crate::renderer::mock_renderer::{MockRenderer, MockShader};
use crate::renderer::ShaderStage;
use crate::resource::{MockTextureLoader, MeshVertex, DrawGroup};
use glam::{Mat4, Vec3};

// ============================================================================
// Helper Functions
// ============================================================================

fn mock_renderer() -> (Arc<Mutex<MockRenderer>>, Arc<Mutex<dyn Renderer>>) {
    let mock = Arc::new(Mutex::new(MockRenderer::new()));
    let renderer: Arc<Mutex<dyn Renderer>> = mock.clone();
    (mock, renderer)
}

fn pipeline_cache(config: &MeshBuildConfig) -> PipelineStateCache {
    PipelineStateCache::new(
        Arc::new(MockShader::new(ShaderStage::Vertex, "mesh.vert")),
        Arc::new(MockShader::new(ShaderStage::Fragment, "mesh.frag")),
        config,
    )
}

fn loader() -> MockTextureLoader {
    MockTextureLoader::new(&["grass.tga", "strip.tga"])
}

fn build(renderer: &Arc<Mutex<dyn Renderer>>, asset: &MeshAsset) -> Result<Mesh> {
    let config = MeshBuildConfig::default();
    let mut pipelines = pipeline_cache(&config);
    Mesh::from_asset(renderer, &loader(), &mut pipelines, asset, &config)
}

fn mesh_vertices(mock: &Arc<Mutex<MockRenderer>>) -> Vec<MeshVertex> {
    // The mesh vertex buffer is the first vertex-usage buffer created
    mock.lock().unwrap().buffers_with_usage(BufferUsage::Vertex)[0].contents_as()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_quad_compiles_to_one_opaque_list() {
    let (_, renderer) = mock_renderer();
    let mesh = build(&renderer, &quad_asset()).unwrap();

    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);
    assert_eq!(mesh.material_passes().len(), 1);

    let lists = mesh.draw_lists();
    assert_eq!(lists.opaque.len(), 1);
    assert!(lists.transparent.is_empty());
    assert_eq!(lists.opaque[0].material_passes, vec![0]);

    let parts = mesh.material_passes()[0].mesh_parts();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].start_index, 0);
    assert_eq!(parts[0].index_count, 6);
    assert_eq!(parts[0].pipeline_state, lists.opaque[0].pipeline_state);
    assert!(mesh.pipeline(&parts[0].pipeline_state).is_some());
}

#[test]
fn test_passes_differing_only_in_blend() {
    let (_, renderer) = mock_renderer();
    let mut asset = strip_asset(2, vec![MaterialShader::opaque(), MaterialShader::alpha_blended()]);
    asset.material_passes = vec![
        pass_with_shader_ids(&asset, vec![0], 1),
        pass_with_shader_ids(&asset, vec![1], 1),
    ];

    let mesh = build(&renderer, &asset).unwrap();
    let lists = mesh.draw_lists();
    assert_eq!(lists.opaque.len(), 1);
    assert_eq!(lists.opaque[0].material_passes, vec![0]);
    assert_eq!(lists.transparent.len(), 1);
    assert_eq!(lists.transparent[0].material_passes, vec![1]);

    let opaque = lists.opaque[0].pipeline_state;
    let transparent = lists.transparent[0].pipeline_state;
    assert_eq!(
        PipelineStateId { blend_enabled: true, ..opaque },
        transparent
    );
}

#[test]
fn test_mixed_shader_pass_lands_in_several_lists() {
    let (_, renderer) = mock_renderer();
    let alpha_tested = MaterialShader { alpha_test: true, ..MaterialShader::opaque() };
    let mut asset = strip_asset(4, vec![MaterialShader::opaque(), MaterialShader::alpha_blended(), alpha_tested]);
    asset.material_passes = vec![pass_with_shader_ids(&asset, vec![0, 1, 2, 0], 1)];

    let mesh = build(&renderer, &asset).unwrap();
    let lists = mesh.draw_lists();
    assert_eq!(lists.len(), 3);
    assert!(lists.iter().all(|list| list.material_passes == vec![0]));
    assert_eq!(lists.opaque.len(), 2);
    assert_eq!(lists.transparent.len(), 1);
    assert_eq!(mesh.material_passes()[0].mesh_parts().len(), 4);
}

#[test]
fn test_skinned_mesh_stores_bone_indices() {
    let (mock, renderer) = mock_renderer();
    let mut asset = quad_asset();
    asset.flags = MeshFlags::GEOMETRY_TYPE_SKIN;
    asset.influences = vec![
        VertexInfluence { bone_index: 3 },
        VertexInfluence { bone_index: 1 },
        VertexInfluence { bone_index: 4 },
        VertexInfluence { bone_index: 1 },
    ];

    let mesh = build(&renderer, &asset).unwrap();
    assert!(mesh.skinned());

    let bones: Vec<u32> = mesh_vertices(&mock).iter().map(|v| v.bone_index).collect();
    assert_eq!(bones, vec![3, 1, 4, 1]);
}

#[test]
fn test_unskinned_mesh_stores_bone_zero() {
    let (mock, renderer) = mock_renderer();
    let mesh = build(&renderer, &quad_asset()).unwrap();
    assert!(!mesh.skinned());
    assert!(mesh_vertices(&mock).iter().all(|v| v.bone_index == 0));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_parts_within_index_range_and_disjoint() {
    let (_, renderer) = mock_renderer();
    let mut asset = strip_asset(6, vec![MaterialShader::opaque(), MaterialShader::alpha_blended()]);
    asset.material_passes = vec![
        pass_with_shader_ids(&asset, vec![0, 0, 1, 1, 0, 1], 1),
        pass_with_shader_ids(&asset, vec![1], 2),
    ];

    let mesh = build(&renderer, &asset).unwrap();
    for pass in mesh.material_passes() {
        let mut end = 0;
        for part in pass.mesh_parts() {
            assert!(part.start_index >= end);
            assert!(part.end_index() <= mesh.index_count());
            end = part.end_index();
        }
    }
}

#[test]
fn test_every_state_in_exactly_one_group() {
    let (_, renderer) = mock_renderer();
    let mut asset = strip_asset(3, vec![MaterialShader::opaque(), MaterialShader::alpha_blended()]);
    asset.material_passes = vec![pass_with_shader_ids(&asset, vec![0, 1, 0], 1)];

    let mesh = build(&renderer, &asset).unwrap();
    for part in mesh.material_passes()[0].mesh_parts() {
        let state = part.pipeline_state;
        let opaque = mesh.draw_lists().group(DrawGroup::Opaque).iter().filter(|l| l.pipeline_state == state).count();
        let transparent = mesh.draw_lists().group(DrawGroup::Transparent).iter().filter(|l| l.pipeline_state == state).count();
        assert_eq!(opaque + transparent, 1);
        assert_eq!(transparent == 1, state.blend_enabled);
    }
}

#[test]
fn test_rebuild_gives_identical_buffers() {
    let (mock_a, renderer_a) = mock_renderer();
    let (mock_b, renderer_b) = mock_renderer();
    let mut asset = strip_asset(4, vec![MaterialShader::opaque(), MaterialShader::alpha_blended()]);
    asset.material_passes = vec![pass_with_shader_ids(&asset, vec![0, 1, 1, 0], 2)];

    build(&renderer_a, &asset).unwrap();
    build(&renderer_b, &asset).unwrap();

    let a = mock_a.lock().unwrap();
    let b = mock_b.lock().unwrap();
    assert_eq!(a.created_buffers.len(), b.created_buffers.len());
    for (x, y) in a.created_buffers.iter().zip(&b.created_buffers) {
        assert_eq!(x.usage, y.usage);
        assert_eq!(x.contents(), y.contents());
    }
    assert_eq!(a.pipeline_labels(), b.pipeline_labels());
}

#[test]
fn test_meshes_share_pipelines_through_cache() {
    let (mock, renderer) = mock_renderer();
    let config = MeshBuildConfig::default();
    let mut pipelines = pipeline_cache(&config);

    let first = Mesh::from_asset(&renderer, &loader(), &mut pipelines, &quad_asset(), &config).unwrap();
    let second = Mesh::from_asset(&renderer, &loader(), &mut pipelines, &quad_asset(), &config).unwrap();

    assert_eq!(mock.lock().unwrap().created_pipelines.len(), 1);
    let state = first.draw_lists().opaque[0].pipeline_state;
    assert_eq!(state, second.draw_lists().opaque[0].pipeline_state);
    assert!(Arc::ptr_eq(first.pipeline(&state).unwrap(), second.pipeline(&state).unwrap()));
}

// ============================================================================
// Binding groups
// ============================================================================

#[test]
fn test_mesh_binding_groups() {
    let (mock, renderer) = mock_renderer();
    let mesh = build(&renderer, &quad_asset()).unwrap();

    assert_eq!(mesh.transform_binding_group().set_index(), MESH_TRANSFORM_SET);
    assert_eq!(mesh.texture_binding_group().set_index(), MESH_TEXTURES_SET);
    assert_eq!(mesh.textures().len(), 1);

    let mock = mock.lock().unwrap();
    assert_eq!(mock.created_binding_groups[0].entries, vec!["uniform(144)"]);

    let textures = &mock.created_binding_groups[1].entries;
    assert_eq!(textures.len(), 16);
    assert!(textures[0].starts_with("texture("));
    assert!(textures[1..].iter().all(|entry| entry == "null_texture"));
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn test_set_transform_writes_uniform() {
    let (mock, renderer) = mock_renderer();
    let mut mesh = build(&renderer, &quad_asset()).unwrap();
    assert_eq!(mesh.transform_constants().world_view_projection, Mat4::IDENTITY);

    let transform = MeshTransform {
        world: Mat4::from_translation(Vec3::X),
        view: Mat4::from_translation(Vec3::Y),
        projection: Mat4::from_scale(Vec3::splat(2.0)),
        skinning_enabled: true,
    };
    mesh.set_transform(&transform).unwrap();

    let expected = MeshTransformConstants::new(&transform, false);
    assert_eq!(*mesh.transform_constants(), expected);
    // Unskinned mesh never enables skinning
    assert_eq!(mesh.transform_constants().skinning_enabled, 0);

    let uniform = mock.lock().unwrap().buffers_with_usage(BufferUsage::Uniform)[0].contents();
    assert_eq!(uniform, bytemuck::bytes_of(&expected).to_vec());
}

#[test]
fn test_set_transform_enables_skinning_on_skinned_mesh() {
    let (_, renderer) = mock_renderer();
    let mut asset = quad_asset();
    asset.flags = MeshFlags::GEOMETRY_TYPE_SKIN;
    asset.influences = vec![VertexInfluence::default(); 4];
    let mut mesh = build(&renderer, &asset).unwrap();

    mesh.set_transform(&MeshTransform { skinning_enabled: true, ..Default::default() }).unwrap();
    assert_eq!(mesh.transform_constants().skinning_enabled, 1);

    mesh.set_transform(&MeshTransform::default()).unwrap();
    assert_eq!(mesh.transform_constants().skinning_enabled, 0);
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn test_metadata_carried_over() {
    let (_, renderer) = mock_renderer();
    let mut asset = quad_asset();
    asset.flags = MeshFlags::HIDDEN | MeshFlags::CAST_SHADOW;

    let mesh = build(&renderer, &asset).unwrap();
    assert_eq!(mesh.name(), "quad");
    assert!(mesh.is_hidden());
    assert!(mesh.flags().contains(MeshFlags::CAST_SHADOW));
    assert_eq!(mesh.bounding_sphere().radius, 0.75);
    assert_eq!(mesh.material_count(), 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_cache_config_mismatch() {
    let (_, renderer) = mock_renderer();
    let mut pipelines = pipeline_cache(&MeshBuildConfig { max_textures: 8, ..Default::default() });
    let result = Mesh::from_asset(&renderer, &loader(), &mut pipelines, &quad_asset(), &MeshBuildConfig::default());
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_pipeline_failure_is_fatal() {
    let (mock, renderer) = mock_renderer();
    mock.lock().unwrap().fail_pipelines = true;
    let result = build(&renderer, &quad_asset());
    assert!(matches!(result, Err(Error::PipelineCreation(_))));
}

#[test]
fn test_missing_texture_is_fatal() {
    let (_, renderer) = mock_renderer();
    let config = MeshBuildConfig::default();
    let mut pipelines = pipeline_cache(&config);
    let result = Mesh::from_asset(&renderer, &MockTextureLoader::new(&[]), &mut pipelines, &quad_asset(), &config);
    assert!(matches!(result, Err(Error::TextureNotFound(_))));
}

#[test]
fn test_bad_pass_is_fatal() {
    let (_, renderer) = mock_renderer();
    let mut asset = quad_asset();
    asset.material_passes[0].vertex_material_ids = vec![0, 0];
    assert!(matches!(build(&renderer, &asset), Err(Error::DataIntegrity(_))));
}

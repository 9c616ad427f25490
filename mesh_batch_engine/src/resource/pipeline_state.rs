//! Pipeline-state classification and sharing.
//!
//! Every mesh part is drawn with the pipeline selected by its
//! `PipelineStateId`. Ids are plain values: two parts, passes or meshes with
//! the same blend/alpha-test/texturing/stage-count combination share one id
//! and, through `PipelineStateCache`, one backend pipeline.

use std::fmt;
use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::asset::MaterialShader;
use crate::engine_err;
use crate::error::{Error, Result};
use crate::renderer::{
    Renderer, Shader, Pipeline, PipelineDesc, PrimitiveTopology,
    RasterizationState, DepthStencilState, ColorBlendState,
};
use crate::resource::binding_layout::{
    mesh_binding_group_layouts, mesh_vertex_layout, per_draw_push_constant_range,
};
use crate::resource::MeshBuildConfig;

// ============================================================================
// PIPELINE STATE ID
// ============================================================================

/// Identity of a mesh pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineStateId {
    pub blend_enabled: bool,
    pub alpha_test: bool,
    pub texturing: bool,
    /// 1 or 2
    pub texture_stage_count: u32,
}

impl PipelineStateId {
    /// Whether parts with this state belong to the transparent draw group
    pub fn is_transparent(&self) -> bool {
        self.blend_enabled
    }
}

impl fmt::Display for PipelineStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mesh[{}{}{}, stages={}]",
            if self.blend_enabled { "blend" } else { "opaque" },
            if self.alpha_test { "+alpha_test" } else { "" },
            if self.texturing { "+textured" } else { "" },
            self.texture_stage_count,
        )
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Derives pipeline-state ids from shaders
pub struct PipelineStateClassifier;

impl PipelineStateClassifier {
    /// Pipeline state of a triangle range drawn with `shader` in a pass
    /// sampling `texture_stage_count` stages
    ///
    /// Nothing else about the mesh takes part in the key.
    pub fn classify(shader: &MaterialShader, texture_stage_count: u32) -> PipelineStateId {
        PipelineStateId {
            blend_enabled: shader.blend_enabled(),
            alpha_test: shader.alpha_test,
            texturing: shader.texturing,
            texture_stage_count,
        }
    }
}

// ============================================================================
// CACHE
// ============================================================================

/// One backend pipeline per `PipelineStateId`, created on first use
pub struct PipelineStateCache {
    vertex_shader: Arc<dyn Shader>,
    fragment_shader: Arc<dyn Shader>,
    max_textures: u32,
    pipelines: FxHashMap<PipelineStateId, Arc<dyn Pipeline>>,
}

impl PipelineStateCache {
    /// Create an empty cache for the mesh shader pair
    ///
    /// `config.max_textures` sizes the texture set of every pipeline layout;
    /// meshes built against this cache must use the same value.
    pub fn new(
        vertex_shader: Arc<dyn Shader>,
        fragment_shader: Arc<dyn Shader>,
        config: &MeshBuildConfig,
    ) -> Self {
        Self {
            vertex_shader,
            fragment_shader,
            max_textures: config.max_textures as u32,
            pipelines: FxHashMap::default(),
        }
    }

    pub fn max_textures(&self) -> u32 {
        self.max_textures
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn contains(&self, id: &PipelineStateId) -> bool {
        self.pipelines.contains_key(id)
    }

    pub fn get(&self, id: &PipelineStateId) -> Option<&Arc<dyn Pipeline>> {
        self.pipelines.get(id)
    }

    /// Backend description of the pipeline for `id`
    ///
    /// Blended states test depth without writing it; opaque states write it.
    pub fn pipeline_desc(&self, id: &PipelineStateId) -> PipelineDesc {
        let (color_blend, depth_stencil) = if id.blend_enabled {
            (
                ColorBlendState::alpha_blend(),
                DepthStencilState { depth_write_enable: false, ..Default::default() },
            )
        } else {
            (ColorBlendState::default(), DepthStencilState::default())
        };

        PipelineDesc {
            label: id.to_string(),
            vertex_shader: Arc::clone(&self.vertex_shader),
            fragment_shader: Arc::clone(&self.fragment_shader),
            vertex_layout: mesh_vertex_layout(id.texture_stage_count),
            topology: PrimitiveTopology::TriangleList,
            push_constant_ranges: vec![per_draw_push_constant_range()],
            binding_group_layouts: mesh_binding_group_layouts(self.max_textures),
            rasterization: RasterizationState::default(),
            depth_stencil,
            color_blend,
        }
    }

    /// Shared pipeline for `id`, creating it on first request
    ///
    /// # Errors
    ///
    /// `Error::PipelineCreation` when the backend rejects the state (any
    /// backend error is reported as such), `Error::BackendError` when the
    /// renderer lock is poisoned. Failures are not cached.
    pub fn get_or_create(
        &mut self,
        renderer: &Arc<Mutex<dyn Renderer>>,
        id: PipelineStateId,
    ) -> Result<Arc<dyn Pipeline>> {
        if let Some(pipeline) = self.pipelines.get(&id) {
            return Ok(Arc::clone(pipeline));
        }

        let desc = self.pipeline_desc(&id);
        let pipeline = {
            let mut renderer = renderer.lock()
                .map_err(|_| engine_err!("meshbatch::PipelineStateCache", "Renderer lock poisoned"))?;
            renderer.create_pipeline(desc)
        };

        let pipeline = pipeline.map_err(|err| match err {
            Error::PipelineCreation(_) => err,
            other => engine_err!(PipelineCreation, "meshbatch::PipelineStateCache",
                "{}: {}", id, other),
        })?;

        crate::engine_debug!("meshbatch::PipelineStateCache", "Created pipeline {}", id);
        self.pipelines.insert(id, Arc::clone(&pipeline));
        Ok(pipeline)
    }
}

#[cfg(test)]
#[path = "pipeline_state_tests.rs"]
mod tests;

/// Per-frame mesh drawing.
///
/// Records a compiled `Mesh` into a command list that is already inside an
/// active render pass. For every draw list the shared mesh state is bound
/// once; each matching mesh part then gets its per-draw constants pushed
/// immediately before its indexed draw.

use std::ops::AddAssign;
use crate::engine_err;
use crate::error::Result;
use crate::renderer::{CommandList, IndexType, ShaderStage};
use crate::resource::binding_layout::{
    MATERIAL_PASS_SET, MESH_TEXTURES_SET, MESH_TRANSFORM_SET, MESH_VERTEX_BINDING, TEX_COORD_BINDING,
};
use crate::resource::{DrawGroup, DrawList, Mesh};
use super::constants::{FrameContext, PerDrawConstants};

/// Counters of what one draw call recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub pipeline_binds: u32,
    pub draw_calls: u32,
    pub triangles: u32,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.pipeline_binds += other.pipeline_binds;
        self.draw_calls += other.draw_calls;
        self.triangles += other.triangles;
    }
}

/// Stateless mesh drawer, reusable across meshes and frames
#[derive(Debug, Default)]
pub struct MeshRenderer;

impl MeshRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw every list of the mesh, opaque lists first
    ///
    /// Callers that sort transparent geometry across meshes should use
    /// `draw_group` twice instead.
    pub fn draw(&self, mesh: &Mesh, cmd: &mut dyn CommandList, frame: &FrameContext) -> Result<DrawStats> {
        let mut stats = self.draw_group(mesh, cmd, DrawGroup::Opaque, frame)?;
        stats += self.draw_group(mesh, cmd, DrawGroup::Transparent, frame)?;
        Ok(stats)
    }

    /// Draw the opaque or the transparent lists of the mesh
    ///
    /// Hidden meshes record nothing.
    pub fn draw_group(
        &self,
        mesh: &Mesh,
        cmd: &mut dyn CommandList,
        group: DrawGroup,
        frame: &FrameContext,
    ) -> Result<DrawStats> {
        let mut stats = DrawStats::default();
        if mesh.is_hidden() {
            return Ok(stats);
        }

        for list in mesh.draw_lists().group(group) {
            self.draw_list(mesh, list, cmd, frame, &mut stats)?;
        }
        Ok(stats)
    }

    fn draw_list(
        &self,
        mesh: &Mesh,
        list: &DrawList,
        cmd: &mut dyn CommandList,
        frame: &FrameContext,
        stats: &mut DrawStats,
    ) -> Result<()> {
        let state = list.pipeline_state;
        let pipeline = mesh.pipeline(&state).ok_or_else(|| engine_err!(InvalidResource,
            "meshbatch::MeshRenderer", "Mesh '{}' has no pipeline for {}", mesh.name(), state))?;

        cmd.bind_pipeline(pipeline)?;
        stats.pipeline_binds += 1;

        cmd.bind_binding_group(pipeline, MESH_TRANSFORM_SET, mesh.transform_binding_group())?;
        cmd.bind_binding_group(pipeline, MESH_TEXTURES_SET, mesh.texture_binding_group())?;
        cmd.bind_vertex_buffer(MESH_VERTEX_BINDING, mesh.vertex_buffer(), 0)?;
        cmd.bind_index_buffer(mesh.index_buffer(), 0, IndexType::U16)?;

        for &pass_index in &list.material_passes {
            let pass = mesh.material_passes().get(pass_index).ok_or_else(|| engine_err!(InvalidResource,
                "meshbatch::MeshRenderer", "Mesh '{}' has no material pass {}", mesh.name(), pass_index))?;

            cmd.bind_binding_group(pipeline, MATERIAL_PASS_SET, pass.binding_group())?;
            cmd.bind_vertex_buffer(TEX_COORD_BINDING, pass.tex_coord_buffer(), 0)?;

            // Parts of other states are drawn by their own list
            for part in pass.mesh_parts().iter().filter(|part| part.pipeline_state == state) {
                let constants = PerDrawConstants {
                    primitive_offset: part.primitive_offset(),
                    num_texture_stages: pass.num_texture_stages(),
                    alpha_test: part.alpha_test as u32,
                    texturing: part.texturing as u32,
                    time_in_seconds: frame.time_in_seconds,
                };
                cmd.push_constants(
                    &[ShaderStage::Vertex, ShaderStage::Fragment],
                    0,
                    bytemuck::bytes_of(&constants),
                )?;
                cmd.draw_indexed(part.index_count, part.start_index, 0)?;

                stats.draw_calls += 1;
                stats.triangles += part.index_count / 3;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "mesh_renderer_tests.rs"]
mod tests;

/// CommandList trait - for recording rendering commands

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{Pipeline, Buffer, BindingGroup, IndexType, ShaderStage};

/// Command list for recording rendering commands
///
/// Mesh drawing records into a command list that is already inside an active
/// render pass; submission belongs to the caller. Commands take effect in
/// recording order, so state set right before a draw is the state that draw
/// observes.
pub trait CommandList: Send + Sync {
    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a binding group at `set_index` of the pipeline's layout
    fn bind_binding_group(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        binding_group: &Arc<dyn BindingGroup>,
    ) -> Result<()>;

    /// Push constants to the pipeline
    ///
    /// # Arguments
    ///
    /// * `stages` - Shader stages that will access the push constants
    /// * `offset` - Offset in bytes into push constant range
    /// * `data` - Data to push
    fn push_constants(&mut self, stages: &[ShaderStage], offset: u32, data: &[u8]) -> Result<()>;

    /// Bind a vertex buffer to a vertex binding slot
    fn bind_vertex_buffer(&mut self, binding: u32, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()>;

    /// Draw indexed vertices
    ///
    /// # Arguments
    ///
    /// * `index_count` - Number of indices to draw
    /// * `first_index` - Index of first index
    /// * `vertex_offset` - Value added to vertex index before indexing into the vertex buffer
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;
}

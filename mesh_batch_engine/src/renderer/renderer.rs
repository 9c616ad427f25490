/// Renderer trait - GPU resource factory interface

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{
    Buffer, Pipeline, BindingGroup,
    BufferDesc, PipelineDesc, BindingGroupLayoutDesc, BindingResource,
};

/// Main renderer trait
///
/// Central factory for the GPU resources a mesh owns. Implemented by
/// backend-specific renderers and shared as `Arc<Mutex<dyn Renderer>>`.
pub trait Renderer: Send + Sync {
    /// Create a buffer of `desc.size` bytes (contents uninitialized until `Buffer::update`)
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a graphics pipeline
    ///
    /// Fails with `Error::PipelineCreation` when the backend cannot build the
    /// requested state combination.
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create an immutable binding group
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout of the set
    /// * `set_index` - Set index the group will be bound at
    /// * `resources` - One resource per descriptor, in slot order
    fn create_binding_group(
        &mut self,
        layout: &BindingGroupLayoutDesc,
        set_index: u32,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn BindingGroup>>;
}

/// Mock Renderer for unit tests (no GPU required)
///
/// Records every created resource (buffers keep their written bytes) and every
/// recorded command, so mesh compilation and draw ordering can be asserted
/// without a graphics backend.

#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use crate::renderer::{
    Renderer, Buffer, Texture, Shader, Pipeline, CommandList, BindingGroup,
    BufferDesc, BufferUsage, PipelineDesc, BindingGroupLayoutDesc, BindingResource,
    TextureInfo, TextureFormat, ShaderStage, IndexType,
};
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::engine_bail;

// ============================================================================
// Mock Buffer
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub usage: BufferUsage,
    data: Mutex<Vec<u8>>,
}

#[cfg(test)]
impl MockBuffer {
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            size,
            usage,
            data: Mutex::new(vec![0u8; size as usize]),
        }
    }

    /// Bytes written so far (zero-initialized)
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }

    /// Contents read back as `T` elements (trailing partial element dropped)
    pub fn contents_as<T: bytemuck::Pod>(&self) -> Vec<T> {
        self.contents()
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }
}

#[cfg(test)]
impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let end = offset + data.len() as u64;
        if end > self.size {
            engine_bail!(InvalidResource, "meshbatch::mock",
                "update range [{}, {}) exceeds buffer size {}", offset, end, self.size);
        }
        let mut bytes = self.data.lock().unwrap();
        bytes[offset as usize..end as usize].copy_from_slice(data);
        Ok(())
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

#[cfg(test)]
impl MockTexture {
    pub fn new(width: u32, height: u32, name: &str) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
                mip_levels: 1,
            },
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    pub name: String,
}

#[cfg(test)]
impl MockShader {
    pub fn new(stage: ShaderStage, name: &str) -> Self {
        Self { stage, name: name.to_string() }
    }
}

#[cfg(test)]
impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

// ============================================================================
// Mock Pipeline
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockPipeline {
    pub label: String,
    pub blend_enable: bool,
    pub depth_write_enable: bool,
}

#[cfg(test)]
impl MockPipeline {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            blend_enable: false,
            depth_write_enable: true,
        }
    }
}

#[cfg(test)]
impl Pipeline for MockPipeline {
    fn label(&self) -> &str {
        &self.label
    }
}

// ============================================================================
// Mock BindingGroup
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockBindingGroup {
    pub set_index: u32,
    /// One description per bound resource, e.g. "storage(96)", "texture(64x64)", "null_texture"
    pub entries: Vec<String>,
}

#[cfg(test)]
impl BindingGroup for MockBindingGroup {
    fn set_index(&self) -> u32 {
        self.set_index
    }
}

#[cfg(test)]
fn describe_resource(resource: &BindingResource) -> String {
    match resource {
        BindingResource::UniformBuffer(buffer) => format!("uniform({})", buffer.size()),
        BindingResource::SampledTexture(texture, _) => {
            format!("texture({}x{})", texture.info().width, texture.info().height)
        }
        BindingResource::NullTexture => "null_texture".to_string(),
        BindingResource::StorageBuffer(buffer) => format!("storage({})", buffer.size()),
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockCommandList {
    /// Recorded commands, e.g. "bind_binding_group:2", "draw_indexed:6:0:0"
    pub commands: Vec<String>,
    /// Payload of every push_constants call, in order
    pub push_constant_data: Vec<Vec<u8>>,
}

#[cfg(test)]
impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix`
    pub fn commands_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(|c| c.as_str())
            .collect()
    }
}

#[cfg(test)]
impl CommandList for MockCommandList {
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.commands.push(format!("bind_pipeline:{}", pipeline.label()));
        Ok(())
    }

    fn bind_binding_group(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        binding_group: &Arc<dyn BindingGroup>,
    ) -> Result<()> {
        if binding_group.set_index() != set_index {
            engine_bail!(InvalidResource, "meshbatch::mock",
                "binding group for set {} bound at set {}", binding_group.set_index(), set_index);
        }
        self.commands.push(format!("bind_binding_group:{}", set_index));
        Ok(())
    }

    fn push_constants(&mut self, _stages: &[ShaderStage], offset: u32, data: &[u8]) -> Result<()> {
        self.commands.push(format!("push_constants:{}:{}", offset, data.len()));
        self.push_constant_data.push(data.to_vec());
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, binding: u32, _buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.commands.push(format!("bind_vertex_buffer:{}", binding));
        Ok(())
    }

    fn bind_index_buffer(&mut self, _buffer: &Arc<dyn Buffer>, _offset: u64, index_type: IndexType) -> Result<()> {
        self.commands.push(format!("bind_index_buffer:{:?}", index_type));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.commands.push(format!("draw_indexed:{}:{}:{}", index_count, first_index, vertex_offset));
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// Mock Renderer that tracks created resources without GPU
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockRenderer {
    /// Created buffers, in creation order
    pub created_buffers: Vec<Arc<MockBuffer>>,
    /// Created pipelines, in creation order
    pub created_pipelines: Vec<Arc<MockPipeline>>,
    /// Created binding groups, in creation order
    pub created_binding_groups: Vec<Arc<MockBindingGroup>>,
    /// When set, every create_pipeline call fails
    pub fail_pipelines: bool,
}

#[cfg(test)]
impl MockRenderer {
    /// Create a new mock renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Created buffers with the given usage
    pub fn buffers_with_usage(&self, usage: BufferUsage) -> Vec<Arc<MockBuffer>> {
        self.created_buffers
            .iter()
            .filter(|b| b.usage == usage)
            .cloned()
            .collect()
    }

    /// Labels of created pipelines
    pub fn pipeline_labels(&self) -> Vec<String> {
        self.created_pipelines.iter().map(|p| p.label.clone()).collect()
    }
}

#[cfg(test)]
impl Renderer for MockRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let buffer = Arc::new(MockBuffer::new(desc.size, desc.usage));
        self.created_buffers.push(Arc::clone(&buffer));
        Ok(buffer)
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        if self.fail_pipelines {
            engine_bail!(PipelineCreation, "meshbatch::mock",
                "backend rejected pipeline '{}'", desc.label);
        }
        let pipeline = Arc::new(MockPipeline {
            label: desc.label,
            blend_enable: desc.color_blend.blend_enable,
            depth_write_enable: desc.depth_stencil.depth_write_enable,
        });
        self.created_pipelines.push(Arc::clone(&pipeline));
        Ok(pipeline)
    }

    fn create_binding_group(
        &mut self,
        layout: &BindingGroupLayoutDesc,
        set_index: u32,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn BindingGroup>> {
        if resources.len() as u32 != layout.descriptor_count() {
            engine_bail!(InvalidResource, "meshbatch::mock",
                "set {}: {} resources for {} descriptors",
                set_index, resources.len(), layout.descriptor_count());
        }

        let mut remaining = resources.iter();
        for entry in &layout.entries {
            for _ in 0..entry.count {
                if let Some(resource) = remaining.next() {
                    if resource.binding_type() != entry.binding_type {
                        engine_bail!(InvalidResource, "meshbatch::mock",
                            "set {} binding {}: expected {:?}, got {:?}",
                            set_index, entry.binding, entry.binding_type, resource.binding_type());
                    }
                }
            }
        }

        let group = Arc::new(MockBindingGroup {
            set_index,
            entries: resources.iter().map(describe_resource).collect(),
        });
        self.created_binding_groups.push(Arc::clone(&group));
        Ok(group)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;

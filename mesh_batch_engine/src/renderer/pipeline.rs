/// Pipeline trait and pipeline descriptor

use std::sync::Arc;
use crate::renderer::{Shader, ShaderStage, BindingGroupLayoutDesc};

/// Primitive topology (meshes are always drawn as indexed triangle lists)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices (max 65536 addressable vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }

    /// Number of distinct vertices an index of this width can address
    pub fn max_vertex_count(&self) -> u64 {
        match self {
            IndexType::U16 => u16::MAX as u64 + 1,
            IndexType::U32 => u32::MAX as u64 + 1,
        }
    }
}

/// Vertex attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    R32_UINT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,
}

impl BufferFormat {
    /// Size in bytes of one element
    pub fn size_bytes(&self) -> u32 {
        match self {
            BufferFormat::R32_UINT => 4,
            BufferFormat::R32G32_SFLOAT => 8,
            BufferFormat::R32G32B32_SFLOAT => 12,
            BufferFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

/// Vertex input rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexInputRate {
    /// Data is per-vertex
    Vertex,
    /// Data is per-instance
    Instance,
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Binding index
    pub binding: u32,
    /// Format of the attribute
    pub format: BufferFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Vertex binding description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBinding {
    /// Binding index
    pub binding: u32,
    /// Stride in bytes between consecutive elements
    pub stride: u32,
    /// Input rate
    pub input_rate: VertexInputRate,
}

/// Vertex input layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    /// Vertex bindings
    pub bindings: Vec<VertexBinding>,
    /// Vertex attributes
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Stride of the given binding, if declared
    pub fn stride(&self, binding: u32) -> Option<u32> {
        self.bindings.iter().find(|b| b.binding == binding).map(|b| b.stride)
    }
}

/// Push constant range descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConstantRange {
    /// Shader stages that can access these push constants
    pub stages: Vec<ShaderStage>,
    /// Offset in bytes
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
}

// ===== FIXED-FUNCTION STATE =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Depth comparison (model meshes only need the less-or-equal family)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessOrEqual,
    Equal,
    Always,
}

/// Blend factor, covering the factors W3D shaders can author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
}

/// Rasterization fixed-function state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizationState {
    /// Face culling mode
    pub cull_mode: CullMode,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self { cull_mode: CullMode::Back }
    }
}

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    /// Enable depth testing
    pub depth_test_enable: bool,
    /// Enable writing to depth buffer
    pub depth_write_enable: bool,
    /// Depth comparison operator
    pub depth_compare_op: CompareOp,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: CompareOp::LessOrEqual,
        }
    }
}

/// Color blending state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlendState {
    /// Enable blending
    pub blend_enable: bool,
    /// Source color blend factor
    pub src_color_factor: BlendFactor,
    /// Destination color blend factor
    pub dst_color_factor: BlendFactor,
    /// Color blend operation
    pub color_blend_op: BlendOp,
    /// Source alpha blend factor
    pub src_alpha_factor: BlendFactor,
    /// Destination alpha blend factor
    pub dst_alpha_factor: BlendFactor,
    /// Alpha blend operation
    pub alpha_blend_op: BlendOp,
}

impl ColorBlendState {
    /// Standard "over" alpha blending
    pub fn alpha_blend() -> Self {
        Self {
            blend_enable: true,
            src_color_factor: BlendFactor::SrcAlpha,
            dst_color_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::OneMinusSrcAlpha,
            alpha_blend_op: BlendOp::Add,
        }
    }
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
        }
    }
}

// ===== PIPELINE DESCRIPTOR =====

/// Descriptor for creating a graphics pipeline
#[derive(Clone)]
pub struct PipelineDesc {
    /// Debug label (backends forward it to the GPU API)
    pub label: String,
    /// Vertex shader
    pub vertex_shader: Arc<dyn Shader>,
    /// Fragment shader
    pub fragment_shader: Arc<dyn Shader>,
    /// Vertex input layout
    pub vertex_layout: VertexLayout,
    /// Primitive topology
    pub topology: PrimitiveTopology,
    /// Push constant ranges
    pub push_constant_ranges: Vec<PushConstantRange>,
    /// Binding group layouts, indexed by set
    pub binding_group_layouts: Vec<BindingGroupLayoutDesc>,
    /// Rasterization state
    pub rasterization: RasterizationState,
    /// Depth testing state
    pub depth_stencil: DepthStencilState,
    /// Color blending state
    pub color_blend: ColorBlendState,
}

/// Pipeline resource trait
///
/// Implemented by backend-specific pipeline types. The pipeline is destroyed
/// when the last `Arc` is dropped.
pub trait Pipeline: Send + Sync {
    /// Label given at creation
    fn label(&self) -> &str;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

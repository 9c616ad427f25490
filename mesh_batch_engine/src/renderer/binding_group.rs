/// BindingGroup trait and binding group descriptor
///
/// A BindingGroup is an immutable set of GPU resource bindings (textures,
/// buffers), the abstraction over descriptor sets.
///
/// - Immutable after creation
/// - Layout given explicitly, so meshes can build their groups before any
///   pipeline exists
/// - Every slot of a layout must be filled; empty texture slots are bound as
///   `BindingResource::NullTexture`

use bitflags::bitflags;
use crate::renderer::{Texture, Buffer, SamplerType, ShaderStage};

// ============================================================================
// Binding types and layout description
// ============================================================================

/// Type of resource bound at a given slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    /// Uniform buffer (read-only structured data)
    UniformBuffer,
    /// Combined image sampler (texture + sampler in one binding)
    CombinedImageSampler,
    /// Storage buffer (structured, read-only from shaders here)
    StorageBuffer,
}

bitflags! {
    /// Shader stage visibility flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x01;
        const FRAGMENT = 0x02;
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
    }
}

impl ShaderStageFlags {
    /// Create from a slice of ShaderStage
    pub fn from_stages(stages: &[ShaderStage]) -> Self {
        stages.iter().fold(Self::empty(), |flags, stage| {
            flags | match stage {
                ShaderStage::Vertex => Self::VERTEX,
                ShaderStage::Fragment => Self::FRAGMENT,
            }
        })
    }
}

/// Description of a single binding slot within a BindingGroupLayout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSlotDesc {
    /// Binding number (`layout(binding = N)`)
    pub binding: u32,
    /// Type of resource at this binding
    pub binding_type: BindingType,
    /// Number of descriptors at this binding (>1 for arrays)
    pub count: u32,
    /// Shader stages that access this binding
    pub stage_flags: ShaderStageFlags,
}

/// Description of a BindingGroup layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingGroupLayoutDesc {
    /// Binding slot descriptions
    pub entries: Vec<BindingSlotDesc>,
}

impl BindingGroupLayoutDesc {
    /// Total descriptor count, i.e. the number of `BindingResource`s a group
    /// of this layout is created from
    pub fn descriptor_count(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

// ============================================================================
// Binding resources (concrete data passed at creation time)
// ============================================================================

/// A concrete resource to bind into a BindingGroup
///
/// Resources are given in slot order, one per descriptor (array bindings
/// contribute `count` consecutive resources).
pub enum BindingResource<'a> {
    /// Uniform buffer binding
    UniformBuffer(&'a dyn Buffer),
    /// Sampled texture (the backend resolves the actual GPU sampler from the type)
    SampledTexture(&'a dyn Texture, SamplerType),
    /// Unused texture slot (backend binds its null/dummy texture)
    NullTexture,
    /// Storage buffer binding
    StorageBuffer(&'a dyn Buffer),
}

impl BindingResource<'_> {
    /// Binding type this resource can fill
    pub fn binding_type(&self) -> BindingType {
        match self {
            BindingResource::UniformBuffer(_) => BindingType::UniformBuffer,
            BindingResource::SampledTexture(..) | BindingResource::NullTexture => {
                BindingType::CombinedImageSampler
            }
            BindingResource::StorageBuffer(_) => BindingType::StorageBuffer,
        }
    }
}

// ============================================================================
// BindingGroup trait
// ============================================================================

/// An immutable set of GPU resource bindings.
pub trait BindingGroup: Send + Sync {
    /// Returns the set index this BindingGroup was created for
    fn set_index(&self) -> u32;
}

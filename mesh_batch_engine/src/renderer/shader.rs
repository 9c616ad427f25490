/// Shader trait
///
/// Shader modules arrive compiled from the backend; pipeline creation only
/// references them.

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
}

/// Shader module trait
pub trait Shader: Send + Sync {
    /// Stage this module was compiled for
    fn stage(&self) -> ShaderStage;
}

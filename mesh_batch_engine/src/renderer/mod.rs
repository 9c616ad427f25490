/// Renderer module - the abstract GPU resource layer consumed by mesh compilation
///
/// Backends (Vulkan, wgpu, ...) implement these traits; the engine only ever
/// talks to `dyn Renderer` / `dyn CommandList`.

// Module declarations
pub mod renderer;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod pipeline;
pub mod binding_group;
pub mod command_list;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use pipeline::*;
pub use binding_group::*;
pub use command_list::*;

// Mock renderer for tests (no GPU required)
#[cfg(test)]
pub mod mock_renderer;

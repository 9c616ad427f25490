/*!
# MeshBatch Engine

Compiles parsed W3D-style model meshes into GPU resources and draws them
with as few pipeline binds as possible.

The crate never talks to a graphics API directly. Everything GPU-facing goes
through the `Renderer` / `CommandList` traits, implemented by a backend
(Vulkan, wgpu, ...) supplied by the application.

## Architecture

- **asset**: plain-data `MeshAsset` as produced by a model parser
- **resource**: mesh compilation (`Mesh::from_asset`) - vertex/index/material
  buffers, texture resolution, material passes, mesh parts, draw lists and
  the shared `PipelineStateCache`
- **scene**: per-frame constants and the `MeshRenderer` that records draw
  lists into a command list
- **renderer**: backend traits (buffers, textures, shaders, pipelines,
  binding groups, command lists)
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;
pub mod asset;
pub mod resource;
pub mod scene;

// Main meshbatch namespace module
pub mod meshbatch {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Renderer factory trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Backend traits and descriptors
    pub mod render {
        pub use crate::renderer::*;
    }

    // Parsed model data
    pub mod asset {
        pub use crate::asset::*;
    }

    // Mesh compilation
    pub mod resource {
        pub use crate::resource::*;
    }

    // Per-frame drawing
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;

//! Scene-side drawing of compiled meshes
//!
//! Per-frame constant blocks and the `MeshRenderer` that records a mesh's
//! draw lists into a command list.

mod constants;
mod mesh_renderer;

pub use constants::{FrameContext, MeshTransform, MeshTransformConstants, PerDrawConstants};
pub use mesh_renderer::{DrawStats, MeshRenderer};
pub use crate::resource::DrawGroup;

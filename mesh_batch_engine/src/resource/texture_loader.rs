/// Texture-loading collaborator.
///
/// Mesh compilation never decodes images itself; it asks a `TextureLoader`
/// for each texture named by the asset, with the name joined onto
/// `MeshBuildConfig::texture_directory`.

use std::path::Path;
use std::sync::Arc;
use crate::error::Result;
use crate::renderer::Texture;

pub trait TextureLoader {
    /// Load (or fetch from a cache) the texture at `path`
    fn load(&self, path: &Path) -> Result<Arc<dyn Texture>>;

    /// Texture used in place of one that failed to load
    ///
    /// `None` (the default) makes a missing texture fail the mesh build.
    fn placeholder(&self) -> Option<Arc<dyn Texture>> {
        None
    }
}

// ============================================================================
// Mock loader (tests only)
// ============================================================================

#[cfg(test)]
pub use mock::MockTextureLoader;

/// Texture trait and texture info
///
/// Textures are created by the texture-loading collaborator, never by mesh
/// compilation; only the read-only side of the resource is modelled here.

/// Pixel format of a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_UNORM,
    BC1_RGBA_UNORM,
    BC3_RGBA_UNORM,
}

/// Sampler preset resolved by the backend when a texture is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerType {
    /// Linear filtering, repeat addressing (model textures scroll and tile)
    LinearRepeat,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Number of mip levels
    pub mip_levels: u32,
}

/// Texture resource trait
pub trait Texture: Send + Sync {
    /// Properties of this texture
    fn info(&self) -> &TextureInfo;
}

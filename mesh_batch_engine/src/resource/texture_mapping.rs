//! Texture-stage UV generation, in the layout the mesh shaders read.
//!
//! Each vertex material carries one `TextureMapping` per texture stage. The
//! mapping kind comes from the authored `StageMapping`; the scroll rate and
//! scale of linear-offset stages come from the material's mapper arguments.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use crate::asset::StageMapping;
use crate::error::Result;
use crate::{engine_bail, engine_warn};

/// UV generation mode evaluated by the shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureMappingType {
    /// Static per-vertex UVs
    Uv = 0,
    /// UVs derived from the view-space normal
    Environment = 1,
    /// UVs scrolled over time and scaled
    LinearOffset = 2,
}

impl TextureMappingType {
    /// Shader-facing mapping for an authored stage mapping
    ///
    /// Returns `None` for kinds the shaders don't implement.
    pub fn from_stage(mapping: StageMapping) -> Option<Self> {
        match mapping {
            StageMapping::Uv => Some(Self::Uv),
            StageMapping::Environment | StageMapping::CheapEnvironment => Some(Self::Environment),
            StageMapping::LinearOffset => Some(Self::LinearOffset),
            _ => None,
        }
    }
}

/// Parsed mapper arguments of one stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapperArgs {
    pub u_per_sec: f32,
    pub v_per_sec: f32,
    pub u_scale: f32,
    pub v_scale: f32,
}

impl Default for MapperArgs {
    fn default() -> Self {
        Self {
            u_per_sec: 0.0,
            v_per_sec: 0.0,
            u_scale: 1.0,
            v_scale: 1.0,
        }
    }
}

impl MapperArgs {
    /// Parse `key=value` lines
    ///
    /// Keys are matched case-insensitively; unknown keys are ignored. Text
    /// after `;` is a comment. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// `Error::DataIntegrity` for a non-empty line without `=`, or a known
    /// key whose value is not a float.
    pub fn parse(text: &str) -> Result<Self> {
        let mut args = Self::default();

        for raw_line in text.lines() {
            let line = raw_line.split(';').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                engine_bail!(DataIntegrity, "meshbatch::TextureMapping",
                    "mapper argument line '{}' has no '='", line);
            };

            let slot = match key.trim().to_ascii_lowercase().as_str() {
                "upersec" => &mut args.u_per_sec,
                "vpersec" => &mut args.v_per_sec,
                "uscale" => &mut args.u_scale,
                "vscale" => &mut args.v_scale,
                _ => continue,
            };

            *slot = match value.trim().parse::<f32>() {
                Ok(parsed) => parsed,
                Err(_) => engine_bail!(DataIntegrity, "meshbatch::TextureMapping",
                    "mapper argument '{}' has malformed value '{}'", key.trim(), value.trim()),
            };
        }

        Ok(args)
    }

    pub fn uv_per_sec(&self) -> Vec2 {
        Vec2::new(self.u_per_sec, self.v_per_sec)
    }

    pub fn uv_scale(&self) -> Vec2 {
        Vec2::new(self.u_scale, self.v_scale)
    }
}

/// GPU layout of a texture stage mapping (20 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TextureMapping {
    /// `TextureMappingType` as u32
    pub mapping_type: u32,
    pub uv_per_sec: Vec2,
    pub uv_scale: Vec2,
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self::new(TextureMappingType::Uv, Vec2::ZERO, Vec2::ONE)
    }
}

impl TextureMapping {
    pub fn new(mapping_type: TextureMappingType, uv_per_sec: Vec2, uv_scale: Vec2) -> Self {
        Self {
            mapping_type: mapping_type as u32,
            uv_per_sec,
            uv_scale,
        }
    }

    /// Build the mapping of one stage
    ///
    /// Mapper arguments are only read for linear-offset stages. Unsupported
    /// mapping kinds are drawn with static UVs and a warning is logged.
    pub fn from_stage(mapping: StageMapping, mapper_args: &str) -> Result<Self> {
        let mapping_type = match TextureMappingType::from_stage(mapping) {
            Some(mapping_type) => mapping_type,
            None => {
                engine_warn!("meshbatch::TextureMapping",
                    "Texture mapping {:?} is not supported, using static UVs", mapping);
                TextureMappingType::Uv
            }
        };

        if mapping_type != TextureMappingType::LinearOffset {
            return Ok(Self::new(mapping_type, Vec2::ZERO, Vec2::ONE));
        }

        let args = MapperArgs::parse(mapper_args)?;
        Ok(Self::new(mapping_type, args.uv_per_sec(), args.uv_scale()))
    }
}

#[cfg(test)]
#[path = "texture_mapping_tests.rs"]
mod tests;

/// Context configuration and current attribute values

use glam::{Vec3, Vec4};
use crate::array::summary::MAX_TEXTURE_UNITS;
use crate::error::Result;

/// Rendering context configuration
///
/// # Example
///
/// ```
/// use galaxy_3d_vertex_array::galaxy3d::ContextConfig;
///
/// let config = ContextConfig { vb_size: 64, ..Default::default() };
/// assert_eq!(config.chunk_capacity(), 61);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Working buffer slots
    pub vb_size: usize,
    /// Reserved head of the working buffer
    pub vb_start: usize,
    /// Texture coordinate streams (1..=4)
    pub max_texture_units: usize,
    /// Texture units fed by interleaved layouts (1..=max_texture_units)
    pub tex_coord_interleave_factor: usize,
    /// Whether locking compiles the vertex arrays (otherwise lock only records the range)
    pub cva_enabled: bool,
    /// Lock automatically around indexed draws with heavy vertex reuse
    pub auto_lock: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            vb_size: 216,
            vb_start: 3,
            max_texture_units: 2,
            tex_coord_interleave_factor: 1,
            cva_enabled: true,
            auto_lock: true,
        }
    }
}

impl ContextConfig {
    /// Vertices per chunk (K)
    pub fn chunk_capacity(&self) -> usize {
        self.vb_size.saturating_sub(self.vb_start)
    }

    /// Check the configuration
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the working buffer has no room for a
    /// vertex or a texture unit count is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.vb_start >= self.vb_size {
            crate::engine_bail!("galaxy3d::ContextConfig", InitializationFailed,
                "vb_start ({}) must be smaller than vb_size ({})", self.vb_start, self.vb_size);
        }
        if self.max_texture_units == 0 || self.max_texture_units > MAX_TEXTURE_UNITS {
            crate::engine_bail!("galaxy3d::ContextConfig", InitializationFailed,
                "max_texture_units must be in 1..={}, got {}", MAX_TEXTURE_UNITS, self.max_texture_units);
        }
        if self.tex_coord_interleave_factor == 0
            || self.tex_coord_interleave_factor > self.max_texture_units
        {
            crate::engine_bail!("galaxy3d::ContextConfig", InitializationFailed,
                "tex_coord_interleave_factor must be in 1..={}, got {}",
                self.max_texture_units, self.tex_coord_interleave_factor);
        }
        Ok(())
    }
}

/// Current attribute values, substituted for required but disabled arrays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentValues {
    pub normal: Vec3,
    pub color: [u8; 4],
    pub index: u32,
    pub edge_flag: bool,
    pub tex_coord: [Vec4; MAX_TEXTURE_UNITS],
}

impl Default for CurrentValues {
    fn default() -> Self {
        Self {
            normal: Vec3::Z,
            color: [255; 4],
            index: 1,
            edge_flag: true,
            tex_coord: [Vec4::W; MAX_TEXTURE_UNITS],
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Interleaved vertex record layouts
///
/// Expands one of the fourteen standard interleaved formats into individual
/// array descriptors. Colors stored as four unsigned bytes occupy a whole
/// float slot, so the next field stays float aligned.

use crate::array::array_store::ArrayStore;
use crate::array::types::{AttribStream, ElementType};
use crate::error::{Error, Result};
use crate::log::Verbosity;

const F: usize = std::mem::size_of::<f32>();
/// Four unsigned bytes rounded up to float alignment
const C: usize = F * ((4 + (F - 1)) / F);

/// Standard interleaved formats
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterleavedFormat {
    V2F,
    V3F,
    C4UB_V2F,
    C4UB_V3F,
    C3F_V3F,
    N3F_V3F,
    C4F_N3F_V3F,
    T2F_V3F,
    T4F_V4F,
    T2F_C4UB_V3F,
    T2F_C3F_V3F,
    T2F_N3F_V3F,
    T2F_C4F_N3F_V3F,
    T4F_C4F_N3F_V4F,
}

impl TryFrom<u32> for InterleavedFormat {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        use InterleavedFormat::*;
        Ok(match value {
            0x2A20 => V2F,
            0x2A21 => V3F,
            0x2A22 => C4UB_V2F,
            0x2A23 => C4UB_V3F,
            0x2A24 => C3F_V3F,
            0x2A25 => N3F_V3F,
            0x2A26 => C4F_N3F_V3F,
            0x2A27 => T2F_V3F,
            0x2A28 => T4F_V4F,
            0x2A29 => T2F_C4UB_V3F,
            0x2A2A => T2F_C3F_V3F,
            0x2A2B => T2F_N3F_V3F,
            0x2A2C => T2F_C4F_N3F_V3F,
            0x2A2D => T4F_C4F_N3F_V4F,
            _ => return Err(Error::InvalidEnum(format!("interleaved format 0x{:04X}", value))),
        })
    }
}

/// Color sub-stream of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorField {
    pub size: usize,
    pub ty: ElementType,
    pub offset: usize,
}

/// Component counts and byte offsets of one interleaved format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterleavedLayout {
    /// Texture coordinate components (always at offset 0)
    pub tex_coord: Option<usize>,
    pub color: Option<ColorField>,
    /// Normal offset (always 3 floats)
    pub normal: Option<usize>,
    /// Position components
    pub vertex_size: usize,
    pub vertex_offset: usize,
    /// Natural record size
    pub stride: usize,
}

impl InterleavedLayout {
    pub fn of(format: InterleavedFormat) -> Self {
        use InterleavedFormat::*;
        let ub = |offset| Some(ColorField { size: 4, ty: ElementType::UnsignedByte, offset });
        let fl = |size, offset| Some(ColorField { size, ty: ElementType::Float, offset });
        let (tex_coord, color, normal, vertex_size, vertex_offset, stride) = match format {
            V2F => (None, None, None, 2, 0, 2 * F),
            V3F => (None, None, None, 3, 0, 3 * F),
            C4UB_V2F => (None, ub(0), None, 2, C, C + 2 * F),
            C4UB_V3F => (None, ub(0), None, 3, C, C + 3 * F),
            C3F_V3F => (None, fl(3, 0), None, 3, 3 * F, 6 * F),
            N3F_V3F => (None, None, Some(0), 3, 3 * F, 6 * F),
            C4F_N3F_V3F => (None, fl(4, 0), Some(4 * F), 3, 7 * F, 10 * F),
            T2F_V3F => (Some(2), None, None, 3, 2 * F, 5 * F),
            T4F_V4F => (Some(4), None, None, 4, 4 * F, 8 * F),
            T2F_C4UB_V3F => (Some(2), ub(2 * F), None, 3, C + 2 * F, C + 5 * F),
            T2F_C3F_V3F => (Some(2), fl(3, 2 * F), None, 3, 5 * F, 8 * F),
            T2F_N3F_V3F => (Some(2), None, Some(2 * F), 3, 5 * F, 8 * F),
            T2F_C4F_N3F_V3F => (Some(2), fl(4, 2 * F), Some(6 * F), 3, 9 * F, 12 * F),
            T4F_C4F_N3F_V4F => (Some(4), fl(4, 4 * F), Some(8 * F), 4, 11 * F, 15 * F),
        };
        Self { tex_coord, color, normal, vertex_size, vertex_offset, stride }
    }
}

/// Bytes of `data` from `offset` on, empty when the record base is shorter
fn at(data: &[u8], offset: usize) -> &[u8] {
    data.get(offset..).unwrap_or(&[])
}

impl<'a> ArrayStore<'a> {
    /// Configure every client array from one interleaved record layout
    ///
    /// Edge flag and color index arrays are always disabled. Texture
    /// coordinates are fed to the first `interleave_factor` units, all reading
    /// the same record field; the remaining units are disabled.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a negative stride. Nothing changes on error.
    pub fn set_interleaved(
        &mut self,
        format: InterleavedFormat,
        stride: i32,
        data: &'a [u8],
        interleave_factor: usize,
    ) -> Result<()> {
        if stride < 0 {
            crate::engine_bail!("galaxy3d::ArrayStore", InvalidValue,
                "interleaved_arrays(stride {})", stride);
        }
        let layout = InterleavedLayout::of(format);
        let stride = if stride == 0 { layout.stride as i32 } else { stride };
        crate::engine_verbose!(Verbosity::API, "galaxy3d::ArrayStore",
            "interleaved_arrays({:?} stride {})", format, stride);

        self.set_enabled(AttribStream::EdgeFlag, false);
        self.set_enabled(AttribStream::Index, false);

        let factor = match layout.tex_coord {
            Some(_) => interleave_factor.min(self.texture_units()),
            None => 0,
        };
        for unit in 0..self.texture_units() {
            match layout.tex_coord {
                Some(size) if unit < factor => {
                    self.set_enabled(AttribStream::TexCoord(unit), true);
                    self.set_tex_coord(unit, size as i32, ElementType::Float, stride, data)?;
                }
                _ => self.set_enabled(AttribStream::TexCoord(unit), false),
            }
        }

        match layout.color {
            Some(color) => {
                self.set_enabled(AttribStream::Color, true);
                self.set_color(color.size as i32, color.ty, stride, at(data, color.offset))?;
            }
            None => self.set_enabled(AttribStream::Color, false),
        }

        match layout.normal {
            Some(offset) => {
                self.set_enabled(AttribStream::Normal, true);
                self.set_normal(ElementType::Float, stride, at(data, offset))?;
            }
            None => self.set_enabled(AttribStream::Normal, false),
        }

        self.set_enabled(AttribStream::Vertex, true);
        self.set_vertex(layout.vertex_size as i32, ElementType::Float, stride, at(data, layout.vertex_offset))
    }
}

#[cfg(test)]
#[path = "interleaved_tests.rs"]
mod tests;

/// Array descriptor store
///
/// One descriptor per attribute stream plus one per texture unit. A setter
/// validates every argument before it touches the descriptor, resolves the
/// byte stride and the two dispatch matrix entries, and marks the stream in
/// the pending change mask read by the summarizer.

use std::ops::RangeInclusive;
use glam::{Vec3, Vec4};
use crate::array::convert::{self, ClientArray, Converter};
use crate::array::summary::VertexFlags;
use crate::array::types::{AttribStream, ClientState, ElementType};
use crate::error::Result;
use crate::log::Verbosity;

const SOURCE: &str = "galaxy3d::ArrayStore";

const VERTEX_TYPES: &[ElementType] = &[
    ElementType::Short,
    ElementType::Int,
    ElementType::Float,
    ElementType::Double,
];

const NORMAL_TYPES: &[ElementType] = &[
    ElementType::Byte,
    ElementType::Short,
    ElementType::Int,
    ElementType::Float,
    ElementType::Double,
];

const COLOR_TYPES: &[ElementType] = &[
    ElementType::Byte,
    ElementType::UnsignedByte,
    ElementType::Short,
    ElementType::UnsignedShort,
    ElementType::Int,
    ElementType::UnsignedInt,
    ElementType::Float,
    ElementType::Double,
];

const INDEX_TYPES: &[ElementType] = &[
    ElementType::UnsignedByte,
    ElementType::Short,
    ElementType::Int,
    ElementType::Float,
    ElementType::Double,
];

const TEX_COORD_TYPES: &[ElementType] = &[
    ElementType::Short,
    ElementType::Int,
    ElementType::Float,
    ElementType::Double,
];

// ===== DESCRIPTOR =====

/// Client array descriptor
///
/// Holds the address and format of caller-owned memory, never a copy of it.
#[derive(Debug, Clone, Copy)]
pub struct ArrayDescriptor<'a, T> {
    pub enabled: bool,
    /// Components per element
    pub size: usize,
    pub ty: ElementType,
    /// Stride as specified (0 = tightly packed)
    pub stride: usize,
    /// Resolved byte stride, always > 0
    pub stride_b: usize,
    pub data: &'a [u8],
    converter: Converter<T>,
}

impl<'a, T> ArrayDescriptor<'a, T> {
    fn new(size: usize, ty: ElementType, converter: Converter<T>) -> Self {
        Self {
            enabled: false,
            size,
            ty,
            stride: 0,
            stride_b: size * ty.size_bytes(),
            data: &[],
            converter,
        }
    }

    /// Borrowed view for conversion
    pub fn client(&self) -> ClientArray<'a> {
        ClientArray {
            data: self.data,
            size: self.size,
            ty: self.ty,
            stride_b: self.stride_b,
        }
    }

    /// Dispatch matrix entry resolved for the current size and type
    pub fn converter(&self) -> Converter<T> {
        self.converter
    }

    /// Whether elements are already in canonical type and tightly packed
    pub fn is_packed(&self, canonical: ElementType) -> bool {
        self.ty == canonical && self.stride_b == self.client().element_bytes()
    }
}

/// Checked and resolved pointer arguments
struct Resolved {
    size: usize,
    ty: ElementType,
    stride: usize,
    stride_b: usize,
}

/// Validate size, then stride, then type, without touching any state
fn resolve(
    entry: &str,
    size: i32,
    sizes: RangeInclusive<i32>,
    ty: ElementType,
    allowed: &[ElementType],
    stride: i32,
) -> Result<Resolved> {
    if !sizes.contains(&size) {
        crate::engine_bail!(SOURCE, InvalidValue, "{}(size {})", entry, size);
    }
    if stride < 0 {
        crate::engine_bail!(SOURCE, InvalidValue, "{}(stride {})", entry, stride);
    }
    if !allowed.contains(&ty) {
        crate::engine_bail!(SOURCE, InvalidEnum, "{}(type {})", entry, ty);
    }
    let size = size as usize;
    let stride = stride as usize;
    let stride_b = if stride == 0 { size * ty.size_bytes() } else { stride };
    Ok(Resolved { size, ty, stride, stride_b })
}

// ===== STORE =====

/// All client array descriptors of one context
#[derive(Debug, Clone)]
pub struct ArrayStore<'a> {
    vertex: ArrayDescriptor<'a, Vec4>,
    normal: ArrayDescriptor<'a, Vec3>,
    color: ArrayDescriptor<'a, [u8; 4]>,
    index: ArrayDescriptor<'a, u32>,
    edge_flag: ArrayDescriptor<'a, u8>,
    tex_coord: Vec<ArrayDescriptor<'a, Vec4>>,
    client_active_texture: usize,
    /// Streams changed since the last summary
    new_array_state: VertexFlags,
}

impl<'a> ArrayStore<'a> {
    /// Create a store with every array disabled
    pub fn new(max_texture_units: usize) -> Self {
        let tex = || ArrayDescriptor::new(4, ElementType::Float, convert::trans_4f(4, ElementType::Float));
        Self {
            vertex: ArrayDescriptor::new(4, ElementType::Float, convert::trans_4f(4, ElementType::Float)),
            normal: ArrayDescriptor::new(3, ElementType::Float, convert::trans_3f(ElementType::Float)),
            color: ArrayDescriptor::new(4, ElementType::Float, convert::trans_4ub(4, ElementType::Float)),
            index: ArrayDescriptor::new(1, ElementType::Float, convert::trans_1ui(ElementType::Float)),
            edge_flag: ArrayDescriptor::new(
                1,
                ElementType::UnsignedByte,
                convert::trans_1ub(ElementType::UnsignedByte),
            ),
            tex_coord: (0..max_texture_units).map(|_| tex()).collect(),
            client_active_texture: 0,
            new_array_state: VertexFlags::empty(),
        }
    }

    // ===== DESCRIPTOR SETTERS =====

    /// Specify the position array (size 2..=4)
    pub fn set_vertex(&mut self, size: i32, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        let r = resolve("vertex_pointer", size, 2..=4, ty, VERTEX_TYPES, stride)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "vertex_pointer(size {} type {} stride {})", r.size, r.ty, r.stride);
        let converter = convert::trans_4f(r.size, r.ty);
        Self::apply(&mut self.vertex, r, data, converter);
        self.new_array_state |= VertexFlags::OBJ_234;
        Ok(())
    }

    /// Specify the normal array (always 3 components)
    pub fn set_normal(&mut self, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        let r = resolve("normal_pointer", 3, 3..=3, ty, NORMAL_TYPES, stride)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "normal_pointer(type {} stride {})", r.ty, r.stride);
        let converter = convert::trans_3f(r.ty);
        Self::apply(&mut self.normal, r, data, converter);
        self.new_array_state |= VertexFlags::NORM;
        Ok(())
    }

    /// Specify the color array (size 3..=4)
    pub fn set_color(&mut self, size: i32, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        let r = resolve("color_pointer", size, 3..=4, ty, COLOR_TYPES, stride)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "color_pointer(size {} type {} stride {})", r.size, r.ty, r.stride);
        let converter = convert::trans_4ub(r.size, r.ty);
        Self::apply(&mut self.color, r, data, converter);
        self.new_array_state |= VertexFlags::RGBA;
        Ok(())
    }

    /// Specify the color index array
    pub fn set_index(&mut self, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        let r = resolve("index_pointer", 1, 1..=1, ty, INDEX_TYPES, stride)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "index_pointer(type {} stride {})", r.ty, r.stride);
        let converter = convert::trans_1ui(r.ty);
        Self::apply(&mut self.index, r, data, converter);
        self.new_array_state |= VertexFlags::INDEX;
        Ok(())
    }

    /// Specify the texture coordinate array of `unit` (size 1..=4)
    pub fn set_tex_coord(
        &mut self,
        unit: usize,
        size: i32,
        ty: ElementType,
        stride: i32,
        data: &'a [u8],
    ) -> Result<()> {
        if unit >= self.tex_coord.len() {
            crate::engine_bail!(SOURCE, InvalidEnum,
                "tex_coord_pointer(unit {}), {} units available", unit, self.tex_coord.len());
        }
        let r = resolve("tex_coord_pointer", size, 1..=4, ty, TEX_COORD_TYPES, stride)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "tex_coord_pointer(unit {} size {} type {} stride {})", unit, r.size, r.ty, r.stride);
        let converter = convert::trans_4f(r.size, r.ty);
        Self::apply(&mut self.tex_coord[unit], r, data, converter);
        self.new_array_state |= VertexFlags::tex_any(unit);
        Ok(())
    }

    /// Specify the edge flag array (one unsigned byte per vertex)
    pub fn set_edge_flag(&mut self, stride: i32, data: &'a [u8]) -> Result<()> {
        let r = resolve("edge_flag_pointer", 1, 1..=1, ElementType::UnsignedByte,
            &[ElementType::UnsignedByte], stride)?;
        crate::engine_verbose!(Verbosity::API, SOURCE, "edge_flag_pointer(stride {})", r.stride);
        let converter = convert::trans_1ub(ElementType::UnsignedByte);
        Self::apply(&mut self.edge_flag, r, data, converter);
        self.new_array_state |= VertexFlags::EDGE;
        Ok(())
    }

    fn apply<T>(desc: &mut ArrayDescriptor<'a, T>, r: Resolved, data: &'a [u8], converter: Converter<T>) {
        desc.size = r.size;
        desc.ty = r.ty;
        desc.stride = r.stride;
        desc.stride_b = r.stride_b;
        desc.data = data;
        desc.converter = converter;
    }

    // ===== ENABLEMENT =====

    /// Enable or disable one client array
    ///
    /// `TextureCoordArray` targets the client-active texture unit.
    pub fn set_client_state(&mut self, state: ClientState, enabled: bool) {
        let stream = match state {
            ClientState::VertexArray => AttribStream::Vertex,
            ClientState::NormalArray => AttribStream::Normal,
            ClientState::ColorArray => AttribStream::Color,
            ClientState::IndexArray => AttribStream::Index,
            ClientState::EdgeFlagArray => AttribStream::EdgeFlag,
            ClientState::TextureCoordArray => AttribStream::TexCoord(self.client_active_texture),
        };
        self.set_enabled(stream, enabled);
    }

    /// Enable or disable one attribute stream
    ///
    /// Texture units past the configured count are ignored. A call that does
    /// not change the enablement leaves the change mask untouched.
    pub fn set_enabled(&mut self, stream: AttribStream, enabled: bool) {
        let (slot, flag) = match stream {
            AttribStream::Vertex => (&mut self.vertex.enabled, VertexFlags::OBJ_234),
            AttribStream::Normal => (&mut self.normal.enabled, VertexFlags::NORM),
            AttribStream::Color => (&mut self.color.enabled, VertexFlags::RGBA),
            AttribStream::Index => (&mut self.index.enabled, VertexFlags::INDEX),
            AttribStream::EdgeFlag => (&mut self.edge_flag.enabled, VertexFlags::EDGE),
            AttribStream::TexCoord(unit) => match self.tex_coord.get_mut(unit) {
                Some(desc) => (&mut desc.enabled, VertexFlags::tex_any(unit)),
                None => return,
            },
        };
        if *slot != enabled {
            *slot = enabled;
            self.new_array_state |= flag;
        }
    }

    /// Select the unit targeted by `set_client_state(TextureCoordArray)`
    pub fn set_client_active_texture(&mut self, unit: usize) -> Result<()> {
        if unit >= self.tex_coord.len() {
            crate::engine_bail!(SOURCE, InvalidEnum,
                "client_active_texture(unit {}), {} units available", unit, self.tex_coord.len());
        }
        self.client_active_texture = unit;
        Ok(())
    }

    pub fn client_active_texture(&self) -> usize {
        self.client_active_texture
    }

    // ===== SUMMARY SUPPORT =====

    /// Active arrays with their width bits
    pub fn array_flags(&self) -> VertexFlags {
        let mut flags = VertexFlags::empty();
        if self.normal.enabled {
            flags |= VertexFlags::NORM;
        }
        if self.color.enabled {
            flags |= VertexFlags::RGBA;
        }
        if self.index.enabled {
            flags |= VertexFlags::INDEX;
        }
        if self.edge_flag.enabled {
            flags |= VertexFlags::EDGE;
        }
        if self.vertex.enabled {
            flags |= VertexFlags::obj_size(self.vertex.size);
        }
        for (unit, tc) in self.tex_coord.iter().enumerate() {
            if tc.enabled {
                flags |= VertexFlags::tex_size(unit, tc.size);
            }
        }
        flags
    }

    /// Streams changed since the last summary
    pub fn dirty(&self) -> VertexFlags {
        self.new_array_state
    }

    /// Read and clear the change mask
    pub fn take_dirty(&mut self) -> VertexFlags {
        std::mem::take(&mut self.new_array_state)
    }

    // ===== ACCESSORS =====

    pub fn vertex(&self) -> &ArrayDescriptor<'a, Vec4> {
        &self.vertex
    }

    pub fn normal(&self) -> &ArrayDescriptor<'a, Vec3> {
        &self.normal
    }

    pub fn color(&self) -> &ArrayDescriptor<'a, [u8; 4]> {
        &self.color
    }

    pub fn index(&self) -> &ArrayDescriptor<'a, u32> {
        &self.index
    }

    pub fn edge_flag(&self) -> &ArrayDescriptor<'a, u8> {
        &self.edge_flag
    }

    /// Texture coordinate descriptor of `unit`, if the unit exists
    pub fn tex_coord(&self, unit: usize) -> Option<&ArrayDescriptor<'a, Vec4>> {
        self.tex_coord.get(unit)
    }

    pub fn texture_units(&self) -> usize {
        self.tex_coord.len()
    }
}

#[cfg(test)]
#[path = "array_store_tests.rs"]
mod tests;

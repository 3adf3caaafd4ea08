/// Enumerated argument types for the vertex array entry points
///
/// Each enum mirrors one GL enumerant family and decodes the raw value with
/// `TryFrom<u32>`, reporting `InvalidEnum` for anything outside the family.

use std::fmt;
use crate::error::{Error, Result};

// ===== GL ENUMERANTS =====

pub const GL_BYTE: u32 = 0x1400;
pub const GL_UNSIGNED_BYTE: u32 = 0x1401;
pub const GL_SHORT: u32 = 0x1402;
pub const GL_UNSIGNED_SHORT: u32 = 0x1403;
pub const GL_INT: u32 = 0x1404;
pub const GL_UNSIGNED_INT: u32 = 0x1405;
pub const GL_FLOAT: u32 = 0x1406;
pub const GL_DOUBLE: u32 = 0x140A;

pub const GL_VERTEX_ARRAY: u32 = 0x8074;
pub const GL_NORMAL_ARRAY: u32 = 0x8075;
pub const GL_COLOR_ARRAY: u32 = 0x8076;
pub const GL_INDEX_ARRAY: u32 = 0x8077;
pub const GL_TEXTURE_COORD_ARRAY: u32 = 0x8078;
pub const GL_EDGE_FLAG_ARRAY: u32 = 0x8079;

// ===== ELEMENT TYPE =====

/// Source element type of a client array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
    Double,
}

impl ElementType {
    /// Number of element types (column count of the dispatch tables)
    pub const COUNT: usize = 8;

    /// Size in bytes of one component
    pub fn size_bytes(&self) -> usize {
        match self {
            ElementType::Byte | ElementType::UnsignedByte => 1,
            ElementType::Short | ElementType::UnsignedShort => 2,
            ElementType::Int | ElementType::UnsignedInt | ElementType::Float => 4,
            ElementType::Double => 8,
        }
    }

    /// Column of this type in the dispatch tables
    pub fn table_index(&self) -> usize {
        match self {
            ElementType::Byte => 0,
            ElementType::UnsignedByte => 1,
            ElementType::Short => 2,
            ElementType::UnsignedShort => 3,
            ElementType::Int => 4,
            ElementType::UnsignedInt => 5,
            ElementType::Float => 6,
            ElementType::Double => 7,
        }
    }

    /// GL enumerant name, for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Byte => "GL_BYTE",
            ElementType::UnsignedByte => "GL_UNSIGNED_BYTE",
            ElementType::Short => "GL_SHORT",
            ElementType::UnsignedShort => "GL_UNSIGNED_SHORT",
            ElementType::Int => "GL_INT",
            ElementType::UnsignedInt => "GL_UNSIGNED_INT",
            ElementType::Float => "GL_FLOAT",
            ElementType::Double => "GL_DOUBLE",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for ElementType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            GL_BYTE => ElementType::Byte,
            GL_UNSIGNED_BYTE => ElementType::UnsignedByte,
            GL_SHORT => ElementType::Short,
            GL_UNSIGNED_SHORT => ElementType::UnsignedShort,
            GL_INT => ElementType::Int,
            GL_UNSIGNED_INT => ElementType::UnsignedInt,
            GL_FLOAT => ElementType::Float,
            GL_DOUBLE => ElementType::Double,
            _ => return Err(Error::InvalidEnum(format!("element type 0x{:04X}", value))),
        })
    }
}

// ===== INDEX TYPE =====

/// Element type of an index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

impl TryFrom<u32> for IndexType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            GL_UNSIGNED_BYTE => Ok(IndexType::U8),
            GL_UNSIGNED_SHORT => Ok(IndexType::U16),
            GL_UNSIGNED_INT => Ok(IndexType::U32),
            _ => Err(Error::InvalidEnum(format!("index type 0x{:04X}", value))),
        }
    }
}

/// A borrowed index buffer
///
/// Keeps the caller's storage width; indexed draws are generic over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indices<'i> {
    U8(&'i [u8]),
    U16(&'i [u16]),
    U32(&'i [u32]),
}

impl<'i> Indices<'i> {
    /// Reinterpret raw bytes as an index buffer of the given type
    ///
    /// Fails with `InvalidValue` if the bytes are misaligned for the type or
    /// their length is not a multiple of the index size.
    pub fn from_bytes(index_type: IndexType, bytes: &'i [u8]) -> Result<Self> {
        let cast_err = |e: bytemuck::PodCastError| {
            Error::InvalidValue(format!("index buffer is not a valid {:?} slice: {:?}", index_type, e))
        };
        Ok(match index_type {
            IndexType::U8 => Indices::U8(bytes),
            IndexType::U16 => Indices::U16(bytemuck::try_cast_slice(bytes).map_err(cast_err)?),
            IndexType::U32 => Indices::U32(bytemuck::try_cast_slice(bytes).map_err(cast_err)?),
        })
    }

    pub fn index_type(&self) -> IndexType {
        match self {
            Indices::U8(_) => IndexType::U8,
            Indices::U16(_) => IndexType::U16,
            Indices::U32(_) => IndexType::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Indices::U8(s) => s.len(),
            Indices::U16(s) => s.len(),
            Indices::U32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index value at position `i`, widened to u32
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Indices::U8(s) => s.get(i).map(|&v| v as u32),
            Indices::U16(s) => s.get(i).map(|&v| v as u32),
            Indices::U32(s) => s.get(i).copied(),
        }
    }

    /// The first `count` indices
    ///
    /// `count` is clamped to the buffer length.
    pub fn truncated(&self, count: usize) -> Indices<'i> {
        match *self {
            Indices::U8(s) => Indices::U8(&s[..count.min(s.len())]),
            Indices::U16(s) => Indices::U16(&s[..count.min(s.len())]),
            Indices::U32(s) => Indices::U32(&s[..count.min(s.len())]),
        }
    }

    /// Smallest and largest index value, or None for an empty buffer
    pub fn bounds(&self) -> Option<(u32, u32)> {
        (0..self.len())
            .filter_map(|i| self.get(i))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ===== PRIMITIVE TOPOLOGY =====

/// Primitive topology of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    Polygon,
}

impl PrimitiveTopology {
    /// Whether per-vertex edge flags affect this topology
    pub fn uses_edge_flags(&self) -> bool {
        matches!(
            self,
            PrimitiveTopology::Triangles | PrimitiveTopology::Quads | PrimitiveTopology::Polygon
        )
    }
}

impl TryFrom<u32> for PrimitiveTopology {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            0 => PrimitiveTopology::Points,
            1 => PrimitiveTopology::Lines,
            2 => PrimitiveTopology::LineLoop,
            3 => PrimitiveTopology::LineStrip,
            4 => PrimitiveTopology::Triangles,
            5 => PrimitiveTopology::TriangleStrip,
            6 => PrimitiveTopology::TriangleFan,
            7 => PrimitiveTopology::Quads,
            8 => PrimitiveTopology::QuadStrip,
            9 => PrimitiveTopology::Polygon,
            _ => return Err(Error::InvalidEnum(format!("primitive mode 0x{:04X}", value))),
        })
    }
}

// ===== ATTRIBUTE STREAMS =====

/// One per-vertex data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttribStream {
    Vertex,
    Normal,
    Color,
    Index,
    EdgeFlag,
    /// Texture coordinates of one texture unit
    TexCoord(usize),
}

/// Client array enable/disable targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientState {
    VertexArray,
    NormalArray,
    ColorArray,
    IndexArray,
    /// Texture coordinates of the client-active texture unit
    TextureCoordArray,
    EdgeFlagArray,
}

impl TryFrom<u32> for ClientState {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            GL_VERTEX_ARRAY => ClientState::VertexArray,
            GL_NORMAL_ARRAY => ClientState::NormalArray,
            GL_COLOR_ARRAY => ClientState::ColorArray,
            GL_INDEX_ARRAY => ClientState::IndexArray,
            GL_TEXTURE_COORD_ARRAY => ClientState::TextureCoordArray,
            GL_EDGE_FLAG_ARRAY => ClientState::EdgeFlagArray,
            _ => return Err(Error::InvalidEnum(format!("client state 0x{:04X}", value))),
        })
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

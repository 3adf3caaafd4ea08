/// Type dispatch matrix
///
/// Static tables of conversion functions indexed by (component count, source
/// element type). Each entry has two variants: `range` converts a dense run of
/// vertices, `elt` converts the vertices named by an element list. Entries are
/// resolved once when an array is specified and cached on its descriptor.
///
/// Canonical encodings:
///
/// | table | output | used by |
/// |---|---|---|
/// | `trans_4f` | `Vec4`, missing components (0, 0, 0, 1) | position, texcoord |
/// | `trans_3f` | `Vec3`, integers normalized | normal |
/// | `trans_4ub` | `[u8; 4]`, missing alpha 255 | color |
/// | `trans_1ui` | `u32` | color index |
/// | `trans_1ub` | `u8` 0/1 | edge flag |
///
/// Client memory is read through byte offsets. A read past the end of the
/// client slice panics; keeping the slice large enough for every vertex a draw
/// references is the caller's contract.

use std::marker::PhantomData;
use std::mem::size_of;
use glam::{Vec3, Vec4};
use crate::array::summary::VertexFlags;
use crate::array::types::ElementType;

// ===== CLIENT ARRAY VIEW =====

/// Borrowed, read-only view of one client array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientArray<'a> {
    /// Client bytes, starting at element 0
    pub data: &'a [u8],
    /// Components per element
    pub size: usize,
    /// Component type
    pub ty: ElementType,
    /// Byte distance between consecutive elements (0 = every element aliases element 0)
    pub stride_b: usize,
}

impl<'a> ClientArray<'a> {
    /// Bytes of one element
    pub fn element_bytes(&self) -> usize {
        self.size * self.ty.size_bytes()
    }

    /// Byte window covering `count` elements starting at `first`
    ///
    /// Empty when `count` is 0.
    pub fn window(&self, first: usize, count: usize) -> &'a [u8] {
        if count == 0 {
            return &[];
        }
        let begin = first * self.stride_b;
        let end = (first + count - 1) * self.stride_b + self.element_bytes();
        &self.data[begin..end]
    }

    /// Component `k` of element `vertex`
    pub fn read<C: Component>(&self, vertex: usize, k: usize) -> C {
        let offset = vertex * self.stride_b + k * size_of::<C>();
        bytemuck::pod_read_unaligned(&self.data[offset..offset + size_of::<C>()])
    }
}

// ===== COMPONENT CONVERSIONS =====

/// A client component type
pub trait Component: bytemuck::Pod {
    /// Raw numeric cast
    fn to_f32(self) -> f32;
    /// Signed types map to [-1, 1], unsigned to [0, 1], floats unchanged
    fn to_norm_f32(self) -> f32;
    /// Color channel, 0..=255
    fn to_ubyte(self) -> u8;
    /// Raw numeric cast
    fn to_u32(self) -> u32;
}

fn float_to_ubyte(f: f32) -> u8 {
    (f.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Component for i8 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        (2.0 * self as f32 + 1.0) / 255.0
    }
    fn to_ubyte(self) -> u8 {
        if self < 0 { 0 } else { (self as u32 * 255 / 127) as u8 }
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Component for u8 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        self as f32 / 255.0
    }
    fn to_ubyte(self) -> u8 {
        self
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Component for i16 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        (2.0 * self as f32 + 1.0) / 65535.0
    }
    fn to_ubyte(self) -> u8 {
        if self < 0 { 0 } else { (self >> 7) as u8 }
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Component for u16 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        self as f32 / 65535.0
    }
    fn to_ubyte(self) -> u8 {
        (self >> 8) as u8
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Component for i32 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        ((2.0 * self as f64 + 1.0) / 4294967295.0) as f32
    }
    fn to_ubyte(self) -> u8 {
        if self < 0 { 0 } else { (self >> 23) as u8 }
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Component for u32 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        (self as f64 / 4294967295.0) as f32
    }
    fn to_ubyte(self) -> u8 {
        (self >> 24) as u8
    }
    fn to_u32(self) -> u32 {
        self
    }
}

impl Component for f32 {
    fn to_f32(self) -> f32 {
        self
    }
    fn to_norm_f32(self) -> f32 {
        self
    }
    fn to_ubyte(self) -> u8 {
        float_to_ubyte(self)
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Component for f64 {
    fn to_f32(self) -> f32 {
        self as f32
    }
    fn to_norm_f32(self) -> f32 {
        self as f32
    }
    fn to_ubyte(self) -> u8 {
        float_to_ubyte(self as f32)
    }
    fn to_u32(self) -> u32 {
        self as u32
    }
}

// ===== ELEMENT LOADERS =====

/// Reads one whole element in canonical form
trait Load<T> {
    fn load(src: &ClientArray<'_>, vertex: usize) -> T;
}

struct Load4f<C, const N: usize>(PhantomData<C>);
struct Load3f<C>(PhantomData<C>);
struct Load4ub<C, const N: usize>(PhantomData<C>);
struct Load1ui<C>(PhantomData<C>);
struct Load1ub<C>(PhantomData<C>);

impl<C: Component, const N: usize> Load<Vec4> for Load4f<C, N> {
    #[inline]
    fn load(src: &ClientArray<'_>, vertex: usize) -> Vec4 {
        let mut out = [0.0, 0.0, 0.0, 1.0];
        for (k, o) in out.iter_mut().enumerate().take(N) {
            *o = src.read::<C>(vertex, k).to_f32();
        }
        Vec4::from_array(out)
    }
}

impl<C: Component> Load<Vec3> for Load3f<C> {
    #[inline]
    fn load(src: &ClientArray<'_>, vertex: usize) -> Vec3 {
        Vec3::new(
            src.read::<C>(vertex, 0).to_norm_f32(),
            src.read::<C>(vertex, 1).to_norm_f32(),
            src.read::<C>(vertex, 2).to_norm_f32(),
        )
    }
}

impl<C: Component, const N: usize> Load<[u8; 4]> for Load4ub<C, N> {
    #[inline]
    fn load(src: &ClientArray<'_>, vertex: usize) -> [u8; 4] {
        let mut out = [0, 0, 0, 255];
        for (k, o) in out.iter_mut().enumerate().take(N) {
            *o = src.read::<C>(vertex, k).to_ubyte();
        }
        out
    }
}

impl<C: Component> Load<u32> for Load1ui<C> {
    #[inline]
    fn load(src: &ClientArray<'_>, vertex: usize) -> u32 {
        src.read::<C>(vertex, 0).to_u32()
    }
}

impl<C: Component> Load<u8> for Load1ub<C> {
    #[inline]
    fn load(src: &ClientArray<'_>, vertex: usize) -> u8 {
        (src.read::<C>(vertex, 0).to_f32() != 0.0) as u8
    }
}

// ===== CONVERTERS =====

/// Convert `out.len()` consecutive elements starting at element `start`
pub type RangeFn<T> = fn(out: &mut [T], src: &ClientArray<'_>, start: usize);

/// Convert the elements named by `elts`
///
/// Slot `i` is written only where `flags[i] & mask == ELT`, so a vertex that
/// already received the attribute explicitly keeps it.
pub type EltFn<T> =
    fn(out: &mut [T], src: &ClientArray<'_>, elts: &[u32], flags: &[VertexFlags], mask: VertexFlags);

/// One dispatch matrix entry
pub struct Converter<T> {
    pub range: RangeFn<T>,
    pub elt: EltFn<T>,
}

impl<T> Clone for Converter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Converter<T> {}

impl<T> std::fmt::Debug for Converter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}

fn convert_range<T, L: Load<T>>(out: &mut [T], src: &ClientArray<'_>, start: usize) {
    for (i, o) in out.iter_mut().enumerate() {
        *o = L::load(src, start + i);
    }
}

fn convert_elts<T, L: Load<T>>(
    out: &mut [T],
    src: &ClientArray<'_>,
    elts: &[u32],
    flags: &[VertexFlags],
    mask: VertexFlags,
) {
    for ((o, &elt), &flag) in out.iter_mut().zip(elts).zip(flags) {
        if flag & mask == VertexFlags::ELT {
            *o = L::load(src, elt as usize);
        }
    }
}

/// One table row: the eight element types, in `ElementType::table_index` order
macro_rules! converter_row {
    ($out:ty, $load:ident $(, $n:literal)?) => {
        [
            Converter { range: convert_range::<$out, $load<i8 $(, $n)?>>, elt: convert_elts::<$out, $load<i8 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<u8 $(, $n)?>>, elt: convert_elts::<$out, $load<u8 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<i16 $(, $n)?>>, elt: convert_elts::<$out, $load<i16 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<u16 $(, $n)?>>, elt: convert_elts::<$out, $load<u16 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<i32 $(, $n)?>>, elt: convert_elts::<$out, $load<i32 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<u32 $(, $n)?>>, elt: convert_elts::<$out, $load<u32 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<f32 $(, $n)?>>, elt: convert_elts::<$out, $load<f32 $(, $n)?>> },
            Converter { range: convert_range::<$out, $load<f64 $(, $n)?>>, elt: convert_elts::<$out, $load<f64 $(, $n)?>> },
        ]
    };
}

static TRANS_4F: [[Converter<Vec4>; ElementType::COUNT]; 4] = [
    converter_row!(Vec4, Load4f, 1),
    converter_row!(Vec4, Load4f, 2),
    converter_row!(Vec4, Load4f, 3),
    converter_row!(Vec4, Load4f, 4),
];

static TRANS_3F: [Converter<Vec3>; ElementType::COUNT] = converter_row!(Vec3, Load3f);

static TRANS_4UB: [[Converter<[u8; 4]>; ElementType::COUNT]; 4] = [
    converter_row!([u8; 4], Load4ub, 1),
    converter_row!([u8; 4], Load4ub, 2),
    converter_row!([u8; 4], Load4ub, 3),
    converter_row!([u8; 4], Load4ub, 4),
];

static TRANS_1UI: [Converter<u32>; ElementType::COUNT] = converter_row!(u32, Load1ui);

static TRANS_1UB: [Converter<u8>; ElementType::COUNT] = converter_row!(u8, Load1ub);

// ===== TABLE LOOKUP =====
//
// `size` must already be validated against the stream's range (1..=4).

/// Position / texcoord converter
pub fn trans_4f(size: usize, ty: ElementType) -> Converter<Vec4> {
    TRANS_4F[size.clamp(1, 4) - 1][ty.table_index()]
}

/// Normal converter
pub fn trans_3f(ty: ElementType) -> Converter<Vec3> {
    TRANS_3F[ty.table_index()]
}

/// Color converter
pub fn trans_4ub(size: usize, ty: ElementType) -> Converter<[u8; 4]> {
    TRANS_4UB[size.clamp(1, 4) - 1][ty.table_index()]
}

/// Color index converter
pub fn trans_1ui(ty: ElementType) -> Converter<u32> {
    TRANS_1UI[ty.table_index()]
}

/// Edge flag converter
pub fn trans_1ub(ty: ElementType) -> Converter<u8> {
    TRANS_1UB[ty.table_index()]
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;

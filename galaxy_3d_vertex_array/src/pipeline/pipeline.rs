/// Downstream vertex pipeline interface
///
/// The transform/lighting/render pipeline that consumes the working buffer is
/// an external collaborator. The context talks to it through this trait and
/// hands it one read-only [`Chunk`] per batch.

use std::ops::Range;
use bitflags::bitflags;
use glam::{Vec3, Vec4};
use crate::array::array_store::ArrayStore;
use crate::array::convert::ClientArray;
use crate::array::summary::{ArraySummary, VertexFlags, MAX_TEXTURE_UNITS};
use crate::array::types::{Indices, PrimitiveTopology};

bitflags! {
    /// Pipeline stages
    ///
    /// Returned by [`VertexPipeline::precalc`] to report which stages were
    /// resolved ahead of per-chunk processing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PipelineOps: u32 {
        const VERT_XFORM = 1 << 0;
        const NORM_XFORM = 1 << 1;
        const LIGHT = 1 << 2;
        const FOG = 1 << 3;
        const TEX = 1 << 4;
        const RAST_SETUP = 1 << 5;
        /// Rendering itself was precalculated: the draw needs no chunk
        const RENDER = 1 << 6;
    }
}

// ===== CANONICAL ATTRIBUTES =====

/// A canonical attribute type, readable from aliased client memory
///
/// Aliased arrays always hold the canonical component type, so reading them
/// is a plain unaligned load.
pub trait CanonicalAttrib: Copy {
    fn read_aliased(src: &ClientArray<'_>, i: usize) -> Self;
}

impl CanonicalAttrib for Vec4 {
    fn read_aliased(src: &ClientArray<'_>, i: usize) -> Self {
        let mut out = [0.0, 0.0, 0.0, 1.0];
        for (k, o) in out.iter_mut().enumerate().take(src.size) {
            *o = src.read::<f32>(i, k);
        }
        Vec4::from_array(out)
    }
}

impl CanonicalAttrib for Vec3 {
    fn read_aliased(src: &ClientArray<'_>, i: usize) -> Self {
        Vec3::new(src.read::<f32>(i, 0), src.read::<f32>(i, 1), src.read::<f32>(i, 2))
    }
}

impl CanonicalAttrib for [u8; 4] {
    fn read_aliased(src: &ClientArray<'_>, i: usize) -> Self {
        [src.read(i, 0), src.read(i, 1), src.read(i, 2), src.read(i, 3)]
    }
}

impl CanonicalAttrib for u32 {
    fn read_aliased(src: &ClientArray<'_>, i: usize) -> Self {
        src.read(i, 0)
    }
}

impl CanonicalAttrib for u8 {
    fn read_aliased(src: &ClientArray<'_>, i: usize) -> Self {
        src.read(i, 0)
    }
}

/// One attribute of a chunk
#[derive(Debug, Clone, Copy)]
pub enum AttribArray<'v, T> {
    /// Client memory used in place; element 0 is the chunk's first vertex
    Aliased(ClientArray<'v>),
    /// Converted values in the working buffer
    Converted(&'v [T]),
}

impl<'v, T: CanonicalAttrib> AttribArray<'v, T> {
    /// Value of the chunk's `i`-th vertex
    pub fn get(&self, i: usize) -> T {
        match self {
            AttribArray::Aliased(src) => T::read_aliased(src, i),
            AttribArray::Converted(values) => values[i],
        }
    }

    pub fn is_aliased(&self) -> bool {
        matches!(self, AttribArray::Aliased(_))
    }

    /// Client bytes behind an aliased array
    pub fn as_bytes(&self) -> Option<&'v [u8]> {
        match self {
            AttribArray::Aliased(src) => Some(src.data),
            AttribArray::Converted(_) => None,
        }
    }
}

// ===== CHUNK =====

/// One batch of vertices handed to the pipeline
#[derive(Debug, Clone)]
pub struct Chunk<'v> {
    pub primitive: PrimitiveTopology,
    /// Logical index of the chunk's first vertex
    pub first: usize,
    pub count: usize,
    /// The chunk starts the primitive
    pub is_first: bool,
    /// The chunk ends the primitive
    pub is_last: bool,
    /// `count + 1` flag words; the last one carries `END_VB`
    pub flags: &'v [VertexFlags],
    pub obj: AttribArray<'v, Vec4>,
    pub normal: Option<AttribArray<'v, Vec3>>,
    pub color: Option<AttribArray<'v, [u8; 4]>>,
    pub index: Option<AttribArray<'v, u32>>,
    pub edge_flag: Option<AttribArray<'v, u8>>,
    pub tex_coord: [Option<AttribArray<'v, Vec4>>; MAX_TEXTURE_UNITS],
}

// ===== PIPELINE TRAIT =====

/// Downstream transform/render pipeline
pub trait VertexPipeline {
    /// Attributes the pipeline reads
    fn inputs(&self) -> VertexFlags;

    /// Rebuild the immediate pipeline after a client state change or relock
    fn build_immediate(&mut self, summary: &ArraySummary);

    /// Process one chunk
    fn run(&mut self, chunk: &Chunk<'_>);

    /// One-time pass over a locked vertex range
    ///
    /// Returns the stages resolved ahead of per-chunk processing.
    fn precalc(
        &mut self,
        range: Range<usize>,
        summary: &ArraySummary,
        arrays: &ArrayStore<'_>,
    ) -> PipelineOps;

    /// Render an indexed draw entirely from precalculated data
    fn render_elements(&mut self, mode: PrimitiveTopology, indices: Indices<'_>);
}

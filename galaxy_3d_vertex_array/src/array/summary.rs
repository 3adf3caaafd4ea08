/// Per-vertex flag words and the client array state summary
///
/// `VertexFlags` is shared by three consumers: the summary of which client
/// arrays are active, the per-vertex flag words stamped into the working
/// buffer, and the downstream pipeline's declared inputs.

use bitflags::bitflags;
use crate::array::array_store::ArrayStore;

/// Maximum number of texture coordinate streams
pub const MAX_TEXTURE_UNITS: usize = 4;

/// First bit of the per-unit texture coordinate size flags
const TEX_SHIFT: u32 = 9;
/// Bits used per texture unit (one per coordinate count)
const TEX_BITS_PER_UNIT: u32 = 4;

bitflags! {
    /// Attribute presence bits
    ///
    /// Position and texture coordinate widths are cumulative: a 3 component
    /// position sets `OBJ_2 | OBJ_3`, a 2 component texcoord on unit 0 sets
    /// the first two bits of unit 0.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexFlags: u32 {
        const OBJ_2 = 1 << 0;
        const OBJ_3 = 1 << 1;
        const OBJ_4 = 1 << 2;
        const NORM = 1 << 3;
        const RGBA = 1 << 4;
        const INDEX = 1 << 5;
        const EDGE = 1 << 6;
        /// Vertex is an array element reference still to be replayed
        const ELT = 1 << 7;
        /// Sentinel on the slot after the last vertex of a chunk
        const END_VB = 1 << 8;
        /// Every texture coordinate bit of every unit
        const TEX_ALL = 0xFFFF << 9;

        const OBJ_23 = Self::OBJ_2.bits() | Self::OBJ_3.bits();
        const OBJ_234 = Self::OBJ_23.bits() | Self::OBJ_4.bits();
        /// Every attribute data bit
        const DATA = Self::OBJ_234.bits()
            | Self::NORM.bits()
            | Self::RGBA.bits()
            | Self::INDEX.bits()
            | Self::EDGE.bits()
            | Self::TEX_ALL.bits();
    }
}

impl VertexFlags {
    /// Cumulative position width flags for a `size` component position
    pub fn obj_size(size: usize) -> Self {
        match size {
            2 => Self::OBJ_2,
            3 => Self::OBJ_23,
            4 => Self::OBJ_234,
            _ => Self::empty(),
        }
    }

    /// Cumulative width flags for a `size` component texcoord on `unit`
    pub fn tex_size(unit: usize, size: usize) -> Self {
        if unit >= MAX_TEXTURE_UNITS || size == 0 {
            return Self::empty();
        }
        let bits = (1u32 << size.min(TEX_BITS_PER_UNIT as usize)) - 1;
        Self::from_bits_retain(bits << (TEX_SHIFT + unit as u32 * TEX_BITS_PER_UNIT))
    }

    /// All texture coordinate bits of `unit`
    pub fn tex_any(unit: usize) -> Self {
        Self::tex_size(unit, TEX_BITS_PER_UNIT as usize)
    }

    /// Whether any position width bit is set
    pub fn has_obj(&self) -> bool {
        self.intersects(Self::OBJ_234)
    }

    /// Per-stream groups, in the order the summarizer walks them
    fn stream_groups() -> impl Iterator<Item = VertexFlags> {
        [Self::OBJ_234, Self::NORM, Self::RGBA, Self::INDEX, Self::EDGE]
            .into_iter()
            .chain((0..MAX_TEXTURE_UNITS).map(Self::tex_any))
    }
}

/// Summary of the client array state
///
/// Recomputed lazily before a draw when the array store reports pending
/// changes. `update` is a pure function of the store and the required inputs,
/// so running it twice without a store mutation yields identical masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArraySummary {
    /// Active arrays, with width bits
    flags: VertexFlags,
    /// `flags` restricted to attribute data (plus `ELT` while elements are captured)
    summary: VertexFlags,
    /// Flag word stamped on every indexed vertex
    or_flags: VertexFlags,
    /// Complement of the active arrays
    and_flags: VertexFlags,
    /// Streams changed since the previous summary
    new_array_state: VertexFlags,
    /// Whether position is array driven
    array_incr: bool,
    /// Inputs the downstream pipeline declared
    required: VertexFlags,
    /// Required streams that must be synthesized from current values
    fallback: VertexFlags,
}

impl ArraySummary {
    /// Recompute the summary from the array store
    ///
    /// Consumes the store's pending change mask.
    pub fn update(&mut self, arrays: &mut ArrayStore<'_>) {
        self.new_array_state = arrays.take_dirty();
        self.flags = arrays.array_flags();
        self.summary = self.flags & VertexFlags::DATA;
        self.or_flags = (self.flags & VertexFlags::OBJ_234) | VertexFlags::ELT;
        self.and_flags = !self.flags;
        self.array_incr = arrays.vertex().enabled;
        self.recompute_fallback();
    }

    /// Record the downstream pipeline's inputs and derive the fallback mask
    pub fn set_required(&mut self, required: VertexFlags) {
        self.required = required;
        self.recompute_fallback();
    }

    /// A stream falls back when it is required and none of its bits are active
    fn recompute_fallback(&mut self) {
        self.fallback = VertexFlags::stream_groups()
            .filter(|group| self.required.intersects(*group) && !self.summary.intersects(*group))
            .fold(VertexFlags::empty(), |acc, group| acc | (self.required & group));
    }

    /// Treat the pending index stream as one more client array
    pub fn mark_elements(&mut self) {
        self.new_array_state |= VertexFlags::ELT;
        self.summary |= VertexFlags::ELT;
        self.flags |= VertexFlags::ELT;
    }

    /// Drop the synthetic element bit
    pub fn clear_elements(&mut self) {
        self.new_array_state |= VertexFlags::ELT;
        self.summary.remove(VertexFlags::ELT);
        self.flags.remove(VertexFlags::ELT);
    }

    pub fn flags(&self) -> VertexFlags {
        self.flags
    }

    /// The enabled-streams mask
    pub fn summary(&self) -> VertexFlags {
        self.summary
    }

    pub fn or_flags(&self) -> VertexFlags {
        self.or_flags
    }

    pub fn and_flags(&self) -> VertexFlags {
        self.and_flags
    }

    /// Streams changed since the previous summary
    pub fn new_array_state(&self) -> VertexFlags {
        self.new_array_state
    }

    pub fn array_incr(&self) -> bool {
        self.array_incr
    }

    pub fn required(&self) -> VertexFlags {
        self.required
    }

    pub fn fallback(&self) -> VertexFlags {
        self.fallback
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;

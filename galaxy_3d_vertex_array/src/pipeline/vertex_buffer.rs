/// Working (canonical) vertex buffer
///
/// Allocated once per context and reused by every draw and every chunk.
/// Slots `[0, start)` are a reserved head; a chunk occupies
/// `[start, start + n)` and slot `start + n` holds the end sentinel flags.

use glam::{Vec3, Vec4};
use crate::array::array_store::ArrayStore;
use crate::array::summary::VertexFlags;

#[derive(Debug, Clone)]
pub struct VertexBuffer {
    size: usize,
    start: usize,
    count: usize,
    pub(crate) obj: Vec<Vec4>,
    pub(crate) normal: Vec<Vec3>,
    pub(crate) color: Vec<[u8; 4]>,
    pub(crate) index: Vec<u32>,
    pub(crate) edge_flag: Vec<u8>,
    pub(crate) tex_coord: Vec<Vec<Vec4>>,
    pub(crate) flags: Vec<VertexFlags>,
    pub(crate) elts: Vec<u32>,
    or_flag: VertexFlags,
    and_flag: VertexFlags,
}

impl VertexBuffer {
    /// Allocate `size` slots (+1 sentinel) with a `start` slot reserved head
    pub fn new(size: usize, start: usize, texture_units: usize) -> Self {
        let slots = size + 1;
        Self {
            size,
            start,
            count: start,
            obj: vec![Vec4::W; slots],
            normal: vec![Vec3::Z; slots],
            color: vec![[255; 4]; slots],
            index: vec![0; slots],
            edge_flag: vec![1; slots],
            tex_coord: vec![vec![Vec4::W; slots]; texture_units],
            flags: vec![VertexFlags::empty(); slots],
            elts: vec![0; slots],
            or_flag: VertexFlags::empty(),
            and_flag: VertexFlags::all(),
        }
    }

    /// Vertices per chunk
    pub fn capacity(&self) -> usize {
        self.size - self.start
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// First slot of a chunk
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last filled slot
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of vertices currently buffered
    pub fn len(&self) -> usize {
        self.count - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.count == self.start
    }

    /// Logically clear the buffer; allocations are kept
    pub fn reset(&mut self) {
        self.flags[self.start..=self.count].fill(VertexFlags::empty());
        self.count = self.start;
        self.or_flag = VertexFlags::empty();
        self.and_flag = VertexFlags::all();
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Recompute the or/and flag summary over the buffered vertices
    pub(crate) fn summarize_flags(&mut self) {
        let active = &self.flags[self.start..self.count];
        self.or_flag = active.iter().fold(VertexFlags::empty(), |acc, f| acc | *f);
        self.and_flag = active.iter().fold(VertexFlags::all(), |acc, f| acc & *f);
    }

    // ===== BUFFERED DATA =====

    /// Element references of the buffered vertices
    pub fn elts(&self) -> &[u32] {
        &self.elts[self.start..self.count]
    }

    /// Flag words of the buffered vertices
    pub fn flags(&self) -> &[VertexFlags] {
        &self.flags[self.start..self.count]
    }

    pub fn obj(&self) -> &[Vec4] {
        &self.obj[self.start..self.count]
    }

    pub fn normal(&self) -> &[Vec3] {
        &self.normal[self.start..self.count]
    }

    pub fn color(&self) -> &[[u8; 4]] {
        &self.color[self.start..self.count]
    }

    pub fn index(&self) -> &[u32] {
        &self.index[self.start..self.count]
    }

    pub fn edge_flag(&self) -> &[u8] {
        &self.edge_flag[self.start..self.count]
    }

    pub fn tex_coord(&self, unit: usize) -> Option<&[Vec4]> {
        self.tex_coord.get(unit).map(|tc| &tc[self.start..self.count])
    }

    /// Union of the buffered flag words
    pub fn or_flag(&self) -> VertexFlags {
        self.or_flag
    }

    /// Intersection of the buffered flag words
    pub fn and_flag(&self) -> VertexFlags {
        self.and_flag
    }

    // ===== ELEMENT REPLAY =====

    /// Resolve buffered element references against the client arrays
    ///
    /// For every vertex flagged `ELT`, each enabled array is converted through
    /// its element converter unless the vertex already received that
    /// attribute explicitly. The array flags are then merged into those
    /// vertices and the or/and summary is updated.
    pub fn exec_array_elements(&mut self, arrays: &ArrayStore<'_>) {
        let translate = arrays.array_flags();
        let (s, n) = (self.start, self.count);
        let elts = &self.elts[s..n];
        let flags = &self.flags[s..n];

        if translate.has_obj() {
            let d = arrays.vertex();
            (d.converter().elt)(&mut self.obj[s..n], &d.client(), elts, flags, VertexFlags::ELT);
        }
        if translate.contains(VertexFlags::NORM) {
            let d = arrays.normal();
            (d.converter().elt)(&mut self.normal[s..n], &d.client(), elts, flags,
                VertexFlags::ELT | VertexFlags::NORM);
        }
        if translate.contains(VertexFlags::EDGE) {
            let d = arrays.edge_flag();
            (d.converter().elt)(&mut self.edge_flag[s..n], &d.client(), elts, flags,
                VertexFlags::ELT | VertexFlags::EDGE);
        }
        if translate.contains(VertexFlags::RGBA) {
            let d = arrays.color();
            (d.converter().elt)(&mut self.color[s..n], &d.client(), elts, flags,
                VertexFlags::ELT | VertexFlags::RGBA);
        }
        if translate.contains(VertexFlags::INDEX) {
            let d = arrays.index();
            (d.converter().elt)(&mut self.index[s..n], &d.client(), elts, flags,
                VertexFlags::ELT | VertexFlags::INDEX);
        }
        for (unit, out) in self.tex_coord.iter_mut().enumerate() {
            let any = VertexFlags::tex_any(unit);
            if let (true, Some(d)) = (translate.intersects(any), arrays.tex_coord(unit)) {
                (d.converter().elt)(&mut out[s..n], &d.client(), elts, flags, VertexFlags::ELT | any);
            }
        }

        self.or_flag |= translate;

        if self.and_flag.contains(VertexFlags::ELT) {
            for f in &mut self.flags[s..n] {
                *f |= translate;
            }
            self.and_flag |= translate;
        } else {
            let mut and_flag = VertexFlags::all();
            for f in &mut self.flags[s..n] {
                if f.contains(VertexFlags::ELT) {
                    *f |= translate;
                }
                and_flag &= *f;
            }
            self.and_flag = and_flag;
        }
    }
}

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;

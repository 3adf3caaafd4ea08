/// Indexed draw engine
///
/// Indexed draws never convert attributes up front. Element references are
/// written into the working buffer chunk by chunk and each chunk is handed
/// to the immediate sink, which resolves them on demand.

use std::ops::Range;
use crate::array::types::{Indices, PrimitiveTopology};
use crate::draw::context::Context;
use crate::error::Result;
use crate::log::Verbosity;
use crate::pipeline::immediate::ImmediateSink;
use crate::pipeline::pipeline::VertexPipeline;

const SOURCE: &str = "galaxy3d::DrawElements";

/// Whether `count` indices over `span` distinct vertices reuse enough of
/// them to pay for a lock
fn reuses_vertices(count: usize, span: u64) -> bool {
    2 * count as u64 > 3 * span
}

impl<'a, P: VertexPipeline, I: ImmediateSink> Context<'a, P, I> {
    /// Draw the first `count` indices of `indices`
    ///
    /// # Errors
    ///
    /// `InvalidOperation` inside begin/end, `InvalidValue` for a negative
    /// `count` or one larger than the index buffer.
    pub fn draw_elements(&mut self, mode: PrimitiveTopology, count: i32, indices: Indices<'_>) -> Result<()> {
        let indices = self.check_elements("draw_elements", count, indices)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "draw_elements({:?}, {}, {:?})", mode, count, indices.index_type());
        self.validate_state();
        if indices.is_empty() {
            return Ok(());
        }
        self.draw_checked(mode, indices);
        Ok(())
    }

    /// Draw indices known to lie in `[start, end]`
    ///
    /// When no lock is held and the indices reuse the range heavily, the
    /// range is locked around the draw.
    ///
    /// # Errors
    ///
    /// As [`draw_elements`](Self::draw_elements), plus `InvalidValue` when
    /// `end < start`.
    pub fn draw_range_elements(
        &mut self,
        mode: PrimitiveTopology,
        start: u32,
        end: u32,
        count: i32,
        indices: Indices<'_>,
    ) -> Result<()> {
        if end < start {
            crate::engine_bail!(SOURCE, InvalidValue, "draw_range_elements(start {} end {})", start, end);
        }
        let indices = self.check_elements("draw_range_elements", count, indices)?;
        crate::engine_verbose!(Verbosity::API, SOURCE,
            "draw_range_elements({:?}, {}..={}, {})", mode, start, end, count);
        self.validate_state();
        if indices.is_empty() {
            return Ok(());
        }

        let span = (end - start) as u64;
        if !self.cva.is_locked() && self.config.auto_lock && reuses_vertices(indices.len(), span) {
            self.lock_range(start as usize..end as usize + 1);
            self.dispatch_elements(mode, indices);
            self.unlock_arrays();
        } else {
            self.draw_checked(mode, indices);
        }
        Ok(())
    }

    /// Validate an index argument and cut the buffer down to `count`
    fn check_elements<'i>(&self, entry: &str, count: i32, indices: Indices<'i>) -> Result<Indices<'i>> {
        if self.immediate.inside_begin_end() {
            crate::engine_bail!(SOURCE, InvalidOperation, "{} inside begin/end", entry);
        }
        if count < 0 || count as usize > indices.len() {
            crate::engine_bail!(SOURCE, InvalidValue,
                "{}(count {}) with {} indices", entry, count, indices.len());
        }
        Ok(indices.truncated(count as usize))
    }

    /// Draw with an automatic lock when the indices reuse vertices
    fn draw_checked(&mut self, mode: PrimitiveTopology, indices: Indices<'_>) {
        match self.auto_lock_range(&indices) {
            Some(range) => {
                self.lock_range(range);
                self.dispatch_elements(mode, indices);
                self.unlock_arrays();
            }
            None => self.dispatch_elements(mode, indices),
        }
    }

    fn auto_lock_range(&self, indices: &Indices<'_>) -> Option<Range<usize>> {
        if self.cva.is_locked() || !self.config.auto_lock || !self.config.cva_enabled {
            return None;
        }
        let (lo, hi) = indices.bounds()?;
        let span = (hi - lo) as u64 + 1;
        reuses_vertices(indices.len(), span).then(|| lo as usize..hi as usize + 1)
    }

    fn dispatch_elements(&mut self, mode: PrimitiveTopology, indices: Indices<'_>) {
        let compiling = self.cva.compiling();
        if compiling && self.capture_elements(mode, indices) {
            return;
        }

        if self.summary.summary().has_obj() {
            match indices {
                Indices::U8(elts) => self.draw_elts(mode, elts),
                Indices::U16(elts) => self.draw_elts(mode, elts),
                Indices::U32(elts) => self.draw_elts(mode, elts),
            }
        } else {
            self.immediate.begin(mode);
            for i in 0..indices.len() {
                if let Some(index) = indices.get(i) {
                    self.immediate.array_element(index);
                }
            }
            self.immediate.end();
        }

        if compiling {
            self.summary.clear_elements();
        }
    }

    /// Chunk element references through the working buffer
    ///
    /// The primitive is ended before the last chunk is transformed, so the
    /// sink sees the whole primitive before it flushes.
    fn draw_elts<T: Copy + Into<u32>>(&mut self, mode: PrimitiveTopology, elts: &[T]) {
        let s = self.vb.start();
        let capacity = self.vb.capacity();
        let or_flags = self.summary.or_flags();
        let total = elts.len();
        let mut done = 0;

        self.immediate.begin(mode);
        for block in elts.chunks(capacity) {
            for (i, &elt) in block.iter().enumerate() {
                self.vb.elts[s + i] = elt.into();
                self.vb.flags[s + i] = or_flags;
            }
            self.vb.set_count(s + block.len());
            self.vb.summarize_flags();
            done += block.len();

            if done == total {
                self.immediate.end();
            }
            crate::engine_verbose!(Verbosity::VARRAY, SOURCE,
                "element chunk of {} ({}/{})", block.len(), done, total);
            self.immediate.maybe_transform(&mut self.vb, &self.arrays);
            self.stats.immediate_chunks += 1;
            self.vb.reset();
        }
    }
}

#[cfg(test)]
#[path = "draw_elements_tests.rs"]
mod tests;

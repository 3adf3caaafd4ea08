/// Compiled vertex array lock manager
///
/// State machine: `Unlocked -> Locked -> Precomputed -> Unlocked`.
///
/// While a lock compiles the arrays, indexed draws whose indices all lie in
/// the locked range are captured as a pending element stream. The first
/// capture after locking (or after a client state change) runs the
/// pipeline's one-time precalculation; later captures reuse it. When the
/// precalculation resolved rendering itself the draw returns right away,
/// otherwise it continues down the immediate indexed path.

use std::ops::Range;
use crate::array::types::{IndexType, Indices, PrimitiveTopology};
use crate::draw::context::Context;
use crate::error::Result;
use crate::log::Verbosity;
use crate::pipeline::immediate::ImmediateSink;
use crate::pipeline::pipeline::{PipelineOps, VertexPipeline};

const SOURCE: &str = "galaxy3d::Cva";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPhase {
    #[default]
    Unlocked,
    /// Range stored, precalculation pending
    Locked,
    /// Precalculation done for the current range and client state
    Precomputed,
}

/// Index stream captured by the last locked draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingElements {
    pub mode: PrimitiveTopology,
    pub index_type: IndexType,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CvaState {
    phase: LockPhase,
    range: Range<usize>,
    /// Locking compiles the arrays
    compiling: bool,
    pending: Option<PendingElements>,
    ops: PipelineOps,
}

impl CvaState {
    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.phase != LockPhase::Unlocked
    }

    /// Locked vertex range, `[start, end)`
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Vertices covered by the lock
    pub fn lock_count(&self) -> usize {
        self.range.len()
    }

    /// Whether indexed draws are currently captured
    pub fn compiling(&self) -> bool {
        self.compiling && self.is_locked()
    }

    pub fn pending(&self) -> Option<PendingElements> {
        self.pending
    }

    /// Stages resolved by the last precalculation
    pub fn ops(&self) -> PipelineOps {
        self.ops
    }

    /// Whether every index in `[lo, hi]` lies in the locked range
    pub fn covers(&self, lo: u32, hi: u32) -> bool {
        self.range.contains(&(lo as usize)) && self.range.contains(&(hi as usize))
    }

    pub(crate) fn lock(&mut self, range: Range<usize>, compile: bool) {
        self.phase = LockPhase::Locked;
        self.range = range;
        self.compiling = compile;
        self.pending = None;
        self.ops = PipelineOps::empty();
    }

    pub(crate) fn unlock(&mut self) {
        *self = Self::default();
    }

    /// Drop precalculated state; the lock itself is kept
    pub(crate) fn invalidate_precalc(&mut self) {
        if self.phase == LockPhase::Precomputed {
            self.phase = LockPhase::Locked;
            self.ops = PipelineOps::empty();
        }
    }

    pub(crate) fn precomputed(&mut self, ops: PipelineOps) {
        self.phase = LockPhase::Precomputed;
        self.ops = ops;
    }
}

impl<'a, P: VertexPipeline, I: ImmediateSink> Context<'a, P, I> {
    /// Lock the vertex range `[start, end)`
    ///
    /// Locking again replaces the range and drops any precalculated state.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` inside begin/end, `InvalidValue` for a negative
    /// start or `end < start`.
    pub fn lock_arrays(&mut self, start: i32, end: i32) -> Result<()> {
        if self.immediate.inside_begin_end() {
            crate::engine_bail!(SOURCE, InvalidOperation, "lock_arrays inside begin/end");
        }
        if start < 0 || end < start {
            crate::engine_bail!(SOURCE, InvalidValue, "lock_arrays(start {} end {})", start, end);
        }
        self.lock_range(start as usize..end as usize);
        Ok(())
    }

    /// Release the lock, dropping the pending element stream
    pub fn unlock_arrays(&mut self) {
        if !self.cva.is_locked() {
            return;
        }
        crate::engine_verbose!(Verbosity::CVA, SOURCE, "unlock {:?}", self.cva.range());
        self.summary.clear_elements();
        self.cva.unlock();
        self.pipeline_valid = false;
    }

    pub(crate) fn lock_range(&mut self, range: Range<usize>) {
        crate::engine_verbose!(Verbosity::CVA, SOURCE, "{} {:?} (compile {})",
            if self.cva.is_locked() { "relock" } else { "lock" }, range, self.config.cva_enabled);
        self.cva.lock(range, self.config.cva_enabled);
        self.pipeline_valid = false;
    }

    /// Capture an indexed draw against the locked range
    ///
    /// Returns true when the draw was fully rendered from precalculated
    /// state. Otherwise the element bit stays set in the summary and the
    /// caller continues down the immediate path.
    pub(crate) fn capture_elements(&mut self, mode: PrimitiveTopology, indices: Indices<'_>) -> bool {
        let Some((lo, hi)) = indices.bounds() else {
            return false;
        };
        if !self.cva.covers(lo, hi) {
            crate::engine_verbose!(Verbosity::CVA, SOURCE,
                "indices {}..={} outside locked range {:?}", lo, hi, self.cva.range());
            return false;
        }

        self.summary.mark_elements();
        self.cva.pending = Some(PendingElements {
            mode,
            index_type: indices.index_type(),
            count: indices.len(),
        });

        if self.cva.phase() != LockPhase::Precomputed {
            let ops = self.pipeline.precalc(self.cva.range(), &self.summary, &self.arrays);
            self.stats.precalc_passes += 1;
            crate::engine_verbose!(Verbosity::CVA, SOURCE, "precalc over {:?}: {:?}", self.cva.range(), ops);
            self.cva.precomputed(ops);
        }

        if self.cva.ops().contains(PipelineOps::RENDER) {
            self.pipeline.render_elements(mode, indices);
            self.summary.clear_elements();
            return true;
        }

        crate::engine_verbose!(Verbosity::VARRAY, SOURCE, "using immediate");
        false
    }
}

#[cfg(test)]
#[path = "cva_tests.rs"]
mod tests;

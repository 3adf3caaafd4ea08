/// Rendering context
///
/// Exclusively owns the array descriptors, the state summary, the working
/// buffer and the lock state of one rendering context, plus the two
/// downstream collaborators. Nothing here is shared between contexts.
///
/// `'a` is the lifetime of every client array registered with the context:
/// client memory must outlive every draw that reads it.

use crate::array::array_store::ArrayStore;
use crate::array::interleaved::InterleavedFormat;
use crate::array::summary::ArraySummary;
use crate::array::types::{ClientState, ElementType};
use crate::config::{ContextConfig, CurrentValues};
use crate::draw::cva::CvaState;
use crate::error::Result;
use crate::log::Verbosity;
use crate::pipeline::immediate::ImmediateSink;
use crate::pipeline::pipeline::VertexPipeline;
use crate::pipeline::vertex_buffer::VertexBuffer;

const SOURCE: &str = "galaxy3d::Context";

/// Command recording mode of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingMode {
    /// Commands execute immediately
    #[default]
    Execute,
    /// Commands are compiled into a display list
    Compile,
    /// Commands are compiled and executed
    CompileAndExecute,
}

impl RecordingMode {
    /// Whether commands go to a display list
    pub fn is_compiling(&self) -> bool {
        !matches!(self, RecordingMode::Execute)
    }
}

/// Draw counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    /// Chunks handed to `VertexPipeline::run`
    pub pipeline_runs: u64,
    /// Vertices handed to `VertexPipeline::run`
    pub batched_vertices: u64,
    /// Attribute chunks aliased from client memory
    pub aliased_attribs: u64,
    /// Attribute chunks converted through the dispatch matrix
    pub translated_attribs: u64,
    /// Indexed chunks handed to `ImmediateSink::maybe_transform`
    pub immediate_chunks: u64,
    /// One-time precalculation passes over a locked range
    pub precalc_passes: u64,
    /// Immediate pipeline rebuilds
    pub pipeline_rebuilds: u64,
}

pub struct Context<'a, P: VertexPipeline, I: ImmediateSink> {
    pub(crate) config: ContextConfig,
    pub(crate) arrays: ArrayStore<'a>,
    pub(crate) summary: ArraySummary,
    pub(crate) vb: VertexBuffer,
    pub(crate) cva: CvaState,
    pub(crate) current: CurrentValues,
    pub(crate) mode: RecordingMode,
    pub(crate) stats: DrawStats,
    /// The immediate pipeline matches the current client state
    pub(crate) pipeline_valid: bool,
    pub(crate) pipeline: P,
    pub(crate) immediate: I,
}

impl<'a, P: VertexPipeline, I: ImmediateSink> Context<'a, P, I> {
    /// Create a context
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if `config` is invalid.
    pub fn new(config: ContextConfig, pipeline: P, immediate: I) -> Result<Self> {
        config.validate()?;
        crate::engine_debug!(SOURCE, "context created: vb_size {} vb_start {} texture units {}",
            config.vb_size, config.vb_start, config.max_texture_units);
        Ok(Self {
            arrays: ArrayStore::new(config.max_texture_units),
            summary: ArraySummary::default(),
            vb: VertexBuffer::new(config.vb_size, config.vb_start, config.max_texture_units),
            cva: CvaState::default(),
            current: CurrentValues::default(),
            mode: RecordingMode::Execute,
            stats: DrawStats::default(),
            pipeline_valid: false,
            config,
            pipeline,
            immediate,
        })
    }

    // ===== ARRAY POINTERS =====

    /// Specify the position array (size 2..=4; short, int, float or double)
    pub fn vertex_pointer(&mut self, size: i32, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        self.arrays.set_vertex(size, ty, stride, data)
    }

    /// Specify the normal array (byte, short, int, float or double)
    pub fn normal_pointer(&mut self, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        self.arrays.set_normal(ty, stride, data)
    }

    /// Specify the color array (size 3..=4, any element type)
    pub fn color_pointer(&mut self, size: i32, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        self.arrays.set_color(size, ty, stride, data)
    }

    /// Specify the color index array (unsigned byte, short, int, float or double)
    pub fn index_pointer(&mut self, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        self.arrays.set_index(ty, stride, data)
    }

    /// Specify the texture coordinates of the client-active texture unit
    pub fn tex_coord_pointer(&mut self, size: i32, ty: ElementType, stride: i32, data: &'a [u8]) -> Result<()> {
        let unit = self.arrays.client_active_texture();
        self.arrays.set_tex_coord(unit, size, ty, stride, data)
    }

    /// Specify the texture coordinates of `unit`
    pub fn tex_coord_pointer_unit(
        &mut self,
        unit: usize,
        size: i32,
        ty: ElementType,
        stride: i32,
        data: &'a [u8],
    ) -> Result<()> {
        self.arrays.set_tex_coord(unit, size, ty, stride, data)
    }

    /// Specify the edge flag array
    pub fn edge_flag_pointer(&mut self, stride: i32, data: &'a [u8]) -> Result<()> {
        self.arrays.set_edge_flag(stride, data)
    }

    /// Configure every array from one interleaved record layout
    pub fn interleaved_arrays(&mut self, format: InterleavedFormat, stride: i32, data: &'a [u8]) -> Result<()> {
        let factor = self.config.tex_coord_interleave_factor;
        self.arrays.set_interleaved(format, stride, data, factor)
    }

    /// Select the texture unit targeted by `tex_coord_pointer` and `TextureCoordArray`
    pub fn client_active_texture(&mut self, unit: usize) -> Result<()> {
        self.arrays.set_client_active_texture(unit)
    }

    pub fn enable_client_state(&mut self, state: ClientState) {
        crate::engine_verbose!(Verbosity::API, SOURCE, "enable_client_state({:?})", state);
        self.arrays.set_client_state(state, true);
    }

    pub fn disable_client_state(&mut self, state: ClientState) {
        crate::engine_verbose!(Verbosity::API, SOURCE, "disable_client_state({:?})", state);
        self.arrays.set_client_state(state, false);
    }

    // ===== STATE VALIDATION =====

    /// Bring the summary and the immediate pipeline up to date
    ///
    /// A client state change re-summarizes the arrays, invalidates the
    /// immediate pipeline and drops any precalculated lock state.
    pub(crate) fn validate_state(&mut self) {
        if !self.arrays.dirty().is_empty() {
            self.summary.update(&mut self.arrays);
            self.pipeline_valid = false;
            self.cva.invalidate_precalc();
            crate::engine_verbose!(Verbosity::PIPELINE, SOURCE,
                "client state changed: {:?} now {:?}", self.summary.new_array_state(), self.summary.summary());
        }
    }

    /// Rebuild the immediate pipeline when stale or when a lock is compiling
    pub(crate) fn ensure_immediate_pipeline(&mut self, relock: bool) {
        if !self.pipeline_valid || relock {
            crate::engine_verbose!(Verbosity::PIPELINE, SOURCE,
                "rebuilding immediate pipeline (relock {})", relock);
            self.pipeline.build_immediate(&self.summary);
            self.pipeline_valid = true;
            self.stats.pipeline_rebuilds += 1;
        }
        self.summary.set_required(self.pipeline.inputs());
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn arrays(&self) -> &ArrayStore<'a> {
        &self.arrays
    }

    pub fn summary(&self) -> &ArraySummary {
        &self.summary
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vb
    }

    pub fn cva(&self) -> &CvaState {
        &self.cva
    }

    pub fn stats(&self) -> &DrawStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DrawStats::default();
    }

    pub fn current(&self) -> &CurrentValues {
        &self.current
    }

    /// Current attribute values used for required but disabled arrays
    pub fn current_mut(&mut self) -> &mut CurrentValues {
        &mut self.current
    }

    pub fn recording_mode(&self) -> RecordingMode {
        self.mode
    }

    pub fn set_recording_mode(&mut self, mode: RecordingMode) {
        self.mode = mode;
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }

    pub fn immediate(&self) -> &I {
        &self.immediate
    }

    pub fn immediate_mut(&mut self) -> &mut I {
        &mut self.immediate
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

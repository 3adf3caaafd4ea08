/// Immediate-mode command sink
///
/// Per-vertex command recording (begin/end, single element submission) lives
/// outside this crate. Indexed draws fill the working buffer with element
/// references and hand it over at every `maybe_transform` checkpoint; the sink
/// may replay them with [`VertexBuffer::exec_array_elements`], compile them,
/// or transform them right away.

use crate::array::array_store::ArrayStore;
use crate::array::types::PrimitiveTopology;
use crate::pipeline::vertex_buffer::VertexBuffer;

/// Immediate-mode collaborator
pub trait ImmediateSink {
    /// Whether a begin/end pair is open
    fn inside_begin_end(&self) -> bool;

    fn begin(&mut self, mode: PrimitiveTopology);

    /// Submit one vertex assembled from every enabled array
    fn array_element(&mut self, index: u32);

    fn end(&mut self);

    /// Checkpoint after every indexed chunk
    fn maybe_transform(&mut self, vb: &mut VertexBuffer, arrays: &ArrayStore<'_>);
}

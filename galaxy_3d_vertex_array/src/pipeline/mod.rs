/// Pipeline module - downstream collaborators and the working vertex buffer

pub mod pipeline;
pub mod immediate;
pub mod vertex_buffer;

#[cfg(test)]
pub mod mock_pipeline;

pub use pipeline::{AttribArray, CanonicalAttrib, Chunk, PipelineOps, VertexPipeline};
pub use immediate::ImmediateSink;
pub use vertex_buffer::VertexBuffer;

/// Mock collaborators for unit tests
///
/// `MockPipeline` and `MockImmediate` record everything the context hands
/// them so tests can assert on chunking, aliasing and command order.

use std::ops::Range;
use glam::{Vec3, Vec4};
use crate::array::array_store::ArrayStore;
use crate::array::summary::{ArraySummary, VertexFlags};
use crate::array::types::{Indices, PrimitiveTopology};
use crate::pipeline::immediate::ImmediateSink;
use crate::pipeline::pipeline::{Chunk, PipelineOps, VertexPipeline};
use crate::pipeline::vertex_buffer::VertexBuffer;

// ============================================================================
// Mock Pipeline
// ============================================================================

/// Snapshot of one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub primitive: PrimitiveTopology,
    pub first: usize,
    pub count: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub flags: Vec<VertexFlags>,
    pub obj: Vec<Vec4>,
    pub obj_aliased: bool,
    /// Client bytes behind an aliased position array
    pub obj_bytes: Option<Vec<u8>>,
    pub normal: Option<Vec<Vec3>>,
    pub color: Option<Vec<[u8; 4]>>,
    pub color_aliased: bool,
    pub index: Option<Vec<u32>>,
    pub edge_flag: Option<Vec<u8>>,
    pub tex_coord0: Option<Vec<Vec4>>,
}

#[derive(Debug, Default)]
pub struct MockPipeline {
    pub inputs: VertexFlags,
    pub runs: Vec<RunRecord>,
    pub rebuilds: usize,
    pub precalc_ranges: Vec<Range<usize>>,
    /// Summary seen by the last precalculation
    pub precalc_summary: Option<ArraySummary>,
    /// Stages reported by `precalc`
    pub precalc_ops: PipelineOps,
    pub rendered: Vec<(PrimitiveTopology, Vec<u32>)>,
}

impl MockPipeline {
    pub fn new(inputs: VertexFlags) -> Self {
        Self { inputs, ..Default::default() }
    }

    /// Vertex count of every run, in order
    pub fn run_counts(&self) -> Vec<usize> {
        self.runs.iter().map(|r| r.count).collect()
    }
}

impl VertexPipeline for MockPipeline {
    fn inputs(&self) -> VertexFlags {
        self.inputs
    }

    fn build_immediate(&mut self, _summary: &ArraySummary) {
        self.rebuilds += 1;
    }

    fn run(&mut self, chunk: &Chunk<'_>) {
        let n = chunk.count;
        self.runs.push(RunRecord {
            primitive: chunk.primitive,
            first: chunk.first,
            count: n,
            is_first: chunk.is_first,
            is_last: chunk.is_last,
            flags: chunk.flags.to_vec(),
            obj: (0..n).map(|i| chunk.obj.get(i)).collect(),
            obj_aliased: chunk.obj.is_aliased(),
            obj_bytes: chunk.obj.as_bytes().map(|b| b.to_vec()),
            normal: chunk.normal.map(|a| (0..n).map(|i| a.get(i)).collect()),
            color: chunk.color.map(|a| (0..n).map(|i| a.get(i)).collect()),
            color_aliased: chunk.color.map_or(false, |a| a.is_aliased()),
            index: chunk.index.map(|a| (0..n).map(|i| a.get(i)).collect()),
            edge_flag: chunk.edge_flag.map(|a| (0..n).map(|i| a.get(i)).collect()),
            tex_coord0: chunk.tex_coord[0].map(|a| (0..n).map(|i| a.get(i)).collect()),
        });
    }

    fn precalc(
        &mut self,
        range: Range<usize>,
        summary: &ArraySummary,
        _arrays: &ArrayStore<'_>,
    ) -> PipelineOps {
        self.precalc_ranges.push(range);
        self.precalc_summary = Some(*summary);
        self.precalc_ops
    }

    fn render_elements(&mut self, mode: PrimitiveTopology, indices: Indices<'_>) {
        self.rendered.push((mode, (0..indices.len()).filter_map(|i| indices.get(i)).collect()));
    }
}

// ============================================================================
// Mock Immediate Sink
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ImmediateEvent {
    Begin(PrimitiveTopology),
    Element(u32),
    End,
    /// One indexed chunk, with the element references and flags it carried
    Transform { elts: Vec<u32>, flags: Vec<VertexFlags> },
}

#[derive(Debug, Default)]
pub struct MockImmediate {
    pub inside: bool,
    pub events: Vec<ImmediateEvent>,
    /// Replay elements at every checkpoint
    pub replay: bool,
    /// Positions resolved by each replay
    pub replayed_obj: Vec<Vec<Vec4>>,
}

impl MockImmediate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements submitted one by one
    pub fn elements(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ImmediateEvent::Element(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    /// Element references of every checkpoint, in order
    pub fn transforms(&self) -> Vec<Vec<u32>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ImmediateEvent::Transform { elts, .. } => Some(elts.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ImmediateSink for MockImmediate {
    fn inside_begin_end(&self) -> bool {
        self.inside
    }

    fn begin(&mut self, mode: PrimitiveTopology) {
        self.events.push(ImmediateEvent::Begin(mode));
    }

    fn array_element(&mut self, index: u32) {
        self.events.push(ImmediateEvent::Element(index));
    }

    fn end(&mut self) {
        self.events.push(ImmediateEvent::End);
    }

    fn maybe_transform(&mut self, vb: &mut VertexBuffer, arrays: &ArrayStore<'_>) {
        self.events.push(ImmediateEvent::Transform {
            elts: vb.elts().to_vec(),
            flags: vb.flags().to_vec(),
        });
        if self.replay {
            vb.exec_array_elements(arrays);
            self.replayed_obj.push(vb.obj().to_vec());
        }
    }
}

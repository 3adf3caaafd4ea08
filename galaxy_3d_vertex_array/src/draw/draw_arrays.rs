/// Sequential draw engine
///
/// Splits a `[first, first + count)` range into chunks that fit the working
/// buffer. For each required attribute a chunk either aliases client memory
/// (canonical type, tightly packed) or converts into the working buffer
/// through the dispatch matrix. A required attribute whose array is
/// disabled is read from the current values with a zero stride.

use std::ops::RangeInclusive;
use glam::Vec4;
use crate::array::array_store::ArrayDescriptor;
use crate::array::convert::{self, ClientArray, Converter};
use crate::array::summary::{VertexFlags, MAX_TEXTURE_UNITS};
use crate::array::types::{ElementType, PrimitiveTopology};
use crate::draw::context::{Context, DrawStats};
use crate::error::Result;
use crate::log::Verbosity;
use crate::pipeline::immediate::ImmediateSink;
use crate::pipeline::pipeline::{AttribArray, Chunk, VertexPipeline};

const SOURCE: &str = "galaxy3d::DrawArrays";

// ===== STREAM PLAN =====

/// How one attribute reaches every chunk of a draw
struct StreamPlan<'s, T> {
    src: ClientArray<'s>,
    converter: Converter<T>,
    /// Client memory is used in place
    update: bool,
}

impl<'s, T: Copy> StreamPlan<'s, T> {
    /// Plan from an enabled array
    ///
    /// Aliased when the array holds `canonical` components, in an accepted
    /// size, with no gap between elements.
    fn array(desc: &ArrayDescriptor<'s, T>, canonical: ElementType, sizes: RangeInclusive<usize>) -> Self {
        let update = desc.is_packed(canonical) && sizes.contains(&desc.size);
        Self { src: desc.client(), converter: desc.converter(), update }
    }

    /// Plan from a current value image, repeated with a zero stride
    fn constant(data: &'s [u8], size: usize, ty: ElementType, converter: Converter<T>) -> Self {
        Self {
            src: ClientArray { data, size, ty, stride_b: 0 },
            converter,
            update: false,
        }
    }

    /// Convert `slot.len()` elements starting at `first` unless aliased
    fn fill(&self, slot: &mut [T], first: usize, stats: &mut DrawStats) {
        if self.update {
            stats.aliased_attribs += 1;
        } else {
            (self.converter.range)(slot, &self.src, first);
            stats.translated_attribs += 1;
        }
    }

    fn view<'v>(&self, slot: &'v [T], first: usize) -> AttribArray<'v, T>
    where
        's: 'v,
    {
        if self.update {
            AttribArray::Aliased(ClientArray { data: self.src.window(first, slot.len()), ..self.src })
        } else {
            AttribArray::Converted(slot)
        }
    }
}

/// Pick the array plan, or the current value plan when the stream falls back
fn plan<'s, T: Copy>(
    desc: &ArrayDescriptor<'s, T>,
    fallback: Option<StreamPlan<'s, T>>,
    canonical: ElementType,
    sizes: RangeInclusive<usize>,
) -> StreamPlan<'s, T> {
    match fallback {
        Some(constant) => constant,
        None => StreamPlan::array(desc, canonical, sizes),
    }
}

// ===== DRAW ARRAYS =====

impl<'a, P: VertexPipeline, I: ImmediateSink> Context<'a, P, I> {
    /// Draw `count` sequential vertices starting at `first`
    ///
    /// # Errors
    ///
    /// `InvalidOperation` inside begin/end, `InvalidValue` for a negative
    /// `first` or `count`. Nothing is drawn on error.
    pub fn draw_arrays(&mut self, mode: PrimitiveTopology, first: i32, count: i32) -> Result<()> {
        if self.immediate.inside_begin_end() {
            crate::engine_bail!(SOURCE, InvalidOperation, "draw_arrays inside begin/end");
        }
        if first < 0 || count < 0 {
            crate::engine_bail!(SOURCE, InvalidValue, "draw_arrays(first {} count {})", first, count);
        }
        crate::engine_verbose!(Verbosity::API, SOURCE, "draw_arrays({:?}, {}, {})", mode, first, count);

        self.validate_state();
        let (first, count) = (first as usize, count as usize);
        if count == 0 {
            return Ok(());
        }

        if !self.arrays.vertex().enabled {
            // No position: only the last vertex's attributes take effect
            self.immediate.begin(mode);
            self.immediate.array_element((first + count - 1) as u32);
            self.immediate.end();
            return Ok(());
        }

        if self.mode.is_compiling() {
            self.immediate.begin(mode);
            for i in first..first + count {
                self.immediate.array_element(i as u32);
            }
            self.immediate.end();
            return Ok(());
        }

        self.draw_chunked(mode, first, count);
        Ok(())
    }

    fn draw_chunked(&mut self, mode: PrimitiveTopology, first: usize, count: usize) {
        let relock = self.cva.compiling();
        self.ensure_immediate_pipeline(relock);

        let required = self.summary.required();
        let fallback = self.summary.fallback();
        let edges = mode.uses_edge_flags();

        // Current value images for fallback streams
        let current = self.current;
        let normal_image = current.normal.to_array();
        let index_image = current.index;
        let edge_image = [current.edge_flag as u8];
        let tex_images = current.tex_coord.map(|t| t.to_array());

        let arrays = &self.arrays;
        let obj = StreamPlan::array(arrays.vertex(), ElementType::Float, 1..=4);
        let normal = required.intersects(VertexFlags::NORM).then(|| {
            let constant = fallback.intersects(VertexFlags::NORM).then(|| {
                StreamPlan::constant(
                    bytemuck::cast_slice(&normal_image),
                    3,
                    ElementType::Float,
                    convert::trans_3f(ElementType::Float),
                )
            });
            plan(arrays.normal(), constant, ElementType::Float, 3..=3)
        });
        let color = required.intersects(VertexFlags::RGBA).then(|| {
            let constant = fallback.intersects(VertexFlags::RGBA).then(|| {
                StreamPlan::constant(
                    &current.color,
                    4,
                    ElementType::UnsignedByte,
                    convert::trans_4ub(4, ElementType::UnsignedByte),
                )
            });
            plan(arrays.color(), constant, ElementType::UnsignedByte, 4..=4)
        });
        let index = required.intersects(VertexFlags::INDEX).then(|| {
            let constant = fallback.intersects(VertexFlags::INDEX).then(|| {
                StreamPlan::constant(
                    bytemuck::bytes_of(&index_image),
                    1,
                    ElementType::UnsignedInt,
                    convert::trans_1ui(ElementType::UnsignedInt),
                )
            });
            plan(arrays.index(), constant, ElementType::UnsignedInt, 1..=1)
        });
        let edge_flag = (edges && required.intersects(VertexFlags::EDGE)).then(|| {
            let constant = fallback.intersects(VertexFlags::EDGE).then(|| {
                StreamPlan::constant(
                    &edge_image,
                    1,
                    ElementType::UnsignedByte,
                    convert::trans_1ub(ElementType::UnsignedByte),
                )
            });
            plan(arrays.edge_flag(), constant, ElementType::UnsignedByte, 1..=1)
        });
        let tex_coord: [Option<StreamPlan<'_, Vec4>>; MAX_TEXTURE_UNITS] = std::array::from_fn(|unit| {
            let desc = arrays.tex_coord(unit)?;
            if !required.intersects(VertexFlags::tex_any(unit)) {
                return None;
            }
            let constant = fallback.intersects(VertexFlags::tex_any(unit)).then(|| {
                StreamPlan::constant(
                    bytemuck::cast_slice(&tex_images[unit]),
                    4,
                    ElementType::Float,
                    convert::trans_4f(4, ElementType::Float),
                )
            });
            Some(plan(desc, constant, ElementType::Float, 1..=4))
        });

        let capacity = self.vb.capacity();
        let s = self.vb.start();
        let flags = self.summary.flags();
        let mut done = 0;

        while done < count {
            let n = (count - done).min(capacity);
            let at = first + done;
            let end = s + n;

            obj.fill(&mut self.vb.obj[s..end], at, &mut self.stats);
            if let Some(p) = &normal {
                p.fill(&mut self.vb.normal[s..end], at, &mut self.stats);
            }
            if let Some(p) = &color {
                p.fill(&mut self.vb.color[s..end], at, &mut self.stats);
            }
            if let Some(p) = &index {
                p.fill(&mut self.vb.index[s..end], at, &mut self.stats);
            }
            if let Some(p) = &edge_flag {
                p.fill(&mut self.vb.edge_flag[s..end], at, &mut self.stats);
            }
            for (unit, p) in tex_coord.iter().enumerate() {
                if let Some(p) = p {
                    p.fill(&mut self.vb.tex_coord[unit][s..end], at, &mut self.stats);
                }
            }

            self.vb.flags[s..=end].fill(flags);
            self.vb.flags[s] |= VertexFlags::NORM;
            self.vb.flags[end] |= VertexFlags::END_VB;
            self.vb.set_count(end);

            let vb = &self.vb;
            let chunk = Chunk {
                primitive: mode,
                first: at,
                count: n,
                is_first: done == 0,
                is_last: done + n == count,
                flags: &vb.flags[s..=end],
                obj: obj.view(&vb.obj[s..end], at),
                normal: normal.as_ref().map(|p| p.view(&vb.normal[s..end], at)),
                color: color.as_ref().map(|p| p.view(&vb.color[s..end], at)),
                index: index.as_ref().map(|p| p.view(&vb.index[s..end], at)),
                edge_flag: edge_flag.as_ref().map(|p| p.view(&vb.edge_flag[s..end], at)),
                tex_coord: std::array::from_fn(|unit| {
                    tex_coord[unit].as_ref().map(|p| p.view(&vb.tex_coord[unit][s..end], at))
                }),
            };
            crate::engine_verbose!(Verbosity::VARRAY, SOURCE,
                "chunk {}..{} of {:?} (position {})",
                at, at + n, mode, if obj.update { "aliased" } else { "translated" });
            self.pipeline.run(&chunk);

            self.stats.pipeline_runs += 1;
            self.stats.batched_vertices += n as u64;
            self.vb.reset();
            done += n;
        }
    }
}

#[cfg(test)]
#[path = "draw_arrays_tests.rs"]
mod tests;

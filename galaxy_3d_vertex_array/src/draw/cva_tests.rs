use super::*;
use crate::array::summary::VertexFlags;
use crate::array::types::{ClientState, ElementType};
use crate::config::ContextConfig;
use crate::error::Error;
use crate::pipeline::mock_pipeline::{ImmediateEvent, MockImmediate, MockPipeline};

static POSITIONS: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
static QUAD: [u16; 6] = [0, 1, 2, 2, 3, 0];
static COLORS: [u8; 16] = [255; 16];

fn context(config: ContextConfig) -> Context<'static, MockPipeline, MockImmediate> {
    let mut ctx = Context::new(config, MockPipeline::new(VertexFlags::OBJ_234), MockImmediate::new()).unwrap();
    ctx.vertex_pointer(2, ElementType::Float, 0, bytemuck::cast_slice(&POSITIONS)).unwrap();
    ctx.enable_client_state(ClientState::VertexArray);
    ctx
}

fn default_context() -> Context<'static, MockPipeline, MockImmediate> {
    context(ContextConfig { vb_size: 9, vb_start: 3, ..Default::default() })
}

// ============================================================================
// Lock lifecycle tests
// ============================================================================

#[test]
fn test_lock_and_unlock_phases() {
    let mut ctx = default_context();
    assert_eq!(ctx.cva().phase(), LockPhase::Unlocked);

    ctx.lock_arrays(1, 4).unwrap();
    assert_eq!(ctx.cva().phase(), LockPhase::Locked);
    assert_eq!(ctx.cva().range(), 1..4);
    assert_eq!(ctx.cva().lock_count(), 3);
    assert!(ctx.cva().compiling());

    ctx.unlock_arrays();
    assert_eq!(ctx.cva().phase(), LockPhase::Unlocked);
    assert_eq!(ctx.cva().lock_count(), 0);
    assert!(!ctx.cva().compiling());
}

#[test]
fn test_lock_rejects_invalid_range() {
    let mut ctx = default_context();

    let err = ctx.lock_arrays(-1, 3).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)));
    let err = ctx.lock_arrays(3, 2).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)));

    assert!(!ctx.cva().is_locked());
}

#[test]
fn test_lock_inside_begin_end() {
    let mut ctx = default_context();
    ctx.immediate_mut().inside = true;

    let err = ctx.lock_arrays(0, 4).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    assert!(!ctx.cva().is_locked());
}

#[test]
fn test_relock_drops_precalc() {
    let mut ctx = default_context();
    ctx.lock_arrays(0, 4).unwrap();
    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();
    assert_eq!(ctx.cva().phase(), LockPhase::Precomputed);

    ctx.lock_arrays(0, 2).unwrap();
    assert_eq!(ctx.cva().phase(), LockPhase::Locked);
    assert_eq!(ctx.cva().range(), 0..2);
}

#[test]
fn test_unlock_without_lock_is_noop() {
    let mut ctx = default_context();
    ctx.unlock_arrays();
    assert!(!ctx.cva().is_locked());
}

#[test]
fn test_lock_without_compile_records_range_only() {
    let mut ctx = context(ContextConfig { vb_size: 9, vb_start: 3, cva_enabled: false, ..Default::default() });
    ctx.lock_arrays(0, 4).unwrap();
    assert!(ctx.cva().is_locked());
    assert!(!ctx.cva().compiling());

    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();
    assert!(ctx.pipeline().precalc_ranges.is_empty());
    assert_eq!(ctx.immediate().transforms(), vec![vec![0, 1, 2, 2, 3, 0]]);
}

// ============================================================================
// Element capture tests
// ============================================================================

#[test]
fn test_precalc_runs_once_per_lock() {
    let mut ctx = default_context();
    ctx.lock_arrays(0, 4).unwrap();

    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();
    ctx.draw_elements(PrimitiveTopology::Triangles, 3, Indices::U16(&QUAD)).unwrap();

    assert_eq!(ctx.pipeline().precalc_ranges, vec![0..4]);
    assert_eq!(ctx.stats().precalc_passes, 1);
    assert_eq!(ctx.immediate().transforms().len(), 2);
}

#[test]
fn test_precalc_sees_element_stream() {
    let mut ctx = default_context();
    ctx.lock_arrays(0, 4).unwrap();
    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();

    let seen = ctx.pipeline().precalc_summary.unwrap();
    assert!(seen.summary().contains(VertexFlags::ELT));
    assert!(!ctx.summary().summary().contains(VertexFlags::ELT));
    assert_eq!(
        ctx.cva().pending(),
        Some(PendingElements { mode: PrimitiveTopology::Triangles, index_type: IndexType::U16, count: 6 })
    );
}

#[test]
fn test_client_state_change_reruns_precalc() {
    let mut ctx = default_context();
    ctx.lock_arrays(0, 4).unwrap();
    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();

    ctx.color_pointer(4, ElementType::UnsignedByte, 0, &COLORS).unwrap();
    ctx.enable_client_state(ClientState::ColorArray);
    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();

    assert_eq!(ctx.stats().precalc_passes, 2);
}

#[test]
fn test_render_precalc_skips_immediate_path() {
    let mut ctx = default_context();
    ctx.pipeline_mut().precalc_ops = PipelineOps::VERT_XFORM | PipelineOps::RENDER;
    ctx.lock_arrays(0, 4).unwrap();

    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();

    assert_eq!(
        ctx.pipeline().rendered,
        vec![(PrimitiveTopology::Triangles, vec![0, 1, 2, 2, 3, 0])]
    );
    assert!(ctx.immediate().events.is_empty());
    assert!(!ctx.summary().summary().contains(VertexFlags::ELT));
}

#[test]
fn test_indices_outside_lock_are_not_captured() {
    let mut ctx = default_context();
    ctx.lock_arrays(0, 2).unwrap();

    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();

    assert!(ctx.pipeline().precalc_ranges.is_empty());
    assert_eq!(ctx.cva().pending(), None);
    assert_eq!(ctx.cva().phase(), LockPhase::Locked);
    assert_eq!(ctx.immediate().events.first(), Some(&ImmediateEvent::Begin(PrimitiveTopology::Triangles)));
}

#[test]
fn test_unlock_clears_pending() {
    let mut ctx = default_context();
    ctx.lock_arrays(0, 4).unwrap();
    ctx.draw_elements(PrimitiveTopology::Triangles, 6, Indices::U16(&QUAD)).unwrap();
    assert!(ctx.cva().pending().is_some());

    ctx.unlock_arrays();
    assert_eq!(ctx.cva().pending(), None);
    assert_eq!(ctx.cva().ops(), PipelineOps::empty());
}

#[test]
fn test_covers() {
    let mut cva = CvaState::default();
    cva.lock(2..5, true);
    assert!(cva.covers(2, 4));
    assert!(!cva.covers(1, 4));
    assert!(!cva.covers(2, 5));
}

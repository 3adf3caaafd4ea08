use super::*;
use crate::array::types::{AttribStream, ElementType};

static BYTES: [u8; 32] = [0; 32];

fn positions_and_normals() -> ArrayStore<'static> {
    let mut arrays = ArrayStore::new(2);
    arrays.set_vertex(3, ElementType::Float, 0, &BYTES).unwrap();
    arrays.set_normal(ElementType::Float, 0, &BYTES).unwrap();
    arrays.set_enabled(AttribStream::Vertex, true);
    arrays.set_enabled(AttribStream::Normal, true);
    arrays
}

// ============================================================================
// VertexFlags tests
// ============================================================================

#[test]
fn test_obj_size_flags_are_cumulative() {
    assert_eq!(VertexFlags::obj_size(2), VertexFlags::OBJ_2);
    assert_eq!(VertexFlags::obj_size(3), VertexFlags::OBJ_2 | VertexFlags::OBJ_3);
    assert_eq!(VertexFlags::obj_size(4), VertexFlags::OBJ_234);
    assert!(VertexFlags::obj_size(1).is_empty());
}

#[test]
fn test_tex_size_flags_per_unit() {
    let unit0 = VertexFlags::tex_size(0, 2);
    let unit1 = VertexFlags::tex_size(1, 2);

    assert_eq!(unit0.bits().count_ones(), 2);
    assert!(!unit0.intersects(unit1));
    assert!(VertexFlags::tex_any(1).contains(unit1));
    assert!(VertexFlags::TEX_ALL.contains(VertexFlags::tex_any(3)));
    assert!(VertexFlags::tex_size(MAX_TEXTURE_UNITS, 2).is_empty());
}

#[test]
fn test_data_mask_excludes_markers() {
    assert!(!VertexFlags::DATA.contains(VertexFlags::ELT));
    assert!(!VertexFlags::DATA.contains(VertexFlags::END_VB));
    assert!(VertexFlags::DATA.contains(VertexFlags::tex_any(2)));
}

// ============================================================================
// ArraySummary tests
// ============================================================================

#[test]
fn test_update_derives_masks() {
    let mut arrays = positions_and_normals();
    let mut summary = ArraySummary::default();
    summary.update(&mut arrays);

    assert_eq!(summary.summary(), VertexFlags::OBJ_23 | VertexFlags::NORM);
    assert_eq!(summary.or_flags(), VertexFlags::OBJ_23 | VertexFlags::ELT);
    assert_eq!(summary.and_flags(), !(VertexFlags::OBJ_23 | VertexFlags::NORM));
    assert!(summary.array_incr());
    assert!(summary.new_array_state().contains(VertexFlags::NORM));
    assert!(arrays.dirty().is_empty());
}

#[test]
fn test_update_is_idempotent() {
    let mut arrays = positions_and_normals();
    let mut summary = ArraySummary::default();
    summary.set_required(VertexFlags::NORM | VertexFlags::RGBA);

    summary.update(&mut arrays);
    let first = summary;
    summary.update(&mut arrays);

    assert_eq!(summary.summary(), first.summary());
    assert_eq!(summary.required(), first.required());
    assert_eq!(summary.fallback(), first.fallback());
    assert_eq!(summary.flags(), first.flags());
}

#[test]
fn test_fallback_for_required_but_disabled() {
    let mut arrays = positions_and_normals();
    let mut summary = ArraySummary::default();
    summary.update(&mut arrays);
    summary.set_required(VertexFlags::OBJ_234 | VertexFlags::NORM | VertexFlags::RGBA | VertexFlags::tex_any(0));

    assert_eq!(summary.fallback(), VertexFlags::RGBA | VertexFlags::tex_any(0));
}

#[test]
fn test_narrow_tex_coord_is_not_a_fallback() {
    let mut arrays = ArrayStore::new(2);
    arrays.set_tex_coord(0, 2, ElementType::Float, 0, &BYTES).unwrap();
    arrays.set_enabled(AttribStream::TexCoord(0), true);

    let mut summary = ArraySummary::default();
    summary.set_required(VertexFlags::tex_any(0));
    summary.update(&mut arrays);

    assert!(summary.fallback().is_empty());
}

#[test]
fn test_element_bit_marking() {
    let mut arrays = positions_and_normals();
    let mut summary = ArraySummary::default();
    summary.update(&mut arrays);

    summary.mark_elements();
    assert!(summary.summary().contains(VertexFlags::ELT));
    assert!(summary.flags().contains(VertexFlags::ELT));

    summary.clear_elements();
    assert!(!summary.summary().contains(VertexFlags::ELT));
    assert_eq!(summary.summary(), VertexFlags::OBJ_23 | VertexFlags::NORM);
}

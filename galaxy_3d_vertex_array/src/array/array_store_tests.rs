use super::*;
use crate::error::Error;

fn store() -> ArrayStore<'static> {
    ArrayStore::new(2)
}

static BYTES: [u8; 64] = [0; 64];

// ============================================================================
// Stride resolution tests
// ============================================================================

#[test]
fn test_vertex_implicit_stride_for_every_size_and_type() {
    let mut arrays = store();
    for size in 2..=4 {
        for ty in [ElementType::Short, ElementType::Int, ElementType::Float, ElementType::Double] {
            arrays.set_vertex(size, ty, 0, &BYTES).unwrap();
            assert_eq!(arrays.vertex().stride_b, size as usize * ty.size_bytes());
            assert_eq!(arrays.vertex().stride, 0);
        }
    }
}

#[test]
fn test_explicit_stride_is_kept() {
    let mut arrays = store();
    arrays.set_vertex(3, ElementType::Float, 20, &BYTES).unwrap();
    assert_eq!(arrays.vertex().stride_b, 20);

    arrays.set_color(4, ElementType::UnsignedByte, 7, &BYTES).unwrap();
    assert_eq!(arrays.color().stride_b, 7);
}

#[test]
fn test_fixed_width_streams_natural_stride() {
    let mut arrays = store();

    arrays.set_normal(ElementType::Short, 0, &BYTES).unwrap();
    assert_eq!(arrays.normal().stride_b, 6);
    assert_eq!(arrays.normal().size, 3);

    arrays.set_index(ElementType::UnsignedByte, 0, &BYTES).unwrap();
    assert_eq!(arrays.index().stride_b, 1);

    arrays.set_edge_flag(0, &BYTES).unwrap();
    assert_eq!(arrays.edge_flag().stride_b, 1);
    assert_eq!(arrays.edge_flag().ty, ElementType::UnsignedByte);
}

#[test]
fn test_is_packed_requires_canonical_type_and_tight_stride() {
    let mut arrays = store();

    arrays.set_vertex(3, ElementType::Float, 0, &BYTES).unwrap();
    assert!(arrays.vertex().is_packed(ElementType::Float));
    assert!(!arrays.vertex().is_packed(ElementType::Double));

    arrays.set_vertex(3, ElementType::Float, 16, &BYTES).unwrap();
    assert!(!arrays.vertex().is_packed(ElementType::Float));

    arrays.set_vertex(2, ElementType::Short, 0, &BYTES).unwrap();
    assert!(!arrays.vertex().is_packed(ElementType::Float));

    arrays.set_color(4, ElementType::UnsignedByte, 4, &BYTES).unwrap();
    assert!(arrays.color().is_packed(ElementType::UnsignedByte));
}

#[test]
fn test_tex_coord_stride_per_unit() {
    let mut arrays = store();
    arrays.set_tex_coord(1, 2, ElementType::Double, 0, &BYTES).unwrap();

    assert_eq!(arrays.tex_coord(1).unwrap().stride_b, 16);
    assert_eq!(arrays.tex_coord(0).unwrap().stride_b, 16); // untouched default: 4 floats
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_vertex_size_out_of_range() {
    let mut arrays = store();
    assert!(matches!(arrays.set_vertex(1, ElementType::Float, 0, &BYTES), Err(Error::InvalidValue(_))));
    assert!(matches!(arrays.set_vertex(5, ElementType::Float, 0, &BYTES), Err(Error::InvalidValue(_))));
}

#[test]
fn test_negative_stride_rejected() {
    let mut arrays = store();
    assert!(matches!(arrays.set_normal(ElementType::Float, -4, &BYTES), Err(Error::InvalidValue(_))));
    assert!(matches!(arrays.set_edge_flag(-1, &BYTES), Err(Error::InvalidValue(_))));
}

#[test]
fn test_unsupported_type_per_stream() {
    let mut arrays = store();
    assert!(matches!(arrays.set_vertex(3, ElementType::Byte, 0, &BYTES), Err(Error::InvalidEnum(_))));
    assert!(matches!(arrays.set_normal(ElementType::UnsignedByte, 0, &BYTES), Err(Error::InvalidEnum(_))));
    assert!(matches!(arrays.set_index(ElementType::Byte, 0, &BYTES), Err(Error::InvalidEnum(_))));
    assert!(matches!(
        arrays.set_tex_coord(0, 2, ElementType::UnsignedShort, 0, &BYTES),
        Err(Error::InvalidEnum(_))
    ));
}

#[test]
fn test_every_color_type_accepted() {
    let mut arrays = store();
    for ty in COLOR_TYPES {
        assert!(arrays.set_color(3, *ty, 0, &BYTES).is_ok());
    }
}

#[test]
fn test_size_checked_before_type() {
    let mut arrays = store();
    // Both size and type are bad: size wins
    let err = arrays.set_color(2, ElementType::Byte, 0, &BYTES).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)));
}

#[test]
fn test_failed_setter_leaves_state_unchanged() {
    let mut arrays = store();
    arrays.set_vertex(3, ElementType::Float, 0, &BYTES).unwrap();
    arrays.take_dirty();

    let other = [1u8; 8];
    assert!(arrays.set_vertex(3, ElementType::Byte, 0, &other).is_err());

    assert_eq!(arrays.vertex().ty, ElementType::Float);
    assert_eq!(arrays.vertex().data.len(), 64);
    assert!(arrays.dirty().is_empty());
}

#[test]
fn test_tex_coord_unit_out_of_range() {
    let mut arrays = store();
    assert!(matches!(
        arrays.set_tex_coord(2, 2, ElementType::Float, 0, &BYTES),
        Err(Error::InvalidEnum(_))
    ));
    assert!(matches!(arrays.set_client_active_texture(2), Err(Error::InvalidEnum(_))));
}

// ============================================================================
// Dirty mask tests
// ============================================================================

#[test]
fn test_setters_mark_their_stream_dirty() {
    let mut arrays = store();
    arrays.set_normal(ElementType::Float, 0, &BYTES).unwrap();
    arrays.set_tex_coord(1, 2, ElementType::Float, 0, &BYTES).unwrap();

    let dirty = arrays.take_dirty();
    assert_eq!(dirty, VertexFlags::NORM | VertexFlags::tex_any(1));
    assert!(arrays.dirty().is_empty());
}

#[test]
fn test_enable_marks_dirty_only_on_change() {
    let mut arrays = store();
    arrays.set_client_state(ClientState::ColorArray, true);
    assert_eq!(arrays.take_dirty(), VertexFlags::RGBA);

    arrays.set_client_state(ClientState::ColorArray, true);
    assert!(arrays.dirty().is_empty());

    arrays.set_client_state(ClientState::ColorArray, false);
    assert_eq!(arrays.dirty(), VertexFlags::RGBA);
    assert!(!arrays.color().enabled);
}

#[test]
fn test_texture_coord_array_follows_client_active_unit() {
    let mut arrays = store();
    arrays.set_client_active_texture(1).unwrap();
    arrays.set_client_state(ClientState::TextureCoordArray, true);

    assert!(!arrays.tex_coord(0).unwrap().enabled);
    assert!(arrays.tex_coord(1).unwrap().enabled);
}

// ============================================================================
// Array flags tests
// ============================================================================

#[test]
fn test_array_flags_cumulative_widths() {
    let mut arrays = store();
    arrays.set_vertex(3, ElementType::Float, 0, &BYTES).unwrap();
    arrays.set_tex_coord(0, 2, ElementType::Float, 0, &BYTES).unwrap();
    arrays.set_enabled(AttribStream::Vertex, true);
    arrays.set_enabled(AttribStream::TexCoord(0), true);
    arrays.set_enabled(AttribStream::Normal, true);

    let flags = arrays.array_flags();
    assert_eq!(
        flags,
        VertexFlags::OBJ_23 | VertexFlags::NORM | VertexFlags::tex_size(0, 2)
    );
    assert!(!flags.contains(VertexFlags::OBJ_4));
}

#[test]
fn test_converter_follows_descriptor_format() {
    let data = [10i16, 20, 30, 40];
    let mut arrays = ArrayStore::new(1);
    arrays.set_vertex(2, ElementType::Short, 0, bytemuck::cast_slice(&data)).unwrap();

    let desc = arrays.vertex();
    let mut out = [Vec4::ZERO; 2];
    (desc.converter().range)(&mut out, &desc.client(), 0);
    assert_eq!(out[1], Vec4::new(30.0, 40.0, 0.0, 1.0));
}

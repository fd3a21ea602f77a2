/// Tests for PixelFormat metadata

use super::*;

// ============================================================================
// Tests: Table layout
// ============================================================================

#[test]
fn test_all_is_in_declaration_order() {
    for (i, format) in PixelFormat::ALL.iter().enumerate() {
        assert_eq!(format.index(), i, "{:?} out of order", format);
    }
}

#[test]
fn test_unknown_is_index_zero() {
    assert_eq!(PixelFormat::Unknown.index(), 0);
    assert_eq!(PixelFormat::ALL[0], PixelFormat::Unknown);
}

#[test]
fn test_names_are_unique() {
    let mut names: Vec<&str> = PixelFormat::ALL.iter().map(|f| f.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), PixelFormat::COUNT);
}

// ============================================================================
// Tests: Predicates
// ============================================================================

#[test]
fn test_depth_formats() {
    assert!(PixelFormat::D16_UNORM.is_depth());
    assert!(PixelFormat::D24_UNORM.is_depth());
    assert!(PixelFormat::D32_SFLOAT.is_depth());
    assert!(PixelFormat::D24_UNORM_S8_UINT.is_depth());
    assert!(!PixelFormat::R8G8B8A8_UNORM.is_depth());
    assert!(!PixelFormat::Unknown.is_depth());
}

#[test]
fn test_stencil_only_on_packed_depth() {
    let with_stencil: Vec<PixelFormat> = PixelFormat::ALL
        .iter()
        .copied()
        .filter(|f| f.has_stencil())
        .collect();
    assert_eq!(
        with_stencil,
        vec![PixelFormat::D24_UNORM_S8_UINT, PixelFormat::D32_SFLOAT_S8_UINT]
    );
}

#[test]
fn test_compressed_formats() {
    assert!(PixelFormat::BC1_RGBA_UNORM.is_compressed());
    assert!(PixelFormat::ETC2_R8G8B8_UNORM.is_compressed());
    assert!(PixelFormat::ASTC_4x4_UNORM.is_compressed());
    assert!(!PixelFormat::R5G6B5_UNORM_PACK16.is_compressed());
}

#[test]
fn test_floating_point_formats() {
    assert!(PixelFormat::R16G16B16A16_SFLOAT.is_floating_point());
    assert!(PixelFormat::B10G11R11_UFLOAT_PACK32.is_floating_point());
    assert!(PixelFormat::D32_SFLOAT.is_floating_point());
    assert!(!PixelFormat::D24_UNORM.is_floating_point());
}

#[test]
fn test_alpha_and_luminance() {
    assert!(PixelFormat::L8A8_UNORM.is_luminance());
    assert!(PixelFormat::L8A8_UNORM.has_alpha());
    assert!(!PixelFormat::R8G8B8_UNORM.has_alpha());
}

#[test]
fn test_depth_and_stencil_bits() {
    assert_eq!(PixelFormat::D16_UNORM.depth_bits(), 16);
    assert_eq!(PixelFormat::D24_UNORM_S8_UINT.depth_bits(), 24);
    assert_eq!(PixelFormat::D24_UNORM_S8_UINT.stencil_bits(), 8);
    assert_eq!(PixelFormat::R8G8B8A8_UNORM.depth_bits(), 0);
}

#[test]
fn test_component_types() {
    assert_eq!(PixelFormat::R8G8B8A8_UNORM.component_type(), PixelComponentType::Byte);
    assert_eq!(PixelFormat::R16_SFLOAT.component_type(), PixelComponentType::Float16);
    assert_eq!(PixelFormat::R32G32_SFLOAT.component_type(), PixelComponentType::Float32);
    assert_eq!(PixelFormat::D16_UNORM.component_type(), PixelComponentType::Short);
    assert_eq!(PixelFormat::R5G6B5_UNORM_PACK16.component_type(), PixelComponentType::Packed);
}

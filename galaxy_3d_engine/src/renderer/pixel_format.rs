/// Pixel format metadata - semantic formats shared by every render-system backend
///
/// Backends map these to their native enums (GL internal format, origin
/// format and data type for the GLES2 backend) and probe which of them are
/// renderable. The predicates here are the backend-independent part.

use bitflags::bitflags;

/// Semantic pixel format
///
/// `Unknown` is the format-agnostic sentinel used for render targets that
/// carry only depth and/or stencil attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    Unknown,

    // Luminance / alpha formats
    L8_UNORM,
    L8A8_UNORM,
    A8_UNORM,

    // Byte color formats
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,

    // Packed color formats
    R5G6B5_UNORM_PACK16,
    R4G4B4A4_UNORM_PACK16,
    R5G5B5A1_UNORM_PACK16,
    A2B10G10R10_UNORM_PACK32,
    B10G11R11_UFLOAT_PACK32,

    // Floating point formats
    R16_SFLOAT,
    R16G16_SFLOAT,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Depth / stencil formats
    D16_UNORM,
    D24_UNORM,
    D32_SFLOAT,
    D24_UNORM_S8_UINT,
    D32_SFLOAT_S8_UINT,

    // Block compressed formats
    BC1_RGBA_UNORM,
    BC2_UNORM,
    BC3_UNORM,
    ETC2_R8G8B8_UNORM,
    ETC2_R8G8B8A8_UNORM,
    ASTC_4x4_UNORM,
}

bitflags! {
    /// Static properties of a pixel format
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PixelFormatFlags: u32 {
        const HAS_ALPHA  = 1 << 0;
        const COMPRESSED = 1 << 1;
        const FLOAT      = 1 << 2;
        const DEPTH      = 1 << 3;
        const STENCIL    = 1 << 4;
        const LUMINANCE  = 1 << 5;
    }
}

/// Storage type of the individual components of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelComponentType {
    /// 8-bit unsigned normalized
    Byte,
    /// 16-bit unsigned normalized
    Short,
    /// 32-bit unsigned integer
    Int,
    /// 16-bit float
    Float16,
    /// 32-bit float
    Float32,
    /// Bit-packed or block-compressed storage
    Packed,
}

/// Everything the engine knows statically about a format
struct PixelFormatDesc {
    name: &'static str,
    flags: PixelFormatFlags,
    component_type: PixelComponentType,
    depth_bits: u8,
    stencil_bits: u8,
}

const fn desc(
    name: &'static str,
    flags: PixelFormatFlags,
    component_type: PixelComponentType,
    depth_bits: u8,
    stencil_bits: u8,
) -> PixelFormatDesc {
    PixelFormatDesc { name, flags, component_type, depth_bits, stencil_bits }
}

impl PixelFormat {
    /// Every format, in declaration order (`ALL[f.index()] == f`)
    pub const ALL: [PixelFormat; 32] = [
        PixelFormat::Unknown,
        PixelFormat::L8_UNORM,
        PixelFormat::L8A8_UNORM,
        PixelFormat::A8_UNORM,
        PixelFormat::R8_UNORM,
        PixelFormat::R8G8_UNORM,
        PixelFormat::R8G8B8_UNORM,
        PixelFormat::R8G8B8A8_UNORM,
        PixelFormat::R8G8B8A8_SRGB,
        PixelFormat::B8G8R8A8_UNORM,
        PixelFormat::R5G6B5_UNORM_PACK16,
        PixelFormat::R4G4B4A4_UNORM_PACK16,
        PixelFormat::R5G5B5A1_UNORM_PACK16,
        PixelFormat::A2B10G10R10_UNORM_PACK32,
        PixelFormat::B10G11R11_UFLOAT_PACK32,
        PixelFormat::R16_SFLOAT,
        PixelFormat::R16G16_SFLOAT,
        PixelFormat::R16G16B16A16_SFLOAT,
        PixelFormat::R32_SFLOAT,
        PixelFormat::R32G32_SFLOAT,
        PixelFormat::R32G32B32A32_SFLOAT,
        PixelFormat::D16_UNORM,
        PixelFormat::D24_UNORM,
        PixelFormat::D32_SFLOAT,
        PixelFormat::D24_UNORM_S8_UINT,
        PixelFormat::D32_SFLOAT_S8_UINT,
        PixelFormat::BC1_RGBA_UNORM,
        PixelFormat::BC2_UNORM,
        PixelFormat::BC3_UNORM,
        PixelFormat::ETC2_R8G8B8_UNORM,
        PixelFormat::ETC2_R8G8B8A8_UNORM,
        PixelFormat::ASTC_4x4_UNORM,
    ];

    /// Number of formats
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of this format, usable to address per-format tables
    pub fn index(self) -> usize {
        self as usize
    }

    fn desc(self) -> PixelFormatDesc {
        use PixelComponentType as C;
        use PixelFormatFlags as F;

        let none = F::empty();
        match self {
            PixelFormat::Unknown => desc("PF_UNKNOWN", none, C::Byte, 0, 0),
            PixelFormat::L8_UNORM => desc("PF_L8", F::LUMINANCE, C::Byte, 0, 0),
            PixelFormat::L8A8_UNORM => {
                desc("PF_BYTE_LA", F::LUMINANCE.union(F::HAS_ALPHA), C::Byte, 0, 0)
            }
            PixelFormat::A8_UNORM => desc("PF_A8", F::HAS_ALPHA, C::Byte, 0, 0),
            PixelFormat::R8_UNORM => desc("PF_R8", none, C::Byte, 0, 0),
            PixelFormat::R8G8_UNORM => desc("PF_RG8", none, C::Byte, 0, 0),
            PixelFormat::R8G8B8_UNORM => desc("PF_BYTE_RGB", none, C::Byte, 0, 0),
            PixelFormat::R8G8B8A8_UNORM => desc("PF_BYTE_RGBA", F::HAS_ALPHA, C::Byte, 0, 0),
            PixelFormat::R8G8B8A8_SRGB => desc("PF_BYTE_RGBA_SRGB", F::HAS_ALPHA, C::Byte, 0, 0),
            PixelFormat::B8G8R8A8_UNORM => desc("PF_BYTE_BGRA", F::HAS_ALPHA, C::Byte, 0, 0),
            PixelFormat::R5G6B5_UNORM_PACK16 => desc("PF_R5G6B5", none, C::Packed, 0, 0),
            PixelFormat::R4G4B4A4_UNORM_PACK16 => desc("PF_A4R4G4B4", F::HAS_ALPHA, C::Packed, 0, 0),
            PixelFormat::R5G5B5A1_UNORM_PACK16 => desc("PF_A1R5G5B5", F::HAS_ALPHA, C::Packed, 0, 0),
            PixelFormat::A2B10G10R10_UNORM_PACK32 => {
                desc("PF_A2B10G10R10", F::HAS_ALPHA, C::Packed, 0, 0)
            }
            PixelFormat::B10G11R11_UFLOAT_PACK32 => desc("PF_R11G11B10_FLOAT", F::FLOAT, C::Packed, 0, 0),
            PixelFormat::R16_SFLOAT => desc("PF_FLOAT16_R", F::FLOAT, C::Float16, 0, 0),
            PixelFormat::R16G16_SFLOAT => desc("PF_FLOAT16_GR", F::FLOAT, C::Float16, 0, 0),
            PixelFormat::R16G16B16A16_SFLOAT => {
                desc("PF_FLOAT16_RGBA", F::FLOAT.union(F::HAS_ALPHA), C::Float16, 0, 0)
            }
            PixelFormat::R32_SFLOAT => desc("PF_FLOAT32_R", F::FLOAT, C::Float32, 0, 0),
            PixelFormat::R32G32_SFLOAT => desc("PF_FLOAT32_GR", F::FLOAT, C::Float32, 0, 0),
            PixelFormat::R32G32B32A32_SFLOAT => {
                desc("PF_FLOAT32_RGBA", F::FLOAT.union(F::HAS_ALPHA), C::Float32, 0, 0)
            }
            PixelFormat::D16_UNORM => desc("PF_DEPTH16", F::DEPTH, C::Short, 16, 0),
            PixelFormat::D24_UNORM => desc("PF_DEPTH24", F::DEPTH, C::Int, 24, 0),
            PixelFormat::D32_SFLOAT => {
                desc("PF_DEPTH32F", F::DEPTH.union(F::FLOAT), C::Float32, 32, 0)
            }
            PixelFormat::D24_UNORM_S8_UINT => {
                desc("PF_DEPTH24_STENCIL8", F::DEPTH.union(F::STENCIL), C::Int, 24, 8)
            }
            PixelFormat::D32_SFLOAT_S8_UINT => desc(
                "PF_DEPTH32F_STENCIL8",
                F::DEPTH.union(F::STENCIL).union(F::FLOAT),
                C::Float32,
                32,
                8,
            ),
            PixelFormat::BC1_RGBA_UNORM => {
                desc("PF_DXT1", F::COMPRESSED.union(F::HAS_ALPHA), C::Packed, 0, 0)
            }
            PixelFormat::BC2_UNORM => desc("PF_DXT3", F::COMPRESSED.union(F::HAS_ALPHA), C::Packed, 0, 0),
            PixelFormat::BC3_UNORM => desc("PF_DXT5", F::COMPRESSED.union(F::HAS_ALPHA), C::Packed, 0, 0),
            PixelFormat::ETC2_R8G8B8_UNORM => desc("PF_ETC2_RGB8", F::COMPRESSED, C::Packed, 0, 0),
            PixelFormat::ETC2_R8G8B8A8_UNORM => {
                desc("PF_ETC2_RGBA8", F::COMPRESSED.union(F::HAS_ALPHA), C::Packed, 0, 0)
            }
            PixelFormat::ASTC_4x4_UNORM => {
                desc("PF_ASTC_RGBA_4X4_LDR", F::COMPRESSED.union(F::HAS_ALPHA), C::Packed, 0, 0)
            }
        }
    }

    /// Human-readable name used in diagnostic logs
    pub fn name(self) -> &'static str {
        self.desc().name
    }

    /// Static property flags
    pub fn flags(self) -> PixelFormatFlags {
        self.desc().flags
    }

    /// Component storage type
    pub fn component_type(self) -> PixelComponentType {
        self.desc().component_type
    }

    pub fn is_compressed(self) -> bool {
        self.flags().contains(PixelFormatFlags::COMPRESSED)
    }

    pub fn is_floating_point(self) -> bool {
        self.flags().contains(PixelFormatFlags::FLOAT)
    }

    /// True for formats that carry a depth component (packed depth/stencil included)
    pub fn is_depth(self) -> bool {
        self.flags().contains(PixelFormatFlags::DEPTH)
    }

    pub fn has_stencil(self) -> bool {
        self.flags().contains(PixelFormatFlags::STENCIL)
    }

    pub fn has_alpha(self) -> bool {
        self.flags().contains(PixelFormatFlags::HAS_ALPHA)
    }

    pub fn is_luminance(self) -> bool {
        self.flags().contains(PixelFormatFlags::LUMINANCE)
    }

    /// Depth bits (0 for color formats)
    pub fn depth_bits(self) -> u8 {
        self.desc().depth_bits
    }

    /// Stencil bits (0 unless the format packs a stencil component)
    pub fn stencil_bits(self) -> u8 {
        self.desc().stencil_bits
    }
}

#[cfg(test)]
#[path = "pixel_format_tests.rs"]
mod tests;

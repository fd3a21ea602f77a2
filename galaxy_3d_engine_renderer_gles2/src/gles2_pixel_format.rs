/// Pixel format mapping between engine formats and OpenGL ES enums
///
/// Each format maps to a (internal format, origin format, data type) triple.
/// The triple depends on the feature tier: GLES3 uses sized internal
/// formats, GLES2 requires internal == origin and gates most formats behind
/// extensions. A component is `GL_NONE` when the current driver cannot
/// represent the format at all.

use galaxy_3d_engine::galaxy3d::render::PixelFormat;
use crate::gles2_consts::*;
use crate::gles2_driver::{GlExtensions, Gles2Capabilities};

/// GL enums describing one pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlFormatMapping {
    pub internal_format: GLenum,
    pub origin_format: GLenum,
    pub data_type: GLenum,
}

impl GlFormatMapping {
    pub const NONE: GlFormatMapping = GlFormatMapping::new(GL_NONE, GL_NONE, GL_NONE);

    const fn new(internal_format: GLenum, origin_format: GLenum, data_type: GLenum) -> Self {
        Self { internal_format, origin_format, data_type }
    }

    /// True when any of the three enums is missing
    pub fn has_none(&self) -> bool {
        self.internal_format == GL_NONE || self.origin_format == GL_NONE || self.data_type == GL_NONE
    }
}

struct TierEntry {
    mapping: GlFormatMapping,
    requires: GlExtensions,
}

const fn entry(internal: GLenum, origin: GLenum, data_type: GLenum, requires: GlExtensions) -> TierEntry {
    TierEntry { mapping: GlFormatMapping::new(internal, origin, data_type), requires }
}

const UNSUPPORTED: TierEntry = entry(GL_NONE, GL_NONE, GL_NONE, GlExtensions::empty());

fn gles3_entry(format: PixelFormat) -> TierEntry {
    use GlExtensions as X;
    let core = X::empty();

    match format {
        PixelFormat::Unknown => UNSUPPORTED,
        PixelFormat::L8_UNORM => entry(GL_LUMINANCE, GL_LUMINANCE, GL_UNSIGNED_BYTE, core),
        PixelFormat::L8A8_UNORM => entry(GL_LUMINANCE_ALPHA, GL_LUMINANCE_ALPHA, GL_UNSIGNED_BYTE, core),
        PixelFormat::A8_UNORM => entry(GL_ALPHA, GL_ALPHA, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8_UNORM => entry(GL_R8, GL_RED, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8G8_UNORM => entry(GL_RG8, GL_RG, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8G8B8_UNORM => entry(GL_RGB8, GL_RGB, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8G8B8A8_UNORM => entry(GL_RGBA8, GL_RGBA, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8G8B8A8_SRGB => entry(GL_SRGB8_ALPHA8, GL_RGBA, GL_UNSIGNED_BYTE, core),
        PixelFormat::B8G8R8A8_UNORM => {
            entry(GL_BGRA_EXT, GL_BGRA_EXT, GL_UNSIGNED_BYTE, X::TEXTURE_FORMAT_BGRA8888)
        }
        PixelFormat::R5G6B5_UNORM_PACK16 => entry(GL_RGB565, GL_RGB, GL_UNSIGNED_SHORT_5_6_5, core),
        PixelFormat::R4G4B4A4_UNORM_PACK16 => entry(GL_RGBA4, GL_RGBA, GL_UNSIGNED_SHORT_4_4_4_4, core),
        PixelFormat::R5G5B5A1_UNORM_PACK16 => entry(GL_RGB5_A1, GL_RGBA, GL_UNSIGNED_SHORT_5_5_5_1, core),
        PixelFormat::A2B10G10R10_UNORM_PACK32 => {
            entry(GL_RGB10_A2, GL_RGBA, GL_UNSIGNED_INT_2_10_10_10_REV, core)
        }
        PixelFormat::B10G11R11_UFLOAT_PACK32 => {
            entry(GL_R11F_G11F_B10F, GL_RGB, GL_UNSIGNED_INT_10F_11F_11F_REV, core)
        }
        PixelFormat::R16_SFLOAT => entry(GL_R16F, GL_RED, GL_HALF_FLOAT, core),
        PixelFormat::R16G16_SFLOAT => entry(GL_RG16F, GL_RG, GL_HALF_FLOAT, core),
        PixelFormat::R16G16B16A16_SFLOAT => entry(GL_RGBA16F, GL_RGBA, GL_HALF_FLOAT, core),
        PixelFormat::R32_SFLOAT => entry(GL_R32F, GL_RED, GL_FLOAT, core),
        PixelFormat::R32G32_SFLOAT => entry(GL_RG32F, GL_RG, GL_FLOAT, core),
        PixelFormat::R32G32B32A32_SFLOAT => entry(GL_RGBA32F, GL_RGBA, GL_FLOAT, core),
        PixelFormat::D16_UNORM => entry(GL_DEPTH_COMPONENT16, GL_DEPTH_COMPONENT, GL_UNSIGNED_SHORT, core),
        PixelFormat::D24_UNORM => {
            entry(GL_DEPTH_COMPONENT24_OES, GL_DEPTH_COMPONENT, GL_UNSIGNED_INT, core)
        }
        PixelFormat::D32_SFLOAT => entry(GL_DEPTH_COMPONENT32F, GL_DEPTH_COMPONENT, GL_FLOAT, core),
        PixelFormat::D24_UNORM_S8_UINT => {
            entry(GL_DEPTH24_STENCIL8_OES, GL_DEPTH_STENCIL, GL_UNSIGNED_INT_24_8, core)
        }
        PixelFormat::D32_SFLOAT_S8_UINT => {
            entry(GL_DEPTH32F_STENCIL8, GL_DEPTH_STENCIL, GL_FLOAT_32_UNSIGNED_INT_24_8_REV, core)
        }
        PixelFormat::BC1_RGBA_UNORM => entry(
            GL_COMPRESSED_RGBA_S3TC_DXT1_EXT,
            GL_COMPRESSED_RGBA_S3TC_DXT1_EXT,
            GL_UNSIGNED_BYTE,
            X::TEXTURE_COMPRESSION_S3TC,
        ),
        PixelFormat::BC2_UNORM => entry(
            GL_COMPRESSED_RGBA_S3TC_DXT3_EXT,
            GL_COMPRESSED_RGBA_S3TC_DXT3_EXT,
            GL_UNSIGNED_BYTE,
            X::TEXTURE_COMPRESSION_S3TC,
        ),
        PixelFormat::BC3_UNORM => entry(
            GL_COMPRESSED_RGBA_S3TC_DXT5_EXT,
            GL_COMPRESSED_RGBA_S3TC_DXT5_EXT,
            GL_UNSIGNED_BYTE,
            X::TEXTURE_COMPRESSION_S3TC,
        ),
        PixelFormat::ETC2_R8G8B8_UNORM => {
            entry(GL_COMPRESSED_RGB8_ETC2, GL_COMPRESSED_RGB8_ETC2, GL_UNSIGNED_BYTE, core)
        }
        PixelFormat::ETC2_R8G8B8A8_UNORM => {
            entry(GL_COMPRESSED_RGBA8_ETC2_EAC, GL_COMPRESSED_RGBA8_ETC2_EAC, GL_UNSIGNED_BYTE, core)
        }
        PixelFormat::ASTC_4x4_UNORM => entry(
            GL_COMPRESSED_RGBA_ASTC_4X4_KHR,
            GL_COMPRESSED_RGBA_ASTC_4X4_KHR,
            GL_UNSIGNED_BYTE,
            X::TEXTURE_COMPRESSION_ASTC,
        ),
    }
}

fn gles2_entry(format: PixelFormat) -> TierEntry {
    use GlExtensions as X;
    let core = X::empty();

    match format {
        PixelFormat::R8_UNORM => entry(GL_RED, GL_RED, GL_UNSIGNED_BYTE, X::TEXTURE_RG),
        PixelFormat::R8G8_UNORM => entry(GL_RG, GL_RG, GL_UNSIGNED_BYTE, X::TEXTURE_RG),
        PixelFormat::R8G8B8_UNORM => entry(GL_RGB, GL_RGB, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8G8B8A8_UNORM => entry(GL_RGBA, GL_RGBA, GL_UNSIGNED_BYTE, core),
        PixelFormat::R8G8B8A8_SRGB => {
            entry(GL_SRGB_ALPHA_EXT, GL_SRGB_ALPHA_EXT, GL_UNSIGNED_BYTE, X::SRGB)
        }
        PixelFormat::R5G6B5_UNORM_PACK16 => entry(GL_RGB, GL_RGB, GL_UNSIGNED_SHORT_5_6_5, core),
        PixelFormat::R4G4B4A4_UNORM_PACK16 => entry(GL_RGBA, GL_RGBA, GL_UNSIGNED_SHORT_4_4_4_4, core),
        PixelFormat::R5G5B5A1_UNORM_PACK16 => entry(GL_RGBA, GL_RGBA, GL_UNSIGNED_SHORT_5_5_5_1, core),
        PixelFormat::R16_SFLOAT => {
            entry(GL_RED, GL_RED, GL_HALF_FLOAT_OES, X::TEXTURE_HALF_FLOAT.union(X::TEXTURE_RG))
        }
        PixelFormat::R16G16_SFLOAT => {
            entry(GL_RG, GL_RG, GL_HALF_FLOAT_OES, X::TEXTURE_HALF_FLOAT.union(X::TEXTURE_RG))
        }
        PixelFormat::R16G16B16A16_SFLOAT => {
            entry(GL_RGBA, GL_RGBA, GL_HALF_FLOAT_OES, X::TEXTURE_HALF_FLOAT)
        }
        PixelFormat::R32_SFLOAT => {
            entry(GL_RED, GL_RED, GL_FLOAT, X::TEXTURE_FLOAT.union(X::TEXTURE_RG))
        }
        PixelFormat::R32G32_SFLOAT => {
            entry(GL_RG, GL_RG, GL_FLOAT, X::TEXTURE_FLOAT.union(X::TEXTURE_RG))
        }
        PixelFormat::R32G32B32A32_SFLOAT => entry(GL_RGBA, GL_RGBA, GL_FLOAT, X::TEXTURE_FLOAT),
        PixelFormat::D16_UNORM => {
            entry(GL_DEPTH_COMPONENT, GL_DEPTH_COMPONENT, GL_UNSIGNED_SHORT, X::DEPTH_TEXTURE)
        }
        PixelFormat::D24_UNORM => {
            entry(GL_DEPTH_COMPONENT, GL_DEPTH_COMPONENT, GL_UNSIGNED_INT, X::DEPTH_TEXTURE)
        }
        PixelFormat::D24_UNORM_S8_UINT => entry(
            GL_DEPTH_STENCIL,
            GL_DEPTH_STENCIL,
            GL_UNSIGNED_INT_24_8,
            X::DEPTH_TEXTURE.union(X::PACKED_DEPTH_STENCIL),
        ),
        // No GLES2 representation for these
        PixelFormat::A2B10G10R10_UNORM_PACK32
        | PixelFormat::B10G11R11_UFLOAT_PACK32
        | PixelFormat::D32_SFLOAT
        | PixelFormat::D32_SFLOAT_S8_UINT
        | PixelFormat::ETC2_R8G8B8_UNORM
        | PixelFormat::ETC2_R8G8B8A8_UNORM => UNSUPPORTED,
        // Luminance, alpha, BGRA and compressed formats keep their GLES3 enums
        other => gles3_entry(other),
    }
}

/// Pixel format mapping for one driver
///
/// Built from the capabilities of the current context; rebuilt whenever the
/// context is reset.
#[derive(Debug, Clone, Copy)]
pub struct Gles2PixelUtil {
    caps: Gles2Capabilities,
}

impl Gles2PixelUtil {
    pub fn new(caps: Gles2Capabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> &Gles2Capabilities {
        &self.caps
    }

    /// Full mapping of `format`, `GlFormatMapping::NONE` when unavailable
    pub fn mapping(&self, format: PixelFormat) -> GlFormatMapping {
        let entry = if self.caps.is_gles3() { gles3_entry(format) } else { gles2_entry(format) };
        if self.caps.has(entry.requires) {
            entry.mapping
        } else {
            GlFormatMapping::NONE
        }
    }

    pub fn gl_internal_format(&self, format: PixelFormat) -> GLenum {
        self.mapping(format).internal_format
    }

    pub fn gl_origin_format(&self, format: PixelFormat) -> GLenum {
        self.mapping(format).origin_format
    }

    pub fn gl_origin_data_type(&self, format: PixelFormat) -> GLenum {
        self.mapping(format).data_type
    }

    /// Engine format matching a GL internal format, `Unknown` when none does
    ///
    /// Unsized GLES2 internal formats are ambiguous (`GL_RGBA` covers several
    /// packings); the byte-per-component format wins since it is listed first.
    pub fn closest_pixel_format(&self, internal_format: GLenum) -> PixelFormat {
        if internal_format == GL_NONE {
            return PixelFormat::Unknown;
        }
        PixelFormat::ALL
            .iter()
            .copied()
            .find(|&format| self.gl_internal_format(format) == internal_format)
            .unwrap_or(PixelFormat::Unknown)
    }
}

/// True for internal formats carrying both depth and stencil
pub fn is_packed_depth_stencil(internal_format: GLenum) -> bool {
    matches!(
        internal_format,
        GL_DEPTH24_STENCIL8_OES | GL_DEPTH32F_STENCIL8 | GL_DEPTH_STENCIL
    )
}

#[cfg(test)]
#[path = "gles2_pixel_format_tests.rs"]
mod tests;

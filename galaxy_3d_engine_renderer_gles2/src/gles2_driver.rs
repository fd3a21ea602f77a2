/// GlDriver - the slice of the OpenGL ES API the FBO manager talks to
///
/// Every GL call made by the backend goes through this trait so the prober,
/// the renderbuffer cache and the framebuffer objects can run against a real
/// context (`GlowDriver`) or a scripted one in tests.
///
/// Object names are plain `GLuint`s, `0` meaning "no object" exactly like in
/// the C API. All calls are made from the thread owning the context.

use bitflags::bitflags;
use galaxy_3d_engine::galaxy3d::Result;
use crate::gles2_consts::*;

/// GL / GLES version reported by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

pub trait GlDriver {
    /// Context version
    fn version(&self) -> GlVersion;

    /// True when the context version is at least `major.minor`
    fn has_min_gl_version(&self, major: u32, minor: u32) -> bool {
        self.version() >= GlVersion::new(major, minor)
    }

    /// True when the extension string list contains `name`
    fn check_extension(&self, name: &str) -> bool;

    fn get_integer(&self, pname: GLenum) -> GLint;

    /// Pop the oldest recorded error (`GL_NO_ERROR` when none)
    fn get_error(&self) -> GLenum;

    // ===== FRAMEBUFFERS =====

    fn gen_framebuffer(&self) -> Result<GLuint>;
    /// Delete framebuffers; `0` entries are ignored
    fn delete_framebuffers(&self, framebuffers: &[GLuint]);
    fn bind_framebuffer(&self, target: GLenum, framebuffer: GLuint);
    fn check_framebuffer_status(&self, target: GLenum) -> GLenum;
    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        texture_target: GLenum,
        texture: GLuint,
        level: GLint,
    );
    fn framebuffer_renderbuffer(
        &self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    );
    /// Copy `src` (x0, y0, x1, y1) of the read framebuffer to `dst` of the draw framebuffer
    fn blit_framebuffer(&self, src: [GLint; 4], dst: [GLint; 4], mask: GLbitfield, filter: GLenum);

    // ===== RENDERBUFFERS =====

    fn gen_renderbuffer(&self) -> Result<GLuint>;
    /// Delete renderbuffers; `0` entries are ignored
    fn delete_renderbuffers(&self, renderbuffers: &[GLuint]);
    fn bind_renderbuffer(&self, target: GLenum, renderbuffer: GLuint);
    fn renderbuffer_storage(
        &self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    );
    fn renderbuffer_storage_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    );

    // ===== TEXTURES =====

    fn gen_texture(&self) -> Result<GLuint>;
    /// Delete textures; `0` entries are ignored
    fn delete_textures(&self, textures: &[GLuint]);
    fn bind_texture(&self, target: GLenum, texture: GLuint);
    fn tex_parameter_i32(&self, target: GLenum, pname: GLenum, param: GLint);
    /// Allocate level storage without uploading pixels
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        data_type: GLenum,
    );
}

bitflags! {
    /// Driver extensions that change which formats and attachments exist
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GlExtensions: u32 {
        const TEXTURE_FORMAT_BGRA8888    = 1 << 0;
        const TEXTURE_COMPRESSION_S3TC   = 1 << 1;
        const TEXTURE_COMPRESSION_ASTC   = 1 << 2;
        const TEXTURE_HALF_FLOAT         = 1 << 3;
        const TEXTURE_FLOAT              = 1 << 4;
        const TEXTURE_RG                 = 1 << 5;
        const SRGB                       = 1 << 6;
        const DEPTH_TEXTURE              = 1 << 7;
        const PACKED_DEPTH_STENCIL       = 1 << 8;
        const DEPTH24                    = 1 << 9;
    }
}

impl GlExtensions {
    /// Extension string backing each flag
    pub const NAMES: [(GlExtensions, &'static str); 10] = [
        (GlExtensions::TEXTURE_FORMAT_BGRA8888, "GL_EXT_texture_format_BGRA8888"),
        (GlExtensions::TEXTURE_COMPRESSION_S3TC, "GL_EXT_texture_compression_s3tc"),
        (GlExtensions::TEXTURE_COMPRESSION_ASTC, "GL_KHR_texture_compression_astc_ldr"),
        (GlExtensions::TEXTURE_HALF_FLOAT, "GL_OES_texture_half_float"),
        (GlExtensions::TEXTURE_FLOAT, "GL_OES_texture_float"),
        (GlExtensions::TEXTURE_RG, "GL_EXT_texture_rg"),
        (GlExtensions::SRGB, "GL_EXT_sRGB"),
        (GlExtensions::DEPTH_TEXTURE, "GL_OES_depth_texture"),
        (GlExtensions::PACKED_DEPTH_STENCIL, "GL_OES_packed_depth_stencil"),
        (GlExtensions::DEPTH24, "GL_OES_depth24"),
    ];

    /// Query every known extension from the driver
    pub fn query(driver: &dyn GlDriver) -> Self {
        Self::NAMES
            .iter()
            .filter(|(_, name)| driver.check_extension(name))
            .fold(GlExtensions::empty(), |acc, (flag, _)| acc | *flag)
    }
}

/// Snapshot of what the current context can do
///
/// Taken once per probe: a context reset re-queries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gles2Capabilities {
    pub version: GlVersion,
    pub extensions: GlExtensions,
}

impl Gles2Capabilities {
    pub fn query(driver: &dyn GlDriver) -> Self {
        Self {
            version: driver.version(),
            extensions: GlExtensions::query(driver),
        }
    }

    /// GLES 3.0 feature tier (sized formats, multisampling, blits, depth32f)
    pub fn is_gles3(&self) -> bool {
        self.version >= GlVersion::new(3, 0)
    }

    pub fn has(&self, extensions: GlExtensions) -> bool {
        self.extensions.contains(extensions)
    }

    /// Packed depth/stencil renderbuffers are core in GLES3, an extension before
    pub fn supports_packed_depth_stencil(&self) -> bool {
        self.is_gles3() || self.has(GlExtensions::PACKED_DEPTH_STENCIL)
    }
}

#[cfg(test)]
#[path = "gles2_driver_tests.rs"]
mod tests;

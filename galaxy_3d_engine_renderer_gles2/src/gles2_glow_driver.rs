/// GlowDriver - `GlDriver` on top of a live glow context
///
/// Thin forwarding layer: names are converted between `GLuint` and glow's
/// native handle types, nothing else is cached besides the version.

use std::num::NonZeroU32;
use glow::HasContext;
use galaxy_3d_engine::galaxy3d::Result;
use galaxy_3d_engine::engine_err;
use crate::gles2_consts::*;
use crate::gles2_driver::{GlDriver, GlVersion};

const SOURCE: &str = "galaxy3d::gles2::GlowDriver";

pub struct GlowDriver {
    gl: glow::Context,
    version: GlVersion,
}

impl GlowDriver {
    /// Wrap an existing glow context
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as the driver
    /// is used, and every call must happen on that thread.
    pub unsafe fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        let version = GlVersion::new(version.major, version.minor);
        Self { gl, version }
    }

    /// Load GL entry points with a platform loader (EGL, EAGL, ...)
    ///
    /// # Safety
    ///
    /// Same contract as [`GlowDriver::new`]; `loader` must return valid
    /// function pointers for the current context.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader))
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    #[cfg(feature = "gl-error-check")]
    fn check_error(&self, call: &str) {
        use galaxy_3d_engine::engine_warn;

        let error = unsafe { self.gl.get_error() };
        if error != GL_NO_ERROR {
            engine_warn!(SOURCE, "{} failed: {}", call, gl_error_name(error));
        }
    }

    #[cfg(not(feature = "gl-error-check"))]
    #[inline(always)]
    fn check_error(&self, _call: &str) {}
}

fn framebuffer(name: GLuint) -> Option<glow::Framebuffer> {
    NonZeroU32::new(name).map(glow::NativeFramebuffer)
}

fn renderbuffer(name: GLuint) -> Option<glow::Renderbuffer> {
    NonZeroU32::new(name).map(glow::NativeRenderbuffer)
}

fn texture(name: GLuint) -> Option<glow::Texture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

// SAFETY (whole impl): the constructors require the context to be current on
// this thread, and every name passed back to GL was produced by this context.
impl GlDriver for GlowDriver {
    fn version(&self) -> GlVersion {
        self.version
    }

    fn check_extension(&self, name: &str) -> bool {
        self.gl.supported_extensions().contains(name)
    }

    fn get_integer(&self, pname: GLenum) -> GLint {
        let value = unsafe { self.gl.get_parameter_i32(pname) };
        self.check_error("glGetIntegerv");
        value
    }

    fn get_error(&self) -> GLenum {
        unsafe { self.gl.get_error() }
    }

    // ===== FRAMEBUFFERS =====

    fn gen_framebuffer(&self) -> Result<GLuint> {
        let fb = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| engine_err!(SOURCE, "glGenFramebuffers failed: {}", e))?;
        Ok(fb.0.get())
    }

    fn delete_framebuffers(&self, framebuffers: &[GLuint]) {
        for fb in framebuffers.iter().filter_map(|&name| framebuffer(name)) {
            unsafe { self.gl.delete_framebuffer(fb) };
        }
        self.check_error("glDeleteFramebuffers");
    }

    fn bind_framebuffer(&self, target: GLenum, framebuffer_name: GLuint) {
        unsafe { self.gl.bind_framebuffer(target, framebuffer(framebuffer_name)) };
        self.check_error("glBindFramebuffer");
    }

    fn check_framebuffer_status(&self, target: GLenum) -> GLenum {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        texture_target: GLenum,
        texture_name: GLuint,
        level: GLint,
    ) {
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, texture_target, texture(texture_name), level)
        };
        self.check_error("glFramebufferTexture2D");
    }

    fn framebuffer_renderbuffer(
        &self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer_name: GLuint,
    ) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                target,
                attachment,
                renderbuffer_target,
                renderbuffer(renderbuffer_name),
            )
        };
        self.check_error("glFramebufferRenderbuffer");
    }

    fn blit_framebuffer(&self, src: [GLint; 4], dst: [GLint; 4], mask: GLbitfield, filter: GLenum) {
        unsafe {
            self.gl.blit_framebuffer(
                src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            )
        };
        self.check_error("glBlitFramebuffer");
    }

    // ===== RENDERBUFFERS =====

    fn gen_renderbuffer(&self) -> Result<GLuint> {
        let rb = unsafe { self.gl.create_renderbuffer() }
            .map_err(|e| engine_err!(SOURCE, "glGenRenderbuffers failed: {}", e))?;
        Ok(rb.0.get())
    }

    fn delete_renderbuffers(&self, renderbuffers: &[GLuint]) {
        for rb in renderbuffers.iter().filter_map(|&name| renderbuffer(name)) {
            unsafe { self.gl.delete_renderbuffer(rb) };
        }
        self.check_error("glDeleteRenderbuffers");
    }

    fn bind_renderbuffer(&self, target: GLenum, renderbuffer_name: GLuint) {
        unsafe { self.gl.bind_renderbuffer(target, renderbuffer(renderbuffer_name)) };
        self.check_error("glBindRenderbuffer");
    }

    fn renderbuffer_storage(&self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        // Probing triggers errors on purpose, no check here
        unsafe { self.gl.renderbuffer_storage(target, internal_format, width, height) };
    }

    fn renderbuffer_storage_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        unsafe {
            self.gl
                .renderbuffer_storage_multisample(target, samples, internal_format, width, height)
        };
    }

    // ===== TEXTURES =====

    fn gen_texture(&self) -> Result<GLuint> {
        let tex = unsafe { self.gl.create_texture() }
            .map_err(|e| engine_err!(SOURCE, "glGenTextures failed: {}", e))?;
        Ok(tex.0.get())
    }

    fn delete_textures(&self, textures: &[GLuint]) {
        for tex in textures.iter().filter_map(|&name| texture(name)) {
            unsafe { self.gl.delete_texture(tex) };
        }
        self.check_error("glDeleteTextures");
    }

    fn bind_texture(&self, target: GLenum, texture_name: GLuint) {
        unsafe { self.gl.bind_texture(target, texture(texture_name)) };
        self.check_error("glBindTexture");
    }

    fn tex_parameter_i32(&self, target: GLenum, pname: GLenum, param: GLint) {
        unsafe { self.gl.tex_parameter_i32(target, pname, param) };
        self.check_error("glTexParameteri");
    }

    fn tex_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        data_type: GLenum,
    ) {
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                data_type,
                glow::PixelUnpackData::Slice(None),
            )
        };
    }
}

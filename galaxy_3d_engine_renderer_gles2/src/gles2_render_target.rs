/// GLES2 render targets: FBO-backed render textures and window surfaces

use galaxy_3d_engine::galaxy3d::render::{PixelFormat, RenderTarget};
use crate::gles2_consts::GLuint;
use crate::gles2_frame_buffer::Gles2FrameBufferObject;

/// Render target as seen by the GLES2 backend
pub trait Gles2RenderTarget: RenderTarget {
    /// Framebuffer object rendering goes to, `None` for the window surface
    fn fbo(&self) -> Option<&Gles2FrameBufferObject>;

    /// Framebuffer name of the window surface
    ///
    /// 0 everywhere except platforms (iOS) where the windowing layer renders
    /// into a framebuffer object of its own.
    fn default_framebuffer(&self) -> GLuint {
        0
    }
}

/// Offscreen render target backed by a framebuffer object
///
/// Created and destroyed through `Gles2FboManager`, which owns the
/// surfaces attached to it.
pub struct Gles2FboRenderTexture {
    name: String,
    fb: Gles2FrameBufferObject,
    hardware_gamma: bool,
    /// FSAA asked for at creation, before clamping to the driver maximum
    requested_fsaa: u32,
}

impl Gles2FboRenderTexture {
    pub(crate) fn new(
        name: String,
        fb: Gles2FrameBufferObject,
        hardware_gamma: bool,
        requested_fsaa: u32,
    ) -> Self {
        Self { name, fb, hardware_gamma, requested_fsaa }
    }

    /// Resolve multisampled rendering into the color surface
    pub fn swap_buffers(&self) {
        self.fb.swap_buffers();
    }

    pub fn requested_fsaa(&self) -> u32 {
        self.requested_fsaa
    }

    pub fn frame_buffer(&self) -> &Gles2FrameBufferObject {
        &self.fb
    }

    pub(crate) fn frame_buffer_mut(&mut self) -> &mut Gles2FrameBufferObject {
        &mut self.fb
    }
}

impl RenderTarget for Gles2FboRenderTexture {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.fb.width()
    }

    fn height(&self) -> u32 {
        self.fb.height()
    }

    fn format(&self) -> PixelFormat {
        self.fb.format()
    }

    fn fsaa(&self) -> u32 {
        self.fb.num_samples()
    }

    fn is_hardware_gamma_enabled(&self) -> bool {
        self.hardware_gamma
    }
}

impl Gles2RenderTarget for Gles2FboRenderTexture {
    fn fbo(&self) -> Option<&Gles2FrameBufferObject> {
        Some(&self.fb)
    }
}

/// Window-provided surface (no framebuffer object)
#[derive(Debug, Clone)]
pub struct Gles2WindowSurface {
    name: String,
    width: u32,
    height: u32,
    format: PixelFormat,
    default_framebuffer: GLuint,
}

impl Gles2WindowSurface {
    pub fn new(name: impl Into<String>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            default_framebuffer: 0,
        }
    }

    /// Use `framebuffer` instead of 0 as the surface's framebuffer name
    pub fn with_default_framebuffer(mut self, framebuffer: GLuint) -> Self {
        self.default_framebuffer = framebuffer;
        self
    }

    /// The window was resized
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl RenderTarget for Gles2WindowSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> PixelFormat {
        self.format
    }
}

impl Gles2RenderTarget for Gles2WindowSurface {
    fn fbo(&self) -> Option<&Gles2FrameBufferObject> {
        None
    }

    fn default_framebuffer(&self) -> GLuint {
        self.default_framebuffer
    }
}

#[cfg(test)]
#[path = "gles2_render_target_tests.rs"]
mod tests;
